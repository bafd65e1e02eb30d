//! Headless mode for the adventure reader.
//!
//! A line-oriented interface for scripting and automated testing. Every
//! input line is a `#command`; output lines are tagged so they are easy to
//! grep.

use std::io::{self, BufRead, Write};

use adventure_core::persist::{self, StoryInfo};
use adventure_core::tree_view::{NodeImages, TreeLayout};
use adventure_core::{
    AdventureConfig, EnvProfile, ProfileSource, ReadingSession, StoryFragment, UserProfileLookup,
};

const HELP: &[&str] = &[
    "  #list         - List stories in the library",
    "  #open <n>     - Open story number n from the list",
    "  #tree         - Show the open story's fragment tree",
    "  #read         - Show the current fragment and its choices",
    "  #choose <n>   - Follow choice number n",
    "  #back         - Step back one fragment",
    "  #restart      - Return to the first fragment",
    "  #whoami       - Show the signed-in user",
    "  #help         - Show this help",
    "  #quit         - Exit",
];

/// State of a headless reading run.
pub struct HeadlessReader<P: ProfileSource> {
    config: AdventureConfig,
    profile: UserProfileLookup<P>,
    stories: Vec<StoryInfo>,
    session: Option<ReadingSession>,
}

/// Outcome of one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl<P: ProfileSource> HeadlessReader<P> {
    pub fn new(config: AdventureConfig, profile: P) -> Self {
        Self {
            config,
            profile: UserProfileLookup::new(profile),
            stories: Vec::new(),
            session: None,
        }
    }

    /// Run one input line, writing its output to `out`.
    pub async fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let Some(command) = line.strip_prefix('#') else {
            writeln!(out, "[ERROR] Commands start with '#'. Try #help")?;
            return Ok(Flow::Continue);
        };

        let parts: Vec<&str> = command.split_whitespace().collect();
        let arg = parts.get(1).and_then(|s| s.parse::<usize>().ok());

        match parts.first().copied() {
            Some("quit") | Some("exit") => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Quit);
            }
            Some("list") => self.list(out).await?,
            Some("open") => match arg {
                Some(n) => self.open(n, out).await?,
                None => writeln!(out, "[ERROR] Usage: #open <n>")?,
            },
            Some("tree") => self.tree(out)?,
            Some("read") => self.read(out)?,
            Some("choose") => match arg {
                Some(n) => self.choose(n, out)?,
                None => writeln!(out, "[ERROR] Usage: #choose <n>")?,
            },
            Some("back") => match self.session.as_mut().map(|s| s.back()) {
                Some(true) => self.read(out)?,
                Some(false) => writeln!(out, "[ERROR] Already at the beginning")?,
                None => writeln!(out, "[ERROR] No story open")?,
            },
            Some("restart") => match self.session.as_mut() {
                Some(session) => {
                    session.restart();
                    self.read(out)?;
                }
                None => writeln!(out, "[ERROR] No story open")?,
            },
            Some("whoami") => {
                self.profile.invalidate();
                match self.profile.user_name() {
                    Some(name) => writeln!(out, "[USER] {name}")?,
                    None => writeln!(out, "[USER] (unknown)")?,
                }
            }
            Some("help") => {
                writeln!(out, "[HELP]")?;
                for line in HELP {
                    writeln!(out, "{line}")?;
                }
            }
            Some(other) => writeln!(out, "[ERROR] Unknown command: #{other}")?,
            None => writeln!(out, "[ERROR] Empty command")?,
        }

        Ok(Flow::Continue)
    }

    async fn list<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match persist::list_stories(&self.config.library_dir).await {
            Ok(stories) => self.stories = stories,
            Err(e) => return writeln!(out, "[ERROR] Could not read library: {e}"),
        }

        if self.stories.is_empty() {
            return writeln!(out, "[LIBRARY] empty");
        }
        for (i, info) in self.stories.iter().enumerate() {
            let meta = &info.metadata;
            writeln!(
                out,
                "[STORY {}] {} by {} ({}) tags: {}",
                i + 1,
                meta.title,
                meta.author,
                meta.formatted_timestamp(),
                meta.tags.join(", ")
            )?;
        }
        Ok(())
    }

    async fn open<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(info) = n.checked_sub(1).and_then(|i| self.stories.get(i)) else {
            return writeln!(out, "[ERROR] No story {n}. Run #list first");
        };

        match ReadingSession::load(&info.path).await {
            Ok(session) => {
                writeln!(out, "[OPENED] {}", session.story().title())?;
                self.session = Some(session);
                self.read(out)
            }
            Err(e) => writeln!(out, "[ERROR] Could not open story: {e}"),
        }
    }

    fn tree<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            return writeln!(out, "[ERROR] No story open");
        };

        let fragments: Vec<StoryFragment> = session.fragments().cloned().collect();
        let layout = TreeLayout::compute(
            session.story(),
            &fragments,
            &NodeImages::default(),
            self.config.line_budget,
        );
        let current = session.current().id;

        for node in layout.nodes() {
            let region = node.region();
            let marker = if node.fragment_id() == current { "*" } else { " " };
            writeln!(
                out,
                "[NODE{marker}] ({}, {}) {} | {}",
                region.x,
                region.y,
                node.line_one(),
                node.line_two()
            )?;
        }
        Ok(())
    }

    fn read<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(session) = &self.session else {
            return writeln!(out, "[ERROR] No story open");
        };

        let fragment = session.current();
        writeln!(out, "[TEXT] {}", fragment.story_text())?;
        if fragment.is_ending() {
            writeln!(out, "[END]")?;
        }
        for (i, choice) in fragment.choices.iter().enumerate() {
            writeln!(out, "[CHOICE {}] {}", i + 1, choice.text)?;
        }
        Ok(())
    }

    fn choose<W: Write>(&mut self, n: usize, out: &mut W) -> io::Result<()> {
        let Some(session) = self.session.as_mut() else {
            return writeln!(out, "[ERROR] No story open");
        };

        let Some(index) = n.checked_sub(1) else {
            return writeln!(out, "[ERROR] Choices are numbered from 1");
        };
        if let Err(e) = session.choose(index) {
            return writeln!(out, "[ERROR] {e}");
        }
        self.read(out)
    }
}

/// Run headless mode on stdin and stdout.
pub async fn run_headless(config: AdventureConfig) -> io::Result<()> {
    let profile = EnvProfile::new(config.profile_env_vars.iter().cloned());
    let mut reader = HeadlessReader::new(config, profile);
    let mut stdout = io::stdout();

    writeln!(stdout, "=== Adventure Headless Mode ===")?;
    for line in HELP {
        writeln!(stdout, "{line}")?;
    }
    writeln!(stdout)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let flow = reader.execute(&line, &mut stdout).await?;
        stdout.flush()?;
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}
