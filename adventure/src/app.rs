//! Main application state and logic

use std::path::PathBuf;

use adventure_core::persist::StoryInfo;
use adventure_core::tree_view::{Camera, NodeImages, TreeLayout};
use adventure_core::{
    AdventureConfig, EnvProfile, FragmentId, ReadingSession, SessionError, StoryFragment,
    UserProfileLookup,
};

use crate::ui::theme::AdventureTheme;

/// Cells moved per pan keypress
pub const PAN_STEP: i32 = 4;

/// Which screen is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Story list
    #[default]
    Library,
    /// Fragment tree of the open story
    Tree,
    /// Reading the open story
    Reader,
}

/// Main application state
pub struct App {
    pub config: AdventureConfig,
    pub theme: AdventureTheme,
    profile: UserProfileLookup<EnvProfile>,
    node_images: NodeImages,

    pub screen: Screen,

    // Library
    pub stories: Vec<StoryInfo>,
    pub library_index: usize,

    // Open story
    session: Option<ReadingSession>,
    layout: TreeLayout,
    /// Manual camera offset on top of following the selected node
    pub pan: (i32, i32),

    // Work for the async main loop
    pub pending_open: Option<PathBuf>,
    pub pending_reload: bool,

    status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AdventureConfig) -> Self {
        let mut profile =
            UserProfileLookup::new(EnvProfile::new(config.profile_env_vars.iter().cloned()));
        // Resolve once up front; render only reads the cache.
        profile.user_name();

        Self {
            config,
            theme: AdventureTheme::default(),
            profile,
            node_images: NodeImages::default(),
            screen: Screen::Library,
            stories: Vec::new(),
            library_index: 0,
            session: None,
            layout: TreeLayout::default(),
            pan: (0, 0),
            pending_open: None,
            pending_reload: true,
            status_message: None,
            should_quit: false,
        }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.profile.cached()
    }

    /// Drop the cached user name and look it up again.
    pub fn refresh_user_name(&mut self) {
        self.profile.invalidate();
        let message = match self.profile.user_name() {
            Some(name) => format!("Signed in as {name}"),
            None => "No user profile found".to_string(),
        };
        self.set_status(message);
    }

    // ---- Library ----

    pub fn set_stories(&mut self, stories: Vec<StoryInfo>) {
        self.stories = stories;
        self.library_index = self.library_index.min(self.stories.len().saturating_sub(1));
    }

    pub fn selected_story(&self) -> Option<&StoryInfo> {
        self.stories.get(self.library_index)
    }

    pub fn select_next_story(&mut self) {
        if !self.stories.is_empty() {
            self.library_index = (self.library_index + 1) % self.stories.len();
        }
    }

    pub fn select_prev_story(&mut self) {
        if !self.stories.is_empty() {
            let len = self.stories.len();
            self.library_index = (self.library_index + len - 1) % len;
        }
    }

    /// Ask the main loop to load the highlighted story.
    pub fn request_open(&mut self) {
        match self.selected_story() {
            Some(info) => self.pending_open = Some(info.path.clone()),
            None => self.set_status("No story selected"),
        }
    }

    // ---- Open story ----

    pub fn session(&self) -> Option<&ReadingSession> {
        self.session.as_ref()
    }

    pub fn layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// Show a freshly loaded story as a tree.
    pub fn open_session(&mut self, session: ReadingSession) {
        let fragments: Vec<StoryFragment> = session.fragments().cloned().collect();
        self.layout = TreeLayout::compute(
            session.story(),
            &fragments,
            &self.node_images,
            self.config.line_budget,
        );
        self.set_status(format!("Opened \"{}\"", session.story().title()));
        self.session = Some(session);
        self.pan = (0, 0);
        self.screen = Screen::Tree;
    }

    pub fn close_session(&mut self) {
        self.session = None;
        self.layout = TreeLayout::default();
        self.screen = Screen::Library;
    }

    /// Camera for a view of the given size: centred on the selected node,
    /// shifted by the manual pan.
    pub fn camera(&self, width: u16, height: u16) -> Camera {
        let mut camera = Camera::default();
        if let Some(node) = self.layout.selected() {
            camera.center_on(&node.region(), width as i32, height as i32);
        }
        camera.pan(self.pan.0, self.pan.1);
        camera
    }

    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }

    pub fn cycle_node(&mut self, forward: bool) {
        self.layout.cycle_selection(forward);
        self.pan = (0, 0);
    }

    pub fn selected_fragment(&self) -> Option<&StoryFragment> {
        let id = self.layout.selected()?.fragment_id();
        self.session.as_ref()?.fragment(id)
    }

    // ---- Reading ----

    /// Read from the selected node, or from the start when nothing is selected.
    pub fn start_reading(&mut self) {
        let selected = self.layout.selected().map(|n| n.fragment_id());
        let Some(session) = self.session.as_mut() else {
            return;
        };

        session.restart();
        if let Some(id) = selected {
            if let Err(e) = session.jump_to(id).map(|_| ()) {
                self.set_status(format!("Error: {e}"));
            }
        }
        self.screen = Screen::Reader;
        self.follow_reader();
    }

    pub fn choose(&mut self, index: usize) {
        let result = match self.session.as_mut() {
            Some(session) => session.choose(index).map(|f| f.id),
            None => return,
        };
        match result {
            Ok(_) => self.follow_reader(),
            Err(SessionError::NoSuchChoice { .. }) => self.set_status("No such choice"),
            Err(e) => self.set_status(format!("Error: {e}")),
        }
    }

    pub fn step_back(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if !session.back() {
                self.set_status("Already at the beginning");
            }
        }
        self.follow_reader();
    }

    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart();
        }
        self.follow_reader();
    }

    /// Keep the tree selection on the fragment being read.
    fn follow_reader(&mut self) {
        let current: Option<FragmentId> = self.session.as_ref().map(|s| s.current().id);
        if let Some(id) = current {
            self.layout.select_fragment(id);
            self.pan = (0, 0);
        }
    }

    /// Escape: reader -> tree -> library -> quit
    pub fn go_back(&mut self) {
        match self.screen {
            Screen::Reader => self.screen = Screen::Tree,
            Screen::Tree => self.close_session(),
            Screen::Library => self.should_quit = true,
        }
    }

    // ---- Status ----

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adventure_core::testing::sample_story;

    fn app_with_story() -> App {
        let mut app =
            App::new(AdventureConfig::new().with_profile_env_vars(["ADVENTURE_APP_TEST_USER"]));
        let (story, fragments) = sample_story();
        app.open_session(ReadingSession::new(story, fragments).unwrap());
        app
    }

    #[test]
    fn test_open_session_shows_tree() {
        let app = app_with_story();
        assert_eq!(app.screen, Screen::Tree);
        assert_eq!(app.layout().len(), 4);
        assert_eq!(
            app.selected_fragment().map(|f| f.id),
            app.session().unwrap().story().head_fragment_id()
        );
    }

    #[test]
    fn test_reading_moves_tree_selection() {
        let mut app = app_with_story();
        app.start_reading();
        assert_eq!(app.screen, Screen::Reader);

        app.choose(0);
        assert_eq!(
            app.selected_fragment().unwrap().story_text(),
            "The door is locked."
        );

        app.choose(7);
        assert_eq!(app.status(), Some("No such choice"));

        app.step_back();
        assert_eq!(
            app.selected_fragment().map(|f| f.id),
            app.session().unwrap().story().head_fragment_id()
        );
    }

    #[test]
    fn test_camera_follows_selection_and_pan() {
        let mut app = app_with_story();
        let head = app.layout().selected().unwrap().region();
        let camera = app.camera(80, 24);
        assert_eq!(camera.to_local(head.center().0, head.center().1), (40, 12));

        app.pan_by(PAN_STEP, 0);
        let camera = app.camera(80, 24);
        assert_eq!(camera.to_local(head.center().0, head.center().1), (40 - PAN_STEP, 12));

        app.cycle_node(true);
        assert_eq!(app.pan, (0, 0));
    }

    #[test]
    fn test_go_back_chain() {
        let mut app = app_with_story();
        app.start_reading();
        app.go_back();
        assert_eq!(app.screen, Screen::Tree);
        app.go_back();
        assert_eq!(app.screen, Screen::Library);
        assert!(app.session().is_none());
        app.go_back();
        assert!(app.should_quit);
    }

    #[test]
    fn test_library_selection_wraps() {
        let mut app = App::new(AdventureConfig::new());
        app.select_next_story();
        assert_eq!(app.library_index, 0);
        app.request_open();
        assert!(app.pending_open.is_none());
        assert_eq!(app.status(), Some("No story selected"));
    }
}
