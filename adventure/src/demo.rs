//! A built-in story written to the library with `--demo`.

use std::path::{Path, PathBuf};

use adventure_core::persist::{self, PersistError};
use adventure_core::{Story, StoryFragment};

/// Build the demo story and its fragments.
pub fn demo_story(author: &str) -> (Story, Vec<StoryFragment>) {
    let mut story = Story::create(
        author,
        "The Lighthouse Keeper",
        "A storm, a dark lamp, and a ship on the rocks.",
    );
    story.add_tag("demo");
    story.add_tag("sea");

    let id = story.id();
    let rescued = StoryFragment::new(
        id,
        "The lamp flares to life. Far below, the ship turns away from the rocks and the crew cheers.",
    );
    let lost = StoryFragment::new(
        id,
        "By the time you reach the shore the ship is gone. Only the gulls answer your calls.",
    );
    let oil = StoryFragment::new(
        id,
        "The oil store is flooded, but one sealed barrel floats near the stairs.",
    )
    .with_choice("Haul the barrel up to the lamp", rescued.id)
    .with_choice("Leave it and run for the boat", lost.id);
    let beach = StoryFragment::new(
        id,
        "Waves crash over the jetty. The rowing boat is still tied up, barely.",
    )
    .with_choice("Row out toward the ship", lost.id)
    .with_choice("Go back and check the oil store", oil.id);
    let start = StoryFragment::new(
        id,
        "Lightning shows a ship drifting toward the reef, and the lighthouse lamp has gone out.",
    )
    .with_choice("Climb down to the oil store", oil.id)
    .with_choice("Run to the beach", beach.id);

    let fragments = vec![start, beach, oil, lost, rescued];
    for fragment in &fragments {
        story.add_fragment(fragment.id);
    }

    (story, fragments)
}

/// Write the demo story into `dir`, returning the file it was saved to.
pub async fn install_demo(dir: &Path, author: &str) -> Result<PathBuf, PersistError> {
    let (story, fragments) = demo_story(author);
    persist::save_story(dir, &story, fragments).await
}
