//! Placement of fragment nodes for a whole story.

use std::collections::{HashMap, HashSet, VecDeque};

use super::camera::{Camera, Region, Surface};
use super::node::{FragmentNode, LineBudget, NodeImages};
use crate::fragment::StoryFragment;
use crate::id::FragmentId;
use crate::story::Story;

/// Horizontal space between node columns.
pub const COLUMN_GAP: i32 = 6;

/// Vertical space between nodes in a column.
pub const ROW_GAP: i32 = 2;

/// Every fragment of a story laid out as a node.
///
/// Columns follow reading depth from the head fragment. Members that cannot
/// be reached from the head end up in one trailing column, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct TreeLayout {
    nodes: Vec<FragmentNode>,
    selected: Option<usize>,
}

impl TreeLayout {
    pub fn compute(
        story: &Story,
        fragments: &[StoryFragment],
        images: &NodeImages,
        budget: LineBudget,
    ) -> Self {
        let by_id: HashMap<FragmentId, &StoryFragment> = fragments
            .iter()
            .filter(|f| story.contains_fragment(f.id))
            .map(|f| (f.id, f))
            .collect();

        let mut columns: Vec<Vec<FragmentId>> = Vec::new();
        let mut seen: HashSet<FragmentId> = HashSet::new();
        let mut queue: VecDeque<(FragmentId, usize)> = VecDeque::new();

        if let Some(head) = story.head_fragment_id().filter(|id| by_id.contains_key(id)) {
            seen.insert(head);
            queue.push_back((head, 0));
        }

        while let Some((id, depth)) = queue.pop_front() {
            if columns.len() <= depth {
                columns.push(Vec::new());
            }
            columns[depth].push(id);

            for target in by_id[&id].targets() {
                if by_id.contains_key(&target) && seen.insert(target) {
                    queue.push_back((target, depth + 1));
                }
            }
        }

        // BTreeSet iteration keeps the orphan column stable.
        let orphans: Vec<FragmentId> = story
            .fragment_ids()
            .iter()
            .filter(|id| by_id.contains_key(id) && !seen.contains(id))
            .copied()
            .collect();
        if !orphans.is_empty() {
            columns.push(orphans);
        }

        let mut nodes = Vec::with_capacity(by_id.len());
        for (col, ids) in columns.iter().enumerate() {
            for (row, id) in ids.iter().enumerate() {
                let mut node = FragmentNode::new(by_id[id], images.clone(), budget);
                let Region { width, height, .. } = node.region();
                node.move_to(
                    col as i32 * (width + COLUMN_GAP),
                    row as i32 * (height + ROW_GAP),
                );
                nodes.push(node);
            }
        }

        let mut layout = Self {
            nodes,
            selected: None,
        };
        if !layout.nodes.is_empty() {
            layout.select(0);
        }
        layout
    }

    pub fn nodes(&self) -> &[FragmentNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, fragment_id: FragmentId) -> Option<&FragmentNode> {
        self.nodes.iter().find(|n| n.fragment_id() == fragment_id)
    }

    pub fn selected(&self) -> Option<&FragmentNode> {
        self.selected.map(|i| &self.nodes[i])
    }

    /// Select the node at `index`, deselecting the previous one.
    pub fn select(&mut self, index: usize) {
        if index >= self.nodes.len() {
            return;
        }
        if let Some(prev) = self.selected {
            self.nodes[prev].set_selected(false);
        }
        self.nodes[index].set_selected(true);
        self.selected = Some(index);
    }

    pub fn select_fragment(&mut self, fragment_id: FragmentId) -> bool {
        match self.nodes.iter().position(|n| n.fragment_id() == fragment_id) {
            Some(index) => {
                self.select(index);
                true
            }
            None => false,
        }
    }

    /// Move the selection forward (or backward) through the nodes, wrapping.
    pub fn cycle_selection(&mut self, forward: bool) {
        let len = self.nodes.len();
        if len == 0 {
            return;
        }
        let next = match self.selected {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.select(next);
    }

    /// Select the node under a world point.
    pub fn hit(&mut self, x: i32, y: i32) -> Option<FragmentId> {
        let index = self.nodes.iter().position(|n| n.region().contains(x, y))?;
        self.select(index);
        Some(self.nodes[index].fragment_id())
    }

    /// Recompute the preview of one node after its fragment changed.
    pub fn refresh(&mut self, fragment: &StoryFragment) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.fragment_id() == fragment.id) {
            node.refresh_contents(fragment);
        }
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, camera: &Camera) {
        for node in &self.nodes {
            node.draw(surface, camera);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_story, DrawCall, RecordingSurface};

    fn layout() -> (Story, Vec<StoryFragment>, TreeLayout) {
        let (story, fragments) = sample_story();
        let layout = TreeLayout::compute(
            &story,
            &fragments,
            &NodeImages::default(),
            LineBudget::default(),
        );
        (story, fragments, layout)
    }

    #[test]
    fn test_head_is_first_and_selected() {
        let (story, _, layout) = layout();
        let head = story.head_fragment_id().unwrap();

        assert_eq!(layout.len(), story.fragment_ids().len());
        assert_eq!(layout.nodes()[0].fragment_id(), head);
        assert_eq!(layout.nodes()[0].region().x, 0);
        assert_eq!(layout.selected().unwrap().fragment_id(), head);
    }

    #[test]
    fn test_children_sit_one_column_right() {
        let (story, fragments, layout) = layout();
        let head = story.head_fragment_id().unwrap();
        let head_fragment = fragments.iter().find(|f| f.id == head).unwrap();

        for (row, target) in head_fragment.targets().enumerate() {
            let region = layout.node(target).unwrap().region();
            assert_eq!(region.x, region.width + COLUMN_GAP);
            assert_eq!(region.y, row as i32 * (region.height + ROW_GAP));
        }
    }

    #[test]
    fn test_unreachable_fragments_go_last() {
        let (mut story, mut fragments) = sample_story();
        let orphan = StoryFragment::new(story.id(), "Nobody links here.");
        story.add_fragment(orphan.id);
        fragments.push(orphan.clone());

        let layout = TreeLayout::compute(
            &story,
            &fragments,
            &NodeImages::default(),
            LineBudget::default(),
        );
        let max_x = layout.nodes().iter().map(|n| n.region().x).max().unwrap();
        assert_eq!(layout.node(orphan.id).unwrap().region().x, max_x);
        assert_eq!(layout.nodes().last().unwrap().fragment_id(), orphan.id);
    }

    #[test]
    fn test_fragments_outside_story_are_ignored() {
        let (story, mut fragments) = sample_story();
        let stranger = StoryFragment::new(story.id(), "Not a member.");
        fragments.push(stranger.clone());

        let layout = TreeLayout::compute(
            &story,
            &fragments,
            &NodeImages::default(),
            LineBudget::default(),
        );
        assert!(layout.node(stranger.id).is_none());
    }

    #[test]
    fn test_cycle_selection_wraps() {
        let (_, _, mut layout) = layout();
        let len = layout.len();

        layout.cycle_selection(false);
        assert_eq!(
            layout.selected().unwrap().fragment_id(),
            layout.nodes()[len - 1].fragment_id()
        );
        assert!(layout.nodes()[len - 1].is_selected());
        assert!(!layout.nodes()[0].is_selected());

        layout.cycle_selection(true);
        assert!(layout.nodes()[0].is_selected());
        assert_eq!(layout.nodes().iter().filter(|n| n.is_selected()).count(), 1);
    }

    #[test]
    fn test_hit_selects_node() {
        let (_, _, mut layout) = layout();
        let target = layout.nodes()[1].region();

        let hit = layout.hit(target.x + 1, target.y + 1);
        assert_eq!(hit, Some(layout.nodes()[1].fragment_id()));
        assert!(layout.nodes()[1].is_selected());
        assert_eq!(layout.hit(-100, -100), None);
    }

    #[test]
    fn test_refresh_updates_one_node() {
        let (_, mut fragments, mut layout) = layout();
        fragments[0].set_story_text("Rewritten.");
        layout.refresh(&fragments[0]);
        assert_eq!(layout.node(fragments[0].id).unwrap().line_one(), "Rewritten.");
    }

    #[test]
    fn test_draw_emits_three_calls_per_node() {
        let (_, _, layout) = layout();
        let mut surface = RecordingSurface::default();
        layout.draw(&mut surface, &Camera::default());

        assert_eq!(surface.calls.len(), layout.len() * 3);
        let images = surface
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Image { .. }))
            .count();
        assert_eq!(images, layout.len());
    }

    #[test]
    fn test_empty_story() {
        let story = Story::untitled();
        let layout =
            TreeLayout::compute(&story, &[], &NodeImages::default(), LineBudget::default());
        assert!(layout.is_empty());
        assert!(layout.selected().is_none());
    }
}
