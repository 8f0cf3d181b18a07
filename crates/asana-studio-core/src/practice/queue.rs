//! Ordered, user-editable list of practice steps.
//!
//! Insertion order is the session order and the input to phase
//! classification. The same pose may appear any number of times.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::step::{HoldSeconds, PoseStep, Side};
use crate::error::{Result, ValidationError};
use crate::services::{CatalogPose, PracticeDraft, PracticePoseEntry};

const COLLECTION: &str = "queue";

/// Move the element at `from` so that it ends up at `to`.
///
/// Every other element keeps its relative order. Callers check bounds.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = list.remove(from);
    list.insert(to, item);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Queue {
    steps: Vec<PoseStep>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PoseStep> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[PoseStep] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &PoseStep> {
        self.steps.iter()
    }

    /// Sum of all hold times. Recomputed on every call.
    pub fn total_duration_seconds(&self) -> u64 {
        self.steps
            .iter()
            .map(|s| u64::from(s.hold_seconds().get()))
            .sum()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append a catalog pose. Bilateral poses expand to a left step followed
    /// by a right step with the same hold time.
    pub fn add_pose(&mut self, pose: &CatalogPose) {
        let hold = HoldSeconds::or_default(pose.default_hold_seconds);
        if pose.is_bilateral {
            self.steps.push(pose.to_step(Side::Left, hold));
            self.steps.push(pose.to_step(Side::Right, hold));
        } else {
            self.steps.push(pose.to_step(Side::Both, hold));
        }
        debug!(pose_id = pose.id, bilateral = pose.is_bilateral, len = self.len(), "pose added");
    }

    pub fn remove_step(&mut self, index: usize) -> Result<PoseStep> {
        self.check_index(index)?;
        let removed = self.steps.remove(index);
        debug!(index, len = self.len(), "step removed");
        Ok(removed)
    }

    /// Apply a hold-time edit typed by the user.
    ///
    /// Returns `Ok(false)` and leaves the queue untouched when `raw` is not a
    /// positive integer.
    pub fn update_hold(&mut self, index: usize, raw: &str) -> Result<bool> {
        self.check_index(index)?;
        let Some(hold) = HoldSeconds::parse_edit(raw) else {
            debug!(index, raw, "hold edit rejected");
            return Ok(false);
        };
        self.steps[index].set_hold_seconds(hold);
        Ok(true)
    }

    /// Drag-and-drop reorder. Unset indices and `from == to` are no-ops and
    /// return `Ok(false)`.
    pub fn reorder(&mut self, from: Option<usize>, to: Option<usize>) -> Result<bool> {
        let (Some(from), Some(to)) = (from, to) else {
            return Ok(false);
        };
        if from == to {
            return Ok(false);
        }
        self.check_index(from)?;
        self.check_index(to)?;
        move_item(&mut self.steps, from, to);
        debug!(from, to, "step moved");
        Ok(true)
    }

    /// Replace the whole queue with already-expanded steps.
    pub fn load_from_external<I>(&mut self, steps: I)
    where
        I: IntoIterator<Item = PoseStep>,
    {
        self.steps = steps.into_iter().collect();
        debug!(len = self.len(), "queue replaced");
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Payload for saving this queue as a named practice. Positions are 1-based.
    pub fn practice_draft(&self, name: impl Into<String>) -> PracticeDraft {
        PracticeDraft {
            name: name.into(),
            poses: self
                .steps
                .iter()
                .enumerate()
                .map(|(i, s)| PracticePoseEntry {
                    pose_id: s.pose_id(),
                    position: i + 1,
                    side: s.side(),
                    hold_seconds: s.hold_seconds().get(),
                })
                .collect(),
        }
    }

    /// Plain-text listing, one numbered line per step.
    pub fn export_text(&self, title: &str) -> String {
        let mut lines = vec![format!("# {title}")];
        lines.push(format!(
            "Total: {} ({} poses)",
            crate::session::format_total(self.total_duration_seconds()),
            self.len()
        ));
        lines.push(String::new());
        for (i, step) in self.steps.iter().enumerate() {
            lines.push(format!(
                "{}. {} — {}s",
                i + 1,
                step.display_name(),
                step.hold_seconds().get()
            ));
        }
        lines.join("\n")
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.steps.len() {
            return Err(ValidationError::OutOfBounds {
                collection: COLLECTION.into(),
                index,
                len: self.steps.len(),
            }
            .into());
        }
        Ok(())
    }
}

impl FromIterator<PoseStep> for Queue {
    fn from_iter<I: IntoIterator<Item = PoseStep>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    fn pose(id: i64, name: &str, bilateral: bool, hold: Option<i64>) -> CatalogPose {
        CatalogPose {
            id,
            english_name: name.into(),
            sanskrit_name: None,
            category: "Standing".into(),
            tags: vec!["standing".into()],
            difficulty: Some(2),
            is_bilateral: bilateral,
            default_hold_seconds: hold,
        }
    }

    fn abc() -> Queue {
        ["A", "B", "C"]
            .iter()
            .enumerate()
            .map(|(i, n)| PoseStep::new(i as i64, *n, Side::Both, HoldSeconds::default()))
            .collect()
    }

    fn names(q: &Queue) -> Vec<&str> {
        q.iter().map(|s| s.english_name()).collect()
    }

    #[test]
    fn bilateral_pose_adds_left_then_right() {
        let mut q = Queue::new();
        q.add_pose(&pose(1, "Warrior II", true, Some(40)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.get(0).unwrap().side(), Side::Left);
        assert_eq!(q.get(1).unwrap().side(), Side::Right);
        assert_eq!(q.get(0).unwrap().hold_seconds(), q.get(1).unwrap().hold_seconds());
        assert_eq!(q.get(0).unwrap().hold_seconds().get(), 40);
    }

    #[test]
    fn single_pose_adds_one_step_for_both_sides() {
        let mut q = Queue::new();
        q.add_pose(&pose(2, "Mountain", false, None));
        assert_eq!(q.len(), 1);
        assert_eq!(q.get(0).unwrap().side(), Side::Both);
        assert_eq!(q.get(0).unwrap().hold_seconds().get(), 30);
    }

    #[test]
    fn non_positive_default_hold_falls_back() {
        let mut q = Queue::new();
        q.add_pose(&pose(2, "Mountain", false, Some(0)));
        assert_eq!(q.get(0).unwrap().hold_seconds().get(), 30);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut q = Queue::new();
        let p = pose(2, "Mountain", false, None);
        q.add_pose(&p);
        q.add_pose(&p);
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn total_duration_tracks_hold_edits() {
        let mut q = abc();
        assert_eq!(q.total_duration_seconds(), 90);

        assert!(!q.update_hold(1, "nope").unwrap());
        assert!(!q.update_hold(1, "0").unwrap());
        assert_eq!(q.get(1).unwrap().hold_seconds().get(), 30);
        assert_eq!(q.total_duration_seconds(), 90);

        assert!(q.update_hold(1, "45").unwrap());
        assert_eq!(q.get(1).unwrap().hold_seconds().get(), 45);
        assert_eq!(q.total_duration_seconds(), 105);
    }

    #[test]
    fn update_hold_out_of_bounds_is_reported() {
        let mut q = abc();
        let err = q.update_hold(3, "20").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfBounds { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn reorder_moves_first_to_last() {
        let mut q = abc();
        assert!(q.reorder(Some(0), Some(2)).unwrap());
        assert_eq!(names(&q), ["B", "C", "A"]);
    }

    #[test]
    fn reorder_moves_last_to_first() {
        let mut q = abc();
        q.reorder(Some(2), Some(0)).unwrap();
        assert_eq!(names(&q), ["C", "A", "B"]);
    }

    #[test]
    fn reorder_noops() {
        let mut q = abc();
        assert!(!q.reorder(Some(1), Some(1)).unwrap());
        assert!(!q.reorder(None, Some(1)).unwrap());
        assert!(!q.reorder(Some(1), None).unwrap());
        assert_eq!(names(&q), ["A", "B", "C"]);
    }

    #[test]
    fn reorder_out_of_bounds_leaves_queue() {
        let mut q = abc();
        assert!(q.reorder(Some(0), Some(5)).is_err());
        assert_eq!(names(&q), ["A", "B", "C"]);
    }

    #[test]
    fn remove_step_checks_bounds() {
        let mut q = abc();
        let removed = q.remove_step(1).unwrap();
        assert_eq!(removed.english_name(), "B");
        assert_eq!(names(&q), ["A", "C"]);
        assert!(q.remove_step(2).is_err());
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn load_from_external_keeps_sides() {
        let mut q = abc();
        q.load_from_external(vec![
            PoseStep::new(9, "Pigeon", Side::Left, HoldSeconds::clamped(60)),
            PoseStep::new(9, "Pigeon", Side::Right, HoldSeconds::clamped(60)),
        ]);
        assert_eq!(q.len(), 2);
        assert_eq!(q.get(1).unwrap().side(), Side::Right);
        assert_eq!(q.total_duration_seconds(), 120);
    }

    #[test]
    fn practice_draft_uses_one_based_positions() {
        let draft = abc().practice_draft("Morning");
        assert_eq!(draft.name, "Morning");
        let positions: Vec<usize> = draft.poses.iter().map(|p| p.position).collect();
        assert_eq!(positions, [1, 2, 3]);
    }

    #[test]
    fn export_text_lists_steps() {
        let mut q = Queue::new();
        q.add_pose(&pose(1, "Tree Pose", true, Some(30)));
        let text = q.export_text("Balance");
        assert!(text.starts_with("# Balance"));
        assert!(text.contains("1. Tree Pose (left) — 30s"));
        assert!(text.contains("2. Tree Pose (right) — 30s"));
    }

    #[test]
    fn move_item_is_pure_permutation() {
        let mut v = vec![1, 2, 3, 4];
        move_item(&mut v, 3, 1);
        assert_eq!(v, [1, 4, 2, 3]);
    }
}
