//! The value type flowing through the practice queue.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Catalog identifier of a pose.
pub type PoseId = i64;

/// Which side of the body a step is performed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    #[default]
    Both,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Both => "both",
        }
    }

    pub fn is_unilateral(&self) -> bool {
        *self != Side::Both
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hold duration of one step, always within [`HoldSeconds::MIN`, `HoldSeconds::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct HoldSeconds(u32);

impl HoldSeconds {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 600;
    pub const DEFAULT: u32 = 30;

    /// Clamp any positive value into the hold domain.
    /// Non-positive values fall back to [`HoldSeconds::DEFAULT`].
    pub fn clamped(raw: i64) -> Self {
        if raw <= 0 {
            return Self(Self::DEFAULT);
        }
        let max = i64::from(Self::MAX);
        let min = i64::from(Self::MIN);
        Self(raw.clamp(min, max) as u32)
    }

    /// Resolve an optional catalog default, falling back to 30 seconds.
    pub fn or_default(raw: Option<i64>) -> Self {
        raw.map(Self::clamped).unwrap_or_default()
    }

    /// Parse a user edit from its leading integer, so `"12.5"` reads as 12
    /// and `"45s"` as 45. Returns `None` when there is no leading integer or
    /// it is not positive; the caller leaves the step unchanged in that case.
    pub fn parse_edit(raw: &str) -> Option<Self> {
        let text = raw.trim_start();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        if end == 0 || negative {
            return None;
        }
        let value = unsigned[..end].parse::<i64>().unwrap_or(i64::MAX);
        (value > 0).then(|| Self::clamped(value))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for HoldSeconds {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<i64> for HoldSeconds {
    fn from(raw: i64) -> Self {
        Self::clamped(raw)
    }
}

impl From<HoldSeconds> for u32 {
    fn from(hold: HoldSeconds) -> Self {
        hold.0
    }
}

impl fmt::Display for HoldSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// One entry of the practice queue: a pose, a side and a hold time.
///
/// Everything but the hold time is fixed once the step is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseStep {
    pose_id: PoseId,
    english_name: String,
    #[serde(default)]
    sanskrit_name: Option<String>,
    #[serde(default)]
    category: String,
    #[serde(default)]
    tags: BTreeSet<String>,
    #[serde(default)]
    side: Side,
    #[serde(default)]
    hold_seconds: HoldSeconds,
}

impl PoseStep {
    pub fn new(
        pose_id: PoseId,
        english_name: impl Into<String>,
        side: Side,
        hold_seconds: HoldSeconds,
    ) -> Self {
        Self {
            pose_id,
            english_name: english_name.into(),
            sanskrit_name: None,
            category: String::new(),
            tags: BTreeSet::new(),
            side,
            hold_seconds,
        }
    }

    pub fn with_sanskrit_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.sanskrit_name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn pose_id(&self) -> PoseId {
        self.pose_id
    }

    pub fn english_name(&self) -> &str {
        &self.english_name
    }

    pub fn sanskrit_name(&self) -> Option<&str> {
        self.sanskrit_name.as_deref()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn hold_seconds(&self) -> HoldSeconds {
        self.hold_seconds
    }

    pub fn set_hold_seconds(&mut self, hold: HoldSeconds) {
        self.hold_seconds = hold;
    }

    /// Name with the side appended for one-sided steps, e.g. `Tree Pose (left)`.
    pub fn display_name(&self) -> String {
        if self.side.is_unilateral() {
            format!("{} ({})", self.english_name, self.side)
        } else {
            self.english_name.clone()
        }
    }

    /// Upper-case side banner shown by the player, empty for `both`.
    pub fn side_label(&self) -> String {
        if self.side.is_unilateral() {
            format!("{} SIDE", self.side.as_str().to_uppercase())
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_keeps_values_in_domain() {
        assert_eq!(HoldSeconds::clamped(1).get(), 5);
        assert_eq!(HoldSeconds::clamped(45).get(), 45);
        assert_eq!(HoldSeconds::clamped(9_000).get(), 600);
        assert_eq!(HoldSeconds::clamped(0).get(), 30);
        assert_eq!(HoldSeconds::clamped(-3).get(), 30);
    }

    #[test]
    fn parse_edit_rejects_garbage_and_non_positive() {
        assert_eq!(HoldSeconds::parse_edit(" 45 ").map(|h| h.get()), Some(45));
        assert!(HoldSeconds::parse_edit("abc").is_none());
        assert!(HoldSeconds::parse_edit("").is_none());
        assert!(HoldSeconds::parse_edit("0").is_none());
        assert!(HoldSeconds::parse_edit("-10").is_none());
        assert!(HoldSeconds::parse_edit("- 10").is_none());
        assert!(HoldSeconds::parse_edit("s45").is_none());
    }

    #[test]
    fn parse_edit_reads_leading_integer() {
        assert_eq!(HoldSeconds::parse_edit("12.5").map(|h| h.get()), Some(12));
        assert_eq!(HoldSeconds::parse_edit("45s").map(|h| h.get()), Some(45));
        assert_eq!(HoldSeconds::parse_edit("+20").map(|h| h.get()), Some(20));
        assert_eq!(HoldSeconds::parse_edit("0.9").map(|h| h.get()), None);
        assert_eq!(
            HoldSeconds::parse_edit("99999999999999999999").map(|h| h.get()),
            Some(600)
        );
    }

    #[test]
    fn display_name_and_side_label() {
        let left = PoseStep::new(7, "Tree Pose", Side::Left, HoldSeconds::default());
        assert_eq!(left.display_name(), "Tree Pose (left)");
        assert_eq!(left.side_label(), "LEFT SIDE");

        let both = PoseStep::new(8, "Mountain Pose", Side::Both, HoldSeconds::default());
        assert_eq!(both.display_name(), "Mountain Pose");
        assert_eq!(both.side_label(), "");
    }

    #[test]
    fn deserialize_fills_missing_side_and_hold() {
        let step: PoseStep =
            serde_json::from_str(r#"{"pose_id": 3, "english_name": "Cobra"}"#).unwrap();
        assert_eq!(step.side(), Side::Both);
        assert_eq!(step.hold_seconds().get(), 30);
        assert!(step.sanskrit_name().is_none());
    }

    #[test]
    fn deserialize_clamps_hold() {
        let step: PoseStep = serde_json::from_str(
            r#"{"pose_id": 3, "english_name": "Corpse", "side": "both", "hold_seconds": 900}"#,
        )
        .unwrap();
        assert_eq!(step.hold_seconds().get(), 600);
    }
}
