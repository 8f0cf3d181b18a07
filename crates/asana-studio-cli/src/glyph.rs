//! ASCII pose glyphs.
//!
//! The glyph is chosen from the pose name first, then its tags, then its
//! category; anything unrecognised is drawn standing.

use asana_studio_core::{PoseAttributes, PoseRenderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Standing,
    Lunge,
    Tree,
    DownDog,
    Plank,
    ForwardFold,
    Backbend,
    Inversion,
    ArmBalance,
    Twist,
    Balance,
    Seated,
    Supine,
    Kneeling,
    Pigeon,
    Rest,
}

const NAME_RULES: &[(&[&str], Shape)] = &[
    (&["corpse", "savasana", "child"], Shape::Rest),
    (&["pigeon", "mermaid"], Shape::Pigeon),
    (&["warrior", "lunge", "crescent"], Shape::Lunge),
    (&["tree"], Shape::Tree),
    (&["downward", "dolphin"], Shape::DownDog),
    (&["plank", "chaturanga"], Shape::Plank),
    (&["forward", "fold", "uttanasana"], Shape::ForwardFold),
    (&["wheel", "bow", "cobra", "camel", "backbend"], Shape::Backbend),
    (
        &["headstand", "shoulderstand", "handstand", "scorpion"],
        Shape::Inversion,
    ),
    (
        &["crow", "crane", "firefly", "flying", "peacock", "eight-angle"],
        Shape::ArmBalance,
    ),
];

const CATEGORY_RULES: &[(&str, Shape)] = &[
    ("seated", Shape::Seated),
    ("supine", Shape::Supine),
    ("prone", Shape::Backbend),
    ("kneeling", Shape::Kneeling),
    ("restorative", Shape::Rest),
    ("core", Shape::Plank),
    ("arm balance", Shape::ArmBalance),
    ("inversion", Shape::Inversion),
];

impl Shape {
    pub fn classify(pose: &PoseAttributes) -> Self {
        let name = pose.english_name.to_lowercase();
        if let Some((_, shape)) = NAME_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| name.contains(n)))
        {
            return *shape;
        }

        let has_tag = |wanted: &str| pose.tags.iter().any(|t| t.eq_ignore_ascii_case(wanted));
        let category = pose.category.to_lowercase();
        if has_tag("twist") {
            return Self::Twist;
        }
        if has_tag("balancing") || category == "balance" {
            return Self::Balance;
        }

        CATEGORY_RULES
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, shape)| *shape)
            .unwrap_or(Self::Standing)
    }

    fn art(self) -> &'static [&'static str] {
        match self {
            Self::Standing => &["  o  ", " /|\\ ", "  |  ", " / \\ "],
            Self::Lunge => &["   o   ", "  /|\\  ", "   |\\  ", "  /  \\_"],
            Self::Tree => &[" \\o/ ", "  |  ", "  |> ", "  |  "],
            Self::DownDog => &["   /\\   ", "  /  \\  ", " o    \\ ", "/      \\"],
            Self::Plank => &["", "o______ ", "|      \\"],
            Self::ForwardFold => &["  __  ", " |  | ", " o  | ", "    | "],
            Self::Backbend => &["", "  ___  ", " /   \\ ", "o     \\"],
            Self::Inversion => &[" \\ / ", "  |  ", "  |  ", " /o\\ "],
            Self::ArmBalance => &["", "  __o ", " /  \\\\", "    //"],
            Self::Twist => &["  o  ", " -|\\ ", "  /  ", " / \\ "],
            Self::Balance => &["  o  ", "--|--", "  |\\_", "  |  "],
            Self::Seated => &["", "  o  ", " /|\\ ", " _|__"],
            Self::Supine => &["", "", "o_____", "      "],
            Self::Kneeling => &["  o  ", " /|\\ ", "  |  ", " _|  "],
            Self::Pigeon => &["", "  o  ", "  |\\ ", " _|_\\_"],
            Self::Rest => &["", "", "  ___ ", " o___\\"],
        }
    }
}

/// Draws a small stick figure centred in `size` columns; `size` 0 draws
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlyphRenderer;

impl PoseRenderer for GlyphRenderer {
    fn render(&self, pose: &PoseAttributes, size: u16) -> String {
        if size == 0 {
            return String::new();
        }
        let art = Shape::classify(pose).art();
        let width = art
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0)
            .max(usize::from(size));

        art.iter()
            .map(|line| format!("{line:^width$}").trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
