use serde::{Deserialize, Serialize};

use crate::practice::PoseStep;

/// The attributes a renderer may look at to pick a glyph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseAttributes {
    pub english_name: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl From<&PoseStep> for PoseAttributes {
    fn from(step: &PoseStep) -> Self {
        Self {
            english_name: step.english_name().to_string(),
            category: step.category().to_string(),
            tags: step.tags().iter().cloned().collect(),
        }
    }
}

/// Stateless pose illustration. `size` is the edge length in the
/// renderer's own unit (pixels, terminal rows).
pub trait PoseRenderer {
    fn render(&self, pose: &PoseAttributes, size: u16) -> String;
}
