use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::practice::{HoldSeconds, Phase, PoseId, PoseStep, Side};

/// One already-expanded step of a generated or saved sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePose {
    pub pose_id: PoseId,
    #[serde(default)]
    pub position: Option<u32>,
    pub english_name: String,
    #[serde(default)]
    pub sanskrit_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub hold_seconds: Option<i64>,
    #[serde(default)]
    pub phase: Option<Phase>,
}

impl From<SequencePose> for PoseStep {
    fn from(pose: SequencePose) -> Self {
        let step = PoseStep::new(
            pose.pose_id,
            pose.english_name,
            pose.side,
            HoldSeconds::or_default(pose.hold_seconds),
        )
        .with_category(pose.category.unwrap_or_default());
        match pose.sanskrit_name {
            Some(name) => step.with_sanskrit_name(name),
            None => step,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSequence {
    pub poses: Vec<SequencePose>,
    pub style: String,
    pub style_name: String,
    pub difficulty: u8,
    pub total_poses: usize,
    pub duration_minutes: f64,
}

impl GeneratedSequence {
    pub fn into_steps(self) -> Vec<PoseStep> {
        self.poses.into_iter().map(PoseStep::from).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceStyle {
    pub id: String,
    pub name: String,
}

/// Payload for saving a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSequence {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub style: String,
    pub difficulty: u8,
    pub poses: Vec<super::PracticePoseEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSequenceSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub pose_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSequence {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub poses: Vec<SequencePose>,
}

impl SavedSequence {
    pub fn into_steps(self) -> Vec<PoseStep> {
        self.poses.into_iter().map(PoseStep::from).collect()
    }
}

/// Remote sequence generation and the saved-sequence library.
#[allow(async_fn_in_trait)]
pub trait SequenceGenerator {
    async fn styles(&self) -> Result<Vec<SequenceStyle>, ServiceError>;

    async fn generate(
        &self,
        style: &str,
        duration_minutes: u32,
        difficulty: u8,
    ) -> Result<GeneratedSequence, ServiceError>;

    /// Returns the id of the stored sequence.
    async fn save(&self, sequence: &NewSequence) -> Result<i64, ServiceError>;

    async fn list(&self) -> Result<Vec<SavedSequenceSummary>, ServiceError>;

    async fn get_by_id(&self, id: i64) -> Result<SavedSequence, ServiceError>;
}
