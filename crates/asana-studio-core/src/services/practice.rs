use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::practice::{HoldSeconds, PoseId, PoseStep, Side};

/// One row of a practice or sequence save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticePoseEntry {
    pub pose_id: PoseId,
    pub position: usize,
    pub side: Side,
    pub hold_seconds: u32,
}

/// A named practice about to be created or updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeDraft {
    pub name: String,
    pub poses: Vec<PracticePoseEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub pose_count: u32,
    #[serde(default)]
    pub total_seconds: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A stored practice step joined with its catalog names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticePose {
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
}

impl From<PracticePose> for PoseStep {
    fn from(pose: PracticePose) -> Self {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Practice {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub poses: Vec<PracticePose>,
}

impl Practice {
    pub fn into_steps(self) -> Vec<PoseStep> {
        self.poses.into_iter().map(PoseStep::from).collect()
    }
}

/// CRUD store for user-built practices.
#[allow(async_fn_in_trait)]
pub trait PracticeStorage {
    /// Returns the id of the new practice.
    async fn create(&self, practice: &PracticeDraft) -> Result<i64, ServiceError>;

    async fn list(&self) -> Result<Vec<PracticeSummary>, ServiceError>;

    async fn get_by_id(&self, id: i64) -> Result<Practice, ServiceError>;

    async fn update(&self, id: i64, practice: &PracticeDraft) -> Result<(), ServiceError>;

    async fn delete(&self, id: i64) -> Result<(), ServiceError>;
}
