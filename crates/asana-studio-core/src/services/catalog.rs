use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::practice::{HoldSeconds, PoseId, PoseStep, Side};

/// A pose as listed by the catalog; the input to `Queue::add_pose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPose {
    pub id: PoseId,
    pub english_name: String,
    #[serde(default)]
    pub sanskrit_name: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default, deserialize_with = "super::tag_list")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    #[serde(default, deserialize_with = "super::flag")]
    pub is_bilateral: bool,
    #[serde(default)]
    pub default_hold_seconds: Option<i64>,
}

impl CatalogPose {
    pub(crate) fn to_step(&self, side: Side, hold: HoldSeconds) -> PoseStep {
        let step = PoseStep::new(self.id, self.english_name.clone(), side, hold)
            .with_category(self.category.clone())
            .with_tags(self.tags.iter().cloned());
        match &self.sanskrit_name {
            Some(name) => step.with_sanskrit_name(name.clone()),
            None => step,
        }
    }
}

/// Short reference to a related pose (variation or parent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseRef {
    pub id: PoseId,
    pub english_name: String,
    #[serde(default)]
    pub sanskrit_name: Option<String>,
}

/// Full catalog record for a single pose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoseDetail {
    #[serde(flatten)]
    pub pose: CatalogPose,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variations: Vec<PoseRef>,
    #[serde(default)]
    pub parent: Option<PoseRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bilateral_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl SearchFilters {
    /// Non-empty filters as `(key, value)` query pairs.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category", category.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty", difficulty.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("tag", tag.to_string()));
        }
        if let Some(bilateral) = self.bilateral_only {
            pairs.push(("bilateral_only", bilateral.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(alias = "poses")]
    pub items: Vec<CatalogPose>,
    pub total: u32,
    pub page: u32,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u32,
}

/// Read-only pose catalog.
#[allow(async_fn_in_trait)]
pub trait PoseCatalog {
    async fn search(&self, filters: &SearchFilters) -> Result<SearchPage, ServiceError>;

    async fn get_by_id(&self, id: PoseId) -> Result<PoseDetail, ServiceError>;

    async fn list_categories(&self) -> Result<Vec<CategoryCount>, ServiceError>;

    async fn list_tags(&self) -> Result<Vec<TagCount>, ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_pose_accepts_sqlite_shapes() {
        let pose: CatalogPose = serde_json::from_str(
            r#"{"id": 4, "english_name": "Tree Pose", "sanskrit_name": "Vrksasana",
                "category": "Balance", "difficulty": 2, "is_bilateral": 1,
                "default_hold_seconds": 30, "tags": "balancing,standing"}"#,
        )
        .unwrap();
        assert!(pose.is_bilateral);
        assert_eq!(pose.tags, ["balancing", "standing"]);
    }

    #[test]
    fn search_page_reads_poses_key() {
        let page: SearchPage = serde_json::from_str(
            r#"{"total": 1, "page": 1, "per_page": 50, "pages": 1,
                "poses": [{"id": 1, "english_name": "Mountain", "is_bilateral": false,
                           "tags": []}]}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(!page.items[0].is_bilateral);
    }

    #[test]
    fn pose_detail_flattens_catalog_fields() {
        let detail: PoseDetail = serde_json::from_str(
            r#"{"id": 9, "english_name": "Pigeon", "category": "Seated", "is_bilateral": 1,
                "slug": "pigeon", "description": "Hip opener",
                "tags": ["hip-opener"],
                "variations": [{"id": 10, "english_name": "Sleeping Pigeon"}]}"#,
        )
        .unwrap();
        assert_eq!(detail.pose.id, 9);
        assert_eq!(detail.variations[0].english_name, "Sleeping Pigeon");
        assert!(detail.parent.is_none());
    }

    #[test]
    fn query_pairs_skip_empty_filters() {
        let filters = SearchFilters {
            q: Some("tree".into()),
            category: Some(String::new()),
            per_page: Some(20),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            [("q", "tree".to_string()), ("per_page", "20".to_string())]
        );
    }
}
