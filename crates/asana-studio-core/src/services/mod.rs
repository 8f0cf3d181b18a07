//! Collaborator interfaces.
//!
//! The core talks to the pose catalog, the sequence generator, practice
//! storage and the pose renderer only through these traits. Implementations
//! live in the host application.

mod catalog;
mod practice;
mod render;
mod sequence;

pub use catalog::{
    CatalogPose, CategoryCount, PoseCatalog, PoseDetail, PoseRef, SearchFilters, SearchPage,
    TagCount,
};
pub use practice::{
    Practice, PracticeDraft, PracticePose, PracticePoseEntry, PracticeStorage, PracticeSummary,
};
pub use render::{PoseAttributes, PoseRenderer};
pub use sequence::{
    GeneratedSequence, NewSequence, SavedSequence, SavedSequenceSummary, SequenceGenerator,
    SequencePose, SequenceStyle,
};

use serde::{Deserialize, Deserializer};

/// Accept `true`/`false` as well as the `0`/`1` integers SQLite-backed
/// services emit for boolean columns.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

/// Accept tag lists either as an array or as the comma-joined string
/// produced by `GROUP_CONCAT`.
pub(crate) fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Joined(String),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::List(tags)) => tags,
        Some(Tags::Joined(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        None => Vec::new(),
    })
}
