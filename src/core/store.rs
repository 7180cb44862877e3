/// Content store boundary: where sections and the preference profile come from.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::profile::UserPreferenceProfile;
use crate::schema::section::Section;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("subject not found: {0}")]
    SubjectNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Source of sections and the stored preference profile.
pub trait ContentStore {
    fn list_sections(&self, subject_id: &str) -> Result<Vec<Section>, StoreError>;

    /// The stored profile, or `None` if the user never filled the survey.
    fn profile(&self) -> Result<Option<UserPreferenceProfile>, StoreError>;
}

/// In-memory store keyed by subject id.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    sections: FxHashMap<String, Vec<Section>>,
    profile: Option<UserPreferenceProfile>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_section(&mut self, section: Section) {
        self.sections
            .entry(section.subject_id.clone())
            .or_default()
            .push(section);
    }

    pub fn set_profile(&mut self, profile: UserPreferenceProfile) {
        self.profile = Some(profile);
    }

    /// Load a RON bundle into a new store.
    pub fn from_bundle(bundle: SectionBundle) -> Self {
        let mut store = Self::new();
        for section in bundle.sections {
            store.insert_section(section);
        }
        store.profile = bundle.profile;
        store
    }
}

impl ContentStore for MemoryContentStore {
    fn list_sections(&self, subject_id: &str) -> Result<Vec<Section>, StoreError> {
        self.sections
            .get(subject_id)
            .cloned()
            .ok_or_else(|| StoreError::SubjectNotFound(subject_id.to_string()))
    }

    fn profile(&self) -> Result<Option<UserPreferenceProfile>, StoreError> {
        Ok(self.profile.clone())
    }
}

/// A fixture bundle: optional profile plus a flat section list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionBundle {
    pub profile: Option<UserPreferenceProfile>,
    pub sections: Vec<Section>,
}

impl SectionBundle {
    pub fn parse_ron(input: &str) -> Result<Self, StoreError> {
        Ok(ron::from_str(input)?)
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Distinct subject ids, in first-seen order.
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for section in &self.sections {
            if !subjects.contains(&section.subject_id.as_str()) {
                subjects.push(&section.subject_id);
            }
        }
        subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::profile::DepthPreference;

    #[test]
    fn memory_store_groups_by_subject() {
        let mut store = MemoryContentStore::new();
        store.insert_section(Section::new("a", "castle", "A", "A.", 10));
        store.insert_section(Section::new("b", "church", "B", "B.", 10));
        store.insert_section(Section::new("c", "castle", "C", "C.", 10));

        let castle = store.list_sections("castle").unwrap();
        assert_eq!(castle.len(), 2);
        assert!(matches!(
            store.list_sections("bridge"),
            Err(StoreError::SubjectNotFound(s)) if s == "bridge"
        ));
    }

    #[test]
    fn memory_store_profile_absent_by_default() {
        let store = MemoryContentStore::new();
        assert!(store.profile().unwrap().is_none());
    }

    #[test]
    fn bundle_from_ron() {
        let bundle = SectionBundle::parse_ron(
            r#"(
                profile: Some((interests: [history], depth: deep)),
                sections: [
                    (id: "a", subjectId: "castle", title: "A", content: "A.", importance: 10),
                ],
            )"#,
        )
        .unwrap();
        assert_eq!(bundle.subjects(), vec!["castle"]);
        let store = MemoryContentStore::from_bundle(bundle);
        assert_eq!(
            store.profile().unwrap().map(|p| p.depth),
            Some(DepthPreference::Deep)
        );
    }

    #[test]
    fn load_castle_fixture() {
        let bundle = SectionBundle::load_from_ron(Path::new("tests/fixtures/castle.ron")).unwrap();
        assert!(bundle.sections.len() >= 5);
        assert!(bundle.profile.is_some());
    }
}
