use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Newtype wrapper for section IDs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The fixed set of topical dimensions a section can be scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThematicAxis {
    History,
    Culture,
    Curiosity,
    Architecture,
    Nature,
    Military,
}

impl ThematicAxis {
    pub const ALL: [ThematicAxis; 6] = [
        Self::History,
        Self::Culture,
        Self::Curiosity,
        Self::Architecture,
        Self::Nature,
        Self::Military,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::History => "history",
            Self::Culture => "culture",
            Self::Curiosity => "curiosity",
            Self::Architecture => "architecture",
            Self::Nature => "nature",
            Self::Military => "military",
        }
    }
}

/// Partial per-axis relevance scores, each 0–100.
///
/// An absent axis means "no metadata", which is not the same as a score of 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThematicScores {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culture: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curiosity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub military: Option<f64>,
}

impl ThematicScores {
    pub fn get(&self, axis: ThematicAxis) -> Option<f64> {
        match axis {
            ThematicAxis::History => self.history,
            ThematicAxis::Culture => self.culture,
            ThematicAxis::Curiosity => self.curiosity,
            ThematicAxis::Architecture => self.architecture,
            ThematicAxis::Nature => self.nature,
            ThematicAxis::Military => self.military,
        }
    }

    /// Builder-style setter, mostly for fixtures.
    pub fn with(mut self, axis: ThematicAxis, value: f64) -> Self {
        let slot = match axis {
            ThematicAxis::History => &mut self.history,
            ThematicAxis::Culture => &mut self.culture,
            ThematicAxis::Curiosity => &mut self.curiosity,
            ThematicAxis::Architecture => &mut self.architecture,
            ThematicAxis::Nature => &mut self.nature,
            ThematicAxis::Military => &mut self.military,
        };
        *slot = Some(value);
        self
    }
}

/// An alternate title/content for a section under a named presentation style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
}

/// A narrative atom about one subject.
///
/// `content` is plain text with paragraphs separated by a blank line.
/// `variants` is keyed by style name and never holds an entry for the
/// implicit `default` style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(alias = "subjectEntityId")]
    pub subject_id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaser: Option<String>,
    /// 0–100. Missing means 0; fractional values round to the nearest integer.
    #[serde(default, deserialize_with = "importance_from_number")]
    pub importance: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thematic_scores: Option<ThematicScores>,
    /// Authoritative reading-time override, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub variants: HashMap<String, Variant>,
}

impl Section {
    /// Minimal section with no optional metadata.
    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        importance: u8,
    ) -> Self {
        Self {
            id: SectionId(id.into()),
            subject_id: subject_id.into(),
            title: title.into(),
            content: content.into(),
            teaser: None,
            importance,
            thematic_scores: None,
            reading_time_sec: None,
            variants: HashMap::new(),
        }
    }

    pub fn variant(&self, style: &str) -> Option<&Variant> {
        self.variants.get(style)
    }
}

/// Accept any JSON/RON number for importance. Out-of-range values saturate
/// to `0..=255` so the linter can still report them.
fn importance_from_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thematic_scores_get_and_with() {
        let scores = ThematicScores::default()
            .with(ThematicAxis::History, 80.0)
            .with(ThematicAxis::Military, 15.0);
        assert_eq!(scores.get(ThematicAxis::History), Some(80.0));
        assert_eq!(scores.get(ThematicAxis::Military), Some(15.0));
        assert_eq!(scores.get(ThematicAxis::Nature), None);
    }

    #[test]
    fn section_ids_order_bytewise() {
        let mut ids = vec![SectionId::from("b"), SectionId::from("a2"), SectionId::from("a10")];
        ids.sort();
        assert_eq!(
            ids,
            vec![SectionId::from("a10"), SectionId::from("a2"), SectionId::from("b")]
        );
    }

    #[test]
    fn section_from_ron_with_defaults() {
        let src = r#"(
            id: "keep-origins",
            subjectId: "castle",
            title: "Origins",
            content: "Built in 1310.",
            importance: 90,
        )"#;
        let section: Section = ron::from_str(src).unwrap();
        assert_eq!(section.id, SectionId::from("keep-origins"));
        assert!(section.thematic_scores.is_none());
        assert!(section.variants.is_empty());
        assert!(section.teaser.is_none());
    }

    #[test]
    fn importance_accepts_fractional_and_missing() {
        let fractional: Section = ron::from_str(
            r#"(id: "a", subjectId: "castle", title: "A", content: "A.", importance: 72.5)"#,
        )
        .unwrap();
        assert_eq!(fractional.importance, 73);

        let missing: Section =
            ron::from_str(r#"(id: "b", subjectId: "castle", title: "B", content: "B.")"#).unwrap();
        assert_eq!(missing.importance, 0);

        let oversized: Section = ron::from_str(
            r#"(id: "c", subjectId: "castle", title: "C", content: "C.", importance: 400)"#,
        )
        .unwrap();
        assert_eq!(oversized.importance, 255);
    }

    #[test]
    fn section_ron_round_trip_keeps_variants() {
        let mut section = Section::new("s1", "castle", "Walls", "Thick walls.", 50);
        section.variants.insert(
            "children".to_string(),
            Variant {
                title: None,
                content: "Very thick walls!".to_string(),
            },
        );
        let serialized = ron::to_string(&section).unwrap();
        let back: Section = ron::from_str(&serialized).unwrap();
        assert_eq!(back, section);
    }
}
