use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::section::ThematicAxis;

/// Interest tags offered by the preferences survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestTag {
    Architecture,
    History,
    Curiosities,
    Legends,
    Art,
    Culture,
    Defense,
    DailyLife,
    Conflicts,
}

impl InterestTag {
    pub const ALL: [InterestTag; 9] = [
        Self::Architecture,
        Self::History,
        Self::Curiosities,
        Self::Legends,
        Self::Art,
        Self::Culture,
        Self::Defense,
        Self::DailyLife,
        Self::Conflicts,
    ];

    /// The thematic axis this interest contributes to.
    ///
    /// Many-to-one: several tags share an axis. `None` for tags with no axis.
    pub fn axis(&self) -> Option<ThematicAxis> {
        match self {
            Self::Architecture => Some(ThematicAxis::Architecture),
            Self::History => Some(ThematicAxis::History),
            Self::Curiosities => Some(ThematicAxis::Curiosity),
            Self::Legends | Self::Art | Self::Culture | Self::DailyLife => {
                Some(ThematicAxis::Culture)
            }
            Self::Defense | Self::Conflicts => Some(ThematicAxis::Military),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::History => "history",
            Self::Curiosities => "curiosities",
            Self::Legends => "legends",
            Self::Art => "art",
            Self::Culture => "culture",
            Self::Defense => "defense",
            Self::DailyLife => "daily_life",
            Self::Conflicts => "conflicts",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|tag| tag.name() == s)
    }
}

/// How much the user wants to read before the rest is tucked away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPreference {
    Short,
    #[default]
    Normal,
    Deep,
}

impl DepthPreference {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Normal => "normal",
            Self::Deep => "deep",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "short" => Some(Self::Short),
            "normal" => Some(Self::Normal),
            "deep" => Some(Self::Deep),
            _ => None,
        }
    }
}

/// A named presentation style, e.g. `default`, `children`, `casual`.
///
/// Styles are data: a new style only needs variants keyed by its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresentationStyle(pub String);

impl PresentationStyle {
    pub const DEFAULT: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for PresentationStyle {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for PresentationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's reading preferences.
///
/// The survey enforces 2–4 interests; the engine accepts any number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferenceProfile {
    pub interests: FxHashSet<InterestTag>,
    pub depth: DepthPreference,
    pub presentation_style: PresentationStyle,
}

impl UserPreferenceProfile {
    pub fn new(interests: &[InterestTag], depth: DepthPreference, style: &str) -> Self {
        Self {
            interests: interests.iter().copied().collect(),
            depth,
            presentation_style: PresentationStyle::new(style),
        }
    }
}
