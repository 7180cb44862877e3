/// The narrative session: sections + profile → ordered, budgeted, styled
/// sections, progressive disclosure, and synchronized playback.
///
/// Wires together ordering, budget allocation, style resolution,
/// disclosure, segmentation and the playback state machine. Disclosure and
/// playback state live only as long as the session.

use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::budget::{allocate, estimate_section_minutes};
use crate::core::config::{ConfigError, EngineConfig};
use crate::core::disclosure::{DisclosureController, Proposal};
use crate::core::ordering::order_sections;
use crate::core::playback::{
    Narrator, PlaybackState, PlaybackSynchronizer, SectionReaderData, UtteranceId,
};
use crate::core::store::{ContentStore, StoreError};
use crate::core::style::{self, ResolvedSection};
use crate::schema::profile::{DepthPreference, PresentationStyle, UserPreferenceProfile};
use crate::schema::section::{Section, SectionId};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("content store error: {0}")]
    Store(#[from] StoreError),
}

/// One reading session over one subject's sections. Built via
/// `NarrativeSession::builder(narrator)`.
pub struct NarrativeSession<N: Narrator> {
    config: EngineConfig,
    profile: UserPreferenceProfile,
    sections: Vec<Section>,
    resolved: Vec<ResolvedSection>,
    disclosure: DisclosureController,
    playback: PlaybackSynchronizer,
    narrator: N,
}

/// Builder for constructing a `NarrativeSession`.
pub struct NarrativeSessionBuilder<N: Narrator> {
    narrator: N,
    config: Option<EngineConfig>,
    config_path: Option<String>,
    profile: Option<UserPreferenceProfile>,
    sections: Vec<Section>,
}

impl<N: Narrator> NarrativeSession<N> {
    pub fn builder(narrator: N) -> NarrativeSessionBuilder<N> {
        NarrativeSessionBuilder {
            narrator,
            config: None,
            config_path: None,
            profile: None,
            sections: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &UserPreferenceProfile {
        &self.profile
    }

    pub fn narrator(&self) -> &N {
        &self.narrator
    }

    pub fn narrator_mut(&mut self) -> &mut N {
        &mut self.narrator
    }

    /// Every section in reading order, with the allocator's `hidden` flag.
    pub fn resolved_sections(&self) -> &[ResolvedSection] {
        &self.resolved
    }

    /// Sections to render: within budget or revealed, in reading order.
    pub fn visible_sections(&self) -> Vec<&ResolvedSection> {
        self.disclosure.visible_sections(&self.resolved)
    }

    /// "Continue reading" prompts for hidden sections.
    pub fn proposals(&self) -> Vec<Proposal> {
        self.disclosure.proposals(&self.resolved, self.config.max_proposals)
    }

    pub fn is_revealed(&self, id: &SectionId) -> bool {
        self.disclosure.is_expanded(id)
    }

    /// Reveal a hidden section. Returns true if the visible set grew.
    pub fn reveal(&mut self, id: &SectionId) -> bool {
        let was_hidden = self
            .resolved
            .iter()
            .any(|entry| entry.id() == id && !self.disclosure.is_visible(entry));
        if !self.disclosure.reveal(id) {
            return false;
        }
        info!(id = %id, was_hidden, "reveal");
        if was_hidden {
            self.refresh_stream();
        }
        was_hidden
    }

    /// Estimated reading minutes of the visible sections.
    pub fn estimated_minutes(&self) -> f64 {
        self.visible_sections()
            .iter()
            .map(|entry| {
                estimate_section_minutes(
                    &entry.section,
                    &entry.display_content,
                    self.config.words_per_minute,
                )
            })
            .sum()
    }

    pub fn set_profile(&mut self, profile: UserPreferenceProfile) {
        if profile == self.profile {
            return;
        }
        self.profile = profile;
        self.recompute();
    }

    pub fn set_style(&mut self, style: PresentationStyle) {
        if style == self.profile.presentation_style {
            return;
        }
        self.profile.presentation_style = style;
        self.recompute();
    }

    pub fn set_depth(&mut self, depth: DepthPreference) {
        if depth == self.profile.depth {
            return;
        }
        self.profile.depth = depth;
        self.recompute();
    }

    /// Replace the content set for the same subject. Revealed ids are kept.
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
        self.recompute();
    }

    pub fn start(&mut self) {
        self.playback.start(&mut self.narrator);
    }

    pub fn stop(&mut self) {
        self.playback.stop(&mut self.narrator);
    }

    pub fn toggle(&mut self) {
        self.playback.toggle(&mut self.narrator);
    }

    pub fn play_from(&mut self, index: usize) {
        self.playback.play_from(index, &mut self.narrator);
    }

    pub fn on_narration_complete(&mut self, utterance: UtteranceId) {
        self.playback.on_narration_complete(utterance, &mut self.narrator);
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn current_index(&self) -> usize {
        self.playback.current_index()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn in_flight(&self) -> Option<UtteranceId> {
        self.playback.in_flight()
    }

    pub fn has_content(&self) -> bool {
        self.playback.has_content()
    }

    pub fn sentences(&self) -> &[String] {
        self.playback.sentences()
    }

    pub fn is_current(&self, global_index: usize) -> bool {
        self.playback.is_current(global_index)
    }

    pub fn section_reader_data(&self, id: &SectionId) -> Option<&SectionReaderData> {
        self.playback.section_reader_data(id)
    }

    fn recompute(&mut self) {
        let presentation = &self.profile.presentation_style;
        let ordered = order_sections(&self.sections, &self.profile);
        let budget = self.config.budgets.minutes_for(self.profile.depth);
        let allocated = allocate(
            &ordered,
            budget,
            self.config.words_per_minute,
            |section| style::resolve(section, presentation).content,
        );
        self.resolved = style::resolve_all(&allocated, presentation);
        debug!(
            total = self.resolved.len(),
            hidden = self.resolved.iter().filter(|e| e.hidden).count(),
            depth = self.profile.depth.name(),
            style = %presentation,
            "recomputed sections"
        );
        self.refresh_stream();
    }

    fn refresh_stream(&mut self) {
        let visible = self.disclosure.visible_sections(&self.resolved);
        self.playback.rebuild(visible, &mut self.narrator);
    }
}

impl<N: Narrator> NarrativeSessionBuilder<N> {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the config from a RON file at build time.
    pub fn config_path(mut self, path: &str) -> Self {
        self.config_path = Some(path.to_string());
        self
    }

    pub fn profile(mut self, profile: UserPreferenceProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn sections(mut self, sections: Vec<Section>) -> Self {
        self.sections = sections;
        self
    }

    /// Pull a subject's sections from `store`, and its profile unless one
    /// was already given.
    pub fn from_store<S: ContentStore + ?Sized>(
        mut self,
        store: &S,
        subject_id: &str,
    ) -> Result<Self, SessionError> {
        self.sections = store.list_sections(subject_id)?;
        if self.profile.is_none() {
            self.profile = store.profile()?;
        }
        Ok(self)
    }

    pub fn build(self) -> Result<NarrativeSession<N>, SessionError> {
        let config = match (self.config, self.config_path) {
            (Some(config), _) => {
                config.validate()?;
                config
            }
            (None, Some(path)) => EngineConfig::load_from_ron(Path::new(&path))?,
            (None, None) => EngineConfig::default(),
        };

        let profile = self.profile.unwrap_or_else(|| {
            info!("no stored preference profile, using defaults");
            UserPreferenceProfile::default()
        });

        let mut session = NarrativeSession {
            config,
            profile,
            sections: self.sections,
            resolved: Vec::new(),
            disclosure: DisclosureController::new(),
            playback: PlaybackSynchronizer::new(),
            narrator: self.narrator,
        };
        session.recompute();
        Ok(session)
    }
}
