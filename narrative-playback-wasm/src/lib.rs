//! WASM bindings for narrative-playback: drives the reader view in the browser.
//!
//! The page hands over a JSON section list and an object with
//! `speak(id, text)` / `cancelAll()` methods. The page calls
//! `onNarrationComplete(id)` when the speech engine finishes an utterance.

use wasm_bindgen::prelude::*;

use narrative_playback::core::playback::{Narrator, UtteranceId};
use narrative_playback::core::session::NarrativeSession;
use narrative_playback::schema::profile::{
    DepthPreference, InterestTag, PresentationStyle, UserPreferenceProfile,
};
use narrative_playback::schema::section::{Section, SectionId};

// ---------------------------------------------------------------------------
// Speech engine supplied by the page
// ---------------------------------------------------------------------------
#[wasm_bindgen]
extern "C" {
    pub type JsNarrator;

    #[wasm_bindgen(method, js_name = speak)]
    fn js_speak(this: &JsNarrator, id: f64, text: &str);

    #[wasm_bindgen(method, js_name = cancelAll)]
    fn js_cancel_all(this: &JsNarrator);
}

struct BrowserNarrator(JsNarrator);

impl Narrator for BrowserNarrator {
    fn speak(&mut self, utterance: UtteranceId, text: &str) {
        self.0.js_speak(utterance.0 as f64, text);
    }

    fn cancel_all(&mut self) {
        self.0.js_cancel_all();
    }
}

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct SectionView<'a> {
    id: &'a str,
    title: &'a str,
    content: &'a str,
    start_sentence_index: Option<usize>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PlaybackView {
    playing: bool,
    current_index: usize,
    sentence_count: usize,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&format!("Serialization error: {e}")))
}

// ---------------------------------------------------------------------------
// Exported session
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct PlaybackSession {
    session: NarrativeSession<BrowserNarrator>,
}

#[wasm_bindgen]
impl PlaybackSession {
    /// `sections_json` is an array of sections. `profile_json` may be empty,
    /// in which case the default profile is used.
    #[wasm_bindgen(constructor)]
    pub fn new(
        sections_json: &str,
        profile_json: &str,
        narrator: JsNarrator,
    ) -> Result<PlaybackSession, JsError> {
        let sections: Vec<Section> = serde_json::from_str(sections_json)
            .map_err(|e| JsError::new(&format!("Invalid sections JSON: {e}")))?;

        let mut builder =
            NarrativeSession::builder(BrowserNarrator(narrator)).sections(sections);
        if !profile_json.trim().is_empty() {
            let profile: UserPreferenceProfile = serde_json::from_str(profile_json)
                .map_err(|e| JsError::new(&format!("Invalid profile JSON: {e}")))?;
            builder = builder.profile(profile);
        }

        let session = builder
            .build()
            .map_err(|e| JsError::new(&format!("Session error: {e}")))?;
        Ok(PlaybackSession { session })
    }

    /// Visible sections in reading order, with their first global sentence index.
    #[wasm_bindgen(js_name = visibleSections)]
    pub fn visible_sections(&self) -> Result<String, JsError> {
        let views: Vec<SectionView> = self
            .session
            .visible_sections()
            .into_iter()
            .map(|entry| SectionView {
                id: entry.id().as_str(),
                title: &entry.display_title,
                content: &entry.display_content,
                start_sentence_index: self
                    .session
                    .section_reader_data(entry.id())
                    .map(|d| d.start_sentence_index),
            })
            .collect();
        to_json(&views)
    }

    pub fn proposals(&self) -> Result<String, JsError> {
        to_json(&self.session.proposals())
    }

    pub fn reveal(&mut self, id: &str) -> bool {
        self.session.reveal(&SectionId::from(id))
    }

    #[wasm_bindgen(js_name = setStyle)]
    pub fn set_style(&mut self, style: &str) {
        self.session.set_style(PresentationStyle::new(style));
    }

    #[wasm_bindgen(js_name = setDepth)]
    pub fn set_depth(&mut self, depth: &str) -> Result<(), JsError> {
        let depth = DepthPreference::parse(depth)
            .ok_or_else(|| JsError::new(&format!("Unknown depth: {depth}")))?;
        self.session.set_depth(depth);
        Ok(())
    }

    /// Replace the interest set from a JSON array of tag names.
    /// Unknown tags are ignored.
    #[wasm_bindgen(js_name = setInterests)]
    pub fn set_interests(&mut self, interests_json: &str) -> Result<(), JsError> {
        let names: Vec<String> = serde_json::from_str(interests_json)
            .map_err(|e| JsError::new(&format!("Invalid interests JSON: {e}")))?;
        let interests: Vec<InterestTag> =
            names.iter().filter_map(|n| InterestTag::parse(n)).collect();
        let current = self.session.profile().clone();
        self.session.set_profile(UserPreferenceProfile::new(
            &interests,
            current.depth,
            current.presentation_style.name(),
        ));
        Ok(())
    }

    #[wasm_bindgen(js_name = estimatedMinutes)]
    pub fn estimated_minutes(&self) -> f64 {
        self.session.estimated_minutes()
    }

    pub fn start(&mut self) {
        self.session.start();
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn toggle(&mut self) {
        self.session.toggle();
    }

    #[wasm_bindgen(js_name = playFrom)]
    pub fn play_from(&mut self, index: usize) {
        self.session.play_from(index);
    }

    #[wasm_bindgen(js_name = onNarrationComplete)]
    pub fn on_narration_complete(&mut self, id: f64) {
        self.session.on_narration_complete(UtteranceId(id as u64));
    }

    #[wasm_bindgen(js_name = hasContent)]
    pub fn has_content(&self) -> bool {
        self.session.has_content()
    }

    #[wasm_bindgen(js_name = isCurrent)]
    pub fn is_current(&self, index: usize) -> bool {
        self.session.is_current(index)
    }

    /// JSON `{ playing, currentIndex, sentenceCount }`.
    pub fn state(&self) -> Result<String, JsError> {
        to_json(&PlaybackView {
            playing: self.session.is_playing(),
            current_index: self.session.current_index(),
            sentence_count: self.session.sentences().len(),
        })
    }

    /// JSON array of the narratable sentences, in reading order.
    pub fn sentences(&self) -> Result<String, JsError> {
        to_json(&self.session.sentences())
    }

    /// JSON reader data for one visible section, or `null`.
    #[wasm_bindgen(js_name = sectionReaderData)]
    pub fn section_reader_data(&self, id: &str) -> Result<String, JsError> {
        to_json(&self.session.section_reader_data(&SectionId::from(id)))
    }
}
