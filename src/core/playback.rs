/// Synchronized playback: drives a narrator sentence by sentence over the
/// visible text and tracks the cursor the UI highlights.
///
/// Once the reader has started or seeked, the cursor is anchored to
/// `(section, local sentence offset)` so that a stream rebuild (reveal,
/// style or profile change) keeps pointing at the same sentence even when
/// sections are inserted before it. Until then it stays at the head of
/// whatever stream is current.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::segment::{flatten, segment};
use crate::core::style::ResolvedSection;
use crate::schema::section::SectionId;

/// Identifies one `speak` request, so late completions can be told apart
/// from the one currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct UtteranceId(pub u64);

/// The external speech engine.
///
/// `speak` must eventually be answered with
/// [`PlaybackSynchronizer::on_narration_complete`] unless it is cancelled first.
pub trait Narrator {
    fn speak(&mut self, utterance: UtteranceId, text: &str);
    fn cancel_all(&mut self);
}

/// What the renderer needs to draw one section's sentence spans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionReaderData {
    pub paragraphs_sentences: Vec<Vec<String>>,
    pub start_sentence_index: usize,
}

impl SectionReaderData {
    pub fn sentence_count(&self) -> usize {
        self.paragraphs_sentences.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SectionSpan {
    id: SectionId,
    start: usize,
    len: usize,
}

/// Flat sentence list over the visible sections, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentenceStream {
    sentences: Vec<String>,
    spans: Vec<SectionSpan>,
    reader_data: FxHashMap<SectionId, SectionReaderData>,
}

impl SentenceStream {
    /// Full rebuild from the visible sections. A repeated id keeps only its
    /// first occurrence.
    pub fn build<'a, I>(visible: I) -> Self
    where
        I: IntoIterator<Item = &'a ResolvedSection>,
    {
        let mut stream = SentenceStream::default();
        for entry in visible {
            if stream.reader_data.contains_key(entry.id()) {
                continue;
            }
            let paragraphs_sentences = segment(&entry.display_content);
            let start = stream.sentences.len();
            stream.sentences.extend(flatten(&paragraphs_sentences));
            let len = stream.sentences.len() - start;
            stream.spans.push(SectionSpan {
                id: entry.id().clone(),
                start,
                len,
            });
            stream.reader_data.insert(
                entry.id().clone(),
                SectionReaderData {
                    paragraphs_sentences,
                    start_sentence_index: start,
                },
            );
        }
        stream
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn sentences(&self) -> &[String] {
        &self.sentences
    }

    pub fn sentence(&self, index: usize) -> Option<&str> {
        self.sentences.get(index).map(String::as_str)
    }

    pub fn reader_data(&self, id: &SectionId) -> Option<&SectionReaderData> {
        self.reader_data.get(id)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.spans.iter().map(|span| &span.id)
    }

    /// Anchor a global index. The end-of-stream position anchors to the end
    /// of the last section; positions past it stay unanchored.
    fn anchor(&self, index: usize) -> Cursor {
        if let Some(span) = self.spans.iter().find(|s| index < s.start + s.len) {
            return Cursor::Anchored {
                section: span.id.clone(),
                offset: index - span.start,
            };
        }
        match self.spans.last() {
            Some(last) if index == self.len() => Cursor::Anchored {
                section: last.id.clone(),
                offset: index - last.start,
            },
            _ => Cursor::Unanchored(index),
        }
    }

    fn resolve(&self, section: &SectionId, offset: usize) -> Option<usize> {
        self.spans
            .iter()
            .find(|span| &span.id == section)
            .map(|span| span.start + offset.min(span.len))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cursor {
    Anchored { section: SectionId, offset: usize },
    Unanchored(usize),
}

/// Observable playback state: `Idle(index)` or `Playing(index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    Idle(usize),
    Playing(usize),
}

/// The play/pause/seek state machine.
///
/// At most one utterance is in flight; every new one is preceded by a
/// cancel of the previous. Reaching the end of the stream returns to `Idle`.
#[derive(Debug, Clone)]
pub struct PlaybackSynchronizer {
    stream: SentenceStream,
    cursor: Cursor,
    index: usize,
    playing: bool,
    in_flight: Option<UtteranceId>,
    next_utterance: u64,
    /// Set by the first start, seek or completion.
    engaged: bool,
}

impl Default for PlaybackSynchronizer {
    fn default() -> Self {
        Self {
            stream: SentenceStream::default(),
            cursor: Cursor::Unanchored(0),
            index: 0,
            playing: false,
            in_flight: None,
            next_utterance: 0,
            engaged: false,
        }
    }
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stream(&self) -> &SentenceStream {
        &self.stream
    }

    pub fn sentences(&self) -> &[String] {
        self.stream.sentences()
    }

    pub fn has_content(&self) -> bool {
        !self.stream.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> PlaybackState {
        if self.playing {
            PlaybackState::Playing(self.index)
        } else {
            PlaybackState::Idle(self.index)
        }
    }

    /// The utterance the narrator is currently expected to complete.
    pub fn in_flight(&self) -> Option<UtteranceId> {
        self.in_flight
    }

    /// Whether the sentence at `global_index` should be highlighted.
    pub fn is_current(&self, global_index: usize) -> bool {
        self.playing && self.index == global_index
    }

    pub fn section_reader_data(&self, id: &SectionId) -> Option<&SectionReaderData> {
        self.stream.reader_data(id)
    }

    /// Replace the stream with one built from `visible`.
    ///
    /// The cursor keeps its sentence if that sentence's section is still
    /// visible; otherwise it keeps its old global index, clamped to the new
    /// length. While playing, the current sentence is re-issued.
    pub fn rebuild<'a, I, N>(&mut self, visible: I, narrator: &mut N)
    where
        I: IntoIterator<Item = &'a ResolvedSection>,
        N: Narrator + ?Sized,
    {
        let next = SentenceStream::build(visible);
        if next == self.stream {
            return;
        }

        info!(
            prev_count = self.stream.spans.len(),
            next_count = next.spans.len(),
            ids = ?next.section_ids().map(SectionId::as_str).collect::<Vec<_>>(),
            "sections_updated"
        );

        let remapped = match &self.cursor {
            Cursor::Anchored { section, offset } => next.resolve(section, *offset),
            Cursor::Unanchored(index) => Some(*index),
        }
        .unwrap_or_else(|| self.index.min(next.len()));

        self.stream = next;
        if self.engaged {
            self.seek(remapped);
        } else {
            self.index = remapped;
            self.cursor = Cursor::Unanchored(remapped);
        }

        if self.playing {
            self.cancel(narrator);
            self.narrate_current(narrator);
        }
    }

    /// Begin narrating at the cursor. No-op past the end or when already playing.
    pub fn start<N: Narrator + ?Sized>(&mut self, narrator: &mut N) {
        if self.index >= self.stream.len() {
            debug!(
                current_index = self.index,
                total_sentences = self.stream.len(),
                "start_skipped"
            );
            return;
        }
        if self.playing {
            return;
        }
        info!(
            current_index = self.index,
            total_sentences = self.stream.len(),
            "start"
        );
        self.playing = true;
        self.engaged = true;
        self.narrate_current(narrator);
    }

    /// Cancel narration and go idle; the cursor stays as the resume point.
    pub fn stop<N: Narrator + ?Sized>(&mut self, narrator: &mut N) {
        info!(current_index = self.index, "stop");
        self.cancel(narrator);
        self.playing = false;
    }

    /// Stop when playing, start otherwise.
    pub fn toggle<N: Narrator + ?Sized>(&mut self, narrator: &mut N) {
        if self.playing {
            self.stop(narrator);
        } else {
            self.start(narrator);
        }
    }

    /// Move the cursor to `index`.
    ///
    /// Idle: the index is only staged for the next `start`. Playing:
    /// narration continues from `index` right away.
    pub fn play_from<N: Narrator + ?Sized>(&mut self, index: usize, narrator: &mut N) {
        info!(index, total_sentences = self.stream.len(), "play_from");
        self.cancel(narrator);
        self.engaged = true;
        self.seek(index);
        if self.playing {
            self.narrate_current(narrator);
        }
    }

    /// Completion callback from the narrator. Completions of utterances that
    /// were cancelled or superseded are ignored.
    pub fn on_narration_complete<N: Narrator + ?Sized>(
        &mut self,
        utterance: UtteranceId,
        narrator: &mut N,
    ) {
        if self.in_flight != Some(utterance) {
            debug!(utterance = utterance.0, "stale_completion");
            return;
        }
        self.in_flight = None;
        debug!(
            index = self.index,
            next_index = self.index + 1,
            "sentence_end"
        );
        if !self.playing {
            return;
        }
        self.seek(self.index + 1);
        self.narrate_current(narrator);
    }

    fn seek(&mut self, index: usize) {
        self.index = index;
        self.cursor = self.stream.anchor(index);
    }

    fn cancel<N: Narrator + ?Sized>(&mut self, narrator: &mut N) {
        narrator.cancel_all();
        self.in_flight = None;
    }

    fn narrate_current<N: Narrator + ?Sized>(&mut self, narrator: &mut N) {
        let Some(text) = self.stream.sentence(self.index) else {
            info!(total_sentences = self.stream.len(), "playback_exhausted");
            self.playing = false;
            return;
        };
        if self.in_flight.is_some() {
            narrator.cancel_all();
        }
        let utterance = UtteranceId(self.next_utterance);
        self.next_utterance += 1;
        debug!(
            index = self.index,
            total = self.stream.len(),
            preview = %text.chars().take(50).collect::<String>(),
            "sentence_start"
        );
        self.in_flight = Some(utterance);
        narrator.speak(utterance, text);
    }
}
