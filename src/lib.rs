//! Narrative Playback: personalized narrative assembly with synchronized narration.
//!
//! Orders a subject's sections by importance and the reader's interests,
//! trims them to a reading-time budget with on-demand disclosure of the
//! rest, resolves each to a presentation style, and drives a narrator
//! sentence by sentence over the growing visible text.

pub mod core;
pub mod schema;
