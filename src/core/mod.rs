pub mod budget;
pub mod config;
pub mod disclosure;
pub mod ordering;
pub mod playback;
pub mod scoring;
pub mod segment;
pub mod session;
pub mod store;
pub mod style;
