pub mod profile;
pub mod section;
