//! Domain Concerns

pub mod jobs;
