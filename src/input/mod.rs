//! Input processing module
//! Handles file detection and resume discovery

pub mod file_detector;
pub mod manager;

pub use manager::{InputManager, ResumeDocument};
