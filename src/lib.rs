//! Subtrans - Batch Subtitle Translation
//!
//! Translates subtitle files through an external agent CLI while keeping
//! every index line, time line and block boundary byte-for-byte intact.

pub mod cli;
pub mod config;
pub mod error;
pub mod oracle;
pub mod report;
pub mod subtitle;
pub mod translate;
pub mod workflow;
