//! Slide-grounded transcript correction service
//!
//! Receives a presentation file and a raw transcript (both base64), extracts
//! the slide text as grounding context, and asks a hosted model to return a
//! polished version of the transcript wrapped in a fixed JSON envelope.

pub mod error;
pub mod handler;
pub mod inference;
pub mod models;
pub mod pptx;
pub mod prompts;

pub use error::{Error, Result};
