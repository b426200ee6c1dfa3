//! career-compass library: PDF CV text extraction, normalization, similarity
//! scoring and ranking against job descriptions

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CareerCompassError, Result};
