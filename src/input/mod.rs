//! Input processing module
//! Handles file detection, PDF text extraction, and batch input management

pub mod file_detector;
pub mod manager;
pub mod text_extractor;

pub use manager::{BatchExtraction, ExtractionFailure, InputManager, Upload, UploadBatch};
