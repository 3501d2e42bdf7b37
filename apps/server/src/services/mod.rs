//! Service layer
//!
//! Handlers stay thin; the pipeline and metadata live here.

pub mod metadata;
pub mod processing;

pub use metadata::MetadataService;
pub use processing::{DispatchMode, ProcessResult, ProcessingService, TransformResult};
