pub mod export_service;
pub mod extraction_service;
pub mod matching_service;
pub mod tool;

pub use export_service::{ExportOutcome, ExportService};
pub use extraction_service::{ExtractionService, LoadedInput};
pub use matching_service::MatchingService;
pub use tool::{ExternalTool, SegmentationTool};
