pub mod alignment;
pub mod job;
pub mod loaders;
pub mod registry;
pub mod result;
pub mod slot;

pub use alignment::{AlignedEntry, Alignment, AlignmentMode};
pub use job::CompareJob;
pub use loaders::load_job;
pub use registry::{StructureEntry, StructureRegistry};
pub use result::{CompareOutcome, ComparisonResult, ResultTable, TableRow, ERROR_MARKER};
pub use slot::SlotId;
