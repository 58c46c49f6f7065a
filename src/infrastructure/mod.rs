pub mod command;
pub mod dialog;
pub mod process;
pub mod workdir;

pub use command::{normalize_path, ToolCommand};
pub use dialog::{FileDialog, JobDialog};
pub use process::{run_streaming, ProcessOutput};
pub use workdir::WorkingDirectory;
