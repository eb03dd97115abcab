//! Directory scanner: walks the evidence tree and rebuilds task state from
//! filesystem signals alone.

mod cancellation;
mod file_ref;
pub(crate) mod markers;
mod scanner;
pub(crate) mod window;

pub use cancellation::ScanCancellation;
pub use file_ref::build_file_ref;
pub use scanner::EvidenceScanner;

pub(crate) use scanner::find_task_dir_in;
