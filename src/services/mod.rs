//! Services used by the acquisition processor
//!
//! Each service owns one side effect: encoding images, persisting the
//! metadata index, or reporting progress.

pub mod io;
pub mod metadata;
pub mod progress;

pub use io::ImageWriter;
pub use metadata::{IncrementalMetadataWriter, MetadataTable};
#[cfg(feature = "cli")]
pub use progress::{create_cli_progress_reporter, SpinnerProgressReporter};
pub use progress::{LogProgressReporter, NoOpProgressReporter, ProgressReporter};
