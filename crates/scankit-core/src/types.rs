//! Type aliases for commonly used complex types.

use std::sync::Arc;

/// Progress reporting callback: (current item, total items, message).
///
/// Used by the chapter pipeline to report "page i of N" style progress to
/// whichever host is driving it, without the pipeline knowing anything
/// about the host's UI.
pub type ProgressCallback = Arc<dyn Fn(usize, usize, &str) + Send + Sync>;
