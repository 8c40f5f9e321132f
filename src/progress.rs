//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive
//! events as the batch processes each file. The callback approach keeps
//! the library ignorant of how the host application reports progress —
//! terminal bar, log line, or web socket, the caller decides.

use std::sync::Arc;

/// Shared handle to a progress callback.
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

/// Called by the batch driver as it processes each file.
///
/// All methods have default no-op implementations so callers only
/// override what they care about. Files are processed sequentially, so
/// unlike a concurrent pipeline these methods are never called from more
/// than one thread at a time.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after scanning, before any file is uploaded.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called just before a file is submitted to the parsing service.
    ///
    /// `index` is 0-based position in the batch.
    fn on_file_start(&self, stem: &str, index: usize, total_files: usize) {
        let _ = (stem, index, total_files);
    }

    /// Called when a file has been parsed (and, in the full pipeline,
    /// merged and written). `bytes` is the size of the merged Markdown.
    fn on_file_complete(&self, stem: &str, pages: usize, bytes: usize) {
        let _ = (stem, pages, bytes);
    }

    /// Called when a file fails; the batch continues with the next file.
    fn on_file_error(&self, stem: &str, error: &str) {
        let _ = (stem, error);
    }

    /// Called once after the last file.
    fn on_batch_complete(&self, total_files: usize, converted: usize) {
        let _ = (total_files, converted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        completed: AtomicUsize,
    }

    impl BatchProgressCallback for Counting {
        fn on_file_complete(&self, _stem: &str, _pages: usize, _bytes: usize) {
            self.completed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_methods_are_no_ops() {
        let cb = Counting {
            completed: AtomicUsize::new(0),
        };
        cb.on_batch_start(3);
        cb.on_file_start("a", 0, 3);
        cb.on_file_error("a", "boom");
        cb.on_batch_complete(3, 2);
        assert_eq!(cb.completed.load(Ordering::SeqCst), 0);

        cb.on_file_complete("a", 2, 100);
        assert_eq!(cb.completed.load(Ordering::SeqCst), 1);
    }
}
