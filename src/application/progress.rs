use futures::channel::mpsc::UnboundedSender;
use tracing::debug;

use crate::domain::ProgressUpdate;

/// Destination of the loading-screen status text. Writes are last-write-wins;
/// the loader never reads anything back.
pub trait ProgressSink: Send + Sync {
    fn show(&self, text: &str);

    fn progress(&self, update: &ProgressUpdate) {
        self.show(&update.message);
    }
}

/// Forwards every status line to a receiver, typically the UI event loop.
/// Closing the receiver silently discards further writes.
impl ProgressSink for UnboundedSender<String> {
    fn show(&self, text: &str) {
        if self.unbounded_send(text.to_string()).is_err() {
            debug!(text, "status receiver gone");
        }
    }
}
