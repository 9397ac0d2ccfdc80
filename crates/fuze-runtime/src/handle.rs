//! Handle over one launched trigger batch.

use tokio::task::JoinHandle;
use tracing::warn;

/// The tasks launched by one [`EventLoop::trigger`](crate::EventLoop::trigger)
/// call, in launch order (descending priority).
///
/// The handle is the seam result-streaming wrappers consume: await
/// [`join`](Self::join) to collect payload outputs, or
/// [`detach`](Self::detach) to let the batch finish on its own.
#[derive(Debug)]
pub struct TriggerHandle {
    handles: Vec<JoinHandle<String>>,
}

impl TriggerHandle {
    pub(crate) fn new(handles: Vec<JoinHandle<String>>) -> Self {
        Self { handles }
    }

    pub(crate) fn empty() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    /// Number of tasks launched by the trigger call.
    #[must_use]
    pub fn launched(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` when the trigger call launched nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Awaits the whole batch and returns payload outputs in launch
    /// order.
    ///
    /// A payload that panicked contributes no output; the panic is
    /// logged and the rest of the batch is still collected.
    pub async fn join(self) -> Vec<String> {
        let mut outputs = Vec::with_capacity(self.handles.len());
        for handle in self.handles {
            match handle.await {
                Ok(output) => outputs.push(output),
                Err(err) => warn!(error = %err, "launched event task failed"),
            }
        }
        outputs
    }

    /// Drops the handles; the launched tasks keep running to
    /// completion in the background.
    pub fn detach(self) {
        drop(self.handles);
    }
}
