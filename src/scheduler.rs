//! Per-refresh callback scheduling.
//!
//! [`FrameQueue`] plays the role of a browser's animation-frame queue: work
//! is requested for the next display refresh, can be cancelled through the
//! returned handle, and everything requested while a refresh is being
//! serviced waits for the following one. The host calls
//! [`take_due`](FrameQueue::take_due) once per refresh.

/// Work that can be scheduled for the next refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCallback {
    /// Advance and draw the particle field.
    Tick,
    /// Apply the latest observed scroll offset to the overlay.
    CommitScroll,
}

/// Cancellation token for a requested callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Vec<(FrameHandle, FrameCallback)>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `callback` for the next refresh.
    pub fn request(&mut self, callback: FrameCallback) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push((handle, callback));
        handle
    }

    /// Cancel a requested callback. Returns `false` if it already ran or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(h, _)| *h != handle);
        self.pending.len() != before
    }

    /// Remove and return the callbacks due on this refresh, in request order.
    pub fn take_due(&mut self) -> Vec<FrameCallback> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(_, callback)| callback)
            .collect()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.iter().any(|(h, _)| *h == handle)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
