//! Frame scheduling capability.
//!
//! The core never owns a display refresh loop. Components that need to run on
//! the next frame ask a [`FrameScheduler`] for a [`FrameHandle`], and the host
//! hands that handle back (via [`GameLoop::on_frame`](crate::GameLoop::on_frame))
//! when the frame fires. Cancelling a handle guarantees it is never delivered.

use arrayvec::ArrayVec;

/// Ticket for one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// "Run again next frame" / "cancel pending frame", provided by the host.
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Most callbacks that can be outstanding at once (game loop + rotation, with headroom).
pub const MAX_PENDING_FRAMES: usize = 8;

/// In-memory scheduler: requests queue up until the host drains them.
///
/// Used by the terminal host (drained once per refresh) and by tests (drained
/// by hand).
#[derive(Debug, Clone, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: ArrayVec<FrameHandle, MAX_PENDING_FRAMES>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every pending handle, oldest first.
    pub fn take_ready(&mut self) -> ArrayVec<FrameHandle, MAX_PENDING_FRAMES> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = FrameHandle(self.next_id);
        if self.pending.is_full() {
            // Oldest request is dropped; its owner re-requests on its next frame.
            self.pending.remove(0);
        }
        self.pending.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}
