use std::time::Duration;

use crate::Host;

/// Tracks the two single-shot host callbacks a view can have outstanding.
///
/// Posting always removes first, so at most one frame and one delayed
/// notification are ever pending, whatever the host's queue does with
/// duplicates.
#[derive(Debug, Default)]
pub struct CallbackScheduler {
    frame_pending: bool,
    delayed_pending: bool,
}

impl CallbackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn delayed_pending(&self) -> bool {
        self.delayed_pending
    }

    pub fn post_frame(&mut self, host: &mut dyn Host) {
        host.remove_frame_callback();
        host.post_frame_callback();
        self.frame_pending = true;
    }

    pub fn remove_frame(&mut self, host: &mut dyn Host) {
        host.remove_frame_callback();
        self.frame_pending = false;
    }

    pub fn post_delayed(&mut self, host: &mut dyn Host, delay: Duration) -> bool {
        host.remove_delayed_callbacks();
        let posted = host.post_delayed(delay);
        self.delayed_pending = posted;
        posted
    }

    pub fn remove_delayed(&mut self, host: &mut dyn Host) -> bool {
        self.delayed_pending = false;
        host.remove_delayed_callbacks()
    }

    /// Consume the pending frame. `false` means the host fired a callback
    /// that was already removed or never posted.
    pub fn frame_fired(&mut self) -> bool {
        std::mem::take(&mut self.frame_pending)
    }

    pub fn delayed_fired(&mut self) -> bool {
        std::mem::take(&mut self.delayed_pending)
    }

    pub fn cancel_all(&mut self, host: &mut dyn Host) {
        self.remove_frame(host);
        self.remove_delayed(host);
    }
}
