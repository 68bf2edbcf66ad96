use std::time::Duration;

use smallvec::SmallVec;

use crate::{
    AccessibilityEvent, CallbackScheduler, EventType, Granularity, Host, VirtualViewId,
};

type DeferredFn = Box<dyn FnOnce(&mut dyn Host)>;

/// What a peer can reach while one of its callbacks runs.
///
/// Host calls that may re-enter the view (the soft keyboard, restarting
/// input) are queued and run by [`finish`](Self::finish) once the peer has
/// returned.
pub struct CallbackCtx<'a> {
    host: &'a mut dyn Host,
    scheduler: &'a mut CallbackScheduler,
    deferred: SmallVec<[DeferredFn; 2]>,
}

impl<'a> CallbackCtx<'a> {
    pub fn new(host: &'a mut dyn Host, scheduler: &'a mut CallbackScheduler) -> Self {
        Self {
            host,
            scheduler,
            deferred: SmallVec::new(),
        }
    }

    pub fn post_frame_callback(&mut self) {
        self.scheduler.post_frame(self.host);
    }

    pub fn remove_frame_callback(&mut self) {
        self.scheduler.remove_frame(self.host);
    }

    pub fn post_delayed(&mut self, delay: Duration) -> bool {
        self.scheduler.post_delayed(self.host, delay)
    }

    pub fn remove_delayed_callbacks(&mut self) -> bool {
        self.scheduler.remove_delayed(self.host)
    }

    pub fn request_invalidate(&mut self) {
        self.host.request_invalidate();
    }

    pub fn is_focused(&self) -> bool {
        self.host.is_focused()
    }

    pub fn location_on_screen(&self) -> (i32, i32) {
        self.host.location_on_screen()
    }

    pub fn send_event(&mut self, event: AccessibilityEvent) {
        log::debug!("a11y event {:?} on {}", event.event_type, event.source);
        self.host.dispatch_accessibility_event(event);
    }

    pub fn send_simple_event(&mut self, event_type: EventType, source: VirtualViewId) {
        self.send_event(AccessibilityEvent::simple(event_type, source));
    }

    /// Emits text-changed for `before` → `after`. Returns whether anything
    /// was sent; identical snapshots send nothing.
    pub fn send_text_changed(&mut self, source: VirtualViewId, before: &str, after: &str) -> bool {
        match AccessibilityEvent::text_changed(source, before, after) {
            Some(event) => {
                self.send_event(event);
                true
            }
            None => false,
        }
    }

    pub fn send_text_selection_changed(
        &mut self,
        source: VirtualViewId,
        text: &str,
        selection_start: i32,
        selection_end: i32,
    ) {
        self.send_event(AccessibilityEvent::text_selection_changed(
            source,
            text,
            selection_start,
            selection_end,
        ));
    }

    pub fn send_text_traversed(
        &mut self,
        source: VirtualViewId,
        text: &str,
        granularity: Granularity,
        forward: bool,
        segment_start: i32,
        segment_end: i32,
    ) {
        self.send_event(AccessibilityEvent::text_traversed(
            source,
            text,
            granularity,
            forward,
            segment_start,
            segment_end,
        ));
    }

    pub fn show_soft_input(&mut self) {
        self.defer(|host| host.show_soft_input());
    }

    pub fn hide_soft_input(&mut self) {
        self.defer(|host| host.hide_soft_input());
    }

    pub fn restart_input(&mut self) {
        self.defer(|host| host.restart_input());
    }

    /// Queue host work to run after the current peer callback returns.
    pub fn defer(&mut self, f: impl FnOnce(&mut dyn Host) + 'static) {
        self.deferred.push(Box::new(f));
    }

    /// Run deferred host work, in the order it was queued.
    pub fn finish(self) {
        let Self { host, deferred, .. } = self;
        for f in deferred {
            f(&mut *host);
        }
    }
}
