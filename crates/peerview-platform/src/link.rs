use peerview_core::{
    AccessibilityEvent, CallbackCtx, CallbackScheduler, EventType, Host, PeerHandle,
    VirtualViewId, ViewPeer,
};

use crate::registry::with_peer;

/// Everything a single call into the peer needs, borrowed out of a view.
pub(crate) struct PeerLink<'v> {
    pub handle: PeerHandle,
    pub host: &'v mut dyn Host,
    pub scheduler: &'v mut CallbackScheduler,
}

impl PeerLink<'_> {
    /// Run `f` against the peer, then flush whatever host work it deferred.
    pub fn call<T>(&mut self, f: impl FnOnce(&mut dyn ViewPeer, &mut CallbackCtx<'_>) -> T) -> T {
        let mut ctx = CallbackCtx::new(&mut *self.host, &mut *self.scheduler);
        let out = with_peer(self.handle, |peer| f(peer, &mut ctx));
        ctx.finish();
        out
    }

    pub fn host(&mut self) -> &mut dyn Host {
        &mut *self.host
    }

    pub fn send(&mut self, event_type: EventType, source: VirtualViewId) {
        log::debug!("{}: a11y event {event_type:?} on {source}", self.handle);
        self.host
            .dispatch_accessibility_event(AccessibilityEvent::simple(event_type, source));
    }
}
