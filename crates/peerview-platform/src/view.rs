use peerview_core::{
    Action, ActionArgs, CallbackCtx, CallbackScheduler, EditorInfo, FocusDirection, FocusKind,
    Host, IntRect, KeyEvent, MeasureSpec, MotionEvent, NodeInfo, PeerHandle, Result,
    SurfaceHolder, ViewPeer, VirtualViewId, Visibility,
};

use crate::accessibility::{AccessibilityState, AccessibilityStrategy, strategy_for};
use crate::link::PeerLink;
use crate::options::{AccessibilityMode, ViewOptions};
use crate::policy::{consumed_or_default, measured_or_default};
use crate::registry::{register_view_peer, release_view_peer};
use crate::text_session::TextSession;

/// The host view shell.
///
/// Owns the host, the peer's handle and the per-view bridge state. Every host
/// event goes through one method here, which calls the peer and applies the
/// host default where the event has one.
pub struct View<H: Host> {
    handle: PeerHandle,
    host: H,
    scheduler: CallbackScheduler,
    accessibility: Box<dyn AccessibilityStrategy>,
    options: ViewOptions,
    pub(crate) text_session_open: bool,
    released: bool,
}

impl<H: Host> View<H> {
    /// Build the peer (it may look at the host while doing so) and register it.
    pub fn new<P>(mut host: H, options: ViewOptions, make_peer: impl FnOnce(&mut H) -> P) -> Self
    where
        P: ViewPeer + 'static,
    {
        let handle = register_view_peer(make_peer(&mut host));
        log::info!(
            "created view for {handle} (accessibility: {:?})",
            options.accessibility
        );
        Self {
            handle,
            host,
            scheduler: CallbackScheduler::new(),
            accessibility: strategy_for(options.accessibility),
            options,
            text_session_open: false,
            released: false,
        }
    }

    pub fn handle(&self) -> PeerHandle {
        self.handle
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &CallbackScheduler {
        &self.scheduler
    }

    pub(crate) fn link(&mut self) -> PeerLink<'_> {
        PeerLink {
            handle: self.handle,
            host: &mut self.host,
            scheduler: &mut self.scheduler,
        }
    }

    pub(crate) fn call<T>(
        &mut self,
        f: impl FnOnce(&mut dyn ViewPeer, &mut CallbackCtx<'_>) -> T,
    ) -> T {
        self.link().call(f)
    }

    fn split(&mut self) -> (&mut dyn AccessibilityStrategy, PeerLink<'_>) {
        let link = PeerLink {
            handle: self.handle,
            host: &mut self.host,
            scheduler: &mut self.scheduler,
        };
        (self.accessibility.as_mut(), link)
    }

    // Layout.

    pub fn measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> (i32, i32) {
        let measured = self.call(|peer, ctx| peer.on_measure(ctx, width_spec, height_spec));
        measured_or_default(measured, || {
            self.host.default_measure(width_spec, height_spec)
        })
    }

    pub fn layout(&mut self, changed: bool, left: i32, top: i32, right: i32, bottom: i32) {
        self.call(|peer, ctx| peer.on_layout(ctx, changed, left, top, right, bottom));
        self.host.default_layout(changed, left, top, right, bottom);
    }

    pub fn size_changed(&mut self, w: i32, h: i32, old_w: i32, old_h: i32) {
        self.call(|peer, ctx| peer.on_size_changed(ctx, w, h, old_w, old_h));
        self.host.default_size_changed(w, h, old_w, old_h);
    }

    // Input.

    pub fn key_down(&mut self, key_code: i32, event: &KeyEvent) -> bool {
        let consumed = self.call(|peer, ctx| peer.on_key_down(ctx, key_code, event));
        consumed_or_default(consumed, || self.host.default_key_down(key_code, event))
    }

    pub fn key_up(&mut self, key_code: i32, event: &KeyEvent) -> bool {
        let consumed = self.call(|peer, ctx| peer.on_key_up(ctx, key_code, event));
        consumed_or_default(consumed, || self.host.default_key_up(key_code, event))
    }

    pub fn trackball_event(&mut self, event: &MotionEvent) -> bool {
        let consumed = self.call(|peer, ctx| peer.on_trackball_event(ctx, event));
        consumed_or_default(consumed, || self.host.default_trackball_event(event))
    }

    pub fn touch_event(&mut self, event: &MotionEvent) -> bool {
        let consumed = self.call(|peer, ctx| peer.on_touch_event(ctx, event));
        consumed_or_default(consumed, || self.host.default_touch_event(event))
    }

    pub fn generic_motion_event(&mut self, event: &MotionEvent) -> bool {
        let consumed = self.call(|peer, ctx| peer.on_generic_motion_event(ctx, event));
        consumed_or_default(consumed, || self.host.default_generic_motion_event(event))
    }

    /// Tracked views always consume hover; pass-through views ask the peer
    /// and fall back to the host.
    pub fn hover_event(&mut self, event: &MotionEvent) -> bool {
        let (accessibility, mut link) = self.split();
        accessibility.on_hover_event(&mut link, event)
    }

    // Focus and window lifecycle.

    pub fn focus_changed(
        &mut self,
        gain_focus: bool,
        direction: FocusDirection,
        previously_focused_rect: Option<IntRect>,
    ) {
        self.host
            .default_focus_changed(gain_focus, direction, previously_focused_rect);
        self.call(|peer, ctx| {
            peer.on_focus_changed(ctx, gain_focus, direction, previously_focused_rect)
        });
    }

    pub fn window_focus_changed(&mut self, has_window_focus: bool) {
        self.host.default_window_focus_changed(has_window_focus);
        self.call(|peer, ctx| peer.on_window_focus_changed(ctx, has_window_focus));
    }

    pub fn attached_to_window(&mut self) {
        log::info!("{} attached", self.handle);
        self.call(|peer, ctx| peer.on_attached_to_window(ctx));
        self.host.default_attached_to_window();
        if self.options.continuous_frames && !self.scheduler.frame_pending() {
            self.scheduler.post_frame(&mut self.host);
        }
    }

    pub fn detached_from_window(&mut self) {
        log::info!("{} detached", self.handle);
        self.call(|peer, ctx| peer.on_detached_from_window(ctx));
        if self.options.cancel_callbacks_on_detach {
            self.scheduler.cancel_all(&mut self.host);
        }
        self.host.default_detached_from_window();
    }

    pub fn window_visibility_changed(&mut self, visibility: Visibility) {
        self.call(|peer, ctx| peer.on_window_visibility_changed(ctx, visibility));
        self.host.default_window_visibility_changed(visibility);
    }

    // Surface. The host has no default handling for these.

    pub fn surface_created(&mut self, holder: SurfaceHolder) {
        self.call(|peer, ctx| peer.surface_created(ctx, holder));
    }

    pub fn surface_changed(&mut self, holder: SurfaceHolder, format: i32, width: i32, height: i32) {
        self.call(|peer, ctx| peer.surface_changed(ctx, holder, format, width, height));
    }

    pub fn surface_destroyed(&mut self, holder: SurfaceHolder) {
        self.call(|peer, ctx| peer.surface_destroyed(ctx, holder));
    }

    // Callbacks.

    /// Ask for a frame from outside a peer callback.
    pub fn post_frame_callback(&mut self) {
        self.scheduler.post_frame(&mut self.host);
    }

    /// The host's frame callback fired.
    pub fn do_frame(&mut self, frame_time_nanos: i64) {
        if !self.scheduler.frame_fired() {
            log::debug!("{}: dropping frame that is no longer pending", self.handle);
            return;
        }
        self.call(|peer, ctx| peer.do_frame(ctx, frame_time_nanos));
        if self.options.continuous_frames && !self.scheduler.frame_pending() {
            self.scheduler.post_frame(&mut self.host);
        }
    }

    /// The host's delayed callback fired.
    pub fn delayed_callback(&mut self) {
        if !self.scheduler.delayed_fired() {
            log::debug!("{}: dropping delayed callback that was removed", self.handle);
            return;
        }
        self.call(|peer, ctx| peer.delayed_callback(ctx));
    }

    // Accessibility.

    pub fn accessibility_mode(&self) -> AccessibilityMode {
        self.accessibility.mode()
    }

    /// Hover and focus as tracked by the view; `None` in pass-through mode.
    pub fn accessibility_state(&self) -> Option<AccessibilityState> {
        self.accessibility.state()
    }

    pub fn has_accessibility_node_provider(&mut self) -> bool {
        let (accessibility, mut link) = self.split();
        accessibility.has_node_provider(&mut link)
    }

    /// The node provider to hand the platform, or `None` to let the host's
    /// default accessibility handling answer.
    pub fn accessibility_node_provider(&mut self) -> Option<NodeProvider<'_, H>> {
        if self.has_accessibility_node_provider() {
            Some(NodeProvider { view: self })
        } else {
            None
        }
    }

    pub fn create_accessibility_node_info(&mut self, id: VirtualViewId) -> Option<NodeInfo> {
        let (accessibility, mut link) = self.split();
        accessibility.create_node(&mut link, id)
    }

    pub fn find_accessibility_focus(&mut self, kind: FocusKind) -> Option<NodeInfo> {
        let (accessibility, mut link) = self.split();
        accessibility.find_focus(&mut link, kind)
    }

    pub fn perform_accessibility_action(
        &mut self,
        id: VirtualViewId,
        action: Action,
        args: &ActionArgs,
    ) -> bool {
        log::debug!("{}: {action:?} on {id}", self.handle);
        let (accessibility, mut link) = self.split();
        accessibility.perform_action(&mut link, id, action, args)
    }

    // Text input.

    /// Let the peer fill `out_attrs`. Returns whether it accepts text input;
    /// only then does [`text_session`](Self::text_session) yield a session.
    pub fn create_input_connection(&mut self, out_attrs: &mut EditorInfo) -> bool {
        let (accepted, has_connection) = self.call(|peer, ctx| {
            let accepted = peer.on_create_input_connection(ctx, out_attrs);
            (accepted, peer.as_input_connection().is_some())
        });
        if accepted && !has_connection {
            log::warn!(
                "{} accepted text input but has no input connection",
                self.handle
            );
        }
        self.text_session_open = accepted && has_connection;
        log::debug!(
            "{}: input connection {}",
            self.handle,
            if self.text_session_open { "opened" } else { "refused" }
        );
        self.text_session_open
    }

    pub fn text_session(&mut self) -> Option<TextSession<'_, H>> {
        if self.text_session_open {
            Some(TextSession::new(self))
        } else {
            None
        }
    }

    /// Release the peer now. Dropping the view does the same.
    ///
    /// # Panics
    /// If the peer is no longer registered.
    pub fn release(mut self) {
        if let Err(e) = self.release_peer() {
            log::error!("releasing view: {e}");
            panic!("{e}");
        }
    }

    fn release_peer(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.text_session_open = false;

        let mut peer = release_view_peer(self.handle)?;
        let mut ctx = CallbackCtx::new(&mut self.host, &mut self.scheduler);
        peer.on_release(&mut ctx);
        ctx.finish();
        self.scheduler.cancel_all(&mut self.host);
        log::info!("{} released", self.handle);
        Ok(())
    }
}

impl<H: Host> Drop for View<H> {
    fn drop(&mut self) {
        if let Err(e) = self.release_peer() {
            log::error!("dropping view: {e}");
        }
    }
}

/// The view's node-provider surface, as handed to the platform.
pub struct NodeProvider<'v, H: Host> {
    view: &'v mut View<H>,
}

impl<H: Host> NodeProvider<'_, H> {
    pub fn create_accessibility_node_info(&mut self, id: VirtualViewId) -> Option<NodeInfo> {
        self.view.create_accessibility_node_info(id)
    }

    pub fn find_focus(&mut self, kind: FocusKind) -> Option<NodeInfo> {
        self.view.find_accessibility_focus(kind)
    }

    pub fn perform_action(&mut self, id: VirtualViewId, action: Action, args: &ActionArgs) -> bool {
        self.view.perform_accessibility_action(id, action, args)
    }
}
