use std::time::Duration;

use web_time::Instant;

use peerview_core::{
    AccessibilityEvent, EventType, FocusDirection, Host, IntRect, KeyEvent, MeasureSpec,
    MotionEvent, VirtualViewId, Visibility,
};

/// One outward call a [`RecordingHost`] received.
#[derive(Clone, Debug, PartialEq)]
pub enum HostCall {
    DefaultMeasure(MeasureSpec, MeasureSpec),
    DefaultLayout(bool),
    DefaultSizeChanged(i32, i32),
    DefaultKeyDown(i32),
    DefaultKeyUp(i32),
    DefaultTrackball,
    DefaultTouch,
    DefaultGenericMotion,
    DefaultHover,
    DefaultFocusChanged(bool),
    DefaultWindowFocusChanged(bool),
    DefaultAttached,
    DefaultDetached,
    DefaultVisibilityChanged(Visibility),
    AccessibilityEvent(EventType, VirtualViewId),
    Invalidate,
    PostFrame,
    RemoveFrame,
    PostDelayed(Duration),
    RemoveDelayed,
    ShowSoftInput,
    HideSoftInput,
    RestartInput,
}

/// Smoothed frame rate over fired frames.
#[derive(Clone, Debug, Default)]
pub struct FrameStats {
    frame_count: u64,
    last_frame: Option<Instant>,
    fps_smooth: f32,
}

impl FrameStats {
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fps(&self) -> f32 {
        self.fps_smooth
    }

    fn record(&mut self, now: Instant) {
        self.frame_count += 1;
        if let Some(prev) = self.last_frame.replace(now) {
            let dt = (now - prev).as_secs_f32();
            if dt > 0.0 {
                let fps = 1.0 / dt;
                // simple EMA
                let a = 0.2;
                self.fps_smooth = if self.fps_smooth == 0.0 {
                    fps
                } else {
                    (1.0 - a) * self.fps_smooth + a * fps
                };
            }
        }
    }
}

/// A [`Host`] that records everything and stands in for the platform's
/// frame and message queues.
///
/// Default handlers consume according to `consume_by_default`, so tests can
/// observe the consumed-or-default policy from both sides.
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
    pub events: Vec<AccessibilityEvent>,
    pub invalidations: usize,
    pub screen_location: (i32, i32),
    pub focused: bool,
    pub consume_by_default: bool,
    pub refuse_delayed: bool,
    pub soft_input_visible: bool,
    pending_frames: u32,
    pending_delayed: Option<Duration>,
    started: Instant,
    stats: FrameStats,
}

impl Default for RecordingHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            events: Vec::new(),
            invalidations: 0,
            screen_location: (0, 0),
            focused: false,
            consume_by_default: false,
            refuse_delayed: false,
            soft_input_visible: false,
            pending_frames: 0,
            pending_delayed: None,
            started: Instant::now(),
            stats: FrameStats::default(),
        }
    }

    pub fn with_screen_location(mut self, x: i32, y: i32) -> Self {
        self.screen_location = (x, y);
        self
    }

    pub fn with_default_consume(mut self, consume: bool) -> Self {
        self.consume_by_default = consume;
        self
    }

    /// Frame callbacks currently queued. Posting without removing first would
    /// push this above one.
    pub fn pending_frames(&self) -> u32 {
        self.pending_frames
    }

    pub fn pending_delayed(&self) -> Option<Duration> {
        self.pending_delayed
    }

    /// Fire the queued frame callback, if any, returning its frame time.
    /// The caller hands the time to the view's frame entry point.
    pub fn fire_frame(&mut self) -> Option<i64> {
        if self.pending_frames == 0 {
            return None;
        }
        self.pending_frames = 0;
        let now = Instant::now();
        self.stats.record(now);
        Some((now - self.started).as_nanos() as i64)
    }

    /// Fire the queued delayed callback, if any.
    pub fn fire_delayed(&mut self) -> bool {
        self.pending_delayed.take().is_some()
    }

    pub fn frame_stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn take_events(&mut self) -> Vec<AccessibilityEvent> {
        std::mem::take(&mut self.events)
    }

    /// `(type, source)` of every accessibility event, in order.
    pub fn event_log(&self) -> Vec<(EventType, VirtualViewId)> {
        self.events.iter().map(|e| (e.event_type, e.source)).collect()
    }

    pub fn count(&self, call: &HostCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.events.clear();
        self.invalidations = 0;
    }

    pub fn summary(&self) -> String {
        let lines = [
            format!("frames: {}", self.stats.frame_count()),
            format!("fps: {:.1}", self.stats.fps()),
            format!("a11y events: {}", self.events.len()),
            format!("invalidations: {}", self.invalidations),
            format!("host calls: {}", self.calls.len()),
        ];
        lines.join("  |  ")
    }

    fn default_consume(&mut self, call: HostCall) -> bool {
        self.calls.push(call);
        self.consume_by_default
    }
}

impl Host for RecordingHost {
    fn default_measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> (i32, i32) {
        self.calls.push(HostCall::DefaultMeasure(width_spec, height_spec));
        (width_spec.default_size(0), height_spec.default_size(0))
    }

    fn default_layout(&mut self, changed: bool, _left: i32, _top: i32, _right: i32, _bottom: i32) {
        self.calls.push(HostCall::DefaultLayout(changed));
    }

    fn default_size_changed(&mut self, w: i32, h: i32, _old_w: i32, _old_h: i32) {
        self.calls.push(HostCall::DefaultSizeChanged(w, h));
    }

    fn default_key_down(&mut self, key_code: i32, _event: &KeyEvent) -> bool {
        self.default_consume(HostCall::DefaultKeyDown(key_code))
    }

    fn default_key_up(&mut self, key_code: i32, _event: &KeyEvent) -> bool {
        self.default_consume(HostCall::DefaultKeyUp(key_code))
    }

    fn default_trackball_event(&mut self, _event: &MotionEvent) -> bool {
        self.default_consume(HostCall::DefaultTrackball)
    }

    fn default_touch_event(&mut self, _event: &MotionEvent) -> bool {
        self.default_consume(HostCall::DefaultTouch)
    }

    fn default_generic_motion_event(&mut self, _event: &MotionEvent) -> bool {
        self.default_consume(HostCall::DefaultGenericMotion)
    }

    fn default_hover_event(&mut self, _event: &MotionEvent) -> bool {
        self.default_consume(HostCall::DefaultHover)
    }

    fn default_focus_changed(
        &mut self,
        gain_focus: bool,
        _direction: FocusDirection,
        _previously_focused_rect: Option<IntRect>,
    ) {
        self.focused = gain_focus;
        self.calls.push(HostCall::DefaultFocusChanged(gain_focus));
    }

    fn default_window_focus_changed(&mut self, has_window_focus: bool) {
        self.calls.push(HostCall::DefaultWindowFocusChanged(has_window_focus));
    }

    fn default_attached_to_window(&mut self) {
        self.calls.push(HostCall::DefaultAttached);
    }

    fn default_detached_from_window(&mut self) {
        self.calls.push(HostCall::DefaultDetached);
    }

    fn default_window_visibility_changed(&mut self, visibility: Visibility) {
        self.calls.push(HostCall::DefaultVisibilityChanged(visibility));
    }

    fn dispatch_accessibility_event(&mut self, event: AccessibilityEvent) {
        self.calls
            .push(HostCall::AccessibilityEvent(event.event_type, event.source));
        self.events.push(event);
    }

    fn request_invalidate(&mut self) {
        self.invalidations += 1;
        self.calls.push(HostCall::Invalidate);
    }

    fn post_frame_callback(&mut self) {
        self.pending_frames += 1;
        self.calls.push(HostCall::PostFrame);
    }

    fn remove_frame_callback(&mut self) {
        self.pending_frames = 0;
        self.calls.push(HostCall::RemoveFrame);
    }

    fn post_delayed(&mut self, delay: Duration) -> bool {
        self.calls.push(HostCall::PostDelayed(delay));
        if self.refuse_delayed {
            log::warn!("recording host refused a delayed callback");
            return false;
        }
        self.pending_delayed = Some(delay);
        true
    }

    fn remove_delayed_callbacks(&mut self) -> bool {
        self.calls.push(HostCall::RemoveDelayed);
        self.pending_delayed.take().is_some()
    }

    fn location_on_screen(&self) -> (i32, i32) {
        self.screen_location
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn show_soft_input(&mut self) {
        self.soft_input_visible = true;
        self.calls.push(HostCall::ShowSoftInput);
    }

    fn hide_soft_input(&mut self) {
        self.soft_input_visible = false;
        self.calls.push(HostCall::HideSoftInput);
    }

    fn restart_input(&mut self) {
        self.calls.push(HostCall::RestartInput);
    }
}
