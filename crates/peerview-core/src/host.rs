use std::time::Duration;

use crate::{
    AccessibilityEvent, FocusDirection, IntRect, KeyEvent, MeasureSpec, MotionEvent, Visibility,
};

/// The native view side of the bridge.
///
/// `default_*` methods are the host's own handling of an event, run when the
/// peer doesn't consume it (or alongside the peer for pure notifications).
/// The rest are the operations the bridge and peers drive outward.
pub trait Host {
    fn default_measure(&mut self, width_spec: MeasureSpec, height_spec: MeasureSpec) -> (i32, i32) {
        (width_spec.default_size(0), height_spec.default_size(0))
    }

    fn default_layout(&mut self, _changed: bool, _left: i32, _top: i32, _right: i32, _bottom: i32) {
    }

    fn default_size_changed(&mut self, _w: i32, _h: i32, _old_w: i32, _old_h: i32) {}

    fn default_key_down(&mut self, _key_code: i32, _event: &KeyEvent) -> bool {
        false
    }

    fn default_key_up(&mut self, _key_code: i32, _event: &KeyEvent) -> bool {
        false
    }

    fn default_trackball_event(&mut self, _event: &MotionEvent) -> bool {
        false
    }

    fn default_touch_event(&mut self, _event: &MotionEvent) -> bool {
        false
    }

    fn default_generic_motion_event(&mut self, _event: &MotionEvent) -> bool {
        false
    }

    fn default_hover_event(&mut self, _event: &MotionEvent) -> bool {
        false
    }

    fn default_focus_changed(
        &mut self,
        _gain_focus: bool,
        _direction: FocusDirection,
        _previously_focused_rect: Option<IntRect>,
    ) {
    }

    fn default_window_focus_changed(&mut self, _has_window_focus: bool) {}

    fn default_attached_to_window(&mut self) {}

    fn default_detached_from_window(&mut self) {}

    fn default_window_visibility_changed(&mut self, _visibility: Visibility) {}

    fn dispatch_accessibility_event(&mut self, event: AccessibilityEvent);

    fn request_invalidate(&mut self);

    /// Schedule the next-frame notification. Single-shot.
    fn post_frame_callback(&mut self);

    fn remove_frame_callback(&mut self);

    /// Schedule the delayed notification. `false` if the host's queue
    /// refused it.
    fn post_delayed(&mut self, delay: Duration) -> bool;

    /// `true` if a pending delayed notification was removed.
    fn remove_delayed_callbacks(&mut self) -> bool;

    /// Top-left corner of the host view in screen pixels.
    fn location_on_screen(&self) -> (i32, i32);

    fn is_focused(&self) -> bool;

    fn show_soft_input(&mut self);

    fn hide_soft_input(&mut self);

    /// Ask the input method to discard its session and open a new one.
    fn restart_input(&mut self);
}
