use crate::{
    Action, ActionArgs, CallbackCtx, EditorInfo, FocusDirection, FocusKind, Granularity, HOST_ROOT,
    InputConnection, IntRect, KeyEvent, MeasureSpec, MotionEvent, NodeInfo, SurfaceHolder,
    VirtualViewId, Visibility,
};

/// The engine behind a host view. It owns all real UI state; the host view
/// forwards every event here.
///
/// Every method has a "not interested" default, so a peer only implements
/// what it cares about. Boolean returns mean "consumed".
#[allow(unused_variables)]
pub trait ViewPeer: Send {
    /// `None` lets the host compute its default size.
    fn on_measure(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> Option<(i32, i32)> {
        None
    }

    fn on_layout(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        changed: bool,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) {
    }

    fn on_size_changed(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        w: i32,
        h: i32,
        old_w: i32,
        old_h: i32,
    ) {
    }

    fn on_key_down(&mut self, ctx: &mut CallbackCtx<'_>, key_code: i32, event: &KeyEvent) -> bool {
        false
    }

    fn on_key_up(&mut self, ctx: &mut CallbackCtx<'_>, key_code: i32, event: &KeyEvent) -> bool {
        false
    }

    fn on_trackball_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &MotionEvent) -> bool {
        false
    }

    fn on_touch_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &MotionEvent) -> bool {
        false
    }

    fn on_generic_motion_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &MotionEvent) -> bool {
        false
    }

    /// Only called when the view passes hover through instead of tracking
    /// it itself.
    fn on_hover_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &MotionEvent) -> bool {
        false
    }

    fn on_focus_changed(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        gain_focus: bool,
        direction: FocusDirection,
        previously_focused_rect: Option<IntRect>,
    ) {
    }

    fn on_window_focus_changed(&mut self, ctx: &mut CallbackCtx<'_>, has_window_focus: bool) {}

    fn on_attached_to_window(&mut self, ctx: &mut CallbackCtx<'_>) {}

    fn on_detached_from_window(&mut self, ctx: &mut CallbackCtx<'_>) {}

    fn on_window_visibility_changed(&mut self, ctx: &mut CallbackCtx<'_>, visibility: Visibility) {}

    fn surface_created(&mut self, ctx: &mut CallbackCtx<'_>, holder: SurfaceHolder) {}

    fn surface_changed(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        holder: SurfaceHolder,
        format: i32,
        width: i32,
        height: i32,
    ) {
    }

    fn surface_destroyed(&mut self, ctx: &mut CallbackCtx<'_>, holder: SurfaceHolder) {}

    fn do_frame(&mut self, ctx: &mut CallbackCtx<'_>, frame_time_nanos: i64) {}

    fn delayed_callback(&mut self, ctx: &mut CallbackCtx<'_>) {}

    /// Last call a peer receives before it is dropped.
    fn on_release(&mut self, ctx: &mut CallbackCtx<'_>) {}

    /// Fill `node` for `virtual_view_id`. `false` if there is no such node.
    /// `host_screen_x`/`host_screen_y` are the host's screen location, for
    /// converting bounds.
    fn populate_accessibility_node_info(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        host_screen_x: i32,
        host_screen_y: i32,
        virtual_view_id: VirtualViewId,
        node: &mut NodeInfo,
    ) -> bool {
        false
    }

    fn input_focus(&mut self, ctx: &mut CallbackCtx<'_>) -> VirtualViewId {
        HOST_ROOT
    }

    /// Hit test in view-local coordinates.
    fn virtual_view_at_point(&mut self, ctx: &mut CallbackCtx<'_>, x: f32, y: f32) -> VirtualViewId {
        HOST_ROOT
    }

    fn perform_accessibility_action(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
        action: Action,
    ) -> bool {
        false
    }

    fn accessibility_set_text_selection(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
        anchor: i32,
        focus: i32,
    ) -> bool {
        false
    }

    fn accessibility_collapse_text_selection(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
    ) -> bool {
        false
    }

    fn accessibility_traverse_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
        granularity: Granularity,
        forward: bool,
        extend_selection: bool,
    ) -> bool {
        false
    }

    /// A peer that owns its whole accessibility tree can answer node queries
    /// directly. Only consulted when the view passes accessibility through.
    fn as_accessibility_node_provider(&mut self) -> Option<&mut dyn AccessibilityNodeProvider> {
        None
    }

    /// Fill `out_attrs` and say whether this peer accepts text input.
    fn on_create_input_connection(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        out_attrs: &mut EditorInfo,
    ) -> bool {
        false
    }

    fn as_input_connection(&mut self) -> Option<&mut dyn InputConnection> {
        None
    }
}

/// Node queries answered wholesale by the peer.
pub trait AccessibilityNodeProvider {
    fn create_accessibility_node_info(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
    ) -> Option<NodeInfo>;

    fn find_focus(&mut self, ctx: &mut CallbackCtx<'_>, kind: FocusKind) -> Option<NodeInfo>;

    fn perform_action(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        virtual_view_id: VirtualViewId,
        action: Action,
        args: &ActionArgs,
    ) -> bool;
}
