//! The two ways a view can stand between assistive services and its peer.
//!
//! [`TrackedAccessibility`] keeps hover and accessibility focus itself and
//! asks the peer only for hit tests and one node at a time.
//! [`PassThroughAccessibility`] keeps nothing and hands every query to the
//! peer's own node provider.

use peerview_core::{
    Action, ActionArgs, EventType, FocusKind, HOST_ROOT, MotionAction, MotionEvent, NodeInfo,
    VirtualViewId,
};

use crate::link::PeerLink;
use crate::options::AccessibilityMode;
use crate::policy::consumed_or_default;

/// Hover and accessibility-focus state of a tracked view. `HOST_ROOT` in
/// either field means "none".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessibilityState {
    pub accessibility_focus: VirtualViewId,
    pub hover: VirtualViewId,
}

pub(crate) trait AccessibilityStrategy {
    fn mode(&self) -> AccessibilityMode;

    /// `None` when the peer owns the state.
    fn state(&self) -> Option<AccessibilityState>;

    fn on_hover_event(&mut self, link: &mut PeerLink<'_>, event: &MotionEvent) -> bool;

    /// `false` sends node queries to the host's default handling instead.
    fn has_node_provider(&mut self, link: &mut PeerLink<'_>) -> bool;

    fn create_node(&mut self, link: &mut PeerLink<'_>, id: VirtualViewId) -> Option<NodeInfo>;

    fn find_focus(&mut self, link: &mut PeerLink<'_>, kind: FocusKind) -> Option<NodeInfo>;

    fn perform_action(
        &mut self,
        link: &mut PeerLink<'_>,
        id: VirtualViewId,
        action: Action,
        args: &ActionArgs,
    ) -> bool;
}

pub(crate) fn strategy_for(mode: AccessibilityMode) -> Box<dyn AccessibilityStrategy> {
    match mode {
        AccessibilityMode::Tracked => Box::new(TrackedAccessibility::default()),
        AccessibilityMode::PassThrough => Box::new(PassThroughAccessibility),
    }
}

#[derive(Debug, Default)]
pub(crate) struct TrackedAccessibility {
    state: AccessibilityState,
}

impl TrackedAccessibility {
    fn hover_to(&mut self, link: &mut PeerLink<'_>, new: VirtualViewId) {
        let old = self.state.hover;
        if new == old {
            return;
        }
        if !new.is_host_root() {
            link.send(EventType::ViewHoverEnter, new);
        }
        if !old.is_host_root() {
            link.send(EventType::ViewHoverExit, old);
        }
        self.state.hover = new;
    }

    fn is_accessibility_focused(&self, id: VirtualViewId) -> bool {
        !id.is_host_root() && id == self.state.accessibility_focus
    }
}

impl AccessibilityStrategy for TrackedAccessibility {
    fn mode(&self) -> AccessibilityMode {
        AccessibilityMode::Tracked
    }

    fn state(&self) -> Option<AccessibilityState> {
        Some(self.state)
    }

    fn on_hover_event(&mut self, link: &mut PeerLink<'_>, event: &MotionEvent) -> bool {
        match event.action {
            MotionAction::HoverEnter | MotionAction::HoverMove => {
                let (x, y) = (event.x, event.y);
                let hit = link.call(|peer, ctx| peer.virtual_view_at_point(ctx, x, y));
                self.hover_to(link, hit);
            }
            MotionAction::HoverExit => self.hover_to(link, HOST_ROOT),
            other => log::debug!("ignoring non-hover action {other:?} in hover handler"),
        }
        true
    }

    fn has_node_provider(&mut self, _link: &mut PeerLink<'_>) -> bool {
        true
    }

    fn create_node(&mut self, link: &mut PeerLink<'_>, id: VirtualViewId) -> Option<NodeInfo> {
        let (x, y) = link.host().location_on_screen();
        let mut node = NodeInfo::new(id);
        let populated =
            link.call(|peer, ctx| peer.populate_accessibility_node_info(ctx, x, y, id, &mut node));
        if !populated {
            return None;
        }

        let focused = self.is_accessibility_focused(id);
        node.accessibility_focused = focused;
        if focused {
            node.remove_action(Action::AccessibilityFocus);
            node.add_action(Action::ClearAccessibilityFocus);
        } else {
            node.remove_action(Action::ClearAccessibilityFocus);
            node.add_action(Action::AccessibilityFocus);
        }
        Some(node)
    }

    fn find_focus(&mut self, link: &mut PeerLink<'_>, kind: FocusKind) -> Option<NodeInfo> {
        match kind {
            FocusKind::Accessibility => {
                let id = self.state.accessibility_focus;
                self.create_node(link, id)
                    .filter(|node| node.accessibility_focused)
            }
            FocusKind::Input => {
                let id = link.call(|peer, ctx| peer.input_focus(ctx));
                self.create_node(link, id).filter(|node| node.focused)
            }
        }
    }

    fn perform_action(
        &mut self,
        link: &mut PeerLink<'_>,
        id: VirtualViewId,
        action: Action,
        args: &ActionArgs,
    ) -> bool {
        match action {
            Action::AccessibilityFocus => {
                self.state.accessibility_focus = id;
                link.host().request_invalidate();
                link.send(EventType::ViewAccessibilityFocused, id);
                true
            }
            Action::ClearAccessibilityFocus => {
                if self.state.accessibility_focus == id {
                    self.state.accessibility_focus = HOST_ROOT;
                }
                link.host().request_invalidate();
                link.send(EventType::ViewAccessibilityFocusCleared, id);
                true
            }
            Action::SetSelection => match args.selection_range() {
                Some((anchor, focus)) => link.call(|peer, ctx| {
                    peer.accessibility_set_text_selection(ctx, id, anchor, focus)
                }),
                None => link.call(|peer, ctx| peer.accessibility_collapse_text_selection(ctx, id)),
            },
            Action::NextAtMovementGranularity | Action::PreviousAtMovementGranularity => {
                let Some(granularity) = args.granularity else {
                    log::warn!("{action:?} on {id} without a granularity");
                    return false;
                };
                let forward = action == Action::NextAtMovementGranularity;
                let extend = args.extend_selection;
                link.call(|peer, ctx| {
                    peer.accessibility_traverse_text(ctx, id, granularity, forward, extend)
                })
            }
            _ => {
                let done = link.call(|peer, ctx| peer.perform_accessibility_action(ctx, id, action));
                if done && action == Action::Click {
                    link.send(EventType::ViewClicked, id);
                }
                done
            }
        }
    }
}

/// Stateless: the peer's node provider answers everything.
#[derive(Debug, Default)]
pub(crate) struct PassThroughAccessibility;

impl AccessibilityStrategy for PassThroughAccessibility {
    fn mode(&self) -> AccessibilityMode {
        AccessibilityMode::PassThrough
    }

    fn state(&self) -> Option<AccessibilityState> {
        None
    }

    fn on_hover_event(&mut self, link: &mut PeerLink<'_>, event: &MotionEvent) -> bool {
        let consumed = link.call(|peer, ctx| peer.on_hover_event(ctx, event));
        consumed_or_default(consumed, || link.host().default_hover_event(event))
    }

    fn has_node_provider(&mut self, link: &mut PeerLink<'_>) -> bool {
        link.call(|peer, _| peer.as_accessibility_node_provider().is_some())
    }

    fn create_node(&mut self, link: &mut PeerLink<'_>, id: VirtualViewId) -> Option<NodeInfo> {
        link.call(|peer, ctx| {
            peer.as_accessibility_node_provider()?
                .create_accessibility_node_info(ctx, id)
        })
    }

    fn find_focus(&mut self, link: &mut PeerLink<'_>, kind: FocusKind) -> Option<NodeInfo> {
        link.call(|peer, ctx| peer.as_accessibility_node_provider()?.find_focus(ctx, kind))
    }

    fn perform_action(
        &mut self,
        link: &mut PeerLink<'_>,
        id: VirtualViewId,
        action: Action,
        args: &ActionArgs,
    ) -> bool {
        link.call(|peer, ctx| {
            peer.as_accessibility_node_provider()
                .is_some_and(|provider| provider.perform_action(ctx, id, action, args))
        })
    }
}
