//! Accessibility action and event vocabulary shared by the host bridge and
//! peers.

use crate::{HOST_ROOT, TextChangeDiff, VirtualViewId};

platform_enum! {
    /// Action identifiers an assistive service can request on a node.
    pub enum Action {
        Focus = 1,
        ClearFocus = 2,
        Select = 4,
        ClearSelection = 8,
        Click = 16,
        LongClick = 32,
        AccessibilityFocus = 64,
        ClearAccessibilityFocus = 128,
        NextAtMovementGranularity = 256,
        PreviousAtMovementGranularity = 512,
        NextHtmlElement = 1024,
        PreviousHtmlElement = 2048,
        ScrollForward = 4096,
        ScrollBackward = 8192,
        Copy = 16384,
        Paste = 32768,
        Cut = 65536,
        SetSelection = 131072,
        Expand = 262144,
        Collapse = 524288,
        Dismiss = 1048576,
        SetText = 2097152,
    }
}

platform_enum! {
    /// Unit of text movement for traversal actions.
    pub enum Granularity {
        Character = 1,
        Word = 2,
        Line = 4,
        Paragraph = 8,
        Page = 16,
    }
}

platform_enum! {
    pub enum EventType {
        ViewClicked = 1,
        ViewLongClicked = 2,
        ViewSelected = 4,
        ViewFocused = 8,
        ViewTextChanged = 16,
        WindowStateChanged = 32,
        NotificationStateChanged = 64,
        ViewHoverEnter = 128,
        ViewHoverExit = 256,
        WindowContentChanged = 2048,
        ViewScrolled = 4096,
        ViewTextSelectionChanged = 8192,
        Announcement = 16384,
        ViewAccessibilityFocused = 32768,
        ViewAccessibilityFocusCleared = 65536,
        ViewTextTraversedAtMovementGranularity = 131072,
    }
}

/// Change-type bit for a content-changed event whose whole subtree may have
/// changed.
pub const CONTENT_CHANGE_TYPE_SUBTREE: i32 = 0x1;

/// Which focus [`find_focus`](crate::AccessibilityNodeProvider::find_focus)
/// asks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusKind {
    Accessibility,
    Input,
}

/// Unpacked action arguments. Every field is optional on the wire; the
/// bridge decides what a missing value means per action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionArgs {
    pub selection_start: Option<i32>,
    pub selection_end: Option<i32>,
    pub granularity: Option<Granularity>,
    pub extend_selection: bool,
    pub text: Option<String>,
}

impl ActionArgs {
    pub fn selection(start: i32, end: i32) -> Self {
        Self {
            selection_start: Some(start),
            selection_end: Some(end),
            ..Self::default()
        }
    }

    pub fn traversal(granularity: Granularity, extend_selection: bool) -> Self {
        Self {
            granularity: Some(granularity),
            extend_selection,
            ..Self::default()
        }
    }

    /// Both selection bounds, if both were supplied.
    pub fn selection_range(&self) -> Option<(i32, i32)> {
        Some((self.selection_start?, self.selection_end?))
    }
}

/// An accessibility event bound for the host's accessibility sink.
///
/// Optional fields left `None` are simply not set on the platform event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessibilityEvent {
    pub event_type: EventType,
    pub source: VirtualViewId,
    pub text: Option<String>,
    pub before_text: Option<String>,
    pub from_index: Option<i32>,
    pub to_index: Option<i32>,
    pub added_count: Option<i32>,
    pub removed_count: Option<i32>,
    pub item_count: Option<i32>,
    pub movement_granularity: Option<Granularity>,
    pub action: Option<Action>,
    pub content_change_types: i32,
}

impl AccessibilityEvent {
    pub fn new(event_type: EventType, source: VirtualViewId) -> Self {
        Self {
            event_type,
            source,
            text: None,
            before_text: None,
            from_index: None,
            to_index: None,
            added_count: None,
            removed_count: None,
            item_count: None,
            movement_granularity: None,
            action: None,
            content_change_types: 0,
        }
    }

    /// A plain event of `event_type` on `source`. Content-changed events get
    /// the subtree change type.
    pub fn simple(event_type: EventType, source: VirtualViewId) -> Self {
        let mut event = Self::new(event_type, source);
        if event_type == EventType::WindowContentChanged {
            event.content_change_types = CONTENT_CHANGE_TYPE_SUBTREE;
        }
        event
    }

    /// Text-changed event for `before` → `after`, or `None` when the two are
    /// identical.
    pub fn text_changed(source: VirtualViewId, before: &str, after: &str) -> Option<Self> {
        let diff = TextChangeDiff::between(before, after)?;
        let mut event = Self::new(EventType::ViewTextChanged, source);
        event.before_text = Some(before.to_owned());
        event.text = Some(after.to_owned());
        event.from_index = Some(diff.from_index as i32);
        event.removed_count = Some(diff.removed_count as i32);
        event.added_count = Some(diff.added_count as i32);
        Some(event)
    }

    /// Selection-changed event. Indices are UTF-16 offsets into `text`.
    pub fn text_selection_changed(
        source: VirtualViewId,
        text: &str,
        selection_start: i32,
        selection_end: i32,
    ) -> Self {
        let mut event = Self::new(EventType::ViewTextSelectionChanged, source);
        event.item_count = Some(text.encode_utf16().count() as i32);
        event.text = Some(text.to_owned());
        event.from_index = Some(selection_start);
        event.to_index = Some(selection_end);
        event
    }

    pub fn text_traversed(
        source: VirtualViewId,
        text: &str,
        granularity: Granularity,
        forward: bool,
        segment_start: i32,
        segment_end: i32,
    ) -> Self {
        let mut event = Self::new(EventType::ViewTextTraversedAtMovementGranularity, source);
        event.text = Some(text.to_owned());
        event.movement_granularity = Some(granularity);
        event.action = Some(if forward {
            Action::NextAtMovementGranularity
        } else {
            Action::PreviousAtMovementGranularity
        });
        event.from_index = Some(segment_start);
        event.to_index = Some(segment_end);
        event
    }

    pub fn is_for_host(&self) -> bool {
        self.source == HOST_ROOT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_action_round_trips() {
        assert_eq!(Action::from_raw(16), Action::Click);
        assert_eq!(Action::from_raw(0x0102_0000), Action::Other(0x0102_0000));
        assert_eq!(Action::Other(0x0102_0000).raw(), 0x0102_0000);
        assert_eq!(Action::SetSelection.raw(), 131072);
    }

    #[test]
    fn content_changed_is_subtree() {
        let ev = AccessibilityEvent::simple(EventType::WindowContentChanged, VirtualViewId(3));
        assert_eq!(ev.content_change_types, CONTENT_CHANGE_TYPE_SUBTREE);

        let ev = AccessibilityEvent::simple(EventType::ViewFocused, VirtualViewId(3));
        assert_eq!(ev.content_change_types, 0);
    }

    #[test]
    fn text_changed_carries_diff() {
        let ev = AccessibilityEvent::text_changed(VirtualViewId(1), "hello world", "hello there")
            .unwrap();
        assert_eq!(ev.event_type, EventType::ViewTextChanged);
        assert_eq!(ev.before_text.as_deref(), Some("hello world"));
        assert_eq!(ev.text.as_deref(), Some("hello there"));
        assert_eq!(ev.from_index, Some(6));
        assert_eq!(ev.removed_count, Some(5));
        assert_eq!(ev.added_count, Some(5));

        assert!(AccessibilityEvent::text_changed(VirtualViewId(1), "abc", "abc").is_none());
    }

    #[test]
    fn selection_item_count_is_utf16_length() {
        let ev = AccessibilityEvent::text_selection_changed(VirtualViewId(2), "a😀b", 1, 3);
        assert_eq!(ev.item_count, Some(4));
        assert_eq!((ev.from_index, ev.to_index), (Some(1), Some(3)));
    }

    #[test]
    fn traversal_direction_becomes_action() {
        let ev = AccessibilityEvent::text_traversed(
            VirtualViewId(2),
            "one two",
            Granularity::Word,
            false,
            0,
            3,
        );
        assert_eq!(ev.action, Some(Action::PreviousAtMovementGranularity));
        assert_eq!(ev.movement_granularity, Some(Granularity::Word));
    }

    #[test]
    fn args_selection_needs_both_bounds() {
        assert_eq!(ActionArgs::selection(2, 5).selection_range(), Some((2, 5)));
        let half = ActionArgs {
            selection_start: Some(2),
            ..ActionArgs::default()
        };
        assert_eq!(half.selection_range(), None);
    }
}
