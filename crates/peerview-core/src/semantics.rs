use bitflags::bitflags;
use smallvec::SmallVec;

use crate::{Action, Granularity, IntRect, VirtualViewId};

/// High-level semantic role of a virtual node. Roles map onto the widget
/// class names assistive services already know how to announce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    View,
    Text,
    Button,
    TextField,
    Container,
    Checkbox,
    RadioButton,
    Switch,
    Slider,
    ProgressBar,
}

impl Role {
    pub fn class_name(self) -> &'static str {
        match self {
            Role::View => "android.view.View",
            Role::Text => "android.widget.TextView",
            Role::Button => "android.widget.Button",
            Role::TextField => "android.widget.EditText",
            Role::Container => "android.view.ViewGroup",
            Role::Checkbox => "android.widget.CheckBox",
            Role::RadioButton => "android.widget.RadioButton",
            Role::Switch => "android.widget.Switch",
            Role::Slider => "android.widget.SeekBar",
            Role::ProgressBar => "android.widget.ProgressBar",
        }
    }
}

bitflags! {
    /// Movement granularities a node supports for text traversal.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MovementGranularities: u32 {
        const CHARACTER = 1;
        const WORD = 2;
        const LINE = 4;
        const PARAGRAPH = 8;
        const PAGE = 16;
    }
}

impl MovementGranularities {
    pub fn supports(self, granularity: Granularity) -> bool {
        u32::try_from(granularity.raw())
            .ok()
            .and_then(Self::from_bits)
            .is_some_and(|g| g.bits().count_ones() == 1 && self.contains(g))
    }
}

/// Descriptor of one virtual node, filled in by the peer on demand.
///
/// The bridge owns the accessibility-focus overlay: whatever the peer writes
/// into `accessibility_focused` is overwritten after population.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    pub virtual_view_id: VirtualViewId,
    pub parent: Option<VirtualViewId>,
    pub children: SmallVec<[VirtualViewId; 8]>,
    /// Bounds in host screen pixels.
    pub bounds_in_screen: IntRect,
    pub role: Role,
    pub text: Option<String>,
    pub content_description: Option<String>,
    pub hint: Option<String>,
    /// UTF-16 selection bounds within `text`.
    pub text_selection: Option<(i32, i32)>,
    pub movement_granularities: MovementGranularities,
    pub actions: Vec<Action>,
    pub visible_to_user: bool,
    pub enabled: bool,
    pub focusable: bool,
    pub focused: bool,
    pub accessibility_focused: bool,
    pub clickable: bool,
    pub editable: bool,
    pub password: bool,
}

impl NodeInfo {
    pub fn new(virtual_view_id: VirtualViewId) -> Self {
        Self {
            virtual_view_id,
            parent: None,
            children: SmallVec::new(),
            bounds_in_screen: IntRect::default(),
            role: Role::default(),
            text: None,
            content_description: None,
            hint: None,
            text_selection: None,
            movement_granularities: MovementGranularities::empty(),
            actions: Vec::new(),
            visible_to_user: true,
            enabled: true,
            focusable: false,
            focused: false,
            accessibility_focused: false,
            clickable: false,
            editable: false,
            password: false,
        }
    }

    pub fn class_name(&self) -> &'static str {
        self.role.class_name()
    }

    pub fn add_action(&mut self, action: Action) {
        if !self.has_action(action) {
            self.actions.push(action);
        }
    }

    pub fn remove_action(&mut self, action: Action) {
        self.actions.retain(|a| *a != action);
    }

    pub fn has_action(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn add_child(&mut self, child: VirtualViewId) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_action_dedups() {
        let mut node = NodeInfo::new(VirtualViewId(4));
        node.add_action(Action::Click);
        node.add_action(Action::Click);
        node.add_action(Action::AccessibilityFocus);
        assert_eq!(node.actions, vec![Action::Click, Action::AccessibilityFocus]);

        node.remove_action(Action::Click);
        assert!(!node.has_action(Action::Click));
    }

    #[test]
    fn granularity_support() {
        let g = MovementGranularities::CHARACTER | MovementGranularities::WORD;
        assert!(g.supports(Granularity::Word));
        assert!(!g.supports(Granularity::Page));
        assert!(!g.supports(Granularity::Other(3)));
        assert!(!g.supports(Granularity::Other(0)));
    }
}
