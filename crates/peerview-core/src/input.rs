//! Host input and lifecycle values.
//!
//! The bridge treats these as opaque payloads: it only looks at a motion
//! event's action and coordinates (for hover tracking). Everything else is
//! carried through to the peer untouched.

use bitflags::bitflags;

use crate::Vec2;

const MODE_SHIFT: u32 = 30;
const MODE_MASK: i32 = 0x3 << MODE_SHIFT;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureMode {
    Unspecified,
    Exactly,
    AtMost,
}

/// A packed measurement constraint: two mode bits over a 30-bit size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeasureSpec(pub i32);

impl MeasureSpec {
    pub fn new(mode: MeasureMode, size: i32) -> Self {
        let mode_bits = match mode {
            MeasureMode::Unspecified => 0,
            MeasureMode::Exactly => 1 << MODE_SHIFT,
            MeasureMode::AtMost => 2 << MODE_SHIFT,
        };
        Self((size & !MODE_MASK) | mode_bits)
    }

    pub fn unspecified() -> Self {
        Self::new(MeasureMode::Unspecified, 0)
    }

    pub fn exactly(size: i32) -> Self {
        Self::new(MeasureMode::Exactly, size)
    }

    pub fn at_most(size: i32) -> Self {
        Self::new(MeasureMode::AtMost, size)
    }

    pub fn mode(self) -> MeasureMode {
        match ((self.0 & MODE_MASK) as u32) >> MODE_SHIFT {
            1 => MeasureMode::Exactly,
            2 => MeasureMode::AtMost,
            // The fourth bit pattern is unused by the platform.
            _ => MeasureMode::Unspecified,
        }
    }

    pub fn size(self) -> i32 {
        self.0 & !MODE_MASK
    }

    /// Size the host uses when nobody has an opinion: the suggested size for
    /// an unspecified constraint, the constraint's size otherwise.
    pub fn default_size(self, suggested: i32) -> i32 {
        match self.mode() {
            MeasureMode::Unspecified => suggested,
            MeasureMode::Exactly | MeasureMode::AtMost => self.size(),
        }
    }

    /// Reconcile a desired size with this constraint.
    pub fn resolve_size(self, desired: i32) -> i32 {
        match self.mode() {
            MeasureMode::Unspecified => desired,
            MeasureMode::Exactly => self.size(),
            MeasureMode::AtMost => desired.min(self.size()),
        }
    }
}

bitflags! {
    /// Modifier key state bits, as carried by key and motion events.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MetaState: u32 {
        const SHIFT_ON = 0x1;
        const ALT_ON = 0x2;
        const SYM_ON = 0x4;
        const FUNCTION_ON = 0x8;
        const ALT_LEFT_ON = 0x10;
        const ALT_RIGHT_ON = 0x20;
        const SHIFT_LEFT_ON = 0x40;
        const SHIFT_RIGHT_ON = 0x80;
        const CTRL_ON = 0x1000;
        const CTRL_LEFT_ON = 0x2000;
        const CTRL_RIGHT_ON = 0x4000;
        const META_ON = 0x10000;
        const META_LEFT_ON = 0x20000;
        const META_RIGHT_ON = 0x40000;
        const CAPS_LOCK_ON = 0x100000;
        const NUM_LOCK_ON = 0x200000;
        const SCROLL_LOCK_ON = 0x400000;
    }
}

platform_enum! {
    pub enum KeyAction {
        Down = 0,
        Up = 1,
        Multiple = 2,
    }
}

/// Key codes the bridge's own text helpers care about.
pub mod keycode {
    pub const BACK: i32 = 4;
    pub const DPAD_LEFT: i32 = 21;
    pub const DPAD_RIGHT: i32 = 22;
    pub const ALT_LEFT: i32 = 57;
    pub const ALT_RIGHT: i32 = 58;
    pub const SHIFT_LEFT: i32 = 59;
    pub const SHIFT_RIGHT: i32 = 60;
    pub const TAB: i32 = 61;
    pub const ENTER: i32 = 66;
    pub const DEL: i32 = 67;
    pub const FORWARD_DEL: i32 = 112;
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    pub action: KeyAction,
    pub key_code: i32,
    pub scan_code: i32,
    pub meta_state: MetaState,
    pub repeat_count: i32,
    pub unicode_char: Option<char>,
    pub device_id: i32,
    pub event_time_ms: i64,
    pub down_time_ms: i64,
}

impl KeyEvent {
    pub fn new(action: KeyAction, key_code: i32) -> Self {
        Self {
            action,
            key_code,
            scan_code: 0,
            meta_state: MetaState::empty(),
            repeat_count: 0,
            unicode_char: None,
            device_id: 0,
            event_time_ms: 0,
            down_time_ms: 0,
        }
    }

    pub fn with_meta_state(mut self, meta_state: MetaState) -> Self {
        self.meta_state = meta_state;
        self
    }

    pub fn with_unicode_char(mut self, c: char) -> Self {
        self.unicode_char = Some(c);
        self
    }

    pub fn is_down(&self) -> bool {
        self.action == KeyAction::Down
    }
}

platform_enum! {
    pub enum MotionAction {
        Down = 0,
        Up = 1,
        Move = 2,
        Cancel = 3,
        Outside = 4,
        PointerDown = 5,
        PointerUp = 6,
        HoverMove = 7,
        Scroll = 8,
        HoverEnter = 9,
        HoverExit = 10,
        ButtonPress = 11,
        ButtonRelease = 12,
    }
}

impl MotionAction {
    /// Decode a raw action word, dropping the pointer index bits.
    pub fn from_masked(raw: i32) -> Self {
        Self::from_raw(raw & 0xff)
    }

    pub fn is_hover(self) -> bool {
        matches!(self, Self::HoverEnter | Self::HoverMove | Self::HoverExit)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MotionEvent {
    pub action: MotionAction,
    pub x: f32,
    pub y: f32,
    pub pointer_count: usize,
    pub meta_state: MetaState,
    pub event_time_ms: i64,
    pub down_time_ms: i64,
}

impl MotionEvent {
    pub fn new(action: MotionAction, x: f32, y: f32) -> Self {
        Self {
            action,
            x,
            y,
            pointer_count: 1,
            meta_state: MetaState::empty(),
            event_time_ms: 0,
            down_time_ms: 0,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2 {
            x: self.x,
            y: self.y,
        }
    }
}

platform_enum! {
    pub enum FocusDirection {
        Backward = 1,
        Forward = 2,
        Left = 17,
        Up = 33,
        Right = 66,
        Down = 130,
    }
}

platform_enum! {
    pub enum Visibility {
        Visible = 0,
        Invisible = 4,
        Gone = 8,
    }
}

/// Opaque token for the host surface a peer renders into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHolder(pub u64);
