//! Text input session vocabulary: editor attributes the peer advertises when
//! a session opens, and the operation set an input method drives.
//!
//! Positions and lengths are UTF-16 code units unless a method says
//! otherwise, since that is what input methods count in.

use bitflags::bitflags;

use crate::{CallbackCtx, KeyEvent, MetaState};

bitflags! {
    /// Content type of an editor: a class in the low nibble, a variation
    /// above it and flags in the upper bits.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct InputType: u32 {
        const CLASS_TEXT = 0x1;
        const CLASS_NUMBER = 0x2;
        const CLASS_PHONE = 0x3;
        const CLASS_DATETIME = 0x4;

        const VARIATION_URI = 0x10;
        const VARIATION_EMAIL_ADDRESS = 0x20;
        const VARIATION_PASSWORD = 0x80;
        const VARIATION_VISIBLE_PASSWORD = 0x90;
        const VARIATION_WEB_EMAIL_ADDRESS = 0xd0;
        const VARIATION_WEB_PASSWORD = 0xe0;
        /// Shares its value with `VARIATION_URI`; only meaningful under
        /// `CLASS_NUMBER`.
        const NUMBER_VARIATION_PASSWORD = 0x10;

        const TEXT_FLAG_CAP_CHARACTERS = 0x1000;
        const TEXT_FLAG_CAP_WORDS = 0x2000;
        const TEXT_FLAG_CAP_SENTENCES = 0x4000;
        const TEXT_FLAG_AUTO_CORRECT = 0x8000;
        const TEXT_FLAG_AUTO_COMPLETE = 0x10000;
        const TEXT_FLAG_MULTI_LINE = 0x20000;
        const TEXT_FLAG_IME_MULTI_LINE = 0x40000;
        const TEXT_FLAG_NO_SUGGESTIONS = 0x80000;

        const CLASS_MASK = 0xf;
        const VARIATION_MASK = 0xff0;
    }
}

impl InputType {
    /// The class alone. Classes are values, not flags: compare with `==`.
    pub fn class(self) -> InputType {
        self & InputType::CLASS_MASK
    }

    /// The variation alone, compared the same way as [`class`](Self::class).
    pub fn variation(self) -> InputType {
        self & InputType::VARIATION_MASK
    }

    pub fn is_password(self) -> bool {
        let (class, variation) = (self.class(), self.variation());
        if class == InputType::CLASS_NUMBER {
            return variation == InputType::NUMBER_VARIATION_PASSWORD;
        }
        class == InputType::CLASS_TEXT
            && [
                InputType::VARIATION_PASSWORD,
                InputType::VARIATION_VISIBLE_PASSWORD,
                InputType::VARIATION_WEB_PASSWORD,
            ]
            .contains(&variation)
    }
}

bitflags! {
    /// Auto-capitalization modes an input method can ask about.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CapsMode: u32 {
        const CHARACTERS = 0x1000;
        const WORDS = 0x2000;
        const SENTENCES = 0x4000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ImeFlags: u32 {
        const NO_PERSONALIZED_LEARNING = 0x100_0000;
        const NO_FULLSCREEN = 0x200_0000;
        const NAVIGATE_PREVIOUS = 0x400_0000;
        const NAVIGATE_NEXT = 0x800_0000;
        const NO_EXTRACT_UI = 0x1000_0000;
        const NO_ACCESSORY_ACTION = 0x2000_0000;
        const NO_ENTER_ACTION = 0x4000_0000;
        const FORCE_ASCII = 0x8000_0000;
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CursorUpdateMode: u32 {
        const IMMEDIATE = 0x1;
        const MONITOR = 0x2;
    }
}

platform_enum! {
    /// The action an input method's enter key performs.
    pub enum EditorAction {
        Unspecified = 0,
        None = 1,
        Go = 2,
        Search = 3,
        Send = 4,
        Next = 5,
        Done = 6,
        Previous = 7,
    }
}

platform_enum! {
    pub enum ContextMenuAction {
        SelectAll = 0x0102_001f,
        Cut = 0x0102_0020,
        Copy = 0x0102_0021,
        Paste = 0x0102_0022,
    }
}

const IME_ACTION_MASK: u32 = 0xff;

/// Attributes of the editor a text session is opened for, written by the
/// peer when the host asks for an input connection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorInfo {
    pub input_type: InputType,
    pub ime_action: EditorAction,
    pub ime_flags: ImeFlags,
    pub initial_sel_start: i32,
    pub initial_sel_end: i32,
    pub initial_caps_mode: CapsMode,
    pub hint_text: Option<String>,
    pub label: Option<String>,
    pub action_label: Option<String>,
}

impl Default for EditorInfo {
    fn default() -> Self {
        Self {
            input_type: InputType::empty(),
            ime_action: EditorAction::Unspecified,
            ime_flags: ImeFlags::empty(),
            initial_sel_start: -1,
            initial_sel_end: -1,
            initial_caps_mode: CapsMode::empty(),
            hint_text: None,
            label: None,
            action_label: None,
        }
    }
}

impl EditorInfo {
    /// Action and flags packed into the platform's single options word.
    pub fn ime_options(&self) -> u32 {
        (self.ime_action.raw() as u32 & IME_ACTION_MASK) | self.ime_flags.bits()
    }

    pub fn set_ime_options(&mut self, raw: u32) {
        self.ime_action = EditorAction::from_raw((raw & IME_ACTION_MASK) as i32);
        self.ime_flags = ImeFlags::from_bits_truncate(raw & !IME_ACTION_MASK);
    }

    pub fn is_multi_line(&self) -> bool {
        self.input_type.contains(InputType::TEXT_FLAG_MULTI_LINE)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractedTextRequest {
    pub token: i32,
    pub hint_max_chars: usize,
    pub hint_max_lines: usize,
}

/// Snapshot of the editor's text for full-screen (extract) editing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub start_offset: i32,
    pub selection_start: i32,
    pub selection_end: i32,
    pub single_line: bool,
}

/// Operation set of a text input session, implemented by the peer.
///
/// Mutating operations return whether the session is still valid, the way
/// input methods expect; a closed or detached session answers `false`.
pub trait InputConnection {
    fn text_before_cursor(&mut self, ctx: &mut CallbackCtx<'_>, n: usize) -> Option<String>;
    fn text_after_cursor(&mut self, ctx: &mut CallbackCtx<'_>, n: usize) -> Option<String>;
    fn selected_text(&mut self, ctx: &mut CallbackCtx<'_>) -> Option<String>;
    fn cursor_caps_mode(&mut self, ctx: &mut CallbackCtx<'_>, req_modes: CapsMode) -> CapsMode;

    fn extracted_text(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        _request: &ExtractedTextRequest,
    ) -> Option<ExtractedText> {
        None
    }

    fn delete_surrounding_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        before_length: usize,
        after_length: usize,
    ) -> bool;

    /// Like [`delete_surrounding_text`](Self::delete_surrounding_text), but
    /// the lengths count code points.
    fn delete_surrounding_text_in_code_points(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        before_length: usize,
        after_length: usize,
    ) -> bool;

    fn set_composing_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        text: &str,
        new_cursor_position: i32,
    ) -> bool;
    fn set_composing_region(&mut self, ctx: &mut CallbackCtx<'_>, start: i32, end: i32) -> bool;
    fn finish_composing_text(&mut self, ctx: &mut CallbackCtx<'_>) -> bool;
    fn commit_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        text: &str,
        new_cursor_position: i32,
    ) -> bool;
    fn set_selection(&mut self, ctx: &mut CallbackCtx<'_>, start: i32, end: i32) -> bool;

    fn perform_editor_action(&mut self, ctx: &mut CallbackCtx<'_>, action: EditorAction)
    -> bool;

    fn perform_context_menu_action(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        _action: ContextMenuAction,
    ) -> bool {
        false
    }

    fn begin_batch_edit(&mut self, ctx: &mut CallbackCtx<'_>) -> bool;
    /// Returns `true` while an outer batch is still open.
    fn end_batch_edit(&mut self, ctx: &mut CallbackCtx<'_>) -> bool;

    fn send_key_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &KeyEvent) -> bool;

    fn clear_meta_key_states(&mut self, _ctx: &mut CallbackCtx<'_>, _states: MetaState) -> bool {
        false
    }

    fn report_fullscreen_mode(&mut self, _ctx: &mut CallbackCtx<'_>, _enabled: bool) -> bool {
        false
    }

    fn request_cursor_updates(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        _mode: CursorUpdateMode,
    ) -> bool {
        false
    }

    fn close_connection(&mut self, _ctx: &mut CallbackCtx<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ime_options_pack_and_unpack() {
        let mut info = EditorInfo {
            ime_action: EditorAction::Done,
            ime_flags: ImeFlags::NO_FULLSCREEN | ImeFlags::NO_EXTRACT_UI,
            ..EditorInfo::default()
        };
        let raw = info.ime_options();
        assert_eq!(raw, 6 | 0x200_0000 | 0x1000_0000);

        info.set_ime_options(3 | 0x4000_0000);
        assert_eq!(info.ime_action, EditorAction::Search);
        assert_eq!(info.ime_flags, ImeFlags::NO_ENTER_ACTION);
    }

    #[test]
    fn class_and_variation_are_masked_values() {
        let web_email = InputType::CLASS_TEXT | InputType::VARIATION_WEB_EMAIL_ADDRESS;
        assert!(web_email.contains(InputType::VARIATION_PASSWORD));
        assert!(!web_email.is_password());
        assert_eq!(web_email.variation(), InputType::VARIATION_WEB_EMAIL_ADDRESS);

        for variation in [
            InputType::VARIATION_PASSWORD,
            InputType::VARIATION_VISIBLE_PASSWORD,
            InputType::VARIATION_WEB_PASSWORD,
        ] {
            let input_type = InputType::CLASS_TEXT | variation | InputType::TEXT_FLAG_NO_SUGGESTIONS;
            assert!(input_type.is_password(), "{input_type:?}");
        }

        assert!((InputType::CLASS_NUMBER | InputType::NUMBER_VARIATION_PASSWORD).is_password());
        assert!(!(InputType::CLASS_TEXT | InputType::VARIATION_URI).is_password());

        assert!(InputType::CLASS_PHONE.contains(InputType::CLASS_TEXT));
        assert_ne!(InputType::CLASS_PHONE.class(), InputType::CLASS_TEXT);
        assert_eq!(
            (InputType::CLASS_NUMBER | InputType::TEXT_FLAG_MULTI_LINE).class(),
            InputType::CLASS_NUMBER
        );
    }

    #[test]
    fn default_selection_is_unset() {
        let info = EditorInfo::default();
        assert_eq!((info.initial_sel_start, info.initial_sel_end), (-1, -1));
        assert!(!info.is_multi_line());
    }
}
