use peerview_core::{
    CallbackCtx, CapsMode, ContextMenuAction, CursorUpdateMode, EditorAction, EditorInfo,
    ExtractedText, ExtractedTextRequest, Granularity, InputConnection, InputType, KeyEvent,
    MetaState, NodeInfo, Role, VirtualViewId, keycode,
};

use crate::{EditBuffer, TextChange, traverse};

/// A peer-side text field: an [`EditBuffer`] plus what the input method
/// negotiated for it.
///
/// After every operation that changes the buffer (and no batch edit is
/// open) the session reports the net change: text-changed and
/// selection-changed accessibility events, an invalidation and a frame.
#[derive(Debug)]
pub struct EditSession {
    buffer: EditBuffer,
    virtual_view_id: VirtualViewId,
    input_type: InputType,
    ime_action: EditorAction,
    closed: bool,
    meta_state: MetaState,
    cursor_updates: CursorUpdateMode,
    fullscreen: bool,
    editor_actions: Vec<EditorAction>,
}

impl EditSession {
    pub fn new(virtual_view_id: VirtualViewId, buffer: EditBuffer) -> Self {
        Self {
            buffer,
            virtual_view_id,
            input_type: InputType::CLASS_TEXT | InputType::TEXT_FLAG_CAP_SENTENCES,
            ime_action: EditorAction::Done,
            closed: false,
            meta_state: MetaState::empty(),
            cursor_updates: CursorUpdateMode::empty(),
            fullscreen: false,
            editor_actions: Vec::new(),
        }
    }

    pub fn with_input_type(mut self, input_type: InputType) -> Self {
        self.input_type = input_type;
        self
    }

    pub fn with_ime_action(mut self, action: EditorAction) -> Self {
        self.ime_action = action;
        self
    }

    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    pub fn virtual_view_id(&self) -> VirtualViewId {
        self.virtual_view_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn cursor_updates(&self) -> CursorUpdateMode {
        self.cursor_updates
    }

    /// Modifiers latched by a bare shift or alt press, waiting for the
    /// next key.
    pub fn meta_state(&self) -> MetaState {
        self.meta_state
    }

    /// Editor actions the input method performed since the last call.
    pub fn take_editor_actions(&mut self) -> Vec<EditorAction> {
        std::mem::take(&mut self.editor_actions)
    }

    /// Describe this field to a new input method session. Reopens the
    /// session if it had been closed.
    pub fn fill_editor_info(&mut self, info: &mut EditorInfo) {
        let (anchor, focus) = self.buffer.selection();
        info.input_type = self.input_type;
        info.ime_action = self.ime_action;
        info.initial_sel_start = anchor.min(focus);
        info.initial_sel_end = anchor.max(focus);
        info.initial_caps_mode = self.buffer.cursor_caps_mode(caps_modes_for(self.input_type));
        self.closed = false;
    }

    /// Fill an accessibility node for this field.
    pub fn populate_node(&self, node: &mut NodeInfo) {
        let (anchor, focus) = self.buffer.selection();
        node.role = Role::TextField;
        node.editable = true;
        node.focusable = true;
        node.password = self.input_type.is_password();
        node.text = Some(self.buffer.text().to_owned());
        node.text_selection = Some((anchor.min(focus), anchor.max(focus)));
        node.movement_granularities = traverse::supported_granularities();
    }

    /// Selection set from an assistive service rather than the input
    /// method.
    pub fn set_selection_from_accessibility(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        anchor: i32,
        focus: i32,
    ) -> bool {
        let len = self.buffer.len_utf16() as i32;
        if !(0..=len).contains(&anchor) || !(0..=len).contains(&focus) {
            return false;
        }
        self.buffer.set_selection(anchor, focus);
        self.flush(ctx);
        true
    }

    pub fn collapse_selection(&mut self, ctx: &mut CallbackCtx<'_>) -> bool {
        self.buffer.collapse_selection();
        self.flush(ctx);
        true
    }

    /// Move by one segment and announce what was traversed.
    pub fn traverse(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        granularity: Granularity,
        forward: bool,
        extend_selection: bool,
    ) -> bool {
        let Some((start, end)) = self.buffer.traverse(granularity, forward, extend_selection) else {
            return false;
        };
        ctx.send_text_traversed(
            self.virtual_view_id,
            self.buffer.text(),
            granularity,
            forward,
            start,
            end,
        );
        self.flush(ctx);
        true
    }

    fn flush(&mut self, ctx: &mut CallbackCtx<'_>) {
        if let Some(change) = self.buffer.take_change() {
            self.report(ctx, &change);
        }
    }

    fn report(&self, ctx: &mut CallbackCtx<'_>, change: &TextChange) {
        log::debug!(
            "{}: text changed={} selection={:?}",
            self.virtual_view_id,
            change.text_changed(),
            change.selection
        );
        ctx.send_text_changed(self.virtual_view_id, &change.before, &change.after);
        if change.selection_changed() || change.text_changed() {
            let (anchor, focus) = change.selection;
            ctx.send_text_selection_changed(
                self.virtual_view_id,
                &change.after,
                anchor.min(focus),
                anchor.max(focus),
            );
        }
        ctx.request_invalidate();
        ctx.post_frame_callback();
    }

    /// Run `edit` if the session is open, then report. `false` once closed.
    fn edit(&mut self, ctx: &mut CallbackCtx<'_>, edit: impl FnOnce(&mut EditBuffer)) -> bool {
        if self.closed {
            log::debug!("{}: edit on closed session ignored", self.virtual_view_id);
            return false;
        }
        edit(&mut self.buffer);
        self.flush(ctx);
        true
    }
}

fn caps_modes_for(input_type: InputType) -> CapsMode {
    let mut modes = CapsMode::empty();
    if input_type.class() != InputType::CLASS_TEXT {
        return modes;
    }
    if input_type.contains(InputType::TEXT_FLAG_CAP_CHARACTERS) {
        modes |= CapsMode::CHARACTERS;
    }
    if input_type.contains(InputType::TEXT_FLAG_CAP_WORDS) {
        modes |= CapsMode::WORDS;
    }
    if input_type.contains(InputType::TEXT_FLAG_CAP_SENTENCES) {
        modes |= CapsMode::SENTENCES;
    }
    modes
}

impl InputConnection for EditSession {
    fn text_before_cursor(&mut self, _ctx: &mut CallbackCtx<'_>, n: usize) -> Option<String> {
        (!self.closed).then(|| self.buffer.text_before_cursor(n))
    }

    fn text_after_cursor(&mut self, _ctx: &mut CallbackCtx<'_>, n: usize) -> Option<String> {
        (!self.closed).then(|| self.buffer.text_after_cursor(n))
    }

    fn selected_text(&mut self, _ctx: &mut CallbackCtx<'_>) -> Option<String> {
        if self.closed {
            return None;
        }
        self.buffer.selected_text()
    }

    fn cursor_caps_mode(&mut self, _ctx: &mut CallbackCtx<'_>, req_modes: CapsMode) -> CapsMode {
        if self.closed {
            return CapsMode::empty();
        }
        self.buffer.cursor_caps_mode(req_modes)
    }

    fn extracted_text(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        request: &ExtractedTextRequest,
    ) -> Option<ExtractedText> {
        (!self.closed).then(|| self.buffer.extracted_text(request))
    }

    fn delete_surrounding_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        before_length: usize,
        after_length: usize,
    ) -> bool {
        self.edit(ctx, |b| b.delete_surrounding_text(before_length, after_length))
    }

    fn delete_surrounding_text_in_code_points(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        before_length: usize,
        after_length: usize,
    ) -> bool {
        self.edit(ctx, |b| {
            b.delete_surrounding_text_in_code_points(before_length, after_length)
        })
    }

    fn set_composing_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        text: &str,
        new_cursor_position: i32,
    ) -> bool {
        self.edit(ctx, |b| b.set_composing_text(text, new_cursor_position))
    }

    fn set_composing_region(&mut self, ctx: &mut CallbackCtx<'_>, start: i32, end: i32) -> bool {
        self.edit(ctx, |b| b.set_composing_region(start, end))
    }

    fn finish_composing_text(&mut self, ctx: &mut CallbackCtx<'_>) -> bool {
        self.edit(ctx, EditBuffer::finish_composing_text)
    }

    fn commit_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        text: &str,
        new_cursor_position: i32,
    ) -> bool {
        self.edit(ctx, |b| b.commit_text(text, new_cursor_position))
    }

    fn set_selection(&mut self, ctx: &mut CallbackCtx<'_>, start: i32, end: i32) -> bool {
        self.edit(ctx, |b| b.set_selection(start, end))
    }

    fn perform_editor_action(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        action: EditorAction,
    ) -> bool {
        if self.closed {
            return false;
        }
        log::info!("{}: editor action {:?}", self.virtual_view_id, action);
        self.editor_actions.push(action);
        true
    }

    fn perform_context_menu_action(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        action: ContextMenuAction,
    ) -> bool {
        match action {
            ContextMenuAction::SelectAll => self.edit(ctx, EditBuffer::select_all),
            // No clipboard here.
            _ => false,
        }
    }

    fn begin_batch_edit(&mut self, _ctx: &mut CallbackCtx<'_>) -> bool {
        if self.closed {
            return false;
        }
        self.buffer.begin_batch_edit();
        true
    }

    fn end_batch_edit(&mut self, ctx: &mut CallbackCtx<'_>) -> bool {
        if self.closed {
            return false;
        }
        let still_open = self.buffer.end_batch_edit();
        self.flush(ctx);
        still_open
    }

    fn send_key_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &KeyEvent) -> bool {
        if self.closed || !event.is_down() {
            return false;
        }
        let latched = match event.key_code {
            keycode::SHIFT_LEFT | keycode::SHIFT_RIGHT => MetaState::SHIFT_ON,
            keycode::ALT_LEFT | keycode::ALT_RIGHT => MetaState::ALT_ON,
            _ => MetaState::empty(),
        };
        if !latched.is_empty() {
            self.meta_state |= latched;
            return true;
        }
        let meta_state = event.meta_state | std::mem::take(&mut self.meta_state);
        let extend = meta_state.contains(MetaState::SHIFT_ON);
        match event.key_code {
            keycode::DEL => self.edit(ctx, EditBuffer::delete_backward),
            keycode::FORWARD_DEL => self.edit(ctx, EditBuffer::delete_forward),
            keycode::DPAD_LEFT => self.edit(ctx, |b| b.move_cursor(-1, extend)),
            keycode::DPAD_RIGHT => self.edit(ctx, |b| b.move_cursor(1, extend)),
            keycode::ENTER if self.input_type.contains(InputType::TEXT_FLAG_MULTI_LINE) => {
                self.edit(ctx, |b| b.insert_text("\n"))
            }
            keycode::ENTER => {
                let action = self.ime_action;
                self.perform_editor_action(ctx, action)
            }
            _ => match event.unicode_char {
                Some(c) if !c.is_control() => {
                    let mut utf8 = [0; 4];
                    let s = c.encode_utf8(&mut utf8);
                    self.edit(ctx, |b| b.insert_text(s))
                }
                _ => false,
            },
        }
    }

    fn clear_meta_key_states(&mut self, _ctx: &mut CallbackCtx<'_>, states: MetaState) -> bool {
        self.meta_state.remove(states);
        !self.closed
    }

    fn report_fullscreen_mode(&mut self, _ctx: &mut CallbackCtx<'_>, enabled: bool) -> bool {
        self.fullscreen = enabled;
        !self.closed
    }

    fn request_cursor_updates(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        mode: CursorUpdateMode,
    ) -> bool {
        if self.closed {
            return false;
        }
        self.cursor_updates = mode;
        true
    }

    fn close_connection(&mut self, ctx: &mut CallbackCtx<'_>) {
        if self.closed {
            return;
        }
        self.buffer.finish_composing_text();
        while self.buffer.in_batch_edit() {
            self.buffer.end_batch_edit();
        }
        self.flush(ctx);
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use peerview_core::{CallbackScheduler, EventType, KeyAction};
    use peerview_devtools::{HostCall, RecordingHost};

    use super::*;

    const FIELD: VirtualViewId = VirtualViewId(3);

    fn with_ctx<T>(
        host: &mut RecordingHost,
        scheduler: &mut CallbackScheduler,
        f: impl FnOnce(&mut CallbackCtx<'_>) -> T,
    ) -> T {
        let mut ctx = CallbackCtx::new(host, scheduler);
        let out = f(&mut ctx);
        ctx.finish();
        out
    }

    #[test]
    fn test_commit_reports_change() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("hello "));

        assert!(with_ctx(&mut host, &mut scheduler, |ctx| session
            .commit_text(ctx, "world", 1)));

        assert_eq!(
            host.event_log(),
            [
                (EventType::ViewTextChanged, FIELD),
                (EventType::ViewTextSelectionChanged, FIELD),
            ]
        );
        let changed = &host.events[0];
        assert_eq!(changed.from_index, Some(6));
        assert_eq!(changed.added_count, Some(5));
        assert_eq!(host.invalidations, 1);
        assert_eq!(host.pending_frames(), 1);
        assert!(scheduler.frame_pending());
    }

    #[test]
    fn test_batch_defers_events_until_outermost_end() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::new());

        with_ctx(&mut host, &mut scheduler, |ctx| {
            assert!(session.begin_batch_edit(ctx));
            assert!(session.begin_batch_edit(ctx));
            session.set_composing_text(ctx, "ab", 1);
            assert!(session.end_batch_edit(ctx));
            session.commit_text(ctx, "abc", 1);
        });
        assert!(host.events.is_empty());

        let still_open = with_ctx(&mut host, &mut scheduler, |ctx| session.end_batch_edit(ctx));
        assert!(!still_open);
        assert_eq!(host.events.len(), 2);
        assert_eq!(host.events[0].before_text.as_deref(), Some(""));
        assert_eq!(host.events[0].text.as_deref(), Some("abc"));
    }

    #[test]
    fn test_closed_session_refuses_edits() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("x"));

        with_ctx(&mut host, &mut scheduler, |ctx| {
            session.set_composing_text(ctx, "y", 1);
            session.close_connection(ctx);
            assert!(!session.commit_text(ctx, "z", 1));
            assert_eq!(session.text_before_cursor(ctx, 5), None);
        });
        assert!(session.is_closed());
        assert_eq!(session.buffer().text(), "xy");
        assert_eq!(session.buffer().composing_region(), None);

        let mut info = EditorInfo::default();
        session.fill_editor_info(&mut info);
        assert!(!session.is_closed());
        assert_eq!((info.initial_sel_start, info.initial_sel_end), (2, 2));
    }

    #[test]
    fn test_key_events_edit_and_enter_performs_action() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session =
            EditSession::new(FIELD, EditBuffer::with_text("ab")).with_ime_action(EditorAction::Send);

        with_ctx(&mut host, &mut scheduler, |ctx| {
            let del = KeyEvent::new(KeyAction::Down, keycode::DEL);
            assert!(session.send_key_event(ctx, &del));
            let typed = KeyEvent::new(KeyAction::Down, 0).with_unicode_char('z');
            assert!(session.send_key_event(ctx, &typed));
            let up = KeyEvent::new(KeyAction::Up, keycode::DEL);
            assert!(!session.send_key_event(ctx, &up));
            let enter = KeyEvent::new(KeyAction::Down, keycode::ENTER);
            assert!(session.send_key_event(ctx, &enter));
        });

        assert_eq!(session.buffer().text(), "az");
        assert_eq!(session.take_editor_actions(), [EditorAction::Send]);
    }

    #[test]
    fn test_multi_line_enter_inserts_newline() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("a"))
            .with_input_type(InputType::CLASS_TEXT | InputType::TEXT_FLAG_MULTI_LINE);

        with_ctx(&mut host, &mut scheduler, |ctx| {
            session.send_key_event(ctx, &KeyEvent::new(KeyAction::Down, keycode::ENTER))
        });
        assert_eq!(session.buffer().text(), "a\n");
        assert!(session.take_editor_actions().is_empty());
    }

    #[test]
    fn test_traverse_announces_segment() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("one two"));

        let moved = with_ctx(&mut host, &mut scheduler, |ctx| {
            session.traverse(ctx, Granularity::Word, false, false)
        });
        assert!(moved);
        let traversed = &host.events[0];
        assert_eq!(traversed.event_type, EventType::ViewTextTraversedAtMovementGranularity);
        assert_eq!((traversed.from_index, traversed.to_index), (Some(4), Some(7)));
        assert_eq!(session.buffer().selection(), (4, 4));
        // selection moved but text did not
        assert_eq!(host.events[1].event_type, EventType::ViewTextSelectionChanged);
        assert_eq!(host.events.len(), 2);
    }

    #[test]
    fn test_select_all_context_action() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("abc"));

        with_ctx(&mut host, &mut scheduler, |ctx| {
            assert!(session.perform_context_menu_action(ctx, ContextMenuAction::SelectAll));
            assert!(!session.perform_context_menu_action(ctx, ContextMenuAction::Copy));
            assert_eq!(session.selected_text(ctx).as_deref(), Some("abc"));
        });
        assert_eq!(host.count(&HostCall::Invalidate), 1);
    }

    #[test]
    fn test_populate_node() {
        let session = EditSession::new(FIELD, EditBuffer::with_text("pw"))
            .with_input_type(InputType::CLASS_TEXT | InputType::VARIATION_PASSWORD);
        let mut node = NodeInfo::new(FIELD);
        session.populate_node(&mut node);
        assert!(node.editable && node.password);
        assert_eq!(node.text_selection, Some((2, 2)));
        assert_eq!(node.class_name(), "android.widget.EditText");
        assert!(node.movement_granularities.supports(Granularity::Paragraph));
        assert!(!node.movement_granularities.supports(Granularity::Page));
    }

    #[test]
    fn test_email_field_is_not_a_password() {
        let session = EditSession::new(FIELD, EditBuffer::with_text("me@example.com"))
            .with_input_type(InputType::CLASS_TEXT | InputType::VARIATION_WEB_EMAIL_ADDRESS);
        let mut node = NodeInfo::new(FIELD);
        session.populate_node(&mut node);
        assert!(!node.password);
    }

    #[test]
    fn test_latched_shift_extends_next_move() {
        let mut host = RecordingHost::new();
        let mut scheduler = CallbackScheduler::new();
        let mut session = EditSession::new(FIELD, EditBuffer::with_text("abc"));

        with_ctx(&mut host, &mut scheduler, |ctx| {
            let shift = KeyEvent::new(KeyAction::Down, keycode::SHIFT_LEFT);
            assert!(session.send_key_event(ctx, &shift));
            assert_eq!(session.meta_state(), MetaState::SHIFT_ON);
            session.send_key_event(ctx, &KeyEvent::new(KeyAction::Down, keycode::DPAD_LEFT));
        });
        assert_eq!(session.buffer().selection(), (3, 2));
        assert!(session.meta_state().is_empty());

        with_ctx(&mut host, &mut scheduler, |ctx| {
            let alt = KeyEvent::new(KeyAction::Down, keycode::ALT_RIGHT);
            session.send_key_event(ctx, &alt);
            session.send_key_event(ctx, &KeyEvent::new(KeyAction::Down, keycode::SHIFT_RIGHT));
            assert!(session.clear_meta_key_states(ctx, MetaState::SHIFT_ON));
            assert_eq!(session.meta_state(), MetaState::ALT_ON);
            // alt alone does not extend
            session.send_key_event(ctx, &KeyEvent::new(KeyAction::Down, keycode::DPAD_LEFT));
        });
        assert_eq!(session.buffer().selection(), (1, 1));
    }
}
