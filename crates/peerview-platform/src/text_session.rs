use peerview_core::{
    CallbackCtx, CapsMode, ContextMenuAction, CursorUpdateMode, EditorAction, ExtractedText,
    ExtractedTextRequest, Host, InputConnection, KeyEvent, MetaState,
};

use crate::view::View;

/// The input-method side of a view: every operation goes straight to the
/// peer's input connection. The bridge keeps no editing state of its own.
///
/// A peer that stops exposing an input connection mid-session gets the
/// "nothing there" answer for every call: `None`, empty caps, `false`.
pub struct TextSession<'v, H: Host> {
    view: &'v mut View<H>,
}

impl<'v, H: Host> TextSession<'v, H> {
    pub(crate) fn new(view: &'v mut View<H>) -> Self {
        Self { view }
    }

    fn forward<T>(
        &mut self,
        absent: T,
        f: impl FnOnce(&mut dyn InputConnection, &mut CallbackCtx<'_>) -> T,
    ) -> T {
        self.view
            .call(|peer, ctx| match peer.as_input_connection() {
                Some(connection) => f(connection, ctx),
                None => absent,
            })
    }

    pub fn text_before_cursor(&mut self, n: usize) -> Option<String> {
        self.forward(None, |ic, ctx| ic.text_before_cursor(ctx, n))
    }

    pub fn text_after_cursor(&mut self, n: usize) -> Option<String> {
        self.forward(None, |ic, ctx| ic.text_after_cursor(ctx, n))
    }

    pub fn selected_text(&mut self) -> Option<String> {
        self.forward(None, |ic, ctx| ic.selected_text(ctx))
    }

    pub fn cursor_caps_mode(&mut self, req_modes: CapsMode) -> CapsMode {
        self.forward(CapsMode::empty(), |ic, ctx| ic.cursor_caps_mode(ctx, req_modes))
    }

    pub fn extracted_text(&mut self, request: &ExtractedTextRequest) -> Option<ExtractedText> {
        self.forward(None, |ic, ctx| ic.extracted_text(ctx, request))
    }

    pub fn delete_surrounding_text(&mut self, before_length: usize, after_length: usize) -> bool {
        self.forward(false, |ic, ctx| {
            ic.delete_surrounding_text(ctx, before_length, after_length)
        })
    }

    pub fn delete_surrounding_text_in_code_points(
        &mut self,
        before_length: usize,
        after_length: usize,
    ) -> bool {
        self.forward(false, |ic, ctx| {
            ic.delete_surrounding_text_in_code_points(ctx, before_length, after_length)
        })
    }

    pub fn set_composing_text(&mut self, text: &str, new_cursor_position: i32) -> bool {
        self.forward(false, |ic, ctx| {
            ic.set_composing_text(ctx, text, new_cursor_position)
        })
    }

    pub fn set_composing_region(&mut self, start: i32, end: i32) -> bool {
        self.forward(false, |ic, ctx| ic.set_composing_region(ctx, start, end))
    }

    pub fn finish_composing_text(&mut self) -> bool {
        self.forward(false, |ic, ctx| ic.finish_composing_text(ctx))
    }

    pub fn commit_text(&mut self, text: &str, new_cursor_position: i32) -> bool {
        self.forward(false, |ic, ctx| ic.commit_text(ctx, text, new_cursor_position))
    }

    pub fn set_selection(&mut self, start: i32, end: i32) -> bool {
        self.forward(false, |ic, ctx| ic.set_selection(ctx, start, end))
    }

    pub fn perform_editor_action(&mut self, action: EditorAction) -> bool {
        self.forward(false, |ic, ctx| ic.perform_editor_action(ctx, action))
    }

    pub fn perform_context_menu_action(&mut self, action: ContextMenuAction) -> bool {
        self.forward(false, |ic, ctx| ic.perform_context_menu_action(ctx, action))
    }

    pub fn begin_batch_edit(&mut self) -> bool {
        self.forward(false, |ic, ctx| ic.begin_batch_edit(ctx))
    }

    /// `true` while an outer batch is still open.
    pub fn end_batch_edit(&mut self) -> bool {
        self.forward(false, |ic, ctx| ic.end_batch_edit(ctx))
    }

    pub fn send_key_event(&mut self, event: &KeyEvent) -> bool {
        self.forward(false, |ic, ctx| ic.send_key_event(ctx, event))
    }

    pub fn clear_meta_key_states(&mut self, states: MetaState) -> bool {
        self.forward(false, |ic, ctx| ic.clear_meta_key_states(ctx, states))
    }

    pub fn report_fullscreen_mode(&mut self, enabled: bool) -> bool {
        self.forward(false, |ic, ctx| ic.report_fullscreen_mode(ctx, enabled))
    }

    pub fn request_cursor_updates(&mut self, mode: CursorUpdateMode) -> bool {
        self.forward(false, |ic, ctx| ic.request_cursor_updates(ctx, mode))
    }

    /// End the session. The view hands out no new session until the next
    /// [`create_input_connection`](View::create_input_connection).
    pub fn close(mut self) {
        self.forward((), |ic, ctx| ic.close_connection(ctx));
        self.view.text_session_open = false;
        log::debug!("{}: text session closed", self.view.handle());
    }
}
