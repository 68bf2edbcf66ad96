//! Drives a small note-taking peer through a scripted session: layout,
//! screen-reader exploration, and typing through the input method, all
//! against a recording host.
//!
//! `PEERVIEW_ACCESSIBILITY` and `PEERVIEW_CONTINUOUS_FRAMES` override the
//! view options; `RUST_LOG` controls the output.

use anyhow::Context;

use peerview_core::*;
use peerview_devtools::RecordingHost;
use peerview_platform::{View, ViewOptions, logging};
use peerview_text::{EditBuffer, EditSession};

const TITLE: VirtualViewId = VirtualViewId(1);
const NOTE: VirtualViewId = VirtualViewId(2);

const ROW_HEIGHT: i32 = 48;

/// A title label above a multi-line note field.
struct Notepad {
    width: i32,
    note: EditSession,
    note_focused: bool,
}

impl Notepad {
    fn new() -> Self {
        let note = EditSession::new(NOTE, EditBuffer::new())
            .with_input_type(InputType::CLASS_TEXT | InputType::TEXT_FLAG_MULTI_LINE);
        Self {
            width: 0,
            note,
            note_focused: false,
        }
    }

    fn row(&self, id: VirtualViewId) -> Option<IntRect> {
        match id {
            TITLE => Some(IntRect::new(0, 0, self.width, ROW_HEIGHT)),
            NOTE => Some(IntRect::new(0, ROW_HEIGHT, self.width, ROW_HEIGHT * 4)),
            _ => None,
        }
    }
}

impl ViewPeer for Notepad {
    fn on_measure(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        width_spec: MeasureSpec,
        height_spec: MeasureSpec,
    ) -> Option<(i32, i32)> {
        Some((width_spec.resolve_size(360), height_spec.resolve_size(ROW_HEIGHT * 4)))
    }

    fn on_size_changed(&mut self, ctx: &mut CallbackCtx<'_>, w: i32, _h: i32, _old_w: i32, _old_h: i32) {
        self.width = w;
        ctx.send_simple_event(EventType::WindowContentChanged, HOST_ROOT);
        ctx.post_frame_callback();
    }

    fn on_touch_event(&mut self, ctx: &mut CallbackCtx<'_>, event: &MotionEvent) -> bool {
        if event.action != MotionAction::Up {
            return true;
        }
        let hit = self.virtual_view_at_point(ctx, event.x, event.y);
        self.note_focused = hit == NOTE;
        if self.note_focused {
            ctx.show_soft_input();
            ctx.restart_input();
        } else {
            ctx.hide_soft_input();
        }
        true
    }

    fn do_frame(&mut self, _ctx: &mut CallbackCtx<'_>, frame_time_nanos: i64) {
        log::debug!(
            "frame at {frame_time_nanos}ns: {:?}",
            self.note.buffer().text()
        );
    }

    fn populate_accessibility_node_info(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        host_screen_x: i32,
        host_screen_y: i32,
        id: VirtualViewId,
        node: &mut NodeInfo,
    ) -> bool {
        if id.is_host_root() {
            node.add_child(TITLE);
            node.add_child(NOTE);
            node.bounds_in_screen =
                IntRect::new(0, 0, self.width, ROW_HEIGHT * 4).offset(host_screen_x, host_screen_y);
            return true;
        }
        let Some(row) = self.row(id) else {
            return false;
        };
        node.parent = Some(HOST_ROOT);
        node.bounds_in_screen = row.offset(host_screen_x, host_screen_y);
        if id == TITLE {
            node.role = Role::Text;
            node.text = Some("Notes".into());
        } else {
            self.note.populate_node(node);
            node.hint = Some("Write something".into());
            node.focused = self.note_focused;
            node.add_action(Action::SetSelection);
            node.add_action(Action::NextAtMovementGranularity);
            node.add_action(Action::PreviousAtMovementGranularity);
        }
        true
    }

    fn input_focus(&mut self, _ctx: &mut CallbackCtx<'_>) -> VirtualViewId {
        if self.note_focused { NOTE } else { HOST_ROOT }
    }

    fn virtual_view_at_point(&mut self, _ctx: &mut CallbackCtx<'_>, x: f32, y: f32) -> VirtualViewId {
        let point = Vec2 { x, y };
        [TITLE, NOTE]
            .into_iter()
            .find(|id| self.row(*id).is_some_and(|r| r.contains(point)))
            .unwrap_or(HOST_ROOT)
    }

    fn accessibility_set_text_selection(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        id: VirtualViewId,
        anchor: i32,
        focus: i32,
    ) -> bool {
        id == NOTE && self.note.set_selection_from_accessibility(ctx, anchor, focus)
    }

    fn accessibility_collapse_text_selection(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        id: VirtualViewId,
    ) -> bool {
        id == NOTE && self.note.collapse_selection(ctx)
    }

    fn accessibility_traverse_text(
        &mut self,
        ctx: &mut CallbackCtx<'_>,
        id: VirtualViewId,
        granularity: Granularity,
        forward: bool,
        extend_selection: bool,
    ) -> bool {
        id == NOTE && self.note.traverse(ctx, granularity, forward, extend_selection)
    }

    fn on_create_input_connection(
        &mut self,
        _ctx: &mut CallbackCtx<'_>,
        out_attrs: &mut EditorInfo,
    ) -> bool {
        if !self.note_focused {
            return false;
        }
        self.note.fill_editor_info(out_attrs);
        out_attrs.hint_text = Some("Write something".into());
        true
    }

    fn as_input_connection(&mut self) -> Option<&mut dyn InputConnection> {
        Some(&mut self.note)
    }
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let options = ViewOptions::from_env().context("reading view options from the environment")?;
    let host = RecordingHost::new().with_screen_location(0, 96);
    let mut view = View::new(host, options, |_| Notepad::new());

    view.attached_to_window();
    let (w, h) = view.measure(MeasureSpec::exactly(720), MeasureSpec::at_most(1280));
    view.size_changed(w, h, 0, 0);
    view.layout(true, 0, 0, w, h);
    pump_frames(&mut view);

    // Explore by touch: the title, then the note.
    for y in [10.0, 120.0] {
        view.hover_event(&MotionEvent::new(MotionAction::HoverMove, 40.0, y));
    }
    view.hover_event(&MotionEvent::new(MotionAction::HoverExit, 40.0, 120.0));
    view.perform_accessibility_action(NOTE, Action::AccessibilityFocus, &ActionArgs::default());
    if let Some(node) = view.find_accessibility_focus(FocusKind::Accessibility) {
        log::info!("a11y focus on {} ({})", node.virtual_view_id, node.class_name());
    }

    // Tap the note and type into it.
    view.focus_changed(true, FocusDirection::Down, None);
    view.touch_event(&MotionEvent::new(MotionAction::Down, 40.0, 120.0));
    view.touch_event(&MotionEvent::new(MotionAction::Up, 40.0, 120.0));

    let mut info = EditorInfo::default();
    anyhow::ensure!(
        view.create_input_connection(&mut info),
        "the note field refused text input"
    );
    log::info!("editor info: {info:?}");
    {
        let mut ime = view
            .text_session()
            .context("no text session after the input connection was accepted")?;
        ime.begin_batch_edit();
        ime.set_composing_text("Hel", 1);
        ime.set_composing_text("Hello", 1);
        ime.finish_composing_text();
        ime.end_batch_edit();
        ime.commit_text(", world", 1);
        ime.send_key_event(&KeyEvent::new(KeyAction::Down, keycode::ENTER));
        ime.commit_text("Second line.", 1);
        log::info!("before cursor: {:?}", ime.text_before_cursor(32));
    }
    pump_frames(&mut view);

    // Read it back word by word.
    view.perform_accessibility_action(NOTE, Action::SetSelection, &ActionArgs::selection(0, 0));
    let words = ActionArgs::traversal(Granularity::Word, false);
    while view.perform_accessibility_action(NOTE, Action::NextAtMovementGranularity, &words) {}

    if let Some(ime) = view.text_session() {
        ime.close();
    }
    view.detached_from_window();

    println!("{}", view.host().summary());
    for event in view.host().events.iter() {
        println!("{:?} on {}", event.event_type, event.source);
    }
    view.release();
    Ok(())
}

fn pump_frames(view: &mut View<RecordingHost>) {
    while let Some(frame_time) = view.host_mut().fire_frame() {
        view.do_frame(frame_time);
        if view.options().continuous_frames {
            break;
        }
    }
}
