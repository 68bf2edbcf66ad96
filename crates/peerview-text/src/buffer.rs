use std::ops::Range;

use peerview_core::{CapsMode, ExtractedText, ExtractedTextRequest, Granularity};

use crate::offsets::{
    byte_to_utf16, clamp_to_char_boundary, code_points_back, code_points_forward,
    next_grapheme_boundary, prev_grapheme_boundary, utf16_len, utf16_to_byte_ceil,
    utf16_to_byte_floor,
};
use crate::traverse;

/// One net change to a buffer, reported once no batch edit is open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextChange {
    pub before: String,
    pub after: String,
    pub selection_before: (i32, i32),
    /// UTF-16 anchor and focus after the change.
    pub selection: (i32, i32),
}

impl TextChange {
    pub fn text_changed(&self) -> bool {
        self.before != self.after
    }

    pub fn selection_changed(&self) -> bool {
        self.selection_before != self.selection
    }
}

#[derive(Clone, Debug)]
struct Snapshot {
    text: String,
    selection: (i32, i32),
}

/// Editable text with an input-method session's state: a selection
/// (anchor and focus, either order), an optional composing region and batch
/// nesting.
///
/// Offsets are bytes internally and always on char boundaries; everything
/// public speaks UTF-16.
#[derive(Clone, Debug, Default)]
pub struct EditBuffer {
    text: String,
    anchor: usize,
    focus: usize,
    composing: Option<Range<usize>>,
    batch_depth: u32,
    snapshot: Option<Snapshot>,
}

impl EditBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text` with the caret at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            anchor: end,
            focus: end,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len_utf16(&self) -> usize {
        utf16_len(&self.text)
    }

    /// Anchor and focus.
    pub fn selection(&self) -> (i32, i32) {
        (self.to_utf16(self.anchor), self.to_utf16(self.focus))
    }

    /// Selection as an ordered range.
    pub fn selection_range(&self) -> Range<i32> {
        let (a, f) = self.selection();
        a.min(f)..a.max(f)
    }

    pub fn composing_region(&self) -> Option<(i32, i32)> {
        self.composing
            .as_ref()
            .map(|r| (self.to_utf16(r.start), self.to_utf16(r.end)))
    }

    pub fn in_batch_edit(&self) -> bool {
        self.batch_depth > 0
    }

    pub fn begin_batch_edit(&mut self) {
        self.batch_depth += 1;
    }

    /// Closes one level of nesting. Returns whether a batch is still open.
    pub fn end_batch_edit(&mut self) -> bool {
        if self.batch_depth == 0 {
            log::warn!("end_batch_edit without a matching begin_batch_edit");
        }
        self.batch_depth = self.batch_depth.saturating_sub(1);
        self.batch_depth > 0
    }

    /// The net change since the last call, once no batch edit is open.
    /// Intermediate states inside a batch are never reported.
    pub fn take_change(&mut self) -> Option<TextChange> {
        if self.in_batch_edit() {
            return None;
        }
        let snapshot = self.snapshot.take()?;
        let change = TextChange {
            before: snapshot.text,
            after: self.text.clone(),
            selection_before: snapshot.selection,
            selection: self.selection(),
        };
        (change.text_changed() || change.selection_changed()).then_some(change)
    }

    pub fn text_before_cursor(&self, n: usize) -> String {
        let start = self.sel_start();
        let from = utf16_to_byte_ceil(&self.text, byte_to_utf16(&self.text, start).saturating_sub(n));
        self.text[from..start].to_owned()
    }

    pub fn text_after_cursor(&self, n: usize) -> String {
        let end = self.sel_end();
        let to = utf16_to_byte_floor(&self.text, byte_to_utf16(&self.text, end).saturating_add(n));
        self.text[end..to].to_owned()
    }

    /// `None` when the selection is collapsed.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = (self.sel_start(), self.sel_end());
        (start != end).then(|| self.text[start..end].to_owned())
    }

    /// Capitalization the input method should apply at the selection start.
    pub fn cursor_caps_mode(&self, req_modes: CapsMode) -> CapsMode {
        let mut modes = req_modes & CapsMode::CHARACTERS;
        if !req_modes.intersects(CapsMode::WORDS | CapsMode::SENTENCES) {
            return modes;
        }

        let before = self.text[..self.sel_start()].trim_end_matches(is_opening_punctuation);

        if req_modes.contains(CapsMode::WORDS)
            && before.chars().next_back().is_none_or(char::is_whitespace)
        {
            modes |= CapsMode::WORDS;
        }

        if req_modes.contains(CapsMode::SENTENCES) {
            let trimmed = before.trim_end();
            let after_space = trimmed.len() < before.len();
            let ended = trimmed
                .trim_end_matches(is_closing_punctuation)
                .ends_with(['.', '?', '!']);
            if trimmed.is_empty() || (after_space && ended) {
                modes |= CapsMode::SENTENCES;
            }
        }
        modes
    }

    pub fn extracted_text(&self, request: &ExtractedTextRequest) -> ExtractedText {
        let (anchor, focus) = self.selection();
        let mut text = self.text.clone();
        if request.hint_max_chars > 0 && utf16_len(&text) > request.hint_max_chars {
            log::debug!(
                "extracted text is {} units, hint was {}",
                utf16_len(&text),
                request.hint_max_chars
            );
            text.truncate(utf16_to_byte_floor(&self.text, request.hint_max_chars));
        }
        ExtractedText {
            single_line: !text.contains('\n'),
            text,
            start_offset: 0,
            selection_start: anchor.min(focus),
            selection_end: anchor.max(focus),
        }
    }

    /// Delete UTF-16 lengths around the selection, keeping the selection
    /// itself. Lengths that end inside a surrogate pair take the whole pair.
    pub fn delete_surrounding_text(&mut self, before_length: usize, after_length: usize) {
        let (start, end) = (self.sel_start(), self.sel_end());
        let start16 = byte_to_utf16(&self.text, start);
        let end16 = byte_to_utf16(&self.text, end);
        let before_from = utf16_to_byte_floor(&self.text, start16.saturating_sub(before_length));
        let after_to = utf16_to_byte_ceil(&self.text, end16.saturating_add(after_length));
        self.delete_around(before_from..start, end..after_to);
    }

    /// Like [`delete_surrounding_text`](Self::delete_surrounding_text), but
    /// the lengths count code points.
    pub fn delete_surrounding_text_in_code_points(&mut self, before_length: usize, after_length: usize) {
        let (start, end) = (self.sel_start(), self.sel_end());
        let before_from = code_points_back(&self.text, start, before_length);
        let after_to = code_points_forward(&self.text, end, after_length);
        self.delete_around(before_from..start, end..after_to);
    }

    /// Replace the composing region (or the selection, if nothing is being
    /// composed) with `text` and mark it as the new composing region.
    pub fn set_composing_text(&mut self, text: &str, new_cursor_position: i32) {
        let range = self.replacement_range();
        let inserted = self.splice(range.clone(), text);
        self.composing = (!inserted.is_empty()).then_some(inserted.clone());
        self.place_cursor(inserted, new_cursor_position);
    }

    /// Mark existing text as composing. An empty region clears it.
    pub fn set_composing_region(&mut self, start: i32, end: i32) {
        self.mark_dirty();
        let (start, end) = (start.min(end), start.max(end));
        let start = self.from_utf16_floor(start);
        let end = self.from_utf16_ceil(end);
        self.composing = (start < end).then_some(start..end);
    }

    pub fn finish_composing_text(&mut self) {
        self.composing = None;
    }

    /// Replace the composing region (or the selection) with `text`, ending
    /// composition.
    pub fn commit_text(&mut self, text: &str, new_cursor_position: i32) {
        let range = self.replacement_range();
        let inserted = self.splice(range, text);
        self.composing = None;
        self.place_cursor(inserted, new_cursor_position);
    }

    /// Set anchor and focus. Out-of-range values are ignored, as input
    /// methods expect.
    pub fn set_selection(&mut self, start: i32, end: i32) {
        let len = self.len_utf16() as i32;
        if start < 0 || end < 0 || start > len || end > len {
            log::debug!("ignoring out-of-range selection {start}..{end} (len {len})");
            return;
        }
        self.mark_dirty();
        self.anchor = self.from_utf16_floor(start);
        self.focus = self.from_utf16_floor(end);
    }

    pub fn select_all(&mut self) {
        self.mark_dirty();
        self.anchor = 0;
        self.focus = self.text.len();
    }

    /// Collapse the selection onto its focus.
    pub fn collapse_selection(&mut self) {
        self.mark_dirty();
        self.anchor = self.focus;
    }

    pub fn insert_text(&mut self, text: &str) {
        self.commit_text(text, 1);
    }

    /// Delete the selection, or the grapheme before the caret.
    pub fn delete_backward(&mut self) {
        let (start, end) = (self.sel_start(), self.sel_end());
        if start != end {
            self.splice(start..end, "");
        } else if start > 0 {
            let prev = prev_grapheme_boundary(&self.text, start);
            self.splice(prev..start, "");
        }
    }

    pub fn delete_forward(&mut self) {
        let (start, end) = (self.sel_start(), self.sel_end());
        if start != end {
            self.splice(start..end, "");
        } else if start < self.text.len() {
            let next = next_grapheme_boundary(&self.text, start);
            self.splice(start..next, "");
        }
    }

    /// Move the focus by whole graphemes.
    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        self.mark_dirty();
        let mut pos = self.focus;
        for _ in 0..delta.unsigned_abs() {
            pos = if delta < 0 {
                prev_grapheme_boundary(&self.text, pos)
            } else {
                next_grapheme_boundary(&self.text, pos)
            };
        }
        self.focus = pos;
        if !extend_selection {
            self.anchor = pos;
        }
    }

    /// Step the focus over one segment. Returns the UTF-16 span moved over,
    /// or `None` if there is nothing further in that direction.
    pub fn traverse(
        &mut self,
        granularity: Granularity,
        forward: bool,
        extend_selection: bool,
    ) -> Option<(i32, i32)> {
        let segment = traverse::step(&self.text, self.focus, granularity, forward)?;
        self.mark_dirty();
        self.focus = if forward { segment.end } else { segment.start };
        if !extend_selection {
            self.anchor = self.focus;
        }
        Some((self.to_utf16(segment.start), self.to_utf16(segment.end)))
    }

    fn sel_start(&self) -> usize {
        self.anchor.min(self.focus)
    }

    fn sel_end(&self) -> usize {
        self.anchor.max(self.focus)
    }

    fn replacement_range(&self) -> Range<usize> {
        self.composing
            .clone()
            .unwrap_or_else(|| self.sel_start()..self.sel_end())
    }

    fn delete_around(&mut self, before: Range<usize>, after: Range<usize>) {
        // Back to front so the first range stays valid.
        if !after.is_empty() {
            self.splice(after, "");
        }
        if !before.is_empty() {
            self.splice(before, "");
        }
    }

    /// Replace `range` with `replacement`, shifting selection and composing
    /// offsets. Returns the byte range of the inserted text.
    fn splice(&mut self, range: Range<usize>, replacement: &str) -> Range<usize> {
        self.mark_dirty();
        let start = clamp_to_char_boundary(&self.text, range.start);
        let end = clamp_to_char_boundary(&self.text, range.end).max(start);
        self.text.replace_range(start..end, replacement);

        let new_end = start + replacement.len();
        let map = |p: usize| {
            if p <= start {
                p
            } else if p >= end {
                p - (end - start) + replacement.len()
            } else {
                start
            }
        };
        self.anchor = map(self.anchor);
        self.focus = map(self.focus);
        self.composing = self
            .composing
            .take()
            .map(|r| map(r.start)..map(r.end))
            .filter(|r| !r.is_empty());
        start..new_end
    }

    /// Collapse the caret relative to an inserted span: positive positions
    /// count from its end (1 is just after it), the rest from its start.
    fn place_cursor(&mut self, inserted: Range<usize>, new_cursor_position: i32) {
        let base = if new_cursor_position > 0 {
            i64::from(self.to_utf16(inserted.end)) + i64::from(new_cursor_position) - 1
        } else {
            i64::from(self.to_utf16(inserted.start)) + i64::from(new_cursor_position)
        };
        let caret = base.clamp(0, self.len_utf16() as i64) as i32;
        let caret = self.from_utf16_floor(caret);
        self.anchor = caret;
        self.focus = caret;
    }

    fn mark_dirty(&mut self) {
        if self.snapshot.is_none() {
            self.snapshot = Some(Snapshot {
                text: self.text.clone(),
                selection: self.selection(),
            });
        }
    }

    fn to_utf16(&self, byte: usize) -> i32 {
        byte_to_utf16(&self.text, byte) as i32
    }

    fn from_utf16_floor(&self, utf16: i32) -> usize {
        utf16_to_byte_floor(&self.text, utf16.max(0) as usize)
    }

    fn from_utf16_ceil(&self, utf16: i32) -> usize {
        utf16_to_byte_ceil(&self.text, utf16.max(0) as usize)
    }
}

fn is_opening_punctuation(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | '[' | '{' | '\u{201c}' | '\u{2018}')
}

fn is_closing_punctuation(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201d}' | '\u{2019}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_selection() {
        let mut buf = EditBuffer::with_text("Hello World");
        buf.set_selection(0, 5);
        buf.insert_text("Hi");
        assert_eq!(buf.text(), "Hi World");
        assert_eq!(buf.selection(), (2, 2));
    }

    #[test]
    fn test_delete_backward_grapheme() {
        let mut buf = EditBuffer::with_text("A👍🏽B");
        buf.move_cursor(-1, false);
        buf.delete_backward();
        assert_eq!(buf.text(), "AB");
        assert_eq!(buf.selection(), (1, 1));
    }

    #[test]
    fn test_commit_cursor_convention() {
        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.commit_text("b", 1);
        assert_eq!((buf.text(), buf.selection()), ("abc", (2, 2)));

        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.commit_text("b", 0);
        assert_eq!(buf.selection(), (1, 1));

        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.commit_text("b", 2);
        assert_eq!(buf.selection(), (3, 3));

        // clamped to the text
        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.commit_text("b", -10);
        assert_eq!(buf.selection(), (0, 0));
    }

    #[test]
    fn test_commit_cursor_extremes_clamp() {
        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.commit_text("b", i32::MAX);
        assert_eq!((buf.text(), buf.selection()), ("abc", (3, 3)));

        let mut buf = EditBuffer::with_text("ac");
        buf.set_selection(1, 1);
        buf.set_composing_text("b", i32::MIN);
        assert_eq!((buf.text(), buf.selection()), ("abc", (0, 0)));
    }

    #[test]
    fn test_huge_lengths_reach_the_end() {
        let mut buf = EditBuffer::with_text("abcd");
        buf.set_selection(1, 1);
        assert_eq!(buf.text_after_cursor(usize::MAX), "bcd");
        buf.delete_surrounding_text(0, usize::MAX);
        assert_eq!((buf.text(), buf.selection()), ("a", (1, 1)));
    }

    #[test]
    fn test_composing_then_commit() {
        let mut buf = EditBuffer::with_text("Test ");
        buf.set_composing_text("日本", 1);
        assert_eq!(buf.text(), "Test 日本");
        assert_eq!(buf.composing_region(), Some((5, 7)));

        buf.set_composing_text("日本語", 1);
        assert_eq!(buf.text(), "Test 日本語");
        assert_eq!(buf.composing_region(), Some((5, 8)));

        buf.commit_text("日本語", 1);
        assert_eq!(buf.text(), "Test 日本語");
        assert_eq!(buf.composing_region(), None);
        assert_eq!(buf.selection(), (8, 8));
    }

    #[test]
    fn test_composing_region_over_existing_text() {
        let mut buf = EditBuffer::with_text("hello wrld");
        buf.set_composing_region(10, 6);
        assert_eq!(buf.composing_region(), Some((6, 10)));
        buf.commit_text("world", 1);
        assert_eq!(buf.text(), "hello world");

        buf.set_composing_region(3, 3);
        assert_eq!(buf.composing_region(), None);
    }

    #[test]
    fn test_finish_composing_keeps_text() {
        let mut buf = EditBuffer::new();
        buf.set_composing_text("abc", 1);
        buf.finish_composing_text();
        assert_eq!(buf.text(), "abc");
        assert_eq!(buf.composing_region(), None);
    }

    #[test]
    fn test_delete_surrounding_keeps_selection() {
        let mut buf = EditBuffer::with_text("Hello");
        buf.delete_surrounding_text(2, 1);
        assert_eq!(buf.text(), "Hel");
        assert_eq!(buf.selection(), (3, 3));

        let mut buf = EditBuffer::with_text("abcdef");
        buf.set_selection(2, 4);
        buf.delete_surrounding_text(1, 1);
        assert_eq!(buf.text(), "acdf");
        assert_eq!(buf.selection(), (1, 3));
    }

    #[test]
    fn test_delete_surrounding_takes_whole_surrogate_pair() {
        let mut buf = EditBuffer::with_text("a😀");
        buf.delete_surrounding_text(1, 0);
        assert_eq!(buf.text(), "a");

        let mut buf = EditBuffer::with_text("😀b");
        buf.set_selection(0, 0);
        buf.delete_surrounding_text(0, 1);
        assert_eq!(buf.text(), "b");
    }

    #[test]
    fn test_delete_in_code_points() {
        let mut buf = EditBuffer::with_text("x😀y");
        buf.delete_surrounding_text_in_code_points(2, 0);
        assert_eq!(buf.text(), "x");
        assert_eq!(buf.selection(), (1, 1));
    }

    #[test]
    fn test_out_of_range_selection_ignored() {
        let mut buf = EditBuffer::with_text("abc");
        buf.set_selection(1, 9);
        assert_eq!(buf.selection(), (3, 3));
        buf.set_selection(3, 1);
        assert_eq!(buf.selection(), (3, 1));
        assert_eq!(buf.selection_range(), 1..3);
        assert_eq!(buf.selected_text().as_deref(), Some("bc"));
    }

    #[test]
    fn test_text_around_cursor_counts_utf16() {
        let mut buf = EditBuffer::with_text("ab😀cd");
        buf.set_selection(4, 4);
        assert_eq!(buf.text_before_cursor(2), "😀");
        // one unit would split the pair, so nothing is returned for it
        assert_eq!(buf.text_before_cursor(1), "");
        assert_eq!(buf.text_before_cursor(99), "ab😀");
        assert_eq!(buf.text_after_cursor(1), "c");
        assert_eq!(buf.selected_text(), None);
    }

    #[test]
    fn test_batch_reports_net_change_once() {
        let mut buf = EditBuffer::with_text("abc");
        assert!(buf.take_change().is_none());

        buf.begin_batch_edit();
        buf.begin_batch_edit();
        buf.commit_text("d", 1);
        assert!(buf.end_batch_edit());
        buf.delete_backward();
        buf.commit_text("e", 1);
        assert!(buf.take_change().is_none());
        assert!(!buf.end_batch_edit());

        let change = buf.take_change().unwrap();
        assert_eq!(change.before, "abc");
        assert_eq!(change.after, "abce");
        assert_eq!(change.selection, (4, 4));
        assert!(buf.take_change().is_none());
    }

    #[test]
    fn test_no_op_is_not_a_change() {
        let mut buf = EditBuffer::with_text("abc");
        buf.set_selection(3, 3);
        assert!(buf.take_change().is_none());

        buf.set_selection(1, 1);
        let change = buf.take_change().unwrap();
        assert!(!change.text_changed());
        assert!(change.selection_changed());
    }

    #[test]
    fn test_unbalanced_end_batch() {
        let mut buf = EditBuffer::new();
        assert!(!buf.end_batch_edit());
        assert!(!buf.in_batch_edit());
    }

    #[test]
    fn test_caps_mode() {
        let all = CapsMode::CHARACTERS | CapsMode::WORDS | CapsMode::SENTENCES;

        let buf = EditBuffer::new();
        let words_and_sentences = CapsMode::WORDS | CapsMode::SENTENCES;
        assert_eq!(buf.cursor_caps_mode(words_and_sentences), words_and_sentences);

        let buf = EditBuffer::with_text("Hello. ");
        assert_eq!(buf.cursor_caps_mode(all), all);

        let buf = EditBuffer::with_text("Hello there");
        assert_eq!(buf.cursor_caps_mode(all), CapsMode::CHARACTERS);

        let buf = EditBuffer::with_text("Hello there ");
        assert_eq!(buf.cursor_caps_mode(all), CapsMode::CHARACTERS | CapsMode::WORDS);

        let buf = EditBuffer::with_text("Really?\" (");
        assert_eq!(buf.cursor_caps_mode(CapsMode::SENTENCES), CapsMode::SENTENCES);

        let buf = EditBuffer::with_text("e.g.");
        assert_eq!(buf.cursor_caps_mode(CapsMode::SENTENCES), CapsMode::empty());
    }

    #[test]
    fn test_traverse_words() {
        let mut buf = EditBuffer::with_text("one two three");
        buf.set_selection(0, 0);
        assert_eq!(buf.traverse(Granularity::Word, true, false), Some((0, 3)));
        assert_eq!(buf.traverse(Granularity::Word, true, true), Some((4, 7)));
        assert_eq!(buf.selection(), (3, 7));
        assert_eq!(buf.traverse(Granularity::Word, false, false), Some((4, 7)));
        assert_eq!(buf.selection(), (4, 4));
        assert_eq!(buf.traverse(Granularity::Page, true, false), None);
    }

    #[test]
    fn test_extracted_text() {
        let mut buf = EditBuffer::with_text("line one\nline two");
        buf.set_selection(5, 2);
        let extracted = buf.extracted_text(&ExtractedTextRequest::default());
        assert_eq!(extracted.text, "line one\nline two");
        assert_eq!((extracted.selection_start, extracted.selection_end), (2, 5));
        assert!(!extracted.single_line);
    }
}
