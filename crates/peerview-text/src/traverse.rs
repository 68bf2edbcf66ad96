use std::ops::Range;

use peerview_core::{Granularity, MovementGranularities};
use unicode_segmentation::UnicodeSegmentation;

/// Segments of `text` at `granularity`, as byte ranges in order.
///
/// Lines keep their trailing newline; paragraphs are the non-empty runs
/// between newlines. Words skip whitespace and punctuation. `None` for
/// granularities that need a layout (pages).
pub fn segments(text: &str, granularity: Granularity) -> Option<Vec<Range<usize>>> {
    let segments = match granularity {
        Granularity::Character => text
            .grapheme_indices(true)
            .map(|(i, g)| i..i + g.len())
            .collect(),
        Granularity::Word => text
            .split_word_bound_indices()
            .filter(|(_, w)| w.chars().any(char::is_alphanumeric))
            .map(|(i, w)| i..i + w.len())
            .collect(),
        Granularity::Line => text
            .split_inclusive('\n')
            .scan(0, |start, line| {
                let range = *start..*start + line.len();
                *start = range.end;
                Some(range)
            })
            .collect(),
        Granularity::Paragraph => text
            .split('\n')
            .scan(0, |start, para| {
                let range = *start..*start + para.len();
                *start = range.end + 1;
                Some(range)
            })
            .filter(|r| !r.is_empty())
            .collect(),
        Granularity::Page | Granularity::Other(_) => return None,
    };
    Some(segments)
}

/// Every granularity [`segments`] can split text at.
pub fn supported_granularities() -> MovementGranularities {
    MovementGranularities::all()
        .iter()
        .filter(|g| segments("", Granularity::from_raw(g.bits() as i32)).is_some())
        .collect()
}

/// The span moved over when stepping from `from` in the given direction, or
/// `None` at the edge of the text.
///
/// Moving forward out of the middle of a segment covers only its remainder;
/// moving backward covers only the part before `from`.
pub fn step(text: &str, from: usize, granularity: Granularity, forward: bool) -> Option<Range<usize>> {
    let segments = segments(text, granularity)?;
    if forward {
        segments
            .into_iter()
            .find(|r| r.end > from)
            .map(|r| r.start.max(from)..r.end)
    } else {
        segments
            .into_iter()
            .rev()
            .find(|r| r.start < from)
            .map(|r| r.start..r.end.min(from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs<'a>(text: &'a str, g: Granularity) -> Vec<&'a str> {
        segments(text, g)
            .unwrap()
            .into_iter()
            .map(|r| &text[r])
            .collect()
    }

    #[test]
    fn words_skip_spaces_and_punctuation() {
        assert_eq!(
            strs("Hello, brave new-world!", Granularity::Word),
            ["Hello", "brave", "new", "world"]
        );
    }

    #[test]
    fn lines_and_paragraphs() {
        let text = "one\ntwo\n\nthree";
        assert_eq!(strs(text, Granularity::Line), ["one\n", "two\n", "\n", "three"]);
        assert_eq!(strs(text, Granularity::Paragraph), ["one", "two", "three"]);
    }

    #[test]
    fn characters_are_graphemes() {
        assert_eq!(strs("e\u{301}x", Granularity::Character), ["e\u{301}", "x"]);
    }

    #[test]
    fn pages_need_layout() {
        assert!(segments("abc", Granularity::Page).is_none());
        let supported = supported_granularities();
        assert!(!supported.supports(Granularity::Page));
        assert_eq!(supported, MovementGranularities::all() - MovementGranularities::PAGE);
    }

    #[test]
    fn step_forward_and_back_by_word() {
        let text = "one two three";
        assert_eq!(step(text, 0, Granularity::Word, true), Some(0..3));
        assert_eq!(step(text, 3, Granularity::Word, true), Some(4..7));
        // from inside "two"
        assert_eq!(step(text, 5, Granularity::Word, true), Some(5..7));
        assert_eq!(step(text, 5, Granularity::Word, false), Some(4..5));
        assert_eq!(step(text, 13, Granularity::Word, true), None);
        assert_eq!(step(text, 0, Granularity::Word, false), None);
        assert_eq!(step(text, 13, Granularity::Word, false), Some(8..13));
    }
}
