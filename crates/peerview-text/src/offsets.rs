//! Conversions between byte offsets (how Rust strings index) and UTF-16 /
//! code point counts (how input methods and assistive services index).
//!
//! UTF-16 offsets that land inside a surrogate pair are snapped to a char
//! boundary; callers pick the direction.

use unicode_segmentation::UnicodeSegmentation;

pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

pub fn byte_to_utf16(s: &str, byte: usize) -> usize {
    let byte = clamp_to_char_boundary(s, byte);
    utf16_len(&s[..byte])
}

/// Byte offset of a UTF-16 offset, rounding down out of a surrogate pair.
/// Offsets past the end clamp to `s.len()`.
pub fn utf16_to_byte_floor(s: &str, utf16: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.char_indices() {
        if units + c.len_utf16() > utf16 {
            return i;
        }
        units += c.len_utf16();
    }
    s.len()
}

/// Like [`utf16_to_byte_floor`], but rounds up.
pub fn utf16_to_byte_ceil(s: &str, utf16: usize) -> usize {
    let mut units = 0;
    for (i, c) in s.char_indices() {
        if units >= utf16 {
            return i;
        }
        units += c.len_utf16();
    }
    s.len()
}

/// Byte offset `n` code points back from `byte`, stopping at the start.
pub fn code_points_back(s: &str, byte: usize, n: usize) -> usize {
    s[..byte]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(byte, |(i, _)| i)
}

/// Byte offset `n` code points forward from `byte`, stopping at the end.
pub fn code_points_forward(s: &str, byte: usize, n: usize) -> usize {
    s[byte..]
        .char_indices()
        .nth(n)
        .map_or(s.len(), |(i, _)| byte + i)
}

pub(crate) fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut j = i;
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}

pub(crate) fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let byte = clamp_to_char_boundary(text, byte);
    text[..byte]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(i, _)| i)
}

pub(crate) fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    let byte = clamp_to_char_boundary(text, byte);
    text[byte..]
        .grapheme_indices(true)
        .nth(1)
        .map_or(text.len(), |(i, _)| byte + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_pairs_snap() {
        let s = "a😀b";
        assert_eq!(utf16_len(s), 4);
        assert_eq!(utf16_to_byte_floor(s, 2), 1);
        assert_eq!(utf16_to_byte_ceil(s, 2), 5);
        assert_eq!(utf16_to_byte_floor(s, 3), 5);
        assert_eq!(utf16_to_byte_floor(s, 99), s.len());
        assert_eq!(byte_to_utf16(s, 5), 3);
    }

    #[test]
    fn code_point_steps() {
        let s = "x😀yz";
        assert_eq!(code_points_back(s, s.len(), 2), 5);
        assert_eq!(code_points_back(s, s.len(), 9), 0);
        assert_eq!(code_points_forward(s, 0, 2), 5);
        assert_eq!(code_points_forward(s, 0, 9), s.len());
        assert_eq!(code_points_back(s, 0, 3), 0);
    }

    #[test]
    fn grapheme_boundaries() {
        // thumbs up + skin tone modifier is one cluster
        let s = "A👍🏽B";
        let b = "A👍🏽".len();
        assert_eq!(prev_grapheme_boundary(s, b), 1);
        assert_eq!(next_grapheme_boundary(s, 1), b);
        assert_eq!(next_grapheme_boundary(s, s.len()), s.len());
        assert_eq!(prev_grapheme_boundary(s, 0), 0);
    }
}
