/// The smallest span that turns one text snapshot into another, in UTF-16
/// code units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChangeDiff {
    pub from_index: usize,
    pub removed_count: usize,
    pub added_count: usize,
}

impl TextChangeDiff {
    pub fn first_difference_index(&self) -> usize {
        self.from_index
    }

    /// Diff two strings by their UTF-16 encoding. `None` if identical.
    pub fn between(before: &str, after: &str) -> Option<Self> {
        let before: Vec<u16> = before.encode_utf16().collect();
        let after: Vec<u16> = after.encode_utf16().collect();
        Self::between_units(&before, &after)
    }

    /// Common-prefix, then common-suffix scan that never crosses back over
    /// the prefix in either sequence.
    pub fn between_units<T: PartialEq>(before: &[T], after: &[T]) -> Option<Self> {
        let first = before
            .iter()
            .zip(after)
            .take_while(|(a, b)| a == b)
            .count();
        if first == before.len() && first == after.len() {
            return None;
        }

        let mut old_end = before.len();
        let mut new_end = after.len();
        while old_end > first && new_end > first && before[old_end - 1] == after[new_end - 1] {
            old_end -= 1;
            new_end -= 1;
        }

        Some(Self {
            from_index: first,
            removed_count: old_end - first,
            added_count: new_end - first,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(a: &str, b: &str) -> Option<(usize, usize, usize)> {
        TextChangeDiff::between(a, b).map(|d| (d.from_index, d.removed_count, d.added_count))
    }

    #[test]
    fn replaced_word() {
        assert_eq!(diff("hello world", "hello there"), Some((6, 5, 5)));
    }

    #[test]
    fn identical_emits_nothing() {
        assert_eq!(diff("abc", "abc"), None);
        assert_eq!(diff("", ""), None);
    }

    #[test]
    fn insert_into_empty() {
        assert_eq!(diff("", "x"), Some((0, 0, 1)));
        assert_eq!(diff("x", ""), Some((0, 1, 0)));
    }

    #[test]
    fn repeated_chars_do_not_overlap_prefix() {
        // Suffix scan stops at the prefix, so "aa" -> "aaa" is one insertion
        // after the common "aa".
        assert_eq!(diff("aa", "aaa"), Some((2, 0, 1)));
        assert_eq!(diff("aaa", "aa"), Some((2, 1, 0)));
    }

    #[test]
    fn counts_surrogate_pairs_as_two_units() {
        assert_eq!(diff("a😀", "a"), Some((1, 2, 0)));
        assert_eq!(diff("😀b", "😀c"), Some((2, 1, 1)));
    }

    #[test]
    fn prefix_and_suffix_reconstruct_after() {
        let cases = [
            ("the quick fox", "the slow fox"),
            ("abc", "xabcx"),
            ("mississippi", "misissippi"),
        ];
        for (a, b) in cases {
            let d = TextChangeDiff::between(a, b).unwrap();
            let a16: Vec<u16> = a.encode_utf16().collect();
            let b16: Vec<u16> = b.encode_utf16().collect();
            let mut rebuilt = a16[..d.from_index].to_vec();
            rebuilt.extend_from_slice(&b16[d.from_index..d.from_index + d.added_count]);
            rebuilt.extend_from_slice(&a16[d.from_index + d.removed_count..]);
            assert_eq!(rebuilt, b16, "{a:?} -> {b:?}");
        }
    }
}
