use serde::{Deserialize, Serialize};

/// Half-open `[start, end)` range of character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// True when the two spans share at least one character.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps between character offsets and byte offsets of a string.
///
/// Annotation offsets count Unicode scalar values, while Rust slices and regex
/// matches work in bytes.
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every char boundary, including `text.len()` at the end.
    boundaries: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        boundaries.push(text.len());
        Self { text, boundaries }
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.boundaries.get(char_offset).copied()
    }

    /// Character offset of a byte offset that sits on a char boundary.
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.boundaries.binary_search(&byte_offset).ok()
    }

    /// Slice by character offsets; `None` unless `start <= end <= char_len`.
    pub fn slice(&self, start: usize, end: usize) -> Option<&'a str> {
        if start > end {
            return None;
        }
        let from = self.byte_offset(start)?;
        let to = self.byte_offset(end)?;
        Some(&self.text[from..to])
    }

    /// Character span of a byte range, e.g. a regex match.
    pub fn span_of_bytes(&self, start: usize, end: usize) -> Option<Span> {
        Some(Span::new(self.char_offset(start)?, self.char_offset(end)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_any_intersection() {
        let a = Span::new(0, 12);

        assert!(a.overlaps(&Span::new(0, 5)));
        assert!(a.overlaps(&Span::new(11, 20)));
        assert!(a.overlaps(&Span::new(3, 4)));
        assert!(!a.overlaps(&Span::new(12, 20)));
        assert!(!Span::new(5, 10).overlaps(&Span::new(0, 5)));
    }

    #[test]
    fn test_ascii_slice() {
        let index = CharIndex::new("Hypertension is treated with amlodipine.");

        assert_eq!(index.slice(0, 12), Some("Hypertension"));
        assert_eq!(index.slice(29, 39), Some("amlodipine"));
        assert_eq!(index.slice(0, 41), None);
        assert_eq!(index.slice(5, 2), None);
    }

    #[test]
    fn test_multibyte_offsets_count_chars() {
        let text = "Dosis: 5 µg café";
        let index = CharIndex::new(text);

        assert_eq!(index.char_len(), 16);
        assert_eq!(index.slice(9, 11), Some("µg"));
        assert_eq!(index.slice(12, 16), Some("café"));

        let byte_start = text.find("café").unwrap();
        assert_eq!(
            index.span_of_bytes(byte_start, text.len()),
            Some(Span::new(12, 16))
        );
        // Byte 10 is inside the two-byte 'µ'.
        assert_eq!(index.char_offset(10), None);
    }

    #[test]
    fn test_empty_text() {
        let index = CharIndex::new("");

        assert_eq!(index.char_len(), 0);
        assert_eq!(index.slice(0, 0), Some(""));
        assert_eq!(index.slice(0, 1), None);
    }
}
