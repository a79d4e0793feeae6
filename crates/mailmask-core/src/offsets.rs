/// Maps between UTF-8 byte offsets and character offsets of one text.
///
/// The regex engine reports byte offsets; entity positions are exposed as
/// character offsets.
#[derive(Debug, Clone)]
pub struct TextIndex {
    /// Byte offset of every char, followed by the total byte length
    boundaries: Vec<usize>,
}

impl TextIndex {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the text
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Character offset of a byte offset. Must be on a char boundary.
    pub fn char_offset(&self, byte: usize) -> usize {
        match self.boundaries.binary_search(&byte) {
            Ok(idx) => idx,
            // Inside a multi-byte char: round down to its start
            Err(idx) => idx.saturating_sub(1),
        }
    }

    /// Byte offset of a character offset, `None` past the end
    pub fn byte_offset(&self, ch: usize) -> Option<usize> {
        self.boundaries.get(ch).copied()
    }
}
