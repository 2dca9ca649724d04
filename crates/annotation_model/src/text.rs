//! Char-offset helpers
//!
//! Annotation offsets count Unicode scalar values, not bytes. These helpers
//! convert between the two so that slicing never splits a UTF-8 sequence.

/// Number of chars in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the char at `offset`.
///
/// `offset == char_len(text)` maps to `text.len()`. Returns `None` past the end.
pub fn byte_index(text: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }
    match text.char_indices().nth(offset) {
        Some((idx, _)) => Some(idx),
        None if char_len(text) == offset => Some(text.len()),
        None => None,
    }
}

/// Slice `text` by char offsets `[start, end)`
pub fn slice(text: &str, start: usize, end: usize) -> Option<&str> {
    if start > end {
        return None;
    }
    let from = byte_index(text, start)?;
    let to = from + byte_index(&text[from..], end - start)?;
    Some(&text[from..to])
}

/// Slice `text` from char offset `start` to the end
pub fn slice_from(text: &str, start: usize) -> Option<&str> {
    byte_index(text, start).map(|from| &text[from..])
}

/// Char offset corresponding to a byte index (e.g. one returned by `str::find`)
pub fn char_offset(text: &str, byte_idx: usize) -> usize {
    char_len(&text[..byte_idx.min(text.len())])
}
