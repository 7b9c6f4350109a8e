// Fixed-size token buffer shared with the host tokenizer.
//
// The host hands tokens in and takes results back through NUL-terminated
// buffers of MAX_TOKEN_LEN bytes. Anything longer is truncated at the same
// boundary every time: at most MAX_TOKEN_LEN - 1 bytes of text, cut back to
// the nearest UTF-8 character boundary, followed by the terminator.

use std::ffi::c_char;

/// Size of the host's token buffer in bytes, terminator included.
pub const MAX_TOKEN_LEN: usize = 256;

/// Longest text that fits in a [`TokenBuf`].
pub const MAX_TOKEN_BYTES: usize = MAX_TOKEN_LEN - 1;

/// Return the longest prefix of `s` that is at most `max_bytes` long and
/// ends on a character boundary.
pub fn clip(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// A NUL-terminated token of at most [`MAX_TOKEN_BYTES`] bytes.
///
/// The storage has a fixed address for the lifetime of the value, so a
/// pointer from [`TokenBuf::as_c_ptr`] stays valid until the next write.
#[derive(Clone)]
pub struct TokenBuf {
    bytes: [u8; MAX_TOKEN_LEN],
    len: usize,
}

impl TokenBuf {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_TOKEN_LEN],
            len: 0,
        }
    }

    /// Replace the contents with `text`, truncating if it does not fit.
    ///
    /// Returns `true` if the text was truncated.
    pub fn set(&mut self, text: &str) -> bool {
        let kept = clip(text, MAX_TOKEN_BYTES);
        self.bytes[..kept.len()].copy_from_slice(kept.as_bytes());
        self.bytes[kept.len()] = 0;
        self.len = kept.len();
        kept.len() < text.len()
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.bytes[0] = 0;
        self.len = 0;
    }

    /// The buffered text, without terminator.
    pub fn as_str(&self) -> &str {
        // Only whole characters are ever copied in.
        std::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// The buffered text including the terminating NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    /// Pointer to the NUL-terminated text, for handing back to C callers.
    pub fn as_c_ptr(&self) -> *const c_char {
        self.bytes.as_ptr().cast()
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for TokenBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TokenBuf").field(&self.as_str()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_copied_verbatim() {
        let mut buf = TokenBuf::new();
        assert!(!buf.set("дім"));
        assert_eq!(buf.as_str(), "дім");
        assert_eq!(buf.len(), "дім".len());
        assert_eq!(buf.as_bytes_with_nul().last(), Some(&0));
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let text = "a".repeat(MAX_TOKEN_BYTES);
        let mut buf = TokenBuf::new();
        assert!(!buf.set(&text));
        assert_eq!(buf.as_str(), text);
    }

    #[test]
    fn ascii_overflow_keeps_first_m_minus_one_bytes() {
        let text = "x".repeat(MAX_TOKEN_LEN + 40);
        let mut buf = TokenBuf::new();
        assert!(buf.set(&text));
        assert_eq!(buf.len(), MAX_TOKEN_BYTES);
        assert_eq!(buf.as_str(), &text[..MAX_TOKEN_BYTES]);
        assert_eq!(buf.as_bytes_with_nul().len(), MAX_TOKEN_LEN);
    }

    #[test]
    fn truncation_never_splits_a_character() {
        // Cyrillic letters are two bytes; 255 is odd so the cut moves back one.
        let text = "ж".repeat(200);
        let mut buf = TokenBuf::new();
        assert!(buf.set(&text));
        assert_eq!(buf.len(), 254);
        assert_eq!(buf.as_str().chars().count(), 127);
    }

    #[test]
    fn truncation_is_deterministic() {
        let text = "дім".repeat(100);
        let mut a = TokenBuf::new();
        let mut b = TokenBuf::new();
        a.set(&text);
        b.set("something else first");
        b.set(&text);
        assert_eq!(a.as_bytes_with_nul(), b.as_bytes_with_nul());
    }

    #[test]
    fn shorter_write_after_longer_is_terminated() {
        let mut buf = TokenBuf::new();
        buf.set("довге слово");
        buf.set("ні");
        assert_eq!(buf.as_bytes_with_nul(), "ні\0".as_bytes());
    }

    #[test]
    fn clear_empties() {
        let mut buf = TokenBuf::new();
        buf.set("дома");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.as_str(), "");
    }

    #[test]
    fn clip_respects_boundaries() {
        assert_eq!(clip("дім", 10), "дім");
        assert_eq!(clip("дім", 3), "д");
        assert_eq!(clip("дім", 4), "ді");
        assert_eq!(clip("", 0), "");
    }
}
