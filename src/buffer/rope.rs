use ropey::Rope;

/// Text buffer using rope data structure, paired with the last-saved snapshot
#[derive(Debug, Clone)]
pub struct Buffer {
    text: Rope,
    saved: Rope,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            saved: Rope::new(),
        }
    }

    /// Create a buffer whose saved snapshot equals its content
    pub fn from_str(s: &str) -> Self {
        let text = Rope::from_str(s);
        Self {
            saved: text.clone(),
            text,
        }
    }

    /// Replace the whole content. Returns false if it was already equal.
    pub fn replace(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = Rope::from_str(text);
        true
    }

    /// Take the current content as the saved snapshot.
    /// Returns false if there was nothing unsaved.
    pub fn mark_saved(&mut self) -> bool {
        if !self.is_dirty() {
            return false;
        }
        self.saved = self.text.clone();
        true
    }

    /// Content differs from the last-saved snapshot
    pub fn is_dirty(&self) -> bool {
        self.text != self.saved
    }

    pub fn contents(&self) -> String {
        self.text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buf = Buffer::new();
        assert_eq!(buf.contents(), "");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_replace_marks_dirty() {
        let mut buf = Buffer::from_str("Hello");
        assert!(buf.replace("Hello World"));
        assert_eq!(buf.contents(), "Hello World");
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_replace_identical_is_noop() {
        let mut buf = Buffer::from_str("same");
        assert!(!buf.replace("same"));
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_revert_to_saved_is_clean() {
        let mut buf = Buffer::from_str("x");
        buf.replace("y");
        assert!(buf.is_dirty());
        buf.replace("x");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_mark_saved() {
        let mut buf = Buffer::from_str("a");
        assert!(!buf.mark_saved());
        buf.replace("b");
        assert!(buf.mark_saved());
        assert!(!buf.is_dirty());
        buf.replace("a");
        assert!(buf.is_dirty());
    }
}
