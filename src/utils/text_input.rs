use unicode_width::UnicodeWidthStr;

/// Single line editable text with a byte cursor that always sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    buffer: String,
    cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Terminal columns between the start of the text and the cursor.
    pub fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }

    pub fn insert(&mut self, c: char) {
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Returns whether anything was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let prev = prev_char_boundary(&self.buffer, self.cursor);
        self.buffer.drain(prev..self.cursor);
        self.cursor = prev;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.len() {
            return false;
        }
        let next = next_char_boundary(&self.buffer, self.cursor);
        self.buffer.drain(self.cursor..next);
        true
    }

    /// Remove the word before the cursor (Ctrl+W / Alt+Backspace).
    pub fn delete_word(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let start = prev_word_boundary(&self.buffer, self.cursor);
        self.buffer.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = prev_char_boundary(&self.buffer, self.cursor);
    }

    pub fn move_right(&mut self) {
        self.cursor = next_char_boundary(&self.buffer, self.cursor);
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.len();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

pub fn prev_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index == 0 {
        return 0;
    }
    s.char_indices()
        .rev()
        .find(|(i, _)| *i < byte_index)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn next_char_boundary(s: &str, byte_index: usize) -> usize {
    if byte_index >= s.len() {
        return s.len();
    }
    s.char_indices()
        .find(|(i, _)| *i > byte_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn prev_word_boundary(s: &str, byte_index: usize) -> usize {
    let chars: Vec<(usize, char)> = s.char_indices().take_while(|(i, _)| *i < byte_index).collect();
    let mut pos = chars.len();
    while pos > 0 && !is_word_char(chars[pos - 1].1) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(chars[pos - 1].1) {
        pos -= 1;
    }
    chars.get(pos).map(|(i, _)| *i).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> TextInput {
        let mut input = TextInput::new();
        s.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn test_insert_and_backspace_multibyte() {
        let mut input = typed("aöb");
        assert_eq!(input.cursor(), 4);
        input.move_left();
        assert!(input.backspace());
        assert_eq!(input.as_str(), "ab");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut input = typed("x");
        input.move_home();
        assert!(!input.backspace());
        assert_eq!(input.as_str(), "x");
    }

    #[test]
    fn test_delete_at_cursor() {
        let mut input = typed("rune");
        input.move_home();
        assert!(input.delete());
        assert_eq!(input.as_str(), "une");
        input.move_end();
        assert!(!input.delete());
    }

    #[test]
    fn test_delete_word() {
        let mut input = typed("sigil of force");
        assert!(input.delete_word());
        assert_eq!(input.as_str(), "sigil of ");
        assert!(input.delete_word());
        assert_eq!(input.as_str(), "sigil ");
    }

    #[test]
    fn test_cursor_column_counts_wide_chars() {
        let input = typed("ab");
        assert_eq!(input.cursor_column(), 2);
        let wide = typed("日本");
        assert_eq!(wide.cursor_column(), 4);
    }

    #[test]
    fn test_char_boundaries() {
        let s = "aöb";
        assert_eq!(prev_char_boundary(s, 3), 1);
        assert_eq!(next_char_boundary(s, 1), 3);
        assert_eq!(next_char_boundary(s, 4), 4);
    }

    #[test]
    fn test_prev_word_boundary() {
        let s = "hello world test";
        assert_eq!(prev_word_boundary(s, 16), 12);
        assert_eq!(prev_word_boundary(s, 12), 6);
        assert_eq!(prev_word_boundary(s, 3), 0);
        assert_eq!(prev_word_boundary(s, 0), 0);
    }
}
