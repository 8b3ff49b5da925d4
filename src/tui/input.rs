//! Input field handling for the terminal user interface.

/// A single-line text input. `cursor` counts characters, not bytes, so
/// accented and other non-ASCII text edits correctly.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an input field with initial text value, cursor at the end.
    pub fn with_value(value: &str) -> Self {
        Self {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text_by_character() {
        let mut field = InputField::with_value("ação");
        assert_eq!(field.cursor, 4);
        field.handle_backspace();
        assert_eq!(field.value, "açã");
        field.move_cursor_left();
        field.handle_char('x');
        assert_eq!(field.value, "açxã");
        field.move_home();
        field.handle_delete();
        assert_eq!(field.value, "çxã");
        field.move_end();
        field.handle_char('!');
        assert_eq!(field.value, "çxã!");
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut field = InputField::new();
        field.move_cursor_left();
        field.move_cursor_right();
        field.handle_backspace();
        field.handle_delete();
        assert_eq!(field.cursor, 0);
        field.handle_char('a');
        field.move_cursor_right();
        assert_eq!(field.cursor, 1);
        field.clear();
        assert_eq!(field.value, "");
        assert_eq!(field.cursor, 0);
    }
}
