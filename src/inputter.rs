use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Cursor-aware text state for the live search box. Unlike a command line
/// there is no submit step: the caller pushes every text change downstream
/// the moment it happens.
#[derive(Default)]
pub struct SearchInput {
    text: String,
    cursor: usize, // position in chars, not bytes
}

impl SearchInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply one key event; returns true when the text itself changed.
    /// Cursor movement alone is not a change.
    pub fn read(&mut self, key: KeyEvent) -> bool {
        match (key.code, key.modifiers) {
            (KeyCode::Backspace, KeyModifiers::NONE) => self.backspace(),
            (KeyCode::Left, KeyModifiers::NONE) => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            (KeyCode::Right, KeyModifiers::NONE) => {
                if self.cursor < self.text.chars().count() {
                    self.cursor += 1;
                }
                false
            }
            (code, KeyModifiers::NONE | KeyModifiers::SHIFT) => self.insert(code),
            _ => false,
        }
    }

    fn insert(&mut self, code: KeyCode) -> bool {
        if let Some(chr) = code.as_char() {
            self.text.insert(self.byte_pos(), chr);
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_pos();
        self.text.remove(at);
        true
    }

    fn byte_pos(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}
