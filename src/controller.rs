use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};
use tracing::trace;

use crate::domain::{FltConfig, FltError, Message};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &FltConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self) -> Result<Option<Message>, FltError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    return Ok(self.handle_key(key));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width, height)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Some(Message::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            // Everything else belongs to the search input.
            _ => Some(Message::RawKey(key)),
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEvent;

    fn controller() -> Controller {
        Controller::new(&FltConfig {
            url: String::new(),
            channel: None,
            event_poll_time: 0,
        })
    }

    #[test]
    fn escape_quits() {
        let msg = controller().handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(msg, Some(Message::Quit));
    }

    #[test]
    fn ctrl_c_quits() {
        let msg =
            controller().handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(msg, Some(Message::Quit));
    }

    #[test]
    fn plain_keys_are_forwarded_raw() {
        let key = KeyEvent::new(KeyCode::Char('i'), KeyModifiers::NONE);
        assert_eq!(controller().handle_key(key), Some(Message::RawKey(key)));
    }
}
