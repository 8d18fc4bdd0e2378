use std::io::Error;

use ratatui::crossterm::event::KeyEvent;

/// Errors that can abort the viewer itself. Dataset problems never show up
/// here: a bad fetch degrades to an empty table instead of failing.
#[derive(Debug)]
pub enum FltError {
    IoError(Error),
    /// A sequential provisioning step failed; the component owning that
    /// scope never becomes interactive.
    Provision(String),
}

impl From<Error> for FltError {
    fn from(err: Error) -> Self {
        FltError::IoError(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    RawKey(KeyEvent),
    Resize(u16, u16),
}

/// Runtime configuration for the viewer, filled from CLI flags.
#[derive(Debug, Clone)]
pub struct FltConfig {
    /// Dataset endpoint. Anything but a 200 with a JSON array renders as
    /// an empty table.
    pub url: String,
    /// Channel name shared by the search and table components. `None`
    /// leaves both in solo mode.
    pub channel: Option<String>,
    pub event_poll_time: u64,
}
