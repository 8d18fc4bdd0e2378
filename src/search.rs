use std::cell::Cell;
use std::rc::Rc;

use ratatui::crossterm::event::KeyEvent;
use tracing::trace;

use crate::channel::{
    Channel, ChannelRegistry, Payload, Subscription, TOPIC_KEYWORD, TOPIC_RESULTS,
};
use crate::domain::FltError;
use crate::inputter::SearchInput;
use crate::provision::{ResourceProvisioner, Scope};

pub const PLACEHOLDER: &str = "Search...";

/// The search box. Attaching provisions its scope first; only then does it
/// become interactive. Every text change publishes the full current text as
/// one `keyword` event, without debouncing or validation. A `results` event
/// on the same channel updates the visible counter label.
pub struct SearchComponent {
    scope: Scope,
    input: SearchInput,
    count: Rc<Cell<usize>>,
    channel: Option<Rc<Channel>>,
    _results_sub: Option<Subscription>,
}

impl SearchComponent {
    pub fn attach(
        registry: &ChannelRegistry,
        channel_name: Option<&str>,
        provisioner: &dyn ResourceProvisioner,
    ) -> Result<Self, FltError> {
        let mut scope = Scope::default();
        provisioner.provision(&mut scope)?;

        // No channel name means solo mode: never publish, never subscribe.
        let channel = channel_name.map(|name| registry.channel(name));
        let count = Rc::new(Cell::new(0usize));
        let results_sub = channel.as_ref().map(|ch| {
            let count = Rc::clone(&count);
            ch.subscribe(TOPIC_RESULTS, move |payload| {
                if let Payload::Results(n) = payload {
                    count.set(*n);
                }
            })
        });

        Ok(SearchComponent {
            scope,
            input: SearchInput::default(),
            count,
            channel,
            _results_sub: results_sub,
        })
    }

    /// Feed one key event into the input. Each keystroke that changes the
    /// text is a separate round trip through the filter pipeline.
    pub fn on_key(&mut self, key: KeyEvent) {
        if self.input.read(key) {
            let text = self.input.text().to_string();
            trace!("search input changed to \"{text}\"");
            if let Some(channel) = &self.channel {
                channel.publish(TOPIC_KEYWORD, Payload::Keyword(text));
            }
        }
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    /// Row count from the most recent `results` event.
    pub fn result_count(&self) -> usize {
        self.count.get()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
