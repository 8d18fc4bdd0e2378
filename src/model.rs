use std::rc::Rc;

use tracing::info;

use crate::channel::ChannelRegistry;
use crate::domain::{FltConfig, FltError, Message};
use crate::fetch::RowFetch;
use crate::provision::SequentialProvisioner;
use crate::search::SearchComponent;
use crate::table::TableComponent;

/// Styles provisioned into each component's scope. The UI reads `mark=...`
/// back as the highlight colour for matched substrings.
pub const DEFAULT_STYLES: [&str; 1] = ["mark=yellow"];

#[derive(Debug, PartialEq)]
pub enum Status {
    RUNNING,
    QUITTING,
}

/// The host side: owns the channel registry and both components and routes
/// controller messages. Everything runs on one thread; each message is
/// handled to completion before the next one is read.
pub struct Model {
    pub status: Status,
    _registry: Rc<ChannelRegistry>,
    pub search: SearchComponent,
    pub table: TableComponent,
}

impl Model {
    /// Register both components. The search component attaches first so its
    /// `results` subscription is in place when the table publishes the row
    /// count of its initial render.
    pub fn attach(config: &FltConfig, fetcher: &dyn RowFetch) -> Result<Self, FltError> {
        let registry = ChannelRegistry::new();
        let provisioner =
            SequentialProvisioner::new(DEFAULT_STYLES.iter().map(|s| s.to_string()).collect());

        let channel = config.channel.as_deref();
        let search = SearchComponent::attach(&registry, channel, &provisioner)?;
        let table =
            TableComponent::attach(&registry, channel, &config.url, &provisioner, fetcher)?;
        info!(
            "attached search and table on channel {:?}",
            channel.unwrap_or("<solo>")
        );

        Ok(Model {
            status: Status::RUNNING,
            _registry: registry,
            search,
            table,
        })
    }

    pub fn update(&mut self, message: Message) -> Result<(), FltError> {
        match message {
            Message::Quit => self.status = Status::QUITTING,
            Message::RawKey(key) => self.search.on_key(key),
            // The whole frame is redrawn every pass, nothing to relayout.
            Message::Resize(_, _) => {}
        }
        Ok(())
    }
}
