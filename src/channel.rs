use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::trace;

pub const TOPIC_KEYWORD: &str = "keyword";
pub const TOPIC_RESULTS: &str = "results";

/// Payloads carried on a channel. `Keyword` is the current search text,
/// `Results` the number of rows the table last rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Keyword(String),
    Results(usize),
}

type Handler = Rc<RefCell<dyn FnMut(&Payload)>>;

/// A named publish/subscribe bus. Everything runs on one thread; publish
/// delivers synchronously, in subscription order, to the subscribers present
/// at the moment of the call. There is no replay for late subscribers.
pub struct Channel {
    name: String,
    topics: RefCell<HashMap<String, Vec<(u64, Handler)>>>,
    next_id: Cell<u64>,
}

impl Channel {
    fn new(name: &str) -> Self {
        Channel {
            name: name.to_string(),
            topics: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn publish(&self, topic: &str, payload: Payload) {
        // Snapshot the handler list so a handler may publish on this same
        // channel without tripping over an active borrow.
        let handlers: Vec<Handler> = self
            .topics
            .borrow()
            .get(topic)
            .map(|subs| subs.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();

        trace!(
            "publish {}::{} to {} subscriber(s)",
            self.name,
            topic,
            handlers.len()
        );
        for handler in handlers {
            (handler.borrow_mut())(&payload);
        }
    }

    pub fn subscribe(
        self: &Rc<Self>,
        topic: &str,
        handler: impl FnMut(&Payload) + 'static,
    ) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.topics
            .borrow_mut()
            .entry(topic.to_string())
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        Subscription {
            channel: Rc::downgrade(self),
            topic: topic.to_string(),
            id,
        }
    }

    fn unsubscribe(&self, topic: &str, id: u64) {
        if let Some(subs) = self.topics.borrow_mut().get_mut(topic) {
            subs.retain(|(sid, _)| *sid != id);
        }
    }
}

/// Disposer returned by [`Channel::subscribe`]. Dropping it unregisters the
/// handler; a subscription never outlives its channel.
pub struct Subscription {
    channel: Weak<Channel>,
    topic: String,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.upgrade() {
            channel.unsubscribe(&self.topic, self.id);
        }
    }
}

/// Maps channel names to live channel instances. Two components configured
/// with the same name share exactly one [`Channel`]; a channel is created on
/// first reference and torn down once no component holds it any more (the
/// registry only keeps weak references).
#[derive(Default)]
pub struct ChannelRegistry {
    channels: RefCell<HashMap<String, Weak<Channel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(ChannelRegistry::default())
    }

    pub fn channel(&self, name: &str) -> Rc<Channel> {
        let mut channels = self.channels.borrow_mut();
        if let Some(existing) = channels.get(name).and_then(Weak::upgrade) {
            return existing;
        }
        trace!("creating channel \"{name}\"");
        let channel = Rc::new(Channel::new(name));
        channels.insert(name.to_string(), Rc::downgrade(&channel));
        channel
    }
}
