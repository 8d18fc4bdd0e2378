use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::channel::{
    Channel, ChannelRegistry, Payload, Subscription, TOPIC_KEYWORD, TOPIC_RESULTS,
};
use crate::dataset::{Dataset, Row, cell_text, compute_filtered_view, enumerate_columns, title_case};
use crate::domain::FltError;
use crate::fetch::RowFetch;
use crate::provision::{ResourceProvisioner, Scope};

/// One fully built table structure: capitalized header labels and
/// string-coerced body cells, highlight markers still embedded. Each filter
/// pass discards the previous structure and builds a new one; there is no
/// partial update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn make_table(cols: &[String], rows: &[Row]) -> RenderedTable {
    RenderedTable {
        headers: cols.iter().map(|c| title_case(c)).collect(),
        rows: rows
            .iter()
            .map(|row| cols.iter().map(|c| cell_text(row.get(c))).collect())
            .collect(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Uninitialized,
    ResourcesLoading,
    Fetching,
    Rendered,
    Filtering,
}

struct TableInner {
    dataset: Dataset,
    columns: Vec<String>,
    rendered: RenderedTable,
    phase: Phase,
}

impl TableInner {
    fn refilter(&mut self, term: &str) -> usize {
        self.phase = Phase::Filtering;
        // Always from the full dataset; filters never accumulate, and the
        // column registry built at load time stays as-is.
        let view = compute_filtered_view(&self.dataset, term);
        self.rendered = make_table(&self.columns, &view);
        self.phase = Phase::Rendered;
        self.rendered.rows.len()
    }
}

/// The data table. Attaching provisions the scope, fetches the dataset,
/// derives the column registry, renders once and publishes the row count;
/// every `keyword` event afterwards re-filters the full dataset, rebuilds
/// the table and republishes `results`.
pub struct TableComponent {
    scope: Scope,
    inner: Rc<RefCell<TableInner>>,
    channel: Option<Rc<Channel>>,
    _keyword_sub: Option<Subscription>,
}

impl TableComponent {
    pub fn attach(
        registry: &ChannelRegistry,
        channel_name: Option<&str>,
        url: &str,
        provisioner: &dyn ResourceProvisioner,
        fetcher: &dyn RowFetch,
    ) -> Result<Self, FltError> {
        let inner = Rc::new(RefCell::new(TableInner {
            dataset: Dataset::new(),
            columns: Vec::new(),
            rendered: RenderedTable::default(),
            phase: Phase::Uninitialized,
        }));
        let mut scope = Scope::default();

        inner.borrow_mut().phase = Phase::ResourcesLoading;
        provisioner.provision(&mut scope)?;

        inner.borrow_mut().phase = Phase::Fetching;
        trace!("attach: {:?} from {url}", Phase::Fetching);
        let dataset = fetcher.fetch_rows(url);
        if dataset.is_empty() {
            debug!("dataset from {url} is empty, rendering a bare table");
        }

        let count = {
            let mut guard = inner.borrow_mut();
            let inner = &mut *guard;
            inner.columns = enumerate_columns(&dataset);
            inner.rendered = make_table(&inner.columns, &dataset);
            inner.dataset = dataset;
            inner.phase = Phase::Rendered;
            inner.rendered.rows.len()
        };

        let channel = channel_name.map(|name| registry.channel(name));
        let keyword_sub = channel.as_ref().map(|ch| {
            let inner = Rc::clone(&inner);
            let results_channel = Rc::clone(ch);
            ch.subscribe(TOPIC_KEYWORD, move |payload| {
                if let Payload::Keyword(term) = payload {
                    let count = inner.borrow_mut().refilter(term);
                    results_channel.publish(TOPIC_RESULTS, Payload::Results(count));
                }
            })
        });

        // Initial render done; report what we drew.
        if let Some(ch) = &channel {
            ch.publish(TOPIC_RESULTS, Payload::Results(count));
        }

        Ok(TableComponent {
            scope,
            inner,
            channel,
            _keyword_sub: keyword_sub,
        })
    }

    pub fn rendered(&self) -> Ref<'_, RenderedTable> {
        Ref::map(self.inner.borrow(), |inner| &inner.rendered)
    }

    pub fn phase(&self) -> Phase {
        self.inner.borrow().phase
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}
