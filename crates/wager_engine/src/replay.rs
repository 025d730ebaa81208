//! A recorded page: one HTML frame per scroll position.
//!
//! Scrolling to the end advances to the next frame, which makes the replay a
//! stand-in for a live tab in tests and in the command-line tool.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::mpsc;

use crate::page::{ContainerMetrics, MutationBatch, PageHost, ScrollCandidate, ScrollTarget};

pub struct ReplayPage {
    url: String,
    frames: Vec<String>,
    cursor: Cell<usize>,
    candidates: Vec<ScrollCandidate>,
    fixed_height: Option<u64>,
    emit_mutations: bool,
    watchers: RefCell<Vec<mpsc::UnboundedSender<MutationBatch>>>,
    snapshots: Cell<usize>,
    scrolls: Cell<usize>,
}

impl ReplayPage {
    pub fn new(url: impl Into<String>, frames: Vec<String>) -> Self {
        Self {
            url: url.into(),
            frames,
            cursor: Cell::new(0),
            candidates: Vec::new(),
            fixed_height: None,
            emit_mutations: true,
            watchers: RefCell::new(Vec::new()),
            snapshots: Cell::new(0),
            scrolls: Cell::new(0),
        }
    }

    /// Single static frame; scrolling never reveals anything new.
    pub fn single(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self::new(url, vec![html.into()])
    }

    pub fn with_candidates(mut self, candidates: Vec<ScrollCandidate>) -> Self {
        self.candidates = candidates;
        self
    }

    /// Report the same content height for every frame, like a virtualized list
    /// that recycles a fixed-size window.
    pub fn with_fixed_height(mut self, height: u64) -> Self {
        self.fixed_height = Some(height);
        self
    }

    /// Suppress subtree mutation notifications on frame changes.
    pub fn without_mutations(mut self) -> Self {
        self.emit_mutations = false;
        self
    }

    pub fn frame_index(&self) -> usize {
        self.cursor.get()
    }

    pub fn snapshot_count(&self) -> usize {
        self.snapshots.get()
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.get()
    }

    fn current(&self) -> &str {
        self.frames
            .get(self.cursor.get())
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn notify(&self, batch: MutationBatch) {
        if !self.emit_mutations || !batch.is_structural() {
            return;
        }
        self.watchers
            .borrow_mut()
            .retain(|watcher| watcher.send(batch).is_ok());
    }
}

#[async_trait(?Send)]
impl PageHost for ReplayPage {
    fn url(&self) -> String {
        self.url.clone()
    }

    async fn snapshot(&self) -> String {
        self.snapshots.set(self.snapshots.get() + 1);
        self.current().to_string()
    }

    async fn scroll_candidates(&self) -> Vec<ScrollCandidate> {
        self.candidates.clone()
    }

    async fn scroll_to_end(&self, _target: &ScrollTarget) {
        self.scrolls.set(self.scrolls.get() + 1);
        let next = self.cursor.get() + 1;
        if next >= self.frames.len() {
            return;
        }
        let before = body_element_count(self.current());
        let changed = self.frames[next] != self.frames[self.cursor.get()];
        self.cursor.set(next);
        let after = body_element_count(self.current());

        let mut batch = MutationBatch {
            added: after.saturating_sub(before),
            removed: before.saturating_sub(after),
        };
        if changed && !batch.is_structural() {
            // Same number of cards, different cards: a recycled window.
            batch = MutationBatch {
                added: 1,
                removed: 1,
            };
        }
        self.notify(batch);
    }

    async fn scroll_to_top(&self, _target: &ScrollTarget) {}

    async fn metrics(&self, _target: &ScrollTarget) -> ContainerMetrics {
        let html = self.current();
        ContainerMetrics {
            scroll_height: self.fixed_height.unwrap_or(html.len() as u64),
            child_count: body_element_count(html),
        }
    }

    fn watch_mutations(&self, _target: &ScrollTarget) -> mpsc::UnboundedReceiver<MutationBatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers.borrow_mut().push(tx);
        rx
    }
}

/// Number of element descendants of `<body>`, as a proxy for loaded content.
fn body_element_count(html: &str) -> usize {
    let doc = Html::parse_document(html);
    let Ok(body) = Selector::parse("body") else {
        return 0;
    };
    doc.select(&body)
        .next()
        .map(|body| {
            body.descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .count()
        })
        .unwrap_or(0)
}
