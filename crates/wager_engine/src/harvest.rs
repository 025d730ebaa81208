use async_trait::async_trait;
use engine_logging::engine_debug;
use scraper::Html;
use wager_core::{HarvestState, Record};

use crate::extract::SiteExtractor;
use crate::page::PageHost;
use crate::scroll::StepHook;

/// Collects records from a virtualized list while it scrolls.
///
/// Cards leave the DOM once they scroll out of view, so every visible card is
/// merged into `state` after each scroll step. A later sighting of the same id
/// overwrites the earlier values.
pub struct IncrementalHarvester<'a> {
    host: &'a dyn PageHost,
    site: &'a dyn SiteExtractor,
    state: &'a mut HarvestState,
}

impl<'a> IncrementalHarvester<'a> {
    pub fn new(
        host: &'a dyn PageHost,
        site: &'a dyn SiteExtractor,
        state: &'a mut HarvestState,
    ) -> Self {
        Self { host, site, state }
    }

    /// Parses the host's current document. Returns the number of new ids.
    pub async fn harvest_visible(&mut self) -> usize {
        let html = self.host.snapshot().await;
        self.harvest_html(&html)
    }

    pub fn harvest_html(&mut self, html: &str) -> usize {
        let doc = Html::parse_document(html);
        self.harvest_document(&doc)
    }

    pub fn harvest_document(&mut self, doc: &Html) -> usize {
        let mut added = 0;
        for (id, record) in self.site.parse_identified(doc) {
            if self.state.merge(id, record) {
                added += 1;
            }
        }
        engine_debug!(
            "Harvested {} new records ({} total) from {}",
            added,
            self.state.len(),
            self.site.key()
        );
        added
    }

    /// Runs one last pass over the current document, then drains the state.
    pub async fn finalize(&mut self) -> Vec<Record> {
        self.harvest_visible().await;
        self.state.take_records()
    }

    pub fn reset(&mut self) {
        self.state.clear();
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

#[async_trait(?Send)]
impl StepHook for IncrementalHarvester<'_> {
    async fn on_step(&mut self, _step: u32) {
        self.harvest_visible().await;
    }
}
