//! Record extraction over parsed page snapshots.
mod anchored;
mod chain;
mod heuristic;
pub mod normalize;

pub use anchored::{AnchoredSource, AnchoredTable};
pub use chain::{AriaSlot, AriaSummary, Locator, Matcher, Scope, SelectorChain};
pub use heuristic::{Companion, ContainerGuess, FinishFn, HeuristicTable, Target};

use regex::Regex;
use scraper::Html;
use wager_core::{Record, RecordId, RunFailure};

use crate::sites;

/// How a site renders its bet list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rendering {
    /// Every loaded card stays in the DOM.
    Static,
    /// Off-screen cards are removed; records must be harvested while scrolling.
    Virtualized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Anchored,
    Heuristic,
}

/// Capability every supported sportsbook provides.
pub trait SiteExtractor {
    /// Lowercase key reported with completed runs, e.g. `draftkings`.
    fn key(&self) -> &str;
    /// Display name written into [`Record::site`].
    fn name(&self) -> &str;
    fn matches_site(&self, url: &str) -> bool;
    /// Whether `url` is this site's bet-history view.
    fn is_valid_page(&self, url: &str) -> bool;
    fn wrong_page_hint(&self) -> &str;
    fn rendering(&self) -> Rendering;
    fn parse_identified(&self, doc: &Html) -> Vec<(RecordId, Record)>;

    fn parse_all(&self, doc: &Html) -> Vec<Record> {
        self.parse_identified(doc)
            .into_iter()
            .map(|(_, record)| record)
            .collect()
    }
}

/// Table-driven site description. Selector tables are data so markup changes
/// only touch the site module.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub key: &'static str,
    pub name: &'static str,
    pub site_pattern: Regex,
    pub history_pattern: Regex,
    pub wrong_page_hint: &'static str,
    pub rendering: Rendering,
    /// Strategies in precedence order; the first yielding records wins.
    pub strategies: Vec<Strategy>,
    pub anchored: Option<AnchoredTable>,
    pub heuristic: Option<HeuristicTable>,
}

impl SiteProfile {
    fn run_strategy(&self, strategy: Strategy, doc: &Html) -> Vec<(RecordId, Record)> {
        match strategy {
            Strategy::Anchored => self
                .anchored
                .as_ref()
                .map(|table| table.parse(doc, self.name))
                .unwrap_or_default(),
            Strategy::Heuristic => self
                .heuristic
                .as_ref()
                .map(|table| table.parse(doc, self.name))
                .unwrap_or_default(),
        }
    }
}

impl SiteExtractor for SiteProfile {
    fn key(&self) -> &str {
        self.key
    }

    fn name(&self) -> &str {
        self.name
    }

    fn matches_site(&self, url: &str) -> bool {
        self.site_pattern.is_match(url)
    }

    fn is_valid_page(&self, url: &str) -> bool {
        self.history_pattern.is_match(url)
    }

    fn wrong_page_hint(&self) -> &str {
        self.wrong_page_hint
    }

    fn rendering(&self) -> Rendering {
        self.rendering
    }

    fn parse_identified(&self, doc: &Html) -> Vec<(RecordId, Record)> {
        for strategy in &self.strategies {
            let found = self.run_strategy(*strategy, doc);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

/// Result of matching a page URL against the registry.
pub enum Detection<'a> {
    Supported(&'a dyn SiteExtractor),
    WrongPage(&'a dyn SiteExtractor),
    Unsupported,
}

impl<'a> Detection<'a> {
    /// The matched site, or the failure to report for this URL.
    pub fn into_result(self, url: &str) -> Result<&'a dyn SiteExtractor, RunFailure> {
        match self {
            Detection::Supported(site) => Ok(site),
            Detection::WrongPage(site) => Err(RunFailure::WrongPageOnSupportedSite {
                site: site.key().to_string(),
                hint: site.wrong_page_hint().to_string(),
            }),
            Detection::Unsupported => Err(RunFailure::UnsupportedSite {
                url: url.to_string(),
            }),
        }
    }
}

pub struct SiteRegistry {
    sites: Vec<Box<dyn SiteExtractor>>,
}

impl SiteRegistry {
    pub fn new(sites: Vec<Box<dyn SiteExtractor>>) -> Self {
        Self { sites }
    }

    pub fn detect(&self, url: &str) -> Detection<'_> {
        for site in &self.sites {
            if !site.matches_site(url) {
                continue;
            }
            return if site.is_valid_page(url) {
                Detection::Supported(site.as_ref())
            } else {
                Detection::WrongPage(site.as_ref())
            };
        }
        Detection::Unsupported
    }

    pub fn get(&self, key: &str) -> Option<&dyn SiteExtractor> {
        self.sites
            .iter()
            .find(|site| site.key() == key)
            .map(|site| site.as_ref())
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new(vec![
            Box::new(sites::draftkings::profile()),
            Box::new(sites::fanduel::profile()),
        ])
    }
}
