//! Heuristic-chain extraction for markup without stable identifiers.

use std::collections::HashSet;

use ego_tree::NodeRef;
use engine_logging::{engine_debug, engine_warn};
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use wager_core::{Field, Record, RecordId};

/// Fields that do not change when a bet settles.
const STABLE_FIELDS: [Field; 7] = [
    Field::Timestamp,
    Field::Event,
    Field::BetType,
    Field::Selection,
    Field::Odds,
    Field::Stake,
    Field::League,
];

use super::chain::{Matcher, Scope, SelectorChain};
use super::normalize::{
    contains_money, element_text, field_value, find_signed_odds, raw_notes, split_sport_league,
};

/// A container selector guess, optionally narrowed by required text.
#[derive(Debug, Clone)]
pub struct ContainerGuess {
    source: String,
    selector: Option<Selector>,
    require_text: Option<Regex>,
}

impl ContainerGuess {
    pub fn new(css: &str) -> Self {
        let selector = match Selector::parse(css) {
            Ok(selector) => Some(selector),
            Err(err) => {
                engine_warn!("Ignoring invalid container selector {:?}: {:?}", css, err);
                None
            }
        };
        Self {
            source: css.to_string(),
            selector,
            require_text: None,
        }
    }

    pub fn requiring(mut self, pattern: Regex) -> Self {
        self.require_text = Some(pattern);
        self
    }

    fn select<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        let Some(selector) = self.selector.as_ref() else {
            return Vec::new();
        };
        doc.select(selector)
            .filter(|el| match &self.require_text {
                Some(pattern) => pattern.is_match(&element_text(*el)),
                None => true,
            })
            .collect()
    }
}

/// Pairs a container with a preceding sibling that carries structured data.
#[derive(Debug, Clone)]
pub struct Companion {
    pub matcher: Matcher,
    /// How many previous element siblings to inspect.
    pub lookback: usize,
}

impl Companion {
    fn find<'a>(&self, container: ElementRef<'a>) -> Option<ElementRef<'a>> {
        container
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .take(self.lookback)
            .find(|sibling| self.matcher.find_first(*sibling).is_some())
    }
}

/// What a chain fills: a single field, or a combined sport/league label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Field(Field),
    SportLeague,
}

/// Site hook run after chains and fallbacks, for derived fields.
pub type FinishFn = fn(&mut Record, &str);

#[derive(Debug, Clone)]
pub struct HeuristicTable {
    pub containers: Vec<ContainerGuess>,
    /// Fall back to the content-shape heuristic when no guess matches.
    pub shape_fallback: bool,
    pub companion: Option<Companion>,
    pub chains: Vec<(Target, SelectorChain)>,
    /// Regex fallbacks over container text for fields still empty.
    pub text_fallbacks: Vec<(Field, Regex)>,
    /// Locates the site's own bet reference for the audit trail.
    pub reference: SelectorChain,
    pub reference_label: &'static str,
    /// Container attributes used as identity when the reference is missing,
    /// provided their values tell the page's containers apart.
    pub id_attrs: &'static [&'static str],
    pub finish: Option<FinishFn>,
}

impl HeuristicTable {
    pub fn parse(&self, doc: &Html, site: &str) -> Vec<(RecordId, Record)> {
        let containers = self.locate_containers(doc);
        let attr = self.distinct_id_attr(&containers);
        containers
            .into_iter()
            .map(|container| {
                let attr_id = attr.and_then(|name| container.value().attr(name));
                self.parse_container(container, attr_id, site)
            })
            .collect()
    }

    /// First configured attribute present on every container with no repeats.
    fn distinct_id_attr(&self, containers: &[ElementRef<'_>]) -> Option<&'static str> {
        self.id_attrs.iter().copied().find(|name| {
            let mut seen = HashSet::new();
            containers.iter().all(|container| {
                container
                    .value()
                    .attr(name)
                    .is_some_and(|value| !value.is_empty() && seen.insert(value))
            })
        })
    }

    fn locate_containers<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        for guess in &self.containers {
            let found = guess.select(doc);
            if !found.is_empty() {
                engine_debug!("Container guess {:?} matched {} elements", guess.source, found.len());
                return found;
            }
        }
        if self.shape_fallback {
            let found = shaped_containers(doc);
            engine_debug!("Content-shape fallback matched {} elements", found.len());
            return found;
        }
        Vec::new()
    }

    fn parse_container(
        &self,
        container: ElementRef<'_>,
        attr_id: Option<&str>,
        site: &str,
    ) -> (RecordId, Record) {
        let text = element_text(container);
        let companion = self.companion.as_ref().and_then(|c| c.find(container));
        let scope = Scope {
            container,
            companion,
            text: &text,
        };

        let mut record = Record::new(site);
        for (target, chain) in &self.chains {
            let Some(raw) = chain.resolve(&scope) else {
                continue;
            };
            match target {
                Target::Field(field) => {
                    if record.field(*field).is_empty() {
                        *record.field_mut(*field) = field_value(*field, &raw);
                    }
                }
                Target::SportLeague => match split_sport_league(&raw) {
                    Some((sport, league)) => {
                        fill_if_empty(&mut record.sport, sport);
                        fill_if_empty(&mut record.league, league);
                    }
                    None => fill_if_empty(&mut record.sport, raw),
                },
            }
        }

        for (field, pattern) in &self.text_fallbacks {
            if !record.field(*field).is_empty() {
                continue;
            }
            if let Some(raw) = pattern
                .captures(&text)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(0)))
            {
                *record.field_mut(*field) = field_value(*field, raw.as_str());
            }
        }

        if let Some(finish) = self.finish {
            finish(&mut record, &text);
        }

        let reference = self.reference.resolve(&scope).unwrap_or_default();
        let labelled = if reference.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.reference_label, reference)
        };
        record.raw_notes = raw_notes(&[&labelled, &text]);

        let id = if !reference.is_empty() {
            RecordId::new(reference)
        } else if let Some(value) = attr_id {
            RecordId::new(format!("attr:{value}"))
        } else {
            stable_identity(&record).unwrap_or_else(|| RecordId::new(format!("text:{text}")))
        };
        (id, record)
    }
}

/// Identity from the fields that survive settlement, so an open card and its
/// settled rendering collapse into one record.
fn stable_identity(record: &Record) -> Option<RecordId> {
    let values: Vec<&str> = STABLE_FIELDS.iter().map(|f| record.field(*f)).collect();
    if values.iter().all(|v| v.is_empty()) {
        return None;
    }
    Some(RecordId::new(format!("fields:{}", values.join("\u{1f}"))))
}

fn fill_if_empty(slot: &mut String, value: String) {
    if slot.is_empty() {
        *slot = value;
    }
}

fn has_record_shape(text: &str) -> bool {
    contains_money(text) && find_signed_odds(text).is_some()
}

/// Innermost elements whose text holds both a currency amount and a signed
/// odds figure.
fn shaped_containers(doc: &Html) -> Vec<ElementRef<'_>> {
    let mut found = Vec::new();
    collect_shaped(*doc.root_element(), &mut found);
    found
}

/// Returns whether `node` has the record shape; pushes the innermost shaped
/// elements of its subtree into `found` in document order.
fn collect_shaped<'a>(node: NodeRef<'a, Node>, found: &mut Vec<ElementRef<'a>>) -> bool {
    let Some(element) = ElementRef::wrap(node) else {
        return false;
    };
    if !has_record_shape(&element_text(element)) {
        return false;
    }
    let mut inner = false;
    for child in node.children() {
        inner |= collect_shaped(child, found);
    }
    if !inner {
        found.push(element);
    }
    true
}
