//! Anchored-ID extraction.
//!
//! Record containers and their fields share a generated id namespace: a card
//! carries `data-test-id="bet-card-<id>"` and its fields carry composite values
//! such as `bet-details-title-<id>`. The table below is pure data; templates use
//! `{id}` as the placeholder for the card suffix.

use scraper::{ElementRef, Html};
use wager_core::{Field, Record, RecordId};

use super::chain::Matcher;
use super::normalize::{element_text, field_value, raw_notes};

#[derive(Debug, Clone)]
pub enum AnchoredSource {
    /// Text of the element addressed by the template.
    Text(&'static str),
    /// Literal value when the marker element exists.
    PresentAs {
        marker: &'static str,
        value: &'static str,
    },
    /// Text of `then` when the marker element exists.
    WhenPresent {
        marker: &'static str,
        then: &'static str,
    },
    /// Texts of the first elements whose attribute starts with each prefix,
    /// joined by `separator`. Prefixes are not id-scoped.
    JoinPrefixes {
        prefixes: &'static [&'static str],
        separator: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct AnchoredTable {
    pub container_attr: &'static str,
    pub container_prefix: &'static str,
    /// Per field, the sources tried in order; the first non-empty wins.
    pub fields: Vec<(Field, Vec<AnchoredSource>)>,
    /// Template of the element holding the site's own bet reference.
    pub reference: Option<&'static str>,
}

impl AnchoredTable {
    pub fn parse(&self, doc: &Html, site: &str) -> Vec<(RecordId, Record)> {
        let containers = Matcher::AttrPrefix {
            attr: self.container_attr,
            prefix: self.container_prefix.to_string(),
        };
        doc.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| containers.matches(el.value()))
            .filter_map(|card| self.parse_card(card, site))
            .collect()
    }

    fn parse_card(&self, card: ElementRef<'_>, site: &str) -> Option<(RecordId, Record)> {
        let suffix = card
            .value()
            .attr(self.container_attr)?
            .strip_prefix(self.container_prefix)?
            .trim();
        if suffix.is_empty() {
            return None;
        }

        let mut record = Record::new(site);
        for (field, sources) in &self.fields {
            let raw = sources
                .iter()
                .find_map(|source| self.resolve(card, suffix, source))
                .unwrap_or_default();
            *record.field_mut(*field) = field_value(*field, &raw);
        }

        let reference = self
            .reference
            .and_then(|template| self.text_of(card, &fill(template, suffix)))
            .unwrap_or_default();
        record.raw_notes = raw_notes(&[&reference, &element_text(card)]);

        Some((RecordId::new(suffix), record))
    }

    fn resolve(&self, card: ElementRef<'_>, suffix: &str, source: &AnchoredSource) -> Option<String> {
        match source {
            AnchoredSource::Text(template) => self.text_of(card, &fill(template, suffix)),
            AnchoredSource::PresentAs { marker, value } => self
                .find(card, &fill(marker, suffix))
                .map(|_| value.to_string()),
            AnchoredSource::WhenPresent { marker, then } => {
                self.find(card, &fill(marker, suffix))?;
                self.text_of(card, &fill(then, suffix))
            }
            AnchoredSource::JoinPrefixes {
                prefixes,
                separator,
            } => {
                let parts: Vec<String> = prefixes
                    .iter()
                    .filter_map(|prefix| {
                        Matcher::AttrPrefix {
                            attr: self.container_attr,
                            prefix: prefix.to_string(),
                        }
                        .find_first(card)
                        .map(element_text)
                    })
                    .filter(|text| !text.is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join(separator))
            }
        }
    }

    fn find<'a>(&self, card: ElementRef<'a>, value: &str) -> Option<ElementRef<'a>> {
        Matcher::AttrEquals {
            attr: self.container_attr,
            value: value.to_string(),
        }
        .find_first(card)
    }

    fn text_of(&self, card: ElementRef<'_>, value: &str) -> Option<String> {
        self.find(card, value)
            .map(element_text)
            .filter(|text| !text.is_empty())
    }
}

fn fill(template: &str, suffix: &str) -> String {
    template.replace("{id}", suffix)
}
