use regex::Regex;
use scraper::node::Element;
use scraper::ElementRef;

use super::normalize::{collapse_whitespace, element_text};

/// Element predicate used by locators and companion rules.
#[derive(Debug, Clone)]
pub enum Matcher {
    AttrEquals {
        attr: &'static str,
        value: String,
    },
    AttrPrefix {
        attr: &'static str,
        prefix: String,
    },
    ClassContains(&'static str),
    /// Has an `aria-label` and is explicitly exposed (`aria-hidden="false"`).
    AriaLabelled,
}

impl Matcher {
    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Matcher::AttrEquals { attr, value } => element.attr(attr) == Some(value.as_str()),
            Matcher::AttrPrefix { attr, prefix } => element
                .attr(attr)
                .is_some_and(|v| v.starts_with(prefix.as_str())),
            Matcher::ClassContains(needle) => element
                .attr("class")
                .is_some_and(|class| class.contains(needle)),
            Matcher::AriaLabelled => {
                element.attr("aria-label").is_some() && element.attr("aria-hidden") == Some("false")
            }
        }
    }

    /// Elements under `root` (inclusive) that match, in document order.
    pub fn find_all<'a, 'm>(
        &'m self,
        root: ElementRef<'a>,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'm
    where
        'a: 'm,
    {
        root.descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| self.matches(el.value()))
    }

    /// First element under `root` (inclusive) in document order that matches.
    pub fn find_first<'a>(&self, root: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.find_all(root).next()
    }
}

/// Which part of a structured aria-label to read.
///
/// Labels look like `"Selection, Bet Type, <handicap>, Odds, Event…, Time"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaSlot {
    Selection,
    BetType,
    Handicap,
    Odds,
    /// Event name followed by `", <time>"` when a start time is present.
    Event,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AriaSummary {
    pub selection: String,
    pub bet_type: String,
    pub handicap: String,
    pub odds: String,
    pub event: String,
    pub event_time: String,
}

impl AriaSummary {
    pub fn parse(label: &str) -> Option<Self> {
        let parts: Vec<&str> = label.split(',').map(str::trim).collect();
        if parts.len() < 6 {
            return None;
        }
        let time_idx = parts
            .iter()
            .enumerate()
            .skip(4)
            .find(|(_, part)| looks_like_clock_time(part))
            .map(|(idx, _)| idx);
        // Event names may themselves contain commas, so everything between the
        // odds and the time belongs to the event.
        let (event, event_time) = match time_idx {
            Some(idx) => (parts[4..idx].join(", "), parts[idx].to_string()),
            None => (parts[4..].join(", "), String::new()),
        };
        Some(Self {
            selection: parts[0].to_string(),
            bet_type: parts[1].to_string(),
            handicap: parts[2].to_string(),
            odds: parts[3].to_string(),
            event: event.trim().to_string(),
            event_time,
        })
    }

    pub fn slot(&self, slot: AriaSlot) -> String {
        match slot {
            AriaSlot::Selection => self.selection.clone(),
            AriaSlot::BetType => self.bet_type.clone(),
            AriaSlot::Handicap => self.handicap.clone(),
            AriaSlot::Odds => self.odds.clone(),
            AriaSlot::Event if self.event_time.is_empty() => self.event.clone(),
            AriaSlot::Event => format!("{}, {}", self.event, self.event_time),
        }
    }
}

fn looks_like_clock_time(part: &str) -> bool {
    let lower = part.to_ascii_lowercase();
    let Some(colon) = lower.find(':') else {
        return false;
    };
    let before = &lower[..colon];
    let after = &lower[colon + 1..];
    let digits_before = before.chars().rev().take_while(char::is_ascii_digit).count();
    let digits_after = after.chars().take_while(char::is_ascii_digit).count();
    let rest = after[digits_after..].trim_start();
    digits_before > 0 && digits_after > 0 && (rest.starts_with("am") || rest.starts_with("pm"))
}

/// Where a record container and its structured companion live.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a, 'b> {
    pub container: ElementRef<'a>,
    pub companion: Option<ElementRef<'a>>,
    /// Normalized whole-container text.
    pub text: &'b str,
}

impl<'a> Scope<'a, '_> {
    fn roots(&self) -> impl Iterator<Item = ElementRef<'a>> {
        std::iter::once(self.container).chain(self.companion)
    }
}

/// One strategy for locating a field value.
#[derive(Debug, Clone)]
pub enum Locator {
    /// Text of the first element matching an attribute or class rule.
    Element(Matcher),
    /// A slot of the first aria-label in scope that parses as a summary.
    Aria(AriaSlot),
    /// Regex over the normalized container text; group 1 if present.
    TextPattern(Regex),
}

impl Locator {
    pub fn attr_exact(attr: &'static str, value: impl Into<String>) -> Self {
        Locator::Element(Matcher::AttrEquals {
            attr,
            value: value.into(),
        })
    }

    pub fn attr_prefix(attr: &'static str, prefix: impl Into<String>) -> Self {
        Locator::Element(Matcher::AttrPrefix {
            attr,
            prefix: prefix.into(),
        })
    }

    pub fn class_substring(needle: &'static str) -> Self {
        Locator::Element(Matcher::ClassContains(needle))
    }

    pub fn aria(slot: AriaSlot) -> Self {
        Locator::Aria(slot)
    }

    pub fn text_pattern(regex: Regex) -> Self {
        Locator::TextPattern(regex)
    }

    pub fn locate(&self, scope: &Scope<'_, '_>) -> Option<String> {
        let value = match self {
            Locator::Element(matcher) => scope
                .roots()
                .find_map(|root| matcher.find_first(root))
                .map(element_text),
            Locator::Aria(slot) => {
                let labelled = Matcher::AriaLabelled;
                let found = scope
                    .roots()
                    .flat_map(|root| labelled.find_all(root))
                    .filter_map(|el| el.value().attr("aria-label"))
                    .find_map(AriaSummary::parse)
                    .map(|summary| summary.slot(*slot));
                found
            }
            Locator::TextPattern(regex) => regex.captures(scope.text).and_then(|caps| {
                caps.get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().to_string())
            }),
        }?;
        let value = collapse_whitespace(&value);
        (!value.is_empty()).then_some(value)
    }
}

/// Ordered fallback list for one field; the first non-empty result wins.
#[derive(Debug, Clone, Default)]
pub struct SelectorChain {
    locators: Vec<Locator>,
}

impl SelectorChain {
    pub fn new(locators: Vec<Locator>) -> Self {
        Self { locators }
    }

    pub fn resolve(&self, scope: &Scope<'_, '_>) -> Option<String> {
        self.locators.iter().find_map(|locator| locator.locate(scope))
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}
