use std::fmt;

/// One wager as extracted from a sportsbook page.
///
/// Every field is a plain string; an empty string means the value could not be
/// located. `site` and `raw_notes` are always populated by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub timestamp: String,
    pub sport: String,
    pub league: String,
    pub event: String,
    pub bet_type: String,
    pub selection: String,
    pub odds: String,
    pub stake: String,
    pub payout: String,
    pub result: String,
    pub site: String,
    pub raw_notes: String,
}

impl Record {
    /// Column labels in export order. Must line up with [`Record::values`].
    pub const COLUMNS: [&'static str; 12] = [
        "Date/Time",
        "Sport",
        "League",
        "Event",
        "Bet Type",
        "Selection",
        "Odds",
        "Stake",
        "Payout",
        "Result",
        "Site",
        "Raw Notes",
    ];

    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            ..Self::default()
        }
    }

    pub fn values(&self) -> [&str; 12] {
        [
            &self.timestamp,
            &self.sport,
            &self.league,
            &self.event,
            &self.bet_type,
            &self.selection,
            &self.odds,
            &self.stake,
            &self.payout,
            &self.result,
            &self.site,
            &self.raw_notes,
        ]
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Timestamp => &self.timestamp,
            Field::Sport => &self.sport,
            Field::League => &self.league,
            Field::Event => &self.event,
            Field::BetType => &self.bet_type,
            Field::Selection => &self.selection,
            Field::Odds => &self.odds,
            Field::Stake => &self.stake,
            Field::Payout => &self.payout,
            Field::Result => &self.result,
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Timestamp => &mut self.timestamp,
            Field::Sport => &mut self.sport,
            Field::League => &mut self.league,
            Field::Event => &mut self.event,
            Field::BetType => &mut self.bet_type,
            Field::Selection => &mut self.selection,
            Field::Odds => &mut self.odds,
            Field::Stake => &mut self.stake,
            Field::Payout => &mut self.payout,
            Field::Result => &mut self.result,
        }
    }
}

/// Best-effort record fields an extractor may fill. `site` and `raw_notes`
/// are set by the extractor itself and are not addressable here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    Sport,
    League,
    Event,
    BetType,
    Selection,
    Odds,
    Stake,
    Payout,
    Result,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Timestamp,
        Field::Sport,
        Field::League,
        Field::Event,
        Field::BetType,
        Field::Selection,
        Field::Odds,
        Field::Stake,
        Field::Payout,
        Field::Result,
    ];
}

/// Site-stable key of a bet card, used to deduplicate across harvest passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Closed result vocabulary, with a passthrough for unrecognized site wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetResult {
    Won,
    Lost,
    Push,
    Void,
    Returned,
    Open,
    Other(String),
}

impl BetResult {
    /// Maps site-native status text onto the closed set.
    ///
    /// Matching is case-insensitive and token-based: the first whitespace or
    /// punctuation separated token that belongs to a known vocabulary wins.
    /// Unknown text is kept verbatim (whitespace collapsed).
    pub fn from_site_text(raw: &str) -> Self {
        let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let tokens = collapsed
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty());
        for token in tokens {
            let lower = token.to_ascii_lowercase();
            let mapped = match lower.as_str() {
                "won" | "win" | "winner" => Some(BetResult::Won),
                "lost" | "lose" | "loss" => Some(BetResult::Lost),
                "push" | "pushed" => Some(BetResult::Push),
                "void" | "voided" | "cancelled" | "canceled" => Some(BetResult::Void),
                "returned" | "refunded" | "refund" => Some(BetResult::Returned),
                "open" | "pending" | "unsettled" => Some(BetResult::Open),
                _ => None,
            };
            if let Some(result) = mapped {
                return result;
            }
        }
        BetResult::Other(collapsed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            BetResult::Won => "Won",
            BetResult::Lost => "Lost",
            BetResult::Push => "Push",
            BetResult::Void => "Void",
            BetResult::Returned => "Returned",
            BetResult::Open => "Open",
            BetResult::Other(raw) => raw,
        }
    }
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{BetResult, Record};

    #[test]
    fn result_vocabulary_maps_case_insensitively() {
        assert_eq!(BetResult::from_site_text("WON"), BetResult::Won);
        assert_eq!(BetResult::from_site_text("lost"), BetResult::Lost);
        assert_eq!(BetResult::from_site_text(" Cancelled "), BetResult::Void);
        assert_eq!(BetResult::from_site_text("Bet pushed"), BetResult::Push);
    }

    #[test]
    fn partial_words_do_not_match() {
        assert_eq!(
            BetResult::from_site_text("Wonderful"),
            BetResult::Other("Wonderful".to_string())
        );
    }

    #[test]
    fn unknown_text_passes_through_collapsed() {
        assert_eq!(
            BetResult::from_site_text("Cashed   Out").as_str(),
            "Cashed Out"
        );
        assert_eq!(BetResult::from_site_text("").as_str(), "");
    }

    #[test]
    fn values_follow_column_order() {
        let mut record = Record::new("FanDuel");
        record.timestamp = "t".into();
        record.raw_notes = "n".into();
        let values = record.values();
        assert_eq!(values.len(), Record::COLUMNS.len());
        assert_eq!(values[0], "t");
        assert_eq!(values[10], "FanDuel");
        assert_eq!(values[11], "n");
    }
}
