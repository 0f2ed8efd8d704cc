//! Personnel roster (Anexo "Tabela de Efetivo Proposto")

use serde::{Deserialize, Deserializer, Serialize};

use crate::id::{IdAllocator, NodeId};

/// Rank / corps / specialty triple of a staffing prediction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub rank: String,
    #[serde(default)]
    pub corps: String,
    #[serde(default)]
    pub specialty: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub id: NodeId,
    pub function: String,
    #[serde(default)]
    pub primary: Prediction,
    #[serde(default)]
    pub alternate: Prediction,
    #[serde(default, deserialize_with = "lenient_headcount")]
    pub headcount: u32,
}

impl RosterRow {
    pub fn new(id: NodeId, function: impl Into<String>) -> Self {
        Self {
            id,
            function: function.into(),
            primary: Prediction::default(),
            alternate: Prediction::default(),
            headcount: 0,
        }
    }

    /// Set the headcount from form input; anything non-numeric counts as 0
    pub fn set_headcount_text(&mut self, input: &str) {
        self.headcount = parse_headcount(input);
    }
}

/// Rows of the roster plus their id counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonnelRoster {
    rows: Vec<RosterRow>,
    #[serde(skip)]
    ids: IdAllocator,
}

impl PersonnelRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, function: impl Into<String>) -> NodeId {
        let id = self.ids.next_id();
        self.rows.push(RosterRow::new(id, function));
        id
    }

    /// Returns false when no row has that id
    pub fn remove_row(&mut self, id: NodeId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        before != self.rows.len()
    }

    pub fn row_mut(&mut self, id: NodeId) -> Option<&mut RosterRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    pub fn rows(&self) -> &[RosterRow] {
        &self.rows
    }

    /// Sum of the proposed headcount over all rows
    pub fn total_headcount(&self) -> u64 {
        self.rows.iter().map(|row| u64::from(row.headcount)).sum()
    }

    pub(crate) fn reseed_ids(&mut self) {
        for row in &self.rows {
            self.ids.bump_past(row.id);
        }
    }
}

fn parse_headcount(input: &str) -> u32 {
    input.trim().parse::<u32>().unwrap_or(0)
}

/// Accept a number, a numeric string, or anything else as 0
fn lenient_headcount<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        serde_json::Value::String(s) => parse_headcount(&s),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_roster_totals_zero() {
        assert_eq!(PersonnelRoster::new().total_headcount(), 0);
    }

    #[test]
    fn test_total_headcount() {
        let mut roster = PersonnelRoster::new();
        for (function, count) in [("CH", "1"), ("ENC", "2"), ("AUX", "abc")] {
            let id = roster.add_row(function);
            roster.row_mut(id).unwrap().set_headcount_text(count);
        }
        assert_eq!(roster.total_headcount(), 3);
    }

    #[test]
    fn test_lenient_json_headcount() {
        let json = r#"{"rows":[
            {"id":1,"function":"a","headcount":4},
            {"id":2,"function":"b","headcount":"5"},
            {"id":3,"function":"c","headcount":"x"},
            {"id":4,"function":"d","headcount":null},
            {"id":5,"function":"e"},
            {"id":6,"function":"f","headcount":-3}
        ]}"#;
        let roster: PersonnelRoster = serde_json::from_str(json).unwrap();
        let counts: Vec<u32> = roster.rows().iter().map(|r| r.headcount).collect();
        assert_eq!(counts, vec![4, 5, 0, 0, 0, 0]);
        assert_eq!(roster.total_headcount(), 9);
    }

    #[test]
    fn test_remove_unknown_row_is_noop() {
        let mut roster = PersonnelRoster::new();
        roster.add_row("CH");
        let before = roster.clone();
        assert!(!roster.remove_row(NodeId(99)));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_reseed_after_load() {
        let json = r#"{"rows":[{"id":7,"function":"a","headcount":1}]}"#;
        let mut roster: PersonnelRoster = serde_json::from_str(json).unwrap();
        roster.reseed_ids();
        assert_eq!(roster.add_row("b"), NodeId(8));
    }

    proptest! {
        #[test]
        fn total_is_sum_of_rows(counts in prop::collection::vec(0u32..10_000, 0..30)) {
            let mut roster = PersonnelRoster::new();
            for count in &counts {
                let id = roster.add_row("f");
                roster.row_mut(id).unwrap().headcount = *count;
            }
            let expected: u64 = counts.iter().map(|c| u64::from(*c)).sum();
            prop_assert_eq!(roster.total_headcount(), expected);
        }
    }
}
