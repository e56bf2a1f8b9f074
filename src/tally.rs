// src/tally.rs
//! Per-candidate vote counts.
//!
//! A [`Tally`] iterates in ascending candidate order. Both storage backends
//! produce that order, and the display transform breaks ties on it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::VoteRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<String, u64>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts rows grouped by candidate. Candidates without rows are absent.
    pub fn from_votes<'a>(votes: impl IntoIterator<Item = &'a VoteRecord>) -> Self {
        let mut tally = Tally::new();
        for vote in votes {
            *tally.counts.entry(vote.candidate.clone()).or_insert(0) += 1;
        }
        tally
    }

    pub fn get(&self, candidate: &str) -> Option<u64> {
        self.counts.get(candidate).copied()
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.counts.contains_key(candidate)
    }

    pub fn set(&mut self, candidate: impl Into<String>, count: u64) {
        self.counts.insert(candidate.into(), count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// First candidate in iteration order holding the highest count,
    /// skipping `except` when given.
    pub fn leader(&self, except: Option<&str>) -> Option<(&str, u64)> {
        let mut best: Option<(&str, u64)> = None;
        for (name, count) in self.iter() {
            if Some(name) == except {
                continue;
            }
            match best {
                Some((_, top)) if count <= top => {}
                _ => best = Some((name, count)),
            }
        }
        best
    }

    /// Adds zero entries for known candidates that received no votes.
    pub fn including<'a>(mut self, candidates: impl IntoIterator<Item = &'a String>) -> Self {
        for candidate in candidates {
            self.counts.entry(candidate.clone()).or_insert(0);
        }
        self
    }
}

impl FromIterator<(String, u64)> for Tally {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Tally {
            counts: iter.into_iter().collect(),
        }
    }
}

/// One slice of a rendered distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub candidate: String,
    pub count: u64,
    pub percent: f64,
}

/// A tally as handed to the chart collaborator: entries with their share of
/// the total plus the participant count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub participants: u64,
    pub entries: Vec<Share>,
}

impl From<&Tally> for Distribution {
    fn from(tally: &Tally) -> Self {
        let participants = tally.total();
        let entries = tally
            .iter()
            .map(|(candidate, count)| Share {
                candidate: candidate.to_string(),
                count,
                percent: if participants == 0 {
                    0.0
                } else {
                    count as f64 * 100.0 / participants as f64
                },
            })
            .collect();
        Distribution {
            participants,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: i64, candidate: &str, token: &str) -> VoteRecord {
        VoteRecord {
            id,
            candidate: candidate.to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn counts_rows_per_candidate() {
        let votes = vec![
            vote(1, "B", "t1"),
            vote(2, "A", "t2"),
            vote(3, "B", "t3"),
            vote(4, "B", "t4"),
        ];
        let tally = Tally::from_votes(&votes);

        assert_eq!(tally.get("A"), Some(1));
        assert_eq!(tally.get("B"), Some(3));
        assert_eq!(tally.get("C"), None);
        assert_eq!(tally.total(), votes.len() as u64);
        let order: Vec<_> = tally.iter().map(|(name, _)| name).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn empty_table_gives_empty_tally() {
        let tally = Tally::from_votes(&Vec::<VoteRecord>::new());
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.leader(None), None);
    }

    #[test]
    fn leader_breaks_ties_on_first_in_order() {
        let tally: Tally = [("B".to_string(), 4), ("A".to_string(), 4), ("C".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(tally.leader(None), Some(("A", 4)));
        assert_eq!(tally.leader(Some("A")), Some(("B", 4)));
    }

    #[test]
    fn including_fills_missing_candidates_with_zero() {
        let tally: Tally = [("A".to_string(), 2)].into_iter().collect();
        let known = vec!["A".to_string(), "B".to_string()];
        let filled = tally.including(&known);
        assert_eq!(filled.get("B"), Some(0));
        assert_eq!(filled.total(), 2);
    }

    #[test]
    fn distribution_reports_shares() {
        let tally: Tally = [("A".to_string(), 1), ("B".to_string(), 3)].into_iter().collect();
        let dist = Distribution::from(&tally);
        assert_eq!(dist.participants, 4);
        assert_eq!(dist.entries[0].percent, 25.0);
        assert_eq!(dist.entries[1].percent, 75.0);

        let empty = Distribution::from(&Tally::new());
        assert_eq!(empty.participants, 0);
        assert!(empty.entries.is_empty());
    }
}
