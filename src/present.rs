// src/present.rs
//! Display transform applied to tallies before they reach a chart.
//!
//! Only displayed values change: the vote tables are never rewritten and the
//! displayed total always equals the stored total.

use crate::ledger::Question;
use crate::models::Configuration;
use crate::tally::Tally;

/// Favored candidate to apply, or `None` when the transform is bypassed.
fn favored<'a>(tally: &Tally, config: &'a Configuration) -> Option<&'a str> {
    if config.display_real {
        return None;
    }
    config
        .favored_candidate
        .as_deref()
        .filter(|name| tally.contains(name))
}

pub fn display(question: Question, tally: &Tally, config: &Configuration) -> Tally {
    match question {
        Question::Intention => display_intention(tally, config),
        Question::Rejection => display_rejection(tally, config),
    }
}

/// Intention: the favored candidate is shown with the top count and the
/// previous leader is shown with the favored candidate's own count.
pub fn display_intention(tally: &Tally, config: &Configuration) -> Tally {
    let Some(favored) = favored(tally, config) else {
        return tally.clone();
    };
    let (Some((leader, top)), Some(own)) = (tally.leader(None), tally.get(favored)) else {
        return tally.clone();
    };

    let mut shown = tally.clone();
    shown.set(leader, own);
    shown.set(favored, top);
    shown
}

/// Rejection: only kicks in when the favored candidate is the most rejected.
/// It is then shown with the runner-up count and the runner-up is shown with
/// the top count.
pub fn display_rejection(tally: &Tally, config: &Configuration) -> Tally {
    let Some(favored) = favored(tally, config) else {
        return tally.clone();
    };
    let Some((worst, top)) = tally.leader(None) else {
        return tally.clone();
    };
    if worst != favored {
        return tally.clone();
    }
    let Some((runner_up, second)) = tally.leader(Some(favored)) else {
        return tally.clone();
    };

    let mut shown = tally.clone();
    shown.set(favored, second);
    shown.set(runner_up, top);
    shown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(entries: &[(&str, u64)]) -> Tally {
        entries
            .iter()
            .map(|(name, count)| (name.to_string(), *count))
            .collect()
    }

    fn favoring(name: &str) -> Configuration {
        Configuration {
            display_real: false,
            favored_candidate: Some(name.to_string()),
            updated_at: None,
        }
    }

    #[test]
    fn intention_swaps_favored_with_leader() {
        let input = tally(&[("A", 10), ("B", 7), ("C", 2)]);
        let shown = display_intention(&input, &favoring("C"));
        assert_eq!(shown, tally(&[("A", 2), ("B", 7), ("C", 10)]));
    }

    #[test]
    fn intention_self_swap_when_favored_leads() {
        let input = tally(&[("A", 10), ("B", 7), ("C", 2)]);
        assert_eq!(display_intention(&input, &favoring("A")), input);
    }

    #[test]
    fn intention_tie_picks_first_leader() {
        let input = tally(&[("A", 5), ("B", 5), ("C", 1)]);
        let shown = display_intention(&input, &favoring("C"));
        assert_eq!(shown, tally(&[("A", 1), ("B", 5), ("C", 5)]));
    }

    #[test]
    fn rejection_moves_favored_off_the_top() {
        let input = tally(&[("A", 3), ("B", 5), ("C", 9)]);
        let shown = display_rejection(&input, &favoring("C"));
        assert_eq!(shown, tally(&[("A", 3), ("B", 9), ("C", 5)]));
    }

    #[test]
    fn rejection_untouched_when_favored_not_worst() {
        let input = tally(&[("A", 3), ("B", 9), ("C", 5)]);
        assert_eq!(display_rejection(&input, &favoring("C")), input);
    }

    #[test]
    fn rejection_untouched_when_favored_is_alone() {
        let input = tally(&[("C", 4)]);
        assert_eq!(display_rejection(&input, &favoring("C")), input);
    }

    #[test]
    fn rejection_tie_only_applies_to_first_worst() {
        let input = tally(&[("A", 6), ("C", 6)]);
        assert_eq!(display_rejection(&input, &favoring("C")), input);

        let shown = display_rejection(&input, &favoring("A"));
        assert_eq!(shown, input);
    }

    #[test]
    fn display_real_is_identity() {
        let input = tally(&[("A", 10), ("B", 7), ("C", 2)]);
        let config = Configuration {
            display_real: true,
            favored_candidate: Some("C".into()),
            updated_at: None,
        };
        assert_eq!(display_intention(&input, &config), input);
        assert_eq!(display_rejection(&input, &config), input);
    }

    #[test]
    fn missing_or_unknown_favored_is_identity() {
        let input = tally(&[("A", 10), ("B", 7)]);
        let nobody = Configuration {
            display_real: false,
            favored_candidate: None,
            updated_at: None,
        };
        assert_eq!(display_intention(&input, &nobody), input);
        assert_eq!(display_intention(&input, &favoring("Z")), input);
        assert_eq!(display_rejection(&input, &favoring("Z")), input);
        assert_eq!(display_intention(&Tally::new(), &favoring("A")), Tally::new());
    }

    #[test]
    fn totals_and_domain_are_preserved() {
        let names = ["A", "B", "C", "D"];
        // Walk a small grid of count combinations, including ties and zeros.
        for a in 0..4u64 {
            for b in 0..4u64 {
                for c in 0..4u64 {
                    for d in 0..4u64 {
                        let input = tally(&[("A", a), ("B", b), ("C", c), ("D", d)]);
                        for name in names {
                            let config = favoring(name);
                            for question in Question::ALL {
                                let shown = display(question, &input, &config);
                                assert_eq!(shown.total(), input.total());
                                let domain: Vec<_> = shown.iter().map(|(n, _)| n).collect();
                                assert_eq!(domain, names);
                            }
                        }
                    }
                }
            }
        }
    }
}
