// src/ballot.rs
use crate::error::PollError;
use crate::ledger::Question;

pub const DEFAULT_CANDIDATES: [&str; 3] = ["Candidate A", "Candidate B", "Candidate C"];
pub const DEFAULT_ABSTAIN_OPTIONS: [&str; 2] = ["Blank/Null", "Undecided"];

/// The fixed option lists offered for each question.
///
/// Intention offers every candidate plus the abstention options; rejection
/// offers the candidates only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    candidates: Vec<String>,
    abstain_options: Vec<String>,
}

impl Default for Ballot {
    fn default() -> Self {
        Ballot::new(
            DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_ABSTAIN_OPTIONS.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl Ballot {
    pub fn new(candidates: Vec<String>, abstain_options: Vec<String>) -> Self {
        Ballot {
            candidates,
            abstain_options,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn options(&self, question: Question) -> Vec<String> {
        match question {
            Question::Intention => self
                .candidates
                .iter()
                .chain(self.abstain_options.iter())
                .cloned()
                .collect(),
            Question::Rejection => self.candidates.clone(),
        }
    }

    pub fn is_option(&self, question: Question, candidate: &str) -> bool {
        let in_candidates = self.candidates.iter().any(|c| c == candidate);
        match question {
            Question::Intention => {
                in_candidates || self.abstain_options.iter().any(|c| c == candidate)
            }
            Question::Rejection => in_candidates,
        }
    }

    pub fn validate(&self, question: Question, candidate: &str) -> Result<(), PollError> {
        if self.is_option(question, candidate) {
            Ok(())
        } else {
            Err(PollError::InvalidCandidate {
                question,
                candidate: candidate.to_string(),
            })
        }
    }
}
