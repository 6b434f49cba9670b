use std::fmt;

use super::Model;
use crate::syntax::transition::Dependencies;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroDivisionError;

impl fmt::Display for ZeroDivisionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("division by zero")
    }
}

/// Unlabeled attachment tallies over gold arcs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachmentScore {
    correct: usize,
    total: usize,
    exact: usize,
    sentences: usize,
}

impl AttachmentScore {
    pub fn new() -> Self {
        AttachmentScore::default()
    }

    pub fn reset(&mut self) {
        *self = AttachmentScore::default();
    }

    pub fn count(&mut self, predicted: &Dependencies, gold: &Dependencies) {
        self.correct += gold
            .iter()
            .filter(|&(dependent, head)| predicted.head(dependent) == Some(head))
            .count();
        self.total += gold.len();
        if predicted == gold {
            self.exact += 1;
        }
        self.sentences += 1;
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn sentences(&self) -> usize {
        self.sentences
    }

    /// Share of gold arcs recovered.
    pub fn accuracy(&self) -> Result<f32, ZeroDivisionError> {
        if self.total > 0 {
            Ok((self.correct as f32) / (self.total as f32))
        } else {
            Err(ZeroDivisionError)
        }
    }

    /// Share of sentences whose predicted map equals the gold map.
    pub fn exact_match(&self) -> Result<f32, ZeroDivisionError> {
        if self.sentences > 0 {
            Ok((self.exact as f32) / (self.sentences as f32))
        } else {
            Err(ZeroDivisionError)
        }
    }
}

impl Model for AttachmentScore {
    fn update(&mut self, predicted: &Dependencies, gold: &Dependencies) {
        self.count(predicted, gold);
    }
}
