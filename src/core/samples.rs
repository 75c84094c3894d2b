// File: src/core/samples.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A user's feedback: surface word -> latest preference score.
///
/// Kept ordered so that training over the same set always sees the same
/// sample order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    scores: BTreeMap<String, f64>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a score, replacing any earlier score for the same word.
    pub fn insert(&mut self, word: impl Into<String>, score: f64) {
        self.scores.insert(word.into(), score);
    }

    /// Merges `newer` into this set; newer scores win on conflicts.
    pub fn merge(&mut self, newer: &SampleSet) {
        for (word, &score) in &newer.scores {
            self.scores.insert(word.clone(), score);
        }
    }

    pub fn get(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(w, &s)| (w.as_str(), s))
    }

    /// Whether the scores carry any ranking signal, i.e. at least two
    /// distinct values.
    pub fn has_ranking_signal(&self) -> bool {
        let mut scores = self.scores.values();
        match scores.next() {
            Some(&first) => scores.any(|&s| s != first),
            None => false,
        }
    }

    /// Words whose latest score equals `score`, in sorted order.
    pub fn words_scored(&self, score: f64) -> Vec<String> {
        self.scores
            .iter()
            .filter(|&(_, &s)| s == score)
            .map(|(w, _)| w.clone())
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for SampleSet {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut set = SampleSet::new();
        for (word, score) in iter {
            set.insert(word, score);
        }
        set
    }
}
