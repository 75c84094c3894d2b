// File: src/features.rs
//! Sparse, named features of a parsed word.
//!
//! Keys without a `:` are numeric features; keys containing `:` are
//! categorical indicators (`namespace:value`). The learner scales the two
//! partitions differently, so the separator is part of the contract.

use crate::core::types::{Letter, ParsedWord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separates a categorical key's namespace from its value.
pub const CATEGORY_SEPARATOR: char = ':';

/// N-gram counts saturate here: present, or present more than once.
const NGRAM_CAP: f64 = 2.0;

const RHYTHM_BREAK: &str = "-";
const RHYTHM_CONTINUE: &str = "+";

/// Feature name -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: BTreeMap<String, f64>,
}

impl FeatureVector {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn numeric(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.iter().filter(|(k, _)| !is_categorical(k))
    }

    pub fn categorical(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.iter().filter(|(k, _)| is_categorical(k))
    }

    fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    fn indicate(&mut self, namespace: &str, value: &str) {
        self.set(format!("{namespace}{CATEGORY_SEPARATOR}{value}"), 1.0);
    }

    /// Counts every adjacent pair of `symbols` under `namespace`, capped at [`NGRAM_CAP`].
    fn add_bigrams<S: AsRef<str>>(&mut self, namespace: &str, symbols: &[S]) {
        for pair in symbols.windows(2) {
            let key = format!(
                "{namespace}{CATEGORY_SEPARATOR}{}_{}",
                pair[0].as_ref(),
                pair[1].as_ref()
            );
            let count = self.values.entry(key).or_insert(0.0);
            *count = (*count + 1.0).min(NGRAM_CAP);
        }
    }
}

pub fn is_categorical(key: &str) -> bool {
    key.contains(CATEGORY_SEPARATOR)
}

fn rhythm_symbol(position: usize, letter: &Letter) -> &'static str {
    if position > 0 && letter.soft {
        RHYTHM_BREAK
    } else {
        RHYTHM_CONTINUE
    }
}

/// special / palatalized / labialized / plain
fn semivowel_class(letter: &Letter) -> &'static str {
    if letter.is_special() {
        "s"
    } else if letter.palatalized {
        "y"
    } else if letter.labialized {
        "w"
    } else {
        "n"
    }
}

fn vowel_class(letter: &Letter) -> String {
    let vowel = letter.vowel.map(|v| v.latin()).unwrap_or("");
    if letter.is_special() {
        RHYTHM_BREAK.to_string()
    } else if letter.palatalized {
        format!("y{vowel}")
    } else if letter.labialized {
        format!("w{vowel}")
    } else {
        vowel.to_string()
    }
}

pub fn extract(word: &ParsedWord) -> FeatureVector {
    let letters = word.letters();
    let length = letters.len() as f64;

    let rhythm: Vec<&str> = letters.iter().enumerate().map(|(i, l)| rhythm_symbol(i, l)).collect();
    let consonants: Vec<&str> = letters.iter().filter_map(|l| l.consonant).collect();
    let consonant_classes: Vec<&str> = letters.iter().filter_map(|l| l.consonant_class).collect();
    let vowels: Vec<&str> = letters.iter().filter_map(|l| l.vowel.map(|v| v.latin())).collect();
    let char_lengths: Vec<String> = letters.iter().map(|l| l.char_len().to_string()).collect();
    let semivowel_classes: Vec<&str> = letters.iter().map(semivowel_class).collect();
    let vowel_classes: Vec<String> = letters.iter().map(vowel_class).collect();
    let surfaces: Vec<&str> = letters.iter().map(|l| l.surface).collect();

    let soft_count = rhythm.iter().filter(|&&r| r == RHYTHM_BREAK).count() as f64;
    let special_count = letters.iter().filter(|l| l.is_special()).count() as f64;
    let count = |f: fn(&Letter) -> bool| letters.iter().filter(|l| f(l)).count() as f64;

    let mut features = FeatureVector::default();
    features.set("length", length);
    features.set("soft_ratio", soft_count / length);
    features.set("special_ratio", special_count / length);
    features.set("palatalized_count", count(|l| l.palatalized));
    features.set("labialized_count", count(|l| l.labialized));
    features.set("multi_char_count", count(|l| l.char_len() > 1));
    features.set("char_length", letters.iter().map(Letter::char_len).sum::<usize>() as f64);

    let head = rhythm.iter().take(2).copied().collect::<String>();
    let tail = rhythm[rhythm.len().saturating_sub(2)..].concat();
    features.indicate("rhythm_head", &head);
    features.indicate("rhythm_tail", &tail);

    let (first, last) = (word.first(), word.last());
    features.indicate("head", first.surface);
    features.indicate("tail", last.surface);
    features.indicate("consonant_head", first.consonant.unwrap_or("none"));
    features.indicate("consonant_tail", last.consonant.unwrap_or("none"));
    features.indicate("vowel_head", first.vowel.map_or("none", |v| v.latin()));
    features.indicate("vowel_tail", last.vowel.map_or("none", |v| v.latin()));

    features.add_bigrams("consonant_bigram", &consonants);
    features.add_bigrams("consonant_class_bigram", &consonant_classes);
    features.add_bigrams("vowel_bigram", &vowels);
    features.add_bigrams("char_length_bigram", &char_lengths);
    features.add_bigrams("semivowel_bigram", &semivowel_classes);
    features.add_bigrams("vowel_class_bigram", &vowel_classes);
    features.add_bigrams("letter_bigram", &surfaces);
    features.add_bigrams("rhythm_bigram", &rhythm);

    features
}
