// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Consonant identity recorded for syllables that start on a bare vowel
/// (the vowel, y- and w-rows). Marker letters carry no consonant at all.
pub const VOWEL_ONSET: &str = "ø";

/// The four non-syllabic markers of the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecialKind {
    /// っ, doubles the following consonant.
    Geminate,
    /// ん
    MoraicNasal,
    /// ー
    LongVowel,
    /// ～, rendered as the small form of the preceding vowel.
    SmallVowel,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 4] = [
        SpecialKind::Geminate,
        SpecialKind::MoraicNasal,
        SpecialKind::LongVowel,
        SpecialKind::SmallVowel,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
}

impl Vowel {
    pub fn from_latin(c: char) -> Option<Self> {
        match c {
            'a' => Some(Vowel::A),
            'i' => Some(Vowel::I),
            'u' => Some(Vowel::U),
            'e' => Some(Vowel::E),
            'o' => Some(Vowel::O),
            _ => None,
        }
    }

    pub fn latin(self) -> &'static str {
        match self {
            Vowel::A => "a",
            Vowel::I => "i",
            Vowel::U => "u",
            Vowel::E => "e",
            Vowel::O => "o",
        }
    }

    pub fn macron(self) -> &'static str {
        match self {
            Vowel::A => "ā",
            Vowel::I => "ī",
            Vowel::U => "ū",
            Vowel::E => "ē",
            Vowel::O => "ō",
        }
    }

    /// The small kana glyph the small-vowel marker renders as.
    pub fn small_kana(self) -> &'static str {
        match self {
            Vowel::A => "ぁ",
            Vowel::I => "ぃ",
            Vowel::U => "ぅ",
            Vowel::E => "ぇ",
            Vowel::O => "ぉ",
        }
    }
}

impl fmt::Display for Vowel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.latin())
    }
}

/// One unit of the phonetic alphabet: a syllable or a special marker.
///
/// Letters handed out by the parser and generator are independent values;
/// the static table is only ever read.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    /// Kana spelling, one or two characters.
    pub surface: &'static str,
    pub weight: f64,
    /// Latin row prefix used for romanization ("ky", "sh", "" for vowels).
    pub row: &'static str,
    pub consonant: Option<&'static str>,
    /// Coarser grouping of consonants (h, k, s, n).
    pub consonant_class: Option<&'static str>,
    pub vowel: Option<Vowel>,
    pub special: Option<SpecialKind>,
    /// y-row
    pub palatalized: bool,
    /// w-row
    pub labialized: bool,
    /// Breaks the rhythm when not word-initial.
    pub soft: bool,
    pub not_first: bool,
    pub not_last: bool,
    /// Markers that may not immediately precede this letter.
    pub not_after: &'static [SpecialKind],
}

impl Letter {
    /// Number of kana characters in the surface form.
    pub fn char_len(&self) -> usize {
        self.surface.chars().count()
    }

    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }

    /// Whether this letter may directly follow a letter with the given marker kind.
    pub fn allowed_after(&self, previous: Option<SpecialKind>) -> bool {
        match previous {
            Some(kind) => !self.not_after.contains(&kind),
            None => true,
        }
    }
}

/// An ordered, non-empty sequence of letters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedWord {
    letters: Vec<Letter>,
}

impl ParsedWord {
    /// Returns `None` for an empty sequence.
    pub fn new(letters: Vec<Letter>) -> Option<Self> {
        if letters.is_empty() {
            None
        } else {
            Some(Self { letters })
        }
    }

    /// Callers guarantee at least one letter.
    pub(crate) fn from_nonempty(letters: Vec<Letter>) -> Self {
        debug_assert!(!letters.is_empty());
        Self { letters }
    }

    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn first(&self) -> &Letter {
        &self.letters[0]
    }

    pub fn last(&self) -> &Letter {
        &self.letters[self.letters.len() - 1]
    }

    /// Per-letter surface forms, as stored (no display rewrites).
    pub fn surfaces(&self) -> Vec<&'static str> {
        self.letters.iter().map(|l| l.surface).collect()
    }
}
