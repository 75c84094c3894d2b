// src/core/alphabet.rs
use crate::core::types::{Letter, SpecialKind, Vowel, VOWEL_ONSET};
use crate::error::ConfigurationError;
use std::collections::HashSet;
use std::sync::OnceLock;

use SpecialKind::{Geminate, LongVowel, MoraicNasal, SmallVowel};

/// A template row of syllables sharing consonant and y/w marking.
/// Only used to build the table.
#[derive(Debug, Clone, Copy)]
pub struct LetterClass {
    pub surfaces: &'static [&'static str],
    pub row: &'static str,
    pub vowels: &'static str,
    /// Empty for rows without a consonant onset.
    pub consonant: &'static str,
    pub consonant_class: &'static str,
    pub weights: &'static [f64],
    pub not_after: &'static [SpecialKind],
    pub palatalized: bool,
    pub labialized: bool,
    pub soft: bool,
}

const fn class(
    surfaces: &'static [&'static str],
    row: &'static str,
    vowels: &'static str,
    consonant: &'static str,
    consonant_class: &'static str,
    weights: &'static [f64],
    not_after: &'static [SpecialKind],
) -> LetterClass {
    LetterClass {
        surfaces,
        row,
        vowels,
        consonant,
        consonant_class,
        weights,
        not_after,
        palatalized: false,
        labialized: false,
        soft: false,
    }
}

impl LetterClass {
    const fn y(mut self) -> Self {
        self.palatalized = true;
        self
    }

    const fn w(mut self) -> Self {
        self.labialized = true;
        self
    }

    const fn soft(mut self) -> Self {
        self.soft = true;
        self
    }
}

const NO_TU: &[SpecialKind] = &[Geminate];
const ANY: &[SpecialKind] = &[];

pub static LETTER_CLASSES: &[LetterClass] = &[
    class(&["あ", "い", "う", "え", "お"], "", "aiueo", "", "", &[22.0, 26.0, 20.0, 24.0, 20.0], NO_TU).soft(),
    class(&["や", "ゆ", "いぇ", "よ"], "y", "aueo", "", "", &[5.0, 8.0, 2.0, 5.0], NO_TU).y(),
    class(&["わ", "うぃ", "うぇ", "うぉ"], "w", "aieo", "", "", &[4.0, 2.0, 2.0, 2.0], NO_TU).w(),
    class(&["は", "ひ", "へ", "ほ"], "h", "aieo", "h", "h", &[10.0, 8.0, 4.0, 4.0], NO_TU),
    class(&["ひゃ", "ひゅ", "ひぇ", "ひょ"], "hy", "aueo", "h", "h", &[1.0, 1.0, 1.0, 1.0], NO_TU).y(),
    class(&["か", "き", "く", "け", "こ"], "k", "aiueo", "k", "k", &[10.0, 7.0, 10.0, 5.0, 5.0], ANY),
    class(&["きゃ", "きゅ", "きょ"], "ky", "auo", "k", "k", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["くぁ", "くぃ", "くぇ", "くぉ"], "qu", "aieo", "k", "k", &[1.0, 1.0, 1.0, 1.0], ANY).w(),
    class(&["が", "ぎ", "ぐ", "げ", "ご"], "g", "aiueo", "g", "k", &[5.0, 5.0, 5.0, 2.0, 2.0], ANY),
    class(&["ぎゃ", "ぎゅ", "ぎょ"], "gy", "auo", "g", "k", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["ぐぁ", "ぐぃ", "ぐぇ", "ぐぉ"], "gw", "aieo", "g", "k", &[1.0, 1.0, 1.0, 1.0], ANY).w(),
    class(&["ぱ", "ぴ", "ぷ", "ぺ", "ぽ"], "p", "aiueo", "p", "k", &[5.0, 5.0, 3.0, 3.0, 3.0], ANY),
    class(&["ぴゃ", "ぴゅ", "ぴょ"], "py", "auo", "p", "k", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["ば", "び", "ぶ", "べ", "ぼ"], "b", "aiueo", "b", "k", &[2.0, 3.0, 1.0, 1.0, 1.0], ANY),
    class(&["びゃ", "びゅ", "びょ"], "by", "auo", "b", "k", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["た", "てぃ", "とぅ", "て", "と"], "t", "aiueo", "t", "k", &[4.0, 8.0, 7.0, 5.0, 4.0], ANY),
    class(&["てゃ", "てゅ", "てょ"], "ty", "auo", "t", "k", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["だ", "でぃ", "どぅ", "で", "ど"], "d", "aiueo", "d", "k", &[3.0, 6.0, 3.0, 3.0, 3.0], ANY),
    class(&["でゅ"], "dy", "u", "d", "k", &[1.0], ANY).y(),
    class(&["さ", "すぃ", "す", "せ", "そ"], "s", "aiueo", "s", "s", &[10.0, 7.0, 10.0, 5.0, 5.0], ANY),
    class(&["すゅ"], "sy", "u", "s", "s", &[1.0], ANY).y(),
    class(&["ざ", "ずぃ", "ず", "ぜ", "ぞ"], "z", "aiueo", "z", "s", &[5.0, 6.0, 7.0, 5.0, 5.0], ANY),
    class(&["ずゅ"], "zy", "u", "z", "s", &[1.0], ANY).y(),
    class(&["つぁ", "つぃ", "つ", "つぇ", "つぉ"], "ts", "aiueo", "ts", "s", &[2.0, 2.0, 1.0, 1.0, 1.0], ANY),
    class(&["つゅ"], "tsy", "u", "ts", "s", &[1.0], ANY).y(),
    class(&["しゃ", "し", "しゅ", "しぇ", "しょ"], "sh", "aiueo", "sh", "s", &[3.0, 2.0, 3.0, 3.0, 3.0], ANY),
    class(&["じゃ", "じ", "じゅ", "じぇ", "じょ"], "j", "aiueo", "j", "s", &[2.0, 3.0, 4.0, 2.0, 2.0], ANY),
    class(&["ちゃ", "ち", "ちゅ", "ちぇ", "ちょ"], "ch", "aiueo", "ch", "s", &[4.0, 5.0, 4.0, 3.0, 3.0], ANY),
    class(&["ふぁ", "ふぃ", "ふ", "ふぇ", "ふぉ"], "f", "aiueo", "f", "s", &[3.0, 3.0, 8.0, 3.0, 3.0], ANY),
    class(&["ふゃ", "ふゅ", "ふょ"], "fy", "auo", "f", "s", &[1.0, 1.0, 1.0], ANY).y(),
    class(&["ゔぁ", "ゔぃ", "ゔ", "ゔぇ", "ゔぉ"], "v", "aiueo", "v", "s", &[1.0, 2.0, 4.0, 1.0, 1.0], ANY),
    class(&["ゔゅ"], "vy", "u", "v", "s", &[1.0], ANY).y(),
    class(&["な", "に", "ぬ", "ね", "の"], "n", "aiueo", "n", "n", &[10.0, 7.0, 5.0, 8.0, 8.0], NO_TU),
    class(&["にゃ", "にゅ", "にぇ", "にょ"], "ny", "aueo", "n", "n", &[1.0, 1.0, 1.0, 1.0], NO_TU).y(),
    class(&["ま", "み", "む", "め", "も"], "m", "aiueo", "m", "n", &[6.0, 7.0, 5.0, 7.0, 7.0], NO_TU),
    class(&["みゃ", "みゅ", "みぇ", "みょ"], "my", "aueo", "m", "n", &[1.0, 1.0, 1.0, 1.0], NO_TU).y(),
    class(&["ら", "り", "る", "れ", "ろ"], "r", "aiueo", "r", "n", &[10.0, 8.0, 12.0, 8.0, 5.0], NO_TU),
    class(&["りゃ", "りゅ", "りょ"], "ry", "auo", "r", "n", &[1.0, 1.0, 1.0], NO_TU).y(),
];

const fn marker(
    surface: &'static str,
    weight: f64,
    special: SpecialKind,
    not_after: &'static [SpecialKind],
    not_last: bool,
) -> Letter {
    Letter {
        surface,
        weight,
        row: "",
        consonant: None,
        consonant_class: None,
        vowel: None,
        special: Some(special),
        palatalized: false,
        labialized: false,
        soft: true,
        not_first: true,
        not_last,
        not_after,
    }
}

pub static MARKERS: &[Letter] = &[
    marker("っ", 30.0, Geminate, &[Geminate, MoraicNasal, LongVowel], true),
    marker("ん", 25.0, MoraicNasal, &[Geminate, MoraicNasal], false),
    marker("ー", 12.0, LongVowel, &[Geminate, MoraicNasal, LongVowel], false),
    marker("～", 5.0, SmallVowel, &[Geminate, MoraicNasal, LongVowel, SmallVowel], false),
];

/// The immutable letter table.
///
/// `letters` holds the four markers followed by every syllable in table order.
/// Generation and parsing both work over it.
#[derive(Debug, Clone)]
pub struct PhoneticAlphabet {
    letters: Vec<Letter>,
    marker_count: usize,
}

impl PhoneticAlphabet {
    /// The built-in table, constructed on first use.
    pub fn standard() -> &'static PhoneticAlphabet {
        static STANDARD: OnceLock<PhoneticAlphabet> = OnceLock::new();
        STANDARD.get_or_init(|| {
            // The compiled-in table is covered by tests; failing here is a build defect.
            PhoneticAlphabet::build(LETTER_CLASSES, MARKERS)
                .expect("built-in letter table is well-formed")
        })
    }

    /// Expands the class templates and checks the table invariants.
    pub fn build(classes: &[LetterClass], markers: &[Letter]) -> Result<Self, ConfigurationError> {
        let mut letters: Vec<Letter> = markers.to_vec();
        for class in classes {
            letters.extend(expand_class(class)?);
        }

        let mut seen = HashSet::new();
        for letter in &letters {
            if !seen.insert(letter.surface) {
                return Err(ConfigurationError::MalformedTable(format!(
                    "duplicate surface form `{}`",
                    letter.surface
                )));
            }
            if !(letter.weight > 0.0 && letter.weight.is_finite()) {
                return Err(ConfigurationError::MalformedTable(format!(
                    "letter `{}` has non-positive weight {}",
                    letter.surface, letter.weight
                )));
            }
            if letter.surface.is_empty() {
                return Err(ConfigurationError::MalformedTable("empty surface form".into()));
            }
        }

        Ok(Self { letters, marker_count: markers.len() })
    }

    /// Generation alphabet: markers, then syllables.
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }

    pub fn markers(&self) -> &[Letter] {
        &self.letters[..self.marker_count]
    }

    pub fn find(&self, surface: &str) -> Option<&Letter> {
        self.letters.iter().find(|l| l.surface == surface)
    }
}

fn expand_class(class: &LetterClass) -> Result<Vec<Letter>, ConfigurationError> {
    let vowels: Vec<char> = class.vowels.chars().collect();
    if vowels.len() != class.surfaces.len() || vowels.len() != class.weights.len() {
        return Err(ConfigurationError::MalformedTable(format!(
            "row `{}` has {} vowels, {} surfaces and {} weights",
            class.row,
            vowels.len(),
            class.surfaces.len(),
            class.weights.len()
        )));
    }

    let onset = |s: &'static str| if s.is_empty() { VOWEL_ONSET } else { s };

    vowels
        .iter()
        .zip(class.surfaces)
        .zip(class.weights)
        .map(|((&v, &surface), &weight)| {
            let vowel = match Vowel::from_latin(v) {
                Some(vowel) => vowel,
                None => {
                    return Err(ConfigurationError::MalformedTable(format!(
                        "row `{}` has unknown vowel `{}`",
                        class.row, v
                    )))
                }
            };
            Ok(Letter {
                surface,
                weight,
                row: class.row,
                consonant: Some(onset(class.consonant)),
                consonant_class: Some(onset(class.consonant_class)),
                vowel: Some(vowel),
                special: None,
                palatalized: class.palatalized,
                labialized: class.labialized,
                soft: class.soft,
                not_first: false,
                not_last: false,
                not_after: class.not_after,
            })
        })
        .collect()
}
