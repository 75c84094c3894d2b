// src/core/parser.rs
use crate::core::alphabet::PhoneticAlphabet;
use crate::core::types::{Letter, ParsedWord};
use crate::error::ParseError;

/// Spelling of the small-vowel marker inside the table.
const SMALL_VOWEL_MARKER: &str = "～";
const SMALL_VOWELS: [char; 5] = ['ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ'];

/// Secondary voiced spellings folded onto the z/j rows, longest first.
const VOICED_FOLDS: [(&str, &str); 5] = [
    ("ぢ", "じ"),
    ("づぁ", "ざ"),
    ("づぇ", "ぜ"),
    ("づぉ", "ぞ"),
    ("づ", "ず"),
];

/// Decomposes kana strings into alphabet letters by greedy longest match.
pub struct WordParser<'a> {
    alphabet: &'a PhoneticAlphabet,
    /// Alphabet letters sorted by descending surface length, table order kept on ties.
    by_length: Vec<&'a Letter>,
}

impl WordParser<'static> {
    pub fn standard() -> Self {
        Self::new(PhoneticAlphabet::standard())
    }
}

impl<'a> WordParser<'a> {
    pub fn new(alphabet: &'a PhoneticAlphabet) -> Self {
        let mut by_length: Vec<&Letter> = alphabet.letters().iter().collect();
        by_length.sort_by_key(|l| std::cmp::Reverse(l.char_len()));
        Self { alphabet, by_length }
    }

    pub fn alphabet(&self) -> &'a PhoneticAlphabet {
        self.alphabet
    }

    /// Parses a hiragana or katakana word.
    pub fn parse(&self, surface: &str) -> Result<ParsedWord, ParseError> {
        let mut rest = katakana_to_hiragana(surface.trim());
        let mut letters = Vec::new();

        while !rest.is_empty() {
            normalize_front(&mut rest);
            let letter = self
                .by_length
                .iter()
                .find(|l| rest.starts_with(l.surface))
                .ok_or_else(|| ParseError::NoMatchingLetter { remainder: rest.clone() })?;
            rest.replace_range(..letter.surface.len(), "");
            letters.push((*letter).clone());
        }

        ParsedWord::new(letters).ok_or(ParseError::EmptyInput)
    }

    pub fn is_valid_word(&self, surface: &str) -> bool {
        self.parse(surface).is_ok()
    }
}

/// Whether `surface` can be parsed against the standard alphabet.
pub fn is_valid_word(surface: &str) -> bool {
    WordParser::standard().is_valid_word(surface)
}

/// Rewrites the front of the remaining input into the spelling the table uses.
fn normalize_front(rest: &mut String) {
    if let Some(first) = rest.chars().next() {
        if SMALL_VOWELS.contains(&first) {
            rest.replace_range(..first.len_utf8(), SMALL_VOWEL_MARKER);
        }
    }
    for (alternate, primary) in VOICED_FOLDS {
        if rest.starts_with(alternate) {
            rest.replace_range(..alternate.len(), primary);
        }
    }
}

/// Folds katakana onto hiragana; other characters pass through.
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(c as u32 - 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SpecialKind;

    #[test]
    fn geminate_word_parses_into_three_letters() {
        let word = WordParser::standard().parse("かった").unwrap();
        assert_eq!(word.surfaces(), ["か", "っ", "た"]);
        assert_eq!(word.letters()[1].special, Some(SpecialKind::Geminate));
    }

    #[test]
    fn longest_match_wins() {
        let word = WordParser::standard().parse("きゃく").unwrap();
        assert_eq!(word.surfaces(), ["きゃ", "く"]);
        let word = WordParser::standard().parse("てぃと").unwrap();
        assert_eq!(word.surfaces(), ["てぃ", "と"]);
    }

    #[test]
    fn small_vowel_becomes_marker() {
        let word = WordParser::standard().parse("かぁん").unwrap();
        assert_eq!(word.surfaces(), ["か", "～", "ん"]);
    }

    #[test]
    fn alternate_voiced_spellings_fold() {
        let parser = WordParser::standard();
        assert_eq!(parser.parse("っぢゃ").unwrap().surfaces(), ["っ", "じゃ"]);
        assert_eq!(parser.parse("っづぁ").unwrap().surfaces(), ["っ", "ざ"]);
        assert_eq!(parser.parse("づぃ").unwrap().surfaces(), ["ずぃ"]);
        assert_eq!(parser.parse("づ").unwrap().surfaces(), ["ず"]);
    }

    #[test]
    fn katakana_is_accepted() {
        let word = WordParser::standard().parse("カッタ").unwrap();
        assert_eq!(word.surfaces(), ["か", "っ", "た"]);
        assert_eq!(katakana_to_hiragana("ヴァー"), "ゔぁー");
    }

    #[test]
    fn unknown_character_reports_remainder() {
        let err = WordParser::standard().parse("かxさ").unwrap_err();
        assert_eq!(err, ParseError::NoMatchingLetter { remainder: "xさ".into() });
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(WordParser::standard().parse("").unwrap_err(), ParseError::EmptyInput);
        assert!(!is_valid_word("  "));
    }

    #[test]
    fn parsed_letters_are_independent_of_the_table() {
        let mut word = WordParser::standard().parse("か").unwrap().letters().to_vec();
        word[0].weight = 999.0;
        assert_eq!(PhoneticAlphabet::standard().find("か").unwrap().weight, 10.0);
    }
}
