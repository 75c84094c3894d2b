// src/core/render.rs
use crate::core::types::{Letter, ParsedWord, SpecialKind, Vowel};

/// Consonants whose spelling switches to the alternate voiced form after a geminate.
const GEMINATE_VOICED: [&str; 2] = ["j", "z"];

/// Inverse of the parser's voiced-spelling fold.
fn voiced_alternate(c: char) -> Option<&'static str> {
    match c {
        'ざ' => Some("づぁ"),
        'じ' => Some("ぢ"),
        'ず' => Some("づ"),
        'ぜ' => Some("づぇ"),
        'ぞ' => Some("づぉ"),
        _ => None,
    }
}

/// Renders a word to its user-facing kana spelling.
pub fn render(word: &ParsedWord) -> String {
    let mut out = String::new();
    let mut previous: Option<&Letter> = None;
    for letter in word.letters() {
        if letter.special == Some(SpecialKind::SmallVowel) {
            if let Some(vowel) = previous.and_then(|p| p.vowel) {
                out.push_str(vowel.small_kana());
            }
        } else if previous.map_or(false, |p| p.special == Some(SpecialKind::Geminate))
            && letter.consonant.map_or(false, |c| GEMINATE_VOICED.contains(&c))
        {
            for c in letter.surface.chars() {
                match voiced_alternate(c) {
                    Some(alt) => out.push_str(alt),
                    None => out.push(c),
                }
            }
        } else {
            out.push_str(letter.surface);
        }
        previous = Some(letter);
    }
    out
}

/// Katakana spelling of a rendered hiragana word.
pub fn to_katakana(surface: &str) -> String {
    surface
        .chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// Latin reading of a word.
pub fn romanize(word: &ParsedWord) -> String {
    let letters = word.letters();
    let mut out = String::new();
    for (i, letter) in letters.iter().enumerate() {
        match letter.special {
            None => {
                out.push_str(letter.row);
                if let Some(vowel) = letter.vowel {
                    out.push_str(vowel.latin());
                }
            }
            Some(SpecialKind::MoraicNasal) => out.push('n'),
            Some(SpecialKind::Geminate) => {
                let next_row = letters.get(i + 1).map(|l| l.row).unwrap_or("");
                match next_row {
                    "" => out.push('t'),
                    row if row.starts_with("ch") => out.push('t'),
                    row => out.extend(row.chars().next()),
                }
            }
            Some(SpecialKind::LongVowel) => {
                if let Some(vowel) = previous_vowel(letters, i) {
                    if out.ends_with(vowel.latin()) {
                        out.pop();
                    }
                    out.push_str(vowel.macron());
                }
            }
            Some(SpecialKind::SmallVowel) => {
                if let Some(vowel) = previous_vowel(letters, i) {
                    out.push_str(vowel.latin());
                }
            }
        }
    }
    out
}

fn previous_vowel(letters: &[Letter], i: usize) -> Option<Vowel> {
    i.checked_sub(1).and_then(|p| letters[p].vowel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::WordParser;

    fn parse(s: &str) -> ParsedWord {
        WordParser::standard().parse(s).unwrap()
    }

    #[test]
    fn plain_words_render_verbatim() {
        assert_eq!(render(&parse("かった")), "かった");
        assert_eq!(render(&parse("きゃりん")), "きゃりん");
    }

    #[test]
    fn small_vowel_follows_previous_vowel() {
        assert_eq!(render(&parse("かぁ")), "かぁ");
        // the glyph is derived from the vowel, not from the input spelling
        assert_eq!(render(&parse("かぃ")), "かぁ");
        assert_eq!(render(&parse("しぉ")), "しぃ");
    }

    #[test]
    fn geminate_voicing_uses_alternate_spelling() {
        assert_eq!(render(&parse("かっじゃ")), "かっぢゃ");
        assert_eq!(render(&parse("かっざ")), "かっづぁ");
        assert_eq!(render(&parse("かっずぃ")), "かっづぃ");
        assert_eq!(render(&parse("じゃ")), "じゃ");
    }

    #[test]
    fn katakana_display() {
        assert_eq!(to_katakana("かっぢゃー"), "カッヂャー");
        assert_eq!(to_katakana("ゔぁ～"), "ヴァ～");
    }

    #[test]
    fn romanization() {
        assert_eq!(romanize(&parse("かった")), "katta");
        assert_eq!(romanize(&parse("まっちゃ")), "matcha");
        assert_eq!(romanize(&parse("きょーと")), "kyōto");
        assert_eq!(romanize(&parse("しんぶん")), "shinbun");
        assert_eq!(romanize(&parse("かぁ")), "kaa");
        assert_eq!(romanize(&parse("うぃ")), "wi");
    }
}
