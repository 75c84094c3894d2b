// src/core/generator.rs
use crate::core::alphabet::PhoneticAlphabet;
use crate::core::types::{Letter, ParsedWord, SpecialKind};
use crate::error::ConfigurationError;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::debug;

/// Weight of the shortest and longest lengths relative to interior ones.
const EDGE_LENGTH_WEIGHT: f64 = 0.2;

/// Target-length distribution biased toward medium-length words.
#[derive(Debug, Clone)]
pub struct LengthDistribution {
    min: usize,
    max: usize,
    index: WeightedIndex<f64>,
}

impl LengthDistribution {
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigurationError> {
        if min == 0 || min > max {
            return Err(ConfigurationError::InvalidLengthRange { min, max });
        }
        let weights = (min..=max).map(|len| if len == min || len == max { EDGE_LENGTH_WEIGHT } else { 1.0 });
        let index = WeightedIndex::new(weights)
            .map_err(|_| ConfigurationError::InvalidLengthRange { min, max })?;
        Ok(Self { min, max, index })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.min + self.index.sample(rng)
    }
}

/// Letters allowed in one positional context, with their weighted picker.
#[derive(Debug, Clone)]
struct Pool {
    letters: Vec<usize>,
    index: WeightedIndex<f64>,
}

/// Where a position sits in the word, which decides the positional bans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Word-initial and word-final at once (single-letter words).
    Only,
    First,
    Middle,
    Last,
}

impl Slot {
    fn of(position: usize, length: usize) -> Self {
        match (position == 0, position + 1 == length) {
            (true, true) => Slot::Only,
            (true, false) => Slot::First,
            (false, false) => Slot::Middle,
            (false, true) => Slot::Last,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Slot::Only => "the only position",
            Slot::First => "the first position",
            Slot::Middle => "a middle position",
            Slot::Last => "the last position",
        }
    }

    fn admits(self, letter: &Letter) -> bool {
        let first = matches!(self, Slot::Only | Slot::First);
        let last = matches!(self, Slot::Only | Slot::Last);
        !(first && letter.not_first) && !(last && letter.not_last)
    }
}

/// Draws random letter sequences, one letter at a time, remembering only the
/// previous letter's marker kind.
///
/// Every candidate pool is built up front, so a table that could leave some
/// position without candidates is rejected here and `generate` cannot fail.
#[derive(Debug, Clone)]
pub struct WordGenerator<'a> {
    alphabet: &'a PhoneticAlphabet,
    lengths: LengthDistribution,
    /// Indexed by [`WordGenerator::pool_key`].
    pools: Vec<Pool>,
}

impl WordGenerator<'static> {
    pub fn standard(min_length: usize, max_length: usize) -> Result<Self, ConfigurationError> {
        Self::new(PhoneticAlphabet::standard(), LengthDistribution::new(min_length, max_length)?)
    }
}

impl<'a> WordGenerator<'a> {
    pub fn new(alphabet: &'a PhoneticAlphabet, lengths: LengthDistribution) -> Result<Self, ConfigurationError> {
        let mut pools = Vec::new();
        for slot in [Slot::Only, Slot::First, Slot::Middle, Slot::Last] {
            for previous in Self::predecessors(slot) {
                let letters: Vec<usize> = alphabet
                    .letters()
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| slot.admits(l) && l.allowed_after(previous))
                    .map(|(i, _)| i)
                    .collect();
                let weights = letters.iter().map(|&i| alphabet.letters()[i].weight);
                let index = WeightedIndex::new(weights).map_err(|_| ConfigurationError::EmptyCandidatePool {
                    position: slot.name(),
                    after: previous,
                })?;
                debug!(slot = slot.name(), ?previous, candidates = letters.len(), "built letter pool");
                pools.push(Pool { letters, index });
            }
        }
        Ok(Self { alphabet, lengths, pools })
    }

    /// Generates one word with a length drawn from the length distribution.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> ParsedWord {
        let length = self.lengths.sample(rng);
        self.generate_with_length(length, rng)
    }

    fn generate_with_length<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> ParsedWord {
        let mut letters: Vec<Letter> = Vec::with_capacity(length);
        for position in 0..length {
            let previous = letters.last().and_then(|l| l.special);
            let pool = &self.pools[Self::pool_key(Slot::of(position, length), previous)];
            let chosen = pool.letters[pool.index.sample(rng)];
            letters.push(self.alphabet.letters()[chosen].clone());
        }
        ParsedWord::from_nonempty(letters)
    }

    /// Predecessor marker kinds a slot can see. Initial slots have no predecessor.
    fn predecessors(slot: Slot) -> Vec<Option<SpecialKind>> {
        match slot {
            Slot::Only | Slot::First => vec![None],
            Slot::Middle | Slot::Last => std::iter::once(None).chain(SpecialKind::ALL.map(Some)).collect(),
        }
    }

    fn pool_key(slot: Slot, previous: Option<SpecialKind>) -> usize {
        let offset = |p: Option<SpecialKind>| match p {
            None => 0,
            Some(kind) => 1 + SpecialKind::ALL.iter().position(|k| *k == kind).unwrap_or(0),
        };
        match slot {
            Slot::Only => 0,
            Slot::First => 1,
            Slot::Middle => 2 + offset(previous),
            Slot::Last => 7 + offset(previous),
        }
    }
}
