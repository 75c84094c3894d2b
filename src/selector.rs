// File: src/selector.rs
use crate::config::EngineConfig;
use crate::core::generator::WordGenerator;
use crate::core::types::ParsedWord;
use crate::error::ConfigurationError;
use crate::learning::PreferenceModel;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// How a candidate batch is split between exploitation and exploration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Generated words per requested candidate.
    pub pool_multiplier: usize,
    /// Size of the top-ranked window per requested candidate.
    pub top_window_multiplier: usize,
    /// Percent of the batch drawn from the top window, rounded up.
    pub exploit_percent: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self { pool_multiplier: 100, top_window_multiplier: 3, exploit_percent: 90 }
    }
}

impl SelectionPolicy {
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigurationError> {
        let policy = Self {
            pool_multiplier: config.pool_multiplier,
            top_window_multiplier: config.top_window_multiplier,
            exploit_percent: config.exploit_percent,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.exploit_percent > 100 {
            return Err(ConfigurationError::InvalidSelection(format!(
                "exploit_percent {} exceeds 100",
                self.exploit_percent
            )));
        }
        if self.top_window_multiplier == 0 || self.pool_multiplier < self.top_window_multiplier + 1 {
            return Err(ConfigurationError::InvalidSelection(format!(
                "pool multiplier {} must exceed top window multiplier {}",
                self.pool_multiplier, self.top_window_multiplier
            )));
        }
        Ok(())
    }

    /// Number of candidates taken from the top window for a batch of `count`.
    pub fn exploit_count(&self, count: usize) -> usize {
        (count * self.exploit_percent + 99) / 100
    }
}

/// Proposes new words: most from the model's favourites, a few from the rest
/// of the pool so the user keeps seeing different shapes.
pub struct CandidateSelector<'g, 'a> {
    generator: &'g WordGenerator<'a>,
    policy: SelectionPolicy,
}

impl<'g, 'a> CandidateSelector<'g, 'a> {
    pub fn new(generator: &'g WordGenerator<'a>, policy: SelectionPolicy) -> Self {
        Self { generator, policy }
    }

    /// Returns exactly `count` display forms in random order.
    pub fn select<R: Rng + ?Sized>(&self, count: usize, model: &PreferenceModel, rng: &mut R) -> Vec<String> {
        if count == 0 {
            return Vec::new();
        }
        let pool: Vec<ParsedWord> = (0..count * self.policy.pool_multiplier)
            .map(|_| self.generator.generate(rng))
            .collect();
        let ranked: Vec<String> = model.rank(&pool).into_iter().map(|r| r.display).collect();

        let window = (count * self.policy.top_window_multiplier).min(ranked.len());
        let (top, rest) = ranked.split_at(window);
        let exploit = self.policy.exploit_count(count).min(top.len());
        let explore = (count - exploit).min(rest.len());
        debug!(pool = ranked.len(), window, exploit, explore, "selecting candidates");

        let mut candidates: Vec<String> = top.choose_multiple(rng, exploit).cloned().collect();
        candidates.extend(rest.choose_multiple(rng, explore).cloned());
        candidates.shuffle(rng);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SgdConfig;
    use crate::core::samples::SampleSet;
    use crate::core::parser::WordParser;
    use crate::learning::LearningEngine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn model() -> PreferenceModel {
        let samples: SampleSet = [("かった", 1.0), ("さっき", 1.0), ("あおい", 0.0), ("えいう", 0.0)]
            .into_iter()
            .collect();
        LearningEngine::new(SgdConfig::default())
            .learn(&WordParser::standard(), &samples)
            .unwrap()
            .into_model()
            .unwrap()
    }

    #[test]
    fn exploit_count_rounds_up() {
        let policy = SelectionPolicy::default();
        assert_eq!(policy.exploit_count(10), 9);
        assert_eq!(policy.exploit_count(1), 1);
        assert_eq!(policy.exploit_count(11), 10);
        assert_eq!(policy.exploit_count(30), 27);
    }

    #[test]
    fn policy_validation() {
        let mut policy = SelectionPolicy::default();
        assert!(policy.validate().is_ok());
        policy.exploit_percent = 101;
        assert!(policy.validate().is_err());
        let policy = SelectionPolicy { pool_multiplier: 3, top_window_multiplier: 3, exploit_percent: 90 };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn returns_exactly_count() {
        let generator = WordGenerator::standard(3, 8).unwrap();
        let selector = CandidateSelector::new(&generator, SelectionPolicy::default());
        let model = model();
        let mut rng = StdRng::seed_from_u64(3);
        for count in [1, 2, 10] {
            assert_eq!(selector.select(count, &model, &mut rng).len(), count);
        }
        assert!(selector.select(0, &model, &mut rng).is_empty());
    }
}
