use crate::config::EngineConfig;
use crate::core::generator::WordGenerator;
use crate::core::parser::WordParser;
use crate::core::render::render;
use crate::core::samples::SampleSet;
use crate::error::Result;
use crate::learning::{LearningEngine, PreferenceModel, Training};
use crate::persistence::{UserState, UserStore};
use crate::selector::{CandidateSelector, SelectionPolicy};
use rand::Rng;
use tracing::{info, warn};

/// Outcome of merging one round of feedback.
#[derive(Debug, Clone)]
pub struct Feedback {
    /// Prior samples with the new scores applied on top.
    pub samples: SampleSet,
    pub training: Training,
}

/// Ties generation, learning and selection together behind the calls a
/// serving layer needs. Holds no per-user state of its own; with a store it
/// also loads and saves each user's samples and model.
pub struct WordEngine {
    config: EngineConfig,
    parser: WordParser<'static>,
    generator: WordGenerator<'static>,
    policy: SelectionPolicy,
    learning_engine: LearningEngine,
    store: Option<UserStore>,
}

impl WordEngine {
    /// An engine without storage; only the stateless calls are useful.
    pub fn new(config: EngineConfig) -> Result<Self> {
        let generator = WordGenerator::standard(config.min_length, config.max_length)?;
        let policy = SelectionPolicy::from_config(&config)?;
        Ok(Self {
            parser: WordParser::standard(),
            generator,
            policy,
            learning_engine: LearningEngine::new(config.sgd.clone()),
            store: None,
            config,
        })
    }

    /// An engine that keeps user state under `config.data_dir`.
    pub fn persistent(config: EngineConfig) -> Result<Self> {
        let store = UserStore::new(config.data_dir.clone());
        let mut engine = Self::new(config)?;
        engine.store = Some(store);
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn parser(&self) -> &WordParser<'static> {
        &self.parser
    }

    pub fn generator(&self) -> &WordGenerator<'static> {
        &self.generator
    }

    pub fn is_valid_word(&self, surface: &str) -> bool {
        self.parser.is_valid_word(surface)
    }

    /// Plain random words, for users without a model.
    pub fn random_words<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<String> {
        (0..count).map(|_| render(&self.generator.generate(rng))).collect()
    }

    /// `count` candidates: model-driven when a model exists, random otherwise.
    pub fn get_candidates<R: Rng + ?Sized>(
        &self,
        model: Option<&PreferenceModel>,
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        match model {
            Some(model) => CandidateSelector::new(&self.generator, self.policy).select(count, model, rng),
            None => self.random_words(count, rng),
        }
    }

    /// Merges `new_words` over `prior` and retrains when the merged scores
    /// carry a ranking signal. Every word must already be valid.
    pub fn submit_feedback(&self, new_words: &SampleSet, prior: &SampleSet) -> Result<Feedback> {
        let mut samples = prior.clone();
        samples.merge(new_words);
        let training = self.learning_engine.learn(&self.parser, &samples)?;
        Ok(Feedback { samples, training })
    }

    fn load_state(&self, user_id: &str) -> Result<UserState> {
        match &self.store {
            Some(store) => store.load(user_id),
            None => Ok(UserState::default()),
        }
    }

    fn save_state(&self, user_id: &str, state: &UserState) -> Result<()> {
        match &self.store {
            Some(store) => store.save(user_id, state),
            None => Ok(()), // Don't error if no store is set
        }
    }

    pub fn candidates_for<R: Rng + ?Sized>(&self, user_id: &str, rng: &mut R) -> Result<Vec<String>> {
        let state = self.load_state(user_id)?;
        Ok(self.get_candidates(state.model.as_ref(), self.config.candidates_count, rng))
    }

    /// Re-keys `words` under their rendered spelling, so katakana or padded
    /// input lands on the same sample as the hiragana form. A word already
    /// spelled as rendered wins over its variants within one batch.
    /// Returns the words that do not parse alongside.
    fn canonical_samples(&self, words: &SampleSet) -> (SampleSet, Vec<String>) {
        let mut canonical = SampleSet::new();
        let mut exact = Vec::new();
        let mut dropped = Vec::new();
        for (word, score) in words.iter() {
            match self.parser.parse(word) {
                Ok(parsed) => {
                    let key = render(&parsed);
                    if key == word {
                        exact.push((key, score));
                    } else {
                        canonical.insert(key, score);
                    }
                }
                Err(_) => dropped.push(word.to_string()),
            }
        }
        for (key, score) in exact {
            canonical.insert(key, score);
        }
        (canonical, dropped)
    }

    /// Records a round of feedback for `user_id` and returns the next batch.
    /// Words that do not parse are dropped before they reach the model.
    pub fn feedback_for<R: Rng + ?Sized>(
        &self,
        user_id: &str,
        words: SampleSet,
        rng: &mut R,
    ) -> Result<Vec<String>> {
        let (words, dropped) = self.canonical_samples(&words);
        if !dropped.is_empty() {
            warn!(user = user_id, ?dropped, "ignoring feedback for invalid words");
        }

        let mut state = self.load_state(user_id)?;
        let feedback = self.submit_feedback(&words, &state.samples)?;
        state.samples = feedback.samples;
        match feedback.training {
            Training::Trained(model) => {
                info!(user = user_id, samples = state.samples.len(), "model updated");
                state.model = Some(model);
            }
            Training::Skipped => {}
        }
        self.save_state(user_id, &state)?;

        Ok(self.get_candidates(state.model.as_ref(), self.config.candidates_count, rng))
    }

    pub fn favorites_for(&self, user_id: &str) -> Result<Vec<String>> {
        let state = self.load_state(user_id)?;
        Ok(state.samples.words_scored(self.config.favorite_score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> WordEngine {
        WordEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn cold_start_returns_random_valid_words() {
        let engine = engine();
        let mut rng = StdRng::seed_from_u64(1);
        let words = engine.get_candidates(None, 10, &mut rng);
        assert_eq!(words.len(), 10);
        assert!(words.iter().all(|w| engine.is_valid_word(w)));
    }

    #[test]
    fn identical_scores_leave_model_untouched() {
        let engine = engine();
        let new_words: SampleSet = [("かった", 1.0), ("さらだ", 1.0)].into_iter().collect();
        let feedback = engine.submit_feedback(&new_words, &SampleSet::new()).unwrap();
        assert!(feedback.training.is_skipped());
        assert_eq!(feedback.samples.len(), 2);
    }

    #[test]
    fn merged_scores_decide_training() {
        let engine = engine();
        let prior: SampleSet = [("かった", 0.0)].into_iter().collect();
        let new_words: SampleSet = [("さらだ", 1.0)].into_iter().collect();
        let feedback = engine.submit_feedback(&new_words, &prior).unwrap();
        assert!(!feedback.training.is_skipped());
    }

    #[test]
    fn new_scores_win_over_prior() {
        let engine = engine();
        let prior: SampleSet = [("かった", 0.0), ("さらだ", 1.0)].into_iter().collect();
        let new_words: SampleSet = [("かった", 1.0)].into_iter().collect();
        let feedback = engine.submit_feedback(&new_words, &prior).unwrap();
        assert_eq!(feedback.samples.get("かった"), Some(1.0));
        assert!(feedback.training.is_skipped());
    }

    #[test]
    fn spelling_variants_share_one_sample() {
        let engine = engine();
        let words: SampleSet = [("カッタ", 0.0), (" かった ", 0.5), ("かった", 1.0), ("ゆりあ", 0.0), ("xyz", 1.0)]
            .into_iter()
            .collect();
        let (canonical, dropped) = engine.canonical_samples(&words);
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical.get("かった"), Some(1.0));
        assert_eq!(canonical.get("ゆりあ"), Some(0.0));
        assert_eq!(dropped, ["xyz"]);

        let variants_only: SampleSet = [("カッタ", 0.0)].into_iter().collect();
        let (canonical, _) = engine.canonical_samples(&variants_only);
        assert_eq!(canonical.get("かった"), Some(0.0));
    }

    #[test]
    fn invalid_length_range_fails_construction() {
        let config = EngineConfig { min_length: 6, max_length: 2, ..EngineConfig::default() };
        assert!(WordEngine::new(config).is_err());
    }
}
