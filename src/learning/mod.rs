// File: src/learning/mod.rs
//! Preference model: maps feature vectors to a scalar score.
//!
//! The model is a plain record of three fitted stages:
//! 1. numeric partition: vocabulary + standard-deviation scaling,
//! 2. categorical partition: vocabulary + idf reweighting,
//! 3. a linear regressor over both partitions laid side by side.
//!
//! It is always refit from a user's complete sample set, so vocabulary and
//! scaling statistics never drift apart between training runs.

pub mod regressor;
pub mod transform;
pub mod vectorizer;

use crate::config::SgdConfig;
use crate::core::parser::WordParser;
use crate::core::render::render;
use crate::core::samples::SampleSet;
use crate::core::types::ParsedWord;
use crate::error::ParseError;
use crate::features::{extract, FeatureVector};
use regressor::LinearRegressor;
use serde::{Deserialize, Serialize};
use tracing::info;
use transform::{Scaler, TfidfWeights};
use vectorizer::{SparseRow, Vocabulary};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct NumericStage {
    vocabulary: Vocabulary,
    scaler: Scaler,
}

impl NumericStage {
    fn fit(features: &[FeatureVector]) -> (Self, Vec<SparseRow>) {
        let vocabulary = Vocabulary::fit(features.iter().flat_map(|f| f.numeric().map(|(k, _)| k)));
        let mut rows: Vec<SparseRow> = features.iter().map(|f| vocabulary.transform(f.numeric())).collect();
        let scaler = Scaler::fit(&rows, vocabulary.len());
        rows.iter_mut().for_each(|r| scaler.transform(r));
        (Self { vocabulary, scaler }, rows)
    }

    fn apply(&self, features: &FeatureVector) -> SparseRow {
        let mut row = self.vocabulary.transform(features.numeric());
        self.scaler.transform(&mut row);
        row
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct CategoricalStage {
    vocabulary: Vocabulary,
    tfidf: TfidfWeights,
}

impl CategoricalStage {
    fn fit(features: &[FeatureVector]) -> (Self, Vec<SparseRow>) {
        let vocabulary = Vocabulary::fit(features.iter().flat_map(|f| f.categorical().map(|(k, _)| k)));
        let mut rows: Vec<SparseRow> = features.iter().map(|f| vocabulary.transform(f.categorical())).collect();
        let tfidf = TfidfWeights::fit(&rows, vocabulary.len());
        rows.iter_mut().for_each(|r| tfidf.transform(r));
        (Self { vocabulary, tfidf }, rows)
    }

    fn apply(&self, features: &FeatureVector) -> SparseRow {
        let mut row = self.vocabulary.transform(features.categorical());
        self.tfidf.transform(&mut row);
        row
    }
}

/// Puts the categorical columns after the numeric ones.
fn concat(numeric: SparseRow, categorical: SparseRow, offset: usize) -> SparseRow {
    let mut row = numeric;
    row.extend(categorical.into_iter().map(|(c, v)| (c + offset, v)));
    row
}

/// A word with its predicted score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedWord {
    pub display: String,
    pub score: f64,
}

/// A trained preference model. Immutable once built; retraining yields a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceModel {
    numeric: NumericStage,
    categorical: CategoricalStage,
    regressor: LinearRegressor,
}

/// Result of a training request.
#[derive(Debug, Clone, PartialEq)]
pub enum Training {
    Trained(PreferenceModel),
    /// The samples carried no ranking signal (fewer than two distinct scores).
    Skipped,
}

impl Training {
    pub fn into_model(self) -> Option<PreferenceModel> {
        match self {
            Training::Trained(model) => Some(model),
            Training::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Training::Skipped)
    }
}

impl PreferenceModel {
    /// Fits the whole pipeline on `(word, score)` samples.
    pub fn train(samples: &[(ParsedWord, f64)], config: &SgdConfig) -> Training {
        let first = match samples.first() {
            Some(&(_, score)) => score,
            None => return Training::Skipped,
        };
        if samples.iter().all(|&(_, score)| score == first) {
            info!(samples = samples.len(), "all scores identical, skipping training");
            return Training::Skipped;
        }

        let features: Vec<FeatureVector> = samples.iter().map(|(w, _)| extract(w)).collect();
        let targets: Vec<f64> = samples.iter().map(|&(_, score)| score).collect();

        let (numeric, numeric_rows) = NumericStage::fit(&features);
        let (categorical, categorical_rows) = CategoricalStage::fit(&features);
        let offset = numeric.vocabulary.len();
        let dim = offset + categorical.vocabulary.len();
        let rows: Vec<SparseRow> = numeric_rows
            .into_iter()
            .zip(categorical_rows)
            .map(|(n, c)| concat(n, c, offset))
            .collect();

        let (regressor, report) = LinearRegressor::fit(&rows, &targets, dim, config);
        info!(
            samples = samples.len(),
            numeric_features = offset,
            categorical_features = dim - offset,
            epochs = report.epochs,
            converged = report.converged,
            loss = report.final_loss,
            "trained preference model"
        );

        Training::Trained(Self { numeric, categorical, regressor })
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        let row = concat(
            self.numeric.apply(features),
            self.categorical.apply(features),
            self.numeric.vocabulary.len(),
        );
        self.regressor.predict(&row)
    }

    pub fn score(&self, word: &ParsedWord) -> f64 {
        self.predict(&extract(word))
    }

    /// Scores a surface string; it must parse.
    pub fn score_surface(&self, parser: &WordParser<'_>, surface: &str) -> Result<f64, ParseError> {
        Ok(self.score(&parser.parse(surface)?))
    }

    /// Display forms with their scores, best first. Ties keep input order.
    pub fn rank(&self, words: &[ParsedWord]) -> Vec<RankedWord> {
        let mut ranked: Vec<RankedWord> = words
            .iter()
            .map(|w| RankedWord { display: render(w), score: self.score(w) })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    pub fn feature_count(&self) -> usize {
        self.numeric.vocabulary.len() + self.categorical.vocabulary.len()
    }
}

/// Turns accumulated feedback into a model.
pub struct LearningEngine {
    config: SgdConfig,
}

impl LearningEngine {
    pub fn new(config: SgdConfig) -> Self {
        Self { config }
    }

    /// Full refit over `samples`. Every word must parse.
    pub fn learn(&self, parser: &WordParser<'_>, samples: &SampleSet) -> Result<Training, ParseError> {
        if !samples.has_ranking_signal() {
            info!(samples = samples.len(), "no ranking signal in feedback, skipping training");
            return Ok(Training::Skipped);
        }
        let parsed = samples
            .iter()
            .map(|(word, score)| parser.parse(word).map(|w| (w, score)))
            .collect::<Result<Vec<_>, ParseError>>()?;
        Ok(PreferenceModel::train(&parsed, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> SampleSet {
        [
            ("かった", 1.0),
            ("かっか", 1.0),
            ("きっと", 1.0),
            ("こっく", 1.0),
            ("あおい", 0.0),
            ("えりあ", 0.0),
            ("おうい", 0.0),
            ("いえな", 0.0),
        ]
        .into_iter()
        .collect()
    }

    fn trained() -> PreferenceModel {
        LearningEngine::new(SgdConfig::default())
            .learn(&WordParser::standard(), &samples())
            .unwrap()
            .into_model()
            .unwrap()
    }

    #[test]
    fn identical_scores_skip_training() {
        let same: SampleSet = [("かった", 1.0), ("あおい", 1.0)].into_iter().collect();
        let training = LearningEngine::new(SgdConfig::default())
            .learn(&WordParser::standard(), &same)
            .unwrap();
        assert!(training.is_skipped());
        assert!(PreferenceModel::train(&[], &SgdConfig::default()).is_skipped());
    }

    #[test]
    fn invalid_words_are_reported() {
        let bad: SampleSet = [("かった", 1.0), ("abc", 0.0)].into_iter().collect();
        let err = LearningEngine::new(SgdConfig::default())
            .learn(&WordParser::standard(), &bad)
            .unwrap_err();
        assert!(matches!(err, ParseError::NoMatchingLetter { .. }));
    }

    #[test]
    fn learned_ranking_prefers_liked_shape() {
        let model = trained();
        let parser = WordParser::standard();
        let liked = model.score_surface(&parser, "かっと").unwrap();
        let disliked = model.score_surface(&parser, "あいえ").unwrap();
        assert!(liked > disliked, "{liked} <= {disliked}");
    }

    #[test]
    fn rank_is_descending_and_rendered() {
        let model = trained();
        let parser = WordParser::standard();
        let words: Vec<ParsedWord> = ["あいえ", "かっと", "かっじ"].iter().map(|w| parser.parse(w).unwrap()).collect();
        let ranked = model.rank(&words);
        assert_eq!(ranked.len(), 3);
        assert!(ranked.windows(2).all(|p| p[0].score >= p[1].score));
        assert!(ranked.iter().any(|r| r.display == "かっぢ"));
    }

    #[test]
    fn retraining_is_reproducible() {
        assert_eq!(trained(), trained());
        assert!(trained().feature_count() > 7);
    }

    #[test]
    fn model_survives_serialization() {
        let model = trained();
        let bytes = bincode::serialize(&model).unwrap();
        let back: PreferenceModel = bincode::deserialize(&bytes).unwrap();
        assert_eq!(model, back);
    }
}
