//! Store-backed session flow: feedback rounds, persistence, favourites.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tsimiguno_core::persistence::UserStore;
use tsimiguno_core::{EngineConfig, SampleSet, WordEngine};

fn engine_in(dir: &std::path::Path) -> WordEngine {
    let config = EngineConfig { data_dir: dir.to_path_buf(), candidates_count: 6, ..EngineConfig::default() };
    WordEngine::persistent(config).unwrap()
}

#[test]
fn new_user_gets_random_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(1);
    let words = engine.candidates_for("alice", &mut rng).unwrap();
    assert_eq!(words.len(), 6);
    assert!(words.iter().all(|w| engine.is_valid_word(w)));
}

#[test]
fn feedback_trains_and_persists_a_model() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(2);

    let words: SampleSet = [("かった", 1.0), ("あうえ", 0.0), ("さっき", 1.0)].into_iter().collect();
    let next = engine.feedback_for("alice", words, &mut rng).unwrap();
    assert_eq!(next.len(), 6);

    let state = UserStore::new(dir.path()).load("alice").unwrap();
    assert_eq!(state.samples.len(), 3);
    assert!(state.model.is_some());

    // a second engine over the same directory sees the stored model
    let again = engine_in(dir.path());
    assert_eq!(again.candidates_for("alice", &mut rng).unwrap().len(), 6);
}

#[test]
fn uniform_feedback_stores_samples_without_a_model() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(3);

    let words: SampleSet = [("かった", 1.0), ("さっき", 1.0)].into_iter().collect();
    engine.feedback_for("bob", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("bob").unwrap();
    assert_eq!(state.samples.len(), 2);
    assert!(state.model.is_none());

    // a later round with a different score brings the signal
    let words: SampleSet = [("あうえ", 0.0)].into_iter().collect();
    engine.feedback_for("bob", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("bob").unwrap();
    assert_eq!(state.samples.len(), 3);
    assert!(state.model.is_some());
}

#[test]
fn invalid_feedback_words_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(4);

    let words: SampleSet = [("かった", 1.0), ("hello", 0.0), ("あうえ", 0.0)].into_iter().collect();
    engine.feedback_for("carol", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("carol").unwrap();
    assert_eq!(state.samples.get("hello"), None);
    assert_eq!(state.samples.len(), 2);
    assert!(state.model.is_some());
}

#[test]
fn spelling_variants_are_stored_under_one_word() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(6);

    let words: SampleSet = [("かった", 1.0), ("カッタ", 0.0), (" かった ", 0.5), ("あうえ", 0.0)]
        .into_iter()
        .collect();
    engine.feedback_for("erin", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("erin").unwrap();
    let keys: Vec<&str> = state.samples.iter().map(|(w, _)| w).collect();
    assert_eq!(keys, ["あうえ", "かった"]);
    assert_eq!(state.samples.get("かった"), Some(1.0));

    // katakana in a later round overwrites the earlier hiragana score
    let words: SampleSet = [("カッタ", 0.0), ("さっき", 1.0)].into_iter().collect();
    engine.feedback_for("erin", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("erin").unwrap();
    assert_eq!(state.samples.len(), 3);
    assert_eq!(state.samples.get("かった"), Some(0.0));
    assert_eq!(engine.favorites_for("erin").unwrap(), ["さっき"]);
}

#[test]
fn uniform_merged_scores_keep_the_previous_model() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(7);

    let words: SampleSet = [("かった", 1.0), ("あうえ", 0.0)].into_iter().collect();
    engine.feedback_for("frank", words, &mut rng).unwrap();
    let trained = UserStore::new(dir.path()).load("frank").unwrap().model;
    assert!(trained.is_some());

    let words: SampleSet = [("あうえ", 1.0)].into_iter().collect();
    engine.feedback_for("frank", words, &mut rng).unwrap();
    let state = UserStore::new(dir.path()).load("frank").unwrap();
    assert_eq!(state.samples.get("あうえ"), Some(1.0));
    assert_eq!(state.model, trained);
}

#[test]
fn favourites_are_the_liked_words() {
    let dir = tempfile::tempdir().unwrap();
    let engine = engine_in(dir.path());
    let mut rng = StdRng::seed_from_u64(5);

    let words: SampleSet = [("もっか", 1.0), ("あうえ", 0.0), ("かった", 1.0)].into_iter().collect();
    engine.feedback_for("dave", words, &mut rng).unwrap();
    let words: SampleSet = [("もっか", 0.0)].into_iter().collect();
    engine.feedback_for("dave", words, &mut rng).unwrap();

    assert_eq!(engine.favorites_for("dave").unwrap(), ["かった"]);
    assert!(engine.favorites_for("nobody").unwrap().is_empty());
}
