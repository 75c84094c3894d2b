// Simulated rater: a user with a fixed hidden taste rates every batch, and we
// watch how much of each new batch matches that taste.
// Run with: cargo run --bin tsimiguno_sim -- [rounds] [seed]
use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tsimiguno_core::core::types::{ParsedWord, SpecialKind};
use tsimiguno_core::{EngineConfig, PreferenceModel, SampleSet, Training, WordEngine};

const DEFAULT_ROUNDS: usize = 15;

/// Likes words with a geminate or a moraic nasal and no y-row syllables.
fn hidden_taste(word: &ParsedWord) -> f64 {
    let letters = word.letters();
    let has_marker = letters
        .iter()
        .any(|l| matches!(l.special, Some(SpecialKind::Geminate | SpecialKind::MoraicNasal)));
    let has_y = letters.iter().any(|l| l.palatalized);
    if has_marker && !has_y {
        1.0
    } else {
        0.0
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let rounds = args.next().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_ROUNDS);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0u64);

    let config = EngineConfig::load_or_default(&EngineConfig::path_from_env())?;
    let count = config.candidates_count;
    let engine = WordEngine::new(config)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut samples = SampleSet::new();
    let mut model: Option<PreferenceModel> = None;
    let mut candidates = engine.get_candidates(None, count, &mut rng);

    println!("round  liked/{count}  samples  model");
    for round in 1..=rounds {
        let mut batch = SampleSet::new();
        let mut liked = 0;
        for word in &candidates {
            let parsed = engine.parser().parse(word)?;
            let score = hidden_taste(&parsed);
            if score > 0.0 {
                liked += 1;
            }
            batch.insert(word.clone(), score);
        }

        let feedback = engine.submit_feedback(&batch, &samples)?;
        samples = feedback.samples;
        if let Training::Trained(updated) = feedback.training {
            model = Some(updated);
        }
        println!(
            "{round:>5}  {liked:>8}  {:>7}  {}",
            samples.len(),
            if model.is_some() { "trained" } else { "-" }
        );

        candidates = engine.get_candidates(model.as_ref(), count, &mut rng);
    }

    info!(rounds, samples = samples.len(), "simulation finished");
    Ok(())
}
