use anyhow::Result;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{stdin, stdout, Write};
use tsimiguno_core::core::render::{romanize, to_katakana};
use tsimiguno_core::{EngineConfig, SampleSet, WordEngine};

const LIKED: f64 = 1.0;
const NOT_LIKED: f64 = 0.0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Script {
    Hiragana,
    Katakana,
    Latin,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let user = std::env::args().nth(1).unwrap_or_else(|| "local".to_string());
    let config = EngineConfig::load_or_default(&EngineConfig::path_from_env())?;
    let engine = WordEngine::persistent(config)?;
    let mut rng = rand::thread_rng();
    let mut script = Script::Hiragana;
    let mut candidates = engine.candidates_for(&user, &mut rng)?;

    loop {
        print_ui(&engine, &user, &candidates, script)?;

        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            break;
        }
        match input.trim() {
            "exit" => break,
            "kata" => script = if script == Script::Katakana { Script::Hiragana } else { Script::Katakana },
            "roma" => script = if script == Script::Latin { Script::Hiragana } else { Script::Latin },
            "fav" => {
                let favorites = engine.favorites_for(&user)?;
                println!("\n{}", "Favourites:".bold());
                for word in favorites {
                    println!("  {}", show(&engine, &word, script));
                }
                print!("\n[Enter] to continue ");
                stdout().flush()?;
                stdin().read_line(&mut String::new())?;
            }
            picks => {
                // "1 4 7": those are liked, the rest of the batch is not
                let liked: Vec<usize> = picks
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter_map(|s| s.parse::<usize>().ok())
                    .filter(|&n| n >= 1 && n <= candidates.len())
                    .collect();
                let feedback: SampleSet = candidates
                    .iter()
                    .enumerate()
                    .map(|(i, w)| (w.clone(), if liked.contains(&(i + 1)) { LIKED } else { NOT_LIKED }))
                    .collect();
                candidates = engine.feedback_for(&user, feedback, &mut rng)?;
            }
        }
    }

    println!("\nBye.");
    Ok(())
}

fn show(engine: &WordEngine, word: &str, script: Script) -> String {
    match script {
        Script::Hiragana => word.to_string(),
        Script::Katakana => to_katakana(word),
        Script::Latin => engine
            .parser()
            .parse(word)
            .map(|w| romanize(&w))
            .unwrap_or_else(|_| word.to_string()),
    }
}

fn print_ui(engine: &WordEngine, user: &str, candidates: &[String], script: Script) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), crossterm::cursor::MoveTo(0, 0))?;
    println!("{}", "Tsimiguno word lab".bold().cyan());
    println!("---------------------------------------------------------------");
    println!("Type the numbers of the words you like (e.g. `1 4 7`), or [Enter] for none.");
    println!("`fav` favourites, `kata` katakana, `roma` latin, `exit` to quit.\n");
    println!("User: {}\n", user.green());

    for (i, word) in candidates.iter().enumerate() {
        println!("  {:>2}: {}", (i + 1).to_string().yellow(), show(engine, word, script));
    }
    print!("\n> ");
    out.flush()?;
    Ok(())
}
