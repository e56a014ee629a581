use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};

use phrasr::config::Config;
use phrasr::engine::progress::{self, PracticePick};
use phrasr::engine::segmenter;
use phrasr::engine::view::{self, FilterMode, SortMode};
use phrasr::session::phrase::{PhraseId, PhraseRecord};
use phrasr::session::phrase_store::PhraseStore;

#[derive(Parser)]
#[command(
    name = "phrasr",
    version,
    about = "Terminal practice coach for spoken scripts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Segment a script into phrases and save them as the phrase book
    Save {
        /// Script file; reads stdin when omitted
        file: Option<PathBuf>,
        /// Add to the existing phrase book instead of replacing it
        #[arg(long)]
        append: bool,
    },
    /// List phrases with optional filter and sort
    List {
        #[arg(short, long, default_value = "all")]
        filter: String,
        #[arg(short, long, default_value = "date")]
        sort: String,
    },
    /// Record a completed playback of a phrase
    Play {
        id: u64,
        /// Elapsed playback time in seconds
        seconds: f64,
    },
    /// Toggle the practiced flag on a phrase
    Practice { id: u64 },
    /// Replace the text of a phrase
    Edit { id: u64, text: String },
    /// Split a multi-sentence phrase into one phrase per sentence
    Split { id: u64 },
    /// Merge a phrase with the one immediately after it
    Merge { id: u64, next_id: u64 },
    /// Duplicate a phrase
    Dup { id: u64 },
    /// Delete a phrase
    Delete { id: u64 },
    /// Clear the practice statistics of a phrase
    Reset { id: u64 },
    /// Show today's progress toward the daily goal
    Progress,
    /// Pick the lowest-confidence phrase to practice next
    Next,
    /// List recently saved scripts
    Scripts,
    /// Rebuild the phrase book from a previously saved script
    LoadScript {
        /// 1-based index from `phrasr scripts`
        index: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    config.normalize();
    let mut store = PhraseStore::new(config);

    match cli.command {
        Command::Save { file, append } => {
            let raw = read_script(file.as_deref())?;
            save_script(&mut store, &raw, append)?;
        }
        Command::List { filter, sort } => {
            let filter = FilterMode::from_key(&filter).ok_or_else(|| {
                anyhow!("unknown filter {filter:?}, expected one of {:?}", FilterMode::keys())
            })?;
            let sort = SortMode::from_key(&sort).ok_or_else(|| {
                anyhow!("unknown sort {sort:?}, expected one of {:?}", SortMode::keys())
            })?;
            let shown = view::view(store.phrases(), filter, sort);
            if shown.is_empty() {
                println!("No phrases yet. Paste and save a script to get started.");
            }
            for p in &shown {
                print_phrase(p);
            }
            if let Some(avg) = progress::average_confidence(store.phrases()) {
                println!("Average confidence: {avg}%");
            }
        }
        Command::Play { id, seconds } => {
            let p = store.record_play(PhraseId(id), seconds)?;
            println!("Recorded {seconds:.0}s of playback:");
            print_phrase(&p);
        }
        Command::Practice { id } => {
            let p = store.toggle_practiced(PhraseId(id))?;
            if p.practiced {
                println!("Phrase marked as practiced.");
            } else {
                println!("Phrase marked as not practiced.");
            }
            print_progress(&store);
        }
        Command::Edit { id, text } => {
            let p = store.edit(PhraseId(id), &text)?;
            println!("Phrase updated:");
            print_phrase(&p);
        }
        Command::Split { id } => {
            let parts = store.split(PhraseId(id))?;
            println!("Split into {} phrases:", parts.len());
            for p in &parts {
                print_phrase(p);
            }
        }
        Command::Merge { id, next_id } => {
            let p = store.merge(PhraseId(id), PhraseId(next_id))?;
            println!("Merged:");
            print_phrase(&p);
        }
        Command::Dup { id } => {
            let p = store.duplicate(PhraseId(id))?;
            println!("Duplicated:");
            print_phrase(&p);
        }
        Command::Delete { id } => {
            let p = store.delete(PhraseId(id))?;
            println!("Deleted phrase {}: {}", p.id, p.text);
        }
        Command::Reset { id } => {
            let p = store.reset_stats(PhraseId(id))?;
            println!("Practice data reset:");
            print_phrase(&p);
        }
        Command::Progress => print_progress(&store),
        Command::Next => match progress::next_target(store.phrases()) {
            PracticePick::NoPhrases => {
                println!("No phrases to practice. Save a script first.");
            }
            PracticePick::AllConfident => {
                println!("All phrases have good confidence scores. Great job!");
            }
            PracticePick::Next(p) => {
                println!("Next practice target ({}%):", p.confidence);
                print_phrase(p);
            }
        },
        Command::Scripts => {
            let scripts = store.recent_scripts();
            if scripts.is_empty() {
                println!("No previous scripts found.");
            }
            // Newest first for display
            for (i, script) in scripts.iter().rev().enumerate() {
                println!("{}. {}", i + 1, preview(script));
            }
        }
        Command::LoadScript { index } => {
            let scripts = store.recent_scripts();
            let script = scripts
                .iter()
                .rev()
                .nth(index.checked_sub(1).context("index starts at 1")?)
                .with_context(|| format!("no script at index {index}"))?
                .clone();
            save_script(&mut store, &script, false)?;
        }
    }

    Ok(())
}

fn read_script(file: Option<&std::path::Path>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw).context("reading stdin")?;
            Ok(raw)
        }
    }
}

fn save_script(store: &mut PhraseStore, raw: &str, append: bool) -> Result<()> {
    let texts = segmenter::segment(raw);
    if texts.is_empty() {
        bail!("no usable phrases in the script");
    }
    store.remember_script(raw)?;
    if !append {
        store.clear()?;
    }
    let created = store.create(&texts)?;
    println!("Created {} practice phrases:", created.len());
    for p in &created {
        print_phrase(p);
    }
    Ok(())
}

fn print_phrase(p: &PhraseRecord) {
    let practiced = if p.practiced { "✓" } else { " " };
    println!(
        "[{:>3}] {practiced} {:>3}%  {:>2}x  {:<12} {}",
        p.id, p.confidence, p.spoken_count, p.tag, p.text
    );
}

fn print_progress(store: &PhraseStore) {
    let goal = store.config().daily_goal;
    let progress = progress::progress(store.phrases(), goal);
    let data = store.progress_data();
    println!(
        "{} of {goal} phrases practiced today ({}%)",
        progress.count, progress.percentage
    );
    if data.streak_days > 0 {
        println!(
            "{}-day streak (best {})",
            data.streak_days, data.best_streak
        );
    }
}

fn preview(script: &str) -> String {
    let flat: String = script.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > 60 {
        let cut: String = flat.chars().take(60).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
