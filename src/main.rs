use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use reel::{parse_tags, Config, Difficulty, FileStore, Repertoire, Tune};

/// Track a repertoire of ABC tunes and schedule practice.
#[derive(Parser, Debug)]
#[command(name = "reel")]
#[command(version)]
struct Args {
    /// YAML config file
    #[arg(short, long, env = "REEL_CONFIG", default_value = "reel.yaml")]
    config: PathBuf,

    /// Directory holding the tune and session collections (overrides config)
    #[arg(short, long, env = "REEL_STORE_DIR")]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a tune from an ABC file ("-" reads stdin)
    Add {
        file: PathBuf,
        #[arg(short, long, default_value_t = 3)]
        difficulty: u8,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
    },
    /// List all tunes
    List,
    /// Show one tune and its recent sessions
    Show { id: Uuid },
    /// Replace a tune's notation from an ABC file ("-" reads stdin)
    Edit { id: Uuid, file: PathBuf },
    /// Set tags, difficulty and notes
    Tag {
        id: Uuid,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
        #[arg(short, long)]
        difficulty: Option<u8>,
        /// Free-text notes ("" clears them)
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a tune (its practice history is kept)
    Delete { id: Uuid },
    /// List tunes due for practice
    Due,
    /// Show the next tune to practice
    Next,
    /// Record a practice session
    Practice {
        id: Uuid,
        /// How well it went, 1-5
        #[arg(short, long)]
        rating: u8,
        #[arg(short, long, default_value_t = 0)]
        minutes: u32,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Write every tune to one tunebook (stdout if no file given)
    Export { output: Option<PathBuf> },
    /// Import every tune in a tunebook file ("-" reads stdin)
    Import { file: PathBuf },
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Error reading file '{}'", path.display()))
}

fn summary(tune: &Tune) -> String {
    let next = tune
        .next_review
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never practiced".to_string());
    format!(
        "{}  {} ({} in {})  next: {}",
        tune.id, tune.title, tune.rhythm_type, tune.key, next
    )
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config.display()))?;
    let store_dir = args.store_dir.unwrap_or_else(|| config.store_dir.clone());
    info!(store = %store_dir.display(), "opening store");

    let mut store = FileStore::new(store_dir);
    let mut repertoire =
        Repertoire::load(&store, config.headers.clone()).context("Failed to load repertoire")?;
    let now = Utc::now();

    let dirty = match args.command {
        Command::Add {
            file,
            difficulty,
            tags,
        } => {
            let notation = read_input(&file)?;
            let difficulty = Difficulty::new(difficulty)?;
            let id = repertoire.add_tune(&notation, difficulty, parse_tags(&tags));
            println!("{}", id);
            true
        }
        Command::List => {
            for tune in repertoire.tunes() {
                println!("{}", summary(tune));
            }
            false
        }
        Command::Show { id } => {
            let Some(tune) = repertoire.get(id) else {
                bail!("No tune with id {}", id);
            };
            println!("{}", summary(tune));
            println!("difficulty: {}/5", tune.difficulty.get());
            if !tune.tags.is_empty() {
                println!("tags: {}", tune.tags.join(", "));
            }
            if let Some(notes) = &tune.notes {
                println!("notes: {}", notes);
            }
            println!("\n{}\n", tune.notation_text);
            for session in repertoire.recent_sessions(id, config.recent_sessions) {
                println!(
                    "{}  quality {}/5  {} min  {}",
                    session.date.format("%Y-%m-%d"),
                    session.quality.get(),
                    session.duration_minutes,
                    session.notes.as_deref().unwrap_or("")
                );
            }
            false
        }
        Command::Edit { id, file } => {
            let notation = read_input(&file)?;
            let tune = repertoire.update_notation(id, &notation)?;
            println!("{}", summary(tune));
            true
        }
        Command::Tag {
            id,
            tags,
            difficulty,
            notes,
        } => {
            if let Some(tags) = tags {
                repertoire.set_tags(id, parse_tags(&tags))?;
            }
            if let Some(difficulty) = difficulty {
                repertoire.set_difficulty(id, Difficulty::new(difficulty)?)?;
            }
            if let Some(notes) = notes {
                repertoire.set_notes(id, Some(notes.as_str()))?;
            }
            true
        }
        Command::Delete { id } => {
            let tune = repertoire.delete_tune(id)?;
            eprintln!("Deleted {}", tune.title);
            true
        }
        Command::Due => {
            for tune in repertoire.due(now) {
                println!("{}", summary(tune));
            }
            false
        }
        Command::Next => {
            match repertoire.next_due(now) {
                Some(tune) => {
                    println!("{}", summary(tune));
                    println!("\n{}", tune.notation_text);
                }
                None => eprintln!("You're all caught up! No tunes are due for practice."),
            }
            false
        }
        Command::Practice {
            id,
            rating,
            minutes,
            notes,
        } => {
            let tune = repertoire.practice(id, rating, minutes, notes.as_deref(), now)?;
            println!("{}", summary(tune));
            true
        }
        Command::Export { output } => {
            let book = repertoire.export();
            match output {
                Some(path) => {
                    fs::write(&path, &book)
                        .with_context(|| format!("Error writing to '{}'", path.display()))?;
                    eprintln!("Wrote tunebook to {}", path.display());
                }
                None => println!("{}", book),
            }
            false
        }
        Command::Import { file } => {
            let text = read_input(&file)?;
            let ids = repertoire.import(&text)?;
            eprintln!("Imported {} tunes", ids.len());
            true
        }
    };

    if dirty {
        repertoire.save(&mut store).context("Failed to save repertoire")?;
    }
    Ok(())
}
