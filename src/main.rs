mod client;
mod config;
mod dialogue;
mod highlights;
mod lexicon;
mod metrics;
mod render;
mod transcript;

use anyhow::{Context, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use structopt::StructOpt;

use crate::client::anthropic::AnthropicClient;
use crate::config::{ClientConfig, Environment};
use crate::dialogue::{Dialogue, DialogueSettings};
use crate::highlights::Highlights;

const DEFAULT_MAX_TURNS: u32 = 30;
const DEFAULT_DELAY_SECS: f64 = 2.0;
const PREVIEW_CHARS: usize = 500;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "self-dialogue",
    about = "Let two model personas talk to each other and analyse the transcript"
)]
enum Command {
    /// Run a dialogue and save the transcript as JSON
    Converse {
        /// Maximum number of turns (prompted for when omitted; 30 if unparsable)
        #[structopt(short = "n", long, allow_hyphen_values = true)]
        max_turns: Option<String>,

        /// Delay between turns in seconds (prompted for when omitted; 2.0 if unparsable)
        #[structopt(short, long, allow_hyphen_values = true)]
        delay: Option<String>,

        /// Where to write the transcript
        #[structopt(short, long)]
        output: Option<PathBuf>,

        /// Path to client configuration TOML file
        #[structopt(short = "c", long)]
        config: Option<PathBuf>,
    },

    /// Convert a saved transcript into Markdown
    Render {
        /// Transcript JSON file
        input: PathBuf,

        /// Markdown output file (defaults to <input>_formatted.md)
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("self_dialogue=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    dotenv::dotenv().ok();

    match Command::from_args() {
        Command::Converse {
            max_turns,
            delay,
            output,
            config,
        } => converse(max_turns, delay, output, config.as_deref()).await,
        Command::Render { input, output } => render(&input, output).await,
    }
}

enum Outcome {
    Finished,
    Interrupted,
}

async fn converse(
    max_turns: Option<String>,
    delay: Option<String>,
    output: Option<PathBuf>,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let environment = Environment::load()?;
    let client_config = ClientConfig::load(config).await?;

    println!("🧪 Claude Self-Interaction Experiment");
    println!("{}", "=".repeat(60));

    let max_turns = match max_turns {
        Some(flag) => Answer::Flag(flag),
        None => Answer::Prompted(prompt("Enter maximum turns (default 30): ")?),
    };
    let delay = match delay {
        Some(flag) => Answer::Flag(flag),
        None => Answer::Prompted(prompt(
            "Enter delay between turns in seconds (default 2.0): ",
        )?),
    };
    let settings = settings_from_answers(&max_turns, &delay);

    println!(
        "\n🚀 Starting experiment with {} max turns, {}s delay...",
        settings.max_turns,
        settings.delay.as_secs_f64()
    );

    let client = AnthropicClient::new(environment.anthropic_api_key, client_config);
    let mut dialogue = Dialogue::new(client);

    let outcome = tokio::select! {
        () = dialogue.run(settings) => Outcome::Finished,
        _ = tokio::signal::ctrl_c() => Outcome::Interrupted,
    };

    let path = output.unwrap_or_else(transcript::default_transcript_path);

    match outcome {
        Outcome::Finished => {
            println!("{}", dialogue.analysis_report());

            dialogue.to_document().save(&path).await?;
            println!("\n💾 Results saved to: {}", path.display());

            println!("\n🎯 Experiment Complete!");
            println!("Conversation lasted {} turns", dialogue.turns().len());

            let metrics = dialogue.metrics();
            if metrics.consciousness_mentions > 0 {
                println!("🧠 Consciousness themes detected");
            }
            if metrics.spiritual_terms > 0 {
                println!("🕉️ Spiritual themes emerged");
            }
            Ok(())
        }
        Outcome::Interrupted => {
            println!("\n\n⏹️ Experiment interrupted by user");
            if !dialogue.turns().is_empty() {
                match dialogue.to_document().save(&path).await {
                    Ok(()) => println!("Partial results saved to: {}", path.display()),
                    Err(err) => eprintln!("❌ Could not save partial results: {err:#}"),
                }
            }
            std::process::exit(130);
        }
    }
}

/// Raw text of a numeric setting and where it came from.
#[derive(Debug)]
enum Answer {
    Flag(String),
    Prompted(String),
}

impl Answer {
    fn is_prompted(&self) -> bool {
        matches!(self, Answer::Prompted(_))
    }

    /// `Some(default)` for an empty answer, `None` when it does not parse.
    fn parse_or<T: FromStr>(&self, default: T) -> Option<T> {
        let (Answer::Flag(raw) | Answer::Prompted(raw)) = self;
        let raw = raw.trim();
        if raw.is_empty() {
            Some(default)
        } else {
            raw.parse().ok()
        }
    }
}

/// Turns the raw settings into values, falling back to defaults.
///
/// An unparsable flag falls back on its own. An unparsable prompted
/// answer resets every prompted value, leaving flag values alone.
fn settings_from_answers(max_turns: &Answer, delay: &Answer) -> DialogueSettings {
    let parsed_turns = max_turns.parse_or(DEFAULT_MAX_TURNS);
    let parsed_delay = delay.parse_or(DEFAULT_DELAY_SECS);

    let prompt_failed = (max_turns.is_prompted() && parsed_turns.is_none())
        || (delay.is_prompted() && parsed_delay.is_none());
    if prompt_failed {
        tracing::warn!("invalid numeric input, using defaults for prompted settings");
    }

    DialogueSettings {
        max_turns: resolve(max_turns, parsed_turns, DEFAULT_MAX_TURNS, prompt_failed),
        delay: delay_from_secs(resolve(delay, parsed_delay, DEFAULT_DELAY_SECS, prompt_failed)),
    }
}

fn resolve<T>(answer: &Answer, parsed: Option<T>, default: T, prompt_failed: bool) -> T {
    match parsed {
        Some(_) if prompt_failed && answer.is_prompted() => default,
        Some(value) => value,
        None => {
            if !answer.is_prompted() {
                tracing::warn!(?answer, "invalid numeric flag, using default");
            }
            default
        }
    }
}

/// Reads one trimmed line from stdin.
fn prompt(question: &str) -> anyhow::Result<String> {
    print!("{question}");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read from stdin")?;
    Ok(answer.trim().to_owned())
}

fn delay_from_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
        tracing::warn!(secs, "delay must be a finite, non-negative number; not waiting");
        Duration::ZERO
    })
}

async fn render(input: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| default_markdown_path(input));

    println!("🔄 Converting {} to markdown...", input.display());

    let markdown = render::render_file(input).await;
    if markdown.is_empty() {
        bail!("No Markdown produced from {}", input.display());
    }

    tokio::fs::write(&output, &markdown)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✅ Markdown saved to: {}", output.display());

    println!("📄 Preview of first {PREVIEW_CHARS} characters:");
    println!("{}", "=".repeat(50));
    if markdown.chars().count() > PREVIEW_CHARS {
        let preview: String = markdown.chars().take(PREVIEW_CHARS).collect();
        println!("{preview}...");
    } else {
        println!("{markdown}");
    }
    println!("{}", "=".repeat(50));

    let highlights = Highlights::from_file(input).await;
    if !highlights.is_empty() {
        println!("\n🎯 Conversation Highlights:");
        for (label, turn) in highlights.entries() {
            if let Some(turn) = turn {
                println!("  • {label}: Turn {turn}");
            }
        }
    }

    println!("\n✨ Conversion complete!");
    Ok(())
}

fn default_markdown_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_owned());
    input.with_file_name(format!("{stem}_formatted.md"))
}
