use anyhow::Result;
use clap::{Parser, Subcommand};
use inference_hub::{
    config,
    hub::Hub,
    services::{
        CompletionMode, ImageFile, StyleMode,
        complete::{DEFAULT_MAX_NEW_TOKENS, DEFAULT_NUM_SEQUENCES},
        style_transfer::{DEFAULT_ALPHA, MAX_ALPHA, MIN_ALPHA},
        summarize::{DEFAULT_MAX_LENGTH, DEFAULT_MIN_LENGTH},
    },
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inference-hub", version, about = "Deep Learning API Hub client")]
struct Cli {
    /// Gateway serving the /api routes (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a piece of text
    Summarize {
        #[arg(long, required_unless_present = "file", conflicts_with = "file")]
        text: Option<String>,
        /// Read the text from a file
        #[arg(long)]
        file: Option<PathBuf>,
        /// Minimum summary length in words
        #[arg(
            long,
            default_value_t = DEFAULT_MIN_LENGTH,
            value_parser = clap::value_parser!(u32).range(10..=50)
        )]
        min_length: u32,
        /// Maximum summary length in words
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_LENGTH,
            value_parser = clap::value_parser!(u32).range(50..=200)
        )]
        max_length: u32,
    },
    /// Apply the style of one image to another
    Style {
        #[arg(long)]
        content: PathBuf,
        #[arg(long)]
        style: PathBuf,
        /// Style strength: 0.1 = subtle, 1.0 = full style transfer
        #[arg(long, default_value_t = DEFAULT_ALPHA, value_parser = parse_alpha)]
        alpha: f64,
        /// Skip blending with the content image
        #[arg(long)]
        raw: bool,
        /// Where to write the resulting image
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Continue a text prompt
    Complete {
        #[arg(long)]
        prompt: String,
        #[arg(
            long,
            default_value_t = DEFAULT_MAX_NEW_TOKENS,
            value_parser = clap::value_parser!(u32).range(20..=150)
        )]
        max_new_tokens: u32,
        /// Ask for several alternative completions
        #[arg(long)]
        multi: bool,
        #[arg(
            long,
            default_value_t = DEFAULT_NUM_SEQUENCES,
            requires = "multi",
            value_parser = clap::value_parser!(u32).range(2..=5)
        )]
        num_sequences: u32,
    },
}

fn parse_alpha(s: &str) -> std::result::Result<f64, String> {
    let alpha: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if !(MIN_ALPHA..=MAX_ALPHA).contains(&alpha) {
        return Err(format!(
            "alpha must be between {:.1} and {:.1}",
            MIN_ALPHA, MAX_ALPHA
        ));
    }
    Ok(alpha)
}

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

/// Builds the log filter: `RUST_LOG` directives win over the configured level.
fn log_filter(rust_log: Option<&str>, config_level: &str) -> Result<EnvFilter> {
    match rust_log {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| anyhow::anyhow!("Invalid RUST_LOG '{}': {}", directives, e)),
        None => {
            validate_log_level(config_level)?;
            Ok(EnvFilter::try_new(config_level)?)
        }
    }
}

fn init_logging(filter: EnvFilter, json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (before logging setup)
    let mut config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = match log_filter(rust_log.as_deref(), &config.logs.level) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    init_logging(filter, cli.json_logs);

    if let Some(base_url) = cli.base_url {
        config.gateway.base_url = base_url;
    }

    let mut hub = Hub::new(&config);

    let outcome = match cli.command {
        Command::Summarize {
            text,
            file,
            min_length,
            max_length,
        } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path).await?,
                (None, None) => String::new(),
            };

            let input = hub.summarizer.input_mut();
            input.text = text;
            input.min_length = min_length;
            input.max_length = max_length;

            hub.submit_summarize().await.map(|()| {
                if let Some(response) = hub.summarizer.result() {
                    println!("{}", response.summary);
                }
            })
        }
        Command::Style {
            content,
            style,
            alpha,
            raw,
            output,
        } => {
            let input = hub.style_transfer.input_mut();
            input.content_image = Some(ImageFile::load(&content).await?);
            input.style_image = Some(ImageFile::load(&style).await?);
            input.alpha = alpha;
            input.mode = if raw { StyleMode::Raw } else { StyleMode::Blended };

            match hub.submit_style_transfer().await {
                Ok(()) => {
                    if let Some(response) = hub.style_transfer.result() {
                        response.result_image.write_to(&output).await?;
                        info!("Wrote {}", response.result_image.url());
                        println!("{}", output.display());
                    }
                    hub.style_transfer.reset();
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        Command::Complete {
            prompt,
            max_new_tokens,
            multi,
            num_sequences,
        } => {
            let input = hub.completion.input_mut();
            input.prompt = prompt;
            input.max_new_tokens = max_new_tokens;
            input.mode = if multi {
                CompletionMode::Multi
            } else {
                CompletionMode::Single
            };
            input.num_sequences = num_sequences;

            hub.submit_completion().await.map(|()| {
                if let Some(response) = hub.completion.result() {
                    let numbered = response.completions.len() > 1;
                    for (index, completion) in response.completions.iter().enumerate() {
                        if numbered {
                            println!("--- Option {} ---", index + 1);
                        }
                        println!("{}", completion);
                    }
                }
            })
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}
