use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paper_digest::{
    config::Config, extract::extract_document, logging, metrics::METRICS,
    pipeline::{PaperDigest, PaperPipeline}, session::PaperSession,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "paper-digest", version, about = "Summarize academic papers and answer questions about them")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "PAPER_DIGEST_CONFIG")]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize the configured sections and the whole paper
    Digest {
        path: PathBuf,
        /// Print the digest as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one section's text
    Section {
        path: PathBuf,
        name: String,
        /// Summarize the section instead of printing it
        #[arg(long)]
        summarize: bool,
    },
    /// Process the paper and answer one question
    Ask { path: PathBuf, question: String },
    /// Process the paper, then answer questions until `exit`
    Chat { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init(&config.logging);

    let result = run(cli.command, &config).await;

    if cli.metrics {
        eprintln!("{}", METRICS.export_prometheus());
    }

    result
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let pipeline = PaperPipeline::from_config(config)?;

    match command {
        Command::Digest { path, json } => {
            let document = load(&path)?;
            let digest = pipeline.process(&document).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&digest)?);
            } else {
                print_digest(&digest);
            }
        }
        Command::Section {
            path,
            name,
            summarize,
        } => {
            let document = load(&path)?;
            if summarize {
                let section = pipeline.summarize_section(&document, &name).await?;
                println!("{}", section.summary);
            } else {
                let text = pipeline.locator().locate(&document, &name)?;
                if text.is_empty() {
                    println!("No {} section found.", name);
                } else {
                    println!("{}", text);
                }
            }
        }
        Command::Ask { path, question } => {
            let mut session = PaperSession::new(pipeline);
            session.process(load(&path)?).await?;
            println!("{}", session.respond(&question).await);
        }
        Command::Chat { path } => {
            let mut session = PaperSession::new(pipeline);
            let digest = session.process(load(&path)?).await?;
            print_digest(digest);
            chat(&session).await?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> Result<String> {
    extract_document(path).with_context(|| format!("reading {}", path.display()))
}

fn print_digest(digest: &PaperDigest) {
    println!("=== Summaries ===");
    for section in &digest.sections {
        println!("{} Summary:\n{}\n", section.name, section.summary);
    }
    println!("Full Paper Summary:\n{}\n", digest.full_summary);
}

async fn chat(session: &PaperSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Ask a question about the paper (or type 'exit' to quit): ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        println!("Answer: {}\n", session.respond(&line).await);
        println!("==========================");
    }

    Ok(())
}
