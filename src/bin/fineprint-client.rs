use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use fineprint::client::{default_output_name, render_clause_view, AnalyzeClient, DEFAULT_SERVER};

#[derive(Parser, Debug)]
#[command(name = "fineprint-client", about = "Spot shady contract clauses in seconds")]
struct Cli {
    /// Base URL of the analysis server
    #[arg(long, global = true, env = "FINEPRINT_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a contract PDF and print the analysis
    Analyze {
        file: PathBuf,

        /// Print the structured record instead of the summary
        #[arg(long)]
        json: bool,

        /// Save the summary; without a value a dated file name is used
        #[arg(long, num_args = 0..=1)]
        output: Option<Option<PathBuf>>,
    },
    /// Tell us how useful the analysis was
    Feedback {
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        rating: u8,

        #[arg(long)]
        comments: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_target(false)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let client = AnalyzeClient::new(cli.server)?;

    match cli.command {
        Command::Analyze { file, json, output } => {
            let response = client.analyze(&file).await?;
            println!("Analysis complete!");

            if json {
                println!("{}", serde_json::to_string_pretty(&response.result_json)?);
            } else {
                let clause_view = render_clause_view(&response.result_json);
                if !clause_view.is_empty() {
                    println!("{}\n", clause_view);
                }
                println!("{}", response.result_text);
            }

            if let Some(target) = output {
                let path = target.unwrap_or_else(|| {
                    PathBuf::from(default_output_name(chrono::Local::now().date_naive()))
                });
                tokio::fs::write(&path, &response.result_text)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Saved summary to {}", path.display());
            }
        }
        Command::Feedback { rating, comments } => {
            let response = client.send_feedback(rating, comments).await?;
            println!("{}", response.message);
        }
    }

    Ok(())
}
