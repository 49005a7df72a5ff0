use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use mission_engine::{parse_status, ApiResponse, GenerateRequest, MissionEngine, VerifyRequest};
use serde::Serialize;

use crate::logging::LogDestination;

#[derive(Parser)]
#[command(name = "seo-missions", version, about = "Weekly SEO missions for a website")]
pub struct Cli {
    /// RON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Where log lines are written
    #[arg(long, value_enum, default_value_t = LogDestination::Terminal, global = true)]
    pub log: LogDestination,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze a site and print the detected issues
    Analyze {
        /// Domain or URL of the site
        domain: String,
    },
    /// Generate (or return the cached) missions for this week
    Generate(GenerateArgs),
    /// Show this week's stored missions with progress
    Show {
        domain: String,
        /// Any day of the week to show (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Change the status of one mission
    Status {
        /// Mission id as returned by `generate`
        id: String,
        /// pending, in_progress or completed
        status: String,
    },
    /// Check the live site to confirm a mission is done
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    domain: String,
    /// Target keyword; repeat for more
    #[arg(short, long = "keyword")]
    keywords: Vec<String>,
    /// Discard this week's missions and generate new ones
    #[arg(long)]
    force: bool,
    /// Any day of the target week (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args)]
pub struct VerifyArgs {
    domain: String,
    #[arg(long)]
    category: String,
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: Option<String>,
    /// Record the outcome on this stored mission
    #[arg(long)]
    id: Option<String>,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn render<T: Serialize>(response: &ApiResponse<T>) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(response)?)
}

impl Command {
    /// Run against `engine` and return the JSON envelope to print.
    pub async fn run(self, engine: &MissionEngine) -> anyhow::Result<(bool, String)> {
        match self {
            Command::Analyze { domain } => {
                let analysis = engine.analyze(&domain).await;
                Ok((true, render(&ApiResponse::ok(analysis))?))
            }
            Command::Generate(args) => {
                let request = GenerateRequest {
                    domain: args.domain,
                    keywords: args.keywords,
                    force_regenerate: args.force,
                };
                let result = engine
                    .generate(&request, args.date.unwrap_or_else(today))
                    .await;
                let response = ApiResponse::from(result);
                Ok((response.success, render(&response)?))
            }
            Command::Show { domain, date } => {
                let result = engine
                    .fetch_batch(&domain, date.unwrap_or_else(today))
                    .await;
                let response = ApiResponse::from(result);
                Ok((response.success, render(&response)?))
            }
            Command::Status { id, status } => {
                let result = match parse_status(&status) {
                    Ok(status) => engine.update_status(&id, status).await,
                    Err(err) => Err(err),
                };
                let response = ApiResponse::from(result);
                Ok((response.success, render(&response)?))
            }
            Command::Verify(args) => {
                let request = VerifyRequest {
                    domain: args.domain,
                    category: args.category,
                    title: args.title,
                    description: args.description,
                };
                let verdict = engine.verify(args.id.as_deref(), &request).await;
                Ok((true, render(&ApiResponse::ok(verdict))?))
            }
        }
    }
}
