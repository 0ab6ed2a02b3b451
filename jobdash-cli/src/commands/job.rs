//! Job command handlers
//!
//! Handles listing, adding and retrying jobs.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use colored::*;
use jobdash_client::DashboardClient;
use jobdash_core::domain::job::{JobRecord, JobStatus};
use jobdash_core::dto::job::{CreateJob, JobQuery};
use jobdash_core::query::SortKey;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List jobs
    List {
        /// Only jobs for this client (exact match)
        #[arg(long)]
        client: Option<String>,

        /// Only jobs with this status
        #[arg(long)]
        status: Option<JobStatus>,

        /// Job name contains (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Reference number contains (case-insensitive)
        #[arg(long = "ref")]
        ref_num: Option<String>,

        /// Executed on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Executed on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Sort order
        #[arg(long, value_enum)]
        sort: Option<SortArg>,

        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a new job
    Add {
        /// Client name
        #[arg(long)]
        client: String,

        /// Job name
        #[arg(long)]
        name: String,

        /// Job ID (next free id when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Comma-separated parameters, e.g. "-k eastus, -d prod"
        #[arg(long, default_value = "")]
        params: String,
    },
    /// Retry a job
    Retry {
        /// Job ID
        id: i64,

        /// Message to record instead of "Retried"
        #[arg(long)]
        message: Option<String>,
    },
    /// Show the clients and statuses present on the board
    Clients,
}

/// Sort keys as command-line values
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// Most recently executed first
    Executed,
    /// Client name, A to Z
    Client,
    /// Job ID, ascending
    Id,
    /// Most retried first
    Retries,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Executed => SortKey::ExecutedDateTime,
            SortArg::Client => SortKey::ClientName,
            SortArg::Id => SortKey::JobId,
            SortArg::Retries => SortKey::RetryCount,
        }
    }
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = DashboardClient::new(&config.server_url);

    match command {
        JobCommands::List {
            client: client_name,
            status,
            name,
            ref_num,
            from,
            to,
            sort,
            json,
        } => {
            let mut query = JobQuery::default().with_date_range(from, to);
            if let Some(client_name) = client_name {
                query = query.with_client(client_name);
            }
            if let Some(status) = status {
                query = query.with_status(status);
            }
            if let Some(name) = name {
                query = query.with_job_name(name);
            }
            if let Some(ref_num) = ref_num {
                query = query.with_ref_num(ref_num);
            }
            if let Some(sort) = sort {
                query = query.with_sort(sort.into());
            }
            list_jobs(&client, &query, json).await
        }
        JobCommands::Add {
            client: client_name,
            name,
            id,
            params,
        } => {
            let req = CreateJob {
                client: client_name,
                job_id: id,
                job_name: name,
                parameters: params,
            };
            add_job(&client, &req).await
        }
        JobCommands::Retry { id, message } => retry_job(&client, id, message).await,
        JobCommands::Clients => show_options(&client).await,
    }
}

async fn list_jobs(client: &DashboardClient, query: &JobQuery, json: bool) -> Result<()> {
    let jobs = client
        .list_jobs(query)
        .await
        .context("Failed to list jobs")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    if jobs.is_empty() {
        println!("{}", "No jobs available for the selected filter.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        print_job_table(&jobs);
    }

    Ok(())
}

async fn add_job(client: &DashboardClient, req: &CreateJob) -> Result<()> {
    let job = client.add_job(req).await.context("Failed to add job")?;

    println!(
        "{} Job '{}' added with ID {}",
        "✓".green(),
        job.job_name,
        job.job_id.to_string().cyan()
    );

    Ok(())
}

async fn retry_job(client: &DashboardClient, job_id: i64, message: Option<String>) -> Result<()> {
    let job = client
        .retry_job(job_id, message)
        .await
        .with_context(|| format!("Failed to retry job {}", job_id))?;

    println!(
        "{} Job {} marked for retry (attempt {})",
        "✓".green(),
        job.job_id.to_string().cyan(),
        job.retry_count
    );

    Ok(())
}

async fn show_options(client: &DashboardClient) -> Result<()> {
    let options = client
        .job_options()
        .await
        .context("Failed to fetch job options")?;

    println!("{}", "Clients:".bold());
    for name in &options.clients {
        println!("  {}", name);
    }
    println!("{}", "Statuses:".bold());
    for status in &options.statuses {
        println!("  {}", colorize_status(*status, status.as_str()));
    }

    Ok(())
}

const HEADERS: [&str; 9] = [
    "Client",
    "JobID",
    "JobName",
    "Parameters",
    "Status",
    "Message",
    "ExecutedDateTime",
    "RefNum",
    "RetryCount",
];

const STATUS_COLUMN: usize = 4;

fn table_row(job: &JobRecord) -> [String; 9] {
    [
        job.client.clone(),
        job.job_id.to_string(),
        job.job_name.clone(),
        job.parameters.join(","),
        job.status.to_string(),
        job.message.clone(),
        job.executed_at
            .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default(),
        job.ref_num.clone().unwrap_or_default(),
        job.retry_count.to_string(),
    ]
}

fn column_widths(rows: &[[String; 9]]) -> [usize; 9] {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths
}

/// Print jobs as an aligned table
///
/// Cells are padded before colouring so escape codes don't skew alignment.
fn print_job_table(jobs: &[JobRecord]) {
    let rows: Vec<[String; 9]> = jobs.iter().map(table_row).collect();
    let widths = column_widths(&rows);

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| format!("{:<w$}", h, w = w).bold().to_string())
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "─".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)).dimmed());

    for (job, row) in jobs.iter().zip(&rows) {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                let padded = format!("{:<w$}", cell, w = w);
                if i == STATUS_COLUMN {
                    colorize_status(job.status, &padded).to_string()
                } else {
                    padded
                }
            })
            .collect();
        println!("{}", cells.join("  "));
    }
}

/// Colorize job status for display
fn colorize_status(status: JobStatus, text: &str) -> ColoredString {
    match status {
        JobStatus::Pending => text.yellow(),
        JobStatus::Running => text.cyan(),
        JobStatus::Success => text.green(),
        JobStatus::Failed => text.red(),
        JobStatus::Retried => text.magenta(),
    }
}
