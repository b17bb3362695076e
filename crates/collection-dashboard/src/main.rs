//! AVM Family Fund collection dashboard
//!
//! Reads the monthly collection sheet and prints the dashboard, lists rows,
//! exports CSV reports or serves the JSON API.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::CONFIG;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use collection_dashboard::config::FileConfig;
use collection_dashboard::constants;
use collection_dashboard::filters::{FilterState, StatusFilter};
use collection_dashboard::model::{Status, StatusDistribution};
use collection_dashboard::reports::generate_all_reports;
use collection_dashboard::server::run_server;
use collection_dashboard::sheet::SheetClient;
use collection_dashboard::{load_rows, Dashboard, DataSource};

#[derive(Parser, Debug)]
#[command(name = "collection-dashboard")]
#[command(about = "Monthly collection dashboard for the AVM family fund")]
struct Args {
    /// Config file path (optional; defaults apply when missing)
    #[arg(short, long, default_value = constants::CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Read rows from a local CSV export instead of the sheet
    #[arg(long, global = true, conflicts_with = "offline")]
    csv: Option<PathBuf>,

    /// Use the built-in dataset without touching the network
    #[arg(long, global = true)]
    offline: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print KPIs, status distribution and monthly totals (default)
    Summary,

    /// List contributor rows
    Rows {
        /// Match family name, row number or monthly amount
        #[arg(short, long, default_value = "")]
        search: String,

        /// all, fully-paid, partial or unpaid
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },

    /// Write CSV reports
    Export {
        /// Output directory for generated CSV reports
        #[arg(short, long, default_value = "./output")]
        output_dir: PathBuf,
    },

    /// Serve the dashboard JSON API
    Serve {
        /// Bind address (overrides [server].host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides [server].port)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

// =============================================================================
// Console Tables
// =============================================================================

#[derive(Tabled)]
struct MetricLine {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct MonthLine {
    #[tabled(rename = "Month")]
    month: &'static str,
    #[tabled(rename = "Collected")]
    collected: String,
}

#[derive(Tabled)]
struct RowLine {
    #[tabled(rename = "No")]
    no: String,
    #[tabled(rename = "Family")]
    family: String,
    #[tabled(rename = "Monthly")]
    monthly: String,
    #[tabled(rename = "Collected")]
    collected: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Outstanding")]
    outstanding: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "Pending")]
    pending: String,
}

fn money(value: f64) -> String {
    format!("{} {:.2}", CONFIG.currency, value)
}

fn print_table<T: Tabled>(lines: Vec<T>) {
    println!("{}", Table::new(lines).with(Style::rounded()));
}

fn status_lines(distribution: &StatusDistribution) -> Vec<MetricLine> {
    Status::ALL
        .into_iter()
        .map(|status| MetricLine {
            metric: status.to_string(),
            value: distribution.count(status).to_string(),
        })
        .collect()
}

fn print_summary(dashboard: &Dashboard) {
    let kpis = &dashboard.kpis;

    println!("\n{} ({})", CONFIG.name, CONFIG.tagline);
    println!("Data: {}", dashboard.origin);
    println!("Generated: {}\n", dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    print_table(vec![
        MetricLine {
            metric: "Contributors".to_string(),
            value: kpis.contributors.to_string(),
        },
        MetricLine {
            metric: "Fully paid".to_string(),
            value: format!("{} ({:.1}%)", kpis.fully_paid, kpis.fully_paid_percentage),
        },
        MetricLine {
            metric: "Partially paid / unpaid".to_string(),
            value: kpis.partially_unpaid.to_string(),
        },
        MetricLine {
            metric: "Expected (year)".to_string(),
            value: money(kpis.expected_total),
        },
        MetricLine {
            metric: "Collected (year)".to_string(),
            value: format!("{} ({:.1}%)", money(kpis.collected_total), kpis.collected_percentage),
        },
    ]);

    println!("\nStatus distribution:");
    print_table(status_lines(&dashboard.status_distribution));

    println!("\nMonthly totals:");
    print_table(
        dashboard
            .monthly_totals
            .iter()
            .map(|(month, total)| MonthLine {
                month: month.full_name(),
                collected: money(*total),
            })
            .collect(),
    );
}

fn print_rows(dashboard: &Dashboard, filter: &FilterState) {
    let matched = filter.apply(&dashboard.rows);
    println!("\nShowing {} of {} rows ({})", matched.len(), dashboard.rows.len(), dashboard.origin);

    if matched.is_empty() {
        println!("No rows match the current filter.");
        return;
    }

    print_table(
        matched
            .into_iter()
            .map(|row| RowLine {
                no: row.raw.no.map(|n| n.to_string()).unwrap_or_default(),
                family: row.raw.family_members.clone(),
                monthly: row.raw.monthly_amount.map(money).unwrap_or_default(),
                collected: money(row.collected_year),
                expected: money(row.expected_year),
                outstanding: money(row.outstanding()),
                status: row.status.to_string(),
                tier: row.tier().to_string(),
                pending: row
                    .pending_months
                    .iter()
                    .map(|m| m.abbrev())
                    .collect::<Vec<_>>()
                    .join(" "),
            })
            .collect(),
    );
}

fn build_source(args: &Args, config: &FileConfig) -> Result<DataSource> {
    if args.offline {
        return Ok(DataSource::Builtin);
    }
    if let Some(path) = &args.csv {
        return Ok(DataSource::File(path.clone()));
    }
    let client = SheetClient::new(&config.sheet).context("Failed to create sheet client")?;
    Ok(DataSource::Sheet(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .init();

    let file_config = FileConfig::load_or_default(&args.config)?;
    let source = build_source(&args, &file_config)?;

    match args.command {
        None | Some(Command::Summary) => {
            let dashboard = Dashboard::from_loaded(load_rows(&source).await);
            print_summary(&dashboard);
        }
        Some(Command::Rows { search, status }) => {
            let dashboard = Dashboard::from_loaded(load_rows(&source).await);
            let filter = FilterState::default().with_search(search).with_status(status);
            print_rows(&dashboard, &filter);
        }
        Some(Command::Export { output_dir }) => {
            let dashboard = Dashboard::from_loaded(load_rows(&source).await);
            println!("\nGenerating reports...");
            generate_all_reports(&output_dir, &dashboard)?;
            println!("\nReports written to {}", output_dir.display());
        }
        Some(Command::Serve { host, port }) => {
            let host = host.unwrap_or(file_config.server.host);
            let port = port.unwrap_or(file_config.server.port);
            run_server(source, &host, port).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_lines_use_status_names() {
        let distribution = StatusDistribution {
            fully_paid: 4,
            partial: 2,
            unpaid: 1,
        };
        let lines = status_lines(&distribution);
        let metrics: Vec<&str> = lines.iter().map(|line| line.metric.as_str()).collect();
        assert_eq!(metrics, vec!["Fully Paid", "Partial", "Unpaid"]);
        let values: Vec<&str> = lines.iter().map(|line| line.value.as_str()).collect();
        assert_eq!(values, vec!["4", "2", "1"]);
    }
}
