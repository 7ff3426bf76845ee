//! Overdose Dashboard CLI
//!
//! Command-line interface for the dashboard:
//! - List drugs, print rows and summary figures (offline)
//! - Export the chart as SVG (offline)
//! - Create an account or sign in through a running server
//! - Check server status
//! - Generate a config file

use clap::{Parser, Subcommand, ValueEnum};
use overdose_dashboard::analytics::{filter_rows, line_chart, Selection, Summary};
use overdose_dashboard::api::error::ErrorResponse;
use overdose_dashboard::auth::SessionState;
use overdose_dashboard::chart::{format_count, svg, ChartLayout};
use overdose_dashboard::data::Dataset;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Monthly overdose deaths by drug, from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table, global = true)]
    pub format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List drugs and their chart colours
    Drugs,

    /// Print dataset rows
    Table {
        /// Drugs to include (repeatable; default: all)
        #[arg(short, long)]
        drug: Vec<String>,
    },

    /// Print summary figures
    Summary {
        /// Drugs to include (repeatable; default: all)
        #[arg(short, long)]
        drug: Vec<String>,
    },

    /// Render the chart as SVG
    Chart {
        /// Drugs to include (repeatable; default: all)
        #[arg(short, long)]
        drug: Vec<String>,
        /// Draw the tooltip for one point, as Drug@YYYY-MM
        #[arg(long)]
        hover: Option<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create an account or sign in through the server
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account
    Signup {
        email: String,
        /// Password (default: $DASHBOARD_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign in to an existing account
    Signin {
        email: String,
        /// Password (default: $DASHBOARD_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let dataset = Dataset::builtin();

    match cli.command {
        Commands::Drugs => {
            let palette = dataset.palette();
            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&palette)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for entry in &palette {
                        writer.serialize(entry)?;
                    }
                    writer.flush()?;
                }
                Format::Table => {
                    println!("{:<22} {}", "Drug", "Colour");
                    println!("{}", "-".repeat(30));
                    for entry in palette {
                        println!("{:<22} {}", entry.drug, entry.color);
                    }
                    println!();
                    println!("Source: {}", overdose_dashboard::DATASET_URL);
                }
            }
        }

        Commands::Table { drug } => {
            let selection = selection_from(dataset, &drug)?;
            let rows = filter_rows(dataset, &selection);

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for row in &rows {
                        writer.serialize(row)?;
                    }
                    writer.flush()?;
                }
                Format::Table => {
                    if rows.is_empty() {
                        println!("No drugs selected");
                    } else {
                        println!("{:<10} {:<22} {:>8}", "Month", "Drug", "Deaths");
                        println!("{}", "-".repeat(42));
                        for row in rows {
                            println!(
                                "{:<10} {:<22} {:>8}",
                                row.month.label(),
                                row.drug,
                                format_count(row.deaths)
                            );
                        }
                    }
                }
            }
        }

        Commands::Summary { drug } => {
            let selection = selection_from(dataset, &drug)?;
            let summary = Summary::for_selection(dataset, &selection);

            match cli.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                Format::Csv => {
                    let mut writer = csv::Writer::from_writer(std::io::stdout());
                    for total in &summary.monthly_totals {
                        writer.serialize(total)?;
                    }
                    writer.flush()?;
                }
                Format::Table => print_summary(dataset, &selection, &summary),
            }
        }

        Commands::Chart {
            drug,
            hover,
            output,
        } => {
            let selection = selection_from(dataset, &drug)?;

            let document = match line_chart(dataset, &selection) {
                Some(chart) => {
                    let tooltip = hover
                        .as_deref()
                        .map(|hover| chart.tooltip_for(hover))
                        .transpose()?;
                    svg::render(&chart, tooltip.as_ref())
                }
                None => svg::render_placeholder(
                    &ChartLayout::default(),
                    svg::EMPTY_SELECTION_MESSAGE,
                ),
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, &document)?;
                    println!("Chart written to {:?}", path);
                }
                None => println!("{}", document),
            }
        }

        Commands::Auth { action } => {
            let (endpoint, email, password) = match action {
                AuthAction::Signup { email, password } => ("signup", email, password),
                AuthAction::Signin { email, password } => ("signin", email, password),
            };
            let password = match password.or_else(|| std::env::var("DASHBOARD_PASSWORD").ok()) {
                Some(p) => p,
                None => {
                    eprintln!("Pass --password or set DASHBOARD_PASSWORD");
                    std::process::exit(1);
                }
            };

            let response = reqwest::Client::new()
                .post(format!("{}/api/v1/auth/{}", cli.api_url, endpoint))
                .json(&serde_json::json!({ "email": email, "password": password }))
                .send()
                .await?;

            if response.status().is_success() {
                let session: SessionState = response.json().await?;
                match session.user {
                    Some(user) => println!("Signed in as {} ({})", user.email, user.uid),
                    None => println!("Not signed in"),
                }
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                // Provider messages are shown exactly as the server relays them
                match serde_json::from_str::<ErrorResponse>(&text) {
                    Ok(body) => eprintln!("{}", body.error.message),
                    Err(_) => eprintln!("Failed ({}): {}", status, text),
                }
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let response = reqwest::Client::new()
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Overdose Dashboard v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Identity provider: {}",
                        health["auth_provider"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Sessions: {}",
                        health["sessions"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to the dashboard API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin overdose-dashboard");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = overdose_dashboard::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// `--drug` flags as a selection; none given means every drug
fn selection_from(
    dataset: &Dataset,
    drugs: &[String],
) -> Result<Selection, Box<dyn std::error::Error>> {
    if drugs.is_empty() {
        return Ok(Selection::all(dataset));
    }
    // Accept both repeated flags and comma lists
    let names = drugs.iter().flat_map(|d| d.split(','));
    Ok(Selection::from_drugs(dataset, names)?)
}

fn print_summary(dataset: &Dataset, selection: &Selection, summary: &Summary) {
    println!("Drugs: {}", selection.ordered(dataset).join(", "));
    println!();
    println!("Grand total:        {}", format_count(summary.grand_total));
    println!(
        "Latest month ({}): {}",
        summary
            .latest_month
            .map(|m| m.label())
            .unwrap_or_else(|| "-".to_string()),
        format_count(summary.latest_month_total)
    );
    println!(
        "Average per month:  {}",
        format_count(summary.average_per_month)
    );
    println!("Series selected:    {}", summary.series_count);
    println!();
    println!("{:<10} {:>8}", "Month", "Deaths");
    println!("{}", "-".repeat(19));
    for total in &summary.monthly_totals {
        println!("{:<10} {:>8}", total.month.label(), format_count(total.deaths));
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
