//! HackHub CLI
//!
//! Command-line interface for HackHub operations:
//! - Check server status
//! - List users, teams and results
//! - Inspect team rosters
//! - Update user profiles
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hackhub::api::dto::UpdateUserRequest;
use hackhub::client::{ApiClient, RequestConfig};
use hackhub::config::{generate_default_config, Config};
use hackhub::views::widgets::{admin_overview, WidgetView};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hackhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hackathon team, results and payment management")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (default: from config, then http://localhost:8082/api/v1)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json, csv)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server health and overview counts
    Status,

    /// List users
    Users {
        /// Filter by role (super_admin, admin, team_leader, team_member)
        #[arg(short, long)]
        role: Option<String>,
    },

    /// List teams
    Teams,

    /// Show a team's roster occupancy
    Roster {
        /// Team ID
        team_id: String,
    },

    /// Update a user's profile
    UpdateUser {
        /// User ID
        user_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        college: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// Team ID; pass an empty string to leave the team
        #[arg(long)]
        team_id: Option<String>,
    },

    /// List published results
    Results {
        /// Only results for this team
        #[arg(short, long)]
        team_id: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut client_config = Config::load_default().client;
    if let Some(url) = &cli.api_url {
        client_config.base_url = url.clone();
    }
    let client = ApiClient::from_config(&client_config)?;

    match cli.command {
        Commands::Status => match client.health().await {
            Ok(health) => {
                println!("HackHub v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("API Status: {}", health.status);
                println!("Database:   {}", health.database);
                println!("Media:      {}", health.media);
                println!("Mail:       {}", health.mail);
                println!("Uptime:     {}", format_duration(health.uptime_seconds));

                let stats = client.stats().await?;
                println!();
                print_widget(&admin_overview(&stats));
            }
            Err(e) => {
                eprintln!("Cannot connect to HackHub API at {}", client.base_url());
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the HackHub API server is running:");
                eprintln!("  cargo run --bin hackhub");
                std::process::exit(1);
            }
        },

        Commands::Users { role } => {
            let list = client.list_users(role.as_deref()).await?;
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&list.users)?);
            } else if list.users.is_empty() {
                println!("No users found.");
            } else {
                println!("{:<24} {:<28} {:<12} {}", "Name", "Email", "Role", "ID");
                println!("{}", "-".repeat(100));
                for user in &list.users {
                    println!(
                        "{:<24} {:<28} {:<12} {}",
                        user.name,
                        user.email,
                        user.role.as_str(),
                        user.id
                    );
                }
                println!();
                println!("{} user(s)", list.total);
            }
        }

        Commands::Teams => {
            let list = client.list_teams().await?;
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&list.teams)?);
            } else if list.teams.is_empty() {
                println!("No teams registered yet.");
            } else {
                println!("{:<24} {:<28} {:<16} {}", "Name", "Project", "Track", "ID");
                println!("{}", "-".repeat(100));
                for team in &list.teams {
                    println!(
                        "{:<24} {:<28} {:<16} {}",
                        team.name,
                        team.project_title.as_deref().unwrap_or("-"),
                        team.track.as_deref().unwrap_or("-"),
                        team.id
                    );
                }
            }
        }

        Commands::Roster { team_id } => {
            let roster = client.team_roster(&team_id).await?;
            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                println!("Leaders:     {}", roster.leader_count);
                println!("Members:     {} / {}", roster.member_count, roster.max_members);
                println!("Open slots:  {}", roster.slots_available);
                if !roster.leader_present {
                    println!();
                    println!("Warning: this team has no leader assigned.");
                }
            }
        }

        Commands::UpdateUser {
            user_id,
            name,
            email,
            phone,
            college,
            role,
            team_id,
        } => {
            let update = UpdateUserRequest {
                name,
                email,
                role,
                team_id,
                phone,
                college,
            };
            if serde_json::to_value(&update)?
                .as_object()
                .map_or(true, |fields| fields.is_empty())
            {
                bail!("Nothing to update; pass at least one field");
            }

            let user = client
                .update_user(&user_id, &update)
                .await
                .with_context(|| format!("Failed to update user {}", user_id))?;
            println!("Updated {} <{}> ({})", user.name, user.email, user.role);
        }

        Commands::Results { team_id } => match cli.format.as_str() {
            "csv" => {
                let config = team_id
                    .as_deref()
                    .map(|t| RequestConfig::new().query("team_id", t));
                let csv = client.get_text("/results/export", config.as_ref()).await?;
                print!("{}", csv);
            }
            "json" => {
                let list = client.list_results(team_id.as_deref()).await?;
                println!("{}", serde_json::to_string_pretty(&list.results)?);
            }
            _ => {
                let list = client.list_results(team_id.as_deref()).await?;
                if list.results.is_empty() {
                    println!("No results published yet.");
                } else {
                    println!("{:<16} {:<38} {:>8}  {}", "Round", "Team", "Score", "Remarks");
                    println!("{}", "-".repeat(90));
                    for entry in &list.results {
                        println!(
                            "{:<16} {:<38} {:>8.2}  {}",
                            entry.round,
                            entry.team_id,
                            entry.score,
                            entry.remarks.as_deref().unwrap_or("")
                        );
                    }
                }
            }
        },

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
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

fn print_widget(widget: &WidgetView) {
    println!("{}:", widget.title);
    for row in &widget.rows {
        println!("  {:<20} {}", row.label, row.value);
    }
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
