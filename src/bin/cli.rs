//! TuniMed CLI
//!
//! Terminal client for TuniMed:
//! - Chat with the medical assistant (streamed replies)
//! - Summarize a doctor dataset
//! - Preview cluster-map groupings
//! - Generate a default config file

use std::cell::Cell;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunimed::chat::{session_from_config, ChatError, ExchangeOutcome};
use tunimed::config::{Config, LoggingConfig, TransportKind};
use tunimed::dataset::{
    cluster_points, parse_csv, rank_by_frequency, ClusterRadius, CsvSchema, Dataset,
    DirectoryRecord, DoctorFilter, DoctorRecord, ProfileRecord,
};
use tunimed::store::{SessionStore, SharedState};
use tunimed::types::{Doctor, Message};

#[derive(Parser)]
#[command(name = "tunimed")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Medical AI assistant for Tunisia")]
#[command(long_about = "TuniMed terminal client.\nChat with the medical assistant and explore the doctor datasets.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Schema {
    /// cleaned_doctor_profiles_info2.csv
    Profiles,
    /// doctors_dataset.csv
    Directory,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive chat with the medical assistant
    Chat {
        /// Use canned replies instead of the service
        #[arg(long)]
        simulated: bool,
        /// Assistant service URL (overrides config)
        #[arg(long)]
        api_url: Option<String>,
    },

    /// Show totals and the most common specialties and governorates
    Stats {
        /// Path to a doctor CSV (default: the [datasets] entry for --schema)
        csv: Option<PathBuf>,
        /// Column layout of the file
        #[arg(short, long, value_enum, default_value = "profiles")]
        schema: Schema,
        /// Rows per ranking
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Group doctors the way the cluster map does
    Clusters {
        /// Path to the profiles CSV (default: [datasets] profiles)
        csv: Option<PathBuf>,
        /// very-tight, normal, wide, very-wide (or 0.01, 0.05, 0.1, 0.2)
        #[arg(short, long, default_value = "normal")]
        radius: ClusterRadius,
        /// Only cluster this specialty
        #[arg(short, long)]
        specialty: Option<String>,
        /// Clusters to list
        #[arg(short, long, default_value = "15")]
        top: usize,
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

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Chat { simulated, api_url } => {
            let mut chat = config.chat.clone();
            if let Some(url) = api_url {
                chat.base_url = url;
            }
            if simulated {
                chat.transport = TransportKind::Simulated;
            }
            run_chat(&chat).await?;
        }

        Commands::Stats { csv, schema, top } => {
            let configured = match schema {
                Schema::Profiles => &config.datasets.profiles,
                Schema::Directory => &config.datasets.directory,
            };
            let text = read_csv(&csv.unwrap_or_else(|| PathBuf::from(configured)))?;
            match schema {
                Schema::Profiles => print_stats(&parse_csv::<ProfileRecord>(&text)?, top),
                Schema::Directory => print_stats(&parse_csv::<DirectoryRecord>(&text)?, top),
            }
        }

        Commands::Clusters {
            csv,
            radius,
            specialty,
            top,
        } => {
            let path = csv.unwrap_or_else(|| PathBuf::from(&config.datasets.profiles));
            let text = read_csv(&path)?;
            let dataset = parse_csv::<ProfileRecord>(&text)?;
            let filter = DoctorFilter {
                specialty,
                governorate: None,
            };
            let visible = filter.apply(&dataset.records);

            let mut clusters = cluster_points(visible.iter().copied(), radius.degrees());
            clusters.sort_by(|a, b| b.count().cmp(&a.count()));

            println!(
                "{} doctors in {} clusters (radius: {})",
                visible.len(),
                clusters.len(),
                radius
            );
            println!();
            println!("{:<10} {:<10} {:>7}  {:<8} {}", "Lat", "Lng", "Doctors", "Color", "Example");
            println!("{}", "-".repeat(60));
            for cluster in clusters.iter().take(top) {
                let example = cluster
                    .members
                    .first()
                    .map(|r| r.listing.name.as_str())
                    .unwrap_or("-");
                println!(
                    "{:<10.4} {:<10.4} {:>7}  {:<8} {}",
                    cluster.lat,
                    cluster.lng,
                    cluster.count(),
                    cluster.tier().color,
                    example
                );
            }
        }

        Commands::Config { output } => {
            let config = tunimed::config::generate_default_config();

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

/// Logs go to stderr so they never interleave with streamed replies
fn init_logging(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("tunimed={}", logging.level)))
        .context("invalid log level")?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}

fn read_csv(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("cannot read {:?}", path))
}

/// Session state that echoes the live reply to stdout as it grows
struct TerminalStore {
    state: SharedState,
    printed: Cell<usize>,
}

impl TerminalStore {
    fn new() -> Self {
        Self {
            state: SharedState::default(),
            printed: Cell::new(0),
        }
    }
}

impl SessionStore for TerminalStore {
    fn messages(&self) -> Vec<Message> {
        self.state.messages()
    }

    fn add_message(&self, message: Message) {
        self.state.add_message(message);
    }

    fn is_streaming(&self) -> bool {
        self.state.is_streaming()
    }

    fn set_streaming(&self, streaming: bool) {
        self.state.set_streaming(streaming);
    }

    fn set_live_reply(&self, text: &str) {
        let printed = self.printed.get();
        if text.len() > printed {
            print!("{}", &text[printed..]);
            let _ = std::io::stdout().flush();
        }
        self.printed.set(text.len());
        self.state.set_live_reply(text);
    }

    fn add_recommended_doctors(&self, doctors: Vec<Doctor>) {
        self.state.add_recommended_doctors(doctors);
    }
}

async fn run_chat(chat: &tunimed::config::ChatConfig) -> anyhow::Result<()> {
    let session = session_from_config(chat);
    let store = TerminalStore::new();

    println!("TuniMed v{} ({} transport)", env!("CARGO_PKG_VERSION"), session.transport_name());
    println!("Describe your symptoms. Commands: /doctors, /clear, /quit");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/clear" => {
                store.state.lock().clear_messages();
                println!("History cleared.");
                continue;
            }
            "/doctors" => {
                print_doctors(&store.state.snapshot().recommended_doctors);
                continue;
            }
            _ => {}
        }

        match session.send(&store, &line).await {
            ExchangeOutcome::Ignored => {}
            ExchangeOutcome::Rejected => eprintln!("{}", ChatError::Busy),
            ExchangeOutcome::Completed { doctors_added, .. } => {
                println!();
                if doctors_added > 0 {
                    println!("({} doctors suggested, /doctors to list)", doctors_added);
                }
            }
            ExchangeOutcome::Failed { .. } => {
                println!();
                if let Some(message) = store.state.snapshot().messages.last() {
                    println!("{}", message.content);
                }
            }
        }
        println!();
    }

    Ok(())
}

fn print_doctors(doctors: &[Doctor]) {
    if doctors.is_empty() {
        println!("No doctors suggested yet.");
        return;
    }
    println!("{:<28} {:<20} {:<16} {}", "Name", "Specialty", "Phone", "Address");
    println!("{}", "-".repeat(90));
    for doctor in doctors {
        println!(
            "{:<28} {:<20} {:<16} {}",
            doctor.name, doctor.specialty, doctor.phone, doctor.address
        );
    }
}

fn print_stats<T: CsvSchema + DoctorRecord>(dataset: &Dataset<T>, top: usize) {
    println!("Dataset: {}", T::NAME);
    println!("  Doctors with coordinates: {}", dataset.len());
    println!("  Rows dropped: {}", dataset.dropped);

    let specialties = rank_by_frequency(&dataset.records, |r| r.listing().specialty.as_str());
    let governorates = rank_by_frequency(&dataset.records, |r| r.listing().governorate());

    println!("  Specialties: {}", specialties.len());
    println!("  Governorates: {}", governorates.len());

    for (title, ranking) in [("Top specialties", &specialties), ("Top governorates", &governorates)] {
        println!();
        println!("{}:", title);
        for (label, count) in ranking.iter().take(top) {
            println!("  {:<30} {:>6}", label, count);
        }
    }
}
