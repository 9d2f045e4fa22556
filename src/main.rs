//! Vitals Tracker CLI
//!
//! Record vitals, review risk factors and chart trends.

use clap::{Parser, Subcommand, ValueEnum};
use std::process;
use tracing_subscriber::EnvFilter;
use vitals_tracker::{
    config::Config,
    store::FileStore,
    tracker::{Assessment, HealthTracker, LatestRecord, Submission, NO_DATA_MESSAGE},
    trend::{ChartSeries, ChartSlot, ChartSpec, JsonRenderer, TableRenderer},
    Clock, HealthRecord, MEDICAL_DISCLAIMER, VERSION,
};

#[derive(Parser)]
#[command(name = "vitals")]
#[command(version = VERSION)]
#[command(about = "Track vitals, flag risks and chart trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new set of vitals
    Submit {
        /// User the vitals belong to
        #[arg(long)]
        user: String,

        /// Blood pressure as systolic/diastolic, e.g. 120/80
        #[arg(long)]
        bp: String,

        /// Blood sugar in mg/dL
        #[arg(long)]
        sugar: u32,

        /// Heart rate in beats per minute
        #[arg(long)]
        heart_rate: u32,

        /// How to draw the trend chart
        #[arg(long, value_enum, default_value = "table")]
        chart: ChartFormat,
    },

    /// Show the latest record and trend for a user
    Show {
        /// User to show (defaults to the configured default user)
        #[arg(long)]
        user: Option<String>,

        /// How to draw the trend chart
        #[arg(long, value_enum, default_value = "table")]
        chart: ChartFormat,
    },

    /// List stored records
    History {
        /// Only records for this user (all users when omitted)
        #[arg(long)]
        user: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: HistoryFormat,
    },

    /// Assess vitals without storing them
    Assess {
        #[arg(long)]
        bp: String,

        #[arg(long)]
        sugar: u32,

        #[arg(long)]
        heart_rate: u32,
    },

    /// List doctors
    Doctors,

    /// Suggest hospitals for a set of vitals
    Hospitals {
        #[arg(long, default_value = "")]
        bp: String,

        #[arg(long)]
        sugar: u32,
    },

    /// Display the medical disclaimer
    Disclaimer,

    /// Show configuration
    Config,

    /// Serve the HTTP API (requires server feature)
    #[cfg(feature = "server")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartFormat {
    Table,
    Json,
    None,
}

#[derive(Clone, Copy, ValueEnum)]
enum HistoryFormat {
    Table,
    Json,
    Jsonl,
}

fn main() {
    let cli = Cli::parse();

    #[cfg(feature = "server")]
    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    #[cfg(not(feature = "server"))]
    let default_level = "warn";
    init_logging(default_level);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Could not load config, using defaults: {e}");
            Config::default()
        }
    };

    match cli.command {
        Commands::Submit {
            user,
            bp,
            sugar,
            heart_rate,
            chart,
        } => {
            cmd_submit(
                &config,
                Submission {
                    user_id: user,
                    blood_pressure: bp,
                    blood_sugar: sugar,
                    heart_rate,
                },
                chart,
            );
        }
        Commands::Show { user, chart } => {
            let user = user.unwrap_or_else(|| config.default_user_id.clone());
            cmd_show(&config, &user, chart);
        }
        Commands::History { user, format } => {
            cmd_history(&config, user.as_deref(), format);
        }
        Commands::Assess {
            bp,
            sugar,
            heart_rate,
        } => {
            cmd_assess(&config, &bp, sugar, heart_rate);
        }
        Commands::Doctors => {
            cmd_doctors(&config);
        }
        Commands::Hospitals { bp, sugar } => {
            cmd_hospitals(&config, &bp, sugar);
        }
        Commands::Disclaimer => {
            println!("{MEDICAL_DISCLAIMER}");
        }
        Commands::Config => {
            cmd_config(&config);
        }
        #[cfg(feature = "server")]
        Commands::Serve { port } => {
            cmd_serve(&config, port.unwrap_or(config.server_port));
        }
    }
}

/// Install the tracing subscriber, honouring `RUST_LOG`.
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_tracker(config: &Config) -> HealthTracker<FileStore> {
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    match FileStore::open(config.store_path()) {
        Ok(store) => HealthTracker::new(store, config.directory.clone(), clock_or_local(config)),
        Err(e) => {
            eprintln!("Error opening store {:?}: {e}", config.store_path());
            process::exit(1);
        }
    }
}

fn clock_or_local(config: &Config) -> Clock {
    config.clock().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using local time");
        Clock::Local
    })
}

fn cmd_submit(config: &Config, submission: Submission, chart: ChartFormat) {
    let mut tracker = open_tracker(config);

    let outcome = match tracker.submit(submission) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error saving record: {e}");
            process::exit(1);
        }
    };

    println!("Data submitted successfully!");
    println!();
    print_record(&outcome.record);
    println!();
    print_assessment(&outcome.assessment);
    println!();
    draw_chart(&outcome.trend, chart);
}

fn cmd_show(config: &Config, user: &str, chart: ChartFormat) {
    let tracker = open_tracker(config);

    let dashboard = match tracker.dashboard(user) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("Error reading records for {user}: {e}");
            process::exit(1);
        }
    };

    println!("User: {}", dashboard.user_id);
    println!();
    match &dashboard.latest {
        LatestRecord::Found(record) => print_record(record),
        LatestRecord::NoData => println!("{NO_DATA_MESSAGE}"),
    }
    println!();
    draw_chart(&dashboard.trend, chart);
}

fn cmd_history(config: &Config, user: Option<&str>, format: HistoryFormat) {
    let tracker = open_tracker(config);

    let records = match user {
        Some(user) => tracker.store().history_for(user),
        None => tracker.store().history(),
    };
    let records = match records {
        Ok(records) => records,
        Err(e) => {
            eprintln!("Error reading history: {e}");
            process::exit(1);
        }
    };

    match format {
        HistoryFormat::Json => match serde_json::to_string_pretty(&records) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing: {e}"),
        },
        HistoryFormat::Jsonl => {
            for record in &records {
                match serde_json::to_string(record) {
                    Ok(line) => println!("{line}"),
                    Err(e) => eprintln!("Error serializing: {e}"),
                }
            }
        }
        HistoryFormat::Table => {
            if records.is_empty() {
                println!("No history yet.");
                return;
            }
            println!(
                "{:<24} {:<16} {:>8} {:>10} {:>10}",
                "Date/Time", "User", "BP", "Sugar", "Heart"
            );
            for r in &records {
                println!(
                    "{:<24} {:<16} {:>8} {:>10} {:>10}",
                    r.recorded_at(),
                    r.user_id(),
                    r.blood_pressure(),
                    r.blood_sugar(),
                    r.heart_rate()
                );
            }
            println!();
            println!("Total records: {}", records.len());
        }
    }
}

fn cmd_assess(config: &Config, bp: &str, sugar: u32, heart_rate: u32) {
    print_assessment(&Assessment::new(bp, sugar, heart_rate, &config.directory));
}

fn cmd_doctors(config: &Config) {
    println!("Doctors");
    println!("=======");
    for doctor in &config.directory.doctors {
        println!();
        println!("{doctor}");
    }
}

fn cmd_hospitals(config: &Config, bp: &str, sugar: u32) {
    println!("Suggested Hospitals");
    println!("===================");
    for hospital in config.directory.hospitals.suggest(bp, sugar) {
        println!();
        println!("{hospital}");
    }
}

fn cmd_config(config: &Config) {
    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!("Store file: {:?}", config.store_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(config).unwrap_or_else(|_| "Error".to_string())
    );
}

#[cfg(feature = "server")]
fn cmd_serve(config: &Config, port: u16) {
    use vitals_tracker::server::{run, ServerConfig};

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    let server_config = ServerConfig {
        port,
        store_path: Some(config.store_path()),
        directory: config.directory.clone(),
        clock: clock_or_local(config),
    };

    runtime.block_on(async {
        let (addr, shutdown_tx) = match run(server_config).await {
            Ok(started) => started,
            Err(e) => {
                eprintln!("Error starting server: {e}");
                process::exit(1);
            }
        };

        println!("Vitals Tracker v{VERSION} listening on http://{addr}");
        println!("Press Ctrl+C to stop");

        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Error waiting for Ctrl+C: {e}");
        }
        println!();
        println!("Stopping server...");
        let _ = shutdown_tx.send(());
    });
}

fn print_record(record: &HealthRecord) {
    println!("Latest record ({}):", record.recorded_at());
    println!("  Blood pressure: {} mmHg", record.blood_pressure());
    println!("  Blood sugar: {} mg/dL", record.blood_sugar());
    println!("  Heart rate: {} bpm", record.heart_rate());
}

fn print_assessment(assessment: &Assessment) {
    println!("{}", assessment.risk);
    if assessment.risk.blood_pressure_unreadable {
        println!("(Blood pressure could not be read and was not checked.)");
    }
    println!();
    println!("Diet: {}", assessment.advice.diet);
    println!("Activity: {}", assessment.advice.activity);
    println!();
    println!("Suggested hospitals:");
    for hospital in &assessment.hospitals {
        println!("  {} ({}, {})", hospital.name, hospital.contact, hospital.address);
    }
}

fn draw_chart(series: &ChartSeries, format: ChartFormat) {
    let spec = ChartSpec::line(series);
    match format {
        ChartFormat::Table => {
            let mut slot = ChartSlot::new(TableRenderer);
            println!("Health Trends");
            println!("{}", slot.rebuild(&spec));
            let summary = series.summary();
            if let (Some(sugar), Some(hr)) = (summary.blood_sugar, summary.heart_rate) {
                println!(
                    "Blood sugar avg {:.1} (min {}, max {}) | Heart rate avg {:.1} (min {}, max {})",
                    sugar.mean, sugar.min, sugar.max, hr.mean, hr.min, hr.max
                );
            }
        }
        ChartFormat::Json => {
            let mut slot = ChartSlot::new(JsonRenderer::pretty());
            println!("{}", slot.rebuild(&spec));
        }
        ChartFormat::None => {}
    }
}
