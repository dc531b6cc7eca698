use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracker_core::time::{parse_date, today_in};
use tracker_core::{parse_duration, reconcile, summarize, Day, Entry, Window, SUMMARY_DAYS};
use tracker_store::{activity_store, encode_and_append, read_days, read_user_info};

mod config;
#[cfg(test)]
mod git_refs;
mod setup;
mod state;
mod view;

use config::Config;

const APP_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TRACKER_BUILD_SHA"), ")");

#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    version = APP_VERSION,
    about = "Personal activity log with a weekly effort score"
)]
struct Cli {
    /// Tracker home holding config.toml (default: ~/.tracker)
    #[arg(long, global = true, env = "TRACKER_HOME")]
    home: Option<PathBuf>,

    /// User whose log to use
    #[arg(long, short, global = true, env = "TRACKER_USER")]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: username, resting heart rate, date of birth
    InitUser,

    /// Log one activity
    Add {
        /// Day of the activity, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// How long, e.g. 45m or 1h30m
        #[arg(long)]
        duration: String,

        /// Perceived effort, 0.0 - 1.0
        #[arg(long)]
        effort: f64,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Print the last two weeks and the weekly summary
    Show,

    /// Print only the weekly summary
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Configuration file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config.toml if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tracker=info,tracker_store=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Root span carried by every log line of a run.
fn app_span() -> tracing::Span {
    tracing::info_span!("app", name = "tracker", version = APP_VERSION)
}

fn main() -> Result<()> {
    init_tracing();
    let _app = app_span().entered();
    let cli = Cli::parse();

    let home = state::tracker_home(cli.home.as_deref())?;
    let cfg = config::load_config(&home)?;
    let data_dir = cfg.data_dir(&home);
    info!(home = %home.display(), data_dir = %data_dir.display(), "start up config");

    match cli.command {
        Command::InitUser => setup::run_init_user(&data_dir)?,

        Command::Add {
            date,
            duration,
            effort,
            description,
        } => {
            let user = require_user(cli.user.as_deref())?;
            add_entry(&cfg, &data_dir, user, date.as_deref(), &duration, effort, description)?;
        }

        Command::Show => {
            let user = require_user(cli.user.as_deref())?;
            show(&cfg, &data_dir, user, false, true)?;
        }

        Command::Summary { json } => {
            let user = require_user(cli.user.as_deref())?;
            show(&cfg, &data_dir, user, json, false)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(&home)?,
            ConfigCommand::Show => {
                println!("# {}\n", config::config_path(&home).display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn require_user(user: Option<&str>) -> Result<&str> {
    match user {
        Some(u) if !u.trim().is_empty() => Ok(u),
        _ => bail!("no user given (pass --user or set TRACKER_USER)"),
    }
}

fn today(cfg: &Config) -> Result<NaiveDate> {
    Ok(today_in(cfg.timezone()?, Utc::now()))
}

fn add_entry(
    cfg: &Config,
    data_dir: &Path,
    user: &str,
    date: Option<&str>,
    duration: &str,
    effort: f64,
    description: String,
) -> Result<()> {
    let date = entry_date(date, today(cfg)?)?;
    let duration = parse_duration(duration)?;
    if !effort.is_finite() {
        bail!("effort must be a number");
    }

    let entry = Entry::new(duration, effort, description);
    let mut store = activity_store(data_dir, user)?;
    encode_and_append(&[(date, entry.clone())], &mut store)
        .with_context(|| format!("append to {}", store.path().display()))?;

    info!(user, %date, "logged entry");
    println!(
        "{}  {}  {:.2}  {}",
        date,
        tracker_core::format_duration(entry.duration),
        entry.effort,
        entry.description
    );
    Ok(())
}

fn entry_date(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(d) = date else {
        return Ok(today);
    };
    let date = parse_date(d).with_context(|| format!("invalid date '{d}' (want YYYY-MM-DD)"))?;
    if date > today {
        bail!("date {date} is after today ({today})");
    }
    Ok(date)
}

/// The window ending today. Rows dated after today are left out with a warning.
fn window_ending(days: Vec<Day>, today: NaiveDate) -> Result<Window> {
    let (days, ahead): (Vec<Day>, Vec<Day>) = days.into_iter().partition(|d| d.date <= today);
    for day in &ahead {
        warn!(date = %day.date, entries = day.entries.len(), %today, "ignoring entries dated after today");
    }
    Ok(reconcile(days, today)?)
}

fn show(cfg: &Config, data_dir: &Path, user: &str, json: bool, with_log: bool) -> Result<()> {
    let profile = read_user_info(data_dir, user)?;
    let mut store = activity_store(data_dir, user)?;
    let decoded = read_days(&mut store).with_context(|| format!("read {}", store.path().display()))?;
    if !decoded.skipped.is_empty() {
        warn!(user, skipped = decoded.skipped.len(), "some log rows could not be read");
    }

    let window = window_ending(decoded.days, today(cfg)?)?;
    let summary = summarize(window.recent(SUMMARY_DAYS), &profile, Utc::now(), &cfg.scoring);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print!("{}", view::render_summary(&summary));
    if with_log {
        println!();
        print!("{}", view::render_window(&window, &cfg.scoring));
    }
    Ok(())
}
