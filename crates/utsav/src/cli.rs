use backdrop::GpuPowerPreference;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "utsav",
    author,
    version,
    about = "Utsav event microsite with a shader backdrop",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    /// Evaluate times as if the local clock read this (`YYYY-MM-DDTHH:MM:SS`).
    #[arg(long, global = true, env = "UTSAV_NOW", value_name = "TIMESTAMP", value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Window size in physical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT")]
    pub size: Option<String>,

    /// Frame rate cap for the shader background (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// GPU power preference: `low` or `high`.
    #[arg(long, value_name = "POWER", value_parser = parse_gpu_power)]
    pub gpu_power: Option<GpuPowerPreference>,

    /// Height of the scrollable page in pixels.
    #[arg(long, value_name = "PX")]
    pub page_height: Option<f64>,

    /// Treat the system colour scheme as dark until the window reports one.
    #[arg(long)]
    pub prefers_dark: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show or toggle the saved colour theme.
    Theme {
        #[command(subcommand)]
        action: Option<ToggleAction>,
    },
    /// Show or toggle the page language (en/hi).
    Lang {
        #[command(subcommand)]
        action: Option<ToggleAction>,
    },
    /// Inspect the event catalogue.
    Events {
        #[command(subcommand)]
        action: EventsAction,
    },
    /// Print the countdown for every event.
    Countdown(CountdownArgs),
    /// Submit the "join us" form.
    Join {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Subscribe to the newsletter.
    Newsletter {
        #[arg(long, default_value = "")]
        email: String,
    },
    /// Print resolved directories and files.
    Where,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleAction {
    #[default]
    Show,
    Toggle,
}

#[derive(Subcommand, Debug)]
pub enum EventsAction {
    /// List all events.
    List {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show one event the way the modal presents it.
    Show {
        #[arg(value_name = "ID")]
        id: u32,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CountdownArgs {
    /// Keep refreshing at the configured interval.
    #[arg(long)]
    pub watch: bool,

    /// Stop watching after this many refreshes.
    #[arg(long, value_name = "N", requires = "watch")]
    pub ticks: Option<u64>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_gpu_power(value: &str) -> Result<GpuPowerPreference, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("gpu power must not be empty".to_string());
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "low" | "low-power" | "integrated" => Ok(GpuPowerPreference::Low),
        "high" | "high-performance" | "discrete" => Ok(GpuPowerPreference::High),
        other => Err(format!("unknown gpu power '{other}'; expected low or high")),
    }
}

pub fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    microsite::countdown::parse_timestamp(value).map_err(|err| err.to_string())
}
