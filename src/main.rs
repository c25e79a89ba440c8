mod app;
mod config;
mod help;
mod picker;
mod theme;
use crate::app::App;
use crate::config::Config;
use crate::picker::{today, PickerState, Unrestricted};
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::OpenOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        overrides: Overrides,
        value: Option<String>,
    },
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Overrides {
    range: bool,
    weekly: bool,
    monthly: bool,
    time: bool,
    hour12: bool,
    confirm: bool,
    inline: bool,
    format: Option<String>,
    separator: Option<String>,
    min: Option<String>,
    max: Option<String>,
    step: Option<u8>,
    first_day: Option<u8>,
    log_level: Option<String>,
    log_file: Option<String>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut overrides = Overrides::default();
        let mut value = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("range") => overrides.range = true,
                Arg::Long("weekly") => overrides.weekly = true,
                Arg::Long("monthly") => overrides.monthly = true,
                Arg::Long("time") => overrides.time = true,
                Arg::Long("12h") => overrides.hour12 = true,
                Arg::Long("confirm") => overrides.confirm = true,
                Arg::Long("inline") => overrides.inline = true,
                Arg::Long("format") => overrides.format = Some(parser.value()?.string()?),
                Arg::Long("separator") => overrides.separator = Some(parser.value()?.string()?),
                Arg::Long("min") => overrides.min = Some(parser.value()?.string()?),
                Arg::Long("max") => overrides.max = Some(parser.value()?.string()?),
                Arg::Long("step") => overrides.step = Some(parser.value()?.parse()?),
                Arg::Long("first-day") => overrides.first_day = Some(parser.value()?.parse()?),
                Arg::Short('L') | Arg::Long("log-level") => {
                    overrides.log_level = Some(parser.value()?.string()?);
                }
                Arg::Short('F') | Arg::Long("log-file") => {
                    overrides.log_file = Some(parser.value()?.string()?);
                }
                Arg::Value(v) if value.is_none() => value = Some(v.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run { overrides, value })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { overrides, value } => {
                let config = overrides.apply(config::read());
                init_logging(&config)?;
                tracing::debug!(mode = ?config.mode(), "starting");
                let mut picker =
                    PickerState::new(config.picker_options(), Unrestricted, today())
                        .bounds(config.bounds())
                        .locale(config.locale.clone());
                if let Some(text) = &value {
                    picker = picker.initial_text(text);
                }
                picker.observe(|value, ctx| {
                    tracing::info!(text = %ctx.text, cleared = value.is_none(), "value changed");
                });
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(picker).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: datepick [OPTIONS] [VALUE]");
                println!();
                println!("Terminal date, time, range, and schedule picker");
                println!();
                println!("Options:");
                println!("  --range            Pick a start/end date range");
                println!("  --weekly           Pick weekdays (1=Monday..7=Sunday)");
                println!("  --monthly          Pick days of the month (1-31)");
                println!("  --time             Enable time-of-day selection");
                println!("  --12h              12-hour clock display");
                println!("  --confirm          Commit only on an explicit done");
                println!("  --inline           Keep the picker open");
                println!("  --format PATTERN   Field pattern (yyyy, MM, dd, HH, hh, mm, a)");
                println!("  --separator SEP    Range separator text");
                println!("  --min DATE         Earliest selectable date (YYYY-MM-DD)");
                println!("  --max DATE         Latest selectable date (YYYY-MM-DD)");
                println!("  --step N           Minute step");
                println!("  --first-day N      First day of week (0=Sunday..6=Saturday)");
                println!("  -L, --log-level LEVEL   Log level (default: info)");
                println!("  -F, --log-file FILE     Log file (default: /dev/null)");
                println!("  -h, --help         Display this help message and exit");
                println!("  -V, --version      Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Overrides {
    fn apply(&self, mut config: Config) -> Config {
        if self.range {
            config.range = true;
        }
        if self.weekly {
            config.schedule = "weekly".to_string();
        }
        if self.monthly {
            config.schedule = "monthly".to_string();
        }
        if self.time {
            config.enable_time = true;
        }
        if self.hour12 {
            config.hour12 = true;
        }
        if self.confirm {
            config.confirm = true;
        }
        if self.inline {
            config.inline = true;
        }
        if let Some(format) = &self.format {
            config.format = format.clone();
        }
        if let Some(separator) = &self.separator {
            config.separator = separator.clone();
        }
        if let Some(min) = &self.min {
            config.min_date = Some(min.clone());
        }
        if let Some(max) = &self.max {
            config.max_date = Some(max.clone());
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(first_day) = self.first_day {
            config.first_day_of_week = first_day;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(file) = &self.log_file {
            config.log_file = file.clone();
        }
        config
    }
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)
        .with_context(|| format!("failed to open log file {}", config.log_file))?;
    let file = Arc::new(file);
    let filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(move || Arc::clone(&file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let mouse = crossterm::execute!(std::io::stdout(), EnableMouseCapture).is_ok();
    let r = func(terminal);
    if mouse {
        let _ = crossterm::execute!(std::io::stdout(), DisableMouseCapture);
    }
    ratatui::restore();
    r
}
