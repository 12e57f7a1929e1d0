mod app;
mod calendar;
mod clock;
mod help;
mod jumpto;
mod theme;
use crate::app::App;
use crate::calendar::{ViewMode, ViewState, MONTH_LAYOUT_WIDTH};
use crate::clock::{AppClock, Clock, FixedClock, SystemClock};
use anyhow::{anyhow, Context};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use time::{format_description::FormatItem, macros::format_description, Date};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable naming a file to log to when `--log-file` is not given
const LOG_FILE_VAR: &str = "CALGRID_LOG";

/// Terminal width, in columns, at or below which the month view is
/// unavailable
const DEFAULT_COMPACT_WIDTH: u16 = MONTH_LAYOUT_WIDTH - 1;

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    date: Option<Date>,
    view: ViewMode,
    breakpoint: Option<u16>,
    today: Option<Date>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('w') | Arg::Long("week") => opts.view = ViewMode::Week,
                Arg::Short('b') | Arg::Long("breakpoint") => {
                    opts.breakpoint = Some(parser.value()?.parse()?);
                }
                Arg::Long("today") => opts.today = Some(parse_date(parser.value()?)?),
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.date.is_none() => {
                    opts.date = Some(parse_date(value)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // Look up the local offset before anything has a chance to
                // spawn a thread
                let clock = match opts.today {
                    Some(today) => AppClock::Fixed(FixedClock(today)),
                    None => AppClock::System(
                        SystemClock::new().context("failed to determine local time offset")?,
                    ),
                };
                init_logging(opts.log_file)?;
                let anchor = opts.date.unwrap_or_else(|| clock.today());
                info!(%anchor, view = %opts.view, "starting calendar");
                let view = ViewState::new(anchor, opts.view, clock)
                    .with_context(|| format!("cannot display a calendar around {anchor}"))?
                    .with_breakpoint(opts.breakpoint.unwrap_or(DEFAULT_COMPACT_WIDTH));
                with_terminal(|terminal| {
                    App::new(view).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: calgrid [options] [YYYY-MM-DD]");
                println!();
                println!("Terminal month & week calendar with Monday-first grids");
                println!();
                println!("Options:");
                println!("  -w, --week              Start in week view");
                println!("  -b, --breakpoint <COLS> Only offer the week view at or below this");
                println!("                          terminal width [default: {DEFAULT_COMPACT_WIDTH}]");
                println!("      --today <YYYY-MM-DD>");
                println!("                          Treat the given date as today");
                println!("      --log-file <PATH>   Write logs to the given file [env: {LOG_FILE_VAR}]");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    match Date::parse(&value, &YMD_FMT) {
        Ok(d) => Ok(d),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

// The terminal belongs to the calendar, so logs only ever go to a file, and
// only when one is asked for
fn init_logging(log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let Some(path) = log_file.or_else(|| std::env::var_os(LOG_FILE_VAR).map(PathBuf::from))
    else {
        return Ok(());
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("log file path {} has no file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("invalid RUST_LOG filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
