mod args;
mod layout;
mod paths;
mod print;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use chrono::Local;
use clap::Parser;
use effects_lib::{Error, Session};
use effects_lib::export::ExportFormat;
use effects_lib::nav::NavConfig;
use effects_lib::query::PageTarget;
use effects_lib::settings::{SettingsProvider, SqliteBackend};
use effects_lib::source::{DataSource, FileSource, HttpSource};
use effects_lib::view::{Effect, Event};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::args::CliArgs;
use crate::layout::TextLayout;
use crate::paths::AppPaths;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    let paths = AppPaths::resolve();
    init_logging(paths.as_ref(), args.verbose);

    let nav_config = match &args.nav_config {
        Some(path) => match load_nav_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(2);
            }
        },
        None => NavConfig::default(),
    };

    let source: Box<dyn DataSource> =
        if args.source.starts_with("http://") || args.source.starts_with("https://") {
            match HttpSource::new(&args.source) {
                Ok(source) => Box::new(source.with_timeout(Duration::from_secs(args.timeout))),
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(2);
                }
            }
        } else {
            Box::new(FileSource::new(&args.source))
        };

    let settings = open_settings(paths.as_ref(), args.no_save).await;
    let mut session = Session::open(source.as_ref(), settings, nav_config).await;
    let mut layout = TextLayout::new(args.height);
    let mut downloads = Vec::new();
    settle(&mut session, &mut layout, &mut downloads);

    for event in events(&args) {
        let effects = session.dispatch(event).await;
        layout.update(session.plan());
        report(&effects, &mut layout, &mut downloads);
        settle(&mut session, &mut layout, &mut downloads);
    }

    if let Some(format) = &args.export
        && let Some(output) = &args.output
    {
        match write_export(&session, format, output).await {
            Ok(path) => println!("Wrote {}", path.display()),
            Err(e) => {
                eprintln!("error: export to {} failed: {e}", output.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let plan = session.plan();
    if args.nav {
        println!("{}", print::nav(plan));
    }
    print!(
        "{}",
        print::table(plan, layout.table_scroll() as usize, args.height)
    );
    for href in downloads {
        println!("Export: {href}");
    }
    ExitCode::SUCCESS
}

/// Turns the arguments into view events, in the order a user would apply
/// them.
fn events(args: &CliArgs) -> Vec<Event> {
    let mut events = Vec::new();
    if let Some(theme) = args.theme {
        events.push(Event::SetTheme(theme.into()));
    }
    if let Some(ignore) = args.ignore_filters {
        events.push(Event::SetIgnoreExportFilters(ignore));
    }
    if let Some(size) = args.page_size {
        events.push(Event::SetPageSize(size));
    }
    events.extend(args.hide.iter().map(|&f| Event::SetFilter(f.into(), false)));
    events.extend(args.show.iter().map(|&f| Event::SetFilter(f.into(), true)));
    if let Some(search) = &args.search {
        events.push(Event::SetSearch(search.clone()));
    }
    events.extend(args.sort.iter().map(|click| Event::SortHeader {
        field: click.field,
        additive: click.additive,
    }));
    if let Some(page) = args.page {
        events.push(Event::GoToPage(PageTarget::Number(page)));
    }
    events.extend(args.expand.iter().cloned().map(Event::ToggleGroup));
    if let Some(id) = &args.goto {
        events.push(Event::NavigateTo(id.clone()));
    }
    if let Some(format) = &args.export
        && args.output.is_none()
    {
        events.push(Event::Export(format.clone()));
    }
    events
}

/// Runs frame callbacks and timers until nothing is pending.
fn settle(session: &mut Session, layout: &mut TextLayout, downloads: &mut Vec<String>) {
    loop {
        layout.update(session.plan());
        let effects = session.on_frame(&*layout);
        report(&effects, layout, downloads);

        let scheduler = session.reconciler().scheduler();
        let (next_due, pending) = (scheduler.next_due(), scheduler.has_pending());
        match next_due {
            Some(due) => {
                let effects = session.advance(due, &*layout);
                report(&effects, layout, downloads);
            }
            None if !pending => break,
            None => {}
        }
    }
}

fn report(effects: &[Effect], layout: &mut TextLayout, downloads: &mut Vec<String>) {
    layout.apply(effects);
    for effect in effects {
        match effect {
            Effect::Download { href } => downloads.push(href.clone()),
            Effect::Alert { message } => eprintln!("error: {message}"),
            Effect::Highlight { row_id, .. } => log::debug!("Highlighted {row_id}"),
            _ => {}
        }
    }
}

/// Writes the export to `output`, or to a timestamped file inside it when it
/// is a directory.
async fn write_export(session: &Session, format: &str, output: &Path) -> Result<PathBuf, Error> {
    let format: ExportFormat = format.parse()?;
    let body = session.reconciler().render_export(format)?;
    let path = if output.is_dir() {
        output.join(format.filename(Local::now()))
    } else {
        output.to_path_buf()
    };
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

fn load_nav_config(path: &Path) -> Result<NavConfig, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

async fn open_settings(paths: Option<&AppPaths>, no_save: bool) -> SettingsProvider {
    if no_save {
        return SettingsProvider::in_memory();
    }
    let Some(paths) = paths else {
        log::warn!("No home directory, preferences will not be remembered");
        return SettingsProvider::in_memory();
    };
    if let Err(e) = paths.ensure() {
        log::warn!("Cannot create data directory: {e}");
        return SettingsProvider::in_memory();
    }
    match SqliteBackend::open(paths.settings_db()).await {
        Ok(backend) => SettingsProvider::new(backend),
        Err(e) => {
            log::warn!("Cannot open {}: {e}", paths.settings_db().display());
            SettingsProvider::in_memory()
        }
    }
}

fn init_logging(paths: Option<&AppPaths>, verbose: u8) {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if let Some(file) = paths.and_then(open_log) {
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), file));
    }
    if verbose > 0 {
        let level = if verbose > 1 {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    CombinedLogger::init(loggers).expect("Failed to initialize logger");
}

fn open_log(paths: &AppPaths) -> Option<File> {
    if let Err(e) = paths.ensure() {
        eprintln!("warning: cannot create log directory: {e}");
        return None;
    }
    if let Err(e) = paths.rotate_logs() {
        eprintln!("warning: log rotation failed: {e}");
    }
    File::create(paths.log_file()).ok()
}
