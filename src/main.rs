//! TabBridge: lists the tabs open on your other devices.
//!
//! Reads the CloudTabs database (`$TABBRIDGE_DB` or the platform default),
//! prints the grouped view, and with `--watch` reprints after every change.
//!
//! Usage: `tabbridge [--watch] [--sort lastViewed|title|domain|tabPosition] [--search TEXT]`

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use tracing_subscriber::EnvFilter;

use tabbridge::app::App;
use tabbridge::managers::view_state::ViewStateTrait;
use tabbridge::types::sort::SortOrder;

struct Options {
    watch: bool,
    sort: Option<SortOrder>,
    search: Option<String>,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options { watch: false, sort: None, search: None };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--watch" | "-w" => options.watch = true,
            "--sort" => {
                let raw = args.next().ok_or("--sort needs a value")?;
                options.sort = Some(raw.parse::<SortOrder>().map_err(|e| format!("{}", e))?);
            }
            "--search" => {
                options.search = Some(args.next().ok_or("--search needs a value")?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn print_view(app: &App) {
    let now = Utc::now();
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!(
        "  {} tabs · sorted by {} ({})",
        app.view.total_tab_count(),
        app.view.config().sort_order.label(),
        app.view.config().direction.label()
    );
    if let Some(err) = app.view.error_message() {
        println!("  ⚠ {}", err);
    }
    println!("═══════════════════════════════════════════════════════════════");

    for group in app.view.filtered_grouped() {
        println!(
            "  📱 {} ({:?}, {})",
            group.device.name,
            group.device.kind(),
            group.device.relative_modified(now)
        );
        for tab in &group.tabs {
            let pin = if tab.is_pinned { "📌 " } else { "" };
            let seen = tab.relative_last_viewed(now).unwrap_or_default();
            println!("     {}{}  {}  {}", pin, tab.display_title(), tab.url, seen);
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let mut app = App::with_default_paths();
    if let Some(order) = options.sort {
        app.view.set_sort_order(order);
    }
    if let Some(search) = &options.search {
        app.view.set_search_text(search);
    }

    app.setup();
    if !app.view.has_access() {
        eprintln!(
            "Cannot read {}. Grant this program access to the file (on macOS: Full Disk Access).",
            app.reader().path().display()
        );
        return ExitCode::FAILURE;
    }

    print_view(&app);
    if !options.watch {
        return ExitCode::SUCCESS;
    }

    loop {
        if let Some(true) = app.wait_for_event(Duration::from_secs(3600)) {
            print_view(&app);
        }
    }
}
