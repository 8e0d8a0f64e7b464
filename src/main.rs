use anyhow::Result;
use noot::config::{config_path, AppConfig};
use noot::manifest::JsonFileStore;
use noot::workspace::CloseMode;
use noot::AppContext;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    let (config, config_warning) = AppConfig::load_or_default(&config_path());
    let _logging = noot::logging::init(&config.log_filter, &config.log_dir());
    if let Some(error) = &config_warning {
        tracing::warn!(%error, "config unreadable, using defaults");
        eprintln!("warning: could not read config, using defaults: {}", error);
    }

    let args: Vec<String> = env::args().collect();
    let target = args.get(1).map(PathBuf::from);

    let store = JsonFileStore::new(config.manifest_path());
    let (mut app, startup) = AppContext::start(config, store);

    if let Some(error) = &startup.load_warning {
        eprintln!("warning: could not read workspace manifest: {}", error);
    }
    if let Some(path) = &startup.missing {
        eprintln!("warning: last workspace not found at {}", path.display());
    }

    if let Some(path) = target {
        // Directory provided - open it as the workspace
        let root = path.canonicalize().unwrap_or(path);
        let name = root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| root.to_string_lossy().to_string());

        let report = app.open_path(&name, &root, CloseMode::Clean)?;
        if let Some(error) = &report.warning {
            eprintln!("warning: could not save workspace manifest: {}", error);
        }
    }

    match app.workspace() {
        Some(ws) => println!("Active: {} ({})", ws.name(), ws.path().display()),
        None => println!("No active workspace"),
    }

    println!("Recent workspaces:");
    for item in app.recent_menu().items() {
        if item.detail.is_empty() {
            continue;
        }
        let marker = if item.checked { "*" } else { " " };
        println!(" {} {:<40} {}", marker, item.text, item.detail);
    }

    app.shutdown(CloseMode::Clean)?;
    Ok(())
}
