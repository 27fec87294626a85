//! Barcode GW - Rust implementation
//!
//! Gateway bridging keyboard-wedge barcode scanners to a hardware inventory
//! tracker.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barcode_gw::cli;
use barcode_gw::config::{watcher::ConfigWatcher, AppConfig};
use barcode_gw::drivers::{ConsoleDriver, HttpInventoryDriver, InventoryDriver};
use barcode_gw::fields::FieldEvent;
use barcode_gw::input::{keyboard, Key};
use barcode_gw::router::Router;
use barcode_gw::sniffer;

/// Barcode Gateway - bridge keyboard-wedge scanners to the inventory tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Run the interactive REPL instead of live key capture
    #[arg(long)]
    repl: bool,

    /// Run the keystroke sniffer
    #[arg(long)]
    sniffer: bool,

    /// Validate the configuration and print a summary
    #[arg(long)]
    check_config: bool,

    /// List configured pages and fields
    #[arg(long)]
    list_fields: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Sniffer needs no configuration
    if args.sniffer {
        init_logging(&args.log_level, None)?;
        return sniffer::run_key_sniffer().await;
    }

    if args.check_config || args.list_fields {
        init_logging(&args.log_level, None)?;
        let config = AppConfig::load(&args.config).await?;
        if args.check_config {
            print_config_summary(&args.config, &config);
        }
        if args.list_fields {
            sniffer::list_fields_formatted(&config);
        }
        return Ok(());
    }

    // Peek at the config for the log directory before wiring the watcher
    let boot_config = AppConfig::load(&args.config).await?;
    let _log_guard = init_logging(
        &args.log_level,
        boot_config.log.as_ref().and_then(|l| l.dir.as_deref()),
    )?;

    info!("Starting Barcode GW...");
    info!("Configuration file: {}", args.config);

    // Load configuration with hot-reload watcher
    let (config_watcher, initial_config) = ConfigWatcher::new(args.config.clone()).await?;
    info!("Configuration loaded successfully with hot-reload enabled");

    // Pick the lookup backend
    let driver: Arc<dyn InventoryDriver> = match initial_config.inventory.driver.as_str() {
        "console" => Arc::new(ConsoleDriver::new("inventory")),
        _ => Arc::new(HttpInventoryDriver::new(&initial_config.inventory)?),
    };
    driver.init().await?;

    // Initialize router
    let router = Router::new((*initial_config).clone(), Arc::clone(&driver));
    info!("Router initialized");

    if args.repl {
        cli::run_repl(&router).await?;
    } else {
        run_app(&router, config_watcher, shutdown_signal()).await?;
    }

    driver.shutdown().await?;
    info!("Barcode GW shutdown complete");
    Ok(())
}

async fn run_app(
    router: &Router,
    mut config_watcher: ConfigWatcher,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    use crossterm::event::{Event, EventStream};
    use tokio_stream::StreamExt;

    let mut lookup_rx = router
        .take_lookup_receiver()
        .ok_or_else(|| anyhow::anyhow!("Lookup receiver already taken"))?;
    let mut field_rx = router
        .take_field_event_receiver()
        .ok_or_else(|| anyhow::anyhow!("Field event receiver already taken"))?;

    info!("Active page: {}", router.get_active_page_name().await);
    info!("Ready to process keystrokes (ctrl+b focuses the barcode field, ctrl+c quits)");

    crossterm::terminal::enable_raw_mode()?;
    let mut events = EventStream::new();

    tokio::pin!(shutdown);

    // Main event loop
    let result: Result<()> = loop {
        let deadline = router.next_deadline();
        let idle = async {
            match deadline {
                Some(d) => tokio::time::sleep_until(tokio::time::Instant::from_std(d)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            // Handle keystrokes (human or scanner)
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(press) = keyboard::map_key_event(&key_event) {
                            // Raw mode swallows the usual SIGINT
                            if press.ctrl && press.key == Key::Char('c') {
                                info!("ctrl+c received, stopping event loop");
                                break Ok(());
                            }
                            router.on_key(press);
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(e.into()),
                    None => break Ok(()),
                }
            }

            // Expire detector deadlines and flash windows
            _ = idle => {
                router.poll(std::time::Instant::now()).await;
            }

            // Apply completed lookups
            Some(outcome) = lookup_rx.recv() => {
                router.apply_lookup_reply(outcome);
                render_panel_raw(router);
            }

            // Surface field change notifications
            Some(event) = field_rx.recv() => {
                let FieldEvent::Changed { field, value } = event;
                debug!("Field '{}' changed to '{}'", field, value);
                render_form_raw(router);
            }

            // Handle config reload
            Some(new_config) = config_watcher.next_config() => {
                info!("📝 Configuration file changed, reloading...");
                match router.update_config(new_config).await {
                    Ok(()) => info!("✅ Configuration reloaded successfully"),
                    Err(e) => warn!("⚠️  Failed to reload config (keeping old config): {}", e),
                }
            }

            // Handle shutdown signal
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break Ok(());
            }
        }
    };

    crossterm::terminal::disable_raw_mode()?;
    result
}

/// Print form state with raw-mode line endings
fn render_form_raw(router: &Router) {
    use std::io::Write;
    for line in cli::form_lines(router) {
        print!("{}\r\n", line);
    }
    let _ = std::io::stdout().flush();
}

/// Print panel state with raw-mode line endings
fn render_panel_raw(router: &Router) {
    use std::io::Write;
    let lines = router.panel_lines();
    if lines.is_empty() {
        return;
    }
    for line in lines {
        print!("{}\r\n", line);
    }
    let _ = std::io::stdout().flush();
}

fn init_logging(
    level: &str,
    log_dir: Option<&str>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false),
    );

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "barcode-gw.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            registry.init();
            Ok(None)
        }
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
    info!("Shutdown signal received");
}

fn print_config_summary(path: &str, config: &AppConfig) {
    use colored::*;

    println!("\n{}", "=== Configuration Check ===".bold().cyan());

    println!("\n{}", "File:".bold());
    println!("  {}", path.green());

    println!("\n{}", "Inventory:".bold());
    println!("  Endpoint: {}", config.inventory.base_url.green());
    println!("  Driver:   {}", config.inventory.driver.yellow());
    println!("  Timeout:  {}ms", config.inventory.timeout_ms);

    println!("\n{}", "Input:".bold());
    println!("  Debounce window: {}ms", config.input.debounce_ms);
    println!("  Min scan keys:   {}", config.input.min_scan_keys);
    println!("  Flash duration:  {}ms", config.input.flash_ms);

    println!("\n{}", "Pages:".bold());
    println!(
        "  Total pages: {}",
        config.pages.len().to_string().green()
    );
    for page in &config.pages {
        let lookup_note = if page.auto_lookup() {
            " [auto-lookup]".cyan().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} ({} fields){}",
            page.name.yellow(),
            page.fields.len(),
            lookup_note
        );
    }

    println!("\n{}", "✅ Configuration is valid!".green().bold());
}
