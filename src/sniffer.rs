//! Keystroke sniffer and field listing
//!
//! The sniffer prints every key with its inter-key latency, which is how you
//! find out whether a given scanner fits inside the configured debounce
//! window before blaming the heuristic.

use anyhow::Result;
use colored::*;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use crossterm::terminal;
use std::time::Instant;
use tokio_stream::StreamExt;

use crate::config::AppConfig;
use crate::fields::FieldKind;
use crate::input::keyboard::map_key_event;

/// Run the keystroke sniffer until Esc
pub async fn run_key_sniffer() -> Result<()> {
    println!("{}", "=== Keystroke sniffer ===".bold().cyan());
    println!("Type or scan into this terminal; Esc exits.");
    println!("Latencies at or under the debounce window read as one burst.\n");

    terminal::enable_raw_mode()?;
    let result = sniff_loop().await;
    terminal::disable_raw_mode()?;
    result
}

async fn sniff_loop() -> Result<()> {
    let mut events = EventStream::new();
    let mut last: Option<Instant> = None;

    while let Some(event) = events.next().await {
        let event = event?;
        let Event::Key(key_event) = event else {
            continue;
        };
        if key_event.kind == KeyEventKind::Release {
            continue;
        }
        if key_event.code == KeyCode::Esc {
            break;
        }
        let Some(press) = map_key_event(&key_event) else {
            continue;
        };

        let now = Instant::now();
        let delta_ms = last.map(|t| now.duration_since(t).as_millis());
        last = Some(now);

        let delta_str = match delta_ms {
            None => "      -".to_string(),
            Some(ms) => format!("{:>5}ms", ms),
        };
        let hint = match delta_ms {
            Some(ms) if ms <= 100 => "burst".green(),
            Some(_) => "pause".yellow(),
            None => "start".normal(),
        };

        print!("{}  {}  {}\r\n", delta_str, hint, press.key.label());
    }

    Ok(())
}

/// Print the configured pages and their fields
pub fn list_fields_formatted(config: &AppConfig) {
    println!("\n{}", "=== Configured Pages ===".bold().cyan());

    for page in &config.pages {
        let lookup_note = if page.auto_lookup() {
            format!("  {}", "[auto-lookup after scan]".cyan())
        } else {
            String::new()
        };
        println!("\n{} ({}){}", page.name.bold(), page.path, lookup_note);

        for field in &page.fields {
            let kind = match field.kind {
                FieldKind::Barcode => "barcode",
                FieldKind::Quantity => "quantity",
                FieldKind::Text => "text",
            };
            let mut line = format!("  {:<20} {}", field.name, kind.yellow());
            if !field.suggestions.is_empty() {
                line.push_str(&format!("  ({} suggestions)", field.suggestions.len()));
            }
            println!("{}", line);
        }
    }
    println!();
}
