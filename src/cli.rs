//! Command-line interface and REPL
//!
//! The REPL drives the router without a scanner attached: it can simulate
//! human typing and scanner bursts, move focus, validate, and navigate
//! pages. Useful for exercising a config against a running tracker.

use std::time::{Duration, Instant};

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;

use crate::camera::CameraScanner;
use crate::fields::{FieldEvent, FieldKind, Validity};
use crate::input::{Key, KeyPress};
use crate::router::{LookupOutcome, Router};

pub async fn run_repl(router: &Router) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut lookup_rx = router.take_lookup_receiver();
    let mut field_rx = router.take_field_event_receiver();

    println!(
        "{}",
        "Barcode GW REPL - type 'help' for commands".bold().cyan()
    );
    println!("Active page: {}\n", router.get_active_page_name().await);

    loop {
        match rl.readline("barcode-gw> ") {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let (cmd, arg) = split_command(&line);
                let mut expect_lookup = false;

                match cmd {
                    "exit" | "quit" => break,
                    "help" => print_help(),
                    "fields" => print_form(router),
                    "panel" => print_panel(router),
                    "pages" => {
                        let active = router.get_active_page_name().await;
                        for name in router.list_pages().await {
                            let marker = if name == active { "*" } else { " " };
                            println!("{} {}", marker, name);
                        }
                    }
                    "page" => match arg {
                        Some(target) => {
                            if let Err(e) = router.set_active_page(target).await {
                                println!("{}", e.to_string().red());
                            }
                        }
                        None => println!("usage: page <name|index>"),
                    },
                    "focus" => match arg {
                        Some(name) => {
                            if !router.focus_field(name) {
                                println!("{}", format!("No field named '{}'", name).red());
                            }
                        }
                        None => println!("usage: focus <field>"),
                    },
                    "tab" => router.on_key(KeyPress::plain(Key::Tab)),
                    "enter" => router.on_key(KeyPress::plain(Key::Enter)),
                    "type" => match arg {
                        Some(text) => simulate_typing(router, text).await,
                        None => println!("usage: type <text>"),
                    },
                    "scan" => match arg {
                        Some(code) => {
                            simulate_scan(router, code).await;
                            expect_lookup = true;
                        }
                        None => println!("usage: scan <code>"),
                    },
                    "lookup" => match arg {
                        Some(code) => {
                            router.dispatch_lookup(code);
                            expect_lookup = true;
                        }
                        None => println!("usage: lookup <barcode>"),
                    },
                    "validate" => {
                        for (name, ok) in router.validate_all() {
                            let status = if ok {
                                "ok".green().to_string()
                            } else {
                                let form = router.form_snapshot();
                                let feedback = form
                                    .get(&name)
                                    .and_then(|f| f.feedback.clone())
                                    .unwrap_or_default();
                                format!("{} {}", "invalid:".red(), feedback)
                            };
                            println!("  {:<20} {}", name, status);
                        }
                    }
                    "camera" => {
                        if let Err(e) = CameraScanner::new().start() {
                            println!("{} {}", "⚠️ ".yellow(), e);
                            // Blocking prompt, like the alert it replaces
                            let _ = rl.readline("Press Enter to continue...");
                        }
                    }
                    _ => println!("Unknown command '{}', try 'help'", cmd),
                }

                if expect_lookup {
                    drain_lookups(router, &mut lookup_rx).await;
                }
                drain_field_events(&mut field_rx);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn split_command(line: &str) -> (&str, Option<&str>) {
    match line.split_once(' ') {
        Some((cmd, rest)) => (cmd, Some(rest.trim())),
        None => (line, None),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  fields              show the active form");
    println!("  panel               show the box info panel");
    println!("  pages               list pages (* marks active)");
    println!("  page <name|index>   switch page");
    println!("  focus <field>       focus a field");
    println!("  tab                 advance focus (blur-validates)");
    println!("  type <text>         simulate human typing into the focused field");
    println!("  scan <code>         simulate a scanner burst");
    println!("  enter               press Enter");
    println!("  lookup <barcode>    force an inventory lookup");
    println!("  validate            validate all barcode/quantity fields");
    println!("  camera              start camera scanning (stub)");
    println!("  exit                quit");
}

/// Feed characters with human-sized pauses, settling the detector after each
/// so no burst accumulates
async fn simulate_typing(router: &Router, text: &str) {
    let window = Duration::from_millis(router.input_cfg.read().debounce_ms);
    let mut t = Instant::now();
    for c in text.chars() {
        router.on_key_at(KeyPress::plain(Key::Char(c)), t);
        t += window;
        router.poll(t).await;
    }
}

/// Feed a whole code scanner-style: 2ms between keys, Enter-terminated,
/// then let the quiet window elapse
async fn simulate_scan(router: &Router, code: &str) {
    let window = Duration::from_millis(router.input_cfg.read().debounce_ms);
    let mut t = Instant::now();
    for c in code.chars() {
        router.on_key_at(KeyPress::plain(Key::Char(c)), t);
        t += Duration::from_millis(2);
    }
    router.on_key_at(KeyPress::plain(Key::Enter), t);
    router.poll(t + window).await;
}

/// Apply lookup replies as they arrive; gives a just-dispatched lookup a
/// moment to complete
async fn drain_lookups(
    router: &Router,
    rx: &mut Option<mpsc::UnboundedReceiver<LookupOutcome>>,
) {
    let Some(rx) = rx.as_mut() else { return };

    match tokio::time::timeout(Duration::from_millis(500), rx.recv()).await {
        Ok(Some(outcome)) => {
            router.apply_lookup_reply(outcome);
            while let Ok(outcome) = rx.try_recv() {
                router.apply_lookup_reply(outcome);
            }
            print_panel(router);
        }
        Ok(None) | Err(_) => {}
    }
}

fn drain_field_events(rx: &mut Option<mpsc::UnboundedReceiver<FieldEvent>>) {
    let Some(rx) = rx.as_mut() else { return };
    while let Ok(event) = rx.try_recv() {
        let FieldEvent::Changed { field, value } = event;
        println!("🔔 {} changed: '{}'", field, value);
    }
}

/// Render the active form as display lines
pub fn form_lines(router: &Router) -> Vec<String> {
    let form = router.form_snapshot();
    let now = Instant::now();
    let mut lines = Vec::new();

    for field in form.fields() {
        let marker = if form.focused_name() == Some(field.name.as_str()) {
            ">"
        } else {
            " "
        };
        let kind = match field.kind {
            FieldKind::Barcode => "barcode",
            FieldKind::Quantity => "quantity",
            FieldKind::Text => "text",
        };

        let mut line = format!("{} {:<18} [{:<8}] '{}'", marker, field.name, kind, field.value);

        if field.value.is_empty() {
            if let Some(placeholder) = &field.placeholder {
                line.push_str(&format!(" ({})", placeholder.dimmed()));
            }
        }
        if let Some(max) = field.max {
            line.push_str(&format!(" max={}", max));
        }
        match field.validity {
            Validity::Valid => line.push_str(&format!(" {}", "✓".green())),
            Validity::Invalid => {
                let feedback = field.feedback.as_deref().unwrap_or("invalid");
                line.push_str(&format!(" {} {}", "✗".red(), feedback.red()));
            }
            Validity::Unchecked => {}
        }
        if field.is_flashing(now) {
            line.push_str(&format!(" {}", "● scanned".green().bold()));
        }
        if !field.suggestions.is_empty() {
            line.push_str(&format!(" ({} suggestions)", field.suggestions.len()));
        }

        lines.push(line);
    }

    lines
}

pub fn print_form(router: &Router) {
    for line in form_lines(router) {
        println!("{}", line);
    }
}

pub fn print_panel(router: &Router) {
    let lines = router.panel_lines();
    if lines.is_empty() {
        println!("(panel hidden)");
        return;
    }
    for line in lines {
        println!("{}", line);
    }
}
