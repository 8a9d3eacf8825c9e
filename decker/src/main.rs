//! decker — a terminal character sheet with a typewriter display.
//!
//! Reads one line at a time, resolves it to a command (or a field of the
//! character record), and animates the result character by character.
//!
//! ```bash
//! decker --open ./character.json
//! decker -f            # skip the boot sequence
//! ```

mod repl;

use decker_core::{boot_sequence, CharacterStore, Scheduler, Session};
use repl::ReaderEvent;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return;
    }

    let fast_boot = args.iter().any(|a| a == "--fast-boot" || a == "-f");
    let path = arg_value(&args, "--open", "-o").unwrap_or_else(|| "./character.json".to_string());

    let mut store = CharacterStore::new();
    if let Err(err) = store.load(&path) {
        eprintln!("Failed to open {path}: {err}");
        std::process::exit(1);
    }

    let mut session = Session::new(Scheduler::new(), store);

    if !fast_boot {
        boot_sequence(&session).await;
    }

    let (label_tx, mut events) = repl::spawn_reader(session.completion_names());

    loop {
        if label_tx.send(session.prompt_label().to_string()).is_err() {
            break;
        }
        match events.recv().await {
            Some(ReaderEvent::Line(line)) => session.handle_line(&line),
            Some(ReaderEvent::Interrupted) => continue,
            Some(ReaderEvent::Eof) | None => break,
        }

        // Wait for the animation to finish before prompting again.
        if let Some(flush) = session.out.pending() {
            flush.await;
        }
        if session.exit_requested() {
            break;
        }
    }
}

/// The value following `--flag <value>` or `-f <value>`.
fn arg_value(args: &[String], long: &str, short: &str) -> Option<String> {
    args.iter()
        .position(|a| a == long || a == short)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn print_help() {
    println!("decker - terminal character sheet");
    println!();
    println!("USAGE:");
    println!("  decker [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help         Show this help message");
    println!("  -f, --fast-boot    Skip the boot sequence");
    println!("  -o, --open <PATH>  Character file to load (default: ./character.json)");
    println!();
    println!("Once running, type a command name (tab completes) or any field");
    println!("of the character file. `exit` or Ctrl-D leaves the terminal.");
}
