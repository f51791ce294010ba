//! Non-interactive output modes.

mod commands;

pub use commands::Cli;

use std::process;
use studymd::nav::Navigator;
use studymd::store::KeyValueStore;

/// Run the output-only modes (`--section`, `--list`, `--progress`) in that
/// order. Exits with status 1 when `--section` names an unknown id.
pub fn handle_cli_mode<S: KeyValueStore>(args: &Cli, nav: &mut Navigator<S>) {
    if let Some(ref id) = args.section {
        match section_content(nav, id) {
            Some(content) => println!("{}", content),
            None => {
                eprintln!("Section '{}' not found", id);
                eprintln!("Use --list to see section ids");
                process::exit(1);
            }
        }
    }

    if args.list {
        if args.json {
            match list_json(nav) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing sections: {}", e);
                    process::exit(1);
                }
            }
        } else {
            for line in list_lines(nav) {
                println!("{}", line);
            }
        }
    }

    if args.progress {
        println!("{}", progress_line(nav));
    }

    if let Some(e) = nav.take_store_error() {
        eprintln!("Warning: progress not saved: {}", e);
    }
}

/// Content of section `id`, marking it visited. `None` when the id is unknown.
fn section_content<S: KeyValueStore>(nav: &mut Navigator<S>, id: &str) -> Option<String> {
    let content = nav
        .sections()
        .iter()
        .find(|s| s.id == id)
        .map(|s| s.content.clone())?;
    nav.select_section(id);
    Some(content)
}

fn list_lines<S: KeyValueStore>(nav: &Navigator<S>) -> Vec<String> {
    let filtered = nav.filtered_sections();
    let id_width = filtered.iter().map(|s| s.id.len()).max().unwrap_or(0);
    filtered
        .iter()
        .map(|s| {
            let marker = if nav.is_visited(&s.id) { '✓' } else { '○' };
            format!("{} {:<width$}  {}", marker, s.id, s.title, width = id_width)
        })
        .collect()
}

fn list_json<S: KeyValueStore>(nav: &Navigator<S>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&nav.filtered_sections())
}

fn progress_line<S: KeyValueStore>(nav: &Navigator<S>) -> String {
    format!(
        "{}/{} sections visited ({}%)",
        nav.visited_count(),
        nav.len(),
        nav.progress()
    )
}
