use std::io::{self, BufRead, Write};

use anyhow::Result;

use rowmap_rs::app::App;
use rowmap_rs::config::Settings;
use rowmap_rs::data::{self, Dataset, ItemField};
use rowmap_rs::layout::{LayoutConfig, MAX_LAYOUT_ROWS};
use rowmap_rs::render::{self, canvas, colors::ColorSettings, text};

const HELP: &str = "commands: add | rm IDX | set IDX name|weight|value TEXT | rows +|-|N | list | show | quit";

fn draw(app: &App, settings: &Settings, out: &mut impl Write) -> Result<()> {
    match (&app.layout, &app.last_error) {
        (Some(layout), _) => {
            let grid = canvas::rasterize(
                layout,
                &app.laid_out,
                settings.width,
                settings.height,
                settings.color,
                &ColorSettings::default(),
            );
            if settings.color {
                writeln!(out, "{}", grid.to_ansi_string())?;
            } else {
                writeln!(out, "{}", grid.to_plain_string())?;
            }
            write!(out, "{}", render::listing(layout, &app.laid_out))?;
        }
        (None, Some(e)) => writeln!(out, "layout error: {}", e)?,
        (None, None) => writeln!(out, "(no valid items: each needs a name, a positive weight and a non-zero value)")?,
    }
    Ok(())
}

fn list(app: &App, out: &mut impl Write) -> Result<()> {
    for (idx, item) in app.dataset.items().iter().enumerate() {
        writeln!(
            out,
            "[{}] {:<12} weight={:<8} value={:<8}{}",
            idx,
            item.name,
            item.weight,
            text::format_percent(item.value),
            if item.is_valid() { "" } else { "  (skipped)" }
        )?;
    }
    writeln!(out, "rows: {}", app.rows())?;
    Ok(())
}

/// Apply one editor command. Returns false when the session should end.
fn apply_command(app: &mut App, line: &str, out: &mut impl Write) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(true);
    };

    match cmd {
        "quit" | "exit" | "q" => return Ok(false),
        "help" | "?" => writeln!(out, "{}", HELP)?,
        "list" | "ls" => list(app, out)?,
        "show" => {}
        "add" => {
            if !app.add_row() {
                writeln!(out, "row limit {} reached", data::MAX_ROWS)?;
            }
        }
        "rm" => match parts.next().and_then(|s| s.parse::<usize>().ok()) {
            Some(idx) if app.remove_row(idx) => {}
            _ => writeln!(out, "cannot remove that row")?,
        },
        "set" => {
            let idx = parts.next().and_then(|s| s.parse::<usize>().ok());
            let field = parts.next().and_then(ItemField::parse);
            let value = parts.collect::<Vec<_>>().join(" ");
            match (idx, field) {
                (Some(idx), Some(field)) => {
                    if let Err(e) = app.edit(idx, field, &value) {
                        writeln!(out, "{:#}", e)?;
                    }
                }
                _ => writeln!(out, "usage: set IDX name|weight|value TEXT")?,
            }
        }
        "rows" => match parts.next() {
            Some("+") => {
                if !app.increment_rows() {
                    writeln!(out, "row limit {} reached", MAX_LAYOUT_ROWS)?;
                }
            }
            Some("-") => {
                if !app.decrement_rows() {
                    writeln!(out, "already at one row")?;
                }
            }
            Some(n) => match n.parse::<usize>() {
                Ok(n) if app.set_rows(n) => {}
                _ => writeln!(out, "rows must be between 1 and {}", MAX_LAYOUT_ROWS)?,
            },
            None => writeln!(out, "rows: {}", app.rows())?,
        },
        other => writeln!(out, "unknown command '{}'\n{}", other, HELP)?,
    }
    Ok(true)
}

fn run_interactive(app: &mut App, settings: &Settings) -> Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    writeln!(out, "{}", HELP)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !apply_command(app, &line, &mut out)? {
            break;
        }
        if app.needs_relayout || line.trim() == "show" {
            app.relayout();
            draw(app, settings, &mut out)?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging (stdout carries the chart)
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rowmap_rs=warn".parse().unwrap()),
        )
        .init();

    let settings = Settings::from_env_and_args()?;
    tracing::info!("rowmap starting with {:?}", settings);

    let dataset = match &settings.data_path {
        Some(path) => Dataset::new(data::load_items(path)?),
        None => Dataset::sample(),
    };

    let mut app = App::new(dataset, settings.rows, LayoutConfig::default());
    app.relayout();

    let mut out = io::stdout().lock();
    draw(&app, &settings, &mut out)?;
    drop(out);

    if settings.interactive {
        run_interactive(&mut app, &settings)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Dataset::sample(), 3, LayoutConfig::default())
    }

    #[test]
    fn editor_commands_drive_the_app() {
        let mut app = app();
        let mut out = Vec::new();
        assert!(apply_command(&mut app, "set 5 name Zed", &mut out).unwrap());
        assert!(apply_command(&mut app, "set 5 weight 1", &mut out).unwrap());
        assert!(apply_command(&mut app, "set 5 value -0.5", &mut out).unwrap());
        assert!(apply_command(&mut app, "rows +", &mut out).unwrap());
        assert!(out.is_empty());

        app.relayout();
        assert_eq!(app.rows(), 4);
        assert_eq!(app.layout.as_ref().unwrap().rects.len(), 6);

        assert!(!apply_command(&mut app, "quit", &mut out).unwrap());
    }

    #[test]
    fn bad_commands_report_without_failing() {
        let mut app = App::new(Dataset::sample(), 1, LayoutConfig::default());
        let mut out = Vec::new();
        apply_command(&mut app, "rows -", &mut out).unwrap();
        apply_command(&mut app, "rm 99", &mut out).unwrap();
        apply_command(&mut app, "set 0 weight heavy", &mut out).unwrap();
        apply_command(&mut app, "frobnicate", &mut out).unwrap();
        apply_command(&mut app, "rows 18446744073709551615", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("already at one row"));
        assert!(text.contains("cannot remove"));
        assert!(text.contains("weight must be a number"));
        assert!(text.contains("unknown command"));
        assert!(text.contains("rows must be between 1 and"));
        assert_eq!(app.rows(), 1);
    }

    #[test]
    fn draw_without_items_explains_why() {
        let mut app = App::new(Dataset::new(vec![data::Item::blank()]), 2, LayoutConfig::default());
        app.relayout();
        let mut out = Vec::new();
        draw(&app, &Settings::default(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no valid items"));
    }
}
