//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to inspect a document's sections and
//!   validate a board configuration against it.
//! - Keep output deterministic for quick local sanity checks.

use gridnote_core::{parse, resolve_board, BoardCatalog, GridDimensions, LayoutModel};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), String> {
    match args {
        [doc_path] => inspect_document(doc_path),
        [doc_path, config_path, board_name] => {
            inspect_document(doc_path)?;
            resolve_against(doc_path, config_path, board_name)
        }
        _ => Err("usage: gridnote_cli <document.md> [<boards.json> <board-name>]".to_string()),
    }
}

fn read_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("cannot read `{path}`: {err}"))
}

fn inspect_document(doc_path: &str) -> Result<(), String> {
    let text = read_file(doc_path)?;
    let registry = parse(&text);

    println!("gridnote_core version={}", gridnote_core::core_version());
    println!("document={doc_path} sections={}", registry.len());
    for section in registry.sections() {
        println!("  [{}, {}) {}", section.start, section.end, section.title);
    }
    for title in registry.duplicate_titles() {
        println!("  warning: duplicate heading `{title}` (last occurrence wins)");
    }
    Ok(())
}

fn resolve_against(doc_path: &str, config_path: &str, board_name: &str) -> Result<(), String> {
    let text = read_file(doc_path)?;
    let config = read_file(config_path)?;
    let models: Vec<LayoutModel> = serde_json::from_str(&config)
        .map_err(|err| format!("cannot decode `{config_path}`: {err}"))?;
    let catalog = BoardCatalog::new(models).map_err(|err| err.to_string())?;

    let board = resolve_board(&catalog, board_name, &text, GridDimensions::default())
        .map_err(|err| err.to_string())?;

    println!("board={} placements={}", board.name, board.placements.len());
    for placement in &board.placements {
        println!(
            "  {} at ({}, {}) {}x{}",
            placement.block.title,
            placement.block.x,
            placement.block.y,
            placement.block.w,
            placement.block.h
        );
    }
    Ok(())
}
