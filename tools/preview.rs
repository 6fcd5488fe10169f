/// Preview — interactive generation shell for testing rules and themes.
///
/// Usage: preview [--rules <path>] [--seed <n>] [--iterations <n>] [--cell-size <n>]
///
/// Commands:
///   generate            — generate a dungeon and print the walkthrough
///   room <x,y>          — reprint one room from the last dungeon
///   seed <n>            — set RNG seed
///   iterations <n>      — set rewriting passes
///   theme <name>        — pin a theme, or 'random' to clear
///   svg <path>          — write the last map to a file
///   json                — print the last report as JSON
///   bulk <n>            — generate n dungeons with summary statistics
///   help                — list commands
///   quit                — exit

use dungeon_engine::core::lsystem::RuleTable;
use dungeon_engine::core::pipeline::{DungeonPipeline, DungeonReport, PipelineError};
use dungeon_engine::schema::theme::Theme;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() >= 2 && (args[1] == "--help" || args[1] == "-h") {
        print_usage();
        return;
    }

    let mut rules_path = None;
    let mut seed: u64 = 42;
    let mut iterations: u32 = 3;
    let mut cell_size: i32 = 50;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rules" if i + 1 < args.len() => {
                i += 1;
                rules_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--iterations" if i + 1 < args.len() => {
                i += 1;
                iterations = args[i].parse().unwrap_or(3);
            }
            "--cell-size" if i + 1 < args.len() => {
                i += 1;
                cell_size = args[i].parse().unwrap_or(50);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    // Load custom rules
    let mut rules: Option<RuleTable> = None;
    if let Some(ref path) = rules_path {
        match RuleTable::load_from_ron(Path::new(path)) {
            Ok(table) => {
                println!("Loaded {} production rules from {}", table.rules.len(), path);
                rules = Some(table);
            }
            Err(e) => {
                eprintln!("ERROR loading rules {}: {}", path, e);
                std::process::exit(1);
            }
        }
    }

    println!("Seed: {} (same seed regenerates the same dungeon)", seed);
    println!("Type 'help' for commands.\n");

    // Session state
    let mut current_seed = seed;
    let mut current_iterations = iterations;
    let mut pinned_theme: Option<Theme> = None;
    let mut last_report: Option<DungeonReport> = None;

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "generate" | "g" => {
                match run_pipeline(
                    current_seed,
                    current_iterations,
                    cell_size,
                    rules.clone(),
                    pinned_theme,
                ) {
                    Ok(report) => {
                        print_walkthrough(&report);
                        println!(
                            "[Trace] seed={} iterations={} rooms={}",
                            current_seed,
                            current_iterations,
                            report.descriptions.len()
                        );
                        last_report = Some(report);
                    }
                    Err(e) => {
                        println!("ERROR: {}", e);
                    }
                }
            }
            "room" => {
                if parts.len() < 2 {
                    println!("Usage: room <x,y>");
                    continue;
                }
                match &last_report {
                    Some(report) => match report.descriptions.get(parts[1]) {
                        Some(text) => println!("[{}] {}", parts[1], text),
                        None => println!("No room at {} in the last dungeon.", parts[1]),
                    },
                    None => println!("No dungeon yet. Run 'generate' first."),
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Current seed: {}", current_seed);
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        current_seed = s;
                        println!("Seed set to {}", current_seed);
                    }
                    Err(_) => {
                        println!("Invalid seed: {}", parts[1]);
                    }
                }
            }
            "iterations" => {
                if parts.len() < 2 {
                    println!("Current iterations: {}", current_iterations);
                    continue;
                }
                match parts[1].parse::<u32>() {
                    Ok(n) => {
                        current_iterations = n;
                        println!("Iterations set to {}", current_iterations);
                    }
                    Err(_) => {
                        println!("Invalid iteration count: {}", parts[1]);
                    }
                }
            }
            "theme" => {
                if parts.len() < 2 {
                    match pinned_theme {
                        Some(theme) => println!("Current theme: {}", theme.name()),
                        None => println!("Current theme: random"),
                    }
                    println!("Themes: temple, mine, crypt, lair, random");
                    continue;
                }
                if parts[1] == "random" {
                    pinned_theme = None;
                    println!("Theme cleared; each dungeon draws its own.");
                    continue;
                }
                match parse_theme(parts[1]) {
                    Some(theme) => {
                        println!("Theme pinned to {}", theme.name());
                        pinned_theme = Some(theme);
                    }
                    None => {
                        println!("Unknown theme: {}. Try temple, mine, crypt, lair.", parts[1]);
                    }
                }
            }
            "svg" => {
                let path = if parts.len() >= 2 { parts[1] } else { "dungeon.svg" };
                match &last_report {
                    Some(report) => match std::fs::write(path, &report.svg) {
                        Ok(()) => println!("Map written to {}", path),
                        Err(e) => println!("ERROR writing {}: {}", path, e),
                    },
                    None => println!("No dungeon yet. Run 'generate' first."),
                }
            }
            "json" => match &last_report {
                Some(report) => match serde_json::to_string_pretty(report) {
                    Ok(payload) => println!("{}", payload),
                    Err(e) => println!("ERROR serializing report: {}", e),
                },
                None => println!("No dungeon yet. Run 'generate' first."),
            },
            "bulk" => {
                if parts.len() < 2 {
                    println!("Usage: bulk <n>");
                    continue;
                }
                let count: u64 = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };

                let mut reports = Vec::new();
                let mut errors = 0;
                for offset in 0..count {
                    match run_pipeline(
                        current_seed.wrapping_add(offset),
                        current_iterations,
                        cell_size,
                        rules.clone(),
                        pinned_theme,
                    ) {
                        Ok(report) => reports.push(report),
                        Err(_) => errors += 1,
                    }
                }
                print_bulk_stats(&reports, errors);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn print_usage() {
    println!("Preview — interactive generation shell for testing rules and themes.");
    println!();
    println!("Usage: preview [--rules <path>] [--seed <n>] [--iterations <n>] [--cell-size <n>]");
    println!();
    println!("  --rules <path>     Path to a RON production rule table");
    println!("  --seed <n>         Initial RNG seed (default: 42)");
    println!("  --iterations <n>   Rewriting passes per dungeon (default: 3)");
    println!("  --cell-size <n>    Pixel size of one map cell (default: 50)");
}

fn print_help() {
    println!("Commands:");
    println!("  generate            Generate a dungeon and print the walkthrough");
    println!("  room <x,y>          Reprint one room from the last dungeon");
    println!("  seed <n>            Set RNG seed");
    println!("  iterations <n>      Set rewriting passes");
    println!("  theme <name>        Pin a theme (temple, mine, crypt, lair) or 'random'");
    println!("  svg [path]          Write the last map (default: dungeon.svg)");
    println!("  json                Print the last report as JSON");
    println!("  bulk <n>            Generate n dungeons with summary statistics");
    println!("  help                Show this help");
    println!("  quit                Exit");
}

fn parse_theme(s: &str) -> Option<Theme> {
    match s.to_lowercase().as_str() {
        "temple" | "ancient_temple" => Some(Theme::AncientTemple),
        "mine" | "abandoned_mine" => Some(Theme::AbandonedMine),
        "crypt" | "cursed_crypt" => Some(Theme::CursedCrypt),
        "lair" | "dragons_lair" => Some(Theme::DragonsLair),
        _ => None,
    }
}

fn run_pipeline(
    seed: u64,
    iterations: u32,
    cell_size: i32,
    rules: Option<RuleTable>,
    theme: Option<Theme>,
) -> Result<DungeonReport, PipelineError> {
    let mut builder = DungeonPipeline::builder()
        .seed(seed)
        .iterations(iterations)
        .cell_size(cell_size);
    if let Some(rules) = rules {
        builder = builder.with_rules(rules);
    }
    if let Some(theme) = theme {
        builder = builder.with_theme(theme);
    }
    builder.build()?.generate()
}

fn print_walkthrough(report: &DungeonReport) {
    println!("\n--- {} ---", report.theme);
    println!("{}", report.overview);
    println!();

    let mut rooms: Vec<(&String, &String)> = report.descriptions.iter().collect();
    rooms.sort_by_key(|(key, _)| cell_sort_key(key));
    for (key, text) in rooms {
        println!("[{}] {}", key, text);
    }
    println!("--- End ---\n");
}

fn print_bulk_stats(reports: &[DungeonReport], errors: u64) {
    println!(
        "\n=== Bulk Generation: {} dungeons ({} errors) ===\n",
        reports.len(),
        errors
    );
    if reports.is_empty() {
        return;
    }

    let room_counts: Vec<usize> = reports.iter().map(|r| r.descriptions.len()).collect();
    let min = room_counts.iter().min().copied().unwrap_or(0);
    let max = room_counts.iter().max().copied().unwrap_or(0);
    let avg = room_counts.iter().sum::<usize>() as f64 / reports.len() as f64;
    println!("Rooms: min {} / avg {:.1} / max {}", min, avg, max);

    let mut theme_counts: HashMap<&str, u32> = HashMap::new();
    for report in reports {
        *theme_counts.entry(report.theme.as_str()).or_insert(0) += 1;
    }
    println!("Themes:");
    let mut themes: Vec<(&str, u32)> = theme_counts.into_iter().collect();
    themes.sort_by(|a, b| b.1.cmp(&a.1));
    for (theme, count) in themes {
        println!("  {}: {}", theme, count);
    }

    let unique_overviews: std::collections::HashSet<&String> =
        reports.iter().map(|r| &r.overview).collect();
    println!("Unique overviews: {} / {}", unique_overviews.len(), reports.len());

    let total_descriptions: usize = room_counts.iter().sum();
    let avg_len: f64 = reports
        .iter()
        .flat_map(|r| r.descriptions.values())
        .map(|text| text.len() as f64)
        .sum::<f64>()
        / total_descriptions.max(1) as f64;
    println!("Average description length: {:.0} chars", avg_len);

    // Word frequency distribution (top 10)
    let mut word_counts: HashMap<String, u32> = HashMap::new();
    for report in reports {
        for text in report.descriptions.values() {
            for word in text.split_whitespace() {
                let clean = word
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                if clean.len() > 3 {
                    *word_counts.entry(clean).or_insert(0) += 1;
                }
            }
        }
    }
    let mut word_freq: Vec<(String, u32)> = word_counts.into_iter().collect();
    word_freq.sort_by(|a, b| b.1.cmp(&a.1));
    println!("\nTop 10 words:");
    for (word, count) in word_freq.iter().take(10) {
        println!("  {}: {}", word, count);
    }

    if let Some(first) = reports.first() {
        println!("\nSample overview:");
        println!("  {}", first.overview);
    }
    println!();
}

/// Sort key putting rooms in row order, which reads naturally as a
/// walkthrough.
fn cell_sort_key(key: &str) -> (i32, i32) {
    match key.split_once(',') {
        Some((x, y)) => (y.parse().unwrap_or(0), x.parse().unwrap_or(0)),
        None => (0, 0),
    }
}
