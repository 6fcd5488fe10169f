/// Layout statistics — bulk structural checks over many generated dungeons.
///
/// Usage: layout_stats [--runs <n>] [--iterations <n>] [--seed <n>]
///
/// Exits nonzero if any generated layout violates a structural invariant,
/// so it can gate rule-table changes in CI.

use dungeon_engine::core::layout::LayoutGenerator;
use dungeon_engine::schema::room::{RoomGraph, RoomType};
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut runs: u64 = 100;
    let mut iterations: u32 = 3;
    let mut base_seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" if i + 1 < args.len() => {
                i += 1;
                runs = args[i].parse().unwrap_or(100);
            }
            "--iterations" if i + 1 < args.len() => {
                i += 1;
                iterations = args[i].parse().unwrap_or(3);
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                base_seed = args[i].parse().unwrap_or(42);
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mut room_counts: Vec<usize> = Vec::with_capacity(runs as usize);
    let mut type_totals: [u64; 5] = [0; 5];
    let mut violations: Vec<String> = Vec::new();

    for offset in 0..runs {
        let seed = base_seed.wrapping_add(offset);
        let mut generator = LayoutGenerator::with_seed(seed);
        let graph = match generator.generate(iterations) {
            Ok(graph) => graph,
            Err(e) => {
                eprintln!("ERROR: seed {}: {}", seed, e);
                process::exit(1);
            }
        };

        room_counts.push(graph.len());
        type_totals[0] += graph.positions_of(RoomType::Entrance).len() as u64;
        type_totals[1] += graph.positions_of(RoomType::Normal).len() as u64;
        type_totals[2] += graph.positions_of(RoomType::Treasure).len() as u64;
        type_totals[3] += graph.positions_of(RoomType::Monster).len() as u64;
        type_totals[4] += graph.positions_of(RoomType::Exit).len() as u64;

        check_structure(seed, &graph, &mut violations);
    }

    println!("=== Layout statistics: {} runs, {} iterations ===\n", runs, iterations);

    let min = room_counts.iter().min().copied().unwrap_or(0);
    let max = room_counts.iter().max().copied().unwrap_or(0);
    let avg = room_counts.iter().sum::<usize>() as f64 / room_counts.len().max(1) as f64;
    println!("Rooms per dungeon: min {} / avg {:.1} / max {}", min, avg, max);

    println!("Room totals across all runs:");
    let labels = ["entrance", "normal", "treasure", "monster", "exit"];
    for (label, total) in labels.iter().zip(type_totals.iter()) {
        println!("  {:<9} {}", label, total);
    }

    if violations.is_empty() {
        println!("\nNo structural violations.");
    } else {
        println!("\n{} structural violation(s):", violations.len());
        for violation in &violations {
            println!("  {}", violation);
        }
        process::exit(1);
    }
}

fn print_usage() {
    println!("layout_stats — bulk structural checks over generated dungeons.");
    println!();
    println!("Usage: layout_stats [--runs <n>] [--iterations <n>] [--seed <n>]");
    println!();
    println!("  --runs <n>        Number of dungeons to generate (default: 100)");
    println!("  --iterations <n>  Rewriting passes per dungeon (default: 3)");
    println!("  --seed <n>        First seed; later runs use seed+1, seed+2, ... (default: 42)");
}

fn check_structure(seed: u64, graph: &RoomGraph, violations: &mut Vec<String>) {
    let entrances = graph.positions_of(RoomType::Entrance);
    if entrances.len() != 1 {
        violations.push(format!("seed {}: {} entrances", seed, entrances.len()));
    }

    let exits = graph.positions_of(RoomType::Exit);
    if graph.len() > 1 && exits.len() != 1 {
        violations.push(format!("seed {}: {} exits in {} rooms", seed, exits.len(), graph.len()));
    }

    for (pos, room) in graph.iter() {
        for conn in &room.connections {
            match graph.get(*conn) {
                Some(neighbor) if neighbor.is_connected_to(*pos) => {}
                Some(_) => {
                    violations.push(format!("seed {}: {} -> {} not mirrored", seed, pos, conn));
                }
                None => {
                    violations.push(format!("seed {}: {} -> missing room {}", seed, pos, conn));
                }
            }
        }
    }
}
