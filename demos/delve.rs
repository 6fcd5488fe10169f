/// Delve example — generates a dungeon and walks it room by room,
/// showing how the story accretes as descriptions are requested.
///
/// Run with: cargo run --example delve

use dungeon_engine::core::layout::LayoutGenerator;
use dungeon_engine::core::narrative::NarrativeGenerator;
use dungeon_engine::core::render::SvgRenderer;
use dungeon_engine::schema::room::{GridPos, RoomGraph};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

fn main() {
    // --- Generate the layout ---

    let mut layout = LayoutGenerator::with_seed(2026);
    let graph = layout.generate(3).expect("layout generation failed");

    let renderer = SvgRenderer::default();
    let (svg, normalized) = renderer.render(&graph);
    std::fs::write("delve.svg", &svg).expect("failed to write delve.svg");

    // --- Set the scene ---

    let mut narrator = NarrativeGenerator::with_seed(2026);

    println!("========================================");
    println!("  DELVE: {}", narrator.theme().name().to_uppercase());
    println!("========================================");
    println!();
    println!("{}", narrator.overview());
    println!();

    // --- Walk every room, breadth-first from the entrance ---

    let entrance = normalized.entrance().unwrap_or(GridPos::ORIGIN);
    for pos in walk_order(&normalized, entrance) {
        let room_type = match normalized.get(pos) {
            Some(room) => room.room_type,
            None => continue,
        };
        println!("--- Room {} [{}] ---", pos, room_type.name());
        println!("{}", narrator.describe(room_type, pos, entrance, &normalized));
        println!();
    }

    // --- What the delve established ---

    println!("========================================");
    let state = narrator.state();
    match &state.villain {
        Some(name) => println!("Villain: {}", name),
        None => println!("Villain: never encountered"),
    }
    println!("Treasure rooms found: {}", state.treasure_rooms_seen);
    println!("Clues recovered: {}", state.clues.len());
    for clue in &state.clues {
        println!("  - {}", clue);
    }
    println!("Map written to delve.svg ({} rooms)", normalized.len());
}

/// Breadth-first over corridors from the start, then any rooms the
/// corridors never reach, so every room is described exactly once.
fn walk_order(graph: &RoomGraph, start: GridPos) -> Vec<GridPos> {
    let mut order = Vec::new();
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    seen.insert(start);

    while let Some(pos) = queue.pop_front() {
        order.push(pos);
        if let Some(room) = graph.get(pos) {
            let mut neighbors: Vec<GridPos> = room.connections.iter().copied().collect();
            neighbors.sort();
            for next in neighbors {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }

    let mut rest: Vec<GridPos> = graph
        .iter()
        .map(|(pos, _)| *pos)
        .filter(|pos| !seen.contains(pos))
        .collect();
    rest.sort();
    order.extend(rest);
    order
}
