/// Layout generation — turtle interpretation of expanded sequences.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::lsystem::{RuleTable, AXIOM};
use crate::schema::room::{GridPos, RoomGraph, RoomType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("branch close at symbol {index} with no open branch")]
    UnmatchedPop { index: usize },
    #[error("sequence ended with {depth} unclosed branch(es)")]
    UnclosedBranch { depth: usize },
}

/// Tunables for the turtle walk. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub turn_angle_deg: i32,
    pub step_size: i32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        GenerationParams {
            turn_angle_deg: 90,
            step_size: 1,
        }
    }
}

/// Expands the dungeon grammar and walks the result into a room graph.
///
/// Every generated graph has exactly one entrance, pre-seeded at the
/// origin before the walk starts.
pub struct LayoutGenerator {
    rules: RuleTable,
    params: GenerationParams,
    rng: StdRng,
}

impl LayoutGenerator {
    /// Default rules and a fresh random source.
    pub fn new() -> Self {
        Self::from_rng(RuleTable::default(), StdRng::from_entropy())
    }

    /// Default rules, deterministic for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(RuleTable::default(), StdRng::seed_from_u64(seed))
    }

    /// Custom rules, deterministic for a given seed.
    pub fn with_rules(rules: RuleTable, seed: u64) -> Self {
        Self::from_rng(rules, StdRng::seed_from_u64(seed))
    }

    /// Build a generator from an explicit random source.
    pub fn from_rng(rules: RuleTable, rng: StdRng) -> Self {
        LayoutGenerator {
            rules,
            params: GenerationParams::default(),
            rng,
        }
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Generate a dungeon layout from `iterations` rewriting passes.
    ///
    /// Zero iterations leave the axiom unexpanded, which carries no
    /// walk instructions, so the graph is the lone entrance room.
    pub fn generate(&mut self, iterations: u32) -> Result<RoomGraph, LayoutError> {
        let sequence = self.rules.expand(AXIOM, iterations, &mut self.rng);
        let mut graph = self.interpret(&sequence)?;
        place_exit(&mut graph);
        scatter_special_rooms(&mut graph, &mut self.rng);
        tracing::debug!(
            rooms = graph.len(),
            sequence_len = sequence.len(),
            "layout generated"
        );
        Ok(graph)
    }

    /// Walk the sequence, creating a room per visited cell and a corridor
    /// per move between distinct cells.
    fn interpret(&self, sequence: &str) -> Result<RoomGraph, LayoutError> {
        let mut graph = RoomGraph::new();
        graph.insert_with_type(GridPos::ORIGIN, RoomType::Entrance);

        let mut position = GridPos::ORIGIN;
        let mut heading = 0i32;
        let mut stack: Vec<(GridPos, i32)> = Vec::new();

        for (index, symbol) in sequence.chars().enumerate() {
            match symbol {
                'F' => {
                    let next = self.step_from(position, heading);
                    graph.insert(next);
                    if next != position {
                        graph.connect(position, next);
                    }
                    position = next;
                }
                '+' => heading += self.params.turn_angle_deg,
                '-' => heading -= self.params.turn_angle_deg,
                '[' => stack.push((position, heading)),
                ']' => {
                    let (restored_pos, restored_heading) =
                        stack.pop().ok_or(LayoutError::UnmatchedPop { index })?;
                    position = restored_pos;
                    heading = restored_heading;
                }
                // symbols without a walk instruction, e.g. an unexpanded axiom
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(LayoutError::UnclosedBranch { depth: stack.len() });
        }
        Ok(graph)
    }

    fn step_from(&self, from: GridPos, heading_deg: i32) -> GridPos {
        let radians = f64::from(heading_deg).to_radians();
        let step = f64::from(self.params.step_size);
        let x = f64::from(from.x) + step * radians.cos();
        let y = f64::from(from.y) + step * radians.sin();
        GridPos::new(x.round() as i32, y.round() as i32)
    }
}

impl Default for LayoutGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Retype the room with the maximal coordinate sum as the exit. The
/// entrance is never considered, so ties against it cannot cost the
/// graph its only entrance; among the rest, the last one encountered
/// wins.
fn place_exit(graph: &mut RoomGraph) {
    let mut exit_pos: Option<GridPos> = None;
    let mut best_sum = i32::MIN;
    for (pos, room) in graph.iter() {
        if room.room_type == RoomType::Entrance {
            continue;
        }
        let sum = pos.x + pos.y;
        if sum >= best_sum {
            best_sum = sum;
            exit_pos = Some(*pos);
        }
    }
    if let Some(pos) = exit_pos {
        if let Some(room) = graph.get_mut(pos) {
            room.room_type = RoomType::Exit;
        }
    }
}

/// Promote a tenth of the plain rooms to treasure rooms, then a fifth of
/// the remainder to monster rooms, at least one of each while plain
/// rooms are available.
fn scatter_special_rooms(graph: &mut RoomGraph, rng: &mut StdRng) {
    let pool = graph.positions_of(RoomType::Normal);
    let treasure_count = (pool.len() / 10).max(1);
    let picks: Vec<GridPos> = pool.choose_multiple(rng, treasure_count).copied().collect();
    for pos in picks {
        if let Some(room) = graph.get_mut(pos) {
            room.room_type = RoomType::Treasure;
        }
    }

    let pool = graph.positions_of(RoomType::Normal);
    let monster_count = (pool.len() / 5).max(1);
    let picks: Vec<GridPos> = pool.choose_multiple(rng, monster_count).copied().collect();
    for pos in picks {
        if let Some(room) = graph.get_mut(pos) {
            room.room_type = RoomType::Monster;
        }
    }
}
