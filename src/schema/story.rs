use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::schema::room::GridPos;

/// Candidate artifacts for a dungeon's main treasure.
pub const MAIN_TREASURES: &[&str] = &[
    "the Crown of the Forgotten King",
    "the Shard of Dawn",
    "the Obsidian Grimoire",
    "the Heart of the Mountain",
    "the Silver Oracle",
];

/// Narrative facts established so far for one dungeon.
///
/// The state only grows: the villain is named at most once, clues are
/// appended, and revealed cells accumulate as rooms are described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryState {
    pub main_treasure: String,
    pub villain: Option<String>,
    pub clues: Vec<String>,
    pub treasure_rooms_seen: u32,
    pub revealed: FxHashSet<GridPos>,
}

impl StoryState {
    pub fn new(main_treasure: &str) -> Self {
        StoryState {
            main_treasure: main_treasure.to_string(),
            villain: None,
            clues: Vec::new(),
            treasure_rooms_seen: 0,
            revealed: FxHashSet::default(),
        }
    }

    /// Mark a cell as described. Returns true the first time.
    pub fn reveal(&mut self, pos: GridPos) -> bool {
        self.revealed.insert(pos)
    }

    pub fn is_revealed(&self, pos: GridPos) -> bool {
        self.revealed.contains(&pos)
    }

    pub fn record_clue(&mut self, clue: String) {
        self.clues.push(clue);
    }
}
