use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the dungeon's integer grid.
///
/// Ordering is lexicographic on `(x, y)`, which gives every undirected
/// connection a well-defined "greater" endpoint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: GridPos = GridPos { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        GridPos { x, y }
    }

    /// Manhattan distance to another cell.
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four orthogonally adjacent cells.
    pub fn orthogonal_neighbors(self) -> [GridPos; 4] {
        [
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x, self.y + 1),
            GridPos::new(self.x, self.y - 1),
        ]
    }

    pub fn shifted(self, dx: i32, dy: i32) -> GridPos {
        GridPos::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// What a room is, which drives both narration and map color.
///
/// `Unknown` covers room kinds outside the closed set, e.g. loaded from
/// foreign map data; narration falls back to a stock line for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Entrance,
    Normal,
    Treasure,
    Monster,
    Exit,
    Unknown,
}

impl RoomType {
    pub fn name(&self) -> &'static str {
        match self {
            RoomType::Entrance => "entrance",
            RoomType::Normal => "normal",
            RoomType::Treasure => "treasure",
            RoomType::Monster => "monster",
            RoomType::Exit => "exit",
            RoomType::Unknown => "unknown",
        }
    }

    /// Map fill color for this kind of room.
    pub fn color(&self) -> &'static str {
        match self {
            RoomType::Entrance => "#4CAF50",
            RoomType::Normal => "#9E9E9E",
            RoomType::Treasure => "#FFD700",
            RoomType::Monster => "#7B1FA2",
            RoomType::Exit => "#F44336",
            RoomType::Unknown => "#9E9E9E",
        }
    }

    /// Single-letter map label. Plain rooms are left unlabeled, and the
    /// entrance and exit intentionally share the letter `E`.
    pub fn label(&self) -> Option<char> {
        match self {
            RoomType::Normal => None,
            RoomType::Entrance | RoomType::Exit => Some('E'),
            RoomType::Treasure => Some('T'),
            RoomType::Monster => Some('M'),
            RoomType::Unknown => Some('U'),
        }
    }
}

/// One room: its cell, its kind, and the cells it connects to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub position: GridPos,
    pub room_type: RoomType,
    pub connections: FxHashSet<GridPos>,
}

impl Room {
    pub fn new(position: GridPos) -> Self {
        Room {
            position,
            room_type: RoomType::Normal,
            connections: FxHashSet::default(),
        }
    }

    pub fn is_connected_to(&self, other: GridPos) -> bool {
        self.connections.contains(&other)
    }
}

/// The dungeon as an undirected graph of rooms keyed by cell.
///
/// Connections are kept symmetric: `connect` writes both endpoints or
/// neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomGraph {
    rooms: FxHashMap<GridPos, Room>,
}

impl RoomGraph {
    pub fn new() -> Self {
        RoomGraph::default()
    }

    /// Insert a room at `pos` if none exists, leaving any existing room
    /// (and its type) untouched.
    pub fn insert(&mut self, pos: GridPos) -> &mut Room {
        self.rooms.entry(pos).or_insert_with(|| Room::new(pos))
    }

    /// Insert a room at `pos` and set its type, overwriting the type of
    /// any room already there.
    pub fn insert_with_type(&mut self, pos: GridPos, room_type: RoomType) -> &mut Room {
        let room = self.rooms.entry(pos).or_insert_with(|| Room::new(pos));
        room.room_type = room_type;
        room
    }

    /// Connect two existing rooms. Self-loops and edges to missing rooms
    /// are ignored.
    pub fn connect(&mut self, a: GridPos, b: GridPos) {
        if a == b || !self.rooms.contains_key(&a) || !self.rooms.contains_key(&b) {
            return;
        }
        if let Some(room) = self.rooms.get_mut(&a) {
            room.connections.insert(b);
        }
        if let Some(room) = self.rooms.get_mut(&b) {
            room.connections.insert(a);
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<&Room> {
        self.rooms.get(&pos)
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Room> {
        self.rooms.get_mut(&pos)
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        self.rooms.contains_key(&pos)
    }

    /// The entrance cell, found by type rather than by position so that
    /// shifted copies of the graph still resolve it.
    pub fn entrance(&self) -> Option<GridPos> {
        self.rooms
            .values()
            .find(|room| room.room_type == RoomType::Entrance)
            .map(|room| room.position)
    }

    /// Cells of every room of the given type, in iteration order.
    pub fn positions_of(&self, room_type: RoomType) -> Vec<GridPos> {
        self.rooms
            .values()
            .filter(|room| room.room_type == room_type)
            .map(|room| room.position)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> std::collections::hash_map::Iter<'_, GridPos, Room> {
        self.rooms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_pos_displays_as_comma_pair() {
        assert_eq!(GridPos::new(3, -2).to_string(), "3,-2");
        assert_eq!(GridPos::ORIGIN.to_string(), "0,0");
    }

    #[test]
    fn manhattan_distance() {
        let a = GridPos::new(1, 2);
        let b = GridPos::new(-2, 4);
        assert_eq!(a.manhattan(b), 5);
        assert_eq!(b.manhattan(a), 5);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn orthogonal_neighbors_are_the_four_adjacent_cells() {
        let neighbors = GridPos::new(2, 3).orthogonal_neighbors();
        assert_eq!(neighbors.len(), 4);
        assert!(neighbors.contains(&GridPos::new(3, 3)));
        assert!(neighbors.contains(&GridPos::new(1, 3)));
        assert!(neighbors.contains(&GridPos::new(2, 4)));
        assert!(neighbors.contains(&GridPos::new(2, 2)));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(GridPos::new(1, 9) < GridPos::new(2, 0));
        assert!(GridPos::new(1, 1) < GridPos::new(1, 2));
    }

    #[test]
    fn connect_writes_both_endpoints() {
        let mut graph = RoomGraph::new();
        let a = GridPos::new(0, 0);
        let b = GridPos::new(1, 0);
        graph.insert(a);
        graph.insert(b);
        graph.connect(a, b);

        assert!(graph.get(a).is_some_and(|room| room.is_connected_to(b)));
        assert!(graph.get(b).is_some_and(|room| room.is_connected_to(a)));
    }

    #[test]
    fn connect_ignores_missing_rooms_and_self_loops() {
        let mut graph = RoomGraph::new();
        let a = GridPos::new(0, 0);
        graph.insert(a);

        graph.connect(a, GridPos::new(5, 5));
        graph.connect(a, a);

        let room = graph.get(a).unwrap();
        assert!(room.connections.is_empty());
    }

    #[test]
    fn insert_preserves_existing_room_type() {
        let mut graph = RoomGraph::new();
        graph.insert_with_type(GridPos::ORIGIN, RoomType::Entrance);
        graph.insert(GridPos::ORIGIN);

        let room = graph.get(GridPos::ORIGIN).unwrap();
        assert_eq!(room.room_type, RoomType::Entrance);
    }

    #[test]
    fn entrance_found_by_type_not_position() {
        let mut graph = RoomGraph::new();
        graph.insert(GridPos::new(0, 0));
        graph.insert_with_type(GridPos::new(2, 2), RoomType::Entrance);

        assert_eq!(graph.entrance(), Some(GridPos::new(2, 2)));
    }

    #[test]
    fn positions_of_filters_by_type() {
        let mut graph = RoomGraph::new();
        graph.insert_with_type(GridPos::new(0, 0), RoomType::Entrance);
        graph.insert(GridPos::new(1, 0));
        graph.insert(GridPos::new(2, 0));
        graph.insert_with_type(GridPos::new(3, 0), RoomType::Exit);

        let normals = graph.positions_of(RoomType::Normal);
        assert_eq!(normals.len(), 2);
        assert!(normals.contains(&GridPos::new(1, 0)));
        assert!(normals.contains(&GridPos::new(2, 0)));
    }

    #[test]
    fn labels_match_the_map_legend() {
        assert_eq!(RoomType::Entrance.label(), Some('E'));
        assert_eq!(RoomType::Exit.label(), Some('E'));
        assert_eq!(RoomType::Treasure.label(), Some('T'));
        assert_eq!(RoomType::Monster.label(), Some('M'));
        assert_eq!(RoomType::Unknown.label(), Some('U'));
        assert_eq!(RoomType::Normal.label(), None);
    }

    #[test]
    fn colors_follow_the_fixed_palette() {
        assert_eq!(RoomType::Entrance.color(), "#4CAF50");
        assert_eq!(RoomType::Exit.color(), "#F44336");
        assert_eq!(RoomType::Treasure.color(), "#FFD700");
        assert_eq!(RoomType::Monster.color(), "#7B1FA2");
        assert_eq!(RoomType::Normal.color(), "#9E9E9E");
    }
}
