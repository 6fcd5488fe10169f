/// Story-aware narration — dungeon overviews and per-room descriptions.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::schema::room::{GridPos, RoomGraph, RoomType};
use crate::schema::story::{StoryState, MAIN_TREASURES};
use crate::schema::theme::Theme;

/// Returned for any room type outside the closed set.
const FALLBACK_DESCRIPTION: &str =
    "An unremarkable space. Nothing about it invites a closer look.";

const TRAP_TRIGGERS: &[&str] = &[
    "A flagstone shifts under your heel",
    "A tripwire glints at ankle height",
    "A soft click sounds inside the door frame",
];

const TRAP_CONSEQUENCES: &[&str] = &[
    "and darts hiss from slots in the wall",
    "and the ceiling sheds a curtain of grit",
    "and the floor ahead tilts on a hidden pivot",
];

const TRAP_MITIGATIONS: &[&str] = &[
    "you throw yourself clear just in time",
    "you hold still until the mechanism spends itself",
    "you scramble back the way you came",
];

const DISCOVERY_ITEMS: &[&str] = &[
    "a torn map fragment",
    "a tarnished signet ring",
    "a water-stained journal",
    "a cracked lantern, still warm",
];

/// Narrates one dungeon: a fixed theme, a growing story, and its own
/// random source.
///
/// Descriptions mutate the story, so room text depends on visit order.
/// The same seed and the same visit order reproduce the same text.
pub struct NarrativeGenerator {
    theme: Theme,
    state: StoryState,
    rng: StdRng,
}

impl NarrativeGenerator {
    /// Random theme and treasure from a fresh random source.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Random theme and treasure, deterministic for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    /// Build a narrator from an explicit random source.
    pub fn from_rng(mut rng: StdRng) -> Self {
        let theme = Theme::choose(&mut rng);
        Self::with_theme(theme, rng)
    }

    /// Pin the theme, drawing only the main treasure from `rng`.
    pub fn with_theme(theme: Theme, mut rng: StdRng) -> Self {
        let main_treasure = MAIN_TREASURES
            .choose(&mut rng)
            .copied()
            .unwrap_or(MAIN_TREASURES[0]);
        NarrativeGenerator {
            theme,
            state: StoryState::new(main_treasure),
            rng,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn state(&self) -> &StoryState {
        &self.state
    }

    /// One-paragraph scene setter naming the main treasure. Draws from
    /// the random source but records nothing in the story.
    pub fn overview(&mut self) -> String {
        let description = pick(self.theme.descriptions(), &mut self.rng);
        let atmosphere = pick(self.theme.atmospheres(), &mut self.rng);
        let objects = pick(self.theme.objects(), &mut self.rng);
        let enemies = pick(self.theme.enemies(), &mut self.rng);
        format!(
            "{} The air is {}, and {} lie scattered through the halls. \
             Stories agree that {} stand watch, and that {} waits somewhere below.",
            description, atmosphere, objects, enemies, self.state.main_treasure
        )
    }

    /// Describe one room and advance the story.
    ///
    /// The text is assembled in a fixed order: distance flavor, the
    /// room's base and detail lines, a themed occupant clause, at most
    /// one hint about an unrevealed neighbor, story beats (villain
    /// naming, first treasure clue), and an optional side event.
    pub fn describe(
        &mut self,
        room_type: RoomType,
        pos: GridPos,
        entrance: GridPos,
        graph: &RoomGraph,
    ) -> String {
        if room_type == RoomType::Unknown {
            self.state.reveal(pos);
            return FALLBACK_DESCRIPTION.to_string();
        }

        let mut parts: Vec<String> = Vec::new();

        parts.push(distance_phrase(pos.manhattan(entrance)).to_string());
        parts.push(pick(base_pool(room_type), &mut self.rng).to_string());
        parts.push(pick(detail_pool(room_type), &mut self.rng).to_string());

        match room_type {
            RoomType::Monster => {
                let noun = pick(self.theme.monster_nouns(), &mut self.rng);
                parts.push(format!("{} lurks within.", sentence_case(noun)));
            }
            RoomType::Treasure => {
                let noun = pick(self.theme.treasure_nouns(), &mut self.rng);
                parts.push(format!(
                    "In the center of the room, {} draws your attention.",
                    noun
                ));
            }
            _ => {}
        }

        let mut hints: Vec<&'static str> = Vec::new();
        for neighbor in pos.orthogonal_neighbors() {
            if self.state.is_revealed(neighbor) {
                continue;
            }
            if let Some(room) = graph.get(neighbor) {
                if let Some(hint) = neighbor_hint(room.room_type) {
                    hints.push(hint);
                }
            }
        }
        if let Some(hint) = hints.choose(&mut self.rng) {
            parts.push((*hint).to_string());
        }

        self.state.reveal(pos);
        match room_type {
            RoomType::Monster if self.state.villain.is_none() => {
                let villain = pick(self.theme.monster_nouns(), &mut self.rng).to_string();
                parts.push(format!(
                    "The carvings here tell of {}, sworn to keep {} from the living.",
                    villain, self.state.main_treasure
                ));
                self.state.villain = Some(villain);
            }
            RoomType::Treasure => {
                self.state.treasure_rooms_seen += 1;
                if self.state.treasure_rooms_seen == 1 {
                    let clue = format!(
                        "Among the spoils lies your first real clue: {} is close.",
                        self.state.main_treasure
                    );
                    parts.push(clue.clone());
                    self.state.record_clue(clue);
                }
            }
            _ => {}
        }

        if self.rng.gen_bool(0.3) {
            let event = self.side_event();
            parts.push(event);
        }

        parts.join(" ")
    }

    /// Either a trap vignette (stateless) or a minor discovery whose
    /// clue is recorded in the story.
    fn side_event(&mut self) -> String {
        if self.rng.gen_bool(0.5) {
            let trigger = pick(TRAP_TRIGGERS, &mut self.rng);
            let consequence = pick(TRAP_CONSEQUENCES, &mut self.rng);
            let mitigation = pick(TRAP_MITIGATIONS, &mut self.rng);
            format!("{} {}; {}.", trigger, consequence, mitigation)
        } else {
            let item = pick(DISCOVERY_ITEMS, &mut self.rng);
            let clue = match self.rng.gen_range(0..3) {
                0 => format!("Faint lettering mentions {}.", self.state.main_treasure),
                1 => format!(
                    "A hurried sketch shows {} behind a row of arches.",
                    self.state.main_treasure
                ),
                _ => format!(
                    "Whoever left it was hunting {} too.",
                    self.state.main_treasure
                ),
            };
            self.state.record_clue(clue.clone());
            format!("Tucked into a crevice you find {}. {}", item, clue)
        }
    }
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn pick(pool: &[&'static str], rng: &mut StdRng) -> &'static str {
    pool.choose(rng).copied().unwrap_or("")
}

fn sentence_case(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// How worn the path is, by Manhattan distance from the entrance.
fn distance_phrase(distance: u32) -> &'static str {
    if distance < 3 {
        "The dust here is freshly disturbed; the entrance is not far behind you."
    } else if distance < 5 {
        "Faded boot prints suggest this hall sees the occasional traveler."
    } else {
        "No one has walked these stones for an age; the silence is total."
    }
}

fn base_pool(room_type: RoomType) -> &'static [&'static str] {
    match room_type {
        RoomType::Entrance => &[
            "Daylight still finds its way in through the broken doorway.",
            "The threshold stones are worn smooth by feet long gone.",
            "This is where every expedition into the depths begins.",
        ],
        RoomType::Normal => &[
            "A plain chamber with rough-hewn walls.",
            "This room offers little but echoes.",
            "Four walls, a low ceiling, and dust.",
        ],
        RoomType::Treasure => &[
            "Something glitters through the gloom of this chamber.",
            "This vault was hidden for a reason.",
            "The air itself seems richer in this room.",
        ],
        RoomType::Monster => &[
            "Claw marks rake the walls of this chamber.",
            "A rank animal smell soaks this room.",
            "Gnawed bones crunch underfoot.",
        ],
        RoomType::Exit => &[
            "A stairway climbs toward open air.",
            "The passage ahead brightens; this is the way out.",
            "A rush of clean wind marks the dungeon's far door.",
        ],
        RoomType::Unknown => &[],
    }
}

fn detail_pool(room_type: RoomType) -> &'static [&'static str] {
    match room_type {
        RoomType::Entrance => &[
            "Old rope and a snapped torch bracket litter the corner.",
            "Someone chalked a warning on the wall, then crossed it out.",
            "The draft from outside dies within a few paces.",
        ],
        RoomType::Normal => &[
            "Your footsteps sound louder than they should.",
            "A shallow channel in the floor once carried water, or something else.",
            "The masonry here was done in a hurry.",
        ],
        RoomType::Treasure => &[
            "Broken lockboxes suggest you are not the first to look.",
            "Coins lie scattered like fallen leaves.",
            "An empty pedestal hints at pieces already taken.",
        ],
        RoomType::Monster => &[
            "The droppings here are fresh.",
            "Something has been dragging its kills into the corner.",
            "Deep gouges in the stone frame the doorway.",
        ],
        RoomType::Exit => &[
            "The stones here are scrubbed clean by weather.",
            "Vines from the surface have forced through the cracks.",
            "You can hear birdsong, faint but real.",
        ],
        RoomType::Unknown => &[],
    }
}

/// What leaks through from a neighboring cell of the given type.
fn neighbor_hint(room_type: RoomType) -> Option<&'static str> {
    match room_type {
        RoomType::Monster => Some("A low growl rolls out of the dark nearby."),
        RoomType::Treasure => Some("A faint golden glow seeps through a crack in one wall."),
        RoomType::Exit => Some("A cool breeze drifts in; the way out cannot be far."),
        _ => None,
    }
}
