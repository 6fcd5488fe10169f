use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// One of the setting palettes a dungeon can be generated in.
///
/// The set is closed on purpose: narration templates lean on knowing
/// every palette's phrasing, so new themes are added here rather than
/// loaded from data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    AncientTemple,
    AbandonedMine,
    CursedCrypt,
    DragonsLair,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme::AncientTemple,
        Theme::AbandonedMine,
        Theme::CursedCrypt,
        Theme::DragonsLair,
    ];

    /// Draw a theme uniformly at random.
    pub fn choose(rng: &mut StdRng) -> Theme {
        *Self::ALL.choose(rng).unwrap_or(&Theme::AncientTemple)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::AncientTemple => "Ancient Temple",
            Theme::AbandonedMine => "Abandoned Mine",
            Theme::CursedCrypt => "Cursed Crypt",
            Theme::DragonsLair => "Dragon's Lair",
        }
    }

    /// Full-sentence scene setters used to open an overview.
    pub fn descriptions(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "A temple older than any map, swallowed by the hill it was carved from.",
                "Collapsed colonnades and silent shrines stretch away into the dark.",
                "Every wall here is scored with prayers to gods nobody remembers.",
            ],
            Theme::AbandonedMine => &[
                "A played-out mine, its timbers sagging under a century of neglect.",
                "Rusted rails vanish down shafts nobody dared to finish.",
                "The mountain took this place back long ago, and kept what it found.",
            ],
            Theme::CursedCrypt => &[
                "A crypt sealed against something, though the seals face inward.",
                "Rows of broken sarcophagi gape open in the gloom.",
                "The dead were stacked deep here, and not all of them stayed put.",
            ],
            Theme::DragonsLair => &[
                "A lair gnawed from living rock, its walls glazed by old fire.",
                "Scorch marks climb every surface; something vast sleeps further in.",
                "Heaps of slag and shed scales mark the passing of the lair's owner.",
            ],
        }
    }

    /// Completions for "The air is ...".
    pub fn atmospheres(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "heavy with incense long burned out",
                "cold and reverent",
                "still as held breath",
                "thick with stone dust",
            ],
            Theme::AbandonedMine => &[
                "gritty with coal dust",
                "damp and mineral-sour",
                "stale and airless",
                "cold as groundwater",
            ],
            Theme::CursedCrypt => &[
                "sweet with grave mold",
                "unnaturally cold",
                "silent in a listening way",
                "heavy with the smell of turned earth",
            ],
            Theme::DragonsLair => &[
                "hot and sulphurous",
                "shimmering with heat",
                "acrid with old smoke",
                "dry as a forge",
            ],
        }
    }

    /// Plural set dressing littering the floors.
    pub fn objects(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "toppled braziers",
                "cracked votive bowls",
                "faceless idols",
                "worn offering stones",
            ],
            Theme::AbandonedMine => &[
                "splintered support beams",
                "overturned ore carts",
                "rusted picks and lanterns",
                "heaps of worthless tailings",
            ],
            Theme::CursedCrypt => &[
                "split coffin lids",
                "scattered funerary urns",
                "tattered burial shrouds",
                "candle stubs in bone sconces",
            ],
            Theme::DragonsLair => &[
                "fused lumps of coin",
                "charred knight harnesses",
                "cracked scale sheddings",
                "half-melted shields",
            ],
        }
    }

    /// Plural enemy bands said to hold the place.
    pub fn enemies(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "hollow-eyed sentinels",
                "oath-bound guardians",
                "wardens long past death",
            ],
            Theme::AbandonedMine => &[
                "pale burrowing things",
                "cave-in ghasts",
                "miners who never left",
            ],
            Theme::CursedCrypt => &[
                "restless cadavers",
                "whispering shades",
                "grave-bound revenants",
            ],
            Theme::DragonsLair => &[
                "flame-kin drakes",
                "scaled broodlings",
                "ash-cloaked cultists",
            ],
        }
    }

    /// Singular monsters, lowercase with article, usable mid-sentence.
    pub fn monster_nouns(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "a stone sentinel with a cracked face",
                "a wraith in rotted vestments",
                "a guardian serpent of tarnished bronze",
            ],
            Theme::AbandonedMine => &[
                "a blind tunnel horror",
                "a scuttling mass of pick-scarred chitin",
                "the grey shade of a foreman",
            ],
            Theme::CursedCrypt => &[
                "a gaunt revenant in grave wrappings",
                "a chittering amalgam of bone",
                "the crypt's pale keeper",
            ],
            Theme::DragonsLair => &[
                "a drake with coal-bright eyes",
                "a brood guardian crusted in slag",
                "a fire-blackened wyrmling",
            ],
        }
    }

    /// Singular minor treasures, lowercase with article.
    pub fn treasure_nouns(&self) -> &'static [&'static str] {
        match self {
            Theme::AncientTemple => &[
                "a golden reliquary",
                "a ring of consecrated silver",
                "an altar crown set with dull rubies",
            ],
            Theme::AbandonedMine => &[
                "a seam of raw silver",
                "a strongbox of unpaid wages",
                "a lode crystal the size of a fist",
            ],
            Theme::CursedCrypt => &[
                "a death mask of beaten gold",
                "a necklace of funerary jade",
                "a censer still warm to the touch",
            ],
            Theme::DragonsLair => &[
                "a hoard-polished sapphire",
                "a knight's ransom in fused gold",
                "a dragon tooth chased with platinum",
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn four_distinct_themes() {
        assert_eq!(Theme::ALL.len(), 4);
        let mut names: Vec<&str> = Theme::ALL.iter().map(|theme| theme.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn every_pool_is_populated() {
        for theme in Theme::ALL {
            assert!(!theme.descriptions().is_empty(), "{} descriptions", theme.name());
            assert!(!theme.atmospheres().is_empty(), "{} atmospheres", theme.name());
            assert!(!theme.objects().is_empty(), "{} objects", theme.name());
            assert!(!theme.enemies().is_empty(), "{} enemies", theme.name());
            assert!(!theme.monster_nouns().is_empty(), "{} monster nouns", theme.name());
            assert!(!theme.treasure_nouns().is_empty(), "{} treasure nouns", theme.name());
        }
    }

    #[test]
    fn choose_hits_every_theme() {
        let mut counts = [0u32; 4];
        for seed in 0..1000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let theme = Theme::choose(&mut rng);
            let index = Theme::ALL
                .iter()
                .position(|candidate| *candidate == theme)
                .unwrap();
            counts[index] += 1;
        }
        for (index, count) in counts.iter().enumerate() {
            assert!(
                (100..500).contains(count),
                "theme {} drawn {} times out of 1000",
                Theme::ALL[index].name(),
                count
            );
        }
    }
}
