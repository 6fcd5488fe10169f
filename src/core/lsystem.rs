/// Stochastic L-system runtime — rule tables, RON loading, and expansion.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// The symbol every dungeon expansion starts from.
pub const AXIOM: &str = "S";

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Production rules keyed by symbol, each with one or more weighted-equal
/// alternatives.
///
/// Symbols without an entry (the `+ - [ ]` control characters in the
/// default table) pass through expansion unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    pub rules: HashMap<char, Vec<String>>,
}

impl Default for RuleTable {
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert('S', vec!["F[+F]F[-F]F".to_string()]);
        rules.insert(
            'F',
            vec![
                "F".to_string(),
                "F[+F]".to_string(),
                "F[-F]".to_string(),
                "F[+F][-F]".to_string(),
            ],
        );
        RuleTable { rules }
    }
}

impl RuleTable {
    /// Load a rule table from a RON file mapping chars to alternatives.
    pub fn load_from_ron(path: &Path) -> Result<RuleTable, RuleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    pub fn parse_ron(input: &str) -> Result<RuleTable, RuleError> {
        let rules: HashMap<char, Vec<String>> = ron::from_str(input)?;
        Ok(RuleTable { rules })
    }

    /// Expand `axiom` through `iterations` whole-string rewriting passes.
    ///
    /// Every occurrence of a rewritable symbol re-rolls its alternative
    /// independently each pass. Zero iterations return the axiom as-is.
    pub fn expand(&self, axiom: &str, iterations: u32, rng: &mut StdRng) -> String {
        let mut sequence = axiom.to_string();
        for _ in 0..iterations {
            let mut next = String::with_capacity(sequence.len() * 2);
            for symbol in sequence.chars() {
                match self.rules.get(&symbol).and_then(|alts| alts.choose(rng)) {
                    Some(replacement) => next.push_str(replacement),
                    None => next.push(symbol),
                }
            }
            sequence = next;
        }
        sequence
    }
}
