use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::warn;

use crate::country::Country;
use crate::geography::{self, Direction};
use crate::storage::{KeyValueStore, Result};

/// Storage key holding the guesses of the running game
pub const GUESSES_KEY: &str = "currentGame";

/// One accepted, scored submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guess {
    /// Text exactly as the player typed it
    pub name: String,
    /// Meters between the guessed country and the target
    pub distance: u64,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<Country>,
}

impl Guess {
    /// Score `guessed` against `target`
    pub fn score(name: &str, guessed: &Country, target: &Country) -> Self {
        let from = guessed.coordinate();
        let to = target.coordinate();
        let distance = geography::distance(from, to);
        let direction = if distance == 0 {
            Direction::Same
        } else {
            geography::compass_direction(from, to)
        };

        Self {
            name: name.to_string(),
            distance,
            direction,
            country: Some(guessed.clone()),
        }
    }

    pub fn is_hit(&self) -> bool {
        self.distance == 0
    }

    pub fn proximity(&self) -> u8 {
        geography::proximity_percent(self.distance)
    }

    /// Name to display: the resolved country's if known, else the raw text
    pub fn display_name(&self) -> &str {
        self.country
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(&self.name)
    }
}

/// Ordered guesses of the current game, written through to storage
#[derive(Debug)]
pub struct GuessStore {
    store: Rc<dyn KeyValueStore>,
    guesses: Vec<Guess>,
}

impl GuessStore {
    /// Restore persisted guesses; absent or unreadable data is an empty game
    pub fn load(store: Rc<dyn KeyValueStore>) -> Result<Self> {
        let guesses = match store.get(GUESSES_KEY)? {
            Some(raw) => serde_json::from_str::<Vec<Guess>>(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "discarding unreadable guesses");
                Vec::new()
            }),
            None => Vec::new(),
        };

        Ok(Self { store, guesses })
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn len(&self) -> usize {
        self.guesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guesses.is_empty()
    }

    /// Persist the extended sequence, then record the guess in memory
    pub fn append(&mut self, guess: Guess) -> Result<()> {
        let extended: Vec<&Guess> = self.guesses.iter().chain(Some(&guess)).collect();
        let raw = serde_json::to_string(&extended)?;
        self.store.set(GUESSES_KEY, &raw)?;
        self.guesses.push(guess);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.clear(GUESSES_KEY)?;
        self.guesses.clear();
        Ok(())
    }
}
