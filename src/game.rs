use rand::RngCore;
use std::rc::Rc;
use tracing::{debug, info, warn};

use crate::country::{Catalog, Country};
use crate::error::GameError;
use crate::guess::{Guess, GuessStore, GUESSES_KEY};
use crate::storage::{KeyValueStore, StorageError};
use crate::target::{TargetSelector, TARGET_KEY};

/// Guesses allowed per game
pub const MAX_TRY_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

impl GameState {
    pub fn from_guesses(guesses: &[Guess]) -> Self {
        if guesses.iter().any(Guess::is_hit) {
            GameState::Won
        } else if guesses.len() >= MAX_TRY_COUNT {
            GameState::Lost
        } else {
            GameState::Playing
        }
    }

    pub fn has_ended(&self) -> bool {
        !matches!(self, GameState::Playing)
    }
}

/// Result of an accepted submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Miss(Guess),
    Won(Guess),
    /// Last try missed; `answer` is the target's name to reveal
    Lost { guess: Guess, answer: String },
}

impl SubmitOutcome {
    pub fn guess(&self) -> &Guess {
        match self {
            SubmitOutcome::Miss(guess) | SubmitOutcome::Won(guess) => guess,
            SubmitOutcome::Lost { guess, .. } => guess,
        }
    }
}

/// Drop the persisted target and guesses without touching any live game
pub fn discard_session(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.clear(GUESSES_KEY)?;
    store.clear(TARGET_KEY)
}

/// Game controller: validates input, scores guesses and tracks the end of the game
#[derive(Debug)]
pub struct Game {
    catalog: Catalog,
    selector: TargetSelector,
    guesses: GuessStore,
    target: Country,
    /// Text currently in the input field
    pub input: String,
}

impl Game {
    /// Restore the session from `store`, drawing a target if there is none
    pub fn new(
        catalog: Catalog,
        store: Rc<dyn KeyValueStore>,
        rng: Box<dyn RngCore>,
    ) -> Result<Self, GameError> {
        let mut selector = TargetSelector::new(store.clone(), rng);
        let selection = selector.select(&catalog)?;
        if selection.is_drawn() && store.get(GUESSES_KEY)?.is_some() {
            warn!("dropping guesses made against a previous target");
            store.clear(GUESSES_KEY)?;
        }
        let target = selection.into_country();
        let guesses = GuessStore::load(store)?;

        debug!(
            guesses = guesses.len(),
            state = %GameState::from_guesses(guesses.guesses()),
            "session restored"
        );

        Ok(Self {
            catalog,
            selector,
            guesses,
            target,
            input: String::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn target(&self) -> &Country {
        &self.target
    }

    pub fn guesses(&self) -> &[Guess] {
        self.guesses.guesses()
    }

    pub fn state(&self) -> GameState {
        GameState::from_guesses(self.guesses())
    }

    pub fn has_ended(&self) -> bool {
        self.state().has_ended()
    }

    pub fn is_won(&self) -> bool {
        self.state() == GameState::Won
    }

    pub fn remaining_tries(&self) -> usize {
        MAX_TRY_COUNT.saturating_sub(self.guesses.len())
    }

    /// Submit whatever is in the input field
    pub fn submit(&mut self) -> Result<SubmitOutcome, GameError> {
        let text = self.input.clone();
        self.submit_text(&text)
    }

    pub fn submit_text(&mut self, text: &str) -> Result<SubmitOutcome, GameError> {
        if self.has_ended() {
            warn!("guess submitted after the game ended");
            return Err(GameError::GameOver);
        }

        let guessed = match self.catalog.find_by_name(text) {
            Some(country) => country.clone(),
            None => {
                warn!(input = %text, "unknown country");
                return Err(GameError::UnknownCountry(text.trim().to_string()));
            }
        };

        let guess = Guess::score(text, &guessed, &self.target);
        self.guesses.append(guess.clone())?;
        self.input.clear();

        debug!(
            guess = %guessed.code,
            distance = guess.distance,
            direction = %guess.direction,
            "guess recorded"
        );

        Ok(match self.state() {
            GameState::Won => {
                info!(tries = self.guesses.len(), "game won");
                SubmitOutcome::Won(guess)
            }
            GameState::Lost => {
                info!(target_code = %self.target.code, "game lost");
                SubmitOutcome::Lost {
                    guess,
                    answer: self.target.name.clone(),
                }
            }
            GameState::Playing => SubmitOutcome::Miss(guess),
        })
    }

    /// Give up on the current game: returns the revealed target name and starts over
    pub fn skip(&mut self) -> Result<String, GameError> {
        if self.has_ended() {
            return Err(GameError::GameOver);
        }

        let answer = self.target.name.clone();
        info!(target_code = %self.target.code, "game skipped");
        self.reset()?;
        Ok(answer)
    }

    /// Throw away the current game, whatever its state, and draw a new target
    pub fn new_game(&mut self) -> Result<(), GameError> {
        info!("starting new game");
        self.reset()
    }

    /// Nothing changes unless a new target can be drawn
    fn reset(&mut self) -> Result<(), GameError> {
        let next = self.selector.draw(&self.catalog)?;
        self.guesses.clear()?;
        self.selector.persist(&next)?;
        self.target = next;
        self.input.clear();
        Ok(())
    }

    /// Completion candidates for the current input
    pub fn suggestions(&self, limit: usize) -> Vec<&Country> {
        self.catalog.suggest(&self.input, limit)
    }

    /// Replace the input with the first suggestion; false if there is none
    pub fn complete_input(&mut self) -> bool {
        let completed = self.suggestions(1).first().map(|c| c.name.clone());
        match completed {
            Some(name) => {
                self.input = name;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::fixtures::small_catalog;
    use crate::country::fixtures::country;
    use crate::storage::fixtures::FlakyStore;
    use crate::storage::MemoryStore;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn game_with_target(store: Rc<MemoryStore>, target_code: &str) -> Game {
        let catalog = small_catalog();
        let target = catalog.find_by_code(target_code).unwrap();
        store
            .set(TARGET_KEY, &serde_json::to_string(target).unwrap())
            .unwrap();
        Game::new(catalog, store, Box::new(StdRng::seed_from_u64(0))).unwrap()
    }

    fn persisted_guesses(store: &MemoryStore) -> Vec<Guess> {
        store
            .get(GUESSES_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .unwrap_or_default()
    }

    const WRONG: [&str; 6] = [
        "Spain",
        "Germany",
        "Italy",
        "Portugal",
        "Netherlands",
        "Belgium",
    ];

    #[test]
    fn test_new_game_starts_playing() {
        let game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        assert_eq!(game.state(), GameState::Playing);
        assert_eq!(game.target().code, "FR");
        assert_eq!(game.remaining_tries(), MAX_TRY_COUNT);
    }

    #[test]
    fn test_first_guess_correct_wins() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        game.input = "France".to_string();

        let outcome = game.submit().unwrap();
        assert_matches!(outcome, SubmitOutcome::Won(ref g) if g.distance == 0);
        assert_eq!(game.state(), GameState::Won);
        assert_eq!(game.guesses().len(), 1);
        assert_eq!(persisted_guesses(&store).len(), 1);
        assert!(game.input.is_empty());
    }

    #[test]
    fn test_six_wrong_guesses_lose() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");

        for (i, name) in WRONG.iter().enumerate() {
            let outcome = game.submit_text(name).unwrap();
            if i + 1 < MAX_TRY_COUNT {
                assert_matches!(outcome, SubmitOutcome::Miss(_));
                assert_eq!(game.state(), GameState::Playing);
            } else {
                assert_matches!(outcome, SubmitOutcome::Lost { ref answer, .. } if answer == "France");
            }
        }

        assert_eq!(game.state(), GameState::Lost);
        assert_eq!(persisted_guesses(&store).len(), MAX_TRY_COUNT);
        assert_eq!(game.remaining_tries(), 0);
    }

    #[test]
    fn test_win_on_last_try() {
        let mut game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        for name in &WRONG[..MAX_TRY_COUNT - 1] {
            game.submit_text(name).unwrap();
        }
        assert_matches!(game.submit_text("France"), Ok(SubmitOutcome::Won(_)));
        assert_eq!(game.state(), GameState::Won);
    }

    #[test]
    fn test_no_guesses_after_end() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        game.submit_text("France").unwrap();

        assert_matches!(game.submit_text("Spain"), Err(GameError::GameOver));
        assert_eq!(game.guesses().len(), 1);
        assert_eq!(persisted_guesses(&store).len(), 1);
    }

    #[test]
    fn test_unknown_country_is_rejected_without_change() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        game.submit_text("Spain").unwrap();
        let before = persisted_guesses(&store);

        game.input = "Atlantis".to_string();
        let err = game.submit().unwrap_err();
        assert_matches!(err, GameError::UnknownCountry(ref s) if s == "Atlantis");
        assert!(err.is_rejection());

        assert_eq!(persisted_guesses(&store), before);
        assert_eq!(game.guesses().len(), 1);
        // the input is kept so the player can correct it
        assert_eq!(game.input, "Atlantis");
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let mut game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        assert_matches!(game.submit(), Err(GameError::UnknownCountry(_)));
        assert!(game.guesses().is_empty());
    }

    #[test]
    fn test_repeated_guess_is_counted() {
        let mut game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        game.submit_text("Spain").unwrap();
        game.submit_text("spain").unwrap();
        assert_eq!(game.guesses().len(), 2);
    }

    #[test]
    fn test_session_restores_from_store() {
        let store = Rc::new(MemoryStore::new());
        {
            let mut game = game_with_target(store.clone(), "DE");
            game.submit_text("Spain").unwrap();
            game.submit_text("Italy").unwrap();
        }

        let game = Game::new(
            small_catalog(),
            store,
            Box::new(StdRng::seed_from_u64(99)),
        )
        .unwrap();
        assert_eq!(game.target().code, "DE");
        assert_eq!(game.guesses().len(), 2);
        assert_eq!(game.guesses()[0].display_name(), "Spain");
        assert_eq!(game.guesses()[1].display_name(), "Italy");
    }

    #[test]
    fn test_restored_won_game_stays_won() {
        let store = Rc::new(MemoryStore::new());
        {
            let mut game = game_with_target(store.clone(), "DE");
            game.submit_text("Germany").unwrap();
        }
        let mut game =
            Game::new(small_catalog(), store, Box::new(StdRng::seed_from_u64(1))).unwrap();
        assert!(game.is_won());
        assert_matches!(game.submit_text("Spain"), Err(GameError::GameOver));
    }

    #[test]
    fn test_new_game_clears_guesses_and_redraws() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        for name in WRONG {
            game.submit_text(name).unwrap();
        }
        assert_eq!(game.state(), GameState::Lost);

        game.new_game().unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.guesses().is_empty());
        assert!(!store.contains(GUESSES_KEY));

        let stored: Country =
            serde_json::from_str(&store.get(TARGET_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(&stored, game.target());
        assert!(stored.image);
    }

    #[test]
    fn test_skip_reveals_and_resets() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        game.submit_text("Spain").unwrap();
        game.input = "Ger".to_string();

        let answer = game.skip().unwrap();
        assert_eq!(answer, "France");
        assert!(game.guesses().is_empty());
        assert!(game.input.is_empty());
        assert!(!store.contains(GUESSES_KEY));
        assert!(store.contains(TARGET_KEY));
    }

    #[test]
    fn test_skip_after_end_is_rejected() {
        let mut game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        game.submit_text("France").unwrap();
        assert_matches!(game.skip(), Err(GameError::GameOver));
        assert!(game.is_won());
    }

    #[test]
    fn test_discard_session_clears_both_keys() {
        let store = Rc::new(MemoryStore::new());
        let mut game = game_with_target(store.clone(), "FR");
        game.submit_text("Spain").unwrap();

        discard_session(&*store).unwrap();
        assert!(!store.contains(GUESSES_KEY));
        assert!(!store.contains(TARGET_KEY));
    }

    #[test]
    fn test_complete_input() {
        let mut game = game_with_target(Rc::new(MemoryStore::new()), "FR");
        game.input = "neth".to_string();
        assert!(game.complete_input());
        assert_eq!(game.input, "Netherlands");

        game.input = "zz".to_string();
        assert!(!game.complete_input());
        assert_eq!(game.input, "zz");
    }

    #[test]
    fn test_state_from_guesses() {
        assert_eq!(GameState::from_guesses(&[]), GameState::Playing);
        assert!(!GameState::Playing.has_ended());
        assert!(GameState::Won.has_ended());
        assert!(GameState::Lost.has_ended());
        assert_eq!(GameState::Lost.to_string(), "Lost");
    }

    #[test]
    fn test_redrawn_target_drops_stale_guesses() {
        let store = Rc::new(MemoryStore::new());
        {
            let mut game = game_with_target(store.clone(), "FR");
            game.submit_text("France").unwrap();
            assert!(game.is_won());
        }
        store.set(TARGET_KEY, "{corrupt").unwrap();

        let game =
            Game::new(small_catalog(), store.clone(), Box::new(StdRng::seed_from_u64(4))).unwrap();
        assert_eq!(game.state(), GameState::Playing);
        assert!(game.guesses().is_empty());
        assert!(!store.contains(GUESSES_KEY));
    }

    #[test]
    fn test_failed_new_game_keeps_current_game() {
        let store = Rc::new(MemoryStore::new());
        let fr = country("FR", "FRA", "France", 46.2, 2.2);
        store
            .set(TARGET_KEY, &serde_json::to_string(&fr).unwrap())
            .unwrap();
        // nothing in the catalog can be drawn
        let mut va = country("VA", "VAT", "Vatican City", 41.9, 12.4);
        va.image = false;
        let catalog = Catalog::new(vec![va]);

        let mut game =
            Game::new(catalog, store.clone(), Box::new(StdRng::seed_from_u64(0))).unwrap();
        game.submit_text("Vatican City").unwrap();

        assert_matches!(game.new_game(), Err(GameError::Catalog(_)));
        assert_eq!(game.target(), &fr);
        assert_eq!(game.guesses().len(), 1);
        assert_eq!(persisted_guesses(&store).len(), 1);
        let stored: Country =
            serde_json::from_str(&store.get(TARGET_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored, fr);
    }

    #[test]
    fn test_failed_write_rejects_guess() {
        let store = Rc::new(FlakyStore::default());
        let catalog = small_catalog();
        let fr = catalog.find_by_code("FR").unwrap();
        store
            .set(TARGET_KEY, &serde_json::to_string(fr).unwrap())
            .unwrap();
        let mut game =
            Game::new(catalog, store.clone(), Box::new(StdRng::seed_from_u64(0))).unwrap();

        store.fail_writes.set(true);
        game.input = "Spain".to_string();
        assert_matches!(game.submit(), Err(GameError::Storage(_)));
        assert!(game.guesses().is_empty());
        assert_eq!(game.remaining_tries(), MAX_TRY_COUNT);
        assert!(store.get(GUESSES_KEY).unwrap().is_none());
        assert_eq!(game.input, "Spain");

        // a failed skip leaves the target in place too
        assert_matches!(game.skip(), Err(GameError::Storage(_)));
        assert_eq!(game.target().code, "FR");
    }
}
