use rand::seq::SliceRandom;
use rand::RngCore;
use std::fmt;
use std::rc::Rc;
use tracing::{info, warn};

use crate::country::{Catalog, CatalogError, Country};
use crate::error::GameError;
use crate::storage::{KeyValueStore, StorageError};

/// Storage key holding the country to guess
pub const TARGET_KEY: &str = "currentCountry";

/// Picks the country to guess, once per game
pub struct TargetSelector {
    store: Rc<dyn KeyValueStore>,
    rng: Box<dyn RngCore>,
}

impl fmt::Debug for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetSelector")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

/// Where the target of a session came from
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Read back from storage; its guesses belong to it
    Restored(Country),
    /// Newly drawn; any stored guesses were scored against another target
    Drawn(Country),
}

impl Selection {
    pub fn is_drawn(&self) -> bool {
        matches!(self, Selection::Drawn(_))
    }

    pub fn into_country(self) -> Country {
        match self {
            Selection::Restored(country) | Selection::Drawn(country) => country,
        }
    }
}

impl TargetSelector {
    pub fn new(store: Rc<dyn KeyValueStore>, rng: Box<dyn RngCore>) -> Self {
        Self { store, rng }
    }

    /// Return the persisted target, or draw and persist a new one
    pub fn select(&mut self, catalog: &Catalog) -> Result<Selection, GameError> {
        if let Some(raw) = self.store.get(TARGET_KEY)? {
            match serde_json::from_str::<Country>(&raw) {
                Ok(country) => return Ok(Selection::Restored(country)),
                Err(e) => warn!(error = %e, "discarding unreadable target"),
            }
        }

        let country = self.draw(catalog)?;
        self.persist(&country)?;
        Ok(Selection::Drawn(country))
    }

    /// Pick uniformly among countries with an exports image, without persisting
    pub fn draw(&mut self, catalog: &Catalog) -> Result<Country, GameError> {
        let country = catalog
            .with_image()
            .choose(self.rng.as_mut())
            .map(|c| (*c).clone())
            .ok_or(CatalogError::NoTargets)?;
        Ok(country)
    }

    pub fn persist(&self, country: &Country) -> Result<(), GameError> {
        let raw = serde_json::to_string(country).map_err(StorageError::from)?;
        self.store.set(TARGET_KEY, &raw)?;
        info!(target_code = %country.code, "selected new target");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), GameError> {
        self.store.clear(TARGET_KEY)?;
        Ok(())
    }
}
