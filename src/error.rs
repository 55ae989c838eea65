use thiserror::Error;

use crate::country::CatalogError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("unknown country: {0:?}")]
    UnknownCountry(String),
    #[error("the game is over, start a new one to keep playing")]
    GameOver,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl GameError {
    /// Rejections the player can fix by typing something else
    pub fn is_rejection(&self) -> bool {
        matches!(self, GameError::UnknownCountry(_) | GameError::GameOver)
    }
}
