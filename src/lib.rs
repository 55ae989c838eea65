// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod country;
pub mod error;
pub mod game;
pub mod geography;
pub mod guess;
pub mod logging;
pub mod oec;
pub mod runtime;
pub mod share;
pub mod storage;
pub mod target;
pub mod ui;

pub use app::App;
pub use error::GameError;
pub use game::{Game, GameState, SubmitOutcome, MAX_TRY_COUNT};
