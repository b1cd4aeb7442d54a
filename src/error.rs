//! Crate-wide error type
//!
//! Configuration problems and corrupted frames are fatal and propagate out of
//! `Game::init` / `Game::update`. Unknown input codes are returned by the key
//! map but the frame driver only logs them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// The page offered nothing to destroy
    #[error("no destructible blocks found on the page")]
    NoBlocks,

    /// A page element lost its layout box between samples
    #[error("block {id} has no bounding rectangle")]
    MissingBlockGeometry { id: usize },

    #[error("unknown key code `{0}`")]
    UnknownKey(String),

    #[error("unknown mouse button {0}")]
    UnknownButton(i16),

    /// Raised only when `Settings::strict_invariants` is on
    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to parse settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("failed to read settings: {0}")]
    SettingsIo(#[from] std::io::Error),
}

/// Toggleable assertion.
///
/// With `strict` set a violated invariant stops the frame with
/// [`GameError::Invariant`]; otherwise it is logged and the caller recovers.
pub fn ensure_invariant(
    strict: bool,
    holds: bool,
    describe: impl FnOnce() -> String,
) -> Result<(), GameError> {
    if holds {
        return Ok(());
    }
    let msg = describe();
    if strict {
        return Err(GameError::Invariant(msg));
    }
    log::error!("invariant violated (relaxed): {msg}");
    Ok(())
}
