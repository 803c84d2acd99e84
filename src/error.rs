//=========================================================================
// Error Types
//=========================================================================
//
// Errors that cross the crate's public surface.
//
// Device pollers and the state controller report failures through
// [`GameError`]; state callbacks surface their own failures through the
// `State` variant, which tags the originating state ID.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::error::Error as StdError;

//=== External Crates =====================================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::state::StateId;

//=== GameError ===========================================================

/// Failure surfaced by the game loop or a device poller.
#[derive(Debug, Error)]
pub enum GameError {
    /// A transition targeted a state ID that was never registered.
    #[error("unknown game state {0}")]
    UnknownState(StateId),

    /// A poller was used before `open` (or after `close`).
    #[error("device has not been created")]
    DeviceNotCreated,

    /// A state callback failed; the source is the state's own error.
    #[error("state {id} failed")]
    State {
        id: StateId,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The platform layer failed outside any particular state.
    #[error("platform error: {0}")]
    Platform(String),
}

impl GameError {
    /// Wraps a state callback failure with the originating state ID.
    pub fn state<E>(id: StateId, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::State { id, source: Box::new(source) }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
