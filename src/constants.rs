//! Configuration constants for the impostor game system
//!
//! This module contains the numeric limits and timings used throughout
//! the game session to ensure consistent boundaries across components.

/// Roster configuration constants
pub mod roster {
    /// Minimum number of players required to start a round
    pub const MIN_PLAYER_COUNT: usize = 3;
    /// Maximum number of players allowed in a single session
    pub const MAX_PLAYER_COUNT: usize = 24;
    /// Maximum length of a player name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
}

/// Reveal countdown configuration constants
pub mod countdown {
    /// Number of ticks the results countdown starts from
    pub const START: u8 = 3;
    /// Seconds between consecutive countdown ticks
    pub const TICK_SECONDS: u64 = 1;
}

/// Transient error message configuration constants
pub mod errors {
    /// Seconds before a transient roster error message clears itself
    pub const CLEAR_DELAY_SECONDS: u64 = 2;
}
