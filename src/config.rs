//! Round configuration options
//!
//! Owns the impostor count and the display toggles for a round. The
//! impostor count is kept within bounds by an explicit clamp step that the
//! session runs after every roster mutation.

use serde::{Deserialize, Serialize};

/// Options governing a single round
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RoundConfig {
    /// How many players are assigned the impostor role
    impostor_count: usize,
    /// Whether civilians see the category alongside the secret word
    show_category: bool,
    /// Whether the setup screen advertises multi-impostor play
    show_multiple_impostors: bool,
    /// Whether impostors receive a clue when one is available
    show_impostor_hint: bool,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            impostor_count: 1,
            show_category: true,
            show_multiple_impostors: false,
            show_impostor_hint: true,
        }
    }
}

impl RoundConfig {
    /// The configured impostor count
    pub fn impostor_count(&self) -> usize {
        self.impostor_count
    }

    /// Whether civilians see the category alongside the secret word
    pub fn show_category(&self) -> bool {
        self.show_category
    }

    /// Whether the setup screen advertises multi-impostor play
    pub fn show_multiple_impostors(&self) -> bool {
        self.show_multiple_impostors
    }

    /// Whether impostors receive a clue when one is available
    pub fn show_impostor_hint(&self) -> bool {
        self.show_impostor_hint
    }

    /// Flips category visibility
    pub fn toggle_category(&mut self) {
        self.show_category = !self.show_category;
    }

    /// Flips the multi-impostor display flag
    pub fn toggle_multiple_impostors(&mut self) {
        self.show_multiple_impostors = !self.show_multiple_impostors;
    }

    /// Flips hint mode
    pub fn toggle_impostor_hint(&mut self) {
        self.show_impostor_hint = !self.show_impostor_hint;
    }

    /// Raises the impostor count by one, saturating at `max`
    ///
    /// Out-of-range requests are silently ignored.
    pub fn increase_impostors(&mut self, max: usize) {
        if self.impostor_count < max {
            self.impostor_count += 1;
        }
    }

    /// Lowers the impostor count by one, saturating at one
    ///
    /// Out-of-range requests are silently ignored.
    pub fn decrease_impostors(&mut self) {
        if self.impostor_count > 1 {
            self.impostor_count -= 1;
        }
    }

    /// Clamps the impostor count down to `max`
    ///
    /// Called after every roster mutation so the count never exceeds what
    /// the current roster size allows.
    pub fn clamp_impostors(&mut self, max: usize) {
        if self.impostor_count > max {
            self.impostor_count = max;
        }
    }

    /// Whether a round can start with the given roster size
    pub fn can_start(&self, player_count: usize) -> bool {
        player_count >= crate::constants::roster::MIN_PLAYER_COUNT
            && self.impostor_count >= 1
            && self.impostor_count < player_count
    }
}
