//! Private reveal viewport state
//!
//! During the reveal phase each player, one at a time, opens a private
//! viewport to learn their role. The viewport has its own small state
//! machine, independent of the player's persisted `has_seen_role` flag:
//! the secret starts hidden, can be shown and re-hidden, and the fact
//! that it was shown at least once is remembered for the duration of the
//! viewing.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::roster::Id;

/// The content a private viewport shows to its bound player
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RoleCard {
    /// The player knows the secret word
    Civilian {
        /// The secret word for this round
        word: String,
        /// The category, when category display is enabled
        category: Option<String>,
    },
    /// The player does not know the secret word
    Impostor {
        /// A clue to bluff with, when hint mode is enabled and the word
        /// has a clue pool entry
        hint: Option<String>,
    },
}

/// A private viewport bound to a single player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealView {
    /// The player being reviewed
    player: Id,
    /// Whether the secret is currently on screen
    is_revealing_secret: bool,
    /// Whether the secret was shown at least once during this viewing
    has_revealed_secret_once: bool,
}

impl RevealView {
    /// Opens a viewport for a player with the secret hidden
    pub fn new(player: Id) -> Self {
        Self {
            player,
            is_revealing_secret: false,
            has_revealed_secret_once: false,
        }
    }

    /// The player this viewport is bound to
    pub fn player(&self) -> Id {
        self.player
    }

    /// Shows the secret and latches the shown-once flag
    pub fn reveal(&mut self) {
        self.is_revealing_secret = true;
        self.has_revealed_secret_once = true;
    }

    /// Hides the secret; the shown-once flag is unaffected
    pub fn hide(&mut self) {
        self.is_revealing_secret = false;
    }

    /// Whether the secret is currently on screen
    pub fn is_revealing_secret(&self) -> bool {
        self.is_revealing_secret
    }

    /// Whether the secret was shown at least once during this viewing
    pub fn has_revealed_secret_once(&self) -> bool {
        self.has_revealed_secret_once
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_view_starts_hidden() {
        let view = RevealView::new(Id::new());
        assert!(!view.is_revealing_secret());
        assert!(!view.has_revealed_secret_once());
    }

    #[test]
    fn test_reveal_latches_once_flag() {
        let mut view = RevealView::new(Id::new());
        view.reveal();
        assert!(view.is_revealing_secret());
        assert!(view.has_revealed_secret_once());
    }

    #[test]
    fn test_hide_keeps_once_flag() {
        let mut view = RevealView::new(Id::new());
        view.reveal();
        view.hide();
        assert!(!view.is_revealing_secret());
        assert!(view.has_revealed_secret_once());
    }

    #[test]
    fn test_role_card_serializes_without_absent_fields() {
        let card = RoleCard::Impostor { hint: None };
        let json = serde_json::to_string(&card).unwrap();
        assert!(!json.contains("hint"));

        let card = RoleCard::Civilian {
            word: "Asado".to_owned(),
            category: Some("Comida".to_owned()),
        };
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("Asado"));
        assert!(json.contains("Comida"));
    }
}
