//! Player roster management
//!
//! This module owns the list of registered players for a session. It
//! ensures name uniqueness (case-insensitive, stored uppercase for easy
//! on-screen lookup), hands out stable player identifiers, and carries
//! the per-round role flags that the session mutates in place.

use std::{collections::HashSet, fmt::Display, str::FromStr};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use uuid::Uuid;

/// A unique identifier for a player
///
/// Each player gets a unique ID on registration that persists until the
/// player is explicitly removed from the roster.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random player ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Id {
    /// Creates a new random player ID (same as `new()`)
    fn default() -> Self {
        Self::new()
    }
}

impl Display for Id {
    /// Formats the ID as a UUID string
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    /// Parses an ID from a UUID string
    ///
    /// # Errors
    ///
    /// Returns a `uuid::Error` if the string is not a valid UUID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A registered player and their per-round role flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The player's unique identifier
    pub id: Id,
    /// Stored name, uppercase
    name: String,
    /// Whether this player was assigned the impostor role this round
    pub is_impostor: bool,
    /// Whether this player has completed their private reveal this round
    pub has_seen_role: bool,
}

impl Player {
    /// The player's display name (uppercase)
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Errors that can occur when registering a player
///
/// All of these are soft, user-facing rejections; none of them mutates
/// the roster.
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
    /// Another player already carries this name (case-insensitively)
    #[error("name already in-use")]
    Duplicate,
    /// The roster has reached the maximum number of players
    #[error("maximum number of players reached")]
    Full,
}

/// Serialization helper for the Roster struct
#[derive(Deserialize)]
struct RosterSerde {
    players: Vec<Player>,
}

/// The ordered-by-name set of currently registered players
///
/// Maintains a set of stored names alongside the player list for quick
/// duplicate checks. The set is rebuilt on deserialization since storage
/// is already normalized.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "RosterSerde")]
pub struct Roster {
    /// The registered players
    players: Vec<Player>,

    /// Set of stored names for duplicate checks (not serialized)
    #[serde(skip_serializing)]
    existing: HashSet<String>,
}

impl From<RosterSerde> for Roster {
    /// Reconstructs the roster from serialized data, rebuilding the name set
    fn from(serde: RosterSerde) -> Self {
        let RosterSerde { players } = serde;
        let existing = players.iter().map(|p| p.name.clone()).collect();
        Self { players, existing }
    }
}

impl Roster {
    /// Registers a new player after trimming and normalizing the name
    ///
    /// Names are compared case-insensitively and stored uppercase. New
    /// players are appended; existing players are never reordered by a
    /// registration.
    ///
    /// # Arguments
    ///
    /// * `raw_name` - The name as typed, whitespace included
    ///
    /// # Returns
    ///
    /// The new player's ID on success.
    ///
    /// # Errors
    ///
    /// * `Error::Empty` - Name is empty after trimming whitespace
    /// * `Error::TooLong` - Name exceeds the maximum length
    /// * `Error::Full` - Roster is at capacity
    /// * `Error::Duplicate` - Name is already taken (case-insensitively)
    pub fn add(&mut self, raw_name: &str) -> Result<Id, Error> {
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(Error::Empty);
        }
        if trimmed.chars().count() > crate::constants::roster::MAX_NAME_LENGTH {
            return Err(Error::TooLong);
        }
        if self.players.len() >= crate::constants::roster::MAX_PLAYER_COUNT {
            return Err(Error::Full);
        }
        let name = trimmed.to_uppercase();
        if !self.existing.insert(name.clone()) {
            return Err(Error::Duplicate);
        }
        let player = Player {
            id: Id::new(),
            name,
            is_impostor: false,
            has_seen_role: false,
        };
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Removes a player by ID; absent IDs are a no-op
    pub fn remove(&mut self, id: Id) {
        if let Some(position) = self.players.iter().position(|p| p.id == id) {
            let player = self.players.remove(position);
            self.existing.remove(&player.name);
        }
    }

    /// Number of registered players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// All registered players, in roster order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Looks up a player by ID
    pub fn get(&self, id: Id) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Maximum number of impostors the current roster size allows
    ///
    /// Innocents must always outnumber impostors with margin: below three
    /// players the bound collapses to one, otherwise it is
    /// `max(1, (n - 1) / 2)`.
    pub fn max_impostors(&self) -> usize {
        let total = self.players.len();
        if total < crate::constants::roster::MIN_PLAYER_COUNT {
            1
        } else {
            ((total - 1) / 2).max(1)
        }
    }

    /// Clears every player's role flags
    pub fn reset_roles(&mut self) {
        for player in &mut self.players {
            player.is_impostor = false;
            player.has_seen_role = false;
        }
    }

    /// Assigns the impostor role to `count` players chosen uniformly
    ///
    /// Clears all role flags from a prior round, draws a uniform random
    /// permutation of the roster (Fisher-Yates), marks the first `count`
    /// players of it as impostors, and leaves the roster sorted by name.
    /// The permutation itself is transient; only the marked subset
    /// survives.
    pub fn assign_impostors(&mut self, count: usize) {
        self.reset_roles();

        let mut order = (0..self.players.len()).collect_vec();
        fastrand::shuffle(&mut order);
        for &index in order.iter().take(count) {
            self.players[index].is_impostor = true;
        }

        self.sort_by_name();
    }

    /// Sorts the roster alphabetically by stored name
    pub fn sort_by_name(&mut self) {
        self.players.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Marks a player as having completed their private reveal
    ///
    /// Idempotent; absent IDs are a no-op.
    pub fn mark_seen(&mut self, id: Id) {
        if let Some(player) = self.players.iter_mut().find(|p| p.id == id) {
            player.has_seen_role = true;
        }
    }

    /// Whether every registered player has completed their reveal
    pub fn all_seen(&self) -> bool {
        self.players.iter().all(|p| p.has_seen_role)
    }

    /// Number of players currently marked as impostors
    pub fn impostor_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_impostor).count()
    }

    /// Names of all players currently marked as impostors, in roster order
    pub fn impostor_names(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| p.is_impostor)
            .map(|p| p.name.clone())
            .collect_vec()
    }

    /// Picks a registered player uniformly at random
    pub fn random_player(&self) -> Option<&Player> {
        fastrand::choice(&self.players)
    }
}
