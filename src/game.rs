//! Core game session state machine
//!
//! This module contains the main session struct and logic for a full
//! round of the game: roster and configuration management during setup,
//! secret and role assignment on start, the sequential private-reveal
//! protocol, turn-order selection, and results computation. All state
//! lives in memory inside one [`Game`] value; there is no persistence.
//!
//! Timed behavior (the results countdown and the auto-clearing roster
//! error) is expressed as [`AlarmMessage`]s handed to a caller-supplied
//! scheduler and delivered back through [`Game::receive_alarm`], so the
//! session itself never blocks.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    analytics::{AnalyticsSink, GameReset, ResultsViewed, RoundStarted},
    catalog::{HintPool, WordCatalog},
    config::RoundConfig,
    constants,
    reveal::{RevealView, RoleCard},
    roster::{self, Id, Player, Roster},
};

/// The current phase of the game session
///
/// Exactly one session is live at a time; it begins in `Setup` and
/// returns there on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Roster and options are being edited
    Setup,
    /// Players take turns privately learning their role
    RevealPhase,
    /// The round is being played out loud
    Playing,
    /// The impostor list is on screen
    Results,
}

/// Turn-taking order once play begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Clockwise around the table
    #[serde(rename = "CW")]
    Clockwise,
    /// Counter-clockwise around the table
    #[serde(rename = "CCW")]
    CounterClockwise,
}

impl Direction {
    fn random() -> Self {
        if fastrand::bool() {
            Self::Clockwise
        } else {
            Self::CounterClockwise
        }
    }

    /// Icon for on-screen display
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clockwise => "↻",
            Self::CounterClockwise => "↺",
        }
    }
}

/// User-visible soft error messages
///
/// None of these is fatal: the triggering action is rejected, nothing
/// else changes, and roster errors additionally clear themselves after a
/// fixed delay.
#[derive(Error, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessage {
    /// A player with that name (case-insensitively) already exists
    #[error("¡Ya existe ese jugador!")]
    DuplicateName,
    /// The typed name exceeds the length limit
    #[error("Ese nombre es demasiado largo.")]
    NameTooLong,
    /// The roster is at capacity
    #[error("No entran más jugadores.")]
    RosterFull,
    /// A start was attempted without enough players
    #[error("Necesitás mínimo 3 jugadores.")]
    InsufficientPlayers,
}

/// Alarm messages for the session's timed events
///
/// Each alarm carries the generation it was scheduled under; stale
/// alarms (scheduled before a reset or before a newer message of the
/// same kind) are ignored on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Advance the results countdown by one tick
    CountdownTick {
        /// Countdown generation this tick belongs to
        generation: u64,
    },
    /// Clear the transient roster error message
    ClearError {
        /// Error generation this clear belongs to
        generation: u64,
    },
}

/// A complete game session
///
/// Owns the word catalog, the hint pool, the roster, and the round
/// configuration, and drives them through the session state machine.
/// All mutations are synchronous and atomic from the caller's view.
#[skip_serializing_none]
#[derive(Serialize, Deserialize)]
pub struct Game {
    /// Static table of categories and secret words
    catalog: WordCatalog,
    /// Optional clue pools for impostors
    hints: HintPool,
    /// The registered players
    roster: Roster,
    /// Impostor count and display toggles
    config: RoundConfig,
    /// Current phase of the session
    state: State,
    /// Secret word of the current round (stale outside a round)
    secret_word: String,
    /// Category of the current round (stale outside a round)
    category: String,
    /// Impostor clue of the current round; empty when none was drawn
    impostor_hint: String,
    /// Name of the player who opens the round
    starting_player_name: String,
    /// Turn-taking direction of the current round
    round_direction: Direction,
    /// The open private viewport, if any
    reveal: Option<RevealView>,
    /// The currently displayed soft error, if any
    error: Option<ErrorMessage>,
    /// Generation counter for error-clear alarms
    error_generation: u64,
    /// Remaining results countdown ticks, if one is running
    countdown: Option<u8>,
    /// Generation counter for countdown alarms
    countdown_generation: u64,
}

impl Debug for Game {
    /// Custom debug implementation that avoids printing the secret word
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("state", &self.state)
            .field("players", &self.roster.len())
            .finish_non_exhaustive()
    }
}

impl Default for Game {
    /// Creates a session over the built-in catalog and hint pool
    fn default() -> Self {
        Self::new(WordCatalog::builtin(), HintPool::builtin())
    }
}

// Read surface
impl Game {
    /// Current phase of the session
    pub fn state(&self) -> State {
        self.state
    }

    /// The registered players
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// The round configuration
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Secret word of the current round
    ///
    /// Only meaningful in `RevealPhase`, `Playing` and `Results`; holds
    /// the previous round's value otherwise.
    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    /// Category of the current round
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Impostor clue of the current round, if one was drawn
    pub fn impostor_hint(&self) -> Option<&str> {
        if self.impostor_hint.is_empty() {
            None
        } else {
            Some(&self.impostor_hint)
        }
    }

    /// Name of the player who opens the round
    pub fn starting_player_name(&self) -> &str {
        &self.starting_player_name
    }

    /// Turn-taking direction of the current round
    pub fn round_direction(&self) -> Direction {
        self.round_direction
    }

    /// The currently displayed soft error, if any
    pub fn error_message(&self) -> Option<ErrorMessage> {
        self.error
    }

    /// Remaining results countdown ticks, if a countdown is running
    pub fn countdown(&self) -> Option<u8> {
        self.countdown
    }

    /// The open private viewport, if any
    pub fn reveal(&self) -> Option<&RevealView> {
        self.reveal.as_ref()
    }

    /// Players assigned the impostor role this round, in roster order
    pub fn impostors(&self) -> Vec<&Player> {
        self.roster.players().iter().filter(|p| p.is_impostor).collect()
    }

    /// Maximum impostor count the current roster size allows
    pub fn max_impostors(&self) -> usize {
        self.roster.max_impostors()
    }

    /// Whether a round can start with the current roster and configuration
    pub fn can_start(&self) -> bool {
        self.config.can_start(self.roster.len())
    }

    /// What the open viewport should show to its bound player
    ///
    /// Returns `None` when no viewport is open or its player has left the
    /// roster. Category and hint visibility honor the round configuration.
    pub fn role_card(&self) -> Option<RoleCard> {
        let view = self.reveal.as_ref()?;
        let player = self.roster.get(view.player())?;

        Some(if player.is_impostor {
            RoleCard::Impostor {
                hint: if self.config.show_impostor_hint() {
                    self.impostor_hint().map(str::to_owned)
                } else {
                    None
                },
            }
        } else {
            RoleCard::Civilian {
                word: self.secret_word.clone(),
                category: self
                    .config
                    .show_category()
                    .then(|| self.category.clone()),
            }
        })
    }
}

impl Game {
    /// Creates a fresh session in `Setup` over the given catalog and hints
    pub fn new(catalog: WordCatalog, hints: HintPool) -> Self {
        Self {
            catalog,
            hints,
            roster: Roster::default(),
            config: RoundConfig::default(),
            state: State::Setup,
            secret_word: String::new(),
            category: String::new(),
            impostor_hint: String::new(),
            starting_player_name: String::new(),
            round_direction: Direction::Clockwise,
            reveal: None,
            error: None,
            error_generation: 0,
            countdown: None,
            countdown_generation: 0,
        }
    }

    /// Registers a new player
    ///
    /// Empty or whitespace-only input is silently ignored. Duplicate,
    /// over-long, and over-capacity names are rejected with a transient
    /// error message that clears itself after a fixed delay (a newer
    /// error restarts the clock; last write wins). On success any
    /// displayed error is dismissed and the impostor bound is re-checked.
    ///
    /// # Arguments
    ///
    /// * `raw_name` - The name as typed
    /// * `schedule_message` - Function to schedule delayed alarm messages
    ///
    /// # Returns
    ///
    /// The new player's ID when one was added.
    pub fn add_player<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        raw_name: &str,
        mut schedule_message: S,
    ) -> Option<Id> {
        match self.roster.add(raw_name) {
            Ok(id) => {
                self.error = None;
                self.clamp_config();
                debug!(players = self.roster.len(), "player added");
                Some(id)
            }
            Err(roster::Error::Empty) => None,
            Err(error) => {
                let message = match error {
                    roster::Error::Duplicate => ErrorMessage::DuplicateName,
                    roster::Error::TooLong => ErrorMessage::NameTooLong,
                    roster::Error::Full | roster::Error::Empty => ErrorMessage::RosterFull,
                };
                self.set_transient_error(message, &mut schedule_message);
                None
            }
        }
    }

    /// Removes a player; absent IDs are a no-op
    ///
    /// May be called in any state. The impostor bound is re-checked
    /// against the shrunken roster.
    pub fn remove_player(&mut self, id: Id) {
        self.roster.remove(id);
        self.clamp_config();
    }

    /// Flips category visibility
    pub fn toggle_category(&mut self) {
        self.config.toggle_category();
    }

    /// Flips the multi-impostor display flag
    pub fn toggle_multiple_impostors(&mut self) {
        self.config.toggle_multiple_impostors();
    }

    /// Flips hint mode
    pub fn toggle_impostor_hint(&mut self) {
        self.config.toggle_impostor_hint();
    }

    /// Raises the impostor count, saturating at the roster's bound
    pub fn increase_impostors(&mut self) {
        self.config.increase_impostors(self.roster.max_impostors());
    }

    /// Lowers the impostor count, saturating at one
    pub fn decrease_impostors(&mut self) {
        self.config.decrease_impostors();
    }

    /// Starts a round: draws the secret, assigns roles, enters the reveal phase
    ///
    /// Only valid from `Setup`. If the start precondition fails, an
    /// `InsufficientPlayers` message is surfaced and nothing else changes.
    /// Otherwise a category and word are drawn uniformly from the catalog,
    /// a clue is drawn when hint mode is on and the word has a pool entry,
    /// roles are assigned to a uniformly shuffled roster, the roster is
    /// persisted sorted by name, and a `start_game` event is emitted
    /// (round metadata only, never the secret).
    pub fn start_game<A: AnalyticsSink>(&mut self, sink: &A) {
        if !matches!(self.state, State::Setup) {
            return;
        }
        if !self.can_start() {
            self.error = Some(ErrorMessage::InsufficientPlayers);
            return;
        }

        let (category, word) = self.catalog.draw();
        let category = category.to_owned();
        let word = word.to_owned();
        self.impostor_hint = if self.config.show_impostor_hint() {
            self.hints.draw(&word).map(str::to_owned).unwrap_or_default()
        } else {
            String::new()
        };
        self.category = category;
        self.secret_word = word;

        self.roster.assign_impostors(self.config.impostor_count());

        self.error = None;
        self.state = State::RevealPhase;
        info!(
            players = self.roster.len(),
            impostors = self.config.impostor_count(),
            category = %self.category,
            "round started"
        );

        sink.emit(
            &RoundStarted {
                player_count: self.roster.len(),
                impostor_count: self.config.impostor_count(),
                category: self.category.clone(),
            }
            .into(),
        );
    }

    /// Opens a private viewport for a player
    ///
    /// Only valid during the reveal phase and for registered players.
    /// The viewport starts with the secret hidden regardless of whether
    /// this player already completed a viewing; reopening never un-marks
    /// a completed player.
    pub fn open_reveal(&mut self, player: Id) {
        if matches!(self.state, State::RevealPhase) && self.roster.get(player).is_some() {
            self.reveal = Some(RevealView::new(player));
        }
    }

    /// Shows the secret inside the open viewport
    pub fn reveal_secret(&mut self) {
        if let Some(view) = &mut self.reveal {
            view.reveal();
        }
    }

    /// Hides the secret inside the open viewport
    pub fn hide_secret(&mut self) {
        if let Some(view) = &mut self.reveal {
            view.hide();
        }
    }

    /// Closes the open viewport, marking its player as having seen their role
    ///
    /// This is the sole trigger for leaving the reveal phase: once every
    /// registered player is marked, the starting player and round
    /// direction are drawn and the session enters `Playing`.
    pub fn close_reveal(&mut self) {
        let Some(view) = self.reveal.take() else {
            return;
        };
        self.roster.mark_seen(view.player());

        if matches!(self.state, State::RevealPhase) && self.roster.all_seen() {
            self.begin_playing();
        }
    }

    /// Picks who starts and in which direction, then enters `Playing`
    ///
    /// The starting player is drawn uniformly from the full roster;
    /// being picked carries no information about roles.
    fn begin_playing(&mut self) {
        let Some(player) = self.roster.random_player() else {
            return;
        };
        self.starting_player_name = player.name().to_owned();
        self.round_direction = Direction::random();
        self.state = State::Playing;
        info!(
            starting_player = %self.starting_player_name,
            direction = ?self.round_direction,
            "reveal phase complete, round in play"
        );
    }

    /// Reveals the impostor list and enters `Results`
    ///
    /// Only valid from `Playing`. Cancels any running countdown and
    /// emits a `view_results` event carrying the impostor names.
    pub fn reveal_results<A: AnalyticsSink>(&mut self, sink: &A) {
        if !matches!(self.state, State::Playing) {
            return;
        }

        self.countdown = None;
        self.countdown_generation += 1;
        self.state = State::Results;
        info!("results revealed");

        sink.emit(
            &ResultsViewed {
                player_count: self.roster.len(),
                impostors: self.roster.impostor_names(),
                category: self.category.clone(),
            }
            .into(),
        );
    }

    /// Begins the results countdown
    ///
    /// Schedules one tick per second starting from the configured count;
    /// reaching zero reveals the results exactly once. Re-entrant calls
    /// while a countdown is already running are no-ops.
    pub fn start_countdown<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        mut schedule_message: S,
    ) {
        if !matches!(self.state, State::Playing) || self.countdown.is_some() {
            return;
        }

        self.countdown = Some(constants::countdown::START);
        schedule_message(
            AlarmMessage::CountdownTick {
                generation: self.countdown_generation,
            },
            web_time::Duration::from_secs(constants::countdown::TICK_SECONDS),
        );
    }

    /// Handles a delivered alarm message
    ///
    /// Stale alarms, recognizable by a generation mismatch, are dropped:
    /// a reset cancels an in-flight countdown this way, and an error
    /// message overwritten by a newer one is only cleared by the newer
    /// message's own alarm.
    pub fn receive_alarm<A: AnalyticsSink, S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: AlarmMessage,
        mut schedule_message: S,
        sink: &A,
    ) {
        match message {
            AlarmMessage::CountdownTick { generation } => {
                if generation != self.countdown_generation {
                    return;
                }
                let Some(remaining) = self.countdown else {
                    return;
                };

                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.countdown = None;
                    self.reveal_results(sink);
                } else {
                    self.countdown = Some(remaining);
                    schedule_message(
                        AlarmMessage::CountdownTick { generation },
                        web_time::Duration::from_secs(constants::countdown::TICK_SECONDS),
                    );
                }
            }
            AlarmMessage::ClearError { generation } => {
                if generation == self.error_generation {
                    self.error = None;
                }
            }
        }
    }

    /// Returns the session to `Setup`, keeping roster and configuration
    ///
    /// Every player's role flags are cleared, any open viewport is
    /// dropped, and an in-flight countdown is cancelled. Secret fields
    /// are left stale until the next start overwrites them; they are
    /// unreachable from `Setup`. Emits a `reset_game` event.
    pub fn reset_game<A: AnalyticsSink>(&mut self, sink: &A) {
        sink.emit(
            &GameReset {
                player_count: self.roster.len(),
            }
            .into(),
        );

        self.roster.reset_roles();
        self.reveal = None;
        self.countdown = None;
        self.countdown_generation += 1;
        self.state = State::Setup;
        info!("session reset");
    }

    /// Surfaces a transient error and schedules its clear
    ///
    /// Bumping the generation invalidates any pending clear so that the
    /// newest message controls when the display empties.
    fn set_transient_error<S: FnMut(AlarmMessage, web_time::Duration)>(
        &mut self,
        message: ErrorMessage,
        schedule_message: &mut S,
    ) {
        self.error = Some(message);
        self.error_generation += 1;
        schedule_message(
            AlarmMessage::ClearError {
                generation: self.error_generation,
            },
            web_time::Duration::from_secs(constants::errors::CLEAR_DELAY_SECONDS),
        );
    }

    /// Re-clamps the impostor count after a roster mutation
    fn clamp_config(&mut self) {
        self.config.clamp_impostors(self.roster.max_impostors());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::analytics::Event;

    struct RecordingSink {
        events: RefCell<Vec<Event>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                events: RefCell::new(Vec::new()),
            }
        }

        fn events(&self) -> Vec<Event> {
            self.events.borrow().clone()
        }
    }

    impl AnalyticsSink for RecordingSink {
        fn emit(&self, event: &Event) {
            self.events.borrow_mut().push(event.clone());
        }
    }

    fn no_schedule(_: AlarmMessage, _: web_time::Duration) {}

    fn game_with_players(names: &[&str]) -> Game {
        let mut game = Game::default();
        for name in names {
            game.add_player(name, no_schedule).unwrap();
        }
        game
    }

    fn game_in_play(names: &[&str]) -> Game {
        let mut game = game_with_players(names);
        game.start_game(&());
        let ids: Vec<Id> = game.roster().players().iter().map(|p| p.id).collect();
        for id in ids {
            game.open_reveal(id);
            game.close_reveal();
        }
        assert_eq!(game.state(), State::Playing);
        game
    }

    #[test]
    fn test_three_players_allow_start() {
        let game = game_with_players(&["Ana", "Beto", "Cami"]);
        assert!(game.can_start());
        assert_eq!(game.max_impostors(), 1);
        assert_eq!(game.config().impostor_count(), 1);
    }

    #[test]
    fn test_start_assigns_exactly_one_impostor() {
        for seed in 0..30 {
            fastrand::seed(seed);
            let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
            let sink = RecordingSink::new();
            game.start_game(&sink);

            assert_eq!(game.state(), State::RevealPhase);
            assert_eq!(game.roster().impostor_count(), 1);

            // Word drawn from the announced category
            let category = game
                .catalog
                .categories()
                .iter()
                .find(|c| c.name == game.category())
                .expect("drawn category exists");
            assert!(category.words.iter().any(|w| w == game.secret_word()));

            // Roster persisted alphabetically
            let names: Vec<&str> = game.roster().players().iter().map(Player::name).collect();
            assert_eq!(names, ["ANA", "BETO", "CAMI"]);
        }
    }

    #[test]
    fn test_impostor_bound_with_five_players() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami", "Dani", "Eva"]);
        assert_eq!(game.max_impostors(), 2);

        game.increase_impostors();
        assert_eq!(game.config().impostor_count(), 2);
        game.increase_impostors();
        assert_eq!(game.config().impostor_count(), 2);
    }

    #[test]
    fn test_removal_clamps_impostor_count() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami", "Dani", "Eva"]);
        game.increase_impostors();
        assert_eq!(game.config().impostor_count(), 2);

        let last = game.roster().players()[4].id;
        game.remove_player(last);
        assert_eq!(game.max_impostors(), 1);
        assert_eq!(game.config().impostor_count(), 1);
    }

    #[test]
    fn test_reveal_gating_requires_everyone() {
        fastrand::seed(5);
        let mut game = game_with_players(&["Ana", "Beto", "Cami", "Dani", "Eva"]);
        game.start_game(&());

        let ids: Vec<Id> = game.roster().players().iter().map(|p| p.id).collect();
        for id in &ids[..4] {
            game.open_reveal(*id);
            game.close_reveal();
            assert_eq!(game.state(), State::RevealPhase);
        }

        game.open_reveal(ids[4]);
        game.close_reveal();
        assert_eq!(game.state(), State::Playing);

        let starter = game.starting_player_name().to_owned();
        assert!(game.roster().players().iter().any(|p| p.name() == starter));
        assert!(matches!(
            game.round_direction(),
            Direction::Clockwise | Direction::CounterClockwise
        ));
    }

    #[test]
    fn test_reopening_does_not_unmark_or_advance_early() {
        fastrand::seed(9);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());

        let ids: Vec<Id> = game.roster().players().iter().map(|p| p.id).collect();
        game.open_reveal(ids[0]);
        game.close_reveal();

        // Same player reviews again before the others
        game.open_reveal(ids[0]);
        let view = game.reveal().unwrap();
        assert!(!view.is_revealing_secret());
        assert!(!view.has_revealed_secret_once());
        game.close_reveal();

        assert_eq!(game.state(), State::RevealPhase);
        assert!(game.roster().get(ids[0]).unwrap().has_seen_role);
    }

    #[test]
    fn test_close_without_open_is_noop() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());
        game.close_reveal();
        assert_eq!(game.state(), State::RevealPhase);
        assert!(game.roster().players().iter().all(|p| !p.has_seen_role));
    }

    #[test]
    fn test_open_reveal_outside_reveal_phase_is_noop() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        let id = game.roster().players()[0].id;
        game.open_reveal(id);
        assert!(game.reveal().is_none());
    }

    #[test]
    fn test_open_reveal_unknown_player_is_noop() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());
        game.open_reveal(Id::new());
        assert!(game.reveal().is_none());
    }

    #[test]
    fn test_results_expose_impostor_list() {
        fastrand::seed(13);
        let mut game = game_in_play(&["Ana", "Beto", "Cami", "Dani", "Eva"]);
        let sink = RecordingSink::new();
        game.reveal_results(&sink);

        assert_eq!(game.state(), State::Results);
        assert_eq!(game.impostors().len(), game.config().impostor_count());

        let expected = game.roster().impostor_names();
        match &sink.events()[..] {
            [Event::ResultsViewed(viewed)] => {
                assert_eq!(viewed.impostors, expected);
                assert_eq!(viewed.player_count, 5);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn test_start_with_two_players_rejected() {
        let mut game = game_with_players(&["Ana", "Beto"]);
        let sink = RecordingSink::new();
        game.start_game(&sink);

        assert_eq!(game.state(), State::Setup);
        assert_eq!(game.error_message(), Some(ErrorMessage::InsufficientPlayers));
        assert_eq!(game.roster().impostor_count(), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_start_outside_setup_is_noop() {
        fastrand::seed(21);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());
        let word = game.secret_word().to_owned();

        game.start_game(&());
        assert_eq!(game.state(), State::RevealPhase);
        assert_eq!(game.secret_word(), word);
    }

    #[test]
    fn test_empty_name_is_silently_ignored() {
        let mut game = Game::default();
        let mut scheduled = Vec::new();
        assert!(game.add_player("   ", |m, d| scheduled.push((m, d))).is_none());
        assert!(game.error_message().is_none());
        assert!(scheduled.is_empty());
        assert!(game.roster().is_empty());
    }

    #[test]
    fn test_duplicate_name_sets_transient_error() {
        let mut game = Game::default();
        let mut scheduled = Vec::new();
        game.add_player("Ana", |m, d| scheduled.push((m, d)));
        game.add_player("ana", |m, d| scheduled.push((m, d)));

        assert_eq!(game.error_message(), Some(ErrorMessage::DuplicateName));
        assert_eq!(game.roster().len(), 1);

        let (message, delay) = scheduled.remove(0);
        assert_eq!(
            delay,
            web_time::Duration::from_secs(constants::errors::CLEAR_DELAY_SECONDS)
        );
        game.receive_alarm(message, |m, d| scheduled.push((m, d)), &());
        assert!(game.error_message().is_none());
    }

    #[test]
    fn test_stale_error_clear_is_ignored() {
        let mut game = Game::default();
        let mut scheduled = Vec::new();
        game.add_player("Ana", |m, d| scheduled.push((m, d)));
        game.add_player("ana", |m, d| scheduled.push((m, d)));
        let (stale_clear, _) = scheduled.remove(0);

        // A second duplicate overwrites the message and restarts the clock
        game.add_player("ANA", |m, d| scheduled.push((m, d)));
        game.receive_alarm(stale_clear, no_schedule, &());
        assert_eq!(game.error_message(), Some(ErrorMessage::DuplicateName));

        let (fresh_clear, _) = scheduled.remove(0);
        game.receive_alarm(fresh_clear, no_schedule, &());
        assert!(game.error_message().is_none());
    }

    #[test]
    fn test_successful_add_dismisses_error() {
        let mut game = Game::default();
        game.add_player("Ana", no_schedule);
        game.add_player("ana", no_schedule);
        assert!(game.error_message().is_some());

        game.add_player("Beto", no_schedule);
        assert!(game.error_message().is_none());
    }

    #[test]
    fn test_countdown_runs_to_results_exactly_once() {
        fastrand::seed(17);
        let mut game = game_in_play(&["Ana", "Beto", "Cami"]);
        let sink = RecordingSink::new();
        let mut scheduled = Vec::new();

        game.start_countdown(|m, d| scheduled.push((m, d)));
        assert_eq!(game.countdown(), Some(3));

        // A second start while counting is a no-op
        game.start_countdown(|m, d| scheduled.push((m, d)));
        assert_eq!(scheduled.len(), 1);

        while !scheduled.is_empty() {
            let (message, delay) = scheduled.remove(0);
            assert_eq!(
                delay,
                web_time::Duration::from_secs(constants::countdown::TICK_SECONDS)
            );
            game.receive_alarm(message, |m, d| scheduled.push((m, d)), &sink);
        }

        assert_eq!(game.state(), State::Results);
        assert_eq!(game.countdown(), None);
        let results_events = sink
            .events()
            .iter()
            .filter(|e| matches!(e, Event::ResultsViewed(_)))
            .count();
        assert_eq!(results_events, 1);
    }

    #[test]
    fn test_countdown_outside_playing_is_noop() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        let mut scheduled = Vec::new();
        game.start_countdown(|m, d| scheduled.push((m, d)));
        assert!(scheduled.is_empty());
        assert_eq!(game.countdown(), None);
    }

    #[test]
    fn test_reset_cancels_inflight_countdown() {
        fastrand::seed(23);
        let mut game = game_in_play(&["Ana", "Beto", "Cami"]);
        let sink = RecordingSink::new();
        let mut scheduled = Vec::new();

        game.start_countdown(|m, d| scheduled.push((m, d)));
        game.reset_game(&sink);
        assert_eq!(game.state(), State::Setup);
        assert_eq!(game.countdown(), None);

        // The tick scheduled before the reset arrives late and is dropped
        let (stale_tick, _) = scheduled.remove(0);
        game.receive_alarm(stale_tick, |m, d| scheduled.push((m, d)), &sink);
        assert_eq!(game.state(), State::Setup);
        assert!(scheduled.is_empty());
        assert!(
            sink.events()
                .iter()
                .all(|e| !matches!(e, Event::ResultsViewed(_)))
        );
    }

    #[test]
    fn test_direct_reveal_while_counting_does_not_double_fire() {
        fastrand::seed(29);
        let mut game = game_in_play(&["Ana", "Beto", "Cami"]);
        let sink = RecordingSink::new();
        let mut scheduled = Vec::new();

        game.start_countdown(|m, d| scheduled.push((m, d)));
        game.reveal_results(&sink);
        assert_eq!(game.state(), State::Results);

        let (stale_tick, _) = scheduled.remove(0);
        game.receive_alarm(stale_tick, |m, d| scheduled.push((m, d)), &sink);
        assert!(scheduled.is_empty());

        let results_events = sink
            .events()
            .iter()
            .filter(|e| matches!(e, Event::ResultsViewed(_)))
            .count();
        assert_eq!(results_events, 1);
    }

    #[test]
    fn test_reset_preserves_roster_and_config() {
        fastrand::seed(31);
        let mut game = game_with_players(&["Ana", "Beto", "Cami", "Dani", "Eva"]);
        game.increase_impostors();
        game.toggle_category();
        game.start_game(&());

        let sink = RecordingSink::new();
        game.reset_game(&sink);

        assert_eq!(game.state(), State::Setup);
        assert_eq!(game.roster().len(), 5);
        assert_eq!(game.config().impostor_count(), 2);
        assert!(!game.config().show_category());
        assert!(
            game.roster()
                .players()
                .iter()
                .all(|p| !p.is_impostor && !p.has_seen_role)
        );
        assert!(matches!(&sink.events()[..], [Event::GameReset(reset)] if reset.player_count == 5));
    }

    #[test]
    fn test_reset_in_setup_is_harmless() {
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.reset_game(&());
        assert_eq!(game.state(), State::Setup);
        assert_eq!(game.roster().len(), 3);
        assert_eq!(game.roster().impostor_count(), 0);
    }

    #[test]
    fn test_events_never_contain_secret_word() {
        for seed in 0..20 {
            fastrand::seed(seed);
            let mut game = game_in_play(&["Ana", "Beto", "Cami", "Dani"]);
            let sink = RecordingSink::new();
            let word = game.secret_word().to_owned();

            game.reveal_results(&sink);
            game.reset_game(&sink);
            game.start_game(&sink);

            for event in sink.events() {
                assert!(
                    !event.to_message().contains(&word),
                    "event leaked the secret: {}",
                    event.to_message()
                );
            }
        }
    }

    #[test]
    fn test_role_card_for_civilian_honors_category_toggle() {
        fastrand::seed(37);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());

        let civilian = game
            .roster()
            .players()
            .iter()
            .find(|p| !p.is_impostor)
            .unwrap()
            .id;
        game.open_reveal(civilian);

        match game.role_card().unwrap() {
            RoleCard::Civilian { word, category } => {
                assert_eq!(word, game.secret_word());
                assert_eq!(category.as_deref(), Some(game.category()));
            }
            RoleCard::Impostor { .. } => panic!("expected a civilian card"),
        }

        game.toggle_category();
        match game.role_card().unwrap() {
            RoleCard::Civilian { category, .. } => assert_eq!(category, None),
            RoleCard::Impostor { .. } => panic!("expected a civilian card"),
        }
    }

    #[test]
    fn test_role_card_for_impostor_hides_word() {
        fastrand::seed(41);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());

        let impostor = game
            .roster()
            .players()
            .iter()
            .find(|p| p.is_impostor)
            .unwrap()
            .id;
        game.open_reveal(impostor);

        match game.role_card().unwrap() {
            RoleCard::Impostor { hint } => {
                assert_eq!(hint.as_deref(), game.impostor_hint());
            }
            RoleCard::Civilian { .. } => panic!("expected an impostor card"),
        }
    }

    #[test]
    fn test_hint_absent_when_mode_disabled() {
        fastrand::seed(43);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.toggle_impostor_hint();
        game.start_game(&());
        assert_eq!(game.impostor_hint(), None);
    }

    #[test]
    fn test_missing_hint_is_not_an_error() {
        fastrand::seed(47);
        let catalog = WordCatalog::new(vec![crate::catalog::Category {
            name: "Única".to_owned(),
            words: vec!["Sin pista".to_owned()],
        }])
        .unwrap();
        let mut game = Game::new(catalog, HintPool::default());
        for name in ["Ana", "Beto", "Cami"] {
            game.add_player(name, no_schedule);
        }

        game.start_game(&());
        assert_eq!(game.state(), State::RevealPhase);
        assert_eq!(game.impostor_hint(), None);
    }

    #[test]
    fn test_direction_icons() {
        assert_eq!(Direction::Clockwise.icon(), "↻");
        assert_eq!(Direction::CounterClockwise.icon(), "↺");
    }

    #[test]
    fn test_session_round_trips_through_serde() {
        fastrand::seed(53);
        let mut game = game_with_players(&["Ana", "Beto", "Cami"]);
        game.start_game(&());

        let serialized = serde_json::to_string(&game).unwrap();
        let deserialized: Game = serde_json::from_str(&serialized).unwrap();

        assert_eq!(deserialized.state(), State::RevealPhase);
        assert_eq!(deserialized.secret_word(), game.secret_word());
        assert_eq!(deserialized.roster().impostor_count(), 1);
    }
}
