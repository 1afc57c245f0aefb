//! Best-effort analytics emission
//!
//! This module defines the narrow boundary between the game session and
//! whatever analytics backend the embedding application wires up. The
//! game treats emission as infallible and fire-and-forget: implementations
//! must swallow their own failures and never surface them back into game
//! state. Events carry round metadata only; the secret word is never part
//! of any event.

use serde::Serialize;

/// Metadata emitted when a round starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundStarted {
    /// Number of registered players at round start
    pub player_count: usize,
    /// Number of players assigned the impostor role
    pub impostor_count: usize,
    /// The drawn category name
    pub category: String,
}

/// Metadata emitted when the results screen is revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsViewed {
    /// Number of registered players at reveal time
    pub player_count: usize,
    /// Names of the players who were impostors this round
    pub impostors: Vec<String>,
    /// The drawn category name
    pub category: String,
}

/// Metadata emitted when the session returns to setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameReset {
    /// Number of registered players at reset time
    pub player_count: usize,
}

/// An analytics event produced by the game session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_more::From)]
pub enum Event {
    /// A round was started
    RoundStarted(RoundStarted),
    /// The results screen was revealed
    ResultsViewed(ResultsViewed),
    /// The session was reset back to setup
    GameReset(GameReset),
}

impl Event {
    /// The wire name of this event kind
    pub fn name(&self) -> &'static str {
        match self {
            Event::RoundStarted(_) => "start_game",
            Event::ResultsViewed(_) => "view_results",
            Event::GameReset(_) => "reset_game",
        }
    }

    /// Converts the event to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Trait for delivering analytics events to an external backend
///
/// Implementations might push to a data layer, write to a log, or do
/// nothing at all. Delivery is best-effort; the game never retries and
/// never observes a failure.
pub trait AnalyticsSink {
    /// Delivers a single event
    fn emit(&self, event: &Event);
}

/// A sink that discards every event
impl AnalyticsSink for () {
    fn emit(&self, _event: &Event) {}
}
