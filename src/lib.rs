//! # Impostor Game Library
//!
//! This library provides the core game logic for a local "find the
//! impostor" party game played on a single shared device. It handles the
//! player roster, secret word and role assignment, the sequential
//! private-reveal protocol, turn-order selection, and results.
//!
//! Rendering, analytics delivery, and persistence are external concerns:
//! the presentation layer drives a [`game::Game`] through its methods,
//! implements [`analytics::AnalyticsSink`] for event delivery, and runs
//! the timers requested through [`game::AlarmMessage`] scheduling.

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod game;
pub mod reveal;
pub mod roster;

pub use analytics::{AnalyticsSink, Event};
pub use catalog::{Category, HintPool, WordCatalog};
pub use config::RoundConfig;
pub use game::{AlarmMessage, Direction, ErrorMessage, Game, State};
pub use reveal::{RevealView, RoleCard};
pub use roster::{Id, Player, Roster};
