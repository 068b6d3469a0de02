//! ONGAMES — casino-style lobby core: the scripted onboarding funnel, the
//! ambient decoration feeds, and the Pit Boss chat assistant.

pub mod assistant;
pub mod config;
pub mod error;
pub mod lobby;
pub mod player;
pub mod sequencer;
pub mod terminal;
pub mod ticker;
