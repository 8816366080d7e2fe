//! sea-orm entity definitions mirroring `migrations/001_initial_schema.sql`.
//!
//! Column names are spelled out because the schema uses upper-case
//! identifiers. `game_match` is named to avoid the `match` keyword.

pub mod agent;
pub mod game_match;
pub mod map;
pub mod match_player;
pub mod player;
pub mod weapon;
