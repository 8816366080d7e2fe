//! SQLite-backed repository implementations using hand-written statements.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and multiple concurrent readers.
//! - **Foreign keys enabled**: `PLAYER.AGENT_ID` / `PLAYER.WEAPON_ID` are
//!   nulled and `MATCH_PLAYER` rows cascade when the referenced row goes.
//! - **Embedded migrations**: `sqlx::migrate!` runs
//!   `migrations/001_initial_schema.sql` when the database is opened.
//!
//! ## Repository types
//!
//! Each `Sql*Repository` holds a `SqlitePool` clone:
//!
//! | Type | Trait |
//! |------|-------|
//! | [`SqlAgentRepository`] | `AgentRepository` |
//! | [`SqlMapRepository`] | `MapRepository` |
//! | [`SqlMatchRepository`] | `MatchRepository` |
//! | [`SqlPlayerRepository`] | `PlayerRepository` |
//! | [`SqlWeaponRepository`] | `WeaponRepository` |
//! | [`SqlMatchPlayerRepository`] | `MatchPlayerRepository` |
//! | [`SqlPlayerAgentRepository`] | `PlayerAgentRepository` |
//! | [`SqlPlayerWeaponRepository`] | `PlayerWeaponRepository` |
//!
//! `save` with `id <= 0` inserts and reads back `last_insert_rowid()`; a
//! positive id is written with `INSERT .. ON CONFLICT DO UPDATE` so saving
//! an unknown id creates that row.

mod agent_repo;
mod database;
mod map_repo;
mod match_repo;
mod player_repo;
mod relations;
mod weapon_repo;

pub use agent_repo::SqlAgentRepository;
pub use database::Database;
pub use map_repo::SqlMapRepository;
pub use match_repo::SqlMatchRepository;
pub use player_repo::SqlPlayerRepository;
pub use relations::{SqlMatchPlayerRepository, SqlPlayerAgentRepository, SqlPlayerWeaponRepository};
pub use weapon_repo::SqlWeaponRepository;
