//! Object-relational repository implementations built on sea-orm.
//!
//! The ORM shares the schema and the `sqlx` pool opened by
//! [`crate::sql::Database`]; [`connect`] wraps that pool in a
//! `DatabaseConnection`. Every repository method runs inside its own
//! transaction: writes through `transaction()`, which commits on success and
//! rolls back on error, reads through `begin()`/`commit()` once the rows are
//! materialised. A read that bails out early drops its transaction, which
//! rolls it back.

pub mod entities;
mod mapping;

mod agent_repo;
mod map_repo;
mod match_repo;
mod player_repo;
mod relations;
mod weapon_repo;

pub use agent_repo::OrmAgentRepository;
pub use map_repo::OrmMapRepository;
pub use match_repo::OrmMatchRepository;
pub use player_repo::OrmPlayerRepository;
pub use relations::{OrmMatchPlayerRepository, OrmPlayerAgentRepository, OrmPlayerWeaponRepository};
pub use weapon_repo::OrmWeaponRepository;

use sea_orm::{DatabaseConnection, SqlxSqliteConnector};

use crate::sql::Database;

/// Wrap the shared SQLite pool in a sea-orm connection.
pub fn connect(database: &Database) -> DatabaseConnection {
    SqlxSqliteConnector::from_sqlx_sqlite_pool(database.pool().clone())
}
