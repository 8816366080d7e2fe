//! Valorant reference-data store.
//!
//! Five entity types ([`models`]) behind one repository contract
//! ([`repository`]) with three interchangeable backends:
//!
//! - [`file`]: whole-collection bincode blobs, one per entity type
//! - [`sql`]: hand-written statements over a `sqlx` SQLite pool
//! - [`orm`]: sea-orm entities over the same pool and schema
//!
//! [`factory::RepositoryFactory`] picks one from an [`config::AppConfig`].

pub mod config;
pub mod error;
pub mod factory;
pub mod file;
pub mod models;
pub mod orm;
pub mod repository;
pub mod sql;


pub use config::{AppConfig, Backend};
pub use error::{RepoResult, RepositoryError};
pub use factory::{Relations, Repositories, RepositoryFactory};
pub use models::{Agent, Entity, Id, Map, Match, Player, Weapon};
