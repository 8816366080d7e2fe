//! Backend selection.
//!
//! [`RepositoryFactory::build`] reads the configured [`Backend`] and
//! constructs the matching repository family. The front ends only ever see
//! the resulting trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::config::{AppConfig, Backend};
use crate::error::RepoResult;
use crate::file::{
    FileAgentRepository, FileMapRepository, FileMatchRepository, FilePlayerRepository,
    FileWeaponRepository, AGENTS_FILE, MAPS_FILE, MATCHES_FILE, PLAYERS_FILE, WEAPONS_FILE,
};
use crate::orm::{
    self, OrmAgentRepository, OrmMapRepository, OrmMatchPlayerRepository, OrmMatchRepository,
    OrmPlayerAgentRepository, OrmPlayerRepository, OrmPlayerWeaponRepository, OrmWeaponRepository,
};
use crate::repository::{
    AgentRepository, MapRepository, MatchPlayerRepository, MatchRepository,
    PlayerAgentRepository, PlayerRepository, PlayerWeaponRepository, WeaponRepository,
};
use crate::sql::{
    Database, SqlAgentRepository, SqlMapRepository, SqlMatchPlayerRepository, SqlMatchRepository,
    SqlPlayerAgentRepository, SqlPlayerRepository, SqlPlayerWeaponRepository, SqlWeaponRepository,
};

/// Relationship repositories; only the relational backends provide them.
#[derive(Clone)]
pub struct Relations {
    pub match_players: Arc<dyn MatchPlayerRepository>,
    pub player_agents: Arc<dyn PlayerAgentRepository>,
    pub player_weapons: Arc<dyn PlayerWeaponRepository>,
}

/// One repository per entity, all from the same backend.
#[derive(Clone)]
pub struct Repositories {
    pub backend: Backend,
    pub agents: Arc<dyn AgentRepository>,
    pub maps: Arc<dyn MapRepository>,
    pub matches: Arc<dyn MatchRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub weapons: Arc<dyn WeaponRepository>,
    pub relations: Option<Relations>,
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    pub async fn build(config: &AppConfig) -> RepoResult<Repositories> {
        let repos = match config.backend {
            Backend::File => Self::file(&config.file.data_dir)?,
            Backend::Sql => Self::sql(&Database::connect(&config.database).await?),
            Backend::Orm => Self::orm(&Database::connect(&config.database).await?),
        };
        tracing::info!(backend = %repos.backend, "Repositories ready");
        Ok(repos)
    }

    /// File repositories under `data_dir`, one blob per entity type.
    pub fn file(data_dir: &Path) -> RepoResult<Repositories> {
        Ok(Repositories {
            backend: Backend::File,
            agents: Arc::new(FileAgentRepository::open(data_dir.join(AGENTS_FILE))?),
            maps: Arc::new(FileMapRepository::open(data_dir.join(MAPS_FILE))?),
            matches: Arc::new(FileMatchRepository::open(data_dir.join(MATCHES_FILE))?),
            players: Arc::new(FilePlayerRepository::open(data_dir.join(PLAYERS_FILE))?),
            weapons: Arc::new(FileWeaponRepository::open(data_dir.join(WEAPONS_FILE))?),
            relations: None,
        })
    }

    pub fn sql(database: &Database) -> Repositories {
        let pool = database.pool();
        Repositories {
            backend: Backend::Sql,
            agents: Arc::new(SqlAgentRepository::new(pool.clone())),
            maps: Arc::new(SqlMapRepository::new(pool.clone())),
            matches: Arc::new(SqlMatchRepository::new(pool.clone())),
            players: Arc::new(SqlPlayerRepository::new(pool.clone())),
            weapons: Arc::new(SqlWeaponRepository::new(pool.clone())),
            relations: Some(Relations {
                match_players: Arc::new(SqlMatchPlayerRepository::new(pool.clone())),
                player_agents: Arc::new(SqlPlayerAgentRepository::new(pool.clone())),
                player_weapons: Arc::new(SqlPlayerWeaponRepository::new(pool.clone())),
            }),
        }
    }

    pub fn orm(database: &Database) -> Repositories {
        let conn = orm::connect(database);
        Repositories {
            backend: Backend::Orm,
            agents: Arc::new(OrmAgentRepository::new(conn.clone())),
            maps: Arc::new(OrmMapRepository::new(conn.clone())),
            matches: Arc::new(OrmMatchRepository::new(conn.clone())),
            players: Arc::new(OrmPlayerRepository::new(conn.clone())),
            weapons: Arc::new(OrmWeaponRepository::new(conn.clone())),
            relations: Some(Relations {
                match_players: Arc::new(OrmMatchPlayerRepository::new(conn.clone())),
                player_agents: Arc::new(OrmPlayerAgentRepository::new(conn.clone())),
                player_weapons: Arc::new(OrmPlayerWeaponRepository::new(conn)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::Agent;

    fn config(backend: Backend, dir: &Path) -> AppConfig {
        AppConfig {
            backend,
            file: crate::config::FileConfig {
                data_dir: dir.join("data"),
            },
            database: DatabaseConfig {
                database: dir.join("valorant.db").display().to_string(),
                ..DatabaseConfig::default()
            },
        }
    }

    #[tokio::test]
    async fn test_file_backend_has_no_relations() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::build(&config(Backend::File, dir.path()))
            .await
            .unwrap();
        assert_eq!(repos.backend, Backend::File);
        assert!(repos.relations.is_none());

        repos.agents.save(&mut Agent::default()).await.unwrap();
        assert!(dir.path().join("data").join(AGENTS_FILE).exists());
    }

    #[tokio::test]
    async fn test_relational_backends_share_database_file() {
        let dir = tempfile::tempdir().unwrap();

        let sql = RepositoryFactory::build(&config(Backend::Sql, dir.path()))
            .await
            .unwrap();
        assert!(sql.relations.is_some());
        let mut brimstone = Agent {
            name: "Brimstone".to_string(),
            ..Agent::default()
        };
        sql.agents.save(&mut brimstone).await.unwrap();

        let orm = RepositoryFactory::build(&config(Backend::Orm, dir.path()))
            .await
            .unwrap();
        assert_eq!(orm.backend, Backend::Orm);
        assert_eq!(orm.agents.get_by_name("Brimstone").await.unwrap(), Some(brimstone));
    }

    #[tokio::test]
    async fn test_unsupported_protocol_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(Backend::Sql, dir.path());
        cfg.database.protocol = "mysql".to_string();
        assert!(RepositoryFactory::build(&cfg).await.is_err());
    }
}
