//! Top-level menu dispatching to one [`EntityManager`] per entity type.

use tokio::io::{AsyncBufRead, AsyncWrite};
use valorant_store::repository::{
    AgentRepository, MapRepository, MatchRepository, PlayerRepository, WeaponRepository,
};
use valorant_store::{Agent, Map, Match, Player, Repositories, Weapon};

use crate::console::Console;
use crate::error::BackOfficeError;
use crate::manager::EntityManager;

pub struct BackOffice {
    agents: EntityManager<Agent, dyn AgentRepository>,
    maps: EntityManager<Map, dyn MapRepository>,
    matches: EntityManager<Match, dyn MatchRepository>,
    players: EntityManager<Player, dyn PlayerRepository>,
    weapons: EntityManager<Weapon, dyn WeaponRepository>,
}

impl BackOffice {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            agents: EntityManager::new(repos.agents.clone()),
            maps: EntityManager::new(repos.maps.clone()),
            matches: EntityManager::new(repos.matches.clone()),
            players: EntityManager::new(repos.players.clone()),
            weapons: EntityManager::new(repos.weapons.clone()),
        }
    }

    /// Main loop. Returns once the user types `exit` or input runs out.
    pub async fn run<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        console
            .println("Select a menu option or type exit to exit the application")
            .await?;

        match self.main_loop(console).await {
            Ok(()) | Err(BackOfficeError::EndOfInput) => console.println("Bye!").await,
            Err(e) => Err(e),
        }
    }

    async fn main_loop<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        loop {
            console.println("1. Manage Agents").await?;
            console.println("2. Manage Maps").await?;
            console.println("3. Manage Matches").await?;
            console.println("4. Manage Players").await?;
            console.println("5. Manage Weapons").await?;
            console.println("Type 'exit' to exit the application").await?;

            let Some(command) = console.read_line().await? else {
                return Ok(());
            };
            match command.as_str() {
                "1" => self.agents.run(console).await?,
                "2" => self.maps.run(console).await?,
                "3" => self.matches.run(console).await?,
                "4" => self.players.run(console).await?,
                "5" => self.weapons.run(console).await?,
                c if c.eq_ignore_ascii_case("exit") => return Ok(()),
                other => {
                    tracing::debug!(command = other, "Unknown main menu command");
                    console.println("Invalid command").await?;
                }
            }
        }
    }
}
