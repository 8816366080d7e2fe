//! Per-entity submenu: create, update, delete, view and list.

use std::marker::PhantomData;
use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite};
use valorant_store::repository::Repository;
use valorant_store::{Entity, Id};

use crate::console::Console;
use crate::error::BackOfficeError;
use crate::forms::{parse_id, Form};

pub struct EntityManager<V, R: ?Sized> {
    repo: Arc<R>,
    _entity: PhantomData<fn() -> V>,
}

impl<V, R> EntityManager<V, R>
where
    V: Form,
    R: Repository<Id, V> + ?Sized,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            _entity: PhantomData,
        }
    }

    /// Run the submenu until `back`.
    ///
    /// Input and repository failures are reported and the menu continues;
    /// I/O failures and end of input are returned to the caller.
    pub async fn run<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        loop {
            self.show_menu(console).await?;
            let command = console.expect_line().await?;

            let outcome = match command.as_str() {
                "1" => self.create(console).await,
                "2" => self.update(console).await,
                "3" => self.delete(console).await,
                "4" => self.view(console).await,
                "5" => self.list(console).await,
                c if c.eq_ignore_ascii_case("back") => {
                    console.println("Returning to main menu...").await?;
                    return Ok(());
                }
                _ => console.println("Invalid command").await,
            };

            match outcome {
                Ok(()) => {}
                Err(e @ (BackOfficeError::Input(_) | BackOfficeError::Repository(_))) => {
                    tracing::warn!(entity = V::NAME, error = %e, "Operation rejected");
                    console.println(&e.to_string()).await?;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn show_menu<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        let name = V::NAME;
        console.println(&format!("1. Create {name}")).await?;
        console.println(&format!("2. Update {name}")).await?;
        console.println(&format!("3. Delete {name}")).await?;
        console.println(&format!("4. View {name}")).await?;
        console.println(&format!("5. List {}", V::PLURAL)).await?;
        console.println("Type 'back' to return to the main menu").await
    }

    async fn create<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        console.println(&format!("Creating a new {}", V::NAME)).await?;
        let mut entity = V::default();
        for (index, field) in V::FIELDS.iter().enumerate() {
            let text = match field.hint {
                Some(hint) => format!("Enter {} ({hint}): ", field.label),
                None => format!("Enter {}: ", field.label),
            };
            let answer = console.prompt(&text).await?;
            entity.set_value(index, &answer)?;
        }
        self.repo.save(&mut entity).await?;
        tracing::info!(entity = V::NAME, id = entity.id(), "Created");
        console.println(&format!("{} created successfully", V::NAME)).await
    }

    async fn update<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        let Some(mut entity) = self.find(console, "update").await? else {
            return Ok(());
        };
        for (index, field) in V::FIELDS.iter().enumerate() {
            let text = format!(
                "Enter new {} (current: {}): ",
                field.label,
                entity.value(index)
            );
            let answer = console.prompt(&text).await?;
            if !answer.is_empty() {
                entity.set_value(index, &answer)?;
            }
        }
        self.repo.save(&mut entity).await?;
        tracing::info!(entity = V::NAME, id = entity.id(), "Updated");
        console.println(&format!("{} updated successfully", V::NAME)).await
    }

    async fn delete<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        let Some(entity) = self.find(console, "delete").await? else {
            return Ok(());
        };
        self.repo.delete(&entity).await?;
        tracing::info!(entity = V::NAME, id = entity.id(), "Deleted");
        console.println(&format!("{} deleted successfully", V::NAME)).await
    }

    async fn view<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        let Some(entity) = self.find(console, "view").await? else {
            return Ok(());
        };
        for line in entity.describe() {
            console.println(&line).await?;
        }
        Ok(())
    }

    async fn list<In, Out>(&self, console: &mut Console<In, Out>) -> Result<(), BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        console
            .println(&format!("Listing all {}", V::PLURAL.to_lowercase()))
            .await?;
        let mut all = self.repo.get_all().await?;
        all.sort_by_key(|entity| entity.id());
        for entity in all {
            for line in entity.describe() {
                console.println(&line).await?;
            }
            console.println("----").await?;
        }
        Ok(())
    }

    /// Prompt for an id and load it, printing `<Entity> not found` when
    /// there is nothing stored under it.
    async fn find<In, Out>(
        &self,
        console: &mut Console<In, Out>,
        action: &str,
    ) -> Result<Option<V>, BackOfficeError>
    where
        In: AsyncBufRead + Unpin,
        Out: AsyncWrite + Unpin,
    {
        let answer = console
            .prompt(&format!("Enter {} ID to {action}: ", V::NAME))
            .await?;
        let id = parse_id(&answer)?;
        let found = self.repo.get(id).await?;
        if found.is_none() {
            console.println(&format!("{} not found", V::NAME)).await?;
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valorant_store::repository::AgentRepository;
    use valorant_store::{Agent, RepositoryFactory};

    async fn run_script(repo: Arc<dyn AgentRepository>, script: &str) -> (String, bool) {
        let manager = EntityManager::<Agent, dyn AgentRepository>::new(repo);
        let mut console = Console::new(script.as_bytes(), Vec::new());
        let finished = manager.run(&mut console).await.is_ok();
        (String::from_utf8(console.into_output()).unwrap(), finished)
    }

    #[tokio::test]
    async fn test_create_then_view() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::file(dir.path()).unwrap();

        let (output, finished) = run_script(
            repos.agents.clone(),
            "1\nJett\nWind-walker\nDuelist\n4\n1\nback\n",
        )
        .await;

        assert!(finished);
        assert!(output.contains("Creating a new Agent"));
        assert!(output.contains("Enter Agent Name: "));
        assert!(output.contains("Agent created successfully"));
        assert!(output.contains("Agent ID: 1\nAgent Name: Jett\nAgent Description: Wind-walker\nAgent Role: Duelist\n"));
        assert!(output.ends_with("Returning to main menu...\n"));
    }

    #[tokio::test]
    async fn test_update_keeps_blank_answers() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::file(dir.path()).unwrap();
        let mut sage = Agent {
            name: "Sage".to_string(),
            description: "Healer".to_string(),
            role: "Sentinel".to_string(),
            ..Agent::default()
        };
        repos.agents.save(&mut sage).await.unwrap();

        let (output, _) = run_script(repos.agents.clone(), "2\n1\n\nMonk\n\nback\n").await;

        assert!(output.contains("Enter new Agent Name (current: Sage): "));
        assert!(output.contains("Agent updated successfully"));
        let stored = repos.agents.get(1).await.unwrap().unwrap();
        assert_eq!(stored.name, "Sage");
        assert_eq!(stored.description, "Monk");
        assert_eq!(stored.role, "Sentinel");
    }

    #[tokio::test]
    async fn test_not_found_and_invalid_input_keep_menu_running() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::file(dir.path()).unwrap();

        let (output, finished) =
            run_script(repos.agents.clone(), "3\n42\n4\nabc\n9\nBACK\n").await;

        assert!(finished);
        assert!(output.contains("Agent not found"));
        assert!(output.contains("Invalid input: 'abc' is not a valid id"));
        assert!(output.contains("Invalid command"));
    }

    #[tokio::test]
    async fn test_list_sorted_with_separators() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::file(dir.path()).unwrap();
        for (id, name) in [(3, "Omen"), (1, "Viper")] {
            let mut agent = Agent {
                id,
                name: name.to_string(),
                ..Agent::default()
            };
            repos.agents.save(&mut agent).await.unwrap();
        }

        let (output, _) = run_script(repos.agents.clone(), "5\nback\n").await;

        let viper = output.find("Agent Name: Viper").unwrap();
        let omen = output.find("Agent Name: Omen").unwrap();
        assert!(viper < omen);
        assert_eq!(output.matches("----\n").count(), 2);
    }

    #[tokio::test]
    async fn test_end_of_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let repos = RepositoryFactory::file(dir.path()).unwrap();

        let manager = EntityManager::<Agent, dyn AgentRepository>::new(repos.agents.clone());
        let mut console = Console::new("1\nJett\n".as_bytes(), Vec::new());
        assert!(matches!(
            manager.run(&mut console).await,
            Err(BackOfficeError::EndOfInput)
        ));
        assert!(repos.agents.get_all().await.unwrap().is_empty());
    }
}
