//! Path-segment request routing.
//!
//! The first segment picks the controller by exact name; the method and
//! the number of remaining segments pick the operation:
//!
//! | Method | Segments | Operation |
//! |--------|----------|-----------|
//! | POST | `/{entity}` | create |
//! | GET | `/{entity}` | list |
//! | GET | `/{entity}/{id}` | read |
//! | PUT | `/{entity}/{id}` | update |
//! | DELETE | `/{entity}/{id}` | delete |
//! | any | `/{entity}/{id}/..` | relationship route |
//!
//! Anything else is a 404.

use std::collections::HashMap;

use http::{Method, StatusCode};
use valorant_store::Repositories;

use crate::controllers::{
    AgentController, Controller, MapController, MatchController, PlayerController,
    RelationController, WeaponController,
};
use crate::error::{ServiceError, ServiceResult};
use crate::protocol::{Request, Response};

pub struct Router {
    controllers: HashMap<&'static str, Box<dyn Controller>>,
    relations: RelationController,
}

impl Router {
    pub fn new(repos: &Repositories) -> Self {
        let mut controllers: HashMap<&'static str, Box<dyn Controller>> = HashMap::new();
        controllers.insert("agent", Box::new(AgentController::new(repos.agents.clone())));
        controllers.insert("map", Box::new(MapController::new(repos.maps.clone())));
        controllers.insert("match", Box::new(MatchController::new(repos.matches.clone())));
        controllers.insert("player", Box::new(PlayerController::new(repos.players.clone())));
        controllers.insert("weapon", Box::new(WeaponController::new(repos.weapons.clone())));

        Self {
            controllers,
            relations: RelationController::new(repos),
        }
    }

    /// Route one request and render the outcome as a response.
    pub async fn route(&self, request: &Request) -> Response {
        let response = match self.dispatch(request).await {
            Ok(body) => Response::json(body),
            Err(ServiceError::NotFound(message)) => Response::text(StatusCode::NOT_FOUND, message),
            Err(err) => {
                tracing::warn!(error = %err, path = %request.path, "Request failed");
                Response::text(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };
        tracing::info!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            "Handled request"
        );
        response
    }

    async fn dispatch(&self, request: &Request) -> ServiceResult<String> {
        let segments = request.segments();
        let Some((&entity, rest)) = segments.split_first() else {
            return Err(route_not_found(request));
        };
        let Some(controller) = self.controllers.get(entity) else {
            return Err(route_not_found(request));
        };

        let method = &request.method;
        match rest {
            [] if method == Method::POST => controller.post(&request.body).await,
            [] if method == Method::GET => controller.get_all().await,
            [id] if method == Method::GET => controller.get(id).await,
            [id] if method == Method::PUT => controller.put(id, &request.body).await,
            [id] if method == Method::DELETE => controller.delete(id).await,
            [id, relation @ ..] if !relation.is_empty() => {
                self.relations.handle(method, entity, id, relation).await
            }
            _ => Err(route_not_found(request)),
        }
    }
}

fn route_not_found(request: &Request) -> ServiceError {
    ServiceError::NotFound(format!("No route for {} {}", request.method, request.path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use valorant_store::sql::Database;
    use valorant_store::{Agent, RepositoryFactory};

    fn file_router(dir: &std::path::Path) -> Router {
        Router::new(&RepositoryFactory::file(dir).unwrap())
    }

    #[tokio::test]
    async fn test_post_then_get_same_fields() {
        let dir = tempfile::tempdir().unwrap();
        let router = file_router(dir.path());

        let created = router
            .route(&Request::new(
                Method::POST,
                "/agent",
                r#"{"name":"Sova","description":"Russian hunter","role":"Initiator"}"#,
            ))
            .await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(created.content_type, "application/json");
        let sova: Agent = serde_json::from_str(&created.body).unwrap();
        assert!(sova.id > 0);

        let fetched = router
            .route(&Request::new(Method::GET, &format!("/agent/{}", sova.id), ""))
            .await;
        assert_eq!(fetched.status, StatusCode::OK);
        let fetched: Agent = serde_json::from_str(&fetched.body).unwrap();
        assert_eq!(fetched.name, "Sova");
        assert_eq!(fetched.description, "Russian hunter");
        assert_eq!(fetched.role, "Initiator");
    }

    #[tokio::test]
    async fn test_missing_entity_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = file_router(dir.path());

        let response = router.route(&Request::new(Method::GET, "/agent/9999", "")).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.content_type.starts_with("text/plain"));
    }

    #[tokio::test]
    async fn test_unknown_routes_are_404() {
        let dir = tempfile::tempdir().unwrap();
        let router = file_router(dir.path());

        for (method, path) in [
            (Method::GET, "/"),
            (Method::GET, "/agents"),
            (Method::PATCH, "/agent/1"),
            (Method::POST, "/agent/1"),
            (Method::DELETE, "/agent"),
            (Method::GET, "/player/1/agent"),
        ] {
            let response = router.route(&Request::new(method.clone(), path, "")).await;
            assert_eq!(response.status, StatusCode::NOT_FOUND, "{method} {path}");
        }
    }

    #[tokio::test]
    async fn test_bad_input_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let router = file_router(dir.path());

        let response = router.route(&Request::new(Method::GET, "/weapon/abc", "")).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.contains("abc"));

        let response = router.route(&Request::new(Method::POST, "/weapon", "{oops")).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let router = file_router(dir.path());

        for name in ["Ascent", "Bind", "Haven"] {
            let body = format!(r#"{{"name":"{name}","type":"Standard"}}"#);
            let response = router.route(&Request::new(Method::POST, "/map", &body)).await;
            assert_eq!(response.status, StatusCode::OK);
        }

        let response = router.route(&Request::new(Method::DELETE, "/map/2", "")).await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());

        let response = router.route(&Request::new(Method::GET, "/map/", "")).await;
        let names: Vec<String> = serde_json::from_str::<Vec<serde_json::Value>>(&response.body)
            .unwrap()
            .into_iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Ascent", "Haven"]);
    }

    #[tokio::test]
    async fn test_relationship_route_on_sql_backend() {
        let db = Database::new_in_memory().await.unwrap();
        let router = Router::new(&RepositoryFactory::sql(&db));

        router
            .route(&Request::new(Method::POST, "/player", r#"{"username":"tenz","displayName":"TenZ","email":"","region":"NA","rank":""}"#))
            .await;
        router
            .route(&Request::new(Method::POST, "/weapon", r#"{"name":"Sheriff","type":"Sidearm"}"#))
            .await;

        let response = router
            .route(&Request::new(Method::PUT, "/player/1/weapon/1", ""))
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let response = router
            .route(&Request::new(Method::GET, "/player/1/weapon", ""))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("Sheriff"));
    }
}
