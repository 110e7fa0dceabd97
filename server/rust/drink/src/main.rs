#![allow(dead_code, unused_imports)]

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

mod adapter;
mod domain;
mod infrastructure;
mod usecase;

use domain::entity::drink::Drink;
use domain::repository::DrinkRepository;
use infrastructure::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting drink server"
    );

    // Drink repository: PostgreSQL if DATABASE_URL or database config is set, otherwise in-memory
    let drink_repo: Arc<dyn DrinkRepository> =
        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            info!("connecting to PostgreSQL...");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(cfg.database.as_ref().map_or(25, |db| db.max_open_conns))
                .connect(&database_url)
                .await?;
            info!("connected to PostgreSQL");
            Arc::new(adapter::repository::drink_postgres::DrinkPostgresRepository::new(Arc::new(
                pool,
            )))
        } else if let Some(ref db_cfg) = cfg.database {
            info!("connecting to PostgreSQL via config...");
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(db_cfg.max_open_conns)
                .connect(&db_cfg.connection_url())
                .await?;
            info!("connected to PostgreSQL");
            Arc::new(adapter::repository::drink_postgres::DrinkPostgresRepository::new(Arc::new(
                pool,
            )))
        } else {
            info!("no database configured, using in-memory repository");
            Arc::new(InMemoryDrinkRepository::new())
        };

    // Use cases
    let list_drinks_uc = Arc::new(usecase::ListDrinksUseCase::new(drink_repo.clone()));
    let get_drink_uc = Arc::new(usecase::GetDrinkUseCase::new(drink_repo.clone()));
    let create_drink_uc = Arc::new(usecase::CreateDrinkUseCase::new(drink_repo.clone()));
    let update_drink_uc = Arc::new(usecase::UpdateDrinkUseCase::new(drink_repo.clone()));
    let delete_drink_uc = Arc::new(usecase::DeleteDrinkUseCase::new(drink_repo.clone()));

    // Token verifier (JWKS verifier if auth configured)
    let auth_state = if let Some(ref auth_cfg) = cfg.auth {
        info!(jwks_url = %auth_cfg.jwks_url, "initializing JWKS verifier for drink-server");
        let verifier = Arc::new(barista_auth::JwksVerifier::new(
            &auth_cfg.jwks_url,
            &auth_cfg.issuer,
            &auth_cfg.audience,
            std::time::Duration::from_secs(auth_cfg.jwks_cache_ttl_secs),
        )?);
        Some(barista_auth::AuthState { verifier })
    } else {
        info!("no auth configured, drink-server running without authentication");
        None
    };

    let state = adapter::handler::AppState {
        list_drinks_uc,
        get_drink_uc,
        create_drink_uc,
        update_drink_uc,
        delete_drink_uc,
        auth_state,
    };

    let app = adapter::handler::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.server.port));
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- InMemoryDrinkRepository ---

struct InMemoryDrinkRepository {
    drinks: tokio::sync::RwLock<Vec<Drink>>,
}

impl InMemoryDrinkRepository {
    fn new() -> Self {
        Self {
            drinks: tokio::sync::RwLock::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl DrinkRepository for InMemoryDrinkRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Drink>> {
        let drinks = self.drinks.read().await;
        let mut all = drinks.clone();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Drink>> {
        let drinks = self.drinks.read().await;
        Ok(drinks.iter().find(|d| d.id == *id).cloned())
    }

    async fn create(&self, drink: &Drink) -> anyhow::Result<()> {
        let mut drinks = self.drinks.write().await;
        drinks.push(drink.clone());
        Ok(())
    }

    async fn update(&self, drink: &Drink) -> anyhow::Result<()> {
        let mut drinks = self.drinks.write().await;
        match drinks.iter_mut().find(|d| d.id == drink.id) {
            Some(existing) => {
                *existing = drink.clone();
                Ok(())
            }
            None => Err(anyhow::anyhow!("drink not found: {}", drink.id)),
        }
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool> {
        let mut drinks = self.drinks.write().await;
        let before = drinks.len();
        drinks.retain(|d| d.id != *id);
        Ok(drinks.len() < before)
    }

    async fn exists_by_title(&self, title: &str) -> anyhow::Result<bool> {
        let drinks = self.drinks.read().await;
        Ok(drinks.iter().any(|d| d.title == title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::drink::RecipeIngredient;

    #[tokio::test]
    async fn in_memory_repository_crud() {
        let repo = InMemoryDrinkRepository::new();

        let drink = Drink::new(
            "Latte".to_string(),
            vec![RecipeIngredient {
                name: "milk".to_string(),
                color: "white".to_string(),
                parts: 3,
            }],
        );

        repo.create(&drink).await.unwrap();
        assert!(repo.exists_by_title("Latte").await.unwrap());

        let found = repo.find_by_id(&drink.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Latte");

        let mut updated = drink.clone();
        updated.title = "Oat Latte".to_string();
        repo.update(&updated).await.unwrap();
        let found = repo.find_by_id(&drink.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Oat Latte");

        assert!(repo.delete(&drink.id).await.unwrap());
        assert!(!repo.delete(&drink.id).await.unwrap());
        assert!(repo.find_by_id(&drink.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn in_memory_repository_sorts_by_title() {
        let repo = InMemoryDrinkRepository::new();

        repo.create(&Drink::new("Mocha".to_string(), vec![]))
            .await
            .unwrap();
        repo.create(&Drink::new("Americano".to_string(), vec![]))
            .await
            .unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all[0].title, "Americano");
        assert_eq!(all[1].title, "Mocha");
    }
}
