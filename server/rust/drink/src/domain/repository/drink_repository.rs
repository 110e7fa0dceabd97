use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entity::drink::Drink;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DrinkRepository: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Drink>>;
    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Drink>>;
    async fn create(&self, drink: &Drink) -> anyhow::Result<()>;
    async fn update(&self, drink: &Drink) -> anyhow::Result<()>;
    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool>;
    async fn exists_by_title(&self, title: &str) -> anyhow::Result<bool>;
}
