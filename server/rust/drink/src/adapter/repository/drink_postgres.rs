use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::drink::{Drink, RecipeIngredient};
use crate::domain::repository::DrinkRepository;

/// DrinkPostgresRepository は PostgreSQL を使ったドリンクリポジトリ。
pub struct DrinkPostgresRepository {
    pool: Arc<PgPool>,
}

impl DrinkPostgresRepository {
    /// 新しい DrinkPostgresRepository を作成する。
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// PostgreSQL の行をマッピングするための内部構造体。
/// recipe は JSON 文字列のままテキストカラムに保存される。
#[derive(sqlx::FromRow)]
struct DrinkRow {
    id: Uuid,
    title: String,
    recipe: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DrinkRow> for Drink {
    fn from(row: DrinkRow) -> Self {
        let recipe: Vec<RecipeIngredient> =
            serde_json::from_str(&row.recipe).unwrap_or_default();
        Drink {
            id: row.id,
            title: row.title,
            recipe,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl DrinkRepository for DrinkPostgresRepository {
    async fn find_all(&self) -> anyhow::Result<Vec<Drink>> {
        let rows: Vec<DrinkRow> = sqlx::query_as(
            "SELECT id, title, recipe, created_at, updated_at \
             FROM drink.drinks ORDER BY title",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> anyhow::Result<Option<Drink>> {
        let row: Option<DrinkRow> = sqlx::query_as(
            "SELECT id, title, recipe, created_at, updated_at \
             FROM drink.drinks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Into::into))
    }

    async fn create(&self, drink: &Drink) -> anyhow::Result<()> {
        let recipe_json = serde_json::to_string(&drink.recipe)?;

        sqlx::query(
            "INSERT INTO drink.drinks (id, title, recipe, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(drink.id)
        .bind(&drink.title)
        .bind(&recipe_json)
        .bind(drink.created_at)
        .bind(drink.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update(&self, drink: &Drink) -> anyhow::Result<()> {
        let recipe_json = serde_json::to_string(&drink.recipe)?;

        let result = sqlx::query(
            "UPDATE drink.drinks \
             SET title = $2, recipe = $3, updated_at = $4 \
             WHERE id = $1",
        )
        .bind(drink.id)
        .bind(&drink.title)
        .bind(&recipe_json)
        .bind(drink.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("drink not found: {}", drink.id));
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM drink.drinks WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_title(&self, title: &str) -> anyhow::Result<bool> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM drink.drinks WHERE title = $1")
                .bind(title)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(count.0 > 0)
    }
}
