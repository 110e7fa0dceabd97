use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entity::drink::{Drink, RecipeIngredient};
use crate::domain::repository::DrinkRepository;

/// title と recipe はどちらも省略可能。省略されたフィールドは現在値を維持する。
#[derive(Debug, Clone)]
pub struct UpdateDrinkInput {
    pub id: Uuid,
    pub title: Option<String>,
    pub recipe: Option<Vec<RecipeIngredient>>,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateDrinkError {
    #[error("drink not found: {0}")]
    NotFound(Uuid),

    #[error("no fields to update")]
    NoFields,

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct UpdateDrinkUseCase {
    repo: Arc<dyn DrinkRepository>,
}

impl UpdateDrinkUseCase {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: &UpdateDrinkInput) -> Result<Drink, UpdateDrinkError> {
        if input.title.is_none() && input.recipe.is_none() {
            return Err(UpdateDrinkError::NoFields);
        }

        if let Some(ref title) = input.title {
            if title.trim().is_empty() {
                return Err(UpdateDrinkError::EmptyTitle);
            }
        }

        let mut drink = self
            .repo
            .find_by_id(&input.id)
            .await
            .map_err(|e| UpdateDrinkError::Internal(e.to_string()))?
            .ok_or(UpdateDrinkError::NotFound(input.id))?;

        if let Some(ref title) = input.title {
            drink.title = title.clone();
        }
        if let Some(ref recipe) = input.recipe {
            drink.recipe = recipe.clone();
        }
        drink.updated_at = Utc::now();

        self.repo
            .update(&drink)
            .await
            .map_err(|e| UpdateDrinkError::Internal(e.to_string()))?;

        Ok(drink)
    }
}
