use std::sync::Arc;

use crate::domain::entity::drink::{Drink, RecipeIngredient};
use crate::domain::repository::DrinkRepository;

#[derive(Debug, Clone)]
pub struct CreateDrinkInput {
    pub title: String,
    pub recipe: Vec<RecipeIngredient>,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateDrinkError {
    #[error("drink already exists: {0}")]
    AlreadyExists(String),

    #[error("title must not be empty")]
    EmptyTitle,

    #[error("recipe must not be empty")]
    EmptyRecipe,

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct CreateDrinkUseCase {
    repo: Arc<dyn DrinkRepository>,
}

impl CreateDrinkUseCase {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, input: &CreateDrinkInput) -> Result<Drink, CreateDrinkError> {
        if input.title.trim().is_empty() {
            return Err(CreateDrinkError::EmptyTitle);
        }

        if input.recipe.is_empty() {
            return Err(CreateDrinkError::EmptyRecipe);
        }

        let exists = self
            .repo
            .exists_by_title(&input.title)
            .await
            .map_err(|e| CreateDrinkError::Internal(e.to_string()))?;

        if exists {
            return Err(CreateDrinkError::AlreadyExists(input.title.clone()));
        }

        let drink = Drink::new(input.title.clone(), input.recipe.clone());

        self.repo
            .create(&drink)
            .await
            .map_err(|e| CreateDrinkError::Internal(e.to_string()))?;

        Ok(drink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::drink_repository::MockDrinkRepository;

    fn water() -> RecipeIngredient {
        RecipeIngredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1,
        }
    }

    #[tokio::test]
    async fn success() {
        let mut mock = MockDrinkRepository::new();
        mock.expect_exists_by_title()
            .withf(|title| title == "Americano")
            .returning(|_| Ok(false));
        mock.expect_create().returning(|_| Ok(()));

        let uc = CreateDrinkUseCase::new(Arc::new(mock));
        let input = CreateDrinkInput {
            title: "Americano".to_string(),
            recipe: vec![water()],
        };
        let result = uc.execute(&input).await;
        assert!(result.is_ok());

        let drink = result.unwrap();
        assert_eq!(drink.title, "Americano");
        assert_eq!(drink.recipe.len(), 1);
        assert_eq!(drink.recipe[0].name, "water");
    }

    #[tokio::test]
    async fn already_exists() {
        let mut mock = MockDrinkRepository::new();
        mock.expect_exists_by_title()
            .withf(|title| title == "Americano")
            .returning(|_| Ok(true));

        let uc = CreateDrinkUseCase::new(Arc::new(mock));
        let input = CreateDrinkInput {
            title: "Americano".to_string(),
            recipe: vec![water()],
        };
        let result = uc.execute(&input).await;

        match result.unwrap_err() {
            CreateDrinkError::AlreadyExists(title) => assert_eq!(title, "Americano"),
            e => unreachable!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn empty_title() {
        let mock = MockDrinkRepository::new();

        let uc = CreateDrinkUseCase::new(Arc::new(mock));
        let input = CreateDrinkInput {
            title: "  ".to_string(),
            recipe: vec![water()],
        };
        let result = uc.execute(&input).await;

        match result.unwrap_err() {
            CreateDrinkError::EmptyTitle => {}
            e => unreachable!("unexpected error: {:?}", e),
        }
    }

    #[tokio::test]
    async fn empty_recipe() {
        let mock = MockDrinkRepository::new();

        let uc = CreateDrinkUseCase::new(Arc::new(mock));
        let input = CreateDrinkInput {
            title: "Americano".to_string(),
            recipe: vec![],
        };
        let result = uc.execute(&input).await;

        match result.unwrap_err() {
            CreateDrinkError::EmptyRecipe => {}
            e => unreachable!("unexpected error: {:?}", e),
        }
    }
}
