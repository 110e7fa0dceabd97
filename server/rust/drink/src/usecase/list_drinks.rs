use std::sync::Arc;

use crate::domain::entity::drink::Drink;
use crate::domain::repository::DrinkRepository;

#[derive(Debug, thiserror::Error)]
pub enum ListDrinksError {
    #[error("internal error: {0}")]
    Internal(String),
}

pub struct ListDrinksUseCase {
    repo: Arc<dyn DrinkRepository>,
}

impl ListDrinksUseCase {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> Result<Vec<Drink>, ListDrinksError> {
        self.repo
            .find_all()
            .await
            .map_err(|e| ListDrinksError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::drink::RecipeIngredient;
    use crate::domain::repository::drink_repository::MockDrinkRepository;

    #[tokio::test]
    async fn success() {
        let mut mock = MockDrinkRepository::new();
        let drinks = vec![
            Drink::new(
                "Matcha Latte".to_string(),
                vec![RecipeIngredient {
                    name: "matcha".to_string(),
                    color: "green".to_string(),
                    parts: 1,
                }],
            ),
            Drink::new("Flat White".to_string(), vec![]),
        ];
        let returned = drinks.clone();

        mock.expect_find_all().returning(move || Ok(returned.clone()));

        let uc = ListDrinksUseCase::new(Arc::new(mock));
        let result = uc.execute().await.unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].title, "Matcha Latte");
    }

    #[tokio::test]
    async fn repository_failure() {
        let mut mock = MockDrinkRepository::new();
        mock.expect_find_all()
            .returning(|| Err(anyhow::anyhow!("connection refused")));

        let uc = ListDrinksUseCase::new(Arc::new(mock));
        let result = uc.execute().await;

        match result.unwrap_err() {
            ListDrinksError::Internal(msg) => assert!(msg.contains("connection refused")),
        }
    }
}
