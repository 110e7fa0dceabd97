use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entity::drink::Drink;
use crate::domain::repository::DrinkRepository;

#[derive(Debug, thiserror::Error)]
pub enum GetDrinkError {
    #[error("drink not found: {0}")]
    NotFound(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct GetDrinkUseCase {
    repo: Arc<dyn DrinkRepository>,
}

impl GetDrinkUseCase {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &Uuid) -> Result<Drink, GetDrinkError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(|e| GetDrinkError::Internal(e.to_string()))?
            .ok_or(GetDrinkError::NotFound(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repository::drink_repository::MockDrinkRepository;

    #[tokio::test]
    async fn found() {
        let mut mock = MockDrinkRepository::new();
        let drink = Drink::new("Espresso".to_string(), vec![]);
        let id = drink.id;
        let returned = drink.clone();

        mock.expect_find_by_id()
            .withf(move |got| *got == id)
            .returning(move |_| Ok(Some(returned.clone())));

        let uc = GetDrinkUseCase::new(Arc::new(mock));
        let result = uc.execute(&id).await.unwrap();
        assert_eq!(result.title, "Espresso");
    }

    #[tokio::test]
    async fn not_found() {
        let mut mock = MockDrinkRepository::new();
        mock.expect_find_by_id().returning(|_| Ok(None));

        let uc = GetDrinkUseCase::new(Arc::new(mock));
        let id = Uuid::new_v4();
        let result = uc.execute(&id).await;

        match result.unwrap_err() {
            GetDrinkError::NotFound(got) => assert_eq!(got, id),
            e => unreachable!("unexpected error: {:?}", e),
        }
    }
}
