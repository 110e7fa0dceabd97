use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repository::DrinkRepository;

#[derive(Debug, thiserror::Error)]
pub enum DeleteDrinkError {
    #[error("drink not found: {0}")]
    NotFound(Uuid),

    #[error("internal error: {0}")]
    Internal(String),
}

pub struct DeleteDrinkUseCase {
    repo: Arc<dyn DrinkRepository>,
}

impl DeleteDrinkUseCase {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: &Uuid) -> Result<(), DeleteDrinkError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| DeleteDrinkError::Internal(e.to_string()))?;

        if !deleted {
            return Err(DeleteDrinkError::NotFound(*id));
        }

        Ok(())
    }
}
