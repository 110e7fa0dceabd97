use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    pub color: String,
    pub parts: i32,
}

#[derive(Debug, Clone)]
pub struct Drink {
    pub id: Uuid,
    pub title: String,
    pub recipe: Vec<RecipeIngredient>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drink {
    pub fn new(title: String, recipe: Vec<RecipeIngredient>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            recipe,
            created_at: now,
            updated_at: now,
        }
    }
}
