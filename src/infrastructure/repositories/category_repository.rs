//! SeaORM implementation of CategoryRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{Category, CategoryRepository, DomainError};
use crate::models::device_category::{Column, Entity as CategoryEntity};

/// SeaORM-based implementation of CategoryRepository
pub struct SeaOrmCategoryRepository {
    db: DatabaseConnection,
}

impl SeaOrmCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        CategoryEntity::find()
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Category>, DomainError> {
        CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(Category::try_from)
            .transpose()
    }
}
