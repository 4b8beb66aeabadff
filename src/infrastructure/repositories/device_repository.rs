//! SeaORM implementation of DeviceRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{Device, DeviceFilter, DeviceRepository, DomainError};
use crate::models::device::{Column, Entity as DeviceEntity, Model};
use crate::models::device_category::{Entity as CategoryEntity, Model as CategoryModel};

/// SeaORM-based implementation of DeviceRepository
pub struct SeaOrmDeviceRepository {
    db: DatabaseConnection,
}

impl SeaOrmDeviceRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_device((device, category): (Model, Option<CategoryModel>)) -> Result<Device, DomainError> {
    let mut result = Device::try_from(device)?;
    result.category_name = category.map(|c| c.name);
    Ok(result)
}

#[async_trait]
impl DeviceRepository for SeaOrmDeviceRepository {
    async fn find_all(&self, filter: DeviceFilter) -> Result<Vec<Device>, DomainError> {
        let mut condition = Condition::all();

        if let Some(status) = filter.status {
            condition = condition.add(Column::Status.eq(status.as_str()));
        }

        if let Some(category_id) = filter.category_id {
            condition = condition.add(Column::CategoryId.eq(category_id));
        }

        DeviceEntity::find()
            .filter(condition)
            .order_by_asc(Column::Name)
            .find_also_related(CategoryEntity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_device)
            .collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Device>, DomainError> {
        DeviceEntity::find_by_id(id)
            .find_also_related(CategoryEntity)
            .one(&self.db)
            .await?
            .map(to_device)
            .transpose()
    }
}
