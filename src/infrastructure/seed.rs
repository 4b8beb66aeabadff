use sea_orm::sea_query::OnConflict;
use sea_orm::*;

use crate::models::{device, device_category};
use crate::utils::time::{self, format_timestamp};

/// (name, daily late rate in cents, damage fee in cents)
const DEMO_CATEGORIES: [(&str, i64, i64); 3] = [
    ("Laptop", 500, 15000),
    ("Tablet", 200, 8000),
    ("Camera Kit", 350, 12000),
];

/// (name, TISID, category name)
const DEMO_DEVICES: [(&str, &str, &str); 5] = [
    ("ThinkPad T14", "TIS-0001", "Laptop"),
    ("ThinkPad T14", "TIS-0002", "Laptop"),
    ("iPad Air", "TIS-0101", "Tablet"),
    ("Galaxy Tab S9", "TIS-0102", "Tablet"),
    ("Canon EOS R50 Kit", "TIS-0201", "Camera Kit"),
];

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let now = format_timestamp(time::now());

    // 1. Categories
    for (name, rate, fee) in DEMO_CATEGORIES {
        let category = device_category::ActiveModel {
            name: Set(name.to_owned()),
            daily_late_rate_cents: Set(rate),
            damage_fee_cents: Set(fee),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        device_category::Entity::insert(category)
            .on_conflict(
                OnConflict::column(device_category::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    // 2. Devices
    for (name, tis_id, category_name) in DEMO_DEVICES {
        let Some(category) = device_category::Entity::find()
            .filter(device_category::Column::Name.eq(category_name))
            .one(db)
            .await?
        else {
            tracing::warn!("Seed category '{}' missing, skipping {}", category_name, tis_id);
            continue;
        };

        let device = device::ActiveModel {
            name: Set(name.to_owned()),
            tis_id: Set(tis_id.to_owned()),
            category_id: Set(category.id),
            details: Set(None),
            notes: Set(Some("Demo device".to_owned())),
            status: Set("available".to_owned()),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        device::Entity::insert(device)
            .on_conflict(
                OnConflict::column(device::Column::TisId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;
    }

    Ok(())
}
