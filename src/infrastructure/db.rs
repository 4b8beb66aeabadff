use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    tracing::debug!("Database ready at {}", database_url);
    Ok(db)
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        sql.to_owned(),
    ))
    .await?;
    Ok(())
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Categories carry the penalty schedule; money is stored in cents
    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS device_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            daily_late_rate_cents INTEGER NOT NULL DEFAULT 0 CHECK (daily_late_rate_cents >= 0),
            damage_fee_cents INTEGER NOT NULL DEFAULT 0 CHECK (damage_fee_cents >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS devices (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            tis_id TEXT NOT NULL UNIQUE,
            category_id INTEGER NOT NULL,
            details TEXT,
            notes TEXT,
            status TEXT NOT NULL DEFAULT 'available',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (category_id) REFERENCES device_categories(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_devices_status ON devices(status)",
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_devices_category ON devices(category_id)",
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS loans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id INTEGER NOT NULL,
            category_name TEXT NOT NULL,
            device_name TEXT NOT NULL,
            due_date TEXT NOT NULL,
            check_in_date TEXT,
            notes TEXT,
            return_flag INTEGER NOT NULL DEFAULT 0,
            penalty_cents INTEGER NOT NULL DEFAULT 0 CHECK (penalty_cents >= 0),
            damaged_penalty_cents INTEGER NOT NULL DEFAULT 0 CHECK (damaged_penalty_cents >= 0),
            deduction_cents INTEGER NOT NULL DEFAULT 0 CHECK (deduction_cents >= 0),
            daily_late_rate_cents INTEGER NOT NULL DEFAULT 0,
            comments TEXT,
            course_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (device_id) REFERENCES devices(id) ON DELETE RESTRICT
        )
        "#,
    )
    .await?;

    // At most one open loan per device
    execute(
        db,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_loans_open_device ON loans(device_id) WHERE check_in_date IS NULL",
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_loans_due_date ON loans(due_date)",
    )
    .await?;

    execute(
        db,
        r#"
        CREATE TABLE IF NOT EXISTS loan_details (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            loan_id INTEGER NOT NULL UNIQUE,
            patron_id TEXT NOT NULL,
            check_out_date TEXT NOT NULL,
            notes TEXT,
            late INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (loan_id) REFERENCES loans(id) ON DELETE CASCADE
        )
        "#,
    )
    .await?;

    execute(
        db,
        "CREATE INDEX IF NOT EXISTS idx_loan_details_patron ON loan_details(patron_id)",
    )
    .await?;

    Ok(())
}
