use anyhow::Context;
use chrono::Utc;
use entities::kv_entry;
use migration::MigratorTrait;
use sea_orm::{
    ActiveValue::Set, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    sea_query::OnConflict,
};

use super::{KeyValueStore, StorageError};

#[derive(Clone, Debug)]
pub struct SqliteKvStore {
    db: DatabaseConnection,
}

impl SqliteKvStore {
    /// Connect and bring the schema up to date.
    #[tracing::instrument(level = "debug")]
    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(connection_string);
        options.sqlx_logging(false);
        if connection_string.contains(":memory:") {
            // every pooled connection would otherwise get its own empty database
            options.max_connections(1).min_connections(1);
        }
        let db = Database::connect(options)
            .await
            .with_context(|| "Failed to connect to database")?;
        migration::Migrator::up(&db, None)
            .await
            .with_context(|| "Failed to run database migrations")?;
        Ok(Self { db })
    }
}

#[async_trait::async_trait]
impl KeyValueStore for SqliteKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = kv_entry::Entity::find_by_id(key.to_owned())
            .one(&self.db)
            .await?;
        Ok(row.map(|m| m.value))
    }

    #[tracing::instrument(level = "trace", skip(self, value), fields(len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let entry = kv_entry::ActiveModel {
            key: Set(key.to_owned()),
            value: Set(value.to_owned()),
            updated_at_ms: Set(Utc::now().timestamp_millis()),
        };
        kv_entry::Entity::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entry::Column::Key)
                    .update_columns([kv_entry::Column::Value, kv_entry::Column::UpdatedAtMs])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }
}
