//! Assets repository for database operations

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use super::{like_pattern, maintenance::insert_record, map_unique_violation, AssetStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        asset::{Asset, AssetQuery, CreateAsset, UpdateAsset},
        enums::AssetStatus,
        maintenance::NewMaintenance,
    },
};

const DUPLICATE_SERIAL: &str = "Serial number already exists in the system";

#[derive(Clone)]
pub struct AssetsRepository {
    pool: Pool<Postgres>,
}

impl AssetsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for AssetsRepository {
    async fn list(&self, query: &AssetQuery) -> AppResult<Vec<Asset>> {
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(like_pattern(search));
            let idx = params.len();
            conditions.push(format!(
                "(name ILIKE ${idx} OR serial_number ILIKE ${idx} OR model ILIKE ${idx})"
            ));
        }

        if let Some(status) = query.status {
            params.push(status.as_str().to_string());
            conditions.push(format!("status = ${}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let select_query = format!(
            "SELECT * FROM assets {} ORDER BY created_at DESC, id DESC",
            where_clause
        );
        tracing::debug!("Listing assets: {}", select_query);

        let mut builder = sqlx::query_as::<_, Asset>(&select_query);
        for param in &params {
            builder = builder.bind(param);
        }
        Ok(builder.fetch_all(&self.pool).await?)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))
    }

    async fn serial_exists(&self, serial: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM assets
                WHERE serial_number = $1 AND ($2::int IS NULL OR id != $2)
            )
            "#,
        )
        .bind(serial)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn create(&self, data: &CreateAsset) -> AppResult<Asset> {
        sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (
                name, asset_type, serial_number, brand, model, specifications,
                purchase_date, purchase_price, current_value, status, location, assigned_to
            )
            VALUES ($1, $2, NULLIF($3, ''), $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.asset_type)
        .bind(&data.serial_number)
        .bind(&data.brand)
        .bind(&data.model)
        .bind(&data.specifications)
        .bind(data.purchase_date)
        .bind(data.purchase_price.unwrap_or(Decimal::ZERO))
        .bind(data.current_value.unwrap_or(Decimal::ZERO))
        .bind(data.status.unwrap_or_default())
        .bind(&data.location)
        .bind(&data.assigned_to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, DUPLICATE_SERIAL))
    }

    async fn update(&self, id: i32, data: &UpdateAsset) -> AppResult<Asset> {
        let now = Utc::now();
        let mut sets = vec!["updated_at = $1".to_string()];
        let mut idx = 2;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        // Optional text: an empty string stores NULL
        macro_rules! add_text {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = NULLIF(${}, '')", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.name, "name");
        add_field!(data.asset_type, "asset_type");
        add_text!(data.serial_number, "serial_number");
        add_text!(data.brand, "brand");
        add_text!(data.model, "model");
        add_text!(data.specifications, "specifications");
        add_field!(data.purchase_date, "purchase_date");
        add_field!(data.purchase_price, "purchase_price");
        add_field!(data.current_value, "current_value");
        add_field!(data.status, "status");
        add_text!(data.location, "location");
        add_text!(data.assigned_to, "assigned_to");

        let query = format!(
            "UPDATE assets SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Asset>(&query).bind(now);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.name);
        bind_field!(data.asset_type);
        bind_field!(data.serial_number);
        bind_field!(data.brand);
        bind_field!(data.model);
        bind_field!(data.specifications);
        bind_field!(data.purchase_date);
        bind_field!(data.purchase_price);
        bind_field!(data.current_value);
        bind_field!(data.status);
        bind_field!(data.location);
        bind_field!(data.assigned_to);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, DUPLICATE_SERIAL))?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Asset {} not found", id)));
        }
        Ok(())
    }

    async fn set_status(&self, id: i32, status: AssetStatus, log: &NewMaintenance) -> AppResult<Asset> {
        let mut tx = self.pool.begin().await?;

        let asset = sqlx::query_as::<_, Asset>(
            "UPDATE assets SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", id)))?;

        insert_record(&mut *tx, log).await?;
        tx.commit().await?;

        Ok(asset)
    }
}
