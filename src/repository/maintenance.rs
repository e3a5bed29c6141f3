//! Maintenance log repository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, Pool, Postgres, QueryBuilder};

use super::MaintenanceStore;
use crate::{
    error::{AppError, AppResult},
    lifecycle,
    models::{
        enums::AssetStatus,
        maintenance::{
            MaintenanceEntry, MaintenanceOutcome, MaintenanceQuery, MaintenanceRecord,
            MaintenanceStats, NewMaintenance, UpdateMaintenance,
        },
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Insert a maintenance record on an existing connection or transaction
pub(super) async fn insert_record(
    conn: &mut PgConnection,
    data: &NewMaintenance,
) -> AppResult<MaintenanceRecord> {
    let record = sqlx::query_as::<_, MaintenanceRecord>(
        r#"
        INSERT INTO maintenance_records (
            asset_id, maintenance_date, maintenance_type, description,
            cost, performed_by, next_maintenance_date
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(data.asset_id)
    .bind(data.maintenance_date)
    .bind(data.maintenance_type)
    .bind(&data.description)
    .bind(data.cost)
    .bind(&data.performed_by)
    .bind(data.next_maintenance_date)
    .fetch_one(&mut *conn)
    .await?;
    Ok(record)
}

#[async_trait]
impl MaintenanceStore for MaintenanceRepository {
    async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceEntry>> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT mr.*, a.name AS asset_name, a.serial_number, a.status AS asset_status
            FROM maintenance_records mr
            JOIN assets a ON mr.asset_id = a.id
            WHERE 1 = 1
            "#,
        );

        if let Some(asset_id) = query.asset_id {
            builder.push(" AND mr.asset_id = ").push_bind(asset_id);
        }
        if let Some(kind) = query.maintenance_type {
            builder.push(" AND mr.maintenance_type = ").push_bind(kind);
        }
        if let Some(from) = query.date_from {
            builder.push(" AND mr.maintenance_date >= ").push_bind(from);
        }
        if let Some(to) = query.date_to {
            builder.push(" AND mr.maintenance_date <= ").push_bind(to);
        }
        builder.push(" ORDER BY mr.maintenance_date DESC, mr.created_at DESC, mr.id DESC");

        let entries = builder
            .build_query_as::<MaintenanceEntry>()
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }

    async fn records(&self, asset_id: Option<i32>) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            SELECT * FROM maintenance_records
            WHERE ($1::int IS NULL OR asset_id = $1)
            ORDER BY maintenance_date DESC, created_at DESC, id DESC
            "#,
        )
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<MaintenanceRecord> {
        sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    async fn record(&self, data: &NewMaintenance) -> AppResult<MaintenanceOutcome> {
        let mut tx = self.pool.begin().await?;

        // Lock the asset so concurrent submissions see each other's status
        let (asset_name, previous_status) = sqlx::query_as::<_, (String, AssetStatus)>(
            "SELECT name, status FROM assets WHERE id = $1 FOR UPDATE",
        )
        .bind(data.asset_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Selected asset not found".to_string()))?;

        let new_status =
            lifecycle::next_status(previous_status, data.maintenance_type, data.new_asset_status);

        let record = insert_record(&mut *tx, data).await?;

        sqlx::query(
            r#"
            UPDATE assets
            SET status = $1, last_maintenance = $2, next_maintenance = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(new_status)
        .bind(data.maintenance_date)
        .bind(data.next_maintenance_date)
        .bind(Utc::now())
        .bind(data.asset_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MaintenanceOutcome {
            record,
            asset_name,
            previous_status,
            new_status,
        })
    }

    async fn update(&self, id: i32, data: &UpdateMaintenance) -> AppResult<MaintenanceRecord> {
        if data.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE maintenance_records SET ");
        let mut sets = builder.separated(", ");

        if let Some(date) = data.maintenance_date {
            sets.push("maintenance_date = ").push_bind_unseparated(date);
        }
        if let Some(kind) = data.maintenance_type {
            sets.push("maintenance_type = ").push_bind_unseparated(kind);
        }
        if let Some(ref description) = data.description {
            sets.push("description = NULLIF(")
                .push_bind_unseparated(description.clone())
                .push_unseparated(", '')");
        }
        if let Some(cost) = data.cost {
            sets.push("cost = ").push_bind_unseparated(cost);
        }
        if let Some(ref performed_by) = data.performed_by {
            sets.push("performed_by = NULLIF(")
                .push_bind_unseparated(performed_by.clone())
                .push_unseparated(", '')");
        }
        match data.next_maintenance_date {
            Some(next) => {
                sets.push("next_maintenance_date = ").push_bind_unseparated(next);
            }
            None if data.clear_next_maintenance_date => {
                sets.push("next_maintenance_date = NULL");
            }
            None => {}
        }

        builder.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        builder
            .build_query_as::<MaintenanceRecord>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Maintenance record {} not found", id)));
        }
        Ok(())
    }

    async fn stats(&self, upcoming_until: NaiveDate) -> AppResult<MaintenanceStats> {
        let (total_records, total_cost): (i64, Decimal) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(cost), 0) FROM maintenance_records",
        )
        .fetch_one(&self.pool)
        .await?;

        let upcoming_maintenance: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM assets
            WHERE next_maintenance IS NOT NULL AND next_maintenance <= $1
            "#,
        )
        .bind(upcoming_until)
        .fetch_one(&self.pool)
        .await?;

        let assets_under_maintenance: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM assets WHERE status = $1")
                .bind(AssetStatus::UnderMaintenance)
                .fetch_one(&self.pool)
                .await?;

        Ok(MaintenanceStats {
            total_records,
            total_cost,
            upcoming_maintenance,
            assets_under_maintenance,
        })
    }
}
