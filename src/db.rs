use std::path::Path;

use anyhow::Context;
use serde_json::Value;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{AchievementRecord, TargetRecord};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[derive(Debug, serde::Deserialize)]
struct ProjectionRow {
    bd_id: Option<String>,
    bd_name: Option<String>,
    target_val: Option<String>,
    proj_val: Option<String>,
    proj_date: Option<String>,
    source_key: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct InquiryRow {
    bd_id: Option<String>,
    bd_name: Option<String>,
    regis_val: Option<String>,
    regis_date: Option<String>,
    proj_val: Option<String>,
    reg_date: Option<String>,
    source_key: Option<String>,
}

async fn insert_projection(pool: &PgPool, row: &ProjectionRow) -> anyhow::Result<bool> {
    let source_key = row
        .source_key
        .clone()
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

    let result = sqlx::query(
        r#"
        INSERT INTO bd_rollup.projections
        (id, bd_id, bd_name, target_val, proj_val, proj_date, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&row.bd_id)
    .bind(&row.bd_name)
    .bind(&row.target_val)
    .bind(&row.proj_val)
    .bind(&row.proj_date)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_inquiry(pool: &PgPool, row: &InquiryRow) -> anyhow::Result<bool> {
    let source_key = row
        .source_key
        .clone()
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

    let result = sqlx::query(
        r#"
        INSERT INTO bd_rollup.inquiries
        (id, bd_id, bd_name, regis_val, regis_date, proj_val, reg_date, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&row.bd_id)
    .bind(&row.bd_name)
    .bind(&row.regis_val)
    .bind(&row.regis_date)
    .bind(&row.proj_val)
    .bind(&row.reg_date)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let projections = vec![
        (
            "seed-p-001",
            "bd-101",
            "Avery Lee",
            "120000",
            "135000",
            "2025-01-06",
        ),
        (
            "seed-p-002",
            "bd-101",
            "Avery Lee",
            "110000",
            "118000",
            "2025-02-03",
        ),
        (
            "seed-p-003",
            "bd-102",
            "Jules Moreno",
            "90000",
            "80000",
            "2025-01-13",
        ),
        (
            "seed-p-004",
            "bd-102",
            "Jules Moreno",
            "95000",
            "99000",
            "2025-02-10",
        ),
        (
            "seed-p-005",
            "bd-103",
            "Kiara Patel",
            "0",
            "40000",
            "2025-02-17",
        ),
    ];

    for (source_key, bd_id, bd_name, target_val, proj_val, proj_date) in projections {
        insert_projection(
            pool,
            &ProjectionRow {
                bd_id: text(bd_id),
                bd_name: text(bd_name),
                target_val: text(target_val),
                proj_val: text(proj_val),
                proj_date: text(proj_date),
                source_key: text(source_key),
            },
        )
        .await?;
    }

    let inquiries = vec![
        (
            "seed-i-001",
            "bd-101",
            "Avery Lee",
            Some("125000"),
            Some("2025-01-28"),
            None,
            "2025-01-09",
        ),
        (
            "seed-i-002",
            "bd-101",
            "Avery Lee",
            None,
            None,
            Some("60000"),
            "2025-02-12",
        ),
        (
            "seed-i-003",
            "bd-102",
            "Jules Moreno",
            Some("45000"),
            Some("Feb 21, 2025"),
            None,
            "2025-01-30",
        ),
        (
            "seed-i-004",
            "bd-102",
            "Jules Moreno",
            Some("pending"),
            None,
            None,
            "2025-02-14",
        ),
        (
            "seed-i-005",
            "bd-103",
            "Kiara Patel",
            Some("12500"),
            Some("2025-02-25"),
            None,
            "2025-02-18",
        ),
    ];

    for (source_key, bd_id, bd_name, regis_val, regis_date, proj_val, reg_date) in inquiries {
        insert_inquiry(
            pool,
            &InquiryRow {
                bd_id: text(bd_id),
                bd_name: text(bd_name),
                regis_val: regis_val.map(str::to_string),
                regis_date: regis_date.map(str::to_string),
                proj_val: proj_val.map(str::to_string),
                reg_date: text(reg_date),
                source_key: text(source_key),
            },
        )
        .await?;
    }

    Ok(())
}

fn raw(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

pub async fn fetch_targets(pool: &PgPool) -> anyhow::Result<Vec<TargetRecord>> {
    let rows = sqlx::query(
        "SELECT bd_id, bd_name, target_val, proj_val, proj_date \
         FROM bd_rollup.projections \
         ORDER BY created_at, source_key",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch projections")?;

    let mut targets = Vec::with_capacity(rows.len());
    for row in rows {
        targets.push(TargetRecord {
            salesperson_id: raw(row.try_get("bd_id")?),
            salesperson_name: raw(row.try_get("bd_name")?),
            target_amount: raw(row.try_get("target_val")?),
            projected_amount: raw(row.try_get("proj_val")?),
            projection_date: raw(row.try_get("proj_date")?),
        });
    }

    Ok(targets)
}

pub async fn fetch_achievements(pool: &PgPool) -> anyhow::Result<Vec<AchievementRecord>> {
    let rows = sqlx::query(
        "SELECT bd_id, bd_name, regis_val, regis_date, proj_val, reg_date \
         FROM bd_rollup.inquiries \
         ORDER BY created_at, source_key",
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch inquiries")?;

    let mut achievements = Vec::with_capacity(rows.len());
    for row in rows {
        achievements.push(AchievementRecord {
            salesperson_id: raw(row.try_get("bd_id")?),
            salesperson_name: raw(row.try_get("bd_name")?),
            registered_amount: raw(row.try_get("regis_val")?),
            registration_date: raw(row.try_get("regis_date")?),
            inquiry_projected_amount: raw(row.try_get("proj_val")?),
            inquiry_date: raw(row.try_get("reg_date")?),
        });
    }

    Ok(achievements)
}

/// Loads both record streams at once.
pub async fn fetch_records(
    pool: &PgPool,
) -> anyhow::Result<(Vec<TargetRecord>, Vec<AchievementRecord>)> {
    let (targets, achievements) = tokio::try_join!(fetch_targets(pool), fetch_achievements(pool))?;
    tracing::info!(
        targets = targets.len(),
        achievements = achievements.len(),
        "fetched records from postgres"
    );
    Ok((targets, achievements))
}

pub async fn import_projections(pool: &PgPool, csv_path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<ProjectionRow>() {
        let row = result?;
        if insert_projection(pool, &row).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}

pub async fn import_inquiries(pool: &PgPool, csv_path: &Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<InquiryRow>() {
        let row = result?;
        if insert_inquiry(pool, &row).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}
