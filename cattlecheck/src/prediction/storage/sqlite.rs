use sqlx::{Pool, QueryBuilder, Sqlite, types::Json};

use crate::prediction::{
    config::DB_TABLE_REPORTS,
    errors::ReportError,
    types::{PredictionReport, ReportFilter},
};
use crate::storage::validate_sqlite_table_schema;

pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), ReportError> {
    let table_name = DB_TABLE_REPORTS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            report_id TEXT PRIMARY KEY NOT NULL,
            user_id TEXT NOT NULL,
            user_name TEXT NOT NULL,
            status TEXT NOT NULL,
            disease_name TEXT NOT NULL,
            stage TEXT NOT NULL,
            confidence REAL NOT NULL,
            precautions TEXT NOT NULL,
            recommendations TEXT NOT NULL,
            image_ref TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        r#"
        CREATE INDEX IF NOT EXISTS idx_{table_name}_user_created
        ON {table_name} (user_id, created_at)
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_report_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), ReportError> {
    let table_name = DB_TABLE_REPORTS.as_str();

    let expected_columns = [
        ("report_id", "TEXT"),
        ("user_id", "TEXT"),
        ("user_name", "TEXT"),
        ("status", "TEXT"),
        ("disease_name", "TEXT"),
        ("stage", "TEXT"),
        ("confidence", "REAL"),
        ("precautions", "TEXT"),
        ("recommendations", "TEXT"),
        ("image_ref", "TEXT"),
        ("created_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, ReportError::Storage).await
}

pub(super) async fn insert_report_sqlite(
    pool: &Pool<Sqlite>,
    report: &PredictionReport,
) -> Result<(), ReportError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_REPORTS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name}
            (report_id, user_id, user_name, status, disease_name, stage, confidence,
             precautions, recommendations, image_ref, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#
    ))
    .bind(&report.report_id)
    .bind(&report.user_id)
    .bind(&report.user_name)
    .bind(report.status.as_str())
    .bind(&report.disease_name)
    .bind(&report.stage)
    .bind(report.confidence)
    .bind(Json(&report.precautions))
    .bind(Json(&report.recommendations))
    .bind(&report.image_ref)
    .bind(report.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn list_reports_for_user_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
) -> Result<Vec<PredictionReport>, ReportError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_REPORTS.as_str();

    let reports = sqlx::query_as::<_, PredictionReport>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE user_id = ?
        ORDER BY created_at DESC, report_id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(reports)
}

pub(super) async fn get_report_for_user_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
    report_id: &str,
) -> Result<Option<PredictionReport>, ReportError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_REPORTS.as_str();

    let report = sqlx::query_as::<_, PredictionReport>(&format!(
        r#"
        SELECT * FROM {table_name}
        WHERE report_id = ? AND user_id = ?
        "#
    ))
    .bind(report_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(report)
}

pub(super) async fn delete_report_for_user_sqlite(
    pool: &Pool<Sqlite>,
    user_id: &str,
    report_id: &str,
) -> Result<u64, ReportError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_REPORTS.as_str();

    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name}
        WHERE report_id = ? AND user_id = ?
        "#
    ))
    .bind(report_id)
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

fn push_filter_sqlite(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ReportFilter) {
    builder.push(" WHERE 1 = 1");
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(disease) = &filter.disease_name {
        builder.push(" AND disease_name = ").push_bind(disease.clone());
    }
}

pub(super) async fn list_reports_page_sqlite(
    pool: &Pool<Sqlite>,
    filter: &ReportFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<PredictionReport>, i64), ReportError> {
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_REPORTS.as_str();

    let mut count_query = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {table_name}"));
    push_filter_sqlite(&mut count_query, filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(pool).await?;

    let mut page_query = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {table_name}"));
    push_filter_sqlite(&mut page_query, filter);
    page_query
        .push(" ORDER BY created_at DESC, report_id DESC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    let reports = page_query
        .build_query_as::<PredictionReport>()
        .fetch_all(pool)
        .await?;

    Ok((reports, total))
}
