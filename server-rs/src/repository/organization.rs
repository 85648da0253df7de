//! SQLite implementation of [`OrganizationRepository`].

use chrono::{DateTime, Duration, Utc};
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::OrganizationRepository;
use crate::error::{AppError, AppResult};
use crate::models::{Organization, OrganizationStats};

const COLUMNS: &str = "id, name, email, license, active, created_at, updated_at";

/// Runs every query on one borrowed connection, i.e. one working session.
pub struct SqlOrganizationRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SqlOrganizationRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    async fn find_where_active(&mut self, active: bool) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization WHERE active = ? ORDER BY created_at"
        ))
        .bind(active)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    async fn count(&mut self, sql: &str, value: Option<&str>) -> AppResult<i64> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        if let Some(value) = value {
            query = query.bind(value.to_string());
        }
        Ok(query.fetch_one(&mut *self.conn).await?)
    }
}

// LIKE treats % and _ as wildcards; the search term is a literal substring.
// Case folding happens in SQL so both sides are lowered by the same rules.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn write_error(err: sqlx::Error) -> AppError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateName,
        other => AppError::Database(other),
    }
}

impl OrganizationRepository for SqlOrganizationRepository<'_> {
    async fn find_all(&mut self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization ORDER BY created_at"
        ))
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&mut self, id: Uuid) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn find_active(&mut self) -> AppResult<Vec<Organization>> {
        self.find_where_active(true).await
    }

    async fn find_inactive(&mut self) -> AppResult<Vec<Organization>> {
        self.find_where_active(false).await
    }

    async fn find_by_name_containing(&mut self, term: &str) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, Organization>(&format!(
            r"SELECT {COLUMNS} FROM organization
            WHERE LOWER(name) LIKE LOWER(?) ESCAPE '\'
            ORDER BY created_at"
        ))
        .bind(like_pattern(term))
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows)
    }

    async fn find_by_email(&mut self, email: &str) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization WHERE email = ? ORDER BY created_at LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn find_by_license(&mut self, license: &str) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization WHERE license = ? ORDER BY created_at LIMIT 1"
        ))
        .bind(license)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row)
    }

    async fn exists_by_name(&mut self, name: &str) -> AppResult<bool> {
        let count = self
            .count("SELECT COUNT(*) FROM organization WHERE name = ?", Some(name))
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&mut self, email: &str) -> AppResult<bool> {
        let count = self
            .count("SELECT COUNT(*) FROM organization WHERE email = ?", Some(email))
            .await?;
        Ok(count > 0)
    }

    async fn get_stats(&mut self) -> AppResult<OrganizationStats> {
        let total = self.count("SELECT COUNT(*) FROM organization", None).await?;
        let active = self
            .count("SELECT COUNT(*) FROM organization WHERE active = 1", None)
            .await?;
        Ok(OrganizationStats::from_counts(total, active))
    }

    async fn find_created_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<Organization>> {
        // julianday() keeps only milliseconds; widen the SQL window and apply
        // the exact bounds on the decoded timestamps.
        let slack = Duration::seconds(1);
        let rows = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {COLUMNS} FROM organization
            WHERE julianday(created_at) BETWEEN julianday(?) AND julianday(?)
            ORDER BY created_at"
        ))
        .bind(start - slack)
        .bind(end + slack)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows
            .into_iter()
            .filter(|o| o.created_at >= start && o.created_at <= end)
            .collect())
    }

    async fn insert(&mut self, organization: &Organization) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO organization ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(organization.id)
        .bind(&organization.name)
        .bind(&organization.email)
        .bind(&organization.license)
        .bind(organization.active)
        .bind(organization.created_at)
        .bind(organization.updated_at)
        .execute(&mut *self.conn)
        .await
        .map_err(write_error)?;
        Ok(())
    }

    async fn update(&mut self, organization: &Organization) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE organization
            SET name = ?, email = ?, license = ?, active = ?, updated_at = ?
            WHERE id = ?",
        )
        .bind(&organization.name)
        .bind(&organization.email)
        .bind(&organization.license)
        .bind(organization.active)
        .bind(organization.updated_at)
        .bind(organization.id)
        .execute(&mut *self.conn)
        .await
        .map_err(write_error)?;
        Ok(result.rows_affected() > 0)
    }
}
