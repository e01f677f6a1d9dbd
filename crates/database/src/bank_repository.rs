use crate::error::{DbError, violation_kind};
use core_types::{Bank, BankUpdate, NewBank};
use sqlx::error::ErrorKind;
use sqlx::{Any, AnyPool, Executor};

/// Data access for the `banks` table.
#[derive(Debug, Clone)]
pub struct BankRepository {
    pool: AnyPool,
}

impl BankRepository {
    /// Creates a new `BankRepository` with a shared database connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Inserts a bank under the caller-chosen id.
    ///
    /// Fails with `Conflict` when the id is already taken, whether the pre-check
    /// sees it or the primary key rejects a concurrent insert.
    pub async fn create(&self, bank: &NewBank) -> Result<Bank, DbError> {
        if bank_exists(&self.pool, bank.id).await? {
            return Err(duplicate_id(bank.id));
        }

        let created = sqlx::query_as::<_, Bank>(
            "INSERT INTO banks (id, name) VALUES ($1, $2) RETURNING id, name",
        )
        .bind(bank.id)
        .bind(&bank.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match violation_kind(&e) {
            Some(ErrorKind::UniqueViolation) => duplicate_id(bank.id),
            _ => e.into(),
        })?;

        tracing::debug!(bank_id = created.id, "Bank created");
        Ok(created)
    }

    /// Fetches every bank, ordered by id. There is no pagination.
    pub async fn list(&self) -> Result<Vec<Bank>, DbError> {
        let banks = sqlx::query_as::<_, Bank>("SELECT id, name FROM banks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(banks)
    }

    pub async fn get(&self, id: i64) -> Result<Bank, DbError> {
        sqlx::query_as::<_, Bank>("SELECT id, name FROM banks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(bank_not_found)
    }

    /// Replaces the name of an existing bank.
    pub async fn update(&self, id: i64, update: &BankUpdate) -> Result<Bank, DbError> {
        if !bank_exists(&self.pool, id).await? {
            return Err(bank_not_found());
        }

        // The row may have been deleted since the check; no row back means the same thing.
        let updated = sqlx::query_as::<_, Bank>(
            "UPDATE banks SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&update.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(bank_not_found)?;

        tracing::debug!(bank_id = id, "Bank renamed");
        Ok(updated)
    }

    /// Deletes a bank that no branch references any more.
    ///
    /// Deletion is restricted: while branches point at the bank the call fails
    /// with `Conflict` and nothing is removed.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        if !bank_exists(&self.pool, id).await? {
            return Err(bank_not_found());
        }

        let dependents: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM branches WHERE bank_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if dependents > 0 {
            return Err(still_referenced(id));
        }

        let result = sqlx::query("DELETE FROM banks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| match violation_kind(&e) {
                Some(ErrorKind::ForeignKeyViolation) => still_referenced(id),
                _ => e.into(),
            })?;

        if result.rows_affected() == 0 {
            return Err(bank_not_found());
        }

        tracing::debug!(bank_id = id, "Bank deleted");
        Ok(())
    }
}

/// Lookup shared by both repositories; the branch side uses it for foreign key
/// pre-checks, possibly inside a transaction.
pub(crate) async fn bank_exists<'e, E>(executor: E, id: i64) -> Result<bool, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM banks WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

fn bank_not_found() -> DbError {
    DbError::NotFound("Bank not found".to_string())
}

fn duplicate_id(id: i64) -> DbError {
    DbError::Conflict(format!("Bank with ID {id} already exists"))
}

fn still_referenced(id: i64) -> DbError {
    DbError::Conflict(format!("Bank with ID {id} still has branches"))
}
