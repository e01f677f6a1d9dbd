use crate::bank_repository::bank_exists;
use crate::error::{DbError, violation_kind};
use core_types::{Branch, BranchChanges, CityBranch, NewBranch};
use sqlx::error::ErrorKind;
use sqlx::{Any, AnyPool, Executor};

const SELECT_BRANCH: &str = "SELECT ifsc, bank_id, bank_name, branch, address, city, district, state \
     FROM bank_branches";

/// Data access for branches.
///
/// Writes go to the `branches` table; every read, including the record returned
/// after a write, goes through the `bank_branches` view.
#[derive(Debug, Clone)]
pub struct BranchRepository {
    pool: AnyPool,
}

impl BranchRepository {
    /// Creates a new `BranchRepository` with a shared database connection pool.
    pub fn new(pool: AnyPool) -> Self {
        Self { pool }
    }

    /// Inserts a branch and returns it with its bank's name resolved.
    ///
    /// `Conflict` if the IFSC is taken, `InvalidReference` if the bank is missing.
    /// The insert and the read-back share a transaction, so `bank_name` is the
    /// name at the moment of the write.
    pub async fn create(&self, branch: &NewBranch) -> Result<Branch, DbError> {
        if branch_exists(&self.pool, &branch.ifsc).await? {
            return Err(duplicate_ifsc(&branch.ifsc));
        }
        if !bank_exists(&self.pool, branch.bank_id).await? {
            return Err(missing_bank(branch.bank_id));
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO branches (ifsc, bank_id, branch, address, city, district, state) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&branch.ifsc)
        .bind(branch.bank_id)
        .bind(&branch.branch)
        .bind(&branch.address)
        .bind(&branch.city)
        .bind(&branch.district)
        .bind(&branch.state)
        .execute(&mut *tx)
        .await
        .map_err(|e| match violation_kind(&e) {
            Some(ErrorKind::UniqueViolation) => duplicate_ifsc(&branch.ifsc),
            Some(ErrorKind::ForeignKeyViolation) => missing_bank(branch.bank_id),
            _ => e.into(),
        })?;

        let created = find_branch(&mut *tx, &branch.ifsc).await?.ok_or_else(branch_not_found)?;
        tx.commit().await?;

        tracing::debug!(ifsc = %created.ifsc, bank_id = created.bank_id, "Branch created");
        Ok(created)
    }

    /// Fetches every row of the join view, ordered by IFSC. Empty is not an error here.
    pub async fn list(&self) -> Result<Vec<Branch>, DbError> {
        let branches = sqlx::query_as::<_, Branch>(&format!("{SELECT_BRANCH} ORDER BY ifsc"))
            .fetch_all(&self.pool)
            .await?;
        Ok(branches)
    }

    pub async fn get(&self, ifsc: &str) -> Result<Branch, DbError> {
        find_branch(&self.pool, ifsc).await?.ok_or_else(branch_not_found)
    }

    /// Replaces every mutable field of a branch. The IFSC itself never changes.
    ///
    /// `NotFound` if the branch is missing, `InvalidReference` if the (possibly
    /// new) bank is.
    pub async fn update(&self, ifsc: &str, changes: &BranchChanges) -> Result<Branch, DbError> {
        if !branch_exists(&self.pool, ifsc).await? {
            return Err(branch_not_found());
        }
        if !bank_exists(&self.pool, changes.bank_id).await? {
            return Err(missing_bank(changes.bank_id));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE branches \
             SET bank_id = $1, branch = $2, address = $3, city = $4, district = $5, state = $6 \
             WHERE ifsc = $7",
        )
        .bind(changes.bank_id)
        .bind(&changes.branch)
        .bind(&changes.address)
        .bind(&changes.city)
        .bind(&changes.district)
        .bind(&changes.state)
        .bind(ifsc)
        .execute(&mut *tx)
        .await
        .map_err(|e| match violation_kind(&e) {
            Some(ErrorKind::ForeignKeyViolation) => missing_bank(changes.bank_id),
            _ => e.into(),
        })?;

        if result.rows_affected() == 0 {
            return Err(branch_not_found());
        }

        let updated = find_branch(&mut *tx, ifsc).await?.ok_or_else(branch_not_found)?;
        tx.commit().await?;

        tracing::debug!(ifsc, bank_id = updated.bank_id, "Branch updated");
        Ok(updated)
    }

    pub async fn delete(&self, ifsc: &str) -> Result<(), DbError> {
        if !branch_exists(&self.pool, ifsc).await? {
            return Err(branch_not_found());
        }

        let result = sqlx::query("DELETE FROM branches WHERE ifsc = $1")
            .bind(ifsc)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(branch_not_found());
        }

        tracing::debug!(ifsc, "Branch deleted");
        Ok(())
    }

    /// Fetches the branches of one bank in one city, matching both exactly.
    ///
    /// Unlike `list`, an empty result is reported as `NotFound`: the caller named
    /// a specific city and bank and nothing answers to them.
    pub async fn list_by_city_and_bank(
        &self,
        city: &str,
        bank_id: i64,
    ) -> Result<Vec<CityBranch>, DbError> {
        let rows = sqlx::query_as::<_, CityBranch>(
            "SELECT bank_name, ifsc, branch, city FROM bank_branches \
             WHERE city = $1 AND bank_id = $2 \
             ORDER BY ifsc",
        )
        .bind(city)
        .bind(bank_id)
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Err(DbError::NotFound(
                "No branches found for the given city and bank ID".to_string(),
            ));
        }
        Ok(rows)
    }
}

async fn find_branch<'e, E>(executor: E, ifsc: &str) -> Result<Option<Branch>, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let branch = sqlx::query_as::<_, Branch>(&format!("{SELECT_BRANCH} WHERE ifsc = $1"))
        .bind(ifsc)
        .fetch_optional(executor)
        .await?;
    Ok(branch)
}

async fn branch_exists<'e, E>(executor: E, ifsc: &str) -> Result<bool, DbError>
where
    E: Executor<'e, Database = Any>,
{
    let found: Option<String> = sqlx::query_scalar("SELECT ifsc FROM branches WHERE ifsc = $1")
        .bind(ifsc)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

fn branch_not_found() -> DbError {
    DbError::NotFound("Branch not found".to_string())
}

fn duplicate_ifsc(ifsc: &str) -> DbError {
    DbError::Conflict(format!("Branch with IFSC {ifsc} already exists"))
}

fn missing_bank(bank_id: i64) -> DbError {
    DbError::InvalidReference(format!("Bank with ID {bank_id} does not exist"))
}
