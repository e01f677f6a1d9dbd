use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{Path, State},
};
use core_types::{
    Bank, BankUpdate, Branch, BranchChanges, CityBranch, Deleted, NewBank, NewBranch,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// # GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Welcome to the Bank API" }))
}

// ==============================================================================
// Banks
// ==============================================================================

/// # POST /api/v1/banks/
pub async fn create_bank(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewBank>,
) -> Result<Json<Bank>, AppError> {
    payload.validate()?;
    let bank = state.banks.create(&payload).await?;
    Ok(Json(bank))
}

/// # GET /api/v1/banks/
pub async fn list_banks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Bank>>, AppError> {
    let banks = state.banks.list().await?;
    Ok(Json(banks))
}

/// # GET /api/v1/banks/:bank_id
pub async fn get_bank(
    Path(bank_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Bank>, AppError> {
    let bank = state.banks.get(bank_id).await?;
    Ok(Json(bank))
}

/// # PUT /api/v1/banks/:bank_id
/// The path id is authoritative; an `id` in the body is ignored.
pub async fn update_bank(
    Path(bank_id): Path<i64>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BankUpdate>,
) -> Result<Json<Bank>, AppError> {
    payload.validate()?;
    let bank = state.banks.update(bank_id, &payload).await?;
    Ok(Json(bank))
}

/// # DELETE /api/v1/banks/:bank_id
pub async fn delete_bank(
    Path(bank_id): Path<i64>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Deleted>, AppError> {
    state.banks.delete(bank_id).await?;
    Ok(Json(Deleted::new("Bank deleted")))
}

// ==============================================================================
// Branches
// ==============================================================================

/// # POST /api/v1/branches/
pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewBranch>,
) -> Result<Json<Branch>, AppError> {
    payload.validate()?;
    let branch = state.branches.create(&payload).await?;
    Ok(Json(branch))
}

/// # GET /api/v1/branches/
pub async fn list_branches(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Branch>>, AppError> {
    let branches = state.branches.list().await?;
    Ok(Json(branches))
}

/// # GET /api/v1/branches/:ifsc
pub async fn get_branch(
    Path(ifsc): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Branch>, AppError> {
    let branch = state.branches.get(&ifsc).await?;
    Ok(Json(branch))
}

/// # PUT /api/v1/branches/:ifsc
pub async fn update_branch(
    Path(ifsc): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BranchChanges>,
) -> Result<Json<Branch>, AppError> {
    let branch = state.branches.update(&ifsc, &payload).await?;
    Ok(Json(branch))
}

/// # DELETE /api/v1/branches/:ifsc
pub async fn delete_branch(
    Path(ifsc): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Deleted>, AppError> {
    state.branches.delete(&ifsc).await?;
    Ok(Json(Deleted::new("Branch deleted")))
}

/// # GET /api/v1/branches/city/:city/:bank_id
/// Answers 404 rather than an empty list when nothing matches.
pub async fn get_branches_by_city(
    Path((city, bank_id)): Path<(String, i64)>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityBranch>>, AppError> {
    let rows = state.branches.list_by_city_and_bank(&city, bank_id).await?;
    Ok(Json(rows))
}
