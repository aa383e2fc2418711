//! Role catalog API endpoint.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{catalog_entries, Lang, RoleCatalogEntry};
use crate::AppState;

/// Query parameters for the role catalog.
#[derive(Debug, Deserialize)]
pub struct RolesQuery {
    /// Display language for labels and descriptions (default: en).
    #[serde(default)]
    pub lang: Option<String>,
}

/// GET /api/roles - The role catalog with display metadata.
pub async fn list_roles(
    State(state): State<AppState>,
    Query(params): Query<RolesQuery>,
) -> ApiResult<Vec<RoleCatalogEntry>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let lang = match params.lang.as_deref() {
        None => Lang::default(),
        Some(tag) => match Lang::from_str(tag) {
            Some(lang) => lang,
            None => {
                return error(
                    AppError::Validation(format!("Unsupported language: {}", tag)),
                    revision_id,
                )
            }
        },
    };

    success(catalog_entries(lang), revision_id)
}
