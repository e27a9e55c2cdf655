//! Query-string types shared by the listing handlers.

use serde::Deserialize;

/// `?limit=&offset=` pagination, used by the session and payment listings.
/// Values are clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
