//! Collection enumeration and include-list filtering

use crate::adapters::service::QueryService;
use crate::domain::{Collection, Result};

/// List every collection known to the service
///
/// Not retried: a failure here means the service is unreachable or the
/// credentials are wrong.
///
/// # Errors
///
/// Propagates the service error.
pub async fn list_collections(service: &dyn QueryService) -> Result<Vec<Collection>> {
    let collections = service.list_collections().await?;
    tracing::debug!(
        endpoint = %service.endpoint(),
        count = collections.len(),
        "Listed collections"
    );
    Ok(collections)
}

/// Keep the collections named in `include`, ignoring ASCII case
///
/// An empty include-list keeps everything. Enumeration order is preserved.
pub fn select_collections(all: Vec<Collection>, include: &[String]) -> Vec<Collection> {
    if include.is_empty() {
        return all;
    }

    for name in include {
        if !all.iter().any(|c| c.id.matches(name)) {
            tracing::warn!(collection = %name, "Requested collection does not exist");
        }
    }

    all.into_iter()
        .filter(|c| include.iter().any(|name| c.id.matches(name)))
        .collect()
}
