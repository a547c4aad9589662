//! Family loader — primary fetch plus concurrent related-family fan-out.
//!
//! DESIGN
//! ======
//! The primary family is fetched first and its errors are fatal. In expanded
//! view mode every unique family on the other side of a link is then fetched
//! concurrently, one request per id. All requests settle before the record is
//! returned. A failed related fetch is logged and dropped; that family is
//! simply not preloaded and the graph builder falls back to a placeholder.
//!
//! Related records are keyed by the id they were requested under, which is
//! the id the link names. A body that reports a different id is re-keyed.

use futures::future::join_all;
use tracing::{info, warn};

use super::source::{FamilySource, FetchError};
use super::{FamilyId, FamilyRecord};
use crate::error::ErrorCode;
use crate::graph::ViewMode;

/// Load `family_id` and, in expanded mode, its linked families.
///
/// # Errors
///
/// Returns the primary family's fetch or shape error. Related-family errors
/// are absorbed.
pub async fn load_family(
    source: &dyn FamilySource,
    family_id: FamilyId,
    mode: ViewMode,
) -> Result<FamilyRecord, FetchError> {
    let mut family = source.get_family(family_id).await?;
    family.related_families.clear();

    if mode == ViewMode::Compact {
        return Ok(family);
    }

    let linked_ids = family.linked_family_ids();
    if linked_ids.is_empty() {
        return Ok(family);
    }

    let fetches = linked_ids
        .iter()
        .map(|&id| async move { (id, source.get_family(id).await) });
    let results = join_all(fetches).await;

    let mut related = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(mut record) => {
                if record.id != id {
                    warn!(
                        family_id,
                        related_family_id = id,
                        body_id = record.id,
                        "related family id mismatch; re-keyed"
                    );
                    record.id = id;
                }
                related.push(record);
            }
            Err(e) => {
                warn!(
                    family_id,
                    related_family_id = id,
                    code = e.error_code(),
                    retryable = e.retryable(),
                    error = %e,
                    "related family fetch failed"
                );
            }
        }
    }

    info!(family_id, requested = linked_ids.len(), loaded = related.len(), "related families loaded");
    family.related_families = related;
    Ok(family)
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
