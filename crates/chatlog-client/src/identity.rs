//! Login name -> numeric user id resolution.

use serde::Deserialize;

use crate::endpoints::Endpoints;
use crate::source::{JsonSource, fetch_json};

/// One record of the identity lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub display_name: String,
}

/// Resolve a login name to the id used by the log and catalog services.
///
/// Returns `None` both when the service knows no such user and when the
/// service is unavailable; the two cases are indistinguishable here.
pub async fn resolve_user_id(
    source: &impl JsonSource,
    endpoints: &Endpoints,
    login: &str,
) -> Option<String> {
    let records: Vec<UserRecord> = fetch_json(source, &endpoints.user_lookup(login)).await?;
    let id = records
        .into_iter()
        .map(|record| record.id)
        .find(|id| !id.is_empty());

    match &id {
        Some(id) => tracing::debug!(login, id = %id, "Resolved user id"),
        None => tracing::info!(login, "User not found"),
    }
    id
}
