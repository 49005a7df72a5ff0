use mission_core::ActionStatus;
use mission_logging::{mission_debug, mission_info};
use serde::Serialize;

use crate::store::MissionStore;
use crate::MissionError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub id: String,
    pub status: ActionStatus,
    /// `false` when the id is client-only (not yet persisted) and nothing was written.
    pub persisted: bool,
}

/// Set one action's status.
///
/// Ids that are not decimal storage ids belong to actions that only exist on
/// the client; they succeed without touching the store. No transition rules
/// are enforced, so an action can be moved back to `pending`.
pub async fn update_action_status(
    store: &dyn MissionStore,
    id: &str,
    status: ActionStatus,
) -> Result<StatusUpdate, MissionError> {
    let Ok(row_id) = id.trim().parse::<u64>() else {
        mission_debug!("Status update for client-only action {} skipped", id);
        return Ok(StatusUpdate {
            id: id.to_string(),
            status,
            persisted: false,
        });
    };

    if !store.update_status(row_id, status).await? {
        return Err(MissionError::ActionNotFound(row_id));
    }
    mission_info!("Action {} set to {}", row_id, status);
    Ok(StatusUpdate {
        id: row_id.to_string(),
        status,
        persisted: true,
    })
}

/// Parse a wire status name, rejecting unknown values with a user-facing error.
pub fn parse_status(raw: &str) -> Result<ActionStatus, MissionError> {
    ActionStatus::parse(raw).ok_or_else(|| MissionError::InvalidStatus(raw.to_string()))
}
