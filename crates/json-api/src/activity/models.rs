//! Activity Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gbms_app::domain::activity::records::ActivityEntry;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActivityEntryResponse {
    pub uuid: Uuid,

    /// Acting user, absent once that user has been deleted
    pub actor: Option<Uuid>,

    /// Display name of the acting user
    pub actor_name: Option<String>,

    /// One of `login`, `logout`, `create`, `update`, `delete`, `export`, `import`
    pub action: String,

    pub entity_type: String,

    pub entity_uuid: Option<Uuid>,

    pub description: String,

    pub client_address: Option<String>,

    pub created_at: String,
}

impl From<ActivityEntry> for ActivityEntryResponse {
    fn from(entry: ActivityEntry) -> Self {
        Self {
            uuid: entry.uuid.into(),
            actor: entry.actor.map(Into::into),
            actor_name: entry.actor_name,
            action: entry.action.as_str().to_string(),
            entity_type: entry.entity_type,
            entity_uuid: entry.entity_uuid,
            description: entry.description,
            client_address: entry.client_address,
            created_at: entry.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ActivityResponse {
    /// Entries, newest first
    pub entries: Vec<ActivityEntryResponse>,
}

impl From<Vec<ActivityEntry>> for ActivityResponse {
    fn from(entries: Vec<ActivityEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }
}
