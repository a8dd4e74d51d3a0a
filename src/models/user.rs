use serde::{Deserialize, Serialize};

/// Profile record returned by the auth service for a valid token.
///
/// The backend spells the id `_id`; the alias keeps the wire format working
/// while the rest of the crate uses the plain name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
}
