use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct AdminUserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// The identity carried by an admin session. Never contains credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub id: Uuid,
    pub email: String,
}

impl From<&AdminUserRow> for AdminIdentity {
    fn from(row: &AdminUserRow) -> Self {
        AdminIdentity {
            id: row.id,
            email: row.email.clone(),
        }
    }
}
