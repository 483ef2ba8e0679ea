//! Member domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory member. Only the fields the authorization core needs are
/// modelled; profile data lives elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMember {
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
}
