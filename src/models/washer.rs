use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Washer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}
