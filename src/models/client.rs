use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub is_regular: bool,
    pub discount_percent: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}
