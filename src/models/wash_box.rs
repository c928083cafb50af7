use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WashBox {
    pub id: String,
    pub box_number: i32,
    pub place_number: i32,
    pub is_active: bool,
}

impl WashBox {
    pub fn label(&self) -> String {
        format!("Box {}, place {}", self.box_number, self.place_number)
    }
}
