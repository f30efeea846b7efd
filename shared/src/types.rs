use serde::{Deserialize, Serialize};
use serde_json::Number;

// ========== USER ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String, // set at creation, never updated
}

// ========== ITEM ==========
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub name: String,
    pub price: Number,
    pub description: String,
    pub user_id: String, // owning user, not checked for existence
}

/// Fields `PATCH /items/{itemId}` may overlay
pub const ITEM_PATCH_FIELDS: &[&str] = &["name", "description"];

/// Fields `PUT /items/{itemId}` may assign
pub const ITEM_UPDATE_FIELDS: &[&str] = &["name", "price", "description", "userId"];

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_uses_camel_case_on_the_wire() {
        let item = Item {
            item_id: "i1".into(),
            name: "Lamp".into(),
            price: Number::from(12),
            description: "desk lamp".into(),
            user_id: "u1".into(),
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "itemId": "i1",
                "name": "Lamp",
                "price": 12,
                "description": "desk lamp",
                "userId": "u1"
            })
        );
    }
}
