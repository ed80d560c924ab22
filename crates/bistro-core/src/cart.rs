//! # Cart Types
//!
//! A cart line belongs to whoever's `email` it carries. Listing filters by
//! that email only; there is no other ownership check.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One menu item placed in a customer's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Id of the referenced menu item
    #[serde(rename = "menuId", default, skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<String>,

    /// Owner
    pub email: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub price: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    pub fn new(email: impl Into<String>, menu_id: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            menu_id: Some(menu_id.into()),
            email: email.into(),
            name: String::new(),
            image: String::new(),
            price,
            extra: Map::new(),
        }
    }
}

/// Query for `GET /carts?email=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_id_wire_name() {
        let item: CartItem = serde_json::from_value(serde_json::json!({
            "menuId": "m1",
            "email": "a@b.c",
            "name": "Pizza",
            "price": 12.0
        }))
        .unwrap();

        assert_eq!(item.menu_id.as_deref(), Some("m1"));
        assert!(item.extra.is_empty());
    }
}
