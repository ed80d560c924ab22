//! # Menu Types
//!
//! Menu items as stored in the `menu` collection. Fields the backend does not
//! interpret are kept in `extra` and round-trip untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A dish on the menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Store-assigned id (`_id`)
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    /// Category used by the order breakdown (e.g. "salad", "pizza")
    pub category: String,

    /// Unit price in dollars
    pub price: f64,

    #[serde(default)]
    pub recipe: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Any other fields supplied by the client
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            price,
            recipe: String::new(),
            image: String::new(),
            extra: Map::new(),
        }
    }

    /// Builder: set recipe text
    pub fn with_recipe(mut self, recipe: impl Into<String>) -> Self {
        self.recipe = recipe.into();
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Partial update over the fixed editable subset of a menu item.
///
/// Only the fields that are present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MenuUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.recipe.is_none()
            && self.image.is_none()
    }

    /// Apply to an item in place. Returns true if any field changed.
    pub fn apply(&self, item: &mut MenuItem) -> bool {
        let before = item.clone();
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(category) = &self.category {
            item.category = category.clone();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(recipe) = &self.recipe {
            item.recipe = recipe.clone();
        }
        if let Some(image) = &self.image {
            item.image = image.clone();
        }
        *item != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_round_trip() {
        let json = serde_json::json!({
            "name": "Caesar",
            "category": "salad",
            "price": 9.5,
            "recipe": "Lettuce, croutons",
            "image": "https://img/caesar.jpg",
            "spicy": false
        });

        let item: MenuItem = serde_json::from_value(json).unwrap();
        assert!(item.id.is_none());
        assert_eq!(item.extra.get("spicy"), Some(&Value::Bool(false)));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["spicy"], false);
        assert!(back.get("_id").is_none());
    }

    #[test]
    fn test_update_apply() {
        let mut item = MenuItem::new("Soup", "soup", 5.0);
        let update = MenuUpdate {
            price: Some(6.0),
            ..Default::default()
        };

        assert!(!update.is_empty());
        assert!(update.apply(&mut item));
        assert_eq!(item.price, 6.0);
        assert!(!update.apply(&mut item));
    }
}
