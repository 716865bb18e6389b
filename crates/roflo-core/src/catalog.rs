//! # Catalog
//!
//! The fixed list of purchasable projects. Loaded once per session and never
//! mutated afterwards; everything else refers to items by id.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coins::Coins;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::CatalogItem;

/// Read-only collection of catalog items, in display order.
///
/// Serialized as a plain item array; deserializing goes through
/// [`Catalog::new`], so duplicate or empty ids are rejected there too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CatalogItem>", into = "Vec<CatalogItem>")]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate or empty ids.
    pub fn new(items: Vec<CatalogItem>) -> CoreResult<Self> {
        {
            let mut seen = HashSet::with_capacity(items.len());
            for item in &items {
                if item.id.trim().is_empty() {
                    return Err(ValidationError::Required {
                        field: "item id".to_string(),
                    }
                    .into());
                }
                if !seen.insert(item.id.as_str()) {
                    return Err(ValidationError::InvalidFormat {
                        field: "item id".to_string(),
                        reason: format!("duplicate id '{}'", item.id),
                    }
                    .into());
                }
            }
        }

        Ok(Catalog { items })
    }

    /// The storefront's built-in project list.
    pub fn sample() -> Self {
        let item = |id: &str,
                    name: &str,
                    description: &str,
                    price: u64,
                    category: &str,
                    developer: &str| CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: Coins::new(price),
            category: category.to_string(),
            developer: developer.to_string(),
        };

        Catalog {
            items: vec![
                item(
                    "1",
                    "RofloOS",
                    "Операционная система с юмористическим интерфейсом",
                    150,
                    "Operating System",
                    "RofloDev",
                ),
                item(
                    "2",
                    "RofloChat",
                    "Мессенджер с мемами и стикерами",
                    75,
                    "Communication",
                    "RofloDev",
                ),
                item(
                    "3",
                    "RofloGames Pack",
                    "Коллекция забавных мини-игр",
                    200,
                    "Games",
                    "RofloGames",
                ),
                item(
                    "4",
                    "RofloEditor",
                    "Текстовый редактор с приколами",
                    100,
                    "Productivity",
                    "RofloTools",
                ),
            ],
        }
    }

    /// Looks up an item by id.
    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Looks up an item by id, failing with `ItemNotFound`.
    pub fn require(&self, id: &str) -> CoreResult<&CatalogItem> {
        self.get(id)
            .ok_or_else(|| CoreError::ItemNotFound(id.to_string()))
    }

    /// All items in display order.
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| seen.insert(item.category.as_str()))
            .map(|item| item.category.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TryFrom<Vec<CatalogItem>> for Catalog {
    type Error = CoreError;

    fn try_from(items: Vec<CatalogItem>) -> Result<Self, Self::Error> {
        Catalog::new(items)
    }
}

impl From<Catalog> for Vec<CatalogItem> {
    fn from(catalog: Catalog) -> Self {
        catalog.items
    }
}
