//! The pantry: fixed product and recipe records, loaded with the binary.

use crate::domain::model::{Product, Recipe};
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use std::collections::HashSet;

pub static PRODUCTS: [Product; 4] = [
    Product {
        id: "1",
        name: "Sardines in Spicy Tomato",
        category: "The Classic",
        description: "Our signature catch. Plump sardines bathed in a rich tomato sauce with a piri-piri kick. Hand-packed for peak freshness.",
        image_seed: "open tin sardines tomato",
        price: "€8.50",
        intensity: 4,
    },
    Product {
        id: "2",
        name: "Mackerel Fillets in Olive Oil",
        category: "The Purest",
        description: "Smooth, buttery mackerel fillets preserved in golden Portuguese olive oil. A masterclass in simplicity.",
        image_seed: "open tin mackerel oil",
        price: "€9.00",
        intensity: 2,
    },
    Product {
        id: "3",
        name: "Codfish in Garlic Oil",
        category: "The Tradition",
        description: "The beloved Bacalhau, reimagined. Tender flakes of cod infused with roasted garlic notes.",
        image_seed: "open canned codfish",
        price: "€11.00",
        intensity: 3,
    },
    Product {
        id: "4",
        name: "Tuna Ventresca",
        category: "The Luxury",
        description: "The belly of the tuna. Incredibly tender, rich, and decadent. The gold standard of tinned fish.",
        image_seed: "open tin tuna belly",
        price: "€14.00",
        intensity: 5,
    },
];

pub static RECIPES: [Recipe; 3] = [
    Recipe {
        id: "r1",
        title: "Lisbon Sunset Toast",
        short_desc: "Spicy Sardines on rustic sourdough.",
        image_seed: "sardine toast",
        linked_product_id: "1",
    },
    Recipe {
        id: "r2",
        title: "Algarve Summer Salad",
        short_desc: "Mackerel fillets tossed with chickpeas.",
        image_seed: "mackerel salad",
        linked_product_id: "2",
    },
    Recipe {
        id: "r3",
        title: "Porto Fisherman’s Stew",
        short_desc: "A quick, hearty broth using our Codfish.",
        image_seed: "fish stew",
        linked_product_id: "3",
    },
];

/// Read-only view over the static records.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    products: &'static [Product],
    recipes: &'static [Recipe],
}

impl Catalog {
    pub fn pantry() -> Self {
        Self {
            products: &PRODUCTS,
            recipes: &RECIPES,
        }
    }

    pub fn products(&self) -> std::slice::Iter<'static, Product> {
        let products: &'static [Product] = self.products;
        products.iter()
    }

    pub fn recipes(&self) -> std::slice::Iter<'static, Recipe> {
        let recipes: &'static [Recipe] = self.recipes;
        recipes.iter()
    }

    pub fn find_product(&self, id: &str) -> Option<&'static Product> {
        self.products().find(|p| p.id == id)
    }

    pub fn find_recipe(&self, id: &str) -> Option<&'static Recipe> {
        self.recipes().find(|r| r.id == id)
    }

    pub fn linked_product(&self, recipe: &Recipe) -> Option<&'static Product> {
        self.find_product(recipe.linked_product_id)
    }

    /// Like [`find_product`](Self::find_product), but an unknown id is an error.
    pub fn require_product(&self, id: &str) -> Result<&'static Product> {
        self.find_product(id).ok_or_else(|| EnrichError::UnknownCatalogId {
            kind: "product",
            id: id.to_string(),
        })
    }

    pub fn require_recipe(&self, id: &str) -> Result<&'static Recipe> {
        self.find_recipe(id).ok_or_else(|| EnrichError::UnknownCatalogId {
            kind: "recipe",
            id: id.to_string(),
        })
    }
}

impl Validate for Catalog {
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for product in self.products() {
            if !seen.insert(product.id) {
                return Err(EnrichError::ConfigError {
                    message: format!("duplicate product id {}", product.id),
                });
            }
            validate_non_empty_string("product.name", product.name)?;
            validate_range("product.intensity", product.intensity, 1, 5)?;
        }

        let mut seen = HashSet::new();
        for recipe in self.recipes() {
            if !seen.insert(recipe.id) {
                return Err(EnrichError::ConfigError {
                    message: format!("duplicate recipe id {}", recipe.id),
                });
            }
            if self.linked_product(recipe).is_none() {
                return Err(EnrichError::ConfigError {
                    message: format!(
                        "recipe {} links to unknown product {}",
                        recipe.id, recipe.linked_product_id
                    ),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_every_known_product() {
        let catalog = Catalog::pantry();
        for product in PRODUCTS.iter() {
            assert_eq!(catalog.find_product(product.id), Some(product));
        }
        let tuna = catalog.find_product("4").unwrap();
        assert_eq!(tuna.name, "Tuna Ventresca");
        assert_eq!(tuna.price, "€14.00");
        assert_eq!(tuna.intensity, 5);
    }

    #[test]
    fn unknown_ids_are_empty() {
        let catalog = Catalog::pantry();
        assert!(catalog.find_product("5").is_none());
        assert!(catalog.find_product("").is_none());
        assert!(catalog.find_product("r1").is_none());
        assert!(catalog.find_recipe("1").is_none());
        assert!(matches!(
            catalog.require_product("42"),
            Err(EnrichError::UnknownCatalogId { kind: "product", .. })
        ));
    }

    #[test]
    fn recipes_resolve_to_linked_products() {
        let catalog = Catalog::pantry();
        let toast = catalog.find_recipe("r1").unwrap();
        assert_eq!(catalog.linked_product(toast).unwrap().name, "Sardines in Spicy Tomato");

        let stew = catalog.require_recipe("r3").unwrap();
        assert_eq!(catalog.linked_product(stew).unwrap().id, "3");
    }

    #[test]
    fn pantry_passes_self_check() {
        assert!(Catalog::pantry().validate().is_ok());
        assert_eq!(Catalog::pantry().products().count(), 4);
        assert_eq!(Catalog::pantry().recipes().count(), 3);
    }

    #[test]
    fn placeholder_is_keyed_by_product_id() {
        let url = PRODUCTS[0].placeholder_image_url();
        assert!(url.starts_with("https://loremflickr.com/800/1200/"));
        assert!(url.ends_with("lock=1"));
        assert!(!url.contains(' '));
    }
}
