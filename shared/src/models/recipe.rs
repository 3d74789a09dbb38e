//! Recipe Model (theoretical food cost)

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::util::{round1, round2};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub qty: f64,
    #[serde(default)]
    pub unit: String,
    /// Cost of this ingredient at the given quantity
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Recipe {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub menu_price: f64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub ingredients: Vec<Ingredient>,
    pub theoretical_cost: f64,
    pub food_cost_pct: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub store_id: i64,
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub menu_price: f64,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub menu_price: Option<f64>,
    pub ingredients: Option<Vec<Ingredient>>,
}

/// `(theoretical_cost, food_cost_pct)`; the percentage is 0 without a price.
pub fn recipe_costing(ingredients: &[Ingredient], menu_price: f64) -> (f64, f64) {
    let cost = round2(ingredients.iter().map(|i| i.cost).sum());
    let pct = if menu_price > 0.0 {
        round1(cost / menu_price * 100.0)
    } else {
        0.0
    };
    (cost, pct)
}

impl Recipe {
    pub fn from_create(id: i64, data: RecipeCreate, now: i64) -> AppResult<Self> {
        if data.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        let mut recipe = Self {
            id,
            store_id: data.store_id,
            name: data.name,
            category: data.category,
            menu_price: data.menu_price,
            ingredients: data.ingredients,
            theoretical_cost: 0.0,
            food_cost_pct: 0.0,
            created_at: now,
            updated_at: now,
        };
        recipe.recompute();
        Ok(recipe)
    }

    pub fn apply_update(&mut self, data: RecipeUpdate, now: i64) -> AppResult<()> {
        if let Some(v) = data.name {
            self.name = v;
        }
        if data.category.is_some() {
            self.category = data.category;
        }
        if let Some(v) = data.menu_price {
            self.menu_price = v;
        }
        if let Some(v) = data.ingredients {
            self.ingredients = v;
        }
        if self.name.trim().is_empty() {
            return Err(AppError::required("name"));
        }
        self.recompute();
        self.updated_at = now;
        Ok(())
    }

    fn recompute(&mut self) {
        let (cost, pct) = recipe_costing(&self.ingredients, self.menu_price);
        self.theoretical_cost = cost;
        self.food_cost_pct = pct;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ing(name: &str, cost: f64) -> Ingredient {
        Ingredient {
            name: name.into(),
            qty: 1.0,
            unit: "oz".into(),
            cost,
        }
    }

    #[test]
    fn test_food_cost_pct() {
        let (cost, pct) = recipe_costing(&[ing("dough", 0.85), ing("cheese", 1.9), ing("sauce", 0.4)], 14.99);
        assert_eq!(cost, 3.15);
        assert_eq!(pct, 21.0);
    }

    #[test]
    fn test_zero_price_gives_zero_pct() {
        let (cost, pct) = recipe_costing(&[ing("dough", 1.0)], 0.0);
        assert_eq!(cost, 1.0);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_price_update_recomputes_pct() {
        let mut r = Recipe::from_create(
            1,
            RecipeCreate {
                store_id: 1,
                name: "Large Pepperoni".into(),
                category: Some("pizza".into()),
                menu_price: 10.0,
                ingredients: vec![ing("dough", 1.0), ing("pepperoni", 2.0)],
            },
            0,
        )
        .unwrap();
        assert_eq!(r.food_cost_pct, 30.0);
        r.apply_update(
            RecipeUpdate {
                menu_price: Some(12.0),
                ..Default::default()
            },
            1,
        )
        .unwrap();
        assert_eq!(r.theoretical_cost, 3.0);
        assert_eq!(r.food_cost_pct, 25.0);
    }

    #[test]
    fn test_blank_name_update_rejected() {
        let mut r = Recipe::from_create(
            1,
            RecipeCreate {
                store_id: 1,
                name: "Garlic Knots".into(),
                category: None,
                menu_price: 6.0,
                ingredients: vec![ing("dough", 0.8)],
            },
            0,
        )
        .unwrap();
        let result = r.apply_update(
            RecipeUpdate {
                name: Some(String::new()),
                ..Default::default()
            },
            1,
        );
        assert!(result.is_err());
    }
}
