//! Core data models for stockroom.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::validation::check_amount;

// =============================================================================
// CATEGORY
// =============================================================================

/// Fixed item category. Determines which quantity fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Raw materials, tracked by weight and/or length.
    Raw,
    /// Equipment, tracked by count.
    Equipment,
    /// Supplies and consumables, tracked by count.
    Supply,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Raw, Category::Equipment, Category::Supply];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Raw => "raw",
            Category::Equipment => "equipment",
            Category::Supply => "supply",
        }
    }

    /// Display title shown by the client.
    pub fn title(&self) -> &'static str {
        match self {
            Category::Raw => "Сырье",
            Category::Equipment => "Оборудование",
            Category::Supply => "Расходники",
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Category::Raw)
    }

    /// Parse an optional query/body value, treating absence as an unknown category.
    pub fn parse_opt(value: Option<&str>) -> Result<Self, Error> {
        match value {
            Some(v) => v.parse(),
            None => Err(Error::InvalidCategory(String::new())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Exact match only; `"Raw"` is not a category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "raw" => Ok(Category::Raw),
            "equipment" => Ok(Category::Equipment),
            "supply" => Ok(Category::Supply),
            other => Err(Error::InvalidCategory(other.to_string())),
        }
    }
}

/// Category descriptor returned by the categories endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryInfo {
    pub key: Category,
    pub title: &'static str,
    /// "weight_or_length" for raw, "count" otherwise.
    pub measure: &'static str,
}

impl From<Category> for CategoryInfo {
    fn from(category: Category) -> Self {
        Self {
            key: category,
            title: category.title(),
            measure: if category.is_raw() {
                "weight_or_length"
            } else {
                "count"
            },
        }
    }
}

// =============================================================================
// RAW MODE
// =============================================================================

/// Which raw-material field an amount applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawMode {
    #[default]
    Weight,
    Length,
}

impl RawMode {
    /// Lenient parse: anything other than `"length"` means weight.
    pub fn from_opt(value: Option<&str>) -> Self {
        match value {
            Some("length") => RawMode::Length,
            _ => RawMode::Weight,
        }
    }
}

// =============================================================================
// ITEM
// =============================================================================

/// A stock item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub category: Category,
    pub name: String,
    pub weight: f64,
    pub length: f64,
    pub quantity: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Current quantity fields.
    pub fn stock(&self) -> Stock {
        Stock {
            weight: self.weight,
            length: self.length,
            quantity: self.quantity,
        }
    }

    /// Whether the category-relevant quantity is positive.
    pub fn is_available(&self) -> bool {
        if self.category.is_raw() {
            self.weight > 0.0 || self.length > 0.0
        } else {
            self.quantity > 0.0
        }
    }
}

/// The three quantity fields of an item, manipulated as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stock {
    pub weight: f64,
    pub length: f64,
    pub quantity: f64,
}

impl Stock {
    /// Stock for a single incoming amount: exactly one field is set.
    pub fn single(category: Category, mode: RawMode, amount: f64) -> Self {
        match (category.is_raw(), mode) {
            (true, RawMode::Weight) => Stock {
                weight: amount,
                ..Default::default()
            },
            (true, RawMode::Length) => Stock {
                length: amount,
                ..Default::default()
            },
            (false, _) => Stock {
                quantity: amount,
                ..Default::default()
            },
        }
    }

    /// Field-wise sum.
    pub fn merged(self, incoming: Stock) -> Self {
        Stock {
            weight: self.weight + incoming.weight,
            length: self.length + incoming.length,
            quantity: self.quantity + incoming.quantity,
        }
    }

    /// Fail with [`Error::InvalidAmount`] naming `field` unless every field
    /// is finite and non-negative. Sums of large amounts can overflow to
    /// infinity.
    pub fn checked(self, field: &str) -> Result<Self, Error> {
        check_amount(self.weight, field)?;
        check_amount(self.length, field)?;
        check_amount(self.quantity, field)?;
        Ok(self)
    }

    /// Clear the fields relevant to `category`, leaving the others untouched.
    pub fn zeroed(self, category: Category) -> Self {
        if category.is_raw() {
            Stock {
                weight: 0.0,
                length: 0.0,
                ..self
            }
        } else {
            Stock {
                quantity: 0.0,
                ..self
            }
        }
    }
}

// =============================================================================
// REQUESTS AND OUTCOMES
// =============================================================================

/// Request for listing items in one category.
#[derive(Debug, Clone)]
pub struct ListItemsRequest {
    pub category: Category,
    /// Case-insensitive substring filter on name; blank means no filter.
    pub search: Option<String>,
    /// Only items with a positive relevant quantity.
    pub available_only: bool,
}

impl ListItemsRequest {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            search: None,
            available_only: false,
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn available_only(mut self, yes: bool) -> Self {
        self.available_only = yes;
        self
    }
}

/// Request for creating an item or merging into an existing one.
#[derive(Debug, Clone)]
pub struct CreateItemRequest {
    pub category: Category,
    pub name: String,
    /// Ignored for non-raw categories.
    pub mode: RawMode,
    pub amount: f64,
    /// Merge into an existing same-named item instead of failing.
    pub force: bool,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub length: Option<f64>,
    pub quantity: Option<f64>,
}

/// Result of a create-or-merge call.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// A fresh item was inserted.
    Created(Item),
    /// The amount was added to an existing item.
    Merged(Item),
}

impl CreateOutcome {
    pub fn item(&self) -> &Item {
        match self {
            CreateOutcome::Created(item) | CreateOutcome::Merged(item) => item,
        }
    }

    pub fn into_item(self) -> Item {
        match self {
            CreateOutcome::Created(item) | CreateOutcome::Merged(item) => item,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CreateOutcome::Created(_))
    }
}
