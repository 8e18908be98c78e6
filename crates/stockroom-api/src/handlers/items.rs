//! Item HTTP handlers.
//!
//! REST endpoints for listing, creating, merging, editing, zeroing and
//! deleting stock items. Bodies are parsed leniently: amounts may arrive as
//! JSON numbers or numeric strings.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use stockroom_core::{
    parse_optional_amount, require_name, Category, CreateItemRequest, CreateOutcome, Item,
    ItemRepository, ListItemsRequest, RawMode, UpdateItemRequest,
};

use crate::extract::{ItemId, JsonBody, QueryParams};
use crate::{ApiError, AppState};

/// Query parameters for listing items.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemsQuery {
    /// Required: raw, equipment or supply
    pub category: Option<String>,
    /// Case-insensitive substring of the name
    pub search: Option<String>,
    /// "true" or "1" to hide items with nothing in stock
    pub available_only: Option<String>,
}

impl ListItemsQuery {
    fn available_only(&self) -> bool {
        self.available_only
            .as_deref()
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false)
    }
}

/// Request body for creating or merging an item.
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemBody {
    pub category: Option<String>,
    pub name: Option<String>,
    /// Raw only: "length" or "weight" (default)
    pub mode: Option<String>,
    pub amount: Option<Value>,
    pub weight: Option<Value>,
    pub length: Option<Value>,
    pub quantity: Option<Value>,
    /// Merge into an existing item of the same name
    pub force: Option<Value>,
}

impl CreateItemBody {
    /// Resolve the body into a store request.
    ///
    /// Raw items take `amount`, then the field named by `mode`. Counted
    /// items take `quantity`, then `amount`. Missing amounts count as zero.
    fn into_request(self) -> Result<CreateItemRequest, ApiError> {
        let category = Category::parse_opt(self.category.as_deref())?;
        let name = require_name(self.name.as_deref().unwrap_or_default())?;

        let (mode, amount) = if category.is_raw() {
            let mode = RawMode::from_opt(self.mode.as_deref());
            let by_mode = match mode {
                RawMode::Length => self.length.as_ref(),
                RawMode::Weight => self.weight.as_ref(),
            };
            let value = self.amount.as_ref().or(by_mode);
            (mode, parse_optional_amount(value, "Amount")?)
        } else {
            let value = self.quantity.as_ref().or(self.amount.as_ref());
            (RawMode::default(), parse_optional_amount(value, "Quantity")?)
        };

        Ok(CreateItemRequest {
            category,
            name,
            mode,
            amount: amount.unwrap_or(0.0),
            force: truthy(self.force.as_ref()),
        })
    }
}

/// Request body for a partial update. Absent or null fields are kept.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemBody {
    pub name: Option<String>,
    pub weight: Option<Value>,
    pub length: Option<Value>,
    pub quantity: Option<Value>,
}

impl UpdateItemBody {
    /// Unparsable amounts become NaN. The store rejects them with the same
    /// message, after its own missing-item check.
    fn into_request(self) -> UpdateItemRequest {
        let amount = |value: Option<Value>, field: &str| {
            parse_optional_amount(value.as_ref(), field).unwrap_or(Some(f64::NAN))
        };
        UpdateItemRequest {
            name: self.name,
            weight: amount(self.weight, "Weight"),
            length: amount(self.length, "Length"),
            quantity: amount(self.quantity, "Quantity"),
        }
    }
}

/// Response for a deleted item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemResponse {
    pub ok: bool,
    pub deleted_id: i64,
}

/// Loose boolean: false, 0, "" and null are false; anything else is true.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// List items of one category.
///
/// # Query Parameters
/// - `category`: raw, equipment or supply (required)
/// - `search`: case-insensitive name substring (optional)
/// - `availableOnly`: "true" to hide empty items (optional)
///
/// # Returns
/// - 200 OK with items ordered by name
/// - 400 Bad Request for an unknown category
pub async fn list_items(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListItemsQuery>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let category = Category::parse_opt(query.category.as_deref())?;
    let mut req = ListItemsRequest::new(category).available_only(query.available_only());
    if let Some(search) = query.search {
        req = req.search(search);
    }
    let items = state.db.items.list(req).await?;
    Ok(Json(items))
}

/// Get one item.
///
/// # Returns
/// - 200 OK with the item
/// - 404 Not Found if the id is unknown
pub async fn get_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<Item>, ApiError> {
    let item = state.db.items.fetch(id).await?;
    Ok(Json(item))
}

/// Create an item, or merge into an existing one when `force` is set.
///
/// # Returns
/// - 201 Created with the new item
/// - 200 OK with the merged item
/// - 400 Bad Request for an unknown category, missing name or bad amount
/// - 409 Conflict with `{ "error": "duplicate", "existing": item }`
pub async fn create_item(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateItemBody>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let req = body.into_request()?;
    debug!(
        subsystem = "api",
        op = "create_item",
        category = %req.category,
        force = req.force,
        "Create requested"
    );

    let outcome = state.db.items.create_or_merge(req).await?;
    let status = match outcome {
        CreateOutcome::Created(_) => StatusCode::CREATED,
        CreateOutcome::Merged(_) => StatusCode::OK,
    };
    Ok((status, Json(outcome.into_item())))
}

/// Partially update an item.
///
/// # Returns
/// - 200 OK with the updated item
/// - 400 Bad Request for a bad amount
/// - 404 Not Found if the id is unknown
/// - 409 Conflict if the new name is taken in the category
pub async fn update_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
    JsonBody(body): JsonBody<UpdateItemBody>,
) -> Result<Json<Item>, ApiError> {
    let item = state.db.items.update(id, body.into_request()).await?;
    Ok(Json(item))
}

/// Clear the category-relevant quantities of an item.
///
/// # Returns
/// - 200 OK with the updated item
/// - 404 Not Found if the id is unknown
pub async fn zero_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<Item>, ApiError> {
    let item = state.db.items.zero_out(id).await?;
    Ok(Json(item))
}

/// Delete an item.
///
/// # Returns
/// - 200 OK with `{ "ok": true, "deletedId": id }`
/// - 404 Not Found if the id is unknown
pub async fn delete_item(
    State(state): State<AppState>,
    ItemId(id): ItemId,
) -> Result<Json<DeleteItemResponse>, ApiError> {
    let deleted_id = state.db.items.delete(id).await?;
    Ok(Json(DeleteItemResponse {
        ok: true,
        deleted_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> CreateItemBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_raw_amount_precedence() {
        let req = body(json!({"category": "raw", "name": "Медь", "amount": 2, "weight": 9}))
            .into_request()
            .unwrap();
        assert_eq!(req.amount, 2.0);
        assert_eq!(req.mode, RawMode::Weight);

        let req = body(json!({"category": "raw", "name": "Медь", "mode": "length", "length": "4.5"}))
            .into_request()
            .unwrap();
        assert_eq!(req.amount, 4.5);
        assert_eq!(req.mode, RawMode::Length);

        // the field that does not match the mode is ignored
        let req = body(json!({"category": "raw", "name": "Медь", "mode": "length", "weight": 3}))
            .into_request()
            .unwrap();
        assert_eq!(req.amount, 0.0);
    }

    #[test]
    fn test_counted_amount_precedence() {
        let req = body(json!({"category": "supply", "name": "Ветошь", "quantity": 3, "amount": 7}))
            .into_request()
            .unwrap();
        assert_eq!(req.amount, 3.0);

        let req = body(json!({"category": "equipment", "name": "Станок", "amount": 7}))
            .into_request()
            .unwrap();
        assert_eq!(req.amount, 7.0);
        assert!(!req.force);
    }

    #[test]
    fn test_validation_order() {
        let err = body(json!({"category": "tools", "name": ""}))
            .into_request()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Unknown category"));

        let err = body(json!({"category": "raw", "name": "  ", "amount": -1}))
            .into_request()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Name is required"));

        let err = body(json!({"category": "supply", "name": "Клей", "quantity": -1}))
            .into_request()
            .unwrap_err();
        assert!(
            matches!(err, ApiError::BadRequest(ref m) if m == "Quantity must be a non-negative number")
        );
    }

    #[test]
    fn test_force_truthiness() {
        assert!(!truthy(None));
        assert!(!truthy(Some(&json!(null))));
        assert!(!truthy(Some(&json!(false))));
        assert!(!truthy(Some(&json!(0))));
        assert!(!truthy(Some(&json!(""))));
        assert!(truthy(Some(&json!(true))));
        assert!(truthy(Some(&json!(1))));
        assert!(truthy(Some(&json!("yes"))));
    }

    #[test]
    fn test_available_only_flag() {
        let q = |v: &str| ListItemsQuery {
            available_only: Some(v.to_string()),
            ..Default::default()
        };
        assert!(q("true").available_only());
        assert!(q("TRUE").available_only());
        assert!(q("1").available_only());
        assert!(!q("false").available_only());
        assert!(!q("yes").available_only());
        assert!(!ListItemsQuery::default().available_only());
    }

    #[test]
    fn test_update_body_nulls_are_absent() {
        let req = serde_json::from_value::<UpdateItemBody>(json!({"weight": null, "quantity": "2"}))
            .unwrap()
            .into_request();
        assert_eq!(req.weight, None);
        assert_eq!(req.quantity, Some(2.0));
        assert_eq!(req.name, None);
    }

    #[test]
    fn test_update_body_bad_amounts_reach_the_store_as_nan() {
        let req = serde_json::from_value::<UpdateItemBody>(
            json!({"weight": "abc", "length": -1, "quantity": true}),
        )
        .unwrap()
        .into_request();
        assert!(req.weight.unwrap().is_nan());
        assert!(req.length.unwrap().is_nan());
        assert!(req.quantity.unwrap().is_nan());
    }
}
