//! Capacity Model
//!
//! Sizes are dimensionless capacity units on a width x rows basis: one unit
//! is roughly one average item standing spine-out. No physical-unit
//! conversion happens anywhere.

use serde_json::Value;

use crate::domain::{Container, Object, ObjectType, Properties};

/// Capacity of a container with neither explicit capacity nor dimensions
pub const DEFAULT_CONTAINER_CAPACITY: f64 = 100.0;
/// Size of an item with nothing to estimate from
pub const DEFAULT_ITEM_SIZE: f64 = 1.0;

/// Total capacity: explicit value, else width x rows, else the fallback.
///
/// Depth is ignored on purpose; items are assumed to stand spine-out.
pub fn total_capacity(container: &Container) -> f64 {
    if let Some(capacity) = container.capacity {
        return capacity;
    }
    match (container.width, container.rows) {
        (Some(width), Some(rows)) => width * f64::from(rows),
        _ => DEFAULT_CONTAINER_CAPACITY,
    }
}

/// Sum of the estimated sizes of the objects already in the container
pub fn used_capacity(container: &Container) -> f64 {
    container.objects.iter().map(estimate_object_size).sum()
}

/// Estimated size of a stored object.
///
/// Uses its property bag like an import record; a non-book object whose
/// properties carry no quantity falls back to its own quantity field.
pub fn estimate_object_size(object: &Object) -> f64 {
    if object.object_type != ObjectType::Book && quantity_of(&object.properties).is_none() {
        if let Some(quantity) = object.quantity.and_then(valid_size) {
            return quantity;
        }
    }
    estimate_size(&object.properties, object.object_type)
}

/// Estimated size of an import record for the given object type
pub fn estimate_size(item: &Properties, object_type: ObjectType) -> f64 {
    if object_type == ObjectType::Book {
        return page_count(item)
            .map(book_width)
            .unwrap_or(DEFAULT_ITEM_SIZE);
    }
    quantity_of(item).unwrap_or(DEFAULT_ITEM_SIZE)
}

/// Book width step function keyed on page count
pub fn book_width(pages: i64) -> f64 {
    match pages {
        p if p <= 100 => 0.5,
        p if p <= 200 => 0.75,
        p if p <= 300 => 1.0,
        p if p <= 500 => 1.25,
        p if p <= 750 => 1.5,
        _ => 2.0,
    }
}

// First numeric one of "pages" / "page_count", truncated to whole pages.
fn page_count(item: &Properties) -> Option<i64> {
    ["pages", "page_count"]
        .iter()
        .find_map(|key| item.get(*key).and_then(Value::as_f64))
        .map(|pages| pages as i64)
}

fn quantity_of(item: &Properties) -> Option<f64> {
    item.get("quantity")
        .and_then(Value::as_f64)
        .and_then(valid_size)
}

// Negative sizes would let used capacity shrink while routing items.
fn valid_size(size: f64) -> Option<f64> {
    (size.is_finite() && size >= 0.0).then_some(size)
}
