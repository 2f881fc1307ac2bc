//! Allocator
//!
//! One-lookahead greedy routing of import items into target containers.
//! Targets are ordered by available space; a single cursor walks them and
//! moves forward at most one step per item.

use serde::Serialize;

use super::capacity::estimate_size;
use super::tree::ContainerNode;
use super::ImportItem;
use crate::domain::{ContainerId, ObjectType};

/// Working capacity figures of a container during one planning call
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationTarget {
    pub container_id: ContainerId,
    pub container_name: String,
    pub used_capacity: f64,
    pub total_capacity: f64,
}

impl AllocationTarget {
    pub fn from_node(node: &ContainerNode<'_>) -> Self {
        Self {
            container_id: node.container.id.clone(),
            container_name: node.container.name.clone(),
            used_capacity: node.used_capacity,
            total_capacity: node.total_capacity,
        }
    }

    pub fn available(&self) -> f64 {
        self.total_capacity - self.used_capacity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    /// Position of the item in the submitted batch
    pub item_index: usize,
    pub container_id: ContainerId,
    pub container_name: String,
    pub estimated_size: f64,
}

/// Sort targets by available space, largest first. Ties keep their order.
pub fn order_targets(targets: &mut [AllocationTarget]) {
    targets.sort_by(|a, b| b.available().total_cmp(&a.available()));
}

/// Route `items` in order. `targets` must already be ordered; their used
/// capacity is bumped in place as items land.
///
/// When the current target lacks room the cursor advances once and the item
/// goes to the next target regardless of fit, which may overflow it. Running
/// off the end stops routing; the remaining items stay unassigned.
pub fn allocate(
    items: &[ImportItem],
    targets: &mut [AllocationTarget],
    object_type: ObjectType,
) -> Vec<Assignment> {
    let mut assignments = Vec::with_capacity(items.len());
    let mut cursor = 0usize;

    for (item_index, item) in items.iter().enumerate() {
        if cursor >= targets.len() {
            break;
        }

        let size = estimate_size(item, object_type);
        if targets[cursor].available() < size {
            cursor += 1;
            if cursor >= targets.len() {
                break;
            }
        }

        let target = &mut targets[cursor];
        target.used_capacity += size;
        assignments.push(Assignment {
            item_index,
            container_id: target.container_id.clone(),
            container_name: target.container_name.clone(),
            estimated_size: size,
        });
    }

    assignments
}
