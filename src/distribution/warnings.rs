//! Warning Generator

use serde::{Deserialize, Serialize};

use super::allocator::AllocationTarget;
use crate::domain::ContainerId;

/// Utilization percentage at which a container is flagged
pub const WARNING_THRESHOLD: f64 = 80.0;
/// Utilization percentage above which a container is over capacity
pub const CRITICAL_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityWarning {
    pub container_id: ContainerId,
    pub container_name: String,
    pub used_capacity: f64,
    pub total_capacity: f64,
    /// Percentage, may exceed 100
    pub utilization: f64,
    pub severity: Severity,
}

pub fn severity_for(utilization: f64) -> Option<Severity> {
    if utilization > CRITICAL_THRESHOLD {
        Some(Severity::Critical)
    } else if utilization >= WARNING_THRESHOLD {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Flag targets at or above the warning threshold; zero-capacity targets are skipped
pub fn capacity_warnings(targets: &[AllocationTarget]) -> Vec<CapacityWarning> {
    targets
        .iter()
        .filter(|t| t.total_capacity > 0.0)
        .filter_map(|t| {
            let utilization = t.used_capacity / t.total_capacity * 100.0;
            severity_for(utilization).map(|severity| CapacityWarning {
                container_id: t.container_id.clone(),
                container_name: t.container_name.clone(),
                used_capacity: t.used_capacity,
                total_capacity: t.total_capacity,
                utilization,
                severity,
            })
        })
        .collect()
}
