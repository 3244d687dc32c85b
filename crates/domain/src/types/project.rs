//! Read models for the project → cell → product hierarchy.

use serde::{Deserialize, Serialize};

/// A project revision available for requisitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectSummary {
    pub project: String,
    pub revision: String,
    pub name: String,
}

/// Aggregated quantities for one cell of a project revision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellSummary {
    pub project: String,
    pub revision: String,
    pub cell: String,
    pub required: f64,
    pub requested: f64,
    pub delivered: f64,
}

/// Per-product quantities inside a cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductLine {
    pub project: String,
    pub cell: String,
    pub product: String,
    pub description: String,
    pub required: f64,
    pub requested: f64,
    pub delivered: f64,
}

/// Delivery progress across a set of product lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductStatistics {
    pub total_necessidade: f64,
    pub total_entregue: f64,
    pub percentual_geral: f64,
}

impl ProductStatistics {
    /// Sum required and delivered quantities; the percentage is rounded to
    /// two decimals and is zero when nothing is required.
    pub fn from_lines(lines: &[ProductLine]) -> Self {
        let total_necessidade: f64 = lines.iter().map(|l| l.required).sum();
        let total_entregue: f64 = lines.iter().map(|l| l.delivered).sum();
        let percentual_geral = if total_necessidade > 0.0 {
            (total_entregue / total_necessidade * 100.0 * 100.0).round() / 100.0
        } else {
            0.0
        };

        Self { total_necessidade, total_entregue, percentual_geral }
    }
}
