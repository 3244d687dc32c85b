//! Material requisition payloads forwarded to the ERP.
//!
//! Field names on the wire are the ones the ERP order endpoint expects
//! (`projeto`, `celulas`, `celula`, `itens`, `produto`, `quantidade`).
//! Inbound requests may use either those names or their English aliases.

use serde::{Deserialize, Serialize};

/// A requisition for one project, grouped by cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPayload {
    #[serde(rename = "projeto", alias = "project")]
    pub project: String,
    #[serde(rename = "celulas", alias = "cells", default)]
    pub cells: Vec<CellOrder>,
}

/// Items requested for a single production cell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CellOrder {
    #[serde(rename = "celula", alias = "cell")]
    pub cell: String,
    #[serde(rename = "itens", alias = "items", default)]
    pub items: Vec<ItemOrder>,
}

/// One product line of a requisition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemOrder {
    #[serde(rename = "produto", alias = "product")]
    pub product: String,
    #[serde(rename = "quantidade", alias = "quantity")]
    pub quantity: f64,
}

impl OrderPayload {
    /// Trim every identifier in place.
    pub fn sanitize(&mut self) {
        trim_in_place(&mut self.project);
        for cell in &mut self.cells {
            trim_in_place(&mut cell.cell);
            for item in &mut cell.items {
                trim_in_place(&mut item.product);
            }
        }
    }

    /// Consuming variant of [`OrderPayload::sanitize`].
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.sanitize();
        self
    }

    /// Total number of product lines across all cells.
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(|c| c.items.len()).sum()
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
