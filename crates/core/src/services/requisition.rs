//! Material requisitions: validation, audit trail, and submission

use std::sync::Arc;

use erpgate_domain::{
    OrderPayload, RequisitionError, SessionIdentity, SubmissionError, SubmissionResult,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::ports::OrderSubmitter;

/// Result of a requisition that reached the ERP.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RequisitionReceipt {
    pub requisition_id: String,
    pub total_items: usize,
    #[serde(flatten)]
    pub result: SubmissionResult,
}

/// Check that a (sanitized) payload is complete enough to forward.
pub fn validate_order(payload: &OrderPayload) -> Result<(), RequisitionError> {
    if payload.project.trim().is_empty() {
        return Err(RequisitionError::Invalid("project is required".into()));
    }
    if payload.cells.is_empty() {
        return Err(RequisitionError::Invalid("at least one cell is required".into()));
    }

    for cell in &payload.cells {
        if cell.cell.trim().is_empty() {
            return Err(RequisitionError::Invalid("cell name is required".into()));
        }
        if cell.items.is_empty() {
            return Err(RequisitionError::Invalid(format!("cell {} has no items", cell.cell)));
        }
        for item in &cell.items {
            if item.product.trim().is_empty() {
                return Err(RequisitionError::Invalid(format!(
                    "item without product in cell {}",
                    cell.cell
                )));
            }
            if !item.quantity.is_finite() || item.quantity <= 0.0 {
                return Err(RequisitionError::Invalid(format!(
                    "invalid quantity for {}",
                    item.product
                )));
            }
        }
    }

    Ok(())
}

/// Validates, audits, and forwards requisitions.
pub struct RequisitionService {
    submitter: Arc<dyn OrderSubmitter>,
    clock: Arc<dyn Clock>,
}

impl RequisitionService {
    pub fn new(submitter: Arc<dyn OrderSubmitter>, clock: Arc<dyn Clock>) -> Self {
        Self { submitter, clock }
    }

    /// `REQ_YYYYMMDD_HHMMSS` from the current clock.
    pub fn next_requisition_id(&self) -> String {
        format!("REQ_{}", self.clock.now().format("%Y%m%d_%H%M%S"))
    }

    pub async fn submit(
        &self,
        identity: &SessionIdentity,
        payload: OrderPayload,
    ) -> Result<RequisitionReceipt, RequisitionError> {
        if identity.upstream_token.trim().is_empty() {
            warn!(user = %identity.user, "requisition without upstream token");
            return Err(SubmissionError::MissingToken.into());
        }

        let payload = payload.sanitized();
        if let Err(err) = validate_order(&payload) {
            warn!(user = %identity.user, error = %err, "rejected requisition");
            return Err(err);
        }

        let requisition_id = self.next_requisition_id();
        let total_items = payload.line_count();

        info!(
            requisition_id = %requisition_id,
            user = %identity.user,
            project = %payload.project,
            total_items,
            "new requisition"
        );
        for cell in &payload.cells {
            for item in &cell.items {
                info!(
                    requisition_id = %requisition_id,
                    cell = %cell.cell,
                    product = %item.product,
                    quantity = item.quantity,
                    "requisition line"
                );
            }
        }

        let result = self.submitter.submit(payload, &identity.upstream_token).await?;
        info!(
            requisition_id = %requisition_id,
            outcome = %result.outcome,
            success = result.success,
            "requisition forwarded"
        );

        Ok(RequisitionReceipt { requisition_id, total_items, result })
    }
}
