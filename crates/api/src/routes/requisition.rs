//! Material requisition submission

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use erpgate_core::RequisitionReceipt;
use erpgate_domain::{OrderPayload, RequisitionError, SubmissionOutcome};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extractors::AuthenticatedUser;

/// `POST /api/requisicao`
///
/// The body is the order payload; the upstream token comes from the session,
/// never from the request body.
pub async fn submit(
    State(ctx): State<Arc<AppContext>>,
    AuthenticatedUser(identity): AuthenticatedUser,
    body: Result<Json<OrderPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<RequisitionReceipt>), ApiError> {
    let Json(payload) = body.map_err(|rejection| {
        RequisitionError::Invalid(format!("unreadable payload: {}", rejection.body_text()))
    })?;

    let receipt = ctx.requisitions.submit(&identity, payload).await?;
    Ok((outcome_status(receipt.result.outcome), Json(receipt)))
}

/// HTTP status returned to the caller for each upstream outcome.
pub fn outcome_status(outcome: SubmissionOutcome) -> StatusCode {
    match outcome {
        SubmissionOutcome::Accepted => StatusCode::OK,
        SubmissionOutcome::SessionExpired => StatusCode::UNAUTHORIZED,
        SubmissionOutcome::BadRequest => StatusCode::BAD_REQUEST,
        SubmissionOutcome::BusinessRejection => StatusCode::UNPROCESSABLE_ENTITY,
        SubmissionOutcome::EndpointNotFound
        | SubmissionOutcome::UpstreamError
        | SubmissionOutcome::NetworkError => StatusCode::BAD_GATEWAY,
        SubmissionOutcome::Timeout => StatusCode::GATEWAY_TIMEOUT,
    }
}
