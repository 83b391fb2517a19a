//! HTTP handlers for the dashboard actions
//!
//! Handlers only translate between HTTP and actions. Status codes:
//!
//! - create/update success → `303 See Other` to the listing
//! - delete success → `204 No Content`
//! - rejected input → `422` with the form state
//! - failed write → `500` with the form state
//! - login rejected → `401` with the message; login fault → generic `500`

use crate::actions::{ActionOutcome, AuthOutcome, InvoiceActions, authenticate};
use crate::core::auth::{Credentials, IdentityProvider};
use crate::core::error::{DashboardError, RequestError};
use crate::core::invoice::{INVOICES_PATH, InvoiceId};
use crate::core::revalidate::ViewCache;
use crate::core::validation::FormFields;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub actions: InvoiceActions,
    pub identity: Arc<dyn IdentityProvider>,
    pub views: ViewCache,
    /// Where a successful login navigates to
    pub login_redirect: Arc<str>,
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            ActionOutcome::Redirect { location } => Redirect::to(&location).into_response(),
            ActionOutcome::Done => StatusCode::NO_CONTENT.into_response(),
            ActionOutcome::Invalid(state) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
            }
            ActionOutcome::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<InvoiceId, RequestError> {
    raw.parse().map_err(|_| RequestError::InvalidId {
        value: raw.to_string(),
    })
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dashboard"
    }))
}

/// The invoice listing, served from the view cache
pub async fn list_invoices(State(state): State<AppState>) -> Result<Json<Value>, DashboardError> {
    let store = state.actions.store().clone();
    let view = state
        .views
        .get_or_render(INVOICES_PATH, || async move {
            let invoices = store.list().await?;
            Ok::<_, anyhow::Error>(json!({
                "count": invoices.len(),
                "invoices": invoices,
            }))
        })
        .await?;
    Ok(Json(view))
}

pub async fn create_invoice(State(state): State<AppState>, form: FormFields) -> ActionOutcome {
    state.actions.create_invoice(&form).await
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: FormFields,
) -> Result<ActionOutcome, DashboardError> {
    let id = parse_id(&id)?;
    Ok(state.actions.update_invoice(&id, &form).await)
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ActionOutcome, DashboardError> {
    let id = parse_id(&id)?;
    Ok(state.actions.delete_invoice(&id).await)
}

pub async fn login(
    State(state): State<AppState>,
    form: FormFields,
) -> Result<Response, DashboardError> {
    let credentials = Credentials::new(form);
    let response = match authenticate(state.identity.as_ref(), None, &credentials).await? {
        AuthOutcome::SignedIn => Redirect::to(&state.login_redirect).into_response(),
        AuthOutcome::Rejected(message) => {
            (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
        }
    };
    Ok(response)
}
