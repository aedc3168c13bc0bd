//! Minimal web surface
//!
//! Server-rendered HTML over the same store the CLI uses. Every handler runs
//! its store access on the blocking pool while holding one in-process lock,
//! so concurrent requests to one server never interleave a read-modify-write.
//! Other processes writing the same file are not coordinated.

mod templates;

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{BudgetLimits, Record, SummaryPeriod};
use crate::services::{BudgetUsage, ExpenseService, NewRecord};
use crate::storage::Storage;

pub use templates::escape_html;

#[derive(Clone)]
pub struct AppState {
    storage: Arc<Storage>,
    limits: BudgetLimits,
    lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Storage, limits: BudgetLimits) -> Self {
        Self {
            storage: Arc::new(storage),
            limits,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run `f` against the store on the blocking pool, under the store lock
    async fn with_store<T, F>(&self, f: F) -> Result<T, WebError>
    where
        T: Send + 'static,
        F: FnOnce(&Storage, &BudgetLimits) -> ExpenseResult<T> + Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        let lock = Arc::clone(&self.lock);
        let limits = self.limits;

        let result = tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|_| ExpenseError::Storage("Store lock poisoned".into()))?;
            f(&storage, &limits)
        })
        .await
        .map_err(|e| WebError::internal(format!("Store task failed: {}", e)))?;

        result.map_err(WebError::from)
    }
}

/// An error rendered as an HTML page with a matching status code
#[derive(Debug)]
pub struct WebError {
    status: StatusCode,
    message: String,
}

impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ExpenseError> for WebError {
    fn from(err: ExpenseError) -> Self {
        let status = match &err {
            ExpenseError::Validation(_) => StatusCode::BAD_REQUEST,
            ExpenseError::BudgetExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ExpenseError::NotFound { .. } => StatusCode::NOT_FOUND,
            ExpenseError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(error = %err, status = %status, "request rejected");
        }

        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Html(templates::error_page(self.status, &self.message))).into_response()
    }
}

/// Fields posted by the add form
#[derive(Debug, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "description")]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/add", get(add_form_handler).post(add_handler))
        .route("/delete/:position", get(delete_position_handler))
        .route("/records/:id/delete", get(delete_id_handler))
        .route("/export", get(export_handler))
        .route("/summary", get(summary_handler))
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped
pub async fn serve(storage: Storage, limits: BudgetLimits, addr: &str) -> ExpenseResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ExpenseError::Io(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!(addr = %addr, "web surface listening");

    axum::serve(listener, router(AppState::new(storage, limits)))
        .await
        .map_err(|e| ExpenseError::Io(format!("Server error: {}", e)))
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let records: Vec<Record> = state
        .with_store(|storage, _| ExpenseService::new(storage).list())
        .await?;
    Ok(Html(templates::index_page(&records)))
}

async fn add_form_handler() -> Html<String> {
    Html(templates::add_page())
}

async fn add_handler(
    State(state): State<AppState>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, WebError> {
    let input = NewRecord::new(form.category, form.amount)
        .with_date(form.date)
        .with_note(form.note);

    state
        .with_store(move |storage, limits| ExpenseService::new(storage).create(input, limits))
        .await?;

    Ok(Redirect::to("/"))
}

async fn delete_position_handler(
    State(state): State<AppState>,
    Path(position): Path<String>,
) -> Result<Redirect, WebError> {
    let position: usize = position
        .parse()
        .map_err(|_| WebError::bad_request(format!("Invalid position '{}'", position)))?;

    // Out-of-range positions leave the store unchanged
    state
        .with_store(move |storage, _| ExpenseService::new(storage).delete_at(position))
        .await?;

    Ok(Redirect::to("/"))
}

async fn delete_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect, WebError> {
    state
        .with_store(move |storage, _| {
            let service = ExpenseService::new(storage);
            service.delete(service.resolve_id(&id)?)
        })
        .await?;

    Ok(Redirect::to("/"))
}

async fn export_handler(State(state): State<AppState>) -> Result<Response, WebError> {
    let body = state
        .with_store(|storage, _| storage.records.export())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"expenses.csv\""),
        ],
        body,
    )
        .into_response())
}

async fn summary_handler(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Html<String>, WebError> {
    let period = match query.period.as_deref().map(str::trim) {
        None | Some("") => SummaryPeriod::current_month(),
        Some(raw) => raw.parse::<SummaryPeriod>()?,
    };

    let (summary, usage) = state
        .with_store(move |storage, limits| {
            let service = ExpenseService::new(storage);
            let summary = service.summary(&period)?;
            let usage = BudgetUsage::for_period(&service.list()?, period, limits)?;
            Ok((summary, usage))
        })
        .await?;

    Ok(Html(templates::summary_page(
        period.kind(),
        &summary,
        usage.as_ref(),
    )))
}
