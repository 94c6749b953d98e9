#![cfg(not(tarpaulin_include))]

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::document::FormDocument;
use crate::formset::FormsetManager;
use crate::inactivity::{self, ActivityEvent, InactivityTimer};
use crate::preview::{SalaryPreview, format_amount};

pub struct FormState {
    document: FormDocument,
    formset: FormsetManager,
    preview: SalaryPreview,
}

impl FormState {
    pub fn contract() -> Self {
        FormState {
            document: FormDocument::contract_form(),
            formset: FormsetManager::create("deduction_set"),
            preview: SalaryPreview::contract(),
        }
    }

    pub fn payroll() -> Self {
        FormState {
            document: FormDocument::payroll_form(),
            formset: FormsetManager::create("form"),
            preview: SalaryPreview::payroll(),
        }
    }
}

pub struct AppState {
    contract: Mutex<FormState>,
    payroll: Mutex<FormState>,
    timer: Mutex<InactivityTimer>,
}

#[derive(Deserialize)]
struct FieldInput {
    name: String,
    value: String,
}

#[derive(Deserialize)]
struct ActivityPing {
    event: ActivityEvent,
}

#[derive(Deserialize)]
struct ActivityQuery {
    next: Option<String>,
}

pub async fn run(addr: &str, inactivity_timeout: Duration) -> Result<(), Box<dyn std::error::Error>> {
    // Setup app state: one document per form page plus the shared watchdog
    let app_state = Arc::new(AppState {
        contract: Mutex::new(FormState::contract()),
        payroll: Mutex::new(FormState::payroll()),
        timer: Mutex::new(InactivityTimer::create(inactivity_timeout)),
    });

    // Build router
    let app = Router::new()
        .route("/", get(serve_landing))
        .route("/contract", get(serve_contract_form))
        .route("/payroll", get(serve_payroll_form))
        .route("/api/:form/state", get(get_form_state))
        .route("/api/:form/rows", post(add_row))
        .route("/api/:form/rows/:index/delete", post(delete_row))
        .route("/api/:form/input", post(apply_input))
        .route("/api/activity", get(activity_status).post(record_activity))
        .route("/accounts/signout/", get(handle_signout))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    // Start server
    let listener = TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_landing() -> Html<&'static str> {
    Html(include_str!("./static/landing.html"))
}

async fn serve_contract_form() -> Html<&'static str> {
    Html(include_str!("./static/contract_form.html"))
}

async fn serve_payroll_form() -> Html<&'static str> {
    Html(include_str!("./static/payroll_form.html"))
}

fn form_state<'a>(state: &'a AppState, form: &str) -> Option<&'a Mutex<FormState>> {
    match form {
        "contract" => Some(&state.contract),
        "payroll" => Some(&state.payroll),
        _ => None,
    }
}

fn state_json(form: &FormState) -> serde_json::Value {
    let totals = form.preview.compute(&form.document);

    serde_json::json!({
        "fields": form.document.fields,
        "rows": form.document.rows(),
        "displays": form.document.displays,
        "total_forms": form.formset.total_forms(&form.document),
        "preview": totals.map(|t| serde_json::json!({
            "gross": format_amount(t.gross),
            "total_deductions": format_amount(t.total_deductions),
            "net": format_amount(t.net),
        })),
    })
}

async fn get_form_state(
    Path(form): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    match form_state(&state, &form) {
        Some(m) => {
            let mut guard = m.lock().unwrap();
            let fs = &mut *guard;
            fs.preview.update(&mut fs.document);
            Json(state_json(fs)).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn add_row(Path(form): Path<String>, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let m = match form_state(&state, &form) {
        Some(m) => m,
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let mut guard = m.lock().unwrap();
    let fs = &mut *guard;

    match fs.formset.add_row(&mut fs.document) {
        Some(index) => {
            fs.preview.update(&mut fs.document);
            Json(serde_json::json!({
                "status": "ok",
                "index": index,
                "state": state_json(fs),
            }))
            .into_response()
        }
        None => Json(serde_json::json!({
            "status": "error",
            "message": "unable to add row",
        }))
        .into_response(),
    }
}

async fn delete_row(
    Path((form, index)): Path<(String, usize)>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let m = match form_state(&state, &form) {
        Some(m) => m,
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let mut guard = m.lock().unwrap();
    let fs = &mut *guard;

    let removed = fs.formset.remove_row(&mut fs.document, index);
    fs.preview.update(&mut fs.document);

    Json(serde_json::json!({
        "status": if removed { "ok" } else { "error" },
        "state": state_json(fs),
    }))
    .into_response()
}

async fn apply_input(
    Path(form): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(input): Json<FieldInput>,
) -> impl IntoResponse {
    let m = match form_state(&state, &form) {
        Some(m) => m,
        None => return StatusCode::NOT_FOUND.into_response(),
    };

    let mut guard = m.lock().unwrap();
    let fs = &mut *guard;

    if !fs.document.set_value(&input.name, &input.value) {
        log::warn!("input for unknown field {}", input.name);
        return Json(serde_json::json!({
            "status": "error",
            "message": "field not found",
        }))
        .into_response();
    }

    // Amount fields are mutually exclusive within their row
    if input.name.contains("custom_percentage") || input.name.contains("fixed_amount") {
        if let Some(row_idx) = fs.document.row_of_field(&input.name) {
            if let Some(rows) = fs.document.rows_mut() {
                crate::preview::toggle_percentage_fixed(&mut rows[row_idx], &input.name);
            }
        }
    }

    fs.preview.update(&mut fs.document);

    Json(serde_json::json!({
        "status": "ok",
        "state": state_json(fs),
    }))
    .into_response()
}

async fn record_activity(
    State(state): State<Arc<AppState>>,
    Json(ping): Json<ActivityPing>,
) -> impl IntoResponse {
    let mut timer = state.timer.lock().unwrap();
    timer.record_activity(ping.event);

    Json(serde_json::json!({
        "remaining_secs": timer.remaining().as_secs(),
    }))
}

async fn activity_status(
    Query(query): Query<ActivityQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let timer = state.timer.lock().unwrap();

    if timer.is_expired() {
        Json(serde_json::json!({
            "expired": true,
            "signout_url": inactivity::signout_url(query.next.as_deref()),
        }))
    } else {
        Json(serde_json::json!({
            "expired": false,
            "remaining_secs": timer.remaining().as_secs(),
        }))
    }
}

async fn handle_signout(jar: CookieJar) -> impl IntoResponse {
    // Drop the backend session cookie; the page itself offers the way back in
    let jar = jar.add(Cookie::new("sessionid", ""));
    (jar, Html(include_str!("./static/signout.html")))
}
