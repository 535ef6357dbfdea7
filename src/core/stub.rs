//! Stub detection backend for local runs and tests
//!
//! Endpoints:
//! - GET /face_status - scripted face snapshot
//! - GET /object_status - scripted object counts
//! - POST /register_face - register the face in frame
//! - POST /stub/face - script the face snapshot
//! - POST /stub/objects - script the object counts
//! - POST /stub/registration - accept or reject registrations
//! - GET /health - Health check

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::core::backend::{FACE_STATUS_PATH, OBJECT_STATUS_PATH, REGISTER_FACE_PATH};
use crate::types::{FaceStatusBody, ObjectStatusBody, RegistrationRequest, RegistrationResponse};

/// Where admin-mode registrations are sent afterwards
pub const ADMIN_REDIRECT: &str = "/admin/face-records";

/// Scripted backend state
#[derive(Debug, Clone)]
pub struct StubState {
    pub face: FaceStatusBody,
    pub objects: BTreeMap<String, i64>,
    /// Answer `success: true` to registrations
    pub accept_registrations: bool,
    pub registered: Vec<RegistrationRequest>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            face: FaceStatusBody::default(),
            objects: BTreeMap::new(),
            accept_registrations: true,
            registered: Vec::new(),
        }
    }
}

/// App state
#[derive(Debug, Default)]
pub struct AppState {
    pub stub: RwLock<StubState>,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registered: usize,
}

/// Registration switch request
#[derive(Debug, Deserialize)]
pub struct RegistrationSwitch {
    pub accept: bool,
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// Create the stub router with empty state
pub fn create_stub_router() -> Router {
    create_stub_router_with(Arc::new(AppState::default()))
}

/// Create the stub router over shared state
pub fn create_stub_router_with(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(FACE_STATUS_PATH, get(face_status))
        .route(OBJECT_STATUS_PATH, get(object_status))
        .route(REGISTER_FACE_PATH, post(register_face))
        .route("/stub/face", post(script_face))
        .route("/stub/objects", post(script_objects))
        .route("/stub/registration", post(script_registration))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let stub = state.stub.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        registered: stub.registered.len(),
    })
}

async fn face_status(State(state): State<Arc<AppState>>) -> Json<FaceStatusBody> {
    Json(state.stub.read().await.face.clone())
}

async fn object_status(State(state): State<Arc<AppState>>) -> Json<ObjectStatusBody> {
    let stub = state.stub.read().await;
    Json(ObjectStatusBody {
        objects: Some(stub.objects.clone()),
    })
}

/// Registers the face in frame; fails when no face is visible
async fn register_face(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegistrationRequest>,
) -> Json<RegistrationResponse> {
    let mut stub = state.stub.write().await;

    if !stub.accept_registrations || !stub.face.face_detected {
        return Json(RegistrationResponse {
            success: false,
            redirect: None,
        });
    }

    info!(roll_no = %req.roll_no, "stub registered face");
    stub.face = FaceStatusBody {
        face_detected: true,
        recognized: true,
        name: Some(format!("{} ({})", req.name, req.roll_no)),
    };
    let redirect = req.admin_mode.then(|| ADMIN_REDIRECT.to_string());
    stub.registered.push(req);

    Json(RegistrationResponse {
        success: true,
        redirect,
    })
}

async fn script_face(
    State(state): State<Arc<AppState>>,
    Json(body): Json<FaceStatusBody>,
) -> Json<Ack> {
    state.stub.write().await.face = body;
    Json(Ack { ok: true })
}

async fn script_objects(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ObjectStatusBody>,
) -> Json<Ack> {
    state.stub.write().await.objects = body.objects.unwrap_or_default();
    Json(Ack { ok: true })
}

async fn script_registration(
    State(state): State<Arc<AppState>>,
    Json(switch): Json<RegistrationSwitch>,
) -> Json<Ack> {
    state.stub.write().await.accept_registrations = switch.accept;
    Json(Ack { ok: true })
}

/// Run the stub backend
pub async fn run_stub_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_stub_router();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "stub detection backend running");
    info!("  GET  /face_status         - scripted face snapshot");
    info!("  GET  /object_status       - scripted object counts");
    info!("  POST /register_face       - register face in frame");
    info!("  POST /stub/face           - script face snapshot");
    info!("  POST /stub/objects        - script object counts");
    info!("  POST /stub/registration   - accept/reject registrations");
    info!("  GET  /health              - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
