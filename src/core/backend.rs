//! Detection backend client
//!
//! Endpoints:
//! - GET /face_status - current face snapshot
//! - GET /object_status - current object counts
//! - POST /register_face - register the face currently in frame

use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::types::{
    BackendError, DetectionSnapshot, FaceStatusBody, ObjectCounts, ObjectStatusBody,
    RegistrationRequest, RegistrationResponse,
};

pub const FACE_STATUS_PATH: &str = "/face_status";
pub const OBJECT_STATUS_PATH: &str = "/object_status";
pub const REGISTER_FACE_PATH: &str = "/register_face";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const READ_TIMEOUT: Duration = Duration::from_secs(5);
const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// The three calls the client makes. Blocking; the runtime moves them off the
/// event loop.
pub trait DetectionBackend: Send + Sync + 'static {
    fn face_status(&self) -> Result<DetectionSnapshot, BackendError>;
    fn object_status(&self) -> Result<ObjectCounts, BackendError>;
    fn register_face(&self, request: &RegistrationRequest)
        -> Result<RegistrationResponse, BackendError>;
}

/// JSON-over-HTTP backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(base_url)?;
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .build();
        Ok(Self { base_url, agent })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &'static str) -> Result<Url, BackendError> {
        self.base_url
            .join(path)
            .map_err(|e| BackendError::transport(path, e.to_string()))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &'static str) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .agent
            .get(url.as_str())
            .call()
            .map_err(|e| BackendError::transport(path, e.to_string()))?;
        read_json(path, response)
    }
}

fn read_json<T: DeserializeOwned>(
    path: &'static str,
    response: ureq::Response,
) -> Result<T, BackendError> {
    let body = response
        .into_string()
        .map_err(|e| BackendError::transport(path, e.to_string()))?;
    decode(path, &body)
}

/// Parse a response body, mapping failures to `BackendError::Decode`
pub fn decode<T: DeserializeOwned>(path: &'static str, body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|e| BackendError::decode(path, e.to_string()))
}

impl DetectionBackend for HttpBackend {
    fn face_status(&self) -> Result<DetectionSnapshot, BackendError> {
        let body: FaceStatusBody = self.get_json(FACE_STATUS_PATH)?;
        Ok(body.into())
    }

    fn object_status(&self) -> Result<ObjectCounts, BackendError> {
        let body: ObjectStatusBody = self.get_json(OBJECT_STATUS_PATH)?;
        ObjectCounts::try_from(body)
    }

    fn register_face(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationResponse, BackendError> {
        let url = self.endpoint(REGISTER_FACE_PATH)?;
        let payload = serde_json::to_string(request)
            .map_err(|e| BackendError::transport(REGISTER_FACE_PATH, e.to_string()))?;
        let response = self
            .agent
            .post(url.as_str())
            .set("Content-Type", "application/json")
            .send_string(&payload)
            .map_err(|e| BackendError::transport(REGISTER_FACE_PATH, e.to_string()))?;
        read_json(REGISTER_FACE_PATH, response)
    }
}
