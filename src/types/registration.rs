//! Registration request/response types

use serde::{Deserialize, Serialize};

use crate::types::SubmissionError;

/// Body of `POST /register_face`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub name: String,
    pub roll_no: String,
    pub admin_mode: bool,
}

/// Answer from `POST /register_face`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// What the client does with a finished submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// Leave the page for `url`; nothing else changes locally
    Redirect(String),
    /// Registered in place; the prompt closes immediately
    Registered,
    /// Panel stays open and the user is told why
    Failed(SubmissionError),
}

impl From<RegistrationResponse> for RegistrationOutcome {
    fn from(response: RegistrationResponse) -> Self {
        match response {
            RegistrationResponse {
                success: true,
                redirect: Some(url),
            } if !url.is_empty() => RegistrationOutcome::Redirect(url),
            RegistrationResponse { success: true, .. } => RegistrationOutcome::Registered,
            RegistrationResponse { success: false, .. } => {
                RegistrationOutcome::Failed(SubmissionError::Rejected)
            }
        }
    }
}

/// Contents of the registration form fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub roll_no: String,
}

impl RegistrationForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.roll_no.trim().is_empty()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn to_request(&self, admin_mode: bool) -> RegistrationRequest {
        RegistrationRequest {
            name: self.name.trim().to_string(),
            roll_no: self.roll_no.trim().to_string(),
            admin_mode,
        }
    }
}
