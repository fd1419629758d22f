// Contact form submission: local validation, the submitting flag, payload
// serialization, and mapping of the boundary's reply onto the on-screen
// status. The mail relay itself stays an external collaborator behind JSON.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::error::EngineError;

/// Why the visitor is writing. Serialized capitalized, as the relay expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ContactType {
    Hiring,
    Collaboration,
    #[default]
    General,
}

/// The transient message being composed. Exists for one submission; after a
/// successful send only the on-screen status remains.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ContactMessage {
    #[serde(rename = "contactType", default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl ContactMessage {
    /// Required fields must be non-empty; phone stays optional.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::MissingField(field));
            }
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
        self.phone.clear();
        self.subject.clear();
        self.message.clear();
    }
}

/// On-screen submission status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

impl SubmitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitStatus::Idle => "idle",
            SubmitStatus::Success => "success",
            SubmitStatus::Error => "error",
        }
    }
}

/// Result of one boundary exchange, reduced from the HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum BoundaryOutcome {
    Success,
    Error { status: u16, message: String },
}

impl BoundaryOutcome {
    /// View as a Result for callers that propagate instead of render.
    pub fn into_result(self) -> Result<(), EngineError> {
        match self {
            BoundaryOutcome::Success => Ok(()),
            BoundaryOutcome::Error { status, message } => {
                Err(EngineError::Boundary { status, message })
            }
        }
    }
}

/// What the relay actually answers with: `{success: true}` on 2xx, or
/// `{error: "..."}` alongside a non-2xx status.
#[derive(Debug, Deserialize)]
struct BoundaryReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Reduce an HTTP status and body to an outcome. Tolerant of malformed
/// bodies: anything that is not a well-formed success is an error with the
/// best message available.
pub fn parse_boundary_response(status: u16, body: &str) -> BoundaryOutcome {
    let reply: Option<BoundaryReply> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        if reply.map(|r| r.success).unwrap_or(false) {
            return BoundaryOutcome::Success;
        }
        log::warn!("2xx boundary reply without success flag");
        return BoundaryOutcome::Error {
            status,
            message: "Unexpected reply from the mail relay".to_string(),
        };
    }

    let message = reply
        .and_then(|r| r.error)
        .unwrap_or_else(|| "Failed to send message".to_string());
    BoundaryOutcome::Error { status, message }
}

/// The form's submission state machine. Fields live here so a failed send
/// retains them for correction and a successful one clears them.
#[derive(Debug, Default)]
pub struct ContactForm {
    fields: ContactMessage,
    submitting: bool,
    status: SubmitStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fields(&mut self, fields: ContactMessage) {
        self.fields = fields;
    }

    pub fn fields(&self) -> &ContactMessage {
        &self.fields
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// Validate and serialize the payload for the boundary. On validation
    /// failure the submission aborts before any network activity and the
    /// submitting flag stays down.
    pub fn begin_submit(&mut self) -> Result<String, EngineError> {
        self.status = SubmitStatus::Idle;

        if let Err(err) = self.fields.validate() {
            self.status = SubmitStatus::Error;
            self.submitting = false;
            return Err(err);
        }

        self.submitting = true;
        Ok(serde_json::to_string(&self.fields)?)
    }

    /// Apply the boundary outcome. The submitting flag drops on every path.
    pub fn resolve(&mut self, outcome: &BoundaryOutcome) {
        self.submitting = false;
        match outcome {
            BoundaryOutcome::Success => {
                self.fields.clear();
                self.status = SubmitStatus::Success;
            }
            BoundaryOutcome::Error { status, message } => {
                log::warn!("contact submission failed ({status}): {message}");
                self.status = SubmitStatus::Error;
            }
        }
    }
}

// =============================================================================
// WASM Bindings
// =============================================================================

/// Wire form of the host's fetch result handed to [`resolve_boundary_reply`]:
/// the HTTP status plus the raw body text.
#[derive(Debug, Deserialize)]
struct FetchReply {
    status: u16,
    #[serde(default)]
    body: String,
}

/// Await the host's boundary promise and reduce it to a
/// [`BoundaryOutcome`] JSON string.
///
/// The promise must resolve to a JSON string `{"status": 200, "body": "..."}`;
/// a rejected promise (network failure) becomes an error outcome with
/// status 0 rather than an exception, since a failed send must degrade to a
/// status message, not break the form.
#[wasm_bindgen]
pub async fn resolve_boundary_reply(reply: js_sys::Promise) -> Result<String, JsValue> {
    let outcome = match JsFuture::from(reply).await {
        Ok(value) => {
            let text = value
                .as_string()
                .ok_or_else(|| JsValue::from_str("Boundary reply must be a string"))?;
            let parsed: FetchReply = serde_json::from_str(&text)
                .map_err(|e| JsValue::from_str(&format!("Invalid boundary reply: {}", e)))?;
            parse_boundary_response(parsed.status, &parsed.body)
        }
        Err(_) => BoundaryOutcome::Error {
            status: 0,
            message: "Network error".to_string(),
        },
    };

    serde_json::to_string(&outcome)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// WASM-exposed contact form state machine.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmContactForm {
    inner: ContactForm,
}

#[wasm_bindgen]
impl WasmContactForm {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmContactForm {
        WasmContactForm {
            inner: ContactForm::new(),
        }
    }

    /// Replace the field set from a `ContactMessage` JSON object.
    pub fn set_fields(&mut self, fields_json: &str) -> Result<(), JsValue> {
        let fields: ContactMessage = serde_json::from_str(fields_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid contact fields: {}", e)))?;
        self.inner.set_fields(fields);
        Ok(())
    }

    /// Current field values, for re-rendering retained input after an error.
    pub fn fields(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.fields())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Returns the serialized payload to POST, or throws on local
    /// validation failure (no network call should be made).
    pub fn begin_submit(&mut self) -> Result<String, JsValue> {
        self.inner
            .begin_submit()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Apply an HTTP reply directly.
    pub fn resolve(&mut self, status: u16, body: &str) {
        let outcome = parse_boundary_response(status, body);
        self.inner.resolve(&outcome);
    }

    /// Apply an outcome produced by [`resolve_boundary_reply`].
    pub fn complete(&mut self, outcome_json: &str) -> Result<(), JsValue> {
        let outcome: BoundaryOutcome = serde_json::from_str(outcome_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid outcome: {}", e)))?;
        self.inner.resolve(&outcome);
        Ok(())
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.is_submitting()
    }

    pub fn status(&self) -> String {
        self.inner.status().as_str().to_string()
    }
}
