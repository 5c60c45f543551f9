//! Logger collaborator surface.
//!
//! The core never fails because of a logged condition; warnings and errors flow to
//! whatever sink the player installs. The default sink forwards to `tracing`.

/// A leveled log record with optional structured payload.
#[derive(Clone, Debug)]
pub struct LogPayload {
    /// Human-readable message.
    pub message: String,
    /// Optional structured object to inspect alongside the message.
    pub object: Option<serde_json::Value>,
    /// Optional capture-time stack for diagnostics.
    pub stack: Option<String>,
}

impl LogPayload {
    /// Build a payload carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            object: None,
            stack: None,
        }
    }

    /// Attach a structured object to the payload.
    pub fn with_object(mut self, object: serde_json::Value) -> Self {
        self.object = Some(object);
        self
    }

    /// Attach a capture-time stack to the payload.
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Sink for scheduler diagnostics.
///
/// Implementations must not panic on well-formed payloads; subscriber failures are
/// the caller's problem, logging never is.
pub trait Logger {
    /// Diagnostic detail (retry counts, timing notes).
    fn debug(&self, payload: LogPayload);
    /// Recoverable misuse (invalid transitions, unrecognized yields).
    fn warn(&self, payload: LogPayload);
    /// Usage defects (unready dependency access mid-step).
    fn error(&self, payload: LogPayload);
}

/// Default sink forwarding every record to the `tracing` macros.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, payload: LogPayload) {
        tracing::debug!(object = ?payload.object, stack = payload.stack.as_deref(), "{}", payload.message);
    }

    fn warn(&self, payload: LogPayload) {
        tracing::warn!(object = ?payload.object, stack = payload.stack.as_deref(), "{}", payload.message);
    }

    fn error(&self, payload: LogPayload) {
        tracing::error!(object = ?payload.object, stack = payload.stack.as_deref(), "{}", payload.message);
    }
}
