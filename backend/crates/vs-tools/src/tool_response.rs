use crate::ToolError;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ToolError> for ErrorBody {
    fn from(error: &ToolError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            field: error.field(),
        }
    }
}

/// Exactly one of `result` and `error` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ToolResponse {
    pub fn success(id: Option<String>, result: Value) -> Self {
        Self {
            id,
            ok: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Option<String>, error: &ToolError) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(ErrorBody::from(error)),
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}
