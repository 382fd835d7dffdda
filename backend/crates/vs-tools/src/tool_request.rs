use serde::Deserialize;
use serde_json::Value;

/// One line of input on the tool surface
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolRequest {
    /// Echoed back on the response
    #[serde(default)]
    pub id: Option<String>,
    /// Request budget key; anonymous callers share one budget
    #[serde(default)]
    pub caller: Option<String>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl ToolRequest {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            id: None,
            caller: None,
            method: method.into(),
            params,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }
}
