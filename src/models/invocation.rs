use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PROMPT: &str = "The cat on beach";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Check the logs for more details.";

/// Direct invocation payload of the image generator.
///
/// An absent `prompt` falls back to [`DEFAULT_PROMPT`]. An explicit `null`
/// is not a prompt and fails to parse, so the invocation answers 500.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageEvent {
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    /// 500 with the generic message encoded as a JSON string.
    pub fn internal_error() -> Self {
        let body = serde_json::to_string(GENERIC_FAILURE_MESSAGE)
            .unwrap_or_else(|_| format!("\"{}\"", GENERIC_FAILURE_MESSAGE));
        Self {
            status_code: 500,
            body,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ActionParameter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Bedrock Agents action-group invocation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentActionEvent {
    #[serde(default)]
    pub message_version: Option<String>,
    #[serde(default)]
    pub action_group: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    #[serde(default)]
    pub session_attributes: Option<Value>,
    #[serde(default)]
    pub prompt_session_attributes: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalePageInput {
    pub prompt: String,
    pub text: String,
}

impl AgentActionEvent {
    /// Later duplicates win, absent values become empty strings.
    pub fn sale_page_input(&self) -> SalePageInput {
        let mut input = SalePageInput::default();
        for param in &self.parameters {
            let value = param.value.clone().unwrap_or_default();
            match param.name.as_deref() {
                Some("text") => input.text = value,
                Some("prompt") => input.prompt = value,
                _ => {}
            }
        }
        input
    }

    pub fn respond_with_text(&self, body: impl Into<String>) -> AgentActionResponse {
        AgentActionResponse {
            message_version: self.message_version.clone().unwrap_or_default(),
            response: FunctionResponseEnvelope {
                action_group: self.action_group.clone().unwrap_or_default(),
                function: self.function.clone().unwrap_or_default(),
                function_response: FunctionResponse {
                    response_body: ResponseBody {
                        text: TextBody { body: body.into() },
                    },
                },
            },
            session_attributes: self.session_attributes.clone(),
            prompt_session_attributes: self.prompt_session_attributes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentActionResponse {
    pub message_version: String,
    pub response: FunctionResponseEnvelope,
    pub session_attributes: Option<Value>,
    pub prompt_session_attributes: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponseEnvelope {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub response_body: ResponseBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseBody {
    #[serde(rename = "TEXT")]
    pub text: TextBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextBody {
    pub body: String,
}
