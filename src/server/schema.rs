//! Request/response envelopes and the JSON Schemas published for them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ChainInput;

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub input: ChainInput,
    /// Accepted for envelope compatibility; no config keys are honored.
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub kwargs: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub output: String,
    pub metadata: InvokeMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeMetadata {
    pub run_id: String,
    pub feedback_tokens: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub inputs: Vec<ChainInput>,
    #[serde(default)]
    pub config: Value,
    #[serde(default)]
    pub kwargs: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub output: Vec<String>,
    pub metadata: BatchMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub run_ids: Vec<String>,
}

pub fn input_schema() -> Value {
    json!({
        "title": "PromptInput",
        "type": "object",
        "properties": {
            "player": { "title": "Player", "type": "string", "minLength": 1 },
            "text": { "title": "Text", "type": "string", "default": "" }
        },
        "required": ["player"]
    })
}

pub fn output_schema() -> Value {
    json!({
        "title": "StrOutputParserOutput",
        "type": "string"
    })
}

pub fn config_schema() -> Value {
    json!({
        "title": "RunnableSequenceConfig",
        "type": "object",
        "properties": {}
    })
}
