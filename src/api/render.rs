use serde_json::{json, Value};

use crate::error::Result;

/// Turns a template name and its context into a response body.
///
/// The booking handlers only build contexts; producing HTML is up to the
/// renderer plugged into [`super::AppState`].
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Value) -> Result<String>;

    fn content_type(&self) -> &'static str;
}

/// Emits `{"template": ..., "context": ...}` as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String> {
        let body = json!({
            "template": template,
            "context": context,
        });
        Ok(serde_json::to_string(&body)?)
    }

    fn content_type(&self) -> &'static str {
        "application/json"
    }
}
