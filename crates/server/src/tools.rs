//! The tool seam: an object-safe async handler trait and a name-keyed router.

use std::sync::Arc;

use {async_trait::async_trait, tracing::debug};

use crate::{
    error::{Error, Result},
    types::{ToolDef, ToolsCallResult},
};

/// One callable tool.
///
/// Handlers own whatever provider state they need; the router only knows
/// names and definitions.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    fn definition(&self) -> ToolDef;

    async fn call(&self, arguments: serde_json::Value) -> Result<ToolsCallResult>;
}

/// Registry of tools, listed in registration order.
#[derive(Default)]
pub struct ToolRouter {
    entries: Vec<(ToolDef, Arc<dyn ToolHandler>)>,
}

impl ToolRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let def = handler.definition();
        debug!(tool = %def.name, "registered tool");
        self.entries.push((def, handler));
    }

    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDef> {
        self.entries.iter().map(|(def, _)| def.clone()).collect()
    }

    /// Dispatch a `tools/call` by name.
    ///
    /// An unknown name is the caller's mistake and surfaces as an error; a
    /// handler failure is reported in-band as an `is_error` result so the
    /// client sees the message instead of a protocol fault.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolsCallResult> {
        let Some((_, handler)) = self.entries.iter().find(|(def, _)| def.name == name) else {
            return Err(Error::UnknownTool(name.to_string()));
        };

        match handler.call(arguments).await {
            Ok(result) => Ok(result),
            Err(Error::InvalidParams(message)) => Err(Error::InvalidParams(message)),
            Err(e) => Ok(ToolsCallResult::error_text(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn definition(&self) -> ToolDef {
            ToolDef {
                name: "echo".into(),
                description: "echo the arguments back".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn call(&self, arguments: serde_json::Value) -> Result<ToolsCallResult> {
            Ok(ToolsCallResult::text(arguments.to_string()))
        }
    }

    struct FailingTool;

    #[async_trait]
    impl ToolHandler for FailingTool {
        fn definition(&self) -> ToolDef {
            ToolDef {
                name: "broken".into(),
                description: "always fails".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }
        }

        async fn call(&self, _arguments: serde_json::Value) -> Result<ToolsCallResult> {
            Err(Error::message("upstream exploded"))
        }
    }

    fn router() -> ToolRouter {
        let mut router = ToolRouter::new();
        router.register(Arc::new(EchoTool));
        router.register(Arc::new(FailingTool));
        router
    }

    #[test]
    fn definitions_keep_registration_order() {
        let names: Vec<_> = router()
            .definitions()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["echo", "broken"]);
    }

    #[tokio::test]
    async fn dispatch_routes_by_name() {
        let result = router()
            .dispatch("echo", serde_json::json!({"x": 1}))
            .await
            .unwrap();
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let err = router()
            .dispatch("nope", serde_json::Value::Null)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTool(_)));
    }

    #[tokio::test]
    async fn handler_failure_is_reported_in_band() {
        let result = router()
            .dispatch("broken", serde_json::Value::Null)
            .await
            .unwrap();
        assert!(result.is_error);
    }
}
