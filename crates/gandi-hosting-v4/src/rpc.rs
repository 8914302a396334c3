//! RPC transport seam
//!
//! Every v4 call is a method name plus positional arguments. Encoding them
//! on the wire is left to whatever implements [`Caller`].

use async_trait::async_trait;
use gandi_hosting::TransportError;
use serde_json::Value;
use std::sync::Arc;

/// Sends one RPC call and returns the raw reply
#[async_trait]
pub trait Caller: Send + Sync {
    async fn send(&self, method: &str, args: Vec<Value>) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Caller + ?Sized> Caller for Arc<T> {
    async fn send(&self, method: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        (**self).send(method, args).await
    }
}

#[async_trait]
impl<T: Caller + ?Sized> Caller for Box<T> {
    async fn send(&self, method: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        (**self).send(method, args).await
    }
}

/// Prepends the API key to the arguments of every call
pub struct ApiKeyCaller<T> {
    inner: T,
    api_key: String,
}

impl<T: Caller> ApiKeyCaller<T> {
    pub fn new(inner: T, api_key: impl Into<String>) -> Self {
        Self {
            inner,
            api_key: api_key.into(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> std::fmt::Debug for ApiKeyCaller<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCaller")
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Caller> Caller for ApiKeyCaller<T> {
    async fn send(&self, method: &str, args: Vec<Value>) -> Result<Value, TransportError> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(Value::from(self.api_key.as_str()));
        full.extend(args);
        self.inner.send(method, full).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCaller;
    use serde_json::json;

    #[tokio::test]
    async fn test_api_key_goes_first() {
        let mock = Arc::new(MockCaller::new());
        mock.expect_with("hosting.vm.info", vec![json!("secret"), json!(42)], json!({"id": 42}));

        let caller = ApiKeyCaller::new(mock.clone(), "secret");
        let reply = caller.send("hosting.vm.info", vec![json!(42)]).await.unwrap();

        assert_eq!(reply, json!({"id": 42}));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_debug_hides_key() {
        let caller = ApiKeyCaller::new(MockCaller::new(), "secret");
        let shown = format!("{caller:?}");
        assert!(!shown.contains("secret"));
    }
}
