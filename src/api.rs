//! Object-safe client interface for code that should not depend on [`RestClient`] directly.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::http::RestClient;

/// A JSON REST client working on untyped [`serde_json::Value`] documents.
///
/// `get`, `post` and `delete` follow the same soft-fail policies as the
/// methods of the same name on [`RestClient`]; the `try_*` methods return
/// every failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestApi: Send + Sync {
    fn timeout(&self) -> u64;
    fn set_timeout(&self, secs: u64) -> Result<()>;
    fn can_set_timeout(&self) -> bool;
    fn set_can_set_timeout(&self, enabled: bool);
    fn use_streams(&self) -> bool;
    fn set_use_streams(&self, enabled: bool);

    fn cancel_request(&self);

    async fn get(&self, path: &str) -> Vec<Value>;
    async fn post(&self, path: &str, payload: &Value) -> Result<Vec<Value>>;
    async fn delete(&self, path: &str);

    async fn try_get(&self, path: &str) -> Result<Vec<Value>>;
    async fn try_post(&self, path: &str, payload: &Value) -> Result<Option<Value>>;
    async fn try_delete(&self, path: &str) -> Result<()>;
}

#[async_trait]
impl RestApi for RestClient {
    fn timeout(&self) -> u64 {
        RestClient::timeout(self)
    }

    fn set_timeout(&self, secs: u64) -> Result<()> {
        RestClient::set_timeout(self, secs)
    }

    fn can_set_timeout(&self) -> bool {
        RestClient::can_set_timeout(self)
    }

    fn set_can_set_timeout(&self, enabled: bool) {
        RestClient::set_can_set_timeout(self, enabled)
    }

    fn use_streams(&self) -> bool {
        RestClient::use_streams(self)
    }

    fn set_use_streams(&self, enabled: bool) {
        RestClient::set_use_streams(self, enabled)
    }

    fn cancel_request(&self) {
        RestClient::cancel_request(self)
    }

    async fn get(&self, path: &str) -> Vec<Value> {
        RestClient::get::<Value>(self, path).await
    }

    async fn post(&self, path: &str, payload: &Value) -> Result<Vec<Value>> {
        RestClient::post::<Value, Value>(self, path, payload).await
    }

    async fn delete(&self, path: &str) {
        RestClient::delete(self, path).await
    }

    async fn try_get(&self, path: &str) -> Result<Vec<Value>> {
        RestClient::try_get::<Value>(self, path).await
    }

    async fn try_post(&self, path: &str, payload: &Value) -> Result<Option<Value>> {
        RestClient::try_post::<Value, Value>(self, path, payload).await
    }

    async fn try_delete(&self, path: &str) -> Result<()> {
        RestClient::try_delete(self, path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_rest_client_through_trait_object() {
        let mut server = mockito::Server::new_async().await;
        let get = server
            .mock("GET", "/widgets")
            .with_status(200)
            .with_body(r#"[{"id": 1}]"#)
            .create_async()
            .await;
        let post = server
            .mock("POST", "/widgets")
            .with_status(201)
            .with_body(r#"{"id": 2}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/widgets/2")
            .with_status(204)
            .create_async()
            .await;

        let api: Box<dyn RestApi> = Box::new(RestClient::new(&server.url()).unwrap());
        assert_eq!(api.get("widgets").await, vec![json!({"id": 1})]);
        assert_eq!(
            api.post("widgets", &json!({"name": "gear"})).await.unwrap(),
            vec![json!({"id": 2})]
        );
        api.try_delete("widgets/2").await.unwrap();

        get.assert_async().await;
        post.assert_async().await;
        delete.assert_async().await;
    }

    #[test]
    fn test_settings_through_trait() {
        let client = RestClient::new("http://localhost:5000").unwrap();
        let api: &dyn RestApi = &client;

        api.set_use_streams(false);
        api.set_can_set_timeout(true);
        api.set_timeout(4).unwrap();

        assert!(!client.use_streams());
        assert!(api.can_set_timeout());
        assert_eq!(api.timeout(), 4);
        assert!(api.set_timeout(0).is_err());
    }

    #[test]
    fn test_cancel_through_trait() {
        let client = RestClient::new("http://localhost:5000").unwrap();
        RestApi::cancel_request(&client);
        assert!(client.is_cancelled());
    }
}
