//! Bearer-authenticated calls to the storefront API.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use tradenest_auth::SessionStore;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http;

/// Client for the protected API.
///
/// The access token is read from the store on every call, so a token the
/// Session Guard just refreshed is picked up by the very next request.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: config.api_base_url.clone(),
            http: http::build_client(config)?,
            store,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let resp = self.send(self.request(Method::GET, path)?).await?;
        http::read_json(resp).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::POST, path)?.json(body)).await?;
        http::read_json(resp).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::PUT, path)?.json(body)).await?;
        http::read_json(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let credential = self.store.credential()?.ok_or(ApiError::NotAuthenticated)?;
        let url = http::endpoint(&self.base_url, path);
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(credential.access_token))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        match http::send(request).await {
            Err(ApiError::Status { status: 401, .. }) => {
                tracing::info!("API rejected the access token");
                Err(ApiError::Unauthorized)
            }
            other => other,
        }
    }
}
