//! Role API: the remote service that owns catalog and role persistence

use std::sync::Arc;

use async_trait::async_trait;

use crate::catalog::CatalogResponse;
use crate::error::Result;
use crate::role::{Role, RoleDraft, RoleId};
use crate::session::User;

#[async_trait]
pub trait RoleApi: Send + Sync {
    /// `GET /permissions/catalog`
    async fn fetch_catalog(&self) -> Result<CatalogResponse>;

    /// `GET /roles/{id}`
    async fn get_role(&self, id: &RoleId) -> Result<Role>;

    /// `POST /roles`
    async fn create_role(&self, draft: &RoleDraft) -> Result<Role>;

    /// `PATCH /roles/{id}`
    async fn update_role(&self, id: &RoleId, draft: &RoleDraft) -> Result<Role>;

    /// `PATCH /roles/{id}/toggle-active`: flips `isActive`
    async fn toggle_role_active(&self, id: &RoleId) -> Result<Role>;

    /// `GET /auth/me`
    async fn current_user(&self) -> Result<User>;
}

#[async_trait]
impl<T: RoleApi + ?Sized> RoleApi for Arc<T> {
    async fn fetch_catalog(&self) -> Result<CatalogResponse> {
        (**self).fetch_catalog().await
    }

    async fn get_role(&self, id: &RoleId) -> Result<Role> {
        (**self).get_role(id).await
    }

    async fn create_role(&self, draft: &RoleDraft) -> Result<Role> {
        (**self).create_role(draft).await
    }

    async fn update_role(&self, id: &RoleId, draft: &RoleDraft) -> Result<Role> {
        (**self).update_role(id, draft).await
    }

    async fn toggle_role_active(&self, id: &RoleId) -> Result<Role> {
        (**self).toggle_role_active(id).await
    }

    async fn current_user(&self) -> Result<User> {
        (**self).current_user().await
    }
}

#[cfg(feature = "client")]
pub use http::HttpRoleApi;

#[cfg(feature = "client")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::{Client, Method, RequestBuilder, Response};
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use tracing::debug;

    use super::RoleApi;
    use crate::catalog::CatalogResponse;
    use crate::config::Config;
    use crate::error::{Result, RolegateError};
    use crate::role::{Role, RoleDraft, RoleId};
    use crate::session::User;

    /// `{"message": "..."}` or, for validation failures, `{"message": ["...", "..."]}`
    #[derive(Deserialize)]
    struct ErrorBody {
        message: ErrorMessage,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ErrorMessage {
        One(String),
        Many(Vec<String>),
    }

    impl ErrorMessage {
        fn into_text(self) -> String {
            match self {
                ErrorMessage::One(m) => m,
                ErrorMessage::Many(ms) => ms.join("; "),
            }
        }
    }

    /// reqwest-backed `RoleApi`
    #[derive(Debug, Clone)]
    pub struct HttpRoleApi {
        client: Client,
        base_url: String,
        token: Option<String>,
    }

    impl HttpRoleApi {
        pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
            let client = Client::builder().timeout(timeout).build()?;
            Ok(Self {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                token,
            })
        }

        pub fn from_config(config: &Config) -> Result<Self> {
            Self::new(&config.api_url, config.api_token.clone(), config.timeout())
        }

        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        fn request(&self, method: Method, path: &str) -> RequestBuilder {
            let req = self.client.request(method, self.url(path));
            match &self.token {
                Some(t) => req.bearer_auth(t),
                None => req,
            }
        }

        async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
            let status = resp.status();
            if status.is_success() {
                return Ok(resp.json().await?);
            }
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.message.into_text())
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            Err(RolegateError::Api { status: status.as_u16(), message })
        }

        async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
            Self::decode(req.send().await?).await
        }
    }

    #[async_trait]
    impl RoleApi for HttpRoleApi {
        async fn fetch_catalog(&self) -> Result<CatalogResponse> {
            debug!("fetch catalog");
            self.send(self.request(Method::GET, "/permissions/catalog")).await
        }

        async fn get_role(&self, id: &RoleId) -> Result<Role> {
            debug!(%id, "fetch role");
            self.send(self.request(Method::GET, &format!("/roles/{}", id))).await
        }

        async fn create_role(&self, draft: &RoleDraft) -> Result<Role> {
            self.send(self.request(Method::POST, "/roles").json(draft)).await
        }

        async fn update_role(&self, id: &RoleId, draft: &RoleDraft) -> Result<Role> {
            self.send(self.request(Method::PATCH, &format!("/roles/{}", id)).json(draft)).await
        }

        async fn toggle_role_active(&self, id: &RoleId) -> Result<Role> {
            self.send(self.request(Method::PATCH, &format!("/roles/{}/toggle-active", id))).await
        }

        async fn current_user(&self) -> Result<User> {
            self.send(self.request(Method::GET, "/auth/me")).await
        }
    }
}
