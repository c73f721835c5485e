use planboard_core::OrgId;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{PlanboardError, PlanboardErrorKind};

#[derive(Debug, Default, Clone)]
pub struct ClientOptions {
    pub api_key: Option<String>,
}

/// HTTP client for the Planboard API, scoped to one organization via the
/// `x-org-id` header.
#[derive(Debug, Clone)]
pub struct PlanboardClient {
    base_url: String,
    org_id: OrgId,
    opts: ClientOptions,
    http: reqwest::Client,
}

impl PlanboardClient {
    pub fn new(base_url: impl Into<String>, org_id: OrgId) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            org_id,
            opts: ClientOptions::default(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.opts.api_key = Some(api_key.into());
        self
    }

    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, extra: Option<HeaderMap>) -> Result<HeaderMap, PlanboardError> {
        let mut headers = HeaderMap::new();
        let org = HeaderValue::from_str(&self.org_id.to_string()).map_err(|e| {
            PlanboardError::new(PlanboardErrorKind::Serialization, None, e.to_string())
        })?;
        headers.insert(HeaderName::from_static("x-org-id"), org);
        if let Some(api_key) = self.opts.api_key.as_deref() {
            let v = format!("Bearer {api_key}");
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&v).map_err(|e| {
                    PlanboardError::new(PlanboardErrorKind::Serialization, None, e.to_string())
                })?,
            );
        }
        if let Some(extra) = extra {
            headers.extend(extra);
        }
        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        query: Option<&impl Serialize>,
        body: Option<&impl Serialize>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<Response, PlanboardError> {
        let mut req = self.http.request(method, self.url(path));
        if let Some(q) = query {
            req = req.query(q);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        req = req.headers(self.headers(extra_headers)?);
        Ok(req.send().await?)
    }

    pub(crate) async fn map_error(&self, resp: Response) -> Result<PlanboardError, PlanboardError> {
        let status = resp.status();
        let code = status.as_u16();
        let text = resp.text().await.unwrap_or_default();
        Ok(PlanboardError::new(
            kind_for_status(code),
            Some(code),
            if text.is_empty() {
                status.to_string()
            } else {
                text
            },
        ))
    }

    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&impl Serialize>,
        body: Option<&impl Serialize>,
    ) -> Result<T, PlanboardError> {
        let resp = self.send(method, path, query, body, None).await?;
        if resp.status().is_success() {
            if resp.status().as_u16() == 204 {
                // Can't deserialize an empty body.
                return Ok(serde_json::from_value(Value::Null)?);
            }
            return Ok(resp.json::<T>().await?);
        }
        Err(self.map_error(resp).await?)
    }

    /// Issues a request whose response body is irrelevant; any 2xx is Ok.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> Result<(), PlanboardError> {
        let resp = self.send(method, path, None::<&()>, body, None).await?;
        if resp.status().is_success() {
            return Ok(());
        }
        Err(self.map_error(resp).await?)
    }

    pub fn plan(&self) -> crate::apis::PlanApi {
        crate::apis::PlanApi::new(self.clone())
    }

    pub fn items(&self) -> crate::apis::ItemsApi {
        crate::apis::ItemsApi::new(self.clone())
    }

    pub fn buckets(&self) -> crate::apis::BucketsApi {
        crate::apis::BucketsApi::new(self.clone())
    }

    /// SSE change feed backed by this client's connection settings.
    pub fn feed(&self) -> crate::feed::SseChangeFeed {
        crate::feed::SseChangeFeed::new(self.clone())
    }
}

fn kind_for_status(code: u16) -> PlanboardErrorKind {
    if code == 404 {
        PlanboardErrorKind::NotFound
    } else if code == 401 || code == 403 {
        PlanboardErrorKind::Auth
    } else if (400..500).contains(&code) {
        PlanboardErrorKind::Validation
    } else {
        PlanboardErrorKind::Server
    }
}
