//! API 客户端封装
//!
//! 负责拼接 URL、附加认证头、解包响应信封。本身没有任何副作用：
//! 401 以 `ClientError::AuthExpired` 返回，由应用外壳决定清理会话和跳转。

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::HEADER_AUTHORIZATION;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{ApiRequest, Envelope};
use crate::request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};

/// 查询参数 (key, value)，值在拼接时进行百分号编码
pub type Params<'a> = &'a [(&'a str, String)];

pub struct ApiClient<C: HttpClient> {
    client: C,
    base_url: String,
    token: Option<String>,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(client: C, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.set_token(token);
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.is_empty());
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 底层传输
    pub fn http(&self) -> &C {
        &self.client
    }

    // =========================================================
    // 请求入口
    // =========================================================

    /// 发送请求并返回信封中的 `data`；`data` 缺失视为解码错误
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        params: Params<'_>,
    ) -> ClientResult<T> {
        self.request_optional(method, path, body, params)
            .await?
            .ok_or_else(|| {
                let e = ClientError::decode(format!("{} {}: response has no data", method.as_str(), path));
                log_error!("{}", e);
                e
            })
    }

    /// `data` 允许为空
    pub async fn request_optional<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        params: Params<'_>,
    ) -> ClientResult<Option<T>> {
        let req = self.build(method, path, body, params);
        let result = match self.client.send(req).await {
            Ok(resp) => Self::interpret(resp),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            if !e.is_auth_expired() {
                log_error!("API Error [{} {}]: {}", method.as_str(), path, e);
            }
        }
        result
    }

    /// 只关心成功与否，忽略 `data`
    pub async fn request_empty(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        params: Params<'_>,
    ) -> ClientResult<()> {
        self.request_optional::<serde_json::Value>(method, path, body, params)
            .await
            .map(|_| ())
    }

    /// 固定路径端点，`data` 允许为空
    pub async fn send<R: ApiRequest>(&self, req: &R) -> ClientResult<Option<R::Response>> {
        let body = serde_json::to_value(req)?;
        self.request_optional(R::METHOD, R::PATH, Some(body), &[]).await
    }

    // --- Convenience helpers ---

    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: Params<'_>) -> ClientResult<T> {
        self.request(HttpMethod::Get, path, None, params).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(HttpMethod::Post, path, Some(body), &[]).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.request(HttpMethod::Put, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.request_empty(HttpMethod::Delete, path, None, &[]).await
    }

    // =========================================================
    // 内部实现
    // =========================================================

    pub fn url(&self, path: &str, params: Params<'_>) -> String {
        let path = path.trim_start_matches('/');
        let mut url = format!("{}/{}", self.base_url, path);

        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    fn build(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<serde_json::Value>,
        params: Params<'_>,
    ) -> HttpRequest {
        let mut req = HttpRequest::new(&self.url(path, params), method)
            .with_header("Content-Type", "application/json")
            .with_header("Accept", "application/json");

        if let Some(token) = &self.token {
            req = req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }
        if let Some(body) = body {
            req = req.with_body(body);
        }
        req
    }

    fn interpret<T: DeserializeOwned>(resp: HttpResponse) -> ClientResult<Option<T>> {
        if resp.status == 401 {
            return Err(ClientError::AuthExpired);
        }

        if !resp.is_success() {
            let message = resp
                .json::<Envelope<serde_json::Value>>()
                .ok()
                .and_then(|env| env.failure_message())
                .or_else(|| Some(resp.body.trim().to_string()).filter(|b| !b.is_empty()))
                .unwrap_or_else(|| format!("HTTP {}", resp.status));
            return Err(ClientError::api(resp.status, message));
        }

        if resp.body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: Envelope<T> = resp.json()?;
        if !envelope.success {
            let message = envelope
                .failure_message()
                .unwrap_or_else(|| "Request failed".to_string());
            return Err(ClientError::api(resp.status, message));
        }
        Ok(envelope.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::MockHttpClient;
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "http://api.test/api";

    fn client(token: Option<&str>) -> ApiClient<MockHttpClient> {
        let cfg = ClientConfig::new("http://api.test/api/", Duration::from_secs(10));
        ApiClient::new(MockHttpClient::new(), &cfg).with_token(token.map(String::from))
    }

    #[tokio::test]
    async fn test_unwraps_envelope_data() {
        let api = client(Some("abc"));
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{}/Vehicles/3", BASE),
            200,
            json!({"success": true, "message": "ok", "data": {"n": 3}}),
        );

        let v: serde_json::Value = api.get("Vehicles/3", &[]).await.unwrap();
        assert_eq!(v, json!({"n": 3}));

        let requests = api.client.requests.borrow();
        let (_, method, headers, body) = &requests[0];
        assert_eq!(method, "GET");
        assert_eq!(headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_no_auth_header_without_token() {
        let api = client(None);
        api.client
            .mock_response(HttpMethod::Get, &format!("{}/bookings", BASE), 200, json!({"data": []}));

        let _: Vec<serde_json::Value> = api.get("/bookings", &[]).await.unwrap();
        let requests = api.client.requests.borrow();
        assert!(!requests[0].2.contains_key("Authorization"));
    }

    #[tokio::test]
    async fn test_query_is_encoded() {
        let api = client(None);
        let url = api.url("/staff/dashboard", &[("stationId", "a b&c".to_string())]);
        assert_eq!(url, format!("{}/staff/dashboard?stationId=a%20b%26c", BASE));
    }

    #[tokio::test]
    async fn test_401_is_auth_expired() {
        let api = client(Some("stale"));
        api.client
            .mock_raw(HttpMethod::Get, &format!("{}/Auth/me", BASE), 401, "");

        let err = api.get::<serde_json::Value>("/Auth/me", &[]).await.unwrap_err();
        assert_eq!(err, ClientError::AuthExpired);
    }

    #[tokio::test]
    async fn test_success_false_maps_to_api_error() {
        let api = client(None);
        api.client.mock_response(
            HttpMethod::Post,
            &format!("{}/Rentals/checkout", BASE),
            200,
            json!({"success": false, "message": "Vehicle not ready", "data": null}),
        );

        let err = api
            .post::<_, serde_json::Value>("/Rentals/checkout", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err, ClientError::api(200, "Vehicle not ready"));
    }

    #[tokio::test]
    async fn test_non_2xx_message_fallbacks() {
        let api = client(None);
        api.client.mock_response(
            HttpMethod::Get,
            &format!("{}/a", BASE),
            400,
            json!({"success": false, "errors": ["bad input"]}),
        );
        api.client.mock_raw(HttpMethod::Get, &format!("{}/b", BASE), 502, "Bad Gateway");
        api.client.mock_raw(HttpMethod::Get, &format!("{}/c", BASE), 500, "");

        let a = api.get::<serde_json::Value>("/a", &[]).await.unwrap_err();
        let b = api.get::<serde_json::Value>("/b", &[]).await.unwrap_err();
        let c = api.get::<serde_json::Value>("/c", &[]).await.unwrap_err();
        assert_eq!(a, ClientError::api(400, "bad input"));
        assert_eq!(b, ClientError::api(502, "Bad Gateway"));
        assert_eq!(c, ClientError::api(500, "HTTP 500"));
    }

    #[tokio::test]
    async fn test_missing_data_and_bad_json() {
        let api = client(None);
        api.client
            .mock_response(HttpMethod::Get, &format!("{}/empty", BASE), 200, json!({"success": true}));
        api.client
            .mock_raw(HttpMethod::Get, &format!("{}/html", BASE), 200, "<html></html>");

        let empty: Option<u32> = api
            .request_optional(HttpMethod::Get, "/empty", None, &[])
            .await
            .unwrap();
        assert!(empty.is_none());

        let err = api.get::<u32>("/empty", &[]).await.unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");

        let err = api.get::<u32>("/html", &[]).await.unwrap_err();
        assert_eq!(err.error_code(), "DECODE_ERROR");
    }
}
