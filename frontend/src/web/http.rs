//! HTTP 传输实现
//!
//! 使用 `web_sys::fetch` 实现共享层的 `HttpClient`。超时通过 `AbortController`
//! 中止请求实现，定时器随请求结束自动清除。

use std::time::Duration;

use evrent_shared::error::{ClientError, ClientResult};
use evrent_shared::request::{HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use super::timer::Timeout;

fn js_err(context: &str, e: JsValue) -> ClientError {
    ClientError::network(format!("{}: {:?}", context, e))
}

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy)]
pub struct FetchHttpClient {
    timeout: Duration,
}

impl FetchHttpClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| js_err("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_err("设置 Header 失败", e))?;
        }

        let controller = AbortController::new().map_err(|e| js_err("创建 AbortController 失败", e))?;
        let signal = controller.signal();

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_signal(Some(&signal));
        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_err("请求构建失败", e))?;

        let window = web_sys::window()
            .ok_or_else(|| ClientError::network("无法获取 window 对象"))?;

        // 守卫离开作用域时清除定时器
        let _deadline = Timeout::new(self.timeout, move || controller.abort());

        let resp_value = match JsFuture::from(window.fetch_with_request(&request)).await {
            Ok(v) => v,
            Err(_) if signal.aborted() => {
                return Err(ClientError::network(format!(
                    "Request timed out after {}s",
                    self.timeout.as_secs()
                )));
            }
            Err(e) => return Err(js_err("网络错误", e)),
        };

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ClientError::decode(format!("Response 类型转换失败: {:?}", e)))?;
        let status = response.status();

        let promise = response.text().map_err(|e| js_err("读取响应失败", e))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| js_err("读取响应失败", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
