//! 前端 API 客户端
//!
//! 共享层的 `ApiClient` 配上基于 fetch 的传输；token 由调用方从会话传入。

use evrent_shared::{ApiClient, ClientConfig};

use crate::web::FetchHttpClient;

pub type Api = ApiClient<FetchHttpClient>;

/// 按构建期配置创建客户端
pub fn build(token: Option<String>) -> Api {
    let config = ClientConfig::from_env();
    ApiClient::new(FetchHttpClient::new(config.timeout), &config).with_token(token)
}
