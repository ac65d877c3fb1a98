//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
//! 以减小 WASM 二进制体积。

mod http;
mod object_url;
pub mod route;
pub mod router;
mod storage;
mod timer;

pub use http::FetchHttpClient;
pub use object_url::ObjectUrl;
pub use storage::LocalStorage;
