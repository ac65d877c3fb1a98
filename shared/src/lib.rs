//! 电动车租赁站员工端的平台无关核心
//!
//! 前端（WASM）与原生测试共用同一套领域模型、协议、API 客户端和业务状态机。

// =========================================================
// 宏定义 (日志)
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info { ($($t:tt)*) => (web_sys::console::log_1(&format!($($t)*).into())) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info { ($($t:tt)*) => (println!($($t)*)) }

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn { ($($t:tt)*) => (web_sys::console::warn_1(&format!($($t)*).into())) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn { ($($t:tt)*) => (eprintln!($($t)*)) }

#[cfg(target_arch = "wasm32")]
macro_rules! log_error { ($($t:tt)*) => (web_sys::console::error_1(&format!($($t)*).into())) }
#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error { ($($t:tt)*) => (eprintln!($($t)*)) }

pub mod api;
pub mod config;
pub mod date;
pub mod error;
pub mod fleet;
pub mod history;
pub mod inspection;
pub mod model;
pub mod protocol;
pub mod request;
pub mod service;
pub mod session;
pub mod validation;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 原始 Bearer Token 的存储键
pub const STORAGE_KEY_TOKEN: &str = "token";
/// 持久化会话 `{user, token}` 的存储键
pub const STORAGE_KEY_SESSION: &str = "user-storage";
/// 登录页记住的上次邮箱
pub const STORAGE_KEY_LAST_EMAIL: &str = "evrent_last_email";

pub const HEADER_AUTHORIZATION: &str = "Authorization";

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ValidationError};
pub use model::{
    Booking, CheckinInfo, Id, Rental, StaffDashboard, UserProfile, Vehicle, VehicleStatus,
};
pub use session::{KeyValueStore, Session, SessionStore};
