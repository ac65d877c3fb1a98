use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::model::{Id, Rental, UserProfile};
use crate::request::HttpMethod;

// =========================================================
// 响应信封 (Envelope)
// =========================================================

/// 所有接口统一的响应外壳：`{success, message, data, errors}`
///
/// `success` 缺省视为成功；有效载荷永远是 `data` 这一层。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default, deserialize_with = "lenient_errors")]
    pub errors: Vec<String>,
}

fn default_success() -> bool {
    true
}

/// `errors` 既可能是字符串数组，也可能是 `{field: [msg]}` 对象，或 `null`
fn lenient_errors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(flatten_messages(&raw))
}

fn flatten_messages(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::String(s) => vec![s.clone()],
        serde_json::Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        serde_json::Value::Object(map) => map.values().flat_map(flatten_messages).collect(),
        _ => Vec::new(),
    }
}

impl<T> Envelope<T> {
    /// 失败时给用户看的消息：优先 `message`，其次第一条 `errors`
    pub fn failure_message(&self) -> Option<String> {
        self.message
            .as_ref()
            .filter(|m| !m.trim().is_empty())
            .cloned()
            .or_else(|| self.errors.first().cloned())
    }
}

// =========================================================
// 请求元数据
// =========================================================

/// 定义固定路径端点的请求-响应关系
pub trait ApiRequest: Serialize {
    /// 信封 `data` 中的类型
    type Response: DeserializeOwned;
    const PATH: &'static str;
    const METHOD: HttpMethod;
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const PATH: &'static str = "/Auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub refresh_token: Option<String>,
    /// 嵌套形式 `{token, user: {...}}`
    pub user: Option<UserProfile>,
    /// 平铺形式 `{token, id, email, fullName, ...}`
    #[serde(flatten)]
    pub profile: UserProfile,
}

impl LoginResponse {
    pub fn into_user(self) -> UserProfile {
        self.user.unwrap_or(self.profile)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

impl ApiRequest for ForgotPasswordRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/Auth/forgot-password";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ApiRequest for ResetPasswordRequest {
    type Response = serde_json::Value;
    const PATH: &'static str = "/Auth/reset-password";
    const METHOD: HttpMethod = HttpMethod::Post;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefreshTokenResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub refresh_token: Option<String>,
}

// =========================================================
// 取车 / 还车 (Rental)
// =========================================================

/// 取车检查提交体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub booking_id: Id,
    pub user_id: Id,
    pub vehicle_id: Id,
    pub pickup_battery_level: u8,
    pub odometer_before_pickup: u32,
    pub pickup_notes: String,
    pub pickup_image_urls: Vec<String>,
    pub renter_signature: String,
    pub staff_signature: String,
}

impl ApiRequest for CheckoutRequest {
    type Response = Rental;
    const PATH: &'static str = "/Rentals/checkout";
    const METHOD: HttpMethod = HttpMethod::Post;
}

/// 还车检查提交体（`POST /Rentals/{id}/checkin`）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    pub return_battery_level: u8,
    pub odometer_after_return: u32,
    pub return_notes: String,
    pub staff_notes: String,
    pub return_image_urls: Vec<String>,
    pub checklist: BTreeMap<String, bool>,
    pub renter_signature: String,
    pub staff_signature: String,
}
