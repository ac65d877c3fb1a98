use std::fmt;

use serde::{Deserialize, Serialize};

// =========================================================
// 字段级校验错误
// =========================================================

/// 客户端表单校验失败
///
/// 只在 UI 层产生，永远不会触达网络。
/// `field` 使用与表单控件一致的路径，例如 `odometer`、`images.front`、`checklist.clean`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl std::error::Error for ValidationError {}

// =========================================================
// 核心错误类型
// =========================================================

/// API 调用链上的所有错误
///
/// - `Network`: 请求未完成（断网、超时、CORS）
/// - `Api`: 服务端返回非 2xx，或信封中 `success == false`
/// - `AuthExpired`: 401，会话失效。HTTP 层不做任何副作用，由应用外壳清理会话并跳转
/// - `Validation`: 客户端校验失败
/// - `Decode`: 响应体无法解析
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    Network(String),
    Api { status: u16, message: String },
    AuthExpired,
    Validation(ValidationError),
    Decode(String),
}

impl ClientError {
    // --- Convenience constructors ---

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, reason))
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    // --- Accessors ---

    /// 对应的 HTTP 状态码（仅服务端产生的错误才有）
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::AuthExpired => Some(401),
            _ => None,
        }
    }

    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::AuthExpired => "AUTH_EXPIRED",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ClientError::AuthExpired)
    }

    /// 展示给用户的消息（尽量原样透出服务端信息）
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(msg) => format!("Connection error: {}", msg),
            ClientError::Api { message, .. } => message.clone(),
            ClientError::AuthExpired => "Your session has expired. Please sign in again.".into(),
            ClientError::Validation(v) => v.reason.clone(),
            ClientError::Decode(_) => "Unexpected response from server".into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "[{}] {}", self.error_code(), msg),
            ClientError::Api { status, message } => {
                write!(f, "[{}] {} {}", self.error_code(), status, message)
            }
            ClientError::AuthExpired => write!(f, "[{}] session expired", self.error_code()),
            ClientError::Validation(v) => write!(f, "[{}] {}", self.error_code(), v),
            ClientError::Decode(msg) => write!(f, "[{}] {}", self.error_code(), msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

// =========================================================
// 类型转换实现
// =========================================================

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        ClientError::Validation(e)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

/// 取第一个出错字段（按字段名排序，保证结果稳定）
impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<_> = field_errors.into_iter().collect();
        fields.sort_by_key(|(name, _)| *name);

        match fields.first() {
            Some((name, list)) => {
                let reason = list
                    .first()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "invalid".to_string());
                ValidationError::new(*name, reason)
            }
            None => ValidationError::new("form", "invalid"),
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation(errors.into())
    }
}
