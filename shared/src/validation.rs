//! 认证相关表单的客户端校验

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ValidationError;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordForm {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordForm {
    #[validate(length(min = 1, message = "Reset link is invalid or has expired"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// 校验并把第一个错误转换为字段级错误
pub fn check<T: Validate>(form: &T) -> Result<(), ValidationError> {
    form.validate().map_err(ValidationError::from)
}

impl LoginForm {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

impl ForgotPasswordForm {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.trim().to_string(),
        }
    }
}

impl ResetPasswordForm {
    pub fn new(token: &str, new_password: &str, confirm_password: &str) -> Self {
        Self {
            token: token.trim().to_string(),
            new_password: new_password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }
}
