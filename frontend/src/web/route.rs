//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性。

use std::fmt::Display;

use evrent_shared::Id;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    ForgotPassword,
    /// 重置密码，token 取自查询参数
    ResetPassword,
    /// 车队面板 (需要认证)
    Dashboard,
    VehicleDetail(Id),
    /// 交车检查，参数为车辆 ID
    Checkout(Id),
    /// 还车检查，参数为租赁 ID
    Return(Id),
    History,
    Profile,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询串和结尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] | ["dashboard"] => Self::Dashboard,
            ["login"] => Self::Login,
            ["forgot-password"] => Self::ForgotPassword,
            ["reset-password"] => Self::ResetPassword,
            ["vehicles", id] => parse_id(id).map_or(Self::NotFound, Self::VehicleDetail),
            ["check-out", id] => parse_id(id).map_or(Self::NotFound, Self::Checkout),
            ["check-in", "return", id] => parse_id(id).map_or(Self::NotFound, Self::Return),
            ["history"] => Self::History,
            ["profile"] => Self::Profile,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::ForgotPassword => "/forgot-password".to_string(),
            Self::ResetPassword => "/reset-password".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::VehicleDetail(id) => format!("/vehicles/{}", id),
            Self::Checkout(id) => format!("/check-out/{}", id),
            Self::Return(id) => format!("/check-in/return/{}", id),
            Self::History => "/history".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            Self::Login | Self::ForgotPassword | Self::ResetPassword | Self::NotFound
        )
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 导航栏高亮所属的顶级分区
    pub fn section(&self) -> Self {
        match self {
            Self::VehicleDetail(_) | Self::Checkout(_) | Self::Return(_) => Self::Dashboard,
            other => other.clone(),
        }
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

fn parse_id(raw: &str) -> Option<Id> {
    raw.parse::<Id>().ok().filter(|id| *id > 0)
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
