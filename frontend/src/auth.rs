//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。

use evrent_shared::service::AuthService;
use evrent_shared::{ClientResult, Session, SessionStore, UserProfile};
use leptos::prelude::*;

use crate::api::{self, Api};
use crate::web::LocalStorage;

fn store() -> SessionStore<LocalStorage> {
    SessionStore::load(LocalStorage)
}

/// 认证状态
#[derive(Clone, Default)]
pub struct AuthState {
    /// 当前会话（用户资料 + token）
    pub session: Option<Session>,
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 认证状态（只读）
    pub state: ReadSignal<AuthState>,
    /// 设置认证状态（写入）
    pub set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().session.is_some())
    }

    /// 当前用户（响应式）
    pub fn user(&self) -> Option<UserProfile> {
        self.state.with(|s| s.session.as_ref().map(|s| s.user.clone()))
    }

    /// 携带当前 token 的 API 客户端
    pub fn api(&self) -> Api {
        let token = self
            .state
            .with_untracked(|s| s.session.as_ref().map(|s| s.token.clone()));
        api::build(token)
    }

    /// 会话过期：清空存储并更新状态，路由服务随后跳转登录页
    pub fn expire(&self) {
        web_sys::console::warn_1(&"[Auth] Session expired, signing out.".into());
        store().clear();
        self.set_state.update(|state| state.session = None);
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态
///
/// 从 LocalStorage 恢复上次的会话。
pub fn init_auth(ctx: &AuthContext) {
    let session = store().session().cloned();
    ctx.set_state.update(|state| state.session = session);
}

/// 上次登录使用的邮箱，用于自动填充
pub fn last_email() -> Option<String> {
    store().last_email()
}

/// 登录并保存会话
///
/// # Arguments
/// * `ctx` - 认证上下文
/// * `email` - 登录邮箱
/// * `password` - 密码
pub async fn login(ctx: &AuthContext, email: String, password: String) -> ClientResult<UserProfile> {
    let api = api::build(None);
    let mut session = store();
    let user = AuthService::new(&api)
        .login(&mut session, &email, &password)
        .await?;

    let current = session.session().cloned();
    ctx.set_state.update(|state| state.session = current);
    Ok(user)
}

/// 注销并清除状态
///
/// 导航将由路由服务的认证状态监听自动处理。
pub async fn logout(ctx: &AuthContext) {
    let api = ctx.api();
    let mut session = store();
    AuthService::new(&api).logout(&mut session).await;
    ctx.set_state.update(|state| state.session = None);
}

/// 用服务端资料刷新会话中的用户
pub fn update_user(ctx: &AuthContext, user: UserProfile) {
    let mut session = store();
    session.update_user(user);
    let current = session.session().cloned();
    ctx.set_state.update(|state| state.session = current);
}
