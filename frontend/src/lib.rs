//! EV 租赁站员工端前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `notify`: 全局通知与会话过期处理
//! - `components`: UI 组件层

mod api;
mod auth;
mod components {
    pub mod auth_card;
    pub mod dashboard;
    pub mod forgot_password;
    pub mod history;
    mod icons;
    pub mod inspection;
    pub mod layout;
    pub mod login;
    pub mod profile;
    pub mod reset_password;
    pub mod vehicle_card;
    pub mod vehicle_detail;
}
mod notify;
pub(crate) mod web;

use crate::auth::{AuthContext, init_auth};
use crate::components::dashboard::DashboardPage;
use crate::components::forgot_password::ForgotPasswordPage;
use crate::components::history::HistoryPage;
use crate::components::inspection::{CheckoutPage, ReturnPage};
use crate::components::layout::Shell;
use crate::components::login::LoginPage;
use crate::components::profile::ProfilePage;
use crate::components::reset_password::ResetPasswordPage;
use crate::components::vehicle_detail::VehicleDetailPage;
use crate::notify::{ToastHost, provide_notifier};

use leptos::prelude::*;

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。受保护页面包在外壳里。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::ForgotPassword => view! { <ForgotPasswordPage /> }.into_any(),
        AppRoute::ResetPassword => view! { <ResetPasswordPage /> }.into_any(),
        AppRoute::Dashboard => view! { <Shell><DashboardPage /></Shell> }.into_any(),
        AppRoute::VehicleDetail(id) => {
            view! { <Shell><VehicleDetailPage id=id /></Shell> }.into_any()
        }
        AppRoute::Checkout(vehicle_id) => {
            view! { <Shell><CheckoutPage vehicle_id=vehicle_id /></Shell> }.into_any()
        }
        AppRoute::Return(rental_id) => {
            view! { <Shell><ReturnPage rental_id=rental_id /></Shell> }.into_any()
        }
        AppRoute::History => view! { <Shell><HistoryPage /></Shell> }.into_any(),
        AppRoute::Profile => view! { <Shell><ProfilePage /></Shell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary mt-6">"Back to dashboard"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 初始化认证状态（从 LocalStorage 恢复会话）
    init_auth(&auth_ctx);

    // 3. 通知服务，会话过期时通过它清空认证状态
    provide_notifier(auth_ctx);

    // 4. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 5. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
            <ToastHost />
        </Router>
    }
}
