//! 全局通知
//!
//! 页面通过 Context 获取 `Notifier` 弹出提示。会话过期的错误在这里统一交给认证模块处理。

use std::time::Duration;

use evrent_shared::ClientError;
use leptos::prelude::*;

use crate::auth::AuthContext;

const SUCCESS_DURATION: Duration = Duration::from_millis(3500);
const ERROR_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: u64,
    pub message: String,
    pub is_error: bool,
}

#[derive(Clone, Copy)]
pub struct Notifier {
    current: RwSignal<Option<Toast>>,
    next_id: StoredValue<u64>,
    auth: AuthContext,
}

impl Notifier {
    pub fn new(auth: AuthContext) -> Self {
        Self {
            current: RwSignal::new(None),
            next_id: StoredValue::new(0),
            auth,
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(message.into(), false, SUCCESS_DURATION);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.show(message.into(), true, ERROR_DURATION);
    }

    /// 401 清空会话（路由随后回到登录页），其余错误弹出提示
    pub fn report(&self, err: &ClientError) {
        self.error(err.user_message());
        if err.is_auth_expired() {
            self.auth.expire();
        }
    }

    fn show(&self, message: String, is_error: bool, duration: Duration) {
        let id = self.next_id.get_value() + 1;
        self.next_id.set_value(id);
        self.current.set(Some(Toast {
            id,
            message,
            is_error,
        }));

        // 只清除自己这条，后来的提示不受影响
        let current = self.current;
        set_timeout(
            move || {
                if current.with_untracked(|t| t.as_ref().is_some_and(|t| t.id == id)) {
                    current.set(None);
                }
            },
            duration,
        );
    }
}

pub fn provide_notifier(auth: AuthContext) -> Notifier {
    let notifier = Notifier::new(auth);
    provide_context(notifier);
    notifier
}

pub fn use_notifier() -> Notifier {
    use_context::<Notifier>().expect("Notifier should be provided")
}

/// 通知提示框
#[component]
pub fn ToastHost() -> impl IntoView {
    let notifier = use_notifier();
    let current = notifier.current;

    view! {
        {move || {
            current
                .get()
                .map(|toast| {
                    let class = if toast.is_error {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    };
                    view! {
                        <div class="toast toast-top toast-end z-50">
                            <div class=class role="alert">
                                <span>{toast.message}</span>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
