use evrent_shared::ClientError;
use evrent_shared::validation::{LoginForm, check};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{last_email, login, use_auth};
use crate::components::auth_card::{AuthCard, ErrorAlert};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let (email, set_email) = signal(last_email().unwrap_or_default());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = LoginForm::new(&email.get_untracked(), &password.get_untracked());
        if let Err(e) = check(&form) {
            set_error_msg.set(Some(e.reason));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            match login(&auth, form.email, form.password).await {
                Ok(_) => router.go(AppRoute::auth_success_redirect()),
                // 登录接口的 401 表示凭据错误，而不是会话过期
                Err(ClientError::AuthExpired) => {
                    set_error_msg.set(Some("Invalid email or password".to_string()))
                }
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthCard title="EV Station Staff" subtitle="Sign in to manage your station">
            <form class="card-body" on:submit=on_submit>
                <ErrorAlert message=error_msg />

                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">"Email"</span>
                    </label>
                    <input
                        id="email"
                        type="email"
                        placeholder="staff@station.com"
                        autocomplete="username"
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                        prop:value=email
                        class="input input-bordered"
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">"Password"</span>
                    </label>
                    <input
                        id="password"
                        type="password"
                        placeholder="••••••••"
                        autocomplete="current-password"
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        prop:value=password
                        class="input input-bordered"
                    />
                    <label class="label">
                        <Link to=AppRoute::ForgotPassword class="label-text-alt link link-hover">
                            "Forgot password?"
                        </Link>
                    </label>
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                        } else {
                            "Sign in".into_any()
                        }}
                    </button>
                </div>
            </form>
        </AuthCard>
    }
}
