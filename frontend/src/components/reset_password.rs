use evrent_shared::service::AuthService;
use evrent_shared::validation::{ResetPasswordForm, check};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::auth_card::{AuthCard, ErrorAlert};
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::{Link, query_param, use_router};

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let router = use_router();
    let notifier = use_notifier();

    // 邮件链接形如 /reset-password?token=...
    let token = query_param("token").unwrap_or_default();
    let has_token = !token.is_empty();

    let (new_password, set_new_password) = signal(String::new());
    let (confirm_password, set_confirm_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ResetPasswordForm::new(
            &token,
            &new_password.get_untracked(),
            &confirm_password.get_untracked(),
        );
        if let Err(e) = check(&form) {
            set_error_msg.set(Some(e.reason));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = api::build(None);
            let result = AuthService::new(&api)
                .reset_password(&form.token, &form.new_password, &form.confirm_password)
                .await;
            set_is_submitting.set(false);
            match result {
                Ok(()) => {
                    notifier.success("Password updated. Please sign in.");
                    router.go(AppRoute::Login);
                }
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
        });
    };

    view! {
        <AuthCard title="Reset password" subtitle="Choose a new password">
            <Show
                when=move || has_token
                fallback=|| view! {
                    <div class="card-body">
                        <div role="alert" class="alert alert-warning text-sm">
                            <span>"Reset link is invalid or has expired"</span>
                        </div>
                        <Link to=AppRoute::ForgotPassword class="btn btn-ghost mt-4">"Request a new link"</Link>
                    </div>
                }
            >
                <form class="card-body" on:submit=on_submit.clone()>
                    <ErrorAlert message=error_msg />
                    <div class="form-control">
                        <label class="label" for="new-password">
                            <span class="label-text">"New password"</span>
                        </label>
                        <input
                            id="new-password"
                            type="password"
                            autocomplete="new-password"
                            on:input=move |ev| set_new_password.set(event_target_value(&ev))
                            prop:value=new_password
                            class="input input-bordered"
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="confirm-password">
                            <span class="label-text">"Confirm password"</span>
                        </label>
                        <input
                            id="confirm-password"
                            type="password"
                            autocomplete="new-password"
                            on:input=move |ev| set_confirm_password.set(event_target_value(&ev))
                            prop:value=confirm_password
                            class="input input-bordered"
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                            } else {
                                "Update password".into_any()
                            }}
                        </button>
                    </div>
                </form>
            </Show>
        </AuthCard>
    }
}
