use evrent_shared::service::AuthService;
use evrent_shared::validation::{ForgotPasswordForm, check};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::components::auth_card::{AuthCard, ErrorAlert};
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (sent_to, set_sent_to) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = ForgotPasswordForm::new(&email.get_untracked());
        if let Err(e) = check(&form) {
            set_error_msg.set(Some(e.reason));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = api::build(None);
            match AuthService::new(&api).forgot_password(&form.email).await {
                Ok(()) => set_sent_to.set(Some(form.email)),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <AuthCard title="Forgot password" subtitle="We will email you a link to reset it">
            <Show
                when=move || sent_to.get().is_none()
                fallback=move || view! {
                    <div class="card-body">
                        <div role="alert" class="alert alert-success text-sm">
                            <span>"Reset link sent to " {move || sent_to.get().unwrap_or_default()}</span>
                        </div>
                        <Link to=AppRoute::Login class="btn btn-ghost mt-4">"Back to sign in"</Link>
                    </div>
                }
            >
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
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            prop:value=email
                            class="input input-bordered"
                        />
                    </div>
                    <div class="form-control mt-6 gap-2">
                        <button class="btn btn-primary" disabled=move || is_submitting.get()>
                            {move || if is_submitting.get() {
                                view! { <span class="loading loading-spinner"></span> "Sending..." }.into_any()
                            } else {
                                "Send reset link".into_any()
                            }}
                        </button>
                        <Link to=AppRoute::Login class="btn btn-ghost">"Back to sign in"</Link>
                    </div>
                </form>
            </Show>
        </AuthCard>
    }
}
