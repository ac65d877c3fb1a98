use evrent_shared::UserProfile;
use evrent_shared::service::AuthService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{update_user, use_auth};
use crate::notify::use_notifier;

/// 当前员工资料；服务端资料加载失败时展示会话中的副本
#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let (refreshing, set_refreshing) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match AuthService::new(&api).profile().await {
            Ok(user) => update_user(&auth, user),
            Err(e) => notifier.report(&e),
        }
        set_refreshing.set(false);
    });

    view! {
        <div class="card bg-base-100 shadow-xl max-w-2xl">
            <div class="card-body">
                {move || auth.user().map(profile_view)}
                <Show when=move || refreshing.get()>
                    <span class="loading loading-dots loading-sm opacity-50"></span>
                </Show>
            </div>
        </div>
    }
}

fn profile_view(user: UserProfile) -> impl IntoView {
    let station = user
        .station_id
        .map_or("-".to_string(), |id| format!("Station #{}", id));
    let phone = user.phone_number.clone().unwrap_or_else(|| "-".to_string());

    view! {
        <div class="flex items-center gap-4">
            <div class="avatar placeholder">
                <div class="bg-primary text-primary-content w-20 rounded-full">
                    <span class="text-2xl">{user.initials()}</span>
                </div>
            </div>
            <div>
                <h2 class="text-2xl font-bold">{user.full_name.clone()}</h2>
                <span class="badge badge-outline">{user.role.clone()}</span>
            </div>
        </div>
        <dl class="grid grid-cols-[8rem_1fr] gap-y-2 mt-6 text-sm">
            <dt class="opacity-60">"Email"</dt>
            <dd>{user.email.clone()}</dd>
            <dt class="opacity-60">"Phone"</dt>
            <dd>{phone}</dd>
            <dt class="opacity-60">"Station"</dt>
            <dd>{station}</dd>
        </dl>
    }
}
