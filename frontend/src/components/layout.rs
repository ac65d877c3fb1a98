use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{logout, use_auth};
use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 受保护页面的外壳：顶部导航 + 内容区
#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let nav_class = move |target: AppRoute| {
        if router.current_route().get().section() == target {
            "btn btn-ghost btn-sm btn-active"
        } else {
            "btn btn-ghost btn-sm"
        }
    };

    let initials = move || auth.user().map(|u| u.initials()).unwrap_or_default();
    let full_name = move || auth.user().map(|u| u.full_name).unwrap_or_default();

    let (signing_out, set_signing_out) = signal(false);
    let on_logout = move |_| {
        set_signing_out.set(true);
        spawn_local(async move {
            logout(&auth).await;
            set_signing_out.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Zap attr:class="text-primary h-6 w-6" />
                        <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">
                            "EV Station"
                        </Link>
                    </div>
                    <div class="flex-none gap-1 hidden md:flex">
                        <span class=move || nav_class(AppRoute::Dashboard)>
                            <Link to=AppRoute::Dashboard class="flex items-center gap-2">
                                <Car attr:class="h-4 w-4" /> "Fleet"
                            </Link>
                        </span>
                        <span class=move || nav_class(AppRoute::History)>
                            <Link to=AppRoute::History class="flex items-center gap-2">
                                <Clock attr:class="h-4 w-4" /> "History"
                            </Link>
                        </span>
                        <span class=move || nav_class(AppRoute::Profile)>
                            <Link to=AppRoute::Profile class="flex items-center gap-2">
                                <UserIcon attr:class="h-4 w-4" /> "Profile"
                            </Link>
                        </span>
                    </div>
                    <div class="flex-none gap-3 ml-4">
                        <div class="hidden lg:block text-sm text-right">
                            <div class="font-semibold">{full_name}</div>
                        </div>
                        <div class="avatar placeholder">
                            <div class="bg-neutral text-neutral-content w-10 rounded-full">
                                <span>{initials}</span>
                            </div>
                        </div>
                        <button
                            on:click=on_logout
                            disabled=move || signing_out.get()
                            class="btn btn-outline btn-error btn-sm gap-2"
                        >
                            <LogOut attr:class="h-4 w-4" /> "Sign out"
                        </button>
                    </div>
                </div>

                {children()}
            </div>
        </div>
    }
}

/// 加载中占位
#[component]
pub fn Loading() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center py-16 text-base-content/50">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
