use evrent_shared::Vehicle;
use evrent_shared::fleet::{FleetStats, StatusFilter, filter_vehicles};
use evrent_shared::service::StaffService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::components::vehicle_card::VehicleCard;
use crate::notify::use_notifier;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let (vehicles, set_vehicles) = signal(Vec::<Vehicle>::new());
    let (loading, set_loading) = signal(true);
    let (filter, set_filter) = signal(StatusFilter::All);

    let load_vehicles = move || {
        let station_id = auth.user().and_then(|u| u.station_id);
        let api = auth.api();
        set_loading.set(true);
        spawn_local(async move {
            match StaffService::new(&api).dashboard_vehicles(station_id).await {
                Ok(list) => set_vehicles.set(list),
                Err(e) => notifier.report(&e),
            }
            set_loading.set(false);
        });
    };

    // 初始加载
    Effect::new(move |_| {
        if auth.state.with(|state| state.session.is_some()) {
            load_vehicles();
        }
    });

    // 统计数据的派生值
    let stats = Memo::new(move |_| vehicles.with(|list| FleetStats::from_vehicles(list)));
    let visible = move || {
        let filter = filter.get();
        vehicles.with(|list| {
            filter_vehicles(list, filter)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary">
                    <Car attr:class="inline-block w-8 h-8" />
                </div>
                <div class="stat-title">"Total vehicles"</div>
                <div class="stat-value text-primary">{move || stats.get().total}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Ready"</div>
                <div class="stat-value text-success">{move || stats.get().ready}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Booked"</div>
                <div class="stat-value text-warning">{move || stats.get().booked}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Rented"</div>
                <div class="stat-value text-info">{move || stats.get().rented}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex flex-wrap items-center justify-between gap-4">
                    <div>
                        <h3 class="card-title">"Station fleet"</h3>
                        <p class="text-base-content/70 text-sm">"Hand over booked vehicles and receive returns."</p>
                    </div>
                    <div class="flex items-center gap-2">
                        <div role="tablist" class="tabs tabs-boxed">
                            {StatusFilter::ALL
                                .into_iter()
                                .map(|f| {
                                    view! {
                                        <a
                                            role="tab"
                                            class=move || if filter.get() == f { "tab tab-active" } else { "tab" }
                                            on:click=move |_| set_filter.set(f)
                                        >
                                            {f.label()}
                                            <span class="badge badge-sm ml-2">{move || stats.get().count(f)}</span>
                                        </a>
                                    }
                                })
                                .collect_view()}
                        </div>
                        <button
                            on:click=move |_| load_vehicles()
                            disabled=move || loading.get()
                            class="btn btn-ghost btn-circle"
                        >
                            <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                        </button>
                    </div>
                </div>

                <Show when=move || loading.get() && vehicles.with(|v| v.is_empty())>
                    <div class="text-center py-8 text-base-content/50">
                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                    </div>
                </Show>
                <Show when=move || !loading.get() && visible().is_empty()>
                    <div class="text-center py-8 text-base-content/50">
                        "No vehicles match this filter."
                    </div>
                </Show>

                <div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3 mt-4">
                    <For
                        each=visible
                        key=|v| (v.id, v.status, v.battery_level, v.odometer)
                        children=move |vehicle| view! { <VehicleCard vehicle=vehicle /> }
                    />
                </div>
            </div>
        </div>
    }
}
