use evrent_shared::fleet::next_action;
use evrent_shared::inspection::format_thousands;
use evrent_shared::service::VehicleService;
use evrent_shared::{Id, Vehicle};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::components::layout::Loading;
use crate::components::vehicle_card::{BatteryBar, action_route};
use crate::notify::use_notifier;
use crate::web::router::{RouterService, use_router};

#[component]
pub fn VehicleDetailPage(id: Id) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let router = use_router();

    let (vehicle, set_vehicle) = signal(Option::<Vehicle>::None);
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match VehicleService::new(&api).get(id).await {
            Ok(v) => set_vehicle.set(Some(v)),
            Err(e) => notifier.report(&e),
        }
        set_loading.set(false);
    });

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div>
                    <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| router.back()>
                        <ArrowLeft attr:class="h-4 w-4" /> "Back"
                    </button>
                </div>
                <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                    {move || match vehicle.get() {
                        None => view! {
                            <p class="text-center py-8 text-base-content/50">"Vehicle not found."</p>
                        }.into_any(),
                        Some(v) => vehicle_view(v, router).into_any(),
                    }}
                </Show>
            </div>
        </div>
    }
}

fn vehicle_view(v: Vehicle, router: RouterService) -> impl IntoView {
    let action = next_action(&v).map(|a| (a.label(), action_route(&v, a)));

    view! {
        <div class="grid gap-6 md:grid-cols-2">
            <div>
                {v.image_url.clone().map(|src| view! {
                    <img src=src alt="vehicle" class="rounded-box w-full object-cover max-h-72" />
                })}
            </div>
            <div class="space-y-4">
                <div class="flex items-center justify-between">
                    <h2 class="text-2xl font-bold">{v.display_name()}</h2>
                    <span class=v.status.badge_class()>{v.status.label()}</span>
                </div>
                <div class="font-mono opacity-70">{v.license_plate.clone()}</div>
                <BatteryBar level=v.battery_level />
                <div class="flex items-center gap-2 text-sm">
                    <Gauge attr:class="h-4 w-4 opacity-60" />
                    <span class="font-mono">{format_thousands(v.odometer)} " km"</span>
                </div>
                <dl class="grid grid-cols-2 gap-2 text-sm">
                    <dt class="opacity-60">"Booking"</dt>
                    <dd class="font-mono">{v.current_booking_id.map_or("-".to_string(), |id| format!("#{}", id))}</dd>
                    <dt class="opacity-60">"Rental"</dt>
                    <dd class="font-mono">{v.current_rental_id.map_or("-".to_string(), |id| format!("RT-{}", id))}</dd>
                </dl>
                {action.map(|(label, route)| view! {
                    <button class="btn btn-primary w-full" on:click=move |_| router.go(route.clone())>
                        {label}
                    </button>
                })}
            </div>
        </div>
    }
}
