use evrent_shared::Vehicle;
use evrent_shared::fleet::{VehicleAction, next_action};
use evrent_shared::inspection::format_thousands;
use leptos::prelude::*;

use crate::components::icons::*;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 动作对应的检查页面；交车页面以车辆为参数，还车页面以租赁单为参数
pub fn action_route(vehicle: &Vehicle, action: VehicleAction) -> AppRoute {
    match action {
        VehicleAction::Checkout { .. } => AppRoute::Checkout(vehicle.id),
        VehicleAction::Return { rental_id } => AppRoute::Return(rental_id),
    }
}

#[component]
pub fn BatteryBar(level: u8) -> impl IntoView {
    let class = match level {
        0..=20 => "progress progress-error w-full",
        21..=50 => "progress progress-warning w-full",
        _ => "progress progress-success w-full",
    };
    view! {
        <div class="flex items-center gap-2 text-sm">
            <Battery attr:class="h-4 w-4 opacity-60" />
            <progress class=class value=level max="100"></progress>
            <span class="font-mono w-10 text-right">{level} "%"</span>
        </div>
    }
}

#[component]
pub fn VehicleCard(vehicle: Vehicle) -> impl IntoView {
    let router = use_router();
    let action = next_action(&vehicle);
    let action_target = action.map(|a| (a.label(), action_route(&vehicle, a)));
    let display_name = vehicle.display_name();

    view! {
        <div class="card bg-base-200 shadow">
            <div class="card-body p-4 gap-3">
                <div class="flex items-start justify-between">
                    <div>
                        <Link to=AppRoute::VehicleDetail(vehicle.id) class="font-bold link link-hover">
                            {display_name}
                        </Link>
                        <div class="font-mono text-sm opacity-70">{vehicle.license_plate.clone()}</div>
                    </div>
                    <span class=vehicle.status.badge_class()>{vehicle.status.label()}</span>
                </div>

                <BatteryBar level=vehicle.battery_level />
                <div class="flex items-center gap-2 text-sm">
                    <Gauge attr:class="h-4 w-4 opacity-60" />
                    <span class="font-mono">{format_thousands(vehicle.odometer)} " km"</span>
                </div>

                {action_target.map(|(label, route)| {
                    view! {
                        <div class="card-actions justify-end">
                            <button class="btn btn-primary btn-sm" on:click=move |_| router.go(route.clone())>
                                {label}
                            </button>
                        </div>
                    }
                })}
            </div>
        </div>
    }
}
