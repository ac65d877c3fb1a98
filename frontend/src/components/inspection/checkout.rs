use evrent_shared::inspection::{InspectionForm, InspectionKind, InspectionTarget};
use evrent_shared::service::{BookingService, VehicleService};
use evrent_shared::{Booking, ClientError, ClientResult, Id, Vehicle, VehicleStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{InspectionFields, InspectionState};
use crate::api::Api;
use crate::auth::use_auth;
use crate::components::icons::ArrowLeft;
use crate::components::layout::Loading;
use crate::components::vehicle_card::BatteryBar;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::use_router;

/// 车辆及其当前预订
async fn load(api: &Api, vehicle_id: Id) -> ClientResult<(Vehicle, Booking)> {
    let vehicle = VehicleService::new(api).get(vehicle_id).await?;
    if vehicle.status != VehicleStatus::Booked {
        return Err(ClientError::validation(
            "status",
            format!("{} is not waiting for pickup", vehicle.display_name()),
        ));
    }
    let booking_id = vehicle.current_booking_id.ok_or_else(|| {
        ClientError::validation("bookingId", "Vehicle has no active booking")
    })?;
    let booking = BookingService::new(api).get(booking_id).await?;
    Ok((vehicle, booking))
}

/// 交车检查
#[component]
pub fn CheckoutPage(vehicle_id: Id) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let router = use_router();

    let state = InspectionState::new(InspectionKind::Checkout);
    let (loaded, set_loaded) = signal(Option::<(Vehicle, Booking)>::None);
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match load(&api, vehicle_id).await {
            Ok((vehicle, booking)) => {
                state.reset(InspectionForm::checkout(&vehicle));
                set_loaded.set(Some((vehicle, booking)));
            }
            Err(e) => notifier.report(&e),
        }
        set_loading.set(false);
    });

    let on_submit = move || {
        let Some(target) = loaded.with_untracked(|l| {
            l.as_ref().map(|(vehicle, booking)| InspectionTarget::Checkout {
                booking_id: booking.id,
                user_id: booking.customer_id,
                vehicle_id: vehicle.id,
            })
        }) else {
            return;
        };
        state.submit(target, auth, notifier, move || {
            router.go(AppRoute::Dashboard)
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center gap-2">
                    <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| router.back()>
                        <ArrowLeft attr:class="h-4 w-4" /> "Back"
                    </button>
                    <h3 class="card-title">"Vehicle handover"</h3>
                </div>
                <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                    {move || match loaded.get() {
                        None => view! {
                            <p class="text-center py-8 text-base-content/50">"This vehicle cannot be handed over right now."</p>
                        }.into_any(),
                        Some((vehicle, booking)) => view! {
                            <div class="grid gap-4 md:grid-cols-3 rounded-box bg-base-200 p-4">
                                <div>
                                    <div class="text-sm opacity-60">"Vehicle"</div>
                                    <div class="font-bold">{vehicle.display_name()}</div>
                                    <div class="font-mono text-sm">{vehicle.license_plate.clone()}</div>
                                </div>
                                <div>
                                    <div class="text-sm opacity-60">"Renter"</div>
                                    <div class="font-bold">{booking.customer_name.clone().unwrap_or_else(|| format!("Customer #{}", booking.customer_id))}</div>
                                    <div class="font-mono text-sm">{format!("Booking #{}", booking.id)}</div>
                                </div>
                                <div>
                                    <div class="text-sm opacity-60">"Current battery"</div>
                                    <BatteryBar level=vehicle.battery_level />
                                </div>
                            </div>
                            <InspectionFields state=state submit_label="Confirm handover" on_submit=on_submit />
                        }.into_any(),
                    }}
                </Show>
            </div>
        </div>
    }
}
