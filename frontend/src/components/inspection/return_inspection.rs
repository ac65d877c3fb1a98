use evrent_shared::date::format_optional;
use evrent_shared::inspection::{InspectionForm, InspectionKind, InspectionTarget, format_thousands};
use evrent_shared::service::RentalService;
use evrent_shared::{CheckinInfo, Id};
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{InspectionFields, InspectionState};
use crate::auth::use_auth;
use crate::components::icons::ArrowLeft;
use crate::components::layout::Loading;
use crate::notify::use_notifier;
use crate::web::router::use_router;

/// 还车检查
#[component]
pub fn ReturnPage(rental_id: Id) -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let router = use_router();

    let state = InspectionState::new(InspectionKind::Return);
    let (info, set_info) = signal(Option::<CheckinInfo>::None);
    let (loading, set_loading) = signal(true);

    let api = auth.api();
    spawn_local(async move {
        match RentalService::new(&api).checkin_info(rental_id).await {
            Ok(data) => {
                state.reset(InspectionForm::checkin(&data));
                set_info.set(Some(data));
            }
            Err(e) => notifier.report(&e),
        }
        set_loading.set(false);
    });

    let on_submit = move || {
        state.submit(
            InspectionTarget::Return { rental_id },
            auth,
            notifier,
            move || router.back(),
        );
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center gap-2">
                    <button class="btn btn-ghost btn-sm gap-2" on:click=move |_| router.back()>
                        <ArrowLeft attr:class="h-4 w-4" /> "Back"
                    </button>
                    <h3 class="card-title">"Return inspection"</h3>
                </div>
                <Show when=move || !loading.get() fallback=|| view! { <Loading /> }>
                    {move || match info.get() {
                        None => view! {
                            <p class="text-center py-8 text-base-content/50">"Rental not found."</p>
                        }.into_any(),
                        Some(info) => view! {
                            <div class="grid gap-4 md:grid-cols-4 rounded-box bg-base-200 p-4 text-sm">
                                <div>
                                    <div class="opacity-60">"Vehicle"</div>
                                    <div class="font-bold">{info.vehicle_name.clone()}</div>
                                    <div class="font-mono">{info.license_plate.clone()}</div>
                                </div>
                                <div>
                                    <div class="opacity-60">"Renter"</div>
                                    <div class="font-bold">{info.customer_name.clone()}</div>
                                    <div class="font-mono">{format!("RT-{}", info.rental_id)}</div>
                                </div>
                                <div>
                                    <div class="opacity-60">"At pickup"</div>
                                    <div class="font-mono">{format_thousands(info.pickup_odometer)} " km"</div>
                                    <div class="font-mono">{info.pickup_battery_level} "%"</div>
                                </div>
                                <div>
                                    <div class="opacity-60">"Picked up / due"</div>
                                    <div>{format_optional(info.pickup_time.as_ref())}</div>
                                    <div>{format_optional(info.expected_return_time.as_ref())}</div>
                                </div>
                            </div>
                            <InspectionFields state=state submit_label="Complete return" on_submit=on_submit />
                        }.into_any(),
                    }}
                </Show>
            </div>
        </div>
    }
}
