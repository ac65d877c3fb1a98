use evrent_shared::date::{format_display, parse_date, today};
use evrent_shared::history::{
    HistoryQuery, HistoryRow, ROWS_PER_PAGE, TransactionKind, TypeFilter, day_stats, paginate,
    rows_from_bookings,
};
use evrent_shared::inspection::format_thousands;
use evrent_shared::service::BookingService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::use_auth;
use crate::components::icons::*;
use crate::notify::use_notifier;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn HistoryPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let (rows, set_rows) = signal(Vec::<HistoryRow>::new());
    let (loading, set_loading) = signal(true);
    let query = RwSignal::new(HistoryQuery::default());
    let (page, set_page) = signal(1usize);

    let load_history = move || {
        let api = auth.api();
        set_loading.set(true);
        spawn_local(async move {
            match BookingService::new(&api).list().await {
                Ok(bookings) => set_rows.set(rows_from_bookings(&bookings)),
                Err(e) => notifier.report(&e),
            }
            set_loading.set(false);
        });
    };
    load_history();

    // 条件变化时回到第一页
    let edit_query = move |f: &dyn Fn(&mut HistoryQuery)| {
        query.update(|q| f(q));
        set_page.set(1);
    };

    let filtered = Memo::new(move |_| {
        query.with(|q| rows.with(|list| q.apply(list).into_iter().cloned().collect::<Vec<_>>()))
    });
    let current_page = Memo::new(move |_| filtered.with(|list| paginate(list, page.get(), ROWS_PER_PAGE)));
    let stats = Memo::new(move |_| rows.with(|list| day_stats(list, today())));

    view! {
        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-title">"Check-outs today"</div>
                <div class="stat-value text-primary">{move || stats.get().checkouts}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Check-ins today"</div>
                <div class="stat-value text-success">{move || stats.get().checkins}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"Vehicles handled"</div>
                <div class="stat-value text-secondary">{move || stats.get().vehicles}</div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex flex-wrap items-end justify-between gap-4 p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Transaction history"</h3>
                        <p class="text-base-content/70 text-sm">"Vehicle handovers and returns at your station."</p>
                    </div>
                    <button on:click=move |_| load_history() disabled=move || loading.get() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>

                <div class="flex flex-wrap gap-3 px-6 pb-4">
                    <label class="input input-bordered input-sm flex items-center gap-2">
                        <Search attr:class="h-4 w-4 opacity-60" />
                        <input
                            type="text"
                            class="grow"
                            placeholder="Plate, renter or rental code"
                            prop:value=move || query.with(|q| q.search.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                edit_query(&|q: &mut HistoryQuery| q.search = value.clone());
                            }
                        />
                    </label>
                    <select
                        class="select select-bordered select-sm"
                        on:change=move |ev| {
                            let kind = event_target_value(&ev).parse::<TypeFilter>().unwrap_or_default();
                            edit_query(&|q: &mut HistoryQuery| q.kind = kind);
                        }
                    >
                        {TypeFilter::ALL
                            .into_iter()
                            .map(|f| view! {
                                <option value=f.as_str() selected=move || query.with(|q| q.kind == f)>{f.label()}</option>
                            })
                            .collect_view()}
                    </select>
                    <input
                        type="date"
                        class="input input-bordered input-sm"
                        on:change=move |ev| {
                            let from = parse_date(&event_target_value(&ev));
                            edit_query(&|q: &mut HistoryQuery| q.date_from = from);
                        }
                    />
                    <input
                        type="date"
                        class="input input-bordered input-sm"
                        on:change=move |ev| {
                            let to = parse_date(&event_target_value(&ev));
                            edit_query(&|q: &mut HistoryQuery| q.date_to = to);
                        }
                    />
                </div>

                <div class="overflow-x-auto w-full">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"Time"</th>
                                <th>"Type"</th>
                                <th>"Rental"</th>
                                <th>"Vehicle"</th>
                                <th class="hidden md:table-cell">"Renter"</th>
                                <th class="hidden md:table-cell">"Odometer"</th>
                                <th class="hidden md:table-cell">"Battery"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || loading.get() && rows.with(|r| r.is_empty())>
                                <tr>
                                    <td colspan="7" class="text-center py-8 text-base-content/50">
                                        <span class="loading loading-spinner loading-md"></span> " Loading..."
                                    </td>
                                </tr>
                            </Show>
                            <Show when=move || !loading.get() && current_page.with(|p| p.items.is_empty())>
                                <tr>
                                    <td colspan="7" class="text-center py-8 text-base-content/50">
                                        "No transactions found."
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=move || current_page.get().items
                                key=|row| (row.rental_id, row.kind.as_str())
                                children=move |row| history_row(row)
                            />
                        </tbody>
                    </table>
                </div>

                <div class="flex items-center justify-between p-6 pt-4 text-sm">
                    <span class="opacity-70">
                        {move || current_page.with(|p| format!("{} transactions", p.total_items))}
                    </span>
                    <div class="join">
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || current_page.with(|p| p.page <= 1)
                            on:click=move |_| set_page.set(current_page.get_untracked().page.saturating_sub(1).max(1))
                        >
                            "«"
                        </button>
                        <button class="join-item btn btn-sm btn-disabled">
                            {move || current_page.with(|p| format!("Page {} / {}", p.page, p.total_pages))}
                        </button>
                        <button
                            class="join-item btn btn-sm"
                            disabled=move || current_page.with(|p| p.page >= p.total_pages)
                            on:click=move |_| set_page.set(current_page.get_untracked().page + 1)
                        >
                            "»"
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}

fn history_row(row: HistoryRow) -> impl IntoView {
    let badge = match row.kind {
        TransactionKind::Checkout => "badge badge-primary badge-outline",
        TransactionKind::Checkin => "badge badge-success badge-outline",
    };
    view! {
        <tr>
            <td class="whitespace-nowrap">{format_display(&row.timestamp)}</td>
            <td><span class=badge>{row.kind.label()}</span></td>
            <td class="font-mono">{row.rental_code.clone()}</td>
            <td>
                <Link to=AppRoute::VehicleDetail(row.vehicle_id) class="link link-hover">
                    {row.vehicle_model.clone()}
                </Link>
                <div class="font-mono text-xs opacity-60">{row.license_plate.clone()}</div>
            </td>
            <td class="hidden md:table-cell">{row.renter_name.clone()}</td>
            <td class="hidden md:table-cell font-mono">
                {row.odometer.map_or("-".to_string(), |km| format!("{} km", format_thousands(km)))}
            </td>
            <td class="hidden md:table-cell font-mono">
                {row.battery_level.map_or("-".to_string(), |b| format!("{}%", b))}
            </td>
        </tr>
    }
}
