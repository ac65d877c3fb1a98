//! 车辆检查页面（交车 / 还车）
//!
//! 表单状态机在共享层，这里只负责把它放进信号、渲染控件，
//! 并在异步提交两端调用 `begin_submit` / `finish`。

mod checkout;
mod image_slot;
mod return_inspection;
mod signature_pad;

pub use checkout::CheckoutPage;
pub use return_inspection::ReturnPage;

use evrent_shared::error::ValidationError;
use evrent_shared::inspection::{InspectionForm, InspectionKind, InspectionTarget, Phase};
use evrent_shared::service::RentalService;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::AuthContext;
use crate::notify::Notifier;
use crate::web::ObjectUrl;

use image_slot::ImageSlotInput;
use signature_pad::SignaturePad;

pub type Form = InspectionForm<ObjectUrl>;

#[derive(Clone, Copy)]
pub struct InspectionState {
    form: RwSignal<Form>,
    field_error: RwSignal<Option<ValidationError>>,
}

impl InspectionState {
    pub fn new(kind: InspectionKind) -> Self {
        Self {
            form: RwSignal::new(InspectionForm::new(kind)),
            field_error: RwSignal::new(None),
        }
    }

    /// 数据加载完成后换成预填好的表单
    pub fn reset(&self, form: Form) {
        self.form.set(form);
        self.field_error.set(None);
    }

    pub fn is_locked(&self) -> bool {
        self.form.with(|f| f.is_submit_disabled())
    }

    fn error_for(&self, field: &str) -> Option<String> {
        self.field_error.with(|e| {
            e.as_ref()
                .filter(|e| e.field == field)
                .map(|e| e.reason.clone())
        })
    }

    /// 编辑后清掉该字段的错误提示
    fn clear_error(&self, field: &str) {
        if self.error_for(field).is_some() {
            self.field_error.set(None);
        }
    }

    /// 校验 → 提交 → 结束；成功回调在延迟后执行
    pub fn submit(
        &self,
        target: InspectionTarget,
        auth: AuthContext,
        notifier: Notifier,
        after_success: impl FnOnce() + 'static,
    ) {
        let Some(started) = self.form.try_update(|f| f.begin_submit(target)) else {
            return;
        };
        let payload = match started {
            Ok(payload) => payload,
            Err(e) => {
                notifier.error(e.reason.clone());
                self.field_error.set(Some(e));
                return;
            }
        };
        self.field_error.set(None);

        let form = self.form;
        let kind = form.with_untracked(|f| f.kind());
        let api = auth.api();
        spawn_local(async move {
            let result = RentalService::new(&api).submit(&payload).await;
            form.update(|f| f.finish(result.is_ok()));
            match result {
                Ok(_) => {
                    notifier.success(kind.success_message());
                    set_timeout(after_success, evrent_shared::inspection::SUCCESS_REDIRECT_DELAY);
                }
                Err(e) => notifier.report(&e),
            }
        });
    }
}

fn field_hint(message: Option<String>) -> impl IntoView {
    message.map(|m| view! { <p class="text-error text-sm mt-1">{m}</p> })
}

/// 读数、照片、检查项、备注、签名以及提交按钮
#[component]
pub fn InspectionFields(
    state: InspectionState,
    /// 提交按钮文字
    #[prop(into)]
    submit_label: String,
    on_submit: impl Fn() + Clone + Send + Sync + 'static,
) -> impl IntoView {
    let form = state.form;
    let kind = form.with_untracked(|f| f.kind());
    let locked = Signal::derive(move || state.is_locked());

    let progress = move || {
        let (done, total) = form.with(|f| f.progress());
        let percent = if total == 0 { 100 } else { done * 100 / total };
        (done, total, percent)
    };

    let submitting = move || form.with(|f| f.phase() == Phase::Submitting);

    view! {
        <div class="space-y-6">
            // 读数
            <div class="grid gap-4 md:grid-cols-2">
                <div class="form-control">
                    <label class="label" for="odometer">
                        <span class="label-text">"Odometer (km)"</span>
                    </label>
                    <input
                        id="odometer"
                        type="text"
                        inputmode="numeric"
                        class=move || if state.error_for("odometer").is_some() { "input input-bordered input-error" } else { "input input-bordered" }
                        prop:value=move || form.with(|f| f.odometer().to_string())
                        disabled=move || locked.get()
                        on:input=move |ev| {
                            form.update(|f| f.set_odometer(&event_target_value(&ev)));
                            state.clear_error("odometer");
                        }
                    />
                    {move || field_hint(state.error_for("odometer"))}
                </div>
                <div class="form-control">
                    <label class="label" for="battery">
                        <span class="label-text">"Battery (%)"</span>
                    </label>
                    <input
                        id="battery"
                        type="text"
                        inputmode="decimal"
                        class=move || if state.error_for("battery").is_some() { "input input-bordered input-error" } else { "input input-bordered" }
                        prop:value=move || form.with(|f| f.battery().to_string())
                        disabled=move || locked.get()
                        on:input=move |ev| {
                            form.update(|f| f.set_battery(&event_target_value(&ev)));
                            state.clear_error("battery");
                        }
                    />
                    {move || field_hint(state.error_for("battery"))}
                </div>
            </div>

            // 照片
            <div>
                <h4 class="font-semibold mb-2">"Photos"</h4>
                <div class="grid gap-4 grid-cols-2 md:grid-cols-3 lg:grid-cols-5">
                    {kind
                        .slots()
                        .iter()
                        .map(|slot| {
                            let slot = *slot;
                            view! {
                                <div>
                                    <ImageSlotInput state=state slot=slot />
                                    {move || field_hint(state.error_for(&slot.field()))}
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>

            // 检查项
            <Show when=move || !kind.checklist().is_empty()>
                <div>
                    <h4 class="font-semibold mb-2">"Checklist"</h4>
                    <div class="space-y-2">
                        {kind
                            .checklist()
                            .iter()
                            .map(|item| {
                                let item = *item;
                                view! {
                                    <label class="label cursor-pointer justify-start gap-3">
                                        <input
                                            type="checkbox"
                                            class="checkbox checkbox-primary"
                                            prop:checked=move || form.with(|f| f.is_checked(item))
                                            disabled=move || locked.get()
                                            on:change=move |_| {
                                                form.update(|f| {
                                                    f.toggle(item);
                                                });
                                                state.clear_error(&item.field());
                                            }
                                        />
                                        <span class="label-text">{item.label()}</span>
                                    </label>
                                    {move || field_hint(state.error_for(&item.field()))}
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </Show>

            // 备注
            <div class="grid gap-4 md:grid-cols-2">
                <div class="form-control">
                    <label class="label" for="notes">
                        <span class="label-text">"Notes"</span>
                    </label>
                    <textarea
                        id="notes"
                        class="textarea textarea-bordered"
                        rows="3"
                        prop:value=move || form.with(|f| f.notes().to_string())
                        disabled=move || locked.get()
                        on:input=move |ev| form.update(|f| f.set_notes(&event_target_value(&ev)))
                    ></textarea>
                </div>
                <Show when=move || kind == InspectionKind::Return>
                    <div class="form-control">
                        <label class="label" for="staff-notes">
                            <span class="label-text">"Staff notes"</span>
                        </label>
                        <textarea
                            id="staff-notes"
                            class="textarea textarea-bordered"
                            rows="3"
                            prop:value=move || form.with(|f| f.staff_notes().to_string())
                            disabled=move || locked.get()
                            on:input=move |ev| form.update(|f| f.set_staff_notes(&event_target_value(&ev)))
                        ></textarea>
                    </div>
                </Show>
            </div>

            // 签名
            <div class="grid gap-4 md:grid-cols-2">
                <div>
                    <SignaturePad
                        label="Renter signature"
                        disabled=locked
                        on_change=Callback::new(move |sig: Option<String>| {
                            form.update(|f| f.set_renter_signature(sig));
                            state.clear_error("renterSignature");
                        })
                    />
                    {move || field_hint(state.error_for("renterSignature"))}
                </div>
                <div>
                    <SignaturePad
                        label="Staff signature"
                        disabled=locked
                        on_change=Callback::new(move |sig: Option<String>| {
                            form.update(|f| f.set_staff_signature(sig));
                            state.clear_error("staffSignature");
                        })
                    />
                    {move || field_hint(state.error_for("staffSignature"))}
                </div>
            </div>

            // 进度与提交
            <div class="flex flex-col gap-3 md:flex-row md:items-center md:justify-between">
                <div class="flex items-center gap-3 text-sm">
                    <progress class="progress progress-primary w-40" value=move || progress().2 max="100"></progress>
                    <span>{move || { let (d, t, _) = progress(); format!("{}/{} completed", d, t) }}</span>
                </div>
                <button
                    class="btn btn-primary"
                    disabled=move || form.with(|f| f.is_submit_disabled())
                    on:click=move |_| on_submit()
                >
                    {move || if submitting() {
                        view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any()
                    } else {
                        submit_label.clone().into_any()
                    }}
                </button>
            </div>
        </div>
    }
}
