use evrent_shared::inspection::{ImageSlot, PendingImage};
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use super::InspectionState;
use crate::components::icons::{Camera, XMark};
use crate::notify::use_notifier;
use crate::web::ObjectUrl;

/// 单个照片槽位：选择文件、预览、移除
#[component]
pub fn ImageSlotInput(state: InspectionState, slot: ImageSlot) -> impl IntoView {
    let notifier = use_notifier();
    let form = state.form;
    let input_id = format!("photo-{}", slot.key());
    let label_for = input_id.clone();

    let preview = move || {
        form.with(|f| f.image(slot).map(|img| img.preview.as_str().to_string()))
    };
    let locked = move || state.is_locked();

    let on_change = move |ev: leptos::ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // 允许重新选择同一文件
        input.set_value("");

        let Some(preview) = ObjectUrl::from_file(&file) else {
            notifier.error("Could not read the selected image");
            return;
        };
        let image = PendingImage {
            file_name: file.name(),
            size_bytes: file.size() as u64,
            preview,
        };

        // 被拒绝的图片随 image 一起 drop，预览随之释放
        match form.try_update(|f| f.set_image(slot, image)) {
            Some(Err(e)) => notifier.error(e.reason),
            Some(Ok(())) => state.clear_error(&slot.field()),
            None => {}
        }
    };

    let on_remove = move |_| form.update(|f| f.remove_image(slot));

    view! {
        <div class="flex flex-col gap-2">
            <span class="text-sm font-medium">{slot.label()}</span>
            {move || match preview() {
                Some(src) => view! {
                    <div class="relative">
                        <img src=src alt=slot.label() class="rounded-box h-28 w-full object-cover" />
                        <button
                            type="button"
                            class="btn btn-circle btn-xs btn-error absolute top-1 right-1"
                            disabled=locked
                            on:click=on_remove
                        >
                            <XMark attr:class="h-3 w-3" />
                        </button>
                    </div>
                }.into_any(),
                None => view! {
                    <label
                        for=label_for.clone()
                        class="flex h-28 cursor-pointer flex-col items-center justify-center rounded-box border-2 border-dashed border-base-300 text-base-content/50 hover:border-primary"
                    >
                        <Camera attr:class="h-6 w-6" />
                        <span class="text-xs mt-1">"Add photo"</span>
                    </label>
                }.into_any(),
            }}
            <input
                id=input_id
                type="file"
                accept="image/*"
                class="hidden"
                disabled=locked
                on:change=on_change
            />
        </div>
    }
}
