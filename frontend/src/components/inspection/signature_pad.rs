//! 手写签名板
//!
//! 画布上至少落过一笔才算签名，抬笔时把 PNG data URL 交给回调；清除后回调 `None`。

use leptos::html::Canvas;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent};

const WIDTH: u32 = 480;
const HEIGHT: u32 = 160;

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

/// 指针位置换算到画布坐标（画布按 CSS 宽度缩放显示）
fn canvas_point(canvas: &HtmlCanvasElement, ev: &PointerEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let scale_x = if rect.width() > 0.0 { WIDTH as f64 / rect.width() } else { 1.0 };
    let scale_y = if rect.height() > 0.0 { HEIGHT as f64 / rect.height() } else { 1.0 };
    (
        (ev.client_x() as f64 - rect.left()) * scale_x,
        (ev.client_y() as f64 - rect.top()) * scale_y,
    )
}

#[component]
pub fn SignaturePad(
    #[prop(into)] label: String,
    #[prop(into)] disabled: Signal<bool>,
    on_change: Callback<Option<String>>,
) -> impl IntoView {
    let canvas_ref = NodeRef::<Canvas>::new();
    let (drawing, set_drawing) = signal(false);
    let (has_ink, set_has_ink) = signal(false);

    let on_down = move |ev: PointerEvent| {
        if disabled.get_untracked() {
            return;
        }
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let Some(ctx) = context(&canvas) else {
            return;
        };
        let _ = canvas.set_pointer_capture(ev.pointer_id());
        let (x, y) = canvas_point(&canvas, &ev);
        ctx.set_line_width(2.5);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.begin_path();
        ctx.move_to(x, y);
        set_drawing.set(true);
    };

    let on_move = move |ev: PointerEvent| {
        if !drawing.get_untracked() {
            return;
        }
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        if let Some(ctx) = context(&canvas) {
            let (x, y) = canvas_point(&canvas, &ev);
            ctx.line_to(x, y);
            ctx.stroke();
            set_has_ink.set(true);
        }
    };

    let on_up = move |_ev: PointerEvent| {
        if !drawing.get_untracked() {
            return;
        }
        set_drawing.set(false);
        if !has_ink.get_untracked() {
            return;
        }
        let data_url = canvas_ref
            .get_untracked()
            .and_then(|canvas| canvas.to_data_url().ok());
        on_change.run(data_url);
    };

    let on_clear = move |_| {
        if let Some(canvas) = canvas_ref.get_untracked() {
            if let Some(ctx) = context(&canvas) {
                ctx.clear_rect(0.0, 0.0, WIDTH as f64, HEIGHT as f64);
            }
        }
        set_has_ink.set(false);
        on_change.run(None);
    };

    view! {
        <div class="form-control">
            <div class="label">
                <span class="label-text">{label}</span>
                <button
                    type="button"
                    class="btn btn-ghost btn-xs"
                    disabled=move || disabled.get() || !has_ink.get()
                    on:click=on_clear
                >
                    "Clear"
                </button>
            </div>
            <canvas
                node_ref=canvas_ref
                width=WIDTH
                height=HEIGHT
                class="w-full rounded-box border border-base-300 bg-white touch-none"
                on:pointerdown=on_down
                on:pointermove=on_move
                on:pointerup=on_up
                on:pointerleave=on_up
            ></canvas>
        </div>
    }
}
