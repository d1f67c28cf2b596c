mod app;
mod config;
mod map_loader;
mod storage;

use leptos::mount::mount_to;
use wasm_bindgen::JsCast;

fn main() {
    console_error_panic_hook::set_once();
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Some(target) = document
        .get_element_by_id("app")
        .and_then(|node| node.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body())
    else {
        return;
    };

    // The page lives as long as the tab; nothing ever unmounts it.
    mount_to(target, app::App).forget();
}
