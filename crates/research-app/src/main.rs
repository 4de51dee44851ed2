//! # research-app
//!
//! Stock research page: a pannable price chart over sample data, with
//! weekend bands and simulated on-demand history loading.

mod history;
mod page;
mod sample;
mod weekends;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    tracing::info!("starting research app");
    leptos::mount::mount_to_body(page::App);
}
