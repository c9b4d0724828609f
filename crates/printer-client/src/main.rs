//! Robot Printer Client
//!
//! Yew WASM frontend: the robot printer widget and its demo page.
//!
//! This crate is WASM-only. Use `trunk serve` or `cargo check --target wasm32-unknown-unknown`.

#[cfg(not(target_arch = "wasm32"))]
compile_error!(
    "printer-client only supports wasm32 target. Use: cargo check -p printer-client --target wasm32-unknown-unknown"
);

mod app;
mod components;
mod hooks;
mod pages;
mod routes;

use app::App;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

fn main() {
    // Panics land on /panic instead of a frozen page
    pages::set_panic_hook();

    let filter = EnvFilter::new("info,printer_core=debug");

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    tracing_subscriber::registry().with(fmt_layer).init();

    yew::Renderer::<App>::new().render();
}
