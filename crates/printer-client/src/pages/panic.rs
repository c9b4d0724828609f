//! Jam report: a panic is recorded in localStorage and shown on `/panic`.

use crate::routes::Route;
use web_sys::Storage;
use yew::prelude::*;
use yew_router::prelude::*;

const JAM_REPORT_KEY: &str = "robot_printer_jam_report";

fn storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// What the robot was doing when the page panicked.
#[derive(Debug, Clone, PartialEq)]
struct JamReport {
    message: String,
    /// Page path at panic time.
    page: String,
    /// ISO timestamp.
    at: String,
}

impl JamReport {
    fn capture(info: &std::panic::PanicHookInfo<'_>) -> Self {
        let mut message = info.to_string();
        if let Some(loc) = info.location() {
            message = format!("{message}\n  at {}:{}:{}", loc.file(), loc.line(), loc.column());
        }
        let page = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        let at = String::from(js_sys::Date::new_0().to_iso_string());
        Self { message, page, at }
    }

    /// `at` and `page` on the first two lines, the message after.
    fn encode(&self) -> String {
        format!("{}\n{}\n{}", self.at, self.page, self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let mut parts = raw.splitn(3, '\n');
        Some(Self {
            at: parts.next()?.to_string(),
            page: parts.next()?.to_string(),
            message: parts.next()?.to_string(),
        })
    }

    fn load() -> Option<Self> {
        let raw = storage()?.get_item(JAM_REPORT_KEY).ok()??;
        Self::decode(&raw)
    }

    fn store(&self) {
        if let Some(storage) = storage() {
            let _ = storage.set_item(JAM_REPORT_KEY, &self.encode());
        }
    }

    fn clear() {
        if let Some(storage) = storage() {
            let _ = storage.remove_item(JAM_REPORT_KEY);
        }
    }
}

/// Logs panics to the console with a stack, stores a [`JamReport`] and
/// sends the browser to the jam page. A panic on the jam page itself only
/// logs.
pub fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);

        let report = JamReport::capture(info);
        tracing::error!(page = %report.page, "printer jammed");
        if report.page == "/panic" {
            return;
        }
        report.store();
        if let Some(window) = web_sys::window() {
            let _ = window.location().set_pathname("/panic");
        }
    }));
}

#[function_component(PanicPage)]
pub fn panic_page() -> Html {
    let report = use_state(JamReport::load);

    let on_clear = {
        let report = report.clone();
        Callback::from(move |_: MouseEvent| {
            JamReport::clear();
            report.set(None);
        })
    };

    let on_copy = {
        let text = report.as_ref().map(JamReport::encode);
        Callback::from(move |_: MouseEvent| {
            if let (Some(text), Some(window)) = (text.as_ref(), web_sys::window()) {
                let _ = window.navigator().clipboard().write_text(text);
            }
        })
    };

    html! {
        <main class="page panic-page">
            <h1>{ "Paper jam" }</h1>
            if let Some(report) = &*report {
                <p>{ format!("The robot jammed on {} at {}.", report.page, report.at) }</p>
                <pre class="panic-details">{ &report.message }</pre>
                <div class="panic-actions">
                    <button onclick={on_copy}>{ "Copy report" }</button>
                    <button onclick={on_clear}>{ "Clear the jam" }</button>
                </div>
            } else {
                <p>{ "No jam on record." }</p>
            }
            <Link<Route> to={Route::Home}>{ "Back to the robot" }</Link<Route>>
        </main>
    }
}
