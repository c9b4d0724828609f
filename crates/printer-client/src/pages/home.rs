//! Demo page: a draggable robot with a simulated streaming backend.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::callback::Interval;
use printer_core::{PrinterConfig, ResultPanelState};
use yew::prelude::*;
use yew_icons::{Icon, IconData};

use crate::components::{ActionConfig, ResultAction, ResultPanelConfig, RobotPrinter};
use crate::hooks::{use_theme, ThemeProvider};

/// One character per tick.
const STREAM_TICK_MS: u32 = 50;

/// Rate limit after each answer, in seconds.
const COOLDOWN_SECS: u32 = 5;

type TimerSlot = Rc<RefCell<Option<Interval>>>;

fn demo_config() -> PrinterConfig {
    PrinterConfig {
        draggable: true,
        tilt_strength: 2.0,
        shadow_strength: 1.5,
        placeholder: "Write a note...".to_string(),
        paper_width: 600.0,
        ..PrinterConfig::default()
    }
}

fn logged(label: &'static str) -> Callback<String> {
    Callback::from(move |value: String| tracing::info!(%value, "{label}"))
}

fn demo_actions() -> Vec<ActionConfig> {
    vec![
        ActionConfig::new("Translate").with_sub_actions(vec![
            ActionConfig::new("To English").on_click(logged("translate to english")),
            ActionConfig::new("To Japanese").on_click(logged("translate to japanese")),
            ActionConfig::new("To Chinese").on_click(logged("translate to chinese")),
        ]),
        ActionConfig::new("Tone").with_sub_actions(vec![
            ActionConfig::new("Professional").on_click(logged("professional tone")),
            ActionConfig::new("Friendly").on_click(logged("friendly tone")),
            ActionConfig::new("Humorous").on_click(logged("humorous tone")),
        ]),
        ActionConfig::new("Summarize").on_click(logged("summarize")),
        ActionConfig::new("Polish").on_click(logged("polish")),
        // No handler: clicking shows the "not implemented" tip
        ActionConfig::new("Coming soon"),
    ]
}

#[function_component(RobotDemo)]
fn robot_demo() -> Html {
    let theme = use_theme();
    let loading = use_state(|| false);
    let delay = use_state(|| 0u32);
    let result = use_state(ResultPanelState::default);
    let stream_timer: TimerSlot = use_mut_ref(|| None);
    let cooldown_timer: TimerSlot = use_mut_ref(|| None);
    let config = use_memo((), |_| demo_config());
    let actions = use_memo((), |_| demo_actions());

    let start_cooldown = {
        let delay = delay.clone();
        let cooldown_timer = cooldown_timer.clone();
        Rc::new(move || {
            let remaining = Rc::new(Cell::new(COOLDOWN_SECS));
            delay.set(COOLDOWN_SECS);
            let interval = {
                let delay = delay.clone();
                let cooldown_timer = cooldown_timer.clone();
                Interval::new(1000, move || {
                    let left = remaining.get().saturating_sub(1);
                    remaining.set(left);
                    delay.set(left);
                    if left == 0 {
                        cooldown_timer.borrow_mut().take();
                    }
                })
            };
            cooldown_timer.replace(Some(interval));
        })
    };

    let on_submit = {
        let loading = loading.clone();
        let result = result.clone();
        let stream_timer = stream_timer.clone();
        Callback::from(move |value: String| {
            tracing::info!(%value, "note submitted");
            loading.set(true);
            result.set(ResultPanelState {
                visible: true,
                content: String::new(),
                loading: true,
            });

            let text: Vec<char> = format!(
                "You wrote: \"{value}\"\n\nThis is a simulated response.\nThe robot is working on it..."
            )
            .chars()
            .collect();
            let mut shown = String::new();

            let interval = {
                let loading = loading.clone();
                let result = result.clone();
                let stream_timer = stream_timer.clone();
                let start_cooldown = start_cooldown.clone();
                Interval::new(STREAM_TICK_MS, move || {
                    if let Some(next) = text.get(shown.chars().count()) {
                        shown.push(*next);
                        result.set(ResultPanelState {
                            visible: true,
                            content: shown.clone(),
                            loading: true,
                        });
                        return;
                    }
                    stream_timer.borrow_mut().take();
                    loading.set(false);
                    result.set(ResultPanelState {
                        visible: true,
                        content: shown.clone(),
                        loading: false,
                    });
                    (*start_cooldown)();
                })
            };
            stream_timer.replace(Some(interval));
        })
    };

    let on_abort = {
        let loading = loading.clone();
        let result = result.clone();
        let stream_timer = stream_timer.clone();
        Callback::from(move |()| {
            tracing::info!("request aborted");
            stream_timer.borrow_mut().take();
            loading.set(false);
            result.set(ResultPanelState {
                loading: false,
                ..(*result).clone()
            });
        })
    };

    let result_panel = result.visible.then(|| {
        let on_close = {
            let result = result.clone();
            Callback::from(move |()| result.set(ResultPanelState::default()))
        };
        ResultPanelConfig {
            state: (*result).clone(),
            actions: vec![
                ResultAction::new("Replace", logged("replace")),
                ResultAction::new("Insert", logged("insert")),
                ResultAction::new(
                    "Regenerate",
                    on_submit.reform(|_: String| "Regenerate".to_string()),
                ),
            ],
            on_close: Some(on_close),
        }
    });

    let on_toggle_theme = theme.toggle.reform(|_: MouseEvent| ());
    let theme_icon = if theme.theme == crate::hooks::Theme::Dark {
        IconData::LUCIDE_SUN
    } else {
        IconData::LUCIDE_MOON
    };

    html! {
        <main class={classes!("page", "home-page", theme.theme.class_name())}>
            <header class="header">
                <h1>{ "ROBOT NOTES" }</h1>
                <p class="subtitle">{ "Drag the robot around. Click it to print a note." }</p>
                <button class="theme-toggle" onclick={on_toggle_theme} aria-label="Toggle theme">
                    <Icon data={theme_icon} width="20px" height="20px" />
                </button>
            </header>

            <RobotPrinter
                config={(*config).clone()}
                loading={*loading}
                delay={*delay}
                actions={(*actions).clone()}
                result_panel={result_panel}
                on_submit={on_submit.clone()}
                on_abort={on_abort}
                info_content={html! {
                    <span>{ "Tokens left: " }<b>{ "987,929" }</b>{ " · Generated text may be wrong, double-check it." }</span>
                }}
            />
        </main>
    }
}

/// Home page component.
#[function_component(HomePage)]
pub fn home_page() -> Html {
    html! {
        <ThemeProvider>
            <RobotDemo />
        </ThemeProvider>
    }
}
