//! Result panel shown alongside the paper. Content is owned by the host.

use printer_core::ResultPanelState;
use yew::prelude::*;

/// Button under the result.
#[derive(Clone, PartialEq)]
pub struct ResultAction {
    pub label: AttrValue,
    /// Receives the current input value.
    pub on_click: Callback<String>,
    pub disabled: bool,
}

impl ResultAction {
    pub fn new(label: impl Into<AttrValue>, on_click: Callback<String>) -> Self {
        Self {
            label: label.into(),
            on_click,
            disabled: false,
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ResultPanelConfig {
    pub state: ResultPanelState,
    pub actions: Vec<ResultAction>,
    pub on_close: Option<Callback<()>>,
}

#[derive(Properties, PartialEq)]
pub struct ResultPanelProps {
    pub config: ResultPanelConfig,
    pub direction: AttrValue,
    pub anchor_style: AttrValue,
    pub on_action: Callback<usize>,
}

#[function_component(ResultPanel)]
pub fn result_panel(props: &ResultPanelProps) -> Html {
    let state = &props.config.state;

    let on_close = {
        let on_close = props.config.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            if let Some(cb) = on_close.as_ref() {
                cb.emit(());
            }
        })
    };

    html! {
        <div class={classes!("result-panel", format!("direction-{}", props.direction))} style={props.anchor_style.clone()}>
            <button class="result-panel-close" onclick={on_close} title="Close">
                { "✕" }
            </button>

            <div class="result-panel-content">
                if state.shows_loading_hint() {
                    <div class="result-panel-loading">
                        <span class="loading-dots">{ "Generating" }</span>
                    </div>
                }
                { for state.lines().into_iter().enumerate().map(|(index, line)| html! {
                    <p class="result-panel-line" key={index}>{ line.to_string() }</p>
                }) }
                if state.shows_cursor() {
                    <span class="typing-cursor">{ "▋" }</span>
                }
            </div>

            if state.shows_actions(props.config.actions.len()) {
                <div class="result-panel-actions">
                    { for props.config.actions.iter().enumerate().map(|(index, action)| html! {
                        <button
                            class="result-panel-btn"
                            key={index}
                            disabled={action.disabled}
                            onclick={props.on_action.reform(move |_: MouseEvent| index)}
                        >
                            { action.label.clone() }
                        </button>
                    }) }
                </div>
            }
        </div>
    }
}
