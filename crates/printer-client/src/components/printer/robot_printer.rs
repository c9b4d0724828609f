//! The robot printer widget.

use printer_core::{ActionSpec, PrinterConfig, WidgetEvent};
use yew::prelude::*;

use super::action_menu::{resolve_action, ActionConfig, ActionMenu};
use super::info_bar::InfoBar;
use super::paper::Paper;
use super::result_panel::{ResultPanel, ResultPanelConfig};
use super::robot_head::RobotHead;
use crate::hooks::use_printer;

#[derive(Properties, PartialEq)]
pub struct RobotPrinterProps {
    #[prop_or_default]
    pub config: PrinterConfig,
    /// Request in flight: loading eyes, no toggling, no submitting.
    #[prop_or(false)]
    pub loading: bool,
    /// Rate-limit countdown in seconds.
    #[prop_or(0)]
    pub delay: u32,
    #[prop_or_default]
    pub actions: Vec<ActionConfig>,
    #[prop_or_default]
    pub result_panel: Option<ResultPanelConfig>,
    #[prop_or_default]
    pub on_submit: Option<Callback<String>>,
    #[prop_or_default]
    pub on_value_change: Option<Callback<String>>,
    #[prop_or_default]
    pub on_abort: Option<Callback<()>>,
    #[prop_or_default]
    pub info_content: Option<Html>,
}

/// Routes widget events to the host's callbacks.
fn event_router(props: &RobotPrinterProps) -> Callback<WidgetEvent> {
    let actions = props.actions.clone();
    let result_actions = props
        .result_panel
        .as_ref()
        .map(|panel| panel.actions.clone())
        .unwrap_or_default();
    let on_submit = props.on_submit.clone();
    let on_value_change = props.on_value_change.clone();
    let on_abort = props.on_abort.clone();

    Callback::from(move |event: WidgetEvent| match event {
        WidgetEvent::Submit(value) => {
            if let Some(cb) = on_submit.as_ref() {
                cb.emit(value);
            }
        }
        WidgetEvent::ValueChange(value) => {
            if let Some(cb) = on_value_change.as_ref() {
                cb.emit(value);
            }
        }
        WidgetEvent::Abort => {
            if let Some(cb) = on_abort.as_ref() {
                cb.emit(());
            }
        }
        WidgetEvent::InvokeAction { path, value } => {
            if let Some(cb) = resolve_action(&actions, path).and_then(|a| a.on_click.as_ref()) {
                cb.emit(value);
            }
        }
        WidgetEvent::InvokeResultAction { index, value } => {
            if let Some(action) = result_actions.get(index).filter(|a| !a.disabled) {
                action.on_click.emit(value);
            }
        }
        WidgetEvent::FocusInput | WidgetEvent::MeasureMouth => {}
    })
}

#[function_component(RobotPrinter)]
pub fn robot_printer(props: &RobotPrinterProps) -> Html {
    let driver = use_printer(props.config.clone(), event_router(props));
    let refs = driver.refs().clone();

    {
        let driver = driver.clone();
        use_effect_with(props.loading, move |loading| {
            driver.run(|widget| widget.set_loading(*loading));
        });
    }
    {
        let driver = driver.clone();
        use_effect_with(props.delay, move |delay| {
            driver.run(|widget| widget.set_delay(*delay));
        });
    }
    {
        let driver = driver.clone();
        let specs: Vec<ActionSpec> = props.actions.iter().map(ActionConfig::spec).collect();
        use_effect_with(specs, move |specs| {
            driver.run(|widget| widget.set_actions(specs.clone()));
        });
    }

    let onmousedown = {
        let driver = driver.clone();
        Callback::from(move |e: MouseEvent| driver.pointer_down(&e))
    };
    let on_head_click = {
        let driver = driver.clone();
        Callback::from(move |e: MouseEvent| driver.click(&e))
    };
    let on_abort = {
        let driver = driver.clone();
        Callback::from(move |()| {
            driver.run(|widget| widget.abort());
        })
    };
    let on_input = {
        let driver = driver.clone();
        Callback::from(move |value: String| driver.run(|widget| widget.set_value(value)))
    };
    let on_key_down = {
        let driver = driver.clone();
        Callback::from(move |key: String| {
            driver.run(|widget| widget.key_down(&key));
        })
    };
    let on_composition = {
        let driver = driver.clone();
        Callback::from(move |composing: bool| {
            driver.run(|widget| {
                if composing {
                    widget.composition_start();
                } else {
                    widget.composition_end();
                }
            });
        })
    };
    let on_hover = {
        let driver = driver.clone();
        Callback::from(move |index: usize| driver.run(|widget| widget.hover_action(index)))
    };
    let on_leave = {
        let driver = driver.clone();
        Callback::from(move |index: usize| driver.run(|widget| widget.leave_action(index)))
    };
    let on_activate = {
        let driver = driver.clone();
        Callback::from(move |path| {
            driver.run(|widget| widget.activate_action(path));
        })
    };
    let on_result_action = {
        let driver = driver.clone();
        Callback::from(move |index: usize| {
            driver.run(|widget| widget.activate_result_action(index));
        })
    };

    let view = driver.view();
    let (value, menu) = driver.with(|widget| (widget.value().to_string(), widget.menu().clone()));
    let config = &props.config;
    let direction = AttrValue::from(view.geometry.direction.as_str());
    let paper_style = AttrValue::from(view.overlay_style(None));
    let wide_style = AttrValue::from(view.overlay_style(Some(config.paper_width)));

    html! {
        <div
            class={classes!("robot-printer", view.draggable.then_some("draggable"))}
            ref={refs.container.clone()}
            style={view.container_style()}
            {onmousedown}
        >
            <Paper
                expanded={view.is_paper_visible}
                direction={view.geometry.direction}
                width={config.paper_width}
                anchor_style={paper_style.clone()}
                placeholder={config.placeholder.clone()}
                value={value}
                locked={view.input_locked}
                input_ref={refs.input.clone()}
                {on_input}
                {on_key_down}
                {on_composition}
            />

            if view.is_paper_visible && !props.actions.is_empty() {
                <ActionMenu
                    actions={props.actions.clone()}
                    menu={menu}
                    direction={direction.clone()}
                    anchor_style={paper_style}
                    {on_hover}
                    {on_leave}
                    {on_activate}
                />
            }

            if let Some(panel) = props.result_panel.as_ref().filter(|p| p.state.is_shown(view.is_paper_visible)) {
                <ResultPanel
                    config={panel.clone()}
                    direction={direction.clone()}
                    anchor_style={wide_style.clone()}
                    on_action={on_result_action}
                />
            }

            if let Some(info) = props.info_content.as_ref().filter(|_| view.is_paper_visible) {
                <InfoBar direction={view.geometry.direction} anchor_style={wide_style}>
                    { info.clone() }
                </InfoBar>
            }

            <RobotHead
                view={view.clone()}
                refs={refs}
                antenna_background={config.antenna_color.css_background()}
                onclick={on_head_click}
                {on_abort}
            />

            if let Some(hint) = view.hint {
                <div class="hint">{ hint }</div>
            }
        </div>
    }
}
