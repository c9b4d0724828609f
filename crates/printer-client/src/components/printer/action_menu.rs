//! Action buttons next to the paper, with hover sub-menus.

use printer_core::{ActionMenuState, ActionPath, ActionSpec};
use yew::prelude::*;

const TIP_TEXT: &str = "Not implemented yet";

/// One menu item as the host declares it.
#[derive(Clone, PartialEq)]
pub struct ActionConfig {
    pub label: AttrValue,
    /// Receives the current input value. Items without one show a tip.
    pub on_click: Option<Callback<String>>,
    pub disabled: bool,
    pub sub_actions: Vec<ActionConfig>,
}

impl ActionConfig {
    pub fn new(label: impl Into<AttrValue>) -> Self {
        Self {
            label: label.into(),
            on_click: None,
            disabled: false,
            sub_actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn on_click(mut self, callback: Callback<String>) -> Self {
        self.on_click = Some(callback);
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    #[must_use]
    pub fn with_sub_actions(mut self, sub_actions: Vec<ActionConfig>) -> Self {
        self.sub_actions = sub_actions;
        self
    }

    /// Renderer-independent description for the widget core.
    pub fn spec(&self) -> ActionSpec {
        ActionSpec {
            label: self.label.to_string(),
            has_handler: self.on_click.is_some(),
            disabled: self.disabled,
            sub_actions: self.sub_actions.iter().map(ActionConfig::spec).collect(),
        }
    }
}

/// Looks up the item at `path`.
pub fn resolve_action(actions: &[ActionConfig], path: ActionPath) -> Option<&ActionConfig> {
    let item = actions.get(path.index)?;
    match path.sub {
        Some(sub) => item.sub_actions.get(sub),
        None => Some(item),
    }
}

#[derive(Properties, PartialEq)]
pub struct ActionMenuProps {
    pub actions: Vec<ActionConfig>,
    pub menu: ActionMenuState,
    pub direction: AttrValue,
    pub anchor_style: AttrValue,
    pub on_hover: Callback<usize>,
    pub on_leave: Callback<usize>,
    pub on_activate: Callback<ActionPath>,
}

#[function_component(ActionMenu)]
pub fn action_menu(props: &ActionMenuProps) -> Html {
    let specs: Vec<ActionSpec> = props.actions.iter().map(ActionConfig::spec).collect();
    let open = props.menu.open_submenu(&specs);

    let button = |path: ActionPath, action: &ActionConfig, class: &'static str| {
        let onclick = props.on_activate.reform(move |e: MouseEvent| {
            e.stop_propagation();
            path
        });
        let has_submenu = path.sub.is_none() && !action.sub_actions.is_empty();
        html! {
            <button
                class={classes!(class, has_submenu.then_some("has-submenu"))}
                disabled={action.disabled}
                {onclick}
            >
                { action.label.clone() }
                if has_submenu {
                    <span class="submenu-indicator">{ "▾" }</span>
                }
                if path.sub.is_some() && props.menu.is_tip_visible(path) {
                    <span class="action-tip">{ TIP_TEXT }</span>
                }
            </button>
        }
    };

    html! {
        <div class={classes!("action-menu", format!("direction-{}", props.direction))} style={props.anchor_style.clone()}>
            { for props.actions.iter().enumerate().map(|(index, action)| {
                let path = ActionPath::top(index);
                html! {
                    <div
                        class="action-btn-wrapper"
                        key={index}
                        onmouseenter={props.on_hover.reform(move |_: MouseEvent| index)}
                        onmouseleave={props.on_leave.reform(move |_: MouseEvent| index)}
                    >
                        { button(path, action, "action-btn") }
                        if props.menu.is_tip_visible(path) {
                            <span class="action-tip">{ TIP_TEXT }</span>
                        }
                        if open == Some(index) {
                            <div class="submenu">
                                { for action.sub_actions.iter().enumerate().map(|(sub, item)| {
                                    button(ActionPath::sub(index, sub), item, "submenu-btn")
                                }) }
                            </div>
                        }
                    </div>
                }
            }) }
        </div>
    }
}
