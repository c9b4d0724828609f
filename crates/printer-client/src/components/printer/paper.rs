//! Paper strip with the text field.

use printer_core::PaperDirection;
use web_sys::{CompositionEvent, HtmlInputElement};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaperProps {
    pub expanded: bool,
    pub direction: PaperDirection,
    pub width: f64,
    /// Anchor offset style from the widget view.
    pub anchor_style: AttrValue,
    pub placeholder: AttrValue,
    pub value: AttrValue,
    /// Disables the field while loading or counting down.
    pub locked: bool,
    pub input_ref: NodeRef,
    pub on_input: Callback<String>,
    pub on_key_down: Callback<String>,
    /// `true` on composition start, `false` on end.
    pub on_composition: Callback<bool>,
}

#[function_component(Paper)]
pub fn paper(props: &PaperProps) -> Html {
    let oninput = {
        let on_input = props.on_input.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_input.emit(input.value());
            }
        })
    };
    let onkeydown = {
        let on_key_down = props.on_key_down.clone();
        Callback::from(move |e: KeyboardEvent| on_key_down.emit(e.key()))
    };
    let oncompositionstart = props.on_composition.reform(|_: CompositionEvent| true);
    let oncompositionend = props.on_composition.reform(|_: CompositionEvent| false);

    let direction = props.direction.as_str();
    let style = format!("--paper-width: {}px; {}", props.width, props.anchor_style);

    html! {
        <div
            class={classes!(
                "paper",
                if props.expanded { "expanded" } else { "collapsed" },
                format!("direction-{direction}"),
            )}
            style={style}
        >
            <div class={classes!("paper-holes", direction)}>
                <div class="paper-hole" />
                <div class="paper-hole" />
                <div class="paper-hole" />
            </div>
            <div class="paper-content">
                <input
                    ref={props.input_ref.clone()}
                    type="text"
                    class="paper-input"
                    placeholder={props.placeholder.clone()}
                    value={props.value.clone()}
                    disabled={props.locked}
                    {oninput}
                    {onkeydown}
                    {oncompositionstart}
                    {oncompositionend}
                />
            </div>
            <div class="paper-lines">
                <div class="paper-line" />
                <div class="paper-line" />
            </div>
        </div>
    }
}
