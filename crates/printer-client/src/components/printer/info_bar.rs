//! Footer under the paper, e.g. remaining tokens or a disclaimer.

use printer_core::PaperDirection;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct InfoBarProps {
    pub direction: PaperDirection,
    pub anchor_style: AttrValue,
    #[prop_or_default]
    pub children: Html,
}

#[function_component(InfoBar)]
pub fn info_bar(props: &InfoBarProps) -> Html {
    html! {
        <div
            class={classes!("info-bar", format!("direction-{}", props.direction.as_str()))}
            style={props.anchor_style.clone()}
        >
            { props.children.clone() }
        </div>
    }
}
