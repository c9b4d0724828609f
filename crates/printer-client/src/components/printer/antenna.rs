//! Antenna with the status ball. While loading the ball pulses and a click
//! aborts the request.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AntennaProps {
    /// CSS background for the ball.
    pub background: AttrValue,
    pub loading: bool,
    pub on_abort: Callback<()>,
}

#[function_component(Antenna)]
pub fn antenna(props: &AntennaProps) -> Html {
    let on_ball_click = {
        let on_abort = props.on_abort.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_abort.emit(());
        })
    };

    html! {
        <div class="antenna">
            <div class="antenna-stem" />
            <div
                class={classes!("antenna-ball", props.loading.then_some("loading"))}
                style={format!("background: {};", props.background)}
                onclick={on_ball_click}
            >
                if props.loading {
                    <div class="stop-icon" />
                }
            </div>
        </div>
    }
}
