//! Eyes: blink, pupils, loading bars and the countdown digit.

use printer_core::{EffectiveEyeMode, EyeView};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct EyesProps {
    pub eye: EyeView,
    pub eyes_ref: NodeRef,
    /// Left eye and its pupil, measured for pupil travel.
    pub eye_ref: NodeRef,
    pub pupil_ref: NodeRef,
}

#[function_component(Eyes)]
pub fn eyes(props: &EyesProps) -> Html {
    let eye = props.eye;
    let loading = eye.mode == EffectiveEyeMode::Loading;
    let countdown = matches!(eye.mode, EffectiveEyeMode::Countdown(_));

    let pupil_style = format!(
        "transform: translate({}px, {}px);",
        eye.pupil_offset.x, eye.pupil_offset.y
    );
    let eye_class = |side: &'static str| {
        classes!(
            "eye",
            side,
            eye.blinking.then_some("blink"),
            loading.then_some("loading"),
            countdown.then_some("hidden-eye"),
        )
    };
    let pupil = |node: Option<NodeRef>| {
        eye.pupils_visible.then(|| {
            html! { <div class="pupil" style={pupil_style.clone()} ref={node.unwrap_or_default()} /> }
        })
    };

    html! {
        <div class={classes!("eyes-container", countdown.then_some("countdown-mode"))} ref={props.eyes_ref.clone()}>
            if let Some(value) = eye.countdown {
                <span
                    class="countdown-digit"
                    style={format!("transform: translate(-50%, -50%) rotate({}deg);", eye.countdown_rotation)}
                >
                    { value.to_string() }
                </span>
            }
            <div class={eye_class("eye-left")} ref={props.eye_ref.clone()}>
                { pupil(Some(props.pupil_ref.clone())) }
            </div>
            <div class={eye_class("eye-right")}>
                { pupil(None) }
            </div>
        </div>
    }
}
