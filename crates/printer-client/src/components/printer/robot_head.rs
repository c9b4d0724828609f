//! The robot head. The wrapper stays upright and carries the shadow; the
//! inner head turns when printing.

use printer_core::WidgetView;
use yew::prelude::*;

use super::antenna::Antenna;
use super::eyes::Eyes;
use crate::hooks::PrinterRefs;

#[derive(Properties, PartialEq)]
pub struct RobotHeadProps {
    pub view: WidgetView,
    pub refs: PrinterRefs,
    pub antenna_background: AttrValue,
    pub onclick: Callback<MouseEvent>,
    pub on_abort: Callback<()>,
}

#[function_component(RobotHead)]
pub fn robot_head(props: &RobotHeadProps) -> Html {
    let view = &props.view;
    let head_style = view
        .is_head_turned
        .then(|| format!("transform: rotateZ({}deg);", view.head_rotation()));

    html! {
        <div class="robot-head-wrapper" onclick={props.onclick.clone()}>
            <div class={classes!("robot-head", view.is_head_turned.then_some("rotated"))} style={head_style}>
                <Antenna
                    background={props.antenna_background.clone()}
                    loading={view.loading}
                    on_abort={props.on_abort.clone()}
                />
                <div class="head-body">
                    <div class="ear ear-left" />
                    <div class="ear ear-right" />
                    <div class="face-screen">
                        <Eyes
                            eye={view.eye}
                            eyes_ref={props.refs.eyes.clone()}
                            eye_ref={props.refs.eye.clone()}
                            pupil_ref={props.refs.pupil.clone()}
                        />
                        <div
                            class={classes!("mouth", view.is_mouth_open.then_some("open"))}
                            ref={props.refs.mouth.clone()}
                        />
                    </div>
                </div>
            </div>
        </div>
    }
}
