//! Runs a [`PrinterWidget`] against the browser clock and DOM.
//!
//! The widget's virtual clock starts at mount. Before every input the clock
//! is advanced to "now", afterwards one gloo `Timeout` is armed for the next
//! deadline. Events the host cares about go to `on_event`; focus and mouth
//! measurement are handled here. Measurement waits one tick so it reads the
//! DOM after Yew has rendered the phase that requested it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use printer_core::{
    Millis, OverlayRegion, PointerTarget, Position, PrinterConfig, PrinterWidget, PupilBounds,
    Rect, Viewport, WidgetEvent, WidgetView,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, MouseEvent};
use yew::prelude::*;

/// DOM nodes the widget measures or focuses.
#[derive(Clone, Default, PartialEq)]
pub struct PrinterRefs {
    pub container: NodeRef,
    pub mouth: NodeRef,
    pub input: NodeRef,
    pub eyes: NodeRef,
    /// First eye and its pupil, used to size the pupil travel.
    pub eye: NodeRef,
    pub pupil: NodeRef,
}

pub struct PrinterDriver {
    widget: RefCell<PrinterWidget>,
    requested: RefCell<PrinterConfig>,
    epoch: f64,
    refs: PrinterRefs,
    timeout: RefCell<Option<Timeout>>,
    measure: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
    drag_listeners: RefCell<Vec<EventListener>>,
    on_event: RefCell<Callback<WidgetEvent>>,
    version: Cell<u64>,
    redraw: Callback<u64>,
}

fn current_viewport() -> Viewport {
    let window = gloo::utils::window();
    let size = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(size(window.inner_width()), size(window.inner_height()))
}

fn rect_of(node: &NodeRef) -> Option<Rect> {
    let rect = node.cast::<Element>()?.get_bounding_client_rect();
    Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
}

fn client_position(event: &MouseEvent) -> Position {
    Position::new(f64::from(event.client_x()), f64::from(event.client_y()))
}

/// Classifies a press by the closest protected overlay around its target.
fn pointer_target(event: &MouseEvent) -> PointerTarget {
    let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
        return PointerTarget::Body;
    };
    OverlayRegion::ALL
        .into_iter()
        .find(|region| {
            matches!(
                element.closest(&format!(".{}", region.class_name())),
                Ok(Some(_))
            )
        })
        .map_or(PointerTarget::Body, PointerTarget::Overlay)
}

/// Publishes the mouth box. Returns false if either node is not mounted.
fn measure_mouth(refs: &PrinterRefs, widget: &mut PrinterWidget) -> bool {
    let (Some(mouth), Some(container)) = (rect_of(&refs.mouth), rect_of(&refs.container)) else {
        tracing::trace!("mouth not mounted, keeping previous offset");
        return false;
    };
    widget.publish_mouth_anchor(mouth, container);
    true
}

fn build_widget(config: PrinterConfig, viewport: Viewport) -> PrinterWidget {
    let (widget, err) = PrinterWidget::new_or_default(config, viewport, rand::random());
    if let Some(err) = err {
        tracing::warn!(%err, "invalid printer config, falling back to defaults");
    }
    widget
}

impl PrinterDriver {
    fn new(config: PrinterConfig, refs: PrinterRefs, redraw: Callback<u64>) -> Self {
        Self {
            widget: RefCell::new(build_widget(config.clone(), current_viewport())),
            requested: RefCell::new(config),
            epoch: js_sys::Date::now(),
            refs,
            timeout: RefCell::new(None),
            measure: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            drag_listeners: RefCell::new(Vec::new()),
            on_event: RefCell::new(Callback::noop()),
            version: Cell::new(0),
            redraw,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn now(&self) -> Millis {
        let elapsed = js_sys::Date::now() - self.epoch;
        if elapsed > 0.0 { elapsed as Millis } else { 0 }
    }

    pub fn refs(&self) -> &PrinterRefs {
        &self.refs
    }

    pub fn view(&self) -> WidgetView {
        self.widget.borrow().view()
    }

    /// Reads the widget without advancing the clock.
    pub fn with<R>(&self, f: impl FnOnce(&PrinterWidget) -> R) -> R {
        f(&self.widget.borrow())
    }

    /// Advances the clock, applies `f`, delivers events, re-arms the timer
    /// and re-renders.
    pub fn run<R>(self: &Rc<Self>, f: impl FnOnce(&mut PrinterWidget) -> R) -> R {
        let (result, events) = self.step(f);
        self.finish(events, true);
        result
    }

    /// Like [`PrinterDriver::run`] but only re-renders when `f` reports a
    /// visible change.
    pub fn run_quiet(self: &Rc<Self>, f: impl FnOnce(&mut PrinterWidget) -> bool) -> bool {
        let (changed, events) = self.step(f);
        self.finish(events, changed);
        changed
    }

    fn step<R>(&self, f: impl FnOnce(&mut PrinterWidget) -> R) -> (R, Vec<WidgetEvent>) {
        let mut widget = self.widget.borrow_mut();
        widget.advance_to(self.now());
        let result = f(&mut widget);
        (result, widget.drain_events())
    }

    fn finish(self: &Rc<Self>, events: Vec<WidgetEvent>, changed: bool) {
        let redraw = changed || !events.is_empty();
        self.deliver(events);
        self.arm();
        if redraw {
            let version = self.version.get().wrapping_add(1);
            self.version.set(version);
            self.redraw.emit(version);
        }
    }

    fn deliver(self: &Rc<Self>, events: Vec<WidgetEvent>) {
        for event in events {
            match event {
                WidgetEvent::FocusInput => {
                    if let Some(input) = self.refs.input.cast::<HtmlInputElement>() {
                        let _ = input.focus();
                    }
                }
                WidgetEvent::MeasureMouth => self.schedule_measure(),
                event => {
                    let on_event = self.on_event.borrow().clone();
                    on_event.emit(event);
                }
            }
        }
    }

    fn schedule_measure(self: &Rc<Self>) {
        let driver = Rc::downgrade(self);
        let timeout = Timeout::new(0, move || {
            if let Some(driver) = driver.upgrade() {
                let refs = driver.refs.clone();
                driver.run_quiet(|widget| measure_mouth(&refs, widget));
            }
        });
        self.measure.replace(Some(timeout));
    }

    fn measure_pupils(&self) {
        if let (Some(eye), Some(pupil)) = (rect_of(&self.refs.eye), rect_of(&self.refs.pupil)) {
            let bounds = PupilBounds::from_sizes(eye.width, eye.height, pupil.width, pupil.height);
            self.widget.borrow_mut().set_pupil_bounds(bounds);
        }
    }

    /// Arms a single timeout for the earliest pending deadline. Replacing
    /// the old handle cancels it.
    fn arm(self: &Rc<Self>) {
        let deadline = self.widget.borrow().next_deadline();
        let timeout = deadline.map(|deadline| {
            let delay = u32::try_from(deadline.saturating_sub(self.now())).unwrap_or(u32::MAX);
            let driver = Rc::downgrade(self);
            Timeout::new(delay, move || {
                if let Some(driver) = driver.upgrade() {
                    driver.run(|_| ());
                }
            })
        });
        self.timeout.replace(timeout);
    }

    fn set_on_event(&self, on_event: Callback<WidgetEvent>) {
        self.on_event.replace(on_event);
    }

    /// Applies a changed host config in place. An invalid one is logged
    /// and the current config stays.
    fn reconfigure(self: &Rc<Self>, config: &PrinterConfig) {
        if *self.requested.borrow() == *config {
            return;
        }
        self.requested.replace(config.clone());

        let applied = self.run(|widget| widget.reconfigure(config.clone()));
        if let Err(err) = applied {
            tracing::warn!(%err, "invalid printer config, keeping the previous one");
            return;
        }
        if !self.with(PrinterWidget::is_dragging) {
            self.drag_listeners.take();
        }
        tracing::debug!("printer config applied");
    }

    fn mount(self: &Rc<Self>) {
        self.measure_pupils();

        let window = gloo::utils::window();
        let document = gloo::utils::document();

        let on_resize = {
            let driver = Rc::downgrade(self);
            EventListener::new(&window, "resize", move |_| {
                if let Some(driver) = driver.upgrade() {
                    driver.measure_pupils();
                    driver.run(|widget| widget.set_viewport(current_viewport()));
                }
            })
        };

        let on_track = {
            let driver = Rc::downgrade(self);
            EventListener::new(&document, "mousemove", move |event| {
                let (Some(driver), Some(event)) = (driver.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                let Some(eyes) = rect_of(&driver.refs.eyes) else {
                    return;
                };
                let pointer = client_position(event);
                driver.run_quiet(|widget| widget.eye_pointer_move(eyes.center(), pointer));
            })
        };

        self.listeners.replace(vec![on_resize, on_track]);
        self.run(|_| ());
    }

    fn unmount(&self) {
        self.timeout.take();
        self.measure.take();
        self.listeners.take();
        self.drag_listeners.take();
        self.widget.borrow_mut().teardown();
    }

    /// Mouse pressed on the widget. Starts a drag session with listeners
    /// on the document that live until release.
    pub fn pointer_down(self: &Rc<Self>, event: &MouseEvent) {
        let target = pointer_target(event);
        let pointer = client_position(event);
        if !self.run(|widget| widget.pointer_down(pointer, target)) {
            return;
        }
        event.prevent_default();

        let document = gloo::utils::document();
        let window = gloo::utils::window();

        let on_move = {
            let driver = Rc::downgrade(self);
            EventListener::new(&document, "mousemove", move |event| {
                let (Some(driver), Some(event)) = (driver.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                let pointer = client_position(event);
                driver.run_quiet(|widget| widget.pointer_move(pointer));
            })
        };

        let on_up = {
            let driver = Rc::downgrade(self);
            EventListener::new(&document, "mouseup", move |event| {
                let (Some(driver), Some(event)) = (driver.upgrade(), event.dyn_ref::<MouseEvent>())
                else {
                    return;
                };
                let pointer = client_position(event);
                let release = driver.run(|widget| widget.pointer_up(pointer));
                tracing::debug!(?release, "pointer released");
                driver.drag_listeners.take();
            })
        };

        let on_blur = {
            let driver = Rc::downgrade(self);
            EventListener::new(&window, "blur", move |_| {
                if let Some(driver) = driver.upgrade() {
                    driver.run(PrinterWidget::pointer_cancel);
                    driver.drag_listeners.take();
                }
            })
        };

        self.drag_listeners.replace(vec![on_move, on_up, on_blur]);
    }

    /// Click on the robot head.
    pub fn click(self: &Rc<Self>, event: &MouseEvent) {
        if let PointerTarget::Overlay(_) = pointer_target(event) {
            return;
        }
        self.run(PrinterWidget::click_head);
    }
}

/// Owns a printer widget for the lifetime of the calling component.
///
/// `on_event` receives every [`WidgetEvent`] except focus and measurement
/// requests; it is refreshed on each render.
#[hook]
pub fn use_printer(config: PrinterConfig, on_event: Callback<WidgetEvent>) -> Rc<PrinterDriver> {
    let render_version = use_state(|| 0u64);
    let refs = use_memo((), |_| PrinterRefs::default());

    let driver = {
        let config = config.clone();
        let refs = (*refs).clone();
        let setter = render_version.setter();
        use_memo((), move |_| {
            PrinterDriver::new(config, refs, Callback::from(move |v| setter.set(v)))
        })
    };

    driver.set_on_event(on_event);

    {
        let driver = driver.clone();
        use_effect_with((), move |_| {
            driver.mount();
            move || driver.unmount()
        });
    }

    {
        let driver = driver.clone();
        use_effect_with(config, move |config| {
            driver.reconfigure(config);
        });
    }

    // Read to subscribe this component to redraws
    let _ = *render_version;

    driver
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_driver_starts_idle_and_toggles() {
        let driver = Rc::new(PrinterDriver::new(
            PrinterConfig::default(),
            PrinterRefs::default(),
            Callback::noop(),
        ));
        assert_eq!(driver.view().phase, printer_core::AnimationPhase::Idle);
        assert!(driver.run(PrinterWidget::toggle));
        assert_eq!(driver.view().phase, printer_core::AnimationPhase::Rotating);
        driver.unmount();
        assert!(driver.with(PrinterWidget::is_disposed));
    }

    #[wasm_bindgen_test]
    fn test_reconfigure_keeps_host_state() {
        let driver = Rc::new(PrinterDriver::new(
            PrinterConfig::default(),
            PrinterRefs::default(),
            Callback::noop(),
        ));
        driver.run(|widget| {
            widget.set_loading(true);
            widget.set_value("draft");
        });
        let config = PrinterConfig {
            draggable: true,
            ..PrinterConfig::default()
        };
        driver.reconfigure(&config);
        assert!(driver.with(|w| w.is_loading() && w.value() == "draft" && w.config().draggable));

        let invalid = PrinterConfig {
            paper_duration: 0,
            ..PrinterConfig::default()
        };
        driver.reconfigure(&invalid);
        assert!(driver.with(|w| w.config().draggable));
        driver.unmount();
    }

    #[wasm_bindgen_test]
    fn test_mouth_measure_waits_for_render() {
        let driver = Rc::new(PrinterDriver::new(
            PrinterConfig::default(),
            PrinterRefs::default(),
            Callback::noop(),
        ));
        // The first mouth state is measured at 0 ms on the widget clock
        driver.run(|_| ());
        assert!(driver.measure.borrow().is_some());
        driver.unmount();
        assert!(driver.measure.borrow().is_none());
    }
}
