//! Interactive line chart component
//!
//! Thin Leptos shell around [`LineChartEngine`]: props and DOM events are
//! forwarded to engine transitions, engine events are forwarded to the
//! callbacks, and a revision signal re-renders the markup.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use leptos::{html::Div, prelude::*};
use research_core::{ChartError, DataPoint};
use web_sys::MouseEvent;

use crate::{
    browser::{ListenerGuard, RafScheduler, SizeObserver, now, offset_in},
    config::ChartConfig,
    engine::{ChartEvent, LineChartEngine, RenderFrame},
    pan::{DataNeeded, TimeWindow},
};

type SharedEngine = Rc<RefCell<LineChartEngine>>;

/// Host callbacks, all optional
#[derive(Clone, Copy, Default)]
struct Handlers {
    on_hover: Option<Callback<Option<DataPoint>>>,
    on_pan: Option<Callback<TimeWindow>>,
    on_data_needed: Option<Callback<DataNeeded>>,
    on_error: Option<Callback<ChartError>>,
}

impl Handlers {
    fn dispatch(&self, event: ChartEvent) {
        match event {
            ChartEvent::Hover(point) => {
                if let Some(cb) = self.on_hover {
                    cb.run(point);
                }
            }
            ChartEvent::Pan(window) => {
                if let Some(cb) = self.on_pan {
                    cb.run(window);
                }
            }
            ChartEvent::DataNeeded(needed) => {
                if let Some(cb) = self.on_data_needed {
                    cb.run(needed);
                }
            }
            ChartEvent::Error(err) => {
                if let Some(cb) = self.on_error {
                    cb.run(err);
                }
            }
        }
    }
}

/// Publish the engine's revision and hand its queued events to the host.
/// The engine is not borrowed while callbacks run.
fn flush(engine: &SharedEngine, handlers: Handlers, revision: RwSignal<u64>) {
    let (events, rev) = {
        let mut engine = engine.borrow_mut();
        (engine.take_events(), engine.revision())
    };
    if revision.get_untracked() != rev {
        revision.set(rev);
    }
    for event in events {
        handlers.dispatch(event);
    }
}

/// Line chart with eased y-domain, hover tooltip and drag-to-pan
#[component]
pub fn LineChart(
    #[prop(into)] data: Signal<Arc<Vec<DataPoint>>>,
    #[prop(into, optional)] config: Option<Signal<ChartConfig>>,
    #[prop(into, optional)] loading: MaybeProp<bool>,
    #[prop(into, optional)] error: MaybeProp<String>,
    #[prop(into, optional)] on_hover: Option<Callback<Option<DataPoint>>>,
    #[prop(into, optional)] on_pan: Option<Callback<TimeWindow>>,
    #[prop(into, optional)] on_data_needed: Option<Callback<DataNeeded>>,
    #[prop(into, optional)] on_error: Option<Callback<ChartError>>,
) -> impl IntoView {
    let config = config.unwrap_or_else(|| Signal::stored(ChartConfig::default()));
    let handlers = Handlers {
        on_hover,
        on_pan,
        on_data_needed,
        on_error,
    };
    let revision = RwSignal::new(0u64);
    let tooltip_size = RwSignal::new(None::<(f64, f64)>);

    let container = NodeRef::<Div>::new();
    let tooltip_ref = NodeRef::<Div>::new();

    // Engine, with an animation-frame loop that calls back into it
    let engine: SharedEngine = Rc::new_cyclic(|weak: &Weak<RefCell<LineChartEngine>>| {
        let weak = weak.clone();
        let scheduler = RafScheduler::new(move |timestamp| {
            if let Some(engine) = weak.upgrade() {
                engine.borrow_mut().on_animation_frame(timestamp);
                flush(&engine, handlers, revision);
            }
        });
        RefCell::new(LineChartEngine::new(config.get_untracked(), Box::new(scheduler)))
    });
    {
        let t = now();
        let mut initial = engine.borrow_mut();
        initial.set_loading(loading.get_untracked().unwrap_or(false), t);
        initial.set_error(error.get_untracked(), t);
        initial.set_data(data.get_untracked(), t);
    }
    let engine = StoredValue::new_local(engine);
    let drag_listeners = StoredValue::new_local(Vec::<ListenerGuard>::new());
    let resize = StoredValue::new_local(None::<SizeObserver>);

    let with_engine = move |f: &dyn Fn(&mut LineChartEngine)| {
        let engine = engine.get_value();
        f(&mut engine.borrow_mut());
        flush(&engine, handlers, revision);
    };

    // Errors from the initial pass
    Effect::new(move |_| {
        let engine = engine.get_value();
        flush(&engine, handlers, revision);
    });

    // Prop changes, skipping the first run (already applied above)
    Effect::new(move |prev: Option<()>| {
        let data = data.get();
        if prev.is_some() {
            with_engine(&|e: &mut LineChartEngine| e.set_data(data.clone(), now()));
        }
    });
    Effect::new(move |prev: Option<()>| {
        let config = config.get();
        if prev.is_some() {
            with_engine(&|e: &mut LineChartEngine| e.set_config(config.clone(), now()));
        }
    });
    Effect::new(move |prev: Option<()>| {
        let loading = loading.get().unwrap_or(false);
        let error = error.get();
        if prev.is_some() {
            with_engine(&|e: &mut LineChartEngine| {
                let t = now();
                e.set_loading(loading, t);
                e.set_error(error.clone(), t);
            });
        }
    });

    // Container size
    Effect::new(move |_| {
        let Some(element) = container.get() else {
            return;
        };
        let observer = SizeObserver::observe(&element, move |width, height| {
            with_engine(&|e: &mut LineChartEngine| e.set_size(width, height, now()));
        });
        match observer {
            Ok(observer) => resize.set_value(Some(observer)),
            Err(err) => tracing::error!(?err, "failed to observe chart container"),
        }
    });

    // Tooltip box size, measured after it renders
    Effect::new(move |_| {
        revision.track();
        let Some(element) = tooltip_ref.get() else {
            return;
        };
        let size = (element.offset_width() as f64, element.offset_height() as f64);
        if size.0 > 0.0 && tooltip_size.get_untracked() != Some(size) {
            tooltip_size.set(Some(size));
        }
    });

    let end_drag = move || {
        drag_listeners.update_value(|listeners| listeners.iter_mut().for_each(ListenerGuard::detach));
    };

    let on_mousedown = move |ev: MouseEvent| {
        let Some(element) = container.get() else {
            return;
        };
        let (x, y) = offset_in(&element, &ev);
        let engine_rc = engine.get_value();
        let started = engine_rc.borrow_mut().pointer_down(x, y, now());
        flush(&engine_rc, handlers, revision);
        if !started {
            return;
        }
        ev.prevent_default();

        let on_move = {
            let element = element.clone();
            move |ev: MouseEvent| {
                let (x, y) = offset_in(&element, &ev);
                with_engine(&|e: &mut LineChartEngine| e.pointer_move(x, y, now()));
            }
        };
        let on_up = move |_: MouseEvent| {
            with_engine(&|e: &mut LineChartEngine| e.pointer_up(now()));
            end_drag();
        };
        let listeners = [
            ListenerGuard::on_document("mousemove", on_move),
            ListenerGuard::on_document("mouseup", on_up),
        ]
        .into_iter()
        .collect::<Result<Vec<_>, _>>();
        match listeners {
            // replacing the previous drag's guards drops them outside their callbacks
            Ok(listeners) => drag_listeners.set_value(listeners),
            Err(err) => {
                tracing::error!(?err, "failed to attach drag listeners");
                with_engine(&|e: &mut LineChartEngine| e.pointer_up(now()));
            }
        }
    };

    let on_mousemove = move |ev: MouseEvent| {
        let Some(element) = container.get() else {
            return;
        };
        let (x, y) = offset_in(&element, &ev);
        // document listeners own the pointer while dragging
        if !engine.get_value().borrow().is_panning() {
            with_engine(&|e: &mut LineChartEngine| e.pointer_move(x, y, now()));
        }
    };

    let on_mouseleave = move |_: MouseEvent| with_engine(&|e: &mut LineChartEngine| e.pointer_leave());

    on_cleanup(move || {
        engine.with_value(|e| e.borrow_mut().teardown());
        drag_listeners.set_value(Vec::new());
        resize.set_value(None);
    });

    let chart = move || {
        revision.track();
        let frame = engine.with_value(|e| e.borrow().render());
        match frame {
            RenderFrame::Placeholder {
                kind,
                message,
                width,
                height,
            } => view! {
                <div
                    class=kind.css_class()
                    style=format!(
                        "width: {width}px; height: {height}px; display: flex; flex-direction: column; \
                         align-items: center; justify-content: center;"
                    )
                >
                    <div class="chart-placeholder-title">{kind.title()}</div>
                    <div class="chart-placeholder-message">{message}</div>
                </div>
            }
            .into_any(),
            RenderFrame::Chart { markup, width, height } => view! {
                <svg
                    class="line-chart-svg"
                    width=width
                    height=height
                    viewBox=format!("0 0 {width} {height}")
                    inner_html=markup
                ></svg>
            }
            .into_any(),
        }
    };

    let tooltip = move || {
        revision.track();
        let (view, style) = engine.with_value(|e| {
            let e = e.borrow();
            let style = e.config().style.clone();
            (e.tooltip_view(tooltip_size.get()), style)
        });
        let Some(view) = view else {
            return (String::from("display: none;"), None);
        };
        let placement = view.placement;
        let arrow = placement.arrow.map(|arrow| {
            arrow.css(arrow.size, arrow.size, &style.tooltip_background)
        });
        let css = format!(
            "position: absolute; left: {:.1}px; top: {:.1}px; pointer-events: none; \
             background: {}; border: 1px solid {}; border-radius: 4px; padding: 6px 10px; \
             white-space: nowrap; z-index: 10;",
            placement.left, placement.top, style.tooltip_background, style.tooltip_border
        );
        let content = view! {
            <div class="chart-tooltip-title">{view.text.title}</div>
            <div class="chart-tooltip-value">{view.text.value}</div>
            {arrow.map(|css| view! { <div class="chart-tooltip-arrow" style=css></div> })}
        };
        (css, Some(content))
    };

    view! {
        <div
            class="line-chart"
            node_ref=container
            style="position: relative; width: 100%;"
            on:mousedown=on_mousedown
            on:mousemove=on_mousemove
            on:mouseleave=on_mouseleave
        >
            {chart}
            <div
                class="chart-tooltip"
                node_ref=tooltip_ref
                style=move || tooltip().0
            >
                {move || tooltip().1}
            </div>
        </div>
    }
}
