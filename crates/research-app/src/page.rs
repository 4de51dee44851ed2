//! Ticker research page

use std::sync::Arc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use research_charts::{
    AnimationConfig, AxisConfig, ChartConfig, DataNeeded, DimensionConfig, GridConfig,
    InteractionConfig, LineChart, TimeWindow,
};
use research_core::{
    AxisValue, ChartError, CompactNumberFormatter, CurrencyFormatter, DataPoint, DateFormatter,
    Direction, FullCurrencyFormatter, XAxisKind, YAxisKind, parse_instant,
};

use crate::{
    history::{LoadedRanges, merge_history},
    sample,
    weekends::weekend_ranges,
};

/// Simulated latency of a history request
const FETCH_DELAY_MS: u32 = 500;
/// Trading days returned per history request
const FETCH_DAYS: usize = 20;

fn initial_window() -> TimeWindow {
    let millis = |s: &str| parse_instant(s).map(|t| t.timestamp_millis()).unwrap_or_default();
    TimeWindow::new(millis("2024-01-01"), millis("2024-02-01"))
}

fn price_chart_config(window: TimeWindow) -> ChartConfig {
    let initial = initial_window();
    ChartConfig::default()
        .axis(
            AxisConfig::new(XAxisKind::Temporal, YAxisKind::Linear)
                .x_domain(initial.start, initial.end)
                .labels("Date", "Price (USD)")
                .format_x(DateFormatter::short())
                .format_y(CurrencyFormatter::default())
                .tooltip_format_x(DateFormatter::full())
                .tooltip_format_y(FullCurrencyFormatter),
        )
        .grid(GridConfig {
            show_x_grid: true,
            show_y_grid: false,
        })
        .interaction(InteractionConfig {
            show_dots: true,
            show_tooltip: true,
            enable_panning: true,
        })
        .animation(AnimationConfig {
            animate: true,
            animate_on_data_change: false,
            ..AnimationConfig::default()
        })
        .x_highlights(weekend_ranges(window))
}

/// Root component
#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="research-app">
            <ResearchPage ticker="AAPL" />
        </div>
    }
}

#[component]
fn ResearchPage(#[prop(into)] ticker: String) -> impl IntoView {
    let chart_data = RwSignal::new(Arc::new(sample::stock_series()));
    let loading = RwSignal::new(false);
    let loaded = RwSignal::new(LoadedRanges::default());
    let visible = RwSignal::new(initial_window());
    let hovered = RwSignal::new(None::<DataPoint>);

    // Weekend bands follow the visible window
    let config = Signal::derive(move || price_chart_config(visible.get()));

    let on_data_needed = move |needed: DataNeeded| {
        let direction = needed.direction;
        if loading.get_untracked() || loaded.get_untracked().is_loaded(direction) {
            return;
        }
        tracing::info!(%direction, extent = ?needed.extent, "fetching history");
        loading.set(true);

        Timeout::new(FETCH_DELAY_MS, move || {
            let current = chart_data.get_untracked();
            let anchor = match direction {
                Direction::Before => current.first(),
                Direction::After => current.last(),
            }
            .map_or(100.0, |p| p.y);

            let fetched = sample::generate_trading_days(
                direction,
                needed.extent,
                FETCH_DAYS,
                anchor,
                &mut rand::thread_rng(),
            );
            chart_data.set(Arc::new(merge_history(&current, fetched, direction, needed.extent)));
            loading.set(false);
            loaded.update(|l| l.mark(direction));
        })
        .forget();
    };

    let readout = move || {
        hovered.get().map(|point| {
            let date = match point.x.as_instant() {
                Some(t) => t.format("%b %-d, %Y").to_string(),
                None => point.x.to_string(),
            };
            format!("{date}: ${:.2}", point.y)
        })
    };

    view! {
        <div class="research-page">
            <header class="research-header">
                <h1 class="ticker">{ticker}</h1>
                <span class="hover-readout">{readout}</span>
            </header>

            <section class="panel chart-container">
                <div class="panel-header">
                    <span class="panel-title">"Price"</span>
                    <Show when=move || loading.get()>
                        <span class="panel-status">"Loading history..."</span>
                    </Show>
                </div>
                <div class="panel-content">
                    <LineChart
                        data=chart_data
                        config=config
                        loading=loading
                        on_hover=Callback::new(move |point: Option<DataPoint>| hovered.set(point))
                        on_pan=Callback::new(move |window: TimeWindow| visible.set(window))
                        on_data_needed=Callback::new(on_data_needed)
                        on_error=Callback::new(move |err: ChartError| tracing::warn!(error = %err, "price chart error"))
                    />
                </div>
            </section>

            <SampleGallery />
        </div>
    }
}

/// The other sample datasets, one small chart each
#[component]
fn SampleGallery() -> impl IntoView {
    let small = || DimensionConfig::fixed(360.0, 240.0);

    let linear = ChartConfig::default()
        .dimensions(small())
        .axis(AxisConfig::new(XAxisKind::Continuous, YAxisKind::Linear).labels("Step", "Value"));
    let categorical = ChartConfig::default()
        .dimensions(small())
        .axis(AxisConfig::new(XAxisKind::Categorical, YAxisKind::Linear).labels("Month", "Index"))
        .interaction(InteractionConfig {
            show_dots: true,
            ..InteractionConfig::default()
        });
    let revenue = ChartConfig::default()
        .dimensions(small())
        .axis(
            AxisConfig::new(XAxisKind::Continuous, YAxisKind::Linear)
                .labels("Year", "Revenue ($M)")
                .format_x(|year: &AxisValue| year.to_string())
                .format_y(CompactNumberFormatter)
                .tooltip_format_y(sample::revenue_label),
        );

    let charts = [
        ("Linear", sample::linear_series(), linear),
        ("Seasonal", sample::categorical_series(), categorical),
        ("Revenue", sample::revenue_series(), revenue),
    ];

    view! {
        <section class="sample-gallery">
            {charts
                .into_iter()
                .map(|(title, data, config)| {
                    view! {
                        <div class="panel">
                            <div class="panel-header">
                                <span class="panel-title">{title}</span>
                            </div>
                            <div class="panel-content">
                                <LineChart
                                    data=Signal::stored(Arc::new(data))
                                    config=Signal::stored(config)
                                />
                            </div>
                        </div>
                    }
                })
                .collect_view()}
        </section>
    }
}
