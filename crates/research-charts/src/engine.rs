//! Line chart engine
//!
//! Owns every piece of per-chart state and changes it only through named
//! transitions (`set_data`, `set_size`, `pointer_down`, `on_animation_frame`
//! ...). Each transition that affects the drawing ends in [`LineChartEngine::refresh`],
//! the single recompute-and-redraw entry point. Outward notifications are
//! queued and drained with [`LineChartEngine::take_events`], so callers never
//! run user callbacks while the engine is borrowed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use research_core::{
    ChartError, DataPoint, ErrorKind, parse_series, time_extent, validate_for_axis,
};
use serde_json::Value;

use crate::{
    ChartDimensions,
    config::ChartConfig,
    draw::{DrawContext, Reveal, clip_id, draw, project_point},
    interpolator::{AnimatedDomain, FrameLoop, FrameScheduler},
    pan::{DataNeeded, PanController, TimeWindow},
    scales::{ChartScales, ScaleOptions, build_scales, build_x_scale, check_log_domain, target_y_domain},
    scene::Scene,
    tooltip::{PlotBounds, TooltipPlacement, TooltipSize, TooltipText, place, tooltip_text},
};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

// ============================================================================
// OUTPUTS
// ============================================================================

/// Notification for the host, drained with [`LineChartEngine::take_events`]
#[derive(Debug, Clone, PartialEq)]
pub enum ChartEvent {
    /// Pointer entered a point (`Some`) or left it (`None`)
    Hover(Option<DataPoint>),
    /// A drag finished on this window
    Pan(TimeWindow),
    DataNeeded(DataNeeded),
    /// Validation or domain failure, once per distinct failure
    Error(ChartError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Loading,
    InvalidData,
    Error,
}

impl PlaceholderKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Loading => "Loading chart",
            Self::InvalidData => "Invalid chart data",
            Self::Error => "Chart error",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Loading => "chart-placeholder loading",
            Self::InvalidData => "chart-placeholder invalid",
            Self::Error => "chart-placeholder error",
        }
    }
}

/// What the host should display
#[derive(Debug, Clone, PartialEq)]
pub enum RenderFrame {
    Placeholder {
        kind: PlaceholderKind,
        message: String,
        width: f64,
        height: f64,
    },
    Chart {
        /// Inner SVG markup, empty while either scale is missing
        markup: String,
        width: f64,
        height: f64,
    },
}

/// The hovered point
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipState {
    pub index: usize,
    pub point: DataPoint,
}

/// Everything needed to show the tooltip box
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    pub placement: TooltipPlacement,
    pub text: TooltipText,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct LineChartEngine {
    instance: u64,
    config: ChartConfig,
    data: Arc<Vec<DataPoint>>,
    /// Parse failure of the last untyped dataset
    input_error: Option<ChartError>,
    external_error: Option<String>,
    loading: bool,
    container: Option<(f64, f64)>,
    dims: ChartDimensions,

    scales: ChartScales,
    failure: Option<ChartError>,
    reported_failure: Option<ChartError>,
    y_domain: AnimatedDomain,
    data_changed: bool,

    pan: PanController,
    pan_domain: Option<TimeWindow>,

    has_revealed: bool,
    reveal_started_at: Option<f64>,

    tooltip: Option<TooltipState>,
    scene: Option<Scene>,
    frames: FrameLoop,
    events: Vec<ChartEvent>,
    revision: u64,
    torn_down: bool,
}

impl LineChartEngine {
    pub fn new(config: ChartConfig, scheduler: Box<dyn FrameScheduler>) -> Self {
        let mut y_domain = AnimatedDomain::new(config.animation.duration_ms);
        y_domain.set_enabled(config.animation.animate);
        let dims = config.dimensions.resolve(None);
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        tracing::info!(instance, "line chart created");

        Self {
            instance,
            has_revealed: !config.animation.animate,
            config,
            data: Arc::new(Vec::new()),
            input_error: None,
            external_error: None,
            loading: false,
            container: None,
            dims,
            scales: ChartScales::default(),
            failure: None,
            reported_failure: None,
            y_domain,
            data_changed: false,
            pan: PanController::new(),
            pan_domain: None,
            reveal_started_at: None,
            tooltip: None,
            scene: None,
            frames: FrameLoop::new(scheduler),
            events: Vec::new(),
            revision: 0,
            torn_down: false,
        }
    }

    // ------------------------------------------------------------------------
    // accessors
    // ------------------------------------------------------------------------

    pub fn instance(&self) -> u64 {
        self.instance
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn data(&self) -> &Arc<Vec<DataPoint>> {
        &self.data
    }

    pub fn dimensions(&self) -> ChartDimensions {
        self.dims
    }

    pub fn scales(&self) -> &ChartScales {
        &self.scales
    }

    /// Current (possibly mid-transition) y domain
    pub fn y_domain(&self) -> Option<(f64, f64)> {
        self.y_domain.current()
    }

    /// Visible x window on a time axis
    pub fn x_window(&self) -> Option<TimeWindow> {
        self.scales.x.as_ref()?.time_domain().map(TimeWindow::from_pair)
    }

    pub fn tooltip(&self) -> Option<&TooltipState> {
        self.tooltip.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_dragging()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal_started_at.is_some()
    }

    /// Bumped on every visible change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn take_events(&mut self) -> Vec<ChartEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------------
    // input transitions
    // ------------------------------------------------------------------------

    /// Replace the dataset. Only a new reference counts as a change.
    pub fn set_data(&mut self, data: Arc<Vec<DataPoint>>, now: f64) {
        if Arc::ptr_eq(&self.data, &data) && self.input_error.is_none() {
            return;
        }
        tracing::debug!(points = data.len(), "data replaced");
        self.data = data;
        self.input_error = None;
        self.on_new_data();
        self.refresh(now);
    }

    /// Replace the dataset from untyped JSON, validating its shape
    pub fn set_data_json(&mut self, value: &Value, now: f64) {
        match parse_series(value) {
            Ok(points) => self.set_data(Arc::new(points), now),
            Err(err) => {
                self.data = Arc::new(Vec::new());
                self.input_error = Some(err);
                self.on_new_data();
                self.refresh(now);
            }
        }
    }

    pub fn set_config(&mut self, config: ChartConfig, now: f64) {
        let old = &self.config.axis;
        if old.x_kind != config.axis.x_kind || old.x_domain != config.axis.x_domain {
            self.pan_domain = None;
        }
        if !config.panning_active() {
            self.pan.cancel();
        }
        if !config.animation.animate {
            self.finish_reveal();
        }
        self.y_domain.set_duration(config.animation.duration_ms);
        self.y_domain.set_enabled(config.animation.animate);
        self.config = config;
        self.refresh(now);
    }

    /// Observed container size
    pub fn set_size(&mut self, width: f64, height: f64, now: f64) {
        if self.container == Some((width, height)) {
            return;
        }
        self.container = Some((width, height));
        self.refresh(now);
    }

    pub fn set_loading(&mut self, loading: bool, now: f64) {
        if self.loading != loading {
            self.loading = loading;
            self.refresh(now);
        }
    }

    /// Caller-supplied error; takes precedence over everything else
    pub fn set_error(&mut self, error: Option<String>, now: f64) {
        if self.external_error != error {
            self.external_error = error;
            self.refresh(now);
        }
    }

    // ------------------------------------------------------------------------
    // pointer transitions (container-relative pixels)
    // ------------------------------------------------------------------------

    /// Returns true when a drag started; the host should then listen for
    /// moves and releases at document level.
    pub fn pointer_down(&mut self, x: f64, y: f64, now: f64) -> bool {
        if self.torn_down || !self.config.panning_active() || !self.dims.contains_inner(x, y) {
            return false;
        }
        let Some(window) = self.x_window() else {
            return false;
        };
        if !self.pan.begin(x, window) {
            return false;
        }
        self.clear_tooltip();
        self.refresh(now);
        true
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now: f64) {
        if self.torn_down {
            return;
        }
        if self.pan.is_dragging() {
            if let Some(window) = self.pan.drag(x, self.dims.inner_width()) {
                self.pan_domain = Some(window);
                self.refresh(now);
            }
        } else {
            self.hover(x, y);
        }
    }

    pub fn pointer_up(&mut self, now: f64) {
        let Some(outcome) = self.pan.end() else {
            return;
        };
        self.pan_domain = Some(outcome.domain);
        self.events.push(ChartEvent::Pan(outcome.domain));
        for needed in outcome.data_needed {
            tracing::info!(
                direction = %needed.direction,
                domain = ?needed.domain,
                extent = ?needed.extent,
                "data needed"
            );
            self.events.push(ChartEvent::DataNeeded(needed));
        }
        self.refresh(now);
    }

    pub fn pointer_leave(&mut self) {
        if !self.pan.is_dragging() {
            self.clear_tooltip();
        }
    }

    /// Hit-test the current scene and update the hovered point
    pub fn hover(&mut self, x: f64, y: f64) {
        let hit = self.scene.as_ref().and_then(|s| s.hit_test(x, y));
        if hit == self.tooltip.as_ref().map(|t| t.index) {
            return;
        }

        match hit.and_then(|i| Some((i, self.data.get(i)?.clone()))) {
            Some((index, point)) => {
                self.events.push(ChartEvent::Hover(Some(point.clone())));
                self.tooltip = Some(TooltipState { index, point });
                self.revision += 1;
            }
            None => self.clear_tooltip(),
        }
    }

    // ------------------------------------------------------------------------
    // frames and lifecycle
    // ------------------------------------------------------------------------

    pub fn on_animation_frame(&mut self, now: f64) {
        self.frames.delivered();
        if self.torn_down {
            return;
        }
        self.y_domain.tick(now);
        self.refresh(now);
    }

    /// Cancel the pending frame and drop interaction state. Further
    /// transitions are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::info!(instance = self.instance, "line chart torn down");
        self.torn_down = true;
        self.frames.cancel();
        self.pan.cancel();
        self.tooltip = None;
    }

    // ------------------------------------------------------------------------
    // recompute
    // ------------------------------------------------------------------------

    /// Rebuild scales and scene from the current inputs
    pub fn refresh(&mut self, now: f64) {
        if self.torn_down {
            return;
        }

        self.dims = self.config.dimensions.resolve(self.container);
        let data_changed = std::mem::take(&mut self.data_changed);

        self.pan.sync_extent(match self.config.axis.x_kind.is_temporal() {
            true => time_extent(&self.data).map(TimeWindow::from_pair),
            false => None,
        });

        let failure = match self.input_error.clone() {
            Some(err) => Some(err),
            None => validate_for_axis(&self.data, self.config.axis.x_kind).err(),
        };
        let failure = match failure {
            Some(err) => Err(err),
            None => self.rebuild_scales(now, data_changed),
        };

        let failure = match failure {
            Ok(scales) => {
                self.scales = scales;
                None
            }
            Err(err) => {
                self.scales = ChartScales::default();
                self.y_domain.clear();
                Some(err)
            }
        };
        // a placeholder with higher precedence hides the failure for now
        if self.loading || self.external_error.is_some() {
            self.failure = failure;
        } else {
            self.report_failure(failure);
        }

        let reveal = self.advance_reveal(now);
        self.scene = self.scales.ready().map(|(x, y)| {
            let clip = clip_id(self.instance, &self.dims);
            draw(&DrawContext {
                data: &self.data,
                x,
                y,
                dims: self.dims,
                config: &self.config,
                clip_id: &clip,
                reveal,
            })
        });

        if self.y_domain.is_animating() || self.reveal_started_at.is_some() {
            self.frames.schedule();
        } else {
            self.frames.cancel();
        }
        self.revision += 1;
    }

    fn rebuild_scales(&mut self, now: f64, data_changed: bool) -> Result<ChartScales, ChartError> {
        let axis = &self.config.axis;
        let mut options = ScaleOptions::new(axis.x_kind, axis.y_kind);
        options.x_domain = match self.pan_domain {
            Some(window) if axis.x_kind.is_temporal() => Some(window.to_domain()),
            _ => axis.x_domain.clone(),
        };
        options.y_domain = axis.y_domain;

        let (w, h) = (self.dims.inner_width(), self.dims.inner_height());
        let visible_x = build_x_scale(&self.data, w, options.x_kind, options.x_domain.as_ref())
            .and_then(|x| x.numeric_domain());

        let target = target_y_domain(&self.data, visible_x, &options, axis.fit_y_to_visible);
        if let (Some((lo, hi)), true) = (target, axis.y_kind == research_core::YAxisKind::Logarithmic) {
            check_log_domain(lo, hi)?;
        }

        let snap = self.pan.is_dragging()
            || !self.config.animation.animate
            || (data_changed && !self.config.animation.animate_on_data_change);
        match target {
            Some(domain) if snap => self.y_domain.snap_to(domain),
            other => {
                self.y_domain.set_target(other, now);
            }
        }

        options.y_domain = self.y_domain.current();
        build_scales(&self.data, w, h, &options)
    }

    fn report_failure(&mut self, failure: Option<ChartError>) {
        if failure == self.reported_failure {
            self.failure = failure;
            return;
        }
        if let Some(err) = &failure {
            tracing::warn!(error = %err, kind = ?err.kind(), "chart input rejected");
            self.events.push(ChartEvent::Error(err.clone()));
        }
        self.reported_failure = failure.clone();
        self.failure = failure;
    }

    fn advance_reveal(&mut self, now: f64) -> Option<Reveal> {
        if self.has_revealed || self.scales.ready().is_none() {
            return None;
        }
        let duration_ms = self.config.animation.draw_duration_ms;
        let started = *self.reveal_started_at.get_or_insert(now);
        let elapsed = now - started;
        if elapsed >= Reveal::total_ms(duration_ms, self.config.interaction.show_dots) {
            self.finish_reveal();
            return None;
        }
        Some(Reveal {
            elapsed_ms: elapsed,
            duration_ms,
        })
    }

    fn finish_reveal(&mut self) {
        self.has_revealed = true;
        self.reveal_started_at = None;
    }

    fn on_new_data(&mut self) {
        self.data_changed = true;
        self.clear_tooltip();
        if self.config.animation.animate && self.config.animation.animate_on_data_change {
            self.has_revealed = false;
            self.reveal_started_at = None;
        }
    }

    fn clear_tooltip(&mut self) {
        if self.tooltip.take().is_some() {
            self.events.push(ChartEvent::Hover(None));
            self.revision += 1;
        }
    }

    // ------------------------------------------------------------------------
    // presentation
    // ------------------------------------------------------------------------

    /// Container-relative pixel position of a data point
    pub fn point_position(&self, index: usize) -> Option<(f64, f64)> {
        let (x, y) = self.scales.ready()?;
        let (px, py) = project_point(self.data.get(index)?, x, y)?;
        Some((px + self.dims.margin.left, py + self.dims.margin.top))
    }

    fn placeholder(&self) -> Option<(PlaceholderKind, String)> {
        if let Some(message) = &self.external_error {
            return Some((PlaceholderKind::Error, message.clone()));
        }
        if self.loading {
            return Some((PlaceholderKind::Loading, "Fetching chart data".to_string()));
        }
        self.failure.as_ref().map(|err| match err.kind() {
            ErrorKind::InputValidation => (PlaceholderKind::InvalidData, err.to_string()),
            _ => (PlaceholderKind::Error, err.to_string()),
        })
    }

    pub fn render(&self) -> RenderFrame {
        let (width, height) = (self.dims.width, self.dims.height);
        match self.placeholder() {
            Some((kind, message)) => RenderFrame::Placeholder {
                kind,
                message,
                width,
                height,
            },
            None => RenderFrame::Chart {
                markup: self.scene.as_ref().map(Scene::to_svg).unwrap_or_default(),
                width,
                height,
            },
        }
    }

    /// Tooltip placement for the hovered point, given the tooltip box's
    /// last measured size
    pub fn tooltip_view(&self, measured: Option<(f64, f64)>) -> Option<TooltipView> {
        if !self.config.interaction.show_tooltip || self.placeholder().is_some() {
            return None;
        }
        let state = self.tooltip.as_ref()?;
        let position = self.point_position(state.index)?;
        let tooltip = &self.config.tooltip;

        Some(TooltipView {
            placement: place(
                position,
                TooltipSize::measured_or_fallback(measured, tooltip),
                PlotBounds::from_dimensions(&self.dims),
                tooltip.padding,
                tooltip.arrow_size,
            ),
            text: tooltip_text(&state.point, &self.config.axis),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnimationConfig, AxisConfig, DimensionConfig, InteractionConfig};
    use crate::interpolator::ManualScheduler;
    use research_core::{Direction, XAxisKind, YAxisKind};
    use serde_json::json;

    fn daily(days: std::ops::Range<u32>, base: f64) -> Arc<Vec<DataPoint>> {
        Arc::new(
            days.map(|d| DataPoint::new(format!("2024-01-{:02}", d), base + d as f64))
                .collect(),
        )
    }

    fn config() -> ChartConfig {
        ChartConfig::default()
            .dimensions(DimensionConfig::fixed(800.0, 400.0))
            .axis(AxisConfig::new(XAxisKind::Temporal, YAxisKind::Linear))
    }

    fn panning() -> ChartConfig {
        config().interaction(InteractionConfig {
            enable_panning: true,
            ..InteractionConfig::default()
        })
    }

    fn engine(config: ChartConfig) -> (LineChartEngine, ManualScheduler) {
        // fixed dimensions resolve to 800x400 without a container
        let scheduler = ManualScheduler::new();
        let engine = LineChartEngine::new(config, Box::new(scheduler.clone()));
        (engine, scheduler)
    }

    fn markup(engine: &LineChartEngine) -> String {
        match engine.render() {
            RenderFrame::Chart { markup, .. } => markup,
            other => panic!("expected chart, got {other:?}"),
        }
    }

    #[test]
    fn test_first_render_snaps_y_and_reveals_line() {
        let (mut engine, scheduler) = engine(config());
        engine.set_data(daily(1..11, 100.0), 0.0);

        assert!(!engine.y_domain.is_animating());
        assert!(engine.is_revealing());
        assert!(scheduler.frames().pending);
        assert!(markup(&engine).contains("stroke-dasharray"));

        engine.on_animation_frame(500.0);
        assert!(engine.is_revealing());

        engine.on_animation_frame(1000.0);
        assert!(!engine.is_revealing());
        assert!(!scheduler.frames().pending);
        assert!(!markup(&engine).contains("stroke-dasharray"));
    }

    #[test]
    fn test_hover_does_not_replay_reveal() {
        let (mut engine, scheduler) = engine(config());
        engine.set_data(daily(1..11, 100.0), 0.0);
        engine.on_animation_frame(1000.0);
        let requested = scheduler.frames().requested;

        let (x, y) = engine.point_position(3).unwrap();
        engine.pointer_move(x + 1.0, y, 1100.0);
        assert_eq!(engine.tooltip().map(|t| t.index), Some(3));
        assert_eq!(
            engine.take_events(),
            vec![ChartEvent::Hover(Some(engine.data()[3].clone()))]
        );

        assert!(!markup(&engine).contains("stroke-dasharray"));
        assert_eq!(scheduler.frames().requested, requested);

        let view = engine.tooltip_view(None).unwrap();
        assert_eq!(view.text.title, "Jan 4, 2024");

        engine.pointer_leave();
        assert_eq!(engine.take_events(), vec![ChartEvent::Hover(None)]);
        assert!(engine.tooltip_view(None).is_none());
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (mut engine, _) = engine(config().animation(AnimationConfig::disabled()));
        engine.set_data(daily(1..11, 100.0), 0.0);
        engine.set_size(800.0, 400.0, 0.0);
        let first = markup(&engine);
        let count = engine.scene().map(Scene::element_count);
        engine.refresh(0.0);
        assert_eq!(markup(&engine), first);
        assert_eq!(engine.scene().map(Scene::element_count), count);
    }

    #[test]
    fn test_resize_rescales_and_redraws() {
        // full container width, fixed 400px height
        let responsive = ChartConfig::default()
            .axis(AxisConfig::new(XAxisKind::Temporal, YAxisKind::Linear))
            .animation(AnimationConfig::disabled());
        let (mut engine, _) = engine(responsive);
        engine.set_data(daily(1..11, 100.0), 0.0);
        assert_eq!(engine.dimensions().width, 800.0);
        assert_eq!(engine.point_position(9).map(|p| p.0), Some(780.0));

        engine.set_size(1000.0, 500.0, 10.0);
        let dims = engine.dimensions();
        assert_eq!((dims.width, dims.height), (1000.0, 400.0));
        assert_eq!(dims.inner_width(), 920.0);
        assert_eq!(engine.point_position(0).map(|p| p.0), Some(60.0));
        assert_eq!(engine.point_position(9).map(|p| p.0), Some(980.0));
        assert!(matches!(engine.render(), RenderFrame::Chart { width, .. } if width == 1000.0));

        let revision = engine.revision();
        engine.set_size(1000.0, 500.0, 20.0);
        assert_eq!(engine.revision(), revision);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_validation_placeholder_and_single_error_event() {
        let (mut engine, _) = engine(config());
        engine.set_data_json(&json!([{ "x": 1 }]), 0.0);

        match engine.render() {
            RenderFrame::Placeholder { kind, message, .. } => {
                assert_eq!(kind, PlaceholderKind::InvalidData);
                assert_eq!(message, "Data point at index 0 is missing y value");
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
        assert!(engine.scales().x.is_none());
        assert_eq!(engine.take_events(), vec![ChartEvent::Error(ChartError::MissingY { index: 0 })]);

        engine.refresh(10.0);
        assert!(engine.take_events().is_empty());

        engine.set_data(Arc::new(Vec::new()), 20.0);
        assert_eq!(engine.take_events(), vec![ChartEvent::Error(ChartError::EmptyData)]);
    }

    #[test]
    fn test_nan_rejected_before_scales() {
        let (mut engine, _) = engine(config());
        engine.set_data(Arc::new(vec![DataPoint::new("2024-01-01", f64::NAN)]), 0.0);
        assert_eq!(engine.scales(), &ChartScales::default());
        assert!(matches!(
            engine.render(),
            RenderFrame::Placeholder { kind: PlaceholderKind::InvalidData, .. }
        ));
    }

    #[test]
    fn test_external_error_beats_loading() {
        let (mut engine, _) = engine(config());
        engine.set_data(daily(1..5, 10.0), 0.0);
        engine.set_loading(true, 0.0);
        engine.set_error(Some("feed offline".into()), 0.0);

        match engine.render() {
            RenderFrame::Placeholder { kind, message, width, height } => {
                assert_eq!(kind, PlaceholderKind::Error);
                assert_eq!(message, "feed offline");
                assert_eq!((width, height), (800.0, 400.0));
            }
            other => panic!("expected placeholder, got {other:?}"),
        }

        engine.set_error(None, 0.0);
        assert!(matches!(
            engine.render(),
            RenderFrame::Placeholder { kind: PlaceholderKind::Loading, .. }
        ));
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_empty_data_while_loading_reports_after_load() {
        let (mut engine, _) = engine(config());
        engine.set_loading(true, 0.0);
        engine.set_data(Arc::new(Vec::new()), 0.0);
        assert!(engine.take_events().is_empty());

        engine.set_loading(false, 10.0);
        assert_eq!(engine.take_events(), vec![ChartEvent::Error(ChartError::EmptyData)]);
    }

    #[test]
    fn test_y_domain_eases_toward_new_data() {
        let (mut engine, scheduler) = engine(config());
        engine.set_data(daily(1..11, 100.0), 0.0);
        engine.on_animation_frame(1000.0);
        let before = engine.y_domain().unwrap();

        engine.set_data(daily(1..11, 500.0), 2000.0);
        assert!(engine.y_domain.is_animating());
        assert_eq!(engine.y_domain(), Some(before));
        assert!(scheduler.frames().pending);

        engine.on_animation_frame(2200.0);
        let mid = engine.y_domain().unwrap();
        assert!(mid.1 > before.1 && mid.1 < 520.0);

        engine.on_animation_frame(3000.0);
        let (lo, hi) = engine.y_domain().unwrap();
        assert!(lo <= 501.0 && hi >= 510.0);
        assert!(!engine.y_domain.is_animating());
    }

    #[test]
    fn test_data_change_snaps_when_not_animating_on_change() {
        let config = config().animation(AnimationConfig {
            animate_on_data_change: false,
            ..AnimationConfig::default()
        });
        let (mut engine, _) = engine(config);
        engine.set_data(daily(1..11, 100.0), 0.0);
        engine.on_animation_frame(1000.0);

        engine.set_data(daily(1..11, 500.0), 2000.0);
        assert!(!engine.y_domain.is_animating());
        // the line is not drawn in again either
        assert!(!engine.is_revealing());
    }

    #[test]
    fn test_pan_fetch_once() {
        let (mut engine, _) = engine(panning());
        engine.set_data(daily(1..11, 100.0), 0.0);
        engine.on_animation_frame(1000.0);
        engine.take_events();

        let mut before_requests = 0;
        for round in 0..2 {
            let now = 2000.0 + round as f64 * 1000.0;
            assert!(engine.pointer_down(160.0, 100.0, now));
            engine.pointer_move(360.0, 100.0, now + 16.0);
            assert!(engine.is_panning());
            engine.pointer_up(now + 32.0);

            let events = engine.take_events();
            assert!(matches!(events[0], ChartEvent::Pan(_)));
            before_requests += events
                .iter()
                .filter(|e| matches!(e, ChartEvent::DataNeeded(d) if d.direction == Direction::Before))
                .count();
        }
        assert_eq!(before_requests, 1);

        // growing the data at the start re-arms the edge
        let mut grown = (*daily(1..11, 100.0)).clone();
        grown.insert(0, DataPoint::new("2023-12-31", 99.0));
        engine.set_data(Arc::new(grown), 5000.0);
        engine.pointer_down(160.0, 100.0, 5100.0);
        engine.pointer_move(660.0, 100.0, 5116.0);
        engine.pointer_up(5132.0);
        assert!(engine.take_events().iter().any(|e| matches!(e, ChartEvent::DataNeeded(_))));
    }

    #[test]
    fn test_pan_window_survives_data_change() {
        let (mut engine, _) = engine(panning());
        engine.set_data(daily(1..11, 100.0), 0.0);
        let original = engine.x_window().unwrap();

        engine.pointer_down(400.0, 100.0, 10.0);
        engine.pointer_move(472.0, 100.0, 20.0);
        engine.pointer_up(30.0);
        let panned = engine.x_window().unwrap();
        assert!(panned.start < original.start);
        assert_eq!(panned.span(), original.span());

        engine.set_data(daily(1..15, 100.0), 40.0);
        assert_eq!(engine.x_window(), Some(panned));
    }

    #[test]
    fn test_pointer_down_outside_plot_or_disabled() {
        let (mut engine, _) = engine(panning());
        engine.set_data(daily(1..11, 100.0), 0.0);
        assert!(!engine.pointer_down(10.0, 10.0, 0.0));

        let (mut engine, _) = self::engine(config());
        engine.set_data(daily(1..11, 100.0), 0.0);
        assert!(!engine.pointer_down(400.0, 100.0, 0.0));
    }

    #[test]
    fn test_log_axis_rejects_non_positive_once() {
        let config = config().axis(AxisConfig::new(XAxisKind::Temporal, YAxisKind::Logarithmic));
        let (mut engine, _) = engine(config);
        engine.set_data(
            Arc::new(vec![
                DataPoint::new("2024-01-01", 0.0),
                DataPoint::new("2024-01-02", 10.0),
            ]),
            0.0,
        );

        assert!(matches!(
            engine.render(),
            RenderFrame::Placeholder { kind: PlaceholderKind::Error, .. }
        ));
        let events = engine.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ChartEvent::Error(ChartError::NonPositiveLogDomain { .. })));
        engine.refresh(1.0);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_teardown_cancels_pending_frame() {
        let (mut engine, scheduler) = engine(config());
        engine.set_data(daily(1..11, 100.0), 0.0);
        assert!(scheduler.frames().pending);

        engine.teardown();
        assert!(!scheduler.frames().pending);
        assert_eq!(scheduler.frames().cancelled, scheduler.frames().requested);

        // late callbacks are inert
        engine.on_animation_frame(500.0);
        engine.pointer_move(400.0, 100.0, 500.0);
        assert!(!scheduler.frames().pending);
    }
}
