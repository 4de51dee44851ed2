//! Draw pipeline
//!
//! Renders one complete [`Scene`] from ready scales and configuration. Every
//! pass starts from an empty scene, so drawing twice with the same inputs
//! yields the same scene.
//!
//! Layer order inside the plot group is fixed: grid, highlights, x axis,
//! y axis, axis titles, then the data layer (line, dots, hover targets).

use research_core::{AxisValue, DataPoint, format_tick, format_time_tick};

use crate::{
    ChartDimensions,
    chartkit::{DEFAULT_TICK_COUNT, PathBuilder, ease_cubic_in_out, ease_linear, line_path, polyline_length},
    config::{AxisConfig, ChartConfig},
    highlight::process_highlights,
    scales::{XScale, XTick, YScale},
    scene::{ClipRegion, Dash, Scene, SceneNode},
};

/// Length of each dot's entrance, after its staggered delay
pub const DOT_ENTRANCE_MS: f64 = 200.0;

/// Radius of the invisible hover targets
pub const HOVER_RADIUS: f64 = 8.0;

pub const GRID_OPACITY: f64 = 0.3;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;

/// Progress of the line draw-in and the dot cascade
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reveal {
    pub elapsed_ms: f64,
    pub duration_ms: f64,
}

impl Reveal {
    /// Time until the last dot has finished growing
    pub fn total_ms(duration_ms: f64, show_dots: bool) -> f64 {
        if show_dots {
            duration_ms + DOT_ENTRANCE_MS
        } else {
            duration_ms
        }
    }

    fn line_progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ease_linear(self.elapsed_ms / self.duration_ms)
    }

    fn dot_progress(&self, index: usize, count: usize) -> f64 {
        let delay = index as f64 / count.max(1) as f64 * self.duration_ms;
        ease_cubic_in_out((self.elapsed_ms - delay) / DOT_ENTRANCE_MS)
    }
}

/// Everything one draw pass reads
pub struct DrawContext<'a> {
    pub data: &'a [DataPoint],
    pub x: &'a XScale,
    pub y: &'a YScale,
    pub dims: ChartDimensions,
    pub config: &'a ChartConfig,
    /// Unique per chart instance and plot size
    pub clip_id: &'a str,
    /// `None` once the initial reveal has completed
    pub reveal: Option<Reveal>,
}

/// Pixel position of a point inside the plot, if its x can be projected
pub fn project_point(point: &DataPoint, x: &XScale, y: &YScale) -> Option<(f64, f64)> {
    let px = x.point_x(&point.x)?;
    let py = y.scale(point.y);
    (px.is_finite() && py.is_finite()).then_some((px, py))
}

/// Clip id for a chart instance at a given plot size
pub fn clip_id(instance: u64, dims: &ChartDimensions) -> String {
    format!("clip-{}-{}-{}", instance, dims.inner_width().round(), dims.inner_height().round())
}

/// Run every stage and return the finished scene
pub fn draw(ctx: &DrawContext<'_>) -> Scene {
    let mut scene = Scene::new(ctx.dims.width, ctx.dims.height);

    let layers = vec![
        draw_grid(ctx),
        draw_highlights(ctx),
        draw_x_axis(ctx),
        draw_y_axis(ctx),
        draw_axis_labels(ctx),
        draw_data_layer(ctx),
    ];

    scene.push(SceneNode::translated(
        "plot",
        (ctx.dims.margin.left, ctx.dims.margin.top),
        layers,
    ));

    tracing::trace!(elements = scene.element_count(), "scene drawn");
    scene
}

// ============================================================================
// GRID & HIGHLIGHTS
// ============================================================================

fn draw_grid(ctx: &DrawContext<'_>) -> SceneNode {
    let (w, h) = (ctx.dims.inner_width(), ctx.dims.inner_height());
    let grid = &ctx.config.grid;
    let stroke = &ctx.config.style.grid_color;
    let mut lines = Vec::new();

    if grid.show_x_grid {
        for tick in ctx.y.ticks(DEFAULT_TICK_COUNT) {
            let y = ctx.y.scale(tick);
            lines.push(SceneNode::Line {
                class: "grid-x",
                from: (0.0, y),
                to: (w, y),
                stroke: stroke.clone(),
                opacity: GRID_OPACITY,
            });
        }
    }

    if grid.show_y_grid && !matches!(ctx.x, XScale::Band(_)) {
        for tick in ctx.x.ticks(DEFAULT_TICK_COUNT) {
            lines.push(SceneNode::Line {
                class: "grid-y",
                from: (tick.offset, 0.0),
                to: (tick.offset, h),
                stroke: stroke.clone(),
                opacity: GRID_OPACITY,
            });
        }
    }

    SceneNode::group("grid", lines)
}

fn draw_highlights(ctx: &DrawContext<'_>) -> SceneNode {
    let (w, h) = (ctx.dims.inner_width(), ctx.dims.inner_height());
    let style = &ctx.config.style;

    let vertical = process_highlights(
        Some(ctx.x),
        &ctx.config.x_highlights,
        w,
        &style.highlight_color,
        style.highlight_opacity,
    )
    .into_iter()
    .map(|band| SceneNode::Rect {
        class: "x-highlight",
        x: band.offset,
        y: 0.0,
        width: band.length,
        height: h,
        fill: band.color,
        opacity: band.opacity,
    });

    let horizontal = process_highlights(
        Some(ctx.y),
        &ctx.config.y_highlights,
        h,
        &style.highlight_color,
        style.highlight_opacity,
    )
    .into_iter()
    .map(|band| SceneNode::Rect {
        class: "y-highlight",
        x: 0.0,
        y: band.offset,
        width: w,
        height: band.length,
        fill: band.color,
        opacity: band.opacity,
    });

    SceneNode::clipped(
        "highlights",
        ClipRegion {
            id: format!("{}-highlights", ctx.clip_id),
            width: w,
            height: h,
        },
        vertical.chain(horizontal).collect(),
    )
}

// ============================================================================
// AXES
// ============================================================================

fn x_tick_label(axis: &AxisConfig, tick: &XTick, step: f64) -> String {
    if let Some(formatter) = &axis.format_x {
        return formatter.format(&tick.value);
    }
    match &tick.value {
        AxisValue::Time(t) => format_time_tick(*t),
        AxisValue::Number(n) => format_tick(*n, step),
        other => other.to_string(),
    }
}

fn y_tick_label(axis: &AxisConfig, y: &YScale, value: f64, step: f64) -> String {
    match &axis.format_y {
        Some(formatter) => formatter.format(value),
        None if y.is_log() => value.to_string(),
        None => format_tick(value, step),
    }
}

fn draw_x_axis(ctx: &DrawContext<'_>) -> SceneNode {
    let (w, h) = (ctx.dims.inner_width(), ctx.dims.inner_height());
    let color = &ctx.config.style.text_color;
    // categorical axes have no outer ticks
    let outer = if matches!(ctx.x, XScale::Band(_)) { 0.0 } else { TICK_SIZE };
    let step = ctx.x.tick_step(DEFAULT_TICK_COUNT);

    let mut children = vec![SceneNode::Path {
        class: "domain",
        d: PathBuilder::new()
            .move_to(0.0, outer)
            .vertical_to(0.0)
            .horizontal_to(w)
            .vertical_to(outer)
            .build(),
        stroke: color.clone(),
        stroke_width: 1.0,
        dash: None,
    }];

    for tick in ctx.x.ticks(DEFAULT_TICK_COUNT) {
        children.push(SceneNode::Line {
            class: "tick",
            from: (tick.offset, 0.0),
            to: (tick.offset, TICK_SIZE),
            stroke: color.clone(),
            opacity: 1.0,
        });
        children.push(SceneNode::Text {
            class: "tick-label",
            x: tick.offset,
            y: TICK_SIZE + TICK_PADDING,
            dy: Some("0.71em"),
            anchor: "middle",
            rotate: None,
            fill: color.clone(),
            text: x_tick_label(&ctx.config.axis, &tick, step),
        });
    }

    SceneNode::translated("x-axis", (0.0, h), children)
}

fn draw_y_axis(ctx: &DrawContext<'_>) -> SceneNode {
    let h = ctx.dims.inner_height();
    let color = &ctx.config.style.text_color;
    let step = ctx.y.tick_step(DEFAULT_TICK_COUNT);

    let mut children = vec![SceneNode::Path {
        class: "domain",
        d: PathBuilder::new()
            .move_to(-TICK_SIZE, h)
            .horizontal_to(0.0)
            .vertical_to(0.0)
            .horizontal_to(-TICK_SIZE)
            .build(),
        stroke: color.clone(),
        stroke_width: 1.0,
        dash: None,
    }];

    for value in ctx.y.ticks(DEFAULT_TICK_COUNT) {
        let y = ctx.y.scale(value);
        children.push(SceneNode::Line {
            class: "tick",
            from: (-TICK_SIZE, y),
            to: (0.0, y),
            stroke: color.clone(),
            opacity: 1.0,
        });
        children.push(SceneNode::Text {
            class: "tick-label",
            x: -(TICK_SIZE + TICK_PADDING),
            y,
            dy: Some("0.32em"),
            anchor: "end",
            rotate: None,
            fill: color.clone(),
            text: y_tick_label(&ctx.config.axis, ctx.y, value, step),
        });
    }

    SceneNode::group("y-axis", children)
}

fn draw_axis_labels(ctx: &DrawContext<'_>) -> SceneNode {
    let (w, h) = (ctx.dims.inner_width(), ctx.dims.inner_height());
    let margin = ctx.dims.margin;
    let axis = &ctx.config.axis;
    let color = &ctx.config.style.text_color;
    let mut labels = Vec::new();

    if let Some(text) = &axis.x_label {
        labels.push(SceneNode::Text {
            class: "x-label",
            x: w / 2.0,
            y: h + margin.bottom - 10.0,
            dy: None,
            anchor: "middle",
            rotate: None,
            fill: color.clone(),
            text: text.clone(),
        });
    }

    if let Some(text) = &axis.y_label {
        labels.push(SceneNode::Text {
            class: "y-label",
            x: -h / 2.0,
            y: -margin.left + 20.0,
            dy: None,
            anchor: "middle",
            rotate: Some(-90.0),
            fill: color.clone(),
            text: text.clone(),
        });
    }

    SceneNode::group("axis-labels", labels)
}

// ============================================================================
// DATA LAYER
// ============================================================================

fn draw_data_layer(ctx: &DrawContext<'_>) -> SceneNode {
    let style = &ctx.config.style;
    let interaction = &ctx.config.interaction;

    let projected: Vec<(usize, (f64, f64))> = ctx
        .data
        .iter()
        .enumerate()
        .filter_map(|(i, p)| Some((i, project_point(p, ctx.x, ctx.y)?)))
        .collect();
    let vertices: Vec<(f64, f64)> = projected.iter().map(|(_, xy)| *xy).collect();

    let dash = ctx.reveal.map(|reveal| {
        let length = polyline_length(&vertices);
        Dash {
            length,
            offset: length * (1.0 - reveal.line_progress()),
        }
    });

    let mut children = vec![SceneNode::Path {
        class: "line-path",
        d: line_path(&vertices),
        stroke: style.line_color.clone(),
        stroke_width: style.line_width,
        dash,
    }];

    if interaction.show_dots {
        let count = ctx.data.len();
        let dots = projected
            .iter()
            .map(|&(i, (cx, cy))| SceneNode::Circle {
                class: "dot",
                cx,
                cy,
                r: match ctx.reveal {
                    Some(reveal) => style.dot_radius * reveal.dot_progress(i, count),
                    None => style.dot_radius,
                },
                fill: style.dot_color.clone(),
                hit: Some(i),
            })
            .collect();
        children.push(SceneNode::group("dots", dots));
    } else if interaction.show_tooltip {
        let targets = projected
            .iter()
            .map(|&(i, (cx, cy))| SceneNode::Circle {
                class: "hover-area",
                cx,
                cy,
                r: HOVER_RADIUS,
                fill: "transparent".to_string(),
                hit: Some(i),
            })
            .collect();
        children.push(SceneNode::group("hover-areas", targets));
    }

    if ctx.config.panning_active() {
        SceneNode::clipped(
            "data",
            ClipRegion {
                id: format!("{}-data", ctx.clip_id),
                width: ctx.dims.inner_width(),
                height: ctx.dims.inner_height(),
            },
            children,
        )
    } else {
        SceneNode::group("data", children)
    }
}
