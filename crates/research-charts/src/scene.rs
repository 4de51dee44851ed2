//! Retained scene graph
//!
//! The draw pipeline builds a fresh [`Scene`] on every pass. A scene knows how
//! to serialize itself to SVG markup and how to hit-test hover targets, so the
//! browser only ever sees a string and pointer coordinates.

use std::fmt::Write;

/// Rectangular clip region in the local coordinates of its group
#[derive(Debug, Clone, PartialEq)]
pub struct ClipRegion {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl ClipRegion {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.width && y <= self.height
    }
}

/// Stroke dashing used by the line reveal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dash {
    pub length: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group {
        class: &'static str,
        translate: (f64, f64),
        clip: Option<ClipRegion>,
        children: Vec<SceneNode>,
    },
    Line {
        class: &'static str,
        from: (f64, f64),
        to: (f64, f64),
        stroke: String,
        opacity: f64,
    },
    Rect {
        class: &'static str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        opacity: f64,
    },
    Path {
        class: &'static str,
        d: String,
        stroke: String,
        stroke_width: f64,
        dash: Option<Dash>,
    },
    Circle {
        class: &'static str,
        cx: f64,
        cy: f64,
        r: f64,
        fill: String,
        /// Index of the data point this circle reports on hover
        hit: Option<usize>,
    },
    Text {
        class: &'static str,
        x: f64,
        y: f64,
        dy: Option<&'static str>,
        anchor: &'static str,
        rotate: Option<f64>,
        fill: String,
        text: String,
    },
}

impl SceneNode {
    pub fn group(class: &'static str, children: Vec<SceneNode>) -> Self {
        Self::Group {
            class,
            translate: (0.0, 0.0),
            clip: None,
            children,
        }
    }

    pub fn translated(class: &'static str, translate: (f64, f64), children: Vec<SceneNode>) -> Self {
        Self::Group {
            class,
            translate,
            clip: None,
            children,
        }
    }

    pub fn clipped(class: &'static str, clip: ClipRegion, children: Vec<SceneNode>) -> Self {
        Self::Group {
            class,
            translate: (0.0, 0.0),
            clip: Some(clip),
            children,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Group { class, .. }
            | Self::Line { class, .. }
            | Self::Rect { class, .. }
            | Self::Path { class, .. }
            | Self::Circle { class, .. }
            | Self::Text { class, .. } => class,
        }
    }

    fn count(&self) -> usize {
        match self {
            Self::Group { children, .. } => 1 + children.iter().map(Self::count).sum::<usize>(),
            _ => 1,
        }
    }

    fn write_svg(&self, out: &mut String) {
        match self {
            Self::Group {
                class,
                translate,
                clip,
                children,
            } => {
                let _ = write!(out, r#"<g class="{class}""#);
                if *translate != (0.0, 0.0) {
                    let _ = write!(out, r#" transform="translate({},{})""#, translate.0, translate.1);
                }
                out.push('>');
                match clip {
                    Some(clip) => {
                        let _ = write!(
                            out,
                            r#"<clipPath id="{}"><rect width="{:.2}" height="{:.2}"/></clipPath><g clip-path="url(#{})">"#,
                            clip.id, clip.width, clip.height, clip.id
                        );
                        children.iter().for_each(|c| c.write_svg(out));
                        out.push_str("</g>");
                    }
                    None => children.iter().for_each(|c| c.write_svg(out)),
                }
                out.push_str("</g>");
            }
            Self::Line {
                class,
                from,
                to,
                stroke,
                opacity,
            } => {
                let _ = write!(
                    out,
                    r#"<line class="{class}" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="1" opacity="{}"/>"#,
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    escape(stroke),
                    opacity
                );
            }
            Self::Rect {
                class,
                x,
                y,
                width,
                height,
                fill,
                opacity,
            } => {
                let _ = write!(
                    out,
                    r#"<rect class="{class}" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" opacity="{}" pointer-events="none"/>"#,
                    x,
                    y,
                    width,
                    height,
                    escape(fill),
                    opacity
                );
            }
            Self::Path {
                class,
                d,
                stroke,
                stroke_width,
                dash,
            } => {
                let _ = write!(
                    out,
                    r#"<path class="{class}" d="{d}" fill="none" stroke="{}" stroke-width="{}""#,
                    escape(stroke),
                    stroke_width
                );
                if let Some(dash) = dash {
                    let _ = write!(
                        out,
                        r#" stroke-dasharray="{0:.2} {0:.2}" stroke-dashoffset="{1:.2}""#,
                        dash.length, dash.offset
                    );
                }
                out.push_str("/>");
            }
            Self::Circle {
                class,
                cx,
                cy,
                r,
                fill,
                hit,
            } => {
                let _ = write!(
                    out,
                    r#"<circle class="{class}" cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}""#,
                    cx,
                    cy,
                    r,
                    escape(fill)
                );
                if let Some(index) = hit {
                    let _ = write!(out, r#" data-index="{index}" style="cursor: pointer""#);
                }
                out.push_str("/>");
            }
            Self::Text {
                class,
                x,
                y,
                dy,
                anchor,
                rotate,
                fill,
                text,
            } => {
                let _ = write!(
                    out,
                    r#"<text class="{class}" x="{:.2}" y="{:.2}" text-anchor="{anchor}" fill="{}""#,
                    x,
                    y,
                    escape(fill)
                );
                if let Some(dy) = dy {
                    let _ = write!(out, r#" dy="{dy}""#);
                }
                if let Some(angle) = rotate {
                    let _ = write!(out, r#" transform="rotate({angle})""#);
                }
                let _ = write!(out, ">{}</text>", escape(text));
            }
        }
    }

    /// Topmost hover target under a point given in this node's parent space
    fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        match self {
            Self::Group {
                translate,
                clip,
                children,
                ..
            } => {
                let (lx, ly) = (x - translate.0, y - translate.1);
                if clip.as_ref().is_some_and(|c| !c.contains(lx, ly)) {
                    return None;
                }
                children.iter().rev().find_map(|c| c.hit_test(lx, ly))
            }
            Self::Circle {
                cx, cy, r, hit: Some(index), ..
            } if (x - cx).hypot(y - cy) <= *r => Some(*index),
            _ => None,
        }
    }
}

/// A complete drawing of the chart
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            nodes: Vec::new(),
        }
    }

    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    /// Number of nodes, groups included
    pub fn element_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::count).sum()
    }

    /// Inner SVG markup (the `<svg>` element itself belongs to the host)
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(4096);
        self.nodes.iter().for_each(|n| n.write_svg(&mut out));
        out
    }

    /// Data index of the topmost hover target at a container-relative point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.nodes.iter().rev().find_map(|n| n.hit_test(x, y))
    }

    /// Depth-first search for nodes with a class
    pub fn find_all(&self, class: &str) -> Vec<&SceneNode> {
        fn walk<'a>(nodes: &'a [SceneNode], class: &str, out: &mut Vec<&'a SceneNode>) {
            for node in nodes {
                if node.class() == class {
                    out.push(node);
                }
                if let SceneNode::Group { children, .. } = node {
                    walk(children, class, out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, class, &mut out);
        out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
