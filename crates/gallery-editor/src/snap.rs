//! Snapping for object moves.
//!
//! Alignment guides win over the grid: if the moving object's left,
//! center or right edge (top, middle or bottom on the other axis) lands
//! within `threshold` of another top-level object's matching line or of
//! the canvas edges/center, it locks onto it. Otherwise the position is
//! rounded to the grid when one is configured. Each axis snaps on its own.

use gallery_core::bounds::object_bounds;
use gallery_core::{Canvas, ObjectId};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SNAP_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SnapConfig {
    pub enabled: bool,
    pub grid_size: Option<f64>,
    /// Maximum distance, in canvas units, at which a guide captures.
    pub threshold: f64,
    pub snap_to_objects: bool,
    pub snap_to_canvas: bool,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            grid_size: None,
            threshold: DEFAULT_SNAP_THRESHOLD,
            snap_to_objects: true,
            snap_to_canvas: true,
        }
    }
}

impl SnapConfig {
    /// Enabled config snapping to `grid` plus objects and canvas.
    pub fn grid(size: f64) -> Self {
        Self {
            enabled: true,
            grid_size: Some(size),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideAxis {
    /// A vertical line at `position` on the x axis.
    Vertical,
    /// A horizontal line at `position` on the y axis.
    Horizontal,
}

/// A guide line the move locked onto, for the UI to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapGuide {
    pub axis: GuideAxis,
    pub position: f64,
    /// The object providing the line; `None` for the canvas.
    pub source: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub x: f64,
    pub y: f64,
    pub guides: Vec<SnapGuide>,
}

impl SnapResult {
    fn unsnapped(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            guides: Vec::new(),
        }
    }
}

struct Target {
    position: f64,
    source: Option<ObjectId>,
}

/// Snap a proposed position `(x, y)` for object `moving`.
pub fn snap_position(
    canvas: &Canvas,
    config: &SnapConfig,
    moving: ObjectId,
    x: f64,
    y: f64,
) -> SnapResult {
    if !config.enabled {
        return SnapResult::unsnapped(x, y);
    }

    // Alignment only makes sense in canvas space, i.e. for top-level objects
    let Some(obj) = canvas.objects.iter().find(|o| o.id == moving) else {
        return SnapResult::unsnapped(snap_to_grid(x, config), snap_to_grid(y, config));
    };

    let moved = object_bounds(obj) + Vec2::new(x - obj.x, y - obj.y);
    let mut vertical = Vec::new();
    let mut horizontal = Vec::new();

    if config.snap_to_objects {
        for other in canvas.objects.iter().filter(|o| o.id != moving && o.visible) {
            let b = object_bounds(other);
            push_lines(&mut vertical, [b.x0, b.center().x, b.x1], Some(other.id));
            push_lines(&mut horizontal, [b.y0, b.center().y, b.y1], Some(other.id));
        }
    }
    if config.snap_to_canvas {
        push_lines(&mut vertical, [0.0, canvas.width / 2.0, canvas.width], None);
        push_lines(&mut horizontal, [0.0, canvas.height / 2.0, canvas.height], None);
    }

    let mut result = SnapResult::unsnapped(x, y);

    match nearest(&vertical, [moved.x0, moved.center().x, moved.x1], config.threshold) {
        Some((delta, target)) => {
            result.x = x + delta;
            result.guides.push(SnapGuide {
                axis: GuideAxis::Vertical,
                position: target.position,
                source: target.source,
            });
        }
        None => result.x = snap_to_grid(x, config),
    }

    match nearest(&horizontal, [moved.y0, moved.center().y, moved.y1], config.threshold) {
        Some((delta, target)) => {
            result.y = y + delta;
            result.guides.push(SnapGuide {
                axis: GuideAxis::Horizontal,
                position: target.position,
                source: target.source,
            });
        }
        None => result.y = snap_to_grid(y, config),
    }

    result
}

fn push_lines(out: &mut Vec<Target>, lines: [f64; 3], source: Option<ObjectId>) {
    out.extend(lines.into_iter().map(|position| Target { position, source }));
}

/// The smallest correction that puts one of `anchors` on a target line.
fn nearest<'a>(
    targets: &'a [Target],
    anchors: [f64; 3],
    threshold: f64,
) -> Option<(f64, &'a Target)> {
    let mut best: Option<(f64, &Target)> = None;
    for target in targets {
        for anchor in anchors {
            let delta = target.position - anchor;
            if delta.abs() > threshold {
                continue;
            }
            if best.is_none_or(|(d, _)| delta.abs() < d.abs()) {
                best = Some((delta, target));
            }
        }
    }
    best
}

fn snap_to_grid(value: f64, config: &SnapConfig) -> f64 {
    match config.grid_size {
        Some(size) if size > 0.0 => (value / size).round() * size,
        _ => value,
    }
}
