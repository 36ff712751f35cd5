//! Declarative drawing model.
//!
//! A [`Scene`] is the complete picture of one render target. Surfaces
//! replace whatever they showed for the target with the new scene, so
//! rendering the same scene twice leaves the same picture.

use crib_common::types::Rgb;
use serde::{Deserialize, Serialize};

/// Everything drawn into one render target, in scene coordinates
/// (origin top-left, y growing downwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Width of the drawing area.
    pub width: f64,
    /// Height of the drawing area.
    pub height: f64,
    /// Draw commands in paint order.
    pub commands: Vec<DrawCommand>,
}

impl Scene {
    /// Creates an empty drawing area.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Appends a draw command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Rectangles in paint order.
    pub fn rects(&self) -> impl Iterator<Item = &RectCommand> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Rect(rect) => Some(rect),
            DrawCommand::Axis(_) => None,
        })
    }

    /// Axes in paint order.
    pub fn axes(&self) -> impl Iterator<Item = &Axis> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Axis(axis) => Some(axis),
            DrawCommand::Rect(_) => None,
        })
    }
}

/// A single drawing primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Filled rectangle.
    Rect(RectCommand),
    /// Axis with tick labels.
    Axis(Axis),
}

/// Positioned, sized, optionally filled rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectCommand {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Fill color; `None` leaves the area unpainted.
    pub fill: Option<Rgb>,
}

impl RectCommand {
    /// Returns `true` if the point lies inside the rectangle
    /// (left/top edges inclusive).
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Where an axis sits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AxisOrient {
    /// Horizontal axis along the bottom of the plot, at height `y`.
    Bottom {
        /// Vertical position of the axis line.
        y: f64,
    },
    /// Vertical axis along the left of the plot, at `x`.
    Left {
        /// Horizontal position of the axis line.
        x: f64,
    },
}

/// Axis line with labelled ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    /// Placement.
    pub orient: AxisOrient,
    /// Labelled ticks.
    pub ticks: Vec<Tick>,
    /// Label rotation in degrees.
    pub rotation: f64,
}

/// One labelled tick, positioned along its axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Text shown next to the tick.
    pub label: String,
    /// Coordinate along the axis.
    pub position: f64,
}
