//! Rasterization of scenes into terminal cells.
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block: the foreground paints the top pixel, the background the
//! bottom one. A pixel takes the fill of the last rectangle covering its
//! centre; every rectangle covers at least one pixel along each axis so
//! thin bars never vanish.

use std::ops::Range;

use crib_common::types::Rgb;
use crib_core::scene::{AxisOrient, Scene};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

const UPPER_HALF: &str = "\u{2580}";
const LOWER_HALF: &str = "\u{2584}";

/// Pixel grid of a rasterized scene, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Pixels per row.
    pub cols: usize,
    /// Pixel rows.
    pub rows: usize,
    /// Fill of each pixel, `None` where nothing was painted.
    pub pixels: Vec<Option<Rgb>>,
}

impl Raster {
    /// Fill of the pixel at (`col`, `row`).
    #[must_use]
    pub fn get(&self, col: usize, row: usize) -> Option<Rgb> {
        if col < self.cols && row < self.rows {
            self.pixels[row * self.cols + col]
        } else {
            None
        }
    }
}

/// Samples `scene` onto a `cols` x `rows` pixel grid.
#[must_use]
pub fn rasterize(scene: &Scene, cols: usize, rows: usize) -> Raster {
    let mut pixels = vec![None; cols * rows];
    if scene.width > 0.0 && scene.height > 0.0 && cols > 0 && rows > 0 {
        #[allow(clippy::cast_precision_loss)]
        let (sx, sy) = (cols as f64 / scene.width, rows as f64 / scene.height);
        for rect in scene.rects() {
            let Some(fill) = rect.fill else { continue };
            if rect.width <= 0.0 || rect.height <= 0.0 {
                continue;
            }
            for row in covered(rect.y, rect.height, sy, rows) {
                for col in covered(rect.x, rect.width, sx, cols) {
                    pixels[row * cols + col] = Some(fill);
                }
            }
        }
    }
    Raster { cols, rows, pixels }
}

/// Pixel indices whose centres fall in `[start, start + len)` at `scale`
/// pixels per unit; the pixel under the midpoint if there are none.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn covered(start: f64, len: f64, scale: f64, limit: usize) -> Range<usize> {
    let index = |v: f64| (v.max(0.0) as usize).min(limit);
    let lo = index((start * scale - 0.5).ceil());
    let hi = index(((start + len) * scale - 0.5).ceil());
    if lo < hi {
        lo..hi
    } else {
        let mid = index(((start + len / 2.0) * scale).floor()).min(limit.saturating_sub(1));
        if (start + len) * scale <= 0.0 || start * scale >= limit as f64 {
            0..0
        } else {
            mid..mid + 1
        }
    }
}

/// Terminal color of a scene color.
#[must_use]
pub const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Widget drawing a [`Scene`] scaled to its area, with axis labels.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    scene: &'a Scene,
    label_style: Style,
}

impl<'a> SceneView<'a> {
    /// Creates a view of `scene`.
    #[must_use]
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            label_style: Style::default().fg(Color::Gray),
        }
    }

    /// Style of axis tick labels.
    #[must_use]
    pub const fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    fn render_axes(&self, area: Rect, buf: &mut Buffer) {
        let to_col = |x: f64| scale_to(x, self.scene.width, area.width);
        let to_row = |y: f64| scale_to(y, self.scene.height, area.height);

        for axis in self.scene.axes() {
            match axis.orient {
                AxisOrient::Bottom { y } => {
                    let row = to_row(y).min(area.height.saturating_sub(1));
                    let mut next_free = 0_u16;
                    for tick in &axis.ticks {
                        let col = to_col(tick.position);
                        let len = u16::try_from(tick.label.chars().count()).unwrap_or(u16::MAX);
                        let start = col.saturating_sub(len / 2);
                        if start < next_free || start.saturating_add(len) > area.width {
                            continue;
                        }
                        let _ = buf.set_stringn(
                            area.x + start,
                            area.y + row,
                            &tick.label,
                            usize::from(len),
                            self.label_style,
                        );
                        next_free = start + len + 1;
                    }
                }
                AxisOrient::Left { x } => {
                    let edge = to_col(x);
                    for tick in &axis.ticks {
                        let row = to_row(tick.position);
                        if row >= area.height {
                            continue;
                        }
                        let len = u16::try_from(tick.label.chars().count()).unwrap_or(u16::MAX);
                        let start = edge.saturating_sub(len);
                        let room = usize::from(edge - start);
                        let _ = buf.set_stringn(area.x + start, area.y + row, &tick.label, room, self.label_style);
                    }
                }
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale_to(v: f64, extent: f64, cells: u16) -> u16 {
    if extent <= 0.0 {
        return 0;
    }
    (v / extent * f64::from(cells)).floor().clamp(0.0, f64::from(cells)) as u16
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = usize::from(area.width);
        let raster = rasterize(self.scene, cols, usize::from(area.height) * 2);

        for row in 0..area.height {
            for col in 0..area.width {
                let top = raster.get(usize::from(col), usize::from(row) * 2);
                let bottom = raster.get(usize::from(col), usize::from(row) * 2 + 1);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };
                match (top, bottom) {
                    (Some(t), Some(b)) => {
                        let _ = cell.set_symbol(UPPER_HALF).set_fg(color(t)).set_bg(color(b));
                    }
                    (Some(t), None) => {
                        let _ = cell.set_symbol(UPPER_HALF).set_fg(color(t));
                    }
                    (None, Some(b)) => {
                        let _ = cell.set_symbol(LOWER_HALF).set_fg(color(b));
                    }
                    (None, None) => {}
                }
            }
        }
        self.render_axes(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crib_core::scene::{Axis, DrawCommand, RectCommand, Tick};

    const RED: Rgb = Rgb::new(0x99, 0, 0);
    const GREY: Rgb = Rgb::new(0xcc, 0xcc, 0xcc);

    fn rect(x: f64, y: f64, width: f64, height: f64, fill: Option<Rgb>) -> DrawCommand {
        DrawCommand::Rect(RectCommand {
            x,
            y,
            width,
            height,
            fill,
        })
    }

    #[test]
    fn full_cover_paints_every_pixel() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(0.0, 0.0, 10.0, 10.0, Some(RED)));
        let raster = rasterize(&scene, 4, 4);
        assert!(raster.pixels.iter().all(|p| *p == Some(RED)));
    }

    #[test]
    fn later_rects_paint_over_earlier() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(0.0, 0.0, 10.0, 10.0, Some(RED)));
        scene.push(rect(5.0, 0.0, 5.0, 10.0, Some(GREY)));
        let raster = rasterize(&scene, 2, 1);
        assert_eq!(raster.get(0, 0), Some(RED));
        assert_eq!(raster.get(1, 0), Some(GREY));
    }

    #[test]
    fn unfilled_rects_leave_background() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(0.0, 0.0, 10.0, 10.0, None));
        let raster = rasterize(&scene, 3, 3);
        assert!(raster.pixels.iter().all(Option::is_none));
    }

    #[test]
    fn thin_rect_still_covers_one_pixel() {
        let mut scene = Scene::new(180.0, 20.0);
        scene.push(rect(90.0, 10.0, 0.5, 10.0, Some(GREY)));
        let raster = rasterize(&scene, 10, 2);
        let painted: Vec<usize> = (0..10).filter(|&c| raster.get(c, 1).is_some()).collect();
        assert_eq!(painted, vec![5]);
        assert_eq!(raster.get(5, 0), None);
    }

    #[test]
    fn rects_outside_the_scene_are_clipped() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(-20.0, 0.0, 5.0, 10.0, Some(RED)));
        scene.push(rect(15.0, 0.0, 5.0, 10.0, Some(RED)));
        let raster = rasterize(&scene, 4, 4);
        assert!(raster.pixels.iter().all(Option::is_none));
    }

    #[test]
    fn empty_scene_or_area_rasterizes_to_nothing() {
        let raster = rasterize(&Scene::new(0.0, 0.0), 4, 4);
        assert!(raster.pixels.iter().all(Option::is_none));
        let raster = rasterize(&Scene::new(10.0, 10.0), 0, 0);
        assert!(raster.pixels.is_empty());
    }

    #[test]
    fn half_blocks_carry_both_pixels() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(0.0, 0.0, 10.0, 5.0, Some(RED)));
        scene.push(rect(0.0, 5.0, 10.0, 5.0, Some(GREY)));

        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        SceneView::new(&scene).render(area, &mut buf);

        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), UPPER_HALF);
        assert_eq!(cell.fg, color(RED));
        assert_eq!(cell.bg, color(GREY));
    }

    #[test]
    fn bottom_only_pixels_use_lower_half() {
        let mut scene = Scene::new(10.0, 10.0);
        scene.push(rect(0.0, 5.0, 10.0, 5.0, Some(GREY)));

        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        SceneView::new(&scene).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), LOWER_HALF);
    }

    #[test]
    fn axis_labels_are_written() {
        let mut scene = Scene::new(100.0, 100.0);
        scene.push(DrawCommand::Axis(Axis {
            orient: AxisOrient::Left { x: 50.0 },
            ticks: vec![Tick {
                label: "5%".into(),
                position: 0.0,
            }],
            rotation: 0.0,
        }));
        scene.push(DrawCommand::Axis(Axis {
            orient: AxisOrient::Bottom { y: 90.0 },
            ticks: vec![
                Tick {
                    label: "A".into(),
                    position: 20.0,
                },
                Tick {
                    label: "B".into(),
                    position: 21.0,
                },
            ],
            rotation: -65.0,
        }));

        let area = Rect::new(0, 0, 10, 10);
        let mut buf = Buffer::empty(area);
        SceneView::new(&scene).render(area, &mut buf);

        assert_eq!(buf[(3, 0)].symbol(), "5");
        assert_eq!(buf[(4, 0)].symbol(), "%");
        assert_eq!(buf[(2, 9)].symbol(), "A");
        // overlapping tick is skipped
        assert_eq!(buf[(3, 9)].symbol(), " ");
    }
}
