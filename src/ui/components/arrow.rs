//! Arrow painting: a stroked shaft and a filled head, drawn on a canvas laid
//! over the whole board.

use gpui::{Bounds, Pixels, PathBuilder, Rgba, Window, canvas, point, prelude::*, px};

use crate::domain::Point;
use crate::ui::theme::{ARROW_HEAD_LENGTH, ARROW_WIDTH};

/// Arrow in canvas coordinates, with its resolved color
#[derive(Clone, Copy, Debug)]
pub struct ArrowShape {
    pub from: Point,
    pub to: Point,
    pub color: Rgba,
}

/// Canvas element painting `arrows`, in order
pub fn render_arrows(arrows: Vec<ArrowShape>, square_size: f32) -> impl IntoElement {
    canvas(
        |_, _, _| {},
        move |bounds, _, window, _| {
            for arrow in &arrows {
                paint_arrow(arrow, square_size, bounds, window);
            }
        },
    )
    .absolute()
    .top_0()
    .left_0()
    .size_full()
}

fn paint_arrow(arrow: &ArrowShape, square_size: f32, bounds: Bounds<Pixels>, window: &mut Window) {
    let (dx, dy) = (arrow.to.x - arrow.from.x, arrow.to.y - arrow.from.y);
    let length = (dx * dx + dy * dy).sqrt();
    if length <= f32::EPSILON {
        return;
    }
    let (ux, uy) = (dx / length, dy / length);
    let head = (ARROW_HEAD_LENGTH * square_size).min(length);
    let half_width = ARROW_WIDTH * square_size;
    let base = Point::new(arrow.to.x - ux * head, arrow.to.y - uy * head);

    let at = |p: Point| point(bounds.origin.x + px(p.x), bounds.origin.y + px(p.y));

    if length > head {
        let mut shaft = PathBuilder::stroke(px(ARROW_WIDTH * square_size));
        shaft.move_to(at(arrow.from));
        shaft.line_to(at(base));
        if let Ok(path) = shaft.build() {
            window.paint_path(path, arrow.color);
        }
    }

    let mut tip = PathBuilder::fill();
    tip.move_to(at(arrow.to));
    tip.line_to(at(Point::new(base.x - uy * half_width, base.y + ux * half_width)));
    tip.line_to(at(Point::new(base.x + uy * half_width, base.y - ux * half_width)));
    tip.close();
    if let Ok(path) = tip.build() {
        window.paint_path(path, arrow.color);
    }
}
