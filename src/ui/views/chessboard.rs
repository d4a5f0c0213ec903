//! Chessboard view - paints a board model's render plan and wires pointer input.

use std::time::Instant;

use gpui::{
    AnyElement, Context, Div, DispatchPhase, Entity, MouseButton, MouseDownEvent, MouseMoveEvent,
    MouseUpEvent, Pixels, SharedString, Subscription, Window, canvas, div, img, prelude::*, px, rgb,
};

use crate::domain::drag::PointerButton;
use crate::domain::geometry::coordinate_font_size;
use crate::domain::render_plan::{FloatingItem, LAYER_ORDER, Layer, PlacedArrow, RenderPlan};
use crate::domain::{InteractionMode, Point};
use crate::models::BoardModel;
use crate::ui::components::{
    ArrowShape, render_arrows, render_centered_text, render_error_box, render_hover_outline,
    render_piece, render_promotion_drawer, render_square, render_square_marker,
};
use crate::ui::theme::{Colorset, GHOST_OPACITY, TEXT_MARKER_SCALE, TEXT_SECONDARY};

fn to_point(p: gpui::Point<Pixels>) -> Point {
    Point::new(p.x.into(), p.y.into())
}

fn pointer_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        _ => PointerButton::Middle,
    }
}

pub struct ChessboardView {
    model: Entity<BoardModel>,
    _subscription: Subscription,
}

impl ChessboardView {
    pub fn new(model: Entity<BoardModel>, cx: &mut Context<Self>) -> Self {
        let _subscription = cx.observe(&model, |_, _, cx| cx.notify());
        Self {
            model,
            _subscription,
        }
    }

    pub fn model(&self) -> &Entity<BoardModel> {
        &self.model
    }
}

impl Render for ChessboardView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let viewport_width: f32 = window.viewport_size().width.into();
        let needs_frame = self.model.update(cx, |board, _| {
            board.set_viewport_width(viewport_width);
            board.advance_animation(Instant::now())
        });
        if needs_frame {
            window.request_animation_frame();
        }

        let board = self.model.read(cx);
        match board.render_plan() {
            Ok(plan) => render_board(&plan, board, &self.model).into_any_element(),
            Err(error) => div().child(render_error_box(error)).into_any_element(),
        }
    }
}

fn arrow_shape(arrow: &PlacedArrow, colorset: &Colorset) -> ArrowShape {
    ArrowShape {
        from: arrow.from,
        to: arrow.to,
        color: colorset.annotation(arrow.color),
    }
}

/// Elements of a render plan, bottom layer first
pub fn render_board(plan: &RenderPlan, board: &BoardModel, model: &Entity<BoardModel>) -> Div {
    let colorset = board.colorset();
    let pieceset = board.pieceset();
    let size = plan.square_size;
    let mode = board.interaction().mode();
    let mut layers: Vec<AnyElement> = Vec::new();

    for layer in LAYER_ORDER {
        match layer {
            Layer::SquareFills => {
                layers.extend(plan.squares.iter().map(|fill| {
                    render_square(fill.origin, size, colorset.square(fill.dark)).into_any_element()
                }));
                let font_size = coordinate_font_size(size as u32);
                layers.extend(plan.coordinates.iter().map(|label| {
                    render_centered_text(
                        SharedString::from(label.text.to_string()),
                        label.center,
                        size,
                        font_size,
                        rgb(TEXT_SECONDARY),
                    )
                    .into_any_element()
                }));
            }
            Layer::SquareMarkers => {
                layers.extend(plan.square_markers.iter().map(|marker| {
                    render_square_marker(marker.origin, size, colorset.annotation(marker.color))
                        .into_any_element()
                }));
            }
            Layer::HoveredOutline => {
                if let Some(hovered) = &plan.hovered {
                    layers.push(
                        render_hover_outline(hovered.origin, size, colorset.annotation(hovered.color))
                            .into_any_element(),
                    );
                }
            }
            Layer::Pieces => {
                layers.extend(plan.pieces.iter().map(|placed| {
                    render_piece(pieceset.piece(placed.piece), placed.origin, size).into_any_element()
                }));
            }
            Layer::TextMarkers => {
                layers.extend(plan.text_markers.iter().map(|marker| {
                    render_centered_text(
                        SharedString::from(marker.glyph.clone()),
                        marker.center,
                        size,
                        size * TEXT_MARKER_SCALE,
                        colorset.annotation(marker.color),
                    )
                    .into_any_element()
                }));
            }
            Layer::ArrowMarkers => {
                if !plan.arrow_markers.is_empty() {
                    let arrows = plan
                        .arrow_markers
                        .iter()
                        .map(|arrow| arrow_shape(arrow, colorset))
                        .collect();
                    layers.push(render_arrows(arrows, size).into_any_element());
                }
            }
            Layer::MoveArrow => {
                if let Some(arrow) = &plan.move_arrow {
                    layers.push(render_arrows(vec![arrow_shape(arrow, colorset)], size).into_any_element());
                }
            }
            Layer::HitRegions => {
                layers.extend(plan.hit_regions.iter().map(|region| {
                    let model = model.clone();
                    let model_up = model.clone();
                    let square = region.square;
                    div()
                        .id(SharedString::from(format!("square-{square}")))
                        .absolute()
                        .left(px(region.origin.x))
                        .top(px(region.origin.y))
                        .size(px(size))
                        .when(mode != InteractionMode::None, |el| el.cursor_pointer())
                        .on_any_mouse_down(move |ev: &MouseDownEvent, _, cx| {
                            model.update(cx, |board, cx| {
                                board.pointer_down(square, pointer_button(ev.button), to_point(ev.position), cx);
                            });
                        })
                        .on_mouse_up(MouseButton::Left, move |_: &MouseUpEvent, _, cx| {
                            model_up.update(cx, |board, cx| board.square_released(square, cx));
                        })
                        .into_any_element()
                }));
            }
            Layer::PromotionDrawer => {
                if let Some(overlay) = &plan.promotion {
                    layers.push(
                        render_promotion_drawer(overlay, size, pieceset, model).into_any_element(),
                    );
                }
            }
            Layer::DraggedItem => match &plan.floating {
                Some(FloatingItem::Piece(placed)) => {
                    layers.push(
                        div()
                            .absolute()
                            .top_0()
                            .left_0()
                            .size_full()
                            .child(render_piece(pieceset.piece(placed.piece), placed.origin, size))
                            .into_any_element(),
                    );
                }
                Some(FloatingItem::Arrow(arrow)) => {
                    layers.push(
                        div()
                            .absolute()
                            .top_0()
                            .left_0()
                            .size_full()
                            .opacity(1.0 - GHOST_OPACITY)
                            .child(render_arrows(vec![arrow_shape(arrow, colorset)], size))
                            .into_any_element(),
                    );
                }
                None => {}
            },
            Layer::TurnFlag => {
                if let Some(flag) = &plan.turn_flag {
                    layers.push(
                        div()
                            .absolute()
                            .left(px(flag.origin.x))
                            .top(px(flag.origin.y))
                            .size(px(size))
                            .child(img(pieceset.turn_flag(flag.color)).size(px(size)))
                            .into_any_element(),
                    );
                }
            }
        }
    }

    let model_measure = model.clone();
    let model_listen = model.clone();
    let dragging = board.is_dragging();

    // measures the canvas origin, and holds the window listeners during a drag
    let pointer_canvas = canvas(
        move |bounds, _window, cx| {
            model_measure.update(cx, |board, _| board.set_canvas_origin(to_point(bounds.origin)));
        },
        move |_, _, window, _| {
            if !dragging {
                return;
            }
            let model_move = model_listen.clone();
            window.on_mouse_event(move |ev: &MouseMoveEvent, phase, _, cx| {
                if phase != DispatchPhase::Bubble {
                    return;
                }
                model_move.update(cx, |board, cx| match ev.pressed_button {
                    Some(_) => board.pointer_move(to_point(ev.position), cx),
                    None => board.pointer_cancel(cx),
                });
            });
            let model_up = model_listen.clone();
            window.on_mouse_event(move |ev: &MouseUpEvent, phase, _, cx| {
                if phase == DispatchPhase::Bubble {
                    model_up.update(cx, |board, cx| board.pointer_up(to_point(ev.position), cx));
                }
            });
        },
    )
    .absolute()
    .top_0()
    .left_0()
    .size_full();

    div()
        .relative()
        .flex_shrink_0()
        .w(px(plan.extent.width))
        .h(px(plan.extent.height))
        .child(pointer_canvas)
        .children(layers)
}
