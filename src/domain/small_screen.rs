//! Small-screen limits: caller-supplied overrides that shrink or simplify a board
//! when the viewport is narrow.

use serde::{Deserialize, Serialize};

/// One override rule, applicable when the viewport width is at most `max_width`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SmallScreenLimit {
    pub max_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn_visible: Option<bool>,
}

/// Pick, among the limits applicable at `viewport_width` that define the attribute
/// read by `attribute`, the one with the smallest `max_width`, and return its value.
pub fn resolve_override<T, F>(
    limits: &[SmallScreenLimit],
    viewport_width: f32,
    attribute: F,
) -> Option<T>
where
    F: Fn(&SmallScreenLimit) -> Option<T>,
{
    limits
        .iter()
        .filter(|limit| viewport_width <= limit.max_width)
        .filter_map(|limit| attribute(limit).map(|value| (limit.max_width, value)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, value)| value)
}

/// Requested square size, reduced by the applicable override if any
pub fn resolve_square_size(requested: u32, limits: &[SmallScreenLimit], viewport_width: f32) -> u32 {
    match resolve_override(limits, viewport_width, |l| l.square_size) {
        Some(limit) => requested.min(limit),
        None => requested,
    }
}

/// Requested coordinate visibility; an override can hide but never force-show
pub fn resolve_coordinate_visible(
    requested: bool,
    limits: &[SmallScreenLimit],
    viewport_width: f32,
) -> bool {
    requested && resolve_override(limits, viewport_width, |l| l.coordinate_visible).unwrap_or(true)
}

/// Requested turn visibility; an override can hide but never force-show
pub fn resolve_turn_visible(requested: bool, limits: &[SmallScreenLimit], viewport_width: f32) -> bool {
    requested && resolve_override(limits, viewport_width, |l| l.turn_visible).unwrap_or(true)
}

/// Effective display attributes after applying small-screen limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedDisplay {
    pub square_size: u32,
    pub coordinate_visible: bool,
    pub turn_visible: bool,
}

pub fn resolve_display(
    square_size: u32,
    coordinate_visible: bool,
    turn_visible: bool,
    limits: &[SmallScreenLimit],
    viewport_width: f32,
) -> ResolvedDisplay {
    ResolvedDisplay {
        square_size: resolve_square_size(square_size, limits, viewport_width),
        coordinate_visible: resolve_coordinate_visible(coordinate_visible, limits, viewport_width),
        turn_visible: resolve_turn_visible(turn_visible, limits, viewport_width),
    }
}
