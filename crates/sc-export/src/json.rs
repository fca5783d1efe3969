use sc_core::{Error, Point2f, Result};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::PhysicsBody;

/// Meters to Matter.js world units.
pub const DEFAULT_MATTER_SCALE: f32 = 100.0;

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::parse(e.to_string()))
}

pub fn from_json<T: DeserializeOwned>(src: &str) -> Result<T> {
    serde_json::from_str(src).map_err(|e| Error::parse(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatterVertex {
    pub x: f32,
    pub y: f32,
}

/// One convex part of a Matter.js compound body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatterPart {
    pub label: String,
    pub vertices: Vec<MatterVertex>,
}

/// Scales every polygon of `body` by `scale`, labelled `polygon_<i>`.
pub fn matter_parts(body: &PhysicsBody, scale: f32) -> Vec<MatterPart> {
    body.polygons
        .iter()
        .enumerate()
        .map(|(i, poly)| MatterPart {
            label: format!("polygon_{i}"),
            vertices: poly
                .vertices
                .iter()
                .map(|v| MatterVertex {
                    x: v.x * scale,
                    y: v.y * scale,
                })
                .collect(),
        })
        .collect()
}

/// Per-sheet metadata consumed by sprite loaders: frame size, the frame's
/// simplified outline in pixels and the full sheet size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteMeta {
    pub name: String,
    pub frame_width: usize,
    pub frame_height: usize,
    pub vertices: Vec<Point2f>,
    pub width: usize,
    pub height: usize,
}
