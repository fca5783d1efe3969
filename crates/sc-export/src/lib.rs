//! Physics-space bodies and their interchange formats.
//!
//! Pixel-space geometry enters through [`normalize`] /
//! [`to_physics_space`] and leaves as [`PhysicsVertex`] values: centered on
//! the silhouette's bounding box, Y-up, in meters. The anchor is the only
//! value kept in normalized image space ([`AnchorPoint`]).

mod body;
mod json;
mod xml;

pub use body::{
    AnchorPoint, BodyBounds, PhysicsBody, PhysicsPolygon, PhysicsVertex, normalize,
    to_physics_space,
};
pub use json::{
    DEFAULT_MATTER_SCALE, MatterPart, MatterVertex, SpriteMeta, from_json, matter_parts, to_json,
};
pub use xml::{BodyDef, FixtureDefaults, read_body_def, write_body_def};
