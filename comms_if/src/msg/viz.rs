//! # Visualisation Messages
//!
//! Marker types used to draw paths in a 3D viewer.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::geom::{Header, Point, PoseMsg, Vector3};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An RGBA colour with components between 0 and 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// A single visualisation marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    pub header: Header,

    /// Namespace of the marker, together with `id` this identifies the marker
    pub ns: String,

    pub id: i32,

    pub marker_type: MarkerType,

    pub action: MarkerAction,

    /// Pose of the marker. Points in `points` are relative to this pose.
    pub pose: PoseMsg,

    /// Size of the marker. Line strips only use `x` (line width), text only uses `z` (height).
    pub scale: Vector3,

    pub color: ColorRgba,

    /// If true the marker is kept fixed in its frame rather than the fixed frame of the viewer
    pub frame_locked: bool,

    /// Vertices of line strips or centres of cube lists
    pub points: Vec<Point>,

    /// Text to draw for text markers
    pub text: String,
}

/// A collection of markers published together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkerArray {
    pub markers: Vec<Marker>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Shape of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerType {
    LineStrip,
    CubeList,
    TextViewFacing,
}

/// What the viewer should do with a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerAction {
    Add,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ColorRgba {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Marker {
    /// Create an empty marker that adds itself to the viewer.
    pub fn new(header: Header, ns: &str, id: i32, marker_type: MarkerType) -> Self {
        Self {
            header,
            ns: ns.into(),
            id,
            marker_type,
            action: MarkerAction::Add,
            pose: PoseMsg::default(),
            scale: Vector3::default(),
            color: ColorRgba::default(),
            frame_locked: false,
            points: Vec::new(),
            text: String::new(),
        }
    }
}
