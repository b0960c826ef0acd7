//! Socket value types.

use serde::{Deserialize, Serialize};

/// A socket's default value.
///
/// Pushing a scalar into a vector/color socket broadcasts it; pushing a
/// vector into a scalar socket is a type mismatch the caller must handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocketValue {
    /// Single float channel.
    Scalar(f32),
    /// XYZ vector (normals, radii, mapping scales).
    Vector([f32; 3]),
    /// RGBA color.
    Color([f32; 4]),
}

impl SocketValue {
    /// Human name of the value type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            SocketValue::Scalar(_) => "scalar",
            SocketValue::Vector(_) => "vector",
            SocketValue::Color(_) => "color",
        }
    }

    /// The scalar channel, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            SocketValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The vector channels, if this is a vector.
    pub fn as_vector(&self) -> Option<[f32; 3]> {
        match self {
            SocketValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The color channels, if this is a color.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            SocketValue::Color(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerces `incoming` into this value's shape where that is lossless
    /// (scalar broadcast into vector/color). Returns None on a real
    /// mismatch.
    pub fn coerce(&self, incoming: SocketValue) -> Option<SocketValue> {
        match (self, incoming) {
            (SocketValue::Scalar(_), SocketValue::Scalar(v)) => Some(SocketValue::Scalar(v)),
            (SocketValue::Vector(_), SocketValue::Vector(v)) => Some(SocketValue::Vector(v)),
            (SocketValue::Color(_), SocketValue::Color(v)) => Some(SocketValue::Color(v)),
            (SocketValue::Vector(_), SocketValue::Scalar(v)) => {
                Some(SocketValue::Vector([v, v, v]))
            }
            (SocketValue::Color(_), SocketValue::Scalar(v)) => {
                Some(SocketValue::Color([v, v, v, 1.0]))
            }
            (SocketValue::Color(_), SocketValue::Vector([r, g, b])) => {
                Some(SocketValue::Color([r, g, b, 1.0]))
            }
            _ => None,
        }
    }
}

impl From<f32> for SocketValue {
    fn from(v: f32) -> Self {
        SocketValue::Scalar(v)
    }
}

impl From<[f32; 3]> for SocketValue {
    fn from(v: [f32; 3]) -> Self {
        SocketValue::Vector(v)
    }
}

impl From<[f32; 4]> for SocketValue {
    fn from(v: [f32; 4]) -> Self {
        SocketValue::Color(v)
    }
}
