use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use super::scale::LinearScale;
use crate::data_structs::typedef::PosType;

/// Zoom transform `{k, x, y}`: a uniform scale followed by a pixel
/// translation, composed on top of a base [`LinearScale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: PosType,
    pub x: PosType,
    pub y: PosType,
}

impl Default for ZoomTransform {
    fn default() -> Self { Self::IDENTITY }
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(
        k: PosType,
        x: PosType,
        y: PosType,
    ) -> Self {
        Self { k, x, y }
    }

    pub fn is_identity(&self) -> bool { *self == Self::IDENTITY }

    pub fn apply_x(
        &self,
        x: PosType,
    ) -> PosType {
        x * self.k + self.x
    }

    pub fn apply_y(
        &self,
        y: PosType,
    ) -> PosType {
        y * self.k + self.y
    }

    pub fn invert_x(
        &self,
        x: PosType,
    ) -> PosType {
        (x - self.x) / self.k
    }

    pub fn invert_y(
        &self,
        y: PosType,
    ) -> PosType {
        (y - self.y) / self.k
    }

    /// Multiplies the scale, keeping the translation.
    pub fn scale_by(
        &self,
        k: PosType,
    ) -> Self {
        if k == 1.0 {
            *self
        }
        else {
            Self::new(self.k * k, self.x, self.y)
        }
    }

    /// Translates by `(dx, dy)` in untransformed units.
    pub fn translate_by(
        &self,
        dx: PosType,
        dy: PosType,
    ) -> Self {
        if dx == 0.0 && dy == 0.0 {
            *self
        }
        else {
            Self::new(self.k, self.x + self.k * dx, self.y + self.k * dy)
        }
    }

    /// The scale that maps the base domain through this transform: same
    /// range, domain shrunk or shifted to what is now visible in it.
    pub fn rescale_x(
        &self,
        scale: &LinearScale,
    ) -> LinearScale {
        let (r0, r1) = scale.range();
        scale.with_domain((
            scale.invert(self.invert_x(r0)),
            scale.invert(self.invert_x(r1)),
        ))
    }
}

impl Display for ZoomTransform {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}
