use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::typedef::PosType;

/// Affine map from a semantic domain to a pixel range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain: (PosType, PosType),
    range:  (PosType, PosType),
}

impl Default for LinearScale {
    fn default() -> Self {
        Self {
            domain: (0.0, 1.0),
            range:  (0.0, 1.0),
        }
    }
}

impl LinearScale {
    pub fn new(
        domain: (PosType, PosType),
        range: (PosType, PosType),
    ) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (PosType, PosType) { self.domain }

    pub fn range(&self) -> (PosType, PosType) { self.range }

    /// Semantic coordinate to pixel. A zero-length domain maps everything
    /// to the middle of the range.
    pub fn project(
        &self,
        value: PosType,
    ) -> PosType {
        interpolate(self.range, normalize(self.domain, value))
    }

    /// Pixel to semantic coordinate.
    pub fn invert(
        &self,
        pixel: PosType,
    ) -> PosType {
        interpolate(self.domain, normalize(self.range, pixel))
    }

    /// Pixels per semantic unit.
    pub fn slope(&self) -> PosType {
        let span = self.domain.1 - self.domain.0;
        if span == 0.0 {
            0.0
        }
        else {
            (self.range.1 - self.range.0) / span
        }
    }

    pub fn with_domain(
        mut self,
        domain: (PosType, PosType),
    ) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_range(
        mut self,
        range: (PosType, PosType),
    ) -> Self {
        self.range = range;
        self
    }
}

fn normalize(
    (a, b): (PosType, PosType),
    value: PosType,
) -> PosType {
    let span = b - a;
    if span == 0.0 {
        0.5
    }
    else {
        (value - a) / span
    }
}

fn interpolate(
    (a, b): (PosType, PosType),
    t: PosType,
) -> PosType {
    a + (b - a) * t
}
