#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};
use tracklane::prelude::*;

/// Generates random annotations along a coordinate axis.
pub struct DemoAnnotationBuilder {
    rng:        StdRng,
    axis_len:   f64,
    max_width:  f64,
    zero_width: f64,
}

impl DemoAnnotationBuilder {
    pub fn new(
        axis_len: f64,
        max_width: f64,
        seed: u64,
    ) -> Self {
        assert!(axis_len > 0.0 && max_width > 0.0);
        Self {
            rng: StdRng::seed_from_u64(seed),
            axis_len,
            max_width,
            zero_width: 0.0,
        }
    }

    /// Share of point-like annotations with zero width.
    pub fn with_zero_width(
        mut self,
        share: f64,
    ) -> Self {
        self.zero_width = share;
        self
    }

    pub fn build(
        &mut self,
        n: usize,
    ) -> Vec<Annotation> {
        (0..n)
            .map(|i| {
                let x = self.rng.gen_range(0.0..self.axis_len);
                let w = if self.rng.gen_bool(self.zero_width) {
                    0.0
                }
                else {
                    self.rng.gen_range(1.0..self.max_width)
                };
                Annotation::new(format!("a{}", i), x.floor(), w.floor())
            })
            .collect()
    }
}

pub fn data_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}
