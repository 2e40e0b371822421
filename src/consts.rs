// Runtime parameters
pub const CANVAS_WIDTH: u32 = 500;
pub const CANVAS_HEIGHT: u32 = 500;
pub const OUT_FILE: &'static str = "./out.png";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Ray/triangle rejection threshold (parallel rays, hits at or behind origin)
pub const INTERSECT_EPSILON: f64 = 1e-6;

// Circle basis: a helper vector is near-parallel to the axis past this
pub const HELPER_PARALLEL_LIMIT: f64 = 0.9;

// Default tessellation densities
pub const DISC_STEPS: usize = 10;
pub const TORUS_MAJOR_STEPS: usize = 32;
pub const TORUS_MINOR_STEPS: usize = 8;
