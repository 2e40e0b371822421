use thiserror::Error;

/// Failures outside the ray/primitive math.
///
/// Geometry itself never fails: degenerate input turns into NaNs or misses.
/// Everything that touches files, scene descriptions or shading with an
/// unlit scene reports through this type.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("cannot shade a hit in a scene without lights")]
    NoLights,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("scene description error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a vector of 3 components, got {0}")]
    BadVector(usize),

    #[error("texture must name either a color or an image")]
    BadTexture,
}
