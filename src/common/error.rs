use thiserror::Error;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    // Layout
    #[error("Surface too small for module matrix")]
    SurfaceTooSmall,
    #[error("Module matrix is not finalized")]
    MatrixNotFinalized,
    #[error("Invalid module matrix: {0}")]
    InvalidMatrix(String),
    #[error("Cannot allocate {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    // Style
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    // Shapes & assets
    #[error("Unknown shape family: {0}")]
    UnknownShapeFamily(String),
    #[error("Malformed template for shape family {family}: {reason}")]
    MalformedTemplate { family: String, reason: String },
    #[error("Asset load failure: {0}")]
    AssetLoadFailure(String),
}

impl RenderError {
    /// Errors that make the module grid undrawable and abort the whole render.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::SurfaceTooSmall
                | Self::MatrixNotFinalized
                | Self::InvalidMatrix(_)
                | Self::SurfaceAllocation { .. }
                | Self::InvalidColor(_)
        )
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
