use thiserror::Error;

/// Errors raised by the editor session itself.
///
/// Benign ordering states (no renderer yet, empty filename, nothing selected)
/// are never reported here; they are silently ignored by the operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The host handed us a mount point we cannot draw into
    #[error("Unsupported canvas mount handle: {0}")]
    UnsupportedMount(&'static str),

    #[error("A renderer is already attached to this session")]
    AlreadyAcquired,

    #[error("The session has been released")]
    Released,

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Errors reported by a scene renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to encode raster: {0}")]
    Encode(String),
    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Raster encode failed: {0}")]
    Encode(#[from] RenderError),
    #[error("Failed to deliver {filename}: {source}")]
    Delivery {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ImportError {
    #[error("Failed to decode image {name}: {reason}")]
    Decode { name: String, reason: String },
    #[error("Image import {0} was abandoned before decoding finished")]
    Abandoned(String),
}

impl ImportError {
    /// Name of the file the import was for
    pub fn name(&self) -> &str {
        match self {
            ImportError::Decode { name, .. } | ImportError::Abandoned(name) => name,
        }
    }
}
