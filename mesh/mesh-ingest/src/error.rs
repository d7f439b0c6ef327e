//! Error types for the upload pipeline.

use mesh_io::IoError;
use mesh_pricing::PricingError;
use thiserror::Error;

/// Result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Everything that can stop an upload from reaching a price.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be turned into a mesh.
    #[error(transparent)]
    Mesh(#[from] IoError),

    /// The measured model could not be priced with the current settings.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

impl IngestError {
    /// Whether the user can fix this by picking another file or changing a
    /// setting. Read failures of the upload stream are not.
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Mesh(IoError::Io(_)) | Self::Pricing(PricingError::Io(_))
        )
    }

    /// Short text to show the user. Details stay in the log.
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::Mesh(IoError::UnsupportedFormat { .. }) => {
                "Only STL and OBJ files are supported".to_string()
            }
            Self::Mesh(IoError::Parse { format, .. }) => format!("Failed to parse {format}"),
            Self::Mesh(IoError::EmptyModel) => "No valid geometry found in file".to_string(),
            Self::Mesh(IoError::Normalize(_) | IoError::Io(_)) => {
                "Failed to load model".to_string()
            }
            Self::Pricing(PricingError::UnknownMaterial { id }) => {
                format!("Material \"{id}\" is not available")
            }
            Self::Pricing(_) => "Could not compute a price with these settings".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_io::MeshFormat;

    #[test]
    fn notices_name_the_problem() {
        let unsupported = IngestError::from(IoError::UnsupportedFormat {
            extension: "step".into(),
        });
        assert!(unsupported.notice().contains("STL and OBJ"));

        let parse = IngestError::from(IoError::parse(MeshFormat::Obj, "bad face"));
        assert_eq!(parse.notice(), "Failed to parse OBJ");
        // The detail is in the error, not the notice
        assert!(parse.to_string().contains("bad face"));

        let empty = IngestError::from(IoError::EmptyModel);
        assert!(empty.notice().contains("No valid geometry"));
    }

    #[test]
    fn recoverability() {
        assert!(IngestError::from(IoError::EmptyModel).is_user_recoverable());
        assert!(
            IngestError::from(PricingError::UnknownMaterial { id: "x".into() })
                .is_user_recoverable()
        );

        let read = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stream closed");
        assert!(!IngestError::from(IoError::from(read)).is_user_recoverable());
    }
}
