use std::path::PathBuf;
use thiserror::Error;

/// Failures of scene and settings persistence. None of them leave the scene half-applied.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed aquarium document: {0}")]
    Xml(String),
    #[error("aquarium document has no root element")]
    MissingRoot,
    #[error("settings could not be encoded: {0}")]
    Settings(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for SceneError {
    fn from(err: quick_xml::Error) -> Self {
        SceneError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for SceneError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        SceneError::Xml(err.to_string())
    }
}
