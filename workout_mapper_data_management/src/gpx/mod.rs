use thiserror::Error;

pub mod document;
pub mod parser;
pub mod point;
pub mod reader;

pub const TRACK_FILE_EXTENSION: &str = "gpx";

/// A track file that cannot contribute any tracks. The file is skipped, never the directory.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("document is not well-formed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("undeclared namespace prefix {0:?}")]
    UnknownPrefix(String),

    #[error("document ended before its root element was closed")]
    Incomplete,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("root element {local_name:?} in namespace {namespace:?} is not a GPX 1.1 document")]
    UnexpectedRoot {
        namespace: Option<String>,
        local_name: String,
    },
}
