use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid UTF-8 at line {line}")]
    InvalidEncoding { line: usize },

    #[error("Expected Note, Highlight or Bookmark: {line:?}")]
    UnrecognizedClipType { line: String },

    #[error("Expected 'Loc.' or 'on Page': {line:?}")]
    MalformedLocation { line: String },

    #[error("Invalid date: {text:?}")]
    MalformedDate {
        text: String,
        #[source]
        source: Option<chrono::ParseError>,
    },

    #[error("Record has {found} lines, expected {expected}")]
    StructuralMismatch { expected: usize, found: usize },

    // ストリーム解析中のエラーに位置を付ける
    #[error("Failed to parse record {index} at line {line}")]
    Record {
        index: usize,
        line: usize,
        #[source]
        source: Box<ClipParseError>,
    },
}

impl ClipParseError {
    pub(crate) fn at_record(self, index: usize, line: usize) -> Self {
        Self::Record {
            index,
            line,
            source: Box::new(self),
        }
    }

    // Record を剥がした元のエラー
    pub fn kind(&self) -> &ClipParseError {
        match self {
            Self::Record { source, .. } => source.kind(),
            err => err,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipParseError>;
