//! Error handling for document loading, parsing and formatting
use std::path::PathBuf;

/// A result type shared by the parsing and formatting stages.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that occurred while processing a document.
#[derive(Debug)]
pub struct Error {
    /// The context of the error
    pub context: Box<ErrorContext>,

    /// The kind of error that occurred
    pub kind: ErrorKind,
}
impl Error {
    /// Creates a new `Error`
    #[must_use]
    pub fn new(kind: ErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Adds a path to the error context.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.context.path = Some(path);
        self
    }
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io(err),
            ErrorContext::new("", TextSpan::default()),
        )
    }
}

/// The kind of error that occurred while processing a document.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// Another error occurred while processing the document
    #[error("{0}")]
    Custom(String),

    /// The XML declaration was not first
    #[error("The <?xml ?> declaration must appear at the start of the document")]
    DeclarationNotFirst,

    /// A tag in the document was not closed properly
    #[error("Unclosed tag: {0}")]
    UnclosedTag(String),

    /// A closing tag did not match the tag it was supposed to close
    #[error("Closing tag </{closing}> does not match <{open}>")]
    MismatchedTag {
        /// The name of the open tag
        open: String,

        /// The name of the closing tag found instead
        closing: String,
    },

    /// File ended unexpectedly
    #[error("End of file reached unexpectedly")]
    UnexpectedEof,

    /// XML tokenization failed
    #[error("XML parser error: {0}")]
    Xml(#[from] xmlparser::Error),

    /// IO error occurred while reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Context describing the error location in the source document.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The path to the file that was parsed, if available.
    pub path: Option<PathBuf>,

    /// Full source text of the document, for row/col calculation.
    pub source: String,

    /// Position of the error in the source text.
    pub span: TextSpan,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` with the given source and span.
    #[must_use]
    pub fn new(source: &str, span: TextSpan) -> Self {
        Self {
            path: None,
            source: source.to_string(),
            span,
        }
    }

    /// Returns the row and column of the error in the source text.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.span.position(&self.source)
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self.path.as_ref().map(|p| p.display());

        let span = self.span.as_str();
        let line = span.split('\n').next().unwrap_or(span);

        let (row, col) = self.position();

        if !line.is_empty() {
            writeln!(f, "| {line}")?;
        }

        if self.span.start > 0 {
            write!(f, "= At ")?;

            if let Some(path) = path {
                write!(f, "{path}:")?;
            }

            writeln!(f, "{row}:{col}")?;
        } else if let Some(path) = path {
            writeln!(f, "= In {path}")?;
        }
        Ok(())
    }
}

/// A snippet of source text plus its byte offset.
/// Only kept for error reporting; the document tree itself is fully owned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSpan {
    /// The text of the span.
    pub text: String,

    /// The start position of the span in the source text.
    pub start: usize,
}
impl TextSpan {
    /// Create a new span from a snippet and its offset.
    #[must_use]
    pub fn new(text: impl Into<String>, start: usize) -> Self {
        Self {
            text: text.into(),
            start,
        }
    }

    /// Create an empty span pointing at the end of the source text.
    #[must_use]
    pub fn end_of(source: &str) -> Self {
        let len = source.len();
        Self {
            text: String::new(),
            start: if len == 0 { 0 } else { len - 1 },
        }
    }

    /// Returns this span as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Calculates the row and column of the span in the source text.
    ///
    /// Warning: This is an expensive operation, and should be used for error reporting only.
    #[must_use]
    pub fn position(&self, source: &str) -> (usize, usize) {
        let mut row = 1;
        let mut col = 1;
        for (i, c) in source.char_indices() {
            if i == self.start {
                break;
            }
            if c == '\n' {
                row += 1;
                col = 1;
            } else {
                col += 1;
            }
        }

        (row, col)
    }
}
impl From<xmlparser::StrSpan<'_>> for TextSpan {
    fn from(span: xmlparser::StrSpan<'_>) -> Self {
        Self {
            text: span.as_str().to_string(),
            start: span.start(),
        }
    }
}

/// Bail out of a parsing function with an error carrying source context.
macro_rules! bail {
    ($src:expr, $span:expr, msg = $fmt:literal $(, $arg:expr)* $(,)?) => {
        return Err($crate::error::Error::new(
            $crate::error::ErrorKind::Custom(format!($fmt $(, $arg)*)),
            $crate::error::ErrorContext::new($src, $span),
        ))
    };
    ($src:expr, $span:expr, $kind:expr) => {
        return Err($crate::error::Error::new(
            $kind,
            $crate::error::ErrorContext::new($src, $span),
        ))
    };
    ($src:expr, $kind:expr) => {
        return Err($crate::error::Error::new(
            $kind,
            $crate::error::ErrorContext::new($src, $crate::error::TextSpan::default()),
        ))
    };
}
pub(crate) use bail;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_position() {
        let source = "line1\nline2\nline3";
        let span = TextSpan::new("line2", 6);
        assert_eq!(span.position(source), (2, 1));
    }

    #[test]
    fn test_span_end_of() {
        let span = TextSpan::end_of("example");
        assert_eq!(span.as_str(), "");
        assert_eq!(span.start, 6);

        let span = TextSpan::end_of("");
        assert_eq!(span.start, 0);
    }

    #[test]
    fn test_error_display_includes_context() {
        let source = "<root>\n<child>\n</root>";
        let error = Error::new(
            ErrorKind::UnclosedTag("child".to_string()),
            ErrorContext::new(source, TextSpan::new("<child>", 7)),
        );

        let rendered = error.to_string();
        assert!(rendered.contains("| <child>"));
        assert!(rendered.contains("= At 2:1"));
        assert!(rendered.contains("= Unclosed tag: child"));
    }

    #[test]
    fn test_error_display_includes_path() {
        let error = Error::new(
            ErrorKind::UnexpectedEof,
            ErrorContext::new("", TextSpan::default()),
        )
        .with_path("books.xml".into());

        let rendered = error.to_string();
        assert!(rendered.contains("= In books.xml"));
    }

    #[test]
    fn test_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = Error::from(io);
        assert!(matches!(error.kind, ErrorKind::Io(_)));
    }
}
