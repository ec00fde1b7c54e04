//! File-level pipeline: load a document, apply the attribute rules, and write
//! the formatted result to the resolved output path.
use crate::{
    AttributeRules, Document,
    error::{Error, Result},
    to_xml::DEFAULT_INDENT,
};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options for one formatting run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Path to the XML input file.
    pub input: PathBuf,

    /// Output path; resolved via [`default_output_path`] when not set.
    pub output: Option<PathBuf>,

    /// Number of spaces per indent level.
    pub indent: usize,

    /// Attribute sorting/filtering rules.
    pub rules: AttributeRules,
}
impl FormatOptions {
    /// Create options for the given input file, with the default indent and
    /// no attribute rules.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            indent: DEFAULT_INDENT,
            rules: AttributeRules::default(),
        }
    }
}

/// The output path used when none is given explicitly:
/// the input's file name with a `_formatted` suffix, extension preserved
/// (`xml` when the input has none).
///
/// Note this is a bare file name, resolved against the current directory.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(OsStr::to_string_lossy)
        .unwrap_or(Cow::Borrowed(""));
    let extension = input.extension().and_then(OsStr::to_str).unwrap_or("xml");

    PathBuf::from(format!("{stem}_formatted.{extension}"))
}

/// Run the full pipeline for the given options.
///
/// Returns the path the formatted document was written to.
///
/// # Errors
/// Returns errors from reading, parsing or writing; all carry the relevant
/// path in their context.
pub fn run(options: &FormatOptions) -> Result<PathBuf> {
    debug!(input = %options.input.display(), "loading input document");
    let mut document = Document::load(&options.input)?;

    if !options.rules.is_noop() {
        debug!(
            sort = options.rules.sort,
            filtered = options.rules.filter.len(),
            "rewriting attributes"
        );
    }
    options.rules.apply(&mut document.root);

    let output = options
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&options.input));
    debug!(output = %output.display(), indent = options.indent, "writing formatted document");

    let with_output_path = |e: std::io::Error| Error::from(e).with_path(output.clone());

    // The handle is scoped to this function; it is closed on every exit path
    let file = std::fs::File::create(&output).map_err(with_output_path)?;
    let mut writer = BufWriter::new(file);
    document
        .to_xml_with_writer(&mut writer, options.indent)
        .map_err(with_output_path)?;
    writer.flush().map_err(with_output_path)?;

    Ok(output)
}
