//! Command-line interface for the `xmlpretty` binary.
use crate::{AttributeRules, pipeline::FormatOptions, to_xml::DEFAULT_INDENT};
use clap::Parser;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "xmlpretty",
    version,
    about = "Reformat an XML document, optionally sorting and filtering element attributes"
)]
pub struct Cli {
    /// Path to the XML input file
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Path to the output file [default: input file name with a _formatted suffix]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of spaces per indent level
    #[arg(long, value_name = "NUM", default_value_t = DEFAULT_INDENT)]
    pub indent: usize,

    /// Comma separated list of attribute names to remove from the output
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub filter: Vec<String>,

    /// Sort attributes alphabetically within each element
    #[arg(long)]
    pub sort: bool,
}
impl Cli {
    /// Convert the parsed arguments into pipeline options.
    ///
    /// Returns `None` when no input file was given.
    #[must_use]
    pub fn into_options(self) -> Option<FormatOptions> {
        let input = self.input?;

        Some(FormatOptions {
            input,
            output: self.output,
            indent: self.indent,
            rules: AttributeRules::new(self.sort, self.filter),
        })
    }
}
