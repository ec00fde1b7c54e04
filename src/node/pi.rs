/// A processing instruction node:
/// `<?target content?>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pi {
    /// The target of the processing instruction.
    pub target: String,

    /// The content of the processing instruction, if any.
    pub content: Option<String>,
}
impl Pi {
    /// Create a new processing instruction node.
    pub fn new(target: impl Into<String>, content: Option<String>) -> Self {
        Self {
            target: target.into(),
            content,
        }
    }
}
