//! Parsing XML source text into an owned [`Document`] tree.
use crate::{
    dtd::Doctype,
    error::{Error, ErrorKind, Result, TextSpan, bail},
    node::{Attribute, Element, Node, Pi, QName},
};
use std::path::Path;
use xmlparser::{ElementEnd, Token};

/// An XML document that has been parsed into a tree. It is deliberately flexible with invalid XML.
///
/// The root of the tree contains:
/// - The XML declaration node, if present
/// - Any items before the root element (DOCTYPE, comments, processing instructions, etc)
/// - The root element itself, which is a tree of nodes
/// - Any items after the root element (comments, processing instructions, etc) - This is not valid XML, but will be parsed
///
/// Other things to note:
/// - Names of elements and attributes can have a namespace prefix
/// - Element attributes can have duplicates, but `Element::attribute` will only return the last one defined
/// - The parser will not attempt to recover from invalid closing tags, or unclosed tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// The `<?xml` declaration node.
    pub declaration: Option<Declaration>,

    /// Nodes occurring before the root element.
    /// This includes comments, processing instructions and the DOCTYPE.
    pub prolog: Vec<Node>,

    /// The root of the tree.
    pub root: Element,

    /// Nodes occurring after the root element.
    ///
    /// Note that strictly speaking, this is not valid XML
    pub epilog: Vec<Node>,
}
impl Document {
    /// Parses a document from the given source string.
    ///
    /// Entity references in text and attribute values are decoded here, and
    /// re-encoded on serialization. Whitespace-only text is dropped, since the
    /// old formatting is discarded anyway.
    ///
    /// # Errors
    /// Returns errors if the XML is invalid
    ///
    /// # Example
    /// ```rust
    /// use xmlpretty::Document;
    ///
    /// let doc = Document::parse("<test><test2>test</test2></test>").unwrap();
    /// assert_eq!(doc.root.name, "test");
    /// ```
    #[expect(clippy::too_many_lines, reason = "State machine; what did you expect")]
    pub fn parse(src: &str) -> Result<Self> {
        let mut tokenizer = xmlparser::Tokenizer::from(src);

        let mut state = ParserState::Prolog;
        let mut stack: Vec<Element> = vec![];

        let mut prolog = vec![];
        let mut epilog = vec![];
        let mut declaration = None;

        loop {
            // Get the next token
            let Some(next) = tokenizer.next() else {
                let root = match stack.len() {
                    0 => bail!(src, ErrorKind::UnexpectedEof),
                    1 => stack.pop().unwrap(),
                    _ => {
                        let last = stack.pop().unwrap();
                        bail!(
                            src,
                            TextSpan::end_of(src),
                            ErrorKind::UnclosedTag(last.name.qualified())
                        );
                    }
                };

                return Ok(Self {
                    declaration,
                    prolog,
                    root,
                    epilog,
                });
            };
            let next = match next {
                Ok(token) => token,
                Err(e) => {
                    bail!(src, ErrorKind::Xml(e));
                }
            };

            //
            // At this point, next is significant.
            match state {
                ParserState::Prolog => match next {
                    Token::ElementStart { prefix, local, .. } => {
                        stack.push(Element::new(qname(prefix, local)));
                        state = ParserState::TagAttributes;
                    }

                    Token::Comment { text, .. } => {
                        prolog.push(Node::Comment(text.as_str().to_string()));
                    }

                    Token::Declaration {
                        version,
                        encoding,
                        standalone,
                        ..
                    } => {
                        if !prolog.is_empty() {
                            let span = token_span(&next);
                            bail!(src, span.into(), ErrorKind::DeclarationNotFirst);
                        }

                        declaration = Some(Declaration {
                            version: version.as_str().to_string(),
                            encoding: encoding.map(|s| s.as_str().to_string()),
                            standalone,
                        });
                    }

                    Token::ProcessingInstruction {
                        target, content, ..
                    } => {
                        let node = Pi::new(
                            target.as_str(),
                            content.map(|s| s.as_str().to_string()),
                        );
                        prolog.push(Node::ProcessingInstruction(node));
                    }

                    Token::EmptyDtd { .. } | Token::DtdStart { .. } => {
                        let node = Doctype::parse(next, &mut tokenizer, src)?;
                        prolog.push(Node::Doctype(node));
                    }

                    Token::Cdata { text, .. } => {
                        prolog.push(Node::Cdata(text.as_str().to_string()));
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(
                            src,
                            span.into(),
                            msg = "Unexpected {} in prolog section",
                            token_kind(&next)
                        );
                    }
                },

                ParserState::TagAttributes => match next {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        span,
                        ..
                    } => {
                        let value = match decode_entities(value.as_str()) {
                            Ok(value) => value,
                            Err(e) => bail!(src, span.into(), msg = "{e}"),
                        };

                        let Some(element) = stack.last_mut() else {
                            bail!(
                                src,
                                span.into(),
                                msg = "Bug; Cannot apply attribute; stack is empty!"
                            );
                        };

                        element
                            .attributes
                            .push(Attribute::new(qname(prefix, local), value));
                    }

                    Token::Comment { text, .. } => {
                        let Some(element) = stack.last_mut() else {
                            let span = token_span(&next);
                            bail!(
                                src,
                                span.into(),
                                msg = "Bug; Cannot apply comment; stack is empty!"
                            );
                        };

                        element.children.push(Node::Comment(text.as_str().to_string()));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Open,
                        ..
                    } => {
                        state = ParserState::TagChildren;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Empty,
                        span,
                        ..
                    } => {
                        let Some(element) = stack.pop() else {
                            bail!(src, span.into(), msg = "Bug; Cannot close tag; stack is empty!");
                        };

                        let Some(parent) = stack.last_mut() else {
                            state = ParserState::Epilog;
                            stack.push(element);
                            continue;
                        };

                        parent.children.push(Node::Element(element));
                        state = ParserState::TagChildren;
                    }

                    Token::Text { .. } => {
                        // ignore
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(
                            src,
                            span.into(),
                            msg = "Unexpected {} in tag attributes",
                            token_kind(&next)
                        );
                    }
                },

                ParserState::TagChildren => match next {
                    Token::ElementStart { prefix, local, .. } => {
                        stack.push(Element::new(qname(prefix, local)));
                        state = ParserState::TagAttributes;
                    }

                    Token::Cdata { text, span, .. } => {
                        let Some(element) = stack.last_mut() else {
                            bail!(src, span.into(), msg = "Bug; Cannot apply cdata; stack is empty!");
                        };

                        element.children.push(Node::Cdata(text.as_str().to_string()));
                    }

                    Token::Text { text, .. } => {
                        let Some(element) = stack.last_mut() else {
                            bail!(
                                src,
                                TextSpan::from(text),
                                msg = "Bug; Cannot apply text; stack is empty!"
                            );
                        };

                        // Old indentation is discarded; whitespace-only runs carry no content
                        let trimmed = text.as_str().trim();
                        if trimmed.is_empty() {
                            continue;
                        }

                        let trimmed = match decode_entities(trimmed) {
                            Ok(text) => text,
                            Err(e) => bail!(src, TextSpan::from(text), msg = "{e}"),
                        };
                        element.children.push(Node::Text(trimmed));
                    }

                    Token::Comment { text, .. } => {
                        let Some(element) = stack.last_mut() else {
                            let span = token_span(&next);
                            bail!(
                                src,
                                span.into(),
                                msg = "Bug; Cannot apply comment; stack is empty!"
                            );
                        };

                        element.children.push(Node::Comment(text.as_str().to_string()));
                    }

                    Token::ProcessingInstruction {
                        target,
                        content,
                        span,
                        ..
                    } => {
                        let Some(element) = stack.last_mut() else {
                            bail!(
                                src,
                                span.into(),
                                msg = "Bug; Cannot apply processing instruction; stack is empty!"
                            );
                        };

                        let pi = Pi::new(
                            target.as_str(),
                            content.map(|s| s.as_str().to_string()),
                        );
                        element.children.push(Node::ProcessingInstruction(pi));
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        span,
                        ..
                    } => {
                        let Some(element) = stack.pop() else {
                            bail!(src, span.into(), msg = "Bug; Cannot close tag; stack is empty!");
                        };

                        let closing = qname(prefix, local);
                        if element.name != closing {
                            bail!(
                                src,
                                span.into(),
                                ErrorKind::MismatchedTag {
                                    open: element.name.qualified(),
                                    closing: closing.qualified(),
                                }
                            );
                        }

                        state = ParserState::TagChildren;
                        if let Some(parent) = stack.last_mut() {
                            parent.children.push(Node::Element(element));
                        } else {
                            state = ParserState::Epilog;
                            stack.push(element);
                            continue;
                        }
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(
                            src,
                            span.into(),
                            msg = "Unexpected {} inside tag",
                            token_kind(&next)
                        );
                    }
                },

                ParserState::Epilog => match next {
                    Token::Comment { text, .. } => {
                        epilog.push(Node::Comment(text.as_str().to_string()));
                    }

                    Token::Cdata { text, .. } => {
                        epilog.push(Node::Cdata(text.as_str().to_string()));
                    }

                    Token::ProcessingInstruction {
                        target, content, ..
                    } => {
                        let node = Pi::new(
                            target.as_str(),
                            content.map(|s| s.as_str().to_string()),
                        );
                        epilog.push(Node::ProcessingInstruction(node));
                    }

                    _ => {
                        let span = token_span(&next);
                        bail!(
                            src,
                            span.into(),
                            msg = "Unexpected {} after root element",
                            token_kind(&next)
                        );
                    }
                },
            }
        }
    }

    /// Reads and parses a document from a file.
    ///
    /// The source text is dropped once parsing completes; errors carry the
    /// path for reporting.
    ///
    /// # Errors
    /// Returns errors if the file cannot be read, or if the XML is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).with_path(path.to_path_buf()))?;

        Self::parse(&source).map_err(|e| e.with_path(path.to_path_buf()))
    }

    /// Create a formatted XML string from this document.
    ///
    /// `indent` is the number of spaces used per nesting level.
    ///
    /// # Errors
    /// Can fail if a string in the document cannot be entity encoded.
    ///
    /// # Example
    /// ```rust
    /// use xmlpretty::Document;
    ///
    /// let doc = Document::parse("<test><test2>test</test2></test>").unwrap();
    /// let formatted = doc.to_xml(4).unwrap();
    /// assert_eq!(formatted, "<test>\n    <test2>\n        test\n    </test2>\n</test>\n");
    /// ```
    pub fn to_xml(&self, indent: usize) -> std::io::Result<String> {
        let mut buffer = vec![];
        self.to_xml_with_writer(&mut buffer, indent)?;

        let buffer = String::from_utf8(buffer).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to convert to UTF-8: {e}"),
            )
        })?;
        Ok(buffer)
    }

    /// Write this document as a formatted XML string using the given writer.
    ///
    /// See [`Document::to_xml`] for more details.
    ///
    /// # Errors
    /// Can fail if a string in the document cannot be entity encoded.
    pub fn to_xml_with_writer<W: std::io::Write>(
        &self,
        writer: &mut W,
        indent: usize,
    ) -> std::io::Result<()> {
        crate::to_xml::write_xml(writer, self, indent)
    }
}

/// The XML declaration node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// The version of the XML declaration.
    pub version: String,

    /// The encoding of the XML declaration.
    pub encoding: Option<String>,

    /// The standalone attribute of the XML declaration.
    pub standalone: Option<bool>,
}

#[derive(PartialEq, Debug)]
enum ParserState {
    Prolog,
    TagAttributes,
    TagChildren,
    Epilog,
}

/// Build a [`QName`] from tokenizer spans; an empty prefix means no prefix.
fn qname(prefix: xmlparser::StrSpan<'_>, local: xmlparser::StrSpan<'_>) -> QName {
    let prefix = if prefix.as_str().is_empty() {
        None
    } else {
        Some(prefix.as_str())
    };
    QName::new(prefix, local.as_str())
}

/// Decode entity references (`&amp;`, `&#xE9;`, ...) in text or attribute values.
pub(crate) fn decode_entities(input: &str) -> std::io::Result<String> {
    use htmlentity::entity::ICodedDataTrait;

    if !input.contains('&') {
        return Ok(input.to_string());
    }

    htmlentity::entity::decode(input.as_bytes())
        .to_string()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Failed to convert to UTF-8: {e}"),
            )
        })
}

pub(crate) fn token_span<'a>(token: &Token<'a>) -> xmlparser::StrSpan<'a> {
    match token {
        Token::Declaration { span, .. }
        | Token::ProcessingInstruction { span, .. }
        | Token::Comment { span, .. }
        | Token::DtdStart { span, .. }
        | Token::EmptyDtd { span, .. }
        | Token::EntityDeclaration { span, .. }
        | Token::DtdEnd { span, .. }
        | Token::ElementStart { span, .. }
        | Token::Attribute { span, .. }
        | Token::ElementEnd { span, .. }
        | Token::Cdata { span, .. } => *span,
        Token::Text { text, .. } => *text,
    }
}

pub(crate) fn token_kind(token: &Token<'_>) -> &'static str {
    match token {
        Token::Declaration { .. } => "declaration",
        Token::ProcessingInstruction { .. } => "processing instruction",
        Token::Comment { .. } => "comment",
        Token::DtdStart { .. } | Token::EmptyDtd { .. } => "DTD",
        Token::EntityDeclaration { .. } => "entity declaration",
        Token::DtdEnd { .. } => "DTD end",
        Token::ElementStart { .. } => "element start",
        Token::Attribute { .. } => "attribute",
        Token::ElementEnd { .. } => "element end",
        Token::Text { .. } => "text",
        Token::Cdata { .. } => "CDATA",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse("<test><test2>test</test2></test>").unwrap();
        assert_eq!(doc.root.name, "test");
        assert_eq!(doc.root.children.len(), 1);
    }

    #[test]
    fn test_parse_declaration() {
        let doc = Document::parse("<?xml version=\"1.0\" encoding=\"UTF-8\"?><root />").unwrap();
        let declaration = doc.declaration.unwrap();
        assert_eq!(declaration.version, "1.0");
        assert_eq!(declaration.encoding.as_deref(), Some("UTF-8"));
        assert!(declaration.standalone.is_none());
    }

    #[test]
    fn test_parse_attributes() {
        let doc = Document::parse(r#"<book id="bk101" bk:genre="fantasy" />"#).unwrap();
        assert_eq!(doc.root.attribute("id"), Some("bk101"));
        assert_eq!(doc.root.attribute("bk:genre"), Some("fantasy"));
    }

    #[test]
    fn test_parse_decodes_entities() {
        let doc = Document::parse(r#"<a title="Cats &amp; Dogs">1 &lt; 2</a>"#).unwrap();
        assert_eq!(doc.root.attribute("title"), Some("Cats & Dogs"));
        assert_eq!(doc.root.children[0], Node::Text("1 < 2".to_string()));
    }

    #[test]
    fn test_parse_trims_text() {
        let doc = Document::parse("<a>\n   content   \n</a>").unwrap();
        assert_eq!(doc.root.children, vec![Node::Text("content".to_string())]);

        let doc = Document::parse("<a>\n   \n</a>").unwrap();
        assert!(doc.root.children.is_empty());
    }

    #[test]
    fn test_parse_prolog_and_epilog() {
        let src = "<?xml version=\"1.0\"?><!-- Comment --><root></root><?pi?>";
        let doc = Document::parse(src).unwrap();
        assert!(doc.declaration.is_some());
        assert_eq!(doc.prolog.len(), 1);
        assert_eq!(doc.epilog.len(), 1);
    }

    #[test]
    fn test_parse_unclosed_tag() {
        let result = Document::parse("<test><test2>test");
        let error = result.unwrap_err();
        assert!(matches!(error.kind, ErrorKind::UnclosedTag(_)));
    }

    #[test]
    fn test_parse_mismatched_tag() {
        let result = Document::parse("<test><test2>test</test>");
        let error = result.unwrap_err();
        assert!(matches!(error.kind, ErrorKind::MismatchedTag { .. }));
    }

    #[test]
    fn test_parse_empty_input() {
        let result = Document::parse("");
        let error = result.unwrap_err();
        assert!(matches!(error.kind, ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_load_missing_file() {
        let error = Document::load("does_not_exist.xml").unwrap_err();
        assert!(matches!(error.kind, ErrorKind::Io(_)));
        assert!(error.to_string().contains("does_not_exist.xml"));
    }

    #[test]
    fn test_duplicate_attributes_kept_on_parse() {
        let doc = Document::parse(r#"<a id="1" id="2" />"#).unwrap();
        assert_eq!(doc.root.attributes.len(), 2);
        assert_eq!(doc.root.attribute("id"), Some("2"));
    }
}
