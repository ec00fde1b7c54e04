//! XML formatting module
//!
//! Use [`Document::to_xml`] unless you need to write the XML to a file or other writer.
use crate::{
    Declaration, Document, Element, Node, QName,
    dtd::{EntityDefinition, ExternalId},
};
use htmlentity::entity::ICodedDataTrait;
use htmlentity::entity::{CharacterSet, EncodeType, encode};
use std::io::Write;

/// Default number of spaces per indent level.
pub const DEFAULT_INDENT: usize = 3;

/// Flatten a document as a formatted XML string using the given writer.
///
/// `indent` is the number of spaces written per nesting level.
///
/// # Errors
/// This function will return an error if the writer fails, or if a string in
/// the document cannot be entity encoded.
pub fn write_xml(
    writer: &mut dyn Write,
    document: &Document,
    indent: usize,
) -> std::io::Result<()> {
    let pad_unit = " ".repeat(indent);

    //
    // Write the XML declaration
    if let Some(declaration) = &document.declaration {
        write_declaration(writer, declaration)?;
    }

    //
    // Write the prolog section
    for item in &document.prolog {
        write_misc(writer, item, &pad_unit, 0)?;
    }

    //
    // Write the root element, non-recursively
    let mut stack = vec![(WriteTask::Open(&document.root), 0usize)];
    while let Some((task, depth)) = stack.pop() {
        let pad = pad_unit.repeat(depth);

        match task {
            WriteTask::Close(name) => {
                writeln!(writer, "{pad}</{name}>")?;
            }

            WriteTask::Node(node) => {
                if let Node::Element(element) = node {
                    stack.push((WriteTask::Open(element), depth));
                } else {
                    write_misc(writer, node, &pad_unit, depth)?;
                }
            }

            WriteTask::Open(element) => {
                write!(writer, "{pad}<{name}", name = element.name)?;

                for attribute in &element.attributes {
                    let value = encode_entities(&attribute.value)?;
                    write!(writer, r#" {name}="{value}""#, name = attribute.name)?;
                }

                if element.children.is_empty() {
                    writeln!(writer, " />")?;
                    continue;
                }

                writeln!(writer, ">")?;
                stack.push((WriteTask::Close(&element.name), depth));
                for child in element.children.iter().rev() {
                    stack.push((WriteTask::Node(child), depth + 1));
                }
            }
        }
    }

    //
    // Write the epilog section
    // Not valid XML but, can exist
    for item in &document.epilog {
        write_misc(writer, item, &pad_unit, 0)?;
    }

    Ok(())
}

fn write_declaration(writer: &mut dyn Write, declaration: &Declaration) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="{version}""#,
        version = declaration.version
    )?;

    if let Some(encoding) = &declaration.encoding {
        write!(writer, r#" encoding="{encoding}""#)?;
    }

    if let Some(standalone) = declaration.standalone {
        let standalone = if standalone { "yes" } else { "no" };
        write!(writer, r#" standalone="{standalone}""#)?;
    }

    writeln!(writer, " ?>")?;
    Ok(())
}

/// Entity-encode special characters for output.
///
/// Only text and attribute values go through here; comments, CDATA and
/// processing instructions are emitted verbatim.
fn encode_entities(input: &str) -> std::io::Result<String> {
    encode(
        input.as_bytes(),
        &EncodeType::NamedOrHex,
        &CharacterSet::SpecialChars,
    )
    .to_string()
    .map_err(std::io::Error::other)
}

fn write_misc(
    writer: &mut dyn Write,
    node: &Node,
    pad_unit: &str,
    depth: usize,
) -> std::io::Result<()> {
    let pad = pad_unit.repeat(depth);

    match node {
        Node::Comment(text) => {
            writeln!(writer, "{pad}<!--{text}-->")?;
        }

        Node::Text(text) => {
            let text = encode_entities(text)?;
            writeln!(writer, "{pad}{text}")?;
        }

        Node::Cdata(content) => {
            writeln!(writer, "{pad}<![CDATA[{content}]]>")?;
        }

        Node::ProcessingInstruction(pi) => {
            write!(writer, "{pad}<?{target}", target = pi.target)?;

            if let Some(content) = &pi.content {
                write!(writer, " {content}")?;
            }

            writeln!(writer, "?>")?;
        }

        Node::Doctype(doctype) => {
            write!(writer, "{pad}<!DOCTYPE {name}", name = doctype.name)?;

            if let Some(external_id) = &doctype.external_id {
                match external_id {
                    ExternalId::Public(public, system) => {
                        write!(writer, r#" PUBLIC "{public}" "{system}""#)?;
                    }
                    ExternalId::System(system) => {
                        write!(writer, r#" SYSTEM "{system}""#)?;
                    }
                }
            }

            if !doctype.entities.is_empty() {
                writeln!(writer, " [")?;
                for entity in &doctype.entities {
                    let pad = pad_unit.repeat(depth + 1);
                    write!(writer, "{pad}<!ENTITY {name}", name = entity.name)?;

                    match &entity.definition {
                        EntityDefinition::Value(value) => {
                            write!(writer, r#" "{value}""#)?;
                        }

                        EntityDefinition::External(ExternalId::System(system)) => {
                            write!(writer, r#" SYSTEM "{system}""#)?;
                        }

                        EntityDefinition::External(ExternalId::Public(public, system)) => {
                            write!(writer, r#" PUBLIC "{public}" "{system}""#)?;
                        }
                    }

                    writeln!(writer, ">")?;
                }
                write!(writer, "]")?;
            }

            writeln!(writer, ">")?;
        }

        Node::Element(_) => (),
    }

    Ok(())
}

enum WriteTask<'doc> {
    Open(&'doc Element),
    Node(&'doc Node),
    Close(&'doc QName),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Document;

    #[test]
    fn test_write_declaration() {
        let doc =
            Document::parse("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?><root />")
                .unwrap();
        let formatted = doc.to_xml(3).unwrap();
        assert!(formatted.starts_with(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\" ?>\n"
        ));
    }

    #[test]
    fn test_write_empty_root() {
        let doc = Document::parse("<root></root>").unwrap();
        assert_eq!(doc.to_xml(3).unwrap(), "<root />\n");
    }

    #[test]
    fn test_write_nested_elements() {
        let doc = Document::parse("<root><child/></root>").unwrap();
        assert_eq!(doc.to_xml(3).unwrap(), "<root>\n   <child />\n</root>\n");
    }

    #[test]
    fn test_write_indent_width() {
        let doc = Document::parse("<a><b><c/></b></a>").unwrap();
        assert_eq!(
            doc.to_xml(4).unwrap(),
            "<a>\n    <b>\n        <c />\n    </b>\n</a>\n"
        );
    }

    #[test]
    fn test_write_attributes_encoded() {
        let doc = Document::parse(r#"<root title="Cats &amp; Dogs" id="1" />"#).unwrap();
        assert_eq!(
            doc.to_xml(3).unwrap(),
            "<root title=\"Cats &amp; Dogs\" id=\"1\" />\n"
        );
    }

    #[test]
    fn test_write_prefixed_names() {
        let doc = Document::parse(r#"<bk:book bk:id="bk101"><bk:title>T</bk:title></bk:book>"#)
            .unwrap();
        let formatted = doc.to_xml(3).unwrap();
        assert!(formatted.contains("<bk:book bk:id=\"bk101\">"));
        assert!(formatted.contains("   <bk:title>"));
    }

    #[test]
    fn test_write_text_encoded() {
        let doc = Document::parse("<a>1 &lt; 2</a>").unwrap();
        assert_eq!(doc.to_xml(3).unwrap(), "<a>\n   1 &lt; 2\n</a>\n");
    }

    #[test]
    fn test_write_cdata_verbatim() {
        let doc = Document::parse("<a><![CDATA[if (a < b) { run(); }]]></a>").unwrap();
        assert_eq!(
            doc.to_xml(3).unwrap(),
            "<a>\n   <![CDATA[if (a < b) { run(); }]]>\n</a>\n"
        );
    }

    #[test]
    fn test_write_comments_verbatim() {
        let doc = Document::parse("<!-- prolog --><root><!-- inner --></root><!-- epilog -->")
            .unwrap();
        let formatted = doc.to_xml(3).unwrap();
        assert!(formatted.starts_with("<!-- prolog -->\n"));
        assert!(formatted.contains("\n   <!-- inner -->\n"));
        assert!(formatted.ends_with("<!-- epilog -->\n"));
    }

    #[test]
    fn test_write_doctype() {
        let src = "<!DOCTYPE note [\n<!ENTITY writer \"Duke\">\n]><note>text</note>";
        let doc = Document::parse(src).unwrap();
        let formatted = doc.to_xml(3).unwrap();
        assert!(formatted.contains("<!DOCTYPE note [\n   <!ENTITY writer \"Duke\">\n]>\n"));
    }
}
