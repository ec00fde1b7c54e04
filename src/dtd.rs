//! Document type declarations: `<!DOCTYPE name ...>`
//!
//! The declaration is carried through from input to output verbatim; the
//! crate performs no validation against it.
use crate::error::{Result, TextSpan, bail};
use xmlparser::{Token, Tokenizer};

/// Representation of the [ExternalID](https://www.w3.org/TR/xml/#NT-ExternalID) value.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExternalId {
    System(String),
    Public(String, String),
}
impl From<xmlparser::ExternalId<'_>> for ExternalId {
    fn from(external_id: xmlparser::ExternalId<'_>) -> Self {
        match external_id {
            xmlparser::ExternalId::System(system) => ExternalId::System(system.as_str().to_string()),
            xmlparser::ExternalId::Public(public, system) => ExternalId::Public(
                public.as_str().to_string(),
                system.as_str().to_string(),
            ),
        }
    }
}

/// Representation of the [EntityDef](https://www.w3.org/TR/xml/#NT-EntityDef) value.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityDefinition {
    Value(String),
    External(ExternalId),
}
impl From<xmlparser::EntityDefinition<'_>> for EntityDefinition {
    fn from(entity_definition: xmlparser::EntityDefinition<'_>) -> Self {
        match entity_definition {
            xmlparser::EntityDefinition::EntityValue(value) => {
                EntityDefinition::Value(value.as_str().to_string())
            }
            xmlparser::EntityDefinition::ExternalId(external_id) => {
                EntityDefinition::External(external_id.into())
            }
        }
    }
}

/// An entity declaration inside a DOCTYPE:
/// `<!ENTITY name "value">`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityDecl {
    /// The name of the entity.
    pub name: String,

    /// The definition of the entity.
    pub definition: EntityDefinition,
}

/// The document type declaration of an XML document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Doctype {
    /// The root element name the declaration applies to.
    pub name: String,

    /// The external ID of the declaration, if any.
    pub external_id: Option<ExternalId>,

    /// The entities declared inline, if any.
    pub entities: Vec<EntityDecl>,
}
impl Doctype {
    pub(crate) fn parse(
        start: Token<'_>,
        tokenizer: &mut Tokenizer<'_>,
        src: &str,
    ) -> Result<Self> {
        let mut node = match start {
            Token::DtdStart {
                name, external_id, ..
            } => Doctype {
                name: name.as_str().to_string(),
                external_id: external_id.map(Into::into),
                entities: Vec::new(),
            },

            Token::EmptyDtd {
                name, external_id, ..
            } => {
                return Ok(Doctype {
                    name: name.as_str().to_string(),
                    external_id: external_id.map(Into::into),
                    entities: Vec::new(),
                });
            }

            _ => {
                let span = crate::document::token_span(&start);
                bail!(src, span.into(), msg = "Expected DTD start or empty DTD");
            }
        };

        loop {
            let token = match tokenizer.next() {
                None => bail!(
                    src,
                    TextSpan::end_of(src),
                    crate::error::ErrorKind::UnexpectedEof
                ),

                Some(Err(e)) => bail!(src, crate::error::ErrorKind::Xml(e)),

                Some(Ok(token)) => token,
            };

            match token {
                Token::DtdEnd { .. } => return Ok(node),

                Token::EntityDeclaration {
                    name, definition, ..
                } => {
                    node.entities.push(EntityDecl {
                        name: name.as_str().to_string(),
                        definition: definition.into(),
                    });
                }

                _ => {
                    let span = crate::document::token_span(&token);
                    bail!(src, span.into(), msg = "Expected Entity or DTD end");
                }
            }
        }
    }
}
