/// The name of an element or attribute, with an optional namespace prefix:
/// `prefix:local`
///
/// Prefixes are carried through verbatim; the crate performs no namespace
/// resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// The namespace prefix, if any.
    pub prefix: Option<String>,

    /// The local portion of the name.
    pub local: String,
}
impl QName {
    /// Create a new name from an optional prefix and a local part.
    pub fn new<T: Into<String>>(prefix: Option<T>, local: T) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            local: local.into(),
        }
    }

    /// The qualified form of the name (`prefix:local`, or just `local`).
    ///
    /// This is the identity used for attribute sorting and filtering.
    #[must_use]
    pub fn qualified(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{local}", local = self.local),
            None => self.local.clone(),
        }
    }

    /// Compare the name with a prefix and local part.
    #[must_use]
    pub fn equals(&self, prefix: Option<&str>, local: &str) -> bool {
        self.prefix.as_deref() == prefix && self.local == local
    }
}
impl std::fmt::Display for QName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(prefix) = &self.prefix {
            write!(f, "{prefix}:{local}", local = self.local)
        } else {
            write!(f, "{local}", local = self.local)
        }
    }
}
impl PartialEq<&str> for QName {
    fn eq(&self, other: &&str) -> bool {
        self.qualified() == *other
    }
}
impl PartialEq<str> for QName {
    fn eq(&self, other: &str) -> bool {
        self.qualified() == other
    }
}
impl From<&str> for QName {
    fn from(name: &str) -> Self {
        match name.split_once(':') {
            Some((prefix, local)) => Self::new(Some(prefix), local),
            None => Self::new(None, name),
        }
    }
}
impl From<String> for QName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_with_prefix() {
        let name = QName::new(Some("bk"), "id");
        assert_eq!(name.qualified(), "bk:id");
        assert_eq!(name.to_string(), "bk:id");
        assert_eq!(name, "bk:id");
    }

    #[test]
    fn test_qualified_without_prefix() {
        let name = QName::new(None, "id");
        assert_eq!(name.qualified(), "id");
        assert_eq!(name, "id");
    }

    #[test]
    fn test_from_str_splits_prefix() {
        let name = QName::from("bk:id");
        assert_eq!(name.prefix.as_deref(), Some("bk"));
        assert_eq!(name.local, "id");

        let name = QName::from("id");
        assert!(name.prefix.is_none());
        assert_eq!(name.local, "id");
    }

    #[test]
    fn test_equals() {
        let name = QName::new(Some("bk"), "id");
        assert!(name.equals(Some("bk"), "id"));
        assert!(!name.equals(None, "id"));
        assert!(!name.equals(Some("bk"), "genre"));
    }
}
