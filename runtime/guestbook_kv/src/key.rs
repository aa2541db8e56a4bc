use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The identifier of a record inside a namespace.
///
/// The derived ordering is the one exposed by [`KvStore::list`](crate::KvStore::list):
/// every [`KeyPart::Int`] sorts before every [`KeyPart::Text`].
pub enum KeyPart {
    /// An integer key part, e.g. an epoch timestamp.
    Int(i64),
    /// A string key part, e.g. a title.
    Text(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Int(n) => write!(f, "{n}"),
            KeyPart::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// The full key of a record: a namespace plus a [`KeyPart`].
///
/// Field order matters: keys are compared by namespace first.
pub struct KvKey {
    namespace: Cow<'static, str>,
    part: KeyPart,
}

impl KvKey {
    /// Build a new key.
    pub fn new<N, P>(namespace: N, part: P) -> Self
    where
        N: Into<Cow<'static, str>>,
        P: Into<KeyPart>,
    {
        Self {
            namespace: namespace.into(),
            part: part.into(),
        }
    }

    /// The smallest possible key inside `namespace`.
    ///
    /// Useful as the lower bound of a range scan over a namespace.
    pub fn namespace_start<N>(namespace: N) -> Self
    where
        N: Into<Cow<'static, str>>,
    {
        Self::new(namespace, KeyPart::Int(i64::MIN))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn part(&self) -> &KeyPart {
        &self.part
    }

    /// Split the key into its namespace and key part.
    pub fn into_parts(self) -> (Cow<'static, str>, KeyPart) {
        (self.namespace, self.part)
    }
}

impl fmt::Display for KvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, ", self.namespace)?;
        match &self.part {
            KeyPart::Int(n) => write!(f, "{n}]"),
            KeyPart::Text(s) => write!(f, "{s:?}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyPart, KvKey};

    #[test]
    fn integers_sort_numerically_and_before_text() {
        let mut parts = vec![
            KeyPart::Text("a".into()),
            KeyPart::Int(10),
            KeyPart::Int(-3),
            KeyPart::Text("B".into()),
            KeyPart::Int(2),
        ];
        parts.sort();
        assert_eq!(
            parts,
            vec![
                KeyPart::Int(-3),
                KeyPart::Int(2),
                KeyPart::Int(10),
                KeyPart::Text("B".into()),
                KeyPart::Text("a".into()),
            ]
        );
    }

    #[test]
    fn namespace_takes_precedence() {
        let article = KvKey::new("articles", "zzz");
        let comment = KvKey::new("comments", i64::MIN);
        assert!(article < comment);
    }

    #[test]
    fn namespace_start_is_the_lower_bound() {
        let start = KvKey::namespace_start("comments");
        assert!(start <= KvKey::new("comments", i64::MIN));
        assert!(start < KvKey::new("comments", ""));
        assert!(start > KvKey::new("articles", "anything"));
    }

    #[test]
    fn display_mirrors_the_tuple_notation() {
        assert_eq!(KvKey::new("articles", 42i64).to_string(), r#"["articles", 42]"#);
        assert_eq!(
            KvKey::new("comments", "Hello").to_string(),
            r#"["comments", "Hello"]"#
        );
    }
}
