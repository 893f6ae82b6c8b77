use std::fmt;

use serde::{Deserialize, Serialize};

/// A reference to another API entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    #[serde(rename = "@href", skip_serializing_if = "String::is_empty")]
    pub href: String,

    #[serde(rename = "@id", skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "@type", skip_serializing_if = "String::is_empty")]
    pub kind: String,

    #[serde(rename = "@name", skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl Reference {
    pub fn new<S: Into<String>>(href: S) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.href)
        } else {
            write!(f, "{} ({})", self.name, self.href)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Reference;

    #[test]
    fn display() {
        let r = Reference::new("https://vca.example.com/api/admin/network/a");
        assert_eq!("https://vca.example.com/api/admin/network/a", r.to_string());
        let r = r.with_name("routed");
        assert_eq!(
            "routed (https://vca.example.com/api/admin/network/a)",
            r.to_string()
        );
    }
}
