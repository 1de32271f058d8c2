use serde::{Deserialize, Serialize};
use std::fmt;

/// Two-part identifier naming a remote object/service instance.
///
/// The canonical string rendering is `category/name`, or just `name`
/// when the category is empty. Serde keeps the raw structured form;
/// the formatter normalizes to the string form where its contract
/// requires it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub category: String,
    pub name: String,
}

impl Identity {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Identity { category: category.into(), name: name.into() }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}/{}", self.category, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_category_slash_name() {
        assert_eq!(Identity::new("cat", "name").to_string(), "cat/name");
    }

    #[test]
    fn empty_category_renders_name_only() {
        assert_eq!(Identity::new("", "worker").to_string(), "worker");
    }
}
