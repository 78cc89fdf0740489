use std::fmt;

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};

use crate::config::FileNaming;

/// A name with its casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
}

impl NormalizedName {
    /// The variant selected by a file naming rule. `Original` keeps the
    /// declared name with path separators replaced.
    pub fn for_file(&self, naming: FileNaming) -> String {
        match naming {
            FileNaming::Original => self.original.replace(['/', '\\'], "_"),
            FileNaming::PascalCase => self.pascal_case.clone(),
            FileNaming::CamelCase => self.camel_case.clone(),
            FileNaming::SnakeCase => self.snake_case.clone(),
        }
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

/// Create a `NormalizedName` from an arbitrary string, computing all casing variants.
pub fn normalize_name(name: &str) -> NormalizedName {
    let sanitized = sanitize_identifier(name);

    NormalizedName {
        original: name.to_string(),
        pascal_case: sanitized.to_pascal_case(),
        camel_case: sanitized.to_lower_camel_case(),
        snake_case: sanitized.to_snake_case(),
    }
}

/// Collapse runs of non-alphanumeric characters into single underscores.
fn sanitize_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut prev_was_separator = false;

    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if prev_was_separator && !result.is_empty() {
                result.push('_');
            }
            result.push(ch);
            prev_was_separator = false;
        } else {
            prev_was_separator = true;
        }
    }

    if result.is_empty() {
        return "unnamed".to_string();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        let n = normalize_name("getPerson");
        assert_eq!(n.pascal_case, "GetPerson");
        assert_eq!(n.camel_case, "getPerson");
        assert_eq!(n.snake_case, "get_person");
    }

    #[test]
    fn test_separators() {
        let n = normalize_name("pet-store items");
        assert_eq!(n.pascal_case, "PetStoreItems");
        assert_eq!(n.snake_case, "pet_store_items");
    }

    #[test]
    fn test_empty_after_sanitizing() {
        assert_eq!(normalize_name("--").snake_case, "unnamed");
    }

    #[test]
    fn test_file_naming() {
        let n = normalize_name("OrderItem");
        assert_eq!(n.for_file(FileNaming::Original), "OrderItem");
        assert_eq!(n.for_file(FileNaming::CamelCase), "orderItem");
        assert_eq!(n.for_file(FileNaming::SnakeCase), "order_item");
        assert_eq!(normalize_name("a/b").for_file(FileNaming::Original), "a_b");
    }
}
