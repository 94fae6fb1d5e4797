//! Category keyword rules, loaded from a human-editable TOML file.
//!
//! Declaration order in the file is load-bearing: the classifier returns the
//! first matching category, so load/save must keep the order exactly.
//! The `toml` crate's `preserve_order` feature guarantees that.
//!
//! Config shape:
//!
//! ```toml
//! [Food]
//! keywords = ["swiggy", "zomato"]
//!
//! [Shopping]
//! keywords = ["amazon", "flipkart"]
//! ```

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One category: unique case-sensitive name, non-empty lowercase keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// The full ruleset, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories {
    rules: Vec<CategoryRule>,
}

impl Categories {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&body)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn parse(body: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(body).map_err(|e| Error::Config(e.to_string()))?;

        let mut rules = Vec::with_capacity(table.len());
        for (name, value) in table {
            let keywords = value
                .get("keywords")
                .and_then(|v| v.as_array())
                .ok_or_else(|| {
                    Error::Config(format!("category {name:?} has no keywords list"))
                })?;
            let keywords = keywords
                .iter()
                .map(|k| {
                    k.as_str().map(|s| s.trim().to_lowercase()).ok_or_else(|| {
                        Error::Config(format!("category {name:?} has a non-string keyword"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rules.push(CategoryRule { name, keywords });
        }
        Ok(Self { rules })
    }

    /// Persist the full ruleset, overwriting the file. Write-then-rename so
    /// a crash mid-write cannot truncate the config.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut table = toml::Table::new();
        for rule in &self.rules {
            let mut entry = toml::Table::new();
            entry.insert(
                "keywords".to_string(),
                toml::Value::Array(
                    rule.keywords
                        .iter()
                        .map(|k| toml::Value::String(k.clone()))
                        .collect(),
                ),
            );
            table.insert(rule.name.clone(), toml::Value::Table(entry));
        }
        let body = toml::to_string_pretty(&table)
            .map_err(|e| Error::Config(format!("serialize categories: {e}")))?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Insert or overwrite a category's keyword list. Overwriting keeps the
    /// category's position; a new category is appended. Keywords are
    /// lowercased; an empty list is rejected.
    pub fn add(&mut self, name: &str, keywords: Vec<String>) -> Result<()> {
        if keywords.is_empty() {
            return Err(Error::Config(format!(
                "category {name:?} needs at least one keyword"
            )));
        }
        let keywords: Vec<String> =
            keywords.iter().map(|k| k.trim().to_lowercase()).collect();
        match self.rules.iter_mut().find(|r| r.name == name) {
            Some(rule) => rule.keywords = keywords,
            None => self.rules.push(CategoryRule {
                name: name.to_string(),
                keywords,
            }),
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The ruleset as JSON, for the LLM prompt context.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for rule in &self.rules {
            map.insert(
                rule.name.clone(),
                serde_json::json!({ "keywords": rule.keywords }),
            );
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[Food]
keywords = ["SWIGGY", "zomato"]

[Shopping]
keywords = ["amazon"]
"#;

    #[test]
    fn test_parse_preserves_order_and_lowercases() {
        let cats = Categories::parse(SAMPLE).unwrap();
        assert_eq!(cats.names(), vec!["Food", "Shopping"]);
        assert_eq!(
            cats.iter().next().unwrap().keywords,
            vec!["swiggy", "zomato"]
        );
    }

    #[test]
    fn test_parse_rejects_missing_keywords() {
        let err = Categories::parse("[Food]\nlabel = \"x\"\n").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("keywords")));
    }

    #[test]
    fn test_add_appends_and_overwrites_in_place() {
        let mut cats = Categories::parse(SAMPLE).unwrap();
        cats.add("Travel", vec!["IRCTC".to_string()]).unwrap();
        assert_eq!(cats.names(), vec!["Food", "Shopping", "Travel"]);

        cats.add("Food", vec!["eazydiner".to_string()]).unwrap();
        assert_eq!(cats.names(), vec!["Food", "Shopping", "Travel"]);
        assert_eq!(cats.iter().next().unwrap().keywords, vec!["eazydiner"]);
    }

    #[test]
    fn test_add_rejects_empty_keywords() {
        let mut cats = Categories::default();
        assert!(cats.add("Food", Vec::new()).is_err());
    }

    #[test]
    fn test_save_load_round_trip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("categories.toml");

        let mut cats = Categories::parse(SAMPLE).unwrap();
        cats.add("Travel", vec!["irctc".to_string()]).unwrap();
        cats.save(&path).unwrap();

        let reloaded = Categories::load(&path).unwrap();
        assert_eq!(reloaded, cats);
        assert_eq!(reloaded.names(), vec!["Food", "Shopping", "Travel"]);
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = Categories::load("/nonexistent/categories.toml").unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("categories.toml")));
    }
}
