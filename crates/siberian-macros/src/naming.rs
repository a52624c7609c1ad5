//! Stems for generated member names
//!
//! Every companion member of a mocked function is named `<stem><Suffix>`.
//! The stem is the function's base name followed by each non-wildcard
//! argument label with its first letter upper-cased:
//!
//! ```text
//! func fetch(id: Int, for key: String)  ->  fetchIdFor
//! func reset(_ value: Int)              ->  reset
//! ```
//!
//! Overloads that differ only in parameter types or wildcard labels map to
//! the same stem. [`NamingStrategy::Shared`] keeps that collision as is;
//! [`NamingStrategy::Indexed`] appends `2`, `3`, ... to repeats.

use crate::model::FunctionSignature;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// Colliding signatures share one set of companion members
    #[default]
    Shared,
    /// Repeated stems get a numeric suffix
    Indexed,
}

/// Base for the names of one function's companion members.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NameStem(String);

impl NameStem {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<stem><suffix>`, e.g. `fetchIdCallsCount`
    pub fn member(&self, suffix: &str) -> String {
        format!("{}{}", self.0, suffix)
    }
}

impl fmt::Display for NameStem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the stem of a function.
pub fn stem(function: &FunctionSignature) -> NameStem {
    let mut name = function.name.clone();
    for label in function.params.iter().filter_map(|p| p.external_name.as_deref()) {
        name.push_str(&capitalize_first(label));
    }
    NameStem(name)
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Hands out stems for the functions of one interface.
pub struct StemAllocator {
    strategy: NamingStrategy,
    seen: FxHashMap<String, usize>,
}

impl StemAllocator {
    pub fn new(strategy: NamingStrategy) -> Self {
        Self {
            strategy,
            seen: FxHashMap::default(),
        }
    }

    pub fn allocate(&mut self, function: &FunctionSignature) -> NameStem {
        let base = stem(function);
        let count = self.seen.entry(base.0.clone()).or_insert(0);
        *count += 1;

        match self.strategy {
            NamingStrategy::Indexed if *count > 1 => {
                tracing::trace!(stem = %base, index = *count, "disambiguating repeated stem");
                NameStem(format!("{}{}", base.0, count))
            }
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use siberian_syntax::parse;

    fn signatures(source: &str) -> Vec<FunctionSignature> {
        let file = parse(source).unwrap();
        let sigs = file.type_decls()
            .next()
            .unwrap()
            .functions()
            .map(FunctionSignature::from_decl)
            .collect();
        sigs
    }

    fn signature(decl: &str) -> FunctionSignature {
        signatures(&format!("protocol P {{\n    {}\n}}", decl)).remove(0)
    }

    #[test]
    fn test_stem_uses_external_labels() {
        assert_eq!(stem(&signature("func someMethod()")).as_str(), "someMethod");
        assert_eq!(stem(&signature("func fetch(id: Int, for key: String)")).as_str(), "fetchIdFor");
        assert_eq!(stem(&signature("func reset(_ value: Int)")).as_str(), "reset");
        assert_eq!(stem(&signature("func move(_ x: Int, by y: Int)")).as_str(), "moveBy");
    }

    #[test]
    fn test_member_names() {
        let stem = stem(&signature("func load(url: String)"));
        assert_eq!(stem.member("CallsCount"), "loadUrlCallsCount");
        assert_eq!(stem.to_string(), "loadUrl");
    }

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("with"), "With");
        assert_eq!(capitalize_first("éclair"), "Éclair");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("URL"), "URL");
    }

    #[test]
    fn test_shared_strategy_keeps_collisions() {
        let functions = signatures("protocol P {\n    func f(_ a: Int)\n    func f(_ b: String)\n}");
        let mut names = StemAllocator::new(NamingStrategy::Shared);
        let stems: Vec<_> = functions.iter().map(|f| names.allocate(f).to_string()).collect();
        assert_eq!(stems, ["f", "f"]);
    }

    #[test]
    fn test_indexed_strategy_numbers_repeats() {
        let functions = signatures(
            "protocol P {\n    func f(_ a: Int)\n    func g()\n    func f(_ b: String)\n    func f()\n}",
        );
        let mut names = StemAllocator::new(NamingStrategy::Indexed);
        let stems: Vec<_> = functions.iter().map(|f| names.allocate(f).to_string()).collect();
        assert_eq!(stems, ["f", "g", "f2", "f3"]);
    }

    #[test]
    fn test_stem_ignores_types() {
        let file = parse("func f(x: Int) -> Bool").unwrap();
        let a = FunctionSignature::from_decl(file.decls[0].as_function().unwrap());
        let b = signature("func f(x: String) async throws");
        assert_eq!(stem(&a), stem(&b));
    }
}
