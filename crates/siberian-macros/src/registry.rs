//! Macro registry
//!
//! Maps attribute names to the macros that handle them. The set of macros
//! is closed: [`MacroKind`] lists every one, and dispatch is an exhaustive
//! match. The name index is built once per process and never changes.

use crate::codable::{CodableKey, CustomCodable};
use crate::context::ExpansionContext;
use crate::error::MacroError;
use crate::memberwise::PublicMemberwiseInit;
use crate::mock::AutoMockable;
use rustc_hash::FxHashMap;
use siberian_syntax::ast::{Attribute, Decl};
use std::sync::LazyLock;

/// Where generated declarations are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroRole {
    /// Beside the annotated declaration
    Peer,
    /// Inside the annotated type, before its closing brace
    Member,
}

impl MacroRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MacroRole::Peer => "peer",
            MacroRole::Member => "member",
        }
    }
}

/// A declaration macro.
pub trait Macro: Sync {
    /// Attribute name without the `@`
    fn name(&self) -> &'static str;

    fn role(&self) -> MacroRole;

    /// Generate declarations for `decl`, which carries `attribute`.
    fn expand(&self, attribute: &Attribute, decl: &Decl, ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacroKind {
    AutoMockable,
    PublicMemberwiseInit,
    CustomCodable,
    CodableKey,
}

impl MacroKind {
    pub const ALL: [MacroKind; 4] = [
        MacroKind::AutoMockable,
        MacroKind::PublicMemberwiseInit,
        MacroKind::CustomCodable,
        MacroKind::CodableKey,
    ];

    pub fn handler(self) -> &'static dyn Macro {
        match self {
            MacroKind::AutoMockable => &AutoMockable,
            MacroKind::PublicMemberwiseInit => &PublicMemberwiseInit,
            MacroKind::CustomCodable => &CustomCodable,
            MacroKind::CodableKey => &CodableKey,
        }
    }

    pub fn name(self) -> &'static str {
        self.handler().name()
    }

    pub fn role(self) -> MacroRole {
        self.handler().role()
    }

    /// One-line summary for `siberian macros`
    pub fn description(self) -> &'static str {
        match self {
            MacroKind::AutoMockable => "generates a Mock<Name> class for a protocol",
            MacroKind::PublicMemberwiseInit => "adds an initializer over the stored properties of a struct or class",
            MacroKind::CustomCodable => "adds a CodingKeys enum honoring @CodableKey overrides",
            MacroKind::CodableKey => "overrides the coding key of one property",
        }
    }

    /// What the macro must be attached to
    pub fn attaches_to(self) -> &'static str {
        match self {
            MacroKind::AutoMockable => "protocol",
            MacroKind::PublicMemberwiseInit | MacroKind::CustomCodable => "struct, class, actor",
            MacroKind::CodableKey => "property",
        }
    }

    pub fn expand(self, attribute: &Attribute, decl: &Decl, ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError> {
        self.handler().expand(attribute, decl, ctx)
    }
}

/// Name index over [`MacroKind::ALL`]
#[derive(Debug)]
pub struct MacroRegistry {
    by_name: FxHashMap<&'static str, MacroKind>,
}

static REGISTRY: LazyLock<MacroRegistry> = LazyLock::new(MacroRegistry::new);

impl MacroRegistry {
    fn new() -> Self {
        let by_name = MacroKind::ALL.iter().map(|kind| (kind.name(), *kind)).collect();
        Self { by_name }
    }

    /// The process-wide registry
    pub fn global() -> &'static MacroRegistry {
        &REGISTRY
    }

    /// Resolve an attribute name; a module-qualified name such as
    /// `SiberianMacros.AutoMockable` resolves by its last component.
    pub fn lookup(&self, name: &str) -> Option<MacroKind> {
        self.by_name.get(name).copied().or_else(|| {
            let (_, last) = name.rsplit_once('.')?;
            self.by_name.get(last).copied()
        })
    }

    pub fn kinds(&self) -> impl Iterator<Item = MacroKind> {
        MacroKind::ALL.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry = MacroRegistry::global();
        assert_eq!(registry.lookup("AutoMockable"), Some(MacroKind::AutoMockable));
        assert_eq!(registry.lookup("SiberianMacros.CodableKey"), Some(MacroKind::CodableKey));
        assert_eq!(registry.lookup("MainActor"), None);
        assert_eq!(registry.lookup("Foo.MainActor"), None);
    }

    #[test]
    fn test_names_and_roles() {
        let names: Vec<_> = MacroRegistry::global().kinds().map(MacroKind::name).collect();
        assert_eq!(names, ["AutoMockable", "PublicMemberwiseInit", "CustomCodable", "CodableKey"]);
        assert_eq!(MacroKind::AutoMockable.role(), MacroRole::Peer);
        assert_eq!(MacroKind::CustomCodable.role(), MacroRole::Member);
    }
}
