//! `@AutoMockable`
//!
//! Turns a protocol into a `Mock<Name>` class. Every property requirement is
//! backed by a settable field; every function requirement records its calls
//! and arguments and forwards to an optional override closure.
//!
//! ```text
//! @AutoMockable
//! protocol Loader {
//!     func load(url: String) -> Data
//! }
//! ```
//!
//! produces, after the protocol:
//!
//! ```text
//! class MockLoader: Loader {
//!     init() {
//!     }
//!     var loadUrlCallsCount: Int = 0
//!     var loadUrlCalled: Bool { loadUrlCallsCount > 0 }
//!     var loadUrlReceivedUrl: String?
//!     var loadUrlReceivedInvocations: [String] = []
//!     var loadUrlReturnValue: Data!
//!     var loadUrlClosure: ((String) -> Data)?
//!     func load(url: String) -> Data {
//!         ...
//!     }
//! }
//! ```

pub mod assembler;
pub mod function;
pub mod property;

pub use assembler::{assemble_mock, MockType};
pub use function::generate_function_mock;
pub use property::generate_property_mock;

use crate::context::ExpansionContext;
use crate::error::MacroError;
use crate::model::InterfaceDeclaration;
use crate::registry::{Macro, MacroRole};
use siberian_syntax::ast::*;

/// What a generated member is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    Counter,
    CalledFlag,
    ReceivedArguments,
    ReceivedInvocations,
    ReturnValue,
    Closure,
    Implementation,
    PropertyAccessor,
    BackingStorage,
    Passthrough,
}

/// One declaration of a mock, tagged with its role
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMember {
    pub role: MemberRole,
    pub decl: Decl,
}

impl GeneratedMember {
    pub fn new(role: MemberRole, decl: impl Into<Decl>) -> Self {
        Self {
            role,
            decl: decl.into(),
        }
    }

    /// Name of the declared property or function
    pub fn name(&self) -> Option<&str> {
        match &self.decl {
            Decl::Variable(var) => var.property_name(),
            Decl::Function(func) => Some(&func.name),
            _ => None,
        }
    }
}

/// Modifiers for a generated member.
///
/// Members of a mock of a `public` (or `package`) protocol must be at least
/// as visible as the requirements they satisfy.
pub(crate) fn member_modifiers(access: Option<&str>, is_static: bool) -> Vec<Modifier> {
    let mut modifiers = Vec::new();
    if let Some(access @ ("public" | "package")) = access {
        modifiers.push(Modifier::new(access));
    }
    if is_static {
        modifiers.push(Modifier::new("static"));
    }
    modifiers
}

pub struct AutoMockable;

impl Macro for AutoMockable {
    fn name(&self) -> &'static str {
        "AutoMockable"
    }

    fn role(&self) -> MacroRole {
        MacroRole::Peer
    }

    fn expand(&self, attribute: &Attribute, decl: &Decl, ctx: &mut ExpansionContext) -> Result<Vec<Decl>, MacroError> {
        let protocol = match decl {
            Decl::Type(ty) if ty.kind == TypeDeclKind::Protocol => ty,
            other => {
                return Err(MacroError::shape_mismatch(
                    self.name(),
                    "protocols",
                    other.kind_name(),
                    attribute.span,
                ))
            }
        };

        let interface = InterfaceDeclaration::from_protocol(protocol, ctx);
        let mock = assemble_mock(&interface, ctx);
        tracing::debug!(mock = %mock.name, members = mock.members.len(), "assembled mock");
        Ok(vec![mock.into_decl()])
    }
}
