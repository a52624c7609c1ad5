//! Siberian macros
//!
//! Declaration generators that run on the syntax tree produced by
//! `siberian-syntax`:
//!
//! - `@AutoMockable` on a protocol produces a `Mock<Name>` class that records
//!   calls and lets tests stub results
//! - `@PublicMemberwiseInit` on a struct or class produces an initializer over
//!   its stored properties
//! - `@CustomCodable` produces a `CodingKeys` enum, honoring `@CodableKey`
//!   overrides on individual properties
//!
//! [`expand_source`] applies every registered macro found in a source file
//! and splices the generated declarations back into the text.

pub mod classifier;
pub mod codable;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod error;
pub mod expand;
pub mod memberwise;
pub mod mock;
pub mod model;
pub mod naming;
pub mod registry;

pub use classifier::{classify_function, classify_property, FunctionShape, PropertyShape};
pub use config::{ConfigError, ExpansionConfig};
pub use context::ExpansionContext;
pub use diagnostic::{Diagnostic, DiagnosticId, Severity};
pub use error::MacroError;
pub use expand::{expand_source, Expansion};
pub use model::{FunctionSignature, InterfaceDeclaration, MemberSignature, Mutability, Parameter, PropertySignature};
pub use naming::{NameStem, NamingStrategy};
pub use registry::{MacroKind, MacroRegistry, MacroRole};
