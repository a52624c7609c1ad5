//! Source-level expansion
//!
//! Parses a file, runs every registered macro attached to a declaration and
//! splices the output back into the original text. Everything the macros
//! did not touch is kept byte for byte:
//!
//! - the consumed `@Attribute` is removed (with its line when it stood alone)
//! - peer output is inserted after the declaration, separated by a blank line
//! - member output is inserted before the closing brace of the type,
//!   indented one level deeper than the type itself
//!
//! Inserted lines end the way the file's first line does (`\n` or `\r\n`).

use crate::codable::CODABLE_KEY;
use crate::config::ExpansionConfig;
use crate::context::ExpansionContext;
use crate::diagnostic::{Diagnostic, DiagnosticId};
use crate::registry::{MacroKind, MacroRegistry, MacroRole};
use siberian_syntax::ast::*;
use siberian_syntax::{parse, print_decls, Span, SyntaxError};

/// Result of expanding one source file
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Expanded text; the input unchanged when it could not be parsed
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Expand every macro in `source`.
#[tracing::instrument(skip_all, fields(bytes = source.len()))]
pub fn expand_source(source: &str, config: &ExpansionConfig) -> Expansion {
    let file = match parse(source) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(%err, "source did not parse");
            return Expansion {
                source: source.to_string(),
                diagnostics: syntax_diagnostics(&err),
            };
        }
    };

    let mut driver = Driver {
        source,
        ctx: ExpansionContext::new(config),
        edits: Vec::new(),
        registry: MacroRegistry::global(),
        indent_unit: " ".repeat(config.output.indent),
        newline: newline_style(source),
    };
    driver.visit_decls(&file.decls, None);

    let edits = driver.edits.len();
    let expanded = apply_edits(source, driver.edits);
    tracing::debug!(edits, "expansion finished");

    Expansion {
        source: expanded,
        diagnostics: driver.ctx.into_diagnostics(),
    }
}

fn syntax_diagnostics(err: &SyntaxError) -> Vec<Diagnostic> {
    match err {
        SyntaxError::Lex(errors) => errors
            .iter()
            .map(|e| Diagnostic::error(DiagnosticId::new("Syntax", "lexError"), e.to_string(), e.span()))
            .collect(),
        SyntaxError::Parse(errors) => errors
            .iter()
            .map(|e| {
                let diag = Diagnostic::error(DiagnosticId::new("Syntax", "parseError"), e.message.clone(), e.span);
                match &e.suggestion {
                    Some(help) => diag.with_help(help.clone()),
                    None => diag,
                }
            })
            .collect(),
    }
}

/// Replace `start..end` with `text`; insertions have `start == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
    /// Creation order, so insertions at one offset keep their order
    seq: usize,
}

struct Driver<'a, 's> {
    source: &'s str,
    ctx: ExpansionContext<'a>,
    edits: Vec<Edit>,
    registry: &'static MacroRegistry,
    indent_unit: String,
    newline: &'static str,
}

impl Driver<'_, '_> {
    fn visit_decls(&mut self, decls: &[Decl], parent: Option<&TypeDecl>) {
        for decl in decls {
            self.visit_decl(decl, parent);
            if let Decl::Type(ty) = decl {
                self.visit_decls(&ty.members.decls, Some(ty));
            }
        }
    }

    fn visit_decl(&mut self, decl: &Decl, parent: Option<&TypeDecl>) {
        let mut consumed = Vec::new();

        for attribute in decl.attributes() {
            let kind = match self.registry.lookup(&attribute.name) {
                Some(kind) => kind,
                None => continue,
            };
            consumed.push(attribute.span);
            tracing::trace!(macro_name = kind.name(), decl = decl.kind_name(), "expanding");

            if kind == MacroKind::CodableKey {
                self.check_codable_key_placement(attribute, decl, parent);
            }

            match kind.expand(attribute, decl, &mut self.ctx) {
                Ok(generated) if generated.is_empty() => {}
                Ok(generated) => match (kind.role(), decl) {
                    (MacroRole::Peer, _) => self.insert_peers(decl, &generated),
                    (MacroRole::Member, Decl::Type(ty)) => self.insert_members(ty, &generated),
                    (MacroRole::Member, _) => {}
                },
                Err(err) => self.ctx.diagnose(Diagnostic::from_macro_error(&err)),
            }
        }

        self.remove_attributes(&consumed);
    }

    fn check_codable_key_placement(&mut self, attribute: &Attribute, decl: &Decl, parent: Option<&TypeDecl>) {
        let in_codable_type = parent.is_some_and(|ty| {
            ty.attributes
                .iter()
                .any(|a| self.registry.lookup(&a.name) == Some(MacroKind::CustomCodable))
        });
        if !in_codable_type || decl.as_variable().is_none() {
            self.ctx.warn(
                CODABLE_KEY,
                "misplacedCodableKey",
                "@CodableKey only has an effect on properties of a @CustomCodable type",
                attribute.span,
            );
        }
    }

    fn push(&mut self, start: usize, end: usize, text: String) {
        let seq = self.edits.len();
        self.edits.push(Edit { start, end, text, seq });
    }

    fn print(&self, decls: &[Decl], indent: &str) -> String {
        let printed = print_decls(decls, self.indent_unit.len());
        reindent(&printed, indent, self.newline)
    }

    fn insert_peers(&mut self, decl: &Decl, generated: &[Decl]) {
        let span = decl.span();
        let indent = line_indent(self.source, span.start);
        let text = format!("{nl}{nl}{}", self.print(generated, indent), nl = self.newline);
        self.push(span.end, span.end, text);
    }

    fn insert_members(&mut self, ty: &TypeDecl, generated: &[Decl]) {
        let type_indent = line_indent(self.source, ty.members.open.start);
        let member_indent = format!("{}{}", type_indent, self.indent_unit);
        let body = self.print(generated, &member_indent);

        let close = ty.members.close.start;
        let line_start = line_start(self.source, close);
        if self.source[line_start..close].trim().is_empty() {
            self.push(line_start, line_start, format!("{}{}", body, self.newline));
        } else {
            self.push(close, close, format!("{nl}{}{nl}{}", body, type_indent, nl = self.newline));
        }
    }

    /// Remove consumed attributes. A line left holding nothing but consumed
    /// attributes is removed entirely.
    fn remove_attributes(&mut self, spans: &[Span]) {
        let mut removed_lines: Vec<usize> = Vec::new();

        for span in spans {
            let start = line_start(self.source, span.start);
            if removed_lines.contains(&start) {
                continue;
            }

            let end = line_end(self.source, span.end);
            let mut rest = self.source[start..end].to_string();
            for other in spans.iter().filter(|s| s.start >= start && s.end <= end) {
                rest.replace_range(other.start - start..other.end - start, &" ".repeat(other.len()));
            }

            if rest.trim().is_empty() {
                removed_lines.push(start);
                let end = if self.source[end..].starts_with('\n') { end + 1 } else { end };
                self.push(start, end, String::new());
            } else {
                let trailing = self.source[span.end..end]
                    .chars()
                    .take_while(|c| *c == ' ' || *c == '\t')
                    .count();
                self.push(span.start, span.end + trailing, String::new());
            }
        }
    }
}

/// Apply edits from the end of the text backwards; an edit overlapping one
/// already applied is skipped.
fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by(|a, b| b.start.cmp(&a.start).then(b.seq.cmp(&a.seq)));

    let mut out = source.to_string();
    let mut last_start = usize::MAX;
    for edit in &edits {
        if edit.end > last_start {
            tracing::warn!(start = edit.start, end = edit.end, "skipping overlapping edit");
            continue;
        }
        out.replace_range(edit.start..edit.end, &edit.text);
        last_start = edit.start;
    }
    out
}

fn line_start(source: &str, offset: usize) -> usize {
    source[..offset].rfind('\n').map_or(0, |i| i + 1)
}

/// Offset of the newline ending the line that contains `offset` (or EOF)
fn line_end(source: &str, offset: usize) -> usize {
    source[offset..].find('\n').map_or(source.len(), |i| offset + i)
}

/// Leading whitespace of the line containing `offset`
fn line_indent(source: &str, offset: usize) -> &str {
    let start = line_start(source, offset);
    let line = &source[start..line_end(source, start)];
    &line[..line.len() - line.trim_start().len()]
}

fn newline_style(source: &str) -> &'static str {
    match source.find('\n') {
        Some(i) if source[..i].ends_with('\r') => "\r\n",
        _ => "\n",
    }
}

fn reindent(text: &str, indent: &str, newline: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join(newline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn expand(source: &str) -> Expansion {
        expand_source(source, &ExpansionConfig::default())
    }

    #[test]
    fn test_source_without_macros_is_unchanged() {
        let source = "import Foundation\n\n@MainActor\nstruct S {\n    var a: Int // note\n}\n";
        let expansion = expand(source);
        assert_eq!(expansion.source, source);
        assert!(expansion.diagnostics.is_empty());
    }

    #[test]
    fn test_attribute_line_is_removed() {
        let expansion = expand("@PublicMemberwiseInit\nstruct S {\n}\n");
        assert_eq!(expansion.source, "struct S {\n    public init() {\n    }\n}\n");
    }

    #[test]
    fn test_inline_attribute_is_removed_with_trailing_space() {
        let expansion = expand("@PublicMemberwiseInit @MainActor struct S { var a: Int }");
        assert_eq!(
            expansion.source,
            "@MainActor struct S { var a: Int \n    public init(a: Int) {\n        self.a = a\n    }\n}"
        );
    }

    #[test]
    fn test_two_attributes_on_one_line() {
        let expansion = expand("@CustomCodable @PublicMemberwiseInit\nstruct S {\n    var a: Int\n}\n");
        assert_eq!(
            expansion.source,
            "struct S {
    var a: Int
    enum CodingKeys: String, CodingKey {
        case a
    }
    public init(a: Int) {
        self.a = a
    }
}
"
        );
    }

    #[test]
    fn test_peer_follows_declaration() {
        let expansion = expand("@AutoMockable\nprotocol P {\n    func f()\n}\n");
        assert_eq!(
            expansion.source,
            "protocol P {
    func f()
}

class MockP: P {
    init() {
    }
    var fCallsCount: Int = 0
    var fCalled: Bool { fCallsCount > 0 }
    var fClosure: (() -> Void)?
    func f() {
        fCallsCount += 1
        fClosure?()
    }
}
"
        );
    }

    #[test]
    fn test_nested_type_is_indented() {
        let expansion = expand("enum Namespace {\n    @PublicMemberwiseInit\n    struct S {\n        let a: Int\n    }\n}\n");
        assert_eq!(
            expansion.source,
            "enum Namespace {\n    struct S {\n        let a: Int\n        public init(a: Int) {\n            self.a = a\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn test_shape_mismatch_generates_nothing() {
        let expansion = expand("@AutoMockable\nstruct S {\n}\n");
        assert_eq!(expansion.source, "struct S {\n}\n");
        assert!(expansion.has_errors());
        let diag = &expansion.diagnostics[0];
        assert_eq!(diag.message, "@AutoMockable is only applicable to protocols");
        assert_eq!((diag.span.line, diag.span.column), (1, 1));
    }

    #[test]
    fn test_misplaced_codable_key_warns() {
        let expansion = expand("struct S {\n    @CodableKey(name: \"x\")\n    var a: Int\n}\n");
        assert_eq!(expansion.source, "struct S {\n    var a: Int\n}\n");
        assert_eq!(expansion.diagnostics.len(), 1);
        assert_eq!(expansion.diagnostics[0].id.id, "misplacedCodableKey");
        assert!(!expansion.has_errors());
    }

    #[test]
    fn test_syntax_errors_leave_source_unchanged() {
        let source = "@AutoMockable\nprotocol P {\n    func f(\n}\n";
        let expansion = expand(source);
        assert_eq!(expansion.source, source);
        assert_eq!(expansion.diagnostics[0].id, DiagnosticId::new("Syntax", "parseError"));
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        let source = "@PublicMemberwiseInit\r\nstruct S {\r\n    let a: Int\r\n}\r\n\r\n@AutoMockable\r\nprotocol P {\r\n    func f()\r\n}\r\n";
        let expansion = expand(source);
        assert!(!expansion.has_errors(), "{:?}", expansion.diagnostics);
        assert!(expansion.source.starts_with(
            "struct S {\r\n    let a: Int\r\n    public init(a: Int) {\r\n        self.a = a\r\n    }\r\n}\r\n\r\nprotocol P {\r\n    func f()\r\n}\r\n\r\nclass MockP: P {\r\n"
        ));
        assert!(!expansion.source.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_apply_edits_keeps_insertion_order() {
        let edits = vec![
            Edit { start: 1, end: 1, text: "a".into(), seq: 0 },
            Edit { start: 1, end: 1, text: "b".into(), seq: 1 },
            Edit { start: 0, end: 1, text: String::new(), seq: 2 },
        ];
        assert_eq!(apply_edits("xy", edits), "aby");
    }

    #[test]
    fn test_line_helpers() {
        let source = "a\n    b {\n";
        assert_eq!(line_indent(source, 6), "    ");
        assert_eq!(line_start(source, 6), 2);
        assert_eq!(line_end(source, 6), 9);
        assert_eq!(reindent("x\n\ny", "  ", "\n"), "  x\n\n  y");
        assert_eq!(reindent("x\ny", "", "\r\n"), "x\r\ny");
        assert_eq!(newline_style("a\r\nb\n"), "\r\n");
        assert_eq!(newline_style("a\nb\r\n"), "\n");
        assert_eq!(newline_style("a"), "\n");
    }
}
