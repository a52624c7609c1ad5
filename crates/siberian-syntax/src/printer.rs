//! Pretty printer for declarations
//!
//! Generated declarations are printed one per line, members indented by a
//! configurable width. Accessor bodies holding a single one-line statement
//! stay on the declaration line (`get { __value }`); every other body is
//! printed as a block.

use crate::ast::*;

/// Default spaces per indentation level.
pub const DEFAULT_INDENT: usize = 4;

/// Declaration printer.
pub struct Printer {
    indent_width: usize,
    level: usize,
    out: String,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Printer {
    pub fn new(indent_width: usize) -> Self {
        Self {
            indent_width,
            level: 0,
            out: String::new(),
        }
    }

    /// Consume the printer and return the text (no trailing newline).
    pub fn finish(mut self) -> String {
        while self.out.ends_with('\n') {
            self.out.pop();
        }
        self.out
    }

    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            self.out.push_str(&" ".repeat(self.indent_width * self.level));
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.level += 1;
        f(self);
        self.level -= 1;
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    pub fn print_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Import(import) => self.line(&format!("import {}", import.path)),
            Decl::Type(ty) => self.print_type_decl(ty),
            Decl::Variable(var) => self.print_variable(var),
            Decl::Function(func) => self.print_function(func),
            Decl::Initializer(init) => self.print_initializer(init),
            Decl::Deinitializer(deinit) => self.print_body("deinit", deinit.body.as_ref()),
            Decl::EnumCase(case) => self.print_enum_case(case),
            Decl::Typealias(alias) => {
                let head = with_modifiers(&alias.modifiers, "typealias");
                self.line(&format!("{} {} = {}", head, alias.name, alias.ty));
            }
            Decl::AssociatedType(assoc) => self.line(&format!("associatedtype {}", assoc.name)),
            // Only parsed declarations are printed; skipped text has no tree
            Decl::Skipped(_) => {}
        }
    }

    fn print_attributes(&mut self, attributes: &[Attribute]) {
        for attribute in attributes {
            self.line(&attribute_text(attribute));
        }
    }

    fn print_type_decl(&mut self, ty: &TypeDecl) {
        self.print_attributes(&ty.attributes);

        let mut head = with_modifiers(&ty.modifiers, ty.kind.keyword());
        head.push(' ');
        head.push_str(&ty.name);
        if let Some(generics) = &ty.generic_clause {
            head.push_str(generics);
        }
        if !ty.inheritance.is_empty() {
            head.push_str(": ");
            head.push_str(&join(&ty.inheritance, ", "));
        }
        head.push_str(" {");
        self.line(&head);

        self.indented(|p| {
            for member in &ty.members.decls {
                p.print_decl(member);
            }
        });
        self.line("}");
    }

    fn print_variable(&mut self, var: &VariableDecl) {
        self.print_attributes(&var.attributes);

        let head = with_modifiers(&var.modifiers, var.binding.keyword());
        let (last, rest) = match var.bindings.split_last() {
            Some(split) => split,
            None => {
                self.line(&head);
                return;
            }
        };

        // Only the final binding can carry a multi-line accessor block.
        let mut text = head;
        text.push(' ');
        for binding in rest {
            text.push_str(&binding_head(binding));
            if let Some(accessor) = &binding.accessor {
                if let Some(inline) = inline_accessor(accessor) {
                    text.push_str(&inline);
                }
            }
            text.push_str(", ");
        }
        text.push_str(&binding_head(last));

        match &last.accessor {
            None => self.line(&text),
            Some(accessor) => match inline_accessor(accessor) {
                Some(inline) => self.line(&format!("{}{}", text, inline)),
                None => {
                    self.line(&format!("{} {{", text));
                    self.indented(|p| p.print_accessor_block(accessor));
                    self.line("}");
                }
            },
        }
    }

    fn print_accessor_block(&mut self, block: &AccessorBlock) {
        match block {
            AccessorBlock::Getter(body) => self.print_statements(&body.statements),
            AccessorBlock::Accessors(accessors) => {
                for accessor in accessors {
                    let head = accessor_head(accessor);
                    match &accessor.body {
                        None => self.line(&head),
                        Some(body) => match inline_statement(&body.statements) {
                            Some(stmt) => self.line(&format!("{} {{ {} }}", head, stmt)),
                            None => self.print_body(&head, Some(body)),
                        },
                    }
                }
            }
        }
    }

    fn print_function(&mut self, func: &FunctionDecl) {
        self.print_attributes(&func.attributes);

        let mut head = with_modifiers(&func.modifiers, "func");
        head.push(' ');
        head.push_str(&func.name);
        if let Some(generics) = &func.generic_clause {
            head.push_str(generics);
        }
        head.push_str(&parameter_clause(&func.params));
        head.push_str(&effects_text(&func.effects));
        if let Some(ret) = &func.return_type {
            head.push_str(" -> ");
            head.push_str(&ret.to_string());
        }
        self.print_body(&head, func.body.as_ref());
    }

    fn print_initializer(&mut self, init: &InitializerDecl) {
        self.print_attributes(&init.attributes);

        let mut head = with_modifiers(&init.modifiers, "init");
        if let Some(marker) = init.failable {
            head.push(marker);
        }
        head.push_str(&parameter_clause(&init.params));
        head.push_str(&effects_text(&init.effects));
        self.print_body(&head, init.body.as_ref());
    }

    fn print_enum_case(&mut self, case: &EnumCaseDecl) {
        self.print_attributes(&case.attributes);

        let elements: Vec<String> = case
            .elements
            .iter()
            .map(|element| {
                let mut text = element.name.clone();
                if let Some(values) = &element.associated_values {
                    text.push_str(values);
                }
                if let Some(raw) = &element.raw_value {
                    text.push_str(&format!(" = {}", raw));
                }
                text
            })
            .collect();
        let head = with_modifiers(&case.modifiers, "case");
        self.line(&format!("{} {}", head, elements.join(", ")));
    }

    /// `head {` body `}`; a missing body prints the head alone.
    fn print_body(&mut self, head: &str, body: Option<&CodeBlock>) {
        match body {
            None => self.line(head),
            Some(body) => {
                self.line(&format!("{} {{", head));
                self.indented(|p| p.print_statements(&body.statements));
                self.line("}");
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn print_statements(&mut self, statements: &[Stmt]) {
        for stmt in statements {
            self.print_stmt(stmt);
        }
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::IfLet {
                binding,
                value,
                then_branch,
                else_branch,
            } => {
                self.line(&format!("if let {} = {} {{", binding, value));
                self.indented(|p| p.print_statements(then_branch));
                match else_branch {
                    Some(else_branch) => {
                        self.line("} else {");
                        self.indented(|p| p.print_statements(else_branch));
                        self.line("}");
                    }
                    None => self.line("}"),
                }
            }
            Stmt::Verbatim(text) => {
                for line in text.lines() {
                    self.line(line);
                }
            }
            other => {
                if let Some(text) = simple_stmt(other) {
                    self.line(&text);
                }
            }
        }
    }
}

/// Print one declaration with the default indentation.
pub fn print_decl(decl: &Decl) -> String {
    print_decls(std::slice::from_ref(decl), DEFAULT_INDENT)
}

/// Print declarations one after another.
pub fn print_decls(decls: &[Decl], indent_width: usize) -> String {
    let mut printer = Printer::new(indent_width);
    for decl in decls {
        printer.print_decl(decl);
    }
    printer.finish()
}

// ============================================================================
// Fragments
// ============================================================================

fn with_modifiers(modifiers: &[Modifier], keyword: &str) -> String {
    let mut parts: Vec<String> = modifiers.iter().map(modifier_text).collect();
    parts.push(keyword.to_string());
    parts.join(" ")
}

fn modifier_text(modifier: &Modifier) -> String {
    match &modifier.detail {
        Some(detail) => format!("{}({})", modifier.name, detail),
        None => modifier.name.clone(),
    }
}

fn attribute_text(attribute: &Attribute) -> String {
    match &attribute.arguments {
        None => format!("@{}", attribute.name),
        Some(arguments) => {
            let arguments: Vec<String> = arguments
                .iter()
                .map(|arg| match &arg.label {
                    Some(label) => format!("{}: {}", label, arg.value),
                    None => arg.value.to_string(),
                })
                .collect();
            format!("@{}({})", attribute.name, arguments.join(", "))
        }
    }
}

fn binding_head(binding: &PatternBinding) -> String {
    let mut text = pattern_text(&binding.pattern);
    if let Some(ty) = &binding.type_annotation {
        text.push_str(&format!(": {}", ty));
    }
    if let Some(value) = &binding.initializer {
        text.push_str(&format!(" = {}", value));
    }
    text
}

fn pattern_text(pattern: &Pattern) -> String {
    match pattern {
        Pattern::Identifier(name) => name.clone(),
        Pattern::Wildcard => "_".to_string(),
        Pattern::Tuple(elements) => {
            let parts: Vec<String> = elements.iter().map(pattern_text).collect();
            format!("({})", parts.join(", "))
        }
    }
}

fn accessor_head(accessor: &Accessor) -> String {
    let mut head = with_modifiers(&accessor.modifiers, accessor.kind.keyword());
    if let Some(parameter) = &accessor.parameter {
        head.push_str(&format!("({})", parameter));
    }
    head.push_str(&effects_text(&accessor.effects));
    head
}

/// ` { get set }` or ` { expr }` when the whole block fits on one line.
fn inline_accessor(block: &AccessorBlock) -> Option<String> {
    match block {
        AccessorBlock::Getter(body) => inline_statement(&body.statements).map(|stmt| format!(" {{ {} }}", stmt)),
        AccessorBlock::Accessors(accessors) if accessors.iter().all(|a| a.body.is_none()) => {
            let heads: Vec<String> = accessors.iter().map(accessor_head).collect();
            Some(format!(" {{ {} }}", heads.join(" ")))
        }
        AccessorBlock::Accessors(_) => None,
    }
}

fn inline_statement(statements: &[Stmt]) -> Option<String> {
    match statements {
        [Stmt::Verbatim(text)] if !text.contains('\n') => Some(text.clone()),
        [stmt] => simple_stmt(stmt),
        _ => None,
    }
}

fn simple_stmt(stmt: &Stmt) -> Option<String> {
    match stmt {
        Stmt::Expr(expr) => Some(expr.to_string()),
        Stmt::Return(None) => Some("return".to_string()),
        Stmt::Return(Some(value)) => Some(format!("return {}", value)),
        Stmt::Assign { target, op, value } => Some(format!("{} {} {}", target, op, value)),
        Stmt::IfLet { .. } | Stmt::Verbatim(_) => None,
    }
}

fn parameter_clause(params: &[Param]) -> String {
    let params: Vec<String> = params.iter().map(param_text).collect();
    format!("({})", params.join(", "))
}

fn param_text(param: &Param) -> String {
    let mut text = match &param.external_name {
        None => format!("_ {}", param.internal_name),
        Some(external) if *external == param.internal_name => external.clone(),
        Some(external) => format!("{} {}", external, param.internal_name),
    };
    text.push_str(&format!(": {}", param.ty));
    if param.is_variadic {
        text.push_str("...");
    }
    if let Some(default) = &param.default_value {
        text.push_str(&format!(" = {}", default));
    }
    text
}

fn effects_text(effects: &Effects) -> String {
    let mut text = String::new();
    if effects.is_async {
        text.push_str(" async");
    }
    match &effects.throws {
        Some(ThrowsKind::Throws) => text.push_str(" throws"),
        Some(ThrowsKind::Rethrows) => text.push_str(" rethrows"),
        Some(ThrowsKind::Typed(error)) => text.push_str(&format!(" throws({})", error)),
        None => {}
    }
    text
}

fn join(types: &[TypeSyntax], separator: &str) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
