//! Java source extraction with tree-sitter
//!
//! Only what the rules need is extracted: methods whose parameters carry a
//! `@Size` annotation, every call site with a classification of its
//! arguments, and `@SuppressLint` ranges.

use crate::constraint::SizeConstraint;
use crate::location::{SourceText, Span};
use thiserror::Error;
use tracing::{debug, trace};
use tree_sitter::{Node, Parser as TsParser};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JavaError {
    #[error("failed to load the Java grammar")]
    Grammar,
    #[error("syntax error")]
    Syntax { offset: usize },
}

impl JavaError {
    pub fn offset(&self) -> usize {
        match self {
            JavaError::Grammar => 0,
            JavaError::Syntax { offset } => *offset,
        }
    }
}

/// A parameter annotated with `@Size`
#[derive(Debug, Clone)]
pub struct SizedParameter {
    pub index: usize,
    pub name: String,
    pub constraint: SizeConstraint,
    /// The annotation itself
    pub annotation: Span,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub name: String,
    pub parameters: Vec<String>,
    pub sized: Vec<SizedParameter>,
    pub span: Span,
}

impl MethodInfo {
    pub fn sized_parameter(&self, index: usize) -> Option<&SizedParameter> {
        self.sized.iter().find(|p| p.index == index)
    }

    pub fn sized_parameter_named(&self, name: &str) -> Option<&SizedParameter> {
        self.sized.iter().find(|p| p.name == name)
    }
}

/// What is known statically about a call argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentValue {
    /// Array initializer, `new T[n]` or string literal of known size
    Size(i64),
    /// A bare identifier, possibly a parameter of the enclosing method
    Identifier(String),
    Other,
}

#[derive(Debug, Clone)]
pub struct Argument {
    pub value: ArgumentValue,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallSite {
    pub method: String,
    pub arguments: Vec<Argument>,
    pub span: Span,
    /// Index into [`JavaFile::methods`] of the method containing the call
    pub enclosing: Option<usize>,
}

/// A `@SuppressLint` annotated declaration
#[derive(Debug, Clone)]
pub struct Suppression {
    pub span: Span,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct JavaFile {
    pub source: SourceText,
    pub methods: Vec<MethodInfo>,
    pub calls: Vec<CallSite>,
    pub suppressions: Vec<Suppression>,
}

impl JavaFile {
    pub fn is_suppressed(&self, offset: usize, issue_id: &str) -> bool {
        self.suppressions.iter().any(|s| {
            s.span.start <= offset
                && offset < s.span.end
                && s.issues.iter().any(|i| i == issue_id || i == "all")
        })
    }
}

/// Java source code parser using tree-sitter
pub struct JavaParser {
    parser: TsParser,
}

impl JavaParser {
    pub fn new() -> Result<Self, JavaError> {
        let mut parser = TsParser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|_| JavaError::Grammar)?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: SourceText) -> Result<JavaFile, JavaError> {
        let tree = self
            .parser
            .parse(source.text(), None)
            .ok_or(JavaError::Syntax { offset: 0 })?;
        let root = tree.root_node();
        if root.has_error() {
            let offset = first_error(root).map(|n| n.start_byte()).unwrap_or(0);
            debug!("Syntax error in {} at byte {}", source.display_path(), offset);
            return Err(JavaError::Syntax { offset });
        }

        let mut file = JavaFile {
            source: source.clone(),
            methods: Vec::new(),
            calls: Vec::new(),
            suppressions: Vec::new(),
        };
        let mut enclosing = Vec::new();
        Extractor {
            text: source.text(),
            file: &mut file,
        }
        .visit(root, &mut enclosing);

        trace!(
            "Java {}: {} methods, {} calls",
            source.display_path(),
            file.methods.len(),
            file.calls.len()
        );
        Ok(file)
    }
}

struct Extractor<'a> {
    text: &'a str,
    file: &'a mut JavaFile,
}

impl Extractor<'_> {
    fn visit(&mut self, node: Node, enclosing: &mut Vec<usize>) {
        match node.kind() {
            "method_declaration" | "constructor_declaration" => {
                self.record_suppression(node);
                let index = self.method(node);
                enclosing.push(index);
                self.visit_children(node, enclosing);
                enclosing.pop();
                return;
            }
            "class_declaration" | "interface_declaration" | "enum_declaration" => {
                self.record_suppression(node);
            }
            "method_invocation" => {
                self.call(node, enclosing.last().copied());
            }
            _ => {}
        }
        self.visit_children(node, enclosing);
    }

    fn visit_children(&mut self, node: Node, enclosing: &mut Vec<usize>) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.visit(child, enclosing);
        }
    }

    fn text(&self, node: Node) -> &str {
        &self.text[node.start_byte()..node.end_byte()]
    }

    fn method(&mut self, node: Node) -> usize {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        let mut parameters = Vec::new();
        let mut sized = Vec::new();
        if let Some(params) = node.child_by_field_name("parameters") {
            let mut cursor = params.walk();
            let nodes: Vec<Node> = params
                .named_children(&mut cursor)
                .filter(|n| matches!(n.kind(), "formal_parameter" | "spread_parameter"))
                .collect();
            for (index, param) in nodes.into_iter().enumerate() {
                let param_name = param
                    .child_by_field_name("name")
                    .or_else(|| last_identifier(param))
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default();
                for annotation in annotations(param) {
                    if annotation_name(self.text, annotation) != "Size" {
                        continue;
                    }
                    match self.size_constraint(annotation) {
                        Some(constraint) => sized.push(SizedParameter {
                            index,
                            name: param_name.clone(),
                            constraint,
                            annotation: span(annotation),
                        }),
                        None => debug!("Ignoring @Size without a valid constraint on {}", param_name),
                    }
                }
                parameters.push(param_name);
            }
        }

        self.file.methods.push(MethodInfo {
            name,
            parameters,
            sized,
            span: span(node),
        });
        self.file.methods.len() - 1
    }

    /// `@Size(5)`, `@Size(min = 1, max = 3)`, `@Size(multiple = 2)`
    fn size_constraint(&self, annotation: Node) -> Option<SizeConstraint> {
        let mut exact = None;
        let mut min = None;
        let mut max = None;
        let mut multiple = None;

        let arguments = annotation.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        for argument in arguments.named_children(&mut cursor) {
            if argument.kind() == "element_value_pair" {
                let key = argument.child_by_field_name("key").map(|k| self.text(k));
                let value = argument
                    .child_by_field_name("value")
                    .and_then(|v| parse_integer(self.text(v)));
                match (key, value) {
                    (Some("value"), Some(v)) => exact = Some(v),
                    (Some("min"), Some(v)) => min = Some(v),
                    (Some("max"), Some(v)) => max = Some(v),
                    (Some("multiple"), Some(v)) => multiple = Some(v),
                    _ => {}
                }
            } else if let Some(v) = parse_integer(self.text(argument)) {
                exact = Some(v);
            }
        }

        // Annotation defaults: value = -1, min/max unbounded, multiple = 1
        let exact = exact.filter(|v| *v >= 0);
        let multiple = multiple.filter(|m| *m != 1);
        let result = match exact {
            Some(v) => SizeConstraint::from_parts(Some(v), Some(v), multiple),
            None => SizeConstraint::from_parts(min, max, multiple),
        };
        result.ok().flatten()
    }

    fn call(&mut self, node: Node, enclosing: Option<usize>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let mut arguments = Vec::new();
        if let Some(args) = node.child_by_field_name("arguments") {
            let mut cursor = args.walk();
            for arg in args.named_children(&mut cursor) {
                if arg.kind() == "line_comment" || arg.kind() == "block_comment" {
                    continue;
                }
                arguments.push(Argument {
                    value: self.argument_value(arg),
                    span: span(arg),
                });
            }
        }
        self.file.calls.push(CallSite {
            method: self.text(name).to_string(),
            arguments,
            span: span(node),
            enclosing,
        });
    }

    fn argument_value(&self, arg: Node) -> ArgumentValue {
        match arg.kind() {
            "array_initializer" => ArgumentValue::Size(count_elements(arg)),
            "array_creation_expression" => {
                if let Some(init) = arg.child_by_field_name("value") {
                    return ArgumentValue::Size(count_elements(init));
                }
                let mut cursor = arg.walk();
                let dimension = arg
                    .named_children(&mut cursor)
                    .find(|n| n.kind() == "dimensions_expr")
                    .and_then(|d| d.named_child(0))
                    .and_then(|n| parse_integer(self.text(n)));
                dimension.map_or(ArgumentValue::Other, ArgumentValue::Size)
            }
            "string_literal" => ArgumentValue::Size(string_length(self.text(arg))),
            "identifier" => ArgumentValue::Identifier(self.text(arg).to_string()),
            _ => ArgumentValue::Other,
        }
    }

    fn record_suppression(&mut self, node: Node) {
        let mut issues = Vec::new();
        for annotation in annotations(node) {
            let name = annotation_name(self.text, annotation);
            if name != "SuppressLint" && name != "SuppressWarnings" {
                continue;
            }
            let Some(arguments) = annotation.child_by_field_name("arguments") else {
                continue;
            };
            for literal in descendants_of_kind(arguments, "string_literal") {
                issues.push(self.text(literal).trim_matches('"').to_string());
            }
        }
        if !issues.is_empty() {
            self.file.suppressions.push(Suppression {
                span: span(node),
                issues,
            });
        }
    }
}

fn span(node: Node) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

/// Annotations in the `modifiers` child of a declaration or parameter
fn annotations(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    let Some(modifiers) = node
        .children(&mut cursor)
        .find(|child| child.kind() == "modifiers")
    else {
        return Vec::new();
    };
    let mut cursor = modifiers.walk();
    modifiers
        .named_children(&mut cursor)
        .filter(|n| matches!(n.kind(), "annotation" | "marker_annotation"))
        .collect()
}

/// Simple name of an annotation, e.g. `Size` for `@androidx.annotation.Size`
fn annotation_name<'a>(text: &'a str, annotation: Node) -> &'a str {
    annotation
        .child_by_field_name("name")
        .map(|n| &text[n.start_byte()..n.end_byte()])
        .and_then(|name| name.rsplit('.').next())
        .unwrap_or("")
}

fn last_identifier(node: Node) -> Option<Node> {
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    children.into_iter().rev().find(|n| n.kind() == "identifier")
}

fn descendants_of_kind<'a>(node: Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut found = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.kind() == kind {
            found.push(current);
            continue;
        }
        let mut cursor = current.walk();
        let children: Vec<Node> = current.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    found
}

fn count_elements(initializer: Node) -> i64 {
    let mut cursor = initializer.walk();
    let count = initializer
        .named_children(&mut cursor)
        .filter(|n| !matches!(n.kind(), "line_comment" | "block_comment"))
        .count();
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn parse_integer(text: &str) -> Option<i64> {
    let trimmed = text.trim().trim_end_matches(['L', 'l']).replace('_', "");
    trimmed.parse().ok()
}

/// Character count of a Java string literal, counting each escape as one
fn string_length(literal: &str) -> i64 {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut count = 0i64;
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('u') => {
                    for _ in 0..4 {
                        chars.next();
                    }
                }
                Some(_) | None => {}
            }
        }
        count += 1;
    }
    count
}
