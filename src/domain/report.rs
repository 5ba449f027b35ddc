//! Type Report
//!
//! Walks a syntax tree and emits one line per type mentioned by a declaration,
//! import or object creation. Children are walked before their parent reports,
//! so nested usages always come first.

use crate::domain::ast::{ImportDeclaration, Node, NodeKind, SyntaxTree, TypeRef};
use crate::domain::error::ReportError;
use crate::ports::LineSink;
use log::trace;
use std::fmt;

/// One emitted line, tagged with the kind of node that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    Package { name: String },
    TypeDeclaration { name: String },
    Field { ty: TypeRef },
    MethodParameter { ty: TypeRef },
    MethodReturn { ty: TypeRef },
    TypeParameter { text: String },
    Variable { ty: TypeRef },
    ObjectCreation { ty: TypeRef },
    Import { type_name: String, package: String },
    WildcardImport { package: String },
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Package { name } => write!(f, "package {} (package decl)", name),
            ReportLine::TypeDeclaration { name } => write!(f, "type {} (class/int decl)", name),
            ReportLine::Field { ty } => write!(f, "type {} (field decl)", ty),
            ReportLine::MethodParameter { ty } => {
                write!(f, "type {} (method decl, param type)", ty)
            }
            ReportLine::MethodReturn { ty } => {
                write!(f, "return type: {} (method decl, return type)", ty)
            }
            // no space before the tag
            ReportLine::TypeParameter { text } => write!(f, "type {}(type decl)", text),
            ReportLine::Variable { ty } => write!(f, "type {} (var decl)", ty),
            ReportLine::ObjectCreation { ty } => write!(f, "type {} (obj creation decl)", ty),
            ReportLine::Import { type_name, package } => {
                write!(f, "type {} package: {} (import)", type_name, package)
            }
            ReportLine::WildcardImport { package } => write!(f, "package {} (import)", package),
        }
    }
}

pub struct TypeReporter;

impl TypeReporter {
    /// Walk `tree` and stream every line into `sink`. Returns the number of lines emitted.
    ///
    /// The walk stops at the first error; lines already emitted stay in the sink.
    pub fn walk<S>(tree: &SyntaxTree, sink: &mut S) -> Result<usize, ReportError>
    where
        S: LineSink<ReportLine> + ?Sized,
    {
        Self::visit(tree.root(), sink)
    }

    /// Walk `tree` and collect the lines in order.
    pub fn report(tree: &SyntaxTree) -> Result<Vec<ReportLine>, ReportError> {
        let mut lines = Vec::new();
        Self::walk(tree, &mut lines)?;
        Ok(lines)
    }

    fn visit<S>(node: &Node, sink: &mut S) -> Result<usize, ReportError>
    where
        S: LineSink<ReportLine> + ?Sized,
    {
        let mut emitted = 0;
        for child in node.children() {
            emitted += Self::visit(child, sink)?;
        }

        let lines = Self::extract(node)?;
        if !lines.is_empty() {
            trace!("{} line(s) from {}", lines.len(), node.kind().label());
        }
        for line in lines {
            sink.emit(line)?;
            emitted += 1;
        }
        Ok(emitted)
    }

    /// Lines owned by `node` itself, ignoring its children.
    pub fn extract(node: &Node) -> Result<Vec<ReportLine>, ReportError> {
        let lines = match node.kind() {
            NodeKind::PackageDeclaration { name } => vec![ReportLine::Package { name: name.clone() }],
            NodeKind::TypeDeclaration(decl) => vec![ReportLine::TypeDeclaration {
                name: decl.name.clone(),
            }],
            NodeKind::FieldDeclaration => {
                let first = node.declarators().next().ok_or(ReportError::MalformedNode {
                    kind: "field-declaration",
                    reason: "no variable declarators",
                })?;
                vec![ReportLine::Field {
                    ty: first.ty.clone(),
                }]
            }
            NodeKind::MethodDeclaration(method) => {
                let mut lines: Vec<ReportLine> = node
                    .parameters()
                    .map(|param| ReportLine::MethodParameter {
                        ty: param.ty.clone(),
                    })
                    .collect();
                lines.push(ReportLine::MethodReturn {
                    ty: method.return_type.clone(),
                });
                lines
            }
            NodeKind::TypeParameter { text } => vec![ReportLine::TypeParameter { text: text.clone() }],
            NodeKind::VariableDeclarator(decl) => vec![ReportLine::Variable {
                ty: decl.ty.clone(),
            }],
            NodeKind::ObjectCreation { ty } => vec![ReportLine::ObjectCreation { ty: ty.clone() }],
            NodeKind::ImportDeclaration(import) => vec![Self::import_line(import)?],
            NodeKind::Parameter(_)
            | NodeKind::Cast { .. }
            | NodeKind::MemberAccess { .. }
            | NodeKind::Other(_) => Vec::new(),
        };
        Ok(lines)
    }

    fn import_line(import: &ImportDeclaration) -> Result<ReportLine, ReportError> {
        if import.wildcard {
            return Ok(ReportLine::WildcardImport {
                package: import.path.to_string(),
            });
        }
        let package = import.path.qualifier.clone().ok_or(ReportError::MalformedNode {
            kind: "import-declaration",
            reason: "single-type import without a package",
        })?;
        Ok(ReportLine::Import {
            type_name: import.path.identifier.clone(),
            package,
        })
    }
}
