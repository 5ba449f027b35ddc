//! Dependency Summary
//!
//! Resolves the types each top-level class of a file depends on, using the file's
//! package and imports. Only one file is ever in view, so resolution is a best guess:
//! anything not settled by an import or the package is marked as such.

use crate::domain::ast::{MentionedName, Node, NodeKind, SyntaxTree, TypeRef};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Names never reported as dependencies.
const IGNORED: &[&str] = &[
    "void", "byte", "short", "int", "long", "float", "double", "boolean", "char", "var",
    "Object", "Exception", "String",
];

/// `java.lang` types commonly called through, never taken as a receiver dependency.
const JAVA_LANG_RECEIVERS: &[&str] = &[
    "System", "Math", "StrictMath", "Integer", "Long", "Short", "Byte", "Double", "Float",
    "Boolean", "Character", "Thread", "Runtime", "Class", "Enum",
];

/// Dependencies of one top-level type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeps {
    /// Fully qualified name of the declaring class.
    pub class_name: String,
    pub used_types: BTreeSet<String>,
}

/// A line of the dependency summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepsLine {
    Class(String),
    Uses(String),
}

impl fmt::Display for DepsLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepsLine::Class(name) => write!(f, "class {}", name),
            DepsLine::Uses(name) => write!(f, "uses {}", name),
        }
    }
}

impl ClassDeps {
    pub fn lines(&self) -> impl Iterator<Item = DepsLine> + '_ {
        std::iter::once(DepsLine::Class(self.class_name.clone()))
            .chain(self.used_types.iter().cloned().map(DepsLine::Uses))
    }
}

/// Package and non-static imports of the file being summarised.
#[derive(Debug, Default)]
struct FileScope {
    package: Option<String>,
    /// simple name -> fully qualified name
    single_imports: BTreeMap<String, String>,
    /// packages imported with `.*`, in source order
    on_demand: Vec<String>,
}

impl FileScope {
    fn from_root(root: &Node) -> Self {
        let mut scope = FileScope::default();
        for child in root.children() {
            match child.kind() {
                NodeKind::PackageDeclaration { name } => scope.package = Some(name.clone()),
                NodeKind::ImportDeclaration(import) if !import.is_static => {
                    if import.wildcard {
                        scope.on_demand.push(import.path.to_string());
                    } else {
                        scope
                            .single_imports
                            .insert(import.path.identifier.clone(), import.path.to_string());
                    }
                }
                _ => {}
            }
        }
        scope
    }

    fn qualify(&self, simple_name: &str) -> String {
        match &self.package {
            Some(package) => format!("{}.{}", package, simple_name),
            None => simple_name.to_string(),
        }
    }
}

/// Per-class resolution state.
struct ClassScope<'f> {
    file: &'f FileScope,
    simple_name: String,
    fqn: String,
    type_params: BTreeSet<String>,
    /// field, local and parameter names declared anywhere in the class
    bound: BTreeSet<String>,
}

impl ClassScope<'_> {
    /// Whether the name in front of `.util()` or `.FIELD` names a type rather than a value.
    ///
    /// A single-type import always counts. Otherwise the last segment must be capitalised,
    /// the first segment must not be a variable in scope, and a dotted receiver must start
    /// with a package-like lowercase segment.
    fn is_type_receiver(&self, receiver: &str) -> bool {
        if self.file.single_imports.contains_key(receiver) {
            return true;
        }
        let (head, last) = match receiver.split_once('.') {
            Some((head, _)) => (head, receiver.rsplit('.').next().unwrap_or(receiver)),
            None => (receiver, receiver),
        };
        if self.bound.contains(head) || JAVA_LANG_RECEIVERS.contains(&receiver) {
            return false;
        }
        let capitalised = |segment: &str| segment.starts_with(char::is_uppercase);
        capitalised(last) && (head == last || !capitalised(head))
    }

    fn resolve(&self, mention: &MentionedName) -> Option<String> {
        let name = mention.name.as_str();
        if IGNORED.contains(&name) || self.type_params.contains(name) || name.contains("java.lang") {
            return None;
        }

        let resolved = if name.contains('.') {
            name.to_string()
        } else if let Some(fqn) = self.file.single_imports.get(name) {
            fqn.clone()
        } else if self.file.on_demand.is_empty()
            && self.file.package.is_some()
            && name != self.simple_name
        {
            self.file.qualify(name)
        } else if self.file.on_demand.len() == 1 {
            format!("{}.{}", self.file.on_demand[0], name)
        } else if let Some(first) = self.file.on_demand.first() {
            format!(
                "{}.{} (potentially from {} on-demand imports)",
                first,
                name,
                self.file.on_demand.len()
            )
        } else if name == self.simple_name {
            return None;
        } else {
            warn!("cannot resolve type {} in {}", name, self.fqn);
            format!("{} (unresolved)", name)
        };

        let resolved = if mention.is_array {
            format!("{}[]", resolved)
        } else {
            resolved
        };
        if resolved == self.fqn || resolved == format!("{}[]", self.fqn) {
            return None;
        }
        Some(resolved)
    }
}

pub struct DependencyCollector;

impl DependencyCollector {
    /// One entry per top-level type declaration, in source order.
    pub fn collect(tree: &SyntaxTree) -> Vec<ClassDeps> {
        let root = tree.root();
        let file = FileScope::from_root(root);

        root.children()
            .iter()
            .filter_map(|child| match child.kind() {
                NodeKind::TypeDeclaration(decl) => Some((child, decl.name.as_str())),
                _ => None,
            })
            .map(|(node, name)| Self::collect_class(&file, node, name))
            .collect()
    }

    fn collect_class(file: &FileScope, node: &Node, simple_name: &str) -> ClassDeps {
        let mut usage = Usage::default();
        usage.gather(node);

        let scope = ClassScope {
            file,
            simple_name: simple_name.to_string(),
            fqn: file.qualify(simple_name),
            type_params: usage.type_params,
            bound: usage.bound,
        };

        let receivers = usage
            .receivers
            .iter()
            .filter(|receiver| scope.is_type_receiver(receiver))
            .map(|receiver| MentionedName {
                name: receiver.to_string(),
                is_array: false,
            });
        let used_types: BTreeSet<String> = usage
            .types
            .iter()
            .flat_map(|ty| ty.mentioned_names())
            .chain(receivers)
            .filter_map(|mention| scope.resolve(&mention))
            .collect();

        debug!("{} depends on {} type(s)", scope.fqn, used_types.len());
        ClassDeps {
            class_name: scope.fqn,
            used_types,
        }
    }

}

/// Everything a class subtree mentions, before resolution.
#[derive(Default)]
struct Usage<'t> {
    types: Vec<&'t TypeRef>,
    receivers: Vec<&'t str>,
    type_params: BTreeSet<String>,
    bound: BTreeSet<String>,
}

impl<'t> Usage<'t> {
    fn gather(&mut self, node: &'t Node) {
        match node.kind() {
            NodeKind::TypeDeclaration(decl) => self.types.extend(decl.supertypes.iter()),
            NodeKind::MethodDeclaration(method) => self.types.push(&method.return_type),
            NodeKind::Parameter(param) => {
                self.types.push(&param.ty);
                self.bound.insert(param.name.clone());
            }
            NodeKind::VariableDeclarator(decl) => {
                self.types.push(&decl.ty);
                self.bound.insert(decl.name.clone());
            }
            NodeKind::ObjectCreation { ty } | NodeKind::Cast { ty } => self.types.push(ty),
            NodeKind::MemberAccess { receiver } => self.receivers.push(receiver),
            NodeKind::TypeParameter { text } => {
                if let Some(name) = text.split_whitespace().next() {
                    self.type_params.insert(name.to_string());
                }
            }
            _ => {}
        }
        for child in node.children() {
            self.gather(child);
        }
    }
}
