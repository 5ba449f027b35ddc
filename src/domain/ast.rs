// Syntax tree for typescope.
// The parser lowers its concrete tree into these types; every visitor only borrows them.

use std::fmt;

/// Printable text of a type mention: `int`, `List<String>`, `java.io.File`, `byte[]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef(String);

impl TypeRef {
    /// Build a type reference in canonical spacing: one space after each comma, none
    /// around `<`, `>`, `[`, `]` or `.`, and any other whitespace run collapsed to one space.
    pub fn new(text: &str) -> Self {
        let mut out = String::with_capacity(text.len());
        let mut gap = false;
        for c in text.chars() {
            if c.is_whitespace() {
                gap = true;
                continue;
            }
            let tight =
                TIGHT_BEFORE.contains(c) || out.ends_with(|p: char| TIGHT_AFTER.contains(p));
            if !out.is_empty() && (out.ends_with(',') || (gap && !tight)) {
                out.push(' ');
            }
            out.push(c);
            gap = false;
        }
        TypeRef(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every type name mentioned in this reference, outermost first.
    ///
    /// `Map<String, List<Foo>>` yields `Map`, `String`, `List`, `Foo`. A name directly followed
    /// by `[]` is flagged as an array. Wildcard keywords and annotations are skipped.
    pub fn mentioned_names(&self) -> Vec<MentionedName> {
        let text = self.0.as_str();
        let mut names = Vec::new();
        let mut chars = text.char_indices().peekable();

        while let Some((start, c)) = chars.next() {
            if !is_name_char(c) {
                continue;
            }
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !is_name_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }

            let name = &text[start..end];
            let annotated = text[..start].ends_with('@');
            if annotated || name == "extends" || name == "super" {
                continue;
            }
            let is_array = text[end..].trim_start().starts_with("[]");
            names.push(MentionedName {
                name: name.to_string(),
                is_array,
            });
        }

        names
    }
}

const TIGHT_BEFORE: &str = "<>[],.";
const TIGHT_AFTER: &str = "<[.@";

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One type name pulled out of a [`TypeRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionedName {
    pub name: String,
    pub is_array: bool,
}

/// A dotted name split at its last segment: `java.util.List` is `java.util` + `List`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub qualifier: Option<String>,
    pub identifier: String,
}

impl QualifiedName {
    pub fn parse(dotted: &str) -> Self {
        let dotted: String = dotted.chars().filter(|c| !c.is_whitespace()).collect();
        match dotted.rsplit_once('.') {
            Some((qualifier, identifier)) => QualifiedName {
                qualifier: Some(qualifier.to_string()),
                identifier: identifier.to_string(),
            },
            None => QualifiedName {
                qualifier: None,
                identifier: dotted,
            },
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(qualifier) => write!(f, "{}.{}", qualifier, self.identifier),
            None => f.write_str(&self.identifier),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFlavor {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub name: String,
    pub flavor: TypeFlavor,
    /// `extends` and `implements` clauses, in source order.
    pub supertypes: Vec<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub return_type: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    /// `String... args`; `ty` is then the element type.
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarator {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub path: QualifiedName,
    pub wildcard: bool,
    pub is_static: bool,
}

/// Closed set of node kinds. Anything the reporters do not look at is `Other`,
/// tagged with the grammar kind it was lowered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    PackageDeclaration { name: String },
    TypeDeclaration(TypeDeclaration),
    FieldDeclaration,
    MethodDeclaration(MethodDeclaration),
    Parameter(Parameter),
    VariableDeclarator(VariableDeclarator),
    TypeParameter { text: String },
    ImportDeclaration(ImportDeclaration),
    ObjectCreation { ty: TypeRef },
    /// `(Widget) o`
    Cast { ty: TypeRef },
    /// A method call or field access on a plain name, `Helper.util()` or `lib.Helper.X`.
    /// `receiver` is the dotted name in front of the member.
    MemberAccess { receiver: String },
    Other(&'static str),
}

impl NodeKind {
    /// Short name used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::PackageDeclaration { .. } => "package-declaration",
            NodeKind::TypeDeclaration(_) => "type-declaration",
            NodeKind::FieldDeclaration => "field-declaration",
            NodeKind::MethodDeclaration(_) => "method-declaration",
            NodeKind::Parameter(_) => "parameter",
            NodeKind::VariableDeclarator(_) => "variable-declarator",
            NodeKind::TypeParameter { .. } => "type-parameter",
            NodeKind::ImportDeclaration(_) => "import-declaration",
            NodeKind::ObjectCreation { .. } => "object-creation-expression",
            NodeKind::Cast { .. } => "cast-expression",
            NodeKind::MemberAccess { .. } => "member-access",
            NodeKind::Other(kind) => *kind,
        }
    }
}

/// A node in the syntax tree. Children are owned and kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::new(kind, Vec::new())
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Variable declarators directly under this node, in declaration order.
    pub fn declarators(&self) -> impl Iterator<Item = &VariableDeclarator> {
        self.children.iter().filter_map(|child| match &child.kind {
            NodeKind::VariableDeclarator(decl) => Some(decl),
            _ => None,
        })
    }

    /// Parameters directly under this node, in declaration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.children.iter().filter_map(|child| match &child.kind {
            NodeKind::Parameter(param) => Some(param),
            _ => None,
        })
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Node::subtree_len).sum::<usize>()
    }
}

/// An immutable, rooted syntax tree for one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Node,
}

impl SyntaxTree {
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn node_count(&self) -> usize {
        self.root.subtree_len()
    }
}
