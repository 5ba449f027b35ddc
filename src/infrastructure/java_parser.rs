//! Java Parser
//!
//! Parses Java source with tree-sitter and lowers the concrete tree into the
//! closed node set of `domain::ast`. Anonymous tokens and comments are dropped;
//! every other grammar node survives, as `Other` when the reporters ignore it.

use crate::domain::ast::{
    ImportDeclaration, MethodDeclaration, Node, NodeKind, Parameter, QualifiedName, SyntaxTree,
    TypeDeclaration, TypeFlavor, TypeRef, VariableDeclarator,
};
use crate::domain::error::ParseError;
use crate::ports::SourceParser;
use log::debug;
use tree_sitter::Node as TsNode;

const SNIPPET_LEN: usize = 40;

pub struct TreeSitterJavaParser;

impl TreeSitterJavaParser {
    pub fn new() -> Self {
        TreeSitterJavaParser
    }
}

impl Default for TreeSitterJavaParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TreeSitterJavaParser {
    fn parse(&self, src: &str) -> Result<SyntaxTree, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(tree_sitter_java::language())
            .map_err(|e| ParseError::Language(e.to_string()))?;

        let tree = parser.parse(src, None).ok_or(ParseError::Incomplete)?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(syntax_error(root, src));
        }

        let lowered = Lowering { src }.lower(root, None)?;
        let tree = SyntaxTree::new(lowered);
        debug!("parsed {} bytes into {} nodes", src.len(), tree.node_count());
        Ok(tree)
    }
}

/// Locate the first `ERROR` or `MISSING` node in source order.
fn first_error(node: TsNode<'_>) -> Option<TsNode<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<TsNode<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn syntax_error(root: TsNode<'_>, src: &str) -> ParseError {
    let offender = first_error(root).unwrap_or(root);
    let position = offender.start_position();
    let snippet: String = src[offender.start_byte()..]
        .chars()
        .take_while(|c| *c != '\n')
        .take(SNIPPET_LEN)
        .collect();
    ParseError::Syntax {
        line: position.row + 1,
        column: position.column + 1,
        snippet,
    }
}

struct Lowering<'s> {
    src: &'s str,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: TsNode<'_>) -> &'s str {
        &self.src[node.byte_range()]
    }

    fn field(&self, node: TsNode<'_>, name: &str) -> Result<String, ParseError> {
        node.child_by_field_name(name)
            .map(|child| self.text(child).to_string())
            .ok_or_else(|| self.missing(node))
    }

    /// Source text of a type node, token by token, leaving out any comment inside it.
    fn type_text(&self, node: TsNode<'_>) -> String {
        let mut tokens = Vec::new();
        self.tokens(node, &mut tokens);
        tokens.join(" ")
    }

    fn tokens(&self, node: TsNode<'_>, out: &mut Vec<&'s str>) {
        if node.is_extra() {
            return;
        }
        if node.child_count() == 0 {
            out.push(self.text(node));
            return;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.tokens(child, out);
        }
    }

    fn type_field(&self, node: TsNode<'_>) -> Result<String, ParseError> {
        node.child_by_field_name("type")
            .map(|child| self.type_text(child))
            .ok_or_else(|| self.missing(node))
    }

    /// A concrete tree without errors that still lacks a required field.
    fn missing(&self, node: TsNode<'_>) -> ParseError {
        let position = node.start_position();
        ParseError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
            snippet: self.text(node).chars().take(SNIPPET_LEN).collect(),
        }
    }

    /// Text of the `type` field followed by the optional `dimensions` field.
    fn declared_type(&self, node: TsNode<'_>) -> Result<TypeRef, ParseError> {
        let base = self.type_field(node)?;
        Ok(self.with_dimensions(node, &base))
    }

    fn with_dimensions(&self, node: TsNode<'_>, base: &str) -> TypeRef {
        match node.child_by_field_name("dimensions") {
            Some(dims) => TypeRef::new(&format!("{}{}", base, self.type_text(dims))),
            None => TypeRef::new(base),
        }
    }

    /// Lower `node` and its named descendants. `inherited` is the declared type of an
    /// enclosing field or local declaration, handed to its direct declarators.
    fn lower(&self, node: TsNode<'_>, inherited: Option<&str>) -> Result<Node, ParseError> {
        let kind = self.classify(node, inherited)?;

        let passed_down = match node.kind() {
            "field_declaration" | "constant_declaration" | "local_variable_declaration" => {
                Some(self.type_field(node)?)
            }
            _ => None,
        };

        let mut children = Vec::new();
        if let Some(decl) = self.synthetic_declarator(node)? {
            children.push(decl);
        }

        let mut cursor = node.walk();
        let named: Vec<TsNode<'_>> = node
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .collect();
        for child in named {
            let lowered = self.lower(child, passed_down.as_deref())?;
            // parameters hang directly off their method or constructor
            if child.kind() == "formal_parameters" {
                children.extend(lowered.into_children());
            } else {
                children.push(lowered);
            }
        }

        Ok(Node::new(kind, children))
    }

    fn classify(&self, node: TsNode<'_>, inherited: Option<&str>) -> Result<NodeKind, ParseError> {
        let kind = match node.kind() {
            "package_declaration" => NodeKind::PackageDeclaration {
                name: self.package_name(node)?,
            },
            "class_declaration" => {
                NodeKind::TypeDeclaration(self.type_declaration(node, TypeFlavor::Class)?)
            }
            "interface_declaration" => {
                NodeKind::TypeDeclaration(self.type_declaration(node, TypeFlavor::Interface)?)
            }
            "field_declaration" | "constant_declaration" => NodeKind::FieldDeclaration,
            "method_declaration" => NodeKind::MethodDeclaration(MethodDeclaration {
                name: self.field(node, "name")?,
                return_type: self.declared_type(node)?,
            }),
            "formal_parameter" => NodeKind::Parameter(Parameter {
                name: self.field(node, "name")?,
                ty: self.declared_type(node)?,
                variadic: false,
            }),
            "spread_parameter" => NodeKind::Parameter(self.spread_parameter(node)?),
            "variable_declarator" => match inherited {
                Some(ty) => NodeKind::VariableDeclarator(VariableDeclarator {
                    name: self.field(node, "name")?,
                    ty: self.with_dimensions(node, ty),
                }),
                // e.g. the declarator inside a varargs parameter
                None => NodeKind::Other("variable_declarator"),
            },
            "type_parameter" => NodeKind::TypeParameter {
                text: TypeRef::new(&self.type_text(node)).to_string(),
            },
            "import_declaration" => NodeKind::ImportDeclaration(self.import(node)?),
            // `o.new I()` names `I`, not the enclosing instance
            "object_creation_expression" => NodeKind::ObjectCreation {
                ty: TypeRef::new(&self.type_field(node)?),
            },
            "cast_expression" => NodeKind::Cast {
                ty: TypeRef::new(&self.type_field(node)?),
            },
            "method_invocation" | "field_access" => match node
                .child_by_field_name("object")
                .and_then(|object| self.dotted_name(object))
            {
                Some(receiver) => NodeKind::MemberAccess { receiver },
                None => NodeKind::Other(node.kind()),
            },
            other => NodeKind::Other(other),
        };
        Ok(kind)
    }

    /// `for (String s : items)` and `try (Reader r = ...)` declare a variable without a
    /// `variable_declarator` node; give them one so they report like any other local.
    fn synthetic_declarator(&self, node: TsNode<'_>) -> Result<Option<Node>, ParseError> {
        let declares = match node.kind() {
            "enhanced_for_statement" => true,
            "resource" => node.child_by_field_name("type").is_some(),
            _ => false,
        };
        if !declares {
            return Ok(None);
        }
        Ok(Some(Node::leaf(NodeKind::VariableDeclarator(VariableDeclarator {
            name: self.field(node, "name")?,
            ty: self.declared_type(node)?,
        }))))
    }

    /// `Helper` or `lib.Helper` written as an expression; `None` for anything that is
    /// not a chain of plain identifiers (`this.x`, `foo().bar`, `a[0].b`).
    fn dotted_name(&self, node: TsNode<'_>) -> Option<String> {
        match node.kind() {
            "identifier" => Some(self.text(node).to_string()),
            "field_access" => {
                let object = self.dotted_name(node.child_by_field_name("object")?)?;
                let field = node.child_by_field_name("field")?;
                if field.kind() != "identifier" {
                    return None;
                }
                Some(format!("{}.{}", object, self.text(field)))
            }
            _ => None,
        }
    }

    fn package_name(&self, node: TsNode<'_>) -> Result<String, ParseError> {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| matches!(child.kind(), "identifier" | "scoped_identifier"))
            .map(|child| QualifiedName::parse(self.text(child)).to_string());
        name.ok_or_else(|| self.missing(node))
    }

    fn type_declaration(
        &self,
        node: TsNode<'_>,
        flavor: TypeFlavor,
    ) -> Result<TypeDeclaration, ParseError> {
        let mut supertypes = Vec::new();
        let mut cursor = node.walk();
        let clauses: Vec<TsNode<'_>> = node
            .named_children(&mut cursor)
            .filter(|child| {
                matches!(child.kind(), "superclass" | "super_interfaces" | "extends_interfaces")
            })
            .collect();

        for clause in clauses {
            let mut clause_cursor = clause.walk();
            for child in clause.named_children(&mut clause_cursor) {
                if child.kind() == "type_list" {
                    let mut list_cursor = child.walk();
                    supertypes.extend(
                        child
                            .named_children(&mut list_cursor)
                            .map(|ty| TypeRef::new(&self.type_text(ty))),
                    );
                } else {
                    supertypes.push(TypeRef::new(&self.type_text(child)));
                }
            }
        }

        Ok(TypeDeclaration {
            name: self.field(node, "name")?,
            flavor,
            supertypes,
        })
    }

    /// `String... args`: the grammar has no `type` field here, so take the first
    /// named child that is neither a modifier list nor the declarator.
    fn spread_parameter(&self, node: TsNode<'_>) -> Result<Parameter, ParseError> {
        let mut cursor = node.walk();
        let named: Vec<TsNode<'_>> = node.named_children(&mut cursor).collect();

        let ty = named
            .iter()
            .find(|child| !matches!(child.kind(), "modifiers" | "variable_declarator"))
            .map(|child| TypeRef::new(&self.type_text(*child)))
            .ok_or_else(|| self.missing(node))?;
        let name = named
            .iter()
            .find(|child| child.kind() == "variable_declarator")
            .map(|decl| self.field(*decl, "name"))
            .transpose()?
            .ok_or_else(|| self.missing(node))?;

        Ok(Parameter {
            name,
            ty,
            variadic: true,
        })
    }

    fn import(&self, node: TsNode<'_>) -> Result<ImportDeclaration, ParseError> {
        let mut path = None;
        let mut wildcard = false;
        let mut is_static = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "identifier" | "scoped_identifier" => {
                    path = Some(QualifiedName::parse(self.text(child)))
                }
                "asterisk" => wildcard = true,
                "static" => is_static = true,
                _ => {}
            }
        }

        Ok(ImportDeclaration {
            path: path.ok_or_else(|| self.missing(node))?,
            wildcard,
            is_static,
        })
    }
}
