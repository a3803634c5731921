//! Canonical, language-neutral type trees.

use std::fmt;

use crate::annotation::is_annotated;
use crate::error::TypeError;
use crate::expr::{parse_expr, TypeExpr};

/// Container name used for unions, whichever spelling the source used.
pub const UNION: &str = "Union";

/// Container name used for callables, whichever spelling the source used.
pub const CALLABLE: &str = "Callable";

/// A parsed host type with all `Annotated` wrappers removed.
///
/// Unions are flattened and deduplicated on construction, so a union node
/// never directly contains another union and holds at most one `None`.
/// Callables store their return type first, followed by parameter types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// A bare named type such as `int` or `np.float32`.
    Primitive(String),
    /// A generic type with at least one argument.
    Container {
        /// Generic origin as written, or [`UNION`] / [`CALLABLE`].
        name: String,
        /// Type arguments in order.
        args: Vec<TypeNode>,
    },
    /// The `...` marker.
    Ellipsis,
    /// The `None` type.
    None,
}

impl TypeNode {
    /// Parses annotation text into a type tree.
    ///
    /// The text must not carry an `Annotated` wrapper; split those off with
    /// [`crate::parse_annotation`] first.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        Self::from_expr(&parse_expr(text)?)
    }

    /// Builds a type tree from a parsed expression.
    pub fn from_expr(expr: &TypeExpr) -> Result<Self, TypeError> {
        match expr {
            TypeExpr::Name(name) if is_none(name) => Ok(TypeNode::None),
            TypeExpr::Name(name) => Ok(TypeNode::Primitive(name.clone())),
            TypeExpr::Ellipsis => Ok(TypeNode::Ellipsis),
            TypeExpr::Union(members) => union_of(members),
            TypeExpr::Subscript { name, args } => subscript(expr, name, args),
            TypeExpr::List(_) => Err(TypeError::malformed_type(
                expr.to_string(),
                "a bracketed type list is only valid as the parameter list of Callable",
            )),
            TypeExpr::Str(_) | TypeExpr::Number(_) => Err(TypeError::malformed_type(
                expr.to_string(),
                "literal is not a type",
            )),
        }
    }

    /// The name used for table lookups: the primitive or container name.
    pub fn name(&self) -> &str {
        match self {
            TypeNode::Primitive(name) => name,
            TypeNode::Container { name, .. } => name,
            TypeNode::Ellipsis => "...",
            TypeNode::None => "None",
        }
    }

    /// Returns `true` for the `None` node.
    pub fn is_none(&self) -> bool {
        matches!(self, TypeNode::None)
    }

    /// Returns the type arguments, empty for non-containers.
    pub fn args(&self) -> &[TypeNode] {
        match self {
            TypeNode::Container { args, .. } => args,
            _ => &[],
        }
    }
}

fn is_none(name: &str) -> bool {
    matches!(name, "None" | "NoneType" | "types.NoneType")
}

fn is_union(name: &str) -> bool {
    matches!(name, "Union" | "typing.Union")
}

fn is_optional(name: &str) -> bool {
    matches!(name, "Optional" | "typing.Optional")
}

fn is_callable(name: &str) -> bool {
    matches!(
        name,
        "Callable" | "typing.Callable" | "collections.abc.Callable"
    )
}

fn subscript(expr: &TypeExpr, name: &str, args: &[TypeExpr]) -> Result<TypeNode, TypeError> {
    if is_annotated(name) {
        return Err(TypeError::malformed_type(
            expr.to_string(),
            "nested Annotated wrappers are not supported; annotate the outermost type only",
        ));
    }

    if is_union(name) {
        return union_of(args);
    }

    if is_optional(name) {
        let [inner] = args else {
            return Err(TypeError::malformed_type(
                expr.to_string(),
                "Optional takes exactly one type argument",
            ));
        };
        return union_of(&[inner.clone(), TypeExpr::Name("None".to_string())]);
    }

    if is_callable(name) {
        let [params, ret] = args else {
            return Err(TypeError::malformed_type(
                expr.to_string(),
                "Callable takes a parameter list and a return type",
            ));
        };
        let mut nodes = vec![TypeNode::from_expr(ret)?];
        match params {
            TypeExpr::List(params) => {
                for param in params {
                    nodes.push(TypeNode::from_expr(param)?);
                }
            }
            TypeExpr::Ellipsis => nodes.push(TypeNode::Ellipsis),
            _ => {
                return Err(TypeError::malformed_type(
                    expr.to_string(),
                    "Callable parameters must be a bracketed list or '...'",
                ));
            }
        }
        return Ok(TypeNode::Container {
            name: CALLABLE.to_string(),
            args: nodes,
        });
    }

    let args = args
        .iter()
        .map(TypeNode::from_expr)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TypeNode::Container {
        name: name.to_string(),
        args,
    })
}

/// Builds a flattened, deduplicated union. A single distinct member collapses
/// to that member.
fn union_of(members: &[TypeExpr]) -> Result<TypeNode, TypeError> {
    let mut flat: Vec<TypeNode> = Vec::with_capacity(members.len());
    for member in members {
        match TypeNode::from_expr(member)? {
            TypeNode::Container { name, args } if name == UNION => {
                for arg in args {
                    push_unique(&mut flat, arg);
                }
            }
            node => push_unique(&mut flat, node),
        }
    }

    if flat.len() == 1 {
        return Ok(flat.remove(0));
    }
    Ok(TypeNode::Container {
        name: UNION.to_string(),
        args: flat,
    })
}

fn push_unique(nodes: &mut Vec<TypeNode>, node: TypeNode) {
    if !nodes.contains(&node) {
        nodes.push(node);
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeNode::Primitive(name) => write!(f, "{name}"),
            TypeNode::Ellipsis => write!(f, "..."),
            TypeNode::None => write!(f, "None"),
            TypeNode::Container { name, args } if name == UNION => {
                let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{}", parts.join(" | "))
            }
            TypeNode::Container { name, args } if name == CALLABLE => match args.split_first() {
                Some((ret, [TypeNode::Ellipsis])) => write!(f, "{name}[..., {ret}]"),
                Some((ret, params)) => {
                    let params: Vec<String> = params.iter().map(ToString::to_string).collect();
                    write!(f, "{name}[[{}], {ret}]", params.join(", "))
                }
                None => write!(f, "{name}[]"),
            },
            TypeNode::Container { name, args } => {
                let parts: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{name}[{}]", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prim(name: &str) -> TypeNode {
        TypeNode::Primitive(name.to_string())
    }

    #[test]
    fn primitive() {
        let node = TypeNode::parse("float").unwrap();
        assert_eq!(node, prim("float"));
        assert!(node.args().is_empty());
        assert_eq!(node.to_string(), "float");
    }

    #[test]
    fn generic_container() {
        let node = TypeNode::parse("dict[str, float]").unwrap();
        assert_eq!(node.name(), "dict");
        assert_eq!(node.args(), &[prim("str"), prim("float")]);
        assert_eq!(node.to_string(), "dict[str, float]");
    }

    #[test]
    fn tuple_with_ellipsis() {
        let node = TypeNode::parse("tuple[int, ...]").unwrap();
        assert_eq!(node.args(), &[prim("int"), TypeNode::Ellipsis]);
        assert_eq!(node.args()[1].to_string(), "...");
    }

    #[test]
    fn callable_puts_return_first() {
        let node = TypeNode::parse("Callable[[int, float], bool]").unwrap();
        assert_eq!(node.name(), CALLABLE);
        assert_eq!(node.args(), &[prim("bool"), prim("int"), prim("float")]);
        assert_eq!(node.to_string(), "Callable[[int, float], bool]");
    }

    #[test]
    fn callable_with_ellipsis_parameters() {
        let node = TypeNode::parse("collections.abc.Callable[..., int]").unwrap();
        assert_eq!(node.args(), &[prim("int"), TypeNode::Ellipsis]);
    }

    #[test]
    fn pipe_union_with_none() {
        let node = TypeNode::parse("int | None").unwrap();
        assert_eq!(node.name(), UNION);
        assert_eq!(node.args(), &[prim("int"), TypeNode::None]);
    }

    #[test]
    fn optional_desugars_to_union() {
        assert_eq!(
            TypeNode::parse("Optional[int]").unwrap(),
            TypeNode::parse("int | None").unwrap()
        );
    }

    #[test]
    fn nested_unions_flatten() {
        let node = TypeNode::parse("Union[int, Union[str, None]] | float").unwrap();
        assert_eq!(
            node.args(),
            &[prim("int"), prim("str"), TypeNode::None, prim("float")]
        );
    }

    #[test]
    fn duplicate_members_collapse() {
        assert_eq!(TypeNode::parse("int | int").unwrap(), prim("int"));
        let node = TypeNode::parse("Optional[int | None]").unwrap();
        assert_eq!(node.args(), &[prim("int"), TypeNode::None]);
    }

    #[test]
    fn nested_annotated_is_malformed() {
        let err = TypeNode::parse("list[Annotated[int, CRef]]").unwrap_err();
        assert!(matches!(err, TypeError::MalformedType { .. }));
    }

    #[test]
    fn top_level_annotated_is_malformed() {
        assert!(TypeNode::parse("Annotated[int, \"foo\"]").is_err());
    }

    #[test]
    fn literal_is_not_a_type() {
        let err = TypeNode::parse("list[\"int\"]").unwrap_err();
        assert!(err.to_string().contains("literal is not a type"));
    }

    #[test]
    fn bare_list_is_malformed() {
        assert!(TypeNode::parse("[int]").is_err());
    }

    #[test]
    fn optional_arity_checked() {
        assert!(TypeNode::parse("Optional[int, str]").is_err());
    }

    #[test]
    fn empty_callable_displays_without_panicking() {
        let node = TypeNode::Container {
            name: CALLABLE.to_string(),
            args: Vec::new(),
        };
        assert_eq!(node.to_string(), "Callable[]");
    }
}
