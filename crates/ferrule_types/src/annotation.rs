//! Splitting `Annotated[base, extra]` wrappers into a base type and its extra.

use crate::error::TypeError;
use crate::expr::TypeExpr;
use crate::qualifier::Qualifier;

/// The single extra an annotation may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extra {
    /// Wrap the rendered type with a qualifier.
    Qualifier(Qualifier),
    /// Replace the rendered type with literal C++ text.
    Override(String),
}

/// Returns `true` if `name` spells the `Annotated` wrapper.
pub(crate) fn is_annotated(name: &str) -> bool {
    matches!(
        name,
        "Annotated" | "typing.Annotated" | "typing_extensions.Annotated"
    )
}

/// Splits an expression into its base expression and optional extra.
///
/// Expressions without an `Annotated` wrapper are returned unchanged with no
/// extra. A wrapper must carry exactly one extra, which is either a qualifier
/// name or a string override.
pub fn parse_annotation(expr: TypeExpr) -> Result<(TypeExpr, Option<Extra>), TypeError> {
    let (name, args) = match expr {
        TypeExpr::Subscript { name, args } if is_annotated(&name) => (name, args),
        other => return Ok((other, None)),
    };

    let [base, extra_expr] = match <[TypeExpr; 2]>::try_from(args) {
        Ok(pair) => pair,
        Err(args) => {
            let text = TypeExpr::Subscript { name, args }.to_string();
            return Err(TypeError::malformed_annotation(
                text,
                "exactly one annotation must follow the base type",
            ));
        }
    };

    let extra = match &extra_expr {
        TypeExpr::Str(text) => Some(Extra::Override(text.clone())),
        TypeExpr::Name(q) => Qualifier::from_name(q).map(Extra::Qualifier),
        _ => None,
    };

    match extra {
        Some(extra) => Ok((base, Some(extra))),
        None => Err(unexpected_extra(name, base, extra_expr)),
    }
}

fn unexpected_extra(name: String, base: TypeExpr, extra: TypeExpr) -> TypeError {
    let reason = format!("unexpected extra '{extra}' for '{base}'");
    let text = TypeExpr::Subscript {
        name,
        args: vec![base, extra],
    }
    .to_string();
    TypeError::malformed_annotation(text, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::parse_expr;

    fn split(text: &str) -> Result<(TypeExpr, Option<Extra>), TypeError> {
        parse_annotation(parse_expr(text).unwrap())
    }

    #[test]
    fn plain_type_has_no_extra() {
        let (base, extra) = split("int").unwrap();
        assert_eq!(base, TypeExpr::Name("int".to_string()));
        assert_eq!(extra, None);
    }

    #[test]
    fn qualifier_extra() {
        let (base, extra) = split("Annotated[int, CppQualifier.CRef]").unwrap();
        assert_eq!(base, TypeExpr::Name("int".to_string()));
        assert_eq!(extra, Some(Extra::Qualifier(Qualifier::ConstReference)));
    }

    #[test]
    fn override_extra() {
        let (base, extra) = split("Annotated[int, \"uint32_t\"]").unwrap();
        assert_eq!(base, TypeExpr::Name("int".to_string()));
        assert_eq!(extra, Some(Extra::Override("uint32_t".to_string())));
    }

    #[test]
    fn typing_prefix_is_recognized() {
        let (_, extra) = split("typing.Annotated[list[int], 'py::list']").unwrap();
        assert_eq!(extra, Some(Extra::Override("py::list".to_string())));
    }

    #[test]
    fn numeric_extra_is_rejected() {
        let err = split("Annotated[int, 42]").unwrap_err();
        assert!(matches!(err, TypeError::MalformedAnnotation { .. }));
        assert!(err.to_string().contains("unexpected extra '42'"));
    }

    #[test]
    fn unknown_qualifier_is_rejected() {
        let err = split("Annotated[int, SharedPtr]").unwrap_err();
        assert!(matches!(err, TypeError::MalformedAnnotation { .. }));
    }

    #[test]
    fn two_extras_are_rejected() {
        let err = split("Annotated[int, CRef, \"int\"]").unwrap_err();
        assert!(matches!(err, TypeError::MalformedAnnotation { .. }));
        assert!(err.to_string().contains("exactly one annotation"));
    }

    #[test]
    fn missing_extra_is_rejected() {
        assert!(split("Annotated[int]").is_err());
    }
}
