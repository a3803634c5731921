//! Host function signatures and their translation to pybind11 lambdas.
//!
//! A host signature such as
//! `(a: float, /, b: bool, *, c: int = 3, **kwargs: Any) -> None`
//! becomes the lambda header `[](double a, bool b, int c=3, const py::kwargs& kwargs) -> void`
//! plus the binding annotations
//! `py::arg("a"), py::pos_only(), py::arg("b"), py::kw_only(), py::arg("c")=3`.

use ferrule_types::{translate, TargetType};

use crate::error::SignatureError;

/// Binding annotation emitted at the positional-only boundary.
pub const POS_ONLY_MARKER: &str = "py::pos_only()";

/// Binding annotation emitted at the keyword-only boundary.
pub const KW_ONLY_MARKER: &str = "py::kw_only()";

/// The position used to name the return type in errors.
pub const RETURN_POSITION: &str = "(return)";

/// The role of an entry in a host parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// An ordinary named parameter.
    Positional,
    /// The `/` boundary.
    PositionalOnlyMarker,
    /// The bare `*` boundary.
    KeywordOnlyMarker,
    /// `*args`.
    VarArgs,
    /// `**kwargs`.
    VarKeywordArgs,
}

impl ParamKind {
    /// Returns `true` for the `/` and `*` boundary markers.
    pub fn is_marker(self) -> bool {
        matches!(
            self,
            ParamKind::PositionalOnlyMarker | ParamKind::KeywordOnlyMarker
        )
    }
}

/// One entry of a host parameter list, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostParam {
    /// Parameter name; `/` or `*` for boundary markers.
    pub name: String,
    /// Annotation text, if any.
    pub annotation: Option<String>,
    /// Default value text, if any.
    pub default: Option<String>,
    /// What kind of entry this is.
    pub kind: ParamKind,
}

impl HostParam {
    /// An ordinary annotated parameter without a default.
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
            default: None,
            kind: ParamKind::Positional,
        }
    }

    /// Sets the default value text.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The `/` boundary marker.
    pub fn positional_only_marker() -> Self {
        Self::marker("/", ParamKind::PositionalOnlyMarker)
    }

    /// The bare `*` boundary marker.
    pub fn keyword_only_marker() -> Self {
        Self::marker("*", ParamKind::KeywordOnlyMarker)
    }

    fn marker(name: &str, kind: ParamKind) -> Self {
        Self {
            name: name.to_string(),
            annotation: None,
            default: None,
            kind,
        }
    }

    /// Parses a single parameter entry such as `b: str = "x"` or `**kw: Any`.
    fn parse(entry: &str) -> Result<Self, String> {
        match entry {
            "/" => return Ok(Self::positional_only_marker()),
            "*" => return Ok(Self::keyword_only_marker()),
            _ => {}
        }

        let (head, default) = match find_top_level(entry, '=') {
            Some(idx) => (entry[..idx].trim(), Some(entry[idx + 1..].trim().to_string())),
            None => (entry, None),
        };
        let (name, annotation) = match find_top_level(head, ':') {
            Some(idx) => (head[..idx].trim(), Some(head[idx + 1..].trim().to_string())),
            None => (head, None),
        };

        let (kind, name) = if let Some(rest) = name.strip_prefix("**") {
            (ParamKind::VarKeywordArgs, rest)
        } else if let Some(rest) = name.strip_prefix('*') {
            (ParamKind::VarArgs, rest)
        } else {
            (ParamKind::Positional, name)
        };

        let valid_name = name
            .chars()
            .next()
            .is_some_and(|c| c == '_' || c.is_alphabetic())
            && name.chars().all(|c| c == '_' || c.is_alphanumeric());
        if !valid_name {
            return Err(format!("invalid parameter name '{name}'"));
        }
        if matches!(annotation.as_deref(), Some("")) {
            return Err(format!("empty annotation for parameter '{name}'"));
        }
        if matches!(default.as_deref(), Some("")) {
            return Err(format!("empty default for parameter '{name}'"));
        }
        if default.is_some() && kind != ParamKind::Positional {
            return Err(format!("variadic parameter '{name}' cannot have a default"));
        }

        Ok(Self {
            name: name.to_string(),
            annotation,
            default,
            kind,
        })
    }
}

/// A host function signature: ordered parameters and an optional return annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostSignature {
    /// The function name, when parsed from a `def name(...)` header.
    pub name: Option<String>,
    /// Parameters, including boundary markers, in source order.
    pub params: Vec<HostParam>,
    /// Return annotation text; `None` when the signature has no `->`.
    pub returns: Option<String>,
}

impl HostSignature {
    /// Parses signature text.
    ///
    /// Accepts `(params) -> ret`, optionally preceded by `def name` and
    /// followed by `:`. Parameter entries are split on top-level commas only,
    /// so `dict[str, int]` stays one annotation.
    pub fn parse(text: &str) -> Result<Self, SignatureError> {
        let malformed = |reason: String| SignatureError::MalformedSignature {
            text: text.to_string(),
            reason,
        };

        let trimmed = text.trim();
        let open = trimmed
            .find('(')
            .ok_or_else(|| malformed("missing '('".to_string()))?;
        let close = matching_paren(trimmed, open)
            .ok_or_else(|| malformed("unbalanced parentheses".to_string()))?;

        let head = trimmed[..open].trim();
        let name = match head.strip_prefix("def") {
            Some(rest) if rest.starts_with(char::is_whitespace) => Some(rest.trim().to_string()),
            _ if head.is_empty() => None,
            _ => Some(head.to_string()),
        };

        let mut params = Vec::new();
        for entry in split_top_level(&trimmed[open + 1..close]) {
            params.push(HostParam::parse(entry).map_err(malformed)?);
        }

        let mut tail = trimmed[close + 1..].trim();
        if let Some(rest) = tail.strip_suffix(':') {
            tail = rest.trim_end();
        }
        let returns = if tail.is_empty() {
            None
        } else {
            let ret = tail
                .strip_prefix("->")
                .ok_or_else(|| malformed(format!("unexpected text after parameters: '{tail}'")))?
                .trim();
            if ret.is_empty() {
                return Err(malformed("empty return annotation".to_string()));
            }
            Some(ret.to_string())
        };

        let signature = Self {
            name,
            params,
            returns,
        };
        signature.check_markers().map_err(malformed)?;
        Ok(signature)
    }

    fn check_markers(&self) -> Result<(), String> {
        let position = |kind: ParamKind| self.params.iter().position(|p| p.kind == kind);
        let count = |kind: ParamKind| self.params.iter().filter(|p| p.kind == kind).count();

        for kind in [
            ParamKind::PositionalOnlyMarker,
            ParamKind::KeywordOnlyMarker,
            ParamKind::VarArgs,
            ParamKind::VarKeywordArgs,
        ] {
            if count(kind) > 1 {
                return Err(format!("{kind:?} appears more than once"));
            }
        }
        if let (Some(pos), Some(kw)) = (
            position(ParamKind::PositionalOnlyMarker),
            position(ParamKind::KeywordOnlyMarker),
        ) {
            if kw < pos {
                return Err("'*' must come after '/'".to_string());
            }
        }
        if position(ParamKind::KeywordOnlyMarker).is_some() && position(ParamKind::VarArgs).is_some()
        {
            return Err("'*' and '*args' cannot both appear".to_string());
        }
        if let Some(kw) = position(ParamKind::VarKeywordArgs) {
            if kw + 1 != self.params.len() {
                return Err("'**kwargs' must be the last parameter".to_string());
            }
        }
        Ok(())
    }

    /// Positions without annotations, in order, with `(return)` last.
    ///
    /// Boundary markers never need one. Variadics are listed when bare even
    /// though their annotation is never translated.
    pub fn missing_annotations(&self) -> Vec<String> {
        let mut missing: Vec<String> = self
            .params
            .iter()
            .filter(|p| !p.kind.is_marker() && p.annotation.is_none())
            .map(|p| p.name.clone())
            .collect();
        if self.returns.is_none() {
            missing.push(RETURN_POSITION.to_string());
        }
        missing
    }
}

/// A translated parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Parameter name; `/` or `*` for boundary markers.
    pub name: String,
    /// The translated type. Absent for markers and variadics.
    pub target: Option<TargetType>,
    /// Rendered C++ default value.
    pub default: Option<String>,
    /// What kind of entry this is.
    pub kind: ParamKind,
}

/// The result of translating a host signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedSignature {
    /// The lambda header, e.g. `[](int a) -> int`.
    pub rendered: String,
    /// pybind11 argument annotations in binding order.
    pub binding_annotations: Vec<String>,
    /// Headers required by parameter and return types, duplicates included.
    pub headers: Vec<String>,
    /// Translated parameters, in source order.
    pub params: Vec<ParameterSpec>,
    /// The translated return type.
    pub returns: TargetType,
}

/// Translates a host signature into a lambda header, binding annotations, and
/// required headers.
///
/// `function` names the function in error messages. Variadic parameters are
/// not translated: they always render as `py::args` / `const py::kwargs&` and
/// never produce a binding annotation.
pub fn translate_signature(
    function: &str,
    signature: &HostSignature,
) -> Result<TranslatedSignature, SignatureError> {
    let type_error = |position: &str, source| SignatureError::Type {
        function: function.to_string(),
        position: position.to_string(),
        source,
    };

    let missing = signature.missing_annotations();
    if !missing.is_empty() {
        return Err(SignatureError::MissingAnnotation {
            function: function.to_string(),
            missing,
        });
    }

    let mut headers = Vec::new();
    let mut arg_defs = Vec::new();
    let mut annotations = Vec::new();
    let mut params = Vec::with_capacity(signature.params.len());

    for param in &signature.params {
        let name = &param.name;
        let mut target = None;
        let mut default = None;
        match param.kind {
            ParamKind::PositionalOnlyMarker => annotations.push(POS_ONLY_MARKER.to_string()),
            ParamKind::KeywordOnlyMarker => annotations.push(KW_ONLY_MARKER.to_string()),
            ParamKind::VarArgs => arg_defs.push(format!("py::args {name}")),
            ParamKind::VarKeywordArgs => arg_defs.push(format!("const py::kwargs& {name}")),
            ParamKind::Positional => {
                let annotation = param.annotation.as_deref().unwrap_or_default();
                let translated = translate(annotation).map_err(|e| type_error(name, e))?;
                headers.extend(translated.headers().into_iter().map(String::from));

                let mut arg_def = format!("{translated} {name}");
                let mut annotation = format!("py::arg(\"{name}\")");
                if let Some(value) = &param.default {
                    let value = render_default(value);
                    arg_def.push_str(&format!("={value}"));
                    annotation.push_str(&format!("={value}"));
                    default = Some(value);
                }
                arg_defs.push(arg_def);
                annotations.push(annotation);
                target = Some(translated);
            }
        }
        params.push(ParameterSpec {
            name: name.clone(),
            target,
            default,
            kind: param.kind,
        });
    }

    let return_text = signature.returns.as_deref().ok_or_else(|| SignatureError::MissingAnnotation {
        function: function.to_string(),
        missing: vec![RETURN_POSITION.to_string()],
    })?;
    let returns = translate(return_text).map_err(|e| type_error(RETURN_POSITION, e))?;
    headers.extend(returns.headers().into_iter().map(String::from));

    let rendered = format!("[]({}) -> {returns}", arg_defs.join(", "));

    Ok(TranslatedSignature {
        rendered,
        binding_annotations: annotations,
        headers,
        params,
        returns,
    })
}

/// Renders a host default value as C++.
///
/// Booleans and `None` use their C++/pybind11 spellings; single-quoted strings
/// become double-quoted. Everything else passes through unchanged.
pub fn render_default(value: &str) -> String {
    match value {
        "True" => return "true".to_string(),
        "False" => return "false".to_string(),
        "None" => return "py::none()".to_string(),
        _ => {}
    }
    if let Some(inner) = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        let unescaped = inner.replace("\\'", "'");
        return format!("\"{}\"", unescaped.replace('"', "\\\""));
    }
    value.to_string()
}

/// Splits text on commas that are not nested inside brackets or quotes.
///
/// `a: dict[str, int], b: int` splits into two entries; empty entries (for
/// instance from a trailing comma) are dropped and each entry is trimmed.
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (idx, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts.retain(|p| !p.is_empty());
    parts
}

/// Finds the first occurrence of `target` outside brackets and quotes.
///
/// For `=`, comparison operators (`==`, `<=`, `>=`, `!=`) are skipped.
fn find_top_level(text: &str, target: char) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '[' | '(' | '{' => depth += 1,
            ']' | ')' | '}' => depth = depth.saturating_sub(1),
            c if c == target && depth == 0 => {
                if target == '=' {
                    let prev = idx.checked_sub(1).map(|i| bytes[i]);
                    let next = bytes.get(idx + 1).copied();
                    if next == Some(b'=') || matches!(prev, Some(b'=' | b'<' | b'>' | b'!')) {
                        continue;
                    }
                }
                return Some(idx);
            }
            _ => {}
        }
    }
    None
}

/// Returns the index of the `)` matching the `(` at `open`.
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (idx, c) in text[open..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + idx);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate_text(text: &str) -> TranslatedSignature {
        let sig = HostSignature::parse(text).unwrap();
        translate_signature("f", &sig).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_parameter() {
        let t = translate_text("(_i: int) -> None");
        assert_eq!(t.rendered, "[](int _i) -> void");
        assert_eq!(t.binding_annotations, strings(&["py::arg(\"_i\")"]));
        assert!(t.headers.is_empty());
    }

    #[test]
    fn several_parameters_collect_headers() {
        let t = translate_text("(a: float, b: str, c: bool) -> int");
        assert_eq!(t.rendered, "[](double a, std::string b, bool c) -> int");
        assert_eq!(
            t.binding_annotations,
            strings(&["py::arg(\"a\")", "py::arg(\"b\")", "py::arg(\"c\")"])
        );
        assert_eq!(t.headers, strings(&["<string>"]));
    }

    #[test]
    fn qualified_and_overridden_parameters() {
        let t = translate_text("(a: float, b: Annotated[str, CppQualifier.CRef], c: bool) -> int");
        assert_eq!(t.rendered, "[](double a, const std::string& b, bool c) -> int");
        assert_eq!(t.headers, strings(&["<string>"]));

        let t = translate_text("(a: float, b: Annotated[str, \"const char*\"], c: bool) -> int");
        assert_eq!(t.rendered, "[](double a, const char* b, bool c) -> int");
        assert!(t.headers.is_empty());
    }

    #[test]
    fn keyword_only_with_kwargs() {
        let t = translate_text(
            "(a: float, *, b: Annotated[str, \"const char*\"], c: bool, **kwargs: Any) -> int",
        );
        assert_eq!(
            t.rendered,
            "[](double a, const char* b, bool c, const py::kwargs& kwargs) -> int"
        );
        assert_eq!(
            t.binding_annotations,
            strings(&["py::arg(\"a\")", "py::kw_only()", "py::arg(\"b\")", "py::arg(\"c\")"])
        );
        assert!(t.headers.is_empty());
    }

    #[test]
    fn both_boundary_markers() {
        let t = translate_text("(a: int, b: int, /, c: int, *, d: int) -> None");
        assert_eq!(
            t.binding_annotations,
            strings(&[
                "py::arg(\"a\")",
                "py::arg(\"b\")",
                "py::pos_only()",
                "py::arg(\"c\")",
                "py::kw_only()",
                "py::arg(\"d\")",
            ])
        );
        assert_eq!(t.rendered, "[](int a, int b, int c, int d) -> void");
    }

    #[test]
    fn leading_and_trailing_markers() {
        let t = translate_text("(*, c: int) -> None");
        assert_eq!(t.binding_annotations, strings(&["py::kw_only()", "py::arg(\"c\")"]));

        let t = translate_text("(a: float, c: int, /) -> None");
        assert_eq!(
            t.binding_annotations,
            strings(&["py::arg(\"a\")", "py::arg(\"c\")", "py::pos_only()"])
        );
    }

    #[test]
    fn boolean_default_after_keyword_boundary() {
        let t = translate_text("(a: float, *, c: bool = True) -> None");
        assert_eq!(t.rendered, "[](double a, bool c=true) -> void");
        assert_eq!(
            t.binding_annotations,
            strings(&["py::arg(\"a\")", "py::kw_only()", "py::arg(\"c\")=true"])
        );
        assert_eq!(t.params[2].default.as_deref(), Some("true"));
    }

    #[test]
    fn keyword_only_without_default_renders_plainly() {
        let t = translate_text("(*, c: int, d: int = 4) -> None");
        assert_eq!(t.rendered, "[](int c, int d=4) -> void");
    }

    #[test]
    fn nested_generics_and_callables() {
        let t = translate_text(
            "(a: tuple[int, tuple[int, float]], *, value: Callable[[int, float], bool]) -> bool",
        );
        assert_eq!(
            t.rendered,
            "[](std::tuple<int, std::tuple<int, double>> a, std::function<bool(int, double)> value) -> bool"
        );
        assert_eq!(
            t.binding_annotations,
            strings(&["py::arg(\"a\")", "py::kw_only()", "py::arg(\"value\")"])
        );
        assert_eq!(
            t.headers,
            strings(&["<pybind11/stl.h>", "<pybind11/stl.h>", "<pybind11/functional.h>"])
        );
    }

    #[test]
    fn varargs_skip_translation_and_annotations() {
        let t = translate_text("(n: int, *args: Widget, **kw: Gadget) -> int");
        assert_eq!(t.rendered, "[](int n, py::args args, const py::kwargs& kw) -> int");
        assert_eq!(t.binding_annotations, strings(&["py::arg(\"n\")"]));
        assert!(t.params[1].target.is_none());
    }

    #[test]
    fn missing_return_is_rejected() {
        let sig = HostSignature::parse("(a: int)").unwrap();
        let err = translate_signature("f", &sig).unwrap_err();
        assert_eq!(err.to_string(), "function f has missing annotations: (return)");
    }

    #[test]
    fn missing_return_listed_after_parameters() {
        let sig = HostSignature::parse("(a: int, b)").unwrap();
        match translate_signature("f", &sig).unwrap_err() {
            SignatureError::MissingAnnotation { function, missing } => {
                assert_eq!(function, "f");
                assert_eq!(missing, strings(&["b", "(return)"]));
            }
            other => panic!("expected missing annotations, got {other:?}"),
        }
    }

    #[test]
    fn explicit_none_return_renders_void() {
        let t = translate_text("(a: int) -> None");
        assert_eq!(t.rendered, "[](int a) -> void");
        assert!(t.returns.is_void());
    }

    #[test]
    fn return_headers_follow_parameter_headers() {
        let t = translate_text("(a: str) -> list[int]");
        assert_eq!(t.headers, strings(&["<string>", "<pybind11/stl.h>"]));
    }

    #[test]
    fn unmapped_parameter_type_names_position() {
        let sig = HostSignature::parse("(x: Widget) -> None").unwrap();
        let err = translate_signature("process", &sig).unwrap_err();
        match err {
            SignatureError::Type {
                function,
                position,
                source,
            } => {
                assert_eq!(function, "process");
                assert_eq!(position, "x");
                assert!(matches!(source, ferrule_types::TypeError::UnmappedType { .. }));
            }
            other => panic!("expected type error, got {other:?}"),
        }
    }

    #[test]
    fn parse_def_header() {
        let sig = HostSignature::parse("def max(i: int, j: int) -> int:").unwrap();
        assert_eq!(sig.name.as_deref(), Some("max"));
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.returns.as_deref(), Some("int"));
    }

    #[test]
    fn parse_defaults_with_commas() {
        let sig = HostSignature::parse("(a: tuple[int, int] = (1, 2), b: str = 'x, y') -> None").unwrap();
        assert_eq!(sig.params[0].annotation.as_deref(), Some("tuple[int, int]"));
        assert_eq!(sig.params[0].default.as_deref(), Some("(1, 2)"));
        assert_eq!(sig.params[1].default.as_deref(), Some("'x, y'"));
    }

    #[test]
    fn parse_marker_kinds() {
        let sig = HostSignature::parse("(a: int, /, b: int, *args: Any, **kw: Any) -> None").unwrap();
        let kinds: Vec<ParamKind> = sig.params.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ParamKind::Positional,
                ParamKind::PositionalOnlyMarker,
                ParamKind::Positional,
                ParamKind::VarArgs,
                ParamKind::VarKeywordArgs,
            ]
        );
        assert_eq!(sig.params[3].name, "args");
    }

    #[test]
    fn parse_rejects_bad_marker_order() {
        assert!(HostSignature::parse("(*, a: int, /) -> None").is_err());
        assert!(HostSignature::parse("(**kw: Any, a: int) -> None").is_err());
        assert!(HostSignature::parse("(a: int, /, /) -> None").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(HostSignature::parse("a: int").is_err());
        assert!(HostSignature::parse("(a: int").is_err());
        assert!(HostSignature::parse("(a: int) => int").is_err());
        assert!(HostSignature::parse("(1a: int) -> int").is_err());
    }

    #[test]
    fn missing_annotations_listed_in_order() {
        let sig = HostSignature::parse("(a, b: int, /, c, *args)").unwrap();
        assert_eq!(sig.missing_annotations(), strings(&["a", "c", "args", "(return)"]));
    }

    #[test]
    fn missing_annotations_reported_together() {
        let sig = HostSignature::parse("(a, b: int, c) -> int").unwrap();
        let err = translate_signature("g", &sig).unwrap_err();
        assert_eq!(
            err.to_string(),
            "function g has missing annotations: a, c"
        );
    }

    #[test]
    fn split_respects_nesting() {
        assert_eq!(
            split_top_level("a: dict[str, int], b: Callable[[int, float], bool], c: int"),
            vec!["a: dict[str, int]", "b: Callable[[int, float], bool]", "c: int"]
        );
        assert_eq!(split_top_level("x: str = \"a,b\", y: int"), vec!["x: str = \"a,b\"", "y: int"]);
        assert!(split_top_level("  ").is_empty());
        assert_eq!(split_top_level("a: int,"), vec!["a: int"]);
    }

    #[test]
    fn default_rendering() {
        assert_eq!(render_default("True"), "true");
        assert_eq!(render_default("False"), "false");
        assert_eq!(render_default("None"), "py::none()");
        assert_eq!(render_default("'hi'"), "\"hi\"");
        assert_eq!(render_default("'say \"hi\"'"), "\"say \\\"hi\\\"\"");
        assert_eq!(render_default("\"hi\""), "\"hi\"");
        assert_eq!(render_default("3.5"), "3.5");
    }

    #[test]
    fn builder_matches_parsed() {
        let built = HostSignature {
            name: None,
            params: vec![
                HostParam::new("a", "int"),
                HostParam::keyword_only_marker(),
                HostParam::new("b", "bool").with_default("False"),
            ],
            returns: Some("None".to_string()),
        };
        let parsed = HostSignature::parse("(a: int, *, b: bool = False) -> None").unwrap();
        assert_eq!(built, parsed);
    }
}
