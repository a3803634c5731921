//! Mapping type trees onto C++ types.
//!
//! The mapping is a closed enumeration ([`TargetKind`]) rather than an open
//! string table: every host name either resolves to a kind or translation
//! fails with [`TypeError::UnmappedType`].

use std::fmt;

use crate::annotation::{parse_annotation, Extra};
use crate::error::TypeError;
use crate::expr::parse_expr;
use crate::qualifier::Qualifier;
use crate::tree::{TypeNode, CALLABLE, UNION};

const PYBIND11_STL: &str = "<pybind11/stl.h>";
const PYBIND11_COMPLEX: &str = "<pybind11/complex.h>";
const PYBIND11_NUMPY: &str = "<pybind11/numpy.h>";
const PYBIND11_FUNCTIONAL: &str = "<pybind11/functional.h>";

/// Every C++ base type a host type can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// `None` → `void`
    Void,
    /// `int` → `int`
    Int,
    /// `np.int32` → `int32_t`
    Int32,
    /// `np.int64` → `int64_t`
    Int64,
    /// `bool` → `bool`
    Bool,
    /// `float`, `np.float64` → `double`
    Double,
    /// `np.float32` → `float`
    Float,
    /// `complex`, `np.complex128` → `std::complex<double>`
    ComplexDouble,
    /// `np.complex64` → `std::complex<float>`
    ComplexFloat,
    /// `str` → `std::string`
    String,
    /// `np.ndarray`, `npt.NDArray` → `py::array_t`
    Array,
    /// `bytes` → `py::bytes`
    Bytes,
    /// `bytearray` → `py::bytearray`
    ByteArray,
    /// `list` → `std::vector`
    Vector,
    /// `set` → `std::unordered_set`
    UnorderedSet,
    /// `frozenset` → `const std::unordered_set`
    FrozenSet,
    /// `dict` → `std::unordered_map`
    UnorderedMap,
    /// `tuple` → `std::tuple`
    Tuple,
    /// `slice` → `py::slice`
    Slice,
    /// `Any`, `Self` → `py::object`
    Object,
    /// `type` → `py::type`
    Type,
    /// A union without `None` → `std::variant`
    Variant,
    /// A union containing `None` → `std::optional`
    Optional,
    /// `Callable` → `std::function`
    Function,
    /// `...` → `py::ellipsis`
    Ellipsis,
}

impl TargetKind {
    /// Resolves a host type name (as written in the source) to a kind.
    pub fn lookup(name: &str) -> Option<Self> {
        if let Some(numpy) = name
            .strip_prefix("np.")
            .or_else(|| name.strip_prefix("numpy."))
        {
            return Self::lookup_numpy(numpy);
        }

        let bare = ["typing.", "builtins.", "collections.abc.", "typing_extensions."]
            .iter()
            .find_map(|prefix| name.strip_prefix(prefix))
            .unwrap_or(name);

        let kind = match bare {
            "int" => TargetKind::Int,
            "bool" => TargetKind::Bool,
            "float" => TargetKind::Double,
            "complex" => TargetKind::ComplexDouble,
            "str" => TargetKind::String,
            "bytes" => TargetKind::Bytes,
            "bytearray" => TargetKind::ByteArray,
            "list" | "List" => TargetKind::Vector,
            "set" | "Set" => TargetKind::UnorderedSet,
            "frozenset" | "FrozenSet" => TargetKind::FrozenSet,
            "dict" | "Dict" => TargetKind::UnorderedMap,
            "tuple" | "Tuple" => TargetKind::Tuple,
            "slice" => TargetKind::Slice,
            "Any" | "Self" => TargetKind::Object,
            "type" | "Type" => TargetKind::Type,
            "NDArray" | "npt.NDArray" => TargetKind::Array,
            UNION => TargetKind::Variant,
            CALLABLE => TargetKind::Function,
            _ => return None,
        };
        Some(kind)
    }

    fn lookup_numpy(name: &str) -> Option<Self> {
        let kind = match name {
            "int32" => TargetKind::Int32,
            "int64" => TargetKind::Int64,
            "float32" => TargetKind::Float,
            "float64" => TargetKind::Double,
            "complex64" => TargetKind::ComplexFloat,
            "complex128" => TargetKind::ComplexDouble,
            "ndarray" | "typing.NDArray" => TargetKind::Array,
            "bool_" => TargetKind::Bool,
            _ => return None,
        };
        Some(kind)
    }

    /// Resolves a type tree node to a kind.
    pub fn of_node(node: &TypeNode) -> Option<Self> {
        match node {
            TypeNode::None => Some(TargetKind::Void),
            TypeNode::Ellipsis => Some(TargetKind::Ellipsis),
            TypeNode::Primitive(name) | TypeNode::Container { name, .. } => Self::lookup(name),
        }
    }

    /// The C++ spelling of this kind, without template arguments.
    pub fn name(self) -> &'static str {
        match self {
            TargetKind::Void => "void",
            TargetKind::Int => "int",
            TargetKind::Int32 => "int32_t",
            TargetKind::Int64 => "int64_t",
            TargetKind::Bool => "bool",
            TargetKind::Double => "double",
            TargetKind::Float => "float",
            TargetKind::ComplexDouble => "std::complex<double>",
            TargetKind::ComplexFloat => "std::complex<float>",
            TargetKind::String => "std::string",
            TargetKind::Array => "py::array_t",
            TargetKind::Bytes => "py::bytes",
            TargetKind::ByteArray => "py::bytearray",
            TargetKind::Vector => "std::vector",
            TargetKind::UnorderedSet => "std::unordered_set",
            TargetKind::FrozenSet => "const std::unordered_set",
            TargetKind::UnorderedMap => "std::unordered_map",
            TargetKind::Tuple => "std::tuple",
            TargetKind::Slice => "py::slice",
            TargetKind::Object => "py::object",
            TargetKind::Type => "py::type",
            TargetKind::Variant => "std::variant",
            TargetKind::Optional => "std::optional",
            TargetKind::Function => "std::function",
            TargetKind::Ellipsis => "py::ellipsis",
        }
    }

    /// The header this kind needs for pybind11 conversions, if any.
    pub fn header(self) -> Option<&'static str> {
        match self {
            TargetKind::ComplexDouble | TargetKind::ComplexFloat => Some(PYBIND11_COMPLEX),
            TargetKind::String => Some("<string>"),
            TargetKind::Vector
            | TargetKind::UnorderedSet
            | TargetKind::FrozenSet
            | TargetKind::UnorderedMap
            | TargetKind::Tuple
            | TargetKind::Variant
            | TargetKind::Optional => Some(PYBIND11_STL),
            TargetKind::Array => Some(PYBIND11_NUMPY),
            TargetKind::Function => Some(PYBIND11_FUNCTIONAL),
            TargetKind::Void
            | TargetKind::Int
            | TargetKind::Int32
            | TargetKind::Int64
            | TargetKind::Bool
            | TargetKind::Double
            | TargetKind::Float
            | TargetKind::Bytes
            | TargetKind::ByteArray
            | TargetKind::Slice
            | TargetKind::Object
            | TargetKind::Type
            | TargetKind::Ellipsis => None,
        }
    }
}

/// A translated C++ type.
///
/// When `override_text` is set it is rendered verbatim: the qualifier is not
/// reapplied, subtypes are not rendered, and no headers are reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetType {
    /// The mapped base kind. `None` only when an override is present.
    pub base: Option<TargetKind>,
    /// Literal C++ text replacing the whole rendering.
    pub override_text: Option<String>,
    /// Reference or pointer wrapping applied to the rendering.
    pub qualifier: Option<Qualifier>,
    /// Translated type arguments, in order.
    pub subtypes: Vec<TargetType>,
}

impl TargetType {
    fn plain(base: TargetKind, subtypes: Vec<TargetType>) -> Self {
        Self {
            base: Some(base),
            override_text: None,
            qualifier: None,
            subtypes,
        }
    }

    /// Translates a type tree, applying an optional extra at the top level.
    pub fn from_node(node: &TypeNode, extra: Option<Extra>) -> Result<Self, TypeError> {
        let qualifier = match extra {
            Some(Extra::Override(text)) => {
                return Ok(Self {
                    base: None,
                    override_text: Some(text),
                    qualifier: None,
                    subtypes: Vec::new(),
                });
            }
            Some(Extra::Qualifier(q)) => Some(q),
            None => None,
        };

        let mut translated = Self::map_node(node)?;
        translated.qualifier = qualifier;
        Ok(translated)
    }

    fn map_node(node: &TypeNode) -> Result<Self, TypeError> {
        let base = TargetKind::of_node(node).ok_or_else(|| TypeError::UnmappedType {
            name: node.name().to_string(),
        })?;
        let args = node.args();

        match base {
            TargetKind::Array if !args.is_empty() => {
                let element = array_element(node)?;
                Ok(Self::plain(base, vec![Self::map_node(element)?]))
            }
            TargetKind::Function => {
                let subtypes = args.iter().map(Self::map_node).collect::<Result<_, _>>()?;
                Ok(Self::plain(base, subtypes))
            }
            _ => {
                let subtypes: Vec<TargetType> = args
                    .iter()
                    .filter(|arg| !arg.is_none())
                    .map(Self::map_node)
                    .collect::<Result<_, _>>()?;
                if base == TargetKind::Variant && subtypes.len() < args.len() {
                    return Ok(Self::optional_of(subtypes));
                }
                Ok(Self::plain(base, subtypes))
            }
        }
    }

    /// `T | None` becomes `optional<T>`; `T | U | None` becomes
    /// `optional<variant<T, U>>`.
    fn optional_of(members: Vec<TargetType>) -> Self {
        if members.len() > 1 {
            return Self::plain(
                TargetKind::Optional,
                vec![Self::plain(TargetKind::Variant, members)],
            );
        }
        Self::plain(TargetKind::Optional, members)
    }

    /// Headers needed by this type, pre-order, duplicates included.
    pub fn headers(&self) -> Vec<&'static str> {
        let mut collected = Vec::new();
        self.collect_headers(&mut collected);
        collected
    }

    fn collect_headers(&self, collected: &mut Vec<&'static str>) {
        // an overridden type must bring its own headers
        if self.override_text.is_some() {
            return;
        }
        if let Some(header) = self.base.and_then(TargetKind::header) {
            collected.push(header);
        }
        for subtype in &self.subtypes {
            subtype.collect_headers(collected);
        }
    }

    /// Returns `true` if this is the `void` type with no override.
    pub fn is_void(&self) -> bool {
        self.override_text.is_none() && self.base == Some(TargetKind::Void)
    }
}

/// Extracts the element dtype of an array type, discarding shape information.
///
/// Accepts `NDArray[T]`, `ndarray[Shape, dtype[T]]`, and `ndarray[Shape, T]`.
fn array_element(node: &TypeNode) -> Result<&TypeNode, TypeError> {
    match node.args() {
        [element] => Ok(element),
        [_shape, dtype] => match dtype {
            TypeNode::Container { name, args }
                if matches!(name.as_str(), "dtype" | "np.dtype" | "numpy.dtype") =>
            {
                match args.as_slice() {
                    [element] => Ok(element),
                    _ => Err(TypeError::malformed_type(
                        node.to_string(),
                        "dtype takes exactly one element type",
                    )),
                }
            }
            other => Ok(other),
        },
        _ => Err(TypeError::malformed_type(
            node.to_string(),
            "array types take an element type, optionally preceded by a shape",
        )),
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = &self.override_text {
            return f.write_str(text);
        }

        let base = self.base.map_or("", TargetKind::name);
        let mut rendered = base.to_string();
        match (self.base, self.subtypes.split_first()) {
            (Some(TargetKind::Function), Some((ret, params))) => {
                let params: Vec<String> = params.iter().map(ToString::to_string).collect();
                rendered = format!("{base}<{ret}({})>", params.join(", "));
            }
            (_, Some(_)) => {
                let args: Vec<String> = self.subtypes.iter().map(ToString::to_string).collect();
                rendered = format!("{base}<{}>", args.join(", "));
            }
            (_, None) => {}
        }

        match self.qualifier {
            Some(q) => f.write_str(&q.apply(&rendered)),
            None => f.write_str(&rendered),
        }
    }
}

/// Translates host annotation text into a C++ type.
///
/// Splits off any `Annotated` extra, parses the base into a [`TypeNode`], and
/// maps it through the [`TargetKind`] table.
pub fn translate(text: &str) -> Result<TargetType, TypeError> {
    let (base, extra) = parse_annotation(parse_expr(text)?)?;
    let node = TypeNode::from_expr(&base)?;
    TargetType::from_node(&node, extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str) -> String {
        translate(text).unwrap().to_string()
    }

    fn headers(text: &str) -> Vec<&'static str> {
        translate(text).unwrap().headers()
    }

    #[test]
    fn basic_types() {
        assert_eq!(render("int"), "int");
        assert!(headers("int").is_empty());
        assert_eq!(render("float"), "double");
        assert_eq!(render("bool"), "bool");
        assert_eq!(render("str"), "std::string");
        assert_eq!(headers("str"), vec!["<string>"]);
        assert_eq!(render("bytes"), "py::bytes");
        assert!(headers("bytes").is_empty());
        assert_eq!(render("None"), "void");
    }

    #[test]
    fn numeric_widths_stay_distinct() {
        assert_eq!(render("np.int32"), "int32_t");
        assert_eq!(render("np.int64"), "int64_t");
        assert_eq!(render("numpy.float32"), "float");
        assert_eq!(render("np.float64"), "double");
        assert_eq!(render("np.complex64"), "std::complex<float>");
        assert_eq!(render("complex"), "std::complex<double>");
        assert_eq!(headers("np.complex64"), vec!["<pybind11/complex.h>"]);
    }

    #[test]
    fn containers() {
        assert_eq!(render("list[int]"), "std::vector<int>");
        assert_eq!(headers("list[int]"), vec!["<pybind11/stl.h>"]);
        assert_eq!(render("set[str]"), "std::unordered_set<std::string>");
        assert_eq!(headers("set[str]"), vec!["<pybind11/stl.h>", "<string>"]);
        assert_eq!(
            render("dict[str, list[bool]]"),
            "std::unordered_map<std::string, std::vector<bool>>"
        );
        assert_eq!(
            headers("dict[str, list[bool]]"),
            vec!["<pybind11/stl.h>", "<string>", "<pybind11/stl.h>"]
        );
        assert_eq!(render("typing.List[float]"), "std::vector<double>");
        assert_eq!(render("frozenset[int]"), "const std::unordered_set<int>");
    }

    #[test]
    fn tuples_and_callables() {
        assert_eq!(
            render("tuple[int, tuple[int, float]]"),
            "std::tuple<int, std::tuple<int, double>>"
        );
        assert_eq!(render("tuple[int, ...]"), "std::tuple<int, py::ellipsis>");
        assert_eq!(
            render("Callable[[int, float], bool]"),
            "std::function<bool(int, double)>"
        );
        assert_eq!(
            headers("Callable[[int, float], bool]"),
            vec!["<pybind11/functional.h>"]
        );
        assert_eq!(render("Callable[[], None]"), "std::function<void()>");
    }

    #[test]
    fn numpy_arrays_unwrap_to_element() {
        assert_eq!(render("npt.NDArray[np.float64]"), "py::array_t<double>");
        assert_eq!(render("NDArray[int]"), "py::array_t<int>");
        assert_eq!(headers("npt.NDArray[int]"), vec!["<pybind11/numpy.h>"]);
        assert_eq!(
            render("np.ndarray[tuple[int, int], np.dtype[np.int32]]"),
            "py::array_t<int32_t>"
        );
        assert_eq!(render("np.ndarray"), "py::array_t");
    }

    #[test]
    fn optional_flattening() {
        assert_eq!(render("int | None"), "std::optional<int>");
        assert_eq!(render("Optional[str]"), "std::optional<std::string>");
        assert_eq!(render("int | float"), "std::variant<int, double>");
        assert_eq!(
            render("int | float | None"),
            "std::optional<std::variant<int, double>>"
        );
        assert_eq!(
            render("None | int | float"),
            "std::optional<std::variant<int, double>>"
        );
        assert_eq!(
            headers("int | float | None"),
            vec!["<pybind11/stl.h>", "<pybind11/stl.h>"]
        );
    }

    #[test]
    fn flattening_applies_at_every_depth() {
        assert_eq!(
            render("list[int | None]"),
            "std::vector<std::optional<int>>"
        );
        assert_eq!(
            render("dict[str, int | str | None] | None"),
            "std::optional<std::unordered_map<std::string, std::optional<std::variant<int, std::string>>>>"
        );
    }

    #[test]
    fn override_replaces_everything() {
        let t = translate("Annotated[list[int], \"custom_list\"]").unwrap();
        assert_eq!(t.to_string(), "custom_list");
        assert!(t.headers().is_empty());
        assert_eq!(t.base, None);

        assert_eq!(render("Annotated[int | float, \"double\"]"), "double");
        assert_eq!(render("Annotated[int | None, \"py::object\"]"), "py::object");
    }

    #[test]
    fn override_accepts_unmapped_base() {
        assert_eq!(render("Annotated[Widget, \"py::object\"]"), "py::object");
        assert_eq!(render("Annotated[list[Widget], 'py::list']"), "py::list");
    }

    #[test]
    fn qualifiers_wrap_full_rendering() {
        assert_eq!(render("Annotated[int, ConstReference]"), "const int&");
        assert_eq!(render("Annotated[int, CppQualifier.CRef]"), "const int&");
        assert_eq!(
            render("Annotated[list[float], ConstPointerToConst]"),
            "const std::vector<double>* const"
        );
        assert_eq!(
            render("Annotated[int | float | None, CRef]"),
            "const std::optional<std::variant<int, double>>&"
        );
        assert_eq!(
            headers("Annotated[list[float], CPtrC]"),
            vec!["<pybind11/stl.h>"]
        );
    }

    #[test]
    fn unmapped_type_fails() {
        let err = translate("Widget").unwrap_err();
        assert_eq!(
            err,
            TypeError::UnmappedType {
                name: "Widget".to_string()
            }
        );
        let err = translate("list[Widget]").unwrap_err();
        assert!(matches!(err, TypeError::UnmappedType { name } if name == "Widget"));
    }

    #[test]
    fn qualifier_does_not_rescue_unmapped_type() {
        assert!(matches!(
            translate("Annotated[Widget, CRef]"),
            Err(TypeError::UnmappedType { .. })
        ));
    }

    #[test]
    fn translation_is_deterministic() {
        for text in [
            "dict[str, list[int | None]]",
            "Annotated[Callable[[int], str], CRef]",
            "tuple[complex, npt.NDArray[np.float32]]",
        ] {
            let a = translate(text).unwrap();
            let b = translate(text).unwrap();
            assert_eq!(a.to_string(), b.to_string());
            assert_eq!(a.headers(), b.headers());
        }
    }

    #[test]
    fn is_void() {
        assert!(translate("None").unwrap().is_void());
        assert!(!translate("Annotated[None, \"void\"]").unwrap().is_void());
        assert!(!translate("int").unwrap().is_void());
    }

    #[test]
    fn lookup_covers_aliases() {
        assert_eq!(TargetKind::lookup("builtins.int"), Some(TargetKind::Int));
        assert_eq!(TargetKind::lookup("typing.Any"), Some(TargetKind::Object));
        assert_eq!(TargetKind::lookup("numpy.typing.NDArray"), Some(TargetKind::Array));
        assert_eq!(TargetKind::lookup("np.uint8"), None);
    }
}
