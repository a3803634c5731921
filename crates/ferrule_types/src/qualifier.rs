//! Value, reference and pointer qualifiers applied to rendered C++ types.

use std::fmt;

/// How a translated type is passed: by value, reference, or pointer.
///
/// A qualifier only wraps the fully rendered type text. It never affects
/// header inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// `T`
    Value,
    /// `T&`
    Reference,
    /// `const T&`
    ConstReference,
    /// `T&&`
    RValueReference,
    /// `T*`
    Pointer,
    /// `const T*`
    PointerToConst,
    /// `T* const`
    ConstPointer,
    /// `const T* const`
    ConstPointerToConst,
}

impl Qualifier {
    /// All qualifiers, in declaration order.
    pub const ALL: [Qualifier; 8] = [
        Qualifier::Value,
        Qualifier::Reference,
        Qualifier::ConstReference,
        Qualifier::RValueReference,
        Qualifier::Pointer,
        Qualifier::PointerToConst,
        Qualifier::ConstPointer,
        Qualifier::ConstPointerToConst,
    ];

    /// Wraps rendered type text.
    pub fn apply(self, rendered: &str) -> String {
        match self {
            Qualifier::Value => rendered.to_string(),
            Qualifier::Reference => format!("{rendered}&"),
            Qualifier::ConstReference => format!("const {rendered}&"),
            Qualifier::RValueReference => format!("{rendered}&&"),
            Qualifier::Pointer => format!("{rendered}*"),
            Qualifier::PointerToConst => format!("const {rendered}*"),
            Qualifier::ConstPointer => format!("{rendered}* const"),
            Qualifier::ConstPointerToConst => format!("const {rendered}* const"),
        }
    }

    /// The long name used in annotations, e.g. `ConstReference`.
    pub fn name(self) -> &'static str {
        match self {
            Qualifier::Value => "Value",
            Qualifier::Reference => "Reference",
            Qualifier::ConstReference => "ConstReference",
            Qualifier::RValueReference => "RValueReference",
            Qualifier::Pointer => "Pointer",
            Qualifier::PointerToConst => "PointerToConst",
            Qualifier::ConstPointer => "ConstPointer",
            Qualifier::ConstPointerToConst => "ConstPointerToConst",
        }
    }

    /// The short name used in annotations, e.g. `CRef`.
    pub fn short_name(self) -> &'static str {
        match self {
            Qualifier::Value => "Auto",
            Qualifier::Reference => "Ref",
            Qualifier::ConstReference => "CRef",
            Qualifier::RValueReference => "RRef",
            Qualifier::Pointer => "Ptr",
            Qualifier::PointerToConst => "PtrC",
            Qualifier::ConstPointer => "CPtr",
            Qualifier::ConstPointerToConst => "CPtrC",
        }
    }

    /// Resolves an annotation name to a qualifier.
    ///
    /// Accepts long and short names, bare or prefixed with `CppQualifier.`
    /// or `Qualifier.`.
    pub fn from_name(name: &str) -> Option<Self> {
        let bare = name
            .strip_prefix("CppQualifier.")
            .or_else(|| name.strip_prefix("Qualifier."))
            .unwrap_or(name);
        Self::ALL
            .into_iter()
            .find(|q| q.name() == bare || q.short_name() == bare)
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_each_qualifier() {
        let expected = [
            "int",
            "int&",
            "const int&",
            "int&&",
            "int*",
            "const int*",
            "int* const",
            "const int* const",
        ];
        for (q, want) in Qualifier::ALL.into_iter().zip(expected) {
            assert_eq!(q.apply("int"), want, "{q}");
        }
    }

    #[test]
    fn from_long_and_short_names() {
        assert_eq!(Qualifier::from_name("CRef"), Some(Qualifier::ConstReference));
        assert_eq!(
            Qualifier::from_name("ConstReference"),
            Some(Qualifier::ConstReference)
        );
        assert_eq!(
            Qualifier::from_name("CppQualifier.CPtrC"),
            Some(Qualifier::ConstPointerToConst)
        );
        assert_eq!(Qualifier::from_name("Qualifier.Auto"), Some(Qualifier::Value));
    }

    #[test]
    fn unknown_name() {
        assert_eq!(Qualifier::from_name("Shared"), None);
        assert_eq!(Qualifier::from_name("CppQualifier."), None);
    }
}
