use std::{fmt, str::FromStr};

/// Generation of the R3D format.
///
/// Documents don't identify their own generation; it has to be known from context.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatVariant {
    /// UVs are flipped vertically unless the mesh is a car or group-textured; dangling attribute
    /// indices are tolerated.
    #[default]
    Legacy,
    /// UVs are stored as-is; dangling indices are an error.
    Current,
}

impl FormatVariant {
    /// The out-of-range policy this generation of the format was read with.
    #[inline]
    pub fn default_index_policy(self) -> IndexPolicy {
        match self {
            FormatVariant::Legacy => IndexPolicy::Lenient,
            FormatVariant::Current => IndexPolicy::Strict,
        }
    }
}

/// What to do with a normal or uv index outside the bounds of its array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexPolicy {
    /// Leave the corner without that attribute.
    Lenient,
    /// Fail with [ParseError::IndexOutOfRange](crate::ParseError::IndexOutOfRange).
    Strict,
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unrecognized {kind}: {value:?} (expected one of: {expected})")]
pub struct UnknownOption {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl fmt::Display for FormatVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatVariant::Legacy => f.write_str("legacy"),
            FormatVariant::Current => f.write_str("current"),
        }
    }
}

impl FromStr for FormatVariant {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "current" => Ok(Self::Current),
            _ => Err(UnknownOption {
                kind: "format variant",
                value: s.to_owned(),
                expected: "legacy, current",
            }),
        }
    }
}

impl fmt::Display for IndexPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexPolicy::Lenient => f.write_str("lenient"),
            IndexPolicy::Strict => f.write_str("strict"),
        }
    }
}

impl FromStr for IndexPolicy {
    type Err = UnknownOption;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(UnknownOption {
                kind: "index policy",
                value: s.to_owned(),
                expected: "lenient, strict",
            }),
        }
    }
}

/// Settings shared by the [parser](crate::de) and [serializer](crate::ser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Options {
    pub variant: FormatVariant,
    pub index_policy: IndexPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self::new(FormatVariant::default())
    }
}

impl From<FormatVariant> for Options {
    fn from(variant: FormatVariant) -> Self {
        Self::new(variant)
    }
}

impl Options {
    /// Options for `variant`, using that variant's index policy.
    pub fn new(variant: FormatVariant) -> Self {
        Self {
            variant,
            index_policy: variant.default_index_policy(),
        }
    }

    #[inline]
    pub fn legacy() -> Self {
        Self::new(FormatVariant::Legacy)
    }

    #[inline]
    pub fn current() -> Self {
        Self::new(FormatVariant::Current)
    }

    #[inline]
    pub fn with_index_policy(self, index_policy: IndexPolicy) -> Self {
        Self {
            index_policy,
            ..self
        }
    }
}
