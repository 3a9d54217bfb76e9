use std::io;

use crate::{Channel, Tag};

/// Errors produced while decoding R3D text.
///
/// Every variant carries the 1-based number of the offending line and the tag of the section in
/// which the problem was found. A malformed file never yields a partial mesh.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("line {line}: `{token}` is not a valid {expected} in `{tag}` section")]
    MalformedNumber {
        line: usize,
        tag: Tag,
        token: String,
        expected: &'static str,
    },
    #[error("line {line}: `{tag}` section opened with `{}` but never closed with `{}`", .tag.opener(), .tag.closer())]
    UnterminatedSection { line: usize, tag: Tag },
    #[error("line {line}: `{tag}` section holds {count} indices; each triangle needs exactly 9")]
    TruncatedIndexStream { line: usize, tag: Tag, count: usize },
    #[error("line {line}: `{tag}` section holds {count} values, which is not a multiple of {arity}")]
    IncompleteTuple {
        line: usize,
        tag: Tag,
        count: usize,
        arity: usize,
    },
    #[error("line {line}: {channel} index {index} in `{tag}` section is out of range: 0..{len} ∌ {index}")]
    IndexOutOfRange {
        line: usize,
        tag: Tag,
        channel: Channel,
        index: i64,
        len: usize,
    },
}

impl ParseError {
    /// The line on which decoding failed.
    pub fn line(&self) -> usize {
        match self {
            Self::MalformedNumber { line, .. }
            | Self::UnterminatedSection { line, .. }
            | Self::TruncatedIndexStream { line, .. }
            | Self::IncompleteTuple { line, .. }
            | Self::IndexOutOfRange { line, .. } => *line,
        }
    }

    /// The tag of the section in which decoding failed.
    pub fn tag(&self) -> Tag {
        match self {
            Self::MalformedNumber { tag, .. }
            | Self::UnterminatedSection { tag, .. }
            | Self::TruncatedIndexStream { tag, .. }
            | Self::IncompleteTuple { tag, .. }
            | Self::IndexOutOfRange { tag, .. } => *tag,
        }
    }
}

/// Structural problems within a [MeshData](crate::MeshData).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("triangle {triangle}, corner {corner}: {channel} index out of range: 0..{len} ∌ {index}")]
    IndexOutOfRange {
        triangle: usize,
        corner: usize,
        channel: Channel,
        index: u32,
        len: usize,
    },
    #[error("{channel} count mismatch: {len} stored, but corners reference {corners}")]
    AttributeCountMismatch {
        channel: Channel,
        len: usize,
        corners: usize,
    },
}

/// Errors related to meshes supplied by a [host](crate::host).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("triangle {triangle} references corner {corner}, which does not exist: 0..{len} ∌ {corner}")]
    CornerOutOfRange {
        triangle: usize,
        corner: u32,
        len: usize,
    },
    #[error("corner {corner} references vertex {vertex}, which does not exist: 0..{len} ∌ {vertex}")]
    VertexOutOfRange { corner: u32, vertex: u32, len: usize },
}

/// Errors returned by the reader- and path-based entry points.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
