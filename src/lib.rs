//! Reading & writing of R3D, a line-oriented text format for triangle meshes.
//!
//! An R3D document holds a list of vertex positions, a list of per-corner normals, a list of
//! per-corner UVs, and a list of triangles whose corners index into all three. Two optional
//! directives, `car()` and `grouptexture(n)`, describe the asset as a whole.
//!
//! ```text
//! car()
//! v(0,0,0,1,0,0,0,1,0,)v
//! n(0,0,1,0,0,1,0,0,1,)n
//! t(0,0,1,0,0,1,)t
//! p(0,0,0,1,1,1,2,2,2,)p
//! ```
//!
//! The format isn't self-describing: whether a document uses the [legacy](FormatVariant::Legacy)
//! or [current](FormatVariant::Current) conventions must be known by the caller, and is passed
//! in through [Options].
//!
//! # See Also
//!
//! * [de]: decoding
//! * [ser]: encoding
//! * [host]: conversion to & from per-corner host meshes
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod de;
pub mod error;
pub mod host;
mod mesh;
pub mod ser;
mod tag;
pub mod uv;
mod variant;

pub use error::{Error, HostError, MeshError, ParseError};
pub use mesh::*;
pub use tag::*;
pub use variant::*;

/// Decode an R3D document. See [de::from_str].
#[inline]
pub fn parse(text: &str, options: Options) -> Result<MeshData, ParseError> {
    de::from_str(text, options)
}

/// Encode a mesh as an R3D document. See [ser::to_string].
#[inline]
pub fn serialize(mesh: &MeshData, options: Options) -> String {
    ser::to_string(mesh, options)
}
