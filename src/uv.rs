//! Vertical orientation of texture coordinates.
//!
//! The legacy format stores `v` flipped (`1 - v`) relative to the authoring tool, except for car
//! and group-textured assets, which are stored as authored. The current format never flips.
//!
//! Flipping is its own inverse, so [encode_uv_v] undoes exactly what [resolve_uv_v] does.

use num_traits::Float;

use crate::{AssetFlags, FormatVariant, Texcoord};

#[inline]
fn flips(flags: AssetFlags, variant: FormatVariant) -> bool {
    variant == FormatVariant::Legacy && !flags.keeps_uv_orientation()
}

/// Convert a stored `v` coordinate to the authoring tool's orientation.
#[inline]
pub fn resolve_uv_v<R: Float>(raw_v: R, flags: AssetFlags, variant: FormatVariant) -> R {
    if flips(flags, variant) {
        R::one() - raw_v
    } else {
        raw_v
    }
}

/// Convert an authored `v` coordinate to its stored orientation.
#[inline]
pub fn encode_uv_v<R: Float>(v: R, flags: AssetFlags, variant: FormatVariant) -> R {
    resolve_uv_v(v, flags, variant)
}

/// [resolve_uv_v], applied to a whole coordinate pair.
#[inline]
pub fn resolve_uv(raw: Texcoord, flags: AssetFlags, variant: FormatVariant) -> Texcoord {
    Texcoord::new(raw.x, resolve_uv_v(raw.y, flags, variant))
}

/// [encode_uv_v], applied to a whole coordinate pair.
#[inline]
pub fn encode_uv(uv: Texcoord, flags: AssetFlags, variant: FormatVariant) -> Texcoord {
    Texcoord::new(uv.x, encode_uv_v(uv.y, flags, variant))
}
