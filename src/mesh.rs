use std::fmt;

use nalgebra::{Point2, Point3, Vector3};

use crate::error::MeshError;

/// Position of a vertex.
pub type Position = Point3<f32>;

/// Normal vector of a triangle corner.
pub type Normal = Vector3<f32>;

/// Texture coordinates of a triangle corner.
pub type Texcoord = Point2<f32>;

/// Normal assigned to corners which don't carry one.
#[inline]
pub fn default_normal() -> Normal {
    Normal::z()
}

/// UV assigned to corners which don't carry one.
#[inline]
pub fn default_texcoord() -> Texcoord {
    Texcoord::origin()
}

/// The index spaces referenced by a triangle corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Vertex,
    Normal,
    Uv,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Vertex => f.write_str("vertex"),
            Channel::Normal => f.write_str("normal"),
            Channel::Uv => f.write_str("uv"),
        }
    }
}

/// One use of a vertex by one triangle.
///
/// `normal` and `uv` are `None` when the corner has no attribute of that kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Corner {
    pub vertex: u32,
    pub normal: Option<u32>,
    pub uv: Option<u32>,
}

impl Corner {
    #[inline]
    pub fn new(vertex: u32, normal: Option<u32>, uv: Option<u32>) -> Self {
        Self { vertex, normal, uv }
    }
}

/// Three corners, in winding order.
pub type Triangle = [Corner; 3];

/// Directives attached to a whole mesh.
///
/// In the legacy format these decide whether UVs are vertically flipped; see [crate::uv].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetFlags {
    pub is_car: bool,
    pub is_group_texture: bool,
}

impl AssetFlags {
    pub const NONE: Self = Self {
        is_car: false,
        is_group_texture: false,
    };

    /// Whether legacy UVs are stored in the authoring tool's orientation.
    #[inline]
    pub fn keeps_uv_orientation(self) -> bool {
        self.is_car || self.is_group_texture
    }
}

/// A triangle mesh, as stored within an R3D document.
///
/// # Invariants
///
/// * Every corner's `vertex` is in bounds of `positions`
/// * Every corner's `normal`/`uv`, if present, is in bounds of `normals`/`uvs`
/// * Every entry of a non-empty `normals`/`uvs` is referenced by at least one corner
///
/// `normals` & `uvs` are indexed per corner rather than per vertex, so their lengths are unrelated
/// to that of `positions`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub uvs: Vec<Texcoord>,
    pub faces: Vec<Triangle>,
    pub flags: AssetFlags,
}

impl MeshData {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangle corners; always `faces.len() * 3`.
    #[inline]
    pub fn corner_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Iterate over every corner of every triangle, in slot order.
    pub fn corners(&self) -> impl Iterator<Item = &Corner> + '_ {
        self.faces.iter().flatten()
    }

    /// The normal of each corner, by slot; `None` where the corner has none or its index is dangling.
    pub fn corner_normals(&self) -> Vec<Option<Normal>> {
        self.corners()
            .map(|c| c.normal.and_then(|i| self.normals.get(i as usize)).copied())
            .collect()
    }

    /// The UV of each corner, by slot; `None` where the corner has none or its index is dangling.
    pub fn corner_uvs(&self) -> Vec<Option<Texcoord>> {
        self.corners()
            .map(|c| c.uv.and_then(|i| self.uvs.get(i as usize)).copied())
            .collect()
    }

    /// Check that every index referenced by a corner is in bounds, and that no stored normal or
    /// UV goes unreferenced.
    pub fn validate(&self) -> Result<(), MeshError> {
        for (triangle, corners) in self.faces.iter().enumerate() {
            for (corner, c) in corners.iter().enumerate() {
                let checks = [
                    (Channel::Vertex, Some(c.vertex), self.positions.len()),
                    (Channel::Normal, c.normal, self.normals.len()),
                    (Channel::Uv, c.uv, self.uvs.len()),
                ];
                for (channel, index, len) in checks {
                    match index {
                        Some(index) if index as usize >= len => {
                            return Err(MeshError::IndexOutOfRange {
                                triangle,
                                corner,
                                channel,
                                index,
                                len,
                            })
                        }
                        _ => {}
                    }
                }
            }
        }

        let channels = [
            (Channel::Normal, self.normals.len(), self.referenced(|c| c.normal)),
            (Channel::Uv, self.uvs.len(), self.referenced(|c| c.uv)),
        ];
        for (channel, len, corners) in channels {
            if len != 0 && len != corners {
                return Err(MeshError::AttributeCountMismatch {
                    channel,
                    len,
                    corners,
                });
            }
        }
        Ok(())
    }

    /// Number of distinct indices referenced through `index`.
    fn referenced(&self, index: impl Fn(&Corner) -> Option<u32>) -> usize {
        let mut indices = self.corners().filter_map(index).collect::<Vec<_>>();
        indices.sort_unstable();
        indices.dedup();
        indices.len()
    }
}
