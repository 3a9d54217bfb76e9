//! The boundary between the codec and the application hosting it.
//!
//! Hosts (editors, asset pipelines, ...) deal in per-corner attributes: every corner of every
//! triangle has its own vertex index, normal, and optional UV. [HostMesh] is that shape; it converts
//! to and from [MeshData] without loss for triangulated meshes.

use crate::{
    default_normal, default_texcoord, error::HostError, AssetFlags, Corner, MeshData, Normal,
    Position, Texcoord,
};

/// One corner of a host mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostCorner {
    pub vertex: u32,
    pub normal: Option<Normal>,
    pub uv: Option<Texcoord>,
}

impl HostCorner {
    /// The corner's normal, or `(0, 0, 1)` if it has none.
    #[inline]
    pub fn normal_or_default(&self) -> Normal {
        self.normal.unwrap_or_else(default_normal)
    }
}

/// A triangulated mesh as seen by a host application.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HostMesh {
    pub vertices: Vec<Position>,
    pub corners: Vec<HostCorner>,
    /// Indices into `corners`, three per triangle.
    pub triangles: Vec<[u32; 3]>,
    pub flags: AssetFlags,
}

impl AssetFlags {
    /// Derive asset flags the way the authoring pipeline names things: objects named `car...`
    /// (any case) are cars; any material whose name starts with `g` marks a group texture.
    pub fn infer<'m>(object_name: &str, material_names: impl IntoIterator<Item = &'m str>) -> Self {
        Self {
            is_car: object_name
                .get(..3)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("car")),
            is_group_texture: material_names.into_iter().any(|m| m.starts_with('g')),
        }
    }
}

impl MeshData {
    /// Flatten a host mesh into per-corner R3D data.
    ///
    /// Normals & UVs are stored once per triangle corner, in triangle order; each corner's normal
    /// and uv index is its own slot. A channel is omitted entirely if no corner carries it.
    pub fn from_host(host: &HostMesh) -> Result<Self, HostError> {
        let mut corners = Vec::with_capacity(host.triangles.len() * 3);
        for (triangle, indices) in host.triangles.iter().enumerate() {
            for &corner in indices {
                let c = host
                    .corners
                    .get(corner as usize)
                    .ok_or(HostError::CornerOutOfRange {
                        triangle,
                        corner,
                        len: host.corners.len(),
                    })?;
                if c.vertex as usize >= host.vertices.len() {
                    return Err(HostError::VertexOutOfRange {
                        corner,
                        vertex: c.vertex,
                        len: host.vertices.len(),
                    });
                }
                corners.push(c);
            }
        }

        let has_normals = corners.iter().any(|c| c.normal.is_some());
        let has_uvs = corners.iter().any(|c| c.uv.is_some());

        let mut mesh = MeshData {
            positions: host.vertices.clone(),
            flags: host.flags,
            ..MeshData::new()
        };
        if has_normals {
            mesh.normals = corners.iter().map(|c| c.normal_or_default()).collect();
        }
        if has_uvs {
            mesh.uvs = corners
                .iter()
                .map(|c| c.uv.unwrap_or_else(default_texcoord))
                .collect();
        }
        mesh.faces = corners
            .chunks_exact(3)
            .enumerate()
            .map(|(t, tri)| {
                let mut out = [Corner::default(); 3];
                for (k, (o, c)) in out.iter_mut().zip(tri).enumerate() {
                    let slot = (t * 3 + k) as u32;
                    *o = Corner::new(
                        c.vertex,
                        has_normals.then_some(slot),
                        has_uvs.then_some(slot),
                    );
                }
                out
            })
            .collect();

        tracing::debug!(
            vertices = mesh.positions.len(),
            triangles = mesh.faces.len(),
            has_normals,
            has_uvs,
            "flattened host mesh"
        );
        Ok(mesh)
    }

    /// Expand into one [HostCorner] per triangle corner, resolving normals & UVs.
    ///
    /// Corners whose normal/uv index is absent or dangling are left unattributed.
    pub fn to_host(&self) -> HostMesh {
        let normals = self.corner_normals();
        let uvs = self.corner_uvs();
        HostMesh {
            vertices: self.positions.clone(),
            corners: self
                .corners()
                .zip(normals)
                .zip(uvs)
                .map(|((c, normal), uv)| HostCorner {
                    vertex: c.vertex,
                    normal,
                    uv,
                })
                .collect(),
            triangles: (0..self.faces.len() as u32)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
            flags: self.flags,
        }
    }
}

impl TryFrom<&HostMesh> for MeshData {
    type Error = HostError;
    fn try_from(host: &HostMesh) -> Result<Self, Self::Error> {
        Self::from_host(host)
    }
}

impl From<&MeshData> for HostMesh {
    fn from(mesh: &MeshData) -> Self {
        mesh.to_host()
    }
}
