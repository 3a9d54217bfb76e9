//! Encoding of [MeshData] as R3D text.
//!
//! # Notes
//!
//! Sections are always written in the same order, one per line:
//!
//! * `car()`: only for car assets
//! * `grouptexture(0)`: only for group-textured assets; the payload is always `0`
//! * `v(x,y,z,...)v`: always present, even for an empty mesh
//! * `n(x,y,z,...)n`: one normal per corner, if the mesh has normals
//! * `t(u,v,...)t`: one UV per corner, if the mesh has UVs, in stored orientation
//! * `p(vertex,normal,uv,...)p`: one triple per corner, if the mesh has triangles
//!
//! Normals & UVs are written per corner, in slot order, and each corner's normal & uv index is its
//! own slot number. Shared normals/UVs are deliberately *not* deduplicated. Corners without a
//! normal or UV are written with [default_normal] / [default_texcoord].
//!
//! Every element is followed by a comma, including the last. Floats are written with the shortest
//! representation that reads back to the same value.
//!
//! Input is expected to be triangulated already; the format has no other polygon type.

use std::{
    fmt::{self, Write as _},
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::{default_normal, default_texcoord, uv, MeshData, Options, Tag};

/// Encode `mesh` as an R3D document.
pub fn to_string(mesh: &MeshData, options: Options) -> String {
    let text = Document::new(mesh, options).to_string();
    tracing::debug!(
        variant = %options.variant,
        positions = mesh.positions.len(),
        triangles = mesh.faces.len(),
        bytes = text.len(),
        "encoded r3d mesh"
    );
    text
}

/// Encode `mesh` as an R3D document into `writer`.
pub fn to_writer<W: Write>(mut writer: W, mesh: &MeshData, options: Options) -> io::Result<()> {
    writer.write_all(to_string(mesh, options).as_bytes())
}

/// Encode `mesh` as an R3D document into a new file at `path`, replacing any existing file.
#[tracing::instrument(skip(path, mesh), fields(path = ?path.as_ref()))]
pub fn to_path(path: impl AsRef<Path>, mesh: &MeshData, options: Options) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    to_writer(&mut writer, mesh, options)?;
    writer.flush()
}

/// A [MeshData] displayed as R3D text.
#[derive(Debug, Clone, Copy)]
pub struct Document<'mesh> {
    mesh: &'mesh MeshData,
    options: Options,
}

impl<'mesh> Document<'mesh> {
    #[inline]
    pub fn new(mesh: &'mesh MeshData, options: Options) -> Self {
        Self { mesh, options }
    }
}

fn section<T>(
    f: &mut fmt::Formatter<'_>,
    tag: Tag,
    items: impl IntoIterator<Item = T>,
    mut item: impl FnMut(&mut fmt::Formatter<'_>, T) -> fmt::Result,
) -> fmt::Result {
    f.write_str(tag.opener())?;
    for i in items {
        item(f, i)?;
    }
    f.write_str(tag.closer())?;
    f.write_char('\n')
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mesh = self.mesh;
        let flags = mesh.flags;

        if flags.is_car {
            writeln!(f, "{}{}", Tag::Car.opener(), Tag::Car.closer())?;
        }
        if flags.is_group_texture {
            writeln!(
                f,
                "{}0{}",
                Tag::GroupTexture.opener(),
                Tag::GroupTexture.closer()
            )?;
        }

        section(f, Tag::Vertex, &mesh.positions, |f, p| {
            write!(f, "{},{},{},", p.x, p.y, p.z)
        })?;

        if !mesh.normals.is_empty() {
            let normals = mesh.corner_normals();
            section(f, Tag::Normal, normals, |f, n| {
                let n = n.unwrap_or_else(default_normal);
                write!(f, "{},{},{},", n.x, n.y, n.z)
            })?;
        }

        if !mesh.uvs.is_empty() {
            let uvs = mesh.corner_uvs();
            section(f, Tag::Texcoord, uvs, |f, t| {
                let t = uv::encode_uv(
                    t.unwrap_or_else(default_texcoord),
                    flags,
                    self.options.variant,
                );
                write!(f, "{},{},", t.x, t.y)
            })?;
        }

        if !mesh.faces.is_empty() {
            section(f, Tag::Polygon, mesh.corners().enumerate(), |f, (slot, c)| {
                write!(f, "{},{slot},{slot},", c.vertex)
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;
    use crate::{AssetFlags, Corner};

    fn quad() -> MeshData {
        MeshData {
            positions: vec![
                point![0., 0., 0.],
                point![1., 0., 0.],
                point![1., 1., 0.],
                point![0., 1., 0.],
            ],
            normals: vec![vector![0., 0., 1.]],
            uvs: vec![point![0., 0.], point![1., 0.], point![1., 1.], point![0., 1.]],
            faces: vec![
                [
                    Corner::new(0, Some(0), Some(0)),
                    Corner::new(1, Some(0), Some(1)),
                    Corner::new(2, Some(0), Some(2)),
                ],
                [
                    Corner::new(0, Some(0), Some(0)),
                    Corner::new(2, Some(0), Some(2)),
                    Corner::new(3, None, Some(3)),
                ],
            ],
            flags: AssetFlags::NONE,
        }
    }

    #[test]
    fn empty() {
        assert_eq!(to_string(&MeshData::new(), Options::legacy()), "v()v\n");
        assert_eq!(to_string(&MeshData::new(), Options::current()), "v()v\n");
    }

    #[test]
    fn flags_come_first() {
        let mesh = MeshData {
            flags: AssetFlags {
                is_car: true,
                is_group_texture: true,
            },
            ..MeshData::new()
        };
        assert_eq!(
            to_string(&mesh, Options::legacy()),
            "car()\ngrouptexture(0)\nv()v\n"
        );
    }

    #[test]
    fn corners_are_not_deduplicated() {
        let text = to_string(&quad(), Options::current());
        assert_eq!(
            text,
            "v(0,0,0,1,0,0,1,1,0,0,1,0,)v\n\
             n(0,0,1,0,0,1,0,0,1,0,0,1,0,0,1,0,0,1,)n\n\
             t(0,0,1,0,1,1,0,0,1,1,0,1,)t\n\
             p(0,0,0,1,1,1,2,2,2,0,3,3,2,4,4,3,5,5,)p\n"
        );
    }

    #[test]
    fn legacy_flips_uvs() {
        let text = to_string(&quad(), Options::legacy());
        assert!(text.contains("t(0,1,1,1,1,0,0,1,1,0,0,0,)t\n"));

        let mut car = quad();
        car.flags.is_car = true;
        let text = to_string(&car, Options::legacy());
        assert!(text.contains("t(0,0,1,0,1,1,0,0,1,1,0,1,)t\n"));
    }

    #[test]
    fn writer() {
        let mut out = Vec::new();
        to_writer(&mut out, &quad(), Options::current()).unwrap();
        assert_eq!(out, to_string(&quad(), Options::current()).into_bytes());
    }
}
