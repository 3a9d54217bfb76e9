//! Decoding of R3D text into [MeshData].
//!
//! # Notes
//!
//! * Decoding is line-oriented and single-pass. Blank & unrecognized lines are skipped.
//! * A section must open and close on the same line: `v(` ... `)v`. Anything after the closer is
//!   ignored.
//! * Payloads are comma-separated; empty tokens (such as the one after a trailing comma) are
//!   skipped.
//! * `p` indices are resolved against the `v`/`n`/`t` data read *before* the `p` line. A channel
//!   with no data at that point leaves its corners unattributed.
//! * `car()` & `grouptexture(n)` apply to the whole document regardless of where they appear.
//!   The `grouptexture` payload must still be an integer, though its value is unused.
//! * `p` indices too large to represent are out of range rather than malformed.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::{IntErrorKind, ParseIntError},
    path::Path,
    str::FromStr,
};

use crate::{
    error::{Error, ParseError},
    uv, Channel, Corner, IndexPolicy, MeshData, Normal, Options, Position, Tag, Texcoord,
};

/// Decode a whole R3D document.
pub fn from_str(text: &str, options: Options) -> Result<MeshData, ParseError> {
    let mut decoder = Decoder::new(options);
    for (i, line) in text.lines().enumerate() {
        decoder.line(i + 1, line)?;
    }
    Ok(decoder.finish())
}

/// Decode an R3D document from a reader, one line at a time.
pub fn from_reader<R: BufRead>(reader: R, options: Options) -> Result<MeshData, Error> {
    let mut decoder = Decoder::new(options);
    for (i, line) in reader.lines().enumerate() {
        decoder.line(i + 1, &line?)?;
    }
    Ok(decoder.finish())
}

/// Decode the R3D document at `path`.
#[tracing::instrument(skip(path), fields(path = ?path.as_ref()))]
pub fn from_path(path: impl AsRef<Path>, options: Options) -> Result<MeshData, Error> {
    let file = File::open(path.as_ref())?;
    from_reader(BufReader::new(file), options)
}

/// Incremental R3D decoder; feed it lines in order, then [finish](Decoder::finish) it.
#[derive(Debug)]
pub struct Decoder {
    options: Options,
    mesh: MeshData,
    /// Attribute indices dropped under [IndexPolicy::Lenient].
    dropped: usize,
}

impl Decoder {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            mesh: MeshData::new(),
            dropped: 0,
        }
    }

    /// Decode line number `number` (1-based).
    pub fn line(&mut self, number: usize, line: &str) -> Result<(), ParseError> {
        let line = line.trim();
        let Some(tag) = Tag::detect(line) else {
            if !line.is_empty() {
                tracing::trace!(line = number, "skipping unrecognized directive");
            }
            return Ok(());
        };
        let payload = tag
            .payload(line)
            .ok_or(ParseError::UnterminatedSection { line: number, tag })?;

        match tag {
            Tag::Car => self.mesh.flags.is_car = true,
            Tag::GroupTexture => {
                numbers::<i64>(number, tag, payload, "integer")?;
                self.mesh.flags.is_group_texture = true;
            }
            Tag::Vertex => {
                let values = tuples::<f32>(number, tag, payload, "float")?;
                self.mesh.positions.extend(
                    values
                        .chunks_exact(3)
                        .map(|c| Position::new(c[0], c[1], c[2])),
                );
            }
            Tag::Normal => {
                let values = tuples::<f32>(number, tag, payload, "float")?;
                self.mesh
                    .normals
                    .extend(values.chunks_exact(3).map(|c| Normal::new(c[0], c[1], c[2])));
            }
            Tag::Texcoord => {
                // stored orientation; resolved in `finish`
                let values = tuples::<f32>(number, tag, payload, "float")?;
                self.mesh
                    .uvs
                    .extend(values.chunks_exact(2).map(|c| Texcoord::new(c[0], c[1])));
            }
            Tag::Polygon => self.polygons(number, payload)?,
        }
        Ok(())
    }

    fn polygons(&mut self, line: usize, payload: &str) -> Result<(), ParseError> {
        let indices = numbers::<Index>(line, Tag::Polygon, payload, "integer")?;
        if indices.len() % Tag::Polygon.arity() != 0 {
            return Err(ParseError::TruncatedIndexStream {
                line,
                tag: Tag::Polygon,
                count: indices.len(),
            });
        }

        self.mesh
            .faces
            .reserve(indices.len() / Tag::Polygon.arity());
        for triangle in indices.chunks_exact(Tag::Polygon.arity()) {
            let mut corners = [Corner::default(); 3];
            for (corner, idx) in corners.iter_mut().zip(triangle.chunks_exact(3)) {
                *corner = Corner {
                    vertex: self.vertex_index(line, idx[0].0)?,
                    normal: self.attribute_index(line, Channel::Normal, idx[1].0)?,
                    uv: self.attribute_index(line, Channel::Uv, idx[2].0)?,
                };
            }
            self.mesh.faces.push(corners);
        }
        Ok(())
    }

    fn vertex_index(&self, line: usize, index: i64) -> Result<u32, ParseError> {
        let len = self.mesh.positions.len();
        checked_index(index, len).ok_or(ParseError::IndexOutOfRange {
            line,
            tag: Tag::Polygon,
            channel: Channel::Vertex,
            index,
            len,
        })
    }

    fn attribute_index(
        &mut self,
        line: usize,
        channel: Channel,
        index: i64,
    ) -> Result<Option<u32>, ParseError> {
        let len = match channel {
            Channel::Normal => self.mesh.normals.len(),
            Channel::Uv => self.mesh.uvs.len(),
            Channel::Vertex => self.mesh.positions.len(),
        };
        if len == 0 {
            return Ok(None);
        }
        match (checked_index(index, len), self.options.index_policy) {
            (Some(i), _) => Ok(Some(i)),
            (None, IndexPolicy::Lenient) => {
                tracing::trace!(line, %channel, index, len, "dropping out-of-range attribute");
                self.dropped += 1;
                Ok(None)
            }
            (None, IndexPolicy::Strict) => Err(ParseError::IndexOutOfRange {
                line,
                tag: Tag::Polygon,
                channel,
                index,
                len,
            }),
        }
    }

    /// Apply document-wide directives and yield the decoded mesh.
    pub fn finish(self) -> MeshData {
        let Self {
            options,
            mut mesh,
            dropped,
        } = self;
        let flags = mesh.flags;
        for t in &mut mesh.uvs {
            *t = uv::resolve_uv(*t, flags, options.variant);
        }

        if dropped > 0 {
            tracing::warn!(
                dropped,
                "left corners unattributed due to out-of-range normal/uv indices"
            );
        }
        tracing::debug!(
            variant = %options.variant,
            positions = mesh.positions.len(),
            normals = mesh.normals.len(),
            uvs = mesh.uvs.len(),
            triangles = mesh.faces.len(),
            is_car = flags.is_car,
            is_group_texture = flags.is_group_texture,
            "decoded r3d mesh"
        );
        mesh
    }
}

/// A `p` token. Integers beyond `i64` saturate, which keeps them out of range of any array.
#[derive(Debug, Clone, Copy)]
struct Index(i64);

impl FromStr for Index {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse() {
            Ok(i) => Ok(Self(i)),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(Self(i64::MAX)),
                IntErrorKind::NegOverflow => Ok(Self(i64::MIN)),
                _ => Err(e),
            },
        }
    }
}

#[inline]
fn checked_index(index: i64, len: usize) -> Option<u32> {
    u32::try_from(index).ok().filter(|&i| (i as usize) < len)
}

fn numbers<T: FromStr>(
    line: usize,
    tag: Tag,
    payload: &str,
    expected: &'static str,
) -> Result<Vec<T>, ParseError> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token.parse::<T>().map_err(|_| ParseError::MalformedNumber {
                line,
                tag,
                token: token.to_owned(),
                expected,
            })
        })
        .collect()
}

/// [numbers], additionally requiring a whole number of `tag`-sized elements.
fn tuples<T: FromStr>(
    line: usize,
    tag: Tag,
    payload: &str,
    expected: &'static str,
) -> Result<Vec<T>, ParseError> {
    let values = numbers(line, tag, payload, expected)?;
    if values.len() % tag.arity() != 0 {
        return Err(ParseError::IncompleteTuple {
            line,
            tag,
            count: values.len(),
            arity: tag.arity(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;
    use crate::AssetFlags;

    const TRIANGLE: &str = "v(0,0,0,1,0,0,0,1,0,)v\nn(0,0,1,0,0,1,0,0,1,)n\np(0,0,0,1,1,1,2,2,2,)p\n";

    #[test]
    fn triangle() {
        let mesh = from_str(TRIANGLE, Options::legacy()).unwrap();
        assert_eq!(
            mesh.positions,
            vec![point![0., 0., 0.], point![1., 0., 0.], point![0., 1., 0.]]
        );
        assert_eq!(mesh.normals, vec![vector![0., 0., 1.]; 3]);
        assert!(mesh.uvs.is_empty());
        assert_eq!(
            mesh.faces,
            vec![[
                Corner::new(0, Some(0), None),
                Corner::new(1, Some(1), None),
                Corner::new(2, Some(2), None),
            ]]
        );
        assert_eq!(mesh.flags, AssetFlags::NONE);
    }

    #[test]
    fn skips_unknown_and_blank_lines() {
        let text = "\n# comment\nmaterial(steel)\n  v(1,2,3)v  \n\nlod(2)\n";
        let mesh = from_str(text, Options::current()).unwrap();
        assert_eq!(mesh.positions, vec![point![1., 2., 3.]]);
    }

    #[test]
    fn flags() {
        let mesh = from_str("car()\ngrouptexture(7)\nv()v\n", Options::current()).unwrap();
        assert!(mesh.flags.is_car);
        assert!(mesh.flags.is_group_texture);
    }

    #[test]
    fn legacy_flip_ignores_directive_order() {
        let text = "t(0.5,0.25,)t\ncar()\n";
        let mesh = from_str(text, Options::legacy()).unwrap();
        assert_eq!(mesh.uvs, vec![point![0.5, 0.25]]);

        let mesh = from_str("t(0.5,0.25,)t\n", Options::legacy()).unwrap();
        assert_eq!(mesh.uvs, vec![point![0.5, 0.75]]);
    }

    #[test]
    fn accumulates_sections() {
        let text = "v(0,0,0,)v\nv(1,1,1,)v\np(1,0,0,0,0,0,1,0,0,)p\np(0,0,0,0,0,0,0,0,0)p\n";
        let mesh = from_str(text, Options::legacy()).unwrap();
        assert_eq!(mesh.positions.len(), 2);
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[0][0].vertex, 1);
    }

    #[test]
    fn malformed_number() {
        let err = from_str("v(0,0,0,)v\nn(0,zero,1,)n\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                line: 2,
                tag: Tag::Normal,
                token: "zero".to_owned(),
                expected: "float",
            }
        );

        let err = from_str("v(0,0,0,)v\np(0,0,0,0,0,0,0.5,0,0,)p\n", Options::legacy()).unwrap_err();
        assert_eq!(err.line(), 2);
        assert_eq!(err.tag(), Tag::Polygon);
        assert!(matches!(err, ParseError::MalformedNumber { .. }));
    }

    #[test]
    fn group_texture_payload() {
        let err = from_str("car()\ngrouptexture(abc)\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNumber {
                line: 2,
                tag: Tag::GroupTexture,
                token: "abc".to_owned(),
                expected: "integer",
            }
        );
        // the value itself is unused
        let mesh = from_str("grouptexture(-3,)\n", Options::legacy()).unwrap();
        assert!(mesh.flags.is_group_texture);
    }

    #[test]
    fn unterminated_section() {
        let err = from_str("v(0,0,0,\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedSection {
                line: 1,
                tag: Tag::Vertex
            }
        );

        let err = from_str("v()v\ngrouptexture(0\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnterminatedSection {
                line: 2,
                tag: Tag::GroupTexture
            }
        );
    }

    #[test]
    fn incomplete_tuple() {
        let err = from_str("v(0,0,0,1,)v\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::IncompleteTuple {
                line: 1,
                tag: Tag::Vertex,
                count: 4,
                arity: 3
            }
        );
        let err = from_str("t(0,0,1,)t\n", Options::legacy()).unwrap_err();
        assert!(matches!(err, ParseError::IncompleteTuple { arity: 2, .. }));
    }

    #[test]
    fn truncated_index_stream() {
        let err = from_str("v(0,0,0,)v\np(0,0,0,0,0,0,0,0,)p\n", Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::TruncatedIndexStream {
                line: 2,
                tag: Tag::Polygon,
                count: 8
            }
        );
    }

    #[test]
    fn vertex_out_of_range() {
        for options in [Options::legacy(), Options::current()] {
            let err = from_str("v(0,0,0,)v\np(0,0,0,0,0,0,3,0,0,)p\n", options).unwrap_err();
            assert_eq!(
                err,
                ParseError::IndexOutOfRange {
                    line: 2,
                    tag: Tag::Polygon,
                    channel: Channel::Vertex,
                    index: 3,
                    len: 1
                }
            );
        }
    }

    #[test]
    fn oversized_index() {
        let text = "v(0,0,0,)v\np(99999999999999999999,0,0,0,0,0,0,0,0,)p\n";
        let err = from_str(text, Options::legacy()).unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                line: 2,
                tag: Tag::Polygon,
                channel: Channel::Vertex,
                index: i64::MAX,
                len: 1
            }
        );

        let text = "v(0,0,0,)v\nn(0,0,1,)n\np(0,-99999999999999999999,0,0,0,0,0,0,0,)p\n";
        let err = from_str(text, Options::current()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::IndexOutOfRange {
                channel: Channel::Normal,
                index: i64::MIN,
                ..
            }
        ));
        let mesh = from_str(text, Options::legacy()).unwrap();
        assert_eq!(mesh.faces[0][0], Corner::new(0, None, None));
    }

    #[test]
    fn attribute_out_of_range() {
        let text = "v(0,0,0,)v\nn(0,0,1,)n\np(0,0,0,0,-1,0,0,5,0,)p\n";

        let mesh = from_str(text, Options::legacy()).unwrap();
        assert_eq!(
            mesh.faces[0],
            [
                Corner::new(0, Some(0), None),
                Corner::new(0, None, None),
                Corner::new(0, None, None),
            ]
        );

        let err = from_str(text, Options::current()).unwrap_err();
        assert_eq!(
            err,
            ParseError::IndexOutOfRange {
                line: 3,
                tag: Tag::Polygon,
                channel: Channel::Normal,
                index: -1,
                len: 1
            }
        );

        // policy overrides variant
        let strict = Options::legacy().with_index_policy(IndexPolicy::Strict);
        assert!(from_str(text, strict).is_err());
        let lenient = Options::current().with_index_policy(IndexPolicy::Lenient);
        assert!(from_str(text, lenient).is_ok());
    }

    #[test]
    fn reader_matches_str() {
        let from_reader = from_reader(TRIANGLE.as_bytes(), Options::current()).unwrap();
        assert_eq!(from_reader, from_str(TRIANGLE, Options::current()).unwrap());
    }

    #[test]
    fn reader_reports_parse_errors() {
        let err = from_reader("p(0,)p\n".as_bytes(), Options::current()).unwrap_err();
        assert!(matches!(
            err,
            Error::Parse(ParseError::TruncatedIndexStream { .. })
        ));
    }
}
