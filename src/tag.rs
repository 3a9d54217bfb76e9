use std::fmt;

/// A directive recognized within an R3D document.
///
/// Each directive occupies a single line of the form `tag(` payload `)tag`; the flag directives
/// close with a bare `)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `car()`
    Car,
    /// `grouptexture(n)`; the payload is never interpreted.
    GroupTexture,
    /// `v(x,y,z,...)v`
    Vertex,
    /// `n(x,y,z,...)n`
    Normal,
    /// `t(u,v,...)t`
    Texcoord,
    /// `p(vertex,normal,uv,...)p`
    Polygon,
}

impl Tag {
    pub const ALL: [Tag; 6] = [
        Tag::Car,
        Tag::GroupTexture,
        Tag::Vertex,
        Tag::Normal,
        Tag::Texcoord,
        Tag::Polygon,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Tag::Car => "car",
            Tag::GroupTexture => "grouptexture",
            Tag::Vertex => "v",
            Tag::Normal => "n",
            Tag::Texcoord => "t",
            Tag::Polygon => "p",
        }
    }

    pub const fn opener(self) -> &'static str {
        match self {
            Tag::Car => "car(",
            Tag::GroupTexture => "grouptexture(",
            Tag::Vertex => "v(",
            Tag::Normal => "n(",
            Tag::Texcoord => "t(",
            Tag::Polygon => "p(",
        }
    }

    pub const fn closer(self) -> &'static str {
        match self {
            Tag::Car | Tag::GroupTexture => ")",
            Tag::Vertex => ")v",
            Tag::Normal => ")n",
            Tag::Texcoord => ")t",
            Tag::Polygon => ")p",
        }
    }

    /// Number of numeric values making up one element of this section's payload.
    ///
    /// `p` elements are whole triangles: 3 corners of (vertex, normal, uv).
    pub const fn arity(self) -> usize {
        match self {
            Tag::Car | Tag::GroupTexture => 0,
            Tag::Vertex | Tag::Normal => 3,
            Tag::Texcoord => 2,
            Tag::Polygon => 9,
        }
    }

    /// Find the directive a (trimmed) line opens, if any.
    pub fn detect(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| line.starts_with(tag.opener()))
    }

    /// Slice out the payload between this tag's opener and the first following closer.
    ///
    /// Returns `None` if the line doesn't close the section.
    pub fn payload(self, line: &str) -> Option<&str> {
        let rest = line.strip_prefix(self.opener())?;
        rest.find(self.closer()).map(|end| &rest[..end])
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::Tag;

    #[test]
    fn detect() {
        assert_eq!(Tag::detect("car()"), Some(Tag::Car));
        assert_eq!(Tag::detect("grouptexture(3)"), Some(Tag::GroupTexture));
        assert_eq!(Tag::detect("v(1,2,3,)v"), Some(Tag::Vertex));
        assert_eq!(Tag::detect("p()p"), Some(Tag::Polygon));
        assert_eq!(Tag::detect("vt(1,2)vt"), None);
        assert_eq!(Tag::detect(""), None);
    }

    #[test]
    fn payload() {
        assert_eq!(Tag::Vertex.payload("v(1,2,3,)v"), Some("1,2,3,"));
        assert_eq!(Tag::Vertex.payload("v()v trailing"), Some(""));
        assert_eq!(Tag::GroupTexture.payload("grouptexture(0)"), Some("0"));
        assert_eq!(Tag::Car.payload("car()"), Some(""));
        assert_eq!(Tag::Normal.payload("n(0,0,1,"), None);
        assert_eq!(Tag::Normal.payload("n(0,0,1,)v"), None);
    }
}
