//! PhysicsEditor-style `bodydef` documents.
//!
//! The layout (tabs, the twelve-space polygon indent, four-decimal fixed
//! point) is fixed so that third-party shape importers read it unchanged.

use core::fmt::Write as _;

use sc_core::{Error, Result};

use crate::{AnchorPoint, BodyBounds, PhysicsBody, PhysicsPolygon, PhysicsVertex};

const FORMAT_VERSION: u32 = 1;

/// Material and collision-filter values written into every fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureDefaults {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub category_bits: u16,
    pub group_index: i16,
    pub mask_bits: u16,
}

impl Default for FixtureDefaults {
    fn default() -> Self {
        Self {
            density: 2.0,
            friction: 0.3,
            restitution: 0.2,
            category_bits: 1,
            group_index: 0,
            mask_bits: 0xffff,
        }
    }
}

/// One interchange document.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    /// Bodies read back from a document carry bounds recovered from their
    /// polygon extents.
    pub bodies: Vec<PhysicsBody>,
    pub fixture: FixtureDefaults,
    pub ptm_ratio: f32,
    pub format: u32,
}

impl BodyDef {
    pub fn new(bodies: Vec<PhysicsBody>, ptm_ratio: f32) -> Self {
        Self {
            bodies,
            fixture: FixtureDefaults::default(),
            ptm_ratio,
            format: FORMAT_VERSION,
        }
    }

    pub fn to_xml(&self) -> String {
        let f = &self.fixture;
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!-- Generated by Physics Analyzer -->\n\
             <bodydef version=\"1.0\">\n\
             \t<bodies>\n",
        );

        // Writing into a String cannot fail.
        for body in &self.bodies {
            let _ = writeln!(out, "\t\t<body name=\"{}\">", escape(&body.name));
            let _ = writeln!(
                out,
                "            <anchorpoint>{},{}</anchorpoint>",
                fixed4(body.anchor_point.x),
                fixed4(body.anchor_point.y)
            );
            out.push_str("\t\t\t<fixtures>\n\t\t\t\t<fixture>\n");
            let _ = writeln!(out, "\t\t\t\t\t<density>{}</density>", f.density);
            let _ = writeln!(out, "\t\t\t\t\t<friction>{}</friction>", f.friction);
            let _ = writeln!(out, "\t\t\t\t\t<restitution>{}</restitution>", f.restitution);
            let _ = writeln!(
                out,
                "\t\t\t\t\t<filter_categoryBits>{}</filter_categoryBits>",
                f.category_bits
            );
            let _ = writeln!(
                out,
                "\t\t\t\t\t<filter_groupIndex>{}</filter_groupIndex>",
                f.group_index
            );
            let _ = writeln!(
                out,
                "\t\t\t\t\t<filter_maskBits>{}</filter_maskBits>",
                f.mask_bits
            );
            out.push_str("\t\t\t\t\t<fixture_type>POLYGON</fixture_type>\n");
            out.push_str("\t\t\t\t\t<polygons>\n");
            for poly in &body.polygons {
                out.push_str("            <polygon>");
                for v in &poly.vertices {
                    let _ = write!(out, "  {},{}", fixed4(v.x), fixed4(v.y));
                }
                out.push_str(" </polygon>\n");
            }
            out.push_str("\t\t\t\t\t</polygons>\n\t\t\t\t</fixture>\n");
            out.push_str("\t\t\t</fixtures>\n\t\t</body>\n");
        }

        out.push_str("\t</bodies>\n\t<metadata>\n");
        let _ = writeln!(out, "\t\t<format>{}</format>", self.format);
        let _ = writeln!(out, "\t\t<ptm_ratio>{}</ptm_ratio>", self.ptm_ratio);
        out.push_str("\t</metadata>\n</bodydef>");
        out
    }
}

/// Renders `bodies` with default fixture values.
pub fn write_body_def(bodies: &[PhysicsBody], ptm_ratio: f32) -> String {
    BodyDef::new(bodies.to_vec(), ptm_ratio).to_xml()
}

/// Four-decimal fixed point; values that round to zero print unsigned.
fn fixed4(v: f32) -> String {
    // Ties round away from zero, not to even.
    let rounded = (f64::from(v) * 1e4).round() / 1e4;
    let s = format!("{rounded:.4}");
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_owned(),
        _ => s,
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn unescape(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Parses a document produced by [`write_body_def`]. Whitespace between
/// elements is not significant.
pub fn read_body_def(src: &str) -> Result<BodyDef> {
    let (bodies_src, rest) = element(src, "bodies")?;
    let (meta, _) = element(rest, "metadata")?;

    let mut bodies = Vec::new();
    let mut fixture = FixtureDefaults::default();
    let mut cursor = bodies_src;
    while let Some(start) = cursor.find("<body ") {
        let open_end = cursor[start..]
            .find('>')
            .map(|i| start + i)
            .ok_or_else(|| Error::parse("unterminated <body> tag"))?;
        let name = attribute(&cursor[start..open_end], "name")?;
        let close = cursor[open_end..]
            .find("</body>")
            .map(|i| open_end + i)
            .ok_or_else(|| Error::parse("missing </body>"))?;
        let inner = &cursor[open_end + 1..close];

        let (anchor, _) = element(inner, "anchorpoint")?;
        let (ax, ay) = pair(anchor)?;

        if bodies.is_empty() {
            fixture = read_fixture(inner)?;
        }

        let (polys_src, _) = element(inner, "polygons")?;
        let mut polygons = Vec::new();
        let mut poly_cursor = polys_src;
        while let Ok((poly, after)) = element(poly_cursor, "polygon") {
            let vertices = poly
                .split_whitespace()
                .map(|tok| pair(tok).map(|(x, y)| PhysicsVertex { x, y }))
                .collect::<Result<Vec<_>>>()?;
            polygons.push(PhysicsPolygon { vertices });
            poly_cursor = after;
        }

        bodies.push(PhysicsBody {
            name: unescape(&name),
            anchor_point: AnchorPoint { x: ax, y: ay },
            bounding_box: BodyBounds::from_polygons(&polygons),
            polygons,
        });
        cursor = &cursor[close + "</body>".len()..];
    }

    Ok(BodyDef {
        bodies,
        fixture,
        ptm_ratio: number(element(meta, "ptm_ratio")?.0)?,
        format: number(element(meta, "format")?.0)?,
    })
}

fn read_fixture(body: &str) -> Result<FixtureDefaults> {
    let field = |tag: &str| element(body, tag).map(|(v, _)| v);
    Ok(FixtureDefaults {
        density: number(field("density")?)?,
        friction: number(field("friction")?)?,
        restitution: number(field("restitution")?)?,
        category_bits: number(field("filter_categoryBits")?)?,
        group_index: number(field("filter_groupIndex")?)?,
        mask_bits: number(field("filter_maskBits")?)?,
    })
}

/// Text between `<tag>` and `</tag>`, plus the input after the close tag.
fn element<'a>(src: &'a str, tag: &str) -> Result<(&'a str, &'a str)> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = src
        .find(&open)
        .ok_or_else(|| Error::parse(format!("missing <{tag}>")))?
        + open.len();
    let end = src[start..]
        .find(&close)
        .ok_or_else(|| Error::parse(format!("missing </{tag}>")))?
        + start;
    Ok((&src[start..end], &src[end + close.len()..]))
}

fn attribute(tag: &str, name: &str) -> Result<String> {
    let key = format!("{name}=\"");
    let start = tag
        .find(&key)
        .ok_or_else(|| Error::parse(format!("missing attribute {name}")))?
        + key.len();
    let len = tag[start..]
        .find('"')
        .ok_or_else(|| Error::parse(format!("unterminated attribute {name}")))?;
    Ok(tag[start..start + len].to_owned())
}

fn pair(src: &str) -> Result<(f32, f32)> {
    let (x, y) = src
        .trim()
        .split_once(',')
        .ok_or_else(|| Error::parse(format!("expected `x,y`, got {src:?}")))?;
    Ok((number(x)?, number(y)?))
}

fn number<T: core::str::FromStr>(src: &str) -> Result<T> {
    src.trim()
        .parse()
        .map_err(|_| Error::parse(format!("invalid number {src:?}")))
}
