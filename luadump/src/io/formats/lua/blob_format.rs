//! Interpretation of binary cells.

use byteorder::{ByteOrder, LittleEndian};

/// Number of bytes of one encoded coordinate component.
const COMPONENT_WIDTH: usize = 4;
/// Number of bytes of one `(x, y, z)` point.
const POINT_WIDTH: usize = 3 * COMPONENT_WIDTH;

/// Result of encoding a non-empty blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLiteral {
    /// The Lua literal
    pub text: String,
    /// Number of trailing bytes that did not form a complete unit and were ignored
    pub dropped_bytes: usize,
}

/// Turns the bytes of a non-empty binary cell into a Lua literal.
pub trait BlobFormat: std::fmt::Debug {
    /// Name of the format, used in log messages.
    fn name(&self) -> &'static str;

    /// Encode the given (non-empty) bytes.
    fn encode(&self, bytes: &[u8]) -> BlobLiteral;
}

/// Packed `(x, y, z)` points of little-endian `f32`, projected onto the x/z plane.
///
/// Each point becomes `{x=<x>,z=<z>}` with three decimals; the `y` component is
/// dropped. Points are joined by `,` and wrapped into one table, e.g.
/// `{{x=1.000,z=-2.500},{x=0.000,z=4.125}}`. Bytes after the last complete point
/// are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanarCoordinates;

impl PlanarCoordinates {
    fn point_literal(point: &[u8]) -> String {
        let x = LittleEndian::read_f32(&point[..COMPONENT_WIDTH]);
        let z = LittleEndian::read_f32(&point[2 * COMPONENT_WIDTH..POINT_WIDTH]);

        format!("{{x={x:.3},z={z:.3}}}")
    }
}

impl BlobFormat for PlanarCoordinates {
    fn name(&self) -> &'static str {
        "planar coordinates"
    }

    fn encode(&self, bytes: &[u8]) -> BlobLiteral {
        let points = bytes.chunks_exact(POINT_WIDTH);
        let dropped_bytes = points.remainder().len();

        let points = points
            .map(Self::point_literal)
            .collect::<Vec<_>>()
            .join(",");

        BlobLiteral {
            text: format!("{{{points}}}"),
            dropped_bytes,
        }
    }
}
