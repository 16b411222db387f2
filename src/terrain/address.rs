//! Hierarchical chunk addresses
//!
//! An address names one node in the subdivision of a base polyhedral face:
//! `triangle_id` picks the face, and each path step picks one cell of the
//! 64x64 grid the previous level was split into. The canonical text form is
//! `T<triangle_id>:<x0>,<y0>:<x1>,<y1>:...` (a root address formats as `T7:`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Error, Result};

/// Children per side at every subdivision level
pub const SUBDIVISIONS: u32 = 64;

/// Number of base faces on the globe mesh
pub const N_FACES: u32 = 529_000;

/// One subdivision step: the child cell chosen at a level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathStep {
    pub x: u8,
    pub y: u8,
}

impl PathStep {
    /// Create a step, rejecting coordinates outside `[0, 64)`
    pub fn new(x: u32, y: u32) -> Result<Self> {
        if x >= SUBDIVISIONS || y >= SUBDIVISIONS {
            return Err(Error::PathStepOutOfRange { x, y, max: SUBDIVISIONS });
        }
        Ok(Self { x: x as u8, y: y as u8 })
    }
}

/// Address of one chunk. Depth is always the path length.
/// The default is the root of face 0.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkAddress {
    triangle_id: u32,
    path: Vec<PathStep>,
}

impl ChunkAddress {
    /// Create an address from a triangle id and already-validated steps
    pub fn new(triangle_id: u32, path: Vec<PathStep>) -> Result<Self> {
        if triangle_id >= N_FACES {
            return Err(Error::TriangleOutOfRange {
                triangle_id: triangle_id as u64,
                max: N_FACES,
            });
        }
        Ok(Self { triangle_id, path })
    }

    /// Depth-0 address covering a whole face
    pub fn root(triangle_id: u32) -> Result<Self> {
        Self::new(triangle_id, Vec::new())
    }

    /// Build from raw parts, checking that `depth` agrees with the path
    pub fn from_parts(triangle_id: u32, path: &[(u32, u32)], depth: u32) -> Result<Self> {
        if depth as usize != path.len() {
            return Err(Error::DepthMismatch { depth, path_len: path.len() });
        }
        let steps = path
            .iter()
            .map(|&(x, y)| PathStep::new(x, y))
            .collect::<Result<Vec<_>>>()?;
        Self::new(triangle_id, steps)
    }

    pub fn triangle_id(&self) -> u32 {
        self.triangle_id
    }

    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    /// Subdivision level; 0 is the whole face
    pub fn depth(&self) -> u32 {
        self.path.len() as u32
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Address one level up, or `None` at the root
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.path.split_last()?;
        Some(Self {
            triangle_id: self.triangle_id,
            path: rest.to_vec(),
        })
    }

    /// Address of child cell `(x, y)` one level down
    pub fn child(&self, x: u32, y: u32) -> Result<Self> {
        PathStep::new(x, y).map(|step| self.descend(step))
    }

    /// Address one level down through an already-validated step
    pub fn descend(&self, step: PathStep) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(step);
        Self {
            triangle_id: self.triangle_id,
            path,
        }
    }
}

impl fmt::Display for ChunkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}:", self.triangle_id)?;
        for (i, step) in self.path.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{},{}", step.x, step.y)?;
        }
        Ok(())
    }
}

impl FromStr for ChunkAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = |reason: &str| Error::MalformedAddress {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let body = s
            .strip_prefix('T')
            .ok_or_else(|| malformed("missing 'T' prefix"))?;

        let mut segments = body.split(':');
        let triangle = segments.next().unwrap_or_default();
        if triangle.is_empty() || !triangle.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("triangle id must be a non-negative integer"));
        }
        let triangle_id: u64 = triangle
            .parse()
            .map_err(|_| malformed("triangle id does not fit in 64 bits"))?;
        if triangle_id >= N_FACES as u64 {
            return Err(Error::TriangleOutOfRange { triangle_id, max: N_FACES });
        }

        let rest: Vec<&str> = segments.collect();
        // "T7:" and "T7" both denote the root
        let rest: &[&str] = if rest == [""] { &[] } else { &rest };

        let mut path = Vec::with_capacity(rest.len());
        for segment in rest {
            let (x, y) = segment
                .split_once(',')
                .ok_or_else(|| malformed("path segment must be 'x,y'"))?;
            let parse = |v: &str| -> Result<u32> {
                if v.is_empty() || !v.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed("path coordinate must be a non-negative integer"));
                }
                v.parse()
                    .map_err(|_| malformed("path coordinate too large"))
            };
            path.push(PathStep::new(parse(x)?, parse(y)?)?);
        }

        Self::new(triangle_id as u32, path)
    }
}

impl Serialize for ChunkAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChunkAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_format() {
        let address = ChunkAddress::root(0).unwrap();
        assert_eq!(address.to_string(), "T0:");
        assert_eq!(address.depth(), 0);
        assert!(address.is_root());
    }

    #[test]
    fn test_format_path() {
        let address = ChunkAddress::from_parts(42, &[(31, 17), (8, 44)], 2).unwrap();
        assert_eq!(address.to_string(), "T42:31,17:8,44");
    }

    #[test]
    fn test_parse_roundtrip() {
        for s in ["T0:", "T42:31,17", "T528999:0,0:63,63:1,2", "T5:10,20:30,40:50,60"] {
            let address: ChunkAddress = s.parse().unwrap();
            assert_eq!(address.to_string(), s);
            let again: ChunkAddress = address.to_string().parse().unwrap();
            assert_eq!(again, address);
        }
    }

    #[test]
    fn test_parse_recovers_depth() {
        let address: ChunkAddress = "T3:1,1:2,2:3,3".parse().unwrap();
        assert_eq!(address.depth(), 3);
        assert_eq!(address.triangle_id(), 3);
        assert_eq!(address.path()[2], PathStep { x: 3, y: 3 });
    }

    #[test]
    fn test_parse_root_without_colon() {
        let address: ChunkAddress = "T9".parse().unwrap();
        assert_eq!(address, ChunkAddress::root(9).unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for s in [
            "", "0:1,2", "X0:1,2", "t0:", "T:1,2", "T-1:", "T0:1", "T0:1,2:", "T0::1,2",
            "T0:a,b", "T0:1,-2", "T0:1,2,3", "T1.5:",
        ] {
            let result: Result<ChunkAddress> = s.parse();
            assert!(result.is_err(), "{:?} should be rejected", s);
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(matches!(
            "T529000:".parse::<ChunkAddress>(),
            Err(Error::TriangleOutOfRange { .. })
        ));
        assert!(matches!(
            "T0:64,0".parse::<ChunkAddress>(),
            Err(Error::PathStepOutOfRange { x: 64, .. })
        ));
    }

    #[test]
    fn test_depth_mismatch_rejected() {
        let result = ChunkAddress::from_parts(1, &[(1, 1), (2, 2)], 3);
        assert!(matches!(result, Err(Error::DepthMismatch { depth: 3, path_len: 2 })));
    }

    #[test]
    fn test_triangle_out_of_range_rejected() {
        assert!(ChunkAddress::root(N_FACES).is_err());
        assert!(ChunkAddress::root(N_FACES - 1).is_ok());
    }

    #[test]
    fn test_parent_and_child() {
        let root = ChunkAddress::root(4).unwrap();
        assert!(root.parent().is_none());

        let child = root.child(10, 20).unwrap();
        assert_eq!(child.depth(), 1);
        assert_eq!(child.to_string(), "T4:10,20");
        assert_eq!(child.parent(), Some(root.clone()));

        let grandchild = child.child(63, 0).unwrap();
        assert_eq!(grandchild.parent(), Some(child));
        assert!(root.child(64, 0).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let address: ChunkAddress = "T42:31,17".parse().unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"T42:31,17\"");
        let back: ChunkAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
        assert!(serde_json::from_str::<ChunkAddress>("\"bogus\"").is_err());
    }
}
