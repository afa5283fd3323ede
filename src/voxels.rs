use std::fmt;
use std::rc::Rc;

use crate::utils::{self, FnvHashMap};

/// An integer coordinate in world (block) space. Signed: the outer shell of a
/// rendered maze sits one layer below the origin.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPoint {
    pub fn new(x: i32, y: i32, z: i32) -> WorldPoint {
        WorldPoint { x, y, z }
    }

    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> WorldPoint {
        WorldPoint::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl From<(i32, i32, i32)> for WorldPoint {
    fn from(xyz: (i32, i32, i32)) -> WorldPoint {
        WorldPoint::new(xyz.0, xyz.1, xyz.2)
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// An opaque block identifier token, e.g. "stone" or "air".
///
/// A volume stores one per voxel, so cloning has to be cheap: the text is
/// reference counted and a clone is a pointer bump.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct BlockId(Rc<str>);

impl BlockId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for BlockId {
    fn from(token: &'a str) -> BlockId {
        BlockId(Rc::from(token))
    }
}

impl From<String> for BlockId {
    fn from(token: String) -> BlockId {
        BlockId(Rc::from(token.as_str()))
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sparse mapping from world coordinates to block identifiers, built
/// incrementally. Later writes at the same coordinate overwrite earlier ones,
/// which the maze assembler uses deliberately: shell, then wall fill, then
/// carved paths, so paths always win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldVolume {
    blocks: FnvHashMap<WorldPoint, BlockId>,
}

impl WorldVolume {
    pub fn new() -> WorldVolume {
        WorldVolume { blocks: FnvHashMap::default() }
    }

    pub fn with_capacity(capacity: usize) -> WorldVolume {
        WorldVolume { blocks: utils::fnv_hashmap(capacity) }
    }

    /// Place a block, replacing whatever was already at `point`.
    pub fn set(&mut self, point: WorldPoint, block: &BlockId) {
        self.blocks.insert(point, block.clone());
    }

    pub fn get(&self, point: WorldPoint) -> Option<&BlockId> {
        self.blocks.get(&point)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WorldPoint, &BlockId)> {
        self.blocks.iter()
    }

    /// How many voxels currently hold `block`.
    pub fn count_of(&self, block: &BlockId) -> usize {
        self.blocks.values().filter(|&b| b == block).count()
    }
}

impl<'a> IntoIterator for &'a WorldVolume {
    type Item = (&'a WorldPoint, &'a BlockId);
    type IntoIter = std::collections::hash_map::Iter<'a, WorldPoint, BlockId>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
