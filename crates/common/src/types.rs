use serde::{Deserialize, Serialize};

/// Numeric material identifier (the block type, independent of its state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Material(pub u16);

impl Material {
    pub const AIR: Self = Self(0);

    pub fn new(id: u16) -> Self {
        Self(id)
    }

    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// An immutable block value: a material plus the state bits needed to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
    pub material: Material,
    pub state: u16,
}

impl Block {
    /// Returned for every location the store has no data for.
    pub const AIR: Self = Self {
        material: Material::AIR,
        state: 0,
    };

    pub fn new(material: Material) -> Self {
        Self { material, state: 0 }
    }

    pub fn with_state(material: Material, state: u16) -> Self {
        Self { material, state }
    }

    pub fn material(&self) -> Material {
        self.material
    }
}

/// Horizontal coordinate of a chunk column, in chunk units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk column containing the given block column.
    pub fn from_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> 4,
            z: block_z >> 4,
        }
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_block_is_air() {
        assert_eq!(Block::default(), Block::AIR);
        assert!(Block::AIR.material().is_air());
    }

    #[test]
    fn state_distinguishes_blocks_of_same_material() {
        let a = Block::with_state(Material::new(5), 1);
        let b = Block::with_state(Material::new(5), 2);
        assert_ne!(a, b);
        assert_eq!(a.material(), b.material());
    }

    #[test]
    fn chunk_coord_from_negative_block() {
        assert_eq!(ChunkCoord::from_block(-1, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block(-17, 15), ChunkCoord::new(-2, 0));
        assert_eq!(ChunkCoord::from_block(16, 31), ChunkCoord::new(1, 1));
    }
}
