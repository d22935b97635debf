use serde::{Deserialize, Serialize};

pub type Bit = bool;

/// A root-to-leaf path prefix in a tree of height at most 64.
///
/// The first (most significant used) bit is the root's child choice, the
/// last bit selects the node among its siblings at depth `count`.
#[derive(
    Copy, Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub struct Bits {
    /// The number of bits in this sequence.
    pub count: usize,
    /// A packed encoding of these bits. Only the first (least significant)
    /// `count` bits are used. The rest are unused and should be zero.
    pub packed: u64,
}

impl Bits {
    pub const fn empty() -> Self {
        Bits {
            count: 0,
            packed: 0,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The full leaf path for `key` in a tree of height `count`.
    pub fn from_key(key: u64, count: usize) -> Self {
        assert!(count <= 64, "Path length out of bounds");
        assert!(
            count == 64 || key >> count == 0,
            "Key does not fit in {count} bits"
        );
        Bits { count, packed: key }
    }

    pub fn get_bit(&self, i: usize) -> Bit {
        assert!(i < self.count, "Index out of bounds");
        self.packed >> (self.count - 1 - i) & 1 == 1
    }

    /// The deepest bit: the node's position among its siblings.
    pub fn last_bit(&self) -> Bit {
        assert!(!self.is_empty(), "Empty path has no last bit");
        self.packed & 1 == 1
    }

    pub fn push_bit(&mut self, bit: Bit) {
        assert!(self.count < 64, "Overflow");
        self.packed = (self.packed << 1) | bit as u64;
        self.count += 1;
    }

    pub fn add_bit(&self, bit: Bit) -> Self {
        let mut x = *self;
        x.push_bit(bit);
        x
    }

    /// The path of the parent node.
    pub fn parent(&self) -> Self {
        assert!(!self.is_empty(), "Root has no parent");
        Bits {
            count: self.count - 1,
            packed: self.packed >> 1,
        }
    }

    /// The path of the sibling node at the same depth.
    pub fn sibling(&self) -> Self {
        assert!(!self.is_empty(), "Root has no sibling");
        Bits {
            count: self.count,
            packed: self.packed ^ 1,
        }
    }
}
