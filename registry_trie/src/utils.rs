use plonky2::field::goldilocks_field::GoldilocksField;
use plonky2::field::types::Field;
use plonky2::hash::poseidon::PoseidonHash;
use plonky2::plonk::config::Hasher;

pub type F = GoldilocksField;
pub type Hash = PoseidonHash;
pub type HashOut = <PoseidonHash as Hasher<F>>::Hash;

/// Returns `Poseidon(fields)` with no padding.
pub fn hash_fields(fields: &[F]) -> HashOut {
    PoseidonHash::hash_no_pad(fields)
}

/// Returns `Poseidon(left || right)`, the internal-node compression.
pub fn hash_pair(left: HashOut, right: HashOut) -> HashOut {
    PoseidonHash::two_to_one(left, right)
}

/// The canonical empty-leaf hash. Non-membership of a key is membership of
/// this value at the key.
pub fn empty_leaf() -> HashOut {
    HashOut {
        elements: [F::ZERO; 4],
    }
}

/// Whether `key` is addressable by a tree of the given height.
pub const fn key_fits(key: u64, height: usize) -> bool {
    height >= 64 || key >> height == 0
}

/// Default node hashes indexed by depth: `v[height]` is the empty leaf,
/// `v[0]` the root of an empty tree.
pub fn default_hashes(height: usize) -> Vec<HashOut> {
    let mut v = vec![empty_leaf(); height + 1];
    for depth in (0..height).rev() {
        v[depth] = hash_pair(v[depth + 1], v[depth + 1]);
    }
    v
}

/// The root of an empty tree of the given height.
pub fn empty_root(height: usize) -> HashOut {
    default_hashes(height)[0]
}
