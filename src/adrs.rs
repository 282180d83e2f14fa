//! The address `Adrs` tags every tweakable hash call with its position in the hypertree.
//!
//! It is a 32-byte value made of six big-endian fields:
//! * `layer address`: 4 bytes, the hypertree layer (0 is the bottom layer).
//! * `tree address`: 12 bytes, the index of the XMSS tree within its layer.
//! * `type`: 4 bytes, one of [`AdrsType`].
//! * three 4-byte words whose meaning depends on `type`:
//!   - `key pair address`: which WOTS+ key pair (XMSS leaf) or which FORS instance,
//!   - `chain address` / `tree height`: the WOTS+ chain, or the height of a tree node,
//!   - `hash address` / `tree index`: the step within a chain, or the index of a tree node.
//!
//! The SHA-2 backend hashes the 22-byte compressed form returned by [`Adrs::compressed`]:
//! 1 byte of layer, 8 bytes of tree, 1 byte of type and the three words unchanged.

use crate::utils::{get_u32_at, set_u32_at, set_u64_at};

pub const ADRS_BYTES: usize = 32;
pub const ADRS_COMPRESSED_BYTES: usize = 22;

const OFFSET_LAYER: usize = 0;
const OFFSET_TREE: usize = 4;
const OFFSET_TYPE: usize = 16;
const OFFSET_KP_ADDR: usize = 20;
const OFFSET_CHAIN_ADDR: usize = 24;
const OFFSET_HASH_ADDR: usize = 28;
const OFFSET_TREE_HGT: usize = 24;
const OFFSET_TREE_INDEX: usize = 28;

/// All 7 types of ADRS.
/// The corresponding value is set as the `type` in an ADRS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum AdrsType {
    /// 0, used for hashing through a WOTS+ chain.
    WotsHash,
    /// 1, used for compression of the WOTS+ public key.
    WotsPk,
    /// 2, used for internal nodes of an XMSS tree.
    Tree,
    /// 3, used for the leaves and internal nodes of a FORS tree.
    ForsTree,
    /// 4, used for compression of the FORS roots.
    ForsRoots,
    /// 5, used for WOTS+ secret key generation (start of each chain).
    WotsPrf,
    /// 6, used for FORS secret key generation.
    ForsPrf,
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Adrs([u8; ADRS_BYTES]);

impl AsRef<[u8]> for Adrs {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<AdrsType> for Adrs {
    /// Returns an all-zero `adrs` with the given type.
    fn from(adrs_type: AdrsType) -> Self {
        let mut adrs = Self::default();
        adrs.set_type_and_clear(adrs_type);
        adrs
    }
}

impl Adrs {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 22-byte form hashed by the SHA-2 backend.
    pub fn compressed(&self) -> [u8; ADRS_COMPRESSED_BYTES] {
        let mut c = [0_u8; ADRS_COMPRESSED_BYTES];
        c[0] = self.0[OFFSET_LAYER + 3];
        c[1..9].copy_from_slice(&self.0[OFFSET_TREE + 4..OFFSET_TYPE]);
        c[9] = self.0[OFFSET_TYPE + 3];
        c[10..].copy_from_slice(&self.0[OFFSET_KP_ADDR..]);
        c
    }

    /// Specify which level of the hypertree (the "layer") we're working on.
    pub fn set_layer_addr(&mut self, layer: u32) {
        set_u32_at(self.0.as_mut(), layer, OFFSET_LAYER);
    }

    pub fn layer_addr(&self) -> u32 {
        get_u32_at(&self.0, OFFSET_LAYER)
    }

    /// Specify which XMSS tree within the layer (the "tree address") we're working on.
    /// The top 4 bytes of the 12-byte field stay zero.
    pub fn set_tree_addr(&mut self, tree: u64) {
        set_u32_at(self.0.as_mut(), 0, OFFSET_TREE);
        set_u64_at(self.0.as_mut(), tree, OFFSET_TREE + 4);
    }

    /// Specify what hash we will compute with this address, and zero the three
    /// type-dependent words. Layer and tree addresses are kept.
    pub fn set_type_and_clear(&mut self, adrs_type: AdrsType) {
        set_u32_at(self.0.as_mut(), adrs_type as u32, OFFSET_TYPE);
        self.0[OFFSET_KP_ADDR..].fill(0);
    }

    pub fn adrs_type(&self) -> u32 {
        get_u32_at(&self.0, OFFSET_TYPE)
    }

    /// Specify which XMSS leaf we're working on; that is, which WOTS+ key pair, or
    /// which FORS instance.
    pub fn set_keypair_addr(&mut self, keypair: u32) {
        set_u32_at(self.0.as_mut(), keypair, OFFSET_KP_ADDR);
    }

    pub fn keypair_addr(&self) -> u32 {
        get_u32_at(&self.0, OFFSET_KP_ADDR)
    }

    /// Specify which chain within the WOTS+ key we're working with.
    pub fn set_chain_addr(&mut self, chain: u32) {
        set_u32_at(self.0.as_mut(), chain, OFFSET_CHAIN_ADDR);
    }

    /// Specify where in the chain we are.
    pub fn set_hash_addr(&mut self, hash: u32) {
        set_u32_at(self.0.as_mut(), hash, OFFSET_HASH_ADDR);
    }

    /// Specify the height of the node in the XMSS/FORS tree we are in.
    pub fn set_tree_height(&mut self, tree_height: u32) {
        set_u32_at(self.0.as_mut(), tree_height, OFFSET_TREE_HGT);
    }

    /// Specify the distance from the left edge of the node in the XMSS/FORS tree.
    pub fn set_tree_index(&mut self, tree_index: u32) {
        set_u32_at(self.0.as_mut(), tree_index, OFFSET_TREE_INDEX);
    }

    pub fn tree_index(&self) -> u32 {
        get_u32_at(&self.0, OFFSET_TREE_INDEX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_type_keeps_layer_and_tree() {
        let mut adrs = Adrs::new();
        adrs.set_layer_addr(3);
        adrs.set_tree_addr(0x0102_0304_0506_0708);
        adrs.set_type_and_clear(AdrsType::WotsHash);
        adrs.set_keypair_addr(7);
        adrs.set_chain_addr(9);
        adrs.set_hash_addr(11);

        adrs.set_type_and_clear(AdrsType::Tree);
        assert_eq!(adrs.layer_addr(), 3);
        assert_eq!(adrs.adrs_type(), AdrsType::Tree as u32);
        assert_eq!(adrs.keypair_addr(), 0);
        assert_eq!(adrs.tree_index(), 0);
        assert_eq!(&adrs.as_ref()[4..16], &[0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(adrs.as_ref()[20..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_layout() {
        let mut adrs = Adrs::from(AdrsType::ForsPrf);
        adrs.set_layer_addr(0x0A);
        adrs.set_tree_addr(0xBB);
        adrs.set_keypair_addr(0x0102);
        adrs.set_tree_height(4);
        adrs.set_tree_index(0x0A0B_0C0D);

        let bytes = adrs.as_ref();
        assert_eq!(bytes.len(), ADRS_BYTES);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0x0A]);
        assert_eq!(bytes[15], 0xBB);
        assert_eq!(&bytes[16..20], &[0, 0, 0, 6]);
        assert_eq!(&bytes[20..24], &[0, 0, 1, 2]);
        assert_eq!(&bytes[24..28], &[0, 0, 0, 4]);
        assert_eq!(&bytes[28..32], &[0x0A, 0x0B, 0x0C, 0x0D]);

        let c = adrs.compressed();
        assert_eq!(c[0], 0x0A);
        assert_eq!(c[8], 0xBB);
        assert_eq!(c[9], 6);
        assert_eq!(&c[10..], &bytes[20..]);
    }

    #[test]
    fn test_copies_are_independent() {
        let mut a = Adrs::from(AdrsType::Tree);
        let mut b = a;
        a.set_tree_index(1);
        b.set_tree_index(2);
        assert_ne!(a, b);
        assert_eq!(a.tree_index(), 1);
        assert_eq!(b.tree_index(), 2);
    }
}
