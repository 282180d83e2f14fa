//! # Hypertree
//!
//! `d` layers of XMSS trees of height `hp`. Layer 0 holds `2^(h - hp)` trees whose leaves
//! sign FORS public keys; every tree root at layer `j` is signed by a leaf of a tree at
//! layer `j + 1`; the single tree at layer `d - 1` has the public root.
//!
//! A hypertree signature is `d` XMSS signatures, bottom layer first.

use crate::adrs::Adrs;
use crate::error::{Error, Result};
use crate::hash::TweakableHash;
use crate::params::Params;
use crate::utils::{bytes_to_u64, mask_low_bits};
use crate::xmss;
use tracing::trace;

/// The three parts of a message digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestSplit {
    /// `md_bytes` of FORS input.
    pub md: Vec<u8>,
    /// Index of the bottom-layer XMSS tree, `h - hp` bits.
    pub idx_tree: u64,
    /// Index of the leaf in that tree, `hp` bits.
    pub idx_leaf: u32,
}

/// Splits a `digest_bytes`-long digest into the FORS digest, the tree index and the leaf
/// index. Excess high bits of the two indices are dropped.
pub fn split_digest(params: &Params, digest: &[u8]) -> DigestSplit {
    let md_end = params.md_bytes();
    let tree_end = md_end + params.tree_bytes();
    let leaf_end = tree_end + params.leaf_bytes();

    let md = digest[..md_end].to_vec();
    let idx_tree = mask_low_bits(bytes_to_u64(&digest[md_end..tree_end]), params.tree_bits());
    let idx_leaf = mask_low_bits(bytes_to_u64(&digest[tree_end..leaf_end]), params.hp()) as u32;

    DigestSplit {
        md,
        idx_tree,
        idx_leaf,
    }
}

/// Root of the top layer tree, the public root of the key pair.
pub fn root<H: TweakableHash>(hasher: &H, params: &Params, sk_seed: &[u8]) -> Vec<u8> {
    let mut adrs = Adrs::new();
    adrs.set_layer_addr(params.d() as u32 - 1);
    adrs.set_tree_addr(0);
    xmss::root(hasher, params, sk_seed, &adrs)
}

/// Moves from the tree at one layer to its parent: the low `hp` bits of the tree index
/// select the leaf in the parent tree, the rest select the parent tree.
fn next_layer(params: &Params, idx_tree: u64) -> (u64, u32) {
    let hp = params.hp();
    let idx_leaf = mask_low_bits(idx_tree, hp) as u32;
    (idx_tree >> hp, idx_leaf)
}

/// Signs an `n`-byte message with leaf `idx_leaf` of bottom-layer tree `idx_tree`.
///
/// Fails with [`Error::InvalidParameter`] if `msg` is shorter than `n` bytes or
/// `idx_leaf >= 2^hp`.
pub fn sign<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    msg: &[u8],
    sk_seed: &[u8],
    idx_tree: u64,
    idx_leaf: u32,
) -> Result<Vec<u8>> {
    if msg.len() < params.n() {
        return Err(Error::InvalidParameter(format!(
            "hypertree message must be at least {} bytes, found {}",
            params.n(),
            msg.len()
        )));
    }

    let mut sig = Vec::with_capacity(params.ht_bytes());
    let mut adrs = Adrs::new();
    let mut node = msg[..params.n()].to_vec();
    let (mut idx_tree, mut idx_leaf) = (idx_tree, idx_leaf);

    for layer in 0..params.d() {
        if layer > 0 {
            (idx_tree, idx_leaf) = next_layer(params, idx_tree);
        }
        trace!(layer, idx_tree, idx_leaf, "signing hypertree layer");

        adrs.set_layer_addr(layer as u32);
        adrs.set_tree_addr(idx_tree);
        let layer_sig = xmss::sign(hasher, params, &node, sk_seed, idx_leaf, &adrs)?;

        if layer + 1 < params.d() {
            node = xmss::pk_from_sig(hasher, params, idx_leaf, &layer_sig, &node, &adrs)?;
        }
        sig.extend_from_slice(&layer_sig);
    }

    Ok(sig)
}

/// Verifies a hypertree signature of an `n`-byte message against the public root.
pub fn verify<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    msg: &[u8],
    sig: &[u8],
    pk_root: &[u8],
    idx_tree: u64,
    idx_leaf: u32,
) -> bool {
    if sig.len() != params.ht_bytes() || msg.len() < params.n() {
        return false;
    }

    let mut adrs = Adrs::new();
    let mut node = msg[..params.n()].to_vec();
    let (mut idx_tree, mut idx_leaf) = (idx_tree, idx_leaf);

    for (layer, layer_sig) in sig.chunks_exact(params.xmss_bytes()).enumerate() {
        if layer > 0 {
            (idx_tree, idx_leaf) = next_layer(params, idx_tree);
        }
        adrs.set_layer_addr(layer as u32);
        adrs.set_tree_addr(idx_tree);
        node = match xmss::pk_from_sig(hasher, params, idx_leaf, layer_sig, &node, &adrs) {
            Ok(layer_root) => layer_root,
            Err(_) => return false,
        };
        trace!(layer, idx_tree, idx_leaf, "recovered hypertree layer root");
    }

    node == pk_root
}
