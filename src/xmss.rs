//! # XMSS authentication trees
//!
//! An XMSS tree of height `hp` has the `2^hp` WOTS+ public keys of one hypertree tree as
//! leaves. Node `i` at height `z` is `H(node(2i, z - 1) || node(2i + 1, z - 1))`, hashed
//! under a [`AdrsType::Tree`] address carrying `(z, i)`.
//!
//! An XMSS signature is the WOTS+ signature of leaf `idx` followed by the `hp` siblings on
//! the path from that leaf to the root.
//!
//! Subtrees at or above [`PARALLEL_SUBTREE_HEIGHT`] compute their two children with
//! `rayon::join`; each branch works on its own copy of the address.

use crate::adrs::{Adrs, AdrsType};
use crate::error::{Error, Result};
use crate::hash::TweakableHash;
use crate::params::Params;
use crate::wots_plus;
use rayon::prelude::*;

/// Smallest subtree height whose two children are computed in parallel.
pub const PARALLEL_SUBTREE_HEIGHT: usize = 3;

/// Computes node `idx` at height `z` of the XMSS tree addressed by `adrs`.
///
/// # Arguments
///
/// * `sk_seed` - The `n`-byte secret seed of the leaves.
/// * `idx` - Index of the node among the `2^(hp - z)` nodes at height `z`.
/// * `z` - Height of the node; leaves are at height 0.
/// * `adrs` - Address with the layer and tree addresses set.
///
/// # Returns
///
/// The `n`-byte node, or [`Error::InvalidParameter`] if `z > hp` or `idx >= 2^(hp - z)`.
pub fn node<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    idx: u32,
    z: usize,
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    let hp = params.hp();
    if z > hp {
        return Err(Error::InvalidParameter(format!(
            "node height {z} exceeds tree height {hp}"
        )));
    }
    if u64::from(idx) >= 1_u64 << (hp - z) {
        return Err(Error::InvalidParameter(format!(
            "node index {idx} out of range at height {z}"
        )));
    }
    Ok(tree_hash(hasher, params, sk_seed, idx, z, adrs))
}

/// Root of the XMSS tree addressed by `adrs`.
pub fn root<H: TweakableHash>(hasher: &H, params: &Params, sk_seed: &[u8], adrs: &Adrs) -> Vec<u8> {
    tree_hash(hasher, params, sk_seed, 0, params.hp(), adrs)
}

fn tree_hash<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    idx: u32,
    z: usize,
    adrs: &Adrs,
) -> Vec<u8> {
    if z == 0 {
        let mut leaf_adrs = *adrs;
        leaf_adrs.set_type_and_clear(AdrsType::WotsHash);
        leaf_adrs.set_keypair_addr(idx);
        return wots_plus::pk_gen(hasher, params, sk_seed, &leaf_adrs);
    }

    let left = || tree_hash(hasher, params, sk_seed, 2 * idx, z - 1, adrs);
    let right = || tree_hash(hasher, params, sk_seed, 2 * idx + 1, z - 1, adrs);
    let (lnode, rnode) = if z >= PARALLEL_SUBTREE_HEIGHT {
        rayon::join(left, right)
    } else {
        (left(), right())
    };

    let mut node_adrs = *adrs;
    node_adrs.set_type_and_clear(AdrsType::Tree);
    node_adrs.set_tree_height(z as u32);
    node_adrs.set_tree_index(idx);

    let mut output = vec![0_u8; params.n()];
    hasher.spx_h(&mut output, &lnode, &rnode, &node_adrs);
    output
}

/// The `hp` sibling nodes on the path from leaf `idx` to the root, lowest first.
pub fn auth_path<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    idx: u32,
    adrs: &Adrs,
) -> Vec<u8> {
    let n = params.n();
    let mut path = vec![0_u8; params.hp() * n];
    path.par_chunks_mut(n).enumerate().for_each(|(j, sibling)| {
        let sibling_idx = (idx >> j) ^ 1;
        sibling.copy_from_slice(&tree_hash(hasher, params, sk_seed, sibling_idx, j, adrs));
    });
    path
}

/// Signs an `n`-byte message with leaf `idx` of the XMSS tree addressed by `adrs`.
///
/// # Arguments
///
/// * `msg` - The message; only its first `n` bytes are signed.
/// * `sk_seed` - The `n`-byte secret seed.
/// * `idx` - The signing leaf, below `2^hp`.
/// * `adrs` - Address with the layer and tree addresses set.
///
/// # Returns
///
/// The WOTS+ signature followed by the authentication path, `xmss_bytes` in total. Fails
/// with [`Error::InvalidParameter`] if `idx >= 2^hp` or `msg` is shorter than `n` bytes.
pub fn sign<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    msg: &[u8],
    sk_seed: &[u8],
    idx: u32,
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    if u64::from(idx) >= 1_u64 << params.hp() {
        return Err(Error::InvalidParameter(format!(
            "leaf index {idx} out of range for tree height {}",
            params.hp()
        )));
    }
    if msg.len() < params.n() {
        return Err(Error::InvalidParameter(format!(
            "XMSS message must be at least {} bytes, found {}",
            params.n(),
            msg.len()
        )));
    }

    let mut wots_adrs = *adrs;
    wots_adrs.set_type_and_clear(AdrsType::WotsHash);
    wots_adrs.set_keypair_addr(idx);

    let (sig, path) = rayon::join(
        || wots_plus::sign(hasher, params, msg, sk_seed, &wots_adrs),
        || auth_path(hasher, params, sk_seed, idx, adrs),
    );
    let mut sig = sig?;
    sig.extend_from_slice(&path);
    Ok(sig)
}

/// Computes the root of the XMSS tree addressed by `adrs` from an XMSS signature of `msg`
/// made with leaf `idx`. The caller compares it against the expected root.
///
/// Fails with [`Error::MalformedSignature`] unless `sig` is exactly `xmss_bytes` long, and
/// with [`Error::InvalidParameter`] if `msg` is shorter than `n` bytes.
pub fn pk_from_sig<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    idx: u32,
    sig: &[u8],
    msg: &[u8],
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    if sig.len() != params.xmss_bytes() {
        return Err(Error::MalformedSignature {
            expected: params.xmss_bytes(),
            found: sig.len(),
        });
    }

    let n = params.n();
    let (wots_sig, path) = sig.split_at(params.wots_bytes());

    let mut wots_adrs = *adrs;
    wots_adrs.set_type_and_clear(AdrsType::WotsHash);
    wots_adrs.set_keypair_addr(idx);
    let mut node = wots_plus::pk_from_sig(hasher, params, wots_sig, msg, &wots_adrs)?;

    let mut tree_adrs = *adrs;
    tree_adrs.set_type_and_clear(AdrsType::Tree);

    let mut parent = vec![0_u8; n];
    let mut node_idx = idx;
    for (k, sibling) in path.chunks_exact(n).enumerate() {
        node_idx >>= 1;
        tree_adrs.set_tree_height(k as u32 + 1);
        tree_adrs.set_tree_index(node_idx);
        if (idx >> k) & 1 == 0 {
            hasher.spx_h(&mut parent, &node, sibling, &tree_adrs);
        } else {
            hasher.spx_h(&mut parent, sibling, &node, &tree_adrs);
        }
        std::mem::swap(&mut node, &mut parent);
    }
    Ok(node)
}
