//! # Forest Of Random Subsets (FORS)
//!
//! FORS signs a `k * a`-bit message digest with `k` Merkle trees of height `a`. The digest
//! is sliced into `k` indices of `a` bits, most significant bit first; for tree `i` the
//! signature reveals the secret leaf at index `idx_i` and its authentication path. The
//! verifier rebuilds the `k` roots and compresses them into the FORS public key, which the
//! hypertree then signs.
//!
//! All `k` trees share one address space: leaf `idx_i` of tree `i` is leaf
//! `i * 2^a + idx_i`, and node `s` at height `z` of tree `i` is node `i * 2^(a - z) + s`.
//!
//! The `adrs` passed to every function in this module must be of type
//! [`AdrsType::ForsTree`] with the layer, tree and key pair addresses of the FORS
//! instance set.

use crate::adrs::{Adrs, AdrsType};
use crate::error::{Error, Result};
use crate::hash::TweakableHash;
use crate::params::Params;
use crate::utils::base_2b;
use crate::xmss::PARALLEL_SUBTREE_HEIGHT;
use rayon::prelude::*;
use zeroize::Zeroizing;

/// Slices `md` into `k` indices of `a` bits each.
///
/// Fails with [`Error::InvalidParameter`] if `md` holds fewer than `k * a` bits.
pub fn message_to_indices(params: &Params, md: &[u8]) -> Result<Vec<u32>> {
    let needed = params.k() * params.a();
    if md.len() * 8 < needed {
        return Err(Error::InvalidParameter(format!(
            "FORS digest has {} bits, {needed} needed",
            md.len() * 8
        )));
    }
    Ok(base_2b(md, params.a(), params.k()))
}

/// Derives the secret value of leaf `idx`.
pub fn sk_gen<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    adrs: &Adrs,
    idx: u32,
) -> Zeroizing<Vec<u8>> {
    let mut sk_adrs = *adrs;
    sk_adrs.set_type_and_clear(AdrsType::ForsPrf);
    sk_adrs.set_keypair_addr(adrs.keypair_addr());
    sk_adrs.set_tree_index(idx);

    let mut sk = Zeroizing::new(vec![0_u8; params.n()]);
    hasher.spx_prf(&mut sk, sk_seed, &sk_adrs);
    sk
}

/// Computes node `idx` at height `z` of the FORS forest.
///
/// Fails with [`Error::InvalidParameter`] if `z > a` or `idx >= k * 2^(a - z)`.
pub fn tree_node<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    idx: u32,
    z: usize,
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    let a = params.a();
    if z > a {
        return Err(Error::InvalidParameter(format!(
            "FORS node height {z} exceeds tree height {a}"
        )));
    }
    if u64::from(idx) >= (params.k() as u64) << (a - z) {
        return Err(Error::InvalidParameter(format!(
            "FORS node index {idx} out of range at height {z}"
        )));
    }
    Ok(fors_node(hasher, params, sk_seed, idx, z, adrs))
}

fn fors_node<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sk_seed: &[u8],
    idx: u32,
    z: usize,
    adrs: &Adrs,
) -> Vec<u8> {
    let mut node_adrs = *adrs;
    let mut output = vec![0_u8; params.n()];

    if z == 0 {
        let sk = sk_gen(hasher, params, sk_seed, adrs, idx);
        node_adrs.set_tree_height(0);
        node_adrs.set_tree_index(idx);
        hasher.spx_f(&mut output, &sk, &node_adrs);
        return output;
    }

    let left = || fors_node(hasher, params, sk_seed, 2 * idx, z - 1, adrs);
    let right = || fors_node(hasher, params, sk_seed, 2 * idx + 1, z - 1, adrs);
    let (lnode, rnode) = if z >= PARALLEL_SUBTREE_HEIGHT {
        rayon::join(left, right)
    } else {
        (left(), right())
    };

    node_adrs.set_tree_height(z as u32);
    node_adrs.set_tree_index(idx);
    hasher.spx_h(&mut output, &lnode, &rnode, &node_adrs);
    output
}

/// Index of leaf `idx` of tree `tree` in the shared forest address space.
fn leaf_index(params: &Params, tree: usize, idx: u32) -> u32 {
    (((tree as u64) << params.a()) + u64::from(idx)) as u32
}

/// Signs the digest `md` with the FORS instance addressed by `adrs`.
///
/// # Arguments
///
/// * `md` - The digest to sign; its first `k * a` bits select one leaf per tree.
/// * `sk_seed` - The `n`-byte secret seed the leaves are derived from.
/// * `adrs` - A [`AdrsType::ForsTree`] address with the key pair address set.
///
/// # Returns
///
/// For each of the `k` trees, the revealed secret leaf followed by its `a`-node
/// authentication path, `fors_bytes` in total. Fails with [`Error::InvalidParameter`] if
/// `md` is too short.
pub fn sign<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    md: &[u8],
    sk_seed: &[u8],
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    let n = params.n();
    let a = params.a();
    let indices = message_to_indices(params, md)?;

    let mut sig = vec![0_u8; params.fors_bytes()];
    sig.par_chunks_mut(params.fors_tree_bytes())
        .zip(indices.par_iter())
        .enumerate()
        .for_each(|(i, (tree_sig, &idx))| {
            let (leaf, path) = tree_sig.split_at_mut(n);
            leaf.copy_from_slice(&sk_gen(hasher, params, sk_seed, adrs, leaf_index(params, i, idx)));

            for (j, sibling) in path.chunks_exact_mut(n).enumerate() {
                let s = (idx >> j) ^ 1;
                let node_idx = ((i as u32) << (a - j)) + s;
                sibling.copy_from_slice(&fors_node(hasher, params, sk_seed, node_idx, j, adrs));
            }
        });

    Ok(sig)
}

/// Computes the FORS public key from a FORS signature of the digest `md`. The caller
/// compares it against the expected key (in practice, by verifying it with the hypertree).
///
/// # Arguments
///
/// * `sig` - The FORS signature, exactly `fors_bytes` long.
/// * `md` - The digest that was signed, at least `k * a` bits.
/// * `adrs` - The [`AdrsType::ForsTree`] address the signature was made under.
///
/// # Returns
///
/// The `n`-byte FORS public key. Fails with [`Error::MalformedSignature`] if `sig` has
/// the wrong length and with [`Error::InvalidParameter`] if `md` is too short.
pub fn pk_from_sig<H: TweakableHash>(
    hasher: &H,
    params: &Params,
    sig: &[u8],
    md: &[u8],
    adrs: &Adrs,
) -> Result<Vec<u8>> {
    if sig.len() != params.fors_bytes() {
        return Err(Error::MalformedSignature {
            expected: params.fors_bytes(),
            found: sig.len(),
        });
    }

    let n = params.n();
    let indices = message_to_indices(params, md)?;

    let mut roots = vec![0_u8; params.k() * n];
    let mut node_adrs = *adrs;
    let mut parent = vec![0_u8; n];

    for (i, ((root, tree_sig), &idx)) in roots
        .chunks_exact_mut(n)
        .zip(sig.chunks_exact(params.fors_tree_bytes()))
        .zip(indices.iter())
        .enumerate()
    {
        let (sk, path) = tree_sig.split_at(n);

        // Compute the leaf from the revealed secret.
        let mut node_idx = leaf_index(params, i, idx);
        node_adrs.set_tree_height(0);
        node_adrs.set_tree_index(node_idx);
        let mut node = vec![0_u8; n];
        hasher.spx_f(&mut node, sk, &node_adrs);

        for (j, sibling) in path.chunks_exact(n).enumerate() {
            node_idx >>= 1;
            node_adrs.set_tree_height(j as u32 + 1);
            node_adrs.set_tree_index(node_idx);
            if (idx >> j) & 1 == 0 {
                hasher.spx_h(&mut parent, &node, sibling, &node_adrs);
            } else {
                hasher.spx_h(&mut parent, sibling, &node, &node_adrs);
            }
            std::mem::swap(&mut node, &mut parent);
        }
        root.copy_from_slice(&node);
    }

    let mut roots_adrs = *adrs;
    roots_adrs.set_type_and_clear(AdrsType::ForsRoots);
    roots_adrs.set_keypair_addr(adrs.keypair_addr());

    let mut pk = vec![0_u8; n];
    hasher.spx_t_l(&mut pk, &roots, &roots_adrs);
    Ok(pk)
}
