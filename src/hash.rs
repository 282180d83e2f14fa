//! Tweakable hash functions.
//!
//! Every hash call in the scheme goes through a [`TweakableHash`], which binds the public
//! seed at construction and mixes the full address into each call. The four roles are:
//!
//! * `PRF(PK.seed, SK.seed, ADRS)`: derives a secret chain start or FORS leaf.
//! * `F(PK.seed, ADRS, M1)`: one step of a WOTS+ chain, or a FORS leaf.
//! * `H(PK.seed, ADRS, M1 || M2)`: combines two child nodes.
//! * `T_l(PK.seed, ADRS, M1 || ... || Ml)`: compresses WOTS+ chain tips or FORS roots.
//!
//! `h_msg` turns a message into the FORS digest and the hypertree leaf selection.

use crate::adrs::Adrs;
use crate::params::Params;

#[cfg(feature = "sha2")]
pub mod sha2;

#[cfg(feature = "shake")]
pub mod shake;

#[cfg(not(any(feature = "sha2", feature = "shake")))]
compile_error!("at least one of the `sha2` or `shake` features must be enabled");

#[cfg(feature = "sha2")]
pub type DefaultHasher = crate::hash::sha2::Sha2Hasher;
#[cfg(all(feature = "shake", not(feature = "sha2")))]
pub type DefaultHasher = crate::hash::shake::ShakeHasher;

/// A family of tweakable hash functions keyed by a public seed.
///
/// All outputs are exactly `n` bytes and are written to the first `n` bytes of `output`.
/// Implementations are immutable after construction and may be shared across threads.
pub trait TweakableHash: Clone + Send + Sync {
    /// Binds the hash functions to `pub_seed`, which must be `params.n()` bytes.
    fn new(params: &Params, pub_seed: &[u8]) -> Self;

    fn n(&self) -> usize;

    fn pub_seed(&self) -> &[u8];

    /// PRF(PK.seed, SK.seed, ADRS)
    fn spx_prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs);

    /// F(PK.seed, ADRS, M1)
    fn spx_f(&self, output: &mut [u8], input: &[u8], adrs: &Adrs);

    /// Applies [`TweakableHash::spx_f`] to the first `n` bytes of `inout`, in place.
    fn spx_f_inplace(&self, inout: &mut [u8], adrs: &Adrs);

    /// H(PK.seed, ADRS, M1 || M2)
    fn spx_h(&self, output: &mut [u8], left: &[u8], right: &[u8], adrs: &Adrs);

    /// T_l(PK.seed, ADRS, M), where `input` is `l` concatenated `n`-byte blocks.
    fn spx_t_l(&self, output: &mut [u8], input: &[u8], adrs: &Adrs);

    /// H_msg(PK.seed, PK.root, M), filling all of `output`.
    fn h_msg(&self, output: &mut [u8], pk_root: &[u8], message: &[u8]);
}
