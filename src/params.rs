//! Parameter sets of the hypertree signature scheme.
//!
//! A [`Params`] value fixes every size in the scheme: the hash output length `n`, the
//! Winternitz parameter `w`, the XMSS tree height `hp`, the number of hypertree layers
//! `d`, and the FORS tree height `a` and tree count `k`. All derived lengths (WOTS+
//! chain count, signature and key byte sizes, digest split) are computed once at
//! construction.
//!
//! [`Params::new`] is the only fallible constructor and rejects any combination the
//! algorithms cannot run with, so an invalid configuration fails when it is loaded and
//! never at sign or verify time.
//!
//! The named presets follow the SLH-DSA parameter sets:
//!
//! | preset       | n  | h  | d  | hp | a  | k  | w  |
//! |--------------|----|----|----|----|----|----|----|
//! | [`SPX_128S`] | 16 | 63 | 7  | 9  | 12 | 14 | 16 |
//! | [`SPX_128F`] | 16 | 66 | 22 | 3  | 6  | 33 | 16 |
//! | [`SPX_192S`] | 24 | 63 | 7  | 9  | 14 | 17 | 16 |
//! | [`SPX_192F`] | 24 | 66 | 22 | 3  | 8  | 33 | 16 |
//! | [`SPX_256S`] | 32 | 64 | 8  | 8  | 14 | 22 | 16 |
//! | [`SPX_256F`] | 32 | 68 | 17 | 4  | 9  | 35 | 16 |

use crate::error::{Error, Result};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Security level 1, small signatures.
pub const SPX_128S: Params = Params::derive(16, 16, 9, 7, 12, 14);
/// Security level 1, fast signing.
pub const SPX_128F: Params = Params::derive(16, 16, 3, 22, 6, 33);
/// Security level 3, small signatures.
pub const SPX_192S: Params = Params::derive(24, 16, 9, 7, 14, 17);
/// Security level 3, fast signing.
pub const SPX_192F: Params = Params::derive(24, 16, 3, 22, 8, 33);
/// Security level 5, small signatures.
pub const SPX_256S: Params = Params::derive(32, 16, 8, 8, 14, 22);
/// Security level 5, fast signing.
pub const SPX_256F: Params = Params::derive(32, 16, 4, 17, 9, 35);

/// Fields as they appear in a configuration file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct ParamsConfig {
    pub n: usize,
    pub w: usize,
    pub hp: usize,
    pub d: usize,
    pub a: usize,
    pub k: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(Serialize, Deserialize),
    serde(try_from = "ParamsConfig", into = "ParamsConfig")
)]
pub struct Params {
    n: usize,
    w: usize,
    hp: usize,
    d: usize,
    a: usize,
    k: usize,
    lg_w: usize,
    len1: usize,
    len2: usize,
}

impl Default for Params {
    fn default() -> Self {
        SPX_128F
    }
}

impl TryFrom<ParamsConfig> for Params {
    type Error = Error;

    fn try_from(c: ParamsConfig) -> Result<Self> {
        Params::new(c.n, c.w, c.hp, c.d, c.a, c.k)
    }
}

impl From<Params> for ParamsConfig {
    fn from(p: Params) -> Self {
        ParamsConfig {
            n: p.n,
            w: p.w,
            hp: p.hp,
            d: p.d,
            a: p.a,
            k: p.k,
        }
    }
}

impl Params {
    /// Validates and builds a parameter set.
    pub fn new(n: usize, w: usize, hp: usize, d: usize, a: usize, k: usize) -> Result<Self> {
        let invalid = |msg: String| Err(Error::InvalidParameter(msg));

        if !(1..=32).contains(&n) {
            return invalid(format!("n must be in [1, 32], got {n}"));
        }
        if !(2..=256).contains(&w) || !w.is_power_of_two() {
            return invalid(format!("w must be a power of two in [2, 256], got {w}"));
        }
        if !(1..=32).contains(&hp) {
            return invalid(format!("hp must be in [1, 32], got {hp}"));
        }
        if d == 0 {
            return invalid("d must be at least 1".into());
        }
        if (d - 1).checked_mul(hp).map_or(true, |bits| bits > 64) {
            return invalid(format!(
                "tree index of {d} layers of height {hp} does not fit in 64 bits"
            ));
        }
        if !(1..=24).contains(&a) {
            return invalid(format!("a must be in [1, 24], got {a}"));
        }
        let fors_leaves = (k as u64).checked_mul(1_u64 << a);
        if k == 0 || fors_leaves.map_or(true, |leaves| leaves > 1_u64 << 32) {
            return invalid(format!("k * 2^a must be in [1, 2^32], got k = {k}, a = {a}"));
        }

        let params = Self::derive(n, w, hp, d, a, k);

        debug_assert!(
            (w as u128)
                .checked_pow(params.len2 as u32)
                .map_or(true, |cap| (((w - 1) * params.len1) as u128) < cap),
            "len2 digits cannot hold the WOTS+ checksum"
        );

        Ok(params)
    }

    /// Computes the derived lengths without validation. Only used for inputs known to be
    /// valid (the presets) and from [`Params::new`].
    const fn derive(n: usize, w: usize, hp: usize, d: usize, a: usize, k: usize) -> Self {
        let lg_w = w.trailing_zeros() as usize;
        let len1 = (8 * n + lg_w - 1) / lg_w;
        // len2 = floor(log2(len1 * (w - 1)) / lg_w) + 1
        let max_checksum = len1 * (w - 1);
        let floor_log2 = (usize::BITS - 1 - max_checksum.leading_zeros()) as usize;
        let len2 = floor_log2 / lg_w + 1;
        Self {
            n,
            w,
            hp,
            d,
            a,
            k,
            lg_w,
            len1,
            len2,
        }
    }

    /// Hash output length in bytes.
    pub const fn n(&self) -> usize {
        self.n
    }

    /// Winternitz parameter.
    pub const fn w(&self) -> usize {
        self.w
    }

    /// `log2(w)`, the number of message bits per WOTS+ digit.
    pub const fn lg_w(&self) -> usize {
        self.lg_w
    }

    /// Height of one XMSS tree.
    pub const fn hp(&self) -> usize {
        self.hp
    }

    /// Number of hypertree layers.
    pub const fn d(&self) -> usize {
        self.d
    }

    /// Total hypertree height.
    pub const fn h(&self) -> usize {
        self.d * self.hp
    }

    /// FORS tree height.
    pub const fn a(&self) -> usize {
        self.a
    }

    /// Number of FORS trees.
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Number of message digits in a WOTS+ signature.
    pub const fn len1(&self) -> usize {
        self.len1
    }

    /// Number of checksum digits in a WOTS+ signature.
    pub const fn len2(&self) -> usize {
        self.len2
    }

    /// Number of hash chains in a WOTS+ key.
    pub const fn len(&self) -> usize {
        self.len1 + self.len2
    }

    pub const fn wots_bytes(&self) -> usize {
        self.len() * self.n
    }

    /// One XMSS signature: WOTS+ signature followed by an `hp`-node authentication path.
    pub const fn xmss_bytes(&self) -> usize {
        (self.len() + self.hp) * self.n
    }

    /// One FORS tree: secret leaf followed by an `a`-node authentication path.
    pub const fn fors_tree_bytes(&self) -> usize {
        (self.a + 1) * self.n
    }

    pub const fn fors_bytes(&self) -> usize {
        self.k * self.fors_tree_bytes()
    }

    pub const fn ht_bytes(&self) -> usize {
        self.d * self.xmss_bytes()
    }

    pub const fn sig_bytes(&self) -> usize {
        self.fors_bytes() + self.ht_bytes()
    }

    pub const fn pk_bytes(&self) -> usize {
        2 * self.n
    }

    pub const fn sk_bytes(&self) -> usize {
        4 * self.n
    }

    /// Bits of the tree index selecting the bottom-layer XMSS tree.
    pub const fn tree_bits(&self) -> usize {
        self.h() - self.hp
    }

    /// Bytes of the message digest consumed by FORS.
    pub const fn md_bytes(&self) -> usize {
        (self.k * self.a + 7) / 8
    }

    pub const fn tree_bytes(&self) -> usize {
        (self.tree_bits() + 7) / 8
    }

    pub const fn leaf_bytes(&self) -> usize {
        (self.hp + 7) / 8
    }

    /// Total output length of the message hash.
    pub const fn digest_bytes(&self) -> usize {
        self.md_bytes() + self.tree_bytes() + self.leaf_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_match_slh_dsa_sizes() {
        let expected = [
            (SPX_128S, 35, 32, 64, 7856),
            (SPX_128F, 35, 32, 64, 17088),
            (SPX_192S, 51, 48, 96, 16224),
            (SPX_192F, 51, 48, 96, 35664),
            (SPX_256S, 67, 64, 128, 29792),
            (SPX_256F, 67, 64, 128, 49856),
        ];
        for (params, len, pk, sk, sig_with_randomizer) in expected {
            assert_eq!(params.len(), len);
            assert_eq!(params.pk_bytes(), pk);
            assert_eq!(params.sk_bytes(), sk);
            // SLH-DSA prepends an n-byte randomizer which this layout omits.
            assert_eq!(params.sig_bytes() + params.n(), sig_with_randomizer);
            assert_eq!(Params::new(params.n, params.w, params.hp, params.d, params.a, params.k), Ok(params));
        }
    }

    #[test]
    fn test_wots_lengths_for_other_w() {
        let p = Params::new(32, 4, 3, 1, 5, 2).unwrap();
        assert_eq!(p.len1(), 128);
        assert_eq!(p.len2(), 5);

        let p = Params::new(32, 256, 3, 1, 5, 2).unwrap();
        assert_eq!(p.len1(), 32);
        assert_eq!(p.len2(), 2);

        let p = Params::new(16, 8, 3, 1, 5, 2).unwrap();
        assert_eq!(p.lg_w(), 3);
        assert_eq!(p.len1(), 43);
        assert_eq!(p.len2(), 3);
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let bad = [
            (0, 16, 3, 1, 5, 2),
            (33, 16, 3, 1, 5, 2),
            (16, 12, 3, 1, 5, 2),
            (16, 512, 3, 1, 5, 2),
            (16, 16, 0, 1, 5, 2),
            (16, 16, 3, 0, 5, 2),
            (16, 16, 9, 10, 5, 2),
            (16, 16, 3, 1, 0, 2),
            (16, 16, 3, 1, 5, 0),
            (16, 16, 3, 1, 24, 300),
            (16, 16, 3, 1, 24, (1_usize << 40) + 1),
            (16, 16, 3, 1, 1, usize::MAX),
        ];
        for (n, w, hp, d, a, k) in bad {
            assert!(
                matches!(Params::new(n, w, hp, d, a, k), Err(Error::InvalidParameter(_))),
                "accepted n={n} w={w} hp={hp} d={d} a={a} k={k}"
            );
        }

        // k * 2^a = 2^32 exactly is the largest FORS forest.
        assert!(Params::new(16, 16, 3, 1, 24, 256).is_ok());
    }

    #[test]
    fn test_digest_split_sizes() {
        assert_eq!(SPX_128F.md_bytes(), 25);
        assert_eq!(SPX_128F.tree_bytes(), 8);
        assert_eq!(SPX_128F.leaf_bytes(), 1);
        assert_eq!(SPX_128F.digest_bytes(), 34);

        let single = Params::new(32, 16, 3, 1, 5, 2).unwrap();
        assert_eq!(single.tree_bits(), 0);
        assert_eq!(single.tree_bytes(), 0);
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_config_roundtrip_and_validation() {
        let json = serde_json::to_string(&SPX_256F).unwrap();
        assert_eq!(json, r#"{"n":32,"w":16,"hp":4,"d":17,"a":9,"k":35}"#);
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SPX_256F);

        let bad = r#"{"n":16,"w":10,"hp":3,"d":1,"a":5,"k":2}"#;
        assert!(serde_json::from_str::<Params>(bad).is_err());
    }
}
