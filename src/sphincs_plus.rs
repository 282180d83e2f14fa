//! # Stateless hash-based signatures
//!
//! [`SphincsPlus`] ties the pieces together into a stateless signature scheme in the style
//! of SLH-DSA:
//!
//! * **Key generation** draws three `n`-byte seeds and computes the root of the top
//!   hypertree layer. The public key is `PK.seed || PK.root`; the secret key is
//!   `SK.seed || SK.prf || PK.seed || PK.root`.
//! * **Signing** hashes the message into a FORS digest and a hypertree leaf, signs the
//!   digest with the FORS instance at that leaf, and signs the FORS public key through all
//!   `d` hypertree layers. The signature is `FORS signature || XMSS signature * d`.
//! * **Verification** runs the same recoveries from the signature alone and compares the
//!   recovered top root with `PK.root`.
//!
//! Signing is deterministic: the digest is `H_msg(PK.seed, PK.root, M)`, so signing the
//! same message twice with the same key gives the same signature.
//!
//! ## Usage Example
//!
//! ```rust
//! use hypersig::{params::SPX_128F, SphincsPlus};
//!
//! let sp: SphincsPlus = SphincsPlus::new(SPX_128F);
//! let (pk, sk) = sp.keygen().expect("key generation failed");
//!
//! let message = b"stateless hash-based signature";
//! let signature = sp.sign(message, &sk).expect("signing failed");
//! assert!(sp.verify(&signature, message, &pk).is_ok());
//! ```
//!
//! The hash backend is a type parameter: `SphincsPlus<ShakeHasher>` signs with SHAKE256,
//! the default [`DefaultHasher`] with SHA-2.

use crate::adrs::{Adrs, AdrsType};
use crate::error::{Error, Result, VerificationError};
use crate::fors;
use crate::hash::{DefaultHasher, TweakableHash};
use crate::hypertree::{self, DigestSplit};
use crate::params::Params;
use crate::utils::bytes_struct;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::marker::PhantomData;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

bytes_struct!(
    /// `PK.seed || PK.root`, `2n` bytes.
    PublicKey
);

bytes_struct!(
    /// A FORS signature followed by `d` XMSS signatures, bottom layer first.
    Signature
);

impl PublicKey {
    /// Checks the length of `bytes` against `params`.
    pub fn from_bytes(params: &Params, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.pk_bytes() {
            return Err(Error::BadLength(params.pk_bytes(), bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }

    pub fn seed(&self) -> &[u8] {
        &self.0[..self.0.len() / 2]
    }

    pub fn root(&self) -> &[u8] {
        &self.0[self.0.len() / 2..]
    }
}

impl Signature {
    /// Checks the length of `bytes` against `params`.
    pub fn from_bytes(params: &Params, bytes: &[u8]) -> Result<Self> {
        Self::check_len(params, bytes.len())?;
        Ok(Self(bytes.to_vec()))
    }

    fn check_len(params: &Params, found: usize) -> Result<()> {
        if found != params.sig_bytes() {
            return Err(Error::MalformedSignature {
                expected: params.sig_bytes(),
                found,
            });
        }
        Ok(())
    }

    /// The `k` revealed FORS leaves with their authentication paths.
    pub fn fors_signature(&self, params: &Params) -> Result<&[u8]> {
        Self::check_len(params, self.len())?;
        Ok(&self.0[..params.fors_bytes()])
    }

    /// The XMSS signature of hypertree layer `layer`.
    pub fn xmss_signature(&self, params: &Params, layer: usize) -> Result<&[u8]> {
        Self::check_len(params, self.len())?;
        if layer >= params.d() {
            return Err(Error::InvalidParameter(format!(
                "layer {layer} out of range for {} layers",
                params.d()
            )));
        }
        let start = params.fors_bytes() + layer * params.xmss_bytes();
        Ok(&self.0[start..start + params.xmss_bytes()])
    }
}

/// `SK.seed || SK.prf || PK.seed || PK.root`, `4n` bytes.
///
/// The bytes are wiped when the key is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct SecretKey(Vec<u8>);

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretKey").finish_non_exhaustive()
    }
}

impl AsRef<[u8]> for SecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for SecretKey {
    /// By no means constant time comparison
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretKey {}

impl SecretKey {
    /// Checks the length of `bytes` against `params`.
    pub fn from_bytes(params: &Params, bytes: &[u8]) -> Result<Self> {
        if bytes.len() != params.sk_bytes() {
            return Err(Error::BadLength(params.sk_bytes(), bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn part(&self, i: usize) -> &[u8] {
        let n = self.0.len() / 4;
        &self.0[i * n..(i + 1) * n]
    }

    pub fn sk_seed(&self) -> &[u8] {
        self.part(0)
    }

    pub fn sk_prf(&self) -> &[u8] {
        self.part(1)
    }

    pub fn pk_seed(&self) -> &[u8] {
        self.part(2)
    }

    pub fn pk_root(&self) -> &[u8] {
        self.part(3)
    }

    /// The public key embedded in the secret key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0[self.0.len() / 2..].to_vec())
    }
}

/// The signature scheme over a parameter set and a hash backend.
#[derive(Clone, Debug)]
pub struct SphincsPlus<H: TweakableHash = DefaultHasher> {
    params: Params,
    _hasher: PhantomData<H>,
}

impl<H: TweakableHash> Default for SphincsPlus<H> {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

/// FORS address of the instance at leaf `idx_leaf` of bottom-layer tree `idx_tree`.
fn fors_adrs(idx_tree: u64, idx_leaf: u32) -> Adrs {
    let mut adrs = Adrs::new();
    adrs.set_layer_addr(0);
    adrs.set_tree_addr(idx_tree);
    adrs.set_type_and_clear(AdrsType::ForsTree);
    adrs.set_keypair_addr(idx_leaf);
    adrs
}

impl<H: TweakableHash> SphincsPlus<H> {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            _hasher: PhantomData,
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Generates a key pair from fresh OS randomness.
    pub fn keygen(&self) -> Result<(PublicKey, SecretKey)> {
        let n = self.params.n();
        let mut sk_seed = Zeroizing::new(vec![0_u8; n]);
        let mut sk_prf = Zeroizing::new(vec![0_u8; n]);
        let mut pk_seed = vec![0_u8; n];
        OsRng.fill_bytes(&mut sk_seed);
        OsRng.fill_bytes(&mut sk_prf);
        OsRng.fill_bytes(&mut pk_seed);
        self.keygen_from_seeds(&sk_seed, &sk_prf, &pk_seed)
    }

    /// Generates the key pair determined by the three `n`-byte seeds.
    pub fn keygen_from_seeds(
        &self,
        sk_seed: &[u8],
        sk_prf: &[u8],
        pk_seed: &[u8],
    ) -> Result<(PublicKey, SecretKey)> {
        let params = &self.params;
        let n = params.n();
        for (name, seed) in [("SK.seed", sk_seed), ("SK.prf", sk_prf), ("PK.seed", pk_seed)] {
            if seed.len() != n {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be {n} bytes, got {}",
                    seed.len()
                )));
            }
        }

        let hasher = H::new(params, pk_seed);
        let root = hypertree::root(&hasher, params, sk_seed);

        let mut sk = Vec::with_capacity(params.sk_bytes());
        sk.extend_from_slice(sk_seed);
        sk.extend_from_slice(sk_prf);
        sk.extend_from_slice(pk_seed);
        sk.extend_from_slice(&root);
        let sk = SecretKey(sk);

        debug!(n, h = params.h(), d = params.d(), "generated key pair");
        Ok((sk.public_key(), sk))
    }

    fn split_message(&self, hasher: &H, pk_root: &[u8], message: &[u8]) -> DigestSplit {
        let mut digest = vec![0_u8; self.params.digest_bytes()];
        hasher.h_msg(&mut digest, pk_root, message);
        hypertree::split_digest(&self.params, &digest)
    }

    /// Signs `message` with `sk`.
    ///
    /// Fails with [`Error::BadLength`] if `sk` does not belong to this parameter set.
    pub fn sign(&self, message: &[u8], sk: &SecretKey) -> Result<Signature> {
        let params = &self.params;
        if sk.len() != params.sk_bytes() {
            return Err(Error::BadLength(params.sk_bytes(), sk.len()));
        }

        let hasher = H::new(params, sk.pk_seed());
        let DigestSplit {
            md,
            idx_tree,
            idx_leaf,
        } = self.split_message(&hasher, sk.pk_root(), message);
        let adrs = fors_adrs(idx_tree, idx_leaf);

        let mut sig = fors::sign(&hasher, params, &md, sk.sk_seed(), &adrs)?;
        let fors_pk = fors::pk_from_sig(&hasher, params, &sig, &md, &adrs)?;
        let ht_sig = hypertree::sign(&hasher, params, &fors_pk, sk.sk_seed(), idx_tree, idx_leaf)?;
        sig.extend_from_slice(&ht_sig);

        debug!(idx_tree, idx_leaf, sig_bytes = sig.len(), "signed message");
        Ok(Signature(sig))
    }

    /// Verifies `signature` on `message` under `pk`.
    ///
    /// Returns `Ok(())` for a valid signature. A signature of the wrong length is rejected
    /// with [`Error::MalformedSignature`] before any hashing; a well-formed signature that
    /// does not lead to `PK.root` is rejected with [`Error::VerificationFailed`].
    pub fn verify(&self, signature: &Signature, message: &[u8], pk: &PublicKey) -> Result<()> {
        let params = &self.params;
        if pk.len() != params.pk_bytes() {
            return Err(Error::BadLength(params.pk_bytes(), pk.len()));
        }
        Signature::check_len(params, signature.len())?;

        let hasher = H::new(params, pk.seed());
        let DigestSplit {
            md,
            idx_tree,
            idx_leaf,
        } = self.split_message(&hasher, pk.root(), message);
        let adrs = fors_adrs(idx_tree, idx_leaf);

        let (fors_sig, ht_sig) = signature.as_ref().split_at(params.fors_bytes());
        let fors_pk = fors::pk_from_sig(&hasher, params, fors_sig, &md, &adrs)?;

        if hypertree::verify(&hasher, params, &fors_pk, ht_sig, pk.root(), idx_tree, idx_leaf) {
            debug!(idx_tree, idx_leaf, "signature verified");
            Ok(())
        } else {
            debug!(idx_tree, idx_leaf, "signature rejected");
            Err(VerificationError::RootMismatch.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SPX_128F;
    use rand::prelude::*;

    #[test]
    fn test_sphincs_plus() {
        let sp: SphincsPlus = SphincsPlus::new(SPX_128F);

        let kg = sp.keygen();
        assert!(kg.is_ok());
        let (pk, sk) = kg.unwrap();
        assert_eq!(pk.len(), SPX_128F.pk_bytes());
        assert_eq!(sk.len(), SPX_128F.sk_bytes());
        assert_eq!(sk.public_key(), pk);

        let mut rng = thread_rng();
        let len: u8 = rng.gen();
        let message = (0..len).map(|_| rng.gen::<u8>()).collect::<Vec<_>>();

        let signing = sp.sign(&message, &sk);
        assert!(signing.is_ok());
        let signature = signing.unwrap();
        assert_eq!(signature.len(), SPX_128F.sig_bytes());

        assert!(sp.verify(&signature, &message, &pk).is_ok());

        let mut fake_signature = signature.clone();
        fake_signature.0[0] ^= 1;

        assert!(matches!(
            sp.verify(&fake_signature, &message, &pk),
            Err(Error::VerificationFailed(VerificationError::RootMismatch))
        ));
        println!("SPHINCS+ keygen, signing, and verify tests passed.");
    }

    #[test]
    fn test_concrete_vector() {
        let params = Params::new(32, 16, 3, 1, 5, 2).unwrap();
        let sp: SphincsPlus = SphincsPlus::new(params);
        let zero = [0_u8; 32];

        let (pk, sk) = sp.keygen_from_seeds(&zero, &zero, &zero).unwrap();
        let (pk_again, sk_again) = sp.keygen_from_seeds(&zero, &zero, &zero).unwrap();
        assert_eq!(pk, pk_again);
        assert_eq!(sk, sk_again);
        assert_eq!(pk.seed(), &zero);
        assert_eq!(sk.sk_prf(), &zero);

        let signature = sp.sign(b"test", &sk).unwrap();
        assert_eq!(signature, sp.sign(b"test", &sk).unwrap());
        assert!(sp.verify(&signature, b"test", &pk).is_ok());
        assert!(sp.verify(&signature, b"tesu", &pk).is_err());
    }

    #[test]
    fn test_signature_parts() {
        let params = Params::new(16, 16, 2, 3, 4, 3).unwrap();
        let sp: SphincsPlus = SphincsPlus::new(params);
        let (_, sk) = sp.keygen().unwrap();
        let signature = sp.sign(b"parts", &sk).unwrap();

        let fors_part = signature.fors_signature(&params).unwrap();
        assert_eq!(fors_part.len(), params.fors_bytes());
        let mut joined = fors_part.to_vec();
        for layer in 0..params.d() {
            joined.extend_from_slice(signature.xmss_signature(&params, layer).unwrap());
        }
        assert_eq!(joined, signature.as_ref());
        assert!(matches!(
            signature.xmss_signature(&params, 3),
            Err(Error::InvalidParameter(_))
        ));

        let short = Signature::from(&signature.as_ref()[1..]);
        assert!(matches!(
            short.fors_signature(&params),
            Err(Error::MalformedSignature { .. })
        ));
    }

    #[test]
    fn test_wrong_seed_length() {
        let sp: SphincsPlus = SphincsPlus::default();
        assert!(matches!(
            sp.keygen_from_seeds(&[0_u8; 16], &[0_u8; 15], &[0_u8; 16]),
            Err(Error::InvalidParameter(_))
        ));
    }
}
