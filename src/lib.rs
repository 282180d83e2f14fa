//! Stateless hash-based signatures in the style of SPHINCS+ / SLH-DSA.
//!
//! The building blocks are exposed as modules of free functions over a [`Params`] value and
//! a [`TweakableHash`] backend: [`wots_plus`], [`xmss`], [`fors`] and [`hypertree`].
//! [`SphincsPlus`] composes them into key generation, signing and verification.

mod error;
mod utils;

pub mod adrs;
pub mod fors;
pub mod hash;
pub mod hypertree;
pub mod params;
pub mod sphincs_plus;
pub mod wots_plus;
pub mod xmss;

pub use crate::adrs::{Adrs, AdrsType};
pub use crate::error::{Error, Result, VerificationError};
pub use crate::hash::{DefaultHasher, TweakableHash};
pub use crate::params::{Params, ParamsConfig};
pub use crate::sphincs_plus::{PublicKey, SecretKey, Signature, SphincsPlus};
pub use crate::utils::base_2b;

#[cfg(feature = "sha2")]
pub use crate::hash::sha2::Sha2Hasher;
#[cfg(feature = "shake")]
pub use crate::hash::shake::ShakeHasher;
