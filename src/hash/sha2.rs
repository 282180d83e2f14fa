use crate::adrs::Adrs;
use crate::hash::TweakableHash;
use crate::params::Params;
use sha2::{Digest, Sha256, Sha512};

const SHA256_BLOCK_BYTES: usize = 64;
const SHA512_BLOCK_BYTES: usize = 128;

/// SHA-2 tweakable hashes.
///
/// `PRF` and `F` always use SHA-256. `H`, `T_l` and `H_msg` use SHA-512 once `n` exceeds
/// 16 bytes, so message and tree hashing run on a wider primitive at the higher levels.
/// Both states are pre-loaded with the block-padded public seed.
#[derive(Clone, Debug)]
pub struct Sha2Hasher {
    n: usize,
    pub_seed: Vec<u8>,
    sha256: Sha256,
    sha512: Option<Sha512>,
}

impl Sha2Hasher {
    fn thash(&self, output: &mut [u8], blocks: &[&[u8]], adrs: &Adrs) {
        let n = self.n;
        match &self.sha512 {
            Some(sha512) => {
                let mut hasher = sha512.clone();
                hasher.update(adrs.compressed());
                for block in blocks {
                    hasher.update(block);
                }
                output[..n].copy_from_slice(&hasher.finalize()[..n]);
            }
            None => {
                let mut hasher = self.sha256.clone();
                hasher.update(adrs.compressed());
                for block in blocks {
                    hasher.update(block);
                }
                output[..n].copy_from_slice(&hasher.finalize()[..n]);
            }
        }
    }

    /// F(PK.seed, ADRS, M1) = SHA-256(BlockPad(PK.seed) || ADRSc || M1)
    fn f_block(&self, input: &[u8], adrs: &Adrs) -> [u8; 32] {
        let mut hasher = self.sha256.clone();
        hasher.update(adrs.compressed());
        hasher.update(&input[..self.n]);
        let mut block = [0_u8; 32];
        block.copy_from_slice(&hasher.finalize());
        block
    }
}

/// MGF1 mask generation over the concatenation of `seed`, filling all of `output`.
fn mgf1<D: Digest>(output: &mut [u8], seed: &[&[u8]]) {
    for (counter, chunk) in output.chunks_mut(<D as Digest>::output_size()).enumerate() {
        let mut hasher = D::new();
        for part in seed {
            Digest::update(&mut hasher, part);
        }
        Digest::update(&mut hasher, (counter as u32).to_be_bytes());
        let block = hasher.finalize();
        chunk.copy_from_slice(&block[..chunk.len()]);
    }
}

impl TweakableHash for Sha2Hasher {
    fn new(params: &Params, pub_seed: &[u8]) -> Self {
        let n = params.n();

        // block-pad and initialize sha256 and sha512 with pub_seed
        let mut block256 = [0_u8; SHA256_BLOCK_BYTES];
        block256[..n].copy_from_slice(&pub_seed[..n]);
        let mut sha256 = Sha256::new();
        sha256.update(block256);

        let sha512 = (n > 16).then(|| {
            let mut block512 = [0_u8; SHA512_BLOCK_BYTES];
            block512[..n].copy_from_slice(&pub_seed[..n]);
            let mut sha512 = Sha512::new();
            sha512.update(block512);
            sha512
        });

        Self {
            n,
            pub_seed: pub_seed[..n].to_vec(),
            sha256,
            sha512,
        }
    }

    fn n(&self) -> usize {
        self.n
    }

    fn pub_seed(&self) -> &[u8] {
        &self.pub_seed
    }

    /// PRF(PK.seed, SK.seed, ADRS) = SHA-256(BlockPad(PK.seed) || ADRSc || SK.seed)
    fn spx_prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs) {
        self.spx_f(output, sk_seed, adrs);
    }

    fn spx_f(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        let block = self.f_block(input, adrs);
        output[..self.n].copy_from_slice(&block[..self.n]);
    }

    fn spx_f_inplace(&self, inout: &mut [u8], adrs: &Adrs) {
        let block = self.f_block(inout, adrs);
        inout[..self.n].copy_from_slice(&block[..self.n]);
    }

    /// H(PK.seed, ADRS, M1 || M2) = SHA-x(BlockPad(PK.seed) || ADRSc || M1 || M2)
    fn spx_h(&self, output: &mut [u8], left: &[u8], right: &[u8], adrs: &Adrs) {
        self.thash(output, &[&left[..self.n], &right[..self.n]], adrs);
    }

    /// T_l(PK.seed, ADRS, M) = SHA-x(BlockPad(PK.seed) || ADRSc || M)
    fn spx_t_l(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        self.thash(output, &[input], adrs);
    }

    /// H_msg(PK.seed, PK.root, M) = MGF1-SHA-x(PK.seed || SHA-x(PK.seed || PK.root || M))
    fn h_msg(&self, output: &mut [u8], pk_root: &[u8], message: &[u8]) {
        let pk_seed = self.pub_seed.as_slice();
        if self.sha512.is_some() {
            let inner = Sha512::new()
                .chain_update(pk_seed)
                .chain_update(pk_root)
                .chain_update(message)
                .finalize();
            mgf1::<Sha512>(output, &[pk_seed, inner.as_slice()]);
        } else {
            let inner = Sha256::new()
                .chain_update(pk_seed)
                .chain_update(pk_root)
                .chain_update(message)
                .finalize();
            mgf1::<Sha256>(output, &[pk_seed, inner.as_slice()]);
        }
    }
}
