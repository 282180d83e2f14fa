use crate::adrs::Adrs;
use crate::hash::TweakableHash;
use crate::params::Params;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// SHAKE256 tweakable hashes. Every role hashes the public seed, the full 32-byte
/// address and the input, and reads `n` bytes.
#[derive(Clone, Debug)]
pub struct ShakeHasher {
    n: usize,
    pub_seed: Vec<u8>,
}

impl ShakeHasher {
    pub(crate) fn shake256(output: &mut [u8], input: &[&[u8]]) {
        let mut hasher = Shake256::default();
        for part in input {
            hasher.update(part);
        }
        let mut reader = hasher.finalize_xof();
        reader.read(output);
    }

    fn thash(&self, output: &mut [u8], blocks: &[&[u8]], adrs: &Adrs) {
        let mut hasher = Shake256::default();
        hasher.update(&self.pub_seed);
        hasher.update(adrs.as_ref());
        for block in blocks {
            hasher.update(block);
        }
        let mut reader = hasher.finalize_xof();
        reader.read(output[..self.n].as_mut());
    }
}

impl TweakableHash for ShakeHasher {
    fn new(params: &Params, pub_seed: &[u8]) -> Self {
        let n = params.n();
        Self {
            n,
            pub_seed: pub_seed[..n].to_vec(),
        }
    }

    fn n(&self) -> usize {
        self.n
    }

    fn pub_seed(&self) -> &[u8] {
        &self.pub_seed
    }

    /// PRF(PK.seed, SK.seed, ADRS) = SHAKE256(PK.seed || ADRS || SK.seed, 8n)
    fn spx_prf(&self, output: &mut [u8], sk_seed: &[u8], adrs: &Adrs) {
        self.thash(output, &[&sk_seed[..self.n]], adrs);
    }

    /// F(PK.seed, ADRS, M1) = SHAKE256(PK.seed || ADRS || M1, 8n)
    fn spx_f(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        self.thash(output, &[&input[..self.n]], adrs);
    }

    fn spx_f_inplace(&self, inout: &mut [u8], adrs: &Adrs) {
        let mut hasher = Shake256::default();
        hasher.update(&self.pub_seed);
        hasher.update(adrs.as_ref());
        hasher.update(&inout[..self.n]);
        let mut reader = hasher.finalize_xof();
        reader.read(inout[..self.n].as_mut());
    }

    /// H(PK.seed, ADRS, M1 || M2) = SHAKE256(PK.seed || ADRS || M1 || M2, 8n)
    fn spx_h(&self, output: &mut [u8], left: &[u8], right: &[u8], adrs: &Adrs) {
        self.thash(output, &[&left[..self.n], &right[..self.n]], adrs);
    }

    /// T_l(PK.seed, ADRS, M) = SHAKE256(PK.seed || ADRS || M, 8n)
    fn spx_t_l(&self, output: &mut [u8], input: &[u8], adrs: &Adrs) {
        self.thash(output, &[input], adrs);
    }

    /// H_msg(PK.seed, PK.root, M) = SHAKE256(PK.seed || PK.root || M, 8m)
    fn h_msg(&self, output: &mut [u8], pk_root: &[u8], message: &[u8]) {
        Self::shake256(output, &[&self.pub_seed, pk_root, message]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::tests::check_domain_separation;
    use crate::params::{SPX_128F, SPX_192S};

    #[test]
    fn test_shake_domain_separation() {
        check_domain_separation::<ShakeHasher>(&SPX_128F);
        check_domain_separation::<ShakeHasher>(&SPX_192S);
    }

    #[test]
    fn test_shake_h_msg_is_a_prefix_stream() {
        let hasher = ShakeHasher::new(&SPX_128F, &[5_u8; 16]);
        let mut short = [0_u8; 10];
        let mut long = [0_u8; 40];
        hasher.h_msg(&mut short, &[6_u8; 16], b"msg");
        hasher.h_msg(&mut long, &[6_u8; 16], b"msg");
        assert_eq!(short, long[..10]);
    }
}
