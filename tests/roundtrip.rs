use hypersig::{
    Error, Params, PublicKey, SecretKey, Sha2Hasher, ShakeHasher, Signature, SphincsPlus,
    TweakableHash, VerificationError,
};
use rand::prelude::*;
use rand::rngs::OsRng;

/// Two layers of height 3, small FORS: every signature exercises the full hypertree path
/// while keeping the tests fast.
fn small_params() -> Params {
    Params::new(16, 16, 3, 2, 4, 6).unwrap()
}

fn random_message(len: usize) -> Vec<u8> {
    let mut message = vec![0_u8; len];
    OsRng.fill_bytes(&mut message);
    message
}

fn roundtrip<H: TweakableHash>() {
    let params = small_params();
    let sp: SphincsPlus<H> = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();

    for len in [0, 1, 33, 1000] {
        let message = random_message(len);
        let signature = sp.sign(&message, &sk).unwrap();
        assert_eq!(signature.len(), params.sig_bytes());
        assert_eq!(sp.verify(&signature, &message, &pk), Ok(()));
    }
}

#[test]
fn test_roundtrip_sha2() {
    roundtrip::<Sha2Hasher>();
}

#[test]
fn test_roundtrip_shake() {
    roundtrip::<ShakeHasher>();
}

#[test]
fn test_roundtrip_larger_n_and_w() {
    // n = 24 switches the SHA-2 backend to SHA-512 for H and T; w = 256 is one digit per byte.
    let params = Params::new(24, 256, 2, 2, 5, 4).unwrap();
    let sp: SphincsPlus = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();
    let message = random_message(64);
    let signature = sp.sign(&message, &sk).unwrap();
    assert!(sp.verify(&signature, &message, &pk).is_ok());

    let params = Params::new(16, 4, 2, 3, 3, 9).unwrap();
    let sp: SphincsPlus<ShakeHasher> = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();
    let signature = sp.sign(&message, &sk).unwrap();
    assert!(sp.verify(&signature, &message, &pk).is_ok());
}

#[test]
fn test_tamper_sensitivity() {
    let params = small_params();
    let n = params.n();
    let sp: SphincsPlus = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();
    let message = random_message(48);
    let signature = sp.sign(&message, &sk).unwrap();

    let rejected = |sig: &Signature, msg: &[u8], pk: &PublicKey| {
        matches!(
            sp.verify(sig, msg, pk),
            Err(Error::VerificationFailed(VerificationError::RootMismatch))
        )
    };

    // Any single bit of the message.
    let mut rng = OsRng;
    for _ in 0..8 {
        let mut tampered = message.clone();
        let bit = rng.gen_range(0..tampered.len() * 8);
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(rejected(&signature, &tampered, &pk));
    }

    // One bit in every n-byte digest of the signature.
    let bytes = signature.as_ref();
    for chunk in 0..bytes.len() / n {
        let mut tampered = bytes.to_vec();
        tampered[chunk * n + rng.gen_range(0..n)] ^= 1 << rng.gen_range(0..8);
        assert!(
            rejected(&Signature::from(tampered), &message, &pk),
            "flip in digest {chunk} accepted"
        );
    }

    // The public root.
    let mut pk_bytes = pk.as_ref().to_vec();
    pk_bytes[n] ^= 1;
    assert!(rejected(&signature, &message, &PublicKey::from(pk_bytes)));

    // Another key pair.
    let (other_pk, _) = sp.keygen().unwrap();
    assert!(sp.verify(&signature, &message, &other_pk).is_err());
}

#[test]
fn test_determinism() {
    let params = small_params();
    let n = params.n();
    let sp: SphincsPlus<ShakeHasher> = SphincsPlus::new(params);
    let sk_seed = random_message(n);
    let sk_prf = random_message(n);
    let pk_seed = random_message(n);

    let (pk1, sk1) = sp.keygen_from_seeds(&sk_seed, &sk_prf, &pk_seed).unwrap();
    let (pk2, sk2) = sp.keygen_from_seeds(&sk_seed, &sk_prf, &pk_seed).unwrap();
    assert_eq!(pk1, pk2);
    assert_eq!(sk1, sk2);
    assert_eq!(sk1.sk_seed(), sk_seed.as_slice());
    assert_eq!(sk1.sk_prf(), sk_prf.as_slice());
    assert_eq!(sk1.pk_seed(), pk1.seed());
    assert_eq!(sk1.pk_root(), pk1.root());

    let message = b"deterministic";
    assert_eq!(sp.sign(message, &sk1).unwrap(), sp.sign(message, &sk2).unwrap());
    assert_ne!(sp.sign(message, &sk1).unwrap(), sp.sign(b"other", &sk1).unwrap());

    // The backends are distinct hash families.
    let sha2: SphincsPlus<Sha2Hasher> = SphincsPlus::new(params);
    let (pk_sha2, _) = sha2.keygen_from_seeds(&sk_seed, &sk_prf, &pk_seed).unwrap();
    assert_ne!(pk_sha2, pk1);
}

#[test]
fn test_malformed_input() {
    let params = small_params();
    let sp: SphincsPlus = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();
    let message = b"malformed";
    let signature = sp.sign(message, &sk).unwrap();

    let short = Signature::from(&signature.as_ref()[..signature.len() - 1]);
    assert_eq!(
        sp.verify(&short, message, &pk),
        Err(Error::MalformedSignature {
            expected: params.sig_bytes(),
            found: params.sig_bytes() - 1,
        })
    );

    let mut long = signature.as_ref().to_vec();
    long.push(0);
    assert!(matches!(
        sp.verify(&Signature::from(long), message, &pk),
        Err(Error::MalformedSignature { .. })
    ));
    assert!(matches!(
        sp.verify(&Signature::from(Vec::new()), message, &pk),
        Err(Error::MalformedSignature { .. })
    ));

    assert_eq!(
        sp.verify(&signature, message, &PublicKey::from(&pk.as_ref()[1..])),
        Err(Error::BadLength(params.pk_bytes(), params.pk_bytes() - 1))
    );

    // Keys of another parameter set.
    let other: SphincsPlus = SphincsPlus::new(Params::new(24, 16, 3, 2, 4, 6).unwrap());
    let (other_pk, other_sk) = other.keygen().unwrap();
    assert!(matches!(sp.sign(message, &other_sk), Err(Error::BadLength(64, 96))));
    assert!(matches!(
        sp.verify(&signature, message, &other_pk),
        Err(Error::BadLength(32, 48))
    ));

    assert!(matches!(
        SecretKey::from_bytes(&params, &[0_u8; 63]),
        Err(Error::BadLength(64, 63))
    ));
    assert!(matches!(
        Signature::from_bytes(&params, &[0_u8; 10]),
        Err(Error::MalformedSignature { .. })
    ));
    let sk_again = SecretKey::from_bytes(&params, sk.as_ref()).unwrap();
    assert_eq!(sp.sign(message, &sk_again).unwrap(), signature);
    assert_eq!(sk_again.public_key(), pk);
}

#[cfg(feature = "serialization")]
#[test]
fn test_serde() {
    let params: Params = serde_json::from_str(r#"{"n":16,"w":16,"hp":3,"d":2,"a":4,"k":6}"#).unwrap();
    assert_eq!(params, small_params());
    assert!(serde_json::from_str::<Params>(r#"{"n":16,"w":16,"hp":3,"d":0,"a":4,"k":6}"#).is_err());

    let sp: SphincsPlus = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen().unwrap();
    let signature = sp.sign(b"serde", &sk).unwrap();

    let pk: PublicKey = serde_json::from_str(&serde_json::to_string(&pk).unwrap()).unwrap();
    let sk: SecretKey = serde_json::from_str(&serde_json::to_string(&sk).unwrap()).unwrap();
    let signature: Signature =
        serde_json::from_str(&serde_json::to_string(&signature).unwrap()).unwrap();

    assert!(sp.verify(&signature, b"serde", &pk).is_ok());
    assert_eq!(sp.sign(b"serde", &sk).unwrap(), signature);
}
