use hypersig::params::{SPX_128F, SPX_128S};
use hypersig::{Error, Params, ShakeHasher, SphincsPlus, VerificationError};
use tracing::{info, Level};

fn simple_hypersig() -> Result<(), Error> {
    // Pick a parameter set. The fast variants sign quicker, the small ones give shorter
    // signatures.
    let params = SPX_128F;
    info!(
        pk_bytes = params.pk_bytes(),
        sk_bytes = params.sk_bytes(),
        sig_bytes = params.sig_bytes(),
        "using SPX_128F"
    );

    // The default hash backend is SHA-2.
    let sp: SphincsPlus = SphincsPlus::new(params);
    let (pk, sk) = sp.keygen()?;

    let msg1 = "Hi! This is my first message!".as_bytes();
    let sig1 = sp.sign(msg1, &sk)?;
    assert_eq!(sp.verify(&sig1, msg1, &pk), Ok(()));

    // Signing is deterministic.
    assert_eq!(sp.sign(msg1, &sk)?, sig1);

    // Another message does not verify under the first signature.
    let msg2 = "Hi! This is my second message!".as_bytes();
    assert_eq!(
        sp.verify(&sig1, msg2, &pk),
        Err(Error::VerificationFailed(VerificationError::RootMismatch))
    );

    // A truncated signature is rejected before any hashing.
    let truncated = hypersig::Signature::from(&sig1.as_ref()[1..]);
    assert!(matches!(
        sp.verify(&truncated, msg1, &pk),
        Err(Error::MalformedSignature { .. })
    ));

    // Keys travel as plain bytes and are checked against the parameter set on the way in.
    let pk_bytes = pk.as_ref().to_vec();
    let pk_again = hypersig::PublicKey::from_bytes(&params, &pk_bytes)?;
    assert_eq!(sp.verify(&sig1, msg1, &pk_again), Ok(()));

    // The same scheme over SHAKE256 with small signatures.
    let shake: SphincsPlus<ShakeHasher> = SphincsPlus::new(SPX_128S);
    let (pk, sk) = shake.keygen()?;
    let sig = shake.sign(msg1, &sk)?;
    assert_eq!(shake.verify(&sig, msg1, &pk), Ok(()));
    info!(sig_bytes = sig.len(), "SPX_128S signature verified");

    // A custom parameter set is validated when it is built.
    let custom = Params::new(16, 16, 4, 4, 8, 12)?;
    let sp: SphincsPlus = SphincsPlus::new(custom);
    let (pk, sk) = sp.keygen()?;
    let sig = sp.sign(msg2, &sk)?;
    assert_eq!(sp.verify(&sig, msg2, &pk), Ok(()));
    assert!(Params::new(16, 10, 4, 4, 8, 12).is_err());

    Ok(())
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    match simple_hypersig() {
        Ok(()) => info!("all hypersig steps completed"),
        Err(e) => eprintln!("hypersig demo failed: {e}"),
    }
}
