use otp_engine::{verify_otp, Algorithm, Otp, OtpParameters, Secret};

const SEED_SHA1: &str = "12345678901234567890";
const SEED_SHA256: &str = "12345678901234567890123456789012";
const SEED_SHA512: &str =
    "1234567890123456789012345678901234567890123456789012345678901234";

fn totp(algorithm: Algorithm, seed: &str) -> Otp {
    let params = OtpParameters::new(algorithm, 8, 30, 1).unwrap();
    Otp::new(params, &Secret::Text(seed.to_string())).unwrap()
}

// rfc-6238 Appendix B
const RFC6238: [(i64, &str, &str, &str); 6] = [
    (59, "94287082", "46119246", "90693936"),
    (1111111109, "07081804", "68084774", "25091201"),
    (1111111111, "14050471", "67062674", "99943326"),
    (1234567890, "89005924", "91819424", "93441116"),
    (2000000000, "69279037", "90698825", "38618901"),
    (20000000000, "65353130", "77737706", "47863826"),
];

#[test]
fn rfc6238_sha1() {
    let otp = totp(Algorithm::SHA1, SEED_SHA1);
    for (time, expected, _, _) in RFC6238 {
        assert_eq!(otp.generate(time), expected, "time {}", time);
    }
}

#[test]
fn rfc6238_sha256() {
    let otp = totp(Algorithm::SHA256, SEED_SHA256);
    for (time, _, expected, _) in RFC6238 {
        assert_eq!(otp.generate(time), expected, "time {}", time);
    }
}

#[test]
fn rfc6238_sha512() {
    let otp = totp(Algorithm::SHA512, SEED_SHA512);
    for (time, _, _, expected) in RFC6238 {
        assert_eq!(otp.generate(time), expected, "time {}", time);
    }
}

#[test]
fn rfc6238_leading_zero_verifies() {
    let params = OtpParameters::new(Algorithm::SHA1, 8, 30, 1).unwrap();
    let secret = Secret::Text(SEED_SHA1.to_string());
    assert!(verify_otp(&secret, "07081804", &params, Some(1111111109)).unwrap());
    assert!(!verify_otp(&secret, "7081804", &params, Some(1111111109)).unwrap());
}

#[test]
fn rfc4226_hotp() {
    // rfc-4226 Appendix D
    let expected = [
        "755224", "287082", "359152", "969429", "338314", "254676", "287922", "162583", "399871",
        "520489",
    ];
    let hotp = Otp::new(
        OtpParameters::default(),
        &Secret::Hex("3132333435363738393031323334353637383930".to_string()),
    )
    .unwrap();
    for (counter, code) in expected.iter().enumerate() {
        assert_eq!(&hotp.hotp(counter as i64), code, "counter {}", counter);
        assert!(hotp.check_counter(code, counter as i64));
    }
}
