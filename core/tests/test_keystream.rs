#[cfg(test)]
mod keystream_tests {
    use otp_core::{
        constants::sample_params,
        keystream::{KeystreamError, KeystreamParams, Lcg, fill_keystream, generate_keystream, generate_on_thread},
    };
    use proptest::prelude::*;

    fn sample() -> KeystreamParams {
        KeystreamParams {
            seed: sample_params::SEED,
            multiplier: sample_params::MULTIPLIER,
            increment: sample_params::INCREMENT,
            modulus: sample_params::MODULUS,
        }
    }

    #[test]
    fn sample_params_golden_bytes() {
        // x1 = (84589 * 4212 + 45989) mod 217728 = 131849 -> 0x09
        let ks = generate_keystream(&sample(), 8).unwrap();
        assert_eq!(hex::encode(&ks), "097a17705556c32c");
    }

    #[test]
    fn states_thread_full_64_bit_value() {
        let states: Vec<u64> = Lcg::new(sample()).unwrap().take(5).collect();
        assert_eq!(states, vec![131849, 121978, 130839, 36464, 164437]);

        let bytes: Vec<u8> = Lcg::new(sample()).unwrap().bytes().take(5).collect();
        assert_eq!(bytes, generate_keystream(&sample(), 5).unwrap());
    }

    #[test]
    fn multiply_add_wraps_at_64_bits() {
        let p = KeystreamParams {
            seed: (1u64 << 63) + 5,
            multiplier: 6364136223846793005,
            increment: 1442695040888963407,
            modulus: u64::MAX - 58,
        };
        let ks = generate_keystream(&p, 4).unwrap();
        assert_eq!(ks, vec![48, 191, 226, 9]);
    }

    #[test]
    fn modulus_one_yields_zero_bytes() {
        let p = KeystreamParams { modulus: 1, ..sample() };
        assert_eq!(generate_keystream(&p, 16).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn zero_modulus_rejected() {
        let p = KeystreamParams { modulus: 0, ..sample() };
        assert_eq!(generate_keystream(&p, 4).unwrap_err(), KeystreamError::ZeroModulus);
        assert_eq!(KeystreamParams::new(1, 2, 3, 0).unwrap_err(), KeystreamError::ZeroModulus);
        let mut buf = [0u8; 4];
        assert_eq!(generate_on_thread(&p, &mut buf).unwrap_err(), KeystreamError::ZeroModulus);
    }

    #[test]
    fn empty_destination_rejected() {
        assert_eq!(generate_keystream(&sample(), 0).unwrap_err(), KeystreamError::EmptyDestination);
        let mut empty: [u8; 0] = [];
        assert_eq!(fill_keystream(&sample(), &mut empty).unwrap_err(), KeystreamError::EmptyDestination);
        assert_eq!(generate_on_thread(&sample(), &mut empty).unwrap_err(), KeystreamError::EmptyDestination);
    }

    proptest! {
        #[test]
        fn generation_is_deterministic(
            seed in any::<u64>(),
            multiplier in any::<u64>(),
            increment in any::<u64>(),
            modulus in 1u64..,
            len in 1usize..2048,
        ) {
            let p = KeystreamParams { seed, multiplier, increment, modulus };
            let a = generate_keystream(&p, len).unwrap();
            let mut b = vec![0u8; len];
            generate_on_thread(&p, &mut b).unwrap();
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), len);
        }

        #[test]
        fn shorter_keystream_is_a_prefix(len in 1usize..1024, extra in 0usize..256) {
            let short = generate_keystream(&sample(), len).unwrap();
            let long = generate_keystream(&sample(), len + extra).unwrap();
            prop_assert_eq!(&long[..len], &short[..]);
        }
    }
}
