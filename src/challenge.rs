// Copyright 2019 Stichting Organism
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Challenge derivation
//!
//! Two stages of SHA-256.  The prehash commits every cosigner to the same
//! view: the full ordered key list, the aggregate nonce, and the message.
//! The second, cheap stage folds in a signer's index so that no partial
//! signature can be replayed at a different position in the list.

use crate::errors::AggSigError;
use crate::keys::PublicKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{AffinePoint, FieldBytes, Scalar};
use sha2::{Digest, Sha256};

/// Computes the hash of all the data that every cosigner needs to sign.
///
/// `nonce` must already carry the square-Y convention; its compressed
/// encoding is hashed as-is.
pub(crate) fn compute_prehash(
    pubkeys: &[PublicKey],
    nonce: &AffinePoint,
    msg: &[u8; 32],
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for pubkey in pubkeys {
        hasher.update(pubkey.as_bytes());
    }
    hasher.update(nonce.to_encoded_point(true).as_bytes());
    hasher.update(msg);
    hasher.finalize().into()
}

/// Adds the index to the prehash to customize it for each cosigner.
///
/// The index is fed in as a little-endian base-128 sequence, which is
/// empty for index zero.  Fails in the cryptographically negligible case
/// that the digest lands at or above the group order.
pub(crate) fn compute_challenge(prehash: &[u8; 32], index: usize) -> Result<Scalar, AggSigError> {
    let mut hasher = Sha256::new();
    let mut index = index;
    while index > 0 {
        hasher.update([(index & 0x7f) as u8]);
        index >>= 7;
    }
    hasher.update(prehash);
    let digest = hasher.finalize();

    Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&digest)))
        .ok_or(AggSigError::ScalarFormatError)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::keys::{Keypair, SecretKey};
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    fn sample_inputs() -> (Vec<PublicKey>, AffinePoint, [u8; 32]) {
        let mut csprng = ChaChaRng::from_seed([11u8; 32]);
        let pubkeys: Vec<PublicKey> = (0..3)
            .map(|_| Keypair::generate(&mut csprng).public)
            .collect();
        let nonce = PublicKey::from_secret(&SecretKey::generate(&mut csprng)).into_point();
        (pubkeys, nonce, [0xE1u8; 32])
    }

    #[test]
    fn prehash_is_deterministic_and_binds_inputs() {
        let (pubkeys, nonce, msg) = sample_inputs();

        let base = compute_prehash(&pubkeys, &nonce, &msg);
        assert_eq!(base, compute_prehash(&pubkeys, &nonce, &msg));

        let mut other_msg = msg;
        other_msg[0] ^= 1;
        assert_ne!(base, compute_prehash(&pubkeys, &nonce, &other_msg));

        let mut reordered = pubkeys.clone();
        reordered.swap(0, 1);
        assert_ne!(base, compute_prehash(&reordered, &nonce, &msg));

        assert_ne!(base, compute_prehash(&pubkeys[..2].to_vec(), &nonce, &msg));
    }

    #[test]
    fn index_zero_hashes_prehash_alone() {
        let prehash = [0x5Au8; 32];

        let digest = Sha256::digest(prehash);
        let expected =
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&digest)))
                .unwrap();

        assert_eq!(compute_challenge(&prehash, 0).unwrap(), expected);
    }

    #[test]
    fn index_encoding_matches_manual_base128() {
        let prehash = [0x33u8; 32];

        let cases: [(usize, &[u8]); 6] = [
            (1, &[0x01]),
            (127, &[0x7f]),
            (128, &[0x00, 0x01]),
            (129, &[0x01, 0x01]),
            (255, &[0x7f, 0x01]),
            (16384, &[0x00, 0x00, 0x01]),
        ];

        for (index, encoding) in cases {
            let mut hasher = Sha256::new();
            hasher.update(encoding);
            hasher.update(prehash);
            let expected = Option::<Scalar>::from(Scalar::from_repr(
                FieldBytes::clone_from_slice(&hasher.finalize()),
            ))
            .unwrap();

            assert_eq!(compute_challenge(&prehash, index).unwrap(), expected);
        }
    }

    #[test]
    fn distinct_indices_distinct_challenges() {
        let prehash = [0x77u8; 32];

        let mut seen = Vec::new();
        for index in 0..130 {
            let challenge = compute_challenge(&prehash, index).unwrap();
            assert!(!seen.contains(&challenge));
            seen.push(challenge);
        }
    }
}
