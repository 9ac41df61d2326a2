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

//! Schnorr Public Key generation,

use crate::errors::AggSigError;
use crate::keys::SecretKey;
use core::fmt::Debug;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint, Scalar};
use zeroize::Zeroize;

/// The length of a secp256k1 Schnorr `PublicKey`, in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 33;

/// A Schnorr public key.
///
/// Retains both the affine point and its compressed SEC1 encoding, which
/// keeps the challenge prehash over a whole cosigner list free of repeat
/// compressions.
#[derive(Copy, Clone)]
pub struct PublicKey {
    point: AffinePoint,
    compressed: [u8; PUBLIC_KEY_LENGTH],
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PublicKey( {:?} )", &self.compressed[..])
    }
}

impl Zeroize for PublicKey {
    fn zeroize(&mut self) {
        self.point = AffinePoint::IDENTITY;
        self.compressed = [0u8; PUBLIC_KEY_LENGTH];
    }
}

impl PublicKey {
    const DESCRIPTION: &'static str = "A secp256k1 point in 33-byte compressed SEC1 form";

    /// Access the point form
    pub fn as_point(&self) -> &AffinePoint {
        &self.point
    }

    /// Extract the point form
    pub fn into_point(self) -> AffinePoint {
        self.point
    }

    /// The point lifted back into projective coordinates, for accumulation.
    pub(crate) fn to_projective(&self) -> ProjectivePoint {
        ProjectivePoint::from(self.point)
    }

    /// Wrap an affine point into the `PublicKey` format that also retains
    /// the compressed form.  The point at infinity has no SEC1 compressed
    /// encoding and is rejected.
    pub fn from_point(point: AffinePoint) -> Result<PublicKey, AggSigError> {
        let encoded = point.to_encoded_point(true);
        if encoded.len() != PUBLIC_KEY_LENGTH {
            return Err(AggSigError::InvalidPoint);
        }
        let mut compressed = [0u8; PUBLIC_KEY_LENGTH];
        compressed.copy_from_slice(encoded.as_bytes());
        Ok(PublicKey { point, compressed })
    }

    /// Convert this public key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.compressed
    }

    /// View this public key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.compressed
    }

    /// Construct a `PublicKey` from a slice of bytes.
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is a `PublicKey`, or an `AggSigError`
    /// if the slice is not a 33-byte compressed encoding of a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<PublicKey, AggSigError> {
        if bytes.len() != PUBLIC_KEY_LENGTH {
            return Err(AggSigError::BytesLengthError {
                name: "PublicKey",
                description: PublicKey::DESCRIPTION,
                length: PUBLIC_KEY_LENGTH,
            });
        }

        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| AggSigError::InvalidPoint)?;
        let point = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(AggSigError::InvalidPoint)?;

        let mut compressed = [0u8; PUBLIC_KEY_LENGTH];
        compressed.copy_from_slice(bytes);
        Ok(PublicKey { point, compressed })
    }

    /// Derive the `PublicKey` corresponding to this `SecretKey`.
    pub fn from_secret(secret_key: &SecretKey) -> PublicKey {
        Self::from_secret_scalar(secret_key.as_scalar())
    }

    /// Helper Function to convert a scalar into a PubKey
    pub(crate) fn from_secret_scalar(privkey: &Scalar) -> PublicKey {
        let point = (ProjectivePoint::GENERATOR * privkey).to_affine();
        PublicKey::from_point(point).expect("secret keys are nonzero, the point cannot be infinity")
    }
}

impl From<SecretKey> for PublicKey {
    fn from(source: SecretKey) -> PublicKey {
        PublicKey::from_secret(&source)
    }
}

// Expanded point comparison is an equal time comparison; the compressed
// bytes are redundant with the point.

impl PartialEq for PublicKey {
    fn eq(&self, other: &PublicKey) -> bool {
        self.point == other.point
    }
}

impl Eq for PublicKey {}

serde_boilerplate!(PublicKey);

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    #[test]
    fn bytes_round_trip() {
        let mut csprng = ChaChaRng::from_seed([5u8; 32]);
        let public = PublicKey::from_secret(&SecretKey::generate(&mut csprng));

        let recovered = PublicKey::from_bytes(&public.to_bytes()).unwrap();
        assert_eq!(public, recovered);
        assert_eq!(public.as_bytes(), recovered.as_bytes());
    }

    #[test]
    fn compressed_form_is_sec1() {
        let mut csprng = ChaChaRng::from_seed([6u8; 32]);
        let public = PublicKey::from_secret(&SecretKey::generate(&mut csprng));

        let tag = public.as_bytes()[0];
        assert!(tag == 0x02 || tag == 0x03);
    }

    #[test]
    fn rejects_invalid_encodings() {
        assert!(PublicKey::from_bytes(&[0u8; 32]).is_err());
        assert!(PublicKey::from_bytes(&[0xffu8; 33]).is_err());

        // Valid tag, x not on the curve.
        let mut bytes = [0u8; 33];
        bytes[0] = 0x02;
        bytes[32] = 5;
        assert_eq!(
            PublicKey::from_bytes(&bytes),
            Err(AggSigError::InvalidPoint)
        );
    }

    #[test]
    fn infinity_has_no_compressed_form() {
        assert_eq!(
            PublicKey::from_point(AffinePoint::IDENTITY),
            Err(AggSigError::InvalidPoint)
        );
    }
}
