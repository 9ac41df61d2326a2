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

//! Schnorr Secret Key generation

use crate::errors::AggSigError;
use core::fmt::Debug;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar};
use rand::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

/// The length of a secp256k1 Schnorr `SecretKey`, in bytes.
pub const SECRET_KEY_LENGTH: usize = 32;

/// A Schnorr secret key: a nonzero scalar below the group order.
#[derive(Default, Clone)]
pub struct SecretKey(pub(crate) Scalar);

impl Debug for SecretKey {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "SecretKey: {:?}", &self.0)
    }
}

impl Eq for SecretKey {}
impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for SecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl Zeroize for SecretKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Overwrite secret key material with null bytes when it goes out of scope.
impl Drop for SecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl SecretKey {
    const DESCRIPTION: &'static str = "A secp256k1 scalar as 32 bytes";

    /// Convert this secret key to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.0.to_bytes().into()
    }

    /// Construct a `SecretKey` from a slice of bytes.
    ///
    /// # Returns
    ///
    /// A `Result` whose okay value is a `SecretKey`, or an `AggSigError`
    /// if the slice has the wrong length or does not encode a canonical
    /// nonzero scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey, AggSigError> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(AggSigError::BytesLengthError {
                name: "SecretKey",
                description: SecretKey::DESCRIPTION,
                length: SECRET_KEY_LENGTH,
            });
        }

        let scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
            .ok_or(AggSigError::ScalarFormatError)?;
        if bool::from(scalar.ct_eq(&Scalar::ZERO)) {
            return Err(AggSigError::ScalarFormatError);
        }

        Ok(SecretKey(scalar))
    }

    /// Generate a `SecretKey` from a `csprng`.
    ///
    /// # Input
    ///
    /// A CSPRNG with a `fill_bytes()` method, e.g. `rand::rngs::OsRng`
    pub fn generate<T>(csprng: &mut T) -> SecretKey
    where
        T: CryptoRng + RngCore,
    {
        SecretKey(*NonZeroScalar::random(csprng))
    }

    /// Helper Method to Convert key to scalar
    pub fn to_scalar(&self) -> Scalar {
        self.0
    }

    /// View this key as a scalar.
    #[inline]
    pub fn as_scalar(&self) -> &Scalar {
        &self.0
    }
}

serde_boilerplate!(SecretKey);

#[cfg(test)]
mod test {
    use super::*;
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    #[test]
    fn bytes_round_trip() {
        let mut csprng = ChaChaRng::from_seed([4u8; 32]);
        let secret = SecretKey::generate(&mut csprng);

        let recovered = SecretKey::from_bytes(&secret.to_bytes()).unwrap();
        assert_eq!(secret, recovered);
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            SecretKey::from_bytes(&[0u8; 31]),
            Err(AggSigError::BytesLengthError {
                name: "SecretKey",
                description: SecretKey::DESCRIPTION,
                length: SECRET_KEY_LENGTH,
            })
        );
    }

    #[test]
    fn rejects_overflow_and_zero() {
        assert_eq!(
            SecretKey::from_bytes(&[0xffu8; 32]),
            Err(AggSigError::ScalarFormatError)
        );
        assert_eq!(
            SecretKey::from_bytes(&[0u8; 32]),
            Err(AggSigError::ScalarFormatError)
        );
    }
}
