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

//! A Rust implementation of aggregate Schnorr signing

use crate::challenge::{compute_challenge, compute_prehash};
use crate::errors::AggSigError;
use crate::keys::PublicKey;
use crate::tools::{self, MULTI_BATCH_WIDTH};
use core::fmt::Debug;
use k256::elliptic_curve::{Group, PrimeField};
use k256::{FieldBytes, ProjectivePoint, Scalar};

/// The length of an aggregate Schnorr `Signature`, in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// The length of a cosigner's `PartialSignature`, in bytes.
pub const PARTIAL_SIGNATURE_LENGTH: usize = 32;

/// One cosigner's scalar contribution `s_i = k_i + e_i * x_i`.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct PartialSignature(pub(crate) Scalar);

impl Debug for PartialSignature {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "PartialSignature( {:?} )", &self.0)
    }
}

impl PartialSignature {
    const DESCRIPTION: &'static str = "A 32 byte scalar share of an aggregate signature";

    /// Convert this partial signature to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; PARTIAL_SIGNATURE_LENGTH] {
        self.0.to_bytes().into()
    }

    /// Construct a `PartialSignature` from a slice of bytes.
    ///
    /// Fails if the slice has the wrong length or the scalar is not
    /// canonical.
    pub fn from_bytes(bytes: &[u8]) -> Result<PartialSignature, AggSigError> {
        if bytes.len() != PARTIAL_SIGNATURE_LENGTH {
            return Err(AggSigError::BytesLengthError {
                name: "PartialSignature",
                description: PartialSignature::DESCRIPTION,
                length: PARTIAL_SIGNATURE_LENGTH,
            });
        }

        let scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(bytes)))
            .ok_or(AggSigError::ScalarFormatError)?;
        Ok(PartialSignature(scalar))
    }
}

serde_boilerplate!(PartialSignature);

/// An aggregate Schnorr signature.
///
/// # Note
///
/// The 64 bytes hold the combined scalar `s` followed by the X coordinate
/// of the aggregate nonce.  The nonce's Y coordinate is not transmitted:
/// by convention it is the root that is itself a square, so X alone pins
/// the point.  The size is the same for one cosigner or a thousand.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Signature {
    /// The combined scalar `s = sum_i (k_i + e_i * x_i)`.
    pub(crate) s: Scalar,
    /// X coordinate of the aggregate nonce, square-Y convention applied.
    pub(crate) r_x: [u8; 32],
}

impl Debug for Signature {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "Signature( s: {:?}, R.x: {:?} )", &self.s, &self.r_x)
    }
}

impl Signature {
    const DESCRIPTION: &'static str = "A 64 byte aggregate Schnorr signature";

    /// Convert this `Signature` to a byte array.
    #[inline]
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut signature_bytes: [u8; SIGNATURE_LENGTH] = [0u8; SIGNATURE_LENGTH];

        signature_bytes[..32].copy_from_slice(&self.s.to_bytes());
        signature_bytes[32..].copy_from_slice(&self.r_x);
        signature_bytes
    }

    /// Construct a `Signature` from a slice of bytes.
    ///
    /// The scalar half must be canonical; the nonce X coordinate is taken
    /// as-is and only checked against the curve during verification.
    #[inline]
    pub fn from_bytes(bytes: &[u8]) -> Result<Signature, AggSigError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(AggSigError::BytesLengthError {
                name: "Signature",
                description: Signature::DESCRIPTION,
                length: SIGNATURE_LENGTH,
            });
        }

        let s =
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&bytes[..32])))
                .ok_or(AggSigError::ScalarFormatError)?;

        let mut r_x = [0u8; 32];
        r_x.copy_from_slice(&bytes[32..]);

        Ok(Signature { s, r_x })
    }

    /// Verify this signature over `msg` against the ordered cosigner list.
    ///
    /// Checks `s*G - sum_i e_i*P_i - R == O` with one multi-scalar
    /// multiplication per batch of at most `MULTI_BATCH_WIDTH` terms, so
    /// scratch space stays bounded however many cosigners there are.
    ///
    /// # Return
    ///
    /// `Ok(())` for a valid signature.  Every invalid input, from a
    /// malformed nonce coordinate to a failed equation, comes back as the
    /// same `VerifyError`.
    pub fn verify(&self, msg: &[u8; 32], pubkeys: &[PublicKey]) -> Result<(), AggSigError> {
        if pubkeys.is_empty() {
            return Err(AggSigError::BadArguments);
        }

        // Reconstruct the aggregate nonce from its X coordinate under the
        // square-Y convention.
        let nonce_point = tools::lift_x_quad(&self.r_x).ok_or(AggSigError::VerifyError)?;

        let prehash = compute_prehash(pubkeys, &nonce_point, msg);

        // pk_sum accumulates s*G - sum_i e_i*P_i across the batches; slot
        // zero of the first batch carries (s, G).
        let mut pk_sum = ProjectivePoint::IDENTITY;
        let mut scalars: Vec<Scalar> = Vec::with_capacity(MULTI_BATCH_WIDTH);
        let mut points: Vec<ProjectivePoint> = Vec::with_capacity(MULTI_BATCH_WIDTH);
        scalars.push(self.s);
        points.push(ProjectivePoint::GENERATOR);

        let mut next = 0;
        while next < pubkeys.len() {
            let take = (pubkeys.len() - next).min(MULTI_BATCH_WIDTH - scalars.len());
            for offset in 0..take {
                let challenge = compute_challenge(&prehash, next + offset)
                    .map_err(|_| AggSigError::VerifyError)?;
                scalars.push(-challenge);
                points.push(pubkeys[next + offset].to_projective());
            }

            pk_sum += tools::multi_scalar_mul(&scalars, &points);
            scalars.clear();
            points.clear();
            next += take;
        }

        pk_sum -= ProjectivePoint::from(nonce_point);

        if bool::from(pk_sum.is_identity()) {
            Ok(())
        } else {
            Err(AggSigError::VerifyError)
        }
    }
}

serde_boilerplate!(Signature);
