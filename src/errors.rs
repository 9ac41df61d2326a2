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

//! Errors which may occur when parsing keys and/or signatures to or from
//! wire formats, or while driving an aggregate signing session.

use failure::Fail;

/// Represents an error in key handling, aggregate signing, or verification.
#[derive(Fail, Clone, Debug, Eq, PartialEq)]
pub enum AggSigError {
    /// This error occurs when bytes are not a valid compressed secp256k1 point
    #[fail(display = "Point decoding failed")]
    InvalidPoint,

    /// Invalid scalar provided.
    #[fail(display = "Cannot use a scalar at or above the group order")]
    ScalarFormatError,

    /// This error occurs when a function is called with bad arguments.
    #[fail(display = "Function is called with bad arguments")]
    BadArguments,

    /// An operation was attempted out of order, e.g. signing before every
    /// cosigner's nonce is known, or signing twice with the same slot.
    #[fail(display = "An attempt was made to perform an invalid signing state transition")]
    InvalidStateTransition,

    /// The number of partial signatures must match the number of public keys
    #[fail(display = "The number of partial signatures must match the number of public keys")]
    MismatchedSignatures,

    /// The verification equation wasn't satisfied
    #[fail(display = "Verification equation was not satisfied")]
    VerifyError,

    /// Invalid ser provided.
    #[fail(display = "Issue when serializing data")]
    SerError,

    /// A byte slice had the wrong length for the type it should decode to.
    #[fail(display = "{} must be exactly {} bytes: {}", name, length, description)]
    BytesLengthError {
        /// Name of the type being decoded
        name: &'static str,
        /// Describes the expected wire format
        description: &'static str,
        /// Expected length in bytes
        length: usize,
    },
}

/// Helper to surface decoding failures through serde.
pub(crate) fn serde_error_from_aggsig_error<E>(err: AggSigError) -> E
where
    E: ::serde::de::Error,
{
    E::custom(format!("{}", err))
}
