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

//
// Aggregate Schnorr signatures via secp256k1
//

//Modeled from
//https://github.com/sipa/bips/blob/bip-schnorr/bip-schnorr.mediawiki

//Useful links:
//https://blockstream.com/2018/01/23/musig-key-aggregation-schnorr-signatures/
//https://eprint.iacr.org/2018/068

//! n cosigners, each holding their own key, jointly produce one 64-byte
//! signature over a 32-byte message digest.  The signature verifies
//! against the ordered list of their public keys and is the same size no
//! matter how many cosigners took part.
//!
//! A [`Session`] walks the group through the protocol: every cosigner
//! slot contributes a nonce, then each slot produces a
//! [`PartialSignature`], and the partials collapse into the final
//! [`Signature`].  Verification is stateless and batches its curve work,
//! staying linear in the number of cosigners.

#[macro_use]
mod ser;

pub mod errors;

mod challenge;
mod rng;
mod tools;

mod keys;
mod session;
mod signature;

// Export everything public in the protocol modules.
pub use crate::errors::*;
pub use crate::keys::*;
pub use crate::session::*;
pub use crate::signature::*;
