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

//! Aggregate signing session
//!
//! One `Session` drives a single n-of-n signing attempt over a fixed,
//! ordered list of cosigner keys.  The protocol is strictly phased: every
//! slot contributes a nonce, then every slot signs, then the partials are
//! collapsed into one 64-byte signature.  The per-slot progress markers
//! make signing before the nonce barrier, or signing twice with the same
//! slot, an error rather than a nonce-reuse disaster.

use crate::challenge::{compute_challenge, compute_prehash};
use crate::errors::AggSigError;
use crate::keys::PublicKey;
use crate::rng::Rfc6979Rng;
use crate::signature::{PartialSignature, Signature};
use crate::tools;
use k256::elliptic_curve::point::AffineCoordinates;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, ProjectivePoint, Scalar};
use zeroize::Zeroize;

/// Progress of a single signing slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NonceProgress {
    /// Nonce has not been generated by us or received from another party.
    Unknown,
    /// Public nonce has been received from another party.  Reserved for
    /// externally supplied nonces; nothing in this crate produces it.
    Other,
    /// Public nonce has been generated by us but not used in signing.
    Ours,
    /// Public nonce has been generated by us and used in signing.  An
    /// attempt to use a nonce twice will result in an error.
    Signed,
}

/// A single-use aggregate signing session.
///
/// The session exclusively owns its nonce and progress state; cosigner
/// keys and the seed are copied in at creation.  It is not meant to be
/// shared across threads while signing, and it must be dropped after
/// [`combine_signatures`](Session::combine_signatures) (secret nonces are
/// wiped on drop whether or not the protocol completed).
pub struct Session {
    /// Cosigner keys in protocol order, fixed at creation.
    pubkeys: Vec<PublicKey>,
    /// Per-slot secret nonces, generated lazily.
    secnonce: Vec<Scalar>,
    /// Per-slot progress through the protocol.
    progress: Vec<NonceProgress>,
    /// Running sum of the contributed public nonces.
    pubnonce_sum: ProjectivePoint,
    /// Deterministic nonce stream for this session.
    rng: Rfc6979Rng,
}

impl Session {
    /// Create a session for one signing attempt over `pubkeys`, in order.
    ///
    /// The seed keys the session's deterministic nonce stream: the same
    /// seed, key list, and call order reproduce the same signature.
    pub fn new(pubkeys: &[PublicKey], seed: &[u8; 32]) -> Result<Session, AggSigError> {
        if pubkeys.is_empty() {
            return Err(AggSigError::BadArguments);
        }

        Ok(Session {
            pubkeys: pubkeys.to_vec(),
            secnonce: vec![Scalar::ZERO; pubkeys.len()],
            progress: vec![NonceProgress::Unknown; pubkeys.len()],
            pubnonce_sum: ProjectivePoint::IDENTITY,
            rng: Rfc6979Rng::new(seed),
        })
    }

    /// Number of cosigners in this session.
    pub fn signer_count(&self) -> usize {
        self.pubkeys.len()
    }

    /// Draw the secret nonce for `index` and fold its public half into the
    /// running nonce sum.
    ///
    /// Fails if the slot already holds a nonce.  The public nonce is
    /// negated together with its secret as needed, so the contribution
    /// always carries a square Y.
    pub fn generate_nonce(&mut self, index: usize) -> Result<(), AggSigError> {
        if index >= self.pubkeys.len() {
            return Err(AggSigError::BadArguments);
        }
        if self.progress[index] != NonceProgress::Unknown {
            return Err(AggSigError::InvalidStateTransition);
        }

        let mut data = [0u8; 32];
        // A canonical nonzero draw on the first pass is all but guaranteed;
        // the resample loop still has to exist.
        let mut nonce = loop {
            self.rng.generate_into(&mut data);
            let candidate =
                Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(&data)));
            match candidate {
                Some(scalar) if !bool::from(scalar.is_zero()) => break scalar,
                _ => continue,
            }
        };
        data.zeroize();

        let mut pubnonce = ProjectivePoint::GENERATOR * nonce;
        if !tools::has_quad_y(&pubnonce.to_affine()) {
            nonce = -nonce;
            pubnonce = -pubnonce;
        }

        self.secnonce[index] = nonce;
        nonce.zeroize();
        self.pubnonce_sum += pubnonce;
        self.progress[index] = NonceProgress::Ours;
        Ok(())
    }

    /// Produce slot `index`'s scalar contribution `s_i = e_i * x_i + k_i`.
    ///
    /// Requires every slot's nonce to be known and this slot to hold an
    /// unused nonce of ours; on success the slot is marked signed and can
    /// never sign again.
    pub fn partial_sign(
        &mut self,
        msg: &[u8; 32],
        seckey: &[u8; 32],
        index: usize,
    ) -> Result<PartialSignature, AggSigError> {
        if index >= self.pubkeys.len() {
            return Err(AggSigError::BadArguments);
        }

        // check state machine
        if self
            .progress
            .iter()
            .any(|slot| *slot == NonceProgress::Unknown)
        {
            return Err(AggSigError::InvalidStateTransition);
        }
        if self.progress[index] != NonceProgress::Ours {
            return Err(AggSigError::InvalidStateTransition);
        }

        // If the total public nonce has the wrong sign, negate our secret
        // nonce.  Everyone will negate the public one at combine time.
        let mut nonce_point = self.pubnonce_sum.to_affine();
        if !tools::has_quad_y(&nonce_point) {
            self.secnonce[index] = -self.secnonce[index];
            nonce_point = (-self.pubnonce_sum).to_affine();
        }

        let prehash = compute_prehash(&self.pubkeys, &nonce_point, msg);
        let challenge = compute_challenge(&prehash, index)?;

        let mut sec =
            Option::<Scalar>::from(Scalar::from_repr(FieldBytes::clone_from_slice(seckey)))
                .ok_or(AggSigError::ScalarFormatError)?;

        let mut s = challenge * sec + self.secnonce[index];
        let partial = PartialSignature(s);

        s.zeroize();
        sec.zeroize();
        self.progress[index] = NonceProgress::Signed;
        Ok(partial)
    }

    /// Collapse all cosigners' partials into the final 64-byte signature.
    ///
    /// `partials` must hold exactly one contribution per cosigner.  No
    /// per-partial validity check is made here; a bogus contribution only
    /// surfaces when the aggregate fails to verify.
    pub fn combine_signatures(
        &mut self,
        partials: &[PartialSignature],
    ) -> Result<Signature, AggSigError> {
        if partials.len() != self.pubkeys.len() {
            return Err(AggSigError::MismatchedSignatures);
        }

        let mut s = Scalar::ZERO;
        for partial in partials {
            s += partial.0;
        }

        // If the public nonce needs negating, everyone already negated
        // their secret nonces while signing.
        if !tools::has_quad_y(&self.pubnonce_sum.to_affine()) {
            self.pubnonce_sum = -self.pubnonce_sum;
        }

        let r_x: [u8; 32] = self.pubnonce_sum.to_affine().x().into();
        Ok(Signature { s, r_x })
    }
}

/// Secret nonces must survive between the nonce and signing phases, so the
/// only place they can be erased is teardown.
impl Drop for Session {
    fn drop(&mut self) {
        for nonce in self.secnonce.iter_mut() {
            nonce.zeroize();
        }
        for pubkey in self.pubkeys.iter_mut() {
            pubkey.zeroize();
        }
        for slot in self.progress.iter_mut() {
            *slot = NonceProgress::Unknown;
        }
    }
}
