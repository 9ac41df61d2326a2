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

//! The Extra Sauce
//! secp256k1 point tooling
//!
//! The aggregate nonce is published as a bare X coordinate; the matching Y
//! is fixed by convention to the root that is itself a square in the base
//! field.  Everything that tests or reconstructs that convention lives
//! here, together with the bounded-width multi-scalar multiplication the
//! verifier batches over.

use k256::elliptic_curve::point::DecompressPoint;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::Group;
use k256::{AffinePoint, FieldBytes, FieldElement, ProjectivePoint, Scalar};
use subtle::Choice;

/// Widest multi-scalar multiplication a single verification batch may hold.
pub(crate) const MULTI_BATCH_WIDTH: usize = 32;

/// Returns true if the point's Y coordinate is a square in the base field.
///
/// The point at infinity has no Y and is never square.
pub(crate) fn has_quad_y(point: &AffinePoint) -> bool {
    let encoded = point.to_encoded_point(false);
    match encoded.y() {
        Some(y) => FieldElement::from_bytes(y)
            .and_then(|y| y.sqrt())
            .is_some()
            .into(),
        None => false,
    }
}

/// Reconstructs the unique curve point with square Y for a given X
/// coordinate, or `None` if `x` is not on the curve.
///
/// secp256k1 has p = 3 mod 4, so -1 is a non-square and exactly one of the
/// two candidate roots is itself a square.
pub(crate) fn lift_x_quad(x: &[u8; 32]) -> Option<AffinePoint> {
    let x = FieldBytes::from_slice(x);
    let point = Option::<AffinePoint>::from(AffinePoint::decompress(x, Choice::from(0)))?;
    if has_quad_y(&point) {
        Some(point)
    } else {
        Some((-ProjectivePoint::from(point)).to_affine())
    }
}

/// Computes `sum_i scalars[i] * points[i]` with one shared doubling chain
/// and a 4-bit window table per point.
///
/// Variable time.  Callers must only feed it public data; the verifier
/// qualifies, the signing path never calls this.
pub(crate) fn multi_scalar_mul(scalars: &[Scalar], points: &[ProjectivePoint]) -> ProjectivePoint {
    debug_assert_eq!(scalars.len(), points.len());

    // table[w] = w * P for w in 0..16
    let tables: Vec<[ProjectivePoint; 16]> = points
        .iter()
        .map(|point| {
            let mut table = [ProjectivePoint::IDENTITY; 16];
            for w in 1..16 {
                table[w] = table[w - 1] + point;
            }
            table
        })
        .collect();

    let digits: Vec<FieldBytes> = scalars.iter().map(|s| s.to_bytes()).collect();

    let mut acc = ProjectivePoint::IDENTITY;
    for byte_idx in 0..32 {
        for half in 0..2 {
            for _ in 0..4 {
                acc = acc.double();
            }
            for (table, bytes) in tables.iter().zip(digits.iter()) {
                let window = if half == 0 {
                    (bytes[byte_idx] >> 4) as usize
                } else {
                    (bytes[byte_idx] & 0x0f) as usize
                };
                if window != 0 {
                    acc += table[window];
                }
            }
        }
    }
    acc
}
