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

//! Keys to the kingdom

//! Schnorr keys on secp256k1, carried in 33-byte compressed SEC1 form
//! on the wire.

mod public;
pub use public::{PublicKey, PUBLIC_KEY_LENGTH};

mod secret;
pub use secret::{SecretKey, SECRET_KEY_LENGTH};

mod pair;
pub use pair::{Keypair, KEYPAIR_LENGTH};

#[cfg(test)]
mod tests {
    use super::*;
    use k256::elliptic_curve::sec1::ToEncodedPoint;

    #[test]
    fn generator_key() {
        // A secret of one maps to the generator itself.
        let mut bytes = [0u8; SECRET_KEY_LENGTH];
        bytes[31] = 1;
        let sk = SecretKey::from_bytes(&bytes).unwrap();
        let pk = PublicKey::from_secret(&sk);

        let generator = k256::AffinePoint::GENERATOR.to_encoded_point(true);
        assert_eq!(&pk.to_bytes()[..], generator.as_bytes());
    }
}
