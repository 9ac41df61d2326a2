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

//! Deterministic nonce stream
//!
//! An RFC 6979 style HMAC-SHA256 generator, seeded once per signing
//! session.  Every secret nonce a session hands out is drawn from here, so
//! the same seed and call order reproduce the same signature bit for bit.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

fn hmac(key: &[u8; 32], parts: &[&[u8]]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().into()
}

/// RFC 6979 HMAC-SHA256 deterministic byte generator.
pub(crate) struct Rfc6979Rng {
    v: [u8; 32],
    k: [u8; 32],
    retry: bool,
}

impl Rfc6979Rng {
    /// Initializes the V/K state from a 32-byte seed.
    pub fn new(seed: &[u8; 32]) -> Rfc6979Rng {
        let v = [0x01u8; 32];
        let k = [0x00u8; 32];

        let k = hmac(&k, &[&v, &[0x00], seed]);
        let v = hmac(&k, &[&v]);
        let k = hmac(&k, &[&v, &[0x01], seed]);
        let v = hmac(&k, &[&v]);

        Rfc6979Rng { v, k, retry: false }
    }

    /// Fills `out` with the next 32 bytes of the stream.
    pub fn generate_into(&mut self, out: &mut [u8; 32]) {
        if self.retry {
            self.k = hmac(&self.k, &[&self.v, &[0x00]]);
            self.v = hmac(&self.k, &[&self.v]);
        }
        self.v = hmac(&self.k, &[&self.v]);
        out.copy_from_slice(&self.v);
        self.retry = true;
    }
}

impl Drop for Rfc6979Rng {
    fn drop(&mut self) {
        self.v.zeroize();
        self.k.zeroize();
        self.retry = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let seed = [0xA5u8; 32];
        let mut a = Rfc6979Rng::new(&seed);
        let mut b = Rfc6979Rng::new(&seed);

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        for _ in 0..4 {
            a.generate_into(&mut out_a);
            b.generate_into(&mut out_b);
            assert_eq!(out_a, out_b);
        }
    }

    #[test]
    fn stream_advances() {
        let mut rng = Rfc6979Rng::new(&[0u8; 32]);

        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        rng.generate_into(&mut first);
        rng.generate_into(&mut second);

        assert_ne!(first, second);
    }

    #[test]
    fn seeds_separate_streams() {
        let mut a = Rfc6979Rng::new(&[1u8; 32]);
        let mut b = Rfc6979Rng::new(&[2u8; 32]);

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.generate_into(&mut out_a);
        b.generate_into(&mut out_b);

        assert_ne!(out_a, out_b);
    }
}
