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

//! Serde Support

macro_rules! serde_boilerplate { ($t:ty) => {
    impl ::serde::Serialize for $t {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error> where S: ::serde::Serializer {
            serializer.serialize_bytes(&self.to_bytes()[..])
        }
    }

    impl<'d> ::serde::Deserialize<'d> for $t {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error> where D: ::serde::Deserializer<'d> {
            struct MyVisitor;

            impl<'d> ::serde::de::Visitor<'d> for MyVisitor {
                type Value = $t;

                fn expecting(&self, formatter: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    formatter.write_str(Self::Value::DESCRIPTION)
                }

                fn visit_bytes<E>(self, bytes: &[u8]) -> Result<$t, E> where E: ::serde::de::Error {
                    Self::Value::from_bytes(bytes).map_err(crate::errors::serde_error_from_aggsig_error)
                }
            }
            deserializer.deserialize_bytes(MyVisitor)
        }
    }
} } // macro_rules! serde_boilerplate

#[cfg(test)]
mod test {
    use crate::keys::{Keypair, PublicKey, SecretKey};
    use crate::signature::Signature;
    use rand::prelude::*;
    use rand_chacha::ChaChaRng;

    fn keypair() -> Keypair {
        let mut csprng = ChaChaRng::from_seed([7u8; 32]);
        Keypair::generate(&mut csprng)
    }

    #[test]
    fn serialize_deserialize_public_key() {
        let public: PublicKey = keypair().public;

        let encoded = bincode::serialize(&public).unwrap();
        let decoded: PublicKey = bincode::deserialize(&encoded).unwrap();

        assert_eq!(public, decoded);
    }

    #[test]
    fn serialize_deserialize_secret_key() {
        let secret: SecretKey = keypair().secret.clone();

        let encoded = bincode::serialize(&secret).unwrap();
        let decoded: SecretKey = bincode::deserialize(&encoded).unwrap();

        assert_eq!(secret, decoded);
    }

    #[test]
    fn serialize_deserialize_signature() {
        let keypair = keypair();
        let msg = [42u8; 32];
        let seed = [9u8; 32];

        let mut session = crate::session::Session::new(&[keypair.public], &seed).unwrap();
        session.generate_nonce(0).unwrap();
        let partial = session
            .partial_sign(&msg, &keypair.secret.to_bytes(), 0)
            .unwrap();
        let sig = session.combine_signatures(&[partial]).unwrap();

        let encoded = bincode::serialize(&sig).unwrap();
        let decoded: Signature = bincode::deserialize(&encoded).unwrap();

        assert_eq!(sig, decoded);
        assert!(decoded.verify(&msg, &[keypair.public]).is_ok());
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let encoded = bincode::serialize(&vec![0xffu8; 33]).unwrap();
        assert!(bincode::deserialize::<PublicKey>(&encoded).is_err());
    }
}
