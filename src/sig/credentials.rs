//! Key material for signing and verifying protocol messages.
//!
//! Trust decisions stay with the caller: this type holds whatever key the
//! caller already chose to sign with or verify against. Certificate chain
//! validation is out of scope.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use openssl::sign::{Signer, Verifier};
use openssl::x509::X509;

use crate::error::SamlResult;

/// An RSA key pair with an optional X.509 certificate to embed in
/// `ds:KeyInfo`.
#[derive(Clone)]
pub struct SigningCredentials {
    key: PKey<Private>,
    certificate: Option<X509>,
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("has_certificate", &self.certificate.is_some())
            .finish()
    }
}

impl SigningCredentials {
    /// Load a certificate and private key, both PEM encoded.
    pub fn from_pem(certificate_pem: &str, private_key_pem: &str) -> SamlResult<Self> {
        let key = PKey::private_key_from_pem(private_key_pem.as_bytes())?;
        let certificate = X509::from_pem(certificate_pem.as_bytes())?;
        Ok(SigningCredentials {
            key,
            certificate: Some(certificate),
        })
    }

    /// Load a bare private key, PEM encoded, with no certificate.
    pub fn from_key_pem(private_key_pem: &str) -> SamlResult<Self> {
        let key = PKey::private_key_from_pem(private_key_pem.as_bytes())?;
        Ok(SigningCredentials {
            key,
            certificate: None,
        })
    }

    /// Generate a fresh 2048-bit RSA key with no certificate.
    pub fn generate() -> SamlResult<Self> {
        let rsa = Rsa::generate(2048)?;
        Ok(SigningCredentials {
            key: PKey::from_rsa(rsa)?,
            certificate: None,
        })
    }

    /// RSA-SHA256 signature over `data`.
    pub fn sign_sha256(&self, data: &[u8]) -> SamlResult<Vec<u8>> {
        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.update(data)?;
        Ok(signer.sign_to_vec()?)
    }

    /// Check an RSA-SHA256 signature over `data`.
    pub fn verify_sha256(&self, data: &[u8], signature: &[u8]) -> SamlResult<bool> {
        let mut verifier = Verifier::new(MessageDigest::sha256(), &self.key)?;
        verifier.update(data)?;
        Ok(verifier.verify(signature)?)
    }

    /// The certificate as base64 DER, the form `ds:X509Certificate` carries.
    pub fn certificate_base64_der(&self) -> SamlResult<Option<String>> {
        match &self.certificate {
            Some(certificate) => Ok(Some(STANDARD.encode(certificate.to_der()?))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let credentials = SigningCredentials::generate().unwrap();
        let signature = credentials.sign_sha256(b"payload").unwrap();
        assert!(credentials.verify_sha256(b"payload", &signature).unwrap());
        assert!(!credentials.verify_sha256(b"tampered", &signature).unwrap());
    }

    #[test]
    fn generated_credentials_have_no_certificate() {
        let credentials = SigningCredentials::generate().unwrap();
        assert!(credentials.certificate_base64_der().unwrap().is_none());
    }
}
