// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::fmt;
use std::sync::Arc;

use crate::credential::{FielCredential, SignatureAlgorithm, VALID_TO_FORMAT};
use crate::error::CredentialError;

/// Credential of a FIEL login
#[derive(Clone)]
pub struct FielSessionData {
    credential: Arc<dyn FielCredential>,
}

impl fmt::Debug for FielSessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FielSessionData")
            .field("rfc", &self.credential.rfc())
            .field("serial_number", &self.credential.serial_number())
            .finish_non_exhaustive()
    }
}

impl FielSessionData {
    pub fn new(credential: Arc<dyn FielCredential>) -> Self {
        Self { credential }
    }

    pub fn credential(&self) -> &dyn FielCredential {
        self.credential.as_ref()
    }

    pub fn rfc(&self) -> &str {
        self.credential.rfc()
    }

    /// Certificate expiration as `yymmddhhmmssZ`
    pub fn valid_to(&self) -> String {
        self.credential.valid_to().format(VALID_TO_FORMAT).to_string()
    }

    pub fn serial_number(&self) -> &str {
        self.credential.serial_number()
    }

    pub fn is_valid_now(&self) -> bool {
        self.credential.is_valid_now()
    }

    pub fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm) -> Result<Vec<u8>, CredentialError> {
        self.credential.sign(data, algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::{Certificate, Credential};

    const FIXTURE: &[u8] = include_bytes!("../../../tests/fixtures/fiel-certificate.cer");

    #[test]
    fn test_accessors_come_from_certificate() {
        let credential = Credential::new(
            Certificate::from_der(FIXTURE).unwrap(),
            Arc::new(|data: &[u8], _: SignatureAlgorithm| -> Result<Vec<u8>, CredentialError> {
                Ok(data.to_vec())
            }),
        );
        let data = FielSessionData::new(Arc::new(credential));

        assert_eq!(data.rfc(), "EKU9003173C9");
        assert_eq!(data.valid_to(), "361016150308Z");
        assert_eq!(data.serial_number(), "30001000000500003416");
        assert_eq!(data.sign(b"x", SignatureAlgorithm::Sha1).unwrap(), b"x");
        assert!(format!("{:?}", data).contains("EKU9003173C9"));
    }
}
