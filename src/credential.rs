// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! FIEL credential: the taxpayer certificate and its private key
//!
//! The certificate is read here; signing is delegated to a
//! [`PrivateKeySigner`] supplied by the caller (HSM, key file, agent, ...).

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use x509_parser::certificate::X509Certificate;
use x509_parser::prelude::FromDer;

use crate::error::CredentialError;

/// Object identifier of `x500UniqueIdentifier`, holding "RFC / representative RFC"
const OID_UNIQUE_IDENTIFIER: &str = "2.5.4.45";

/// Format of the certificate expiration sent with the FIEL challenge
pub const VALID_TO_FORMAT: &str = "%y%m%d%H%M%SZ";

/// Digest used for a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureAlgorithm::Sha1 => f.write_str("sha1WithRSAEncryption"),
            SignatureAlgorithm::Sha256 => f.write_str("sha256WithRSAEncryption"),
        }
    }
}

/// What a FIEL login needs from a credential
pub trait FielCredential: Send + Sync {
    /// RFC of the certificate owner
    fn rfc(&self) -> &str;

    /// Certificate serial number as the portal expects it
    fn serial_number(&self) -> &str;

    /// Start of the validity window
    fn valid_from(&self) -> DateTime<Utc>;

    /// End of the validity window
    fn valid_to(&self) -> DateTime<Utc>;

    /// Sign `data` with the private key
    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm)
        -> Result<Vec<u8>, CredentialError>;

    /// Check if the certificate is valid at `moment`
    fn is_valid_on(&self, moment: DateTime<Utc>) -> bool {
        self.valid_from() <= moment && moment <= self.valid_to()
    }

    /// Check if the certificate is valid right now
    fn is_valid_now(&self) -> bool {
        self.is_valid_on(Utc::now())
    }
}

/// Produces signatures with the private key matching a certificate
pub trait PrivateKeySigner: Send + Sync {
    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm)
        -> Result<Vec<u8>, CredentialError>;
}

impl<F> PrivateKeySigner for F
where
    F: Fn(&[u8], SignatureAlgorithm) -> Result<Vec<u8>, CredentialError> + Send + Sync,
{
    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm)
        -> Result<Vec<u8>, CredentialError> {
        (self)(data, algorithm)
    }
}

/// Fields of an X.509 certificate relevant to the portals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    rfc: String,
    serial_number: String,
    subject: String,
    valid_from: DateTime<Utc>,
    valid_to: DateTime<Utc>,
}

impl Certificate {
    /// Read a DER encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self, CredentialError> {
        let (_, cert) = X509Certificate::from_der(der)
            .map_err(|e| CredentialError::Certificate(e.to_string()))?;

        let rfc = cert
            .subject()
            .iter_attributes()
            .filter(|attr| attr.attr_type().to_id_string() == OID_UNIQUE_IDENTIFIER)
            .find_map(|attr| attr.as_str().ok())
            .and_then(|value| value.split('/').next())
            .map(|rfc| rfc.trim().to_string())
            .filter(|rfc| !rfc.is_empty())
            .ok_or(CredentialError::MissingRfc)?;

        let validity = cert.validity();
        let valid_from = timestamp(validity.not_before.timestamp())?;
        let valid_to = timestamp(validity.not_after.timestamp())?;

        Ok(Self {
            der: der.to_vec(),
            rfc,
            serial_number: String::from_utf8_lossy(cert.raw_serial()).into_owned(),
            subject: cert.subject().to_string(),
            valid_from,
            valid_to,
        })
    }

    /// Read a PEM encoded certificate
    pub fn from_pem(pem: &[u8]) -> Result<Self, CredentialError> {
        let (_, pem) = x509_parser::pem::parse_x509_pem(pem)
            .map_err(|e| CredentialError::Certificate(e.to_string()))?;
        Self::from_der(&pem.contents)
    }

    /// Read a certificate file, DER or PEM
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CredentialError> {
        let contents = std::fs::read(path)?;
        if contents.starts_with(b"-----BEGIN") {
            Self::from_pem(&contents)
        } else {
            Self::from_der(&contents)
        }
    }

    pub fn rfc(&self) -> &str {
        &self.rfc
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Subject distinguished name
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn valid_from(&self) -> DateTime<Utc> {
        self.valid_from
    }

    pub fn valid_to(&self) -> DateTime<Utc> {
        self.valid_to
    }

    /// DER bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, CredentialError> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .ok_or_else(|| CredentialError::Certificate(format!("invalid validity time {}", secs)))
}

/// Certificate paired with the signer of its private key
#[derive(Clone)]
pub struct Credential {
    certificate: Certificate,
    signer: Arc<dyn PrivateKeySigner>,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("rfc", &self.certificate.rfc)
            .field("serial_number", &self.certificate.serial_number)
            .finish_non_exhaustive()
    }
}

impl Credential {
    /// Create a credential
    pub fn new(certificate: Certificate, signer: Arc<dyn PrivateKeySigner>) -> Self {
        Self {
            certificate,
            signer,
        }
    }

    /// Underlying certificate
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }
}

impl FielCredential for Credential {
    fn rfc(&self) -> &str {
        self.certificate.rfc()
    }

    fn serial_number(&self) -> &str {
        self.certificate.serial_number()
    }

    fn valid_from(&self) -> DateTime<Utc> {
        self.certificate.valid_from()
    }

    fn valid_to(&self) -> DateTime<Utc> {
        self.certificate.valid_to()
    }

    fn sign(&self, data: &[u8], algorithm: SignatureAlgorithm)
        -> Result<Vec<u8>, CredentialError> {
        self.signer.sign(data, algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    const FIXTURE: &[u8] = include_bytes!("../tests/fixtures/fiel-certificate.cer");

    #[test]
    fn test_reads_fixture_certificate() {
        let cert = Certificate::from_der(FIXTURE).unwrap();

        assert_eq!(cert.rfc(), "EKU9003173C9");
        assert_eq!(cert.serial_number(), "30001000000500003416");
        assert!(cert.subject().contains("ESCUELA KEMPER URGATE"));
        assert_eq!(
            cert.valid_to().format(VALID_TO_FORMAT).to_string(),
            "361016150308Z"
        );
        assert_eq!(cert.valid_from(), Utc.with_ymd_and_hms(2026, 10, 19, 15, 3, 8).unwrap());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Certificate::from_der(b"not a certificate"),
            Err(CredentialError::Certificate(_))
        ));
        assert!(Certificate::from_pem(b"-----BEGIN NOTHING").is_err());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(matches!(
            Certificate::open("/nonexistent/fiel.cer"),
            Err(CredentialError::Io(_))
        ));
    }

    #[test]
    fn test_credential_delegates_signing() {
        let signer = |data: &[u8], algorithm: SignatureAlgorithm| -> Result<Vec<u8>, CredentialError> {
            assert_eq!(algorithm, SignatureAlgorithm::Sha1);
            Ok(data.iter().rev().copied().collect())
        };
        let credential = Credential::new(Certificate::from_der(FIXTURE).unwrap(), Arc::new(signer));

        assert_eq!(credential.rfc(), "EKU9003173C9");
        assert_eq!(credential.sign(b"abc", SignatureAlgorithm::Sha1).unwrap(), b"cba");
        assert!(!format!("{:?}", credential).contains("signer"));
    }

    #[test]
    fn test_validity_window() {
        let credential = Credential::new(
            Certificate::from_der(FIXTURE).unwrap(),
            Arc::new(|_: &[u8], _: SignatureAlgorithm| -> Result<Vec<u8>, CredentialError> {
                Ok(vec![])
            }),
        );

        let from = credential.valid_from();
        assert!(credential.is_valid_on(from));
        assert!(credential.is_valid_on(from + Duration::days(365)));
        assert!(!credential.is_valid_on(from - Duration::seconds(1)));
        assert!(!credential.is_valid_on(credential.valid_to() + Duration::seconds(1)));
    }
}
