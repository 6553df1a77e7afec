// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Answer to the FIEL login challenge
//!
//! The challenge page carries `guid` and `tokenuuid`. The answer is a token
//! signed with the certificate private key plus a fixed set of applet fields.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::FielSessionData;
use crate::credential::SignatureAlgorithm;
use crate::error::FielLoginError;
use crate::html::{FormFields, HtmlForm};

/// Resolves the challenge of one FIEL login page
#[derive(Debug)]
pub struct ChallengeResolver<'a> {
    data: &'a FielSessionData,
    contents: String,
    fields: FormFields,
    applet_url: String,
}

impl<'a> ChallengeResolver<'a> {
    /// Read the challenge form of `html`
    pub fn from_html(html: &str, data: &'a FielSessionData, applet_url: impl Into<String>) -> Self {
        Self {
            data,
            contents: html.to_string(),
            fields: HtmlForm::new(html, "form").get_form_values(),
            applet_url: applet_url.into(),
        }
    }

    pub fn guid(&self) -> Option<&str> {
        self.field("guid")
    }

    pub fn token_uuid(&self) -> Option<&str> {
        self.field("tokenuuid")
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    fn require(&self, value: Option<&'_ str>, name: &str) -> Result<String, FielLoginError> {
        value
            .map(str::to_string)
            .ok_or_else(|| FielLoginError::Challenge {
                rfc: self.data.rfc().to_string(),
                reason: format!("missing {} in challenge page", name),
                contents: self.contents.clone(),
            })
    }

    /// Text that gets signed: `tokenuuid|rfc|serial`
    pub fn source_string(&self) -> Result<String, FielLoginError> {
        let token_uuid = self.require(self.token_uuid(), "tokenuuid")?;
        Ok(format!(
            "{}|{}|{}",
            token_uuid,
            self.data.rfc(),
            self.data.serial_number()
        ))
    }

    /// `base64(base64(source) # base64(signature))`
    pub fn sign_token(&self) -> Result<String, FielLoginError> {
        let source = self.source_string()?;
        let signature = self
            .data
            .sign(source.as_bytes(), SignatureAlgorithm::Sha1)
            .map_err(|err| FielLoginError::Signature {
                rfc: self.data.rfc().to_string(),
                source: err,
            })?;

        let inner = format!("{}#{}", STANDARD.encode(&source), STANDARD.encode(signature));
        Ok(STANDARD.encode(inner))
    }

    /// Fields posted back to the FIEL login page
    pub fn obtain_form_fields(&self) -> Result<FormFields, FielLoginError> {
        let guid = self.require(self.guid(), "guid")?;
        let token = self.sign_token()?;

        let mut fields = FormFields::new();
        fields.insert("credentialsRequired".into(), "CERT".into());
        fields.insert("guid".into(), guid);
        fields.insert("ks".into(), "null".into());
        for empty in ["seeder", "arc", "tan", "placer", "secuence"] {
            fields.insert(empty.into(), String::new());
        }
        fields.insert("urlApplet".into(), self.applet_url.clone());
        fields.insert("fert".into(), self.data.valid_to());
        fields.insert("token".into(), token);
        Ok(fields)
    }
}
