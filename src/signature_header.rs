use std::fmt;
use std::str::FromStr;

use http::header::{HeaderValue, InvalidHeaderValue, ToStrError};
use itertools::Itertools;
use thiserror::Error;

use crate::auth_params::{parse_params, serialize_params, ParseError};
use crate::header::Nonce;

/// The authentication scheme which prefixes a `Signature` or `Authorization` header value.
pub const SIGNATURE_SCHEME: &str = "Signature";

const KEY_ID: &str = "keyId";
const ALGORITHM: &str = "algorithm";
const HEADERS: &str = "headers";
const SIGNATURE: &str = "signature";
const CLIENT_ID: &str = "clientId";
const NONCE: &str = "nonce";

/// The error returned when a `http::HeaderValue` cannot be parsed as a signature header.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignatureHeaderError {
    /// The header value is not visible ASCII
    #[error(transparent)]
    InvalidHeaderValue(#[from] ToStrError),

    /// The auth-param list is malformed
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// The signing metadata carried by a `Signature` or `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    key_id: String,
    algorithm: String,
    signature: String,
    signature_headers: Vec<String>,
    nonce: Option<Nonce>,
}

impl SignatureHeader {
    /// Creates a new signature header. The signature is expected to be encoded already,
    /// typically using base64.
    ///
    /// By default only the `date` header is listed as signed, and there is no nonce.
    pub fn new(
        key_id: impl Into<String>,
        algorithm: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: algorithm.into(),
            signature: signature.into(),
            signature_headers: vec!["date".into()],
            nonce: None,
        }
    }

    /// Returns the key ID
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
    /// Returns the name of the signature algorithm, eg. `rsa-sha256`
    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }
    /// Returns the encoded signature
    pub fn signature(&self) -> &str {
        &self.signature
    }
    /// Returns the names of the signed headers, in signing order
    pub fn signature_headers(&self) -> &[String] {
        &self.signature_headers
    }
    /// Set the names of the signed headers, in signing order
    pub fn set_signature_headers(&mut self, signature_headers: Vec<String>) -> &mut Self {
        self.signature_headers = signature_headers;
        self
    }
    /// Set the names of the signed headers, in signing order
    pub fn with_signature_headers(mut self, signature_headers: Vec<String>) -> Self {
        self.set_signature_headers(signature_headers);
        self
    }
    /// Returns the client id/nonce pair, if any
    pub fn nonce(&self) -> Option<&Nonce> {
        self.nonce.as_ref()
    }
    /// Set the client id/nonce pair
    pub fn set_nonce(&mut self, nonce: Option<Nonce>) -> &mut Self {
        self.nonce = nonce;
        self
    }
    /// Set the client id/nonce pair
    pub fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.set_nonce(Some(nonce));
        self
    }

    /// Serialize into a header value. When `prefix` is true, the value starts with the
    /// `Signature` scheme.
    ///
    /// Header names are lowercased. The `headers` parameter is left out entirely if no
    /// headers are listed.
    pub fn serialize(&self, prefix: bool) -> String {
        let headers = self
            .signature_headers
            .iter()
            .map(|header| header.to_lowercase())
            .join(" ");

        let mut params = vec![
            (KEY_ID, self.key_id.as_str()),
            (ALGORITHM, self.algorithm.as_str()),
        ];
        if !headers.is_empty() {
            params.push((HEADERS, headers.as_str()));
        }
        params.push((SIGNATURE, self.signature.as_str()));
        if let Some(nonce) = &self.nonce {
            params.push((CLIENT_ID, nonce.client_id()));
            params.push((NONCE, nonce.nonce()));
        }

        let params = serialize_params(params);
        if prefix {
            format!("{} {}", SIGNATURE_SCHEME, params)
        } else {
            params
        }
    }

    /// Parse a header value. When `prefix` is true, a leading `Signature ` scheme is
    /// removed if present (ignoring case).
    ///
    /// Missing `keyId`, `algorithm` and `signature` parameters are returned as empty strings,
    /// and a missing `headers` parameter as an empty list. A nonce is only returned when both
    /// the `clientId` and `nonce` parameters are present.
    pub fn parse(value: &str, prefix: bool) -> Result<Self, ParseError> {
        let value = if prefix { strip_scheme(value) } else { value };
        let mut params = parse_params(value)?;

        let signature_headers = params
            .remove(HEADERS)
            .map(|headers| headers.split(' ').map(String::from).collect())
            .unwrap_or_default();

        let nonce = match (params.remove(CLIENT_ID), params.remove(NONCE)) {
            (Some(client_id), Some(nonce)) => Some(Nonce::new(client_id, nonce)),
            (None, None) => None,
            _ => {
                debug!("Ignoring incomplete nonce in signature header");
                None
            }
        };

        Ok(Self {
            key_id: params.remove(KEY_ID).unwrap_or_default(),
            algorithm: params.remove(ALGORITHM).unwrap_or_default(),
            signature: params.remove(SIGNATURE).unwrap_or_default(),
            signature_headers,
            nonce,
        })
    }

    /// Convert into a `http::HeaderValue`, including the `Signature` scheme.
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.serialize(true))
    }

    /// Parse a `http::HeaderValue`, such as the value of an `Authorization` header.
    pub fn from_header_value(value: &HeaderValue) -> Result<Self, SignatureHeaderError> {
        Ok(Self::parse(value.to_str()?, true)?)
    }
}

fn strip_scheme(value: &str) -> &str {
    let len = SIGNATURE_SCHEME.len();
    match (value.get(..len), value.get(len..)) {
        (Some(scheme), Some(rest))
            if scheme.eq_ignore_ascii_case(SIGNATURE_SCHEME) && rest.starts_with(' ') =>
        {
            &rest[1..]
        }
        _ => value,
    }
}

impl fmt::Display for SignatureHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.serialize(true))
    }
}

impl FromStr for SignatureHeader {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, true)
    }
}
