use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::header::{fold_header_value, Nonce, PseudoHeader, Target};
use crate::request::RequestLike;
use crate::DATE_FORMAT;

const DATE: &str = "date";

/// Configuration for computing the canonical "signature string" of a request.
#[derive(Debug, Clone)]
pub struct CanonicalizeConfig {
    signature_headers: Vec<String>,
    target: Option<Target>,
    nonce: Option<Nonce>,
    now: Option<DateTime<Utc>>,
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            signature_headers: vec![DATE.into()],
            target: None,
            nonce: None,
            now: None,
        }
    }
}

impl CanonicalizeConfig {
    /// Creates a new canonicalization configuration using the default values.
    ///
    /// By default only the `date` header is included in the signature.
    pub fn new() -> Self {
        Self::default()
    }
    /// Set the headers to include in the signature, in order
    pub fn with_signature_headers(mut self, signature_headers: Vec<String>) -> Self {
        self.signature_headers = signature_headers;
        self
    }
    /// Set the headers to include in the signature, in order
    pub fn set_signature_headers(&mut self, signature_headers: Vec<String>) -> &mut Self {
        self.signature_headers = signature_headers;
        self
    }
    /// Get the headers to include in the signature
    pub fn signature_headers(&self) -> &[String] {
        &self.signature_headers
    }
    /// Set the target used for the `(request-target)` pseudo-header
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = Some(target);
        self
    }
    /// Set the target used for the `(request-target)` pseudo-header
    pub fn set_target(&mut self, target: Option<Target>) -> &mut Self {
        self.target = target;
        self
    }
    /// Get the target used for the `(request-target)` pseudo-header
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }
    /// Set the nonce which is prepended to the signature string
    pub fn with_nonce(mut self, nonce: Nonce) -> Self {
        self.nonce = Some(nonce);
        self
    }
    /// Set the nonce which is prepended to the signature string
    pub fn set_nonce(&mut self, nonce: Option<Nonce>) -> &mut Self {
        self.nonce = nonce;
        self
    }
    /// Get the nonce which is prepended to the signature string
    pub fn nonce(&self) -> Option<&Nonce> {
        self.nonce.as_ref()
    }
    /// Set the time used when the request has no `date` header
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }
    /// Set the time used when the request has no `date` header
    pub fn set_now(&mut self, now: Option<DateTime<Utc>>) -> &mut Self {
        self.now = now;
        self
    }
    /// Get the time used when the request has no `date` header. When unset, the
    /// current time is used.
    pub fn now(&self) -> Option<DateTime<Utc>> {
        self.now
    }
}

/// Opaque struct storing a computed signature string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureString {
    content: String,
    headers: Vec<(String, String)>,
}

impl SignatureString {
    /// Obtain a view of this signature string as a string slice
    pub fn as_str(&self) -> &str {
        &self.content
    }
    /// Obtain a view of this signature string as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
    /// Consume this signature string, returning the bytes to be signed
    pub fn into_bytes(self) -> Vec<u8> {
        self.content.into_bytes()
    }
    /// The lowercased names and folded values of the headers which were included,
    /// in order. Headers which could not be found are absent.
    pub fn headers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl fmt::Display for SignatureString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.content)
    }
}

impl From<SignatureString> for String {
    fn from(other: SignatureString) -> Self {
        other.content
    }
}

impl From<SignatureString> for Vec<u8> {
    fn from(other: SignatureString) -> Self {
        other.into_bytes()
    }
}

/// Extension method for computing the canonical "signature string" of a request.
pub trait CanonicalizeExt {
    /// Compute the canonical representation of this request
    fn canonicalize(&self, config: &CanonicalizeConfig) -> SignatureString;
}

impl<T: RequestLike> CanonicalizeExt for T {
    fn canonicalize(&self, config: &CanonicalizeConfig) -> SignatureString {
        let target = config.target.clone().or_else(|| self.target());
        build(self.body(), self.headers(), target.as_ref(), config)
    }
}

/// Compute the canonical "signature string" from a body and a list of headers.
///
/// Header names are matched case-insensitively. Headers listed in the config which
/// cannot be found are left out of the signature string.
pub fn canonicalize<'a, I>(body: &str, headers: I, config: &CanonicalizeConfig) -> SignatureString
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    build(body, headers, config.target.as_ref(), config)
}

fn build<'a, I>(
    body: &str,
    headers: I,
    target: Option<&Target>,
    config: &CanonicalizeConfig,
) -> SignatureString
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    // Lowercase all header names, later values win
    let mut header_map: HashMap<String, String> = headers
        .into_iter()
        .map(|(name, value)| (name.to_lowercase(), value.to_owned()))
        .collect();

    // Add missing date header
    if header_map.get(DATE).map_or(true, String::is_empty) {
        let date = config
            .now
            .unwrap_or_else(Utc::now)
            .format(DATE_FORMAT)
            .to_string();
        debug!("Using generated date for signature string: {}", date);
        header_map.insert(DATE.into(), date);
    }

    let mut lines = Vec::with_capacity(config.signature_headers.len() + 2);

    if let Some(nonce) = &config.nonce {
        lines.push(nonce.to_line());
    }

    // Lookup header values, and skip any headers that are missing
    let headers: Vec<_> = config
        .signature_headers
        .iter()
        .map(|name| name.to_lowercase())
        .filter_map(|name| {
            let value = match (name.parse::<PseudoHeader>(), target) {
                (Ok(PseudoHeader::RequestTarget), Some(target)) => Some(target.to_value()),
                _ => header_map.get(&name).cloned(),
            };
            match value {
                Some(value) if !value.is_empty() => Some((name, fold_header_value(&value))),
                _ => {
                    debug!("Header {:?} not available, skipping", name);
                    None
                }
            }
        })
        .collect();

    lines.extend(
        headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value)),
    );
    lines.push(body.to_owned());

    let content = lines.join("\n");
    trace!("Signature string: {:?}", content);

    SignatureString { content, headers }
}
