#![deny(missing_docs)]
//! Signature strings and `Signature` header values for the IETF draft 'Signing HTTP Messages'
//! https://tools.ietf.org/id/draft-cavage-http-signatures-09.html
//!
//! This crate does not sign or verify anything by itself. It produces the exact byte sequence
//! which a signer must sign (the canonical "signature string"), and it builds and parses the
//! `Signature`/`Authorization` header value which carries the signing metadata. The actual
//! cryptography is left to the caller.
//!
//! ## Example usage
//!
//! ```rust
//! use http_sig_string::*;
//!
//! let req = mock_request::MockRequest::new()
//!     .with_target("GET", "/foo")
//!     .with_header("Host", "example.org")
//!     .with_header("Date", "Tue, 07 Jun 2014 20:51:35 GMT");
//!
//! let config = CanonicalizeConfig::new()
//!     .with_signature_headers(vec!["(request-target)".into(), "host".into(), "date".into()]);
//!
//! let content = req.canonicalize(&config);
//! assert_eq!(
//!     content.as_str(),
//!     "(request-target): get /foo\nhost: example.org\ndate: Tue, 07 Jun 2014 20:51:35 GMT\n"
//! );
//!
//! // Sign `content.as_bytes()` with the key of your choice...
//! let header = SignatureHeader::new("my-key", "hmac-sha256", "c2lnbmF0dXJl")
//!     .with_signature_headers(config.signature_headers().to_vec());
//!
//! let value = header.serialize(true);
//! assert_eq!(value.parse::<SignatureHeader>().unwrap(), header);
//! ```

/// Format of a HTTP-date as produced by `chrono`, eg. `Tue, 07 Jun 2014 20:51:35 GMT`.
pub const DATE_FORMAT: &str = "%a, %d %b %Y %T GMT";

#[macro_use]
mod macros;

mod header;
pub use header::*;

mod request;
pub use request::*;

mod canonicalize;
pub use canonicalize::*;

mod auth_params;
pub use auth_params::*;

mod signature_header;
pub use signature_header::*;

/// Module containg a mock request type which implements `RequestLike` for testing.
pub mod mock_request;
