use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

/// Pseudo-headers which may be listed alongside normal header names, but which are
/// never transmitted as part of the request.
#[derive(Debug, Copy, Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PseudoHeader {
    /// The `(request-target)` pseudo-header: the lowercased method followed by the path.
    RequestTarget,
}

impl PseudoHeader {
    /// Returns the name of this pseudo-header as it appears in the `headers` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PseudoHeader::RequestTarget => "(request-target)",
        }
    }
}

impl FromStr for PseudoHeader {
    type Err = ();
    fn from_str(s: &str) -> Result<PseudoHeader, Self::Err> {
        match s {
            "(request-target)" => Ok(PseudoHeader::RequestTarget),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PseudoHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The method and path of a request, used to compute the `(request-target)` pseudo-header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    method: String,
    path: String,
}

impl Target {
    /// Constructs a new request target. The path should include the query string, if any.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
    /// Returns the method, exactly as supplied.
    pub fn method(&self) -> &str {
        &self.method
    }
    /// Returns the path, exactly as supplied.
    pub fn path(&self) -> &str {
        &self.path
    }
    /// Returns the value of the `(request-target)` pseudo-header: the method is
    /// lowercased, the path is used verbatim.
    pub fn to_value(&self) -> String {
        format!("{} {}", self.method.to_lowercase(), self.path)
    }
}

/// A client identifier and nonce pair, used for replay protection.
///
/// When present, the pair forms the first line of the signature string and is carried
/// in the `clientId` and `nonce` parameters of the signature header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nonce {
    client_id: String,
    nonce: String,
}

impl Nonce {
    /// Constructs a new client id/nonce pair.
    pub fn new(client_id: impl Into<String>, nonce: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            nonce: nonce.into(),
        }
    }
    /// Returns the client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }
    /// Returns the nonce.
    pub fn nonce(&self) -> &str {
        &self.nonce
    }
    /// Returns the line this nonce contributes to a signature string.
    pub fn to_line(&self) -> String {
        format!("{} {}", self.client_id, self.nonce)
    }
}

/// Folds a multi-line header value onto a single line, as described in
/// https://tools.ietf.org/html/rfc7230#section-3.2.4
///
/// Every line is trimmed, and the lines are rejoined with a single space.
pub fn fold_header_value(value: &str) -> String {
    value.split('\n').map(str::trim).join(" ")
}
