//! The `name="value",name="value"` auth-param list used by the `Signature` authentication
//! scheme. https://tools.ietf.org/html/rfc7235#section-2.1

use std::collections::BTreeMap;

use itertools::Itertools;
use logos::Logos;
use thiserror::Error;

/// A parsed list of auth-params. Names are case-sensitive.
pub type AuthParams = BTreeMap<String, String>;

/// The error returned when an auth-param list is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A character which cannot appear in an auth-param list, or an unterminated quoted string.
    #[error("Unexpected character at offset {0}")]
    UnexpectedCharacter(usize),

    /// A valid token which is not allowed at this position.
    #[error("Unexpected {found} at offset {offset}, expected {expected}")]
    UnexpectedToken {
        /// Byte offset of the token within the input
        offset: usize,
        /// What was expected at this position
        expected: &'static str,
        /// What was found instead
        found: &'static str,
    },

    /// The input ended in the middle of a parameter.
    #[error("Unexpected end of input, expected {0}")]
    UnexpectedEnd(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Logos)]
#[logos(skip r"[ \t]+")]
enum TokenTy {
    #[regex(r"[!#$%&'*+.^_`|~0-9A-Za-z-]+")]
    Token,

    #[token("=")]
    Equals,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Quoted,

    #[token(",")]
    Comma,
}

impl TokenTy {
    fn describe(self) -> &'static str {
        match self {
            TokenTy::Token => "token",
            TokenTy::Equals => "'='",
            TokenTy::Quoted => "quoted string",
            TokenTy::Comma => "','",
        }
    }
}

fn expect(
    next: Option<(Result<TokenTy, ()>, logos::Span)>,
    expected: &'static str,
    accept: impl Fn(TokenTy) -> bool,
) -> Result<(TokenTy, logos::Span), ParseError> {
    match next {
        None => Err(ParseError::UnexpectedEnd(expected)),
        Some((Err(()), span)) => Err(ParseError::UnexpectedCharacter(span.start)),
        Some((Ok(ty), span)) if accept(ty) => Ok((ty, span)),
        Some((Ok(ty), span)) => Err(ParseError::UnexpectedToken {
            offset: span.start,
            expected,
            found: ty.describe(),
        }),
    }
}

fn unescape(quoted: &str) -> String {
    let inner = &quoted[1..quoted.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // The lexer guarantees a backslash is always followed by another character
            result.extend(chars.next());
        } else {
            result.push(c);
        }
    }
    result
}

fn escape(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', r#"\""#)
}

/// Parse an auth-param list into a mapping from parameter name to value.
///
/// Values may be tokens or quoted strings, whitespace around the separators is ignored, and
/// empty list elements are skipped. If the same name appears more than once, the last value wins.
pub fn parse_params(input: &str) -> Result<AuthParams, ParseError> {
    let mut tokens = TokenTy::lexer(input).spanned();
    let mut params = AuthParams::new();

    loop {
        let name = match tokens.next() {
            None => break,
            Some((Ok(TokenTy::Comma), _)) => continue,
            other => expect(other, "parameter name", |ty| ty == TokenTy::Token)?.1,
        };
        expect(tokens.next(), "'='", |ty| ty == TokenTy::Equals)?;
        let (ty, value) = expect(tokens.next(), "parameter value", |ty| {
            matches!(ty, TokenTy::Token | TokenTy::Quoted)
        })?;

        let value = match ty {
            TokenTy::Quoted => unescape(&input[value]),
            _ => input[value].to_owned(),
        };
        params.insert(input[name].to_owned(), value);

        match tokens.next() {
            None => break,
            other => {
                expect(other, "','", |ty| ty == TokenTy::Comma)?;
            }
        }
    }

    Ok(params)
}

/// Serialize parameters into an auth-param list, in the order given. Every value is
/// written as a quoted string.
pub fn serialize_params<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    params
        .into_iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, escape(value)))
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn parse_basic() {
        let params = parse_params(
            r#"keyId="Test",algorithm="rsa-sha256",headers="(request-target) host date",signature="qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=""#,
        )
        .unwrap();

        assert_eq!(params.len(), 4);
        assert_eq!(params["keyId"], "Test");
        assert_eq!(params["algorithm"], "rsa-sha256");
        assert_eq!(params["headers"], "(request-target) host date");
        assert_eq!(params["signature"], "qdx+H7PHHDZgy4y/Ahn9Tny9V3GP6YgBPyUXMmoxWtLbHpUnXS2mg2+SbrQDMCJypxBLSPQR2aAjn7ndmw2iicw3HMbe8VfEdKFYRqzic+efkb3nndiv/x1xSHDJWeSWkx3ButlYSuBskLu6kd9Fswtemr3lgdDEmn04swr2Os0=");
    }

    #[test]
    fn parse_whitespace_and_tokens() {
        let params = parse_params(
            "keyId=\"Test\", algorithm = \"rsa-sha256\" ,\tcreated=1402170695, expires=1402170699,",
        )
        .unwrap();

        assert_eq!(params["keyId"], "Test");
        assert_eq!(params["algorithm"], "rsa-sha256");
        assert_eq!(params["created"], "1402170695");
        assert_eq!(params["expires"], "1402170699");
    }

    #[test]
    fn parse_escapes() {
        let params = parse_params(r#"a="say \"hi\"",b="back\\slash",c="\x""#).unwrap();

        assert_eq!(params["a"], r#"say "hi""#);
        assert_eq!(params["b"], r"back\slash");
        assert_eq!(params["c"], "x");
    }

    #[test]
    fn parse_empty() {
        assert!(parse_params("").unwrap().is_empty());
        assert!(parse_params(" , ,").unwrap().is_empty());
    }

    #[test]
    fn parse_duplicate_last_wins() {
        let params = parse_params(r#"a="1",a="2""#).unwrap();
        assert_eq!(params["a"], "2");
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            parse_params(r#"keyId="Test"#),
            Err(ParseError::UnexpectedCharacter(6))
        );
        assert_eq!(
            parse_params(r#"keyId"#),
            Err(ParseError::UnexpectedEnd("'='"))
        );
        assert_eq!(
            parse_params(r#"keyId="#),
            Err(ParseError::UnexpectedEnd("parameter value"))
        );
        assert_eq!(
            parse_params(r#"="Test""#),
            Err(ParseError::UnexpectedToken {
                offset: 0,
                expected: "parameter name",
                found: "'='",
            })
        );
        assert_eq!(
            parse_params(r#"keyId="a" algorithm="b""#),
            Err(ParseError::UnexpectedToken {
                offset: 10,
                expected: "','",
                found: "token",
            })
        );
        assert_eq!(
            parse_params("keyId=\"a\";"),
            Err(ParseError::UnexpectedCharacter(9))
        );
    }

    #[test]
    fn serialize_basic() {
        assert_eq!(
            serialize_params(vec![("keyId", "rsa-key-1"), ("algorithm", "rsa-sha256")]),
            r#"keyId="rsa-key-1",algorithm="rsa-sha256""#
        );
        assert_eq!(serialize_params(Vec::new()), "");
    }

    #[test]
    fn serialize_escapes() {
        assert_eq!(
            serialize_params(vec![("a", r#"say "hi" \o/"#)]),
            r#"a="say \"hi\" \\o/""#
        );
    }

    proptest! {
        #[test]
        fn serialized_values_parse_back(
            params in proptest::collection::btree_map(
                "[a-zA-Z][a-zA-Z0-9]{0,8}",
                "[ -~]{0,16}",
                0..6,
            )
        ) {
            let serialized = serialize_params(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            prop_assert_eq!(parse_params(&serialized).unwrap(), params);
        }
    }
}
