use crate::claims::Claims;
use crate::error::{Error, Result};
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_DECODED_SIGNATURE_SIZE,
    MAX_SIGNATURE_B64_SIZE, MAX_TOKEN_LENGTH,
};
use crate::token::TokenHeader;
use crate::utils::base64url;
use crate::utils::bounds::validate_field_size;

use serde_json::{Map, Value};

/// A token that has been parsed but not validated
///
/// At this stage we have:
/// - Split the token into three parts (header, payload, signature)
/// - Decoded and parsed the header JSON
/// - Decoded and parsed the payload JSON into [`Claims`]
/// - Checked the shape of the registered claims
/// - Decoded the signature bytes
///
/// Nothing here is trusted yet. The signature has not been checked and no
/// claim has been compared against configuration.
#[derive(Debug, Clone)]
pub struct ParsedToken {
    header: TokenHeader,
    claims: Claims,
    signature: Vec<u8>,
    raw: String,
    signing_input_len: usize,
}

impl ParsedToken {
    /// Parse a token from its compact `header.payload.signature` form
    ///
    /// # Example
    /// ```ignore
    /// let token = ParsedToken::from_string("eyJ...").unwrap();
    /// ```
    pub fn from_string(token: &str) -> Result<Self> {
        // 1. Validate token string length
        if token.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: token.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        // 2. Check token format (header, payload, signature)
        let mut parts = token.split('.');
        let header_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        let payload_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        let signature_b64 = parts.next().ok_or(Error::FormatInvalid)?;
        if parts.next().is_some() {
            return Err(Error::FormatInvalid);
        }

        // Validate signature Base64URL size before decoding
        if signature_b64.len() > MAX_SIGNATURE_B64_SIZE {
            return Err(Error::SignatureB64TooLarge {
                size: signature_b64.len(),
                max: MAX_SIGNATURE_B64_SIZE,
            });
        }

        // 3. Decode header with size limit
        let header_json = base64url::decode_string(header_b64, MAX_DECODED_HEADER_SIZE)?;
        let header: TokenHeader = serde_json::from_str(&header_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))?;
        validate_field_size("alg", &header.algorithm, MAX_ALG_LENGTH)?;

        // 4. Decode payload with size limit; it must be a JSON object
        let payload_json = base64url::decode_string(payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
        let payload: Map<String, Value> = serde_json::from_str(&payload_json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse payload: {e}")))?;
        let claims = Claims::from_map(payload);
        claims.validate_structure()?;

        // 5. Decode signature bytes
        let signature = base64url::decode_bytes(signature_b64, MAX_DECODED_SIGNATURE_SIZE)?;

        tracing::trace!(alg = %header.algorithm, claims = claims.len(), "parsed token");

        Ok(Self {
            header,
            claims,
            signature,
            raw: token.to_string(),
            signing_input_len: header_b64.len() + 1 + payload_b64.len(),
        })
    }

    /// Get the token header
    pub fn header(&self) -> &TokenHeader {
        &self.header
    }

    /// Get the (untrusted) claims
    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Take the (untrusted) claims
    pub fn into_claims(self) -> Claims {
        self.claims
    }

    /// Get the raw signature bytes
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Get the signing input (`header.payload`) exactly as received
    pub fn signing_input(&self) -> &str {
        &self.raw[..self.signing_input_len]
    }

    /// The full compact string this token was parsed from
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(header: &str, payload: &str, signature: &[u8]) -> String {
        format!(
            "{}.{}.{}",
            base64url::encode_bytes(header.as_bytes()),
            base64url::encode_bytes(payload.as_bytes()),
            base64url::encode_bytes(signature)
        )
    }

    #[test]
    fn test_parse_valid_token() {
        let token_str = assemble(
            r#"{"alg":"HS256","typ":"Bearer"}"#,
            r#"{"iss":"test","data":"hello"}"#,
            b"signature",
        );
        let token = ParsedToken::from_string(&token_str).unwrap();

        assert_eq!(token.header().algorithm_str(), "HS256");
        assert_eq!(token.header().token_type.as_deref(), Some("Bearer"));
        assert_eq!(token.claims().issuer(), Some("test"));
        assert_eq!(token.claims().get_str("data"), Some("hello"));
        assert_eq!(token.signature(), b"signature");
        assert_eq!(token.as_str(), token_str);

        let last_dot = token_str.rfind('.').unwrap();
        assert_eq!(token.signing_input(), &token_str[..last_dot]);
    }

    #[test]
    fn test_parse_invalid_format() {
        assert!(matches!(
            ParsedToken::from_string("not.enough"),
            Err(Error::FormatInvalid)
        ));
        assert!(matches!(
            ParsedToken::from_string("too.many.parts.here"),
            Err(Error::FormatInvalid)
        ));
        assert!(matches!(
            ParsedToken::from_string(""),
            Err(Error::FormatInvalid)
        ));
    }

    #[test]
    fn test_parse_invalid_base64() {
        let result = ParsedToken::from_string("!!!.abc.def");
        assert!(matches!(result, Err(Error::FormatInvalidBase64(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        let token_str = assemble("not json", r#"{"iss":"test"}"#, b"sig");
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::FormatInvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_payload_must_be_object() {
        let token_str = assemble(r#"{"alg":"HS256"}"#, r#"[1,2,3]"#, b"sig");
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::FormatInvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_header_requires_alg() {
        let token_str = assemble(r#"{"typ":"Bearer"}"#, r#"{}"#, b"sig");
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::FormatInvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_registered_claims() {
        let token_str = assemble(r#"{"alg":"HS256"}"#, r#"{"exp":"soon"}"#, b"sig");
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::ClaimInvalidType { .. })
        ));
    }

    #[test]
    fn test_parse_size_limits() {
        let huge = "a".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(matches!(
            ParsedToken::from_string(&huge),
            Err(Error::TokenTooLarge { .. })
        ));

        let token_str = format!(
            "{}.{}.{}",
            base64url::encode_bytes(br#"{"alg":"HS256"}"#),
            base64url::encode_bytes(b"{}"),
            "A".repeat(MAX_SIGNATURE_B64_SIZE + 1)
        );
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::SignatureB64TooLarge { .. })
        ));

        let long_alg = format!(r#"{{"alg":"{}"}}"#, "H".repeat(MAX_ALG_LENGTH + 1));
        let token_str = assemble(&long_alg, "{}", b"sig");
        assert!(matches!(
            ParsedToken::from_string(&token_str),
            Err(Error::HeaderFieldTooLong { .. })
        ));
    }

    #[test]
    fn test_parse_empty_signature_segment() {
        // An unsigned token still parses; the signature check rejects it later
        let token_str = assemble(r#"{"alg":"HS256"}"#, r#"{}"#, b"");
        let token = ParsedToken::from_string(&token_str).unwrap();
        assert!(token.signature().is_empty());
    }
}
