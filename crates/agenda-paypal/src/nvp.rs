// NVP wire format helpers
//
// Requests go out form-encoded; responses come back query-string-encoded.

use std::collections::HashMap;

use crate::error::PaypalError;

/// A decoded NVP response
#[derive(Debug, Clone)]
pub struct NvpResponse {
    fields: HashMap<String, String>,
}

impl NvpResponse {
    pub fn decode(body: &str) -> Self {
        let fields = url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &'static str) -> Result<&str, PaypalError> {
        self.get(key).ok_or(PaypalError::MissingField(key))
    }

    /// Values of `L_{prefix}{n}` entries, ordered by index
    pub fn indexed(&self, prefix: &str) -> Vec<String> {
        let mut entries: Vec<(usize, String)> = self
            .fields
            .iter()
            .filter_map(|(key, value)| {
                let suffix = key.strip_prefix(prefix)?;
                let index: usize = suffix.parse().ok()?;
                Some((index, value.clone()))
            })
            .collect();
        entries.sort_by_key(|(index, _)| *index);
        entries.into_iter().map(|(_, value)| value).collect()
    }

    /// `Success` and `SuccessWithWarning` are the only accepted ACK values;
    /// anything else surfaces the provider's L_LONGMESSAGE0 text.
    pub fn check_ack(&self) -> Result<(), PaypalError> {
        match self.get("ACK") {
            Some("Success") | Some("SuccessWithWarning") => Ok(()),
            _ => Err(PaypalError::Rejected {
                message: self
                    .get("L_LONGMESSAGE0")
                    .unwrap_or("no detail from provider")
                    .to_string(),
            }),
        }
    }
}

/// Pull the item number out of a button's L_BUTTONVAR6 metadata field,
/// stored verbatim from creation time as `item_number=<value>;`.
/// Malformed or missing metadata is treated as "no match", never an error.
pub fn extract_item_number(var: &str) -> Option<String> {
    let value = var.strip_prefix("item_number=")?;
    let value = value.trim_end_matches(';');
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_and_get() {
        let resp = NvpResponse::decode("ACK=Success&HOSTEDBUTTONID=ABC123");
        assert_eq!(resp.get("ACK"), Some("Success"));
        assert_eq!(resp.get("HOSTEDBUTTONID"), Some("ABC123"));
        assert_eq!(resp.get("MISSING"), None);
    }

    #[test]
    fn test_decode_unescapes_values() {
        let resp = NvpResponse::decode("L_LONGMESSAGE0=Button+not+saved&ACK=Failure");
        assert_eq!(resp.get("L_LONGMESSAGE0"), Some("Button not saved"));
    }

    #[test]
    fn test_indexed_orders_by_suffix() {
        let resp = NvpResponse::decode(
            "L_HOSTEDBUTTONID2=C&L_HOSTEDBUTTONID0=A&L_HOSTEDBUTTONID1=B&ACK=Success",
        );
        assert_eq!(resp.indexed("L_HOSTEDBUTTONID"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_indexed_ignores_non_numeric_suffixes() {
        let resp = NvpResponse::decode("L_HOSTEDBUTTONID0=A&L_HOSTEDBUTTONIDX=Z");
        assert_eq!(resp.indexed("L_HOSTEDBUTTONID"), vec!["A"]);
    }

    #[test]
    fn test_check_ack() {
        assert!(NvpResponse::decode("ACK=Success").check_ack().is_ok());
        assert!(NvpResponse::decode("ACK=SuccessWithWarning")
            .check_ack()
            .is_ok());

        let err = NvpResponse::decode("ACK=Failure&L_LONGMESSAGE0=Invalid+merchant")
            .check_ack()
            .unwrap_err();
        assert_eq!(err.to_string(), "Paypal error: Invalid merchant");
    }

    #[test]
    fn test_check_ack_missing_entirely() {
        assert!(NvpResponse::decode("").check_ack().is_err());
    }

    #[test]
    fn test_extract_item_number() {
        assert_eq!(
            extract_item_number("item_number=abc-123;"),
            Some("abc-123".to_string())
        );
        // Trailing semicolon is optional in practice
        assert_eq!(
            extract_item_number("item_number=abc-123"),
            Some("abc-123".to_string())
        );
        assert_eq!(extract_item_number("item_number=;"), None);
        assert_eq!(extract_item_number("garbage"), None);
        assert_eq!(extract_item_number(""), None);
    }
}
