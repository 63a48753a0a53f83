//! Decoding of the failure sentinel embedded in type descriptions.
//!
//! A failing assertion resolves to a type displayed like `RTT_FAIL<"Expected `number` got `string`">`.
//! The quoted payload is the failure message and its first backtick-quoted part is a
//! simplified display of the expected type.

/// The token marking a failing assertion in a type description.
pub const FAIL_SENTINEL: &str = "RTT_FAIL";

/// The decoded payload of a failure sentinel.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct SentinelPayload {
    /// The failure message.
    pub message: String,
    /// The text between the first pair of backticks of the message.
    pub simplified_expected: Option<String>,
}

/// Returns `true` if `description` contains the failure sentinel.
pub fn is_failure(description: &str) -> bool {
    description.contains(FAIL_SENTINEL)
}

/// Decodes the first failure sentinel of a type description.
///
/// Returns `None` if there is no sentinel. Malformed payloads are decoded as far as possible.
///
/// ```
/// use rtt_tester::sentinel::decode;
///
/// let payload = decode(r#"RTT_FAIL<"Expected `number` got `string`">"#).unwrap();
/// assert_eq!(payload.message, "Expected `number` got `string`");
/// assert_eq!(payload.simplified_expected.as_deref(), Some("number"));
/// assert_eq!(decode("true"), None);
/// ```
pub fn decode(description: &str) -> Option<SentinelPayload> {
    let start = description.find(FAIL_SENTINEL)? + FAIL_SENTINEL.len();
    let rest = description[start..].trim_start();
    let message = match rest.strip_prefix('<') {
        Some(payload) => decode_payload(payload.trim_start()),
        None => String::new(),
    };
    let simplified_expected = simplified_expected(&message);
    Some(SentinelPayload {
        message,
        simplified_expected,
    })
}

fn decode_payload(payload: &str) -> String {
    let mut chars = payload.chars();
    match chars.next() {
        Some(quote) if quote == '"' || quote == '\'' => {
            let mut message = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some('n') => message.push('\n'),
                        Some('t') => message.push('\t'),
                        Some(c) => message.push(c),
                        None => message.push('\\'),
                    },
                    c if c == quote => return message,
                    c => message.push(c),
                }
            }
            message
        }
        _ => {
            let mut depth = 0usize;
            for (i, c) in payload.char_indices() {
                match c {
                    '<' => depth += 1,
                    '>' if depth == 0 => return payload[..i].trim_end().to_owned(),
                    '>' => depth -= 1,
                    _ => (),
                }
            }
            payload.to_owned()
        }
    }
}

fn simplified_expected(message: &str) -> Option<String> {
    let start = message.find('`')? + 1;
    let rest = &message[start..];
    Some(match rest.find('`') {
        Some(end) => rest[..end].to_owned(),
        None => rest.to_owned(),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escaped_quotes() {
        let payload = decode(r#"RTT_FAIL<"a \"quoted\" \\ word\nnext">"#).unwrap();
        assert_eq!(payload.message, "a \"quoted\" \\ word\nnext");
        assert_eq!(payload.simplified_expected, None);
    }

    #[test]
    fn test_single_quoted_payload() {
        let payload = decode("RTT_FAIL<'it\\'s `true`'>").unwrap();
        assert_eq!(payload.message, "it's `true`");
        assert_eq!(payload.simplified_expected.as_deref(), Some("true"));
    }

    #[test]
    fn test_unquoted_payload() {
        let payload = decode("Result<RTT_FAIL<Message<`a`>>, x>").unwrap();
        assert_eq!(payload.message, "Message<`a`>");
        assert_eq!(payload.simplified_expected.as_deref(), Some("a"));
    }

    #[test]
    fn test_leftmost_sentinel() {
        let payload = decode(r#"[RTT_FAIL<"first">, RTT_FAIL<"second">]"#).unwrap();
        assert_eq!(payload.message, "first");
    }

    #[test]
    fn test_malformed_payloads() {
        assert_eq!(decode("RTT_FAIL").unwrap().message, "");
        assert_eq!(decode("RTT_FAIL<").unwrap().message, "");
        assert_eq!(decode("RTT_FAIL<\"unterminated").unwrap().message, "unterminated");
        assert_eq!(decode("RTT_FAIL<\"trailing\\").unwrap().message, "trailing\\");
        assert_eq!(decode("RTT_FAIL<open<").unwrap().message, "open<");
        assert_eq!(
            decode("RTT_FAIL<\"lone ` backtick\">")
                .unwrap()
                .simplified_expected
                .as_deref(),
            Some(" backtick")
        );
        assert!(is_failure("x | RTT_FAIL<'a'>"));
        assert!(!is_failure("RTT_PASS"));
    }
}
