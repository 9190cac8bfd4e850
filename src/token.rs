use base64::prelude::*;
use rand::prelude::*;
use subtle::ConstantTimeEq;

/// Number of random bytes behind every token.
const TOKEN_BYTES: usize = 32;

/// The session's CSRF token, as seen by handlers of a request that passed the
/// guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub(crate) key: String,
    pub(crate) value: String,
}

impl Token {
    /// Name of the form field the token must be submitted in.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Renders a hidden form input carrying the token.
    pub fn hidden_input(&self) -> String {
        format!(
            r#"<input type="hidden" name="{}" value="{}">"#,
            self.key, self.value
        )
    }

    pub(crate) fn generate() -> String {
        let mut random = [0u8; TOKEN_BYTES];
        thread_rng().fill(&mut random);

        BASE64_URL_SAFE_NO_PAD.encode(random)
    }

    pub(crate) fn matches(expected: &str, received: Option<&str>) -> bool {
        match received {
            Some(received) => expected.as_bytes().ct_eq(received.as_bytes()).into(),
            None => false,
        }
    }
}
