use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;

const PATH_FRAGMENT_LEN: usize = 6;
const LINK_TOKEN_BYTES: usize = 20;

/// Source of storage path suffixes and link tokens.
///
/// The orchestrator makes exactly one `path_suffix` call per uploaded file and one
/// `link_token` call per committed batch. Neither value is checked for collisions.
pub trait TokenGenerator: Send + Sync {
    fn path_suffix(&self) -> String;

    fn link_token(&self) -> String;
}

/// Production generator backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    /// `{unix_millis}-{6 lowercase alphanumerics}`
    fn path_suffix(&self) -> String {
        let fragment: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(PATH_FRAGMENT_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{}-{}", Utc::now().timestamp_millis(), fragment)
    }

    /// 40 hex chars
    fn link_token(&self) -> String {
        let mut rng = rand::rng();
        let random_bytes: Vec<u8> = (0..LINK_TOKEN_BYTES).map(|_| rng.random()).collect();
        hex::encode(random_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_suffix_is_millis_dash_fragment() {
        let suffix = RandomTokenGenerator.path_suffix();
        let (millis, fragment) = suffix.split_once('-').unwrap();
        assert!(millis.parse::<i64>().unwrap() > 0);
        assert_eq!(fragment.len(), PATH_FRAGMENT_LEN);
        assert!(fragment
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn link_token_is_hex() {
        let token = RandomTokenGenerator.link_token();
        assert_eq!(token.len(), LINK_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, RandomTokenGenerator.link_token());
    }
}
