//! Heuristic detection of hardcoded credentials in ENV/ARG values.
//!
//! The policy is deliberately biased toward false positives: a miss here is
//! a CRITICAL finding gone unreported, while a spurious hit only costs a
//! review. Tests document the expected over-flagging.

/// Tunable knobs for [`looks_like_secret`](SecretPolicy::looks_like_secret).
#[derive(Debug, Clone)]
pub struct SecretPolicy {
    /// Case-insensitive substrings that mark a key name as sensitive.
    pub key_fragments: Vec<&'static str>,
    /// Minimum length before a value's shape alone can trigger a match.
    pub min_value_length: usize,
}

impl Default for SecretPolicy {
    fn default() -> Self {
        Self {
            key_fragments: vec![
                "password",
                "passwd",
                "pwd",
                "secret",
                "api_key",
                "apikey",
                "token",
                "credential",
                "auth",
            ],
            min_value_length: 8,
        }
    }
}

impl SecretPolicy {
    /// A sensitive key name alone is enough; so is a credential-shaped value
    /// under any key. Values that are empty or entirely a `${...}`
    /// substitution expression indicate runtime injection and are exempt.
    pub fn looks_like_secret(&self, key: &str, value: &str) -> bool {
        let value = unquote(value.trim());
        if value.is_empty() || is_substitution(value) {
            return false;
        }
        if self.key_matches(key) {
            return true;
        }
        self.value_shape_suspicious(value)
    }

    fn key_matches(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.key_fragments.iter().any(|f| key.contains(f))
    }

    /// Token-shaped value: long enough, mixes letters and digits, and stays
    /// within the character set of keys/tokens (no dots, spaces, or paths).
    fn value_shape_suspicious(&self, value: &str) -> bool {
        value.len() >= self.min_value_length
            && value.chars().any(|c| c.is_ascii_alphabetic())
            && value.chars().any(|c| c.is_ascii_digit())
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '/' | '='))
            && !value.contains("${")
    }
}

fn is_substitution(value: &str) -> bool {
    value.starts_with("${") && value.ends_with('}')
}

/// Split ENV/ARG arguments into key/value pairs.
///
/// Handles `KEY=value`, several pairs on one instruction with quoted values,
/// the legacy `ENV KEY value` form, and bare `ARG NAME` (empty value).
pub fn env_pairs(arguments: &str) -> Vec<(String, String)> {
    let trimmed = arguments.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let first = trimmed.split_whitespace().next().unwrap_or("");
    if !first.contains('=') {
        let mut parts = trimmed.splitn(2, char::is_whitespace);
        let key = parts.next().unwrap_or("").to_string();
        let value = parts.next().unwrap_or("").trim().to_string();
        return vec![(key, unquote(&value).to_string())];
    }

    let mut pairs = Vec::new();
    for token in quoted_tokens(trimmed) {
        match token.split_once('=') {
            Some((k, v)) => pairs.push((k.to_string(), unquote(v).to_string())),
            None => pairs.push((token, String::new())),
        }
    }
    pairs
}

fn quoted_tokens(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' => {
                    current.push(c);
                    quote = Some(c);
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn unquote(value: &str) -> &str {
    let v = value.trim();
    let b = v.as_bytes();
    if b.len() >= 2
        && ((b[0] == b'"' && b[b.len() - 1] == b'"')
            || (b[0] == b'\'' && b[b.len() - 1] == b'\''))
    {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_key_with_real_value() {
        let policy = SecretPolicy::default();
        assert!(policy.looks_like_secret("API_KEY", "sk_test_12345"));
        assert!(policy.looks_like_secret("DB_PASSWORD", "hunter2!"));
        assert!(policy.looks_like_secret("AUTH_TOKEN", "abc"));
    }

    #[test]
    fn test_empty_value_is_exempt() {
        let policy = SecretPolicy::default();
        assert!(!policy.looks_like_secret("API_KEY", ""));
        assert!(!policy.looks_like_secret("API_KEY", "\"\""));
    }

    #[test]
    fn test_substitution_expression_is_exempt() {
        let policy = SecretPolicy::default();
        assert!(!policy.looks_like_secret("API_KEY", "${API_KEY:-default}"));
        assert!(!policy.looks_like_secret("SECRET", "${VAULT_SECRET}"));
    }

    #[test]
    fn test_value_shape_triggers_without_key_match() {
        let policy = SecretPolicy::default();
        assert!(policy.looks_like_secret("SOME_VALUE", "9f8a7b6c5d4e"));
        // Known tradeoff: token-shaped build metadata gets flagged too.
        assert!(policy.looks_like_secret("BUILD_ID", "a1b2c3d4e5"));
    }

    #[test]
    fn test_benign_values_pass() {
        let policy = SecretPolicy::default();
        assert!(!policy.looks_like_secret("LANG", "en_US.UTF-8"));
        assert!(!policy.looks_like_secret("APP_HOME", "/srv/app"));
        assert!(!policy.looks_like_secret("NODE_ENV", "production"));
        assert!(!policy.looks_like_secret("PORT", "8080"));
    }

    #[test]
    fn test_policy_is_tunable() {
        let policy = SecretPolicy {
            key_fragments: vec!["geheim"],
            min_value_length: 4,
        };
        assert!(policy.looks_like_secret("GEHEIM_WERT", "x"));
        assert!(!policy.looks_like_secret("API_KEY", "zz"));
        assert!(policy.looks_like_secret("OTHER", "ab12"));
    }

    #[test]
    fn test_env_pairs_single() {
        assert_eq!(
            env_pairs("API_KEY=abc123"),
            vec![("API_KEY".to_string(), "abc123".to_string())]
        );
    }

    #[test]
    fn test_env_pairs_multiple_with_quotes() {
        let pairs = env_pairs(r#"APP_NAME="my app" API_KEY='sk_test_12345' PORT=8080"#);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], ("APP_NAME".to_string(), "my app".to_string()));
        assert_eq!(pairs[1], ("API_KEY".to_string(), "sk_test_12345".to_string()));
        assert_eq!(pairs[2], ("PORT".to_string(), "8080".to_string()));
    }

    #[test]
    fn test_env_pairs_legacy_form() {
        assert_eq!(
            env_pairs("APP_PORT 3000"),
            vec![("APP_PORT".to_string(), "3000".to_string())]
        );
    }

    #[test]
    fn test_env_pairs_bare_arg_name() {
        assert_eq!(
            env_pairs("VERSION"),
            vec![("VERSION".to_string(), String::new())]
        );
    }

    #[test]
    fn test_env_pairs_substitution_preserved() {
        assert_eq!(
            env_pairs("APP_HOME=${APP_HOME:-/srv/app}"),
            vec![("APP_HOME".to_string(), "${APP_HOME:-/srv/app}".to_string())]
        );
    }
}
