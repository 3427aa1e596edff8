use regex::Regex;
use std::sync::LazyLock;

/// Plain name of the package manifest.
pub const MANIFEST_NAME: &str = "config.mlve";

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(CONTENT_HASH_REGEX, r"^[0-9a-f]{32}\.bin3?$");
regex!(CONTENT_HASH_TOKEN_REGEX, r"[0-9a-f]{32}\.bin3?");

/// Lowercase hex MD5 digest of `s`; archives store members under the
/// digest of their real name to disguise them.
#[must_use]
pub fn hashed_name(s: &str) -> String {
    format!("{:x}", md5::compute(s.as_bytes()))
}

/// Returns `true` if `s` is exactly a content-hash member name.
#[must_use]
pub fn is_content_hash(s: &str) -> bool {
    CONTENT_HASH_REGEX.is_match(s)
}

/// Finds the first content-hash member name embedded anywhere in `s`.
#[must_use]
pub fn find_content_hash(s: &str) -> Option<&str> {
    CONTENT_HASH_TOKEN_REGEX.find(s).map(|m| m.as_str())
}
