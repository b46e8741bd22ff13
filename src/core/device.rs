use regex::Regex;
use std::sync::OnceLock;

const MOBILE_TOKENS: &str = r"(?i)Android|webOS|iPhone|iPad|iPod|BlackBerry|IEMobile|Opera Mini";

fn mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(MOBILE_TOKENS).expect("mobile token pattern is valid"))
}

/// True when the user agent names a known mobile platform.
pub fn is_mobile_device(user_agent: &str) -> bool {
    mobile_pattern().is_match(user_agent)
}
