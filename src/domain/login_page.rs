use regex::Regex;

pub const VERIFICATION_TOKEN_FIELD: &str = "__RequestVerificationToken";

/// Pulls the hidden anti-forgery token out of the login page markup.
pub fn extract_verification_token(html: &str) -> Option<String> {
    let re = Regex::new(r#"(?s)"__RequestVerificationToken".+?value="(.+?)""#).ok()?;
    re.captures(html)
        .and_then(|captures| captures.get(1))
        .map(|token| token.as_str().to_string())
}
