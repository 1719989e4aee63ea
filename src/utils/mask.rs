// API key masking for display

/// Show the first and last four characters of a secret, star out the rest.
/// Secrets of eight characters or fewer are fully starred.
pub fn mask_api_key(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    let len = chars.len();

    if len <= 8 {
        return "*".repeat(len);
    }

    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[len - 4..].iter().collect();
    format!("{}{}{}", prefix, "*".repeat(len - 8), suffix)
}
