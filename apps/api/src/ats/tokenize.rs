//! Tokenizer and normalizer shared by résumé and job-description processing.

/// Characters that may appear inside a token besides alphanumerics.
/// Keeps language names like `c++` and `c#` intact.
const INNER_TOKEN_CHARS: &[char] = &['+', '#'];

/// Splits text into lower-cased tokens.
///
/// Boundaries are any character that is not alphanumeric, `+` or `#`.
/// Leading `+`/`#` are trimmed and tokens without a letter are dropped,
/// so `5+`, `2024` and `#` never become keywords.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || INNER_TOKEN_CHARS.contains(&c)))
        .map(|raw| raw.trim_start_matches(INNER_TOKEN_CHARS))
        .filter(|raw| raw.chars().any(char::is_alphabetic))
        .map(str::to_lowercase)
        .collect()
}

/// Collapses simple plural forms onto their singular match key.
///
/// - `-ies` (longer than 4 chars) becomes `-y`: `technologies` → `technology`
/// - a trailing `s` is dropped for tokens longer than 3 chars unless the token
///   ends in `ss`, `us` or `is`: `skills` → `skill`, but `aws`, `access`,
///   `status` and `analysis` are left alone
///
/// Expects an already lower-cased token.
pub fn normalize(token: &str) -> String {
    let len = token.chars().count();

    if len > 4 {
        if let Some(stem) = token.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }

    if len > 3
        && token.ends_with('s')
        && !(token.ends_with("ss") || token.ends_with("us") || token.ends_with("is"))
    {
        return token[..token.len() - 1].to_string();
    }

    token.to_string()
}
