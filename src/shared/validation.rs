use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Regex for validating category colors as 6-digit hex codes
    /// - Valid: "#6366f1", "#FF0000"
    /// - Invalid: "6366f1", "#fff", "red"
    pub static ref HEX_COLOR_REGEX: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex_valid() {
        assert!(USERNAME_REGEX.is_match("john_doe"));
        assert!(USERNAME_REGEX.is_match("user123"));
        assert!(USERNAME_REGEX.is_match("_admin"));
        assert!(USERNAME_REGEX.is_match("JohnDoe"));
    }

    #[test]
    fn test_username_regex_invalid() {
        assert!(!USERNAME_REGEX.is_match("123user")); // starts with digit
        assert!(!USERNAME_REGEX.is_match("-user")); // starts with hyphen
        assert!(!USERNAME_REGEX.is_match("user-name")); // hyphen
        assert!(!USERNAME_REGEX.is_match("user name")); // space
        assert!(!USERNAME_REGEX.is_match("")); // empty
    }

    #[test]
    fn test_hex_color_regex_valid() {
        assert!(HEX_COLOR_REGEX.is_match("#6366f1"));
        assert!(HEX_COLOR_REGEX.is_match("#FF0000"));
        assert!(HEX_COLOR_REGEX.is_match("#000000"));
    }

    #[test]
    fn test_hex_color_regex_invalid() {
        assert!(!HEX_COLOR_REGEX.is_match("6366f1")); // missing hash
        assert!(!HEX_COLOR_REGEX.is_match("#fff")); // shorthand
        assert!(!HEX_COLOR_REGEX.is_match("#6366f1aa")); // too long
        assert!(!HEX_COLOR_REGEX.is_match("red")); // named color
    }
}
