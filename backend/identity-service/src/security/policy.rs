//! Password strength policy
//!
//! Rules are checked in a fixed order and the first violation is reported, so
//! the user always gets one concrete thing to fix.

use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const SPECIAL_CHARACTERS: &str = "@$!%*?&";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    SpecialCharacter,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::MinLength => write!(
                f,
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
            PasswordRule::Uppercase => {
                f.write_str("Password must contain at least one uppercase letter")
            }
            PasswordRule::Lowercase => {
                f.write_str("Password must contain at least one lowercase letter")
            }
            PasswordRule::Digit => f.write_str("Password must contain at least one digit"),
            PasswordRule::SpecialCharacter => write!(
                f,
                "Password must contain at least one special character: {}",
                SPECIAL_CHARACTERS
            ),
        }
    }
}

/// Check `password` against the policy, returning the first rule it breaks.
pub fn validate_password_strength(password: &str) -> Result<(), PasswordRule> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRule::MinLength);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRule::Uppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRule::Lowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::Digit);
    }

    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Err(PasswordRule::SpecialCharacter);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_rejections() {
        assert_eq!(
            validate_password_strength("short1!"),
            Err(PasswordRule::MinLength)
        );
        assert_eq!(
            validate_password_strength("alllowercase1!"),
            Err(PasswordRule::Uppercase)
        );
        assert_eq!(
            validate_password_strength("ALLUPPER1!"),
            Err(PasswordRule::Lowercase)
        );
        assert_eq!(
            validate_password_strength("NoDigitsHere!"),
            Err(PasswordRule::Digit)
        );
        assert_eq!(
            validate_password_strength("NoSpecial123"),
            Err(PasswordRule::SpecialCharacter)
        );
    }

    #[test]
    fn test_policy_accepts_valid_password() {
        assert_eq!(validate_password_strength("ValidPass1!"), Ok(()));
    }

    #[test]
    fn test_first_violation_wins() {
        // Breaks every rule; only length is reported.
        assert_eq!(validate_password_strength(""), Err(PasswordRule::MinLength));
        // Long enough but nothing else.
        assert_eq!(
            validate_password_strength("        "),
            Err(PasswordRule::Uppercase)
        );
    }

    #[test]
    fn test_only_listed_special_characters_count() {
        assert_eq!(
            validate_password_strength("ValidPass1#"),
            Err(PasswordRule::SpecialCharacter)
        );
        for special in SPECIAL_CHARACTERS.chars() {
            let password = format!("ValidPass1{}", special);
            assert_eq!(validate_password_strength(&password), Ok(()));
        }
    }

    #[test]
    fn test_rule_messages_name_the_rule() {
        assert!(PasswordRule::MinLength.to_string().contains("8 characters"));
        assert!(PasswordRule::SpecialCharacter
            .to_string()
            .contains(SPECIAL_CHARACTERS));
    }
}
