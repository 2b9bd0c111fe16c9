/// Password hashing and verification using Argon2id
use crate::config::PasswordSettings;
use crate::error::{IdentityError, Result};
use crate::security::policy::{validate_password_strength, MIN_PASSWORD_LENGTH, SPECIAL_CHARACTERS};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::seq::SliceRandom;
use rand::Rng;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

/// Argon2id hasher with a tunable cost.
///
/// The cost only applies to new hashes. Every PHC string carries its own
/// parameters, so hashes created under an older cost keep verifying after the
/// settings change.
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(settings: &PasswordSettings) -> Result<Self> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| IdentityError::Configuration(format!("Invalid Argon2 parameters: {}", e)))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password after checking it against the strength policy
    ///
    /// ## Errors
    ///
    /// - `WeakPassword` naming the first rule the password breaks (nothing is hashed)
    /// - `Internal` if the hashing primitive fails
    pub fn hash(&self, password: &str) -> Result<String> {
        validate_password_strength(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against its stored hash
    ///
    /// A mismatch is `Ok(false)`, never an error. The comparison is constant
    /// time inside the Argon2 primitive.
    ///
    /// ## Errors
    ///
    /// `Verification` if `password_hash` is not a usable Argon2 PHC string.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
            IdentityError::Verification(format!("Invalid password hash format: {}", e))
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(IdentityError::Verification(e.to_string())),
        }
    }

    /// Whether `value` already looks like an Argon2 PHC hash.
    pub fn is_already_hashed(value: &str) -> bool {
        if !value.starts_with("$argon2") {
            return false;
        }

        match PasswordHash::new(value) {
            Ok(parsed) => matches!(
                parsed.algorithm.as_str(),
                "argon2id" | "argon2i" | "argon2d"
            ) && parsed.hash.is_some(),
            Err(_) => false,
        }
    }

    /// Hash `value` unless it is already a hash. Used when importing user
    /// records that may mix plaintext and hashed passwords.
    pub fn prepare_for_storage(&self, value: &str) -> Result<String> {
        if Self::is_already_hashed(value) {
            return Ok(value.to_string());
        }
        self.hash(value)
    }
}

/// Generate a random password that satisfies the strength policy.
///
/// Lengths below the policy minimum are raised to it.
pub fn generate_temp_password(length: usize) -> String {
    let length = length.max(MIN_PASSWORD_LENGTH);
    let special = SPECIAL_CHARACTERS.as_bytes();
    let classes: [&[u8]; 4] = [UPPERCASE, LOWERCASE, DIGITS, special];
    let all: Vec<u8> = classes.concat();

    let mut rng = rand::rngs::OsRng;
    let mut password: Vec<u8> = classes
        .iter()
        .map(|class| class[rng.gen_range(0..class.len())])
        .collect();

    while password.len() < length {
        password.push(all[rng.gen_range(0..all.len())]);
    }

    password.shuffle(&mut rng);
    password.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::policy::PasswordRule;

    fn fast_settings(iterations: u32) -> PasswordSettings {
        PasswordSettings {
            iterations,
            memory_kib: 1024,
            parallelism: 1,
        }
    }

    fn service() -> PasswordService {
        PasswordService::new(&fast_settings(1)).unwrap()
    }

    #[test]
    fn test_hash_and_verify_valid_password() {
        let service = service();
        let hash = service.hash("ValidPass1!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify("ValidPass1!", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let service = service();
        let hash = service.hash("ValidPass1!").unwrap();
        assert!(!service.verify("ValidPass2!", &hash).unwrap());
        assert!(!service.verify("validPass1!", &hash).unwrap());
        assert!(!service.verify("", &hash).unwrap());
    }

    #[test]
    fn test_weak_password_is_not_hashed() {
        let service = service();
        assert!(matches!(
            service.hash("short1!"),
            Err(IdentityError::WeakPassword(PasswordRule::MinLength))
        ));
        assert!(matches!(
            service.hash("NoSpecial123"),
            Err(IdentityError::WeakPassword(PasswordRule::SpecialCharacter))
        ));
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let service = service();
        let hash1 = service.hash("ValidPass1!").unwrap();
        let hash2 = service.hash("ValidPass1!").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_older_cost_still_verifies() {
        let old = PasswordService::new(&fast_settings(1)).unwrap();
        let new = PasswordService::new(&fast_settings(3)).unwrap();

        let old_hash = old.hash("ValidPass1!").unwrap();
        let new_hash = new.hash("ValidPass1!").unwrap();
        assert!(old_hash.contains("t=1"));
        assert!(new_hash.contains("t=3"));

        assert!(new.verify("ValidPass1!", &old_hash).unwrap());
        assert!(old.verify("ValidPass1!", &new_hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_verification_error() {
        let service = service();
        assert!(matches!(
            service.verify("ValidPass1!", "not-a-hash"),
            Err(IdentityError::Verification(_))
        ));
        assert!(matches!(
            service.verify("ValidPass1!", ""),
            Err(IdentityError::Verification(_))
        ));
    }

    #[test]
    fn test_invalid_params_are_configuration_error() {
        let settings = PasswordSettings {
            iterations: 0,
            memory_kib: 1024,
            parallelism: 1,
        };
        assert!(matches!(
            PasswordService::new(&settings),
            Err(IdentityError::Configuration(_))
        ));
    }

    #[test]
    fn test_is_already_hashed() {
        let service = service();
        let hash = service.hash("ValidPass1!").unwrap();

        assert!(PasswordService::is_already_hashed(&hash));
        assert!(!PasswordService::is_already_hashed("ValidPass1!"));
        assert!(!PasswordService::is_already_hashed("$argon2id$garbage"));
        assert!(!PasswordService::is_already_hashed(""));
    }

    #[test]
    fn test_prepare_for_storage_does_not_double_hash() {
        let service = service();
        let hash = service.prepare_for_storage("ValidPass1!").unwrap();
        assert!(PasswordService::is_already_hashed(&hash));

        let again = service.prepare_for_storage(&hash).unwrap();
        assert_eq!(again, hash);
        assert!(service.verify("ValidPass1!", &again).unwrap());
    }

    #[test]
    fn test_temp_password_satisfies_policy() {
        for length in [0, 8, 12, 32] {
            let password = generate_temp_password(length);
            assert_eq!(password.len(), length.max(MIN_PASSWORD_LENGTH));
            assert_eq!(validate_password_strength(&password), Ok(()));
        }
    }

    #[test]
    fn test_temp_passwords_differ() {
        assert_ne!(generate_temp_password(16), generate_temp_password(16));
    }
}
