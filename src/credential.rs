use std::fmt;

/// Secret presented at login.
///
/// NOTE: stored and compared in cleartext, exactly as the snapshot format
/// carries it. Swap the [`CredentialVerifier`] used by the store to change
/// how it is checked.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

pub trait CredentialVerifier {
    fn verify(&self, stored: &Credential, presented: &str) -> bool;
}

/// Plain string equality.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaintextVerifier;

impl CredentialVerifier for PlaintextVerifier {
    fn verify(&self, stored: &Credential, presented: &str) -> bool {
        stored.expose() == presented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_verification() {
        let stored = Credential::new("hunter2");
        assert!(PlaintextVerifier.verify(&stored, "hunter2"));
        assert!(!PlaintextVerifier.verify(&stored, "hunter3"));
        assert!(!PlaintextVerifier.verify(&stored, ""));
    }

    #[test]
    fn debug_hides_secret() {
        let stored = Credential::new("hunter2");
        assert_eq!(format!("{stored:?}"), "Credential(***)");
    }
}
