/// The address an activation token is issued for. Hashed records bind to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationEmail(String);

impl ActivationEmail {
    pub fn parse(email: String) -> Result<ActivationEmail, String> {
        let email = email.trim().to_string();
        if !email.is_empty() && validator::validate_email(&email) {
            Ok(Self(email))
        } else {
            Err(format!("{} is not a valid activation email", email))
        }
    }
}

impl AsRef<str> for ActivationEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivationEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
