use secrecy::SecretString;

/// Settings every action needs, kept apart from the action itself.
/// The JWT secret stays wrapped until the signing keys are built.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub jwt_secret: SecretString,
    pub access_ttl_seconds: u64,
    pub refresh_ttl_seconds: u64,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(jwt_secret: SecretString, access_ttl_seconds: u64, refresh_ttl_seconds: u64) -> Self {
        Self {
            jwt_secret,
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new(SecretString::from("secret".to_string()), 900, 86400);
        assert_eq!(args.jwt_secret.expose_secret(), "secret");
        assert_eq!(args.access_ttl_seconds, 900);
        assert_eq!(args.refresh_ttl_seconds, 86400);
    }
}
