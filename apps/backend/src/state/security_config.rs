use jsonwebtoken::Algorithm;

/// Security configuration shared by token minting and verification.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Vec<u8>,
    pub algorithm: Algorithm,
}

impl SecurityConfig {
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            jwt_secret: jwt_secret.to_vec(),
            algorithm: Algorithm::HS256,
        }
    }

    /// Fixed secret for test suites; never used outside tests.
    pub fn for_tests() -> Self {
        Self::new(b"codefray-test-secret-not-for-production")
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self::for_tests()
    }
}
