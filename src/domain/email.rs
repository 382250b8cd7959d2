use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidateEmail;

#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
pub struct EmailObject(String);

impl EmailObject {
    pub fn parse(s: String) -> Result<EmailObject, String> {
        if s.validate_email() {
            Ok(Self(s))
        } else {
            Err(format!("{} is not a valid email.", s))
        }
    }

    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn get(self) -> String {
        self.0
    }
}

impl AsRef<str> for EmailObject {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

pub fn deserialize_email_object<'de, D>(deserializer: D) -> Result<EmailObject, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    EmailObject::parse(raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use quickcheck_macros::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::EmailObject;

    #[derive(Debug, Clone)]
    struct ValidEmailFixture(pub String);

    impl quickcheck::Arbitrary for ValidEmailFixture {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let mut rng = StdRng::seed_from_u64(u64::arbitrary(g));
            let email = SafeEmail().fake_with_rng(&mut rng);
            Self(email)
        }
    }

    #[quickcheck]
    fn valid_emails_are_parsed_successfully(valid_email: ValidEmailFixture) -> bool {
        EmailObject::parse(valid_email.0).is_ok()
    }

    #[test]
    fn email_missing_at_symbol_is_rejected() {
        assert!(EmailObject::parse("traveller.example.com".to_string()).is_err());
    }

    #[test]
    fn empty_email_is_rejected() {
        assert!(EmailObject::parse("".to_string()).is_err());
    }
}
