use crate::domain::errors::ValidationError;

const RESERVED_PREFIXES: &[&str] = &["xn--", "sthree-"];
const RESERVED_SUFFIXES: &[&str] = &["-s3alias", "--ol-s3"];

/// A validated, S3-compatible bucket name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub const MIN_LEN: usize = 3;
    pub const MAX_LEN: usize = 63;

    pub fn new(value: String) -> Result<Self, ValidationError> {
        if value.len() < Self::MIN_LEN {
            return Err(ValidationError::BucketNameTooShort {
                actual: value.len(),
                min: Self::MIN_LEN,
            });
        }
        if value.len() > Self::MAX_LEN {
            return Err(ValidationError::BucketNameTooLong {
                actual: value.len(),
                max: Self::MAX_LEN,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '.'))
        {
            return Err(ValidationError::BucketNameInvalidCharacter(c));
        }

        let bytes = value.as_bytes();
        if !bytes[0].is_ascii_alphanumeric() {
            return Err(ValidationError::BucketNameInvalidStart);
        }
        if !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
            return Err(ValidationError::BucketNameInvalidEnd);
        }

        if value.contains("..") || value.contains(".-") || value.contains("-.") {
            return Err(ValidationError::BucketNameAdjacentPeriod);
        }

        if let Some(affix) = RESERVED_PREFIXES
            .iter()
            .find(|p| value.starts_with(*p))
            .or_else(|| RESERVED_SUFFIXES.iter().find(|s| value.ends_with(*s)))
        {
            return Err(ValidationError::BucketNameReserved(affix.to_string()));
        }

        if value.contains("--") {
            return Err(ValidationError::BucketNameConsecutiveHyphens);
        }

        if value.parse::<std::net::Ipv4Addr>().is_ok() {
            return Err(ValidationError::BucketNameLooksLikeIpAddress);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for BucketName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
