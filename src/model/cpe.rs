use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix of a CPE 2.2 URI binding.
pub const CPE_URI_PREFIX: &str = "cpe:/";

/// The (part, vendor, product) addressed by a CPE URI.
///
/// `cpe:/a:vendor1:product1:1.0` parses to part `a`, vendor `vendor1`,
/// product `product1`; fields after the product are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CpeTriple {
    pub part: String,
    pub vendor: String,
    pub product: String,
}

impl CpeTriple {
    pub fn new(
        part: impl Into<String>,
        vendor: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            part: part.into(),
            vendor: vendor.into(),
            product: product.into(),
        }
    }

    /// Parses a `cpe:/part:vendor:product[:...]` URI.
    pub fn parse(uri: &str) -> Result<Self, Error> {
        let body = uri
            .strip_prefix(CPE_URI_PREFIX)
            .ok_or_else(|| Error::InvalidCpeUri(uri.to_string()))?;

        let mut tokens = body.split(':');
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(part), Some(vendor), Some(product))
                if !part.is_empty() && !vendor.is_empty() && !product.is_empty() =>
            {
                Ok(Self::new(part, vendor, product))
            }
            _ => Err(Error::InvalidCpeUri(uri.to_string())),
        }
    }
}

impl FromStr for CpeTriple {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CpeTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}:{}:{}", CPE_URI_PREFIX, self.part, self.vendor, self.product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_triple() {
        let cpe = CpeTriple::parse("cpe:/a:vendor1:product1").unwrap();
        assert_eq!(cpe.part, "a");
        assert_eq!(cpe.vendor, "vendor1");
        assert_eq!(cpe.product, "product1");
    }

    #[test]
    fn test_parse_ignores_trailing_fields() {
        let cpe: CpeTriple = "cpe:/o:linux:linux_kernel:2.6.32".parse().unwrap();
        assert_eq!(cpe, CpeTriple::new("o", "linux", "linux_kernel"));
        assert_eq!(cpe.to_string(), "cpe:/o:linux:linux_kernel");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CpeTriple::parse("a:vendor1:product1").is_err());
        assert!(CpeTriple::parse("cpe:/a:vendor1").is_err());
        assert!(CpeTriple::parse("cpe:/a::product1").is_err());
        assert!(matches!(
            CpeTriple::parse("cpe:2.3:a:vendor:product"),
            Err(Error::InvalidCpeUri(_))
        ));
    }
}
