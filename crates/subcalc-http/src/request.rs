//! Calculation requests decoded from the URI path

use serde::Deserialize;
use subcalc_cidr::parse_prefix_bits;
use subcalc_core::{AddressFamily, Result, SubcalcError};

/// Literal path component that enables enumeration
pub const PRINT_MODE: &str = "print";

/// Raw path parameters, already percent-decoded by the router
#[derive(Debug, Clone, Deserialize)]
pub struct CalcPath {
    pub family: String,
    pub address: String,
    pub prefix: String,
    #[serde(default)]
    pub mode: Option<String>,
}

/// Validated calculation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcRequest {
    pub family: AddressFamily,
    pub address: String,
    pub prefix_bits: u32,
    pub print: bool,
}

impl TryFrom<CalcPath> for CalcRequest {
    type Error = SubcalcError;

    fn try_from(path: CalcPath) -> Result<Self> {
        let family = path.family.parse()?;
        let print = match path.mode.as_deref() {
            None => false,
            Some(PRINT_MODE) => true,
            Some(other) => {
                return Err(SubcalcError::InvalidPath(format!("unknown mode: {}", other)));
            }
        };
        let prefix_bits = parse_prefix_bits(&path.prefix)?;

        Ok(Self {
            family,
            address: path.address,
            prefix_bits,
            print,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(family: &str, prefix: &str, mode: Option<&str>) -> CalcPath {
        CalcPath {
            family: family.to_string(),
            address: "10.0.0.1".to_string(),
            prefix: prefix.to_string(),
            mode: mode.map(str::to_string),
        }
    }

    #[test]
    fn test_summary_request() {
        let request = CalcRequest::try_from(path("INET", "24", None)).unwrap();
        assert_eq!(request.family, AddressFamily::Inet);
        assert_eq!(request.prefix_bits, 24);
        assert!(!request.print);
    }

    #[test]
    fn test_print_request() {
        let request = CalcRequest::try_from(path("inet6", "64", Some("print"))).unwrap();
        assert!(request.print);
    }

    #[test]
    fn test_rejections() {
        assert!(matches!(
            CalcRequest::try_from(path("inet7", "24", None)),
            Err(SubcalcError::InvalidPath(_))
        ));
        assert!(matches!(
            CalcRequest::try_from(path("inet", "24", Some("list"))),
            Err(SubcalcError::InvalidPath(_))
        ));
        assert!(matches!(
            CalcRequest::try_from(path("inet", "x", None)),
            Err(SubcalcError::InvalidPrefix(_))
        ));
    }
}
