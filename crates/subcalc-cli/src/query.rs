//! Interpretation of the words following `inet` / `inet6`

use subcalc_cidr::tools::{discover_prefix, prefix_from_mask, prefix_from_wildcard, HostFit};
use subcalc_cidr::{compute_block, parse_prefix_bits, Block};
use subcalc_core::{AddressFamily, Result, SubcalcError};

/// Trailing word that enables enumeration
pub const PRINT_WORD: &str = "print";

/// What a calculation command asks for
#[derive(Debug)]
pub enum Query {
    /// Summarize a block, optionally listing every address in it
    Block { block: Block, print: bool },
    /// Smallest block holding a number of hosts
    Hosts(HostFit),
}

/// Turn `<target> [words...]` into a query
///
/// Accepted forms:
///
/// - `<address>/<prefix> [print]`
/// - `<address> netmask <mask> [print]`
/// - `<address> mask <wildcard> [print]` (IPv4 only)
/// - `<address> prefixlen <n> [print]`
/// - `hosts <count>`
pub fn interpret(family: AddressFamily, target: &str, words: &[String]) -> Result<Query> {
    let (words, print) = match words.split_last() {
        Some((last, rest)) if last == PRINT_WORD => (rest, true),
        _ => (words, false),
    };

    if target == "hosts" {
        return match words {
            [count] if !print => Ok(Query::Hosts(discover_prefix(family, count)?)),
            _ => Err(SubcalcError::InvalidPath(
                "usage: hosts <count>".to_string(),
            )),
        };
    }

    let (address, bits) = match target.split_once('/') {
        Some((address, prefix)) => {
            if let Some(word) = words.first() {
                return Err(SubcalcError::InvalidPath(format!(
                    "unexpected word: {}",
                    word
                )));
            }
            (address, parse_prefix_bits(prefix)?)
        }
        None => match words {
            [keyword, value] => (target, keyword_prefix(family, keyword, value)?),
            [] => {
                return Err(SubcalcError::InvalidPath(
                    "specify network bits or mask".to_string(),
                ));
            }
            [first, ..] => {
                return Err(SubcalcError::InvalidPath(format!(
                    "invalid words near {}",
                    first
                )));
            }
        },
    };

    let block = compute_block(family, address, bits)?;
    Ok(Query::Block { block, print })
}

fn keyword_prefix(family: AddressFamily, keyword: &str, value: &str) -> Result<u32> {
    match (keyword, family) {
        ("netmask", _) => Ok(prefix_from_mask(family, value)?.bits()),
        ("mask", AddressFamily::Inet) => Ok(prefix_from_wildcard(family, value)?.bits()),
        ("prefixlen", _) => parse_prefix_bits(value),
        _ => Err(SubcalcError::InvalidPath(format!(
            "invalid words near {}",
            keyword
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn block(family: AddressFamily, target: &str, list: &[&str]) -> (Block, bool) {
        match interpret(family, target, &words(list)).unwrap() {
            Query::Block { block, print } => (block, print),
            other => panic!("expected block, got {:?}", other),
        }
    }

    #[test]
    fn test_cidr_notation() {
        let (b, print) = block(AddressFamily::Inet, "192.168.1.100/24", &[]);
        assert_eq!(b.first().to_string(), "192.168.1.0");
        assert!(!print);

        let (_, print) = block(AddressFamily::Inet6, "2001:db8::/126", &["print"]);
        assert!(print);
    }

    #[test]
    fn test_mask_keywords() {
        let (b, _) = block(AddressFamily::Inet, "10.1.2.3", &["netmask", "255.255.0.0"]);
        assert_eq!(b.prefix().bits(), 16);

        let (b, _) = block(AddressFamily::Inet, "10.1.2.3", &["netmask", "0xffffff00"]);
        assert_eq!(b.prefix().bits(), 24);

        let (b, print) = block(AddressFamily::Inet, "10.1.2.3", &["mask", "0.0.0.15", "print"]);
        assert_eq!(b.prefix().bits(), 28);
        assert!(print);

        let (b, _) = block(AddressFamily::Inet6, "2001:db8::", &["prefixlen", "48"]);
        assert_eq!(b.prefix().bits(), 48);

        let (b, _) = block(AddressFamily::Inet6, "2001:db8::", &["netmask", "ffff:ffff::"]);
        assert_eq!(b.prefix().bits(), 32);
    }

    #[test]
    fn test_hosts() {
        match interpret(AddressFamily::Inet, "hosts", &words(&["500"])).unwrap() {
            Query::Hosts(fit) => assert_eq!(fit.prefix_len(), 23),
            other => panic!("expected hosts, got {:?}", other),
        }
        assert!(matches!(
            interpret(AddressFamily::Inet, "hosts", &[]),
            Err(SubcalcError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_rejections() {
        let err = |family, target, list: &[&str]| interpret(family, target, &words(list)).unwrap_err();

        assert!(matches!(
            err(AddressFamily::Inet, "10.0.0.1", &[]),
            SubcalcError::InvalidPath(_)
        ));
        assert!(matches!(
            err(AddressFamily::Inet6, "2001:db8::", &["mask", "::ff"]),
            SubcalcError::InvalidPath(_)
        ));
        assert!(matches!(
            err(AddressFamily::Inet, "10.0.0.1/24", &["extra"]),
            SubcalcError::InvalidPath(_)
        ));
        assert!(matches!(
            err(AddressFamily::Inet, "10.0.0.1/33", &[]),
            SubcalcError::InvalidPrefix(_)
        ));
        assert!(matches!(
            err(AddressFamily::Inet, "10.0.0.1", &["netmask", "255.0.255.0"]),
            SubcalcError::InvalidMask(_)
        ));
    }
}
