use subcalc_cidr::{compute_block, open_enumerator, write_response, Summary};
use subcalc_core::{AddressFamily, SubcalcError};

fn summary(family: AddressFamily, address: &str, prefix: u32) -> Summary {
    let block = compute_block(family, address, prefix).expect("valid block");
    Summary::from(&block)
}

#[test]
fn test_inet_slash_24_summary() {
    let s = summary(AddressFamily::Inet, "192.168.1.100", 24);
    assert_eq!(s.address_range.first_address, "192.168.1.0");
    assert_eq!(s.address_range.last_address, "192.168.1.255");
    assert_eq!(s.host_count, "256");
    assert_eq!(s.network_mask, "255.255.255.0");
    assert_eq!(s.mask, "0.0.0.255");

    let b10 = s.address_range_base10.expect("inet has base10 range");
    assert_eq!(b10.first_address, "3232235776");
    assert_eq!(b10.last_address, "3232236031");
}

#[test]
fn test_inet_slash_30_summary() {
    let s = summary(AddressFamily::Inet, "10.0.0.0", 30);
    assert_eq!(s.address_range.first_address, "10.0.0.0");
    assert_eq!(s.address_range.last_address, "10.0.0.3");
    assert_eq!(s.host_count, "4");
}

#[test]
fn test_inet_slash_30_enumeration() {
    let block = compute_block(AddressFamily::Inet, "10.0.0.0", 30).unwrap();
    let mut out = Vec::new();
    write_response(&block, Some(open_enumerator(&block)), &mut out).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(
        value["net_list"],
        serde_json::json!(["10.0.0.0", "10.0.0.1", "10.0.0.2", "10.0.0.3"])
    );
    assert_eq!(value["host_count"], "4");
}

#[test]
fn test_inet6_slash_126_summary() {
    let s = summary(AddressFamily::Inet6, "2001:db8::", 126);
    assert_eq!(s.address_range.first_address, "2001:db8::");
    assert_eq!(s.address_range.last_address, "2001:db8::3");
    assert_eq!(s.host_count, "4");
    assert_eq!(s.network_mask, "ffff:ffff:ffff:ffff:ffff:ffff:ffff:fffc");
    assert!(s.address_range_base10.is_none());
    assert!(s.address_range_base16.is_none());
}

#[test]
fn test_inet6_slash_128_summary() {
    let s = summary(AddressFamily::Inet6, "2001:db8::1", 128);
    assert_eq!(s.address_range.first_address, "2001:db8::1");
    assert_eq!(s.address_range.last_address, "2001:db8::1");
    assert_eq!(s.host_count, "1");
}

#[test]
fn test_inet_slash_1_summary() {
    let s = summary(AddressFamily::Inet, "0.0.0.0", 1);
    assert_eq!(s.address_range.first_address, "0.0.0.0");
    assert_eq!(s.address_range.last_address, "127.255.255.255");
    assert_eq!(s.host_count, "2147483648");
    assert_eq!(s.network_mask, "128.0.0.0");
}

#[test]
fn test_inet6_large_host_count_is_exact() {
    let s = summary(AddressFamily::Inet6, "2001:db8::", 1);
    assert_eq!(s.host_count, "170141183460469231731687303715884105728");

    let s = summary(AddressFamily::Inet6, "2001:db8::", 64);
    assert_eq!(s.host_count, "18446744073709551616");
}

#[test]
fn test_negative_scenarios() {
    assert!(matches!(
        compute_block(AddressFamily::Inet, "192.168.1.1", 33),
        Err(SubcalcError::InvalidPrefix(_))
    ));
    assert!(matches!(
        compute_block(AddressFamily::Inet, "999.1.1.1", 24),
        Err(SubcalcError::InvalidAddress(_))
    ));
    assert!(matches!(
        "inet7".parse::<AddressFamily>(),
        Err(SubcalcError::InvalidPath(_))
    ));
    assert!(matches!(
        compute_block(AddressFamily::Inet6, "2001:db8::", 129),
        Err(SubcalcError::InvalidPrefix(_))
    ));
}

#[test]
fn test_host_bits_are_discarded() {
    let s = summary(AddressFamily::Inet, "10.0.0.5", 8);
    assert_eq!(s.address_range.first_address, "10.0.0.0");
    assert_eq!(s.address_range.last_address, "10.255.255.255");
}
