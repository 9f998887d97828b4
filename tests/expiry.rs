//! Expiry inspection without full validation

use jwt_bearer::*;
use std::sync::Arc;

const NOW: i64 = 1_700_000_000;

fn setup(expires_at: &str) -> (JwtService, Arc<FrozenClock>) {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = JwtService::new(&JwtConfig::default().expires_at(expires_at))
        .unwrap()
        .with_clock(clock.clone());
    (service, clock)
}

#[test]
fn test_one_second_expiry() {
    let (service, clock) = setup("+1 second");
    let token = service.encode("x", None).unwrap();

    assert!(!service.is_expired(&token));
    let remaining = service.time_to_expiry(&token).unwrap();
    assert!(remaining <= 1);

    clock.advance(2);
    assert!(service.is_expired(&token));
    assert_eq!(service.time_to_expiry(&token), Some(0));
}

#[test]
fn test_expiry_boundary_is_exclusive() {
    let (service, clock) = setup("+10 seconds");
    let token = service.encode("x", None).unwrap();

    clock.advance(9);
    assert!(!service.is_expired(&token));
    assert_eq!(service.time_to_expiry(&token), Some(1));

    clock.advance(1);
    assert!(service.is_expired(&token));
    assert_eq!(service.time_to_expiry(&token), Some(0));
}

#[test]
fn test_expiry_ignores_signature() {
    let (issuer, _) = setup("+1 hour");
    let token = issuer.encode("x", None).unwrap();

    let other = JwtService::new(
        &JwtConfig::default().signing_key(SigningKey::generate(32).unwrap()),
    )
    .unwrap()
    .with_clock(Arc::new(FrozenClock::at(NOW)));

    assert!(!other.is_valid(&token));
    assert!(!other.is_expired(&token));
    assert_eq!(other.time_to_expiry(&token), Some(3_600));
}

#[test]
fn test_leeway_applies_to_validation_only() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = JwtService::new(&JwtConfig::default().expires_at("+1 minute").leeway(30))
        .unwrap()
        .with_clock(clock.clone());
    let token = service.encode("x", None).unwrap();

    clock.advance(75);
    assert!(service.is_expired(&token));
    assert!(service.is_valid(&token));

    clock.advance(15);
    assert!(!service.is_valid(&token));
}

#[test]
fn test_negative_expiry_offset() {
    let (service, _) = setup("-1 minute");
    let token = service.encode("x", None).unwrap();
    assert!(service.is_expired(&token));
    assert_eq!(service.time_to_expiry(&token), Some(0));
    assert!(!service.is_valid(&token));
}

#[test]
fn test_garbage_counts_as_expired() {
    let (service, _) = setup("+1 hour");
    assert!(service.is_expired("garbage"));
    assert_eq!(service.time_to_expiry("garbage"), None);
}
