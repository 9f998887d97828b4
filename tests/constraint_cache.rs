//! Constraint cache behavior observed through the service

use jwt_bearer::*;
use std::sync::Arc;
use std::thread;

const NOW: i64 = 1_700_000_000;

fn service(config: &JwtConfig, clock: &Arc<FrozenClock>) -> JwtService {
    JwtService::new(config).unwrap().with_clock(clock.clone())
}

#[test]
fn test_repeated_decodes_build_once() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = service(&JwtConfig::default(), &clock);
    let token = service.encode("x", None).unwrap();

    for _ in 0..10 {
        assert!(service.decode(&token).is_ok());
        assert!(service.is_valid(&token));
    }
    assert_eq!(service.constraint_builds(), 1);
}

#[test]
fn test_cached_constraints_use_current_time() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = service(&JwtConfig::default().expires_at("+5 minutes"), &clock);
    let token = service.encode("x", None).unwrap();

    assert!(service.is_valid(&token));

    clock.advance(299);
    assert!(service.is_valid(&token));

    clock.advance(1);
    let err = service.decode(&token).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.names(), vec![ConstraintName::ValidAt]);
    assert_eq!(
        violations.iter().next().unwrap().reason,
        "The token is expired"
    );

    assert_eq!(service.constraint_builds(), 1);
}

#[test]
fn test_cached_constraints_see_not_before_pass() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = service(&JwtConfig::default(), &clock);
    let token = service.encode("x", None).unwrap();

    // the cache is populated while the token is still in the future
    clock.set(NOW - 10);
    assert!(!service.is_valid(&token));

    clock.set(NOW);
    assert!(service.is_valid(&token));
    assert_eq!(service.constraint_builds(), 1);
}

#[test]
fn test_clear_cache_rebuilds() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = service(&JwtConfig::default(), &clock);
    let token = service.encode("x", None).unwrap();

    assert!(service.is_valid(&token));
    service.clear_cache();
    assert!(service.is_valid(&token));
    service.clear_cache();
    service.clear_cache();
    assert!(service.is_valid(&token));

    assert_eq!(service.constraint_builds(), 3);
}

#[test]
fn test_reconfigure_uses_new_expectations() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let mut service = service(&JwtConfig::default(), &clock);
    let token = service.encode("x", None).unwrap();
    assert!(service.is_valid(&token));

    service
        .reconfigure(&JwtConfig::default().identifier("rotated").throw_on_failure(false))
        .unwrap();
    let decoded = service.decode(&token).unwrap();
    assert_eq!(
        decoded.violations().unwrap().names(),
        vec![ConstraintName::IdentifiedBy]
    );
}

#[test]
fn test_shared_service_across_threads() {
    let clock = Arc::new(FrozenClock::at(NOW));
    let service = Arc::new(service(&JwtConfig::default(), &clock));
    let token = Arc::new(service.encode("x", Some("shared")).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let token = Arc::clone(&token);
            thread::spawn(move || {
                (0..50).all(|_| service.is_valid(&token))
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(service.constraint_builds(), 1);
}
