//! End-to-end parameter selection on the current hardware.
//!
//! These tests run the real calibration, so they assert on invariants and
//! error kinds rather than on exact triples.

use scrypt_params_core::search::{pick_params, pick_params_with};
use scrypt_params_core::{
    usable_memory, CachedCalibration, FixedThroughput, ParamsError, ResourceBudget, MIN_MEMLIMIT,
};

#[test]
fn pick_params_succeeds_on_current_hardware() {
    let params = pick_params(0.1, 0, 0.0).expect("pick_params should succeed");
    assert!(params.n.is_power_of_two());
    assert!(params.n >= 2);
    assert!(params.r >= 1);
    assert!(params.p >= 1);

    let budget = ResourceBudget::new(0.1, 0, 0.0).unwrap();
    let memlimit = budget.memlimit(usable_memory().unwrap());
    assert!(params.memory_bytes() <= memlimit);
}

#[test]
fn minimum_time_budget_stays_within_one_mib() {
    // 10^6 cores/s * 1 ms = 1000 cores, raised to the 2^15 floor.
    let budget = ResourceBudget::new(0.001, 0, 0.0).unwrap();
    let slow = FixedThroughput::new(1_000_000.0).unwrap();
    let params = pick_params_with(&budget, &slow).expect("floor scenario should succeed");
    assert!(params.memory_bytes() <= MIN_MEMLIMIT);
    assert!(params.n.is_power_of_two());
}

#[test]
fn minimum_time_budget_with_real_calibration() {
    let params = pick_params(0.001, 0, 0.0).expect("floor scenario should succeed");
    let budget = ResourceBudget::new(0.001, 0, 0.0).unwrap();
    assert!(params.memory_bytes() <= budget.memlimit(usable_memory().unwrap()));
}

#[test]
fn tiny_maxmem_is_invalid_configuration() {
    let err = pick_params(5.0, 100, 0.0).expect_err("100 bytes cannot fit N = 2, r = 1");
    assert!(
        matches!(err, ParamsError::InvalidConfiguration(_)),
        "unexpected error: {err}"
    );
}

#[test]
fn zero_maxtime_is_invalid_argument() {
    let err = pick_params(0.0, 0, 0.0).expect_err("maxtime = 0 must be rejected");
    assert!(matches!(err, ParamsError::InvalidArgument(_)));
    assert_eq!(err.code(), 1);
}

#[test]
fn cached_calibration_gives_stable_results() {
    let cache = CachedCalibration::new();
    let budget = ResourceBudget::new(0.05, 1 << 24, 0.5).unwrap();
    let a = pick_params_with(&budget, &cache).unwrap();
    let b = pick_params_with(&budget, &cache).unwrap();
    assert_eq!(a, b);
}

#[test]
fn selected_params_are_hashable() {
    let budget = ResourceBudget::new(0.01, 1 << 22, 0.5).unwrap();
    let params = pick_params_with(&budget, &FixedThroughput::new(4_000_000.0).unwrap()).unwrap();
    let scrypt_params = params.to_scrypt_params(32).expect("selected params must be valid");

    let mut out = [0u8; 32];
    scrypt::scrypt(b"password", b"integration_salt", &scrypt_params, &mut out)
        .expect("scrypt should accept the selected params");
    assert!(out.iter().any(|&b| b != 0));
}

#[test]
fn concurrent_searches_are_independent() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| pick_params(0.01, 1 << 24, 0.5)))
        .collect();
    for handle in handles {
        let params = handle.join().unwrap().expect("search should succeed");
        assert!(params.memory_bytes() <= 1 << 24);
    }
}
