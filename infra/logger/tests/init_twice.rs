use kissj_logger::{LevelFilter, Logger, LoggerError};
use serial_test::serial;

#[test]
#[serial]
fn init_twice_returns_subscriber_error_and_reuse_attaches() {
    let first = Logger::builder()
        .name("KISSJ")
        .level(LevelFilter::INFO)
        .uid("abc1234")
        .init()
        .expect("first init should succeed");
    assert!(first.owns_subscriber());
    assert_eq!(first.uid(), "abc1234");

    let err = Logger::builder()
        .name("KISSJ")
        .level(LevelFilter::INFO)
        .init()
        .expect_err("second init should fail");
    assert!(
        matches!(err, LoggerError::Subscriber { .. }),
        "expected subscriber error for second init"
    );

    let reused = Logger::builder().name("KISSJ").init_or_reuse().expect("reuse should succeed");
    assert!(!reused.owns_subscriber());
    assert_ne!(reused.uid(), first.uid());
}
