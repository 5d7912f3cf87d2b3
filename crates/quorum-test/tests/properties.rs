//! End-to-end checks of the public timestamp and text contracts

use std::cmp::Ordering;
use std::sync::Arc;

use quorum_text::{
    bytes_to_hex, cyclic_next, parse_boolean, split_trimmed, weak_intern, TextError,
};
use quorum_time::{ManualClock, Timestamp};

#[test]
fn wrapped_timestamp_is_later() {
    let x = Timestamp::from_nanos(i64::MAX - 1);
    let y = Timestamp::from_nanos(i64::MIN + 1);

    // Raw comparison disagrees with chronology
    assert!(y.as_nanos() < x.as_nanos());
    assert_eq!(Timestamp::compare(&x, &y), Ordering::Less);
    assert!(std::ptr::eq(Timestamp::latest(&x, &y), &y));
    assert!(std::ptr::eq(Timestamp::latest(&y, &x), &y));
}

#[test]
fn deadline_counts_down_through_overflow() {
    let clock = ManualClock::near_overflow(0);
    let deadline = Timestamp::now_from(&clock).plus_millis(1000);
    assert_eq!(deadline.elapsed_millis_from(&clock), -1000);

    clock.advance_millis(600);
    assert_eq!(deadline.elapsed_millis_from(&clock), -400);

    clock.advance_millis(500);
    assert_eq!(deadline.elapsed_millis_from(&clock), 100);
}

#[test]
fn timestamps_are_shareable_across_threads() {
    let start = Timestamp::now();
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(move || Timestamp::now() >= start))
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn text_helpers_contract() {
    assert_eq!(split_trimmed(Some("  a , b,c  ")), vec!["a", "b", "c"]);
    assert_eq!(split_trimmed(Some("a,,b")), vec!["a", "", "b"]);
    assert!(split_trimmed(None).is_empty());

    assert_eq!(bytes_to_hex(Some(&[0x00, 0xFF, 0x1A][..])).unwrap(), "00ff1a");
    assert_eq!(
        bytes_to_hex(None),
        Err(TextError::InvalidArgument("bytes must not be absent".into()))
    );

    assert!(parse_boolean(Some("TRUE"), false));
    assert!(parse_boolean(Some("no"), true));
    assert!(!parse_boolean(None, false));

    let peers = vec!["n1", "n2", "n3"];
    assert_eq!(*cyclic_next(&"n3", &peers).unwrap(), "n1");
    assert!(cyclic_next(&"n1", &Vec::<&str>::new()).is_err());
}

#[test]
fn weak_intern_shares_live_instance() {
    let held = weak_intern(Some(Arc::from("properties-peer-7"))).unwrap();
    let again = weak_intern(Some(Arc::from(String::from("properties-peer-7")))).unwrap();

    assert!(Arc::ptr_eq(&held, &again));
}
