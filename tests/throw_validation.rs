use dartmatch::throw::{BULL, InvalidHitError, Throw};

#[test]
fn board_geometry_is_enforced() {
    assert_eq!(Throw::new(20, 0), Err(InvalidHitError::Multiplier(0)));
    assert_eq!(Throw::new(20, 4), Err(InvalidHitError::Multiplier(4)));
    assert_eq!(Throw::new(0, 1), Err(InvalidHitError::Sector(0)));
    assert_eq!(Throw::new(21, 1), Err(InvalidHitError::Sector(21)));
    assert_eq!(Throw::new(26, 2), Err(InvalidHitError::Sector(26)));
    assert_eq!(Throw::new(BULL, 3), Err(InvalidHitError::TripleBull));
}

#[test]
fn points_and_double_flag_are_derived() {
    let t = Throw::new(20, 3).expect("triple twenty");
    assert_eq!(t.points(), 60);
    assert!(!t.is_double());

    let d = Throw::new(BULL, 2).expect("double bull");
    assert_eq!(d.points(), 50);
    assert!(d.is_double());
    assert_eq!(d.sector(), 25);
    assert_eq!(d.multiplier(), 2);
}

#[test]
fn deserialization_refuses_impossible_hits() {
    let valid: Throw =
        serde_json::from_str(r#"{"sector":19,"multiplier":3}"#).expect("valid hit");
    assert_eq!(valid.points(), 57);

    assert!(serde_json::from_str::<Throw>(r#"{"sector":21,"multiplier":1}"#).is_err());
    assert!(serde_json::from_str::<Throw>(r#"{"sector":20,"multiplier":4}"#).is_err());
    assert!(serde_json::from_str::<Throw>(r#"{"sector":25,"multiplier":3}"#).is_err());
}

#[test]
fn serialization_round_trips() {
    let t = Throw::new(18, 2).expect("double eighteen");
    let json = serde_json::to_string(&t).expect("encode");
    let back: Throw = serde_json::from_str(&json).expect("decode");
    assert_eq!(back, t);
}
