use hashbrown::HashMap;

use dartmatch::{
    rules::{
        GameMode, Outcome, Progress, SettingsError,
        x01_sets::{X01Sets, X01SetsSettings},
    },
    score::{PlayerScore, SetsScore},
    throw::Throw,
    types::PlayerId,
};

fn throw(sector: u8, multiplier: u8) -> Throw {
    Throw::new(sector, multiplier).expect("valid throw")
}

fn entry(player_id: PlayerId, remaining: i32, legs: u32, sets: u32) -> PlayerScore {
    PlayerScore::Sets(SetsScore {
        player_id,
        remaining_in_leg: remaining,
        legs_won_in_set: legs,
        sets_won: sets,
    })
}

fn scores(a: PlayerScore, b: PlayerScore) -> HashMap<PlayerId, PlayerScore> {
    let mut map = HashMap::new();
    map.insert(a.player_id(), a);
    map.insert(b.player_id(), b);
    map
}

fn sets_mode(advantages: bool) -> X01Sets {
    let settings =
        X01SetsSettings::new(201, 3, 3, false, advantages, None).expect("settings");
    X01Sets::new(settings)
}

#[test]
fn settings_reject_out_of_range_values() {
    assert!(matches!(
        X01SetsSettings::new(501, 1, 3, false, false, None),
        Err(SettingsError::OutOfRange { name: "legs_to_win_set", .. })
    ));
    assert!(matches!(
        X01SetsSettings::new(501, 5, 3, false, false, None),
        Err(SettingsError::OutOfRange { name: "legs_to_win_set", .. })
    ));
    assert!(matches!(
        X01SetsSettings::new(501, 3, 2, false, false, None),
        Err(SettingsError::OutOfRange { name: "sets_to_win_match", .. })
    ));
    assert!(matches!(
        X01SetsSettings::new(501, 3, 8, false, false, None),
        Err(SettingsError::OutOfRange { name: "sets_to_win_match", .. })
    ));
    assert_eq!(
        X01SetsSettings::new(501, 3, 3, false, true, Some(2)),
        Err(SettingsError::SuddenDeathTooLow { sudden_death: 2, threshold: 3 })
    );
}

#[test]
fn decider_cap_defaults_two_legs_above_set_threshold() {
    let settings = X01SetsSettings::new(501, 3, 3, false, true, None).expect("settings");
    assert_eq!(settings.sudden_death_leg(), Some(5));
}

#[test]
fn overshoot_busts() {
    let mode = sets_mode(false);
    let eval = mode.evaluate_throw(1, &throw(20, 3), &scores(entry(1, 32, 0, 0), entry(2, 201, 0, 0)));
    assert_eq!(eval.outcome, Outcome::Bust);
    assert!(eval.updated_score.is_none());
}

#[test]
fn leg_win_inside_a_set_keeps_both_leg_counts() {
    let mode = sets_mode(false);
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 1, 0), entry(2, 57, 1, 0)));
    assert_eq!(eval.outcome, Outcome::Continue);
    assert_eq!(eval.progress, Progress::LegWon);

    let updated = eval.updated_score.expect("score").as_sets("thrower");
    assert_eq!(updated.remaining_in_leg, 201);
    assert_eq!(updated.legs_won_in_set, 2);
    assert_eq!(updated.sets_won, 0);

    let others = eval.other_updated.expect("opponent reset");
    let opponent = others[&2].as_sets("opponent");
    assert_eq!(opponent.remaining_in_leg, 201);
    assert_eq!(opponent.legs_won_in_set, 1);
}

#[test]
fn set_win_clears_leg_counts_on_both_sides() {
    let mode = sets_mode(false);
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 2, 0), entry(2, 57, 2, 0)));
    assert_eq!(eval.outcome, Outcome::Continue);
    assert_eq!(eval.progress, Progress::SetWon);

    let updated = eval.updated_score.expect("score").as_sets("thrower");
    assert_eq!(updated.legs_won_in_set, 0);
    assert_eq!(updated.sets_won, 1);

    let others = eval.other_updated.expect("opponent reset");
    let opponent = others[&2].as_sets("opponent");
    assert_eq!(opponent.legs_won_in_set, 0);
    assert_eq!(opponent.sets_won, 0);
}

#[test]
fn final_set_wins_the_match_without_touching_the_opponent() {
    let mode = sets_mode(false);
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 2, 2), entry(2, 57, 0, 1)));
    assert_eq!(eval.outcome, Outcome::Win);
    assert!(eval.other_updated.is_none());

    let updated = eval.updated_score.expect("score").as_sets("winner");
    assert_eq!(updated.sets_won, 3);
    assert_eq!(updated.legs_won_in_set, 0);
}

#[test]
fn decider_set_requires_two_clear_legs() {
    let mode = sets_mode(true);

    // Both one set from the match; 2-2 going to 3-2 does not settle it.
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 2, 2), entry(2, 57, 2, 2)));
    assert_eq!(eval.outcome, Outcome::Continue);
    assert_eq!(eval.progress, Progress::LegWon);

    // 3-2 going to 4-2 is two clear, match over.
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 3, 2), entry(2, 57, 2, 2)));
    assert_eq!(eval.outcome, Outcome::Win);
    let updated = eval.updated_score.expect("score").as_sets("winner");
    assert_eq!(updated.sets_won, 3);
}

#[test]
fn decider_sudden_death_cap_ends_the_match() {
    let mode = sets_mode(true);

    // 4-4 going to 5-4 hits the cap.
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 4, 2), entry(2, 57, 4, 2)));
    assert_eq!(eval.outcome, Outcome::Win);
}

#[test]
fn outside_the_decider_ordinary_set_rules_apply() {
    let mode = sets_mode(true);

    // Advantage play configured, but the opponent is not at match point.
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(entry(1, 20, 2, 2), entry(2, 57, 2, 1)));
    assert_eq!(eval.outcome, Outcome::Win);
}
