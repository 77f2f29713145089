use hashbrown::HashMap;

use dartmatch::{
    rules::{
        GameMode, Outcome, SettingsError,
        cricket::{Cricket, CricketSettings},
        cut_throat::CutThroatCricket,
    },
    score::{ClosingScore, PlayerScore, SCORING_SECTORS},
    throw::Throw,
    types::PlayerId,
};

fn throw(sector: u8, multiplier: u8) -> Throw {
    Throw::new(sector, multiplier).expect("valid throw")
}

fn closing(player_id: PlayerId, points: u32, hits: [u8; 7]) -> PlayerScore {
    PlayerScore::Closing(ClosingScore {
        player_id,
        points,
        hits,
    })
}

fn scores(entries: &[PlayerScore]) -> HashMap<PlayerId, PlayerScore> {
    entries.iter().map(|s| (s.player_id(), *s)).collect()
}

fn classic() -> Cricket {
    Cricket::new(CricketSettings::default())
}

fn cut_throat() -> CutThroatCricket {
    CutThroatCricket::new(CricketSettings::default())
}

#[test]
fn settings_reject_out_of_range_values() {
    assert!(matches!(
        CricketSettings::new(0, 3, true),
        Err(SettingsError::OutOfRange { name: "darts_per_turn", .. })
    ));
    assert!(matches!(
        CricketSettings::new(4, 3, true),
        Err(SettingsError::OutOfRange { name: "darts_per_turn", .. })
    ));
    assert!(matches!(
        CricketSettings::new(3, 0, true),
        Err(SettingsError::OutOfRange { name: "hits_to_close_sector", .. })
    ));
    assert!(matches!(
        CricketSettings::new(3, 6, true),
        Err(SettingsError::OutOfRange { name: "hits_to_close_sector", .. })
    ));
}

#[test]
fn non_scoring_sector_changes_nothing() {
    let mode = classic();
    let player = closing(1, 10, [1, 0, 0, 0, 0, 2, 0]);
    let eval = mode.evaluate_throw(1, &throw(10, 3), &scores(&[player, closing(2, 0, [0; 7])]));
    assert_eq!(eval.outcome, Outcome::Continue);
    assert_eq!(eval.updated_score, Some(player));
    assert!(eval.other_updated.is_none());
}

#[test]
fn triple_counts_three_hits_when_multipliers_are_on() {
    let mode = classic();
    let eval = mode.evaluate_throw(
        1,
        &throw(20, 3),
        &scores(&[closing(1, 0, [0; 7]), closing(2, 0, [0; 7])]),
    );
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert_eq!(updated.hits_on(20), 3);
    assert!(updated.is_closed(20, 3));
    assert_eq!(updated.points, 0);
}

#[test]
fn triple_counts_one_hit_when_multipliers_are_off() {
    let settings = CricketSettings::new(3, 3, false).expect("settings");
    let mode = Cricket::new(settings);
    let eval = mode.evaluate_throw(
        1,
        &throw(20, 3),
        &scores(&[closing(1, 0, [0; 7]), closing(2, 0, [0; 7])]),
    );
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert_eq!(updated.hits_on(20), 1);
}

#[test]
fn surplus_hits_score_against_an_open_opponent() {
    let mode = classic();
    // 20 sits at two hits; a triple closes it with two to spare.
    let player = closing(1, 0, [0, 0, 0, 0, 0, 2, 0]);
    let eval = mode.evaluate_throw(1, &throw(20, 3), &scores(&[player, closing(2, 0, [0; 7])]));
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert_eq!(updated.hits_on(20), 3);
    assert_eq!(updated.points, 40);
}

#[test]
fn surplus_hits_do_not_score_against_a_closed_opponent() {
    let mode = classic();
    let player = closing(1, 0, [0, 0, 0, 0, 0, 2, 0]);
    let opponent = closing(2, 0, [0, 0, 0, 0, 0, 3, 0]);
    let eval = mode.evaluate_throw(1, &throw(20, 3), &scores(&[player, opponent]));
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert_eq!(updated.hits_on(20), 3);
    assert_eq!(updated.points, 0);
}

#[test]
fn bull_has_no_triple_but_scores_as_a_sector() {
    let mode = classic();
    // Bull at two hits; the double closes it with one to spare.
    let player = closing(1, 0, [0, 0, 0, 0, 0, 0, 2]);
    let eval = mode.evaluate_throw(1, &throw(25, 2), &scores(&[player, closing(2, 0, [0; 7])]));
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert!(updated.is_closed(25, 3));
    assert_eq!(updated.points, 25);
}

#[test]
fn closing_everything_with_more_points_wins() {
    let mode = classic();
    let player = closing(1, 60, [3, 3, 3, 3, 3, 3, 2]);
    let opponent = closing(2, 20, [1, 1, 1, 0, 0, 0, 0]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, opponent]));
    assert_eq!(eval.outcome, Outcome::Win);
}

#[test]
fn closing_everything_level_beats_an_open_opponent() {
    let mode = classic();
    let player = closing(1, 20, [3, 3, 3, 3, 3, 3, 2]);
    let opponent = closing(2, 20, [1, 1, 1, 0, 0, 0, 0]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, opponent]));
    assert_eq!(eval.outcome, Outcome::Win);
}

#[test]
fn closing_everything_level_against_a_closed_opponent_is_a_tie() {
    let mode = classic();
    let player = closing(1, 20, [3, 3, 3, 3, 3, 3, 2]);
    let opponent = closing(2, 20, [3; 7]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, opponent]));
    assert_eq!(eval.outcome, Outcome::Tie);
}

#[test]
fn closing_everything_behind_on_points_keeps_the_game_going() {
    let mode = classic();
    let player = closing(1, 0, [3, 3, 3, 3, 3, 3, 2]);
    let opponent = closing(2, 55, [1, 1, 1, 0, 0, 0, 0]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, opponent]));
    assert_eq!(eval.outcome, Outcome::Continue);
}

#[test]
fn cut_throat_penalizes_only_open_opponents() {
    let mode = cut_throat();
    // Players 1 and 2 have 20 closed; player 3 sits at two hits.
    let a = closing(1, 0, [0, 0, 0, 0, 0, 3, 0]);
    let b = closing(2, 0, [0, 0, 0, 0, 0, 3, 0]);
    let c = closing(3, 0, [0, 0, 0, 0, 0, 2, 0]);
    let eval = mode.evaluate_throw(1, &throw(20, 1), &scores(&[a, b, c]));
    assert_eq!(eval.outcome, Outcome::Continue);

    let others = eval.other_updated.expect("penalized opponents");
    assert_eq!(others.len(), 1);
    let penalized = others[&3].as_closing("open opponent");
    assert_eq!(penalized.points, 20);
    assert_eq!(penalized.hits_on(20), 2);
}

#[test]
fn cut_throat_without_surplus_touches_nobody() {
    let mode = cut_throat();
    let eval = mode.evaluate_throw(
        1,
        &throw(20, 2),
        &scores(&[closing(1, 0, [0; 7]), closing(2, 0, [0; 7])]),
    );
    assert_eq!(eval.outcome, Outcome::Continue);
    assert!(eval.other_updated.is_none());
    let updated = eval.updated_score.expect("score").as_closing("thrower");
    assert_eq!(updated.hits_on(20), 2);
}

#[test]
fn cut_throat_lowest_penalty_wins_on_closing_everything() {
    let mode = cut_throat();
    let player = closing(1, 10, [3, 3, 3, 3, 3, 3, 2]);
    let open_rival = closing(2, 5, [1, 1, 1, 0, 0, 0, 0]);
    let closed_rival = closing(3, 40, [3; 7]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, open_rival, closed_rival]));
    // The open rival's low penalty does not block the win.
    assert_eq!(eval.outcome, Outcome::Win);
}

#[test]
fn cut_throat_closing_behind_a_better_closed_rival_keeps_the_game_going() {
    let mode = cut_throat();
    let player = closing(1, 40, [3, 3, 3, 3, 3, 3, 2]);
    let closed_rival = closing(2, 10, [3; 7]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, closed_rival]));
    assert_eq!(eval.outcome, Outcome::Continue);
}

#[test]
fn cut_throat_level_with_a_closed_rival_is_a_tie() {
    let mode = cut_throat();
    let player = closing(1, 40, [3, 3, 3, 3, 3, 3, 2]);
    let closed_rival = closing(2, 40, [3; 7]);
    let eval = mode.evaluate_throw(1, &throw(25, 1), &scores(&[player, closed_rival]));
    assert_eq!(eval.outcome, Outcome::Tie);
}

#[test]
fn hit_counts_never_exceed_the_closing_cap() {
    let mode = classic();
    for &sector in &SCORING_SECTORS {
        let multiplier = if sector == 25 { 2 } else { 3 };
        let player = closing(1, 0, [2; 7]);
        let eval = mode.evaluate_throw(
            1,
            &throw(sector, multiplier),
            &scores(&[player, closing(2, 0, [0; 7])]),
        );
        let updated = eval.updated_score.expect("score").as_closing("thrower");
        assert_eq!(updated.hits_on(sector), 3);
    }
}
