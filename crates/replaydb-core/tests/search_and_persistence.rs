use replaydb_core::{Filter, NewReplay, ReplayDb};

fn insert(db: &mut ReplayDb, id: &str, date: u64, ranked: bool, result: &str, cards0: &[u32], cards1: &[u32]) {
    db.set_replay(NewReplay {
        id,
        date,
        ranked,
        mode: "standard",
        source: "client",
        result,
        cards0,
        cards1,
        result_desc: "",
        title: "",
        link: "",
        deck0: "",
        deck1: "",
        region: "na",
        author_link: "",
        author_name: "",
    })
    .unwrap();
}

#[test]
fn overlap_search_ranks_closer_decks_first() {
    let mut db = ReplayDb::new("tcg", 128);
    insert(&mut db, "low", 1, true, "win", &[1], &[]);
    insert(&mut db, "high", 2, true, "win", &[1, 2, 3, 4], &[]);

    let filter = Filter::new();
    let result = db.search(0, 10, &[1, 2, 3], &[], &filter).unwrap();

    assert_eq!(result.replays[0].id, "high");
    assert_eq!(result.replays[1].id, "low");
}

#[test]
fn only_wins_excludes_losses() {
    let mut db = ReplayDb::new("tcg", 32);
    insert(&mut db, "w1", 1, true, "win", &[1], &[]);
    insert(&mut db, "l1", 2, true, "loss", &[1], &[]);

    let mut filter = Filter::new();
    filter.only_wins = true;
    let result = db.search(0, 10, &[1], &[], &filter).unwrap();

    assert_eq!(result.replays.len(), 1);
    assert_eq!(result.replays[0].id, "w1");
}

#[test]
fn flipped_orientation_still_matches_best_side() {
    let mut db = ReplayDb::new("tcg", 32);
    insert(&mut db, "swapped", 1, true, "win", &[9], &[1, 2, 3]);

    let filter = Filter::new();
    let result = db.search(0, 10, &[1, 2, 3], &[], &filter).unwrap();

    assert_eq!(result.replays.len(), 1);
    assert!(result.replays[0].flipped);
    assert_eq!(result.replays[0].match1, 3);
}

#[test]
fn only_wins_under_flip_matches_recorded_losses() {
    let mut db = ReplayDb::new("tcg", 32);
    insert(&mut db, "win-swapped", 1, true, "win", &[9], &[1, 2, 3]);
    insert(&mut db, "loss-swapped", 2, true, "loss", &[9], &[1, 2, 3]);

    let mut filter = Filter::new();
    filter.only_wins = true;
    let result = db.search(0, 10, &[1, 2, 3], &[], &filter).unwrap();

    let flipped_loss = result
        .replays
        .iter()
        .find(|r| r.id == "loss-swapped")
        .expect("a loss recorded relative to side0 must still surface under only_wins via the flip");
    assert!(flipped_loss.flipped);
}

#[test]
fn from_player_excludes_rows_that_only_match_flipped() {
    let mut db = ReplayDb::new("tcg", 32);
    insert(&mut db, "swapped", 1, true, "win", &[9], &[1, 2, 3]);

    let mut filter = Filter::new();
    filter.from_opponent = false;
    let result = db.search(0, 10, &[1, 2, 3], &[], &filter).unwrap();

    assert_eq!(result.replays.len(), 1);
    assert!(!result.replays[0].flipped);
}

#[test]
fn contradictory_from_player_and_from_opponent_returns_none() {
    let db = ReplayDb::new("tcg", 32);
    let mut filter = Filter::new();
    filter.from_player = false;
    filter.from_opponent = false;

    assert!(db.search(0, 10, &[1], &[], &filter).is_none());
}

#[test]
fn persistence_round_trip_preserves_dictionaries_and_rows() {
    let mut db = ReplayDb::new("tcg", 64);
    insert(&mut db, "a", 10, true, "win", &[1, 2], &[3]);
    insert(&mut db, "b", 20, false, "loss", &[4], &[5]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.rrdb");
    db.save(&path).unwrap();

    let loaded = ReplayDb::load("tcg", 64, &path).unwrap();
    assert_eq!(loaded.get_replay_count(), 2);

    let a = loaded.get_replay_by_id("a").unwrap();
    assert_eq!(a.result, "win");
    assert_eq!(a.mode, "standard");

    let b = loaded.get_replay_by_id("b").unwrap();
    assert!(!b.ranked);
}

#[test]
fn archive_rejects_mismatched_card_count_on_load() {
    let db = ReplayDb::new("tcg", 40);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.rrdb");
    db.save(&path).unwrap();

    let result = ReplayDb::load("tcg", 41, &path);
    assert!(result.is_err());
}
