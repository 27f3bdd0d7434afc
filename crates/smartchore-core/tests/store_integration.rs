//! SQLite store and daily planner against an on-disk database.

use chrono::{NaiveDate, NaiveDateTime};
use smartchore_core::{
    ChoreCatalog, DailyPlanner, FixedClock, Member, OutOfHomeEvent, SkillCategory, SqliteStore,
    Store,
};
use tempfile::TempDir;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn at(h: u32) -> NaiveDateTime {
    date().and_hms_opt(h, 0, 0).unwrap()
}

fn seeded(dir: &TempDir) -> SqliteStore {
    let store = SqliteStore::open_at(&dir.path().join("smartchore.db")).unwrap();
    store
        .add_member(&Member::new("a", "Alice").with_skill(SkillCategory::Cooking, 9))
        .unwrap();
    store
        .add_member(&Member::new("b", "Bob").with_skill(SkillCategory::Cleaning, 8))
        .unwrap();
    store.add_member(&Member::new("c", "Cleo")).unwrap();
    store
}

#[tokio::test]
async fn runs_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let planner = DailyPlanner::new(ChoreCatalog::household_default());
    let run = {
        let store = seeded(&dir);
        planner
            .plan(&store, &FixedClock::on(date()), None)
            .await
            .unwrap()
    };

    let store = SqliteStore::open_at(&dir.path().join("smartchore.db")).unwrap();
    let history = store.history(5).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].date, date());
    assert_eq!(history[0].assignment_count as usize, run.result.assignments.len());

    let loaded = store.load_run(&run.run_id.to_string()).unwrap().unwrap();
    assert_eq!(loaded.run_id, run.run_id);
    assert_eq!(loaded.generated_at, run.generated_at);
    assert_eq!(loaded.result.assignments.len(), run.result.assignments.len());
    for (a, b) in loaded.result.assignments.iter().zip(&run.result.assignments) {
        assert_eq!(a.member_id, b.member_id);
        assert_eq!(a.reason, b.reason);
    }
    assert!(store.load_run("missing").unwrap().is_none());
}

#[tokio::test]
async fn away_member_gets_nothing() {
    let dir = TempDir::new().unwrap();
    let store = seeded(&dir);
    store
        .add_event(&OutOfHomeEvent::new("c", "Conference", at(0), at(23)).unwrap())
        .unwrap();

    let run = DailyPlanner::new(ChoreCatalog::household_default())
        .plan(&store, &FixedClock::on(date()), None)
        .await
        .unwrap();

    assert!(run.result.assignments_for_member("c").next().is_none());
    assert!((run.result.availability_rate - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn removing_a_member_clears_future_pending_work_only() {
    let dir = TempDir::new().unwrap();
    let store = seeded(&dir);
    let planner = DailyPlanner::new(ChoreCatalog::household_default());
    let earlier = date().pred_opt().unwrap();

    planner
        .plan(&store, &FixedClock::on(earlier), None)
        .await
        .unwrap();
    let today = planner
        .plan(&store, &FixedClock::on(date()), None)
        .await
        .unwrap();
    let held_today = today.result.assignments_for_member("a").count();
    let held_earlier = store
        .load_instances(earlier)
        .unwrap()
        .iter()
        .filter(|c| c.assignee.as_deref() == Some("a"))
        .count();

    let cleared = store.remove_member("a", date()).unwrap();
    assert_eq!(cleared, held_today);

    assert!(store.load_roster().unwrap().iter().all(|m| m.id != "a"));
    let still_earlier = store
        .load_instances(earlier)
        .unwrap()
        .iter()
        .filter(|c| c.assignee.as_deref() == Some("a"))
        .count();
    assert_eq!(still_earlier, held_earlier);

    // Replanning hands the cleared chores to the remaining members
    let replanned = planner
        .plan(&store, &FixedClock::on(date()), None)
        .await
        .unwrap();
    assert!(replanned
        .result
        .assignments
        .iter()
        .all(|a| a.member_id == "b" || a.member_id == "c"));
}

#[test]
fn removing_unknown_member_fails() {
    let dir = TempDir::new().unwrap();
    let store = seeded(&dir);
    assert!(store.remove_member("zed", date()).is_err());
}
