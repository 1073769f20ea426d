use chrono::NaiveDate;
use planbook_core::db::open_db_in_memory;
use planbook_core::{
    Category, CategoryRepository, DomainError, ErrorKind, Goal, GoalListQuery, GoalRepository,
    RepoError, SqliteCategoryRepository, SqliteGoalRepository,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn goal_roundtrip_by_primary_key_is_identical() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let goal = Goal::new("run a half marathon", date(2024, 1, 1), date(2024, 3, 31))
        .with_progress(50)
        .unwrap();
    let id = repo.create_goal(&goal).unwrap();

    let loaded = repo.get_goal(id).unwrap().unwrap();
    assert_eq!(loaded.id, Some(id));
    assert_eq!(loaded.title, "run a half marathon");
    assert_eq!(loaded.start_date, date(2024, 1, 1));
    assert_eq!(loaded.end_date, date(2024, 3, 31));
    assert_eq!(loaded.progress, 50);
    assert_eq!(loaded.category_id, None);
}

#[test]
fn progress_outside_range_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    for value in [-1, 101] {
        let mut goal = Goal::new("g", date(2024, 1, 1), date(2024, 1, 31));
        goal.progress = value;

        let err = repo.create_goal(&goal).unwrap_err();
        assert!(matches!(
            err,
            RepoError::Domain(DomainError::ProgressOutOfRange { value: v }) if v == value
        ));
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    for value in [0, 100] {
        let goal = Goal::new("g", date(2024, 1, 1), date(2024, 1, 31))
            .with_progress(value)
            .unwrap();
        repo.create_goal(&goal).unwrap();
    }
    assert_eq!(repo.list_goals(&GoalListQuery::default()).unwrap().len(), 2);
}

#[test]
fn update_with_invalid_progress_keeps_stored_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let id = repo
        .create_goal(
            &Goal::new("g", date(2024, 1, 1), date(2024, 1, 31))
                .with_progress(30)
                .unwrap(),
        )
        .unwrap();

    let mut goal = repo.get_goal(id).unwrap().unwrap();
    goal.progress = 101;
    assert!(matches!(
        repo.update_goal(&goal).unwrap_err(),
        RepoError::Domain(_)
    ));
    assert_eq!(repo.get_goal(id).unwrap().unwrap().progress, 30);

    goal.progress = 100;
    repo.update_goal(&goal).unwrap();
    assert_eq!(repo.get_goal(id).unwrap().unwrap().progress, 100);
}

#[test]
fn goals_active_on_uses_inclusive_window() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let q1 = repo
        .create_goal(&Goal::new("q1", date(2024, 1, 1), date(2024, 3, 31)))
        .unwrap();
    let q2 = repo
        .create_goal(&Goal::new("q2", date(2024, 4, 1), date(2024, 6, 30)))
        .unwrap();

    let on_boundary: Vec<_> = repo
        .goals_active_on(date(2024, 3, 31))
        .unwrap()
        .into_iter()
        .filter_map(|goal| goal.id)
        .collect();
    assert_eq!(on_boundary, [q1]);

    let next_day: Vec<_> = repo
        .goals_active_on(date(2024, 4, 1))
        .unwrap()
        .into_iter()
        .filter_map(|goal| goal.id)
        .collect();
    assert_eq!(next_day, [q2]);
}

#[test]
fn list_filters_by_start_and_end_ranges() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let jan = repo
        .create_goal(&Goal::new("jan", date(2024, 1, 1), date(2024, 1, 31)))
        .unwrap();
    let feb = repo
        .create_goal(&Goal::new("feb", date(2024, 2, 1), date(2024, 2, 29)))
        .unwrap();
    let year = repo
        .create_goal(&Goal::new("year", date(2024, 1, 1), date(2024, 12, 31)))
        .unwrap();

    let starts_in_january: Vec<_> = repo
        .list_goals(&GoalListQuery {
            starts_from: Some(date(2024, 1, 1)),
            starts_to: Some(date(2024, 1, 31)),
            ..GoalListQuery::default()
        })
        .unwrap()
        .into_iter()
        .filter_map(|goal| goal.id)
        .collect();
    assert_eq!(starts_in_january, [jan, year]);

    let ends_by_february: Vec<_> = repo
        .list_goals(&GoalListQuery {
            ends_to: Some(date(2024, 2, 29)),
            ..GoalListQuery::default()
        })
        .unwrap()
        .into_iter()
        .filter_map(|goal| goal.id)
        .collect();
    assert_eq!(ends_by_february, [jan, feb]);

    let ends_late: Vec<_> = repo
        .list_goals(&GoalListQuery {
            ends_from: Some(date(2024, 3, 1)),
            ..GoalListQuery::default()
        })
        .unwrap()
        .into_iter()
        .filter_map(|goal| goal.id)
        .collect();
    assert_eq!(ends_late, [year]);
}

#[test]
fn goals_for_category_navigates_relationship() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let fitness = categories.create_category(&Category::new("fitness")).unwrap();
    let linked = repo
        .create_goal(&Goal::new("10k", date(2024, 1, 1), date(2024, 6, 1)).in_category(fitness))
        .unwrap();
    repo.create_goal(&Goal::new("other", date(2024, 1, 1), date(2024, 6, 1)))
        .unwrap();

    let goals = repo.goals_for_category(fitness).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].id, Some(linked));
}

#[test]
fn end_before_start_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let id = repo
        .create_goal(&Goal::new("odd", date(2024, 5, 1), date(2024, 4, 1)))
        .unwrap();
    assert!(repo.get_goal(id).unwrap().is_some());
}

#[test]
fn goal_dates_beyond_year_9999_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteGoalRepository::try_new(&conn).unwrap();

    let err = repo
        .create_goal(&Goal::new("long haul", date(2024, 1, 1), date(10_000, 1, 1)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Domain(DomainError::DateOutOfRange { .. })
    ));
    assert!(repo.list_goals(&GoalListQuery::default()).unwrap().is_empty());
}
