use chrono::NaiveDate;
use planbook_core::{Category, DomainError, Goal, Project, Task, TaskStatus, User};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn constructors_leave_id_unassigned_and_apply_defaults() {
    let category = Category::new("work");
    assert_eq!(category.id, None);
    assert_eq!(category.color, None);

    let project = Project::new("garden");
    assert_eq!(project.description, None);
    assert_eq!(project.category_id, None);

    let task = Task::new("prune roses");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, 0);
    assert_eq!(task.due_date, None);
    assert_eq!(task.recurrence, None);

    let goal = Goal::new("read 12 books", date(2024, 1, 1), date(2024, 12, 31));
    assert_eq!(goal.progress, 0);

    let user = User::new("Sam", "sam@example.com");
    assert_eq!(user.id, None);
}

#[test]
fn goal_progress_bounds_are_inclusive() {
    let start = date(2024, 1, 1);
    let end = date(2024, 3, 31);

    assert_eq!(Goal::new("g", start, end).with_progress(0).unwrap().progress, 0);
    assert_eq!(
        Goal::new("g", start, end).with_progress(100).unwrap().progress,
        100
    );

    for value in [-1, 101] {
        let err = Goal::new("g", start, end).with_progress(value).unwrap_err();
        assert_eq!(err, DomainError::ProgressOutOfRange { value });
    }
}

#[test]
fn rejected_progress_leaves_goal_unchanged() {
    let mut goal = Goal::new("g", date(2024, 1, 1), date(2024, 1, 31))
        .with_progress(40)
        .unwrap();

    assert!(goal.set_progress(250).is_err());
    assert_eq!(goal.progress, 40);
}

#[test]
fn validate_catches_directly_assigned_progress() {
    let mut goal = Goal::new("g", date(2024, 1, 1), date(2024, 1, 31));
    goal.progress = 101;

    assert_eq!(
        goal.validate().unwrap_err(),
        DomainError::ProgressOutOfRange { value: 101 }
    );
}

#[test]
fn goal_activity_window_is_inclusive() {
    let goal = Goal::new("q1", date(2024, 1, 1), date(2024, 3, 31));

    assert!(goal.is_active_on(date(2024, 1, 1)));
    assert!(goal.is_active_on(date(2024, 3, 31)));
    assert!(!goal.is_active_on(date(2024, 4, 1)));
}

#[test]
fn unknown_task_status_is_a_domain_error() {
    let err = "archived".parse::<TaskStatus>().unwrap_err();
    assert_eq!(err, DomainError::UnknownTaskStatus("archived".to_string()));

    let err = Task::new("t").with_status_str("archived").unwrap_err();
    assert!(matches!(err, DomainError::UnknownTaskStatus(_)));

    let task = Task::new("t").with_status_str("completed").unwrap();
    assert_eq!(task.status, TaskStatus::Completed);
}

#[test]
fn task_serialization_uses_snake_case_status_and_iso_dates() {
    let task = Task::new("file taxes")
        .due_on(date(2024, 4, 15))
        .with_status(TaskStatus::InProgress)
        .with_priority(3);

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["status"], "in_progress");
    assert_eq!(json["due_date"], "2024-04-15");
    assert_eq!(json["priority"], 3);
    assert_eq!(json["id"], serde_json::Value::Null);

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn deserialize_rejects_out_of_range_goal_progress() {
    let value = serde_json::json!({
        "id": null,
        "title": "bad goal",
        "start_date": "2024-01-01",
        "end_date": "2024-02-01",
        "progress": 150,
        "category_id": null
    });

    let err = serde_json::from_value::<Goal>(value).unwrap_err();
    assert!(
        err.to_string().contains("goal progress 150 is outside 0..=100"),
        "unexpected error: {err}"
    );
}

#[test]
fn deserialize_rejects_unknown_task_status() {
    let value = serde_json::json!({
        "id": null,
        "title": "t",
        "due_date": null,
        "category_id": null,
        "status": "archived",
        "recurrence": null,
        "priority": 0,
        "project_id": null
    });

    assert!(serde_json::from_value::<Task>(value).is_err());
}
