use chrono::NaiveDate;
use planbook_core::db::open_db_in_memory;
use planbook_core::{
    Category, CategoryRepository, ErrorKind, Goal, GoalRepository, Project, ProjectRepository,
    RepoError, SqliteCategoryRepository, SqliteGoalRepository, SqliteProjectRepository,
    SqliteTaskRepository, Task, TaskRepository,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn deleting_category_detaches_projects_tasks_and_goals() {
    let conn = open_db_in_memory().unwrap();
    let categories = SqliteCategoryRepository::try_new(&conn).unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();

    let category = categories.create_category(&Category::new("garden")).unwrap();
    let project = projects
        .create_project(&Project::new("beds").in_category(category))
        .unwrap();
    let task = tasks
        .create_task(&Task::new("weed").in_category(category))
        .unwrap();
    let goal = goals
        .create_goal(
            &Goal::new("harvest", date(2024, 4, 1), date(2024, 9, 30)).in_category(category),
        )
        .unwrap();

    categories.delete_category(category).unwrap();

    assert!(categories.get_category(category).unwrap().is_none());
    assert_eq!(projects.get_project(project).unwrap().unwrap().category_id, None);
    assert_eq!(tasks.get_task(task).unwrap().unwrap().category_id, None);
    assert_eq!(goals.get_goal(goal).unwrap().unwrap().category_id, None);
    assert!(tasks.tasks_for_category(category).unwrap().is_empty());
}

#[test]
fn deleting_project_with_tasks_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let project = projects.create_project(&Project::new("launch")).unwrap();
    let task = tasks
        .create_task(&Task::new("write post").in_project(project))
        .unwrap();

    let err = projects.delete_project(project).unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation { table: "project" }));
    assert_eq!(err.kind(), ErrorKind::ReferentialIntegrity);
    assert!(projects.get_project(project).unwrap().is_some());

    tasks.delete_task(task).unwrap();
    projects.delete_project(project).unwrap();
    assert!(projects.get_project(project).unwrap().is_none());
}

#[test]
fn dangling_foreign_keys_are_rejected_on_write() {
    let conn = open_db_in_memory().unwrap();
    let projects = SqliteProjectRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let goals = SqliteGoalRepository::try_new(&conn).unwrap();

    let err = tasks
        .create_task(&Task::new("orphan").in_category(404))
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation { table: "task" }));

    let err = tasks
        .create_task(&Task::new("orphan").in_project(404))
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation { table: "task" }));

    let err = projects
        .create_project(&Project::new("orphan").in_category(404))
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation { table: "project" }));

    let err = goals
        .create_goal(&Goal::new("orphan", date(2024, 1, 1), date(2024, 1, 2)).in_category(404))
        .unwrap_err();
    assert!(matches!(err, RepoError::ForeignKeyViolation { table: "goal" }));
}

#[test]
fn updating_to_dangling_reference_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let id = tasks.create_task(&Task::new("t")).unwrap();
    let mut task = tasks.get_task(id).unwrap().unwrap();
    task.project_id = Some(77);

    assert!(matches!(
        tasks.update_task(&task).unwrap_err(),
        RepoError::ForeignKeyViolation { .. }
    ));
    assert_eq!(tasks.get_task(id).unwrap().unwrap().project_id, None);
}

#[test]
fn primary_keys_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let first = tasks.create_task(&Task::new("a")).unwrap();
    tasks.delete_task(first).unwrap();
    let second = tasks.create_task(&Task::new("b")).unwrap();

    assert!(second > first);
}
