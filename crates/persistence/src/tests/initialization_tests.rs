// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use hourledger_domain::{Calendar, DayCode, HolidayCalendar, Project};
use time::macros::date;

use crate::{Holiday, Persistence, PersistenceError};

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    let project_id: i64 = first.create_project("Harbor Bridge").unwrap();

    assert!(first.get_project(project_id).unwrap().is_some());
    assert!(second.get_project(project_id).unwrap().is_none());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_file_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!(
        "hourledger_init_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    let project_id: i64 = {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        persistence.create_project("Harbor Bridge").unwrap()
    };

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let project: Project = reopened.get_project(project_id).unwrap().unwrap();
    assert_eq!(project.name, "Harbor Bridge");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_blank_names_are_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(matches!(
        persistence.create_project("  "),
        Err(PersistenceError::Rejected(_))
    ));
    assert!(matches!(
        persistence.create_person(""),
        Err(PersistenceError::Rejected(_))
    ));
    assert!(matches!(
        persistence.create_role("\t"),
        Err(PersistenceError::Rejected(_))
    ));
}

#[test]
fn test_holidays_feed_the_calendar() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let day: DayCode = DayCode::new(20_260_316).unwrap();

    persistence.add_holiday(day, "Founders Day").unwrap();

    let holidays: Vec<Holiday> = persistence.list_holidays().unwrap();
    assert_eq!(holidays.len(), 1);
    assert_eq!(holidays[0].day, day);
    assert_eq!(holidays[0].description, "Founders Day");

    let calendar: HolidayCalendar = persistence.calendar().unwrap();
    assert_eq!(calendar.holiday_count(), 1);
    assert!(!calendar.is_working_day(date!(2026 - 03 - 16)));

    assert!(persistence.remove_holiday(day).unwrap());
    assert!(!persistence.remove_holiday(day).unwrap());
    assert_eq!(persistence.calendar().unwrap().holiday_count(), 0);
}

#[test]
fn test_duplicate_holiday_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let day: DayCode = DayCode::new(20_261_225).unwrap();

    persistence.add_holiday(day, "Christmas").unwrap();
    assert!(persistence.add_holiday(day, "Christmas again").is_err());
}
