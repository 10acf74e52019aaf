#[cfg(test)]
mod tests {
    use chrono::{NaiveTime, Weekday};

    use crate::api::{BranchId, ClassId, TimetableId};
    use crate::db::repositories::LocalRepository;
    use crate::db::services;
    use crate::models::interval::TimeInterval;
    use crate::models::timetable::{
        Period, PeriodType, TimeSettings, Timetable, TimetableFilter, TimetableStatus,
    };

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn period(day: Weekday, sh: u32, sm: u32, eh: u32, em: u32) -> Period {
        Period {
            interval: TimeInterval::new(day, t(sh, sm), t(eh, em)).unwrap(),
            period_number: 1,
            subject_id: None,
            teacher_id: None,
            period_type: PeriodType::Lecture,
            room_number: "101".to_string(),
            section: "A".to_string(),
        }
    }

    fn timetable(name: &str, branch_id: BranchId, class_id: ClassId) -> Timetable {
        Timetable {
            id: None,
            name: name.to_string(),
            branch_id,
            class_id,
            section: "A".to_string(),
            academic_year: "2025-2026".to_string(),
            status: TimetableStatus::Draft,
            effective_from: None,
            effective_to: None,
            time_settings: TimeSettings {
                period_duration: 40,
                first_period_duration: None,
                break_duration: 10,
                lunch_duration: 30,
                school_start_time: t(8, 0),
                school_end_time: t(14, 0),
            },
            periods: vec![period(Weekday::Mon, 8, 0, 8, 40)],
        }
    }

    #[tokio::test]
    async fn test_store_assigns_id() {
        let repo = LocalRepository::new();
        let saved = services::store_timetable(
            &repo,
            timetable("Term 1", BranchId::generate(), ClassId::generate()),
        )
        .await
        .unwrap();
        assert!(saved.id.is_some());

        let fetched = services::get_timetable(&repo, saved.id.unwrap())
            .await
            .unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn test_store_preserves_existing_id() {
        let repo = LocalRepository::new();
        let mut tt = timetable("Term 1", BranchId::generate(), ClassId::generate());
        let id = TimetableId::generate();
        tt.id = Some(id);
        let saved = services::store_timetable(&repo, tt).await.unwrap();
        assert_eq!(saved.id, Some(id));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = LocalRepository::new();
        let err = services::get_timetable(&repo, TimetableId::generate())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_find_filters_by_section_and_year() {
        let repo = LocalRepository::new();
        let branch = BranchId::generate();
        let class = ClassId::generate();

        services::store_timetable(&repo, timetable("Term 1", branch, class))
            .await
            .unwrap();
        let mut other_section = timetable("Term 1 - B", branch, class);
        other_section.section = "B".to_string();
        for p in &mut other_section.periods {
            p.section = "B".to_string();
        }
        services::store_timetable(&repo, other_section).await.unwrap();

        let found = services::list_timetables(&repo, &TimetableFilter::for_section(branch, class, "A"))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Term 1");

        let by_year = services::list_timetables(
            &repo,
            &TimetableFilter::for_branch_year(branch, "2025-2026"),
        )
        .await
        .unwrap();
        assert_eq!(by_year.len(), 2);
    }

    #[tokio::test]
    async fn test_uniqueness_constraint_rejects_racing_save() {
        // Two timetables landing a period on the same (day, start) slot for
        // one section: the second save is rejected by the store even though
        // it never went through engine validation.
        let repo = LocalRepository::new();
        let branch = BranchId::generate();
        let class = ClassId::generate();

        services::store_timetable(&repo, timetable("First", branch, class))
            .await
            .unwrap();
        let err = services::store_timetable(&repo, timetable("Second", branch, class))
            .await
            .unwrap_err();
        assert!(err.is_conflict(), "expected conflict, got {}", err);
    }

    #[tokio::test]
    async fn test_uniqueness_constraint_ignores_archived() {
        let repo = LocalRepository::new();
        let branch = BranchId::generate();
        let class = ClassId::generate();

        let mut old = timetable("Old", branch, class);
        old.status = TimetableStatus::Archived;
        services::store_timetable(&repo, old).await.unwrap();

        assert!(
            services::store_timetable(&repo, timetable("New", branch, class))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_resave_same_timetable_passes_constraint() {
        let repo = LocalRepository::new();
        let saved = services::store_timetable(
            &repo,
            timetable("Term 1", BranchId::generate(), ClassId::generate()),
        )
        .await
        .unwrap();
        assert!(services::store_timetable(&repo, saved).await.is_ok());
    }

    #[tokio::test]
    async fn test_purge_requires_archived() {
        let repo = LocalRepository::new();
        let saved = services::store_timetable(
            &repo,
            timetable("Term 1", BranchId::generate(), ClassId::generate()),
        )
        .await
        .unwrap();
        let id = saved.id.unwrap();

        let err = services::purge_timetable(&repo, id).await.unwrap_err();
        assert!(matches!(
            err,
            crate::db::repository::RepositoryError::Validation { .. }
        ));

        let mut archived = saved;
        archived.status = TimetableStatus::Archived;
        services::store_timetable(&repo, archived).await.unwrap();

        services::purge_timetable(&repo, id).await.unwrap();
        assert!(services::get_timetable(&repo, id).await.is_err());
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(services::health_check(&repo).await.unwrap());
    }
}
