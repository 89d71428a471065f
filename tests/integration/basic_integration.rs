/// Basic integration tests
use kennel_manager_mcp::*;
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_integration_tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_server_basic_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = KennelServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");

        let storage = server.storage();
        let engine = server.engine();

        // A new kennel has no breeding roster and no reports
        let reports = engine
            .report_all(storage, Utc::now().naive_utc().date())
            .expect("report_all failed");
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn test_database_persistence() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let dog_id = {
            let server = KennelServer::new(db_path.clone())
                .await
                .expect("Failed to create first server");

            let dog = Dog::new(
                "Willow".to_string(),
                "Bernese Mountain Dog".to_string(),
                Sex::Female,
                DogRole::Breeding,
                Utc::now().naive_utc().date() - Duration::days(3 * 365),
                None,
                None,
                None,
            )
            .unwrap();
            server.storage().create_dog(&dog).expect("create_dog failed");
            dog.id
        };

        // A second server over the same file sees the same records
        let server2 = KennelServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let loaded = server2.storage().get_dog(&dog_id).expect("dog not persisted");
        assert_eq!(loaded.name, "Willow");
    }

    #[test]
    fn test_storage_interface() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf())
            .expect("Failed to create storage");

        // Storage is usable through the trait object
        let storage: &dyn KennelStorage = &storage;
        assert!(storage.list_litters(true).unwrap().is_empty());
    }

    /// End-to-end season: records flow from customer intake to a litter
    /// with reserved puppies and a cycle report for the dam.
    #[tokio::test]
    async fn test_breeding_season_workflow() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = KennelServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");
        let storage = server.storage();
        let today = Utc::now().naive_utc().date();

        // Intake: a customer joins the waitlist
        let customer = Customer::new(
            "The Harpers".to_string(),
            Some("harpers@example.com".to_string()),
            None,
            Some("Portland".to_string()),
            None,
        )
        .unwrap();
        storage.create_customer(&customer).unwrap();

        let mut entry = WaitlistEntry::new(
            customer.id.clone(),
            None,
            Some(Sex::Female),
            None,
            None,
        )
        .unwrap();
        storage.create_waitlist_entry(&entry).unwrap();

        // The dam comes into heat; a cycle gets recorded
        let dam = Dog::new(
            "Maple".to_string(),
            "Golden Retriever".to_string(),
            Sex::Female,
            DogRole::Breeding,
            today - Duration::days(3 * 365),
            None,
            None,
            None,
        )
        .unwrap();
        storage.create_dog(&dam).unwrap();

        let cycle = HeatCycle::new(dam.id.clone(), today - Duration::days(70), Some(180), None)
            .unwrap();
        storage.create_heat_cycle(&cycle).unwrap();

        // The litter arrives
        let litter = Litter::new(
            "A-litter".to_string(),
            dam.id.clone(),
            None,
            None,
            Some(today - Duration::days(7)),
            None,
        )
        .unwrap();
        storage.create_litter(&litter).unwrap();

        let mut puppy = Puppy::new(
            litter.id.clone(),
            "Pink collar girl".to_string(),
            Sex::Female,
            Some("pink".to_string()),
            None,
            None,
        )
        .unwrap();
        storage.create_puppy(&puppy).unwrap();

        // The waitlist customer gets the offer and reserves the puppy
        entry
            .update(
                Some(Some(litter.id.clone())),
                Some(WaitlistStatus::Offered),
                Some(true),
                None,
                None,
                None,
            )
            .unwrap();
        storage.update_waitlist_entry(&entry).unwrap();

        puppy
            .update(
                None,
                None,
                Some(PuppyStatus::Reserved),
                Some(Some(customer.id.clone())),
                None,
            )
            .unwrap();
        storage.update_puppy(&puppy).unwrap();

        // Care and milestones accumulate
        let log = CareLog::new(dam.id.clone(), CareAction::Feeding, today, Some(3), Some("cups".to_string()), None)
            .unwrap();
        storage.create_care_log(&log).unwrap();

        let milestone =
            Milestone::new(puppy.id.clone(), MilestoneKind::EyesOpen, today, None).unwrap();
        storage.create_milestone(&milestone).unwrap();

        // The cycle engine reports on the dam
        let reports = server.engine().report_all(storage, today).unwrap();
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.dog_name, "Maple");
        let projection = report.projection.as_ref().expect("projection missing");
        assert!(!projection.in_heat); // day 70 is well past the 21-day window
        assert_eq!(projection.next_heat_on, today + Duration::days(110));

        // And the stored records read back consistently
        let queue = storage.list_waitlist(Some(&litter.id), None).unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].status, WaitlistStatus::Offered);
        assert!(queue[0].deposit_paid);

        let puppies = storage.list_puppies_for_litter(&litter.id).unwrap();
        assert_eq!(puppies[0].status, PuppyStatus::Reserved);
        assert_eq!(puppies[0].reserved_for, Some(customer.id));

        let logs = storage.list_care_logs_for_dog(&dam.id, Some(5)).unwrap();
        assert_eq!(logs.len(), 1);

        let milestones = storage.list_milestones_for_puppy(&puppy.id).unwrap();
        assert_eq!(milestones.len(), 1);
    }

    /// A vaccination due near the projected heat shows up as a conflict.
    #[tokio::test]
    async fn test_vaccination_conflict_detection() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = KennelServer::new(temp_file.path().to_path_buf())
            .await
            .expect("Failed to create server");
        let storage = server.storage();
        let today = Utc::now().naive_utc().date();

        let dam = Dog::new(
            "Juniper".to_string(),
            "Labrador Retriever".to_string(),
            Sex::Female,
            DogRole::Breeding,
            today - Duration::days(4 * 365),
            None,
            None,
            None,
        )
        .unwrap();
        storage.create_dog(&dam).unwrap();

        // Next heat projects 20 days out
        let cycle = HeatCycle::new(dam.id.clone(), today - Duration::days(160), Some(180), None)
            .unwrap();
        storage.create_heat_cycle(&cycle).unwrap();

        // Due 10 days after the projected start: inside the conflict window
        let conflicting = Vaccination::new(
            dam.id.clone(),
            "Rabies".to_string(),
            None,
            Some(today + Duration::days(30)),
            None,
        )
        .unwrap();
        storage.create_vaccination(&conflicting).unwrap();

        // Due far outside the window
        let safe = Vaccination::new(
            dam.id.clone(),
            "Bordetella".to_string(),
            None,
            Some(today + Duration::days(120)),
            None,
        )
        .unwrap();
        storage.create_vaccination(&safe).unwrap();

        let report = server
            .engine()
            .report_for_dog(storage, &dam, today)
            .unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].vaccine, "Rabies");
        assert!(report.summary.contains("1 vaccination conflict"));

        let history = storage.list_heat_cycles_for_dog(&dam.id).unwrap();
        assert_eq!(history.len(), 1);
    }
}
