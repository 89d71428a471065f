/// SQLite implementation of the kennel storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving kennel data. It handles all SQL queries and data
/// conversion between domain types and TEXT columns.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::domain::{
    CareAction, CareLog, CareLogId, Customer, CustomerId, Dog, DogId, DogRole, HeatCycle,
    HeatCycleId, Litter, LitterId, Milestone, MilestoneId, MilestoneKind, Puppy, PuppyId,
    PuppyStatus, Sex, Vaccination, VaccinationId, WaitlistEntry, WaitlistEntryId,
    WaitlistStatus,
};
use crate::storage::{migrations, KennelStorage, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the KennelStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

/// Build the rusqlite error used for unparseable column values
///
/// Row-mapping closures must return rusqlite errors, so domain parse
/// failures are wrapped in InvalidColumnType with a description.
fn invalid_column(idx: usize, what: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, what.to_string(), rusqlite::types::Type::Text)
}

fn parse_date(idx: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| invalid_column(idx, "Invalid date"))
}

fn parse_opt_date(idx: usize, s: Option<String>) -> Result<Option<NaiveDate>, rusqlite::Error> {
    s.map(|text| parse_date(idx, &text)).transpose()
}

fn parse_timestamp(idx: usize, s: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid_column(idx, "Invalid datetime"))
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        // Enable foreign key constraints
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    // Enum <-> column helpers. The "custom:" prefix convention matches how
    // the parse() methods on the enums accept user input.

    fn care_action_to_string(action: &CareAction) -> String {
        match action {
            CareAction::Custom(name) => format!("custom:{}", name),
            other => other.display_name().to_string(),
        }
    }

    fn string_to_care_action(s: &str) -> Option<CareAction> {
        CareAction::parse(s)
    }

    fn milestone_kind_to_string(kind: &MilestoneKind) -> String {
        match kind {
            MilestoneKind::Custom(name) => format!("custom:{}", name),
            other => other.display_name().to_string(),
        }
    }

    fn string_to_milestone_kind(s: &str) -> Option<MilestoneKind> {
        MilestoneKind::parse(s)
    }

    // Row mappers, one per entity

    fn dog_from_row(row: &Row<'_>) -> Result<Dog, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = DogId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let sex_str: String = row.get(3)?;
        let sex = Sex::parse(&sex_str).ok_or_else(|| invalid_column(3, "Invalid sex"))?;

        let role_str: String = row.get(4)?;
        let role = DogRole::parse(&role_str).ok_or_else(|| invalid_column(4, "Invalid role"))?;

        let birth_str: String = row.get(5)?;
        let birth_date = parse_date(5, &birth_str)?;

        let created_str: String = row.get(9)?;
        let created_at = parse_timestamp(9, &created_str)?;

        Ok(Dog::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // breed
            sex,
            role,
            birth_date,
            row.get(6)?, // color
            row.get(7)?, // weight_kg
            row.get(8)?, // notes
            created_at,
            row.get(10)?, // is_active
        ))
    }

    fn litter_from_row(row: &Row<'_>) -> Result<Litter, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = LitterId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let dam_str: String = row.get(2)?;
        let dam_id = DogId::from_string(&dam_str).map_err(|_| invalid_column(2, "Invalid UUID"))?;

        let sire_str: Option<String> = row.get(3)?;
        let sire_id = sire_str
            .map(|s| DogId::from_string(&s).map_err(|_| invalid_column(3, "Invalid UUID")))
            .transpose()?;

        let expected_on = parse_opt_date(4, row.get(4)?)?;
        let whelped_on = parse_opt_date(5, row.get(5)?)?;

        let created_str: String = row.get(7)?;
        let created_at = parse_timestamp(7, &created_str)?;

        Ok(Litter::from_existing(
            id,
            row.get(1)?, // name
            dam_id,
            sire_id,
            expected_on,
            whelped_on,
            row.get(6)?, // notes
            created_at,
            row.get(8)?, // is_active
        ))
    }

    fn puppy_from_row(row: &Row<'_>) -> Result<Puppy, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = PuppyId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let litter_str: String = row.get(1)?;
        let litter_id =
            LitterId::from_string(&litter_str).map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let sex_str: String = row.get(3)?;
        let sex = Sex::parse(&sex_str).ok_or_else(|| invalid_column(3, "Invalid sex"))?;

        let status_str: String = row.get(5)?;
        let status = PuppyStatus::parse(&status_str)
            .ok_or_else(|| invalid_column(5, "Invalid status"))?;

        let reserved_str: Option<String> = row.get(6)?;
        let reserved_for = reserved_str
            .map(|s| CustomerId::from_string(&s).map_err(|_| invalid_column(6, "Invalid UUID")))
            .transpose()?;

        let birth_date = parse_opt_date(7, row.get(7)?)?;

        let created_str: String = row.get(9)?;
        let created_at = parse_timestamp(9, &created_str)?;

        Ok(Puppy::from_existing(
            id,
            litter_id,
            row.get(2)?, // name
            sex,
            row.get(4)?, // collar_color
            status,
            reserved_for,
            birth_date,
            row.get(8)?, // notes
            created_at,
        ))
    }

    fn customer_from_row(row: &Row<'_>) -> Result<Customer, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id =
            CustomerId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let created_str: String = row.get(6)?;
        let created_at = parse_timestamp(6, &created_str)?;

        Ok(Customer::from_existing(
            id,
            row.get(1)?, // name
            row.get(2)?, // email
            row.get(3)?, // phone
            row.get(4)?, // city
            row.get(5)?, // notes
            created_at,
            row.get(7)?, // is_active
        ))
    }

    fn waitlist_from_row(row: &Row<'_>) -> Result<WaitlistEntry, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = WaitlistEntryId::from_string(&id_str)
            .map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let customer_str: String = row.get(1)?;
        let customer_id = CustomerId::from_string(&customer_str)
            .map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let litter_str: Option<String> = row.get(2)?;
        let litter_id = litter_str
            .map(|s| LitterId::from_string(&s).map_err(|_| invalid_column(2, "Invalid UUID")))
            .transpose()?;

        let status_str: String = row.get(3)?;
        let status = WaitlistStatus::parse(&status_str)
            .ok_or_else(|| invalid_column(3, "Invalid status"))?;

        let sex_str: Option<String> = row.get(5)?;
        let sex_preference = sex_str
            .map(|s| Sex::parse(&s).ok_or_else(|| invalid_column(5, "Invalid sex")))
            .transpose()?;

        let joined_str: String = row.get(8)?;
        let joined_at = parse_timestamp(8, &joined_str)?;

        Ok(WaitlistEntry::from_existing(
            id,
            customer_id,
            litter_id,
            status,
            row.get(4)?, // deposit_paid
            sex_preference,
            row.get(6)?, // color_preference
            row.get(7)?, // notes
            joined_at,
        ))
    }

    fn care_log_from_row(row: &Row<'_>) -> Result<CareLog, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id = CareLogId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let dog_str: String = row.get(1)?;
        let dog_id = DogId::from_string(&dog_str).map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let action_str: String = row.get(2)?;
        let action = Self::string_to_care_action(&action_str)
            .ok_or_else(|| invalid_column(2, "Invalid care action"))?;

        let performed_str: String = row.get(3)?;
        let performed_on = parse_date(3, &performed_str)?;

        let recorded_str: String = row.get(4)?;
        let recorded_at = parse_timestamp(4, &recorded_str)?;

        Ok(CareLog::from_existing(
            id,
            dog_id,
            action,
            performed_on,
            recorded_at,
            row.get(5)?, // quantity
            row.get(6)?, // unit
            row.get(7)?, // notes
        ))
    }

    fn milestone_from_row(row: &Row<'_>) -> Result<Milestone, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id =
            MilestoneId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let puppy_str: String = row.get(1)?;
        let puppy_id =
            PuppyId::from_string(&puppy_str).map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let kind_str: String = row.get(2)?;
        let kind = Self::string_to_milestone_kind(&kind_str)
            .ok_or_else(|| invalid_column(2, "Invalid milestone kind"))?;

        let achieved_str: String = row.get(3)?;
        let achieved_on = parse_date(3, &achieved_str)?;

        let recorded_str: String = row.get(5)?;
        let recorded_at = parse_timestamp(5, &recorded_str)?;

        Ok(Milestone::from_existing(
            id,
            puppy_id,
            kind,
            achieved_on,
            row.get(4)?, // notes
            recorded_at,
        ))
    }

    fn heat_cycle_from_row(row: &Row<'_>) -> Result<HeatCycle, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id =
            HeatCycleId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let dog_str: String = row.get(1)?;
        let dog_id = DogId::from_string(&dog_str).map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let started_str: String = row.get(2)?;
        let started_on = parse_date(2, &started_str)?;
        let ended_on = parse_opt_date(3, row.get(3)?)?;

        let recorded_str: String = row.get(6)?;
        let recorded_at = parse_timestamp(6, &recorded_str)?;

        Ok(HeatCycle::from_existing(
            id,
            dog_id,
            started_on,
            ended_on,
            row.get(4)?, // cycle_length_days
            row.get(5)?, // notes
            recorded_at,
        ))
    }

    fn vaccination_from_row(row: &Row<'_>) -> Result<Vaccination, rusqlite::Error> {
        let id_str: String = row.get(0)?;
        let id =
            VaccinationId::from_string(&id_str).map_err(|_| invalid_column(0, "Invalid UUID"))?;

        let dog_str: String = row.get(1)?;
        let dog_id = DogId::from_string(&dog_str).map_err(|_| invalid_column(1, "Invalid UUID"))?;

        let administered_on = parse_opt_date(3, row.get(3)?)?;
        let due_on = parse_opt_date(4, row.get(4)?)?;

        let recorded_str: String = row.get(6)?;
        let recorded_at = parse_timestamp(6, &recorded_str)?;

        Ok(Vaccination::from_existing(
            id,
            dog_id,
            row.get(2)?, // vaccine
            administered_on,
            due_on,
            row.get(5)?, // notes
            recorded_at,
        ))
    }
}

impl KennelStorage for SqliteStorage {
    // Dogs

    fn create_dog(&self, dog: &Dog) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO dogs (
                id, name, breed, sex, role, birth_date, color, weight_kg,
                notes, created_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                dog.id.to_string(),
                dog.name,
                dog.breed,
                dog.sex.display_name(),
                dog.role.display_name(),
                dog.birth_date.to_string(),
                dog.color,
                dog.weight_kg,
                dog.notes,
                dog.created_at.to_rfc3339(),
                dog.is_active
            ],
        )?;

        tracing::debug!("Created dog: {} ({})", dog.name, dog.id);
        Ok(())
    }

    fn get_dog(&self, dog_id: &DogId) -> Result<Dog, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, breed, sex, role, birth_date, color, weight_kg,
                    notes, created_at, is_active
             FROM dogs WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![dog_id.to_string()], Self::dog_from_row);

        match result {
            Ok(dog) => Ok(dog),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::DogNotFound {
                dog_id: dog_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_dog(&self, dog: &Dog) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE dogs SET
                name = ?2,
                breed = ?3,
                sex = ?4,
                role = ?5,
                birth_date = ?6,
                color = ?7,
                weight_kg = ?8,
                notes = ?9,
                is_active = ?10
             WHERE id = ?1",
            params![
                dog.id.to_string(),
                dog.name,
                dog.breed,
                dog.sex.display_name(),
                dog.role.display_name(),
                dog.birth_date.to_string(),
                dog.color,
                dog.weight_kg,
                dog.notes,
                dog.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::DogNotFound {
                dog_id: dog.id.to_string(),
            });
        }

        tracing::debug!("Updated dog: {} ({})", dog.name, dog.id);
        Ok(())
    }

    fn archive_dog(&self, dog_id: &DogId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE dogs SET is_active = 0 WHERE id = ?1",
            params![dog_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::DogNotFound {
                dog_id: dog_id.to_string(),
            });
        }

        tracing::debug!("Archived dog: {}", dog_id);
        Ok(())
    }

    fn list_dogs(
        &self,
        sex: Option<Sex>,
        role: Option<DogRole>,
        active_only: bool,
    ) -> Result<Vec<Dog>, StorageError> {
        let mut sql = "SELECT id, name, breed, sex, role, birth_date, color, weight_kg,
                              notes, created_at, is_active
                       FROM dogs WHERE 1=1"
            .to_string();
        let mut bind: Vec<String> = Vec::new();

        if active_only {
            sql.push_str(" AND is_active = 1");
        }
        if let Some(sex_filter) = sex {
            bind.push(sex_filter.display_name().to_string());
            sql.push_str(&format!(" AND sex = ?{}", bind.len()));
        }
        if let Some(role_filter) = role {
            bind.push(role_filter.display_name().to_string());
            sql.push_str(&format!(" AND role = ?{}", bind.len()));
        }

        sql.push_str(" ORDER BY name ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let dog_iter = stmt.query_map(params_from_iter(bind.iter()), Self::dog_from_row)?;

        let mut dogs = Vec::new();
        for dog in dog_iter {
            dogs.push(dog?);
        }

        Ok(dogs)
    }

    // Litters

    fn create_litter(&self, litter: &Litter) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO litters (
                id, name, dam_id, sire_id, expected_on, whelped_on,
                notes, created_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                litter.id.to_string(),
                litter.name,
                litter.dam_id.to_string(),
                litter.sire_id.as_ref().map(|id| id.to_string()),
                litter.expected_on.map(|d| d.to_string()),
                litter.whelped_on.map(|d| d.to_string()),
                litter.notes,
                litter.created_at.to_rfc3339(),
                litter.is_active
            ],
        )?;

        tracing::debug!("Created litter: {} ({})", litter.name, litter.id);
        Ok(())
    }

    fn get_litter(&self, litter_id: &LitterId) -> Result<Litter, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, dam_id, sire_id, expected_on, whelped_on,
                    notes, created_at, is_active
             FROM litters WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![litter_id.to_string()], Self::litter_from_row);

        match result {
            Ok(litter) => Ok(litter),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::LitterNotFound {
                litter_id: litter_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_litter(&self, litter: &Litter) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE litters SET
                name = ?2,
                sire_id = ?3,
                expected_on = ?4,
                whelped_on = ?5,
                notes = ?6,
                is_active = ?7
             WHERE id = ?1",
            params![
                litter.id.to_string(),
                litter.name,
                litter.sire_id.as_ref().map(|id| id.to_string()),
                litter.expected_on.map(|d| d.to_string()),
                litter.whelped_on.map(|d| d.to_string()),
                litter.notes,
                litter.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::LitterNotFound {
                litter_id: litter.id.to_string(),
            });
        }

        tracing::debug!("Updated litter: {} ({})", litter.name, litter.id);
        Ok(())
    }

    fn list_litters(&self, active_only: bool) -> Result<Vec<Litter>, StorageError> {
        let mut sql = "SELECT id, name, dam_id, sire_id, expected_on, whelped_on,
                              notes, created_at, is_active
                       FROM litters"
            .to_string();

        if active_only {
            sql.push_str(" WHERE is_active = 1");
        }

        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let litter_iter = stmt.query_map([], Self::litter_from_row)?;

        let mut litters = Vec::new();
        for litter in litter_iter {
            litters.push(litter?);
        }

        Ok(litters)
    }

    // Puppies

    fn create_puppy(&self, puppy: &Puppy) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO puppies (
                id, litter_id, name, sex, collar_color, status, reserved_for,
                birth_date, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                puppy.id.to_string(),
                puppy.litter_id.to_string(),
                puppy.name,
                puppy.sex.display_name(),
                puppy.collar_color,
                puppy.status.display_name(),
                puppy.reserved_for.as_ref().map(|id| id.to_string()),
                puppy.birth_date.map(|d| d.to_string()),
                puppy.notes,
                puppy.created_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created puppy: {} ({})", puppy.name, puppy.id);
        Ok(())
    }

    fn get_puppy(&self, puppy_id: &PuppyId) -> Result<Puppy, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, litter_id, name, sex, collar_color, status, reserved_for,
                    birth_date, notes, created_at
             FROM puppies WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![puppy_id.to_string()], Self::puppy_from_row);

        match result {
            Ok(puppy) => Ok(puppy),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::PuppyNotFound {
                puppy_id: puppy_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_puppy(&self, puppy: &Puppy) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE puppies SET
                name = ?2,
                collar_color = ?3,
                status = ?4,
                reserved_for = ?5,
                birth_date = ?6,
                notes = ?7
             WHERE id = ?1",
            params![
                puppy.id.to_string(),
                puppy.name,
                puppy.collar_color,
                puppy.status.display_name(),
                puppy.reserved_for.as_ref().map(|id| id.to_string()),
                puppy.birth_date.map(|d| d.to_string()),
                puppy.notes
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::PuppyNotFound {
                puppy_id: puppy.id.to_string(),
            });
        }

        tracing::debug!("Updated puppy: {} ({})", puppy.name, puppy.id);
        Ok(())
    }

    fn list_puppies_for_litter(
        &self,
        litter_id: &LitterId,
    ) -> Result<Vec<Puppy>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, litter_id, name, sex, collar_color, status, reserved_for,
                    birth_date, notes, created_at
             FROM puppies WHERE litter_id = ?1
             ORDER BY name ASC",
        )?;

        let puppy_iter =
            stmt.query_map(params![litter_id.to_string()], Self::puppy_from_row)?;

        let mut puppies = Vec::new();
        for puppy in puppy_iter {
            puppies.push(puppy?);
        }

        Ok(puppies)
    }

    // Customers

    fn create_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO customers (
                id, name, email, phone, city, notes, created_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                customer.id.to_string(),
                customer.name,
                customer.email,
                customer.phone,
                customer.city,
                customer.notes,
                customer.created_at.to_rfc3339(),
                customer.is_active
            ],
        )?;

        tracing::debug!("Created customer: {} ({})", customer.name, customer.id);
        Ok(())
    }

    fn get_customer(&self, customer_id: &CustomerId) -> Result<Customer, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, email, phone, city, notes, created_at, is_active
             FROM customers WHERE id = ?1",
        )?;

        let result =
            stmt.query_row(params![customer_id.to_string()], Self::customer_from_row);

        match result {
            Ok(customer) => Ok(customer),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(StorageError::CustomerNotFound {
                customer_id: customer_id.to_string(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_customer(&self, customer: &Customer) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE customers SET
                name = ?2,
                email = ?3,
                phone = ?4,
                city = ?5,
                notes = ?6,
                is_active = ?7
             WHERE id = ?1",
            params![
                customer.id.to_string(),
                customer.name,
                customer.email,
                customer.phone,
                customer.city,
                customer.notes,
                customer.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::CustomerNotFound {
                customer_id: customer.id.to_string(),
            });
        }

        tracing::debug!("Updated customer: {} ({})", customer.name, customer.id);
        Ok(())
    }

    fn archive_customer(&self, customer_id: &CustomerId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE customers SET is_active = 0 WHERE id = ?1",
            params![customer_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::CustomerNotFound {
                customer_id: customer_id.to_string(),
            });
        }

        tracing::debug!("Archived customer: {}", customer_id);
        Ok(())
    }

    fn list_customers(&self, active_only: bool) -> Result<Vec<Customer>, StorageError> {
        let mut sql = "SELECT id, name, email, phone, city, notes, created_at, is_active
                       FROM customers"
            .to_string();

        if active_only {
            sql.push_str(" WHERE is_active = 1");
        }

        sql.push_str(" ORDER BY name ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let customer_iter = stmt.query_map([], Self::customer_from_row)?;

        let mut customers = Vec::new();
        for customer in customer_iter {
            customers.push(customer?);
        }

        Ok(customers)
    }

    // Waitlist

    fn create_waitlist_entry(&self, entry: &WaitlistEntry) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO waitlist_entries (
                id, customer_id, litter_id, status, deposit_paid,
                sex_preference, color_preference, notes, joined_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.id.to_string(),
                entry.customer_id.to_string(),
                entry.litter_id.as_ref().map(|id| id.to_string()),
                entry.status.display_name(),
                entry.deposit_paid,
                entry.sex_preference.map(|s| s.display_name().to_string()),
                entry.color_preference,
                entry.notes,
                entry.joined_at.to_rfc3339()
            ],
        )?;

        tracing::debug!(
            "Created waitlist entry {} for customer {}",
            entry.id,
            entry.customer_id
        );
        Ok(())
    }

    fn get_waitlist_entry(
        &self,
        entry_id: &WaitlistEntryId,
    ) -> Result<WaitlistEntry, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, customer_id, litter_id, status, deposit_paid,
                    sex_preference, color_preference, notes, joined_at
             FROM waitlist_entries WHERE id = ?1",
        )?;

        let result = stmt.query_row(params![entry_id.to_string()], Self::waitlist_from_row);

        match result {
            Ok(entry) => Ok(entry),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(StorageError::WaitlistEntryNotFound {
                    entry_id: entry_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn update_waitlist_entry(&self, entry: &WaitlistEntry) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE waitlist_entries SET
                litter_id = ?2,
                status = ?3,
                deposit_paid = ?4,
                sex_preference = ?5,
                color_preference = ?6,
                notes = ?7
             WHERE id = ?1",
            params![
                entry.id.to_string(),
                entry.litter_id.as_ref().map(|id| id.to_string()),
                entry.status.display_name(),
                entry.deposit_paid,
                entry.sex_preference.map(|s| s.display_name().to_string()),
                entry.color_preference,
                entry.notes
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::WaitlistEntryNotFound {
                entry_id: entry.id.to_string(),
            });
        }

        tracing::debug!("Updated waitlist entry: {}", entry.id);
        Ok(())
    }

    fn list_waitlist(
        &self,
        litter_id: Option<&LitterId>,
        status: Option<WaitlistStatus>,
    ) -> Result<Vec<WaitlistEntry>, StorageError> {
        let mut sql = "SELECT id, customer_id, litter_id, status, deposit_paid,
                              sex_preference, color_preference, notes, joined_at
                       FROM waitlist_entries WHERE 1=1"
            .to_string();
        let mut bind: Vec<String> = Vec::new();

        if let Some(litter) = litter_id {
            bind.push(litter.to_string());
            sql.push_str(&format!(" AND litter_id = ?{}", bind.len()));
        }
        if let Some(status_filter) = status {
            bind.push(status_filter.display_name().to_string());
            sql.push_str(&format!(" AND status = ?{}", bind.len()));
        }

        // Queue order: first joined, first served
        sql.push_str(" ORDER BY joined_at ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let entry_iter = stmt.query_map(params_from_iter(bind.iter()), Self::waitlist_from_row)?;

        let mut entries = Vec::new();
        for entry in entry_iter {
            entries.push(entry?);
        }

        Ok(entries)
    }

    // Care logs

    fn create_care_log(&self, log: &CareLog) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO care_logs (
                id, dog_id, action, performed_on, recorded_at, quantity, unit, notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                log.id.to_string(),
                log.dog_id.to_string(),
                Self::care_action_to_string(&log.action),
                log.performed_on.to_string(),
                log.recorded_at.to_rfc3339(),
                log.quantity,
                log.unit,
                log.notes
            ],
        )?;

        tracing::debug!("Created care log {} for dog {}", log.id, log.dog_id);
        Ok(())
    }

    fn list_care_logs_for_dog(
        &self,
        dog_id: &DogId,
        limit: Option<u32>,
    ) -> Result<Vec<CareLog>, StorageError> {
        let sql = if let Some(limit_val) = limit {
            format!(
                "SELECT id, dog_id, action, performed_on, recorded_at, quantity, unit, notes
                 FROM care_logs WHERE dog_id = ?1
                 ORDER BY performed_on DESC, recorded_at DESC LIMIT {}",
                limit_val
            )
        } else {
            "SELECT id, dog_id, action, performed_on, recorded_at, quantity, unit, notes
             FROM care_logs WHERE dog_id = ?1
             ORDER BY performed_on DESC, recorded_at DESC"
                .to_string()
        };

        let mut stmt = self.conn.prepare(&sql)?;
        let log_iter = stmt.query_map(params![dog_id.to_string()], Self::care_log_from_row)?;

        let mut logs = Vec::new();
        for log in log_iter {
            logs.push(log?);
        }

        Ok(logs)
    }

    fn list_care_logs_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CareLog>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, dog_id, action, performed_on, recorded_at, quantity, unit, notes
             FROM care_logs
             WHERE performed_on BETWEEN ?1 AND ?2
             ORDER BY performed_on DESC, recorded_at DESC",
        )?;

        let log_iter = stmt.query_map(
            params![start_date.to_string(), end_date.to_string()],
            Self::care_log_from_row,
        )?;

        let mut logs = Vec::new();
        for log in log_iter {
            logs.push(log?);
        }

        Ok(logs)
    }

    // Milestones

    fn create_milestone(&self, milestone: &Milestone) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO milestones (
                id, puppy_id, kind, achieved_on, notes, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                milestone.id.to_string(),
                milestone.puppy_id.to_string(),
                Self::milestone_kind_to_string(&milestone.kind),
                milestone.achieved_on.to_string(),
                milestone.notes,
                milestone.recorded_at.to_rfc3339()
            ],
        )?;

        tracing::debug!(
            "Recorded milestone {} for puppy {}",
            milestone.id,
            milestone.puppy_id
        );
        Ok(())
    }

    fn list_milestones_for_puppy(
        &self,
        puppy_id: &PuppyId,
    ) -> Result<Vec<Milestone>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, puppy_id, kind, achieved_on, notes, recorded_at
             FROM milestones WHERE puppy_id = ?1
             ORDER BY achieved_on ASC",
        )?;

        let milestone_iter =
            stmt.query_map(params![puppy_id.to_string()], Self::milestone_from_row)?;

        let mut milestones = Vec::new();
        for milestone in milestone_iter {
            milestones.push(milestone?);
        }

        Ok(milestones)
    }

    // Heat cycles

    fn create_heat_cycle(&self, cycle: &HeatCycle) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO heat_cycles (
                id, dog_id, started_on, ended_on, cycle_length_days, notes, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                cycle.id.to_string(),
                cycle.dog_id.to_string(),
                cycle.started_on.to_string(),
                cycle.ended_on.map(|d| d.to_string()),
                cycle.cycle_length_days,
                cycle.notes,
                cycle.recorded_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Recorded heat cycle {} for dog {}", cycle.id, cycle.dog_id);
        Ok(())
    }

    fn update_heat_cycle(&self, cycle: &HeatCycle) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE heat_cycles SET
                started_on = ?2,
                ended_on = ?3,
                cycle_length_days = ?4,
                notes = ?5
             WHERE id = ?1",
            params![
                cycle.id.to_string(),
                cycle.started_on.to_string(),
                cycle.ended_on.map(|d| d.to_string()),
                cycle.cycle_length_days,
                cycle.notes
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HeatCycleNotFound {
                cycle_id: cycle.id.to_string(),
            });
        }

        tracing::debug!("Updated heat cycle: {}", cycle.id);
        Ok(())
    }

    fn latest_heat_cycle_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Option<HeatCycle>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, dog_id, started_on, ended_on, cycle_length_days, notes, recorded_at
             FROM heat_cycles WHERE dog_id = ?1
             ORDER BY started_on DESC LIMIT 1",
        )?;

        let result = stmt.query_row(params![dog_id.to_string()], Self::heat_cycle_from_row);

        match result {
            Ok(cycle) => Ok(Some(cycle)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn list_heat_cycles_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Vec<HeatCycle>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, dog_id, started_on, ended_on, cycle_length_days, notes, recorded_at
             FROM heat_cycles WHERE dog_id = ?1
             ORDER BY started_on DESC",
        )?;

        let cycle_iter =
            stmt.query_map(params![dog_id.to_string()], Self::heat_cycle_from_row)?;

        let mut cycles = Vec::new();
        for cycle in cycle_iter {
            cycles.push(cycle?);
        }

        Ok(cycles)
    }

    // Vaccinations

    fn create_vaccination(&self, vaccination: &Vaccination) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO vaccinations (
                id, dog_id, vaccine, administered_on, due_on, notes, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                vaccination.id.to_string(),
                vaccination.dog_id.to_string(),
                vaccination.vaccine,
                vaccination.administered_on.map(|d| d.to_string()),
                vaccination.due_on.map(|d| d.to_string()),
                vaccination.notes,
                vaccination.recorded_at.to_rfc3339()
            ],
        )?;

        tracing::debug!(
            "Recorded vaccination {} for dog {}",
            vaccination.id,
            vaccination.dog_id
        );
        Ok(())
    }

    fn list_vaccinations_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Vec<Vaccination>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, dog_id, vaccine, administered_on, due_on, notes, recorded_at
             FROM vaccinations WHERE dog_id = ?1
             ORDER BY recorded_at DESC",
        )?;

        let vaccination_iter =
            stmt.query_map(params![dog_id.to_string()], Self::vaccination_from_row)?;

        let mut vaccinations = Vec::new();
        for vaccination in vaccination_iter {
            vaccinations.push(vaccination?);
        }

        Ok(vaccinations)
    }

    fn upcoming_vaccinations_for_dog(
        &self,
        dog_id: &DogId,
        today: NaiveDate,
    ) -> Result<Vec<Vaccination>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, dog_id, vaccine, administered_on, due_on, notes, recorded_at
             FROM vaccinations
             WHERE dog_id = ?1 AND administered_on IS NULL AND due_on >= ?2
             ORDER BY due_on ASC",
        )?;

        let vaccination_iter = stmt.query_map(
            params![dog_id.to_string(), today.to_string()],
            Self::vaccination_from_row,
        )?;

        let mut vaccinations = Vec::new();
        for vaccination in vaccination_iter {
            vaccinations.push(vaccination?);
        }

        Ok(vaccinations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(dir.path().join("test.db")).unwrap();
        (dir, storage)
    }

    fn sample_dog(sex: Sex, role: DogRole) -> Dog {
        Dog::new(
            "Willow".to_string(),
            "Bernese Mountain Dog".to_string(),
            sex,
            role,
            Utc::now().naive_utc().date() - Duration::days(3 * 365),
            Some("tricolor".to_string()),
            Some(38.5),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_dog_round_trip() {
        let (_dir, storage) = test_storage();
        let dog = sample_dog(Sex::Female, DogRole::Breeding);

        storage.create_dog(&dog).unwrap();
        let loaded = storage.get_dog(&dog.id).unwrap();
        assert_eq!(loaded, dog);
    }

    #[test]
    fn test_get_missing_dog() {
        let (_dir, storage) = test_storage();
        let result = storage.get_dog(&DogId::new());
        assert!(matches!(result, Err(StorageError::DogNotFound { .. })));
    }

    #[test]
    fn test_list_dogs_filters() {
        let (_dir, storage) = test_storage();
        let dam = sample_dog(Sex::Female, DogRole::Breeding);
        let sire = sample_dog(Sex::Male, DogRole::Breeding);
        let retiree = sample_dog(Sex::Female, DogRole::Retired);

        storage.create_dog(&dam).unwrap();
        storage.create_dog(&sire).unwrap();
        storage.create_dog(&retiree).unwrap();
        storage.archive_dog(&retiree.id).unwrap();

        let females = storage.list_dogs(Some(Sex::Female), None, true).unwrap();
        assert_eq!(females.len(), 1);
        assert_eq!(females[0].id, dam.id);

        let everyone = storage.list_dogs(None, None, false).unwrap();
        assert_eq!(everyone.len(), 3);

        let breeding = storage
            .list_dogs(None, Some(DogRole::Breeding), true)
            .unwrap();
        assert_eq!(breeding.len(), 2);
    }

    #[test]
    fn test_customer_archive() {
        let (_dir, storage) = test_storage();

        let customer = Customer::new("Family".to_string(), None, None, None, None).unwrap();
        storage.create_customer(&customer).unwrap();
        storage.archive_customer(&customer.id).unwrap();

        assert!(storage.list_customers(true).unwrap().is_empty());
        assert_eq!(storage.list_customers(false).unwrap().len(), 1);
    }

    #[test]
    fn test_waitlist_queue_order() {
        let (_dir, storage) = test_storage();

        let first = Customer::new("First".to_string(), None, None, None, None).unwrap();
        let second = Customer::new("Second".to_string(), None, None, None, None).unwrap();
        storage.create_customer(&first).unwrap();
        storage.create_customer(&second).unwrap();

        let mut early =
            WaitlistEntry::new(first.id.clone(), None, None, None, None).unwrap();
        early.joined_at = Utc::now() - Duration::days(2);
        let late = WaitlistEntry::new(second.id.clone(), None, None, None, None).unwrap();

        // Insert out of order to prove the query sorts by join time
        storage.create_waitlist_entry(&late).unwrap();
        storage.create_waitlist_entry(&early).unwrap();

        let queue = storage.list_waitlist(None, None).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].customer_id, first.id);
        assert_eq!(queue[1].customer_id, second.id);
    }

    #[test]
    fn test_care_log_round_trip_with_custom_action() {
        let (_dir, storage) = test_storage();
        let dog = sample_dog(Sex::Female, DogRole::Breeding);
        storage.create_dog(&dog).unwrap();

        let today = Utc::now().naive_utc().date();
        let log = CareLog::new(
            dog.id.clone(),
            CareAction::Custom("crate training".to_string()),
            today,
            Some(20),
            Some("minutes".to_string()),
            None,
        )
        .unwrap();

        storage.create_care_log(&log).unwrap();
        let loaded = storage.list_care_logs_for_dog(&dog.id, None).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], log);

        let ranged = storage
            .list_care_logs_by_date_range(today - Duration::days(1), today)
            .unwrap();
        assert_eq!(ranged.len(), 1);
    }

    #[test]
    fn test_latest_heat_cycle() {
        let (_dir, storage) = test_storage();
        let dog = sample_dog(Sex::Female, DogRole::Breeding);
        storage.create_dog(&dog).unwrap();

        assert!(storage.latest_heat_cycle_for_dog(&dog.id).unwrap().is_none());

        let today = Utc::now().naive_utc().date();
        let older = HeatCycle::new(dog.id.clone(), today - Duration::days(200), None, None)
            .unwrap();
        let newer =
            HeatCycle::new(dog.id.clone(), today - Duration::days(10), None, None).unwrap();
        storage.create_heat_cycle(&older).unwrap();
        storage.create_heat_cycle(&newer).unwrap();

        let latest = storage.latest_heat_cycle_for_dog(&dog.id).unwrap().unwrap();
        assert_eq!(latest.id, newer.id);

        // Close it out and read back
        let mut closed = latest;
        closed.close(today - Duration::days(1)).unwrap();
        storage.update_heat_cycle(&closed).unwrap();
        let reloaded = storage.latest_heat_cycle_for_dog(&dog.id).unwrap().unwrap();
        assert_eq!(reloaded.ended_on, closed.ended_on);
    }

    #[test]
    fn test_upcoming_vaccinations() {
        let (_dir, storage) = test_storage();
        let dog = sample_dog(Sex::Female, DogRole::Breeding);
        storage.create_dog(&dog).unwrap();

        let today = Utc::now().naive_utc().date();
        let pending = Vaccination::new(
            dog.id.clone(),
            "Rabies".to_string(),
            None,
            Some(today + Duration::days(30)),
            None,
        )
        .unwrap();
        let given = Vaccination::new(
            dog.id.clone(),
            "DHPP".to_string(),
            Some(today - Duration::days(10)),
            Some(today + Duration::days(355)),
            None,
        )
        .unwrap();
        storage.create_vaccination(&pending).unwrap();
        storage.create_vaccination(&given).unwrap();

        let upcoming = storage.upcoming_vaccinations_for_dog(&dog.id, today).unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].id, pending.id);

        let all = storage.list_vaccinations_for_dog(&dog.id).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_puppy_and_milestone_round_trip() {
        let (_dir, storage) = test_storage();
        let dam = sample_dog(Sex::Female, DogRole::Breeding);
        storage.create_dog(&dam).unwrap();

        let today = Utc::now().naive_utc().date();
        let litter = Litter::new(
            "B-litter".to_string(),
            dam.id.clone(),
            None,
            None,
            Some(today - Duration::days(14)),
            None,
        )
        .unwrap();
        storage.create_litter(&litter).unwrap();

        let puppy = Puppy::new(
            litter.id.clone(),
            "Green collar boy".to_string(),
            Sex::Male,
            Some("green".to_string()),
            None,
            None,
        )
        .unwrap();
        storage.create_puppy(&puppy).unwrap();

        let milestone = Milestone::new(
            puppy.id.clone(),
            MilestoneKind::EyesOpen,
            today - Duration::days(2),
            None,
        )
        .unwrap();
        storage.create_milestone(&milestone).unwrap();

        let puppies = storage.list_puppies_for_litter(&litter.id).unwrap();
        assert_eq!(puppies.len(), 1);
        assert_eq!(puppies[0], puppy);

        let milestones = storage.list_milestones_for_puppy(&puppy.id).unwrap();
        assert_eq!(milestones.len(), 1);
        assert_eq!(milestones[0].kind, MilestoneKind::EyesOpen);
    }
}
