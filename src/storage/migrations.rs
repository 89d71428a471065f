/// Database migration management
///
/// This module handles creating and updating the SQLite database schema.
/// It ensures the database has all the required tables and indexes.

use rusqlite::Connection;

use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// It also sets up the version tracking for future migrations.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    // Create version tracking table first
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get::<_, i32>(0)
        })
        .unwrap_or(0); // Default to version 0 if no version record exists

    Ok(version)
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    // Future migrations would go here:
    // if from_version < 2 {
    //     migration_v2(conn)?;
    // }

    Ok(())
}

/// Migration to version 1: Create initial tables
///
/// This creates the tables for dogs, litters, puppies, customers, the
/// waitlist, care logs, milestones, heat cycles and vaccinations.
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS dogs (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            breed TEXT NOT NULL,
            sex TEXT NOT NULL,
            role TEXT NOT NULL,
            birth_date TEXT NOT NULL,
            color TEXT,
            weight_kg REAL,
            notes TEXT,
            created_at TEXT NOT NULL,
            is_active BOOLEAN DEFAULT TRUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS litters (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            dam_id TEXT NOT NULL,
            sire_id TEXT,
            expected_on TEXT,
            whelped_on TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            is_active BOOLEAN DEFAULT TRUE,
            FOREIGN KEY (dam_id) REFERENCES dogs (id),
            FOREIGN KEY (sire_id) REFERENCES dogs (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS puppies (
            id TEXT PRIMARY KEY,
            litter_id TEXT NOT NULL,
            name TEXT NOT NULL,
            sex TEXT NOT NULL,
            collar_color TEXT,
            status TEXT NOT NULL,
            reserved_for TEXT,
            birth_date TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (litter_id) REFERENCES litters (id),
            FOREIGN KEY (reserved_for) REFERENCES customers (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS customers (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            city TEXT,
            notes TEXT,
            created_at TEXT NOT NULL,
            is_active BOOLEAN DEFAULT TRUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS waitlist_entries (
            id TEXT PRIMARY KEY,
            customer_id TEXT NOT NULL,
            litter_id TEXT,
            status TEXT NOT NULL,
            deposit_paid BOOLEAN NOT NULL DEFAULT FALSE,
            sex_preference TEXT,
            color_preference TEXT,
            notes TEXT,
            joined_at TEXT NOT NULL,
            FOREIGN KEY (customer_id) REFERENCES customers (id),
            FOREIGN KEY (litter_id) REFERENCES litters (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS care_logs (
            id TEXT PRIMARY KEY,
            dog_id TEXT NOT NULL,
            action TEXT NOT NULL,
            performed_on TEXT NOT NULL,
            recorded_at TEXT NOT NULL,
            quantity INTEGER,
            unit TEXT,
            notes TEXT,
            FOREIGN KEY (dog_id) REFERENCES dogs (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS milestones (
            id TEXT PRIMARY KEY,
            puppy_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            achieved_on TEXT NOT NULL,
            notes TEXT,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (puppy_id) REFERENCES puppies (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS heat_cycles (
            id TEXT PRIMARY KEY,
            dog_id TEXT NOT NULL,
            started_on TEXT NOT NULL,
            ended_on TEXT,
            cycle_length_days INTEGER,
            notes TEXT,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (dog_id) REFERENCES dogs (id)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS vaccinations (
            id TEXT PRIMARY KEY,
            dog_id TEXT NOT NULL,
            vaccine TEXT NOT NULL,
            administered_on TEXT,
            due_on TEXT,
            notes TEXT,
            recorded_at TEXT NOT NULL,
            FOREIGN KEY (dog_id) REFERENCES dogs (id)
        )",
        [],
    )?;

    create_indexes_v1(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

/// Create database indexes for version 1
fn create_indexes_v1(conn: &Connection) -> Result<(), StorageError> {
    // Care logs are almost always queried per dog and day
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_care_logs_dog_performed
         ON care_logs (dog_id, performed_on)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_care_logs_performed_on
         ON care_logs (performed_on)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_dogs_active
         ON dogs (is_active)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_puppies_litter
         ON puppies (litter_id)",
        [],
    )?;

    // Waitlist is read in queue order per litter
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_waitlist_litter_joined
         ON waitlist_entries (litter_id, joined_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_milestones_puppy
         ON milestones (puppy_id)",
        [],
    )?;

    // The latest heat per dog is the single hottest query of the cycle engine
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_heat_cycles_dog_started
         ON heat_cycles (dog_id, started_on)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_vaccinations_dog_due
         ON vaccinations (dog_id, due_on)",
        [],
    )?;

    tracing::info!("Created database indexes for v1");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_initialize_database() {
        let conn = Connection::open_in_memory().unwrap();

        // Should succeed on a fresh database
        let result = initialize_database(&conn);
        assert!(result.is_ok());

        // Should succeed when called again (idempotent)
        let result = initialize_database(&conn);
        assert!(result.is_ok());

        // Verify tables were created
        let table_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN (
                    'dogs', 'litters', 'puppies', 'customers', 'waitlist_entries',
                    'care_logs', 'milestones', 'heat_cycles', 'vaccinations'
                )",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(table_count, 9);
    }

    #[test]
    fn test_version_tracking() {
        let conn = Connection::open_in_memory().unwrap();

        // Initialize should set version to current
        initialize_database(&conn).unwrap();
        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }
}
