/// Storage layer for persisting kennel data
///
/// This module handles all database operations using SQLite. It provides
/// a clean interface for storing and retrieving dogs, litters, puppies,
/// customers, waitlist entries, care logs, milestones, heat cycles and
/// vaccinations.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::{
    CareLog, Customer, CustomerId, Dog, DogId, DogRole, HeatCycle, Litter, LitterId,
    Milestone, Puppy, PuppyId, Sex, Vaccination, WaitlistEntry, WaitlistEntryId,
    WaitlistStatus,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Dog not found: {dog_id}")]
    DogNotFound { dog_id: String },

    #[error("Litter not found: {litter_id}")]
    LitterNotFound { litter_id: String },

    #[error("Puppy not found: {puppy_id}")]
    PuppyNotFound { puppy_id: String },

    #[error("Customer not found: {customer_id}")]
    CustomerNotFound { customer_id: String },

    #[error("Waitlist entry not found: {entry_id}")]
    WaitlistEntryNotFound { entry_id: String },

    #[error("Heat cycle not found: {cycle_id}")]
    HeatCycleNotFound { cycle_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<crate::domain::DomainError> for StorageError {
    fn from(err: crate::domain::DomainError) -> Self {
        StorageError::InvalidInput(err.to_string())
    }
}

/// Trait defining the storage interface for the kennel
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface. Tool functions are
/// generic over it, which also keeps them testable.
pub trait KennelStorage {
    // Dogs

    /// Create a new dog profile
    fn create_dog(&self, dog: &Dog) -> Result<(), StorageError>;

    /// Get a dog by ID
    fn get_dog(&self, dog_id: &DogId) -> Result<Dog, StorageError>;

    /// Update an existing dog
    fn update_dog(&self, dog: &Dog) -> Result<(), StorageError>;

    /// Archive a dog (soft delete)
    fn archive_dog(&self, dog_id: &DogId) -> Result<(), StorageError>;

    /// List dogs with optional filtering
    fn list_dogs(
        &self,
        sex: Option<Sex>,
        role: Option<DogRole>,
        active_only: bool,
    ) -> Result<Vec<Dog>, StorageError>;

    // Litters

    /// Create a new litter
    fn create_litter(&self, litter: &Litter) -> Result<(), StorageError>;

    /// Get a litter by ID
    fn get_litter(&self, litter_id: &LitterId) -> Result<Litter, StorageError>;

    /// Update an existing litter
    fn update_litter(&self, litter: &Litter) -> Result<(), StorageError>;

    /// List litters, newest first
    fn list_litters(&self, active_only: bool) -> Result<Vec<Litter>, StorageError>;

    // Puppies

    /// Create a new puppy
    fn create_puppy(&self, puppy: &Puppy) -> Result<(), StorageError>;

    /// Get a puppy by ID
    fn get_puppy(&self, puppy_id: &PuppyId) -> Result<Puppy, StorageError>;

    /// Update an existing puppy
    fn update_puppy(&self, puppy: &Puppy) -> Result<(), StorageError>;

    /// List the puppies of a litter
    fn list_puppies_for_litter(
        &self,
        litter_id: &LitterId,
    ) -> Result<Vec<Puppy>, StorageError>;

    // Customers

    /// Create a new customer
    fn create_customer(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Get a customer by ID
    fn get_customer(&self, customer_id: &CustomerId) -> Result<Customer, StorageError>;

    /// Update an existing customer
    fn update_customer(&self, customer: &Customer) -> Result<(), StorageError>;

    /// Archive a customer (soft delete)
    fn archive_customer(&self, customer_id: &CustomerId) -> Result<(), StorageError>;

    /// List customers
    fn list_customers(&self, active_only: bool) -> Result<Vec<Customer>, StorageError>;

    // Waitlist

    /// Add a waitlist entry
    fn create_waitlist_entry(&self, entry: &WaitlistEntry) -> Result<(), StorageError>;

    /// Get a waitlist entry by ID
    fn get_waitlist_entry(
        &self,
        entry_id: &WaitlistEntryId,
    ) -> Result<WaitlistEntry, StorageError>;

    /// Update an existing waitlist entry
    fn update_waitlist_entry(&self, entry: &WaitlistEntry) -> Result<(), StorageError>;

    /// List waitlist entries in queue order (oldest join first)
    fn list_waitlist(
        &self,
        litter_id: Option<&LitterId>,
        status: Option<WaitlistStatus>,
    ) -> Result<Vec<WaitlistEntry>, StorageError>;

    // Care logs

    /// Record a care log entry
    fn create_care_log(&self, log: &CareLog) -> Result<(), StorageError>;

    /// Get care logs for a dog, newest first
    fn list_care_logs_for_dog(
        &self,
        dog_id: &DogId,
        limit: Option<u32>,
    ) -> Result<Vec<CareLog>, StorageError>;

    /// Get all care logs within a date range
    fn list_care_logs_by_date_range(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<CareLog>, StorageError>;

    // Milestones

    /// Record a puppy milestone
    fn create_milestone(&self, milestone: &Milestone) -> Result<(), StorageError>;

    /// Get the milestones recorded for a puppy
    fn list_milestones_for_puppy(
        &self,
        puppy_id: &PuppyId,
    ) -> Result<Vec<Milestone>, StorageError>;

    // Heat cycles

    /// Record a new heat cycle
    fn create_heat_cycle(&self, cycle: &HeatCycle) -> Result<(), StorageError>;

    /// Update an existing heat cycle (e.g. close it out with an end date)
    fn update_heat_cycle(&self, cycle: &HeatCycle) -> Result<(), StorageError>;

    /// Get the most recently started heat cycle for a dog
    fn latest_heat_cycle_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Option<HeatCycle>, StorageError>;

    /// Get all heat cycles for a dog, newest first
    fn list_heat_cycles_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Vec<HeatCycle>, StorageError>;

    // Vaccinations

    /// Record a vaccination
    fn create_vaccination(&self, vaccination: &Vaccination) -> Result<(), StorageError>;

    /// Get all vaccinations for a dog
    fn list_vaccinations_for_dog(
        &self,
        dog_id: &DogId,
    ) -> Result<Vec<Vaccination>, StorageError>;

    /// Get vaccinations that are due on or after the given date and not yet
    /// administered
    fn upcoming_vaccinations_for_dog(
        &self,
        dog_id: &DogId,
        today: NaiveDate,
    ) -> Result<Vec<Vaccination>, StorageError>;
}
