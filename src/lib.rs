/// Public library interface for the Kennel Manager MCP server
///
/// This module exports the main server implementation and public types
/// that can be used by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod cycles;
mod domain;
mod mcp;
mod storage;
mod tools;

// Re-export public modules and types
pub use cycles::{CycleEngine, DogCycleReport, VaccinationConflict};
pub use domain::*;
pub use storage::{KennelStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main kennel manager server that implements the MCP protocol
///
/// This server keeps breeding-kennel records in a SQLite database and
/// provides tools for customers, waitlists, dogs, puppies, daily care,
/// and reproductive cycle monitoring.
pub struct KennelServer {
    storage: SqliteStorage,
    engine: CycleEngine,
}

impl KennelServer {
    /// Create a new kennel server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Kennel Manager server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let engine = CycleEngine::new();

        Ok(Self { storage, engine })
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until the server is shut down or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let dogs = self.storage.list_dogs(None, None, true)?;
        tracing::info!("Server started successfully, found {} active dogs", dogs.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the cycle engine (useful for testing)
    pub fn engine(&self) -> &CycleEngine {
        &self.engine
    }
}
