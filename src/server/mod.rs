//! Server Module
//!
//! This module contains all server-side wiring for initializing and
//! configuring the Axum HTTP server. It provides the foundation the
//! request handlers run on.
//!
//! # Architecture
//!
//! The server module is organized into focused submodules:
//!
//! - **`state`** - Application state structure and `FromRef` implementations
//! - **`config`** - Configuration loading and validation
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading (env, database)
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # State Management
//!
//! The server uses `AppState` as the central state container, which holds:
//! - The SQLite connection pool
//! - The token service
//! - The enrollment engine
//! - The optional federated identity provider
//!
//! Every field is cheaply cloneable, so state is shared across handlers
//! by value without extra locking.
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: Reads and validates environment variables
//! 2. **Database Loading**: Opens the pool and runs migrations
//! 3. **Service Creation**: Builds the token service and enrollment engine
//! 4. **Background Tasks**: Starts the idle-lock release task
//! 5. **Router Creation**: Configures all routes and middleware
//!
//! # Example
//!
//! ```rust,no_run
//! use learnhub::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{load_database, ConfigError, FederatedProviderConfig, ServerConfig};
pub use init::create_app;
pub use state::AppState;
