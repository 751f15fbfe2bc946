/*
 * PI Web API Client - Rust client for the OSIsoft PI Web API
 */

// Internal modules
mod client;
pub mod models;  // Make models public
mod apis;
mod error;
mod auth;
mod config;
mod connectivity;
mod logging;
pub mod mapper;
pub mod aggregate;
mod totalizer;


// Re-export public types and interfaces
pub use client::PiWebApiClient;
pub use models::*;
pub use apis::*;
pub use error::{PiWebApiError, PiWebApiResult};
pub use auth::{resolve_credentials, Authentication, AuthType, BasicAuth, NegotiateAuth, NoAuth};
pub use config::ClientConfig;
pub use connectivity::test_connectivity;
pub use logging::Logger;
pub use aggregate::{PointUpdate, ValueUpdateReport};
pub use totalizer::Totalizer;

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        PiWebApiClient, ClientConfig, Logger,
        BasicAuth, NegotiateAuth, NoAuth,
        PiWebApiError, PiWebApiResult,
        // Common model types
        DataServer, Point, Value, ValuePayload,
        CalculationType, MergePolicy, ValueQuery,
        ValueUpdateReport, Totalizer,
    };
}
