//! retailboard-core - Core library for retailboard
//!
//! Provides typed row models, the SQLite data store, and the metrics
//! computation layer behind the retail sales dashboard.

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod sections;
pub mod store;

pub use config::{AnalyticsConfig, RetailboardConfig, StoreConfig};
pub use error::{CoreError, Result};
pub use sections::{compute, ParetoAnalysis, ProductPerformance, Section, SectionInput, SectionReport};
pub use store::DataStore;
