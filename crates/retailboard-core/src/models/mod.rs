//! Data models for retailboard

pub mod tables;

pub use tables::{
    CategoryRow, Contribution, ParetoRow, PricePoint, RevenueRiskRow, SalesRecord,
    ScoredProductRow, StoreRow, TopRevenueRow, TopSellerRow, ViewCounts,
};
