//! Dealership data access: the API trait, its REST implementation and the
//! source collector.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐    ┌──────────────────┐
//! │  Dealership REST │    │  JSON fixture    │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//! ┌──────────────────┐    ┌──────────────────┐
//! │     RestApi      │    │    StaticApi     │
//! └────────┬─────────┘    └────────┬─────────┘
//!          │    DealershipApi      │
//!          └──────────┬────────────┘
//!                     ▼ refresh_view()
//!              ┌──────────────┐
//!              │ CalendarView │
//!              └──────────────┘
//! ```

pub mod api;
pub mod collect;
pub mod decode;
pub mod error;
#[cfg(feature = "rest")]
pub mod rest;

pub use api::{BoxFuture, DealershipApi, ErrorApi, Fetchable, StaticApi};
pub use collect::{RefreshReport, SourceOutcome, collect_batch, refresh_view};
pub use decode::decode_collection;
pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
