pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{LocalStorage, NbrbClient};
pub use config::AppConfig;
pub use core::dates::{normalize_date, DateMode, DateValue};
pub use core::request::RateQuery;
pub use core::resolver::{CurrencyResolver, MappingCache};
pub use core::service::RatesService;
pub use utils::error::{RatesError, Result};
