pub mod conversion;
pub mod dates;
pub mod request;
pub mod resolver;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Conversion, CurrencyMapping, RateRecord, RefinancingRate};
pub use crate::domain::ports::{ConfigProvider, RateSource, Storage};
pub use crate::utils::error::Result;
