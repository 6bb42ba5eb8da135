use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatesError {
    #[error("Invalid date format: '{input}'")]
    InvalidDateFormat { input: String },

    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Currency mapping is not initialized (cache file: {path})")]
    MappingNotInitialized { path: String },

    #[error("No currency mapping for {abbreviation} on {date}")]
    CurrencyNotFoundForDate { abbreviation: String, date: String },

    #[error("Invalid currency code: {input}")]
    InvalidCurrency { input: String },

    #[error("Currency listing returned no records")]
    EmptyMapping,

    #[error("Invalid amount: '{input}'")]
    InvalidAmount { input: String },

    #[error("Official rate of {abbreviation} is zero")]
    InvalidRate { abbreviation: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API request to {url} returned status {status}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("API request to {url} returned no data")]
    EmptyResponse { url: String },

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl RatesError {
    /// Short message meant for the terminal, without nested error chains.
    pub fn user_friendly_message(&self) -> String {
        match self {
            RatesError::InvalidDateFormat { input } => {
                format!("'{}' is not a valid date", input)
            }
            RatesError::InvalidDateRange { start, end } => {
                format!("The period {} - {} is not valid", start, end)
            }
            RatesError::MappingNotInitialized { .. } => {
                "The currency code table has not been downloaded yet".to_string()
            }
            RatesError::CurrencyNotFoundForDate { abbreviation, date } => {
                format!("Could not get data for currency {} on {}", abbreviation, date)
            }
            RatesError::InvalidCurrency { input } => {
                format!("'{}' is not a currency code", input)
            }
            RatesError::EmptyMapping => "The bank returned an empty currency list".to_string(),
            RatesError::InvalidAmount { input } => format!("'{}' is not a valid amount", input),
            RatesError::InvalidRate { abbreviation } => {
                format!("The bank quotes no usable rate for {}", abbreviation)
            }
            RatesError::ApiError(_)
            | RatesError::UnexpectedStatus { .. }
            | RatesError::EmptyResponse { .. } => {
                format!("Could not retrieve data from the bank: {}", self)
            }
            RatesError::ConfigError { .. }
            | RatesError::ConfigValidationError { .. }
            | RatesError::InvalidConfigValueError { .. } => format!("Bad configuration: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RatesError::InvalidDateFormat { .. } => {
                "Use one of: 01.01.19, 01.01.2019, 010119, 01012019 (delimiters . / -)"
            }
            RatesError::InvalidDateRange { .. } => {
                "Pass both --from and --to together with a currency, start before end"
            }
            RatesError::MappingNotInitialized { .. } | RatesError::EmptyMapping => {
                "Run the 'init' command to download the currency code table"
            }
            RatesError::CurrencyNotFoundForDate { .. } => {
                "Check the currency code, or run 'init' again to refresh the code table"
            }
            RatesError::InvalidCurrency { .. } => "Use a three letter ISO code such as USD or eur",
            RatesError::InvalidAmount { .. } => "Pass a non-negative number such as 100 or 12.50",
            RatesError::InvalidRate { .. } => "Try another date",
            RatesError::ApiError(_) | RatesError::EmptyResponse { .. } => {
                "Check the network connection and try again"
            }
            RatesError::UnexpectedStatus { .. } => {
                "Check the currency code and date, the bank may not publish this rate"
            }
            RatesError::UrlError(_)
            | RatesError::ConfigError { .. }
            | RatesError::ConfigValidationError { .. }
            | RatesError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags"
            }
            RatesError::IoError(_) => "Check file permissions and paths",
            RatesError::SerializationError(_) | RatesError::CsvError(_) => {
                "Run 'init' again if the cache file is damaged"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RatesError>;
