use crate::core::dates::DateValue;
use crate::domain::model::{is_base_currency, CurrencyMapping};
use crate::domain::ports::Storage;
use crate::utils::error::{RatesError, Result};

/// Currency listing cached as a JSON array under a fixed name in `storage`.
#[derive(Debug, Clone)]
pub struct MappingCache<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> MappingCache<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Loads the cached table. A missing file, an empty file and an empty
    /// array all mean the table was never initialized.
    pub async fn load(&self) -> Result<Vec<CurrencyMapping>> {
        let not_initialized = || RatesError::MappingNotInitialized {
            path: self.file_name.clone(),
        };

        let data = match self.storage.read_file(&self.file_name).await {
            Ok(data) => data,
            Err(RatesError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(not_initialized());
            }
            Err(e) => return Err(e),
        };

        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(not_initialized());
        }

        let records: Vec<CurrencyMapping> = serde_json::from_slice(&data)?;
        if records.is_empty() {
            return Err(not_initialized());
        }

        tracing::debug!(
            "Loaded {} currency mappings from {}",
            records.len(),
            self.file_name
        );
        Ok(records)
    }

    pub async fn save(&self, records: &[CurrencyMapping]) -> Result<()> {
        let json = serde_json::to_vec_pretty(records)?;
        self.storage.write_file(&self.file_name, &json).await?;
        tracing::debug!("Wrote {} bytes to {}", json.len(), self.file_name);
        Ok(())
    }
}

/// Maps ISO abbreviations to the bank's internal currency ids.
#[derive(Debug, Clone)]
pub struct CurrencyResolver<S: Storage> {
    cache: MappingCache<S>,
}

impl<S: Storage> CurrencyResolver<S> {
    pub fn new(cache: MappingCache<S>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &MappingCache<S> {
        &self.cache
    }

    /// Returns the mapping record valid for `abbreviation` on `date`.
    ///
    /// The base currency never touches the cache.
    pub async fn resolve(&self, abbreviation: &str, date: DateValue) -> Result<CurrencyMapping> {
        if is_base_currency(abbreviation) {
            return Ok(CurrencyMapping::base());
        }

        let records = self.cache.load().await?;
        lookup(&records, abbreviation, date)
    }

    pub async fn resolve_id(&self, abbreviation: &str, date: DateValue) -> Result<u32> {
        self.resolve(abbreviation, date)
            .await
            .map(|record| record.internal_id)
    }
}

/// Finds the record covering `date`. When stale data holds several covering
/// intervals, the one that started last wins, then the larger id.
pub fn lookup(
    records: &[CurrencyMapping],
    abbreviation: &str,
    date: DateValue,
) -> Result<CurrencyMapping> {
    let wanted = abbreviation.trim().to_uppercase();
    let day = date.date();

    let matches: Vec<&CurrencyMapping> = records
        .iter()
        .filter(|r| r.abbreviation.to_uppercase() == wanted && r.covers(day))
        .collect();

    if matches.len() > 1 {
        tracing::warn!(
            "{} mapping records cover {} on {}, using the most recent one",
            matches.len(),
            wanted,
            date
        );
    }

    matches
        .into_iter()
        .max_by_key(|r| (r.valid_from, r.internal_id))
        .cloned()
        .ok_or(RatesError::CurrencyNotFoundForDate {
            abbreviation: wanted,
            date: date.display(),
        })
}

/// Pairs of records whose validity intervals overlap for the same currency.
pub fn find_overlaps(records: &[CurrencyMapping]) -> Vec<(&CurrencyMapping, &CurrencyMapping)> {
    let mut sorted: Vec<&CurrencyMapping> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.abbreviation
            .to_uppercase()
            .cmp(&b.abbreviation.to_uppercase())
            .then(a.valid_from.cmp(&b.valid_from))
    });

    let mut overlaps = Vec::new();
    for (i, current) in sorted.iter().enumerate() {
        for next in &sorted[i + 1..] {
            if !current.abbreviation.eq_ignore_ascii_case(&next.abbreviation) {
                break;
            }
            if current.overlaps(next) {
                overlaps.push((*current, *next));
            }
        }
    }
    overlaps
}
