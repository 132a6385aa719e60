use super::models::Config;
use crate::pipeline::UrlTemplate;
use thiserror::Error;

const MIN_YEAR: u16 = 1000;
const MAX_YEAR: u16 = 9999;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("start_year ({start}) is after end_year ({end})")]
    InvertedRange { start: u16, end: u16 },

    #[error("{field} = {value} is not a four-digit year")]
    YearOutOfRange { field: &'static str, value: u16 },

    #[error("pool.workers must be at least 1")]
    NoWorkers,

    #[error("pool.handoff_capacity must be at least 1")]
    NoHandoffCapacity,

    #[error("url_template '{template}' is missing the {placeholder} placeholder")]
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_source(config)?;
    validate_pool(config)?;
    Ok(())
}

fn validate_source(config: &Config) -> Result<(), ValidationError> {
    let source = &config.source;

    for (field, value) in [("start_year", source.start_year), ("end_year", source.end_year)] {
        if !(MIN_YEAR..=MAX_YEAR).contains(&value) {
            return Err(ValidationError::YearOutOfRange { field, value });
        }
    }

    if source.start_year > source.end_year {
        return Err(ValidationError::InvertedRange {
            start: source.start_year,
            end: source.end_year,
        });
    }

    for placeholder in [UrlTemplate::YEAR, UrlTemplate::MONTH] {
        if !source.url_template.contains(placeholder) {
            return Err(ValidationError::MissingPlaceholder {
                template: source.url_template.clone(),
                placeholder,
            });
        }
    }

    Ok(())
}

fn validate_pool(config: &Config) -> Result<(), ValidationError> {
    if config.pool.workers == 0 {
        return Err(ValidationError::NoWorkers);
    }
    if config.pool.handoff_capacity == 0 {
        return Err(ValidationError::NoHandoffCapacity);
    }
    Ok(())
}
