use crate::api::CalculationRequest;

pub const MAX_DELAY_MINUTES: u32 = 1440;
pub const DEFAULT_SERVICE_TYPE: &str = "standard";

/// Raw calculator inputs, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalculationForm {
    pub delay: String,
    pub service_type: String,
    pub contract_id: String,
}

impl CalculationForm {
    pub fn new(delay: impl Into<String>, service_type: impl Into<String>) -> Self {
        Self {
            delay: delay.into(),
            service_type: service_type.into(),
            contract_id: String::new(),
        }
    }

    pub fn with_contract(mut self, contract_id: impl Into<String>) -> Self {
        self.contract_id = contract_id.into();
        self
    }

    /// Builds the request body, or explains why the inputs cannot be sent.
    pub fn validate(&self) -> Result<CalculationRequest, ValidationError> {
        let delay_minutes = parse_delay(&self.delay)?;

        let service_type = match self.service_type.trim() {
            "" => DEFAULT_SERVICE_TYPE.to_string(),
            other => other.to_string(),
        };
        let contract_id = match self.contract_id.trim() {
            "" => None,
            other => Some(other.to_string()),
        };

        Ok(CalculationRequest {
            delay_minutes,
            service_type,
            contract_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("please enter the delay in minutes")]
    MissingDelay,
    #[error("delay must be a whole number of minutes, got '{0}'")]
    NotANumber(String),
    #[error("delay must be between 0 and 1440 minutes, got {0}")]
    OutOfRange(i64),
}

/// Accepts whole minutes in `[0, MAX_DELAY_MINUTES]`.
pub fn parse_delay(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingDelay);
    }

    let value: i64 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotANumber(trimmed.to_string()))?;

    u32::try_from(value)
        .ok()
        .filter(|minutes| *minutes <= MAX_DELAY_MINUTES)
        .ok_or(ValidationError::OutOfRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(parse_delay("0"), Ok(0));
        assert_eq!(parse_delay(" 1440 "), Ok(1440));
    }

    #[test]
    fn rejects_out_of_range_and_non_numeric() {
        assert_eq!(parse_delay("-1"), Err(ValidationError::OutOfRange(-1)));
        assert_eq!(parse_delay("1441"), Err(ValidationError::OutOfRange(1441)));
        assert_eq!(
            parse_delay("12.5"),
            Err(ValidationError::NotANumber("12.5".to_string()))
        );
        assert_eq!(
            parse_delay("abc"),
            Err(ValidationError::NotANumber("abc".to_string()))
        );
        assert_eq!(parse_delay("   "), Err(ValidationError::MissingDelay));
    }

    #[test]
    fn blank_optional_fields_fall_back() {
        let request = CalculationForm::new("45", "  ")
            .with_contract(" ")
            .validate()
            .expect("valid form");
        assert_eq!(request.service_type, "standard");
        assert_eq!(request.contract_id, None);

        let request = CalculationForm::new("45", "express")
            .with_contract("C-9")
            .validate()
            .expect("valid form");
        assert_eq!(request.contract_id.as_deref(), Some("C-9"));
    }
}
