//! Configuration validation
//!
//! Rules:
//! - flush budgets are usable (timeout > 0, max_batch_size >= 1)
//! - transport name is not empty
//! - transport params required by the transport type are present
//! - queue capacity, when set, is >= 1

use contracts::{ContractError, TelemetryBlueprint, TransportType};

/// Validate a TelemetryBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &TelemetryBlueprint) -> Result<(), ContractError> {
    blueprint.flush.validate()?;
    validate_transport(blueprint)?;
    validate_queue(blueprint)?;
    Ok(())
}

/// Validate transport name and type-specific params
fn validate_transport(blueprint: &TelemetryBlueprint) -> Result<(), ContractError> {
    let transport = &blueprint.transport;

    if transport.name.is_empty() {
        return Err(ContractError::config_validation(
            "transport.name",
            "transport name cannot be empty",
        ));
    }

    match transport.transport_type {
        TransportType::Http => {
            let endpoint = transport.params.get("endpoint").ok_or_else(|| {
                ContractError::config_validation(
                    "transport.params.endpoint",
                    "http transport requires an 'endpoint' param",
                )
            })?;
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ContractError::config_validation(
                    "transport.params.endpoint",
                    format!("endpoint must be an http(s) URL, got '{endpoint}'"),
                ));
            }
            if let Some(raw) = transport.params.get("timeout_ms") {
                if raw.parse::<u64>().map_or(true, |ms| ms == 0) {
                    return Err(ContractError::config_validation(
                        "transport.params.timeout_ms",
                        format!("timeout_ms must be a positive integer, got '{raw}'"),
                    ));
                }
            }
        }
        TransportType::File => {
            if transport.params.get("path").is_none_or(|p| p.is_empty()) {
                return Err(ContractError::config_validation(
                    "transport.params.path",
                    "file transport requires a 'path' param",
                ));
            }
        }
        TransportType::Log => {}
    }

    Ok(())
}

/// Validate queue bounds
fn validate_queue(blueprint: &TelemetryBlueprint) -> Result<(), ContractError> {
    if blueprint.queue.capacity == Some(0) {
        return Err(ContractError::config_validation(
            "queue.capacity",
            "capacity must be >= 1 when set",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{
        ConfigVersion, FlushConfig, QueueConfig, ScheduleConfig, TransportConfig,
    };
    use std::collections::HashMap;

    fn minimal_blueprint() -> TelemetryBlueprint {
        TelemetryBlueprint {
            version: ConfigVersion::V1,
            flush: FlushConfig::default(),
            transport: TransportConfig {
                name: "collector".into(),
                transport_type: TransportType::Http,
                params: HashMap::from([(
                    "endpoint".to_string(),
                    "https://collect.example.com/v1/batch".to_string(),
                )]),
            },
            queue: QueueConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let bp = minimal_blueprint();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_zero_flush_timeout() {
        let mut bp = minimal_blueprint();
        bp.flush.flush_timeout_ms = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("flush_timeout_ms must be > 0"), "got: {err}");
    }

    #[test]
    fn test_zero_batch_size() {
        let mut bp = minimal_blueprint();
        bp.flush.max_batch_size = 0;
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("max_batch_size must be >= 1"), "got: {err}");
    }

    #[test]
    fn test_empty_transport_name() {
        let mut bp = minimal_blueprint();
        bp.transport.name = String::new();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("cannot be empty"), "got: {err}");
    }

    #[test]
    fn test_http_requires_endpoint() {
        let mut bp = minimal_blueprint();
        bp.transport.params.clear();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("'endpoint'"), "got: {err}");
    }

    #[test]
    fn test_http_rejects_non_http_endpoint() {
        let mut bp = minimal_blueprint();
        bp.transport
            .params
            .insert("endpoint".into(), "ftp://collect.example.com".into());
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("http(s) URL"), "got: {err}");
    }

    #[test]
    fn test_http_rejects_bad_timeout() {
        let mut bp = minimal_blueprint();
        bp.transport.params.insert("timeout_ms".into(), "soon".into());
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("timeout_ms"), "got: {err}");
    }

    #[test]
    fn test_file_requires_path() {
        let mut bp = minimal_blueprint();
        bp.transport.transport_type = TransportType::File;
        bp.transport.params.clear();
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("'path'"), "got: {err}");
    }

    #[test]
    fn test_log_needs_no_params() {
        let mut bp = minimal_blueprint();
        bp.transport.transport_type = TransportType::Log;
        bp.transport.params.clear();
        assert!(validate(&bp).is_ok());
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut bp = minimal_blueprint();
        bp.queue.capacity = Some(0);
        let err = validate(&bp).unwrap_err().to_string();
        assert!(err.contains("capacity"), "got: {err}");
    }
}
