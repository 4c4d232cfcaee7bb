//! Loading of driver configuration files, all fields are mandatory and
//! parsed before any engine object is constructed

use std::fs::read_to_string;
use toml::{from_str, Value};
use crate::error::ConfigError;


/// Run wide parameters shared by both driver variants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Initial membrane potential (mV)
    pub v_init: f32,
    /// Stop time (ms)
    pub tstop: f32,
    /// Integration timestep (ms)
    pub dt: f32,
    /// Steps taken per millisecond, derived from `dt`
    pub steps_per_ms: f32,
}

/// Stimulation parameters for the current clamp driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentClampParameters {
    /// Onset delay (ms)
    pub delay: f32,
    /// Pulse duration (ms)
    pub duration: f32,
    /// Pulse amplitude (nA)
    pub amplitude: f32,
}

/// Stimulation parameters for the synaptic driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynapseParameters {
    /// Mean inter event interval (ms)
    pub interval: f32,
    /// Number of events to emit
    pub number: usize,
    /// Time of the first event (ms)
    pub start: f32,
    /// Whether inter event intervals are randomized
    pub noise: bool,
}

fn parse_f32(value: &Value, field_name: &str) -> Result<f32, ConfigError> {
    value
        .as_float()
        .ok_or_else(|| ConfigError::MalformedField(format!("Cannot parse {} as float", field_name)))
        .map(|v| v as f32)
}

fn parse_i64(value: &Value, field_name: &str) -> Result<i64, ConfigError> {
    value
        .as_integer()
        .ok_or_else(|| ConfigError::MalformedField(format!("Cannot parse {} as integer", field_name)))
}

fn get_section<'a>(config: &'a Value, section: &str) -> Result<&'a Value, ConfigError> {
    config
        .get(section)
        .ok_or_else(|| ConfigError::MissingSection(String::from(section)))
}

fn parse_required<T>(
    section: &Value,
    section_name: &str,
    key: &str,
    parser: impl Fn(&Value, &str) -> Result<T, ConfigError>,
) -> Result<T, ConfigError> {
    section
        .get(key)
        .ok_or_else(|| ConfigError::MissingField(format!("{}.{}", section_name, key)))
        .and_then(|value| parser(value, key))
}

/// Reads a configuration file into a TOML table
pub fn read_config(path: &str) -> Result<Value, ConfigError> {
    let contents = read_to_string(path)
        .map_err(|err| ConfigError::UnreadableFile(format!("{}: {}", path, err)))?;

    from_str(&contents).map_err(|err| ConfigError::MalformedFile(format!("{}: {}", path, err)))
}

/// Extracts the `[simulation]` section, `v_init` and `tstop` are integer
/// fields and `dt` is a float field
pub fn get_simulation_parameters(config: &Value) -> Result<SimulationParameters, ConfigError> {
    let section = get_section(config, "simulation")?;

    let v_init = parse_required(section, "simulation", "v_init", parse_i64)? as f32;
    let tstop = parse_required(section, "simulation", "tstop", parse_i64)? as f32;
    let dt = parse_required(section, "simulation", "dt", parse_f32)?;

    Ok(SimulationParameters {
        v_init,
        tstop,
        dt,
        steps_per_ms: 1. / dt,
    })
}

/// Extracts the `[stimulation]` section of the current clamp driver
pub fn get_current_clamp_parameters(config: &Value) -> Result<CurrentClampParameters, ConfigError> {
    let section = get_section(config, "stimulation")?;

    let delay = parse_required(section, "stimulation", "delay", parse_i64)? as f32;
    let duration = parse_required(section, "stimulation", "duration", parse_i64)? as f32;
    let amplitude = parse_required(section, "stimulation", "amplitude", parse_f32)?;

    Ok(CurrentClampParameters { delay, duration, amplitude })
}

/// Extracts the `[stimulation]` section of the synaptic driver, `noise` is
/// read as an integer and treated as a flag (any nonzero value enables
/// randomized intervals)
pub fn get_synapse_parameters(config: &Value) -> Result<SynapseParameters, ConfigError> {
    let section = get_section(config, "stimulation")?;

    let interval = parse_required(section, "stimulation", "interval", parse_i64)? as f32;
    let number = parse_required(section, "stimulation", "number", parse_i64)?;
    let start = parse_required(section, "stimulation", "start", parse_i64)? as f32;
    let noise = parse_required(section, "stimulation", "noise", parse_i64)?;

    if number < 0 {
        return Err(ConfigError::MalformedField(String::from(
            "stimulation.number cannot be negative",
        )));
    }

    Ok(SynapseParameters {
        interval,
        number: number as usize,
        start,
        noise: noise != 0,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const CURRENT_CLAMP_CONFIG: &str = "
        [simulation]
        v_init = -70
        tstop = 50
        dt = 0.025

        [stimulation]
        delay = 10
        duration = 5
        amplitude = 0.5
    ";

    const SYNAPSE_CONFIG: &str = "
        [simulation]
        v_init = -70
        tstop = 100
        dt = 0.025

        [stimulation]
        interval = 10
        number = 5
        start = 10
        noise = 0
    ";

    #[test]
    fn test_simulation_parameters() {
        let config: Value = from_str(CURRENT_CLAMP_CONFIG).expect("Could not parse config");
        let params = get_simulation_parameters(&config).expect("Could not extract parameters");

        assert_eq!(params.v_init, -70.);
        assert_eq!(params.tstop, 50.);
        assert_eq!(params.dt, 0.025);
        assert_eq!(params.steps_per_ms, 1. / 0.025);
    }

    #[test]
    fn test_current_clamp_parameters() {
        let config: Value = from_str(CURRENT_CLAMP_CONFIG).expect("Could not parse config");
        let params = get_current_clamp_parameters(&config).expect("Could not extract parameters");

        assert_eq!(params.delay, 10.);
        assert_eq!(params.duration, 5.);
        assert_eq!(params.amplitude, 0.5);
    }

    #[test]
    fn test_synapse_parameters() {
        let config: Value = from_str(SYNAPSE_CONFIG).expect("Could not parse config");
        let params = get_synapse_parameters(&config).expect("Could not extract parameters");

        assert_eq!(params.interval, 10.);
        assert_eq!(params.number, 5);
        assert_eq!(params.start, 10.);
        assert!(!params.noise);
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let config: Value = from_str(
            "[simulation]\nv_init = -70\ntstop = 50\n[stimulation]\ndelay = 10",
        ).expect("Could not parse config");

        assert!(matches!(
            get_simulation_parameters(&config),
            Err(ConfigError::MissingField(_)),
        ));
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let config: Value = from_str("[simulation]\nv_init = -70").expect("Could not parse config");

        assert!(matches!(
            get_current_clamp_parameters(&config),
            Err(ConfigError::MissingSection(_)),
        ));
    }

    #[test]
    fn test_integer_field_rejects_float() {
        let config: Value = from_str(
            "[simulation]\nv_init = -70.5\ntstop = 50\ndt = 0.025",
        ).expect("Could not parse config");

        assert!(matches!(
            get_simulation_parameters(&config),
            Err(ConfigError::MalformedField(_)),
        ));
    }

    #[test]
    fn test_float_field_rejects_string() {
        let config: Value = from_str(
            "[simulation]\nv_init = -70\ntstop = 50\ndt = \"fast\"",
        ).expect("Could not parse config");

        assert!(matches!(
            get_simulation_parameters(&config),
            Err(ConfigError::MalformedField(_)),
        ));
    }

    #[test]
    fn test_nonzero_noise_enables_randomization() {
        let config: Value = from_str(
            "[stimulation]\ninterval = 10\nnumber = 5\nstart = 10\nnoise = 1",
        ).expect("Could not parse config");
        let params = get_synapse_parameters(&config).expect("Could not extract parameters");

        assert!(params.noise);
    }
}
