use std::fmt::{Display, Debug, Formatter, Result};


/// Error set for potential configuration errors
pub enum ConfigError {
    /// Configuration file cannot be opened or read
    UnreadableFile(String),
    /// Configuration file is not valid TOML
    MalformedFile(String),
    /// Required section is absent
    MissingSection(String),
    /// Required field is absent (no defaulting is performed)
    MissingField(String),
    /// Field is present but has the wrong type or an invalid value
    MalformedField(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            ConfigError::UnreadableFile(details) => format!("Cannot read configuration file: {}", details),
            ConfigError::MalformedFile(details) => format!("Cannot parse configuration file: {}", details),
            ConfigError::MissingSection(section) => format!("Missing configuration section: {}", section),
            ConfigError::MissingField(field) => format!("Missing configuration field: {}", field),
            ConfigError::MalformedField(details) => format!("Malformed configuration field: {}", details),
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential simulation engine errors
pub enum EngineError {
    /// Compartment geometry is not physically meaningful
    InvalidGeometry(String),
    /// Integration timestep must be positive and finite
    InvalidTimestep,
    /// Stop time must be positive and finite
    InvalidStopTime,
    /// Stimulation source parameters are not usable
    InvalidStimulus(String),
    /// A registered probe has no matching source in the attached stimulus
    ProbeWithoutSource(String),
    /// A named recording is absent from the recording set
    RecordingNotFound(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            EngineError::InvalidGeometry(details) => format!("Invalid compartment geometry: {}", details),
            EngineError::InvalidTimestep => String::from("Timestep must be positive and finite"),
            EngineError::InvalidStopTime => String::from("Stop time must be positive and finite"),
            EngineError::InvalidStimulus(details) => format!("Invalid stimulation source: {}", details),
            EngineError::ProbeWithoutSource(probe) => format!("Probe has no matching source: {}", probe),
            EngineError::RecordingNotFound(name) => format!("Recording not found: {}", name),
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for EngineError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// Error set for potential figure rendering errors
pub enum PlotError {
    /// Figure cannot be written to disk
    FigureWriteError(String),
}

impl Display for PlotError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let err_msg = match self {
            PlotError::FigureWriteError(details) => format!("Cannot write figure: {}", details),
        };

        write!(f, "{}", err_msg)
    }
}

impl Debug for PlotError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

/// A set of errors that may occur when using the library
pub enum CompartmentalWorkflowsError {
    /// Errors related to configuration loading
    ConfigRelatedError(ConfigError),
    /// Errors related to cell construction and simulation
    EngineRelatedError(EngineError),
    /// Errors related to figure rendering
    PlotRelatedError(PlotError),
}

impl Display for CompartmentalWorkflowsError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            CompartmentalWorkflowsError::ConfigRelatedError(err) => write!(f, "{}", err),
            CompartmentalWorkflowsError::EngineRelatedError(err) => write!(f, "{}", err),
            CompartmentalWorkflowsError::PlotRelatedError(err) => write!(f, "{}", err),
        }
    }
}

impl Debug for CompartmentalWorkflowsError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "file: {}, line: {}, error: {}", file!(), line!(), self)
    }
}

impl From<ConfigError> for CompartmentalWorkflowsError {
    fn from(err: ConfigError) -> CompartmentalWorkflowsError {
        CompartmentalWorkflowsError::ConfigRelatedError(err)
    }
}

impl From<EngineError> for CompartmentalWorkflowsError {
    fn from(err: EngineError) -> CompartmentalWorkflowsError {
        CompartmentalWorkflowsError::EngineRelatedError(err)
    }
}

impl From<PlotError> for CompartmentalWorkflowsError {
    fn from(err: PlotError) -> CompartmentalWorkflowsError {
        CompartmentalWorkflowsError::PlotRelatedError(err)
    }
}
