//! # Compartmental Workflows
//!
//! A configurable two compartment biophysical neuron simulation, a soma
//! carrying Hodgkin Huxley style sodium, potassium, and leak mechanisms
//! coupled to a passive dendrite, stimulated either by a somatic current
//! injection or by a synaptic event train on the dendrite, with recorded
//! traces rendered as a four panel PNG figure
//!
//! Example of running a workflow from a configuration file:
//!
//! ```no_run
//! use compartmental_workflows::error::CompartmentalWorkflowsError;
//! use compartmental_workflows::experiment::{
//!     render_current_clamp_figure, run_current_clamp_experiment,
//! };
//!
//! fn main() -> Result<(), CompartmentalWorkflowsError> {
//!     let result = run_current_clamp_experiment("SimpleCurrentInjection.toml")?;
//!     render_current_clamp_figure(&result, "SimpleCurrentInjection.png")?;
//!
//!     let voltage = result.recordings.series("soma.v")?;
//!     println!("final membrane potential: {} mV", voltage[voltage.len() - 1]);
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod config;
pub mod cell;
pub mod stimulus;
pub mod simulation;
pub mod plot;
pub mod experiment;
