//! An explicit simulation context in place of engine wide globals, along
//! with the named recording probes populated during a run

use crate::cell::TwoCompartmentCell;
use crate::cell::ion_channels::TimestepIndependentIonChannel;
use crate::config::SimulationParameters;
use crate::error::EngineError;
use crate::stimulus::{CurrentClamp, IntervalSpikeTrain, SynapticConnection, TwoExpSynapse};


// tolerance when matching event times against the discretized clock (ms)
const EVENT_TOLERANCE: f32 = 1e-4;

/// State variables a probe can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    /// Simulation time (ms)
    Time,
    /// Membrane potential at the soma midpoint (mV)
    SomaVoltage,
    /// Injected clamp current (nA)
    ClampCurrent,
    /// Synaptic conductance (uS)
    SynapticConductance,
    /// Somatic leak current (mA/cm^2)
    SomaLeakCurrent,
    /// Somatic delayed rectifier potassium current (mA/cm^2)
    SomaKdrCurrent,
    /// Somatic fast sodium current (mA/cm^2)
    SomaNaCurrent,
    /// Dendritic passive current (mA/cm^2)
    DendritePassiveCurrent,
}

/// A named time series bound to one state variable
#[derive(Debug, Clone)]
pub struct Probe {
    /// Series name
    pub name: String,
    /// Bound state variable
    pub target: ProbeTarget,
    /// Recorded samples, one per internally taken time step
    pub samples: Vec<f32>,
}

/// The fixed set of probes populated incrementally during a run
#[derive(Debug, Clone, Default)]
pub struct RecordingSet {
    /// Registered probes
    pub probes: Vec<Probe>,
}

impl RecordingSet {
    /// Generates an empty recording set
    pub fn new() -> Self {
        RecordingSet::default()
    }

    /// Registers a probe bound to the given state variable
    pub fn add_probe(&mut self, name: &str, target: ProbeTarget) {
        self.probes.push(Probe {
            name: String::from(name),
            target,
            samples: Vec::new(),
        });
    }

    /// Returns the probe with the given name
    pub fn get(&self, name: &str) -> Option<&Probe> {
        self.probes.iter().find(|probe| probe.name == name)
    }

    /// Returns the samples of the named probe
    pub fn series(&self, name: &str) -> Result<&[f32], EngineError> {
        self.get(name)
            .map(|probe| probe.samples.as_slice())
            .ok_or_else(|| EngineError::RecordingNotFound(String::from(name)))
    }
}

/// The single stimulation source attached to the cell for a run
#[derive(Debug, Clone)]
pub enum Stimulus {
    /// Current injection at the soma midpoint
    CurrentClamp(CurrentClamp),
    /// Synaptic event train driving a conductance on the dendrite midpoint
    Synaptic {
        /// Event source
        train: IntervalSpikeTrain,
        /// Driven conductance
        synapse: TwoExpSynapse,
        /// Link between the two
        connection: SynapticConnection,
    },
}

/// Run wide state the engine would otherwise keep in ambient globals,
/// constants for the whole run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationContext {
    /// Initial membrane potential (mV)
    pub v_init: f32,
    /// Stop time (ms)
    pub tstop: f32,
    /// Integration timestep (ms)
    pub dt: f32,
    /// Steps taken per millisecond
    pub steps_per_ms: f32,
}

impl SimulationContext {
    /// Generates a context from loaded parameters, rejecting timesteps and
    /// stop times the integrator cannot honor
    pub fn new(params: &SimulationParameters) -> Result<Self, EngineError> {
        if !params.dt.is_finite() || params.dt <= 0. {
            return Err(EngineError::InvalidTimestep);
        }
        if !params.tstop.is_finite() || params.tstop <= 0. {
            return Err(EngineError::InvalidStopTime);
        }

        Ok(SimulationContext {
            v_init: params.v_init,
            tstop: params.tstop,
            dt: params.dt,
            steps_per_ms: params.steps_per_ms,
        })
    }

    /// Runs the whole integration loop, blocking until `tstop` is reached,
    /// one sample per probe at t = 0 and after every internally taken step
    pub fn run(
        &self,
        cell: &mut TwoCompartmentCell,
        stimulus: &mut Stimulus,
        recording: &mut RecordingSet,
    ) -> Result<(), EngineError> {
        cell.validate()?;

        let delivery_times: Vec<f32> = match stimulus {
            Stimulus::Synaptic { train, connection, .. } => train
                .event_times()?
                .iter()
                .map(|t| t + connection.delay)
                .collect(),
            Stimulus::CurrentClamp(_) => Vec::new(),
        };

        cell.initialize(self.v_init);

        let total_steps = (self.tstop * self.steps_per_ms).round() as usize;
        let mut next_event = 0;

        for step in 0..=total_steps {
            let t = step as f32 * self.dt;

            let (injected, synaptic) = match stimulus {
                Stimulus::CurrentClamp(clamp) => (clamp.update_current(t), 0.),
                Stimulus::Synaptic { synapse, connection, .. } => {
                    if step > 0 {
                        synapse.update(self.dt);
                    }

                    while next_event < delivery_times.len()
                        && delivery_times[next_event] <= t + EVENT_TOLERANCE
                    {
                        synapse.on_event(connection.weight);
                        next_event += 1;
                    }

                    (0., synapse.current(cell.dendrite.current_voltage))
                }
            };

            if step > 0 {
                cell.iterate(injected, synaptic, self.dt);
            }

            sample_probes(cell, stimulus, t, recording)?;
        }

        Ok(())
    }
}

fn sample_probes(
    cell: &TwoCompartmentCell,
    stimulus: &Stimulus,
    t: f32,
    recording: &mut RecordingSet,
) -> Result<(), EngineError> {
    for probe in recording.probes.iter_mut() {
        let value = match probe.target {
            ProbeTarget::Time => t,
            ProbeTarget::SomaVoltage => cell.soma.current_voltage,
            ProbeTarget::ClampCurrent => match stimulus {
                Stimulus::CurrentClamp(clamp) => clamp.current,
                Stimulus::Synaptic { .. } => {
                    return Err(EngineError::ProbeWithoutSource(probe.name.clone()));
                }
            },
            ProbeTarget::SynapticConductance => match stimulus {
                Stimulus::Synaptic { synapse, .. } => synapse.g,
                Stimulus::CurrentClamp(_) => {
                    return Err(EngineError::ProbeWithoutSource(probe.name.clone()));
                }
            },
            ProbeTarget::SomaLeakCurrent => cell.soma.leak_channel.get_current(),
            ProbeTarget::SomaKdrCurrent => cell.soma.kdr_channel.current,
            ProbeTarget::SomaNaCurrent => cell.soma.na_channel.current,
            ProbeTarget::DendritePassiveCurrent => cell.dendrite.passive_channel.get_current(),
        };

        probe.samples.push(value);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::SimulationParameters;
    use crate::stimulus::CurrentClamp;

    fn context(tstop: f32, dt: f32) -> SimulationContext {
        SimulationContext::new(&SimulationParameters {
            v_init: -70.,
            tstop,
            dt,
            steps_per_ms: 1. / dt,
        }).expect("Could not build context")
    }

    #[test]
    fn test_zero_timestep_is_rejected() {
        let params = SimulationParameters {
            v_init: -70.,
            tstop: 50.,
            dt: 0.,
            steps_per_ms: f32::INFINITY,
        };

        assert!(matches!(
            SimulationContext::new(&params),
            Err(EngineError::InvalidTimestep),
        ));
    }

    #[test]
    fn test_sample_count_matches_internal_steps() {
        let context = context(1., 0.025);
        let mut cell = TwoCompartmentCell::default();
        let mut stimulus = Stimulus::CurrentClamp(CurrentClamp::new(10., 5., 0.5));
        let mut recording = RecordingSet::new();
        recording.add_probe("t", ProbeTarget::Time);
        recording.add_probe("soma.v", ProbeTarget::SomaVoltage);

        context.run(&mut cell, &mut stimulus, &mut recording)
            .expect("Run failed");

        for probe in &recording.probes {
            assert_eq!(probe.samples.len(), 41);
        }
    }

    #[test]
    fn test_probe_without_source_is_an_error() {
        let context = context(1., 0.025);
        let mut cell = TwoCompartmentCell::default();
        let mut stimulus = Stimulus::CurrentClamp(CurrentClamp::new(10., 5., 0.5));
        let mut recording = RecordingSet::new();
        recording.add_probe("syn_exc.g", ProbeTarget::SynapticConductance);

        assert!(matches!(
            context.run(&mut cell, &mut stimulus, &mut recording),
            Err(EngineError::ProbeWithoutSource(_)),
        ));
    }

    #[test]
    fn test_missing_recording_lookup() {
        let recording = RecordingSet::new();

        assert!(matches!(
            recording.series("soma.v"),
            Err(EngineError::RecordingNotFound(_)),
        ));
    }
}
