//! Driver level workflows, each one loads a configuration file, builds the
//! two compartment cell with its stimulation source, runs the integration,
//! and can render the recorded traces as a four panel figure

use crate::config::{
    get_current_clamp_parameters, get_simulation_parameters, get_synapse_parameters, read_config,
};
use crate::cell::TwoCompartmentCell;
use crate::error::CompartmentalWorkflowsError;
use crate::plot::{render_figure, PanelSpec, Series, LINE_BLUE, LINE_GREEN, LINE_RED};
use crate::simulation::{ProbeTarget, RecordingSet, SimulationContext, Stimulus};
use crate::stimulus::{CurrentClamp, IntervalSpikeTrain, SynapticConnection, TwoExpSynapse};


/// Completed run with its context and populated recordings
pub struct ExperimentResult {
    /// Context the run was integrated under
    pub context: SimulationContext,
    /// Populated probes
    pub recordings: RecordingSet,
}

/// Probes recorded by the current clamp workflow
pub fn current_clamp_recording_set() -> RecordingSet {
    let mut recording = RecordingSet::new();
    recording.add_probe("t", ProbeTarget::Time);
    recording.add_probe("soma.v", ProbeTarget::SomaVoltage);
    recording.add_probe("ccl.i", ProbeTarget::ClampCurrent);
    recording.add_probe("soma.il_leak", ProbeTarget::SomaLeakCurrent);
    recording.add_probe("soma.ikd_kdr", ProbeTarget::SomaKdrCurrent);
    recording.add_probe("soma.ina_na", ProbeTarget::SomaNaCurrent);
    recording.add_probe("dend.i_pas", ProbeTarget::DendritePassiveCurrent);

    recording
}

/// Probes recorded by the synaptic workflow
pub fn synapse_recording_set() -> RecordingSet {
    let mut recording = RecordingSet::new();
    recording.add_probe("t", ProbeTarget::Time);
    recording.add_probe("soma.v", ProbeTarget::SomaVoltage);
    recording.add_probe("syn_exc.g", ProbeTarget::SynapticConductance);
    recording.add_probe("soma.il_leak", ProbeTarget::SomaLeakCurrent);
    recording.add_probe("soma.ikd_kdr", ProbeTarget::SomaKdrCurrent);
    recording.add_probe("soma.ina_na", ProbeTarget::SomaNaCurrent);
    recording.add_probe("dend.i_pas", ProbeTarget::DendritePassiveCurrent);

    recording
}

fn run(
    context: SimulationContext,
    mut stimulus: Stimulus,
    mut recording: RecordingSet,
) -> Result<ExperimentResult, CompartmentalWorkflowsError> {
    let mut cell = TwoCompartmentCell::default();
    context.run(&mut cell, &mut stimulus, &mut recording)?;

    Ok(ExperimentResult {
        context,
        recordings: recording,
    })
}

/// Runs the current clamp workflow described by the given configuration
/// file, all fields are validated before any engine object is built
pub fn run_current_clamp_experiment(
    config_path: &str,
) -> Result<ExperimentResult, CompartmentalWorkflowsError> {
    let config = read_config(config_path)?;
    let simulation_params = get_simulation_parameters(&config)?;
    let clamp_params = get_current_clamp_parameters(&config)?;

    let context = SimulationContext::new(&simulation_params)?;
    let stimulus = Stimulus::CurrentClamp(CurrentClamp::new(
        clamp_params.delay,
        clamp_params.duration,
        clamp_params.amplitude,
    ));

    run(context, stimulus, current_clamp_recording_set())
}

/// Runs the synaptic workflow described by the given configuration file,
/// all fields are validated before any engine object is built
pub fn run_synapse_experiment(
    config_path: &str,
) -> Result<ExperimentResult, CompartmentalWorkflowsError> {
    let config = read_config(config_path)?;
    let simulation_params = get_simulation_parameters(&config)?;
    let synapse_params = get_synapse_parameters(&config)?;

    let context = SimulationContext::new(&simulation_params)?;
    let stimulus = Stimulus::Synaptic {
        train: IntervalSpikeTrain::new(
            synapse_params.interval,
            synapse_params.number,
            synapse_params.start,
            synapse_params.noise,
        ),
        synapse: TwoExpSynapse::default(),
        connection: SynapticConnection::default(),
    };

    run(context, stimulus, synapse_recording_set())
}

fn render(
    result: &ExperimentResult,
    stimulus_title: &str,
    stimulus_name: &str,
    stimulus_y_label: &str,
    path: &str,
) -> Result<(), CompartmentalWorkflowsError> {
    let time = result.recordings.series("t")?;
    let voltage = result.recordings.series("soma.v")?;
    let stimulus_trace = result.recordings.series(stimulus_name)?;
    let leak = result.recordings.series("soma.il_leak")?;
    let kdr = result.recordings.series("soma.ikd_kdr")?;
    let na = result.recordings.series("soma.ina_na")?;
    let passive = result.recordings.series("dend.i_pas")?;

    let panels = [
        PanelSpec {
            title: "Soma Voltage",
            y_label: "mV",
            series: vec![Series { label: "soma.v", color: LINE_BLUE, values: voltage }],
        },
        PanelSpec {
            title: stimulus_title,
            y_label: stimulus_y_label,
            series: vec![Series {
                label: stimulus_name,
                color: LINE_RED,
                values: stimulus_trace,
            }],
        },
        PanelSpec {
            title: "Sodium, Potassium, and Leak Currents",
            y_label: "nA",
            series: vec![
                Series { label: "soma.il_leak", color: LINE_RED, values: leak },
                Series { label: "soma.ikd_kdr", color: LINE_BLUE, values: kdr },
                Series { label: "soma.ina_na", color: LINE_GREEN, values: na },
            ],
        },
        PanelSpec {
            title: "Dendrite Passive Current",
            y_label: "nA",
            series: vec![Series { label: "dend.pas", color: LINE_RED, values: passive }],
        },
    ];

    render_figure(time, &panels, result.context.tstop, path)?;

    Ok(())
}

/// Renders the four panel figure of a current clamp run to `path`
pub fn render_current_clamp_figure(
    result: &ExperimentResult,
    path: &str,
) -> Result<(), CompartmentalWorkflowsError> {
    render(result, "Current Clamp", "ccl.i", "nA", path)
}

/// Renders the four panel figure of a synaptic run to `path`
pub fn render_synapse_figure(
    result: &ExperimentResult,
    path: &str,
) -> Result<(), CompartmentalWorkflowsError> {
    render(result, "Excitatory Synapse", "syn_exc.g", "Siemens/cm^2", path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_current_clamp_recording_set_names() {
        let recording = current_clamp_recording_set();
        let names: Vec<&str> = recording.probes.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "t", "soma.v", "ccl.i",
                "soma.il_leak", "soma.ikd_kdr", "soma.ina_na", "dend.i_pas",
            ],
        );
    }

    #[test]
    fn test_synapse_recording_set_names() {
        let recording = synapse_recording_set();
        let names: Vec<&str> = recording.probes.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "t", "soma.v", "syn_exc.g",
                "soma.il_leak", "soma.ikd_kdr", "soma.ina_na", "dend.i_pas",
            ],
        );
    }

    #[test]
    fn test_missing_config_file_is_a_config_error() {
        let result = run_current_clamp_experiment("does_not_exist.toml");

        assert!(matches!(
            result,
            Err(CompartmentalWorkflowsError::ConfigRelatedError(_)),
        ));
    }
}
