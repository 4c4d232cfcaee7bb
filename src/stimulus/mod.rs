//! Stimulation sources, either a rectangular current injection at the soma
//! midpoint or a synaptic event train driving a conductance on the dendrite
//! midpoint through a connecting link

use rand_distr::{Distribution, Exp};
use crate::error::EngineError;


/// Current injection with a rectangular pulse (IClamp analog)
#[derive(Debug, Clone, Copy)]
pub struct CurrentClamp {
    /// Onset delay (ms)
    pub delay: f32,
    /// Pulse duration (ms)
    pub duration: f32,
    /// Pulse amplitude (nA)
    pub amplitude: f32,
    /// Current output (nA)
    pub current: f32,
}

impl CurrentClamp {
    /// Generates a clamp with the given onset delay (ms), duration (ms),
    /// and amplitude (nA)
    pub fn new(delay: f32, duration: f32, amplitude: f32) -> Self {
        CurrentClamp {
            delay,
            duration,
            amplitude,
            current: 0.,
        }
    }

    /// Updates and returns the injected current (nA) at simulation time `t` (ms)
    pub fn update_current(&mut self, t: f32) -> f32 {
        self.current = if t >= self.delay && t < self.delay + self.duration {
            self.amplitude
        } else {
            0.
        };

        self.current
    }
}

/// Generator of discrete synaptic event times (NetStim analog)
#[derive(Debug, Clone, Copy)]
pub struct IntervalSpikeTrain {
    /// Mean inter event interval (ms)
    pub interval: f32,
    /// Number of events to emit
    pub number: usize,
    /// Time of the first event (ms)
    pub start: f32,
    /// Whether inter event intervals are randomized
    pub noise: bool,
}

impl IntervalSpikeTrain {
    /// Generates a spike train with the given mean interval (ms), event
    /// count, start time (ms), and noise flag
    pub fn new(interval: f32, number: usize, start: f32, noise: bool) -> Self {
        IntervalSpikeTrain { interval, number, start, noise }
    }

    /// Emits the full set of event times (ms), `start + k * interval` when
    /// noise is off, exponentially distributed inter event intervals with
    /// the same mean when it is on
    pub fn event_times(&self) -> Result<Vec<f32>, EngineError> {
        if self.number > 1 && !(self.interval > 0.) {
            return Err(EngineError::InvalidStimulus(String::from(
                "event interval must be positive",
            )));
        }

        let mut times = Vec::with_capacity(self.number);

        if !self.noise {
            for k in 0..self.number {
                times.push(self.start + k as f32 * self.interval);
            }

            return Ok(times);
        }

        let intervals = Exp::new(1. / self.interval)
            .map_err(|_| EngineError::InvalidStimulus(String::from(
                "event interval must be positive",
            )))?;
        let mut rng = rand::thread_rng();

        let mut t = self.start;
        for _ in 0..self.number {
            times.push(t);
            t += intervals.sample(&mut rng);
        }

        Ok(times)
    }
}

/// Two state kinetic synaptic conductance on the dendrite (Exp2Syn analog),
/// normalized so a unit weight event peaks at 1 uS
#[derive(Debug, Clone, Copy)]
pub struct TwoExpSynapse {
    /// Rise time constant (ms)
    pub tau_rise: f32,
    /// Decay time constant (ms)
    pub tau_decay: f32,
    /// Reversal potential (mV)
    pub e: f32,
    /// Conductance output (uS)
    pub g: f32,
    rising_state: f32,
    decaying_state: f32,
    factor: f32,
}

impl Default for TwoExpSynapse {
    fn default() -> Self {
        TwoExpSynapse::new(0.1, 10., 0.)
    }
}

impl TwoExpSynapse {
    /// Generates a synapse with the given rise and decay time constants (ms)
    /// and reversal potential (mV), `tau_decay` must exceed `tau_rise`
    pub fn new(tau_rise: f32, tau_decay: f32, e: f32) -> Self {
        let t_peak = tau_rise * tau_decay / (tau_decay - tau_rise) * (tau_decay / tau_rise).ln();
        let factor = 1. / ((-t_peak / tau_decay).exp() - (-t_peak / tau_rise).exp());

        TwoExpSynapse {
            tau_rise,
            tau_decay,
            e,
            g: 0.,
            rising_state: 0.,
            decaying_state: 0.,
            factor,
        }
    }

    /// Registers an event with the given weight (uS)
    pub fn on_event(&mut self, weight: f32) {
        self.rising_state += weight * self.factor;
        self.decaying_state += weight * self.factor;
        self.g = self.decaying_state - self.rising_state;
    }

    /// Decays both states over one timestep (ms)
    pub fn update(&mut self, dt: f32) {
        self.rising_state *= (-dt / self.tau_rise).exp();
        self.decaying_state *= (-dt / self.tau_decay).exp();
        self.g = self.decaying_state - self.rising_state;
    }

    /// Synaptic current (nA) at the given membrane potential (mV)
    pub fn current(&self, voltage: f32) -> f32 {
        self.g * (voltage - self.e)
    }
}

/// Link between an event source and a synapse (NetCon analog)
#[derive(Debug, Clone, Copy)]
pub struct SynapticConnection {
    /// Event weight (uS)
    pub weight: f32,
    /// Delivery delay (ms)
    pub delay: f32,
    /// Detection threshold (mV) for voltage driven sources, unused by
    /// event generators
    pub threshold: f32,
}

impl Default for SynapticConnection {
    fn default() -> Self {
        SynapticConnection {
            weight: 1.,
            delay: 0.,
            threshold: 1.,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clamp_pulse_window() {
        let mut clamp = CurrentClamp::new(10., 5., 0.5);

        assert_eq!(clamp.update_current(0.), 0.);
        assert_eq!(clamp.update_current(9.975), 0.);
        assert_eq!(clamp.update_current(10.), 0.5);
        assert_eq!(clamp.update_current(12.5), 0.5);
        assert_eq!(clamp.update_current(15.), 0.);
        assert_eq!(clamp.update_current(50.), 0.);
    }

    #[test]
    fn test_deterministic_event_times() {
        let train = IntervalSpikeTrain::new(10., 5, 10., false);
        let times = train.event_times().expect("Could not generate event times");

        assert_eq!(times, vec![10., 20., 30., 40., 50.]);
    }

    #[test]
    fn test_noisy_event_times_start_on_time() {
        let train = IntervalSpikeTrain::new(10., 5, 10., true);
        let times = train.event_times().expect("Could not generate event times");

        assert_eq!(times.len(), 5);
        assert_eq!(times[0], 10.);
        for pair in times.windows(2) {
            assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn test_zero_interval_is_an_error() {
        let train = IntervalSpikeTrain::new(0., 5, 10., false);

        assert!(matches!(
            train.event_times(),
            Err(EngineError::InvalidStimulus(_)),
        ));
    }

    #[test]
    fn test_synapse_peaks_at_event_weight() {
        let mut synapse = TwoExpSynapse::default();
        synapse.on_event(1.);

        let mut max_g: f32 = 0.;
        for _ in 0..4000 {
            synapse.update(0.025);
            max_g = max_g.max(synapse.g);
        }

        assert!((max_g - 1.).abs() < 0.01);
    }

    #[test]
    fn test_synapse_is_silent_before_any_event() {
        let mut synapse = TwoExpSynapse::default();

        for _ in 0..100 {
            synapse.update(0.025);
            assert_eq!(synapse.g, 0.);
        }
    }
}
