//! Membrane conductance mechanisms for the two compartment cell,
//! conductances are densities (S/cm^2) so currents come out in mA/cm^2


/// Gating variable with voltage dependent opening and closing rates
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicGatingVariable {
    /// Opening rate
    pub alpha: f32,
    /// Closing rate
    pub beta: f32,
    /// Fraction of open gates
    pub state: f32,
}

impl BasicGatingVariable {
    /// Sets the gate to its steady state for the current rates
    pub fn init_state(&mut self) {
        self.state = self.alpha / (self.alpha + self.beta);
    }

    /// Advances the gate one timestep (ms)
    pub fn update(&mut self, dt: f32) {
        self.state += dt * (self.alpha * (1. - self.state) - self.beta * self.state);
    }
}

/// Handles gated current dynamics based on voltage (mV) and timestep (ms)
pub trait IonChannel {
    /// Updates gating state and current for a timestep (ms) given the
    /// membrane potential (mV)
    fn update_current(&mut self, voltage: f32, dt: f32);
    /// Returns the current (mA/cm^2)
    fn get_current(&self) -> f32;
}

/// Handles current dynamics that depend only on the membrane potential (mV)
pub trait TimestepIndependentIonChannel {
    /// Updates current based on the membrane potential (mV)
    fn update_current(&mut self, voltage: f32);
    /// Returns the current (mA/cm^2)
    fn get_current(&self) -> f32;
}

// linear extrapolation near the rate equation singularities
fn vtrap(x: f32, y: f32) -> f32 {
    if (x / y).abs() < 1e-6 {
        y * (1. - x / y / 2.)
    } else {
        x / ((x / y).exp() - 1.)
    }
}

/// Fast sodium channel inserted on the soma (`na` mechanism)
#[derive(Debug, Clone, Copy)]
pub struct NaIonChannel {
    /// Maximal conductance (S/cm^2)
    pub g_na: f32,
    /// Reversal potential (mV)
    pub e_na: f32,
    /// Activation gate
    pub m: BasicGatingVariable,
    /// Inactivation gate
    pub h: BasicGatingVariable,
    /// Current output (mA/cm^2)
    pub current: f32,
}

impl Default for NaIonChannel {
    fn default() -> Self {
        NaIonChannel {
            g_na: 0.12,
            e_na: 50.,
            m: BasicGatingVariable::default(),
            h: BasicGatingVariable::default(),
            current: 0.,
        }
    }
}

impl NaIonChannel {
    fn update_rates(&mut self, voltage: f32) {
        self.m.alpha = 0.1 * vtrap(-(voltage + 40.), 10.);
        self.m.beta = 4. * (-(voltage + 65.) / 18.).exp();
        self.h.alpha = 0.07 * (-(voltage + 65.) / 20.).exp();
        self.h.beta = 1. / ((-(voltage + 35.) / 10.).exp() + 1.);
    }

    fn calculate_current(&mut self, voltage: f32) {
        self.current = self.g_na * self.m.state.powi(3) * self.h.state * (voltage - self.e_na);
    }

    /// Sets gates to their steady state at the given voltage (mV)
    pub fn initialize_gating(&mut self, voltage: f32) {
        self.update_rates(voltage);
        self.m.init_state();
        self.h.init_state();
        self.calculate_current(voltage);
    }
}

impl IonChannel for NaIonChannel {
    fn update_current(&mut self, voltage: f32, dt: f32) {
        self.update_rates(voltage);
        self.m.update(dt);
        self.h.update(dt);
        self.calculate_current(voltage);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

/// Delayed rectifier potassium channel inserted on the soma (`kdr` mechanism)
#[derive(Debug, Clone, Copy)]
pub struct KdrIonChannel {
    /// Maximal conductance (S/cm^2)
    pub g_kdr: f32,
    /// Reversal potential (mV)
    pub e_k: f32,
    /// Activation gate
    pub n: BasicGatingVariable,
    /// Current output (mA/cm^2)
    pub current: f32,
}

impl Default for KdrIonChannel {
    fn default() -> Self {
        KdrIonChannel {
            g_kdr: 0.036,
            e_k: -77.,
            n: BasicGatingVariable::default(),
            current: 0.,
        }
    }
}

impl KdrIonChannel {
    fn update_rates(&mut self, voltage: f32) {
        self.n.alpha = 0.01 * vtrap(-(voltage + 55.), 10.);
        self.n.beta = 0.125 * (-(voltage + 65.) / 80.).exp();
    }

    fn calculate_current(&mut self, voltage: f32) {
        self.current = self.g_kdr * self.n.state.powi(4) * (voltage - self.e_k);
    }

    /// Sets the gate to its steady state at the given voltage (mV)
    pub fn initialize_gating(&mut self, voltage: f32) {
        self.update_rates(voltage);
        self.n.init_state();
        self.calculate_current(voltage);
    }
}

impl IonChannel for KdrIonChannel {
    fn update_current(&mut self, voltage: f32, dt: f32) {
        self.update_rates(voltage);
        self.n.update(dt);
        self.calculate_current(voltage);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

/// Leak channel inserted on the soma (`leak` mechanism)
#[derive(Debug, Clone, Copy)]
pub struct LeakIonChannel {
    /// Conductance (S/cm^2)
    pub g_l: f32,
    /// Reversal potential (mV)
    pub e_l: f32,
    /// Current output (mA/cm^2)
    pub current: f32,
}

impl Default for LeakIonChannel {
    fn default() -> Self {
        LeakIonChannel {
            g_l: 1. / 3333.33,
            e_l: -70.,
            current: 0.,
        }
    }
}

impl TimestepIndependentIonChannel for LeakIonChannel {
    fn update_current(&mut self, voltage: f32) {
        self.current = self.g_l * (voltage - self.e_l);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

/// Passive channel inserted on the dendrite (`pas` mechanism)
#[derive(Debug, Clone, Copy)]
pub struct PassiveChannel {
    /// Conductance (S/cm^2)
    pub g_pas: f32,
    /// Reversal potential (mV)
    pub e_pas: f32,
    /// Current output (mA/cm^2)
    pub current: f32,
}

impl Default for PassiveChannel {
    fn default() -> Self {
        PassiveChannel {
            g_pas: 0.001,
            e_pas: -70.,
            current: 0.,
        }
    }
}

impl TimestepIndependentIonChannel for PassiveChannel {
    fn update_current(&mut self, voltage: f32) {
        self.current = self.g_pas * (voltage - self.e_pas);
    }

    fn get_current(&self) -> f32 {
        self.current
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gate_steady_state_is_a_fraction() {
        for voltage in [-90., -70., -50., -30., 0., 30.] {
            let mut na_channel = NaIonChannel::default();
            na_channel.initialize_gating(voltage);

            assert!(na_channel.m.state >= 0. && na_channel.m.state <= 1.);
            assert!(na_channel.h.state >= 0. && na_channel.h.state <= 1.);

            let mut kdr_channel = KdrIonChannel::default();
            kdr_channel.initialize_gating(voltage);

            assert!(kdr_channel.n.state >= 0. && kdr_channel.n.state <= 1.);
        }
    }

    #[test]
    fn test_rates_are_finite_at_singular_voltages() {
        // alpha m is 0/0 at -40 mV and alpha n is 0/0 at -55 mV without the trap
        let mut na_channel = NaIonChannel::default();
        na_channel.initialize_gating(-40.);
        assert!(na_channel.m.alpha.is_finite());

        let mut kdr_channel = KdrIonChannel::default();
        kdr_channel.initialize_gating(-55.);
        assert!(kdr_channel.n.alpha.is_finite());
    }

    #[test]
    fn test_leak_current_vanishes_at_reversal() {
        let mut leak_channel = LeakIonChannel::default();
        leak_channel.update_current(leak_channel.e_l);

        assert_eq!(leak_channel.current, 0.);

        let mut passive_channel = PassiveChannel::default();
        passive_channel.update_current(passive_channel.e_pas);

        assert_eq!(passive_channel.current, 0.);
    }

    #[test]
    fn test_gate_update_stays_bounded() {
        let mut na_channel = NaIonChannel::default();
        na_channel.initialize_gating(-70.);

        for _ in 0..10_000 {
            na_channel.update_current(-70., 0.025);
        }

        assert!(na_channel.m.state >= 0. && na_channel.m.state <= 1.);
        assert!(na_channel.h.state >= 0. && na_channel.h.state <= 1.);
        assert!(na_channel.current.is_finite());
    }
}
