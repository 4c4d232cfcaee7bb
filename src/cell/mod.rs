//! A two compartment cell with a fixed soma and dendrite, the dendrite's
//! proximal end is connected to the soma's distal end and the two exchange
//! axial current through the summed half axial resistances of each section

use std::f32::consts::PI;
use crate::error::EngineError;

pub mod ion_channels;
use ion_channels::{
    IonChannel, TimestepIndependentIonChannel,
    NaIonChannel, KdrIonChannel, LeakIonChannel, PassiveChannel,
};


// membrane current densities are mA/cm^2, point currents are nA
const MA_PER_CM2_TO_UA_PER_CM2: f32 = 1e3;
const NA_TO_UA: f32 = 1e-3;

/// Somatic compartment carrying leak, delayed rectifier potassium,
/// and fast sodium mechanisms
#[derive(Debug, Clone, Copy)]
pub struct Soma {
    /// Membrane potential (mV)
    pub current_voltage: f32,
    /// Section length (um)
    pub length: f32,
    /// Section diameter (um)
    pub diameter: f32,
    /// Number of numerical subdivisions
    pub nseg: usize,
    /// Axial resistivity (ohm cm)
    pub axial_resistivity: f32,
    /// Membrane capacitance (uF/cm^2)
    pub c_m: f32,
    /// Leak channel
    pub leak_channel: LeakIonChannel,
    /// Delayed rectifier potassium channel
    pub kdr_channel: KdrIonChannel,
    /// Fast sodium channel
    pub na_channel: NaIonChannel,
}

impl Default for Soma {
    fn default() -> Self {
        Soma {
            current_voltage: 0.,
            length: 50.,
            diameter: 50.,
            nseg: 1,
            axial_resistivity: 150.,
            c_m: 1.,
            leak_channel: LeakIonChannel::default(),
            kdr_channel: KdrIonChannel::default(),
            na_channel: NaIonChannel::default(),
        }
    }
}

impl Soma {
    /// Membrane surface area (cm^2)
    pub fn surface_area(&self) -> f32 {
        PI * self.diameter * self.length * 1e-8
    }

    /// Axial resistance from the section midpoint to one end (megaohm)
    pub fn half_axial_resistance(&self) -> f32 {
        half_axial_resistance(self.axial_resistivity, self.length, self.diameter)
    }

    fn update_channels(&mut self, dt: f32) {
        self.na_channel.update_current(self.current_voltage, dt);
        self.kdr_channel.update_current(self.current_voltage, dt);
        self.leak_channel.update_current(self.current_voltage);
    }

    /// Total membrane current density (mA/cm^2)
    pub fn membrane_current(&self) -> f32 {
        self.na_channel.current + self.kdr_channel.current + self.leak_channel.current
    }
}

/// Dendritic compartment carrying a passive mechanism
#[derive(Debug, Clone, Copy)]
pub struct Dendrite {
    /// Membrane potential (mV)
    pub current_voltage: f32,
    /// Section length (um)
    pub length: f32,
    /// Section diameter (um)
    pub diameter: f32,
    /// Number of numerical subdivisions
    pub nseg: usize,
    /// Axial resistivity (ohm cm)
    pub axial_resistivity: f32,
    /// Membrane capacitance (uF/cm^2)
    pub c_m: f32,
    /// Passive channel
    pub passive_channel: PassiveChannel,
}

impl Default for Dendrite {
    fn default() -> Self {
        Dendrite {
            current_voltage: 0.,
            length: 150.,
            diameter: 10.,
            nseg: 1,
            axial_resistivity: 150.,
            c_m: 1.,
            passive_channel: PassiveChannel::default(),
        }
    }
}

impl Dendrite {
    /// Membrane surface area (cm^2)
    pub fn surface_area(&self) -> f32 {
        PI * self.diameter * self.length * 1e-8
    }

    /// Axial resistance from the section midpoint to one end (megaohm)
    pub fn half_axial_resistance(&self) -> f32 {
        half_axial_resistance(self.axial_resistivity, self.length, self.diameter)
    }
}

fn half_axial_resistance(axial_resistivity: f32, length: f32, diameter: f32) -> f32 {
    let radius_cm = diameter * 1e-4 / 2.;
    let half_length_cm = length * 1e-4 / 2.;

    axial_resistivity * half_length_cm / (PI * radius_cm * radius_cm) * 1e-6
}

fn validate_section(
    name: &str,
    length: f32,
    diameter: f32,
    nseg: usize,
) -> Result<(), EngineError> {
    if !(length > 0.) || !(diameter > 0.) {
        return Err(EngineError::InvalidGeometry(format!(
            "{} must have positive length and diameter", name,
        )));
    }
    if nseg == 0 {
        return Err(EngineError::InvalidGeometry(format!(
            "{} must have at least one subdivision", name,
        )));
    }

    Ok(())
}

/// The fixed two compartment cell, compartments are created once at
/// construction and never resized
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoCompartmentCell {
    /// Somatic compartment
    pub soma: Soma,
    /// Dendritic compartment
    pub dendrite: Dendrite,
}

impl TwoCompartmentCell {
    /// Axial resistance between the two compartment midpoints (megaohm)
    pub fn coupling_resistance(&self) -> f32 {
        self.soma.half_axial_resistance() + self.dendrite.half_axial_resistance()
    }

    /// Checks that both compartments are physically meaningful
    pub fn validate(&self) -> Result<(), EngineError> {
        validate_section("soma", self.soma.length, self.soma.diameter, self.soma.nseg)?;
        validate_section(
            "dendrite",
            self.dendrite.length,
            self.dendrite.diameter,
            self.dendrite.nseg,
        )?;

        Ok(())
    }

    /// Sets both compartments to the initial voltage (mV) and every gate
    /// to its steady state
    pub fn initialize(&mut self, v_init: f32) {
        self.soma.current_voltage = v_init;
        self.dendrite.current_voltage = v_init;

        self.soma.na_channel.initialize_gating(v_init);
        self.soma.kdr_channel.initialize_gating(v_init);
        self.soma.leak_channel.update_current(v_init);
        self.dendrite.passive_channel.update_current(v_init);
    }

    /// Advances both compartments one timestep (ms) given the injected
    /// somatic current and the synaptic dendritic current (nA)
    pub fn iterate(&mut self, soma_injected: f32, dendrite_synaptic: f32, dt: f32) {
        self.soma.update_channels(dt);
        self.dendrite.passive_channel.update_current(self.dendrite.current_voltage);

        // axial current flows into the soma when the dendrite sits above it (nA)
        let axial = (self.dendrite.current_voltage - self.soma.current_voltage)
            / self.coupling_resistance();

        let soma_membrane = self.soma.membrane_current() * MA_PER_CM2_TO_UA_PER_CM2;
        let soma_point = (soma_injected + axial) * NA_TO_UA / self.soma.surface_area();
        self.soma.current_voltage += dt * (soma_point - soma_membrane) / self.soma.c_m;

        let dendrite_membrane = self.dendrite.passive_channel.get_current()
            * MA_PER_CM2_TO_UA_PER_CM2;
        let dendrite_point = (-axial - dendrite_synaptic) * NA_TO_UA
            / self.dendrite.surface_area();
        self.dendrite.current_voltage += dt * (dendrite_point - dendrite_membrane)
            / self.dendrite.c_m;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_initialize_sets_both_compartments() {
        let mut cell = TwoCompartmentCell::default();
        cell.initialize(-70.);

        assert_eq!(cell.soma.current_voltage, -70.);
        assert_eq!(cell.dendrite.current_voltage, -70.);
        assert!(cell.soma.na_channel.m.state > 0. && cell.soma.na_channel.m.state < 1.);
        assert!(cell.soma.kdr_channel.n.state > 0. && cell.soma.kdr_channel.n.state < 1.);
    }

    #[test]
    fn test_coupling_resistance_is_dominated_by_the_dendrite() {
        let cell = TwoCompartmentCell::default();

        assert!(cell.coupling_resistance() > 0.);
        assert!(cell.dendrite.half_axial_resistance() > cell.soma.half_axial_resistance());
    }

    #[test]
    fn test_validate_rejects_zero_diameter() {
        let mut cell = TwoCompartmentCell::default();
        cell.dendrite.diameter = 0.;

        assert!(matches!(cell.validate(), Err(EngineError::InvalidGeometry(_))));
    }

    #[test]
    fn test_unstimulated_cell_stays_near_rest() {
        let mut cell = TwoCompartmentCell::default();
        cell.initialize(-70.);

        for _ in 0..40_000 {
            cell.iterate(0., 0., 0.025);
        }

        assert!(cell.soma.current_voltage.is_finite());
        assert!(cell.soma.current_voltage > -90. && cell.soma.current_voltage < -50.);
        assert!(cell.dendrite.current_voltage > -90. && cell.dendrite.current_voltage < -50.);
    }
}
