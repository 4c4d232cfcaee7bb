use compartmental_workflows::cell::TwoCompartmentCell;


#[test]
fn test_cell_has_fixed_somatic_geometry() {
    let cell = TwoCompartmentCell::default();

    assert_eq!(cell.soma.length, 50.);
    assert_eq!(cell.soma.diameter, 50.);
    assert_eq!(cell.soma.nseg, 1);
    assert_eq!(cell.soma.axial_resistivity, 150.);
    assert_eq!(cell.soma.c_m, 1.);
}

#[test]
fn test_cell_has_fixed_dendritic_geometry() {
    let cell = TwoCompartmentCell::default();

    assert_eq!(cell.dendrite.length, 150.);
    assert_eq!(cell.dendrite.diameter, 10.);
    assert_eq!(cell.dendrite.nseg, 1);
    assert_eq!(cell.dendrite.axial_resistivity, 150.);
    assert_eq!(cell.dendrite.c_m, 1.);
}

#[test]
fn test_cell_has_fixed_membrane_mechanisms() {
    let cell = TwoCompartmentCell::default();

    assert_eq!(cell.soma.leak_channel.g_l, 1. / 3333.33);
    assert_eq!(cell.soma.leak_channel.e_l, -70.);
    assert_eq!(cell.soma.kdr_channel.g_kdr, 0.036);
    assert_eq!(cell.soma.kdr_channel.e_k, -77.);
    assert_eq!(cell.soma.na_channel.g_na, 0.12);
    assert_eq!(cell.soma.na_channel.e_na, 50.);
    assert_eq!(cell.dendrite.passive_channel.g_pas, 0.001);
    assert_eq!(cell.dendrite.passive_channel.e_pas, -70.);
}

#[test]
fn test_compartments_are_electrically_coupled() {
    let cell = TwoCompartmentCell::default();

    assert!(cell.coupling_resistance() > 0.);
    assert!(cell.coupling_resistance().is_finite());
}

#[test]
fn test_initialized_cell_rests_at_v_init() {
    let mut cell = TwoCompartmentCell::default();
    cell.initialize(-70.);

    assert_eq!(cell.soma.current_voltage, -70.);
    assert_eq!(cell.dendrite.current_voltage, -70.);
}
