use ls_steam::{
    ControllerInputs, Environment, FiringMode, SteamParams, SteamPowerPlant, StartProfile, Weather,
};
use proptest::prelude::*;

fn controls() -> impl Strategy<Value = ControllerInputs> {
    (
        (0.0..=1.0f64, -1.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64),
        (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64),
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |((throttle, reverser, blower, damper), (firing_rate, injector1, injector2, firebox_door), (cocks, compressor, generator, manual))| {
                ControllerInputs {
                    throttle,
                    reverser,
                    blower,
                    damper,
                    firing_rate,
                    injector1,
                    injector2,
                    firebox_door,
                    cylinder_cocks_open: cocks,
                    compressor_on: compressor,
                    generator_on: generator,
                    gear: 0,
                    firing_mode: if manual {
                        FiringMode::Manual
                    } else {
                        FiringMode::Automatic
                    },
                }
            },
        )
}

fn environment() -> impl Strategy<Value = Environment> {
    (-30.0..=40.0f64, 0..3u8, any::<bool>()).prop_map(|(speed_mps, w, sanding)| Environment {
        speed_mps,
        weather: match w {
            0 => Weather::Dry,
            1 => Weather::Wet,
            _ => Weather::Snow,
        },
        sanding,
    })
}

fn steps() -> impl Strategy<Value = Vec<(f64, ControllerInputs, Environment)>> {
    prop::collection::vec((0.01..=2.0f64, controls(), environment()), 1..60)
}

fn check(plant: &mut SteamPowerPlant, steps: &[(f64, ControllerInputs, Environment)]) -> Result<(), TestCaseError> {
    let p = plant.params().clone();
    let d = plant.derived().clone();
    for (dt, c, env) in steps {
        let plug_was_blown = plant.state().boiler.fusible_plug_blown;
        let out = plant.advance(*dt, c, env).clone();
        let limit = match c.firing_mode {
            FiringMode::Automatic => p.max_boiler_pressure_psi,
            FiringMode::Manual => p.max_boiler_pressure_psi + 10.0,
        };
        prop_assert!(out.boiler_pressure_psi >= 0.0);
        prop_assert!(out.boiler_pressure_psi <= limit + 1e-9);
        prop_assert!((0.0..=1.0).contains(&out.water_fraction));
        prop_assert!((0.0..=1.0).contains(&out.water_gauge_level));
        prop_assert!(out.fire_mass_lb >= 0.0 && out.fire_mass_lb <= d.max_fire_mass_lb);
        prop_assert!(out.tender_coal_lb >= 0.0 && out.tender_coal_lb <= p.max_tender_coal_lb);
        prop_assert!(out.tender_water_gal >= 0.0 && out.tender_water_gal <= p.max_tender_water_gal);
        prop_assert!(out.mean_effective_pressure_psi >= 0.0);
        prop_assert!(out.burn_rate_lb_s >= 0.0 && out.burn_rate_lb_s <= d.max_burn_rate_lb_s);
        prop_assert!(out.motive_force_n.is_finite());
        prop_assert!(out.indicated_hp.is_finite() && out.indicated_hp >= 0.0);
        prop_assert!(out.usage.total().is_finite());
        let st = plant.state();
        prop_assert!(st.boiler.heat_btu >= 0.0);
        prop_assert!(st.boiler.flue_temp_f.is_finite());
        if plug_was_blown {
            prop_assert_eq!(st.fire.heat_release_btu_s, 0.0);
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn mixed_traffic_stays_physical(steps in steps()) {
        let mut plant = SteamPowerPlant::new(SteamParams::mixed_traffic(), StartProfile::Hot).unwrap();
        check(&mut plant, &steps)?;
    }

    #[test]
    fn saturated_tank_stays_physical(steps in steps()) {
        let mut plant = SteamPowerPlant::new(SteamParams::saturated_tank(), StartProfile::Cold).unwrap();
        check(&mut plant, &steps)?;
    }

    #[test]
    fn restore_never_leaves_invalid_state(
        fields in prop::array::uniform21(prop_oneof![
            -1e6..1e6f64,
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ])
    ) {
        let mut plant = SteamPowerPlant::new(SteamParams::mixed_traffic(), StartProfile::Hot).unwrap();
        plant.restore(&ls_steam::PersistedSteamState::from_fields(&fields));
        let s = plant.state().clone();
        let p = plant.params().clone();
        prop_assert!(s.boiler.pressure_psi >= 0.0 && s.boiler.pressure_psi <= p.max_boiler_pressure_psi + 10.0);
        prop_assert!((0.0..=1.0).contains(&s.boiler.water_fraction));
        prop_assert!(s.boiler.mass_lb.is_finite() && s.boiler.mass_lb > 0.0);
        prop_assert!(s.fire.fire_mass_lb >= 0.0);
        prop_assert!(s.tender.coal_lb >= 0.0 && s.tender.water_gal >= 0.0);
        let out = plant.advance(0.5, &ControllerInputs::default(), &Environment::default());
        prop_assert!(out.boiler_pressure_psi.is_finite());
        prop_assert!(out.water_fraction.is_finite());
    }
}
