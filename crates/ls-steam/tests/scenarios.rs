use ls_steam::{
    ControllerInputs, Environment, FiringMode, Locomotive, SteamEvent, SteamOutputs, SteamParams,
    SteamPowerPlant, StartProfile, Weather,
};

fn plant(params: SteamParams, profile: StartProfile) -> SteamPowerPlant {
    SteamPowerPlant::new(params, profile).unwrap()
}

fn manual() -> ControllerInputs {
    ControllerInputs {
        firing_mode: FiringMode::Manual,
        ..ControllerInputs::default()
    }
}

fn count(events: &[SteamEvent], which: SteamEvent) -> usize {
    events.iter().filter(|e| **e == which).count()
}

#[test]
fn cold_start_raises_steam_without_lifting_valves() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Cold);
    let max = p.params().max_boiler_pressure_psi;
    let idle = ControllerInputs::default();
    let env = Environment::default();

    let start = p.outputs().boiler_pressure_psi;
    assert!((start - 0.66 * max).abs() < 1e-9);

    let mut last = start;
    for _ in 0..1200 {
        let out = p.advance(0.5, &idle, &env);
        assert!(out.boiler_pressure_psi >= last - 1e-6, "pressure fell: {} -> {}", last, out.boiler_pressure_psi);
        assert!(out.boiler_pressure_psi <= max + 1e-9);
        assert!(!out.safety_valve_active);
        assert!(out.events.is_empty(), "unexpected events {:?}", out.events);
        last = out.boiler_pressure_psi;
    }
    assert!(last > start);
}

#[test]
fn safety_valve_lifts_and_reseats() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let max = p.params().max_boiler_pressure_psi;
    let controls = manual();
    let env = Environment::default();

    p.force_boiler_pressure(max + 10.0);
    let out = p.advance(0.1, &controls, &env);
    assert!(out.safety_valve_active);
    assert!(out.safety_valve_discharge_lb_s > 0.0);
    assert_eq!(count(&out.events, SteamEvent::SafetyValveLifted), 1);
    assert!(out.boiler_pressure_psi <= max + 10.0);

    let mut guard = 0;
    while p.outputs().boiler_pressure_psi > max - 4.0 {
        p.withdraw_heat(20_000.0);
        guard += 1;
        assert!(guard < 1_000);
    }
    let out = p.advance(0.1, &controls, &env);
    assert!(!out.safety_valve_active);
    assert_eq!(out.safety_valve_discharge_lb_s, 0.0);
    assert_eq!(count(&out.events, SteamEvent::SafetyValveSeated), 1);
}

#[test]
fn automatic_firing_never_exceeds_max_pressure() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let max = p.params().max_boiler_pressure_psi;
    let controls = ControllerInputs {
        blower: 1.0,
        damper: 1.0,
        ..ControllerInputs::default()
    };
    for _ in 0..600 {
        let out = p.advance(1.0, &controls, &Environment::default());
        assert!(out.boiler_pressure_psi <= max);
        assert!(!out.safety_valve_active);
    }
}

#[test]
fn coal_exhaustion_stops_the_fire() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let max = p.params().max_boiler_pressure_psi;
    p.set_tender_coal(0.5);
    let controls = ControllerInputs {
        blower: 1.0,
        ..ControllerInputs::default()
    };

    let mut events = Vec::new();
    for _ in 0..900 {
        let out = p.advance(1.0, &controls, &Environment::default());
        events.extend(out.events.iter().copied());
        if out.coal_exhausted {
            assert_eq!(out.fuel_feed_lb_s, 0.0);
        }
    }
    let out = p.outputs();
    assert_eq!(count(&events, SteamEvent::CoalExhausted), 1);
    assert!(out.coal_exhausted);
    assert!(out.tender_coal_lb < 0.05);
    assert!(out.burn_rate_lb_s < 1e-6);
    assert!(out.boiler_pressure_psi < max - 1.0);

    p.refill_coal(5_000.0);
    assert!(!p.outputs().coal_exhausted);
}

fn tender_runs_dry_at_burn_rate(mode: FiringMode) {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let controls = ControllerInputs {
        throttle: 0.5,
        reverser: 0.3,
        damper: 1.0,
        firing_rate: 0.0,
        firing_mode: mode,
        ..ControllerInputs::default()
    };
    let env = Environment::at_speed(15.0);
    for _ in 0..30 {
        p.advance(1.0, &controls, &env);
    }
    let burn = p.state().fire.burn_rate_lb_s;
    assert!(burn > 0.01, "fire barely burning: {burn}");

    p.set_tender_coal(0.5);
    let dt = 0.5;
    let mut t = 0.0;
    let mut slowest = burn;
    for _ in 0..200 {
        if p.state().tender.coal_exhausted {
            break;
        }
        let coal = p.state().tender.coal_lb;
        let b = p.state().fire.burn_rate_lb_s;
        slowest = slowest.min(b);
        p.advance(dt, &controls, &env);
        t += dt;
        let taken = coal - p.state().tender.coal_lb;
        assert!((taken - (b * dt).min(coal)).abs() < 1e-9, "took {taken} lb, burned {} lb", b * dt);
        assert!(t <= 0.5 / slowest + dt + 1e-9, "still {} lb after {t} s", p.state().tender.coal_lb);
    }
    assert!(p.state().tender.coal_exhausted);
    assert!(p.outputs().coal_exhausted);

    let mut last = p.state().fire.burn_rate_lb_s;
    for _ in 0..20 {
        p.advance(dt, &controls, &env);
        let b = p.state().fire.burn_rate_lb_s;
        assert!(b <= last + 1e-12);
        last = b;
    }
    assert!(last < 0.2 * burn);
}

#[test]
fn tender_runs_dry_at_burn_rate_when_hand_fired() {
    tender_runs_dry_at_burn_rate(FiringMode::Manual);
}

#[test]
fn tender_runs_dry_at_burn_rate_when_fired_automatically() {
    tender_runs_dry_at_burn_rate(FiringMode::Automatic);
}

#[test]
fn low_water_blows_fusible_plug() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let min = p.params().min_water_fraction;
    p.force_water_fraction(min - 0.05);

    let firing = ControllerInputs {
        firing_rate: 1.0,
        ..manual()
    };
    let mut events = Vec::new();
    for _ in 0..8 {
        let out = p.advance(0.5, &firing, &Environment::default());
        events.extend(out.events.iter().copied());
    }
    assert!(p.outputs().fusible_plug_blown);
    assert_eq!(count(&events, SteamEvent::FusiblePlugBlown), 1);

    for _ in 0..20 {
        let out = p.advance(0.5, &firing, &Environment::default());
        assert_eq!(out.burn_rate_lb_s, 0.0);
        assert_eq!(p.state().fire.heat_release_btu_s, 0.0);
    }

    // relighting needs the plug replaced first
    p.rekindle_fire();
    assert!(p.outputs().fusible_plug_blown);
    p.force_water_fraction(0.8);
    p.reset_failures();
    p.rekindle_fire();
    let out = p.advance(0.5, &firing, &Environment::default());
    assert!(!out.fusible_plug_blown);
    assert!(out.burn_rate_lb_s > 0.0);
}

#[test]
fn zero_or_invalid_elapsed_changes_nothing() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let controls = ControllerInputs {
        throttle: 0.5,
        reverser: 0.4,
        ..ControllerInputs::default()
    };
    let env = Environment::at_speed(8.0);
    for _ in 0..10 {
        p.advance(0.2, &controls, &env);
    }
    let state = p.state().clone();
    let outputs: SteamOutputs = p.outputs().clone();

    for dt in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let out = p.advance(dt, &controls, &env).clone();
        assert_eq!(out, outputs);
        assert_eq!(p.state(), &state);
    }
}

#[test]
fn mep_increases_with_cutoff() {
    let mut last = 0.0;
    for i in 1..=15 {
        let cutoff = i as f64 * 0.05;
        let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
        let controls = ControllerInputs {
            throttle: 1.0,
            reverser: cutoff,
            ..ControllerInputs::default()
        };
        let mep = p.advance(0.1, &controls, &Environment::at_speed(10.0)).mean_effective_pressure_psi;
        assert!(mep > 0.0);
        assert!(mep >= last, "cutoff {cutoff}: {mep} < {last}");
        last = mep;
    }
}

#[test]
fn running_engine_pulls_and_holds_level() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let params = p.params().clone();
    let controls = ControllerInputs {
        throttle: 0.5,
        reverser: 0.25,
        damper: 1.0,
        ..ControllerInputs::default()
    };
    let env = Environment::at_speed(15.0);
    for _ in 0..600 {
        let out = p.advance(0.5, &controls, &env);
        assert!(out.boiler_pressure_psi <= params.max_boiler_pressure_psi);
        assert!((0.0..=1.0).contains(&out.water_fraction));
    }
    let out = p.outputs();
    assert!(out.motive_force_n > 0.0);
    assert!(out.indicated_hp > 100.0);
    assert!(out.drawbar_pull_n < out.motive_force_n);
    assert!(out.usage.cylinders > 0.0);
    assert!(out.exhaust.particle_rate > 0.0);
    assert!(out.water_fraction > params.min_water_fraction);
    assert!(out.tender_water_gal < params.max_tender_water_gal);
}

#[test]
fn reverse_gear_gives_negative_force() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let controls = ControllerInputs {
        throttle: 1.0,
        reverser: -0.5,
        ..ControllerInputs::default()
    };
    let mut force = 0.0;
    for _ in 0..20 {
        force = p.advance(0.1, &controls, &Environment::default()).motive_force_n;
    }
    assert!(force < 0.0);
}

fn starting_effort(weather: Weather, sanding: bool) -> (bool, f64) {
    let mut p = plant(SteamParams::saturated_tank(), StartProfile::Hot);
    let controls = ControllerInputs {
        throttle: 1.0,
        reverser: 0.75,
        ..ControllerInputs::default()
    };
    let env = Environment {
        speed_mps: 0.0,
        weather,
        sanding,
    };
    for _ in 0..30 {
        p.advance(0.1, &controls, &env);
    }
    let out = p.outputs();
    (out.wheel_slip, out.tractive_effort_lbf)
}

#[test]
fn wet_rail_start_slips_unless_sanded() {
    let (dry_slip, _) = starting_effort(Weather::Dry, false);
    assert!(!dry_slip);

    let (wet_slip, wet_te) = starting_effort(Weather::Wet, false);
    assert!(wet_slip);
    let weight = SteamParams::saturated_tank().weight_on_drivers_lb;
    assert!(wet_te <= weight * 0.22 * 0.8 + 1e-6);

    let (sanded_slip, _) = starting_effort(Weather::Wet, true);
    assert!(!sanded_slip);
}

#[test]
fn geared_engine_in_neutral_makes_no_force() {
    let mut p = plant(SteamParams::geared_logger(), StartProfile::Hot);
    let mut controls = ControllerInputs {
        throttle: 1.0,
        reverser: 0.7,
        gear: 0,
        ..ControllerInputs::default()
    };
    for _ in 0..20 {
        p.advance(0.1, &controls, &Environment::default());
    }
    assert_eq!(p.outputs().motive_force_n, 0.0);

    controls.gear = 1;
    for _ in 0..20 {
        p.advance(0.1, &controls, &Environment::default());
    }
    assert!(p.outputs().motive_force_n > 0.0);
}

#[test]
fn empty_tender_starves_the_injectors() {
    let mut p = plant(SteamParams::saturated_tank(), StartProfile::Hot);
    p.set_tender_water(0.0);
    let controls = ControllerInputs {
        injector1: 1.0,
        injector2: 1.0,
        ..manual()
    };
    let out = p.advance(0.5, &controls, &Environment::default());
    assert!(out.water_exhausted);
    assert_eq!(out.injector_water_lb_s, 0.0);

    p.refill_water(1_000.0);
    let out = p.advance(0.5, &controls, &Environment::default());
    assert!(out.injector_water_lb_s > 0.0);
}

#[test]
fn two_locomotives_evolve_identically_and_independently() {
    let controls = ControllerInputs {
        throttle: 0.8,
        reverser: 0.45,
        ..ControllerInputs::default()
    };
    let env = Environment::at_speed(12.0);
    let mut a = Locomotive::steam(plant(SteamParams::mixed_traffic(), StartProfile::Hot));
    let mut b = Locomotive::steam(plant(SteamParams::mixed_traffic(), StartProfile::Hot));
    let mut idle = Locomotive::steam(plant(SteamParams::mixed_traffic(), StartProfile::Hot));
    for _ in 0..100 {
        let oa = a.advance(0.2, &controls, &env);
        let ob = b.advance(0.2, &controls, &env);
        assert_eq!(oa, ob);
        idle.advance(0.2, &ControllerInputs::default(), &env);
    }
    let sa = a.plant().as_steam().unwrap().state();
    let si = idle.plant().as_steam().unwrap().state();
    assert!(sa.cylinder.steam_usage_lb_s > si.cylinder.steam_usage_lb_s);
}

#[test]
fn snapshot_restores_through_json() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let controls = ControllerInputs {
        throttle: 0.7,
        reverser: 0.35,
        damper: 0.5,
        ..ControllerInputs::default()
    };
    for _ in 0..100 {
        p.advance(0.5, &controls, &Environment::at_speed(15.0));
    }
    let saved = p.snapshot();
    let json = serde_json::to_string(&saved).unwrap();

    let mut fresh = plant(SteamParams::mixed_traffic(), StartProfile::Cold);
    fresh.restore(&serde_json::from_str(&json).unwrap());
    assert_eq!(fresh.snapshot(), saved);
    assert_eq!(fresh.state().controls.throttle, 0.7);
}

#[test]
fn restoring_a_healthy_save_clears_a_blown_plug() {
    let controls = ControllerInputs {
        throttle: 0.5,
        reverser: 0.3,
        damper: 1.0,
        ..ControllerInputs::default()
    };
    let env = Environment::at_speed(10.0);

    let mut healthy = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    for _ in 0..20 {
        healthy.advance(0.5, &controls, &env);
    }
    let saved = healthy.snapshot();

    let mut wrecked = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    wrecked.force_water_fraction(wrecked.params().min_water_fraction - 0.05);
    for _ in 0..8 {
        wrecked.advance(0.5, &manual(), &Environment::default());
    }
    assert!(wrecked.outputs().fusible_plug_blown);

    wrecked.restore(&saved);
    assert!(!wrecked.state().boiler.fusible_plug_blown);
    assert!(!wrecked.state().boiler.priming);
    assert!(wrecked.state().fire.burn_rate_lb_s > 0.0);

    let out = wrecked.advance(0.5, &controls, &env);
    assert!(!out.fusible_plug_blown);
    assert!(out.burn_rate_lb_s > 0.0);
    assert!(out.events.is_empty(), "unexpected events {:?}", out.events);
    assert!((out.water_fraction - saved.water_fraction).abs() < 0.01);
}

#[test]
fn restore_judges_priming_from_the_saved_level() {
    let mut p = plant(SteamParams::mixed_traffic(), StartProfile::Hot);
    let mut saved = p.snapshot();
    saved.water_fraction = p.params().max_water_fraction + 0.03;
    saved.boiler_mass_lb = 0.0;
    p.restore(&saved);
    assert!(p.state().boiler.priming);

    saved.water_fraction = p.params().initial_water_fraction;
    p.restore(&saved);
    assert!(!p.state().boiler.priming);
}
