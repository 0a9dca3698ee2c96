//! The locomotive seen from outside: a power plant behind a common contract,
//! and a notifier for failures the crew should hear about.

use ls_core::WATER_LB_PER_GALLON;

use crate::controls::{ControllerInputs, Environment};
use crate::events::SteamEvent;
use crate::plant::SteamPowerPlant;

/// Consumption figures any power plant reports.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Consumption {
    pub fuel_lb_s: f64,
    pub water_gal_s: f64,
    pub steam_lb_s: f64,
}

/// What the vehicle dynamics need back from a tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PowerPlantOutput {
    /// Signed force at the rail (N).
    pub force_n: f64,
    pub power_w: f64,
    pub consumption: Consumption,
    pub events: Vec<SteamEvent>,
}

/// Contract shared by all power plant kinds.
pub trait PowerPlant {
    fn advance(&mut self, elapsed: f64, controls: &ControllerInputs, env: &Environment) -> PowerPlantOutput;
}

impl PowerPlant for SteamPowerPlant {
    fn advance(&mut self, elapsed: f64, controls: &ControllerInputs, env: &Environment) -> PowerPlantOutput {
        let out = SteamPowerPlant::advance(self, elapsed, controls, env);
        PowerPlantOutput {
            force_n: out.motive_force_n,
            power_w: out.indicated_power_w,
            consumption: Consumption {
                fuel_lb_s: out.fuel_feed_lb_s,
                water_gal_s: out.injector_water_lb_s / WATER_LB_PER_GALLON,
                steam_lb_s: out.usage.total(),
            },
            events: out.events.clone(),
        }
    }
}

/// Power plant kinds a locomotive can carry.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum PowerPlantModel {
    Steam(Box<SteamPowerPlant>),
}

impl PowerPlantModel {
    pub fn as_steam(&self) -> Option<&SteamPowerPlant> {
        match self {
            PowerPlantModel::Steam(p) => Some(p),
        }
    }

    pub fn as_steam_mut(&mut self) -> Option<&mut SteamPowerPlant> {
        match self {
            PowerPlantModel::Steam(p) => Some(p),
        }
    }
}

impl PowerPlant for PowerPlantModel {
    fn advance(&mut self, elapsed: f64, controls: &ControllerInputs, env: &Environment) -> PowerPlantOutput {
        match self {
            PowerPlantModel::Steam(p) => PowerPlant::advance(p.as_mut(), elapsed, controls, env),
        }
    }
}

/// Receives failure notifications for the crew.
pub trait Notifier {
    fn notify(&mut self, locomotive: &str, event: SteamEvent);
}

/// Routes notifications into the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, locomotive: &str, event: SteamEvent) {
        tracing::warn!(locomotive, event = ?event, "{}", event.describe());
    }
}

/// Keeps every notification; handy for tests and replay.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    pub received: Vec<(String, SteamEvent)>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, locomotive: &str, event: SteamEvent) {
        self.received.push((locomotive.to_string(), event));
    }
}

/// One locomotive in a train. Each is advanced on its own.
pub struct Locomotive<N: Notifier = TracingNotifier> {
    name: String,
    plant: PowerPlantModel,
    notifier: N,
}

impl Locomotive<TracingNotifier> {
    pub fn steam(plant: SteamPowerPlant) -> Self {
        Self::with_notifier(plant, TracingNotifier)
    }
}

impl<N: Notifier> Locomotive<N> {
    pub fn with_notifier(plant: SteamPowerPlant, notifier: N) -> Self {
        Self {
            name: plant.params().name.clone(),
            plant: PowerPlantModel::Steam(Box::new(plant)),
            notifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plant(&self) -> &PowerPlantModel {
        &self.plant
    }

    pub fn plant_mut(&mut self) -> &mut PowerPlantModel {
        &mut self.plant
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Advance the plant and pass failure events on to the notifier.
    pub fn advance(&mut self, elapsed: f64, controls: &ControllerInputs, env: &Environment) -> PowerPlantOutput {
        let out = self.plant.advance(elapsed, controls, env);
        for event in out.events.iter().copied().filter(|e| e.is_failure()) {
            self.notifier.notify(&self.name, event);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boiler::StartProfile;
    use crate::params::SteamParams;

    #[test]
    fn failures_reach_the_notifier() {
        let mut plant = SteamPowerPlant::new(SteamParams::saturated_tank(), StartProfile::Hot).unwrap();
        plant.set_tender_water(0.0);
        // the flag is already set, so lower it to make the tender raise it
        plant.state.tender.water_exhausted = false;
        let mut loco = Locomotive::with_notifier(plant, RecordingNotifier::default());
        loco.advance(0.1, &ControllerInputs::default(), &Environment::default());
        assert_eq!(
            loco.notifier().received,
            vec![("Saturated 0-6-2T".to_string(), SteamEvent::WaterExhausted)]
        );
    }

    #[test]
    fn output_mirrors_steam_outputs() {
        let plant = SteamPowerPlant::new(SteamParams::mixed_traffic(), StartProfile::Hot).unwrap();
        let mut loco = Locomotive::steam(plant);
        let controls = ControllerInputs {
            throttle: 1.0,
            reverser: 0.6,
            ..ControllerInputs::default()
        };
        let mut out = PowerPlantOutput::default();
        for _ in 0..20 {
            out = loco.advance(0.1, &controls, &Environment::default());
        }
        let steam = loco.plant().as_steam().unwrap().outputs();
        assert_eq!(out.force_n, steam.motive_force_n);
        assert!(out.force_n > 0.0);
    }
}
