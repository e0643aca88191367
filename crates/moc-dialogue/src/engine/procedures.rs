//! Canned maintenance procedures for the system-specific fast paths,
//! reset questions and known alert messages.

use moc_protocol::{Problem, System};

/// Alert phrases with a dedicated procedure, matched as substrings.
pub const KNOWN_ALERTS: &[(&str, &str)] = &[
    (
        "apu overheat",
        "For an APU OVERHEAT message:\n\n\
         1. Shut down the APU immediately\n\
         2. Check for fluid leaks around the APU\n\
         3. Wait at least 30 minutes for cool-down\n\
         4. Consult the MEL to determine whether the flight can continue\n\n\
         This problem requires a maintenance inspection before the next flight.",
    ),
    (
        "low oil pressure",
        "For a LOW OIL PRESSURE message:\n\n\
         1. Monitor oil pressure and temperature\n\
         2. Reduce engine power if possible\n\
         3. Prepare for a possible engine shutdown\n\
         4. Consult the QRH for the specific procedure\n\n\
         This problem requires immediate maintenance attention.",
    ),
    (
        "hydraulic low level",
        "For a HYDRAULIC LOW LEVEL message:\n\n\
         1. Check for leaks in the hydraulic system\n\
         2. Monitor system pressure\n\
         3. Take the operating limitations into account\n\
         4. Consult the MEL to determine restrictions\n\n\
         This problem requires a maintenance inspection before the next flight.",
    ),
    (
        "cargo door",
        "For cargo door problems:\n\n\
         1. Verify the latching mechanisms are correctly engaged\n\
         2. Check the seals for obstructions\n\
         3. Review the door status indications\n\
         4. Consider a reset of the electrical system\n\n\
         If the problem persists, a maintenance inspection is required.",
    ),
];

/// Dedicated procedure for a known alert mentioned in `lower`.
pub fn known_alert(lower: &str) -> Option<&'static str> {
    KNOWN_ALERTS
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, procedure)| *procedure)
}

pub fn apu_start_procedure(tail: &str) -> String {
    format!(
        "To fix the APU that does not start on {tail}, check the following:\n\n\
         1. Make sure the APU master switch is in the ON position\n\
         2. Verify the fuel level and that the APU fuel valve is open\n\
         3. Review the APU-related breakers on the electrical panel\n\
         4. Check for specific error messages on the ECAM/EICAS\n\
         5. Verify the outside air temperature is within APU operating limits\n\n\
         If the APU still does not start after these checks, a system reset or a \
         detailed inspection by the maintenance team may be required."
    )
}

pub fn landing_gear_procedure(problem: &Problem, tail: &str) -> String {
    match problem {
        Problem::Inspect => format!(
            "To perform a landing gear check on {tail}, follow these steps:\n\n\
             1. Visually verify the condition of the gear components\n\
             2. Check tire pressure (it must be between 180 and 210 PSI)\n\
             3. Verify there are no hydraulic leaks at the actuators\n\
             4. Check the indicator lights work\n\
             5. Verify correct gear extension and retraction\n\n\
             If you find any anomaly, record it in the maintenance log and notify the technical team."
        ),
        Problem::NotWorking => format!(
            "For a landing gear that is not working on {tail}, check the following:\n\n\
             1. Check the hydraulic system (pressure and fluid level)\n\
             2. Verify the breakers related to the gear system\n\
             3. Inspect the actuators and locking mechanisms\n\
             4. Check the emergency extension system\n\
             5. Verify the gear position sensors\n\n\
             If the problem persists, consider the emergency extension procedure and contact the maintenance team."
        ),
        _ => format!(
            "For landing gear problems on {tail}, check the following:\n\n\
             1. Check the hydraulic system\n\
             2. Verify the mechanical components\n\
             3. Inspect the indicators and sensors\n\n\
             If you need specific assistance, provide more details about the exact problem."
        ),
    }
}

pub fn electrical_procedure(problem: &Problem, tail: &str) -> String {
    match problem {
        Problem::Inspect => format!(
            "To verify the electrical system on {tail}, follow these steps:\n\n\
             1. Check battery state and charge\n\
             2. Verify the main generators are working\n\
             3. Inspect the breaker panel and make sure every breaker is in the correct position\n\
             4. Check visible connections and wiring\n\
             5. Verify the lighting systems work\n\n\
             If you find any anomaly, document it and notify the maintenance team."
        ),
        Problem::NotWorking => format!(
            "For electrical system problems on {tail}, check the following:\n\n\
             1. Check whether the generators are working correctly\n\
             2. Verify battery state and connection\n\
             3. Inspect the breakers related to the affected system\n\
             4. Check the connections and look for damaged wiring\n\
             5. Verify whether the APU can provide backup electrical power\n\n\
             If the problem persists after these checks, contact the maintenance team for a detailed inspection."
        ),
        _ => format!(
            "For electrical system problems on {tail}, check the following:\n\n\
             1. Check batteries and generators\n\
             2. Verify breakers and connections\n\
             3. Inspect the visible wiring\n\n\
             If you need specific assistance, provide more details about the exact problem."
        ),
    }
}

pub fn reset_procedure(system: &System) -> String {
    match system {
        System::Apu => "To reset the APU, follow these steps:\n\n\
             1. Make sure the APU is completely shut down (switch in OFF)\n\
             2. Locate the APU breaker panel\n\
             3. Identify the APU breakers (usually labelled 'APU CONTROL', 'APU STARTER', etc.)\n\
             4. Pull these breakers and wait 30 seconds\n\
             5. Push the breakers back in the same order you pulled them\n\
             6. Wait 2 minutes for the system to fully restart\n\
             7. Try to start the APU following the normal procedure\n\n\
             If the APU still does not work after the reset, contact the maintenance team for a detailed inspection."
            .to_string(),
        System::Electrical => "To reset the electrical system, follow these steps:\n\n\
             1. Make sure all non-essential systems are switched off\n\
             2. Locate the main breaker panel\n\
             3. Identify the breakers of the affected electrical system\n\
             4. Pull these breakers and wait 60 seconds\n\
             5. Push the breakers back in\n\
             6. Restart the affected systems one by one\n\n\
             If the problem persists after the reset, contact the maintenance team."
            .to_string(),
        System::LandingGear => "To reset the landing gear system, follow these steps:\n\n\
             1. Make sure the aircraft is on the ground with the brakes set\n\
             2. Locate the hydraulic and electrical control panel for the gear\n\
             3. Pull the gear system breakers\n\
             4. Wait 60 seconds for the system to discharge completely\n\
             5. Push the breakers back in\n\
             6. Verify the system through the indicator lights\n\n\
             Note: this procedure must follow the aircraft-specific maintenance manual."
            .to_string(),
        other => {
            let name = other.label();
            format!(
                "To reset the {name}, you generally need to follow these steps:\n\n\
                 1. Consult the maintenance manual for the {name}\n\
                 2. Locate the related breakers\n\
                 3. Pull the specific breakers\n\
                 4. Wait the recommended time (usually 30-60 seconds)\n\
                 5. Push the breakers back in\n\
                 6. Restart the system following the normal procedure\n\n\
                 For more detailed instructions, consult the aircraft maintenance manual."
            )
        }
    }
}
