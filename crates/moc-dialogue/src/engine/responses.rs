//! Answer generation and static texts.

use moc_protocol::{Problem, System};

use super::DialogueEngine;

pub const ESCALATION_OFFER: &str =
    "Is there anything else I can help you with? If you need to talk to a specialist, type 'agent'.";

pub const HELP: &str = "\
I am the MOC maintenance assistant. I can help you with:

- Start problems (APU, engines)
- Operating faults (landing gear, hydraulic, electrical)
- Error and warning messages
- Inspection and reset procedures

For a faster answer, include in your message:
1. The affected system (APU, engine, landing gear, etc.)
2. The specific problem (does not start, error, check, etc.)
3. The aircraft tail number (format CC-XXX)

Example: \"The APU of CC-AWN does not start\"

Commands:
- 'examples': see example questions
- 'new inquiry': start over with another problem
- 'urgent': mark your inquiry as urgent
- 'agent': talk to a maintenance specialist";

pub const EXAMPLES: &str = "\
Example questions:

Start problems:
- The APU of CC-AWN does not start
- Engine 2 of CC-BAW won't start

Operating faults:
- The landing gear of CC-COP is not working
- Hydraulic system malfunction on CC-AWN

Error messages:
- Electrical warning on CC-BAW
- Error message in the cockpit of CC-COP

Inspections and resets:
- Check the landing gear of CC-AWN
- How do I reset the APU?

Specific alerts:
- APU OVERHEAT on CC-AWN
- LOW OIL PRESSURE on engine 1";

/// Canned answers by (system, problem). A choice among variants is made by
/// the engine's [`crate::Chooser`].
const CANNED_ANSWERS: &[(System, Problem, &[&str])] = &[
    (
        System::Apu,
        Problem::NoStart,
        &[
            "For an APU that does not start, first verify the fuel supply and the APU-related \
             breakers, then check the ECAM/EICAS for specific error messages.",
            "An APU start failure is usually caused by fuel supply, the starter or the control \
             unit. Check the fuel valve, the APU breakers and any ECAM/EICAS message before \
             attempting another start.",
        ],
    ),
    (
        System::Engine,
        Problem::NoStart,
        &[
            "For an engine that does not start, verify fuel supply, the ignition system and \
             starter air pressure. Review the ECAM/EICAS for related messages.",
        ],
    ),
    (
        System::LandingGear,
        Problem::NotWorking,
        &[
            "For landing gear faults, check hydraulic pressure, the gear-related breakers and \
             the position indications, and consider the emergency extension procedure.",
        ],
    ),
    (
        System::Hydraulic,
        Problem::Error,
        &[
            "For a hydraulic warning, check the fluid level in the reservoirs, look for visible \
             leaks and verify the pump pressure readings against the normal range.",
            "A hydraulic system alert usually points to low fluid level, low pressure or a pump \
             fault. Inspect the reservoirs and lines for leaks and compare pressures with the \
             limits in the manual.",
        ],
    ),
    (
        System::Electrical,
        Problem::Error,
        &[
            "For an electrical warning, check generator output, battery voltage and the breaker \
             panel, and note the exact message shown on the ECAM/EICAS.",
        ],
    ),
    (
        System::Galley,
        Problem::NotWorking,
        &[
            "For a galley fault, check the galley power breakers and the equipment power \
             switches, then reset the affected unit following the cabin procedures.",
        ],
    ),
];

fn canned_variants(system: &System, problem: &Problem) -> Option<&'static [&'static str]> {
    CANNED_ANSWERS
        .iter()
        .find(|(s, p, _)| s == system && p == problem)
        .map(|(_, _, variants)| *variants)
}

/// Answer for a fully known (system, problem) pair.
///
/// Manual knowledge first, then a canned answer, then a generic checklist.
/// A failing knowledge lookup is logged and treated as a miss.
pub fn generate_answer(engine: &DialogueEngine, system: &System, problem: &Problem) -> String {
    match engine.knowledge.lookup(system, problem) {
        Ok(Some(section)) => {
            return format!(
                "According to the maintenance manual:\n\n{section}\n\n\
                 Following these steps should resolve the problem. If you need more \
                 information, type 'agent' to talk to a specialist."
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(system = %system, problem = %problem, error = %e, "knowledge lookup failed");
        }
    }

    if let Some(variants) = canned_variants(system, problem)
        && !variants.is_empty()
    {
        let index = engine.chooser.pick(variants.len()).min(variants.len() - 1);
        return format!(
            "{}\n\nI hope this helps. If you need more assistance, give me more details about the problem.",
            variants[index]
        );
    }

    format!(
        "I detected a \"{}\" problem on the {}. For this kind of situation, check the following:\n\n\
         1. Review the system status indications and any related messages\n\
         2. Verify the breakers and connections of the {}\n\
         3. Consult the relevant section of the maintenance manual\n\n\
         If the problem persists, provide more details or type 'agent' to talk to a specialist.",
        problem.label(),
        system.label(),
        system.label()
    )
}
