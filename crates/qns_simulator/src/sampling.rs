//! Sampling optimiser: decides whether a job's measurement outcomes can be
//! drawn once from the final joint distribution (`sample_measure = true`)
//! instead of being re-simulated shot by shot.

use qns_core::Instruction;

/// Instruction names allowed to follow the first `measure` when scanning for
/// sample-measure eligibility. Any reset, or any other instruction, disables
/// the optimisation.
const SAMPLE_SAFE_AFTER_FIRST_MEASURE: &[&str] = &["measure", "barrier", "id", "u0"];

/// Decides whether `sample_measure` applies to this instruction list.
///
/// Three rules, in order:
/// 1. `shots <= 1` always disables it — there is nothing to amortise.
/// 2. An explicit `allows_measure_sampling` flag, if present, wins outright
///    (even overriding what the scan below would conclude).
/// 3. Otherwise, scan the instructions: any `reset` disqualifies; once the
///    first `measure` is seen, every subsequent instruction must be in
///    `{measure, barrier, id, u0}`.
pub fn sample_measure(
    shots: u64,
    allows_measure_sampling: Option<bool>,
    instructions: &[Instruction],
) -> bool {
    if shots <= 1 {
        return false;
    }
    if let Some(flag) = allows_measure_sampling {
        return flag;
    }
    scan_allows_sampling(instructions)
}

fn scan_allows_sampling(instructions: &[Instruction]) -> bool {
    let mut seen_measure = false;
    for instr in instructions {
        let name = instr.name.as_str();
        if name == "reset" {
            return false;
        }
        if seen_measure && !SAMPLE_SAFE_AFTER_FIRST_MEASURE.contains(&name) {
            return false;
        }
        if name == "measure" {
            seen_measure = true;
        }
    }
    true
}
