//! Fixed-point resolution loop over an unordered instruction list.
//!
//! Instructions carry no dependency edges, so feasibility is discovered by
//! repeated attempt-and-observe: each pass scans the list in original order
//! and tries every incomplete instruction once. The system is monotone — an
//! exchanger only frees capacity when a route out of it succeeds — so the
//! first pass that completes nothing proves no future pass can either, and
//! the loop halts. Instructions left incomplete at that point are reported,
//! not raised: an unsatisfiable set is a caller-visible diagnostic.

use tracing::debug;

use crate::core::registry::Registry;
use crate::core::types::Instruction;

/// One instruction plus the scheduler-owned flags for it.
///
/// `completed` is set exactly once, the moment the action succeeds.
/// `compared` is set exactly once, the first time a route finds its source
/// full — the history entry is recorded then, before any release is
/// attempted, whatever the outcome of the releases.
#[derive(Debug, Clone)]
struct Slot {
    instruction: Instruction,
    completed: bool,
    compared: bool,
}

/// Summary of a resolution run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Full scans performed, including the final zero-progress scan.
    pub passes: u32,
    /// Instructions that executed.
    pub completed: usize,
    /// Instructions still incomplete at convergence.
    pub pending: usize,
}

/// Drives an instruction list to convergence against a registry.
#[derive(Debug, Clone)]
pub struct Scheduler {
    slots: Vec<Slot>,
}

impl Scheduler {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let slots = instructions
            .into_iter()
            .map(|instruction| Slot {
                instruction,
                completed: false,
                compared: false,
            })
            .collect();
        Self { slots }
    }

    /// Run passes until one makes zero progress.
    pub fn run(&mut self, registry: &mut Registry) -> Resolution {
        let mut passes = 0u32;
        loop {
            passes += 1;
            let progress = self.pass(registry);
            debug!(pass = passes, progress, "resolution pass finished");
            if progress == 0 {
                break;
            }
        }
        Resolution {
            passes,
            completed: self.slots.iter().filter(|slot| slot.completed).count(),
            pending: self.pending(),
        }
    }

    /// Instructions not yet completed.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.completed).count()
    }

    /// One full scan in original order. Returns the number of instructions
    /// newly completed.
    fn pass(&mut self, registry: &mut Registry) -> u32 {
        let mut progress = 0u32;
        for slot in &mut self.slots {
            if slot.completed {
                continue;
            }
            match &slot.instruction {
                Instruction::Supply { target, token } => {
                    if registry.exchanger(target).accept(*token) {
                        debug!(%token, to = %target, "supplied token");
                        slot.completed = true;
                        progress += 1;
                    } else {
                        debug!(%token, to = %target, "supply blocked: no capacity");
                    }
                }
                Instruction::Route { source, low, high } => {
                    let Some((low_token, high_token)) = registry.exchanger(source).sorted_pair()
                    else {
                        continue;
                    };
                    // History reflects the pair observed when the route first
                    // becomes able to execute, before either release.
                    if !slot.compared {
                        registry
                            .exchanger(source)
                            .record_comparison(low_token, high_token);
                        slot.compared = true;
                    }
                    if registry.try_route(source, low, high) {
                        debug!(
                            source = %source,
                            %low_token,
                            low_to = %low.name,
                            %high_token,
                            high_to = %high.name,
                            "routed pair"
                        );
                        slot.completed = true;
                        progress += 1;
                    } else {
                        debug!(source = %source, "route blocked: destination full");
                    }
                }
            }
        }
        progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_instructions;
    use crate::core::types::{Comparison, Token};

    fn resolve(lines: &[&str]) -> (Registry, Resolution) {
        let outcome = parse_instructions(lines);
        assert!(outcome.malformed.is_empty(), "test input must parse");
        let mut registry = Registry::new();
        let mut scheduler = Scheduler::new(outcome.instructions);
        let resolution = scheduler.run(&mut registry);
        (registry, resolution)
    }

    // Scenario from the worked example: bot 2 compares (2,5), bot 1 compares
    // (2,3), and the three outputs end with single tokens 5, 2, 3.
    #[test]
    fn worked_example_converges_to_expected_state() {
        let (registry, resolution) = resolve(&[
            "value 5 goes to bot 2",
            "value 3 goes to bot 1",
            "value 2 goes to bot 2",
            "bot 2 gives low to bot 1 and high to bot 0",
            "bot 1 gives low to output 1 and high to bot 0",
            "bot 0 gives low to output 2 and high to output 0",
        ]);

        assert_eq!(resolution.completed, 6);
        assert_eq!(resolution.pending, 0);

        let bot2 = registry.expect_exchanger("2").unwrap();
        assert_eq!(
            bot2.history(),
            &[Comparison {
                low: Token(2),
                high: Token(5),
            }]
        );
        let bot1 = registry.expect_exchanger("1").unwrap();
        assert_eq!(
            bot1.history(),
            &[Comparison {
                low: Token(2),
                high: Token(3),
            }]
        );

        assert_eq!(registry.expect_sink("0").unwrap().tokens(), &[Token(5)]);
        assert_eq!(registry.expect_sink("1").unwrap().tokens(), &[Token(2)]);
        assert_eq!(registry.expect_sink("2").unwrap().tokens(), &[Token(3)]);
    }

    #[test]
    fn starved_route_halts_after_one_pass_with_one_pending() {
        let (registry, resolution) =
            resolve(&["bot 7 gives low to output 1 and high to output 2"]);
        assert_eq!(resolution.passes, 1);
        assert_eq!(resolution.completed, 0);
        assert_eq!(resolution.pending, 1);
        assert!(registry.expect_exchanger("7").unwrap().history().is_empty());
    }

    // Two routes racing for the same sink: list order decides arrival order.
    #[test]
    fn destination_contention_resolves_in_list_order() {
        let (registry, resolution) = resolve(&[
            "value 4 goes to bot a",
            "value 8 goes to bot a",
            "value 1 goes to bot b",
            "value 6 goes to bot b",
            "bot a gives low to output shared and high to output spill",
            "bot b gives low to output shared and high to output spill",
        ]);

        assert_eq!(resolution.pending, 0);
        // Bot a was listed first, so its low token lands first.
        assert_eq!(
            registry.expect_sink("shared").unwrap().tokens(),
            &[Token(4), Token(1)]
        );
        assert_eq!(
            registry.expect_sink("spill").unwrap().tokens(),
            &[Token(8), Token(6)]
        );
    }

    // A route whose destinations are full must leave its source untouched
    // and retry once capacity frees; history is still recorded only once.
    #[test]
    fn blocked_route_retries_and_records_history_once() {
        let (registry, resolution) = resolve(&[
            // Fill c before b can route into it.
            "value 9 goes to bot c",
            "value 10 goes to bot c",
            "value 1 goes to bot b",
            "value 2 goes to bot b",
            // Listed before c's drain, so its first attempt finds c full.
            "bot b gives low to bot c and high to bot c",
            "bot c gives low to output x and high to output y",
        ]);

        assert_eq!(resolution.pending, 0);
        let bot_b = registry.expect_exchanger("b").unwrap();
        assert_eq!(
            bot_b.history(),
            &[Comparison {
                low: Token(1),
                high: Token(2),
            }]
        );
        let bot_c = registry.expect_exchanger("c").unwrap();
        assert_eq!(bot_c.holding(), &[Token(1), Token(2)]);
        assert_eq!(registry.expect_sink("x").unwrap().tokens(), &[Token(9)]);
        assert_eq!(registry.expect_sink("y").unwrap().tokens(), &[Token(10)]);
        // c's route was spent on (9,10); the second pair stays resident.
        assert_eq!(bot_c.history().len(), 1);
    }

    #[test]
    fn conservation_every_supplied_token_is_resident_somewhere() {
        let (registry, resolution) = resolve(&[
            "value 5 goes to bot 2",
            "value 3 goes to bot 1",
            "value 2 goes to bot 2",
            "bot 2 gives low to bot 1 and high to bot 0",
            "bot 1 gives low to output 1 and high to bot 0",
            "bot 0 gives low to output 2 and high to output 0",
        ]);
        assert_eq!(resolution.pending, 0);

        let in_exchangers: usize = registry
            .exchangers()
            .map(|(_, exchanger)| exchanger.holding().len())
            .sum();
        let in_sinks: usize = registry.sinks().map(|(_, sink)| sink.tokens().len()).sum();
        assert_eq!(in_exchangers + in_sinks, 3);
    }

    #[test]
    fn converges_within_one_pass_per_instruction_plus_final_scan() {
        let lines = [
            "value 5 goes to bot 2",
            "value 3 goes to bot 1",
            "value 2 goes to bot 2",
            "bot 2 gives low to bot 1 and high to bot 0",
            "bot 1 gives low to output 1 and high to bot 0",
            "bot 0 gives low to output 2 and high to output 0",
        ];
        let (_, resolution) = resolve(&lines);
        assert!(resolution.passes as usize <= lines.len() + 1);
    }

    #[test]
    fn runs_are_deterministic() {
        let lines = [
            "value 4 goes to bot a",
            "value 8 goes to bot a",
            "value 1 goes to bot b",
            "value 6 goes to bot b",
            "bot a gives low to output shared and high to output spill",
            "bot b gives low to output shared and high to output spill",
        ];
        let (first, res_a) = resolve(&lines);
        let (second, res_b) = resolve(&lines);
        assert_eq!(res_a, res_b);
        // Reports carry residents, histories, and sink contents.
        assert_eq!(
            crate::core::report::Report::from_registry(&first),
            crate::core::report::Report::from_registry(&second)
        );
    }

    #[test]
    fn empty_instruction_list_halts_immediately() {
        let mut registry = Registry::new();
        let mut scheduler = Scheduler::new(Vec::new());
        let resolution = scheduler.run(&mut registry);
        assert_eq!(
            resolution,
            Resolution {
                passes: 1,
                completed: 0,
                pending: 0,
            }
        );
    }

    #[test]
    fn supply_to_full_exchanger_waits_for_capacity() {
        let (registry, resolution) = resolve(&[
            "value 1 goes to bot a",
            "value 2 goes to bot a",
            // Blocked until a routes its first pair away.
            "value 3 goes to bot a",
            "value 4 goes to bot a",
            "bot a gives low to output low and high to output high",
        ]);
        // The route completes once, draining (1,2); 3 and 4 then land and
        // stay resident because the route is already spent.
        assert_eq!(resolution.pending, 0);
        let bot_a = registry.expect_exchanger("a").unwrap();
        assert_eq!(bot_a.holding(), &[Token(3), Token(4)]);
        assert_eq!(registry.expect_sink("low").unwrap().tokens(), &[Token(1)]);
        assert_eq!(registry.expect_sink("high").unwrap().tokens(), &[Token(2)]);
    }

    #[test]
    fn mutual_deadlock_converges_with_pending_instructions() {
        let (_, resolution) = resolve(&[
            "value 1 goes to bot a",
            "value 2 goes to bot b",
            // Each waits on the other to fill it; neither ever fires.
            "bot a gives low to bot b and high to bot b",
            "bot b gives low to bot a and high to bot a",
        ]);
        assert_eq!(resolution.completed, 2);
        assert_eq!(resolution.pending, 2);
    }

    #[test]
    fn route_destination_names_create_actors_lazily_on_delivery_only() {
        let (registry, _) = resolve(&["bot z gives low to output p and high to output q"]);
        // The source is touched by the full-check; destinations are not.
        assert!(registry.expect_exchanger("z").is_ok());
        assert!(matches!(
            registry.expect_sink("p"),
            Err(crate::core::registry::RegistryError::UnknownActor { .. })
        ));
    }
}
