//! Aggregate execution semantics shared by the shop's books.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` validates and returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO or read the clock. Identifiers and
/// timestamps arrive inside commands so that replaying the same commands
/// always yields the same state.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Number of events applied so far.
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single event.
    ///
    /// Events are facts that already passed `handle`; applying one cannot fail.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Handle a command and apply every resulting event.
    ///
    /// Nothing is applied unless `handle` succeeds, so a rejected command
    /// leaves the aggregate untouched.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        Ok(events)
    }
}
