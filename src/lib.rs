// Library surface for the session core and its collaborators.
// The binary in main.rs only wires these to a terminal.
pub mod charset;
pub mod drill;
pub mod input;
pub mod report;
pub mod sequence;
