//! `CommandGateway` implementations.
//!
//! | Type                  | Queries            | Property writes         |
//! |-----------------------|--------------------|-------------------------|
//! | `ShellCommandGateway` | spawns the tools   | spawns `xinput`         |
//! | `DryRunGateway<G>`    | forwarded to `G`   | logged and recorded     |
//! | `MockGateway`         | canned text        | recorded in memory      |
//!
//! [`MockGateway`] is always compiled (not guarded by `#[cfg(test)]`) so
//! integration tests can drive the use cases without an X server.

pub mod dry_run;
pub mod mock;
pub mod shell;

pub use dry_run::DryRunGateway;
pub use mock::MockGateway;
pub use shell::{ShellCommandGateway, ToolPaths};
