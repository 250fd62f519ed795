//! Infrastructure layer for touchmap.
//!
//! Contains the adapters that reach outside the process: the external display
//! and input tools, and the configuration file on disk.
//!
//! **Dependency rule**: this layer may depend on `application` and
//! `touchmap_core`, but MUST NOT be imported by the `application` or domain
//! layers.
//!
//! # Sub-modules
//!
//! - **`gateway`** – Implementations of `CommandGateway`.  The shell gateway
//!   spawns `xrandr` and `xinput`; the dry-run wrapper logs writes instead of
//!   performing them; a `MockGateway` serves canned reports to tests.
//!
//! - **`storage`** – TOML configuration: where the file lives, its defaults,
//!   and how it maps onto detection options.

pub mod gateway;
pub mod storage;
