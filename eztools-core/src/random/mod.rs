//! Random-selection primitives and the small tools built on them.
//!
//! [`RandomProvider`] draws from the operating system's cryptographic source
//! by default. Every tool takes the provider by `&mut` so tests can swap in a
//! deterministic [`rand::RngCore`].

pub mod decision;
pub mod list;
pub mod numbers;
pub mod provider;
pub mod wheel;

pub use decision::{Decision, decide};
pub use list::{non_blank_lines, shuffle_lines};
pub use numbers::{NumberRequest, ToolError, generate_numbers};
pub use provider::RandomProvider;
pub use wheel::{Spin, Wheel};
