//! Builder module for `xparam`.
//! See [documentation root](https://docs.rs/xparam/latest/xparam/index.html) for full details.
#![deny(missing_docs)]
mod command;
mod engine;
mod flag;
mod interface;
mod model;
mod param;
mod size;
mod types;
mod usage;

pub use command::{CommandLine, CommandLineParser};
pub use engine::{OccurrenceError, ParamError, ParamTable};
pub use flag::{FlagError, LongOption, XGetopt, XOption, XOptions};
#[cfg(any(test, feature = "unit_test"))]
pub use interface::InMemoryInterface;
pub use interface::{ConsoleInterface, UserInterface};
pub use model::*;
pub use param::{Param, ParamFlags};
pub use size::space_to_string;
pub use types::{
    CheckFn, GetFn, ParamType, ShowFn, Slot, SlotKind, TypeError, TypeTag, Value,
};
pub use usage::{show_default_params, xgetopt_usage, UsageConfig};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
