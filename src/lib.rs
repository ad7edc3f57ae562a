//! `xparam` is a declarative command line parser for storage tools.
//!
//! A program describes the flags and parameters it accepts as data, and `xparam` drives the parsing from that description.
//! The command line has a fixed shape:
//! ```console
//! program [FLAG ...] [NAME=VALUE ...] [ARG ...]
//! ```
//! * *Flags* are getopt style switches (`-v`, `-vf`, `--verbose`), optionally with a typed argument (`-c 10G`, `--capacity=10G`).
//! Flags may exclude one another, may be hidden from the help message, and count how often they are given.
//! * *Parameters* are `name=value` tokens, converted into typed variables with optional range checks.
//! Each parameter declares how many times it may be given.
//! * Everything after the first token which is neither a flag nor a parameter is left to the program (the "next arg").
//!
//! `xparam` prioritizes the following design concerns:
//! * *Typed values*:
//! The program never converts `&str -> T` by hand; each parameter is bound to a variable of the right width.
//! * *Storage domain types*:
//! Sizes with binary suffixes (`10M`, `4k`), octal file modes, user and group ids by name, and percentages are built in.
//! * *Validation up front*:
//! Tables are checked once when built (ex: duplicate names, a variable of the wrong type), so parsing only reports user errors.
//!
//! # Usage
//! via [derive Api](./derive/index.html):
//! ```no_run
#![doc = include_str!("../demos/derived.rs")]
//! ```
//! or via builder Api (this page):
//! ```no_run
#![doc = include_str!("../demos/mpool_create.rs")]
//! ```
//!
//! ```console
//! $ mpool_create -h
//! usage: mpool_create [options] [name=value ...]
//!
//! Create a media pool.
//!
//! options:
//!  -v, --verbose                Increase verbosity.
//!  -f, --force                  Create the pool even if the devices are in use.
//!  -n, --dry-run                Validate the request without creating the pool.
//!  -c, --capacity <u64_size>    Capacity of the pool.                              0
//!  -h, --help                   Show this help message and exit.
//!
//! parameters:
//!  mode=<mode>       Pool access mode.            0600
//!  uid=<uid>         Pool owner.                  0
//!  label=<string>    Pool label.
//!
//! $ mpool_create -c 1536K mode=0640 label=mp1 /dev/nvme0n1
//! label=mp1 capacity=1.5M mode=0640 uid=0 spare=5% verbose=0 force=0 dry-run=0
//! devices: ["/dev/nvme0n1"]
//!
//! $ mpool_create -f -n label=mp1
//! Parse error: option '-n/--dry-run' cannot be used with '-f/--force'.
//!
//! $ mpool_create label=mp1 spare=101
//! Parse error: value '101' for parameter 'spare' is out of range: 101 is outside the range [0, 101).
//! ```
//!
//! # Builder Api
//! Start with a [`CommandLine`], then add flags ([`XOption`]) and parameters ([`Param`]).
//! `build` validates the configuration and produces a [`CommandLineParser`].
//! Parsing happens in three phases:
//! 1. Flags are consumed until `--` or the first token which is not a flag.
//! 2. `name=value` parameters are consumed until the first token without an `=`.
//! 3. Each parameter's occurrence count is verified against its bounds.
//!
//! The components are also usable on their own:
//! * [`XOptions::xgetopt`] iterates over the flags of a token list, one short option at a time.
//! * [`ParamTable::process_params`] and [`ParamTable::verify_params`] run phases 2 and 3.
//! * [`show_default_params`] and [`xgetopt_usage`] write usage to any [`std::io::Write`].
//!
//! ### Types
//! ```console
//! Type       | Variable | Accepted input                                          | Rendered
//! ---------------------------------------------------------------------------------------------
//! u8..u64    | u8..u64  | decimal, 0x hex, leading 0 octal                        | decimal, or 0x hex
//! s64        | i64      | optional sign, then as above                            | decimal
//! u32_size   | u32      | as above, with an optional k/m/g/t/p/e binary suffix    | 10M, 1536K
//! u64_size   | u64      | as above, with an optional k/m/g/t/p/e binary suffix    | 10M, 1536K
//! bool       | bool     | true/false, yes/no, on/off, 1/0                         | true, false
//! string     | String   | any text within the capacity                            | verbatim
//! uid / gid  | u32      | numeric id, or a user/group name                        | numeric id
//! mode       | u32      | octal, at most 07777                                    | 0755
//! ```
//!
//! Ranges (ex: [`Param::range`], [`ParamType::pct`]) are half-open: a percentage accepts `[0, 101)`.
//!
//! ### Defaults
//! `xparam` does not set defaults; the initial value of each bound variable is its default.
//! The help message displays the initial value of each parameter and flag argument.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events while parsing.
pub mod derive;
pub use xparam_builder::*;
