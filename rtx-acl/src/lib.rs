//! ACL plan checking and sequence allocation for RTX routers.
//!
//! This library reads declarative ACL plans, works out the filter numbers
//! each group will occupy, and checks them against each other and against the
//! filters already present on a router. Number arithmetic, overlap detection
//! and start suggestion live in [`rtx_acl_core`]; this crate adds the file
//! formats and reports around them.
//!
//! # Modules
//!
//! - [`plan`]: plan TOML model and loader
//! - [`state`]: prior apply state (which group owned which numbers)
//! - [`router`]: filter numbers found in router `show config` output
//! - [`validate`]: per-group findings
//! - [`check`]: full plan check with collision suggestions
//! - [`listing`]: per-group resolved sequences
//! - [`report`]: terminal colouring
//!
//! # Workflow
//!
//! ```no_run
//! use std::path::Path;
//!
//! use rtx_acl::check::{build_check_report, render_check_text};
//! use rtx_acl::plan::load_plan;
//!
//! let plan = load_plan(Path::new("acl.toml"))?;
//! let router = std::fs::read_to_string("router.conf")?;
//! let report = build_check_report(&plan, Some(&router), None);
//! println!("{}", render_check_text(&report, false));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod check;
pub mod listing;
pub mod plan;
pub mod report;
pub mod router;
pub mod state;
pub mod validate;
