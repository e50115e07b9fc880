//! `tr-population` — persons, activity plans, and the synthetic population
//! generator.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`plan`]      | `Activity`, `PlannedLeg`, `PlanElement`, `Plan`, `Person`, `Population` |
//! | [`generator`] | `PopulationGenerator`, `ActivityTimes`                       |
//! | [`io`]        | `write_plans_csv`, `load_plans_csv` (+ reader/writer forms)  |
//! | [`error`]     | `PopulationError`, `PopulationResult<T>`                     |
//!
//! # Plan shape
//!
//! A plan alternates activities and legs, starting and ending with an
//! activity:
//!
//! ```text
//! home(end 09:00) ─pt─► work(end 17:00) ─pt─► home(open)
//! ```
//!
//! Trip `i` is the leg between activity `i` and activity `i + 1`; it
//! departs at activity `i`'s end time.

pub mod error;
pub mod generator;
pub mod io;
pub mod plan;


pub use error::{PopulationError, PopulationResult};
pub use generator::{ActivityTimes, PopulationGenerator};
pub use io::{load_plans_csv, load_plans_reader, write_plans_csv, write_plans_writer};
pub use plan::{Activity, Person, Plan, PlanElement, PlannedLeg, Population, TripSlot};
