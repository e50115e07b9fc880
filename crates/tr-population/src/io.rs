//! Plan CSV reader and writer.
//!
//! # CSV format
//!
//! One row per plan element.  Activity rows fill `activity_type`, `x`, `y`
//! and (except the last activity) `end_time_secs`; leg rows fill `mode`.
//! Coordinates are in the scenario CRS.  Routes are not stored.
//!
//! ```csv
//! person_id,element_index,kind,activity_type,x,y,end_time_secs,mode
//! 0,0,activity,home,13.4012,52.5187,32400,
//! 0,1,leg,,,,,pt
//! 0,2,activity,work,13.3290,52.5071,61200,
//! 0,3,leg,,,,,pt
//! 0,4,activity,home,13.4012,52.5187,,
//! ```

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use tr_core::{Coord, LegMode, PersonId, SimTime};

use crate::{
    Activity, Person, Plan, PlanElement, PlannedLeg, Population, PopulationError, PopulationResult,
};

const ACTIVITY: &str = "activity";
const LEG: &str = "leg";

#[derive(Debug, Serialize, Deserialize)]
struct PlanRecord {
    person_id:     u32,
    element_index: u32,
    kind:          String,
    activity_type: Option<String>,
    x:             Option<f64>,
    y:             Option<f64>,
    end_time_secs: Option<u32>,
    mode:          Option<String>,
}

impl PlanRecord {
    fn from_element(person: PersonId, index: usize, element: &PlanElement) -> Self {
        let mut r = PlanRecord {
            person_id:     person.0,
            element_index: index as u32,
            kind:          String::new(),
            activity_type: None,
            x:             None,
            y:             None,
            end_time_secs: None,
            mode:          None,
        };
        match element {
            PlanElement::Activity(a) => {
                r.kind = ACTIVITY.to_owned();
                r.activity_type = Some(a.activity_type.clone());
                r.x = Some(a.coord.x);
                r.y = Some(a.coord.y);
                r.end_time_secs = a.end_time.map(SimTime::secs);
            }
            PlanElement::Leg(l) => {
                r.kind = LEG.to_owned();
                r.mode = Some(l.mode.to_string());
            }
        }
        r
    }

    fn into_element(self) -> PopulationResult<PlanElement> {
        let missing = |field: &str| {
            PopulationError::Parse(format!(
                "person {} element {}: missing {field}",
                self.person_id, self.element_index
            ))
        };
        match self.kind.trim() {
            ACTIVITY => {
                let activity_type = self.activity_type.clone().ok_or_else(|| missing("activity_type"))?;
                let x = self.x.ok_or_else(|| missing("x"))?;
                let y = self.y.ok_or_else(|| missing("y"))?;
                Ok(PlanElement::Activity(Activity {
                    activity_type,
                    coord: Coord::new(x, y),
                    end_time: self.end_time_secs.map(SimTime),
                }))
            }
            LEG => {
                let mode = self.mode.clone().ok_or_else(|| missing("mode"))?;
                Ok(PlanElement::Leg(PlannedLeg::new(LegMode::from(mode))))
            }
            other => Err(PopulationError::Parse(format!(
                "person {} element {}: unknown kind {other:?}",
                self.person_id, self.element_index
            ))),
        }
    }
}

// ── Writing ───────────────────────────────────────────────────────────────────

/// Write every person's plan to `path`, creating or truncating it.
pub fn write_plans_csv(path: &Path, population: &Population) -> PopulationResult<()> {
    write_plans_writer(File::create(path)?, population)
}

/// Like [`write_plans_csv`] but writes to any `Write` sink.
pub fn write_plans_writer<W: Write>(writer: W, population: &Population) -> PopulationResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    for person in population.persons() {
        for (i, element) in person.plan.elements().iter().enumerate() {
            w.serialize(PlanRecord::from_element(person.id, i, element))?;
        }
    }
    w.flush()?;
    Ok(())
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Load a population from a plan CSV file.
pub fn load_plans_csv(path: &Path) -> PopulationResult<Population> {
    load_plans_reader(File::open(path)?)
}

/// Like [`load_plans_csv`] but accepts any `Read` source.
///
/// Rows may appear in any order; each person's `element_index` values must
/// be exactly `0..n`.
pub fn load_plans_reader<R: Read>(reader: R) -> PopulationResult<Population> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_person: BTreeMap<u32, Vec<PlanRecord>> = BTreeMap::new();
    for result in csv_reader.deserialize::<PlanRecord>() {
        let row = result?;
        by_person.entry(row.person_id).or_default().push(row);
    }

    let mut persons = Vec::with_capacity(by_person.len());
    for (pid, mut rows) in by_person {
        rows.sort_by_key(|r| r.element_index);
        if let Some((pos, r)) = rows
            .iter()
            .enumerate()
            .find(|(pos, r)| r.element_index as usize != *pos)
        {
            return Err(PopulationError::Parse(format!(
                "person {pid}: expected element_index {pos}, found {}",
                r.element_index
            )));
        }
        let elements = rows
            .into_iter()
            .map(PlanRecord::into_element)
            .collect::<PopulationResult<Vec<_>>>()?;
        let id = PersonId(pid);
        persons.push(Person { id, plan: Plan::new(id, elements)? });
    }
    Ok(Population::from_persons(persons))
}
