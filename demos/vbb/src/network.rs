//! A small VBB-inspired timetable: four lines through central Berlin.
//!
//! Stops sharing an `area` are platforms of one station, so transfers
//! between them are teleported.  Every line runs both directions from
//! 05:00 to 23:00 at a fixed headway.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Result;

/// `(stop_id, name, lat, lon, area)`
const STOPS: &[(&str, &str, f64, f64, &str)] = &[
    ("zoo_u",      "Zoologischer Garten (U)", 52.5068, 13.3320, "zoo"),
    ("zoo_s",      "Zoologischer Garten (S)", 52.5072, 13.3326, "zoo"),
    ("pots_u",     "Potsdamer Platz (U)",     52.5096, 13.3760, "potsdamer_platz"),
    ("pots_s",     "Potsdamer Platz (S)",     52.5094, 13.3766, "potsdamer_platz"),
    ("stadtmitte", "Stadtmitte",              52.5119, 13.3897, ""),
    ("spittel",    "Spittelmarkt",            52.5113, 13.4035, ""),
    ("kloster",    "Klosterstraße",           52.5171, 13.4123, ""),
    ("alex_u2",    "Alexanderplatz (U2)",     52.5215, 13.4120, "alexanderplatz"),
    ("alex_u5",    "Alexanderplatz (U5)",     52.5217, 13.4130, "alexanderplatz"),
    ("alex_s",     "Alexanderplatz (S)",      52.5219, 13.4115, "alexanderplatz"),
    ("hbf_s",      "Hauptbahnhof (S)",        52.5251, 13.3694, "hauptbahnhof"),
    ("hbf_u",      "Hauptbahnhof (U)",        52.5253, 13.3690, "hauptbahnhof"),
    ("friedr",     "Friedrichstraße",         52.5203, 13.3870, ""),
    ("hacke",      "Hackescher Markt",        52.5225, 13.4024, ""),
    ("ostbf",      "Ostbahnhof",              52.5105, 13.4346, ""),
    ("bundestag",  "Bundestag",               52.5204, 13.3728, ""),
    ("tor_u",      "Brandenburger Tor (U)",   52.5163, 13.3813, "brandenburger_tor"),
    ("tor_s",      "Brandenburger Tor (S)",   52.5164, 13.3810, "brandenburger_tor"),
    ("linden",     "Unter den Linden",        52.5168, 13.3887, ""),
    ("museum",     "Museumsinsel",            52.5172, 13.3980, ""),
    ("rathaus",    "Rotes Rathaus",           52.5184, 13.4079, ""),
    ("nordbf",     "Nordbahnhof",             52.5323, 13.3887, ""),
    ("oranien",    "Oranienburger Straße",    52.5251, 13.3934, ""),
    ("anhalter",   "Anhalter Bahnhof",        52.5053, 13.3817, ""),
];

struct Line {
    id:           &'static str,
    stops:        &'static [&'static str],
    hop_mins:     u32,
    headway_mins: u32,
}

const LINES: &[Line] = &[
    Line {
        id:           "U2",
        stops:        &["zoo_u", "pots_u", "stadtmitte", "spittel", "kloster", "alex_u2"],
        hop_mins:     2,
        headway_mins: 5,
    },
    Line {
        id:           "U5",
        stops:        &["hbf_u", "bundestag", "tor_u", "linden", "museum", "rathaus", "alex_u5"],
        hop_mins:     2,
        headway_mins: 5,
    },
    Line {
        id:           "S5",
        stops:        &["zoo_s", "hbf_s", "friedr", "hacke", "alex_s", "ostbf"],
        hop_mins:     3,
        headway_mins: 10,
    },
    Line {
        id:           "S1",
        stops:        &["nordbf", "oranien", "friedr", "tor_s", "pots_s", "anhalter"],
        hop_mins:     2,
        headway_mins: 10,
    },
];

const FIRST_DEPARTURE_MINS: u32 = 5 * 60;
const LAST_DEPARTURE_MINS:  u32 = 23 * 60;

fn hhmm(mins: u32) -> String {
    format!("{:02}:{:02}", mins / 60, mins % 60)
}

/// Write `stops.csv` and `connections.csv` into `dir`.
pub fn write_timetable(dir: &Path) -> Result<()> {
    let mut stops = String::from("stop_id,name,lat,lon,area\n");
    for (id, name, lat, lon, area) in STOPS {
        writeln!(stops, "{id},{name},{lat},{lon},{area}")?;
    }
    fs::write(dir.join("stops.csv"), stops)?;

    let mut conns = String::from("route_id,trip_id,from_stop,to_stop,departure,arrival\n");
    for line in LINES {
        let reversed: Vec<&str> = line.stops.iter().rev().copied().collect();
        for (dir_tag, seq) in [("a", line.stops.to_vec()), ("b", reversed)] {
            let mut start = FIRST_DEPARTURE_MINS;
            while start <= LAST_DEPARTURE_MINS {
                let trip = format!("{}-{dir_tag}-{}", line.id, hhmm(start));
                for (i, hop) in seq.windows(2).enumerate() {
                    let dep = start + i as u32 * line.hop_mins;
                    writeln!(
                        conns,
                        "{},{trip},{},{},{},{}",
                        line.id,
                        hop[0],
                        hop[1],
                        hhmm(dep),
                        // Dwell time is folded into the hop.
                        hhmm(dep + line.hop_mins),
                    )?;
                }
                start += line.headway_mins;
            }
        }
    }
    fs::write(dir.join("connections.csv"), conns)?;
    Ok(())
}

pub fn stop_count() -> usize {
    STOPS.len()
}

pub fn line_count() -> usize {
    LINES.len()
}
