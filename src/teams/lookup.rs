//! Static code → team and code → conference tables.

/// Game code → display name.
const TEAM_NAMES: &[(&str, &str)] = &[
    ("RIT", "Rochester Institute of Technology"),
    ("Bar", "Bard College"),
    ("CU", "Clarkson"),
    ("HOB", "Hobart"),
    ("IC", "Ithaca"),
    ("NAZ", "Nazareth"),
    ("RPI", "RPI"),
    ("SKD", "Skidmore"),
    ("SJC", "St. John Fisher"),
    ("SLS", "St. Lawrence"),
    ("UNY", "Union College"),
    ("VC", "Vassar"),
    ("ASU", "Alfred State"),
    ("Elm", "Elmira"),
    ("GUB", "Gallaudet"),
    ("ROY", "Rochester"),
    ("WEL", "Wells"),
];

const CONFERENCES: &[(&str, &[&str])] = &[
    (
        "Liberty League",
        &["RIT", "Bar", "CU", "HOB", "IC", "RPI", "SKD", "SLS", "UNY", "VC"],
    ),
    (
        "Empire 8",
        &["ALF", "NAZ", "SJC", "UTI", "Keu", "SAG", "Elm", "HAR", "HC", "SGK", "SUP", "BRO"],
    ),
    ("University Athletic Association", &[]),
    (
        "SUNYAC",
        &["SNP", "OST", "ONE", "PSC", "BFS", "SCD", "FRE", "SUN", "SCK", "Mor"],
    ),
];

pub fn team_name(code: &str) -> Option<&'static str> {
    TEAM_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

pub fn conference(code: &str) -> Option<&'static str> {
    CONFERENCES
        .iter()
        .find(|(_, members)| members.iter().any(|m| *m == code))
        .map(|(name, _)| *name)
}
