// Filter engine: search term plus six attribute filters over the player list.
//
// Every filter is `None` ("all") or one option. A player is kept when it
// passes every active filter. Unparseable data never matches a specific
// option, and nothing here can fail.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::position::Position;

// ---------------------------------------------------------------------------
// Filter options
// ---------------------------------------------------------------------------

/// Canonical gender answers on the registration form (compared lowercased).
pub const GENDER_MALE: &str = "mann / male";
pub const GENDER_FEMALE: &str = "kvinne / female";

const YES_TOKENS: &[&str] = &["ja", "yes", "y"];
const NO_TOKENS: &[&str] = &["nei", "no", "n"];
const NO_TEAM_TOKENS: &[&str] = &["nei", "no", "n", "ingen", "none", "-"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Mann",
            Gender::Female => "Kvinne",
        }
    }

    fn canonical(&self) -> &'static str {
        match self {
            Gender::Male => GENDER_MALE,
            Gender::Female => GENDER_FEMALE,
        }
    }
}

/// Two-way answer used by the student and previous-team filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub const ALL: [YesNo; 2] = [YesNo::Yes, YesNo::No];

    pub fn label(&self) -> &'static str {
        match self {
            YesNo::Yes => "Ja",
            YesNo::No => "Nei",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    First,
    Second,
    Third,
    Fourth,
}

impl Level {
    pub const ALL: [Level; 4] = [Level::First, Level::Second, Level::Third, Level::Fourth];

    pub fn label(&self) -> &'static str {
        match self {
            Level::First => "1. div",
            Level::Second => "2. div",
            Level::Third => "3. div",
            Level::Fourth => "4. div",
        }
    }

    /// Spellings that identify this level in free text (matched per token).
    fn variants(&self) -> &'static [&'static str] {
        match self {
            Level::First => &["1", "første", "forste", "first"],
            Level::Second => &["2", "andre", "second"],
            Level::Third => &["3", "tredje", "third"],
            Level::Fourth => &["4", "fjerde", "fourth"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    Under20,
    From20To25,
    Over25,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Under20, AgeGroup::From20To25, AgeGroup::Over25];

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Under20 => "<20",
            AgeGroup::From20To25 => "20-25",
            AgeGroup::Over25 => ">25",
        }
    }

    pub fn for_age(age: i32) -> Self {
        if age < 20 {
            AgeGroup::Under20
        } else if age <= 25 {
            AgeGroup::From20To25
        } else {
            AgeGroup::Over25
        }
    }
}

/// The six attribute filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub gender: Option<Gender>,
    pub student: Option<YesNo>,
    pub previous_team: Option<YesNo>,
    pub level: Option<Level>,
    pub position: Option<Position>,
    pub age: Option<AgeGroup>,
}

impl Filters {
    /// Number of filters not set to "all".
    pub fn active_count(&self) -> usize {
        [
            self.gender.is_some(),
            self.student.is_some(),
            self.previous_team.is_some(),
            self.level.is_some(),
            self.position.is_some(),
            self.age.is_some(),
        ]
        .iter()
        .filter(|active| **active)
        .count()
    }

    /// Short human summary of the active filters, e.g. `Kvinne, Libero`.
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(g) = self.gender {
            parts.push(g.label().to_string());
        }
        if let Some(s) = self.student {
            parts.push(format!("Student: {}", s.label()));
        }
        if let Some(t) = self.previous_team {
            parts.push(format!("Lag: {}", t.label()));
        }
        if let Some(l) = self.level {
            parts.push(l.label().to_string());
        }
        if let Some(p) = self.position {
            parts.push(p.label().to_string());
        }
        if let Some(a) = self.age {
            parts.push(format!("Alder {}", a.label()));
        }
        parts.join(", ")
    }
}

/// Advance a filter to its next option: all -> first -> ... -> last -> all.
pub fn cycle<T: Copy + PartialEq>(current: Option<T>, options: &[T]) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(cur) => match options.iter().position(|o| *o == cur) {
            Some(i) if i + 1 < options.len() => Some(options[i + 1]),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Classification helpers
// ---------------------------------------------------------------------------

/// Lowercase alphanumeric tokens of a free-text answer. A lone `-` survives
/// as its own token so "no team" answers written as a dash are recognized.
fn tokens(text: &str) -> Vec<String> {
    let lower = text.trim().to_lowercase();
    if lower == "-" {
        return vec!["-".to_string()];
    }
    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// How a free-text student answer is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentStatus {
    Yes,
    No,
    /// Empty, unrecognized, or containing both a yes and a no token.
    Unclassified,
}

pub fn classify_student(text: &str) -> StudentStatus {
    let toks = tokens(text);
    let has_yes = toks.iter().any(|t| YES_TOKENS.contains(&t.as_str()));
    let has_no = toks.iter().any(|t| NO_TOKENS.contains(&t.as_str()));
    match (has_yes, has_no) {
        (true, false) => StudentStatus::Yes,
        (false, true) => StudentStatus::No,
        _ => StudentStatus::Unclassified,
    }
}

/// Whether a previous-team answer names a team. Empty answers and answers
/// that start with a negative token count as "no team".
pub fn has_previous_team(text: &str) -> bool {
    match tokens(text).first() {
        None => false,
        Some(first) => !NO_TEAM_TOKENS.contains(&first.as_str()),
    }
}

pub fn matches_level(text: &str, level: Level) -> bool {
    let variants = level.variants();
    tokens(text).iter().any(|t| variants.contains(&t.as_str()))
}

/// Age group for a birth year in `current_year`; `None` without a year.
pub fn age_group(year: Option<i32>, current_year: i32) -> Option<AgeGroup> {
    year.map(|y| AgeGroup::for_age(current_year - y))
}

/// Case-insensitive name match or plain registration-number match.
pub fn matches_search(player: &Player, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    if player.name.to_lowercase().contains(&term.to_lowercase()) {
        return true;
    }
    player
        .registration_number
        .as_deref()
        .is_some_and(|n| n.contains(term))
}

fn passes(player: &Player, filters: &Filters, current_year: i32) -> bool {
    if let Some(g) = filters.gender {
        if player.gender.trim().to_lowercase() != g.canonical() {
            return false;
        }
    }

    if let Some(wanted) = filters.student {
        let status = classify_student(&player.is_student);
        let ok = match wanted {
            YesNo::Yes => status == StudentStatus::Yes,
            YesNo::No => status == StudentStatus::No,
        };
        if !ok {
            return false;
        }
    }

    if let Some(wanted) = filters.previous_team {
        let has_team = has_previous_team(&player.previous_team);
        if has_team != (wanted == YesNo::Yes) {
            return false;
        }
    }

    if let Some(level) = filters.level {
        if !matches_level(&player.desired_level, level) {
            return false;
        }
    }

    if let Some(pos) = filters.position {
        let needle = pos.label().to_lowercase();
        if !player.desired_positions.to_lowercase().contains(&needle) {
            return false;
        }
    }

    if let Some(group) = filters.age {
        if age_group(player.year, current_year) != Some(group) {
            return false;
        }
    }

    true
}

/// Filter players with an explicit reference year for age groups.
/// Input order is preserved.
pub fn filter_players_at<'a>(
    players: &'a [Player],
    filters: &Filters,
    search: &str,
    current_year: i32,
) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| player_matches(p, filters, search, current_year))
        .collect()
}

/// Single-player form of [`filter_players_at`], for lists that are already
/// borrowed (e.g. the available list).
pub fn player_matches(player: &Player, filters: &Filters, search: &str, current_year: i32) -> bool {
    matches_search(player, search) && passes(player, filters, current_year)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    /// Numeric registration number; players without one go last, by row.
    #[default]
    RegistrationNumber,
    Name,
    RowNumber,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::RegistrationNumber, SortKey::Name, SortKey::RowNumber];

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::RegistrationNumber => "startnr",
            SortKey::Name => "navn",
            SortKey::RowNumber => "rad",
        }
    }

    pub fn next(&self) -> SortKey {
        match self {
            SortKey::RegistrationNumber => SortKey::Name,
            SortKey::Name => SortKey::RowNumber,
            SortKey::RowNumber => SortKey::RegistrationNumber,
        }
    }
}

fn registration_value(p: &Player) -> Option<u64> {
    p.registration_number.as_deref().and_then(|n| n.trim().parse().ok())
}

/// Stable sort of a player list by the given key.
pub fn sort_players(players: &mut [&Player], key: SortKey) {
    match key {
        SortKey::RegistrationNumber => players.sort_by(|a, b| {
            match (registration_value(a), registration_value(b)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => a.row_number.cmp(&b.row_number),
            }
        }),
        SortKey::Name => players.sort_by_key(|p| p.name.to_lowercase()),
        SortKey::RowNumber => players.sort_by_key(|p| p.row_number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YEAR: i32 = 2025;

    fn player(name: &str) -> Player {
        Player::named(name)
    }

    fn names<'a>(players: &[&'a Player]) -> Vec<&'a str> {
        players.iter().map(|p| p.name.as_str()).collect()
    }

    fn sample() -> Vec<Player> {
        let mut anna = player("Anna");
        anna.gender = "Kvinne / Female".into();
        anna.is_student = "Ja".into();
        anna.previous_team = "NTNUI".into();
        anna.desired_positions = "Libero, kant".into();
        anna.desired_level = "1. divisjon".into();
        anna.year = Some(2004);
        anna.registration_number = Some("12".into());

        let mut bjorn = player("Bjørn");
        bjorn.gender = "Mann / Male".into();
        bjorn.is_student = "Nei".into();
        bjorn.previous_team = "Nei".into();
        bjorn.desired_positions = "Midt".into();
        bjorn.desired_level = "andre divisjon".into();
        bjorn.year = Some(1995);
        bjorn.registration_number = Some("99".into());

        let mut cecilie = player("Cecilie");
        cecilie.gender = "kvinne / female".into();
        cecilie.is_student = "ja og nei".into();
        cecilie.desired_positions = "libero".into();
        cecilie.desired_level = "First".into();
        cecilie.year = Some(2001);

        let mut dag = player("Dag");
        dag.gender = "Annet".into();
        dag.previous_team = "Ingen".into();

        vec![anna, bjorn, cecilie, dag]
    }

    #[test]
    fn all_filters_and_empty_search_return_everything_in_order() {
        let players = sample();
        let out = filter_players_at(&players, &Filters::default(), "", YEAR);
        assert_eq!(names(&out), vec!["Anna", "Bjørn", "Cecilie", "Dag"]);
    }

    #[test]
    fn female_is_not_matched_by_male_filter() {
        let mut anna = player("Anna");
        anna.gender = "kvinne / female".into();
        let players = vec![anna];
        let filters = Filters {
            gender: Some(Gender::Male),
            ..Filters::default()
        };
        assert!(filter_players_at(&players, &filters, "", YEAR).is_empty());
    }

    #[test]
    fn gender_equality_is_case_insensitive() {
        let players = sample();
        let filters = Filters {
            gender: Some(Gender::Female),
            ..Filters::default()
        };
        let out = filter_players_at(&players, &filters, "", YEAR);
        assert_eq!(names(&out), vec!["Anna", "Cecilie"]);
    }

    #[test]
    fn search_matches_name_or_registration_number() {
        let mut zelda = player("Zelda");
        zelda.registration_number = Some("5".into());
        let mut numbered = player("Ola");
        numbered.registration_number = Some("99".into());
        let mut other = player("Per");
        other.registration_number = Some("7".into());
        let mut ninety = player("Nina 99");
        ninety.registration_number = None;
        let players = vec![zelda, numbered, other, ninety];

        let out = filter_players_at(&players, &Filters::default(), "99", YEAR);
        assert_eq!(names(&out), vec!["Ola", "Nina 99"]);

        let out = filter_players_at(&players, &Filters::default(), "zel", YEAR);
        assert_eq!(names(&out), vec!["Zelda"]);
    }

    #[test]
    fn student_classification() {
        assert_eq!(classify_student("Ja"), StudentStatus::Yes);
        assert_eq!(classify_student("yes, NTNU"), StudentStatus::Yes);
        assert_eq!(classify_student("Nei"), StudentStatus::No);
        assert_eq!(classify_student("n"), StudentStatus::No);
        assert_eq!(classify_student("ja og nei"), StudentStatus::Unclassified);
        assert_eq!(classify_student(""), StudentStatus::Unclassified);
        assert_eq!(classify_student("kanskje"), StudentStatus::Unclassified);
        // "nyutdannet" contains "n" and "y" but not as tokens.
        assert_eq!(classify_student("nyutdannet"), StudentStatus::Unclassified);
    }

    #[test]
    fn ambiguous_student_answers_are_excluded_from_both_buckets() {
        let players = sample();
        let yes = Filters {
            student: Some(YesNo::Yes),
            ..Filters::default()
        };
        let no = Filters {
            student: Some(YesNo::No),
            ..Filters::default()
        };
        assert_eq!(names(&filter_players_at(&players, &yes, "", YEAR)), vec!["Anna"]);
        assert_eq!(names(&filter_players_at(&players, &no, "", YEAR)), vec!["Bjørn"]);
    }

    #[test]
    fn previous_team_buckets_are_complements() {
        assert!(has_previous_team("NTNUI"));
        assert!(has_previous_team("Ja, Tromsø"));
        assert!(!has_previous_team(""));
        assert!(!has_previous_team("Nei"));
        assert!(!has_previous_team("ingen lag"));
        assert!(!has_previous_team("-"));

        let players = sample();
        let yes = Filters {
            previous_team: Some(YesNo::Yes),
            ..Filters::default()
        };
        let no = Filters {
            previous_team: Some(YesNo::No),
            ..Filters::default()
        };
        let yes_out = filter_players_at(&players, &yes, "", YEAR);
        let no_out = filter_players_at(&players, &no, "", YEAR);
        assert_eq!(names(&yes_out), vec!["Anna"]);
        assert_eq!(names(&no_out), vec!["Bjørn", "Cecilie", "Dag"]);
    }

    #[test]
    fn level_variants_match_as_tokens() {
        assert!(matches_level("1. divisjon", Level::First));
        assert!(matches_level("Første divisjon", Level::First));
        assert!(matches_level("first", Level::First));
        assert!(matches_level("andre", Level::Second));
        assert!(!matches_level("10. plass", Level::First));
        assert!(!matches_level("", Level::Third));
    }

    #[test]
    fn desired_position_uses_label_as_needle() {
        let players = sample();
        let filters = Filters {
            position: Some(Position::Libero),
            ..Filters::default()
        };
        let out = filter_players_at(&players, &filters, "", YEAR);
        assert_eq!(names(&out), vec!["Anna", "Cecilie"]);
    }

    #[test]
    fn age_groups_and_missing_year() {
        assert_eq!(age_group(Some(2006), YEAR), Some(AgeGroup::Under20));
        assert_eq!(age_group(Some(2005), YEAR), Some(AgeGroup::From20To25));
        assert_eq!(age_group(Some(2000), YEAR), Some(AgeGroup::From20To25));
        assert_eq!(age_group(Some(1999), YEAR), Some(AgeGroup::Over25));
        assert_eq!(age_group(None, YEAR), None);

        let players = sample();
        for group in AgeGroup::ALL {
            let filters = Filters {
                age: Some(group),
                ..Filters::default()
            };
            let out = filter_players_at(&players, &filters, "", YEAR);
            assert!(!names(&out).contains(&"Dag"), "no-year player matched {group:?}");
        }
    }

    #[test]
    fn two_filters_equal_intersection_of_each() {
        let players = sample();
        let a = Filters {
            gender: Some(Gender::Female),
            ..Filters::default()
        };
        let b = Filters {
            level: Some(Level::First),
            ..Filters::default()
        };
        let both = Filters {
            gender: a.gender,
            level: b.level,
            ..Filters::default()
        };
        let only_a = names(&filter_players_at(&players, &a, "", YEAR));
        let only_b = names(&filter_players_at(&players, &b, "", YEAR));
        let expected: Vec<&str> = only_a.iter().copied().filter(|n| only_b.contains(n)).collect();
        assert_eq!(names(&filter_players_at(&players, &both, "", YEAR)), expected);
        assert_eq!(expected, vec!["Anna", "Cecilie"]);
    }

    #[test]
    fn cycle_walks_options_and_wraps_to_all() {
        assert_eq!(cycle(None, &Gender::ALL), Some(Gender::Male));
        assert_eq!(cycle(Some(Gender::Male), &Gender::ALL), Some(Gender::Female));
        assert_eq!(cycle(Some(Gender::Female), &Gender::ALL), None);
    }

    #[test]
    fn active_count_and_describe() {
        let filters = Filters {
            gender: Some(Gender::Female),
            position: Some(Position::Libero),
            ..Filters::default()
        };
        assert_eq!(filters.active_count(), 2);
        assert_eq!(filters.describe(), "Kvinne, Libero");
        assert_eq!(Filters::default().describe(), "");
    }

    #[test]
    fn sort_by_registration_number_puts_missing_last() {
        let mut a = player("A");
        a.registration_number = Some("10".into());
        a.row_number = 2;
        let mut b = player("B");
        b.registration_number = Some("9".into());
        b.row_number = 3;
        let mut c = player("C");
        c.row_number = 4;
        let mut d = player("D");
        d.registration_number = Some("abc".into());
        d.row_number = 1;
        let players = vec![a, b, c, d];

        let mut refs: Vec<&Player> = players.iter().collect();
        sort_players(&mut refs, SortKey::RegistrationNumber);
        assert_eq!(names(&refs), vec!["B", "A", "D", "C"]);

        sort_players(&mut refs, SortKey::RowNumber);
        assert_eq!(names(&refs), vec!["D", "A", "B", "C"]);

        sort_players(&mut refs, SortKey::Name);
        assert_eq!(names(&refs), vec!["A", "B", "C", "D"]);
    }
}
