//! Post-parse checks of the rules the prompts ask the model to follow.
//!
//! Checks only report; records are never modified. Empty fields are treated
//! as "not read" and skipped.

use std::fmt;

use chrono::{Months, NaiveDate};

use crate::cni::CniData;
use crate::passport::PassportData;
use crate::prompts::KNOWN_LOCALITIES;

/// Date layouts seen on Cameroonian documents and in model replies.
const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d", "%d %m %Y"];

/// CNI validity period.
const CNI_VALIDITY: Months = Months::new(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    InvalidGender(String),
    NonNumericCniNumber(String),
    ExpiryMismatch {
        issue_date: String,
        expiry_date: String,
        expected: String,
    },
    UnknownLocality(String),
    NationalityFormat(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGender(g) => write!(f, "gender {:?} is not 'M' or 'F'", g),
            Self::NonNumericCniNumber(n) => write!(f, "cniNumber {:?} is not numeric", n),
            Self::ExpiryMismatch {
                issue_date,
                expiry_date,
                expected,
            } => write!(
                f,
                "expiryDate {:?} is not 10 years after issueDate {:?} (expected {:?})",
                expiry_date, issue_date, expected
            ),
            Self::UnknownLocality(p) => write!(f, "placeOfBirth {:?} is not a known locality", p),
            Self::NationalityFormat(n) => {
                write!(f, "nationality {:?} is not formatted as FR/EN", n)
            }
        }
    }
}

pub fn check_cni(data: &CniData) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_gender(&data.gender, &mut violations);

    let number = data.cni_number.trim();
    if !number.is_empty() && !number.chars().all(|c| c.is_ascii_digit()) {
        violations.push(Violation::NonNumericCniNumber(data.cni_number.clone()));
    }

    if let Some(expected) = expected_expiry(&data.issue_date) {
        let actual = parse_date(&data.expiry_date).map(|(d, _)| d);
        if actual != Some(expected.0) {
            violations.push(Violation::ExpiryMismatch {
                issue_date: data.issue_date.clone(),
                expiry_date: data.expiry_date.clone(),
                expected: expected.0.format(expected.1).to_string(),
            });
        }
    }

    let place = data.place_of_birth.trim();
    if !place.is_empty() && !is_known_locality(place) {
        violations.push(Violation::UnknownLocality(data.place_of_birth.clone()));
    }

    violations
}

pub fn check_passport(data: &PassportData) -> Vec<Violation> {
    let mut violations = Vec::new();

    check_gender(&data.gender, &mut violations);

    let nationality = data.nationality.trim();
    if !nationality.is_empty() && !is_slash_formatted(nationality) {
        violations.push(Violation::NationalityFormat(data.nationality.clone()));
    }

    violations
}

fn check_gender(gender: &str, violations: &mut Vec<Violation>) {
    if !gender.is_empty() && gender != "M" && gender != "F" {
        violations.push(Violation::InvalidGender(gender.to_string()));
    }
}

/// Issue date plus ten years, with the layout the issue date was written in.
/// `None` when the issue date is empty or unparseable.
pub fn expected_expiry(issue_date: &str) -> Option<(NaiveDate, &'static str)> {
    let (issued, format) = parse_date(issue_date)?;
    issued
        .checked_add_months(CNI_VALIDITY)
        .map(|expiry| (expiry, format))
}

fn parse_date(value: &str) -> Option<(NaiveDate, &'static str)> {
    let value = value.trim();
    DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .map(|d| (d, *format))
    })
}

/// Case- and accent-insensitive lookup in [`KNOWN_LOCALITIES`].
pub fn is_known_locality(place: &str) -> bool {
    let folded = fold_locality(place);
    KNOWN_LOCALITIES.iter().any(|known| *known == folded)
}

fn fold_locality(place: &str) -> String {
    place
        .trim()
        .chars()
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => 'A',
            'ô' | 'ö' | 'Ô' | 'Ö' => 'O',
            'î' | 'ï' | 'Î' | 'Ï' => 'I',
            'û' | 'ü' | 'ù' | 'Û' | 'Ü' | 'Ù' => 'U',
            ' ' => '-',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

/// `FRENCH/ENGLISH`: exactly one slash, no whitespace around it.
fn is_slash_formatted(nationality: &str) -> bool {
    match nationality.split_once('/') {
        Some((fr, en)) => {
            !fr.is_empty()
                && !en.is_empty()
                && !en.contains('/')
                && !fr.ends_with(char::is_whitespace)
                && !en.starts_with(char::is_whitespace)
        }
        None => false,
    }
}
