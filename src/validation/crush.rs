use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{run_gates, Gate, Rejection};
use crate::models::{CrushInput, DateRecord};

pub const NAME_REQUIRED: &str = "O campo \"name\" é obrigatório";
pub const NAME_TOO_SHORT: &str = "O \"name\" deve ter pelo menos 3 caracteres";
pub const AGE_REQUIRED: &str = "O campo \"age\" é obrigatório";
pub const AGE_UNDERAGE: &str = "O crush deve ser maior de idade";
pub const DATE_REQUIRED: &str =
    "O campo \"date\" é obrigatório e \"datedAt\" e \"rate\" não podem ser vazios";
pub const DATED_AT_FORMAT: &str = "O campo \"datedAt\" deve ter o formato \"dd/mm/aaaa\"";
pub const RATE_RANGE: &str = "O campo \"rate\" deve ser um inteiro de 1 à 5";

const MIN_NAME_CHARS: usize = 3;
const MIN_AGE: i64 = 18;

// Day 00-31, month 00-12, any four-digit year. Not a calendar check.
static DATED_AT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-2][0-9]|3[0-1])/(0[0-9]|1[0-2])/[0-9]{4}$").expect("valid datedAt regex")
});

/// Raw create/update body. Fields stay untyped until the gates have run.
#[derive(Debug, Default, Deserialize)]
pub struct CrushPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
}

static CRUSH_GATES: &[Gate<CrushPayload>] = &[
    Gate { name: "name", check: check_name },
    Gate { name: "age", check: check_age },
    Gate { name: "date", check: check_date },
    Gate { name: "rate", check: check_rate },
];

/// Run the crush gates in order and produce the typed input
pub fn validate_crush(payload: &CrushPayload) -> Result<CrushInput, Rejection> {
    run_gates(CRUSH_GATES, payload)?;

    let name = non_empty_str(&payload.name).ok_or(Rejection::new("name", NAME_REQUIRED))?;
    let age = payload
        .age
        .as_ref()
        .and_then(Value::as_u64)
        .ok_or(Rejection::new("age", AGE_REQUIRED))?;
    let date = date_object(payload).ok_or(Rejection::new("date", DATE_REQUIRED))?;
    let dated_at = date
        .get("datedAt")
        .and_then(Value::as_str)
        .ok_or(Rejection::new("datedAt", DATED_AT_FORMAT))?;
    let rate = rate_value(date).ok_or(Rejection::new("rate", RATE_RANGE))?;

    Ok(CrushInput {
        name: name.to_string(),
        age,
        date: DateRecord {
            dated_at: dated_at.to_string(),
            rate,
        },
    })
}

fn check_name(payload: &CrushPayload) -> Result<(), Rejection> {
    let name = non_empty_str(&payload.name).ok_or(Rejection::new("name", NAME_REQUIRED))?;
    if name.chars().count() < MIN_NAME_CHARS {
        return Err(Rejection::new("name", NAME_TOO_SHORT));
    }
    Ok(())
}

fn check_age(payload: &CrushPayload) -> Result<(), Rejection> {
    // Zero and non-integers count as absent
    match payload.age.as_ref().and_then(Value::as_i64) {
        None | Some(0) => Err(Rejection::new("age", AGE_REQUIRED)),
        Some(age) if age < MIN_AGE => Err(Rejection::new("age", AGE_UNDERAGE)),
        Some(_) => Ok(()),
    }
}

fn check_date(payload: &CrushPayload) -> Result<(), Rejection> {
    let date = date_object(payload).ok_or(Rejection::new("date", DATE_REQUIRED))?;

    // `rate` only has to be present here; its range is the next gate's concern
    if is_blank(date.get("datedAt")) || !date.contains_key("rate") {
        return Err(Rejection::new("date", DATE_REQUIRED));
    }

    match date.get("datedAt").and_then(Value::as_str) {
        Some(dated_at) if DATED_AT_RE.is_match(dated_at) => Ok(()),
        _ => Err(Rejection::new("datedAt", DATED_AT_FORMAT)),
    }
}

fn check_rate(payload: &CrushPayload) -> Result<(), Rejection> {
    date_object(payload)
        .and_then(rate_value)
        .map(|_| ())
        .ok_or(Rejection::new("rate", RATE_RANGE))
}

fn date_object(payload: &CrushPayload) -> Option<&Map<String, Value>> {
    payload.date.as_ref().and_then(Value::as_object)
}

fn rate_value(date: &Map<String, Value>) -> Option<u8> {
    date.get("rate")
        .and_then(Value::as_u64)
        .filter(|rate| (1..=5).contains(rate))
        .and_then(|rate| u8::try_from(rate).ok())
}

fn non_empty_str(value: &Option<Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}
