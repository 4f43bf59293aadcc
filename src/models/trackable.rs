use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackableType {
    Chore,
    Exercise,
}

impl TrackableType {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            TrackableType::Chore => "chore",
            TrackableType::Exercise => "exercise",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "chore" => Some(TrackableType::Chore),
            "exercise" => Some(TrackableType::Exercise),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
}

impl RecurrenceUnit {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::Days => "days",
            RecurrenceUnit::Weeks => "weeks",
            RecurrenceUnit::Months => "months",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "days" => Some(RecurrenceUnit::Days),
            "weeks" => Some(RecurrenceUnit::Weeks),
            "months" => Some(RecurrenceUnit::Months),
            _ => None,
        }
    }

    /// Helper: accepts the CLI short forms (d, w, m) as well as the full names.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "d" | "day" | "days" => Some(RecurrenceUnit::Days),
            "w" | "week" | "weeks" => Some(RecurrenceUnit::Weeks),
            "m" | "month" | "months" => Some(RecurrenceUnit::Months),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub every: u32,
    pub unit: RecurrenceUnit,
}

impl Recurrence {
    pub fn new(every: u32, unit: RecurrenceUnit) -> Self {
        Self { every, unit }
    }

    /// Parse "3d", "2w", "1m" or "2 weeks".
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit())?;
        let (num, unit) = s.split_at(split);
        let every: u32 = num.parse().ok()?;
        if every == 0 {
            return None;
        }
        let unit = RecurrenceUnit::from_code(unit.trim())?;
        Some(Self { every, unit })
    }
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            every: 1,
            unit: RecurrenceUnit::Weeks,
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "every {} {}", self.every, self.unit.to_db_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseUnit {
    Reps,
    Km,
    Steps,
    Minutes,
    Sets,
}

impl ExerciseUnit {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ExerciseUnit::Reps => "reps",
            ExerciseUnit::Km => "km",
            ExerciseUnit::Steps => "steps",
            ExerciseUnit::Minutes => "minutes",
            ExerciseUnit::Sets => "sets",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reps" => Some(ExerciseUnit::Reps),
            "km" => Some(ExerciseUnit::Km),
            "steps" => Some(ExerciseUnit::Steps),
            "minutes" => Some(ExerciseUnit::Minutes),
            "sets" => Some(ExerciseUnit::Sets),
            _ => None,
        }
    }
}

/// A chore or exercise definition with its recurrence rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trackable {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TrackableType,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<DateTime<Utc>>,

    // exercise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_unit: Option<ExerciseUnit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,

    // chore
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_repeating: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_until_due: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_next_due_date: Option<DateTime<Utc>>,
}

impl Trackable {
    pub fn is_chore(&self) -> bool {
        self.kind == TrackableType::Chore
    }

    pub fn is_exercise(&self) -> bool {
        self.kind == TrackableType::Exercise
    }

    /// Rows written before `is_repeating` existed have it unset and count as repeating.
    pub fn repeats(&self) -> bool {
        self.is_repeating != Some(false)
    }

    /// A chore explicitly marked as one-time.
    pub fn is_one_time_chore(&self) -> bool {
        self.is_chore() && !self.repeats()
    }

    pub fn target(&self) -> f64 {
        self.target_amount.unwrap_or(0.0)
    }
}

/// Input for creating a trackable; id, creation time and archive flag are assigned.
#[derive(Debug, Clone)]
pub struct NewTrackable {
    pub kind: TrackableType,
    pub name: String,
    pub description: Option<String>,
    pub recurrence: Recurrence,
    pub person_id: Option<String>,
    pub exercise_unit: Option<ExerciseUnit>,
    pub target_amount: Option<f64>,
    pub is_repeating: Option<bool>,
    pub days_until_due: Option<i64>,
    pub next_due_date: Option<DateTime<Utc>>,
}

impl NewTrackable {
    pub fn chore(name: &str, recurrence: Recurrence) -> Self {
        Self {
            kind: TrackableType::Chore,
            name: name.trim().to_string(),
            description: None,
            recurrence,
            person_id: None,
            exercise_unit: None,
            target_amount: None,
            is_repeating: None,
            days_until_due: None,
            next_due_date: None,
        }
    }

    pub fn exercise(name: &str, recurrence: Recurrence, target: f64) -> Self {
        Self {
            kind: TrackableType::Exercise,
            target_amount: Some(target),
            ..Self::chore(name, recurrence)
        }
    }
}

/// Partial edit of a trackable: only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct TrackablePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub person_id: Option<String>,
    pub exercise_unit: Option<ExerciseUnit>,
    pub target_amount: Option<f64>,
    pub is_repeating: Option<bool>,
}

impl TrackablePatch {
    pub fn apply(&self, t: &mut Trackable) {
        if let Some(name) = &self.name {
            t.name = name.trim().to_string();
        }
        if let Some(desc) = &self.description {
            t.description = if desc.trim().is_empty() {
                None
            } else {
                Some(desc.trim().to_string())
            };
        }
        if let Some(rec) = self.recurrence {
            t.recurrence = rec;
        }
        if let Some(person) = &self.person_id {
            t.person_id = Some(person.clone());
        }
        if let Some(unit) = self.exercise_unit {
            t.exercise_unit = Some(unit);
        }
        if let Some(target) = self.target_amount {
            t.target_amount = Some(target);
        }
        if let Some(rep) = self.is_repeating {
            t.is_repeating = Some(rep);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.recurrence.is_none()
            && self.person_id.is_none()
            && self.exercise_unit.is_none()
            && self.target_amount.is_none()
            && self.is_repeating.is_none()
    }
}
