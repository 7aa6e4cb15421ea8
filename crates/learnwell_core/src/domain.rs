//! crates/learnwell_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Datelike, Utc};
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Documented Defaults
//=========================================================================================

/// Values substituted whenever a profile record is missing a field.
pub mod defaults {
    pub const SUBJECT: &str = "General Studies";
    pub const YEAR_OF_STUDY: u8 = 1;
    pub const LEARNING_STYLE: &str = "Mixed";
    pub const STUDY_TIME: &str = "Flexible";
    pub const STUDY_HOURS: u32 = 15;
    pub const ANXIETY: u8 = 5;
    pub const STRESS: u8 = 5;
    pub const MOTIVATION: u8 = 5;
    pub const MOOD: u8 = 3;
    pub const SLEEP_HOURS: f32 = 7.0;
    pub const SLEEP_QUALITY: &str = "Fair";
    pub const DIFFERENCE_TYPES: &str = "Not specified";
    pub const SEVERITY: &str = "Moderate";
    pub const NOT_SPECIFIED: &str = "Not specified";
    pub const GOAL: &str = "Academic success";
    pub const BARRIERS: &str = "None specified";
    pub const ACCESSIBILITY: &str = "None";
    pub const NOTES: &str = "None";
}

//=========================================================================================
// Categorical Attributes
//=========================================================================================

/// Returned when a categorical attribute cannot be recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unrecognised {kind}: '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Lowercases and strips everything but letters, so "👁️ Visual - I learn..." and
/// "reading-writing" both normalise to something matchable.
fn letters_only(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LearningStyle {
    Visual,
    Auditory,
    ReadingWriting,
    Kinesthetic,
}

impl LearningStyle {
    pub fn label(self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditory",
            LearningStyle::ReadingWriting => "Reading/Writing",
            LearningStyle::Kinesthetic => "Kinesthetic",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LearningStyle {
    type Err = UnknownVariant;

    // Intake forms store the full radio label, so match on the leading keyword.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = letters_only(s);
        if key.starts_with("visual") {
            Ok(LearningStyle::Visual)
        } else if key.starts_with("auditory") {
            Ok(LearningStyle::Auditory)
        } else if key.starts_with("reading") {
            Ok(LearningStyle::ReadingWriting)
        } else if key.starts_with("kinesthetic") {
            Ok(LearningStyle::Kinesthetic)
        } else {
            Err(UnknownVariant {
                kind: "learning style",
                value: s.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SleepQuality {
    VeryPoor,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SleepQuality {
    pub fn label(self) -> &'static str {
        match self {
            SleepQuality::VeryPoor => "Very Poor",
            SleepQuality::Poor => "Poor",
            SleepQuality::Fair => "Fair",
            SleepQuality::Good => "Good",
            SleepQuality::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SleepQuality {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match letters_only(s).as_str() {
            "verypoor" => Ok(SleepQuality::VeryPoor),
            "poor" => Ok(SleepQuality::Poor),
            "fair" => Ok(SleepQuality::Fair),
            "good" => Ok(SleepQuality::Good),
            "excellent" => Ok(SleepQuality::Excellent),
            _ => Err(UnknownVariant {
                kind: "sleep quality",
                value: s.to_string(),
            }),
        }
    }
}

/// How strongly a learning difference affects studying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    VeryLittle,
    Somewhat,
    Moderate,
    Significant,
    Severe,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::VeryLittle => "Very Little",
            Severity::Somewhat => "Somewhat",
            Severity::Moderate => "Moderate",
            Severity::Significant => "Significant",
            Severity::Severe => "Severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match letters_only(s).as_str() {
            "verylittle" => Ok(Severity::VeryLittle),
            "somewhat" => Ok(Severity::Somewhat),
            "moderate" => Ok(Severity::Moderate),
            "significant" => Ok(Severity::Significant),
            "severe" => Ok(Severity::Severe),
            _ => Err(UnknownVariant {
                kind: "severity",
                value: s.to_string(),
            }),
        }
    }
}

//=========================================================================================
// Learner Profile
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyPreferences {
    pub subject: Option<String>,
    pub year_of_study: Option<u8>,
    pub weekly_study_hours: Option<u32>,
    pub preferred_study_time: Option<String>,
    pub learning_style: Option<LearningStyle>,
}

/// Self-reported wellbeing. Scales are 1-10 as captured by intake.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wellbeing {
    pub anxiety: Option<u8>,
    pub stress: Option<u8>,
    pub motivation: Option<u8>,
    pub mood: Option<u8>,
    pub sleep_hours: Option<f32>,
    pub sleep_quality: Option<SleepQuality>,
}

/// Present only when the learner reported a learning difference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearningDifference {
    pub types: Vec<String>,
    pub severity: Option<Severity>,
    pub details: Option<String>,
    pub supports_that_help: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Goals {
    pub primary_goal: Option<String>,
    pub barriers: Vec<String>,
    pub accessibility_needs: Vec<String>,
    pub notes: Option<String>,
}

/// The original document behind a material, kept so later flows can reuse it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub const PDF: &'static str = "application/pdf";
    pub const TEXT: &'static str = "text/plain";
    pub const BINARY: &'static str = "application/octet-stream";

    /// Wraps uploaded bytes, sniffing the media type from the content.
    pub fn from_upload(bytes: Vec<u8>) -> Self {
        let media_type = if bytes.starts_with(b"%PDF") {
            Self::PDF
        } else if std::str::from_utf8(&bytes).is_ok() {
            Self::TEXT
        } else {
            Self::BINARY
        };
        Self {
            media_type: media_type.to_string(),
            bytes,
        }
    }

    pub fn is_text(&self) -> bool {
        self.media_type.starts_with("text/")
    }
}

/// The most recent project ideas generated for a material.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectIdeas {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

/// One uploaded document and the content derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub source: Option<SourceDocument>,
    pub generated_lesson: String,
    pub uploaded_at: DateTime<Utc>,
    pub done: bool,
    pub project_ideas: Option<ProjectIdeas>,
}

/// Errors raised by profile mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Material {0} does not exist")]
    MaterialNotFound(usize),
}

/// The central entity: one learner and everything they have uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub created_at: Option<DateTime<Utc>>,
    pub study: StudyPreferences,
    pub wellbeing: Wellbeing,
    pub difference: Option<LearningDifference>,
    pub goals: Goals,
    pub materials: Vec<Material>,
    pub completed_count: u32,
    pub study_streak: u32,
    pub last_study_at: Option<DateTime<Utc>>,
}

/// Formats a new learner id, e.g. `STU20250001` for the first learner of 2025.
pub fn student_id_for(now: DateTime<Utc>, existing_profiles: usize) -> String {
    format!("STU{}{:04}", now.year(), existing_profiles + 1)
}

/// The first sequence id at or after `existing_profiles + 1` that is not taken.
pub fn next_student_id(
    now: DateTime<Utc>,
    existing_profiles: usize,
    taken: impl Fn(&str) -> bool,
) -> String {
    (existing_profiles..)
        .map(|n| student_id_for(now, n))
        .find(|id| !taken(id))
        .unwrap_or_else(|| student_id_for(now, existing_profiles))
}

/// Names are compared case-insensitively after trimming.
pub fn names_match(stored: &str, supplied: &str) -> bool {
    stored.trim().to_lowercase() == supplied.trim().to_lowercase()
}

impl Profile {
    /// An otherwise empty profile with only identity set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            age: None,
            created_at: None,
            study: StudyPreferences::default(),
            wellbeing: Wellbeing::default(),
            difference: None,
            goals: Goals::default(),
            materials: Vec::new(),
            completed_count: 0,
            study_streak: 0,
            last_study_at: None,
        }
    }

    // --- Defaulted accessors ---

    pub fn subject(&self) -> &str {
        self.study.subject.as_deref().unwrap_or(defaults::SUBJECT)
    }

    pub fn year_of_study(&self) -> u8 {
        self.study.year_of_study.unwrap_or(defaults::YEAR_OF_STUDY)
    }

    pub fn weekly_study_hours(&self) -> u32 {
        self.study.weekly_study_hours.unwrap_or(defaults::STUDY_HOURS)
    }

    pub fn preferred_study_time(&self) -> &str {
        self.study
            .preferred_study_time
            .as_deref()
            .unwrap_or(defaults::STUDY_TIME)
    }

    pub fn learning_style_label(&self) -> &'static str {
        self.study
            .learning_style
            .map(LearningStyle::label)
            .unwrap_or(defaults::LEARNING_STYLE)
    }

    pub fn anxiety(&self) -> u8 {
        self.wellbeing.anxiety.unwrap_or(defaults::ANXIETY)
    }

    pub fn stress(&self) -> u8 {
        self.wellbeing.stress.unwrap_or(defaults::STRESS)
    }

    pub fn motivation(&self) -> u8 {
        self.wellbeing.motivation.unwrap_or(defaults::MOTIVATION)
    }

    pub fn mood(&self) -> u8 {
        self.wellbeing.mood.unwrap_or(defaults::MOOD)
    }

    pub fn sleep_hours(&self) -> f32 {
        self.wellbeing.sleep_hours.unwrap_or(defaults::SLEEP_HOURS)
    }

    pub fn sleep_quality_label(&self) -> &'static str {
        self.wellbeing
            .sleep_quality
            .map(SleepQuality::label)
            .unwrap_or(defaults::SLEEP_QUALITY)
    }

    pub fn primary_goal(&self) -> &str {
        match self.goals.primary_goal.as_deref() {
            Some(goal) if !goal.trim().is_empty() => goal,
            _ => defaults::GOAL,
        }
    }

    // --- Materials ---

    /// Appends a freshly processed document.
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        source: Option<SourceDocument>,
        generated_lesson: String,
        now: DateTime<Utc>,
    ) -> usize {
        self.materials.push(Material {
            name: name.into(),
            source,
            generated_lesson,
            uploaded_at: now,
            done: false,
            project_ideas: None,
        });
        self.materials.len() - 1
    }

    /// Names of every material the learner has not finished yet, in upload order.
    pub fn pending_material_names(&self) -> Vec<String> {
        self.materials
            .iter()
            .filter(|m| !m.done)
            .map(|m| m.name.clone())
            .collect()
    }

    /// Marks a material as done.
    ///
    /// Returns `Ok(true)` on the first transition, which also bumps the completed
    /// count and the study streak. Returns `Ok(false)` when the material was
    /// already done; nothing is counted twice.
    pub fn mark_material_done(
        &mut self,
        index: usize,
        now: DateTime<Utc>,
    ) -> Result<bool, ProfileError> {
        let material = self
            .materials
            .get_mut(index)
            .ok_or(ProfileError::MaterialNotFound(index))?;
        if material.done {
            return Ok(false);
        }
        material.done = true;
        self.completed_count += 1;
        self.record_study_day(now);
        Ok(true)
    }

    pub fn record_project_ideas(
        &mut self,
        index: usize,
        text: String,
        now: DateTime<Utc>,
    ) -> Result<(), ProfileError> {
        let material = self
            .materials
            .get_mut(index)
            .ok_or(ProfileError::MaterialNotFound(index))?;
        material.project_ideas = Some(ProjectIdeas {
            text,
            generated_at: now,
        });
        Ok(())
    }

    fn record_study_day(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        self.study_streak = match self.last_study_at.map(|t| t.date_naive()) {
            Some(last) if last == today => self.study_streak.max(1),
            Some(last) if today.pred_opt() == Some(last) => self.study_streak + 1,
            _ => 1,
        };
        self.last_study_at = Some(now);
    }
}
