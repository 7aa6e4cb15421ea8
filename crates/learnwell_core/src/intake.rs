//! crates/learnwell_core/src/intake.rs
//!
//! The sign-up wizard as an explicit state machine:
//! basic info → preferences → wellbeing → goals → committed.
//!
//! Every step validates its own input. The profile is only built and persisted
//! once the goals step passes validation, so a rejected sign-up never reaches
//! the store.

use crate::domain::{
    Goals, LearningDifference, LearningStyle, Profile, Severity, SleepQuality, StudyPreferences,
    Wellbeing,
};
use crate::ports::{PortError, ProfileStore};
use chrono::{DateTime, Utc};
use std::fmt;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStep {
    BasicInfo,
    Preferences,
    Wellbeing,
    Goals,
    Committed,
}

impl fmt::Display for IntakeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IntakeStep::BasicInfo => "basic-info",
            IntakeStep::Preferences => "preferences",
            IntakeStep::Wellbeing => "wellbeing",
            IntakeStep::Goals => "goals",
            IntakeStep::Committed => "committed",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Cannot submit {attempted} while at step {current}")]
    OutOfOrder {
        current: IntakeStep,
        attempted: IntakeStep,
    },
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
    #[error("Failed to store profile: {0}")]
    Store(#[from] PortError),
}

//=========================================================================================
// Step Inputs
//=========================================================================================

#[derive(Debug, Clone, Default)]
pub struct BasicInfo {
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub year_of_study: u8,
    pub subject: String,
}

#[derive(Debug, Clone, Default)]
pub struct Preferences {
    pub learning_style: Option<LearningStyle>,
    pub preferred_study_time: String,
    pub weekly_study_hours: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DifferenceInput {
    pub has_difference: bool,
    pub types: Vec<String>,
    pub severity: Option<Severity>,
    pub details: String,
    pub supports_that_help: String,
}

#[derive(Debug, Clone)]
pub struct WellbeingInput {
    pub anxiety: u8,
    pub stress: u8,
    pub motivation: u8,
    pub mood: u8,
    pub sleep_hours: f32,
    pub sleep_quality: SleepQuality,
    pub difference: DifferenceInput,
}

impl Default for WellbeingInput {
    fn default() -> Self {
        Self {
            anxiety: 5,
            stress: 5,
            motivation: 5,
            mood: 3,
            sleep_hours: 7.0,
            sleep_quality: SleepQuality::Fair,
            difference: DifferenceInput::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GoalsInput {
    pub primary_goal: String,
    pub barriers: Vec<String>,
    pub accessibility_needs: Vec<String>,
    pub notes: String,
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

//=========================================================================================
// The Wizard
//=========================================================================================

#[derive(Debug, Clone)]
pub struct IntakeWizard {
    step: IntakeStep,
    basic: Option<BasicInfo>,
    preferences: Option<Preferences>,
    wellbeing: Option<WellbeingInput>,
}

impl Default for IntakeWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeWizard {
    pub fn new() -> Self {
        Self {
            step: IntakeStep::BasicInfo,
            basic: None,
            preferences: None,
            wellbeing: None,
        }
    }

    pub fn step(&self) -> IntakeStep {
        self.step
    }

    fn expect_step(&self, attempted: IntakeStep) -> Result<(), IntakeError> {
        if self.step == attempted {
            Ok(())
        } else {
            Err(IntakeError::OutOfOrder {
                current: self.step,
                attempted,
            })
        }
    }

    pub fn submit_basic_info(&mut self, mut input: BasicInfo) -> Result<(), IntakeError> {
        self.expect_step(IntakeStep::BasicInfo)?;
        input.name = non_blank(&input.name).ok_or(IntakeError::MissingField("name"))?;
        input.subject = non_blank(&input.subject).ok_or(IntakeError::MissingField("subject"))?;
        input.email = input.email.trim().to_string();
        if !input.email.contains('@') {
            return Err(IntakeError::InvalidEmail(input.email));
        }
        input.year_of_study = input.year_of_study.clamp(1, 5);
        self.basic = Some(input);
        self.step = IntakeStep::Preferences;
        Ok(())
    }

    pub fn submit_preferences(&mut self, mut input: Preferences) -> Result<(), IntakeError> {
        self.expect_step(IntakeStep::Preferences)?;
        input.weekly_study_hours = input.weekly_study_hours.clamp(5, 40);
        self.preferences = Some(input);
        self.step = IntakeStep::Wellbeing;
        Ok(())
    }

    pub fn submit_wellbeing(&mut self, mut input: WellbeingInput) -> Result<(), IntakeError> {
        self.expect_step(IntakeStep::Wellbeing)?;
        for scale in [
            &mut input.anxiety,
            &mut input.stress,
            &mut input.motivation,
            &mut input.mood,
        ] {
            *scale = (*scale).clamp(1, 10);
        }
        input.sleep_hours = input.sleep_hours.clamp(3.0, 12.0);
        self.wellbeing = Some(input);
        self.step = IntakeStep::Goals;
        Ok(())
    }

    /// Steps back one state, keeping everything captured so far.
    pub fn back(&mut self) {
        self.step = match self.step {
            IntakeStep::BasicInfo | IntakeStep::Preferences => IntakeStep::BasicInfo,
            IntakeStep::Wellbeing => IntakeStep::Preferences,
            IntakeStep::Goals => IntakeStep::Wellbeing,
            IntakeStep::Committed => IntakeStep::Committed,
        };
    }

    /// Validates the goals step, then assigns an id and saves the new profile.
    ///
    /// An empty goal is rejected before the store is touched, and the wizard
    /// stays on the goals step so the caller can re-prompt.
    pub async fn finish(
        &mut self,
        goals: GoalsInput,
        store: &dyn ProfileStore,
        now: DateTime<Utc>,
    ) -> Result<Profile, IntakeError> {
        self.expect_step(IntakeStep::Goals)?;
        let primary_goal =
            non_blank(&goals.primary_goal).ok_or(IntakeError::MissingField("primary_goal"))?;

        let (Some(basic), Some(prefs), Some(wellbeing)) =
            (&self.basic, &self.preferences, &self.wellbeing)
        else {
            return Err(IntakeError::OutOfOrder {
                current: self.step,
                attempted: IntakeStep::Goals,
            });
        };

        // The store assigns the id when it inserts the profile.
        let mut profile = Profile::new(String::new(), basic.name.clone(), basic.email.clone());
        profile.age = basic.age;
        profile.created_at = Some(now);
        profile.study = StudyPreferences {
            subject: Some(basic.subject.clone()),
            year_of_study: Some(basic.year_of_study),
            weekly_study_hours: Some(prefs.weekly_study_hours),
            preferred_study_time: non_blank(&prefs.preferred_study_time),
            learning_style: prefs.learning_style,
        };
        profile.wellbeing = Wellbeing {
            anxiety: Some(wellbeing.anxiety),
            stress: Some(wellbeing.stress),
            motivation: Some(wellbeing.motivation),
            mood: Some(wellbeing.mood),
            sleep_hours: Some(wellbeing.sleep_hours),
            sleep_quality: Some(wellbeing.sleep_quality),
        };
        let diff = &wellbeing.difference;
        profile.difference = diff.has_difference.then(|| LearningDifference {
            types: diff.types.clone(),
            severity: diff.severity,
            details: non_blank(&diff.details),
            supports_that_help: non_blank(&diff.supports_that_help),
        });
        profile.goals = Goals {
            primary_goal: Some(primary_goal),
            barriers: goals.barriers,
            accessibility_needs: goals.accessibility_needs,
            notes: non_blank(&goals.notes),
        };

        let profile = store.create(profile, now).await?;
        self.step = IntakeStep::Committed;
        info!(student_id = %profile.id, "Created learner profile");
        Ok(profile)
    }
}
