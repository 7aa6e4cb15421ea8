//! services/api/src/web/protocol.rs
//!
//! Request and response payloads for the REST API. Generated text is passed
//! through as raw markdown; clients render it.

use chrono::{DateTime, Utc};
use learnwell_core::{
    domain::{defaults, UnknownVariant},
    intake::{BasicInfo, DifferenceInput, GoalsInput, Preferences, WellbeingInput},
    Generated, Material, Origin, Profile,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(default)]
pub struct BasicInfoPayload {
    pub name: String,
    pub email: String,
    pub age: Option<u8>,
    pub year_of_study: u8,
    pub subject: String,
}

impl Default for BasicInfoPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            age: None,
            year_of_study: defaults::YEAR_OF_STUDY,
            subject: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(default)]
pub struct PreferencesPayload {
    /// Any of `visual`, `auditory`, `reading-writing`, `kinesthetic`.
    pub learning_style: Option<String>,
    pub preferred_study_time: String,
    pub weekly_study_hours: u32,
}

impl Default for PreferencesPayload {
    fn default() -> Self {
        Self {
            learning_style: None,
            preferred_study_time: String::new(),
            weekly_study_hours: defaults::STUDY_HOURS,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct DifferencePayload {
    pub has_difference: bool,
    pub types: Vec<String>,
    pub severity: Option<String>,
    pub details: String,
    pub supports_that_help: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(default)]
pub struct WellbeingPayload {
    pub anxiety: u8,
    pub stress: u8,
    pub motivation: u8,
    pub mood: u8,
    pub sleep_hours: f32,
    pub sleep_quality: Option<String>,
    pub difference: DifferencePayload,
}

impl Default for WellbeingPayload {
    fn default() -> Self {
        let defaults = WellbeingInput::default();
        Self {
            anxiety: defaults.anxiety,
            stress: defaults.stress,
            motivation: defaults.motivation,
            mood: defaults.mood,
            sleep_hours: defaults.sleep_hours,
            sleep_quality: None,
            difference: DifferencePayload::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct GoalsPayload {
    pub primary_goal: String,
    pub barriers: Vec<String>,
    pub accessibility_needs: Vec<String>,
    pub notes: String,
}

/// All four intake steps in one request, applied in order.
#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    pub basic: BasicInfoPayload,
    pub preferences: PreferencesPayload,
    pub wellbeing: WellbeingPayload,
    pub goals: GoalsPayload,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub student_id: String,
    pub name: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct SupportRequest {
    /// The focus area, e.g. "Managing my anxiety/stress".
    pub area: String,
}

//=========================================================================================
// Payload Conversions
//=========================================================================================

fn parse_optional<T: std::str::FromStr<Err = UnknownVariant>>(
    value: Option<&str>,
) -> Result<Option<T>, UnknownVariant> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
}

impl From<BasicInfoPayload> for BasicInfo {
    fn from(p: BasicInfoPayload) -> Self {
        BasicInfo {
            name: p.name,
            email: p.email,
            age: p.age,
            year_of_study: p.year_of_study,
            subject: p.subject,
        }
    }
}

impl TryFrom<PreferencesPayload> for Preferences {
    type Error = UnknownVariant;

    fn try_from(p: PreferencesPayload) -> Result<Self, Self::Error> {
        Ok(Preferences {
            learning_style: parse_optional(p.learning_style.as_deref())?,
            preferred_study_time: p.preferred_study_time,
            weekly_study_hours: p.weekly_study_hours,
        })
    }
}

impl TryFrom<WellbeingPayload> for WellbeingInput {
    type Error = UnknownVariant;

    fn try_from(p: WellbeingPayload) -> Result<Self, Self::Error> {
        let defaults = WellbeingInput::default();
        Ok(WellbeingInput {
            anxiety: p.anxiety,
            stress: p.stress,
            motivation: p.motivation,
            mood: p.mood,
            sleep_hours: p.sleep_hours,
            sleep_quality: parse_optional(p.sleep_quality.as_deref())?
                .unwrap_or(defaults.sleep_quality),
            difference: DifferenceInput {
                has_difference: p.difference.has_difference,
                types: p.difference.types,
                severity: parse_optional(p.difference.severity.as_deref())?,
                details: p.difference.details,
                supports_that_help: p.difference.supports_that_help,
            },
        })
    }
}

impl From<GoalsPayload> for GoalsInput {
    fn from(p: GoalsPayload) -> Self {
        GoalsInput {
            primary_goal: p.primary_goal,
            barriers: p.barriers,
            accessibility_needs: p.accessibility_needs,
            notes: p.notes,
        }
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OriginView {
    Backend,
    Template,
}

impl From<Origin> for OriginView {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Backend => OriginView::Backend,
            Origin::Template => OriginView::Template,
        }
    }
}

/// Generated markdown plus which path produced it.
#[derive(Serialize, Debug, ToSchema)]
pub struct GeneratedResponse {
    pub text: String,
    pub origin: OriginView,
}

impl From<Generated> for GeneratedResponse {
    fn from(generated: Generated) -> Self {
        Self {
            text: generated.text,
            origin: generated.origin.into(),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub year_of_study: u8,
    pub learning_style: String,
    pub materials_count: usize,
    pub completed_count: u32,
    pub study_streak: u32,
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            subject: profile.subject().to_string(),
            year_of_study: profile.year_of_study(),
            learning_style: profile.learning_style_label().to_string(),
            materials_count: profile.materials.len(),
            completed_count: profile.completed_count,
            study_streak: profile.study_streak,
        }
    }
}

/// A material without its document bytes.
#[derive(Serialize, Debug, ToSchema)]
pub struct MaterialView {
    pub index: usize,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub done: bool,
    pub has_document: bool,
    pub lesson: String,
    pub project_ideas: Option<String>,
}

impl MaterialView {
    pub fn new(index: usize, material: &Material) -> Self {
        Self {
            index,
            name: material.name.clone(),
            uploaded_at: material.uploaded_at,
            done: material.done,
            has_document: material.source.is_some(),
            lesson: material.generated_lesson.clone(),
            project_ideas: material.project_ideas.as_ref().map(|p| p.text.clone()),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct UploadResponse {
    pub index: usize,
    pub name: String,
    pub lesson: GeneratedResponse,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct CompletionResponse {
    pub index: usize,
    /// False when the material had already been marked done.
    pub newly_completed: bool,
    pub completed_count: u32,
    pub study_streak: u32,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct StudyPlanResponse {
    pub pending_materials: Vec<String>,
    pub plan: GeneratedResponse,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct WellnessResponse {
    pub messages: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnwell_core::{LearningStyle, Severity, SleepQuality};

    #[test]
    fn omitted_wellbeing_fields_take_intake_defaults() {
        let payload: WellbeingPayload = serde_json::from_str("{}").unwrap();
        let input = WellbeingInput::try_from(payload).unwrap();
        assert_eq!(input.anxiety, 5);
        assert_eq!(input.mood, 3);
        assert_eq!(input.sleep_quality, SleepQuality::Fair);
        assert!(!input.difference.has_difference);
    }

    #[test]
    fn omitted_study_fields_take_documented_defaults() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"basic":{"name":"Ada","email":"ada@example.com","subject":"Maths"},"preferences":{}}"#,
        )
        .unwrap();
        assert_eq!(BasicInfo::from(request.basic).year_of_study, 1);
        let prefs = Preferences::try_from(request.preferences).unwrap();
        assert_eq!(prefs.weekly_study_hours, 15);
    }

    #[test]
    fn categorical_labels_are_parsed_leniently() {
        let prefs = Preferences::try_from(PreferencesPayload {
            learning_style: Some("Reading-Writing".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(prefs.learning_style, Some(LearningStyle::ReadingWriting));

        let payload: WellbeingPayload = serde_json::from_str(
            r#"{"sleep_quality":"very poor","difference":{"has_difference":true,"severity":"Significant"}}"#,
        )
        .unwrap();
        let input = WellbeingInput::try_from(payload).unwrap();
        assert_eq!(input.sleep_quality, SleepQuality::VeryPoor);
        assert_eq!(input.difference.severity, Some(Severity::Significant));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let err = Preferences::try_from(PreferencesPayload {
            learning_style: Some("telepathic".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err.value, "telepathic");
    }

    #[test]
    fn origin_serializes_in_snake_case() {
        let response = GeneratedResponse::from(Generated {
            text: "# Plan".into(),
            origin: Origin::Template,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["origin"], "template");
    }
}
