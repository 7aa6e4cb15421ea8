//! services/api/src/adapters/json_store.rs
//!
//! This module contains the profile store adapter, the concrete implementation
//! of the `ProfileStore` port from the `core` crate. All profiles live in a single
//! JSON document keyed by student id.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Utc};
use learnwell_core::domain::{
    next_student_id, Goals, LearningDifference, Material, Profile, ProjectIdeas,
    SourceDocument, StudyPreferences, Wellbeing,
};
use learnwell_core::ports::{PortError, PortResult, ProfileStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{error, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed store that implements the `ProfileStore` port.
pub struct JsonProfileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonProfileStore {
    /// Creates a new `JsonProfileStore`. The file is created lazily on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the raw document. Records stay as JSON values so one malformed
    /// entry cannot hide, or on the next write erase, the others.
    async fn read_document(&self) -> Result<BTreeMap<String, Value>, String> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(format!("Failed to read profile store: {}", e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| format!("Profile store is corrupt: {}", e))
    }

    /// The document as the starting point of a write. An unreadable document is
    /// left untouched and the write is refused.
    async fn records_for_write(&self) -> PortResult<BTreeMap<String, Value>> {
        self.read_document().await.map_err(|e| {
            error!(path = %self.path.display(), "Refusing to overwrite profile store: {}", e);
            PortError::Unexpected(e)
        })
    }

    fn record_value(profile: &Profile) -> PortResult<Value> {
        serde_json::to_value(ProfileRecord::from_domain(profile))
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    /// Writes the whole collection to a sibling temp file, then renames it over the
    /// real one so readers never see a partial document.
    async fn write_records(&self, records: &BTreeMap<String, Value>) -> PortResult<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await.map_err(|e| {
            PortError::Unexpected(format!(
                "Failed to write temp file '{}': {}",
                temp_path.display(),
                e
            ))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            error!(path = %self.path.display(), "Failed to replace profile store: {}", e);
            return Err(PortError::Unexpected(format!(
                "Failed to rename '{}' to '{}': {}",
                temp_path.display(),
                self.path.display(),
                e
            )));
        }
        Ok(())
    }
}

//=========================================================================================
// "Impure" Record Structs
//=========================================================================================
//
// The field names follow the layout of existing `users_database.json` files, so
// older documents load unchanged. Every optional field tolerates absence.

/// Older files hold naive ISO timestamps without an offset; those are read as UTC.
mod lenient_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ChallengeRecord {
    #[serde(default)]
    has_challenge: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    severity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    specific_challenges: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    what_helps: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MaterialRecord {
    name: String,
    #[serde(default)]
    lesson: String,
    /// Base64 of the original document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pdf_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    date: Option<DateTime<Utc>>,
    #[serde(default)]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projects: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_time::deserialize"
    )]
    projects_generated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    student_id: String,
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    age: Option<u8>,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    created: Option<DateTime<Utc>>,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    year: Option<u8>,
    #[serde(default)]
    learning_style: Option<String>,
    #[serde(default)]
    study_time: Option<String>,
    #[serde(default)]
    study_hours: Option<u32>,
    #[serde(default)]
    anxiety: Option<u8>,
    #[serde(default)]
    stress: Option<u8>,
    #[serde(default)]
    motivation: Option<u8>,
    #[serde(default)]
    depression: Option<u8>,
    #[serde(default)]
    sleep_hours: Option<f32>,
    #[serde(default)]
    sleep_quality: Option<String>,
    #[serde(default)]
    challenge: ChallengeRecord,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    barriers: Vec<String>,
    #[serde(default)]
    accessibility: Vec<String>,
    #[serde(default)]
    additional_info: Option<String>,
    #[serde(default)]
    materials: Vec<MaterialRecord>,
    #[serde(default)]
    completed: u32,
    #[serde(default)]
    study_streak: u32,
    #[serde(default, deserialize_with = "lenient_time::deserialize")]
    last_study: Option<DateTime<Utc>>,
}

fn parse_lenient<T: std::str::FromStr>(value: Option<&str>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

impl MaterialRecord {
    fn to_domain(self) -> Material {
        let source = self.pdf_content.as_deref().and_then(|encoded| {
            match BASE64.decode(encoded) {
                Ok(bytes) => Some(match self.media_type.clone() {
                    Some(media_type) => SourceDocument { media_type, bytes },
                    None => SourceDocument::from_upload(bytes),
                }),
                Err(e) => {
                    warn!(material = %self.name, "Dropping undecodable document: {}", e);
                    None
                }
            }
        });
        let uploaded_at = self.date.unwrap_or_default();
        let project_ideas = self.projects.map(|text| ProjectIdeas {
            text,
            generated_at: self.projects_generated.unwrap_or(uploaded_at),
        });
        Material {
            name: self.name,
            source,
            generated_lesson: self.lesson,
            uploaded_at,
            done: self.done,
            project_ideas,
        }
    }

    fn from_domain(material: &Material) -> Self {
        Self {
            name: material.name.clone(),
            lesson: material.generated_lesson.clone(),
            pdf_content: material.source.as_ref().map(|s| BASE64.encode(&s.bytes)),
            media_type: material.source.as_ref().map(|s| s.media_type.clone()),
            date: Some(material.uploaded_at),
            done: material.done,
            projects: material.project_ideas.as_ref().map(|p| p.text.clone()),
            projects_generated: material.project_ideas.as_ref().map(|p| p.generated_at),
        }
    }
}

impl ProfileRecord {
    fn to_domain(self) -> Profile {
        let challenge = self.challenge;
        let difference = challenge.has_challenge.then(|| LearningDifference {
            types: challenge.types,
            severity: parse_lenient(challenge.severity.as_deref()),
            details: challenge.specific_challenges,
            supports_that_help: challenge.what_helps,
        });

        Profile {
            id: self.student_id,
            name: self.name,
            email: self.email,
            age: self.age,
            created_at: self.created,
            study: StudyPreferences {
                subject: self.subject,
                year_of_study: self.year,
                weekly_study_hours: self.study_hours,
                preferred_study_time: self.study_time,
                learning_style: parse_lenient(self.learning_style.as_deref()),
            },
            wellbeing: Wellbeing {
                anxiety: self.anxiety,
                stress: self.stress,
                motivation: self.motivation,
                mood: self.depression,
                sleep_hours: self.sleep_hours,
                sleep_quality: parse_lenient(self.sleep_quality.as_deref()),
            },
            difference,
            goals: Goals {
                primary_goal: self.goal,
                barriers: self.barriers,
                accessibility_needs: self.accessibility,
                notes: self.additional_info,
            },
            materials: self
                .materials
                .into_iter()
                .map(MaterialRecord::to_domain)
                .collect(),
            completed_count: self.completed,
            study_streak: self.study_streak,
            last_study_at: self.last_study,
        }
    }

    fn from_domain(profile: &Profile) -> Self {
        let challenge = match &profile.difference {
            Some(d) => ChallengeRecord {
                has_challenge: true,
                types: d.types.clone(),
                severity: d.severity.map(|s| s.label().to_string()),
                specific_challenges: d.details.clone(),
                what_helps: d.supports_that_help.clone(),
            },
            None => ChallengeRecord::default(),
        };

        Self {
            student_id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            age: profile.age,
            created: profile.created_at,
            subject: profile.study.subject.clone(),
            year: profile.study.year_of_study,
            learning_style: profile.study.learning_style.map(|s| s.label().to_string()),
            study_time: profile.study.preferred_study_time.clone(),
            study_hours: profile.study.weekly_study_hours,
            anxiety: profile.wellbeing.anxiety,
            stress: profile.wellbeing.stress,
            motivation: profile.wellbeing.motivation,
            depression: profile.wellbeing.mood,
            sleep_hours: profile.wellbeing.sleep_hours,
            sleep_quality: profile.wellbeing.sleep_quality.map(|q| q.label().to_string()),
            challenge,
            goal: profile.goals.primary_goal.clone(),
            barriers: profile.goals.barriers.clone(),
            accessibility: profile.goals.accessibility_needs.clone(),
            additional_info: profile.goals.notes.clone(),
            materials: profile.materials.iter().map(MaterialRecord::from_domain).collect(),
            completed: profile.completed_count,
            study_streak: profile.study_streak,
            last_study: profile.last_study_at,
        }
    }
}

//=========================================================================================
// `ProfileStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProfileStore for JsonProfileStore {
    async fn load(&self) -> HashMap<String, Profile> {
        let records = self.read_document().await.unwrap_or_else(|e| {
            warn!(path = %self.path.display(), "{}; treating as empty", e);
            BTreeMap::new()
        });
        records
            .into_iter()
            .filter_map(|(id, value)| match serde_json::from_value::<ProfileRecord>(value) {
                Ok(record) => Some((id, record.to_domain())),
                Err(e) => {
                    warn!(student_id = %id, "Skipping unreadable profile record: {}", e);
                    None
                }
            })
            .collect()
    }

    async fn save(&self, profile: &Profile) -> PortResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.records_for_write().await?;
        records.insert(profile.id.clone(), Self::record_value(profile)?);
        self.write_records(&records).await
    }

    async fn create(&self, mut draft: Profile, now: DateTime<Utc>) -> PortResult<Profile> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.records_for_write().await?;
        draft.id = next_student_id(now, records.len(), |id| records.contains_key(id));
        records.insert(draft.id.clone(), Self::record_value(&draft)?);
        self.write_records(&records).await?;
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use learnwell_core::domain::{LearningStyle, Severity};
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> JsonProfileStore {
        JsonProfileStore::new(dir.path().join("users_database.json"))
    }

    fn profile(completed: u32) -> Profile {
        let mut p = Profile::new("STU20250001", "Maya Chen", "maya@example.com");
        p.completed_count = completed;
        p
    }

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store(&dir).load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        tokio::fs::write(store.path(), "{ not json").await.unwrap();
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        tokio::fs::write(store.path(), "{ not json").await.unwrap();

        assert!(store.save(&profile(0)).await.is_err());
        let on_disk = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert_eq!(on_disk, "{ not json");
    }

    #[tokio::test]
    async fn malformed_record_is_skipped_and_kept_on_save() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let document = r#"{
            "STU20250001": {"student_id": "STU20250001", "name": "Good", "email": "g@example.com"},
            "STU20250002": {"student_id": "STU20250002", "name": "Odd", "anxiety": 5.5}
        }"#;
        tokio::fs::write(store.path(), document).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("STU20250001"));

        let mut newcomer = profile(0);
        newcomer.id = "STU20250003".into();
        store.save(&newcomer).await.unwrap();

        let raw: BTreeMap<String, Value> =
            serde_json::from_str(&tokio::fs::read_to_string(store.path()).await.unwrap())
                .unwrap();
        assert_eq!(raw.len(), 3);
        assert_eq!(raw["STU20250002"]["anxiety"], 5.5);
        assert!(store.find("STU20250001", "good").await.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_get_distinct_ids() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(store(&dir));
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();

        let tasks: Vec<_> = ["Alice", "Bob", "Chen", "Dana"]
            .into_iter()
            .map(|name| {
                let store = store.clone();
                tokio::spawn(async move {
                    let draft = Profile::new("", name, "x@example.com");
                    store.create(draft, now).await.unwrap().id
                })
            })
            .collect();
        let mut ids = Vec::new();
        for task in tasks {
            ids.push(task.await.unwrap());
        }
        ids.sort();

        assert_eq!(
            ids,
            ["STU20260001", "STU20260002", "STU20260003", "STU20260004"]
        );
        assert_eq!(store.load().await.len(), 4);
    }

    #[tokio::test]
    async fn create_skips_ids_already_in_use() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut existing = profile(0);
        existing.id = "STU20250002".into();
        store.save(&existing).await.unwrap();

        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let created = store
            .create(Profile::new("", "Lee", "lee@example.com"), now)
            .await
            .unwrap();
        assert_eq!(created.id, "STU20250003");
    }

    #[tokio::test]
    async fn second_save_wins() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&profile(1)).await.unwrap();
        store.save(&profile(4)).await.unwrap();

        let all = store.load().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all["STU20250001"].completed_count, 4);
        assert!(!dir.path().join("users_database.json.tmp").exists());
    }

    #[tokio::test]
    async fn find_normalizes_name_and_rejects_mismatch() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(&profile(0)).await.unwrap();

        assert!(store.find("STU20250001", "  maya CHEN ").await.is_some());
        assert!(store.find("STU20250001", "Maya Lee").await.is_none());
        assert!(store.find("STU20259999", "Maya Chen").await.is_none());
    }

    #[tokio::test]
    async fn round_trips_materials_and_difference() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let when = Utc.with_ymd_and_hms(2025, 5, 4, 12, 0, 0).unwrap();

        let mut p = profile(0);
        p.study.learning_style = Some(LearningStyle::Auditory);
        p.difference = Some(LearningDifference {
            types: vec!["ADHD".into()],
            severity: Some(Severity::Severe),
            details: None,
            supports_that_help: Some("Audio content".into()),
        });
        let idx = p.add_material(
            "week1.pdf",
            Some(SourceDocument::from_upload(b"%PDF-1.5 body".to_vec())),
            "# 📚 Learning".into(),
            when,
        );
        p.record_project_ideas(idx, "## Project 1: Podcast".into(), when).unwrap();
        store.save(&p).await.unwrap();

        let loaded = store.find("STU20250001", "Maya Chen").await.unwrap();
        assert_eq!(loaded, p);
    }

    #[tokio::test]
    async fn reads_legacy_records_with_missing_keys() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let legacy = r#"{
            "STU20250003": {
                "student_id": "STU20250003",
                "name": "Tom",
                "email": "tom@example.com",
                "learning_style": "👂 Auditory - I learn best by listening and discussing",
                "sleep_quality": "Excellent",
                "challenge": {"has_challenge": false},
                "materials": [
                    {"name": "a.pdf", "lesson": "text", "pdf_content": "JVBERi0xLjQ=", "date": "2025-02-01T10:00:00.123456", "done": true}
                ],
                "completed": 1,
                "last_study": null
            }
        }"#;
        tokio::fs::write(store.path(), legacy).await.unwrap();

        let tom = store.find("STU20250003", "tom").await.unwrap();
        assert_eq!(tom.study.learning_style, Some(LearningStyle::Auditory));
        assert_eq!(tom.anxiety(), 5);
        assert!(tom.difference.is_none());
        let material = &tom.materials[0];
        assert!(material.done);
        assert_eq!(
            material.uploaded_at,
            lenient_time::parse("2025-02-01T10:00:00.123456Z").unwrap()
        );
        assert_eq!(
            material.source.as_ref().map(|s| s.media_type.as_str()),
            Some(SourceDocument::PDF)
        );
    }
}
