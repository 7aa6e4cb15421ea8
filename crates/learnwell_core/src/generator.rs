//! crates/learnwell_core/src/generator.rs
//!
//! The content generation flows. Each flow builds instructions from the learner
//! profile, dispatches them to the configured backend and, when the backend is
//! disabled or the call fails, returns the matching template output instead.
//! Callers never see a backend error.

use crate::domain::{Material, Profile, SourceDocument};
use crate::ports::{Attachment, Backend, BackendError};
use crate::prompts;
use crate::templates;
use std::fmt;
use tracing::{debug, info, warn};

/// Which path produced a piece of content. The text itself carries no marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Backend,
    Template,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub text: String,
    pub origin: Origin,
}

impl Generated {
    fn template(text: String) -> Self {
        Self {
            text,
            origin: Origin::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Lesson,
    StudyPlan,
    ProjectIdeas,
    Support,
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Flow::Lesson => "lesson",
            Flow::StudyPlan => "study-plan",
            Flow::ProjectIdeas => "project-ideas",
            Flow::Support => "support",
        })
    }
}

/// Runs the four generation flows against one backend, fixed at construction.
#[derive(Debug, Clone)]
pub struct ContentGenerator {
    backend: Backend,
}

impl ContentGenerator {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Turns a document into a lesson adapted to the learner.
    pub async fn lesson(
        &self,
        profile: &Profile,
        file_name: &str,
        document: &SourceDocument,
    ) -> Generated {
        let fallback = || templates::mock_lesson(profile, file_name);
        if !self.backend.is_enabled() {
            return Generated::template(fallback());
        }
        let instructions = prompts::lesson_instructions(profile);
        let attachments = [Attachment::document(&document.media_type, &document.bytes)];
        self.dispatch(
            Flow::Lesson,
            &instructions,
            &attachments,
            prompts::LESSON_MAX_TOKENS,
            fallback,
        )
        .await
    }

    /// A weekly plan over the materials the learner has not finished yet.
    /// An empty list still yields a full plan.
    pub async fn study_plan(&self, profile: &Profile, pending: &[String]) -> Generated {
        let fallback = || templates::mock_study_plan(profile, pending);
        if !self.backend.is_enabled() {
            return Generated::template(fallback());
        }
        let instructions = prompts::study_plan_instructions(profile, pending);
        self.dispatch(
            Flow::StudyPlan,
            &instructions,
            &[],
            prompts::STUDY_PLAN_MAX_TOKENS,
            fallback,
        )
        .await
    }

    /// Project ideas for a material. The stored document is attached when the
    /// material still has one; earlier ideas are passed along to discourage repeats.
    pub async fn project_ideas(&self, profile: &Profile, material: &Material) -> Generated {
        let fallback =
            || templates::mock_project_ideas(profile, &material.name, &mut rand::thread_rng());
        if !self.backend.is_enabled() {
            return Generated::template(fallback());
        }

        let previous = material
            .project_ideas
            .as_ref()
            .map(|ideas| prompts::previous_project_titles(&ideas.text))
            .unwrap_or_default();
        let instructions = prompts::project_ideas_instructions(
            profile,
            &material.name,
            &previous,
            material.source.is_some(),
        );
        let attachments: Vec<Attachment<'_>> = match &material.source {
            Some(doc) => vec![Attachment::document(&doc.media_type, &doc.bytes)],
            None => Vec::new(),
        };
        self.dispatch(
            Flow::ProjectIdeas,
            &instructions,
            &attachments,
            prompts::PROJECT_IDEAS_MAX_TOKENS,
            fallback,
        )
        .await
    }

    /// Empathetic guidance for one focus area.
    pub async fn support(&self, profile: &Profile, area: &str) -> Generated {
        let fallback = || templates::mock_support(profile, area);
        if !self.backend.is_enabled() {
            return Generated::template(fallback());
        }
        let instructions = prompts::support_instructions(profile, area);
        self.dispatch(
            Flow::Support,
            &instructions,
            &[],
            prompts::SUPPORT_MAX_TOKENS,
            fallback,
        )
        .await
    }

    async fn dispatch(
        &self,
        flow: Flow,
        instructions: &str,
        attachments: &[Attachment<'_>],
        max_output_tokens: u32,
        fallback: impl FnOnce() -> String,
    ) -> Generated {
        let service = match &self.backend {
            Backend::Live(service) => service,
            Backend::Disabled => return Generated::template(fallback()),
        };

        debug!(
            %flow,
            provider = service.name(),
            attachments = attachments.len(),
            "Dispatching generation request"
        );
        let result = service
            .generate(instructions, attachments, max_output_tokens)
            .await
            .and_then(|text| {
                if text.trim().is_empty() {
                    Err(BackendError::MalformedResponse("empty reply".to_string()))
                } else {
                    Ok(text)
                }
            });

        match result {
            Ok(text) => {
                info!(%flow, provider = service.name(), "Generated content from backend");
                Generated {
                    text,
                    origin: Origin::Backend,
                }
            }
            Err(e) => {
                warn!(
                    %flow,
                    provider = service.name(),
                    error = %e,
                    "Backend generation failed; using template"
                );
                Generated::template(fallback())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProjectIdeas;
    use crate::headings::{self, missing_headings};
    use crate::ports::GenerationService;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    /// Always fails, recording what it was asked.
    #[derive(Default)]
    struct FailingService {
        calls: Mutex<Vec<(String, usize, u32)>>,
    }

    #[async_trait]
    impl GenerationService for FailingService {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            instructions: &str,
            attachments: &[Attachment<'_>],
            max_output_tokens: u32,
        ) -> Result<String, BackendError> {
            self.calls.lock().unwrap().push((
                instructions.to_string(),
                attachments.len(),
                max_output_tokens,
            ));
            Err(BackendError::Auth("invalid x-api-key".into()))
        }
    }

    struct FixedService(&'static str);

    #[async_trait]
    impl GenerationService for FixedService {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _instructions: &str,
            _attachments: &[Attachment<'_>],
            _max_output_tokens: u32,
        ) -> Result<String, BackendError> {
            Ok(self.0.to_string())
        }
    }

    fn profile() -> Profile {
        let mut p = Profile::new("STU20250001", "Lena", "lena@example.com");
        p.study.subject = Some("Computer Science".into());
        p.goals.primary_goal = Some("Get a First".into());
        p
    }

    fn material(with_source: bool) -> Material {
        Material {
            name: "graphs.pdf".into(),
            source: with_source.then(|| SourceDocument::from_upload(b"%PDF-1.4 graphs".to_vec())),
            generated_lesson: "lesson".into(),
            uploaded_at: Utc::now(),
            done: false,
            project_ideas: None,
        }
    }

    fn pdf() -> SourceDocument {
        SourceDocument::from_upload(b"%PDF-1.4 graphs".to_vec())
    }

    #[tokio::test]
    async fn disabled_backend_produces_every_contract_heading() {
        let generator = ContentGenerator::new(Backend::Disabled);
        let p = profile();

        let lesson = generator.lesson(&p, "graphs.pdf", &pdf()).await;
        let plan = generator.study_plan(&p, &[]).await;
        let ideas = generator.project_ideas(&p, &material(true)).await;
        let support = generator.support(&p, "Motivation and energy").await;

        assert!(missing_headings(&lesson.text, headings::lesson::ALL).is_empty());
        assert!(missing_headings(&plan.text, headings::study_plan::ALL).is_empty());
        assert!(missing_headings(&ideas.text, headings::projects::ALL).is_empty());
        assert!(missing_headings(&support.text, headings::support::ALL).is_empty());
        for g in [lesson, plan, ideas, support] {
            assert_eq!(g.origin, Origin::Template);
        }
    }

    #[tokio::test]
    async fn failing_backend_matches_disabled_output() {
        let disabled = ContentGenerator::new(Backend::Disabled);
        let failing = ContentGenerator::new(Backend::live(FailingService::default()));
        let p = profile();
        let pending = vec!["graphs.pdf".to_string()];

        assert_eq!(
            failing.lesson(&p, "graphs.pdf", &pdf()).await,
            disabled.lesson(&p, "graphs.pdf", &pdf()).await
        );
        assert_eq!(
            failing.study_plan(&p, &pending).await,
            disabled.study_plan(&p, &pending).await
        );
        assert_eq!(
            failing.support(&p, "Improving my grades").await,
            disabled.support(&p, "Improving my grades").await
        );

        // Project selection is random, so compare structure rather than text.
        let ideas = failing.project_ideas(&p, &material(true)).await;
        assert_eq!(ideas.origin, Origin::Template);
        assert!(missing_headings(&ideas.text, headings::projects::ALL).is_empty());
    }

    #[tokio::test]
    async fn lesson_sends_the_document_and_token_budget() {
        let service = Arc::new(FailingService::default());
        let generator = ContentGenerator::new(Backend::Live(service.clone()));
        let mut p = profile();
        p.wellbeing.anxiety = Some(8);

        generator.lesson(&p, "graphs.pdf", &pdf()).await;

        let calls = service.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (instructions, attachments, max_tokens) = &calls[0];
        assert_eq!(*attachments, 1);
        assert_eq!(*max_tokens, prompts::LESSON_MAX_TOKENS);
        assert!(instructions.contains("simple and reassuring"));
    }

    #[tokio::test]
    async fn project_ideas_attach_document_only_when_stored() {
        let service = Arc::new(FailingService::default());
        let generator = ContentGenerator::new(Backend::Live(service.clone()));
        let p = profile();

        let mut seen = material(false);
        seen.project_ideas = Some(ProjectIdeas {
            text: "## Project 1: Graph Explorer\n".into(),
            generated_at: Utc::now(),
        });
        generator.project_ideas(&p, &material(true)).await;
        generator.project_ideas(&p, &seen).await;

        let calls = service.calls.lock().unwrap();
        assert_eq!(calls[0].1, 1);
        assert_eq!(calls[1].1, 0);
        assert!(calls[1].0.contains("- Graph Explorer"));
    }

    #[tokio::test]
    async fn successful_backend_text_is_returned_verbatim() {
        let reply = "# 📅 Your Weekly Study Plan\n...";
        let generator = ContentGenerator::new(Backend::live(FixedService(reply)));
        let plan = generator.study_plan(&profile(), &[]).await;
        assert_eq!(plan.origin, Origin::Backend);
        assert_eq!(plan.text, reply);
    }

    #[tokio::test]
    async fn blank_backend_reply_falls_back() {
        let generator = ContentGenerator::new(Backend::live(FixedService("   \n")));
        let support = generator.support(&profile(), "Motivation and energy").await;
        assert_eq!(support.origin, Origin::Template);
    }
}
