pub mod context;
pub mod domain;
pub mod generator;
pub mod headings;
pub mod intake;
pub mod ports;
pub mod prompts;
pub mod templates;
pub mod wellness;

pub use context::build_student_context;
pub use domain::{
    LearningDifference, LearningStyle, Material, Profile, ProfileError, ProjectIdeas, Severity,
    SleepQuality, SourceDocument,
};
pub use generator::{ContentGenerator, Flow, Generated, Origin};
pub use intake::{IntakeError, IntakeStep, IntakeWizard};
pub use ports::{
    Attachment, AttachmentKind, Backend, BackendError, GenerationService, PortError, PortResult,
    ProfileStore,
};
pub use wellness::wellness_messages;
