//! Generated study material.
//!
//! [`ContentAssistant`] turns a [`StudyContext`] into a prompt for a study
//! plan, a quiz or a list of resources and hands it to a [`TextGenerator`].
//! Nothing here is used by the payroll or finance paths.

mod gemini;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

pub use gemini::GeminiClient;

/// Produces text from a prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> EngineResult<String>;
}

/// The kinds of material the assistant can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// A week-by-week study plan.
    StudyPlan,
    /// A short quiz with answers.
    Quiz,
    /// Books, recordings and other references.
    Resources,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::StudyPlan => "study_plan",
            ContentKind::Quiz => "quiz",
            ContentKind::Resources => "resources",
        };
        f.write_str(name)
    }
}

/// Who the material is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyContext {
    /// The student's name.
    pub student_name: String,
    /// Current level, e.g. "beginner" or a memorized portion.
    pub level: String,
    /// The subject to study.
    pub subject: String,
    /// Optional goals stated by the teacher or parent.
    #[serde(default)]
    pub goals: Option<String>,
}

impl StudyContext {
    fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("student_name", &self.student_name),
            ("level", &self.level),
            ("subject", &self.subject),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::validation(field, "is required"));
            }
        }
        Ok(())
    }
}

/// Builds the prompt for `kind`.
pub fn build_prompt(kind: ContentKind, context: &StudyContext) -> String {
    let task = match kind {
        ContentKind::StudyPlan => {
            "Write a four-week study plan with daily goals and a weekly review."
        }
        ContentKind::Quiz => {
            "Write a quiz of ten questions at the student's level, followed by an answer key."
        }
        ContentKind::Resources => {
            "List recommended books, recordings and exercises with one line on why each helps."
        }
    };

    let mut prompt = format!(
        "You are an experienced teacher at a Quran and Islamic studies center.\n\
         Student: {}\nLevel: {}\nSubject: {}\n",
        context.student_name.trim(),
        context.level.trim(),
        context.subject.trim()
    );
    if let Some(goals) = context.goals.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        prompt.push_str(&format!("Goals: {}\n", goals));
    }
    prompt.push_str(task);
    prompt.push_str("\nAnswer in Arabic.");
    prompt
}

/// Prompt builder over a [`TextGenerator`].
#[derive(Clone)]
pub struct ContentAssistant {
    generator: Arc<dyn TextGenerator>,
}

impl ContentAssistant {
    /// Creates an assistant using `generator`.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generates material of `kind` for `context`.
    ///
    /// An empty or whitespace-only completion is a
    /// [`EngineError::TextGeneration`] error.
    pub async fn generate(&self, kind: ContentKind, context: &StudyContext) -> EngineResult<String> {
        context.validate()?;
        let prompt = build_prompt(kind, context);
        tracing::debug!(kind = %kind, prompt_len = prompt.len(), "Requesting generated content");

        let text = self.generator.generate(&prompt).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::TextGeneration {
                message: format!("empty {} returned", kind),
            });
        }
        Ok(text.to_string())
    }

    /// A study plan for the student.
    pub async fn study_plan(&self, context: &StudyContext) -> EngineResult<String> {
        self.generate(ContentKind::StudyPlan, context).await
    }

    /// A quiz for the student.
    pub async fn quiz(&self, context: &StudyContext) -> EngineResult<String> {
        self.generate(ContentKind::Quiz, context).await
    }

    /// Study resources for the student.
    pub async fn resources(&self, context: &StudyContext) -> EngineResult<String> {
        self.generate(ContentKind::Resources, context).await
    }
}
