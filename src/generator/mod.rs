pub mod gemini;
pub mod json_util;

use async_trait::async_trait;

use crate::error::TrackerError;
use crate::lang::Language;
use crate::plan::model::RawDayPlan;

/// Port for the one-shot curriculum generation call.
/// Produces the full ordered list of raw day records or a single error;
/// a partial plan is never returned.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, language: Language) -> Result<Vec<RawDayPlan>, TrackerError>;
}

/// Port for per-knowledge-point concept explanations.
/// Free-text response, no schema.
#[async_trait]
pub trait ExplanationGenerator: Send + Sync {
    async fn explain(
        &self,
        concept: &str,
        day_title: &str,
        language: Language,
    ) -> Result<String, TrackerError>;
}

pub(crate) fn plan_system_instruction() -> &'static str {
    "You are a world-class Technical Interview Coach and Senior AI Engineer. \
     Create a practical, code-heavy study plan."
}

/// The fixed curriculum brief, localized only in its output-language clause.
/// The schema block doubles as the response contract the parser expects.
pub(crate) fn plan_prompt(language: Language, days: u32, target_hours: u32) -> String {
    let language_clause = match language {
        Language::English => "Write all text fields in English.",
        Language::Chinese => "Write all text fields in Simplified Chinese (简体中文).",
    };

    format!(
        r#"I am a Machine Learning Engineer with a solid background in ML theory but weak in Deep Learning and practical implementation.
I want to master Large Language Models (LLMs) and Generative AI efficiently to be interview-ready.

Please create a rigorous {days}-day study plan.

The curriculum must flow logically:
1. DL Basics (Backprop, Activation, Optimizers) - Brief refresher
2. NLP Fundamentals & RNN/LSTM/Attention
3. Transformers & BERT (Architecture, Self-Attention, Encoders)
4. LLM Fundamentals (GPT, Decoders, Scaling Laws)
5. Advanced Training (PEFT, LoRA, QLoRA, Quantization)
6. Alignment (RLHF, DPO)
7. RAG & Vector DBs
8. AIOps & Deployment (vLLM, TGI, Serving)

Constraints:
- Default target hours per day is {target_hours}.
- Focus heavily on "Coding" and "Tuning" tasks.
- Include specific Interview Questions relevant to the day's topic.
- Each day must list 3-5 short checkable knowledge points.
- {language_clause}

Return ONLY a valid JSON array, no markdown or extra text. Each element:

{{
  "day": <integer, 1-based, ascending>,
  "title": "<string>",
  "description": "<string>",
  "topics": ["<string>", ...],
  "knowledgePoints": ["<string>", ...],
  "codingTask": "<string>",
  "interviewFocus": "<string>",
  "targetHours": <integer>
}}

All fields are required. Generate the plan now:"#
    )
}

pub(crate) fn explanation_prompt(concept: &str, day_title: &str, language: Language) -> String {
    let language_clause = match language {
        Language::English => "Answer in English.",
        Language::Chinese => "Answer in Simplified Chinese (简体中文).",
    };

    format!(
        r#"You are a senior AI engineer mentoring an interview candidate.

Explain the concept "{concept}" in the context of the study topic "{day_title}".

Requirements:
- 2-4 short paragraphs, plain text, no markdown headers.
- Focus on intuition first, then the one detail interviewers probe.
- {language_clause}"#
    )
}
