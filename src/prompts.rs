//! Prompt templates for the three phases.
//!
//! Templates use the Llama 3 chat markup understood by the default model and
//! are rendered with Tera. Autoescaping is off, and values inserted into the
//! context are never evaluated as template syntax.

use tera::{Context, Tera};
use thiserror::Error;

use crate::models::AuthorContext;

const OUTLINE_TEMPLATE: &str = "<|begin_of_text|><|start_header_id|>system<|end_header_id|>

You are a developmental editor outlining the memoir of {{ author_description }}. Organize the author's own account into a coherent narrative outline. Keep every real name, relationship and event exactly as written.

REQUIREMENTS:
- This is {{ author_name }}'s true story about {{ author_themes }}.
- Keep all real names as written ({{ mentioned_names }}).
- Do not change names, genders or relationship dynamics.
- Follow {{ author_name }}'s journey in the order it happened.

Output format: a Markdown outline using
- ## for major life phases or chapters
- - for individual events, using the real names and details provided

<|eot_id|><|start_header_id|>user<|end_header_id|>

Create a narrative outline from {{ author_name }}'s account:

{{ raw_text }}

<|eot_id|><|start_header_id|>assistant<|end_header_id|>

";

const INTERVIEW_TEMPLATE: &str = "<|begin_of_text|><|start_header_id|>system<|end_header_id|>

You are a warm, perceptive interviewer helping {{ author_name }} develop a memoir about {{ author_themes }}. Write 3 to 5 open-ended questions that draw out sensory detail, emotional depth and the motivations of the people involved.

Output format: a valid JSON array of strings and nothing else. No commentary.
Example: [\"What did the room smell like?\", \"What were you feeling in that moment?\"]

<|eot_id|><|start_header_id|>user<|end_header_id|>

Write interview questions for this outline point:
{{ outline_point }}

<|eot_id|><|start_header_id|>assistant<|end_header_id|>

";

const WRITE_TEMPLATE: &str = "<|begin_of_text|><|start_header_id|>system<|end_header_id|>

You are a professional ghostwriter drafting a memoir about {{ author_themes }}. This is {{ author_name }}'s true story, written for publication.

Write one vivid, respectful narrative scene.

REQUIREMENTS:
- Protagonist: {{ author_name }}
- Use only the real names and details from the interview notes
- Third person, past tense
- Emotional truth over embellishment
- Concrete sensory detail
- A tone suitable for a published memoir

<|eot_id|><|start_header_id|>user<|end_header_id|>

Scene to write: {{ outline_point }}

Interview notes to draw on:
{{ qa_block }}

Write the scene.

<|eot_id|><|start_header_id|>assistant<|end_header_id|>

";

/// Builds phase prompts for one author.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    author: AuthorContext,
    tera: Tera,
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("failed to register prompt template '{name}'")]
    Template {
        name: &'static str,
        #[source]
        source: tera::Error,
    },

    #[error("failed to render prompt template '{name}'")]
    Render {
        name: &'static str,
        #[source]
        source: tera::Error,
    },
}

const OUTLINE: &str = "outline";
const INTERVIEW: &str = "interview";
const WRITE: &str = "write";

impl PromptBuilder {
    pub fn new(author: AuthorContext) -> Result<Self, PromptError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        for (name, template) in [
            (OUTLINE, OUTLINE_TEMPLATE),
            (INTERVIEW, INTERVIEW_TEMPLATE),
            (WRITE, WRITE_TEMPLATE),
        ] {
            tera.add_raw_template(name, template)
                .map_err(|source| PromptError::Template { name, source })?;
        }

        Ok(Self { author, tera })
    }

    /// Prompt asking for a markdown outline of the raw text.
    pub fn outline(&self, raw_text: &str) -> Result<String, PromptError> {
        let mut context = self.author_context();
        context.insert("raw_text", raw_text);
        self.render(OUTLINE, &context)
    }

    /// Prompt asking for a JSON array of questions about one outline point.
    pub fn interview(&self, outline_point: &str) -> Result<String, PromptError> {
        let mut context = self.author_context();
        context.insert("outline_point", outline_point);
        self.render(INTERVIEW, &context)
    }

    /// Prompt asking for a scene, given the rendered Q&A block.
    pub fn write(&self, outline_point: &str, qa_block: &str) -> Result<String, PromptError> {
        let mut context = self.author_context();
        context.insert("outline_point", outline_point);
        context.insert("qa_block", qa_block);
        self.render(WRITE, &context)
    }

    fn author_context(&self) -> Context {
        let names = if self.author.mentioned_names.is_empty() {
            "every name that appears".to_string()
        } else {
            self.author.mentioned_names.join(", ")
        };

        let mut context = Context::new();
        context.insert("author_name", &self.author.name);
        context.insert("author_description", &self.author.description);
        context.insert("author_themes", &self.author.themes);
        context.insert("mentioned_names", &names);
        context
    }

    fn render(&self, name: &'static str, context: &Context) -> Result<String, PromptError> {
        self.tera
            .render(name, context)
            .map_err(|source| PromptError::Render { name, source })
    }
}
