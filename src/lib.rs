//! Multi-phase memoir drafting against a local Ollama model.
//!
//! A project directory moves through three phases, each reading the previous
//! phase's file and writing its own:
//!
//! 1. **outline**: `00_raw_text.txt` → `01_outline.md`
//! 2. **interview**: `01_outline.md` + author answers → `02_interview_data.json`
//! 3. **write**: `02_interview_data.json` → `03_draft.md`

pub mod config;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod store;
