//! @ai:module:intent Benchmark prompts, raw responses and judge rubric
//! @ai:module:layer domain
//! @ai:module:public_api Prompt, RawResponse, Rubric, PromptLoader

pub mod loader;
pub mod prompt;

pub use loader::{PromptLoader, PromptLoaderTrait};
pub use prompt::{Prompt, RawResponse, Rubric};
