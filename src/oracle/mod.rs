mod traits;
mod gemini;
mod openai;

pub use traits::*;
pub use gemini::GeminiOracle;
pub use openai::OpenAIOracle;
