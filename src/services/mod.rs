pub mod analysis;
pub mod formatter;
pub mod model_client;
pub mod pdf_processor;
pub mod prompt;

pub use analysis::{classify, clean_analysis, process_contract_content, process_educational_content};
pub use formatter::{format_analysis_for_layman, format_contract_output, format_educational_output};
pub use model_client::{ContentGenerator, GeminiClient};
pub use pdf_processor::{ExtractionResult, PdfProcessor};
pub use prompt::{build_prompt, ANALYSIS_PROMPT};
