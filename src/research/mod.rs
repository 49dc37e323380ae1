//! 研究结果层：结构化提取、结构校验、单轮结果（Structured / Fallback）

pub mod extract;
pub mod parser;
pub mod schema;

pub use extract::{extract_json_span, ExtractionStrategy};
pub use parser::{parse_research_output, TurnResult};
pub use schema::{format_instructions, validate_span, ResearchResponse};
