//! Fixed prompt template for document summaries.

use super::ChatMessage;

/// Upper bound on generated tokens for a summary.
pub const MAX_OUTPUT_TOKENS: u32 = 1250;
/// Sampling temperature for summaries.
pub const TEMPERATURE: f32 = 0.7;

/// System-role instructions shared by every summary request.
pub const SYSTEM_INSTRUCTIONS: &str = concat!(
    "Respond with clear, actionable, and structured answers. ",
    "Start with a 2-4 sentence summary providing a high-level overview of the topic. ",
    "Follow the summary with well-structured sections that organize the details logically. ",
    "Use subheadings, bullet points, and concise sentences for clarity. ",
    "Focus on practicality and avoid unnecessary verbosity. ",
    "Present information in an easy-to-follow format suitable for a broad audience."
);

const USER_INSTRUCTIONS: &str = concat!(
    "Summarize the following text with clarity and brevity. ",
    "Begin with a high-level summary of the main ideas in 2-4 sentences. ",
    "End with a 1-3 sentence summary/conclusion. ",
    "After the summary, organize the detailed content into sections with subheadings. ",
    "Each section should provide practical, actionable insights using bullet points or numbered lists. ",
    "Avoid long paragraphs and ensure the response is easy to read and follow. ",
    "Don't include a 'summary' text title/heading at the top. ",
    "Use simple language, and structure the response so it is accessible to a general audience:"
);

/// User-role prompt: the structural requirements followed by the document text verbatim.
pub fn build_user_prompt(text: &str) -> String {
    let mut prompt = String::with_capacity(USER_INSTRUCTIONS.len() + 2 + text.len());
    prompt.push_str(USER_INSTRUCTIONS);
    prompt.push_str("\n\n");
    prompt.push_str(text);
    prompt
}

/// Ordered system + user messages for summarizing `text`.
pub fn build_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_INSTRUCTIONS),
        ChatMessage::user(build_user_prompt(text)),
    ]
}
