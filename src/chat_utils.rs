// chat_utils.rs
use crate::error::EnactError;
use crate::inference_utils::{
    ChatCompletionConfig, ChatMessage, HuggingFaceConnect, TextToImageConfig,
};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::thread_rng;
use uuid::Uuid;

/// The model families the chat assistant can route a prompt to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCategory {
    Text,
    Image,
    VisionText,
}

impl ModelCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ModelCategory::Text => "Text Models",
            ModelCategory::Image => "Image Models",
            ModelCategory::VisionText => "Vision & Text Models",
        }
    }
}

/// The model catalog the assistant offers, grouped by category.
pub fn available_models() -> Vec<(ModelCategory, Vec<&'static str>)> {
    vec![
        (ModelCategory::Text, vec!["Qwen/QwQ-32B-Preview"]),
        (ModelCategory::Image, vec!["black-forest-labs/FLUX.1-dev"]),
        (ModelCategory::VisionText, vec!["Qwen/QVQ-72B-Preview"]),
    ]
}

const DEFAULT_TEMPLATE: &str = "Your Name is EnactCoder";
const FRIENDLY_TEMPLATE: &str = "You are a friendly and helpful AI assistant.";
const PROFESSIONAL_TEMPLATE: &str =
    "You are a professional AI assistant specialized in software development.";
const CODER_TEMPLATE: &str = "You are an expert AI coding assistant designed to help users with \
all aspects of software development, from initial project setup to debugging and optimization. \
Prioritize clean, efficient, well-documented, and idiomatic code that adheres to best practices. \
Analyze error messages, suggest potential solutions, and explain the reasoning behind your \
suggestions. Ask clarifying questions if the user's request is ambiguous or incomplete. Maintain \
context throughout the conversation so you can build upon previous work. Use code blocks with \
proper syntax highlighting, be concise and to the point, and prioritize functional code over \
theoretical explanations. Your Name is EnactCoder";

/// Looks up a predefined system-instruction template by its menu name.
pub fn instruction_template(name: &str) -> Option<&'static str> {
    match name {
        "Default" => Some(DEFAULT_TEMPLATE),
        "Friendly Assistant" => Some(FRIENDLY_TEMPLATE),
        "Professional Assistant" => Some(PROFESSIONAL_TEMPLATE),
        "Coder Assistant" => Some(CODER_TEMPLATE),
        _ => None,
    }
}

/// Session options: which model to talk to, how, and under which system
/// instruction.
#[derive(Debug, Clone)]
pub struct ChatSessionConfig {
    pub model: String,
    pub category: ModelCategory,
    pub system_instruction: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for ChatSessionConfig {
    fn default() -> Self {
        ChatSessionConfig {
            model: "Qwen/QwQ-32B-Preview".to_string(),
            category: ModelCategory::Text,
            system_instruction: DEFAULT_TEMPLATE.to_string(),
            max_tokens: 2800,
            temperature: 0.7,
        }
    }
}

/// What one exchange produced: assistant text or generated image bytes.
#[derive(Debug, Clone)]
pub enum ChatReply {
    Text(String),
    Image(Vec<u8>),
}

// Attachment snippets longer than this are cut off before they ride along
// with a prompt.
const ATTACHMENT_LIMIT: usize = 500;

/// One conversation with one model. Text models keep the full message
/// history; image and vision models are dispatched per prompt without
/// appending to it.
pub struct ChatSession {
    session_id: String,
    started_at: DateTime<Utc>,
    config: ChatSessionConfig,
    connect: HuggingFaceConnect,
    messages: Vec<ChatMessage>,
    pending_attachment: Option<String>,
}

impl ChatSession {
    pub fn new(connect: HuggingFaceConnect, config: ChatSessionConfig) -> Self {
        let messages = vec![ChatMessage::system(&config.system_instruction)];
        ChatSession {
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            config,
            connect,
            messages,
            pending_attachment: None,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Replaces the system instruction for every subsequent exchange.
    pub fn set_system_instruction(&mut self, instruction: &str) {
        self.config.system_instruction = instruction.to_string();
        self.messages[0] = ChatMessage::system(instruction);
    }

    /// Stages a text attachment: its content (truncated to 500 characters)
    /// is appended to the next prompt.
    pub fn attach_text_file(&mut self, content: &str) {
        self.pending_attachment = Some(format!(
            " [File Content: {}...]",
            truncate_chars(content, ATTACHMENT_LIMIT)
        ));
    }

    /// Stages an image attachment by name; only the name travels with a
    /// text prompt.
    pub fn attach_image_name(&mut self, file_name: &str) {
        self.pending_attachment = Some(format!(" [Image Uploaded: {}]", file_name));
    }

    /// The attachment snippet staged for the next prompt, if any.
    pub fn pending_attachment(&self) -> Option<&str> {
        self.pending_attachment.as_deref()
    }

    /// Full history including the system message. Display code usually
    /// wants [`ChatSession::visible_history`] instead.
    pub fn history(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The conversation without the system message.
    pub fn visible_history(&self) -> Vec<&ChatMessage> {
        self.messages.iter().filter(|m| m.role != "system").collect()
    }

    /// Sends one user prompt and returns the reply, routing by the model
    /// category the session was configured with.
    pub async fn send(&mut self, user_input: &str) -> Result<ChatReply, EnactError> {
        let mut input = user_input.to_string();
        if let Some(attachment) = self.pending_attachment.take() {
            input.push_str(&attachment);
        }

        match self.config.category {
            ModelCategory::Text => {
                self.messages.push(ChatMessage::user(&input));
                let reply = self
                    .connect
                    .chat_completion(&self.messages, &self.completion_config(2800))
                    .await?;
                self.messages.push(ChatMessage::assistant(&reply));
                Ok(ChatReply::Text(reply))
            }
            ModelCategory::Image => {
                let image = self
                    .connect
                    .text_to_image(
                        &input,
                        &TextToImageConfig {
                            model: self.config.model.clone(),
                        },
                    )
                    .await?;
                Ok(ChatReply::Image(image))
            }
            ModelCategory::VisionText => {
                // Single-turn exchange; vision prompts are not added to the
                // running history.
                let messages = vec![ChatMessage::user(&input)];
                let reply = self
                    .connect
                    .chat_completion(&messages, &self.completion_config(500))
                    .await?;
                Ok(ChatReply::Text(reply))
            }
        }
    }

    fn completion_config(&self, default_max_tokens: u32) -> ChatCompletionConfig {
        ChatCompletionConfig {
            model: self.config.model.clone(),
            max_tokens: if self.config.max_tokens > 0 {
                self.config.max_tokens
            } else {
                default_max_tokens
            },
            temperature: self.config.temperature,
        }
    }
}

fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// A lighthearted status line for long-running calls.
pub fn random_loading_text() -> &'static str {
    const LINES: [&str; 8] = [
        "Processing your request... Almost there!",
        "Crunching the numbers... 🍪",
        "Whipping up some magic! ✨",
        "Loading... Patience is a virtue! 🕰️",
        "Calculating... Did you know honey never spoils?",
        "Generating content... Why did the programmer quit his job? 😄",
        "Hold tight! We're on it!",
        "Fetching data... Did you hear about the mathematician who's afraid of negative numbers?",
    ];
    LINES
        .choose(&mut thread_rng())
        .copied()
        .expect("non-empty loading lines")
}
