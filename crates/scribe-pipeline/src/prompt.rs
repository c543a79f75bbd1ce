//! Prompt construction for each task kind

use scribe_core::{
    AnalysisRequest, Confidence, RenderedPrompt, ResponseContract, Schema, Sentiment,
    SentimentRecord, TaskKind, TopicList,
};

const JSON_ONLY_DIRECTIVE: &str = "Respond with ONLY the JSON object. \
Do not include any explanation, markdown or other text outside the JSON object.";

const FORMAT_DIRECTIVE: &str = "Format your response clearly with headers and bullet points.";

/// Renders an [`AnalysisRequest`] into the exact messages sent to the model.
///
/// Rendering is pure: the same request always yields the same prompt. For
/// JSON-contract tasks the field list is built from the payload constants in
/// `scribe-core`, which the response parser decodes against.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, request: &AnalysisRequest) -> RenderedPrompt {
        match request.task_kind() {
            TaskKind::CodeReview => self.code_review(request),
            TaskKind::Sentiment => self.sentiment(request),
            TaskKind::TopicExtraction => self.topics(request),
            TaskKind::EmailDraft => self.email_draft(request),
            TaskKind::EmailImprovement => self.email_improvement(request),
            TaskKind::Summarize => self.summarize(request),
        }
    }

    fn code_review(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let language = request.parameters().language.as_deref().unwrap_or("text");
        let user_prompt = format!(
            "You are an expert code reviewer. Analyze the following {language} code and provide:\n\
            \n\
            1. **Code Quality Issues**: Identify bugs, logic errors, or potential runtime issues\n\
            2. **Best Practices**: Suggest improvements following {language} best practices\n\
            3. **Performance**: Point out performance bottlenecks or inefficiencies\n\
            4. **Security**: Identify potential security vulnerabilities\n\
            5. **Readability**: Suggest improvements for code clarity and maintainability\n\
            6. **Overall Rating**: Rate the code from 1-10 and provide a summary\n\
            \n\
            File: {file}\n\
            \n\
            Code:\n\
            ```{language}\n\
            {code}\n\
            ```\n\
            \n\
            Provide specific, actionable feedback with line references where applicable.\n\
            {FORMAT_DIRECTIVE}",
            file = request.input_identity(),
            code = request.subject_content().trim_end(),
        );

        RenderedPrompt {
            system_instruction: "You are an expert code reviewer with years of experience in software development."
                .to_string(),
            user_prompt,
            response_contract: ResponseContract::FreeText,
        }
    }

    fn summarize(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let length = request.parameters().summary_length_or_default();
        let user_prompt = format!(
            "Summarize the following text {}. Keep the key facts, names and figures.\n\
            {FORMAT_DIRECTIVE}\n\
            \n\
            Text to summarize:\n\
            \"\"\"\n\
            {}\n\
            \"\"\"",
            length.instruction(),
            request.subject_content().trim(),
        );

        RenderedPrompt {
            system_instruction: "You are a helpful assistant that writes accurate, faithful summaries."
                .to_string(),
            user_prompt,
            response_contract: ResponseContract::FreeText,
        }
    }

    fn email_draft(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let params = request.parameters();
        let user_prompt = format!(
            "Write a {tone} email for the following:\n\
            \n\
            Purpose: {purpose}\n\
            Recipient: {recipient}\n\
            Key points to include: {points}\n\
            \n\
            Write a complete email with a subject line and body. Keep it clear and concise.\n\
            {FORMAT_DIRECTIVE}",
            tone = params.tone_or_default().as_str(),
            purpose = params.purpose.as_deref().unwrap_or_default(),
            recipient = params.recipient.as_deref().unwrap_or_default(),
            points = request.subject_content().trim(),
        );

        RenderedPrompt {
            system_instruction: "You are a helpful assistant that writes professional emails.".to_string(),
            user_prompt,
            response_contract: ResponseContract::FreeText,
        }
    }

    fn email_improvement(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let user_prompt = format!(
            "Improve this email so it is {tone}, clear and well structured:\n\
            \n\
            \"\"\"\n\
            {email}\n\
            \"\"\"\n\
            \n\
            Provide the improved version, followed by a short list of the changes you made.\n\
            {FORMAT_DIRECTIVE}",
            tone = request.parameters().tone_or_default().as_str(),
            email = request.subject_content().trim(),
        );

        RenderedPrompt {
            system_instruction: "You are a helpful assistant that improves email writing.".to_string(),
            user_prompt,
            response_contract: ResponseContract::FreeText,
        }
    }

    fn sentiment(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let (min, max) = SentimentRecord::SCORE_RANGE;
        let [sentiment, score, emotion, confidence, phrases] = SentimentRecord::FIELDS;
        let fields = [
            format!("\"{sentiment}\": string, one of {}", quoted_list(&Sentiment::ALLOWED)),
            format!(
                "\"{score}\": number between {min} and {max}, where {min} is very negative and {max} is very positive"
            ),
            format!("\"{emotion}\": string, the main emotion expressed"),
            format!("\"{confidence}\": string, one of {}", quoted_list(&Confidence::ALLOWED)),
            format!("\"{phrases}\": array of strings, the phrases that influenced the sentiment rating"),
        ];

        let user_prompt = format!(
            "Analyze the sentiment of the following text. Respond with a single JSON object \
            containing exactly these fields:\n\
            {fields}\n\
            \n\
            Text to analyze:\n\
            \"\"\"\n\
            {text}\n\
            \"\"\"\n\
            \n\
            {JSON_ONLY_DIRECTIVE}",
            fields = bullet_lines(&fields),
            text = request.subject_content().trim(),
        );

        RenderedPrompt {
            system_instruction: "You are a sentiment analysis engine that only ever answers with valid JSON."
                .to_string(),
            user_prompt,
            response_contract: ResponseContract::StructuredJson(Schema::Sentiment),
        }
    }

    fn topics(&self, request: &AnalysisRequest) -> RenderedPrompt {
        let (min, max) = TopicList::RELEVANCE_RANGE;
        let [name, relevance, terms] = TopicList::TOPIC_FIELDS;
        let fields = [
            format!("\"{name}\": string, short name of the topic"),
            format!("\"{relevance}\": number between {min} and {max}"),
            format!("\"{terms}\": array of strings, terms related to this topic mentioned in the text"),
        ];

        let user_prompt = format!(
            "Extract the {count} most important topics or themes from the following text. \
            Respond with a single JSON object with one field, \"{envelope}\", holding an array \
            of topic objects ordered from most to least relevant. Each topic object contains \
            exactly these fields:\n\
            {fields}\n\
            \n\
            Text to analyze:\n\
            \"\"\"\n\
            {text}\n\
            \"\"\"\n\
            \n\
            {JSON_ONLY_DIRECTIVE}",
            count = request.parameters().topic_count_or_default(),
            envelope = TopicList::ENVELOPE_FIELD,
            fields = bullet_lines(&fields),
            text = request.subject_content().trim(),
        );

        RenderedPrompt {
            system_instruction: "You are a topic extraction engine that only ever answers with valid JSON."
                .to_string(),
            user_prompt,
            response_contract: ResponseContract::StructuredJson(Schema::Topics),
        }
    }
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bullet_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("- {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::{TaskParameters, Tone};

    fn render(kind: TaskKind, content: &str, parameters: TaskParameters) -> RenderedPrompt {
        PromptBuilder::new().render(&AnalysisRequest::new("input.txt", content, kind, parameters))
    }

    #[test]
    fn test_rendering_is_deterministic() {
        for kind in TaskKind::all() {
            let a = render(kind, "same content", TaskParameters::default());
            let b = render(kind, "same content", TaskParameters::default());
            assert_eq!(a, b, "{kind} rendered differently");
        }
    }

    #[test]
    fn test_contract_matches_task_kind() {
        for kind in TaskKind::all() {
            let prompt = render(kind, "x", TaskParameters::default());
            assert_eq!(prompt.response_contract.is_structured(), kind.is_structured());
        }
    }

    #[test]
    fn test_code_review_covers_every_dimension() {
        let prompt = render(
            TaskKind::CodeReview,
            "def f(): pass",
            TaskParameters::default().with_language("python"),
        );
        for needle in [
            "Code Quality Issues",
            "Best Practices",
            "Performance",
            "Security",
            "Readability",
            "1-10",
            "```python\ndef f(): pass\n```",
            "File: input.txt",
            "headers and bullet points",
        ] {
            assert!(prompt.user_prompt.contains(needle), "missing {needle:?}");
        }
    }

    #[test]
    fn test_sentiment_prompt_names_every_parsed_field() {
        let prompt = render(TaskKind::Sentiment, "I love it", TaskParameters::default());
        assert_eq!(
            prompt.response_contract,
            ResponseContract::StructuredJson(Schema::Sentiment)
        );
        for field in SentimentRecord::FIELDS {
            assert!(prompt.user_prompt.contains(&format!("\"{field}\"")), "missing {field}");
        }
        assert!(prompt.user_prompt.contains("between -1 and 1"));
        assert!(prompt.user_prompt.contains("ONLY the JSON object"));
    }

    #[test]
    fn test_topic_prompt_names_envelope_and_count() {
        let prompt = render(
            TaskKind::TopicExtraction,
            "text",
            TaskParameters::default().with_topic_count(3),
        );
        assert!(prompt.user_prompt.starts_with("Extract the 3 most important topics"));
        assert!(prompt.user_prompt.contains("\"topics\""));
        for field in TopicList::TOPIC_FIELDS {
            assert!(prompt.user_prompt.contains(&format!("\"{field}\"")), "missing {field}");
        }
    }

    #[test]
    fn test_email_draft_embeds_context() {
        let prompt = render(
            TaskKind::EmailDraft,
            "move the sync to Thursday",
            TaskParameters::default()
                .with_email_context("meeting request", "my manager")
                .with_tone(Tone::Friendly),
        );
        assert!(prompt.user_prompt.starts_with("Write a friendly email"));
        assert!(prompt.user_prompt.contains("Purpose: meeting request"));
        assert!(prompt.user_prompt.contains("Recipient: my manager"));
        assert!(prompt.user_prompt.contains("Key points to include: move the sync to Thursday"));
    }
}
