//! Snapshot tests for pipeline output

#[cfg(test)]
mod snapshot_tests {
    use crate::{PromptBuilder, ReportAggregator};
    use insta::assert_snapshot;
    use scribe_core::{
        AnalysisRequest, AnalysisResult, BatchReport, Confidence, FailureKind, Payload,
        ResponseContract, Sentiment, SentimentRecord, StructuredPayload, TaskKind, TaskParameters,
    };

    #[test]
    fn test_structured_report_snapshot() {
        let mut report = BatchReport::new();
        report.push(
            "review.txt",
            TaskKind::Sentiment,
            AnalysisResult::ok(Payload::Structured(StructuredPayload::Sentiment(SentimentRecord {
                sentiment: Sentiment::Negative,
                score: -0.4,
                primary_emotion: "disappointment".to_string(),
                confidence: Confidence::High,
                key_phrases: vec!["arrived late".to_string()],
            }))),
        );
        report.push(
            "broken.txt",
            TaskKind::Sentiment,
            AnalysisResult::failed(FailureKind::Parse, "bad json"),
        );

        assert_snapshot!(ReportAggregator::new().render(&report), @r##"
        # Sentiment Analysis Report

        Items: 2 | Succeeded: 1 | Failed: 1

        ## review.txt

        ```json
        {
          "sentiment": "negative",
          "sentiment_score": -0.4,
          "primary_emotion": "disappointment",
          "confidence": "high",
          "key_phrases": [
            "arrived late"
          ]
        }
        ```

        ---

        ## broken.txt

        **Failed** (parse stage, parse failure): bad json

        ---
        "##);
    }

    #[test]
    fn test_email_improvement_prompt_snapshot() {
        let request = AnalysisRequest::new(
            "draft",
            "hey, need the numbers asap",
            TaskKind::EmailImprovement,
            TaskParameters::default(),
        );
        let prompt = PromptBuilder::new().render(&request);

        assert_eq!(prompt.response_contract, ResponseContract::FreeText);
        assert_snapshot!(prompt.user_prompt, @r#"
        Improve this email so it is professional, clear and well structured:

        """
        hey, need the numbers asap
        """

        Provide the improved version, followed by a short list of the changes you made.
        Format your response clearly with headers and bullet points.
        "#);
    }
}
