use copilot_common::error::{CopilotError, CopilotResult};
use validator::Validate;

use crate::dataset::SampleData;
use crate::schema::{AskResponse, Confidence, Evidence, Source};

const PAGES_PATH: &str = "SAMPLE_DATA.pages";
const BOUNCE_RATE_PATH: &str = "SAMPLE_DATA.pages[].bounceRate";
const DATASET_PATH: &str = "SAMPLE_DATA";

/// Offline answer computed directly from the dataset; never contacts a provider.
///
/// Demo answers are always rated `low` confidence. An `Err` here means the
/// answer itself broke the response schema, which is a bug.
pub fn demo_answer(dataset: &SampleData, question: &str) -> CopilotResult<AskResponse> {
    let Some(page) = dataset.highest_bounce_page() else {
        return checked(demo_response(
            "Demo mode: dataset has no pages, so I can't compute an answer.".to_owned(),
            true,
            vec![PAGES_PATH.to_owned()],
            vec![],
        ));
    };

    let q = question.to_lowercase();
    if q.contains("highest") && q.contains("bounce") {
        return checked(demo_response(
            format!(
                "Demo mode: \"{}\" has the highest bounce rate ({}%).",
                page.path,
                one_decimal(page.bounce_rate * 100.0)
            ),
            false,
            vec![BOUNCE_RATE_PATH.to_owned()],
            vec![Evidence::at(BOUNCE_RATE_PATH)],
        ));
    }

    checked(demo_response(
        format!(
            "Demo mode: I can answer questions about pages (views, bounce rate) for {}. \
             Try: \"Which page has the highest bounce rate?\"",
            dataset.period
        ),
        false,
        vec![DATASET_PATH.to_owned()],
        vec![],
    ))
}

fn demo_response(
    answer: String,
    insufficient_data: bool,
    citations: Vec<String>,
    evidence: Vec<Evidence>,
) -> AskResponse {
    AskResponse {
        answer,
        insufficient_data,
        confidence: Confidence::Low,
        citations,
        evidence,
        demo: true,
        source: Source::Demo,
        error_code: None,
    }
}

/// One fractional digit, with exact ties rounded away from zero.
///
/// `{:.1}` rounds ties to even. A binary float sits exactly halfway between
/// two tenths only when its fraction is .25 or .75, and scaling by 4 and 10
/// is exact for those values.
fn one_decimal(value: f64) -> String {
    let is_tie = (value * 4.0).fract() == 0.0 && (value * 2.0).fract() != 0.0;
    if is_tie {
        let tenths = (value * 10.0).abs().ceil().copysign(value);
        return format!("{:.1}", tenths / 10.0);
    }
    format!("{value:.1}")
}

fn checked(response: AskResponse) -> CopilotResult<AskResponse> {
    response
        .validate()
        .map_err(|e| CopilotError::Internal(format!("demo answer failed validation: {e}")))?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_bounce_question_names_blog() {
        let response =
            demo_answer(&SampleData::fixture(), "Which page has the highest bounce rate?").unwrap();

        assert!(response.answer.contains("\"/blog\""), "got: {}", response.answer);
        assert!(response.answer.contains("70.0%"), "got: {}", response.answer);
        assert!(!response.insufficient_data);
        assert_eq!(response.confidence, Confidence::Low);
        assert!(response.demo);
        assert_eq!(response.source, Source::Demo);
        assert_eq!(response.citations, vec![BOUNCE_RATE_PATH]);
        assert_eq!(response.evidence, vec![Evidence::at(BOUNCE_RATE_PATH)]);
        assert!(response.error_code.is_none());
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let response = demo_answer(&SampleData::fixture(), "HIGHEST BOUNCE?").unwrap();
        assert!(response.answer.contains("/blog"));
    }

    #[test]
    fn both_keywords_are_required() {
        let response = demo_answer(&SampleData::fixture(), "Which page has the highest views?").unwrap();
        assert!(response.answer.contains("last_14_days"));
        assert_eq!(response.citations, vec![DATASET_PATH]);
        assert!(response.evidence.is_empty());
        assert!(!response.insufficient_data);
    }

    #[test]
    fn short_question_still_answers() {
        let response = demo_answer(&SampleData::fixture(), "").unwrap();
        assert!(response.demo);
        assert!(!response.answer.is_empty());
    }

    #[test]
    fn tie_reports_first_page() {
        let mut data = SampleData::fixture();
        data.pages[0].bounce_rate = 0.70;
        let response = demo_answer(&data, "highest bounce").unwrap();
        assert!(response.answer.contains("\"/\""), "got: {}", response.answer);
    }

    #[test]
    fn half_tenth_bounce_rate_rounds_up() {
        let mut data = SampleData::fixture();
        data.pages[4].bounce_rate = 0.0625;
        data.pages[3].bounce_rate = 0.0625 - 0.01;
        for page in &mut data.pages[..3] {
            page.bounce_rate = 0.01;
        }

        let response = demo_answer(&data, "highest bounce").unwrap();
        assert!(response.answer.contains("(6.3%)"), "got: {}", response.answer);
    }

    #[test]
    fn one_decimal_rounds_exact_ties_away_from_zero() {
        assert_eq!(one_decimal(6.25), "6.3");
        assert_eq!(one_decimal(6.75), "6.8");
        assert_eq!(one_decimal(0.25), "0.3");
        assert_eq!(one_decimal(-6.25), "-6.3");
    }

    #[test]
    fn one_decimal_leaves_non_ties_alone() {
        assert_eq!(one_decimal(70.0), "70.0");
        assert_eq!(one_decimal(12.5), "12.5");
        assert_eq!(one_decimal(41.0), "41.0");
        // 0.15 is stored just below the midpoint
        assert_eq!(one_decimal(0.15), "0.1");
        assert_eq!(one_decimal(27.999), "28.0");
    }

    #[test]
    fn empty_dataset_reports_insufficient_data() {
        let mut data = SampleData::fixture();
        data.pages.clear();

        let response = demo_answer(&data, "Which page has the highest bounce rate?").unwrap();
        assert!(response.insufficient_data);
        assert_eq!(response.confidence, Confidence::Low);
        assert_eq!(response.citations, vec![PAGES_PATH]);
        assert!(response.evidence.is_empty());
        assert!(response.demo);
        assert_eq!(response.source, Source::Demo);
    }
}
