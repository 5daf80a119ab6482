use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_sessions: u64,
    pub conversion_rate: f64,
    pub avg_session_duration_sec: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub path: String,
    pub views: u64,
    pub bounce_rate: f64,
}

/// Read-only analytics table the copilot answers from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleData {
    pub period: String,
    pub metrics: Metrics,
    pub pages: Vec<Page>,
    pub notes: Vec<String>,
}

impl SampleData {
    /// The built-in two-week product analytics fixture.
    pub fn fixture() -> Self {
        let page = |path: &str, views: u64, bounce_rate: f64| Page {
            path: path.to_owned(),
            views,
            bounce_rate,
        };

        Self {
            period: "last_14_days".to_owned(),
            metrics: Metrics {
                total_sessions: 120_340,
                conversion_rate: 0.034,
                avg_session_duration_sec: 142,
            },
            pages: vec![
                page("/", 32_000, 0.52),
                page("/pricing", 18_000, 0.41),
                page("/signup", 9_000, 0.28),
                page("/docs", 14_000, 0.62),
                page("/blog", 21_000, 0.70),
            ],
            notes: vec![
                "Pricing page traffic increased after campaign A.".to_owned(),
                "Docs bounce rate is high; likely mismatch between intent and landing content."
                    .to_owned(),
                "Signup conversion improved after reducing form fields.".to_owned(),
            ],
        }
    }

    /// Page with the highest bounce rate; the first one wins on ties.
    pub fn highest_bounce_page(&self) -> Option<&Page> {
        self.pages.iter().fold(None, |best, page| match best {
            Some(b) if page.bounce_rate > b.bounce_rate => Some(page),
            Some(b) => Some(b),
            None => Some(page),
        })
    }
}
