use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateId::Number(n) => write!(f, "{}", n),
            CandidateId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Interview {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub action_link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub application_type: Option<String>, // "active", "archived"
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_availability: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_interviews: bool,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub interviews: Vec<Interview>,
    #[serde(default)]
    pub last_activity: Option<String>,
}

impl Candidate {
    /// "Position at Company", unless the position already names its employer.
    pub fn headline(&self) -> Option<String> {
        let position = self.position.as_deref().filter(|p| !p.is_empty());
        let company = self.company.as_deref().filter(|c| !c.is_empty());
        match (position, company) {
            (Some(p), Some(_)) if p.to_lowercase().contains("at ") => Some(p.to_string()),
            (Some(p), Some(c)) => Some(format!("{} at {}", p, c)),
            (None, Some(c)) => Some(c.to_string()),
            (Some(p), None) => Some(p.to_string()),
            (None, None) => None,
        }
    }
}

/// One response from the candidate search endpoint.
#[derive(Debug, Clone, Default)]
pub struct CandidatePage {
    pub candidates: Vec<Candidate>,
    pub total: usize,
}

// Missing or null fields fall back to an empty list / zero count.
#[derive(Debug, Deserialize)]
struct CandidatePagePayload {
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    total: Option<usize>,
}

impl CandidatePage {
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let payload: CandidatePagePayload = serde_json::from_str(body)?;
        Ok(Self {
            candidates: payload.candidates.unwrap_or_default(),
            total: payload.total.unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
    #[default]
    #[value(name = "activity_desc")]
    ActivityDesc,
    #[value(name = "activity_asc")]
    ActivityAsc,
    #[value(name = "name_asc")]
    NameAsc,
    #[value(name = "name_desc")]
    NameDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::ActivityDesc,
        SortOrder::ActivityAsc,
        SortOrder::NameAsc,
        SortOrder::NameDesc,
    ];

    /// Wire value for the `sort` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::ActivityDesc => "activity_desc",
            SortOrder::ActivityAsc => "activity_asc",
            SortOrder::NameAsc => "name_asc",
            SortOrder::NameDesc => "name_desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::ActivityDesc => "Last Activity (new to old)",
            SortOrder::ActivityAsc => "Last Activity (old to new)",
            SortOrder::NameAsc => "Name (A to Z)",
            SortOrder::NameDesc => "Name (Z to A)",
        }
    }

    pub fn next(&self) -> SortOrder {
        let idx = Self::ALL.iter().position(|s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(position: Option<&str>, company: Option<&str>) -> Candidate {
        Candidate {
            id: CandidateId::Number(1),
            name: "Ada".to_string(),
            position: position.map(String::from),
            company: company.map(String::from),
            status: None,
            job_title: None,
            action_link: None,
            source: None,
            application_type: None,
            job_id: None,
            has_availability: false,
            has_interviews: false,
            availability_status: None,
            interviews: Vec::new(),
            last_activity: None,
        }
    }

    #[test]
    fn test_headline_combines_position_and_company() {
        let c = candidate(Some("Engineer"), Some("Acme"));
        assert_eq!(c.headline(), Some("Engineer at Acme".to_string()));
    }

    #[test]
    fn test_headline_keeps_position_that_names_employer() {
        let c = candidate(Some("Engineer at Globex"), Some("Acme"));
        assert_eq!(c.headline(), Some("Engineer at Globex".to_string()));
    }

    #[test]
    fn test_headline_fallbacks() {
        assert_eq!(candidate(None, Some("Acme")).headline(), Some("Acme".to_string()));
        assert_eq!(candidate(Some("Engineer"), None).headline(), Some("Engineer".to_string()));
        assert_eq!(candidate(Some(""), None).headline(), None);
    }

    #[test]
    fn test_page_from_json_defaults_missing_fields() {
        let page = CandidatePage::from_json("{}").unwrap();
        assert!(page.candidates.is_empty());
        assert_eq!(page.total, 0);

        let page = CandidatePage::from_json(r#"{"candidates": null, "total": null}"#).unwrap();
        assert!(page.candidates.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_page_from_json_reads_candidates() {
        let body = r#"{
            "candidates": [
                {"id": 7, "name": "Ada", "interviews": [{"name": "Onsite"}]},
                {"id": "c-8", "name": "Grace", "has_availability": true}
            ],
            "total": 42
        }"#;
        let page = CandidatePage::from_json(body).unwrap();
        assert_eq!(page.total, 42);
        assert_eq!(page.candidates.len(), 2);
        assert_eq!(page.candidates[0].id, CandidateId::Number(7));
        assert_eq!(page.candidates[0].interviews[0].name, "Onsite");
        assert_eq!(page.candidates[1].id.to_string(), "c-8");
        assert!(page.candidates[1].has_availability);
    }

    #[test]
    fn test_page_from_json_tolerates_null_fields() {
        let body = r#"{
            "candidates": [
                {"id": 1, "name": "Ada", "interviews": null},
                {"id": 2, "name": null, "has_availability": null, "has_interviews": null},
                {"id": 3, "name": "Grace", "interviews": [{"name": null}]}
            ],
            "total": 3
        }"#;
        let page = CandidatePage::from_json(body).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.candidates.len(), 3);
        assert!(page.candidates[0].interviews.is_empty());
        assert_eq!(page.candidates[1].name, "");
        assert!(!page.candidates[1].has_availability);
        assert!(!page.candidates[1].has_interviews);
        assert_eq!(page.candidates[2].interviews[0].name, "");
    }

    #[test]
    fn test_page_from_json_rejects_non_json() {
        assert!(CandidatePage::from_json("<html>").is_err());
    }

    #[test]
    fn test_sort_order_cycles() {
        assert_eq!(SortOrder::default(), SortOrder::ActivityDesc);
        assert_eq!(SortOrder::ActivityDesc.next(), SortOrder::ActivityAsc);
        assert_eq!(SortOrder::NameDesc.next(), SortOrder::ActivityDesc);
        assert_eq!(SortOrder::NameAsc.as_str(), "name_asc");
    }
}
