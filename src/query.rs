use crate::catalog::{FilterCatalog, SOURCE_SECTION};
use crate::models::SortOrder;
use crate::pagination::PaginationMode;
use crate::selection::Selection;
use crate::state::QueryState;

/// Canonical parameter set sent to `/api/candidates`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundQuery {
    pub search: Option<String>,
    pub full_text_search: bool,
    pub sort: Option<SortOrder>,
    pub application_type: Vec<String>,
    pub job_id: Vec<String>,
    pub source: Vec<String>,
    pub has_availability: Option<bool>,
    pub has_interviews: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl OutboundQuery {
    /// Query-string pairs; repeatable parameters appear once per value.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
            if self.full_text_search {
                pairs.push(("full_text_search", "true".to_string()));
            }
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        for value in &self.application_type {
            pairs.push(("application_type", value.clone()));
        }
        for value in &self.job_id {
            pairs.push(("job_id", value.clone()));
        }
        for value in &self.source {
            pairs.push(("source", value.clone()));
        }
        if let Some(has_availability) = self.has_availability {
            pairs.push(("has_availability", has_availability.to_string()));
        }
        if self.has_interviews {
            pairs.push(("has_interviews", "true".to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("per_page", per_page.to_string()));
        }

        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    ApplicationType,
    JobId,
    Source,
    Availability(bool),
    Interviews,
}

struct Rule {
    matches: fn(&str, &[&str]) -> bool,
    category: Category,
}

fn is_application_type(key: &str, _: &[&str]) -> bool {
    key == "active" || key == "archived"
}

fn is_job(key: &str, _: &[&str]) -> bool {
    key.starts_with("job-")
}

fn is_source(key: &str, sources: &[&str]) -> bool {
    sources.contains(&key)
}

fn is_has_availability(key: &str, _: &[&str]) -> bool {
    key == "Has Availability"
}

fn is_no_availability(key: &str, _: &[&str]) -> bool {
    key == "No Availability"
}

fn is_has_interviews(key: &str, _: &[&str]) -> bool {
    key == "Has Interviews"
}

// Evaluated top to bottom; the first match classifies the key. Keys matching
// nothing (CRM, Responsibility, Pipeline Tasks, Education) leave the query
// untouched.
static RULES: &[Rule] = &[
    Rule { matches: is_application_type, category: Category::ApplicationType },
    Rule { matches: is_job, category: Category::JobId },
    Rule { matches: is_source, category: Category::Source },
    Rule { matches: is_has_availability, category: Category::Availability(true) },
    Rule { matches: is_no_availability, category: Category::Availability(false) },
    Rule { matches: is_has_interviews, category: Category::Interviews },
];

fn classify(key: &str, sources: &[&str]) -> Option<Category> {
    RULES
        .iter()
        .find(|rule| (rule.matches)(key, sources))
        .map(|rule| rule.category)
}

/// Builds the outbound query for the current screen state.
pub fn synthesize(
    selection: &Selection,
    query: &QueryState,
    catalog: &FilterCatalog,
    mode: PaginationMode,
) -> OutboundQuery {
    let sources = catalog.members_of(SOURCE_SECTION);
    let mut out = OutboundQuery::default();

    for key in selection.iter() {
        match classify(key, &sources) {
            Some(Category::ApplicationType) => out.application_type.push(key.to_string()),
            Some(Category::JobId) => out.job_id.push(key.to_string()),
            Some(Category::Source) => out.source.push(key.to_string()),
            // "Has Availability" beats "No Availability" when both are active.
            Some(Category::Availability(true)) => out.has_availability = Some(true),
            Some(Category::Availability(false)) => {
                out.has_availability.get_or_insert(false);
            }
            Some(Category::Interviews) => out.has_interviews = true,
            None => {}
        }
    }

    if !query.search_text.is_empty() {
        out.search = Some(query.search_text.clone());
        out.full_text_search = query.full_text_search;
    }

    out.sort = Some(query.sort);

    if mode == PaginationMode::Server {
        out.page = Some(query.page);
        out.per_page = Some(query.page_size);
    }

    out
}

/// True when the only difference between two states is the full-text toggle
/// while the search box stays empty. `synthesize` drops the toggle for an
/// empty search, so such a change cannot alter the outbound query.
pub fn is_inert_full_text_toggle(
    prev_search: &str,
    prev_full_text: bool,
    search: &str,
    full_text: bool,
) -> bool {
    prev_full_text != full_text && prev_search == search && search.is_empty()
}
