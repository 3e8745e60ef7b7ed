/// A selectable filter. The identity key is the machine value when present,
/// else the display label.
#[derive(Debug, Clone, Copy)]
pub struct FilterOption {
    pub label: &'static str,
    pub value: Option<&'static str>,
}

impl FilterOption {
    const fn labeled(label: &'static str) -> Self {
        Self { label, value: None }
    }

    const fn valued(label: &'static str, value: &'static str) -> Self {
        Self {
            label,
            value: Some(value),
        }
    }

    pub fn key(&self) -> &'static str {
        self.value.unwrap_or(self.label)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FilterSection {
    pub title: &'static str,
    pub options: &'static [FilterOption],
    pub default_open: bool,
}

pub const SOURCE_SECTION: &str = "Source";

static SECTIONS: &[FilterSection] = &[
    FilterSection {
        title: "Application Type",
        options: &[
            FilterOption::valued("Active", "active"),
            FilterOption::valued("Archived", "archived"),
        ],
        default_open: true,
    },
    FilterSection {
        title: "Jobs",
        options: &[
            FilterOption::valued("Digital Marketing Specialist (O26)", "job-123"),
            FilterOption::valued("Senior Product Designer", "job-456"),
            FilterOption::valued("Frontend Engineer (React)", "job-789"),
            FilterOption::valued("Senior Data Scientist", "job-234"),
            FilterOption::valued("UX Researcher", "job-567"),
            FilterOption::valued("Senior Backend Engineer", "job-890"),
            FilterOption::valued("Director of Marketing", "job-345"),
            FilterOption::valued("Senior DevOps Engineer", "job-678"),
        ],
        default_open: false,
    },
    FilterSection {
        title: "CRM",
        options: &[
            FilterOption::labeled("All Contacts"),
            FilterOption::labeled("My Contacts"),
            FilterOption::labeled("Unassigned"),
        ],
        default_open: false,
    },
    FilterSection {
        title: "Profile Details",
        options: &[
            FilterOption::labeled("Has Availability"),
            FilterOption::labeled("Has Interviews"),
            FilterOption::labeled("No Availability"),
        ],
        default_open: false,
    },
    FilterSection {
        title: SOURCE_SECTION,
        options: &[
            FilterOption::valued("LinkedIn", "LinkedIn"),
            FilterOption::valued("Referral", "Referral"),
            FilterOption::valued("Career Page", "Career Page"),
            FilterOption::valued("Indeed", "Indeed"),
            FilterOption::valued("Dribbble", "Dribbble"),
            FilterOption::valued("GitHub", "GitHub"),
            FilterOption::valued("Kaggle", "Kaggle"),
            FilterOption::valued("Stack Overflow", "Stack Overflow"),
            FilterOption::valued("Medium", "Medium"),
            FilterOption::valued("ArXiv", "ArXiv"),
            FilterOption::valued("Apple Developer", "Apple Developer"),
            FilterOption::valued("HackerOne", "HackerOne"),
        ],
        default_open: false,
    },
    FilterSection {
        title: "Responsibility",
        options: &[
            FilterOption::labeled("Assigned to Me"),
            FilterOption::labeled("Unassigned"),
        ],
        default_open: false,
    },
    FilterSection {
        title: "Pipeline Tasks",
        options: &[
            FilterOption::labeled("Pending Tasks"),
            FilterOption::labeled("Completed Tasks"),
            FilterOption::labeled("Overdue Tasks"),
        ],
        default_open: false,
    },
    FilterSection {
        title: "Education",
        options: &[
            FilterOption::labeled("Bachelor's Degree"),
            FilterOption::labeled("Master's Degree"),
            FilterOption::labeled("PhD"),
        ],
        default_open: false,
    },
];

/// Read-only registry of filter sections shown in the sidebar.
#[derive(Debug, Clone, Copy)]
pub struct FilterCatalog {
    sections: &'static [FilterSection],
}

impl Default for FilterCatalog {
    fn default() -> Self {
        Self { sections: SECTIONS }
    }
}

impl FilterCatalog {
    #[cfg(test)]
    pub fn with_sections(sections: &'static [FilterSection]) -> Self {
        Self { sections }
    }

    pub fn sections(&self) -> &'static [FilterSection] {
        self.sections
    }

    /// Display label for a key; unknown keys come back unchanged.
    pub fn label_for<'a>(&self, key: &'a str) -> &'a str {
        self.sections
            .iter()
            .flat_map(|section| section.options.iter())
            .find(|option| option.key() == key)
            .map(|option| option.label)
            .unwrap_or(key)
    }

    /// Identity keys of a section's options; empty when the section is absent.
    pub fn members_of(&self, title: &str) -> Vec<&'static str> {
        self.sections
            .iter()
            .find(|section| section.title == title)
            .map(|section| section.options.iter().map(FilterOption::key).collect())
            .unwrap_or_default()
    }
}
