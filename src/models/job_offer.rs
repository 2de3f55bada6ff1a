use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::company::Company;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SoftwareDevelopment,
    DigitalMarketing,
    GraphicDesign,
    ContentWriting,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SoftwareDevelopment,
        Category::DigitalMarketing,
        Category::GraphicDesign,
        Category::ContentWriting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "software_development",
            Category::DigitalMarketing => "digital_marketing",
            Category::GraphicDesign => "graphic_design",
            Category::ContentWriting => "content_writing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftwareDevelopment => "Software development",
            Category::DigitalMarketing => "Digital marketing",
            Category::GraphicDesign => "Graphic design",
            Category::ContentWriting => "Content writing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub company_id: Uuid,
    /// Joined from the owning company on read.
    pub company_name: String,
    pub location: String,
    pub salary: Option<Decimal>,
    pub requirements: String,
    pub publication_date: DateTime<Utc>,
    pub deadline: NaiveDate,
    pub is_active: bool,
}

impl JobOffer {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.deadline < today
    }

    /// The one definition of "open": listings, eligibility and dashboards all go through here.
    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.is_active && !self.is_expired(today)
    }

    pub fn is_owned_by(&self, company: &Company) -> bool {
        self.company_id == company.id
    }

    pub(crate) fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.title, &self.description, &self.company_name]
            .iter()
            .any(|haystack| haystack.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn offer(deadline: NaiveDate, is_active: bool) -> JobOffer {
        JobOffer {
            id: Uuid::new_v4(),
            title: "Backend engineer".into(),
            description: "Build the billing pipeline".into(),
            category: Category::SoftwareDevelopment,
            company_id: Uuid::new_v4(),
            company_name: "Acme Corp".into(),
            location: "Remote".into(),
            salary: None,
            requirements: "Rust".into(),
            publication_date: Utc::now(),
            deadline,
            is_active,
        }
    }

    #[test]
    fn offer_expires_the_day_after_its_deadline() {
        let deadline = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let offer = offer(deadline, true);

        assert!(!offer.is_expired(deadline - Duration::days(1)));
        assert!(!offer.is_expired(deadline));
        assert!(offer.is_expired(deadline + Duration::days(1)));
    }

    #[test]
    fn inactive_offer_is_never_open() {
        let deadline = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(offer(deadline, true).is_open(deadline));
        assert!(!offer(deadline, false).is_open(deadline));
        assert!(!offer(deadline, true).is_open(deadline + Duration::days(1)));
    }

    #[test]
    fn search_covers_title_description_and_company() {
        let offer = offer(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(), true);
        assert!(offer.matches_search("BACKEND"));
        assert!(offer.matches_search("billing"));
        assert!(offer.matches_search("acme"));
        assert!(!offer.matches_search("designer"));
    }

    #[test]
    fn category_round_trips_through_its_key() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
        assert!("marketing".parse::<Category>().is_err());
    }
}
