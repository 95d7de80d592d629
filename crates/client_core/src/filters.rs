//! Search boxes over lists that have already been fetched. Matching is a
//! case-insensitive substring test against a fixed set of fields per record.

use std::borrow::Cow;

use shared::domain::{
    AnnouncementData, DocumentData, Holiday, PostedReviewData, RequestData, Review, TeamMember,
    WorkReportData,
};

pub trait Searchable {
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    fn matches(&self, query: &str) -> bool {
        if query.trim().is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Items matching `query`, in their original order. A blank query keeps
/// everything.
pub fn filter_items<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query)).collect()
}

fn text(value: &str) -> Cow<'_, str> {
    Cow::Borrowed(value)
}

fn number(value: impl ToString) -> Cow<'static, str> {
    Cow::Owned(value.to_string())
}

impl Searchable for AnnouncementData {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.a_title),
            text(&self.a_desc),
            text(&self.a_date),
            text(&self.created_at),
        ]
    }
}

impl Searchable for Holiday {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.h_name),
            text(&self.h_date),
            text(&self.h_type),
            text(&self.h_desc),
        ]
    }
}

impl Searchable for TeamMember {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.u_name),
            text(&self.u_email),
            text(&self.u_designation),
            text(&self.u_mobile),
            text(&self.u_role),
            text(&self.u_work_station),
            text(&self.u_pincode),
        ]
    }
}

impl Searchable for RequestData {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.r_title),
            text(&self.r_desc),
            text(&self.r_action),
            text(&self.r_date),
            text(&self.r_type),
            number(self.status),
        ]
    }
}

impl Searchable for Review {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.posted_by),
            number(self.rating),
            text(&self.created_at),
            text(&self.review),
            number(self.u_id),
            number(self.c_id),
            number(self.added_by),
            number(self.id),
            number(self.status),
        ]
    }
}

impl Searchable for PostedReviewData {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.u_name),
            number(self.rating),
            text(&self.created_at),
            text(&self.review),
            number(self.u_id),
            number(self.c_id),
            number(self.added_by),
            number(self.id),
        ]
    }
}

impl Searchable for DocumentData {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            text(&self.doc_type),
            text(&self.doc_number),
            text(&self.created_at),
        ]
    }
}

impl Searchable for WorkReportData {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![text(&self.w_desc), text(&self.w_date)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{CompanyId, UserId};

    fn holiday(name: &str, date: &str, kind: &str) -> Holiday {
        Holiday {
            h_name: name.into(),
            h_date: date.into(),
            h_type: kind.into(),
            ..Holiday::default()
        }
    }

    #[test]
    fn blank_query_keeps_everything_in_order() {
        let holidays = vec![
            holiday("Diwali", "2024-11-01", "Festival"),
            holiday("New Year", "2024-01-01", "National"),
        ];
        let hits = filter_items(&holidays, "   ");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].h_name, "Diwali");
    }

    #[test]
    fn matching_ignores_case_and_checks_every_listed_field() {
        let holidays = vec![
            holiday("Diwali", "2024-11-01", "Festival"),
            holiday("New Year", "2024-01-01", "National"),
        ];
        assert_eq!(filter_items(&holidays, "DIWA").len(), 1);
        assert_eq!(filter_items(&holidays, "national")[0].h_name, "New Year");
        assert_eq!(filter_items(&holidays, "2024-").len(), 2);
        assert!(filter_items(&holidays, "christmas").is_empty());
    }

    #[test]
    fn query_is_matched_as_typed() {
        let holidays = vec![holiday("New Year", "2024-01-01", "National")];
        assert!(filter_items(&holidays, "Year ").is_empty());
        assert_eq!(filter_items(&holidays, "new y").len(), 1);
    }

    #[test]
    fn numeric_columns_are_searchable_as_text() {
        let reviews = vec![
            Review {
                id: 31,
                rating: 4,
                posted_by: "Meera".into(),
                c_id: CompanyId(2),
                u_id: UserId(9),
                ..Review::default()
            },
            Review {
                id: 32,
                rating: 2,
                posted_by: "Karan".into(),
                ..Review::default()
            },
        ];
        let hits = filter_items(&reviews, "4");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].posted_by, "Meera");
        assert_eq!(filter_items(&reviews, "karan")[0].id, 32);
    }

    #[test]
    fn team_search_covers_contact_details_but_not_salary() {
        let members = vec![TeamMember {
            u_name: "Asha".into(),
            u_pincode: "411001".into(),
            u_salary: 55000,
            ..TeamMember::default()
        }];
        assert_eq!(filter_items(&members, "4110").len(), 1);
        assert!(filter_items(&members, "55000").is_empty());
    }

    #[test]
    fn filtering_does_not_mutate_the_source() {
        let requests = vec![RequestData {
            r_title: "Leave".into(),
            status: 1,
            ..RequestData::default()
        }];
        let _ = filter_items(&requests, "nothing");
        assert_eq!(requests.len(), 1);
    }
}
