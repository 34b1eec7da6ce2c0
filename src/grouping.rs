//! Groups fetched contacts by membership label.

use std::collections::HashMap;

use crate::config::FieldSet;
use crate::types::Person;

pub const NO_LABEL: &str = "no_label";
pub const NO_NAME: &str = "No Name";
pub const NO_NOTES: &str = "No Notes";

/// One flattened contact row as it will appear in a CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedRow {
    pub name: String,
    pub emails: String,
    pub phones: Option<String>,
    pub notes: Option<String>,
}

impl ExportedRow {
    /// Column values in header order for the given field set.
    pub fn record(&self, field_set: FieldSet) -> Vec<&str> {
        match field_set {
            FieldSet::Basic => vec![self.name.as_str(), self.emails.as_str()],
            FieldSet::Extended => vec![
                self.name.as_str(),
                self.emails.as_str(),
                self.phones.as_deref().unwrap_or(""),
                self.notes.as_deref().unwrap_or(""),
            ],
        }
    }
}

/// Label -> rows, in first-seen label order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelGroups {
    field_set: FieldSet,
    entries: Vec<(String, Vec<ExportedRow>)>,
    index: HashMap<String, usize>,
}

impl LabelGroups {
    pub fn new(field_set: FieldSet) -> Self {
        Self {
            field_set,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn field_set(&self) -> FieldSet {
        self.field_set
    }

    /// Returns the rows for `label`, inserting an empty group on first use.
    pub fn get_or_create(&mut self, label: &str) -> &mut Vec<ExportedRow> {
        let position = match self.index.get(label) {
            Some(&position) => position,
            None => {
                self.entries.push((label.to_string(), Vec::new()));
                let position = self.entries.len() - 1;
                self.index.insert(label.to_string(), position);
                position
            }
        };
        &mut self.entries[position].1
    }

    pub fn get(&self, label: &str) -> Option<&[ExportedRow]> {
        self.index
            .get(label)
            .map(|&position| self.entries[position].1.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ExportedRow])> {
        self.entries
            .iter()
            .map(|(label, rows)| (label.as_str(), rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.entries.iter().map(|(_, rows)| rows.len()).sum()
    }
}

fn join_values<'a>(values: impl Iterator<Item = Option<&'a str>>) -> String {
    values.flatten().collect::<Vec<_>>().join(", ")
}

fn build_row(person: &Person, field_set: FieldSet) -> ExportedRow {
    let name = person
        .names
        .as_ref()
        .and_then(|names| names.first())
        .and_then(|n| n.display_name.clone())
        .unwrap_or_else(|| NO_NAME.to_string());

    let emails = join_values(
        person
            .email_addresses
            .iter()
            .flatten()
            .map(|e| e.value.as_deref()),
    );

    let (phones, notes) = match field_set {
        FieldSet::Basic => (None, None),
        FieldSet::Extended => {
            let phones = join_values(
                person
                    .phone_numbers
                    .iter()
                    .flatten()
                    .map(|p| p.value.as_deref()),
            );
            let notes = person
                .biographies
                .as_ref()
                .and_then(|bios| bios.first())
                .and_then(|b| b.value.clone())
                .unwrap_or_else(|| NO_NOTES.to_string());
            (Some(phones), Some(notes))
        }
    };

    ExportedRow {
        name,
        emails,
        phones,
        notes,
    }
}

/// Builds one row per (contact, membership) pair, keyed by the membership's
/// source id. Contacts without memberships are dropped.
pub fn group_by_label(people: &[Person], field_set: FieldSet) -> LabelGroups {
    let mut groups = LabelGroups::new(field_set);

    for person in people {
        let Some(memberships) = person.memberships.as_ref() else {
            continue;
        };

        for membership in memberships {
            let label = membership.source_id().unwrap_or(NO_LABEL);
            let row = build_row(person, field_set);
            groups.get_or_create(label).push(row);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Biography, EmailAddress, FieldMetadata, Membership, Name, PhoneNumber, Source};

    fn membership(id: Option<&str>) -> Membership {
        Membership {
            metadata: Some(FieldMetadata {
                source: Some(Source {
                    source_type: Some("CONTACT".to_string()),
                    id: id.map(str::to_string),
                }),
            }),
        }
    }

    fn person(name: &str, emails: &[&str], labels: &[&str]) -> Person {
        Person {
            resource_name: Some(format!("people/{}", name)),
            names: Some(vec![Name {
                display_name: Some(name.to_string()),
            }]),
            email_addresses: Some(
                emails
                    .iter()
                    .map(|e| EmailAddress {
                        value: Some(e.to_string()),
                    })
                    .collect(),
            ),
            phone_numbers: None,
            biographies: None,
            memberships: Some(labels.iter().map(|l| membership(Some(*l))).collect()),
        }
    }

    #[test]
    fn test_single_contact_single_label() {
        let people = vec![person("Alice", &["a@x.com"], &["friends"])];
        let groups = group_by_label(&people, FieldSet::Basic);

        assert_eq!(groups.len(), 1);
        assert_eq!(
            groups.get("friends").unwrap(),
            &[ExportedRow {
                name: "Alice".to_string(),
                emails: "a@x.com".to_string(),
                phones: None,
                notes: None,
            }]
        );
    }

    #[test]
    fn test_one_row_per_membership() {
        let people = vec![person("Bob", &["b@x.com"], &["friends", "work"])];
        let groups = group_by_label(&people, FieldSet::Basic);

        assert_eq!(groups.row_count(), 2);
        assert_eq!(groups.get("friends"), groups.get("work"));
        assert_eq!(groups.get("friends").unwrap().len(), 1);
    }

    #[test]
    fn test_contact_without_memberships_is_skipped() {
        let mut lonely = person("Carol", &["c@x.com"], &[]);
        lonely.memberships = None;
        let empty = person("Dan", &["d@x.com"], &[]);

        let groups = group_by_label(&[lonely, empty], FieldSet::Basic);
        assert!(groups.is_empty());
        assert_eq!(groups.row_count(), 0);
    }

    #[test]
    fn test_missing_or_empty_source_id_uses_no_label() {
        let mut p = person("Eve", &[], &[]);
        p.memberships = Some(vec![
            membership(None),
            membership(Some("")),
            Membership::default(),
        ]);

        let groups = group_by_label(&[p], FieldSet::Basic);
        assert_eq!(groups.labels().collect::<Vec<_>>(), vec![NO_LABEL]);
        assert_eq!(groups.get(NO_LABEL).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_email_list_joins_to_empty_string() {
        let people = vec![person("Frank", &[], &["friends"])];
        let groups = group_by_label(&people, FieldSet::Basic);
        assert_eq!(groups.get("friends").unwrap()[0].emails, "");
    }

    #[test]
    fn test_multiple_emails_joined_with_comma_space() {
        let people = vec![person("Gina", &["g@x.com", "gina@y.org"], &["work"])];
        let groups = group_by_label(&people, FieldSet::Basic);
        assert_eq!(groups.get("work").unwrap()[0].emails, "g@x.com, gina@y.org");
    }

    #[test]
    fn test_missing_name_defaults() {
        let mut no_names = person("x", &[], &["friends"]);
        no_names.names = None;
        let mut empty_names = person("y", &[], &["friends"]);
        empty_names.names = Some(vec![]);
        let mut no_display = person("z", &[], &["friends"]);
        no_display.names = Some(vec![Name { display_name: None }]);

        let groups = group_by_label(&[no_names, empty_names, no_display], FieldSet::Basic);
        let rows = groups.get("friends").unwrap();
        assert!(rows.iter().all(|r| r.name == NO_NAME));
    }

    #[test]
    fn test_extended_field_set_includes_phones_and_notes() {
        let mut p = person("Hank", &["h@x.com"], &["family"]);
        p.phone_numbers = Some(vec![
            PhoneNumber {
                value: Some("+1 555 0100".to_string()),
            },
            PhoneNumber {
                value: Some("+1 555 0101".to_string()),
            },
        ]);
        p.biographies = Some(vec![Biography {
            value: Some("Met at conference".to_string()),
        }]);
        let plain = person("Ivy", &[], &["family"]);

        let groups = group_by_label(&[p, plain], FieldSet::Extended);
        let rows = groups.get("family").unwrap();
        assert_eq!(rows[0].phones.as_deref(), Some("+1 555 0100, +1 555 0101"));
        assert_eq!(rows[0].notes.as_deref(), Some("Met at conference"));
        assert_eq!(rows[1].phones.as_deref(), Some(""));
        assert_eq!(rows[1].notes.as_deref(), Some(NO_NOTES));
        assert_eq!(
            rows[0].record(FieldSet::Extended),
            vec!["Hank", "h@x.com", "+1 555 0100, +1 555 0101", "Met at conference"]
        );
    }

    #[test]
    fn test_label_and_row_order_follow_input() {
        let people = vec![
            person("A", &[], &["work"]),
            person("B", &[], &["friends", "work"]),
            person("C", &[], &["family"]),
        ];
        let groups = group_by_label(&people, FieldSet::Basic);

        assert_eq!(
            groups.labels().collect::<Vec<_>>(),
            vec!["work", "friends", "family"]
        );
        let work: Vec<_> = groups
            .get("work")
            .unwrap()
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(work, vec!["A", "B"]);
    }

    #[test]
    fn test_grouping_is_repeatable() {
        let people = vec![
            person("A", &["a@x.com"], &["work", "friends"]),
            person("B", &[], &["friends"]),
        ];
        assert_eq!(
            group_by_label(&people, FieldSet::Basic),
            group_by_label(&people, FieldSet::Basic)
        );
    }

    #[test]
    fn test_get_or_create_returns_existing_group() {
        let mut groups = LabelGroups::new(FieldSet::Basic);
        assert!(groups.get_or_create("friends").is_empty());
        groups.get_or_create("friends").push(ExportedRow {
            name: "A".to_string(),
            emails: String::new(),
            phones: None,
            notes: None,
        });
        assert_eq!(groups.get_or_create("friends").len(), 1);
        assert_eq!(groups.len(), 1);
    }
}
