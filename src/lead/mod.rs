use std::{cmp::Ordering, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{Searchable, Sortable};
use crate::store::{touched, Record, RecordId};
use crate::validation::{
    self, FieldRules, FormData, Mode, Rule, ValidationErrors, MAX_NAME_LENGTH, MIN_NAME_LENGTH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    New,
    InProgress,
    FollowUp,
    NotInterested,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 4] = [
        LeadStatus::New,
        LeadStatus::InProgress,
        LeadStatus::FollowUp,
        LeadStatus::NotInterested,
    ];

    const WIRE_VALUES: &'static [&'static str] = &["NEW", "IN_PROGRESS", "FOLLOW_UP", "NOT_INTERESTED"];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::InProgress => "IN_PROGRESS",
            LeadStatus::FollowUp => "FOLLOW_UP",
            LeadStatus::NotInterested => "NOT_INTERESTED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::InProgress => "In progress",
            LeadStatus::FollowUp => "Follow up",
            LeadStatus::NotInterested => "Not interested",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LeadStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(())
    }
}

/// Source channels the console knows a label for.
pub const KNOWN_SOURCES: &[(&str, &str)] = &[
    ("Website", "Website"),
    ("Referral", "Referral"),
    ("Email", "Email"),
    ("WhatsApp", "WhatsApp"),
    ("Facebook", "Facebook"),
    ("Instagram", "Instagram"),
    ("LinkedIn", "LinkedIn"),
    ("Google Ads", "Google Ads"),
    ("X-place", "X-place"),
    ("outbound", "Outbound lead"),
    ("other", "Other"),
];

/// Label for a source channel; unknown channels are shown as entered.
pub fn source_label(source: &str) -> &str {
    KNOWN_SOURCES
        .iter()
        .find(|(value, _)| *value == source)
        .map(|(_, label)| *label)
        .unwrap_or(source)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Lead {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub notes: String,
    pub status: LeadStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeadDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: String,
    pub notes: String,
    pub status: LeadStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: Option<LeadStatus>,
}

impl Record for Lead {
    type Draft = LeadDraft;
    type Patch = LeadPatch;

    const KIND: &'static str = "lead";

    fn from_draft(id: RecordId, draft: LeadDraft, now: DateTime<Utc>) -> Self {
        Lead {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            source: draft.source,
            notes: draft.notes,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn apply(&mut self, patch: LeadPatch, now: DateTime<Utc>) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(source) = patch.source {
            self.source = source;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = touched(self.created_at, now);
    }
}

const STATUS_RULES: FieldRules = FieldRules {
    field: "status",
    label: "Status",
    rules: &[Rule::Required, Rule::OneOf(LeadStatus::WIRE_VALUES)],
};

// Secondary contact fields are optional but must be well-formed when given.
pub const RULES: &[FieldRules] = &[
    FieldRules {
        field: "first_name",
        label: "First name",
        rules: &[Rule::Required, Rule::MinLength(MIN_NAME_LENGTH), Rule::MaxLength(MAX_NAME_LENGTH)],
    },
    FieldRules {
        field: "last_name",
        label: "Last name",
        rules: &[Rule::Required, Rule::MinLength(MIN_NAME_LENGTH), Rule::MaxLength(MAX_NAME_LENGTH)],
    },
    FieldRules {
        field: "email",
        label: "Email",
        rules: &[Rule::Email],
    },
    FieldRules {
        field: "phone",
        label: "Phone",
        rules: &[Rule::Pattern(validation::Pattern::Phone)],
    },
    FieldRules {
        field: "source",
        label: "Source",
        rules: &[Rule::Required],
    },
    STATUS_RULES,
    FieldRules {
        field: "notes",
        label: "Notes",
        rules: &[],
    },
];

/// Validates a lead form and builds the matching patch.
///
/// Full mode is used for creation and full replacement, partial mode for
/// field-level edits.
pub fn parse_form(form: &FormData, mode: Mode) -> Result<LeadPatch, ValidationErrors> {
    validation::validate(RULES, form, mode)?;

    let text = |field: &str| match mode {
        Mode::Full => Some(validation::text(form, field).unwrap_or_default()),
        Mode::Partial => validation::text(form, field),
    };
    let optional = |field: &str| match mode {
        Mode::Full => Some(validation::optional_text(form, field).flatten()),
        Mode::Partial => validation::optional_text(form, field),
    };

    Ok(LeadPatch {
        first_name: text("first_name"),
        last_name: text("last_name"),
        email: optional("email"),
        phone: optional("phone"),
        source: text("source"),
        notes: text("notes"),
        status: validation::parsed(form, &STATUS_RULES)?,
    })
}

/// Validates a lead form for creation.
pub fn parse_draft(form: &FormData) -> Result<LeadDraft, ValidationErrors> {
    let patch = parse_form(form, Mode::Full)?;
    Ok(LeadDraft {
        first_name: patch.first_name.unwrap_or_default(),
        last_name: patch.last_name.unwrap_or_default(),
        email: patch.email.flatten(),
        phone: patch.phone.flatten(),
        source: patch.source.unwrap_or_default(),
        notes: patch.notes.unwrap_or_default(),
        status: patch.status.unwrap_or(LeadStatus::New),
    })
}

impl Searchable for Lead {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.first_name.as_str(), self.last_name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadColumn {
    FirstName,
    LastName,
    Source,
    Status,
    CreatedAt,
    UpdatedAt,
}

impl Sortable for Lead {
    type Column = LeadColumn;

    fn compare_by(&self, other: &Self, column: LeadColumn) -> Ordering {
        match column {
            LeadColumn::FirstName => self.first_name.to_lowercase().cmp(&other.first_name.to_lowercase()),
            LeadColumn::LastName => self.last_name.to_lowercase().cmp(&other.last_name.to_lowercase()),
            LeadColumn::Source => self.source.to_lowercase().cmp(&other.source.to_lowercase()),
            LeadColumn::Status => self.status.cmp(&other.status),
            LeadColumn::CreatedAt => self.created_at.cmp(&other.created_at),
            LeadColumn::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}
