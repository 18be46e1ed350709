use std::{cmp::Ordering, fmt, str::FromStr};

use axum::body::Bytes;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::query::{Searchable, Sortable};
use crate::store::{touched, Record, RecordId};
use crate::validation::{
    self, ErrorKind, FieldError, FieldRules, FormData, Mode, Pattern, Rule, ValidationErrors,
    MAX_NAME_LENGTH, MIN_NAME_LENGTH,
};

pub const MAX_CONTRACT_BYTES: usize = 10 * 1024 * 1024;
pub const CONTRACT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];
pub const RENEWAL_WARNING_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageType {
    NoPackage,
    Hosting,
    ElementorPro,
    HostingElementorPro,
}

impl PackageType {
    pub const ALL: [PackageType; 4] = [
        PackageType::NoPackage,
        PackageType::Hosting,
        PackageType::ElementorPro,
        PackageType::HostingElementorPro,
    ];

    const WIRE_VALUES: &'static [&'static str] =
        &["NO_PACKAGE", "HOSTING", "ELEMENTOR_PRO", "HOSTING_ELEMENTOR_PRO"];

    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::NoPackage => "NO_PACKAGE",
            PackageType::Hosting => "HOSTING",
            PackageType::ElementorPro => "ELEMENTOR_PRO",
            PackageType::HostingElementorPro => "HOSTING_ELEMENTOR_PRO",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageType::NoPackage => "No package",
            PackageType::Hosting => "Hosting",
            PackageType::ElementorPro => "Elementor Pro",
            PackageType::HostingElementorPro => "Hosting + Elementor Pro",
        }
    }

    pub fn includes_hosting(self) -> bool {
        matches!(self, PackageType::Hosting | PackageType::HostingElementorPro)
    }

    pub fn includes_elementor(self) -> bool {
        matches!(self, PackageType::ElementorPro | PackageType::HostingElementorPro)
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PackageType::ALL
            .into_iter()
            .find(|package| package.as_str() == s)
            .ok_or(())
    }
}

/// Contract document attached to a client. Only metadata is serialized.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ContractFile {
    pub file_name: String,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip)]
    pub content: Bytes,
}

impl ContractFile {
    /// Checks the upload limits before building the attachment.
    pub fn new(file_name: &str, content: Bytes, now: DateTime<Utc>) -> Result<Self, FieldError> {
        let file_name = file_name.trim();
        if content.len() > MAX_CONTRACT_BYTES {
            return Err(FieldError::new(
                "contract_file",
                ErrorKind::Range,
                format!("Contract file is too large, the limit is {} MB", MAX_CONTRACT_BYTES / 1024 / 1024),
            ));
        }

        let extension = file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
            .unwrap_or_default();
        if !CONTRACT_EXTENSIONS.contains(&extension.as_str()) {
            return Err(FieldError::new(
                "contract_file",
                ErrorKind::Format,
                format!("Unsupported file type, allowed: {}", CONTRACT_EXTENSIONS.join(", ")),
            ));
        }

        Ok(ContractFile {
            file_name: file_name.to_string(),
            size_bytes: content.len(),
            uploaded_at: now,
            content,
        })
    }

    /// Media type served back for the stored document, from its extension.
    pub fn content_type(&self) -> &'static str {
        let extension = self
            .file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => "application/pdf",
            "doc" => "application/msword",
            "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => "application/octet-stream",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "state", content = "days", rename_all = "snake_case")]
pub enum RenewalStatus {
    Overdue(i64),
    DueSoon(i64),
    Scheduled(i64),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Client {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub domain: String,
    pub package_type: PackageType,
    pub package_price: BigDecimal,
    pub renewal_date: NaiveDate,
    pub contract_file: Option<ContractFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn days_until_renewal(&self, today: NaiveDate) -> i64 {
        (self.renewal_date - today).num_days()
    }

    pub fn renewal_status(&self, today: NaiveDate) -> RenewalStatus {
        match self.days_until_renewal(today) {
            days if days < 0 => RenewalStatus::Overdue(-days),
            days if days <= RENEWAL_WARNING_DAYS => RenewalStatus::DueSoon(days),
            days => RenewalStatus::Scheduled(days),
        }
    }

    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.renewal_date >= today
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub domain: String,
    pub package_type: PackageType,
    pub package_price: BigDecimal,
    pub renewal_date: NaiveDate,
    pub contract_file: Option<ContractFile>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub domain: Option<String>,
    pub package_type: Option<PackageType>,
    pub package_price: Option<BigDecimal>,
    pub renewal_date: Option<NaiveDate>,
    pub contract_file: Option<Option<ContractFile>>,
}

impl ClientPatch {
    pub fn contract(contract_file: Option<ContractFile>) -> Self {
        ClientPatch {
            contract_file: Some(contract_file),
            ..Default::default()
        }
    }
}

impl Record for Client {
    type Draft = ClientDraft;
    type Patch = ClientPatch;

    const KIND: &'static str = "client";

    fn from_draft(id: RecordId, draft: ClientDraft, now: DateTime<Utc>) -> Self {
        Client {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            domain: draft.domain,
            package_type: draft.package_type,
            package_price: draft.package_price,
            renewal_date: draft.renewal_date,
            contract_file: draft.contract_file,
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

    fn apply(&mut self, patch: ClientPatch, now: DateTime<Utc>) {
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
        if let Some(domain) = patch.domain {
            self.domain = domain;
        }
        if let Some(package_type) = patch.package_type {
            self.package_type = package_type;
        }
        if let Some(package_price) = patch.package_price {
            self.package_price = package_price;
        }
        if let Some(renewal_date) = patch.renewal_date {
            self.renewal_date = renewal_date;
        }
        if let Some(contract_file) = patch.contract_file {
            self.contract_file = contract_file;
        }
        self.updated_at = touched(self.created_at, now);
    }
}

const NAME: &[Rule] = &[Rule::Required, Rule::MinLength(MIN_NAME_LENGTH), Rule::MaxLength(MAX_NAME_LENGTH)];

const PACKAGE_TYPE_RULES: FieldRules = FieldRules {
    field: "package_type",
    label: "Package type",
    rules: &[Rule::Required, Rule::OneOf(PackageType::WIRE_VALUES)],
};

const PACKAGE_PRICE_RULES: FieldRules = FieldRules {
    field: "package_price",
    label: "Package price",
    rules: &[Rule::Required, Rule::Pattern(Pattern::Price), Rule::Min(1)],
};

const RENEWAL_DATE_RULES: FieldRules = FieldRules {
    field: "renewal_date",
    label: "Renewal date",
    rules: &[Rule::Required, Rule::Date],
};

pub const RULES: &[FieldRules] = &[
    FieldRules {
        field: "first_name",
        label: "First name",
        rules: NAME,
    },
    FieldRules {
        field: "last_name",
        label: "Last name",
        rules: NAME,
    },
    FieldRules {
        field: "email",
        label: "Email",
        rules: &[Rule::Required, Rule::Email],
    },
    FieldRules {
        field: "phone",
        label: "Phone",
        rules: &[Rule::Required, Rule::Pattern(Pattern::Phone)],
    },
    FieldRules {
        field: "domain",
        label: "Domain",
        rules: &[Rule::Required, Rule::Pattern(Pattern::Domain)],
    },
    PACKAGE_TYPE_RULES,
    PACKAGE_PRICE_RULES,
    RENEWAL_DATE_RULES,
];

/// Validates a client form and builds the matching patch.
///
/// The contract attachment is never part of the form and is left untouched.
pub fn parse_form(form: &FormData, mode: Mode) -> Result<ClientPatch, ValidationErrors> {
    validation::validate(RULES, form, mode)?;

    Ok(ClientPatch {
        first_name: validation::text(form, "first_name"),
        last_name: validation::text(form, "last_name"),
        email: validation::text(form, "email"),
        phone: validation::text(form, "phone"),
        domain: validation::text(form, "domain"),
        package_type: validation::parsed(form, &PACKAGE_TYPE_RULES)?,
        package_price: validation::parsed(form, &PACKAGE_PRICE_RULES)?,
        renewal_date: validation::parsed(form, &RENEWAL_DATE_RULES)?,
        contract_file: None,
    })
}

pub fn parse_draft(form: &FormData) -> Result<ClientDraft, ValidationErrors> {
    let patch = parse_form(form, Mode::Full)?;
    let missing = |field: &str| FieldError::new(field, ErrorKind::Required, format!("{field} is required"));

    Ok(ClientDraft {
        first_name: patch.first_name.unwrap_or_default(),
        last_name: patch.last_name.unwrap_or_default(),
        email: patch.email.unwrap_or_default(),
        phone: patch.phone.unwrap_or_default(),
        domain: patch.domain.unwrap_or_default(),
        package_type: patch.package_type.ok_or_else(|| missing("package_type"))?,
        package_price: patch.package_price.ok_or_else(|| missing("package_price"))?,
        renewal_date: patch.renewal_date.ok_or_else(|| missing("renewal_date"))?,
        contract_file: None,
    })
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
            self.phone.as_str(),
            self.domain.as_str(),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientColumn {
    FirstName,
    LastName,
    Domain,
    PackageType,
    PackagePrice,
    RenewalDate,
    CreatedAt,
    UpdatedAt,
}

impl Sortable for Client {
    type Column = ClientColumn;

    fn compare_by(&self, other: &Self, column: ClientColumn) -> Ordering {
        match column {
            ClientColumn::FirstName => self.first_name.to_lowercase().cmp(&other.first_name.to_lowercase()),
            ClientColumn::LastName => self.last_name.to_lowercase().cmp(&other.last_name.to_lowercase()),
            ClientColumn::Domain => self.domain.to_lowercase().cmp(&other.domain.to_lowercase()),
            ClientColumn::PackageType => self.package_type.cmp(&other.package_type),
            ClientColumn::PackagePrice => self.package_price.cmp(&other.package_price),
            ClientColumn::RenewalDate => self.renewal_date.cmp(&other.renewal_date),
            ClientColumn::CreatedAt => self.created_at.cmp(&other.created_at),
            ClientColumn::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}
