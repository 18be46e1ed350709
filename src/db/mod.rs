//! In-memory stand-in for the console database: one record store per entity.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tokio::sync::RwLock;
use tracing::info;

use crate::client::{Client, PackageType};
use crate::lead::{Lead, LeadStatus};
use crate::store::{RecordId, RecordStore};

#[derive(Clone, Default)]
pub struct Database {
    pub leads: Arc<RwLock<RecordStore<Lead>>>,
    pub clients: Arc<RwLock<RecordStore<Client>>>,
}

impl Database {
    pub fn new(leads: RecordStore<Lead>, clients: RecordStore<Client>) -> Self {
        Database {
            leads: Arc::new(RwLock::new(leads)),
            clients: Arc::new(RwLock::new(clients)),
        }
    }
}

/// Opens the database, pre-filled with the sample records when `seed` is set.
pub fn connect_db(seed: bool) -> Database {
    if !seed {
        info!("Starting with empty lead and client collections");
        return Database::default();
    }

    let db = Database::new(
        RecordStore::with_records(sample_leads()),
        RecordStore::with_records(sample_clients()),
    );
    info!("Database seeded with sample leads and clients");
    db
}

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("sample records use valid calendar dates")
}

fn at(year: i32, month: u32, date: u32) -> DateTime<Utc> {
    day(year, month, date).and_time(NaiveTime::MIN).and_utc()
}

#[allow(clippy::too_many_arguments)]
fn lead(
    id: &str,
    name: (&str, &str),
    email: Option<&str>,
    phone: &str,
    source: &str,
    notes: &str,
    status: LeadStatus,
    created: u32,
    updated: u32,
) -> Lead {
    Lead {
        id: RecordId::new(id),
        first_name: name.0.to_string(),
        last_name: name.1.to_string(),
        email: email.map(str::to_string),
        phone: Some(phone.to_string()),
        source: source.to_string(),
        notes: notes.to_string(),
        status,
        created_at: at(2024, 1, created),
        updated_at: at(2024, 1, updated),
    }
}

pub fn sample_leads() -> Vec<Lead> {
    vec![
        lead("1", ("Yossi", "Cohen"), Some("yossi.cohen@example.com"), "050-1234567", "Website",
            "Interested in the premium package, call back next week", LeadStatus::New, 15, 15),
        lead("2", ("Sarah", "Levy"), Some("sarah.levy@example.com"), "052-9876543", "Referral",
            "Referred by a friend, follow up next week", LeadStatus::InProgress, 10, 12),
        lead("3", ("David", "Goldberg"), Some("david.goldberg@example.com"), "054-5551234", "Email",
            "Follow up in two weeks, interested in hosting", LeadStatus::FollowUp, 5, 8),
        lead("4", ("Michal", "Barak"), None, "053-7778888", "WhatsApp",
            "Not interested right now, try again in a month", LeadStatus::NotInterested, 3, 6),
        lead("5", ("Amit", "Rozen"), Some("amit.rozen@example.com"), "050-4445555", "Facebook",
            "Wants a new website, contact this week", LeadStatus::New, 20, 20),
        lead("6", ("Noa", "Shapira"), Some("noa.shapira@example.com"), "052-6667777", "Instagram",
            "Interested in design, send a quote", LeadStatus::InProgress, 18, 19),
        lead("7", ("Alon", "Green"), Some("alon.green@example.com"), "054-8889999", "LinkedIn",
            "Tech company, large project", LeadStatus::InProgress, 12, 15),
        lead("8", ("Tamar", "Weiss"), Some("tamar.weiss@example.com"), "050-1112222", "Google Ads",
            "Interested in hosting and Elementor, get in touch", LeadStatus::New, 22, 22),
        lead("9", ("Guy", "Mor"), Some("guy.mor@example.com"), "052-3334444", "Referral",
            "Lawyer, needs a professional site", LeadStatus::InProgress, 16, 17),
        lead("10", ("Dana", "Feld"), Some("dana.feld@example.com"), "054-5556666", "Website",
            "Online store, complex project", LeadStatus::InProgress, 8, 10),
    ]
}

#[allow(clippy::too_many_arguments)]
fn client(
    id: &str,
    name: (&str, &str),
    email: &str,
    phone: &str,
    domain: &str,
    package_type: PackageType,
    price: u32,
    renewal: (i32, u32, u32),
    created: u32,
    updated: u32,
) -> Client {
    Client {
        id: RecordId::new(id),
        first_name: name.0.to_string(),
        last_name: name.1.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        domain: domain.to_string(),
        package_type,
        package_price: BigDecimal::from(price),
        renewal_date: day(renewal.0, renewal.1, renewal.2),
        contract_file: None,
        created_at: at(2024, 1, created),
        updated_at: at(2024, 1, updated),
    }
}

pub fn sample_clients() -> Vec<Client> {
    use PackageType::*;

    vec![
        client("1", ("Avi", "Goldberg"), "avi.goldberg@example.com", "050-1234567",
            "goldberg-law.co.il", HostingElementorPro, 299, (2025, 1, 15), 15, 15),
        client("2", ("Michal", "Cohen"), "michal.cohen@example.com", "052-9876543",
            "cohen-design.com", ElementorPro, 99, (2025, 2, 20), 10, 12),
        client("3", ("Dan", "Levy"), "dan.levy@example.com", "054-5551234",
            "levy-restaurant.co.il", Hosting, 149, (2025, 3, 5), 5, 8),
        client("4", ("Shira", "Barak"), "shira.barak@example.com", "050-4445555",
            "barak-photography.com", HostingElementorPro, 299, (2025, 4, 15), 20, 20),
        client("5", ("Omer", "Rozen"), "omer.rozen@example.com", "052-6667777",
            "rozen-consulting.co.il", ElementorPro, 99, (2025, 5, 30), 18, 19),
        client("6", ("Noa", "Shapira"), "noa.shapira@example.com", "054-8889999",
            "shapira-boutique.com", Hosting, 149, (2025, 6, 12), 12, 15),
        client("7", ("Alon", "Green"), "alon.green@example.com", "050-1112222",
            "green-tech.co.il", HostingElementorPro, 299, (2025, 7, 25), 22, 22),
        client("8", ("Tamar", "Weiss"), "tamar.weiss@example.com", "052-3334444",
            "weiss-accounting.com", ElementorPro, 99, (2025, 8, 18), 16, 17),
        client("9", ("Guy", "Mor"), "guy.mor@example.com", "054-5556666",
            "mor-legal.co.il", Hosting, 149, (2025, 9, 10), 8, 10),
        client("10", ("Dana", "Feld"), "dana.feld@example.com", "050-7778888",
            "feld-interior.com", HostingElementorPro, 299, (2025, 10, 22), 5, 7),
    ]
}
