//! Aggregates derived from a store snapshot.
//!
//! Everything here is recomputed on each read; money figures are floored to
//! whole units.

use bigdecimal::{
    num_bigint::{BigInt, Sign},
    BigDecimal, Zero,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::{Client, PackageType, RenewalStatus};
use crate::lead::{Lead, LeadStatus};

const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeadStats {
    pub total: usize,
    pub new: usize,
    pub in_progress: usize,
    pub follow_up: usize,
    pub not_interested: usize,
}

impl LeadStats {
    pub fn count(&self, status: LeadStatus) -> usize {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::InProgress => self.in_progress,
            LeadStatus::FollowUp => self.follow_up,
            LeadStatus::NotInterested => self.not_interested,
        }
    }
}

pub fn lead_stats(leads: &[Lead]) -> LeadStats {
    let mut stats = LeadStats {
        total: leads.len(),
        ..Default::default()
    };
    for lead in leads {
        match lead.status {
            LeadStatus::New => stats.new += 1,
            LeadStatus::InProgress => stats.in_progress += 1,
            LeadStatus::FollowUp => stats.follow_up += 1,
            LeadStatus::NotInterested => stats.not_interested += 1,
        }
    }
    stats
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackageCounts {
    pub no_package: usize,
    pub hosting: usize,
    pub elementor_pro: usize,
    pub hosting_elementor_pro: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClientStats {
    pub total: usize,
    pub packages: PackageCounts,
    /// Clients whose package includes hosting.
    pub hosting_count: usize,
    /// Clients whose package includes Elementor Pro.
    pub elementor_count: usize,
    pub with_package: usize,
    pub without_contract: usize,
    pub active: usize,
    pub renewals_due_soon: usize,
    pub renewals_overdue: usize,
    pub total_revenue: BigDecimal,
    pub average_revenue: BigDecimal,
    pub monthly_revenue: BigDecimal,
}

pub fn client_stats(clients: &[Client], today: NaiveDate) -> ClientStats {
    let mut packages = PackageCounts::default();
    let mut total_revenue = BigDecimal::zero();
    let mut without_contract = 0;
    let mut active = 0;
    let mut renewals_due_soon = 0;
    let mut renewals_overdue = 0;

    for client in clients {
        match client.package_type {
            PackageType::NoPackage => packages.no_package += 1,
            PackageType::Hosting => packages.hosting += 1,
            PackageType::ElementorPro => packages.elementor_pro += 1,
            PackageType::HostingElementorPro => packages.hosting_elementor_pro += 1,
        }
        match client.renewal_status(today) {
            RenewalStatus::Overdue(_) => renewals_overdue += 1,
            RenewalStatus::DueSoon(_) => renewals_due_soon += 1,
            RenewalStatus::Scheduled(_) => {}
        }
        if client.contract_file.is_none() {
            without_contract += 1;
        }
        if client.is_active(today) {
            active += 1;
        }
        total_revenue += client.package_price.clone();
    }

    let average_revenue = floored_ratio(&total_revenue, clients.len());
    let monthly_revenue = floored_ratio(&total_revenue, MONTHS_PER_YEAR);

    ClientStats {
        total: clients.len(),
        hosting_count: packages.hosting + packages.hosting_elementor_pro,
        elementor_count: packages.elementor_pro + packages.hosting_elementor_pro,
        with_package: clients.len() - packages.no_package,
        packages,
        without_contract,
        active,
        renewals_due_soon,
        renewals_overdue,
        total_revenue,
        average_revenue,
        monthly_revenue,
    }
}

/// `floor(total / divisor)` in exact integer arithmetic, whatever the magnitude of `total`.
fn floored_ratio(total: &BigDecimal, divisor: usize) -> BigDecimal {
    if divisor == 0 {
        return BigDecimal::zero();
    }

    let (digits, scale) = total.as_bigint_and_exponent();
    let divisor = BigInt::from(divisor);
    let shift = BigInt::from(10).pow(scale.unsigned_abs() as u32);
    let (numerator, denominator) = if scale >= 0 {
        (digits, divisor * shift)
    } else {
        (digits * shift, divisor)
    };

    let quotient = &numerator / &denominator;
    let exact = &quotient * &denominator == numerator;
    let floored = if numerator.sign() == Sign::Minus && !exact {
        quotient - 1
    } else {
        quotient
    };
    BigDecimal::new(floored, 0)
}
