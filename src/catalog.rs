//! Bundled Reference Data
//!
//! Sample doctors around Tunis and the headline statistics shown on the
//! dashboard. The statistics were computed offline from the full dataset.

use crate::types::Doctor;

/// A labelled count used by the dashboard bar charts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatRow {
    pub label: &'static str,
    pub count: u32,
}

const fn row(label: &'static str, count: u32) -> StatRow {
    StatRow { label, count }
}

/// Doctors per specialty (top 8)
pub const SPECIALTY_STATS: [StatRow; 8] = [
    row("Médecin dentiste", 138),
    row("Gynécologue Obstétricien", 110),
    row("Ophtalmologue", 88),
    row("Chirurgien Orthopédiste Traumatologue", 68),
    row("Dermatologue", 64),
    row("Oto-Rhino-Laryngologiste (ORL)", 63),
    row("Généraliste", 55),
    row("Cardiologue", 55),
];

/// Doctors per governorate (top 8)
pub const GOVERNORATE_STATS: [StatRow; 8] = [
    row("Tunis", 476),
    row("Sfax", 152),
    row("Ariana", 150),
    row("Ben Arous", 128),
    row("Sousse", 114),
    row("Nabeul", 84),
    row("Medenine", 52),
    row("Monastir", 49),
];

/// Headline totals for the dashboard stat cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_doctors: u32,
    pub specialties: u32,
    pub governorates: u32,
}

pub const DASHBOARD_SUMMARY: DashboardSummary = DashboardSummary {
    total_doctors: 1330,
    specialties: 82,
    governorates: 21,
};

/// Sample doctors used as the recommendation pool
pub fn sample_doctors() -> Vec<Doctor> {
    let entries: [(&str, &str, f64, f64, &str, &str); 6] = [
        (
            "Dr. Ahmed Ben Salem",
            "Médecin dentiste",
            36.8065,
            10.1815,
            "+216 71 123 456",
            "Avenue Habib Bourguiba, Tunis",
        ),
        (
            "Dr. Fatma Mahjoub",
            "Gynécologue Obstétricien",
            36.8189,
            10.1658,
            "+216 71 234 567",
            "Rue de la Liberté, Tunis",
        ),
        (
            "Dr. Mohamed Trabelsi",
            "Cardiologue",
            36.7998,
            10.1732,
            "+216 71 345 678",
            "Avenue de Paris, Tunis",
        ),
        (
            "Dr. Salma Gharbi",
            "Dermatologue",
            36.8312,
            10.1923,
            "+216 71 456 789",
            "Lac 2, Tunis",
        ),
        (
            "Dr. Karim Bouazizi",
            "Ophtalmologue",
            36.7856,
            10.1547,
            "+216 71 567 890",
            "El Menzah, Tunis",
        ),
        (
            "Dr. Leila Messaoudi",
            "Chirurgien Orthopédiste",
            36.8423,
            10.2087,
            "+216 71 678 901",
            "La Marsa, Tunis",
        ),
    ];

    entries
        .iter()
        .enumerate()
        .map(|(idx, (name, specialty, lat, lng, phone, address))| Doctor {
            id: (idx + 1).to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            lat: *lat,
            lng: *lng,
            phone: phone.to_string(),
            address: address.to_string(),
            governorate: Some("Tunis".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_doctors_have_sequential_ids() {
        let doctors = sample_doctors();
        assert_eq!(doctors.len(), 6);
        assert_eq!(doctors[0].id, "1");
        assert_eq!(doctors[5].id, "6");
        assert!(doctors.iter().all(|d| d.governorate.as_deref() == Some("Tunis")));
    }

    #[test]
    fn test_stats_are_sorted_descending() {
        for stats in [&SPECIALTY_STATS, &GOVERNORATE_STATS] {
            assert!(stats.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }
}
