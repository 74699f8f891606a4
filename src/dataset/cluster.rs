//! Proximity clustering for the cluster map
//!
//! Greedy first-fit: each point joins the first existing cluster whose
//! running centroid lies within `radius` degrees on both axes, otherwise it
//! opens a new cluster. Results depend on input order.

use std::fmt;
use std::str::FromStr;

use super::schema::DoctorRecord;

/// A group of nearby records
#[derive(Debug, Clone)]
pub struct Cluster<'a, T> {
    /// Centroid latitude (mean of members)
    pub lat: f64,
    /// Centroid longitude (mean of members)
    pub lng: f64,
    pub members: Vec<&'a T>,
}

impl<'a, T> Cluster<'a, T> {
    fn seed(record: &'a T, lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            members: vec![record],
        }
    }

    fn absorb(&mut self, record: &'a T, lat: f64, lng: f64) {
        self.members.push(record);
        let n = self.members.len() as f64;
        self.lat += (lat - self.lat) / n;
        self.lng += (lng - self.lng) / n;
    }

    fn covers(&self, lat: f64, lng: f64, radius: f64) -> bool {
        (self.lat - lat).abs() < radius && (self.lng - lng).abs() < radius
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn tier(&self) -> ClusterTier {
        ClusterTier::for_count(self.count())
    }
}

/// Group records by proximity
pub fn cluster_points<'a, T, I>(records: I, radius: f64) -> Vec<Cluster<'a, T>>
where
    T: DoctorRecord + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut clusters: Vec<Cluster<'a, T>> = Vec::new();

    for record in records {
        let (lat, lng) = (record.lat(), record.lng());
        match clusters.iter_mut().find(|c| c.covers(lat, lng, radius)) {
            Some(cluster) => cluster.absorb(record, lat, lng),
            None => clusters.push(Cluster::seed(record, lat, lng)),
        }
    }

    tracing::debug!(clusters = clusters.len(), radius, "Clustered points");
    clusters
}

/// Radius choices offered by the cluster map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClusterRadius {
    VeryTight,
    #[default]
    Normal,
    Wide,
    VeryWide,
}

impl ClusterRadius {
    pub const ALL: [ClusterRadius; 4] = [
        ClusterRadius::VeryTight,
        ClusterRadius::Normal,
        ClusterRadius::Wide,
        ClusterRadius::VeryWide,
    ];

    pub fn degrees(self) -> f64 {
        match self {
            ClusterRadius::VeryTight => 0.01,
            ClusterRadius::Normal => 0.05,
            ClusterRadius::Wide => 0.1,
            ClusterRadius::VeryWide => 0.2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClusterRadius::VeryTight => "Very Tight",
            ClusterRadius::Normal => "Normal",
            ClusterRadius::Wide => "Wide",
            ClusterRadius::VeryWide => "Very Wide",
        }
    }

    /// Stable key used in select options and on the command line
    pub fn key(self) -> &'static str {
        match self {
            ClusterRadius::VeryTight => "very-tight",
            ClusterRadius::Normal => "normal",
            ClusterRadius::Wide => "wide",
            ClusterRadius::VeryWide => "very-wide",
        }
    }
}

impl fmt::Display for ClusterRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}°)", self.label(), self.degrees())
    }
}

impl FromStr for ClusterRadius {
    type Err = String;

    /// Accepts a preset key or its degree value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if let Some(radius) = Self::ALL.iter().find(|r| r.key() == s) {
            return Ok(*radius);
        }
        if let Ok(degrees) = s.parse::<f64>() {
            if let Some(radius) = Self::ALL.iter().find(|r| r.degrees() == degrees) {
                return Ok(*radius);
            }
        }
        Err(format!(
            "unknown radius {s:?}, expected one of very-tight, normal, wide, very-wide"
        ))
    }
}

/// Marker style bucket by member count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterTier {
    pub min_members: usize,
    pub radius_px: u32,
    pub color: &'static str,
    pub label: &'static str,
}

/// Tiers in ascending order, also used for the map legend
pub const TIERS: [ClusterTier; 5] = [
    ClusterTier { min_members: 1, radius_px: 5, color: "#3B82F6", label: "1 doctor" },
    ClusterTier { min_members: 2, radius_px: 8, color: "#10B981", label: "2-4 doctors" },
    ClusterTier { min_members: 5, radius_px: 12, color: "#F59E0B", label: "5-9 doctors" },
    ClusterTier { min_members: 10, radius_px: 16, color: "#EF4444", label: "10-19 doctors" },
    ClusterTier { min_members: 20, radius_px: 20, color: "#991B1B", label: "20+ doctors" },
];

impl ClusterTier {
    pub fn for_count(count: usize) -> ClusterTier {
        TIERS
            .iter()
            .rev()
            .find(|tier| count >= tier.min_members)
            .copied()
            .unwrap_or(TIERS[0])
    }
}
