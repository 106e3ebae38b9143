use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::core::CityTier;

/// Tier 1 metros: largest quick-commerce markets.
const TIER_1_CITIES: &[&str] = &[
    "Mumbai", "Delhi", "Bangalore", "Hyderabad", "Chennai", "Kolkata", "Pune",
];

const TIER_2_CITIES: &[&str] = &[
    "Ahmedabad", "Jaipur", "Surat", "Lucknow", "Kanpur", "Nagpur", "Indore", "Thane", "Bhopal",
    "Visakhapatnam", "Patna", "Vadodara", "Coimbatore", "Chandigarh", "Madurai", "Jamshedpur",
    "Raipur", "Allahabad", "Amritsar", "Varanasi", "Agra", "Nashik", "Faridabad", "Meerut",
    "Rajkot", "Srinagar", "Ludhiana", "Ghaziabad", "Navi Mumbai", "Vijayawada",
];

const TIER_3_CITIES: &[&str] = &[
    "Gwalior", "Jabalpur", "Bhubaneswar", "Mysore", "Tiruchirappalli", "Salem", "Warangal",
    "Kochi", "Thiruvananthapuram", "Dehradun", "Guwahati", "Jalandhar", "Bareilly", "Aligarh",
    "Gorakhpur", "Bokaro Steel City", "Asansol", "Dhanbad", "Hubli", "Mangalore", "Belgaum",
    "Tirunelveli", "Udaipur", "Tiruppur", "Kozhikode", "Akola", "Kurnool", "Bellary", "Patiala",
    "Bhagalpur", "Muzaffarnagar", "Latur", "Dhule", "Rohtak", "Korba", "Bhilwara", "Muzaffarpur",
    "Ahmednagar", "Mathura", "Kollam", "Avadi", "Kadapa", "Sambalpur", "Bilaspur", "Shahjahanpur",
    "Satara", "Bijapur", "Rampur", "Shivamogga", "Chandrapur", "Junagadh", "Thrissur", "Alwar",
    "Bardhaman", "Nizamabad", "Parbhani", "Tumkur", "Khammam", "Panipat", "Darbhanga", "Dewas",
    "Ichalkaranji", "Karnal", "Bathinda", "Jalna", "Eluru", "Barasat", "Purnia", "Satna", "Mau",
    "Sonipat", "Farrukhabad", "Sagar", "Rourkela", "Durg", "Imphal", "Ratlam", "Hapur",
    "Anantapur", "Arrah", "Karimnagar", "Etawah", "Bharatpur", "Begusarai", "Noida", "Gurgaon",
    "Greater Noida", "Gandhinagar", "Kalyan", "Vasai", "Aurangabad", "Solapur", "Kolhapur",
    "Sangli", "Malegaon", "Jalgaon", "Bhusawal", "Amravati", "Nanded", "Osmanabad", "Bidar",
    "Gulbarga", "Raichur", "Hospet", "Davangere", "Hassan", "Mandya", "Chitradurga", "Tumakuru",
    "Kolar", "Chikkaballapur", "Ramanagara", "Hosur", "Krishnagiri", "Dharmapuri", "Erode",
    "Namakkal", "Karur", "Dindigul", "Theni", "Virudhunagar", "Sivakasi", "Thoothukudi",
    "Nagercoil", "Kanyakumari",
];

/// Delivery SLA thresholds in minutes for a city tier. Informational only,
/// surfaced alongside alerts for operators. Lower tier = faster expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaThresholds {
    pub target: u32,
    pub warning: u32,
    pub critical: u32,
}

/// SLA expectations per tier. Unknown cities get the most lenient (Tier 3) set.
pub fn sla_thresholds(tier: CityTier) -> SlaThresholds {
    match tier {
        CityTier::Tier1 => SlaThresholds {
            target: 15,
            warning: 25,
            critical: 35,
        },
        CityTier::Tier2 => SlaThresholds {
            target: 20,
            warning: 30,
            critical: 40,
        },
        CityTier::Tier3 | CityTier::Unknown => SlaThresholds {
            target: 25,
            warning: 35,
            critical: 45,
        },
    }
}

#[derive(Debug, Deserialize)]
struct TierCsvRow {
    city: String,
    tier: String,
}

/// In-memory lookup for city tier classification. Keys are normalized
/// (trimmed, title-cased) so "new delhi " and "New Delhi" match the same row.
pub struct TierLookup {
    map: HashMap<String, CityTier>,
}

impl TierLookup {
    /// The built-in tier table.
    pub fn builtin() -> Self {
        let mut map = HashMap::with_capacity(
            TIER_1_CITIES.len() + TIER_2_CITIES.len() + TIER_3_CITIES.len(),
        );
        for (tier, cities) in [
            (CityTier::Tier1, TIER_1_CITIES),
            (CityTier::Tier2, TIER_2_CITIES),
            (CityTier::Tier3, TIER_3_CITIES),
        ] {
            for city in cities {
                map.insert(normalize_city(city), tier);
            }
        }
        Self { map }
    }

    /// An empty lookup (every city resolves to Unknown).
    #[cfg(test)]
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Number of cities in the table.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Tier for a city, Unknown if not in the table.
    pub fn get(&self, city: &str) -> CityTier {
        self.map
            .get(&normalize_city(city))
            .copied()
            .unwrap_or(CityTier::Unknown)
    }

    /// Merge tier assignments from a CSV file with `city,tier` columns.
    /// Rows naming an unrecognized tier are skipped with a warning.
    /// Returns the number of entries added or overridden.
    pub fn load_csv(&mut self, path: &Path) -> Result<usize, csv::Error> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut count = 0;
        for row in reader.deserialize() {
            let row: TierCsvRow = row?;
            let tier = match row.tier.trim() {
                "Tier 1" => CityTier::Tier1,
                "Tier 2" => CityTier::Tier2,
                "Tier 3" => CityTier::Tier3,
                other => {
                    tracing::warn!("Skipping city {} with unrecognized tier {other:?}", row.city);
                    continue;
                }
            };
            self.map.insert(normalize_city(&row.city), tier);
            count += 1;
        }
        tracing::info!("Loaded {count} city tier entries from {}", path.display());
        Ok(count)
    }
}

/// Trim and title-case a city name: first letter of each word uppercased,
/// the rest lowercased, single spaces between words.
fn normalize_city(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_all_tiers() {
        let lookup = TierLookup::builtin();
        assert_eq!(lookup.get("Mumbai"), CityTier::Tier1);
        assert_eq!(lookup.get("Jaipur"), CityTier::Tier2);
        assert_eq!(lookup.get("Guwahati"), CityTier::Tier3);
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        let lookup = TierLookup::builtin();
        assert_eq!(lookup.get("  mumbai "), CityTier::Tier1);
        assert_eq!(lookup.get("NAVI MUMBAI"), CityTier::Tier2);
        assert_eq!(lookup.get("bokaro steel city"), CityTier::Tier3);
    }

    #[test]
    fn unknown_city_defaults_to_unknown() {
        assert_eq!(TierLookup::builtin().get("Gotham"), CityTier::Unknown);
        assert_eq!(TierLookup::empty().get("Mumbai"), CityTier::Unknown);
    }

    #[test]
    fn builtin_size() {
        let lookup = TierLookup::builtin();
        assert_eq!(lookup.len(), 7 + 30 + 125);
    }

    #[test]
    fn sla_tightens_with_tier() {
        let t1 = sla_thresholds(CityTier::Tier1);
        let t3 = sla_thresholds(CityTier::Tier3);
        assert!(t1.target < t3.target);
        assert_eq!(sla_thresholds(CityTier::Unknown), t3);
    }

    #[test]
    fn csv_overrides_builtin() {
        let dir = std::env::temp_dir().join("cityrisk_tiers_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiers.csv");
        std::fs::write(&path, "city,tier\nGotham,Tier 2\nmumbai,Tier 3\nNowhere,Tier 9\n").unwrap();

        let mut lookup = TierLookup::builtin();
        let count = lookup.load_csv(&path).unwrap();
        assert_eq!(count, 2);
        assert_eq!(lookup.get("Gotham"), CityTier::Tier2);
        assert_eq!(lookup.get("Mumbai"), CityTier::Tier3);
        assert_eq!(lookup.get("Nowhere"), CityTier::Unknown);
    }
}
