//! Dataset Schemas
//!
//! Column contracts for the two bundled CSV files. Columns are read by
//! position; header names are never consulted, so reordering columns in a
//! file silently breaks parsing.
//!
//! | index | profiles (`cleaned_doctor_profiles_info2.csv`) | directory (`doctors_dataset.csv`) |
//! |-------|-----------------------------------------------|-----------------------------------|
//! | 0     | (ignored)                                     | profile url                       |
//! | 1     | name                                          | name                              |
//! | 2     | specialty                                     | specialty                         |
//! | 3     | phone 1                                       | phone 1                           |
//! | 4     | phone 2                                       | phone 2                           |
//! | 5     | address                                       | address                           |
//! | 6     | latitude                                      | latitude                          |
//! | 7     | longitude                                     | longitude                         |
//! | 8     | presentation                                  | presentation                      |
//! | 9     | working hours (one string)                    | Lundi                             |
//! | 10-15 |                                               | Mardi .. Dimanche                 |

/// French weekday names, in directory column order
pub const WEEKDAYS: [&str; 7] = [
    "Lundi", "Mardi", "Mercredi", "Jeudi", "Vendredi", "Samedi", "Dimanche",
];

/// A row type that can be built from tokenized fields
pub trait CsvSchema: Sized {
    /// Dataset name, used in logs
    const NAME: &'static str;

    /// Build a record; missing trailing fields read as empty
    fn from_fields(fields: &[String]) -> Self;
}

/// Columns shared by both datasets
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub name: String,
    pub specialty: String,
    pub phone1: String,
    pub phone2: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub presentation: String,
}

impl Listing {
    fn from_fields(fields: &[String]) -> Self {
        Self {
            name: field(fields, 1),
            specialty: field(fields, 2),
            phone1: field(fields, 3),
            phone2: field(fields, 4),
            address: field(fields, 5),
            lat: coordinate(fields, 6),
            lng: coordinate(fields, 7),
            presentation: field(fields, 8),
        }
    }

    /// Both coordinates parsed, finite and non-zero
    pub fn has_valid_coordinates(&self) -> bool {
        let valid = |v: f64| v.is_finite() && v != 0.0;
        valid(self.lat) && valid(self.lng)
    }

    /// Last whitespace-separated token of the address
    pub fn governorate(&self) -> &str {
        self.address.split_whitespace().last().unwrap_or("")
    }
}

/// Access to the shared columns of any dataset row
pub trait DoctorRecord {
    fn listing(&self) -> &Listing;

    fn lat(&self) -> f64 {
        self.listing().lat
    }

    fn lng(&self) -> f64 {
        self.listing().lng
    }
}

/// Row of the profiles dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileRecord {
    pub listing: Listing,
    pub working_hours: String,
}

impl CsvSchema for ProfileRecord {
    const NAME: &'static str = "profiles";

    fn from_fields(fields: &[String]) -> Self {
        Self {
            listing: Listing::from_fields(fields),
            working_hours: field(fields, 9),
        }
    }
}

impl DoctorRecord for ProfileRecord {
    fn listing(&self) -> &Listing {
        &self.listing
    }
}

/// Row of the directory dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRecord {
    pub url: String,
    pub listing: Listing,
    /// Working hours indexed like [`WEEKDAYS`]
    pub hours: [String; 7],
}

impl DirectoryRecord {
    /// Days with non-blank working hours, in week order
    pub fn working_hours(&self) -> Vec<(&'static str, &str)> {
        WEEKDAYS
            .iter()
            .zip(self.hours.iter())
            .filter(|(_, hours)| !hours.trim().is_empty())
            .map(|(day, hours)| (*day, hours.as_str()))
            .collect()
    }
}

impl CsvSchema for DirectoryRecord {
    const NAME: &'static str = "directory";

    fn from_fields(fields: &[String]) -> Self {
        Self {
            url: field(fields, 0),
            listing: Listing::from_fields(fields),
            hours: std::array::from_fn(|day| field(fields, 9 + day)),
        }
    }
}

impl DoctorRecord for DirectoryRecord {
    fn listing(&self) -> &Listing {
        &self.listing
    }
}

fn field(fields: &[String], idx: usize) -> String {
    fields.get(idx).cloned().unwrap_or_default()
}

/// Unparsable or missing coordinates read as 0, which marks the row invalid
fn coordinate(fields: &[String], idx: usize) -> f64 {
    fields
        .get(idx)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_profile_columns() {
        let row = ProfileRecord::from_fields(&fields(&[
            "0", "Dr. A", "ORL", "71 000 000", "", "Rue X Sfax", "34.74", "10.76", "Bio", "8h-17h",
        ]));
        assert_eq!(row.listing.name, "Dr. A");
        assert_eq!(row.listing.phone1, "71 000 000");
        assert_eq!(row.listing.lat, 34.74);
        assert_eq!(row.working_hours, "8h-17h");
        assert_eq!(row.listing.governorate(), "Sfax");
        assert!(row.listing.has_valid_coordinates());
    }

    #[test]
    fn test_directory_columns_and_hours() {
        let mut values = vec![
            "https://example.tn/dr-b", "Dr. B", "Cardiologue", "", "", "Ariana", "36.86", "10.19", "",
        ];
        values.extend(["8h-12h", "", " ", "8h-12h", "", "9h-11h", ""]);
        let row = DirectoryRecord::from_fields(&fields(&values));

        assert_eq!(row.url, "https://example.tn/dr-b");
        assert_eq!(row.listing.specialty, "Cardiologue");
        assert_eq!(
            row.working_hours(),
            vec![("Lundi", "8h-12h"), ("Jeudi", "8h-12h"), ("Samedi", "9h-11h")]
        );
    }

    #[test]
    fn test_short_rows_read_as_empty() {
        let row = DirectoryRecord::from_fields(&fields(&["", "Dr. C"]));
        assert_eq!(row.listing.name, "Dr. C");
        assert!(row.hours.iter().all(String::is_empty));
        assert!(!row.listing.has_valid_coordinates());
    }

    #[test]
    fn test_zero_or_garbage_coordinates_are_invalid() {
        let zero = ProfileRecord::from_fields(&fields(&["", "", "", "", "", "", "0", "10.2"]));
        assert!(!zero.listing.has_valid_coordinates());

        let garbage = ProfileRecord::from_fields(&fields(&["", "", "", "", "", "", "n/a", "10.2"]));
        assert!(!garbage.listing.has_valid_coordinates());

        let nan = ProfileRecord::from_fields(&fields(&["", "", "", "", "", "", "NaN", "10.2"]));
        assert!(!nan.listing.has_valid_coordinates());
    }

    #[test]
    fn test_governorate_of_empty_address() {
        let row = ProfileRecord::from_fields(&fields(&[]));
        assert_eq!(row.listing.governorate(), "");
    }
}
