//! Flat clinic document and its record types
//!
//! The whole document is loaded and rewritten in one piece. Records reference
//! each other only through identifier fields; nothing checks that those
//! references resolve.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::ser::PrettyFormatter;

use crate::error::ClinicError;

/// Default dosage for medicines added through chat
pub const DEFAULT_DOSAGE: &str = "1 tablet";
/// Default frequency for medicines added through chat
pub const DEFAULT_FREQUENCY: &str = "Once";
/// Default duration for medicines added through chat
pub const DEFAULT_DURATION_DAYS: u32 = 1;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub user_id: u32,
    pub name: String,
}

/// Patient profile, back-referencing its user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientProfile {
    pub patient_id: u32,
    pub user_id: u32,
    #[serde(deserialize_with = "number_or_numeric_text")]
    pub age: u32,
    pub gender: String,
    #[serde(deserialize_with = "text_or_number")]
    pub contact_no: String,
}

/// A prescription groups medicines for one patient
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prescription {
    pub prescription_id: u32,
    pub patient_id: u32,
    #[serde(default)]
    pub doctor_id: Option<u32>,
    #[serde(default)]
    pub notes: String,
    /// Written and read as `YYYY-MM-DD`
    pub created_date: NaiveDate,
}

/// One medicine entry of a prescription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionMedicine {
    pub medicine_id: u32,
    pub prescription_id: u32,
    pub medicine_name: String,
    pub dosage: String,
    pub frequency: String,
    pub timing: String,
    pub duration_days: u32,
}

/// Composed view of a user joined with its profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientInfo {
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub contact: String,
}

/// The clinic document: four independent lists
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClinicDb {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default, rename = "patient_profile")]
    pub patient_profiles: Vec<PatientProfile>,

    #[serde(default)]
    pub prescriptions: Vec<Prescription>,

    #[serde(default)]
    pub prescription_medicines: Vec<PrescriptionMedicine>,
}

impl ClinicDb {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> Result<Self, ClinicError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize the document as JSON indented with four spaces
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, ClinicError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }

    /// Find a user by name, ignoring case
    pub fn find_user_by_name(&self, name: &str) -> Option<&User> {
        let wanted = name.to_lowercase();
        self.users.iter().find(|u| u.name.to_lowercase() == wanted)
    }

    /// Get the profile belonging to a user
    pub fn profile_for_user(&self, user_id: u32) -> Option<&PatientProfile> {
        self.patient_profiles.iter().find(|p| p.user_id == user_id)
    }

    /// Join a user to its profile by name
    pub fn patient_info_by_name(&self, name: &str) -> Option<PatientInfo> {
        let user = self.find_user_by_name(name)?;
        let profile = self.profile_for_user(user.user_id)?;

        Some(PatientInfo {
            name: user.name.clone(),
            age: profile.age,
            gender: profile.gender.clone(),
            contact: profile.contact_no.clone(),
        })
    }

    /// All prescriptions of a patient, in stored order
    pub fn prescriptions_for_patient(&self, patient_id: u32) -> Vec<&Prescription> {
        self.prescriptions
            .iter()
            .filter(|p| p.patient_id == patient_id)
            .collect()
    }

    /// All medicines of a prescription, in stored order
    pub fn medicines_for_prescription(&self, prescription_id: u32) -> Vec<&PrescriptionMedicine> {
        self.prescription_medicines
            .iter()
            .filter(|m| m.prescription_id == prescription_id)
            .collect()
    }

    /// Append a prescription without a doctor and return its id
    pub fn append_prescription(&mut self, patient_id: u32, notes: &str, date: NaiveDate) -> u32 {
        let id = next_id(self.prescriptions.iter().map(|p| p.prescription_id));
        self.prescriptions.push(Prescription {
            prescription_id: id,
            patient_id,
            doctor_id: None,
            notes: notes.to_string(),
            created_date: date,
        });
        id
    }

    /// Append a medicine with the default dosage, frequency and duration
    pub fn append_medicine(&mut self, prescription_id: u32, name: &str, timing: &str) -> u32 {
        let id = next_id(self.prescription_medicines.iter().map(|m| m.medicine_id));
        self.prescription_medicines.push(PrescriptionMedicine {
            medicine_id: id,
            prescription_id,
            medicine_name: name.to_string(),
            dosage: DEFAULT_DOSAGE.to_string(),
            frequency: DEFAULT_FREQUENCY.to_string(),
            timing: timing.to_string(),
            duration_days: DEFAULT_DURATION_DAYS,
        });
        id
    }

    /// Live statistics used to fill response placeholders
    pub fn stats(&self) -> ClinicStats {
        let active_patients = self
            .patient_profiles
            .iter()
            .filter(|profile| {
                self.prescriptions
                    .iter()
                    .any(|p| p.patient_id == profile.patient_id)
            })
            .count();

        ClinicStats {
            total_patients: self.users.len(),
            active_patients,
            total_prescriptions: self.prescriptions.len(),
            most_prescribed: self.most_prescribed().unwrap_or("none").to_string(),
        }
    }

    /// Most frequent medicine name; the first one seen wins a tie
    fn most_prescribed(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for medicine in &self.prescription_medicines {
            let name = medicine.medicine_name.as_str();
            match counts.iter_mut().find(|(n, _)| *n == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (name, count) in counts {
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((name, count));
            }
        }
        best.map(|(name, _)| name)
    }
}

fn next_id(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().map_or(1, |max| max + 1)
}

/// Aggregate figures over the clinic document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClinicStats {
    pub total_patients: usize,
    pub active_patients: usize,
    pub total_prescriptions: usize,
    pub most_prescribed: String,
}

impl ClinicStats {
    /// Substitute `{total_patients}`-style placeholders in a response.
    ///
    /// Unknown placeholders are left untouched.
    pub fn fill(&self, template: &str) -> String {
        template
            .replace("{total_patients}", &self.total_patients.to_string())
            .replace("{active_patients}", &self.active_patients.to_string())
            .replace("{total_prescriptions}", &self.total_prescriptions.to_string())
            .replace("{most_prescribed}", &self.most_prescribed)
    }
}

/// Scalar that hand-edited stores write either quoted or bare
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(u64),
}

/// Phone numbers are often stored as JSON numbers
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(text) => text,
        Scalar::Number(n) => n.to_string(),
    })
}

fn number_or_numeric_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    match Scalar::deserialize(deserializer)? {
        Scalar::Number(n) => u32::try_from(n).map_err(de::Error::custom),
        Scalar::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected a number, got '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> ClinicDb {
        ClinicDb::from_json(
            r#"{
                "users": [
                    {"user_id": 1, "name": "Sasmita"},
                    {"user_id": 2, "name": "Rahul"},
                    {"user_id": 3, "name": "Anita"}
                ],
                "patient_profile": [
                    {"patient_id": 10, "user_id": 1, "age": 34, "gender": "Female", "contact_no": "9876543210"},
                    {"patient_id": 11, "user_id": 2, "age": 52, "gender": "Male", "contact_no": "9123456780"}
                ],
                "prescriptions": [],
                "prescription_medicines": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_patient_info_joins_user_and_profile() {
        let db = sample_db();

        let info = db.patient_info_by_name("sasmita").unwrap();
        assert_eq!(info.name, "Sasmita");
        assert_eq!(info.age, 34);
        assert_eq!(info.gender, "Female");
        assert_eq!(info.contact, "9876543210");

        // Anita has no profile, Bob is not a user at all
        assert!(db.patient_info_by_name("Anita").is_none());
        assert!(db.patient_info_by_name("Bob").is_none());
    }

    #[test]
    fn test_loose_scalar_fields_are_accepted() {
        let db = ClinicDb::from_json(
            r#"{
                "patient_profile": [
                    {"patient_id": 1, "user_id": 1, "age": "41", "gender": "Male", "contact_no": 9988776655}
                ],
                "prescriptions": [
                    {"prescription_id": 1, "patient_id": 1, "created_date": "2026-01-01"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(db.patient_profiles[0].age, 41);
        assert_eq!(db.patient_profiles[0].contact_no, "9988776655");
        assert_eq!(db.prescriptions[0].notes, "");
        assert_eq!(db.prescriptions[0].doctor_id, None);

        // Written back in the canonical form
        let text = String::from_utf8(db.to_pretty_json().unwrap()).unwrap();
        assert!(text.contains(r#""contact_no": "9988776655""#));
        assert!(text.contains(r#""age": 41"#));
    }

    #[test]
    fn test_non_numeric_age_is_rejected() {
        let err = ClinicDb::from_json(
            r#"{"patient_profile": [
                {"patient_id": 1, "user_id": 1, "age": "forty", "gender": "Male", "contact_no": "1"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClinicError::Json(_)));
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let db = ClinicDb::from_json("{}").unwrap();
        assert_eq!(db, ClinicDb::default());
    }

    #[test]
    fn test_append_assigns_next_ids() {
        let mut db = sample_db();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();

        let first = db.append_prescription(10, "Auto-created prescription", date);
        let second = db.append_prescription(11, "Follow-up", date);
        assert_eq!((first, second), (1, 2));

        let med = db.append_medicine(first, "Paracetamol", "6 PM");
        assert_eq!(med, 1);

        let stored = &db.prescription_medicines[0];
        assert_eq!(stored.dosage, DEFAULT_DOSAGE);
        assert_eq!(stored.frequency, DEFAULT_FREQUENCY);
        assert_eq!(stored.duration_days, DEFAULT_DURATION_DAYS);
        assert_eq!(db.medicines_for_prescription(first).len(), 1);
        assert!(db.medicines_for_prescription(second).is_empty());
    }

    #[test]
    fn test_next_id_skips_past_gaps() {
        let mut db = sample_db();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        db.prescriptions.push(Prescription {
            prescription_id: 7,
            patient_id: 10,
            doctor_id: Some(3),
            notes: String::new(),
            created_date: date,
        });

        assert_eq!(db.append_prescription(11, "", date), 8);
    }

    #[test]
    fn test_stats_and_placeholders() {
        let mut db = sample_db();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let rx = db.append_prescription(10, "", date);
        db.append_medicine(rx, "Cetirizine", "9 AM");
        db.append_medicine(rx, "Paracetamol", "6 PM");
        db.append_medicine(rx, "Paracetamol", "10 PM");

        let stats = db.stats();
        assert_eq!(stats.total_patients, 3);
        assert_eq!(stats.active_patients, 1);
        assert_eq!(stats.total_prescriptions, 1);
        assert_eq!(stats.most_prescribed, "Paracetamol");

        let filled = stats.fill("{total_patients} patients, top: {most_prescribed}, {unknown}");
        assert_eq!(filled, "3 patients, top: Paracetamol, {unknown}");
    }

    #[test]
    fn test_most_prescribed_tie_keeps_first_seen() {
        let mut db = sample_db();
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let rx = db.append_prescription(10, "", date);
        db.append_medicine(rx, "Ibuprofen", "8 AM");
        db.append_medicine(rx, "Amoxicillin", "8 PM");

        assert_eq!(db.stats().most_prescribed, "Ibuprofen");
        assert_eq!(ClinicDb::default().stats().most_prescribed, "none");
    }

    #[test]
    fn test_pretty_json_uses_four_space_indent() {
        let db = sample_db();
        let text = String::from_utf8(db.to_pretty_json().unwrap()).unwrap();

        assert!(text.starts_with("{\n    \"users\": ["));
        assert!(text.contains("\"patient_profile\""));
        assert_eq!(ClinicDb::from_json(&text).unwrap(), db);
    }
}
