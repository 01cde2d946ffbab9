//! Ordered keyword routes tried before the fallback scorer
//!
//! Routes are checked in table order against the lower-cased message and the
//! first match answers. Overlapping keywords ("profile" vs "age") are settled
//! only by position in [`ROUTES`].

use chrono::Utc;
use clinic_core::{ClinicDb, ClinicError, PatientInfo};

use super::Responder;
use super::medicine::{self, USAGE_HINT};

/// Reply when a route needs a patient name and none was found
pub const ASK_FOR_NAME: &str = "Please specify the patient's name.";

/// Notes written on prescriptions created by the add command
pub const AUTO_PRESCRIPTION_NOTES: &str = "Auto-created prescription";

/// A message as seen by the route predicates
pub struct Query<'a> {
    pub original: &'a str,
    pub lower: String,
}

impl<'a> Query<'a> {
    pub fn new(original: &'a str) -> Self {
        Self {
            original,
            lower: original.to_lowercase(),
        }
    }

    fn contains_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.lower.contains(n))
    }

    fn has_word(&self, word: &str) -> bool {
        self.lower.split_whitespace().any(|w| w == word)
    }
}

type Handler = fn(&Responder, &mut ClinicDb, &Query<'_>) -> Result<String, ClinicError>;

/// One (predicate, handler) entry of the cascade
pub struct Route {
    pub name: &'static str,
    pub matches: fn(&Query<'_>) -> bool,
    pub handle: Handler,
}

pub const ROUTES: &[Route] = &[
    Route {
        name: "patient_count",
        matches: is_patient_count,
        handle: patient_count,
    },
    Route {
        name: "all_patients",
        matches: is_all_patients,
        handle: all_patients,
    },
    Route {
        name: "profile",
        matches: is_profile,
        handle: profile,
    },
    Route {
        name: "contact",
        matches: is_contact,
        handle: contact,
    },
    Route {
        name: "age",
        matches: is_age,
        handle: age,
    },
    Route {
        name: "gender",
        matches: is_gender,
        handle: gender,
    },
    Route {
        name: "add_medicine",
        matches: is_add_medicine,
        handle: add_medicine,
    },
    Route {
        name: "next_dose",
        matches: is_next_dose,
        handle: next_dose,
    },
];

fn is_patient_count(q: &Query<'_>) -> bool {
    q.contains_any(&["how many patients", "total patients", "number of patients"])
}

fn is_all_patients(q: &Query<'_>) -> bool {
    q.lower.contains("all patients")
}

fn is_profile(q: &Query<'_>) -> bool {
    q.contains_any(&["profile", "details"])
}

fn is_contact(q: &Query<'_>) -> bool {
    q.has_word("contact")
}

fn is_age(q: &Query<'_>) -> bool {
    q.lower.contains("age")
}

fn is_gender(q: &Query<'_>) -> bool {
    q.lower.contains("gender")
}

fn is_add_medicine(q: &Query<'_>) -> bool {
    q.lower.contains("add") && q.lower.contains("at")
}

fn is_next_dose(q: &Query<'_>) -> bool {
    q.contains_any(&["next dose", "next medicine"])
}

fn patient_count(_: &Responder, db: &mut ClinicDb, _: &Query<'_>) -> Result<String, ClinicError> {
    Ok(format!(
        "There are currently {} patients registered in the system.",
        db.users.len()
    ))
}

fn all_patients(_: &Responder, db: &mut ClinicDb, _: &Query<'_>) -> Result<String, ClinicError> {
    let mut output = String::from("All Patients\n------------\n");

    // Numbering follows the user list, so users without a profile leave gaps
    for (index, user) in db.users.iter().enumerate() {
        if let Some(profile) = db.profile_for_user(user.user_id) {
            output.push_str(&format!(
                "{}.\n  Name: {}\n  Age: {}\n  Gender: {}\n  Contact: {}\n\n",
                index + 1,
                user.name,
                profile.age,
                profile.gender,
                profile.contact_no
            ));
        }
    }

    Ok(output)
}

fn profile(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    Ok(with_patient(r, db, q, |info| {
        format!(
            "Patient Profile\n---------------\nName: {}\nAge: {}\nGender: {}\nContact: {}",
            info.name, info.age, info.gender, info.contact
        )
    }))
}

fn contact(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    Ok(with_patient(r, db, q, |info| {
        format!("{}'s Contact Number: {}", info.name, info.contact)
    }))
}

fn age(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    Ok(with_patient(r, db, q, |info| {
        format!("{}'s Age: {}", info.name, info.age)
    }))
}

fn gender(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    Ok(with_patient(r, db, q, |info| {
        format!("{}'s Gender: {}", info.name, info.gender)
    }))
}

fn add_medicine(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    let Some(command) = medicine::parse(q.original) else {
        return Ok(USAGE_HINT.to_string());
    };
    let Some(name) = r.names().extract(q.original, &db.users) else {
        return Ok(USAGE_HINT.to_string());
    };
    let Some(patient_id) = patient_id_for(db, &name) else {
        return Ok(not_found(&name));
    };

    let existing = db
        .prescriptions_for_patient(patient_id)
        .first()
        .map(|p| p.prescription_id);
    let prescription_id = match existing {
        Some(id) => id,
        None => {
            let id = db.append_prescription(
                patient_id,
                AUTO_PRESCRIPTION_NOTES,
                Utc::now().date_naive(),
            );
            tracing::info!(patient_id, prescription_id = id, "Created prescription");
            id
        }
    };

    db.append_medicine(prescription_id, &command.medicine, &command.timing);
    r.repository().save(db)?;

    Ok(format!(
        "Saved! Added {} for {} at {}.",
        command.medicine, name, command.timing
    ))
}

fn next_dose(r: &Responder, db: &mut ClinicDb, q: &Query<'_>) -> Result<String, ClinicError> {
    let Some(name) = r.names().extract(q.original, &db.users) else {
        return Ok(ASK_FOR_NAME.to_string());
    };
    let Some(patient_id) = patient_id_for(db, &name) else {
        return Ok(not_found(&name));
    };

    let prescriptions = db.prescriptions_for_patient(patient_id);
    let Some(first) = prescriptions.first() else {
        return Ok(format!("No prescription found for {name}."));
    };

    let medicines = db.medicines_for_prescription(first.prescription_id);
    if medicines.is_empty() {
        return Ok(format!("No medicines found for {name}."));
    }

    let mut reply = format!("Here are {name}'s medicines:\n");
    for m in medicines {
        reply.push_str(&format!("- {} at {}\n", m.medicine_name, m.timing));
    }
    Ok(reply)
}

/// Resolve the patient named in the message and format their info
fn with_patient(
    r: &Responder,
    db: &ClinicDb,
    q: &Query<'_>,
    render: impl FnOnce(PatientInfo) -> String,
) -> String {
    let Some(name) = r.names().extract(q.original, &db.users) else {
        return ASK_FOR_NAME.to_string();
    };

    match db.patient_info_by_name(&name) {
        Some(info) => render(info),
        None => not_found(&name),
    }
}

fn patient_id_for(db: &ClinicDb, name: &str) -> Option<u32> {
    let user = db.find_user_by_name(name)?;
    db.profile_for_user(user.user_id).map(|p| p.patient_id)
}

fn not_found(name: &str) -> String {
    format!("No profile found for {name}.")
}
