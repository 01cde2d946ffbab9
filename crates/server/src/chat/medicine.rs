//! Parsing of "add <medicine> at <time> for <name>" messages

/// Reply for an add command that could not be understood
pub const USAGE_HINT: &str = "Use: add Paracetamol at 6 PM for Sasmita";

/// Medicine and timing taken from an add command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMedicine {
    /// Title-cased medicine name
    pub medicine: String,
    /// Timing in the user's own casing, e.g. "6 PM"
    pub timing: String,
}

/// Parse the medicine and timing out of an add command.
///
/// The medicine is every word between the first `add` and the following `at`;
/// the timing runs from after `at` up to an optional `for` clause. Returns
/// `None` when either part is missing or empty. The patient name is found
/// separately.
pub fn parse(text: &str) -> Option<AddMedicine> {
    let words: Vec<&str> = text.split_whitespace().collect();

    let add = words.iter().position(|w| w.eq_ignore_ascii_case("add"))?;
    let at = add + 1 + words[add + 1..].iter().position(|w| w.eq_ignore_ascii_case("at"))?;

    let medicine_words = &words[add + 1..at];
    let rest = &words[at + 1..];
    let timing_words = match rest.iter().position(|w| w.eq_ignore_ascii_case("for")) {
        Some(end) => &rest[..end],
        None => rest,
    };

    if medicine_words.is_empty() || timing_words.is_empty() {
        return None;
    }

    Some(AddMedicine {
        medicine: medicine_words
            .iter()
            .map(|w| title_case(w))
            .collect::<Vec<_>>()
            .join(" "),
        timing: timing_words.join(" "),
    })
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command() {
        assert_eq!(
            parse("add Paracetamol at 6 PM for Sasmita"),
            Some(AddMedicine {
                medicine: "Paracetamol".to_string(),
                timing: "6 PM".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_title_cases_medicine_and_keeps_timing() {
        assert_eq!(
            parse("please ADD vitamin d3 AT 8:30 am"),
            Some(AddMedicine {
                medicine: "Vitamin D3".to_string(),
                timing: "8:30 am".to_string(),
            })
        );
    }

    #[test]
    fn test_medicine_names_containing_at_are_kept_whole() {
        let parsed = parse("add atorvastatin at night for Rahul").unwrap();
        assert_eq!(parsed.medicine, "Atorvastatin");
        assert_eq!(parsed.timing, "night");
    }

    #[test]
    fn test_parse_rejects_incomplete_commands() {
        assert_eq!(parse("add at 6 PM for Sasmita"), None);
        assert_eq!(parse("add Paracetamol at for Sasmita"), None);
        assert_eq!(parse("add Paracetamol for Sasmita"), None);
        assert_eq!(parse("what is the date today"), None);
    }
}
