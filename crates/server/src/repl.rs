//! Line-oriented interactive chat

use std::io::{self, BufRead, Write};

use crate::chat::Responder;

pub const BANNER: &str = "Medication Tracker Chatbot (type 'quit' to stop)";
pub const FAREWELL: &str = "Take care! Stay healthy.";
const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Read messages line by line and answer each until `quit` or end of input
pub fn run<R: BufRead, W: Write>(responder: &Responder, input: R, mut output: W) -> io::Result<()> {
    writeln!(output, "{BANNER}")?;
    let mut lines = input.lines();

    loop {
        write!(output, "You: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            return Ok(());
        };
        let line = line?;

        if line.trim().eq_ignore_ascii_case("quit") {
            writeln!(output, "Bot: {FAREWELL}")?;
            return Ok(());
        }

        match responder.respond(&line) {
            Ok(reply) => writeln!(output, "Bot: {reply}")?,
            Err(e) => {
                tracing::error!(error = %e, "Failed to answer message");
                writeln!(output, "Bot: {APOLOGY}")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clinic_core::{ClinicDb, ClinicError, IntentCorpus, User};

    use super::*;
    use crate::db::{ClinicRepository, InMemoryRepository};

    fn transcript(responder: &Responder, input: &str) -> String {
        let mut output = Vec::new();
        run(responder, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    fn responder() -> Responder {
        let db = ClinicDb {
            users: vec![
                User {
                    user_id: 1,
                    name: "Sasmita".to_string(),
                },
                User {
                    user_id: 2,
                    name: "Rahul".to_string(),
                },
            ],
            ..ClinicDb::default()
        };
        Responder::new(
            Arc::new(InMemoryRepository::new(db)),
            IntentCorpus::builtin().unwrap(),
        )
    }

    #[test]
    fn test_answers_until_quit() {
        let out = transcript(&responder(), "how many patients\nQUIT\nnever read\n");

        assert_eq!(
            out,
            format!(
                "{BANNER}\nYou: Bot: There are currently 2 patients registered in the system.\nYou: Bot: {FAREWELL}\n"
            )
        );
    }

    #[test]
    fn test_stops_at_end_of_input() {
        let out = transcript(&responder(), "zzz");

        assert_eq!(
            out,
            format!("{BANNER}\nYou: Bot: Sorry, I didn't understand that.\nYou: \n")
        );
    }

    struct BrokenStore;

    impl ClinicRepository for BrokenStore {
        fn load(&self) -> Result<ClinicDb, ClinicError> {
            Err(ClinicError::Store("disk on fire".to_string()))
        }

        fn save(&self, _: &ClinicDb) -> Result<(), ClinicError> {
            Err(ClinicError::Store("disk on fire".to_string()))
        }
    }

    #[test]
    fn test_store_failure_keeps_prompt_alive() {
        let responder = Responder::new(Arc::new(BrokenStore), IntentCorpus::default());
        let out = transcript(&responder, "hello\nquit\n");

        assert_eq!(
            out,
            format!("{BANNER}\nYou: Bot: {APOLOGY}\nYou: Bot: {FAREWELL}\n")
        );
    }
}
