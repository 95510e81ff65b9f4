use crate::domain::Logger;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Interactive `Logger`: prints to a writer and reads y/N answers from a
/// reader. With `no_confirm` every prompt is answered yes without asking.
pub struct TerminalLogger<W, R> {
    io: Mutex<Terminal<W, R>>,
    no_confirm: bool,
}

struct Terminal<W, R> {
    writer: W,
    reader: R,
}

impl TerminalLogger<Stdout, BufReader<Stdin>> {
    pub fn stdio(no_confirm: bool) -> Self {
        Self::new(io::stdout(), BufReader::new(io::stdin()), no_confirm)
    }
}

impl<W: Write, R: BufRead> TerminalLogger<W, R> {
    pub fn new(writer: W, reader: R, no_confirm: bool) -> Self {
        Self {
            io: Mutex::new(Terminal { writer, reader }),
            no_confirm,
        }
    }

    pub fn into_writer(self) -> W {
        self.io
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .writer
    }

    fn terminal(&self) -> MutexGuard<'_, Terminal<W, R>> {
        self.io.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send, R: BufRead + Send> Logger for TerminalLogger<W, R> {
    fn prompt(&self, message: &str) -> bool {
        if self.no_confirm {
            return true;
        }

        let mut terminal = self.terminal();
        let asked = write!(terminal.writer, "{message} (y/N): ")
            .and_then(|_| terminal.writer.flush());
        if asked.is_err() {
            return false;
        }

        let mut answer = String::new();
        match terminal.reader.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }

    fn print(&self, message: &str) {
        let mut terminal = self.terminal();
        let _ = terminal
            .writer
            .write_all(message.as_bytes())
            .and_then(|_| terminal.writer.flush());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger(input: &'static str, no_confirm: bool) -> TerminalLogger<Vec<u8>, &'static [u8]> {
        TerminalLogger::new(Vec::new(), input.as_bytes(), no_confirm)
    }

    fn written(logger: TerminalLogger<Vec<u8>, &'static [u8]>) -> String {
        String::from_utf8(logger.into_writer()).unwrap()
    }

    #[test]
    fn test_prompt_accepts_yes() {
        for answer in ["y\n", "yes\n", "Y\n", "YES\n", "  yes  \n"] {
            let logger = logger(answer, false);
            assert!(logger.prompt("Are you sure?"), "answer {answer:?}");
        }
    }

    #[test]
    fn test_prompt_rejects_anything_else() {
        for answer in ["n\n", "no\n", "\n", "yep\n", ""] {
            let logger = logger(answer, false);
            assert!(!logger.prompt("Are you sure?"), "answer {answer:?}");
        }
    }

    #[test]
    fn test_prompt_writes_question() {
        let logger = logger("y\n", false);
        logger.prompt("Are you sure you want to delete instance profile banana?");
        assert_eq!(
            written(logger),
            "Are you sure you want to delete instance profile banana? (y/N): "
        );
    }

    #[test]
    fn test_no_confirm_answers_yes_silently() {
        let logger = logger("", true);
        assert!(logger.prompt("Are you sure?"));
        assert_eq!(written(logger), "");
    }

    #[test]
    fn test_prompts_consume_one_line_each() {
        let logger = logger("y\nn\ny\n", false);
        assert!(logger.prompt("first"));
        assert!(!logger.prompt("second"));
        assert!(logger.prompt("third"));
    }

    #[test]
    fn test_print_writes_verbatim() {
        let logger = logger("", false);
        logger.print("SUCCESS deleting instance profile banana\n");
        logger.print("[volume: vol-1]\n");
        assert_eq!(
            written(logger),
            "SUCCESS deleting instance profile banana\n[volume: vol-1]\n"
        );
    }
}
