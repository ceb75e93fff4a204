//! Terminal confirmation prompts

use kdev_engine::Prompt;
use std::cell::RefCell;
use std::io::{BufRead, Write};

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Reads the answer from process stdin
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [y/N]: ", question);
        let _ = std::io::stdout().flush();
        let mut answer = String::new();
        match std::io::stdin().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }
}

/// Reads the answer from the menu's own input stream
pub struct LinePrompt<'a, R, W> {
    pub input: &'a RefCell<R>,
    pub output: &'a RefCell<W>,
}

impl<R: BufRead, W: Write> Prompt for LinePrompt<'_, R, W> {
    fn confirm(&self, question: &str) -> bool {
        if let Ok(mut out) = self.output.try_borrow_mut() {
            let _ = write!(out, "{} [y/N]: ", question);
            let _ = out.flush();
        }
        let mut answer = String::new();
        match self.input.try_borrow_mut() {
            Ok(mut input) => match input.read_line(&mut answer) {
                Ok(0) | Err(_) => false,
                Ok(_) => is_yes(&answer),
            },
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_yes_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_line_prompt_reads_shared_input() {
        let input = RefCell::new(Cursor::new(b"y\nn\n".to_vec()));
        let output = RefCell::new(Vec::new());
        let prompt = LinePrompt {
            input: &input,
            output: &output,
        };
        assert!(prompt.confirm("Delete?"));
        assert!(!prompt.confirm("Delete?"));
        assert!(!prompt.confirm("Delete?"));
        let shown = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(shown.matches("Delete? [y/N]: ").count(), 3);
    }
}
