//! Interactive menu
//!
//! Category list, then verbs in the category, then one prompt per argument.
//! Every choice goes through the same router as argv invocations. Errors are
//! shown and the menu resumes; `q` or end of input leaves.

use crate::prompt::LinePrompt;
use crate::session::Session;
use kdev_core::errors::Result;
use kdev_core::router::{ArgDefault, Category, VerbEntry};
use kdev_engine::CommandOutcome;
use std::cell::RefCell;
use std::io::{BufRead, BufReader, Write};

enum Choice<T> {
    Pick(T),
    Back,
    Quit,
}

struct Menu<'s, 'a, R, W> {
    session: &'s Session<'a>,
    input: RefCell<R>,
    output: RefCell<W>,
}

impl<'s, 'a, R: BufRead, W: Write> Menu<'s, 'a, R, W> {
    fn say(&self, text: &str) {
        if let Ok(mut out) = self.output.try_borrow_mut() {
            let _ = writeln!(out, "{}", text);
        }
    }

    /// `None` at end of input
    fn ask(&self, label: &str) -> Option<String> {
        if let Ok(mut out) = self.output.try_borrow_mut() {
            let _ = write!(out, "{}", label);
            let _ = out.flush();
        }
        let mut line = String::new();
        match self.input.try_borrow_mut().ok()?.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    fn choose<T: Copy>(&self, items: &[(T, String)], allow_back: bool) -> Choice<T> {
        for (i, (_, label)) in items.iter().enumerate() {
            self.say(&format!("{:>3}) {}", i + 1, label));
        }
        if allow_back {
            self.say("  b) Back");
        }
        self.say("  q) Quit");

        loop {
            let Some(answer) = self.ask("Select: ") else {
                return Choice::Quit;
            };
            match answer.as_str() {
                "q" | "Q" => return Choice::Quit,
                "b" | "B" if allow_back => return Choice::Back,
                _ => {}
            }
            match answer.parse::<usize>() {
                Ok(n) if n >= 1 && n <= items.len() => return Choice::Pick(items[n - 1].0),
                _ => self.say(&format!("Invalid choice '{}'", answer)),
            }
        }
    }

    /// Collect positional arguments; stops at the first blank optional
    fn collect_args(&self, entry: &VerbEntry) -> Option<Vec<String>> {
        let mut args = Vec::new();
        for spec in entry.args {
            let hint = match spec.default {
                ArgDefault::Required => String::new(),
                ArgDefault::Value(d) => format!(" [{}]", d),
                ArgDefault::Contextual => " [default]".to_string(),
            };
            let value = self.ask(&format!("{}{}: ", spec.name, hint))?;
            if value.is_empty() {
                break;
            }
            if spec.variadic {
                args.extend(value.split_whitespace().map(str::to_string));
            } else {
                args.push(value);
            }
        }
        Some(args)
    }

    fn run(&self) -> Result<()> {
        let router = self.session.router();
        let categories: Vec<(Category, String)> = Category::ALL
            .into_iter()
            .filter(|c| router.verbs_in(*c).next().is_some())
            .map(|c| (c, c.title().to_string()))
            .collect();

        loop {
            self.say("\nkdev - local Kubernetes development");
            let category = match self.choose(&categories, false) {
                Choice::Pick(c) => c,
                Choice::Back | Choice::Quit => return Ok(()),
            };

            let entries: Vec<&VerbEntry> = router.verbs_in(category).collect();
            let items: Vec<(usize, String)> = entries
                .iter()
                .enumerate()
                .map(|(i, e)| (i, format!("{:<40} {}", e.usage(), e.summary)))
                .collect();
            self.say(&format!("\n{}", category.title()));
            let entry = match self.choose(&items, true) {
                Choice::Pick(i) => entries[i],
                Choice::Back => continue,
                Choice::Quit => return Ok(()),
            };

            let Some(args) = self.collect_args(entry) else {
                return Ok(());
            };

            let prompt = LinePrompt {
                input: &self.input,
                output: &self.output,
            };
            match self.session.execute(&entry.verb, &args, &prompt) {
                Ok(CommandOutcome::MenuRequested) => self.say("Already in the menu"),
                Ok(_) => {}
                Err(e) => self.session.reporter().error(&e.to_string()),
            }
        }
    }
}

/// Run the menu over arbitrary streams
///
/// # Errors
///
/// None at present; command errors are shown and the menu continues.
pub fn run<R: BufRead, W: Write>(session: &Session, input: R, output: W) -> Result<()> {
    Menu {
        session,
        input: RefCell::new(input),
        output: RefCell::new(output),
    }
    .run()
}

/// Run the menu on the terminal
///
/// Stdin is not locked for the whole session so the monitor's quit watcher
/// can read from it.
///
/// # Errors
///
/// See [`run`].
pub fn run_stdio(session: &Session) -> Result<()> {
    run(session, BufReader::new(std::io::stdin()), std::io::stdout())
}
