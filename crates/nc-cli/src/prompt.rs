//! Interactive prompts: the no-argument menu and the pre-run confirmation.
//!
//! [`Prompter`] is generic over its input and output so the same code runs
//! against the terminal and against in-memory buffers in tests. An empty
//! answer (or end of input) selects the default wherever one exists.

use std::io::{self, BufRead, Write};

use camino::{Utf8Path, Utf8PathBuf};

/// Answers collected by the interactive menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveChoices {
    /// Directory to scan, as typed.
    pub path: Utf8PathBuf,
    /// Whether to only report targets.
    pub dry_run: bool,
    /// Number of deletion workers.
    pub workers: usize,
}

/// Line-oriented question/answer helper.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter reading answers from `input` and writing to `output`.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Runs the full menu: path, mode, then worker count.
    ///
    /// `cpus` sets the default worker count and the upper bound (`2 * cpus`).
    pub fn interactive_menu(&mut self, cpus: usize) -> io::Result<InteractiveChoices> {
        writeln!(self.output, "Node Modules Cleaner - Interactive Mode")?;
        writeln!(self.output, "=======================================")?;
        writeln!(self.output)?;

        let path = self.ask_path()?;
        let dry_run = self.ask_mode()?;
        let workers = self.ask_workers(cpus)?;

        writeln!(self.output, "Selected: {workers} workers")?;
        writeln!(self.output)?;

        Ok(InteractiveChoices {
            path,
            dry_run,
            workers,
        })
    }

    /// Asks for the directory to scan until an existing path is given.
    pub fn ask_path(&mut self) -> io::Result<Utf8PathBuf> {
        loop {
            let answer = self.ask("Enter the path to scan (or '.' for current directory): ")?;
            let path = match answer.as_deref() {
                None | Some("") => Utf8PathBuf::from("."),
                Some(typed) => Utf8PathBuf::from(typed),
            };

            if path.exists() {
                return Ok(path);
            }

            writeln!(self.output, "Path does not exist: {path}")?;
            if answer.is_none() {
                return Err(unexpected_eof());
            }
            writeln!(self.output, "Please try again.")?;
        }
    }

    /// Asks for the run mode. Returns `true` for a dry run (the default).
    pub fn ask_mode(&mut self) -> io::Result<bool> {
        loop {
            let answer = self.ask("Mode - (1) Dry Run [Preview only] or (2) Real Delete [1/2]: ")?;
            match answer.as_deref() {
                None | Some("" | "1") => {
                    writeln!(self.output, "Selected: Dry Run (Preview mode)")?;
                    return Ok(true);
                }
                Some("2") => {
                    writeln!(self.output, "Selected: Real Delete mode")?;
                    return Ok(false);
                }
                Some(_) => writeln!(self.output, "Please enter 1 or 2")?,
            }
        }
    }

    /// Asks for the worker count in `1..=2 * cpus`, defaulting to `cpus`.
    pub fn ask_workers(&mut self, cpus: usize) -> io::Result<usize> {
        let cpus = cpus.max(1);
        let max = cpus * 2;

        loop {
            let answer = self.ask(&format!("Number of workers (1-{max}) [default {cpus}]: "))?;
            let Some(typed) = answer.filter(|a| !a.is_empty()) else {
                return Ok(cpus);
            };

            match typed.parse::<usize>() {
                Ok(n) if (1..=max).contains(&n) => return Ok(n),
                _ => writeln!(self.output, "Please enter a number between 1 and {max}")?,
            }
        }
    }

    /// Asks the user to confirm the run.
    ///
    /// A dry run only waits for Enter. A real run proceeds only if the answer
    /// is exactly `yes`.
    pub fn confirm(&mut self, root: &Utf8Path, dry_run: bool) -> io::Result<bool> {
        if dry_run {
            writeln!(self.output, "DRY RUN MODE - NO ACTUAL DELETION")?;
            self.ask("Press Enter to continue...")?;
            return Ok(true);
        }

        writeln!(
            self.output,
            "WARNING: You are about to delete ALL node_modules directories in {root}"
        )?;
        let answer = self.ask("Type 'yes' to confirm: ")?;
        Ok(answer.as_deref() == Some("yes"))
    }

    /// Waits for Enter before the program exits.
    pub fn pause(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        self.ask("Press Enter to exit...")?;
        Ok(())
    }

    /// Writes `question` and reads one trimmed line; `None` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }
}

fn unexpected_eof() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: &Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8_lossy(&p.output).into_owned()
    }

    #[test]
    fn test_menu_defaults() {
        let mut p = prompter("\n\n\n");
        let choices = p.interactive_menu(4).unwrap();

        assert_eq!(
            choices,
            InteractiveChoices {
                path: Utf8PathBuf::from("."),
                dry_run: true,
                workers: 4,
            }
        );
        assert!(output(&p).contains("Selected: Dry Run"));
    }

    #[test]
    fn test_menu_defaults_on_closed_input() {
        let mut p = prompter("");
        let choices = p.interactive_menu(2).unwrap();

        assert!(choices.dry_run);
        assert_eq!(choices.workers, 2);
    }

    #[test]
    fn test_ask_path_reprompts_until_it_exists() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().to_str().unwrap().to_owned();
        let mut p = prompter(&format!("/definitely/not/here\n{existing}\n"));

        let path = p.ask_path().unwrap();

        assert_eq!(path.as_str(), existing);
        let out = output(&p);
        assert!(out.contains("Path does not exist: /definitely/not/here"));
        assert!(out.contains("Please try again."));
    }

    #[test]
    fn test_ask_path_closed_input_falls_back_to_current_dir() {
        let mut p = prompter("/definitely/not/here\n");
        let path = p.ask_path().unwrap();
        assert_eq!(path, Utf8PathBuf::from("."));
    }

    #[test]
    fn test_ask_mode() {
        assert!(prompter("1\n").ask_mode().unwrap());
        assert!(!prompter("2\n").ask_mode().unwrap());

        let mut p = prompter("x\n3\n2\n");
        assert!(!p.ask_mode().unwrap());
        assert_eq!(output(&p).matches("Please enter 1 or 2").count(), 2);
    }

    #[test]
    fn test_ask_workers_bounds() {
        assert_eq!(prompter("8\n").ask_workers(4).unwrap(), 8);
        assert_eq!(prompter("1\n").ask_workers(4).unwrap(), 1);

        let mut p = prompter("0\n9\nabc\n3\n");
        assert_eq!(p.ask_workers(4).unwrap(), 3);
        assert_eq!(
            output(&p).matches("Please enter a number between 1 and 8").count(),
            3
        );
    }

    #[test]
    fn test_confirm_real_run_requires_yes() {
        let root = Utf8Path::new("/projects");

        assert!(prompter("yes\n").confirm(root, false).unwrap());
        assert!(!prompter("y\n").confirm(root, false).unwrap());
        assert!(!prompter("YES\n").confirm(root, false).unwrap());
        assert!(!prompter("").confirm(root, false).unwrap());

        let mut p = prompter("no\n");
        p.confirm(root, false).unwrap();
        assert!(output(&p).contains("delete ALL node_modules directories in /projects"));
    }

    #[test]
    fn test_confirm_dry_run_only_waits() {
        let mut p = prompter("whatever\n");
        assert!(p.confirm(Utf8Path::new("/projects"), true).unwrap());
        assert!(output(&p).starts_with("DRY RUN MODE"));
    }

    #[test]
    fn test_pause() {
        let mut p = prompter("");
        p.pause().unwrap();
        assert!(output(&p).ends_with("Press Enter to exit..."));
    }
}
