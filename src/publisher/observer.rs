use std::io::{self, Stdout, Write};

use log::error;

/// Receives progress notifications while a batch is published.
pub trait ProgressObserver {
    fn published(&mut self, sequence: u32);
    fn done(&mut self);
}

/// Prints `Published message N` and `Done!` lines, to stdout by default.
pub struct ConsoleObserver<W: Write = Stdout> {
    writer: W,
}

impl ConsoleObserver<Stdout> {
    pub fn new() -> Self {
        Self {
            writer: io::stdout(),
        }
    }
}

impl Default for ConsoleObserver<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleObserver<W> {
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &str) {
        let result = writeln!(self.writer, "{}", line).and_then(|_| self.writer.flush());
        if let Err(err) = result {
            error!(target: "app", "write_line - cannot write progress line. Err = {:?}", err);
        }
    }
}

impl<W: Write> ProgressObserver for ConsoleObserver<W> {
    fn published(&mut self, sequence: u32) {
        self.write_line(&format!("Published message {}", sequence));
    }

    fn done(&mut self) {
        self.write_line("Done!");
    }
}

#[cfg(test)]
mod tests {
    use crate::publisher::observer::{ConsoleObserver, ProgressObserver};
    use pretty_assertions::assert_eq;

    #[test]
    fn check_console_lines() {
        let mut observer = ConsoleObserver::with_writer(Vec::<u8>::new());
        observer.published(1);
        observer.published(2);
        observer.done();
        let output = String::from_utf8(observer.into_inner()).unwrap();
        assert_eq!(output, "Published message 1\nPublished message 2\nDone!\n");
    }
}
