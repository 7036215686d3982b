/// Destination for decoder warnings and driver progress.
///
/// The decoders never fail a run; everything wrong with a single log line
/// is reported here instead. Keeping the console behind this seam lets
/// tests run silent and callers capture output.
pub trait Report {
    /// A problem with one log line. `line_number` is 1-based.
    fn warn(&mut self, line_number: usize, message: &str);

    /// Progress chatter.
    fn info(&mut self, message: &str);
}

/// Warnings on stderr, progress on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleReport;

impl Report for ConsoleReport {
    fn warn(&mut self, line_number: usize, message: &str) {
        eprintln!("Warning: line {}: {}", line_number, message);
    }

    fn info(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Buffers everything it is given, for tests and quiet embedding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedReport {
    pub warnings: Vec<(usize, String)>,
    pub infos: Vec<String>,
}

impl RecordedReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Report for RecordedReport {
    fn warn(&mut self, line_number: usize, message: &str) {
        self.warnings.push((line_number, message.to_owned()));
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_owned());
    }
}
