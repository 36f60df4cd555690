//! Console output for probe runs
//!
//! [`ProbeFormatter`] builds the text, [`ConsoleReporter`] writes it as
//! outcomes arrive from the scheduler.

mod colored;
mod formatter;
mod verbose;

pub use colored::{paint, Tone};
pub use formatter::{format_statistics, ProbeFormatter, TargetLabel};
pub use verbose::{canonical_header_name, http_details};

use crate::{executor::ProbeObserver, models::ProbeOutcome};
use std::io::Write;
use std::sync::Mutex;

/// Writes probe lines to a terminal or any other writer
pub struct ConsoleReporter {
    formatter: ProbeFormatter,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    pub fn with_writer(formatter: ProbeFormatter, out: Box<dyn Write + Send>) -> Self {
        Self {
            formatter,
            out: Mutex::new(out),
        }
    }

    /// Output is best effort, a closed pipe must not stop the run
    pub fn print(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl ProbeObserver for ConsoleReporter {
    fn on_outcome(&self, outcome: &ProbeOutcome) {
        self.print(&self.formatter.format_outcome(outcome));
    }

    fn on_cancelled(&self, _outcome: &ProbeOutcome) {
        self.print(&self.formatter.format_cancelled());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use std::io;
    use std::sync::Arc;

    /// Writer whose contents stay readable after being boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_reporter_writes_outcomes_in_order() {
        let buffer = SharedBuffer::default();
        let label = TargetLabel::Tcp {
            ip: "127.0.0.1".into(),
            dial_host: "127.0.0.1".into(),
            port: 8080,
        };
        let reporter = ConsoleReporter::with_writer(
            ProbeFormatter::new(label, false, false),
            Box::new(buffer.clone()),
        );

        reporter.on_outcome(&ProbeOutcome::tcp_success(0, 1.0, None));
        reporter.on_outcome(&ProbeOutcome::failure(1, 2.0, ProbeError::Connect("refused".into())));
        reporter.on_cancelled(&ProbeOutcome::cancelled(2, 0.5));

        assert_eq!(
            buffer.text(),
            "Response from 127.0.0.1:8080: seq=0 time=1.00ms\n\
             TCP connection failed 127.0.0.1:8080: seq=1 error=refused\n\
             \nOperation interrupted, connection attempt aborted\n"
        );
    }
}
