mod io;
mod state;
mod store;
mod types;

use std::io::{BufRead, Write};
use tracing::{debug, info};

fn init_tracing() {
    // stdout carries the query answers, so logs go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let stderr = std::io::stderr();

    if let Err(err) = run(stdin.lock(), stdout.lock(), stderr.lock()) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run<R: BufRead, W: Write, E: Write>(
    input: R,
    output: W,
    diagnostics: E,
) -> anyhow::Result<state::Summary> {
    let mut state = state::State::default();
    let mut records_out = io::RecordWriter::new(output);
    let mut errors_out = io::DiagnosticWriter::new(diagnostics);

    for line in io::LineReader::new(input) {
        match state.process(&line.text, &mut records_out) {
            Ok(()) => {}
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => {
                debug!(line = line.number, %err, "rejected input line");
                errors_out.report(&line)?;
            }
        }
    }

    records_out.flush()?;

    let ended_in = state.phase();
    let summary = state.finish();
    info!(
        phase = ?ended_in,
        records = summary.records,
        queries = summary.queries,
        matches = summary.matches,
        rejected = summary.rejected,
        "input exhausted"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::state::Summary;
    use std::io::Cursor;

    fn run_str(input: &str) -> (Summary, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = run(Cursor::new(input.as_bytes()), &mut out, &mut err).unwrap();

        (
            summary,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_basic_example() {
        let (_, out, err) = run_str(
            "Penny Black 1.50 1840 London\n\
             Blue Mauritius 2,00 1847 PortLouis\n\
             1840 1847\n",
        );

        assert_eq!(
            out,
            "1840 London 1.50 Penny Black\n1847 PortLouis 2,00 Blue Mauritius\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn test_inverted_range_example() {
        let (summary, out, err) = run_str("Old Stamp 3,20 1900 Vienna\n1950 1840\n");

        assert!(out.is_empty());
        assert_eq!(err, "Error in line 2:1950 1840\n");
        assert_eq!(summary.queries, 0);
    }

    #[test]
    fn test_no_queries() {
        let (summary, out, err) = run_str("Penny Black 1.50 1840 London\nrubbish\n");

        assert!(out.is_empty());
        assert_eq!(err, "Error in line 2:rubbish\n");
        assert_eq!(summary.records, 1);
        assert_eq!(summary.queries, 0);

        let (summary, out, err) = run_str("");
        assert_eq!(summary, Summary::default());
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn test_line_numbers_and_original_text() {
        let (summary, out, err) = run_str(
            "Penny Black 1.50 1840 London\n\
             ???\n\
             Two   Penny\tBlue 2 1840 London\n\
             \t1840   1840 \n\
             1841 1840\n\
             0001 1840\n\
             Penny Black 1.50 1840 London\n\
             1 9999\n",
        );

        assert_eq!(
            out,
            "1840 London 1.50 Penny Black\n\
             1840 London 2 Two Penny Blue\n\
             1840 London 1.50 Penny Black\n\
             1840 London 2 Two Penny Blue\n"
        );
        assert_eq!(
            err,
            "Error in line 2:???\n\
             Error in line 5:1841 1840\n\
             Error in line 6:0001 1840\n\
             Error in line 7:Penny Black 1.50 1840 London\n"
        );
        assert_eq!(
            summary,
            Summary {
                records: 2,
                queries: 2,
                matches: 4,
                rejected: 4
            }
        );
    }

    #[test]
    fn test_rejected_count_matches_diagnostics() {
        let input = "a\n\
                     Stamp 1 1900 X\n\
                     b c\n\
                     Stamp 2 1950 Y\n\
                     1900 1949\n\
                     1949 1900\n\
                     0 1\n\
                     \n\
                     1900 1950\n\
                     19000 1\n";
        let (summary, out, err) = run_str(input);

        assert_eq!(err.lines().count(), summary.rejected);
        assert_eq!(summary.rejected, 6);
        assert_eq!(out.lines().count(), summary.matches);
        assert_eq!(
            out,
            "1900 X 1 Stamp\n\
             1900 X 1 Stamp\n\
             1950 Y 2 Stamp\n"
        );
    }

    #[test]
    fn test_crlf_input() {
        let (summary, out, err) = run_str(
            "Penny Black 1.50 1840 London\r\n\
             junk\r\n\
             1840 1840\r\n\
             1950 1840\r\n",
        );

        assert_eq!(out, "1840 London 1.50 Penny Black\n");
        // Rejected lines are echoed exactly as read, carriage return included
        assert_eq!(err, "Error in line 2:junk\r\nError in line 4:1950 1840\r\n");
        assert_eq!(summary.rejected, 2);
    }

    #[test]
    fn test_numbers_in_office() {
        let (_, out, err) = run_str("Street 1.50 1840 Main 5 10 North\n1 9999\n");

        assert_eq!(out, "1840 Main 5 10 North 1.50 Street\n");
        assert!(err.is_empty());
    }
}
