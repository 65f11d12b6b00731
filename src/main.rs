use std::error::Error;
use std::io::{self, stdin, Write};

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::tty::IsTty;

use keydrill::charset::{self, CharClass};
use keydrill::drill::Drill;
use keydrill::input::{run, CrosstermKeySource, Feedback, SessionEnd};
use keydrill::report::{JsonFileSink, RecordSink};
use keydrill::sequence;

/// command-line typing trainer over a randomized character sequence
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Presents the characters of the chosen classes in random order, one at a \
                  time. Type the shown key to advance; Esc aborts. A JSON report of every \
                  keystroke is written when the sequence is completed."
)]
struct Cli {
    /// character classes to practice, comma-separated (symbol, number, alphabet)
    #[clap(value_delimiter = ',', default_value = "symbol")]
    classes: Vec<CharClass>,

    /// directory session reports are written to
    #[clap(short = 'd', long, default_value = "records")]
    data_dir: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let pool = charset::extract(&cli.classes);
    let sequence = sequence::shuffle(&mut rand::thread_rng(), &pool);
    let drill = Drill::new(&sequence);
    let sink = JsonFileSink::new(&cli.data_dir);

    enable_raw_mode()?;
    let source = CrosstermKeySource::new();
    let end = run(drill, &source, &mut print_feedback);
    disable_raw_mode()?;

    if let SessionEnd::Completed(records) = end {
        let path = sink.save(&records, chrono::Local::now())?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}

/// Console rendering of the session protocol. Raw mode needs explicit
/// carriage returns.
fn print_feedback(feedback: Feedback) {
    match feedback {
        Feedback::Start(next) => print!("Start!\r\nKey: {}\r\n", next),
        Feedback::Graded(status, next) => print!("{}\r\nKey: {}\r\n", status, next),
        Feedback::End => print!("End\r\n"),
    }
    let _ = io::stdout().flush();
}
