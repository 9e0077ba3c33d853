use clap::Parser;
use tokio::io::AsyncBufReadExt as _;
use vidlookup::extractors::supported_platforms;
use vidlookup::flow::LookupFlow;
use vidlookup::logger;
use vidlookup::lookup::{LookupService, MockLookup};
use vidlookup::opener::{Opener, RecordingOpener, SystemOpener};
use vidlookup::render::{Screen, TerminalScreen};

pub(crate) mod cli;

enum Input {
    Line(std::io::Result<Option<String>>),
    NoticeExpired,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse arguments
    let args = cli::Args::parse();

    // Set up logger
    if let Err(err) = logger::init(args.debug) {
        eprintln!("Failed to set up logger: {err}");
    }

    let service = MockLookup::new(args.lookup_delay());
    let opener: Box<dyn Opener> = if args.dry_run {
        Box::new(RecordingOpener::default())
    } else {
        Box::new(SystemOpener::new(args.debug))
    };
    let screen = TerminalScreen::new(args.json);
    let mut flow = LookupFlow::new(service, opener, screen, args.flow_config());

    let should_error_quit = match args.url.as_deref() {
        Some(url) => run_once(&mut flow, url, args.select.map(|n| n.get() - 1)).await,
        None => run_interactive(&mut flow).await,
    };

    if should_error_quit {
        std::process::exit(1);
    }
}

async fn run_once<S: LookupService, O: Opener, D: Screen>(
    flow: &mut LookupFlow<S, O, D>,
    url: &str,
    select: Option<usize>,
) -> bool {
    if let Err(err) = flow.submit_lookup(url).await {
        log::debug!("Lookup ended with: {:?}", err);
        return true;
    }

    if let Some(index) = select {
        if let Err(err) = flow.select_format(index) {
            log::error!("{}", err.user_message());
            return true;
        }
    }

    false
}

async fn run_interactive<S: LookupService, O: Opener, D: Screen>(flow: &mut LookupFlow<S, O, D>) -> bool {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    log::info!(
        "Enter a video URL per line ({}), or a format number to open it",
        supported_platforms().join(", ")
    );

    loop {
        let notice_pending = flow.notice_deadline().is_some();
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line),
            _ = flow.expire_notice(), if notice_pending => Input::NoticeExpired,
        };

        let line = match input {
            Input::NoticeExpired => continue,
            Input::Line(Ok(Some(line))) => line,
            Input::Line(Ok(None)) => break,
            Input::Line(Err(err)) => {
                log::error!("Failed to read from stdin: {}", err);
                return true;
            }
        };

        let selection = line
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&number| number > 0 && flow.state().result.is_some());

        match selection {
            Some(number) => {
                if let Err(err) = flow.select_format(number - 1) {
                    log::warn!("{}", err.user_message());
                }
            }
            None => {
                if let Err(err) = flow.submit_lookup(&line).await {
                    log::debug!("Lookup ended with: {:?}", err);
                }
            }
        }
    }

    false
}
