use std::cell::RefCell;
use std::process::Stdio;

use anyhow::Context;

/// Capability to hand a URL to something outside the program.
pub trait Opener {
    fn open_external(&self, url: &str) -> Result<(), anyhow::Error>;
}

impl<T: Opener + ?Sized> Opener for Box<T> {
    fn open_external(&self, url: &str) -> Result<(), anyhow::Error> {
        (**self).open_external(url)
    }
}

/// Opens URLs with the desktop's default handler, without waiting for it.
pub struct SystemOpener {
    debug: bool,
}

impl SystemOpener {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl Opener for SystemOpener {
    fn open_external(&self, url: &str) -> Result<(), anyhow::Error> {
        let (program, args) = opener_command();
        let mut cmd = tokio::process::Command::new(program);

        if !self.debug {
            cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
        }

        log::debug!("Running {} {:?} {}", program, args, url);

        cmd.args(args)
            .arg(url)
            .spawn()
            .map(|_| ())
            .with_context(|| format!("failed to start {program}"))
    }
}

fn opener_command() -> (&'static str, &'static [&'static str]) {
    const NO_ARGS: &[&str] = &[];
    // No shell in between, the url is passed as a single argument.
    const WINDOWS_URL_HANDLER: &[&str] = &["url.dll,FileProtocolHandler"];

    if cfg!(target_os = "macos") {
        ("open", NO_ARGS)
    } else if cfg!(windows) {
        ("rundll32", WINDOWS_URL_HANDLER)
    } else {
        ("xdg-open", NO_ARGS)
    }
}

/// Remembers every URL instead of opening it.
#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: RefCell<Vec<String>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Opener for RecordingOpener {
    fn open_external(&self, url: &str) -> Result<(), anyhow::Error> {
        log::info!("Would open: {}", url);
        self.opened.borrow_mut().push(url.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{opener_command, Opener, RecordingOpener};

    #[test]
    fn test_recording_opener() {
        let opener: Box<dyn Opener> = Box::new(RecordingOpener::default());
        opener.open_external("https://dl.example/1").unwrap();

        let recording = RecordingOpener::default();
        recording.open_external("https://dl.example/2").unwrap();
        recording.open_external("https://dl.example/3").unwrap();
        assert_eq!(recording.opened(), vec!["https://dl.example/2", "https://dl.example/3"]);
    }

    #[test]
    fn test_opener_command() {
        let (program, args) = opener_command();
        assert!(!program.is_empty());
        assert!(!["cmd", "sh", "bash", "powershell"].contains(&program));
        assert!(!args.iter().any(|arg| arg.eq_ignore_ascii_case("/c") || *arg == "-c"));
    }
}
