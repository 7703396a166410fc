//! Terminal side of the client: notices on stderr, results on stdout.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use shortlink_client::{Navigator, Notice, NoticeLevel, Notifier};

#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "ok",
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {notice}");
    }
}

/// There is no login view to switch to; remember the redirect and print a hint.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    redirected: AtomicBool,
}

impl ConsoleNavigator {
    pub fn redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }
}

impl Navigator for ConsoleNavigator {
    fn to_login(&self) {
        if !self.redirected.swap(true, Ordering::SeqCst) {
            eprintln!("Signed out. Run `shortlink login` to sign in again.");
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
