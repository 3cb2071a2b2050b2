use spinoff::{Color, Spinner, spinners};
use std::io::IsTerminal;

pub struct SpinnerContainer {
    instance: Option<Spinner>,
}

impl SpinnerContainer {
    // The spinner api doesn't provide a way to create an empty instance,
    // so an empty option stands in for "no spinner".
    pub fn new() -> Self {
        SpinnerContainer { instance: None }
    }

    /// Starts a spinner unless asked not to or stdout isn't a terminal.
    ///
    /// Auto-detecting the terminal keeps the animation out of pipes and cron logs
    /// without anyone having to remember `--no_animate`.
    pub fn start_unless_no_terminal_or(no_animate: bool, message: &str) -> Self {
        if no_animate || !std::io::stdout().is_terminal() {
            return SpinnerContainer::new();
        }

        SpinnerContainer {
            instance: Some(Spinner::new(spinners::Dots, message.to_owned(), Color::Blue)),
        }
    }

    pub fn update_text(&mut self, message: String) {
        if let Some(spinner) = self.instance.as_mut() {
            spinner.update_text(message)
        }
    }

    /// Clears the spinner line, if there is one.
    pub fn stop(&mut self) {
        // Has to take ownership to prevent double stopping.
        if let Some(mut s) = self.instance.take() {
            s.clear();
        }
    }
}

impl Drop for SpinnerContainer {
    fn drop(&mut self) {
        self.stop();
    }
}
