use crate::cli::{Cli, Config};
use crate::display::SpinnerContainer;

pub struct App {
    pub config: Config,
    no_animate: bool,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let no_animate = cli.no_animate;

        App::with_config(Config::from(cli), no_animate)
    }

    pub fn with_config(config: Config, no_animate: bool) -> Self {
        App { config, no_animate }
    }

    pub fn spinner(&self, message: &str) -> SpinnerContainer {
        SpinnerContainer::start_unless_no_terminal_or(self.no_animate, message)
    }
}
