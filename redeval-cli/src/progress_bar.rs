use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use redeval::progress::ProgressNotifier;

#[derive(Debug)]
struct ProgressBarState {
    length: u64,
    message: &'static str,
    initialized: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct RedevalProgressBar {
    bar: ProgressBar,
    state: Arc<Mutex<ProgressBarState>>,
}

impl RedevalProgressBar {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(ProgressStyle::default_spinner());
        bar.enable_steady_tick(Duration::from_millis(50));
        bar.set_message("Reading sequences...");

        Self {
            bar,
            state: Arc::new(Mutex::new(ProgressBarState {
                length: 0,
                message: "",
                initialized: false,
            })),
        }
    }

    pub fn show(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear()
    }

    fn init(&self) {
        let mut state = self
            .state
            .lock()
            .expect("Could not acquire progress bar lock");
        if state.initialized {
            return;
        }

        if state.length == 0 {
            self.bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {pos}/? ({per_sec}) {msg}")
                    .expect("Invalid progress bar template"),
            );
        } else {
            self.bar.set_length(state.length);
            self.bar.set_style(
                ProgressStyle::default_bar()
                    .template("{msg} {wide_bar} {pos}/{len} [ETA {eta}]")
                    .expect("Invalid progress bar template"),
            );
        }
        self.bar.set_message(state.message);
        self.bar.set_position(0);

        state.initialized = true;
    }

    /// Starts a new stage of `length` steps, `0` if the length is unknown.
    pub fn start_stage(&self, message: &'static str, length: u64) {
        let mut state = self
            .state
            .lock()
            .expect("Could not acquire progress bar lock");

        state.initialized = false;
        state.message = message;
        state.length = length;
    }

    pub fn inc(&self, value: u64) {
        self.init();
        self.bar.inc(value);
    }

    pub fn println<I: AsRef<str>>(&self, msg: I) {
        self.bar.println(msg);
    }
}

impl ProgressNotifier for RedevalProgressBar {
    fn set_iter_num(&self, num_iter: u64) {
        self.start_stage("Pairs", num_iter);
    }

    fn inc_iter(&self) {
        self.inc(1);
    }
}
