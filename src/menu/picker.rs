use tracing::debug;

use crate::command::SharedRunner;
use crate::config::AppConfig;

/// The external modal picker.
///
/// Labels go to the picker's stdin one per line, verbatim (glyphs included,
/// since the dispatch layer matches on exact label equality); the selection
/// comes back on stdout. Cancel, a non-zero exit, or empty output all read
/// as the empty selection.
pub struct Picker {
    runner: SharedRunner,
    program: String,
    base_args: Vec<String>,
}

impl Picker {
    pub fn new(runner: SharedRunner, config: &AppConfig) -> Self {
        Self {
            runner,
            program: config.picker.clone(),
            base_args: config.picker_args.clone(),
        }
    }

    /// Show the menu and return the chosen label, or `""` on cancel.
    pub async fn prompt(&self, options: &[String], title: &str) -> String {
        // Ask for as many visible rows as there are options so the whole
        // list fits without scrolling.
        let lines = options.len().to_string();
        let mut args: Vec<&str> = self.base_args.iter().map(String::as_str).collect();
        args.extend(["--prompt", title, "--lines", lines.as_str()]);

        let mut input = options.join("\n");
        input.push('\n');

        match self
            .runner
            .run_with_input(&self.program, &args, &input)
            .await
        {
            Ok(output) => output.trim().to_string(),
            Err(e) => {
                debug!("picker closed without a selection: {}", e);
                String::new()
            }
        }
    }
}
